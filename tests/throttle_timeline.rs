use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use underkit::{Clock, Scheduler, Throttled, VirtualClock, throttle};

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Build a throttled recorder that logs `(offset from start, marker)` for
/// every actual execution.
fn recording_throttle(
    wait: Duration,
    clock: &Arc<VirtualClock>,
    start: Instant,
) -> (Throttled<u64, ()>, Arc<Mutex<Vec<(Duration, u64)>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let throttled = {
        let log = Arc::clone(&log);
        let clock = Arc::clone(clock);
        let closure_clock = Arc::clone(&clock);
        throttle(
            move |marker: u64| {
                log.lock().unwrap().push((closure_clock.now() - start, marker));
            },
            wait,
            clock.clone() as Arc<dyn Scheduler>,
        )
        .unwrap()
    };
    (throttled, log)
}

/// Schedule `throttled.call(t)` at `start + t` for each offset, the way a
/// caller on a timeline would.
fn schedule_calls(clock: &Arc<VirtualClock>, throttled: &Throttled<u64, ()>, start: Instant, offsets: &[u64]) {
    for &offset in offsets {
        let throttled = throttled.clone();
        clock.schedule(
            start + ms(offset),
            Box::new(move || {
                throttled.call(offset);
            }),
        );
    }
}

#[test]
fn canonical_timeline_executes_at_documented_instants() {
    let start = Instant::now();
    let clock = Arc::new(VirtualClock::new(start));
    let (throttled, log) = recording_throttle(ms(100), &clock, start);

    // Calls at 0, 10, 25, 35, 45, 225, 300, 305, 800 and 801.
    throttled.call(0);
    schedule_calls(&clock, &throttled, start, &[10, 25, 35, 45, 225, 300, 305, 800, 801]);
    clock.advance(ms(900));

    let log = log.lock().unwrap();
    let times: Vec<Duration> = log.iter().map(|(at, _)| *at).collect();
    assert_eq!(
        times,
        [ms(0), ms(100), ms(225), ms(325), ms(800), ms(900)],
        "executions: leading at 0, trailing at 100, leading at 225, \
         trailing at 325, leading at 800, trailing at 900"
    );

    // Each trailing run carries the arguments of the latest call it absorbed.
    let markers: Vec<u64> = log.iter().map(|(_, marker)| *marker).collect();
    assert_eq!(markers, [0, 45, 225, 305, 800, 801]);
}

#[test]
fn canonical_timeline_metrics_add_up() {
    let start = Instant::now();
    let clock = Arc::new(VirtualClock::new(start));
    let (throttled, _log) = recording_throttle(ms(100), &clock, start);

    throttled.call(0);
    schedule_calls(&clock, &throttled, start, &[10, 25, 35, 45, 225, 300, 305, 800, 801]);
    clock.advance(ms(900));

    let snapshot = throttled.metrics().snapshot();
    assert_eq!(snapshot.leading_runs, 3);
    assert_eq!(snapshot.trailing_runs, 3);
    assert_eq!(snapshot.deferred_calls, 7);
    assert_eq!(snapshot.total_runs(), 6);
    assert_eq!(snapshot.total_calls(), 10);
}

#[test]
fn absorbed_calls_return_stale_results_until_a_new_window() {
    let start = Instant::now();
    let clock = Arc::new(VirtualClock::new(start));
    let returns = Arc::new(Mutex::new(Vec::new()));

    let add = Arc::new(
        throttle(
            |(x, y): (i32, i32)| x + y,
            ms(100),
            clock.clone() as Arc<dyn Scheduler>,
        )
        .unwrap(),
    );

    for (offset, x, y) in [(10, 1, 4), (20, 2, 6), (30, 3, 7), (40, 10, 20), (220, 4, 5)] {
        let add = Arc::clone(&add);
        let returns = Arc::clone(&returns);
        clock.schedule(
            start + ms(offset),
            Box::new(move || {
                returns.lock().unwrap().push(add.call((x, y)));
            }),
        );
    }
    clock.advance(ms(220));

    // The first call runs and returns fresh; the next three are absorbed and
    // return its result; by 220 the window (reopened by the trailing run at
    // 110) has passed, so the last call runs fresh again.
    assert_eq!(*returns.lock().unwrap(), [5, 5, 5, 5, 9]);
}

#[test]
fn callable_twice_strictly_within_first_two_windows() {
    let start = Instant::now();
    let clock = Arc::new(VirtualClock::new(start));
    let (throttled, log) = recording_throttle(ms(100), &clock, start);

    throttled.call(0);
    schedule_calls(&clock, &throttled, start, &[50, 100, 150, 199]);

    // Strictly before 200ms only the leading run at 0 and the boundary
    // leading run at 100 have happened; the call at 100 also cancels the
    // trailing timer armed by the call at 50.
    clock.advance(ms(199));
    assert_eq!(log.lock().unwrap().len(), 2);

    // The 150/199 burst flushes exactly at 200.
    clock.advance(ms(1));
    let log = log.lock().unwrap();
    let times: Vec<Duration> = log.iter().map(|(at, _)| *at).collect();
    assert_eq!(times, [ms(0), ms(100), ms(200)]);
    let markers: Vec<u64> = log.iter().map(|(_, marker)| *marker).collect();
    assert_eq!(markers, [0, 100, 199]);
}

#[test]
fn arguments_reach_the_wrapped_function_unchanged() {
    let clock = Arc::new(VirtualClock::new(Instant::now()));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let record = {
        let seen = Arc::clone(&seen);
        throttle(
            move |pair: (&'static str, u64)| {
                seen.lock().unwrap().push(pair);
            },
            ms(100),
            clock.clone() as Arc<dyn Scheduler>,
        )
        .unwrap()
    };

    record.call(("alpha", 1));
    assert_eq!(*seen.lock().unwrap(), [("alpha", 1)]);
}

#[test]
fn quiet_periods_produce_no_trailing_runs() {
    let start = Instant::now();
    let clock = Arc::new(VirtualClock::new(start));
    let (throttled, log) = recording_throttle(ms(100), &clock, start);

    // Isolated calls spaced wider than the window: every one is leading.
    throttled.call(0);
    schedule_calls(&clock, &throttled, start, &[250, 500]);
    clock.advance(ms(1000));

    let log = log.lock().unwrap();
    let times: Vec<Duration> = log.iter().map(|(at, _)| *at).collect();
    assert_eq!(times, [ms(0), ms(250), ms(500)]);
    assert_eq!(throttled.metrics().trailing_runs(), 0);
    assert_eq!(clock.pending_timers(), 0);
}

#[test]
fn bursts_in_separate_windows_each_get_a_trailing_run() {
    let start = Instant::now();
    let clock = Arc::new(VirtualClock::new(start));
    let (throttled, log) = recording_throttle(ms(100), &clock, start);

    throttled.call(0);
    schedule_calls(&clock, &throttled, start, &[20, 400, 430]);
    clock.advance(ms(1000));

    let log = log.lock().unwrap();
    let times: Vec<Duration> = log.iter().map(|(at, _)| *at).collect();
    assert_eq!(times, [ms(0), ms(100), ms(400), ms(500)]);
}
