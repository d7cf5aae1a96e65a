use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use std::time::{Duration, Instant};
use underkit::{CooldownGate, Scheduler, ThreadScheduler, VirtualClock, throttle};

/// Benchmark raw gate decision speed
fn bench_gate_decisions(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_decisions");
    group.throughput(Throughput::Elements(1));

    let open = CooldownGate::new(Duration::from_millis(100)).unwrap();
    let now = Instant::now();
    group.bench_function("first_call", |b| {
        b.iter(|| black_box(open.check(black_box(now))))
    });

    let mut closed = CooldownGate::new(Duration::from_millis(100)).unwrap();
    closed.mark_run(now);
    let inside = now + Duration::from_millis(10);
    group.bench_function("inside_window", |b| {
        b.iter(|| black_box(closed.check(black_box(inside))))
    });

    group.finish();
}

/// Benchmark the two call paths of a throttled wrapper
fn bench_throttled_calls(c: &mut Criterion) {
    let mut group = c.benchmark_group("throttled_calls");
    group.throughput(Throughput::Elements(1));

    // A one-nanosecond window is over by the next iteration, so every call
    // takes the leading path.
    group.bench_function("leading_path", |b| {
        let scheduler: Arc<dyn Scheduler> = Arc::new(ThreadScheduler::new());
        let double = throttle(|x: u64| x * 2, Duration::from_nanos(1), scheduler).unwrap();
        b.iter(|| black_box(double.call(black_box(1))));
    });

    // An hour-long window never closes during the benchmark, so every call
    // after the first is absorbed and returns the stale result.
    group.bench_function("absorbed_path", |b| {
        let scheduler: Arc<dyn Scheduler> = Arc::new(ThreadScheduler::new());
        let double = throttle(|x: u64| x * 2, Duration::from_secs(3600), scheduler).unwrap();
        double.call(1);
        b.iter(|| black_box(double.call(black_box(2))));
    });

    group.finish();
}

/// Benchmark collapsing whole bursts on a virtual timeline
fn bench_burst_collapse(c: &mut Criterion) {
    let mut group = c.benchmark_group("burst_collapse");

    for burst in [10u64, 100, 1000] {
        group.throughput(Throughput::Elements(burst));
        group.bench_with_input(BenchmarkId::new("calls", burst), &burst, |b, &burst| {
            b.iter_batched(
                || {
                    let clock = Arc::new(VirtualClock::new(Instant::now()));
                    let sink = throttle(
                        |x: u64| x,
                        Duration::from_millis(100),
                        clock.clone() as Arc<dyn Scheduler>,
                    )
                    .unwrap();
                    (clock, sink)
                },
                |(clock, sink)| {
                    for i in 0..burst {
                        sink.call(black_box(i));
                        clock.advance(Duration::from_micros(10));
                    }
                    // Close the window so the trailing edge runs too.
                    clock.advance(Duration::from_millis(100));
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

/// Benchmark multi-threaded callers sharing one wrapper
fn bench_concurrent_callers(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_callers");

    for num_threads in [2, 4, 8] {
        group.throughput(Throughput::Elements(num_threads as u64 * 1000));

        group.bench_with_input(
            BenchmarkId::new("threads", num_threads),
            &num_threads,
            |b, &num_threads| {
                b.iter(|| {
                    let scheduler: Arc<dyn Scheduler> = Arc::new(ThreadScheduler::new());
                    let tick = throttle(|_: u64| (), Duration::from_secs(3600), scheduler).unwrap();
                    // Open the window so the workers only contend on absorption.
                    tick.call(0);

                    let mut handles = vec![];
                    for i in 0..num_threads {
                        let tick = tick.clone();
                        handles.push(std::thread::spawn(move || {
                            for j in 0..1000u64 {
                                tick.call(black_box(i as u64 * 1000 + j));
                            }
                        }));
                    }

                    for handle in handles {
                        handle.join().unwrap();
                    }
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_gate_decisions,
    bench_throttled_calls,
    bench_burst_collapse,
    bench_concurrent_callers,
);
criterion_main!(benches);
