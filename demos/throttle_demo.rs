//! Basic example demonstrating call throttling.
//!
//! Wraps a noisy "refresh" function with a 300ms cooldown window and hammers
//! it, showing how a burst collapses into one leading and one trailing run
//! per window.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use underkit::{Scheduler, ThreadScheduler, throttle};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Throttling Example ===\n");
    println!("Policy: at most one leading and one trailing run per 300ms window\n");

    let started = Instant::now();
    let scheduler: Arc<dyn Scheduler> = Arc::new(ThreadScheduler::new());
    let refresh = throttle(
        move |view: u32| {
            println!(
                "  [{:>4}ms] refreshing view {view}",
                started.elapsed().as_millis()
            );
        },
        Duration::from_millis(300),
        scheduler,
    )
    .unwrap();

    println!("Burst of 10 calls, 30ms apart:");
    for view in 0..10 {
        refresh.call(view);
        thread::sleep(Duration::from_millis(30));
    }

    // Give the last trailing edge room to fire.
    thread::sleep(Duration::from_millis(400));

    println!("\nIsolated calls outside any window run immediately:");
    refresh.call(100);
    thread::sleep(Duration::from_millis(350));
    refresh.call(101);
    thread::sleep(Duration::from_millis(400));

    let snapshot = refresh.metrics().snapshot();
    println!("\n=== Example Complete ===");
    println!(
        "Calls observed: {}, actual runs: {} ({} leading, {} trailing)",
        snapshot.total_calls(),
        snapshot.total_runs(),
        snapshot.leading_runs,
        snapshot.trailing_runs
    );
    println!(
        "Notice: {:.0}% of the absorbed calls never ran at all.",
        snapshot.collapse_rate() * 100.0
    );
}
