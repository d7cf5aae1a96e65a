//! # underkit
//!
//! Cooldown-based call throttling and order-preserving sequence utilities.
//!
//! The centerpiece is [`throttle`]: wrap any function so that bursts of calls
//! collapse into at most two executions per cooldown window - one immediately
//! at the start of the burst (the leading edge) and one when the window
//! closes, carrying the latest arguments (the trailing edge). Calls absorbed
//! into a window return a clone of the most recent actual result, so callers
//! always get an answer, just a stale one.
//!
//! Around it sit a stable key-based sorter and a small set of sequence
//! combinators that all share one rule: output order is determined by input
//! order, never by hash order or sort instability.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use underkit::{throttle, ThreadScheduler};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let scheduler = Arc::new(ThreadScheduler::new());
//!
//! // At most two refreshes per 300ms window, however hard this is called.
//! let refresh = throttle(
//!     |view_id: u64| println!("refreshing view {view_id}"),
//!     Duration::from_millis(300),
//!     scheduler,
//! )
//! .unwrap();
//!
//! for view_id in 0..100 {
//!     refresh.call(view_id);
//! }
//! ```
//!
//! ## Deterministic Testing
//!
//! Time is a port, not an ambient global. Production code injects
//! [`ThreadScheduler`]; tests inject [`VirtualClock`] and replay any timeline
//! exactly, with no sleeps and no flakiness:
//!
//! ```rust
//! use underkit::{throttle, VirtualClock};
//! use std::sync::Arc;
//! use std::time::{Duration, Instant};
//!
//! let clock = Arc::new(VirtualClock::new(Instant::now()));
//! let double = throttle(|x: i32| x * 2, Duration::from_millis(100), clock.clone()).unwrap();
//!
//! assert_eq!(double.call(1), 2);   // leading edge runs immediately
//! assert_eq!(double.call(9), 2);   // absorbed: stale result, trailing armed
//!
//! clock.advance(Duration::from_millis(100));
//! assert_eq!(double.metrics().trailing_runs(), 1); // ran with x = 9
//! ```
//!
//! ## Stable Sorting
//!
//! [`sort_by_key`] sorts by an extracted key and keeps the input order of
//! elements whose keys compare equal. Selectors return `Option`: elements
//! without a key sort to the end, still in input order.
//!
//! ```rust
//! use underkit::sort_by_key;
//!
//! let words = ["one", "two", "three", "four", "five"];
//! assert_eq!(
//!     sort_by_key(&words, |w| Some(w.len())),
//!     ["one", "two", "four", "five", "three"],
//! );
//! ```
//!
//! ## Sequence Combinators
//!
//! [`invoke`], [`flatten`], [`zip`], [`intersection`] and [`difference`]
//! mirror the classic list-utility vocabulary, each preserving input order:
//!
//! ```rust
//! use underkit::{difference, intersection};
//!
//! let stooges = ["moe", "curly", "larry"];
//! let leaders = ["moe", "groucho"];
//! assert_eq!(intersection(&stooges, &[&leaders]), ["moe"]);
//! assert_eq!(difference(&[1, 2, 3], &[&[2, 30, 40]]), [1, 3]);
//! ```
//!
//! ## Architecture
//!
//! The crate follows hexagonal architecture:
//!
//! - **Domain** ([`domain`]): pure logic - the cooldown gate, key ordering,
//!   sorters and combinators. No clocks, no threads.
//! - **Application** ([`application`]): the [`Throttled`] wrapper wiring a
//!   gate to a scheduler, plus metrics. Defines the [`Clock`] and
//!   [`Scheduler`] ports.
//! - **Infrastructure** ([`infrastructure`]): adapters - [`SystemClock`],
//!   [`ThreadScheduler`], and the [`VirtualClock`] test double.
//!
//! ## Observability
//!
//! Throttling decisions emit `tracing` events (`trace` for per-call
//! decisions, `debug` for trailing runs), and every wrapper carries
//! [`ThrottleMetrics`] counting leading runs, trailing runs and deferred
//! calls. Neither requires any setup; install a `tracing` subscriber to see
//! the events.
//!
//! ## Panic Behavior
//!
//! If a wrapped function panics on the leading edge, the panic propagates to
//! the caller and the wrapper is poisoned; later calls panic. On the trailing
//! edge the panic lands in the scheduler: [`ThreadScheduler`] catches it,
//! emits a `tracing` error and keeps serving other timers, while
//! [`VirtualClock`] lets it propagate into the test that advanced time.

// Domain layer - pure business logic
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    cooldown::{CooldownGate, GateDecision, ThrottleError},
    ordering::SortKey,
    sequence::{
        MethodByName, Nested, SequenceError, difference, flatten, intersection, invoke,
        invoke_named, zip,
    },
    sort::{FieldByName, sort_by_field, sort_by_key, sort_by_key_in_place, sort_indices_by},
};

pub use application::{
    metrics::{ThrottleMetrics, ThrottleMetricsSnapshot},
    ports::{Clock, Scheduler, Task, TimerHandle},
    throttle::{Throttled, throttle},
};

pub use infrastructure::{clock::SystemClock, mocks::VirtualClock, scheduler::ThreadScheduler};
