//! Call throttling with leading and trailing edges.
//!
//! Wraps a function so that bursts of calls collapse into at most two
//! executions per cooldown window: one immediately at the start of the burst
//! (leading edge) and one when the window closes (trailing edge), using the
//! arguments of the most recent call. Calls absorbed into a window return a
//! clone of the most recent actual result, which is stale by design.

use crate::application::metrics::ThrottleMetrics;
use crate::application::ports::{Scheduler, TimerHandle};
use crate::domain::cooldown::{CooldownGate, GateDecision, ThrottleError};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Wrap `func` so that it runs at most twice per cooldown window.
///
/// Convenience form of [`Throttled::new`].
///
/// # Arguments
/// * `func` - The function to throttle
/// * `wait` - The cooldown window length
/// * `scheduler` - Drives deferred trailing-edge executions and supplies time
///
/// # Errors
/// Returns `ThrottleError::ZeroWait` if `wait` is zero.
///
/// # Example
/// ```
/// use underkit::{throttle, VirtualClock};
/// use std::sync::Arc;
/// use std::time::{Duration, Instant};
///
/// let clock = Arc::new(VirtualClock::new(Instant::now()));
/// let double = throttle(|x: i32| x * 2, Duration::from_millis(100), clock.clone()).unwrap();
///
/// assert_eq!(double.call(1), 2);
/// // Within the window: deferred, returns the stale result.
/// assert_eq!(double.call(5), 2);
///
/// // Closing the window runs the deferred call with the latest arguments.
/// clock.advance(Duration::from_millis(100));
/// assert_eq!(double.metrics().trailing_runs(), 1);
///
/// // Once that window passes too, the next call is a fresh leading edge.
/// clock.advance(Duration::from_millis(100));
/// assert_eq!(double.call(7), 14);
/// ```
pub fn throttle<A, R, F>(
    func: F,
    wait: Duration,
    scheduler: Arc<dyn Scheduler>,
) -> Result<Throttled<A, R>, ThrottleError>
where
    F: FnMut(A) -> R + Send + 'static,
    A: Send + 'static,
    R: Clone + Send + 'static,
{
    Throttled::new(func, wait, scheduler)
}

/// A function wrapped with cooldown-based throttling.
///
/// Each wrapper owns one cooldown window, one pending-call slot and one
/// result cell. Cloning hands out another handle to the same wrapper: all
/// clones share that state, so a burst spread across clones still collapses
/// into a single window.
///
/// # Semantics
///
/// * The first call, and any call made at or after `last run + wait`, runs
///   immediately (leading edge) and opens a new window.
/// * A call inside the window is recorded as the pending call, overwriting
///   any previously pending one, and returns a clone of the most recent
///   actual result. One timer per window fires the pending call when the
///   window closes (trailing edge).
/// * A leading call discards any pending call and cancels the window's
///   timer; deferral never outlives the window that created it.
///
/// Callers are expected to come from one logical timeline (the scheduler's
/// callback counts as part of that timeline). The wrapper is safe to share
/// across threads, but two threads calling at the exact same instant race
/// for the leading edge.
///
/// # Panics
///
/// If the wrapped function panics, the panic propagates to whoever ran it:
/// the caller on a leading edge, the scheduler on a trailing edge. The
/// wrapper is poisoned afterwards and later calls panic.
pub struct Throttled<A, R> {
    core: Arc<ThrottleCore<A, R>>,
}

struct ThrottleCore<A, R> {
    func: Mutex<Box<dyn FnMut(A) -> R + Send>>,
    state: Mutex<GateState<A, R>>,
    scheduler: Arc<dyn Scheduler>,
    metrics: ThrottleMetrics,
}

struct GateState<A, R> {
    gate: CooldownGate,
    pending: Option<A>,
    armed: Option<TimerHandle>,
    last_result: Option<R>,
}

impl<A, R> Throttled<A, R>
where
    A: Send + 'static,
    R: Clone + Send + 'static,
{
    /// Wrap `func` with a cooldown window of `wait`.
    ///
    /// # Errors
    /// Returns `ThrottleError::ZeroWait` if `wait` is zero.
    pub fn new<F>(
        func: F,
        wait: Duration,
        scheduler: Arc<dyn Scheduler>,
    ) -> Result<Self, ThrottleError>
    where
        F: FnMut(A) -> R + Send + 'static,
    {
        let gate = CooldownGate::new(wait)?;
        Ok(Self {
            core: Arc::new(ThrottleCore {
                func: Mutex::new(Box::new(func)),
                state: Mutex::new(GateState {
                    gate,
                    pending: None,
                    armed: None,
                    last_result: None,
                }),
                scheduler,
                metrics: ThrottleMetrics::new(),
            }),
        })
    }

    /// Invoke the wrapped function, subject to the cooldown window.
    ///
    /// Runs the function immediately on a leading edge and returns its fresh
    /// result. Inside the window, records the call for the trailing edge and
    /// returns a clone of the most recent actual result instead.
    pub fn call(&self, args: A) -> R {
        let now = self.core.scheduler.now();
        {
            let mut state = self
                .core
                .state
                .lock()
                .expect("throttle state mutex poisoned - a caller panicked while holding the lock");

            if let GateDecision::Defer { deadline } = state.gate.check(now) {
                if state.pending.replace(args).is_some() {
                    tracing::trace!("pending call overwritten, last write wins");
                }
                if state.armed.is_none() {
                    let core = Arc::clone(&self.core);
                    let handle = self
                        .core
                        .scheduler
                        .schedule(deadline, Box::new(move || ThrottleCore::fire(core)));
                    state.armed = Some(handle);
                    tracing::trace!(timer = handle.as_raw(), "trailing edge armed");
                }
                self.core.metrics.record_deferred();
                return state
                    .last_result
                    .clone()
                    .expect("a deferred call implies a completed leading run");
            }

            // Leading edge claims the window: any deferral left over from the
            // previous window is dropped with its timer.
            if let Some(handle) = state.armed.take() {
                self.core.scheduler.cancel(handle);
                state.pending = None;
                tracing::trace!(timer = handle.as_raw(), "stale trailing edge cancelled");
            }
        }

        let result = {
            let mut func = self
                .core
                .func
                .lock()
                .expect("throttled function mutex poisoned - the wrapped function panicked");
            (*func)(args)
        };

        let mut state = self
            .core
            .state
            .lock()
            .expect("throttle state mutex poisoned - a caller panicked while holding the lock");
        state.gate.mark_run(now);
        state.last_result = Some(result.clone());
        drop(state);

        self.core.metrics.record_leading();
        tracing::trace!("leading edge ran");
        result
    }

    /// Get the configured cooldown window length.
    pub fn wait(&self) -> Duration {
        self.core
            .state
            .lock()
            .expect("throttle state mutex poisoned - a caller panicked while holding the lock")
            .gate
            .wait()
    }

    /// Check whether a trailing-edge execution is currently armed.
    pub fn is_armed(&self) -> bool {
        self.core
            .state
            .lock()
            .expect("throttle state mutex poisoned - a caller panicked while holding the lock")
            .armed
            .is_some()
    }

    /// Get the metrics tracker for this wrapper.
    ///
    /// The tracker is shared: clones of it keep reporting on this wrapper.
    pub fn metrics(&self) -> &ThrottleMetrics {
        &self.core.metrics
    }
}

impl<A, R> ThrottleCore<A, R>
where
    A: Send + 'static,
    R: Clone + Send + 'static,
{
    /// Trailing-edge execution, run by the scheduler when the window closes.
    fn fire(core: Arc<Self>) {
        let fired_at = core.scheduler.now();
        let args = {
            let mut state = core
                .state
                .lock()
                .expect("throttle state mutex poisoned - a caller panicked while holding the lock");
            state.armed = None;
            state.pending.take()
        };

        // A leading call can claim the window between the deadline passing
        // and this callback running; there is nothing left to do then.
        let Some(args) = args else {
            tracing::trace!("trailing edge fired with nothing pending");
            return;
        };

        let result = {
            let mut func = core
                .func
                .lock()
                .expect("throttled function mutex poisoned - the wrapped function panicked");
            (*func)(args)
        };

        let mut state = core
            .state
            .lock()
            .expect("throttle state mutex poisoned - a caller panicked while holding the lock");
        state.gate.mark_run(fired_at);
        state.last_result = Some(result);
        drop(state);

        core.metrics.record_trailing();
        tracing::debug!("trailing edge ran");
    }
}

impl<A, R> Clone for Throttled<A, R> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<A, R> fmt::Debug for Throttled<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Throttled")
            .field("metrics", &self.core.metrics)
            .finish_non_exhaustive()
    }
}
