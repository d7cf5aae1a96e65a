//! Virtual clock and scheduler for testing.

use crate::application::ports::{Clock, Scheduler, Task, TimerHandle};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

struct VirtualTimer {
    deadline: Instant,
    id: u64,
    task: Task,
}

struct VirtualState {
    now: Instant,
    next_id: u64,
    timers: Vec<VirtualTimer>,
}

/// Controllable clock whose timers fire when the test advances time.
///
/// `VirtualClock` implements both [`Clock`] and [`Scheduler`], so a test can
/// hand it to a throttled wrapper and replay any timeline deterministically.
/// [`advance`](VirtualClock::advance) moves time forward and runs every
/// callback whose deadline is reached, in (deadline, schedule order). While a
/// callback runs, the visible time is that callback's own deadline, so
/// callbacks observe the same instants a real scheduler would deliver.
///
/// Callbacks run on the advancing thread and may themselves read the clock,
/// schedule or cancel timers; a callback scheduling within the advanced range
/// fires during the same `advance` call.
///
/// # Examples
///
/// ```
/// use underkit::{Clock, Scheduler, VirtualClock};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::{Duration, Instant};
///
/// let start = Instant::now();
/// let clock = VirtualClock::new(start);
/// assert_eq!(clock.now(), start);
///
/// let fired = Arc::new(AtomicU32::new(0));
/// let observer = Arc::clone(&fired);
/// clock.schedule(
///     start + Duration::from_millis(100),
///     Box::new(move || {
///         observer.fetch_add(1, Ordering::SeqCst);
///     }),
/// );
///
/// // Not due yet.
/// clock.advance(Duration::from_millis(99));
/// assert_eq!(fired.load(Ordering::SeqCst), 0);
///
/// // Reaching the deadline fires the callback.
/// clock.advance(Duration::from_millis(1));
/// assert_eq!(fired.load(Ordering::SeqCst), 1);
/// assert_eq!(clock.now(), start + Duration::from_millis(100));
/// ```
///
/// # Thread Safety
///
/// `VirtualClock` is thread-safe and can be cloned to share across threads.
/// All clones share the same underlying state, so advancing time in one
/// clone fires timers scheduled through any clone.
#[derive(Clone)]
pub struct VirtualClock {
    inner: Arc<Mutex<VirtualState>>,
}

impl VirtualClock {
    /// Create a virtual clock starting at a specific instant.
    pub fn new(start: Instant) -> Self {
        Self {
            inner: Arc::new(Mutex::new(VirtualState {
                now: start,
                next_id: 0,
                timers: Vec::new(),
            })),
        }
    }

    /// Advance the clock by a duration, firing every callback whose deadline
    /// falls within the advanced range.
    ///
    /// Callbacks fire one at a time in (deadline, schedule order), with the
    /// clock set to each callback's deadline while it runs. Afterwards the
    /// clock reads exactly `now + duration`.
    pub fn advance(&self, duration: Duration) {
        let target = {
            let state = self
                .inner
                .lock()
                .expect("VirtualClock mutex poisoned - a test thread panicked while holding the lock");
            state.now + duration
        };
        self.run_until(target);
    }

    /// Set the clock to a specific instant without firing any timers.
    ///
    /// Prefer [`advance`](VirtualClock::advance) unless the test specifically
    /// needs time to pass with the scheduler asleep, the way a stalled worker
    /// would behave.
    pub fn set(&self, instant: Instant) {
        let mut state = self
            .inner
            .lock()
            .expect("VirtualClock mutex poisoned - a test thread panicked while holding the lock");
        state.now = instant;
    }

    /// Get the number of callbacks scheduled but not yet fired or cancelled.
    pub fn pending_timers(&self) -> usize {
        self.inner
            .lock()
            .expect("VirtualClock mutex poisoned - a test thread panicked while holding the lock")
            .timers
            .len()
    }

    /// Fire due callbacks one at a time until none is due at or before
    /// `target`, then settle the clock on `target`.
    fn run_until(&self, target: Instant) {
        loop {
            let due = {
                let mut state = self.inner.lock().expect(
                    "VirtualClock mutex poisoned - a test thread panicked while holding the lock",
                );
                let next = state
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.deadline <= target)
                    .min_by_key(|(_, timer)| (timer.deadline, timer.id))
                    .map(|(index, _)| index);
                match next {
                    Some(index) => {
                        let timer = state.timers.swap_remove(index);
                        // Time never runs backwards, even for a deadline that
                        // was already overdue when it was scheduled.
                        state.now = state.now.max(timer.deadline);
                        Some(timer.task)
                    }
                    None => {
                        state.now = state.now.max(target);
                        None
                    }
                }
            };

            // Run with the lock released: callbacks may read the clock,
            // schedule or cancel.
            match due {
                Some(task) => task(),
                None => break,
            }
        }
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Instant {
        self.inner
            .lock()
            .expect("VirtualClock mutex poisoned - a test thread panicked while holding the lock")
            .now
    }
}

impl Scheduler for VirtualClock {
    fn schedule(&self, deadline: Instant, task: Task) -> TimerHandle {
        let mut state = self
            .inner
            .lock()
            .expect("VirtualClock mutex poisoned - a test thread panicked while holding the lock");
        let id = state.next_id;
        state.next_id += 1;
        state.timers.push(VirtualTimer { deadline, id, task });
        TimerHandle::from_raw(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        let mut state = self
            .inner
            .lock()
            .expect("VirtualClock mutex poisoned - a test thread panicked while holding the lock");
        state.timers.retain(|timer| timer.id != handle.as_raw());
    }
}

impl fmt::Debug for VirtualClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualClock")
            .field("pending_timers", &self.pending_timers())
            .finish_non_exhaustive()
    }
}
