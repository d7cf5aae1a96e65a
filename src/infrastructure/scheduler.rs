//! Thread-backed scheduler for deferred callbacks.
//!
//! `ThreadScheduler` drives trailing-edge executions in production. A single
//! worker thread sleeps until the earliest deadline and runs due tasks in
//! (deadline, schedule order). Cancellation is lazy: a cancelled timer is
//! removed from the live set immediately, and its heap entry is skipped when
//! it surfaces.

use crate::application::ports::{Clock, Scheduler, Task, TimerHandle};
use crate::infrastructure::clock::SystemClock;
use dashmap::DashMap;
use std::cmp::{Ordering as CmpOrdering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Instant;

struct Entry {
    deadline: Instant,
    id: u64,
    task: Task,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.id == other.id
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        self.deadline
            .cmp(&other.deadline)
            .then_with(|| self.id.cmp(&other.id))
    }
}

struct QueueState {
    heap: BinaryHeap<Reverse<Entry>>,
    shutdown: bool,
}

struct SchedulerShared {
    queue: Mutex<QueueState>,
    wakeup: Condvar,
    live: DashMap<u64, ()>,
    next_id: AtomicU64,
}

/// Scheduler backed by a dedicated worker thread.
///
/// Timers fire on the worker thread, so scheduled tasks must not assume they
/// run on the scheduling thread. A task that panics is caught and logged; the
/// worker keeps serving later timers. Dropping the scheduler stops the worker
/// and discards timers that have not fired.
///
/// # Example
/// ```no_run
/// use underkit::{Scheduler, ThreadScheduler};
/// use std::time::{Duration, Instant};
///
/// let scheduler = ThreadScheduler::new();
/// let handle = scheduler.schedule(
///     Instant::now() + Duration::from_millis(50),
///     Box::new(|| println!("fired")),
/// );
///
/// // Changed our mind: the callback never runs.
/// scheduler.cancel(handle);
/// ```
pub struct ThreadScheduler {
    shared: Arc<SchedulerShared>,
    clock: SystemClock,
    worker: Option<JoinHandle<()>>,
}

impl ThreadScheduler {
    /// Start a scheduler with its own worker thread.
    pub fn new() -> Self {
        let shared = Arc::new(SchedulerShared {
            queue: Mutex::new(QueueState {
                heap: BinaryHeap::new(),
                shutdown: false,
            }),
            wakeup: Condvar::new(),
            live: DashMap::new(),
            next_id: AtomicU64::new(0),
        });

        let worker = {
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name("underkit-scheduler".to_string())
                .spawn(move || Self::run(shared))
                .expect("failed to spawn scheduler worker thread")
        };

        Self {
            shared,
            clock: SystemClock::new(),
            worker: Some(worker),
        }
    }

    /// Get the number of timers scheduled but not yet fired or cancelled.
    pub fn live_timers(&self) -> usize {
        self.shared.live.len()
    }

    fn run(shared: Arc<SchedulerShared>) {
        loop {
            let entry = {
                let mut queue = shared
                    .queue
                    .lock()
                    .expect("scheduler queue mutex poisoned - a scheduling thread panicked");
                loop {
                    if queue.shutdown {
                        return;
                    }
                    let now = Instant::now();
                    let wait = match queue.heap.peek() {
                        Some(Reverse(head)) if head.deadline <= now => break,
                        Some(Reverse(head)) => Some(head.deadline.saturating_duration_since(now)),
                        None => None,
                    };
                    queue = match wait {
                        Some(wait) => {
                            shared
                                .wakeup
                                .wait_timeout(queue, wait)
                                .expect(
                                    "scheduler queue mutex poisoned - a scheduling thread panicked",
                                )
                                .0
                        }
                        None => shared.wakeup.wait(queue).expect(
                            "scheduler queue mutex poisoned - a scheduling thread panicked",
                        ),
                    };
                }
                let Some(Reverse(entry)) = queue.heap.pop() else {
                    continue;
                };
                entry
            };

            let Entry { id, task, .. } = entry;
            if shared.live.remove(&id).is_none() {
                tracing::trace!(timer = id, "skipping cancelled timer");
                continue;
            }

            // Run outside the queue lock so tasks can schedule further work.
            if panic::catch_unwind(AssertUnwindSafe(|| task())).is_err() {
                tracing::error!(timer = id, "scheduled task panicked");
            }
        }
    }
}

impl Default for ThreadScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ThreadScheduler {
    fn now(&self) -> Instant {
        self.clock.now()
    }
}

impl Scheduler for ThreadScheduler {
    fn schedule(&self, deadline: Instant, task: Task) -> TimerHandle {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        self.shared.live.insert(id, ());
        {
            let mut queue = self
                .shared
                .queue
                .lock()
                .expect("scheduler queue mutex poisoned - a scheduling thread panicked");
            queue.heap.push(Reverse(Entry { deadline, id, task }));
        }
        self.shared.wakeup.notify_one();
        tracing::trace!(timer = id, "timer scheduled");
        TimerHandle::from_raw(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        // The heap entry stays put; the worker skips ids that are not live.
        if self.shared.live.remove(&handle.as_raw()).is_some() {
            tracing::trace!(timer = handle.as_raw(), "timer cancelled");
        }
    }
}

impl Drop for ThreadScheduler {
    fn drop(&mut self) {
        // Shut down even through a poisoned queue lock.
        match self.shared.queue.lock() {
            Ok(mut queue) => queue.shutdown = true,
            Err(poisoned) => poisoned.into_inner().shutdown = true,
        }
        self.shared.wakeup.notify_one();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("scheduler worker thread panicked");
            }
        }
        tracing::debug!(
            discarded_timers = self.shared.live.len(),
            "scheduler shut down"
        );
    }
}

impl fmt::Debug for ThreadScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadScheduler")
            .field("live_timers", &self.live_timers())
            .finish_non_exhaustive()
    }
}
