//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the application
//! layer needs. Infrastructure adapters implement these ports.

use std::fmt::Debug;
use std::time::Instant;

/// A deferred unit of work handed to a scheduler.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Identifies one scheduled callback for cancellation.
///
/// Handles are opaque and cheap to copy. A handle is only meaningful to the
/// scheduler that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Create a handle from a scheduler-assigned id.
    pub fn from_raw(id: u64) -> Self {
        TimerHandle(id)
    }

    /// Get the scheduler-assigned id.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

/// Port for obtaining current time.
///
/// This abstraction allows the application layer to work with time
/// without depending on system clock implementation details.
/// Infrastructure provides concrete implementations (SystemClock, VirtualClock).
pub trait Clock: Send + Sync + Debug {
    /// Get the current instant.
    fn now(&self) -> Instant;
}

/// Port for scheduling deferred callbacks.
///
/// Extends [`Clock`] because a scheduler's deadlines are only meaningful
/// against its own notion of "now"; giving the throttle wrapper a single
/// collaborator for both keeps decisions and timer fires on one timeline.
/// Infrastructure provides concrete implementations (ThreadScheduler for
/// production, VirtualClock for deterministic tests).
pub trait Scheduler: Clock {
    /// Schedule `task` to run once, as soon as `deadline` is reached.
    ///
    /// # Arguments
    /// * `deadline` - When the task becomes due
    /// * `task` - The work to run
    ///
    /// # Returns
    /// A handle that can cancel the task if it has not fired yet.
    fn schedule(&self, deadline: Instant, task: Task) -> TimerHandle;

    /// Cancel a scheduled task.
    ///
    /// Cancelling a handle whose task already ran, or that was already
    /// cancelled, is a no-op.
    fn cancel(&self, handle: TimerHandle);
}
