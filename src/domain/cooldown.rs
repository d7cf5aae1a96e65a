//! Cooldown window decisions for call throttling.
//!
//! This module defines the pure state machine that decides whether an
//! invocation attempt runs immediately (leading edge) or is deferred to the
//! end of the current cooldown window (trailing edge).

use std::time::{Duration, Instant};

/// Error returned when throttle configuration validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThrottleError {
    /// Cooldown duration must be greater than zero
    ZeroWait,
}

impl std::fmt::Display for ThrottleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThrottleError::ZeroWait => {
                write!(f, "cooldown wait must be greater than 0")
            }
        }
    }
}

impl std::error::Error for ThrottleError {}

/// Decision made by a cooldown gate for a single invocation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Run the function immediately (leading edge)
    Run,
    /// Defer the call until the window closes at `deadline` (trailing edge)
    Defer {
        /// When the current cooldown window ends
        deadline: Instant,
    },
}

impl GateDecision {
    /// Check if this decision is Run.
    pub fn is_run(&self) -> bool {
        matches!(self, GateDecision::Run)
    }

    /// Check if this decision is Defer.
    pub fn is_defer(&self) -> bool {
        matches!(self, GateDecision::Defer { .. })
    }
}

/// Pure state machine for one cooldown window.
///
/// Tracks when the wrapped function last actually ran and decides what to do
/// with each invocation attempt. The gate never reads a clock; callers supply
/// every timestamp, which keeps the decision logic deterministic and easy to
/// test.
///
/// An attempt landing exactly on the window boundary (`now == last run + wait`)
/// counts as a fresh leading call, not as part of the closing window.
///
/// # Example
/// ```
/// use underkit::domain::cooldown::{CooldownGate, GateDecision};
/// use std::time::{Duration, Instant};
///
/// let mut gate = CooldownGate::new(Duration::from_millis(100)).unwrap();
/// let start = Instant::now();
///
/// // The first attempt always runs.
/// assert!(gate.check(start).is_run());
/// gate.mark_run(start);
///
/// // Within the window, attempts are deferred to the window's end.
/// let decision = gate.check(start + Duration::from_millis(30));
/// assert_eq!(
///     decision,
///     GateDecision::Defer { deadline: start + Duration::from_millis(100) }
/// );
///
/// // At the boundary, the next attempt is a new leading call.
/// assert!(gate.check(start + Duration::from_millis(100)).is_run());
/// ```
#[derive(Debug, Clone)]
pub struct CooldownGate {
    wait: Duration,
    last_run: Option<Instant>,
}

impl CooldownGate {
    /// Create a gate with the given cooldown duration.
    ///
    /// # Errors
    /// Returns `ThrottleError::ZeroWait` if `wait` is zero.
    pub fn new(wait: Duration) -> Result<Self, ThrottleError> {
        if wait.is_zero() {
            return Err(ThrottleError::ZeroWait);
        }
        Ok(Self {
            wait,
            last_run: None,
        })
    }

    /// Decide what to do with an invocation attempt at `now`.
    ///
    /// # Arguments
    /// * `now` - When the attempt was made
    ///
    /// # Returns
    /// `GateDecision::Run` if at least `wait` has elapsed since the last run
    /// (or no run has happened yet), otherwise `GateDecision::Defer` carrying
    /// the end of the current window.
    pub fn check(&self, now: Instant) -> GateDecision {
        match self.last_run {
            Some(last) if now.saturating_duration_since(last) < self.wait => GateDecision::Defer {
                deadline: last + self.wait,
            },
            _ => GateDecision::Run,
        }
    }

    /// Record a completed run at `at`, opening a new cooldown window.
    pub fn mark_run(&mut self, at: Instant) {
        self.last_run = Some(at);
    }

    /// Get the configured cooldown duration.
    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Get when the wrapped function last actually ran, if ever.
    pub fn last_run(&self) -> Option<Instant> {
        self.last_run
    }

    /// Reset the gate state, as if no run had ever happened.
    pub fn reset(&mut self) {
        self.last_run = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_attempt_runs() {
        let gate = CooldownGate::new(Duration::from_millis(100)).unwrap();
        assert_eq!(gate.check(Instant::now()), GateDecision::Run);
    }

    #[test]
    fn test_attempt_within_window_defers() {
        let mut gate = CooldownGate::new(Duration::from_millis(100)).unwrap();
        let start = Instant::now();

        gate.mark_run(start);
        let decision = gate.check(start + Duration::from_millis(50));
        assert_eq!(
            decision,
            GateDecision::Defer {
                deadline: start + Duration::from_millis(100)
            }
        );
    }

    #[test]
    fn test_boundary_attempt_runs() {
        let mut gate = CooldownGate::new(Duration::from_millis(100)).unwrap();
        let start = Instant::now();

        gate.mark_run(start);
        assert!(gate.check(start + Duration::from_millis(100)).is_run());
        assert!(gate.check(start + Duration::from_millis(150)).is_run());
    }

    #[test]
    fn test_deadline_is_fixed_within_a_window() {
        let mut gate = CooldownGate::new(Duration::from_millis(100)).unwrap();
        let start = Instant::now();

        gate.mark_run(start);
        // Every attempt inside the window defers to the same deadline.
        for offset in [1u64, 25, 50, 99] {
            let decision = gate.check(start + Duration::from_millis(offset));
            assert_eq!(
                decision,
                GateDecision::Defer {
                    deadline: start + Duration::from_millis(100)
                },
                "attempt at {offset}ms should defer to the window end"
            );
        }
    }

    #[test]
    fn test_mark_run_opens_new_window() {
        let mut gate = CooldownGate::new(Duration::from_millis(100)).unwrap();
        let start = Instant::now();

        gate.mark_run(start);
        let fire_time = start + Duration::from_millis(100);
        gate.mark_run(fire_time);

        // The window now counts from the trailing run.
        let decision = gate.check(fire_time + Duration::from_millis(50));
        assert_eq!(
            decision,
            GateDecision::Defer {
                deadline: fire_time + Duration::from_millis(100)
            }
        );
        assert!(gate.check(fire_time + Duration::from_millis(100)).is_run());
    }

    #[test]
    fn test_attempt_at_same_instant_defers() {
        let mut gate = CooldownGate::new(Duration::from_millis(100)).unwrap();
        let start = Instant::now();

        gate.mark_run(start);
        assert!(gate.check(start).is_defer());
    }

    #[test]
    fn test_reset_forgets_history() {
        let mut gate = CooldownGate::new(Duration::from_millis(100)).unwrap();
        let start = Instant::now();

        gate.mark_run(start);
        assert!(gate.check(start).is_defer());

        gate.reset();
        assert_eq!(gate.last_run(), None);
        assert!(gate.check(start).is_run());
    }

    #[test]
    fn test_zero_wait_rejected() {
        let result = CooldownGate::new(Duration::ZERO);
        assert_eq!(result.unwrap_err(), ThrottleError::ZeroWait);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ThrottleError::ZeroWait.to_string(),
            "cooldown wait must be greater than 0"
        );
    }

    #[test]
    fn test_accessors() {
        let mut gate = CooldownGate::new(Duration::from_millis(250)).unwrap();
        assert_eq!(gate.wait(), Duration::from_millis(250));
        assert_eq!(gate.last_run(), None);

        let now = Instant::now();
        gate.mark_run(now);
        assert_eq!(gate.last_run(), Some(now));
    }
}
