//! Observability metrics for throttling.
//!
//! Provides metrics about throttling behavior for monitoring and debugging.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics tracking throttling statistics.
///
/// All metrics use atomic operations for thread-safe updates and reads.
/// Metrics are collected throughout the life of a throttled wrapper and can
/// be queried at any time for observability.
#[derive(Debug, Clone)]
pub struct ThrottleMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    /// Total number of leading-edge executions
    leading_runs: AtomicU64,
    /// Total number of trailing-edge executions
    trailing_runs: AtomicU64,
    /// Total number of calls absorbed into a cooldown window
    deferred_calls: AtomicU64,
}

impl ThrottleMetrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                leading_runs: AtomicU64::new(0),
                trailing_runs: AtomicU64::new(0),
                deferred_calls: AtomicU64::new(0),
            }),
        }
    }

    /// Record a leading-edge execution.
    pub(crate) fn record_leading(&self) {
        self.inner.leading_runs.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a trailing-edge execution.
    pub(crate) fn record_trailing(&self) {
        self.inner.trailing_runs.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a call absorbed into the current cooldown window.
    pub(crate) fn record_deferred(&self) {
        self.inner.deferred_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the total number of leading-edge executions.
    pub fn leading_runs(&self) -> u64 {
        self.inner.leading_runs.load(Ordering::Relaxed)
    }

    /// Get the total number of trailing-edge executions.
    pub fn trailing_runs(&self) -> u64 {
        self.inner.trailing_runs.load(Ordering::Relaxed)
    }

    /// Get the total number of calls absorbed into a cooldown window.
    pub fn deferred_calls(&self) -> u64 {
        self.inner.deferred_calls.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> ThrottleMetricsSnapshot {
        ThrottleMetricsSnapshot {
            leading_runs: self.leading_runs(),
            trailing_runs: self.trailing_runs(),
            deferred_calls: self.deferred_calls(),
        }
    }

    /// Reset all metrics to zero.
    ///
    /// Useful for testing or when starting a new monitoring period.
    pub fn reset(&self) {
        self.inner.leading_runs.store(0, Ordering::Relaxed);
        self.inner.trailing_runs.store(0, Ordering::Relaxed);
        self.inner.deferred_calls.store(0, Ordering::Relaxed);
    }
}

impl Default for ThrottleMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of throttling metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleMetricsSnapshot {
    /// Total number of leading-edge executions
    pub leading_runs: u64,
    /// Total number of trailing-edge executions
    pub trailing_runs: u64,
    /// Total number of calls absorbed into a cooldown window
    pub deferred_calls: u64,
}

impl ThrottleMetricsSnapshot {
    /// Get the total number of actual executions (leading + trailing).
    pub fn total_runs(&self) -> u64 {
        self.leading_runs.saturating_add(self.trailing_runs)
    }

    /// Get the total number of calls observed (leading + deferred).
    ///
    /// Trailing runs are not counted here: they are executions the scheduler
    /// performs on behalf of an already-counted deferred call.
    pub fn total_calls(&self) -> u64 {
        self.leading_runs.saturating_add(self.deferred_calls)
    }

    /// Calculate the collapse rate (0.0 to 1.0).
    ///
    /// The ratio of deferred calls that never became a trailing run, because
    /// a later call in the same window overwrote their arguments. Returns 0.0
    /// if no calls were deferred.
    pub fn collapse_rate(&self) -> f64 {
        if self.deferred_calls == 0 {
            0.0
        } else {
            let collapsed = self.deferred_calls.saturating_sub(self.trailing_runs);
            collapsed as f64 / self.deferred_calls as f64
        }
    }
}
