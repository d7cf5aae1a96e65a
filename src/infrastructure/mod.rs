//! Infrastructure layer - external adapters and integrations.
//!
//! This layer provides adapters for:
//! - Clock abstraction (system time vs virtual)
//! - Scheduling (worker-thread timers)
//!
//! The `mocks` module ships unconditionally so downstream crates can drive
//! throttled code deterministically from their own tests.

pub mod clock;
pub mod mocks;
pub mod scheduler;
