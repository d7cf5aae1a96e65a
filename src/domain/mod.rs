//! Domain layer - pure business logic with no external dependencies.
//!
//! This layer contains the core concepts and invariants of the toolkit:
//! - Cooldown window decisions for call throttling
//! - Key ordering and stable key-based sorting
//! - Order-preserving sequence combinators
//!
//! All types in this layer are pure and easily testable.

pub mod cooldown;
pub mod ordering;
pub mod sequence;
pub mod sort;
