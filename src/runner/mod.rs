//! Clause evaluation engine
//!
//! This module holds the host probes and the evaluation logic that decides
//! whether a task's when conditions hold.

pub mod probe;
pub mod when;

// Re-export main types
pub use probe::*;
pub use when::*;
