//! Taskgate - precondition gating for YAML-defined tasks
//!
//! Taskgate evaluates the "when" clauses attached to task definitions,
//! deciding whether a task is eligible to run on the current host. It is
//! built to sit inside a task runner: the engine decodes a [`When`] clause
//! set from configuration, calls [`When::validate`] before executing the
//! task, and consults [`When::dependencies`] to resolve options first.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;

// Re-export commonly used types
pub use config::{parse_clause, parse_clause_file, When};
pub use error::{EvalError, GateError, Result};
pub use runner::{HostProbe, SystemProbe};

/// Current version of Taskgate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
