//! Error types for Taskgate

use std::io;
use thiserror::Error;

/// Result type alias for Taskgate operations
pub type Result<T> = std::result::Result<T, GateError>;

/// Main error type for Taskgate
#[derive(Error, Debug)]
pub enum GateError {
    /// Clause decoding errors
    #[error("Invalid when clause: {0}")]
    Decode(#[from] serde_yaml::Error),

    /// Clause evaluation errors
    #[error(transparent)]
    Eval(#[from] EvalError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Outcome of evaluating a clause category (or a whole clause set)
///
/// `Unspecified` and `ConditionFailed` drive the orchestration logic and are
/// not hard errors: the former marks a category that was never configured,
/// the latter a category that was configured but did not hold. `Probe` wraps
/// genuine host failures and always halts evaluation.
#[derive(Error, Debug)]
pub enum EvalError {
    /// Category absent from configuration; never surfaced as a failure reason
    #[error("clause \"{0}\" is not specified")]
    Unspecified(&'static str),

    /// Category present but unsatisfied at evaluation time
    #[error("Failed condition: {0}")]
    ConditionFailed(String),

    /// Host probe failure unrelated to whether the condition holds
    #[error(transparent)]
    Probe(#[from] io::Error),
}

impl EvalError {
    /// Build a failed-condition outcome from a message
    pub fn cond_fail(message: impl Into<String>) -> Self {
        EvalError::ConditionFailed(message.into())
    }

    /// Whether this outcome means the category was never configured
    pub fn is_unspecified(&self) -> bool {
        matches!(self, EvalError::Unspecified(_))
    }

    /// Whether this outcome represents a failed condition
    /// (which should be treated as a skip, not a hard error)
    pub fn is_failed_condition(&self) -> bool {
        matches!(self, EvalError::ConditionFailed(_))
    }
}

/// Specialized result type for clause evaluation
pub type EvalResult<T> = std::result::Result<T, EvalError>;
