//! Error types for efficiency estimation.
//!
//! Three failure classes, none of which is recovered inside this crate:
//! - input validation: the caller asked for something outside the model
//!   (`N < 1`, `k > N`, a confidence level outside `(0,1)`)
//! - convergence: a root search ran out of iterations or could not bracket
//! - domain: a probability or bound fell outside `[0,1]`, or bounds were inverted

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for efficiency computations.
pub type Result<T> = std::result::Result<T, EfficiencyError>;

/// Stable, machine-readable classification of an [`EfficiencyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InputValidation,
    Convergence,
    Domain,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InputValidation => write!(f, "input_validation"),
            ErrorKind::Convergence => write!(f, "convergence"),
            ErrorKind::Domain => write!(f, "domain"),
        }
    }
}

/// Errors raised by the posterior model, the interval solver and the
/// mass evaluator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EfficiencyError {
    #[error("invalid input: {message}")]
    InputValidation { message: String },

    #[error("root search did not converge after {iterations} iterations (bracket width {width:e})")]
    Convergence { iterations: usize, width: f64 },

    #[error("domain error: {message}")]
    Domain { message: String },
}

impl EfficiencyError {
    pub fn input(message: impl Into<String>) -> Self {
        EfficiencyError::InputValidation {
            message: message.into(),
        }
    }

    pub fn domain(message: impl Into<String>) -> Self {
        EfficiencyError::Domain {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EfficiencyError::InputValidation { .. } => ErrorKind::InputValidation,
            EfficiencyError::Convergence { .. } => ErrorKind::Convergence,
            EfficiencyError::Domain { .. } => ErrorKind::Domain,
        }
    }
}
