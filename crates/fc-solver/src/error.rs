//! Error types for solver operations.

use fc_chain::ChainError;
use fc_core::error::FcError;
use thiserror::Error;

/// Errors that can occur while driving a chain to a solution.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error("Numeric error: {what}")]
    Numeric { what: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    /// Failures a smaller pseudo-time step may cure.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SolverError::ConvergenceFailed { .. } | SolverError::Numeric { .. }
        )
    }
}

impl From<SolverError> for FcError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::Chain(inner) => inner.into(),
            SolverError::InvalidArg { what } => FcError::InvalidArg { what },
            SolverError::ConvergenceFailed { .. } | SolverError::Numeric { .. } => {
                FcError::Invariant {
                    what: e.to_string(),
                }
            }
        }
    }
}
