//! Chemistry and composition errors.

use fc_core::FcError;
use thiserror::Error;

/// Result type for kinetics and composition operations.
pub type KineticsResult<T> = Result<T, KineticsError>;

/// Errors raised while resolving compositions or evaluating surface kinetics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KineticsError {
    /// A composition names a species the phase does not contain.
    #[error("Unknown species '{name}'")]
    UnknownSpecies { name: String },

    /// A composition string could not be parsed.
    #[error("Cannot parse composition '{input}': {reason}")]
    Parse { input: String, reason: &'static str },

    /// Non-physical values (negative fractions, zero sums, NaN).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// An array does not match the number of species it describes.
    #[error("Species count mismatch for {what}: expected {expected}, got {actual}")]
    SpeciesCountMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The evaluator itself failed.
    #[error("Kinetics evaluator error: {message}")]
    Backend { message: String },
}

impl From<KineticsError> for FcError {
    fn from(err: KineticsError) -> Self {
        match err {
            KineticsError::UnknownSpecies { .. }
            | KineticsError::Parse { .. }
            | KineticsError::InvalidArg { .. }
            | KineticsError::SpeciesCountMismatch { .. } => FcError::InvalidArg {
                what: err.to_string(),
            },
            KineticsError::NonPhysical { .. } | KineticsError::Backend { .. } => {
                FcError::Invariant {
                    what: err.to_string(),
                }
            }
        }
    }
}
