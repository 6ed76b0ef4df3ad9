//! Error types for domain configuration and evaluation.

use crate::kind::DomainKind;
use fc_core::error::FcError;
use fc_kinetics::KineticsError;
use thiserror::Error;

/// Errors raised by boundary and flow domains.
///
/// Configuration problems are reported by the setter that introduced them,
/// capability mismatches immediately, and state-not-ready errors when a derived
/// quantity is requested before `init()` or `finalize()`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Configuration error: {what}")]
    Config { what: String },

    #[error("{kind} domain does not support {what}")]
    Unsupported {
        kind: DomainKind,
        what: &'static str,
    },

    #[error("Not ready: {what}")]
    NotReady { what: &'static str },

    #[error("Topology error: {what}")]
    Topology { what: String },

    #[error(transparent)]
    Kinetics(#[from] KineticsError),

    #[error("Flow domain error: {message}")]
    Flow { message: String },

    #[error("Solution document error: {message}")]
    Document { message: String },
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub(crate) fn config(what: impl Into<String>) -> Self {
        DomainError::Config { what: what.into() }
    }
}

impl From<DomainError> for FcError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Kinetics(inner) => inner.into(),
            DomainError::Config { .. }
            | DomainError::Unsupported { .. }
            | DomainError::Document { .. } => FcError::InvalidArg {
                what: e.to_string(),
            },
            DomainError::NotReady { .. }
            | DomainError::Topology { .. }
            | DomainError::Flow { .. } => FcError::Invariant {
                what: e.to_string(),
            },
        }
    }
}
