//! Chain-specific error types.

use fc_core::{DomainId, FcError};
use fc_domains::{DomainError, DomainKind};

pub type ChainResult<T> = Result<T, ChainError>;

/// Chain construction, topology, and dispatch errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainError {
    /// A domain reported an error during init, evaluation, or finalize.
    Domain(DomainError),

    /// The chain holds no domains.
    Empty,

    /// Two flow domains sit next to each other with no boundary between them.
    AdjacentFlows { left: DomainId, right: DomainId },

    /// A flow domain has a missing or non-boundary neighbour.
    OpenFlow { flow: DomainId, side: &'static str },

    /// A boundary that needs a flow has none next to it.
    MissingFlow { id: DomainId, kind: DomainKind },

    /// A boundary has flow domains on both sides.
    SharedBoundary { id: DomainId },

    /// Two boundary domains sit next to each other.
    AdjacentBoundaries { left: DomainId, right: DomainId },

    /// Domain ID not present in the chain.
    UnknownDomain { id: DomainId },

    /// The chain changed since the last `init()`.
    NotInitialized,

    /// A caller-supplied vector has the wrong length.
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl std::fmt::Display for ChainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChainError::Domain(err) => write!(f, "{err}"),
            ChainError::Empty => write!(f, "Chain has no domains"),
            ChainError::AdjacentFlows { left, right } => {
                write!(
                    f,
                    "Flow domains {} and {} are adjacent with no boundary between them",
                    left, right
                )
            }
            ChainError::OpenFlow { flow, side } => {
                write!(f, "Flow domain {} needs a boundary on its {} side", flow, side)
            }
            ChainError::MissingFlow { id, kind } => {
                write!(f, "{} domain {} has no adjoining flow domain", kind, id)
            }
            ChainError::SharedBoundary { id } => {
                write!(f, "Boundary {} has flow domains on both sides", id)
            }
            ChainError::AdjacentBoundaries { left, right } => {
                write!(f, "Boundaries {} and {} are connected to each other", left, right)
            }
            ChainError::UnknownDomain { id } => write!(f, "Domain {} not in chain", id),
            ChainError::NotInitialized => {
                write!(f, "Chain changed since the last init(); call init() again")
            }
            ChainError::LengthMismatch {
                what,
                expected,
                actual,
            } => {
                write!(f, "{} has length {} (expected {})", what, actual, expected)
            }
        }
    }
}

impl std::error::Error for ChainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChainError::Domain(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DomainError> for ChainError {
    fn from(err: DomainError) -> Self {
        ChainError::Domain(err)
    }
}

impl From<ChainError> for FcError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::Domain(inner) => inner.into(),
            ChainError::LengthMismatch {
                what,
                expected,
                actual,
            } => FcError::IndexOob {
                what,
                index: actual,
                len: expected,
            },
            other => FcError::Invariant {
                what: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc_core::Id;

    #[test]
    fn domain_errors_keep_their_source() {
        let err = ChainError::from(DomainError::NotReady { what: "inlet" });
        assert!(std::error::Error::source(&err).is_some());
        assert!(matches!(FcError::from(err), FcError::Invariant { .. }));
    }

    #[test]
    fn topology_messages_name_the_domains() {
        let err = ChainError::AdjacentFlows {
            left: Id::from_index(1),
            right: Id::from_index(2),
        };
        assert_eq!(
            err.to_string(),
            "Flow domains 1 and 2 are adjacent with no boundary between them"
        );
    }
}
