//! Chain topology checks.

use fc_core::DomainId;
use fc_domains::DomainKind;

use crate::error::{ChainError, ChainResult};

fn id(slot: usize) -> DomainId {
    DomainId::from_index(slot as u32)
}

/// Whether a boundary of this kind needs a flow domain next to it.
fn requires_flow(kind: DomainKind) -> bool {
    matches!(
        kind,
        DomainKind::Inlet | DomainKind::Outlet | DomainKind::OutletReservoir | DomainKind::Symmetry
    )
}

/// Validate the ordered kinds of a chain.
///
/// - every flow has a boundary on both sides
/// - no boundary has flows on both sides
/// - inlets, outlets, and symmetry planes adjoin a flow
/// - no boundary adjoins another boundary
pub(crate) fn validate_topology(kinds: &[DomainKind]) -> ChainResult<()> {
    if kinds.is_empty() {
        return Err(ChainError::Empty);
    }

    for (slot, &kind) in kinds.iter().enumerate() {
        let left = slot.checked_sub(1).map(|s| kinds[s]);
        let right = kinds.get(slot + 1).copied();

        if kind.is_flow() {
            // a flow-flow pair is reported once, from its left member
            if right == Some(DomainKind::Flow) {
                return Err(ChainError::AdjacentFlows {
                    left: id(slot),
                    right: id(slot + 1),
                });
            }
            for (neighbor, side) in [(left, "left"), (right, "right")] {
                if !neighbor.is_some_and(DomainKind::is_boundary) {
                    return Err(ChainError::OpenFlow {
                        flow: id(slot),
                        side,
                    });
                }
            }
            continue;
        }

        if !kind.is_boundary() {
            continue;
        }
        let left_flow = left.is_some_and(DomainKind::is_flow);
        let right_flow = right.is_some_and(DomainKind::is_flow);
        if left_flow && right_flow {
            return Err(ChainError::SharedBoundary { id: id(slot) });
        }
        if requires_flow(kind) && !left_flow && !right_flow {
            return Err(ChainError::MissingFlow { id: id(slot), kind });
        }
        if right.is_some_and(DomainKind::is_boundary) {
            return Err(ChainError::AdjacentBoundaries {
                left: id(slot),
                right: id(slot + 1),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use DomainKind::*;

    #[test]
    fn accepts_common_chains() {
        assert!(validate_topology(&[Inlet, Flow, Outlet]).is_ok());
        assert!(validate_topology(&[Inlet, Flow, Inlet]).is_ok());
        assert!(validate_topology(&[Symmetry, Flow, ReactingSurface]).is_ok());
        assert!(
            validate_topology(&[Inlet, Flow, Surface, Terminator, Surface, Flow, Outlet]).is_ok()
        );
        assert!(validate_topology(&[ReactingSurface]).is_ok());
        assert!(validate_topology(&[Terminator, Inlet, Flow, Outlet, Terminator]).is_ok());
    }

    #[test]
    fn rejects_empty_chain() {
        assert_eq!(validate_topology(&[]), Err(ChainError::Empty));
    }

    #[test]
    fn rejects_open_flow() {
        assert!(matches!(
            validate_topology(&[Flow, Outlet]),
            Err(ChainError::OpenFlow { side: "left", .. })
        ));
        assert!(matches!(
            validate_topology(&[Inlet, Flow, Terminator]),
            Err(ChainError::OpenFlow { side: "right", .. })
        ));
    }

    #[test]
    fn rejects_adjacent_flows() {
        assert_eq!(
            validate_topology(&[Inlet, Flow, Flow, Outlet]),
            Err(ChainError::AdjacentFlows {
                left: id(1),
                right: id(2)
            })
        );
    }

    #[test]
    fn rejects_shared_boundary() {
        assert_eq!(
            validate_topology(&[Inlet, Flow, Symmetry, Flow, Outlet]),
            Err(ChainError::SharedBoundary { id: id(2) })
        );
    }

    #[test]
    fn rejects_adjacent_boundaries() {
        assert_eq!(
            validate_topology(&[Inlet, Flow, Surface, Surface, Flow, Outlet]),
            Err(ChainError::AdjacentBoundaries {
                left: id(2),
                right: id(3)
            })
        );
        assert_eq!(
            validate_topology(&[Inlet, Flow, Outlet, Surface]),
            Err(ChainError::AdjacentBoundaries {
                left: id(2),
                right: id(3)
            })
        );
        assert_eq!(
            validate_topology(&[Symmetry, Flow, Surface, Surface]),
            Err(ChainError::AdjacentBoundaries {
                left: id(2),
                right: id(3)
            })
        );
        assert_eq!(
            validate_topology(&[ReactingSurface, Surface]),
            Err(ChainError::AdjacentBoundaries {
                left: id(0),
                right: id(1)
            })
        );
    }

    #[test]
    fn rejects_lonely_inlet() {
        assert_eq!(
            validate_topology(&[Inlet]),
            Err(ChainError::MissingFlow {
                id: id(0),
                kind: Inlet
            })
        );
    }
}
