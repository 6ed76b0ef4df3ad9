//! Domain type tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag carried by every domain in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainKind {
    Inlet,
    Outlet,
    OutletReservoir,
    Symmetry,
    Surface,
    ReactingSurface,
    Flow,
    Terminator,
}

impl DomainKind {
    /// Zero- or single-point domains that close a flow domain.
    pub fn is_boundary(self) -> bool {
        !matches!(self, DomainKind::Flow | DomainKind::Terminator)
    }

    pub fn is_flow(self) -> bool {
        self == DomainKind::Flow
    }

    /// Whether this variant carries a boundary composition.
    pub fn has_composition(self) -> bool {
        matches!(self, DomainKind::Inlet | DomainKind::OutletReservoir)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DomainKind::Inlet => "inlet",
            DomainKind::Outlet => "outlet",
            DomainKind::OutletReservoir => "outlet-reservoir",
            DomainKind::Symmetry => "symmetry",
            DomainKind::Surface => "surface",
            DomainKind::ReactingSurface => "reacting-surface",
            DomainKind::Flow => "flow",
            DomainKind::Terminator => "terminator",
        }
    }
}

impl fmt::Display for DomainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
