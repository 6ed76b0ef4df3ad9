//! Layout extents and the views a domain receives at `init()` and `eval()`.
//!
//! A domain never holds references to its neighbours. The chain hands it an
//! [`InitContext`] describing what sits on either side, and an [`EvalContext`]
//! carrying the full trial vector together with the extents needed to locate
//! the neighbours' edge points:
//!
//! ```text
//! left neighbour's last point   starts at  own.offset - left.nv
//! right neighbour's first point starts at  own.offset + own.nv * own.np
//! ```

use crate::edge::EdgeCondition;
use crate::error::{DomainError, DomainResult};
use crate::kind::DomainKind;
use crate::traits::FlowDomain;
use fc_core::DomainId;
use fc_kinetics::SpeciesSet;
use std::ops::Range;

/// Placement of one domain in the global unknown vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extent {
    /// Index of the domain's first unknown.
    pub offset: usize,
    /// Variables per grid point.
    pub nv: usize,
    /// Grid points.
    pub np: usize,
    /// Global index of the domain's first grid point.
    pub first_point: usize,
}

impl Extent {
    pub fn len(&self) -> usize {
        self.nv * self.np
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One past the last unknown owned by the domain.
    pub fn end(&self) -> usize {
        self.offset + self.len()
    }

    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    /// Global index of local variable `var` at local point `point`.
    pub fn index(&self, point: usize, var: usize) -> usize {
        self.offset + point * self.nv + var
    }

    /// Global index of the last grid point (the first one for `np == 0`).
    pub fn last_point(&self) -> usize {
        self.first_point + self.np.saturating_sub(1)
    }
}

/// Which side of a domain something sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// What a boundary needs to know about its attached flow.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowInfo {
    pub nv: usize,
    pub np: usize,
    pub species: SpeciesSet,
    pub mass_flux: usize,
    pub temperature: usize,
    /// Component index of the first species.
    pub first_species: usize,
    pub fixed_mass_flux: bool,
}

impl FlowInfo {
    pub fn of(flow: &dyn FlowDomain) -> Self {
        Self {
            nv: flow.nv(),
            np: flow.np(),
            species: flow.species().clone(),
            mass_flux: flow.mass_flux_component(),
            temperature: flow.temperature_component(),
            first_species: flow.species_component(0),
            fixed_mass_flux: flow.fixed_mass_flux(),
        }
    }

    pub fn n_species(&self) -> usize {
        self.species.len()
    }
}

/// A neighbour as seen during `init()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub id: DomainId,
    pub kind: DomainKind,
    /// Present when the neighbour is a flow domain.
    pub flow: Option<FlowInfo>,
}

/// Topology handed to a domain during `init()`.
#[derive(Debug, Clone, PartialEq)]
pub struct InitContext {
    pub id: DomainId,
    pub left: Option<Neighbor>,
    pub right: Option<Neighbor>,
}

impl InitContext {
    pub fn isolated(id: DomainId) -> Self {
        Self {
            id,
            left: None,
            right: None,
        }
    }

    /// The single adjoining flow, if any.
    ///
    /// Errors when flows sit on both sides: a boundary attaches to at most one.
    pub fn attached_flow(&self) -> DomainResult<Option<Attachment>> {
        let left = self.left.as_ref().and_then(|n| n.flow.as_ref());
        let right = self.right.as_ref().and_then(|n| n.flow.as_ref());
        match (left, right) {
            (Some(_), Some(_)) => Err(DomainError::Topology {
                what: format!("domain {} has flow domains on both sides", self.id),
            }),
            (Some(info), None) => Ok(Some(Attachment {
                side: Side::Left,
                flow: info.clone(),
            })),
            (None, Some(info)) => Ok(Some(Attachment {
                side: Side::Right,
                flow: info.clone(),
            })),
            (None, None) => Ok(None),
        }
    }
}

/// A boundary's attached flow and the side it sits on.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub side: Side,
    pub flow: FlowInfo,
}

impl Attachment {
    /// Direction a boundary on the far side of the flow injects into it:
    /// `+1` when the flow lies to the right, `-1` when it lies to the left.
    pub fn direction(&self) -> f64 {
        match self.side {
            Side::Right => 1.0,
            Side::Left => -1.0,
        }
    }
}

/// Everything a domain reads during one residual evaluation.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    /// Full trial vector.
    pub x: &'a [f64],
    pub own: Extent,
    pub left: Option<Extent>,
    pub right: Option<Extent>,
    /// Edge conditions produced by the neighbouring boundaries (flows only).
    pub left_edge: Option<&'a EdgeCondition>,
    pub right_edge: Option<&'a EdgeCondition>,
    /// Reciprocal pseudo-time step; `0.0` for the steady residual.
    pub rdt: f64,
    /// Solution at the previous pseudo-time level, full length.
    pub previous: Option<&'a [f64]>,
    /// Perturbed global grid point during Jacobian evaluation.
    pub point: Option<usize>,
}

impl<'a> EvalContext<'a> {
    pub fn new(x: &'a [f64], own: Extent) -> Self {
        Self {
            x,
            own,
            left: None,
            right: None,
            left_edge: None,
            right_edge: None,
            rdt: 0.0,
            previous: None,
            point: None,
        }
    }

    pub fn with_neighbors(mut self, left: Option<Extent>, right: Option<Extent>) -> Self {
        self.left = left;
        self.right = right;
        self
    }

    pub fn with_edges(
        mut self,
        left: Option<&'a EdgeCondition>,
        right: Option<&'a EdgeCondition>,
    ) -> Self {
        self.left_edge = left;
        self.right_edge = right;
        self
    }

    pub fn with_transient(mut self, rdt: f64, previous: Option<&'a [f64]>) -> Self {
        self.rdt = rdt;
        self.previous = previous;
        self
    }

    pub fn with_point(mut self, point: Option<usize>) -> Self {
        self.point = point;
        self
    }

    /// This domain's slice of the trial vector.
    pub fn own_values(&self) -> DomainResult<&'a [f64]> {
        self.x.get(self.own.range()).ok_or(DomainError::NotReady {
            what: "trial vector shorter than layout",
        })
    }

    /// This domain's slice of the previous solution when `rdt != 0`.
    ///
    /// Returns `None` for the steady residual.
    pub fn previous_values(&self) -> DomainResult<Option<&'a [f64]>> {
        if self.rdt == 0.0 {
            return Ok(None);
        }
        let prev = self.previous.ok_or(DomainError::NotReady {
            what: "previous solution for pseudo-time residual",
        })?;
        prev.get(self.own.range())
            .map(Some)
            .ok_or(DomainError::NotReady {
                what: "previous solution shorter than layout",
            })
    }

    /// Values of a neighbour's grid point, counted inward from the shared edge.
    ///
    /// `depth == 0` is the neighbour's edge point; `depth == 1` is the first
    /// point behind it.
    pub fn neighbor_point(&self, side: Side, depth: usize) -> DomainResult<&'a [f64]> {
        let missing = || DomainError::Topology {
            what: format!("no {side:?} neighbour point {depth} at offset {}", self.own.offset),
        };
        let (start, nv) = match side {
            Side::Left => {
                let ext = self.left.ok_or_else(missing)?;
                if depth >= ext.np {
                    return Err(missing());
                }
                let start = self
                    .own
                    .offset
                    .checked_sub((depth + 1) * ext.nv)
                    .ok_or_else(missing)?;
                (start, ext.nv)
            }
            Side::Right => {
                let ext = self.right.ok_or_else(missing)?;
                if depth >= ext.np {
                    return Err(missing());
                }
                (self.own.end() + depth * ext.nv, ext.nv)
            }
        };
        self.x.get(start..start + nv).ok_or_else(missing)
    }

    /// Neighbour's edge point values.
    pub fn neighbor_edge(&self, side: Side) -> DomainResult<&'a [f64]> {
        self.neighbor_point(side, 0)
    }

    /// Whether a boundary can skip evaluation for the perturbed point.
    ///
    /// Points more than two away cannot change a boundary's residual.
    pub fn skip(&self) -> bool {
        match self.point {
            Some(p) => p + 2 < self.own.first_point || p > self.own.last_point() + 2,
            None => false,
        }
    }

    pub fn edge(&self, side: Side) -> Option<&'a EdgeCondition> {
        match side {
            Side::Left => self.left_edge,
            Side::Right => self.right_edge,
        }
    }
}
