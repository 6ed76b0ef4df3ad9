//! fc-domains: boundary and flow domains for a one-dimensional chain.
//!
//! Provides:
//! - The `Domain` tagged variant over inlet, outlets, symmetry plane,
//!   surfaces, flow, and terminator
//! - The `FlowDomain` contract and the `EdgeCondition`s boundaries hand to it
//! - Evaluation and initialization contexts built from the chain layout
//! - Saved-state document nodes with JSON/YAML conversion
//! - `ConvectionColumn`, a reference flow domain
//!
//! Every domain writes only its own residual slice: boundaries express what
//! they impose on a flow as an `EdgeCondition` instead of writing into the
//! flow's rows.
//!
//! # Example
//!
//! ```
//! use fc_domains::{Domain, Inlet};
//!
//! let mut inlet = Domain::from(Inlet::new("fuel"));
//! inlet.set_mdot(0.5).unwrap();
//! inlet.set_mole_fractions("CH4:1").unwrap();
//! assert_eq!(inlet.nv(), 2);
//! assert_eq!(inlet.component_names(), vec!["mdot", "temperature"]);
//! ```

pub mod column;
pub mod common;
pub mod composition;
pub mod context;
pub mod domain;
pub mod edge;
pub mod error;
pub mod inlet;
pub mod kind;
pub mod outlet;
pub mod snapshot;
pub mod surface;
pub mod symmetry;
pub mod terminator;
pub mod traits;

// Re-exports
pub use column::{ConvectionColumn, MassFluxMode};
pub use common::ComponentBounds;
pub use composition::BoundaryComposition;
pub use context::{Attachment, EvalContext, Extent, FlowInfo, InitContext, Neighbor, Side};
pub use domain::Domain;
pub use edge::EdgeCondition;
pub use error::{DomainError, DomainResult};
pub use inlet::{Facing, Inlet};
pub use kind::DomainKind;
pub use outlet::{Outlet, OutletReservoir};
pub use snapshot::{DomainNode, SolutionDocument, VariableColumn};
pub use surface::{CoverageClosure, ReactingSurface, Surface};
pub use symmetry::Symmetry;
pub use terminator::Terminator;
pub use traits::FlowDomain;
