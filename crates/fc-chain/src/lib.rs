//! fc-chain: ordered one-dimensional domain chains.
//!
//! Provides:
//! - `ChainBuilder` to assemble boundaries and flow domains left to right
//! - Topology checks (every flow closed by boundaries on both sides)
//! - `Layout` of every domain in the global unknown vector
//! - `Chain` for init, serial and parallel residual assembly, and the
//!   finalize/save/restore hand-off of converged solutions
//!
//! # Example
//!
//! ```
//! use fc_chain::{ChainBuilder, EvalRequest};
//! use fc_core::units::m;
//! use fc_domains::{ConvectionColumn, Inlet, Outlet};
//! use fc_kinetics::{Species, SpeciesSet};
//!
//! let gas = SpeciesSet::from_species(&[Species::CH4, Species::N2]);
//! let mut builder = ChainBuilder::new();
//! let fuel = builder.push(Inlet::new("fuel"));
//! builder.push_flow(ConvectionColumn::new("flame", gas, 8, m(0.01)).unwrap());
//! builder.push(Outlet::new("exit"));
//!
//! let mut chain = builder.build().unwrap();
//! chain.domain_mut(fuel).unwrap().set_mole_fractions("CH4:1").unwrap();
//! chain.init().unwrap();
//!
//! let x = chain.initial_solution().unwrap();
//! let r = chain.residual(&x, EvalRequest::steady()).unwrap();
//! assert_eq!(r.len(), chain.size());
//! ```

pub mod builder;
pub mod chain;
pub mod error;
pub mod layout;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::ChainBuilder;
pub use chain::{Chain, EvalRequest};
pub use error::{ChainError, ChainResult};
pub use layout::Layout;
