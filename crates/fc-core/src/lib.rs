//! fc-core: stable foundation for flamechain.
//!
//! Contains:
//! - units (uom SI temperature + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - ids (stable compact IDs for domains in a chain)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{FcError, FcResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
