//! fc-kinetics: species, compositions, and surface-kinetics contracts.
//!
//! Provides:
//! - Built-in gas species definitions (H2, O2, CH4, N2, etc.)
//! - Ordered species sets with molecular weights
//! - Composition strings (`"CH4:1, O2:2"`) and mole/mass fraction conversion
//! - The `SurfaceKinetics` trait consumed by reacting-surface boundaries
//! - A first-order site-exchange mechanism implementing that trait
//!
//! # Example
//!
//! ```
//! use fc_kinetics::{CompositionSpec, Species, SpeciesSet};
//!
//! let gas = SpeciesSet::from_species(&[Species::CH4, Species::O2, Species::N2]);
//! let spec: CompositionSpec = "CH4:1, O2:2, N2:7.52".parse().unwrap();
//! let y = spec.resolve_mass_fractions(&gas).unwrap();
//! assert!((y.iter().sum::<f64>() - 1.0).abs() < 1e-12);
//! ```

pub mod composition;
pub mod error;
pub mod species;
pub mod surface;
pub mod surrogate;

// Re-exports for ergonomics
pub use composition::{
    Basis, CompositionSpec, check_mass_fractions, mass_to_mole_fractions,
    mole_to_mass_fractions, normalize_fractions,
};
pub use error::{KineticsError, KineticsResult};
pub use species::{Species, SpeciesSet};
pub use surface::{GasState, ProductionRates, SurfaceKinetics};
pub use surrogate::{Adsorption, Arrhenius, SiteExchange, SiteExchangeMechanism};
