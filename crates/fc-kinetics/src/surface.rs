//! Surface-kinetics evaluator contract.

use crate::error::KineticsResult;
use crate::species::SpeciesSet;

/// Net production rates returned by a surface-kinetics evaluator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductionRates {
    /// Net production rate of each surface species, ordered like
    /// [`SurfaceKinetics::surface_species`].
    pub surface: Vec<f64>,
    /// Net production rate of each gas species [kmol/m²/s], ordered like the
    /// adjoining gas phase. Empty when the mechanism exchanges nothing with the gas.
    pub gas: Vec<f64>,
}

/// State of the gas adjoining a surface at evaluation time.
#[derive(Debug, Clone, Copy)]
pub struct GasState<'a> {
    pub temperature: f64,
    pub mass_fractions: &'a [f64],
}

/// Trait for external surface-kinetics evaluators.
///
/// An evaluator manages one or more phases; exactly one of them is the surface
/// phase whose coverages are solved for. Implementations must be thread-safe
/// (Send + Sync) so residual assembly can run across domains in parallel.
pub trait SurfaceKinetics: Send + Sync {
    /// Evaluator name (for debugging/logging).
    fn name(&self) -> &str;

    /// Number of phases managed by the evaluator.
    fn n_phases(&self) -> usize;

    /// Index of the surface phase among [`SurfaceKinetics::n_phases`].
    fn surface_phase_index(&self) -> usize;

    /// Species of the surface phase.
    fn surface_species(&self) -> &SpeciesSet;

    /// Number of surface-phase species.
    fn n_surface_species(&self) -> usize {
        self.surface_species().len()
    }

    /// Coverages used as the starting guess before any solution exists.
    fn initial_coverages(&self) -> Vec<f64>;

    /// Net production rates at the given temperature [K] and coverages.
    ///
    /// `gas` is `None` when the surface has no attached flow.
    fn production_rates(
        &self,
        temperature: f64,
        coverages: &[f64],
        gas: Option<GasState<'_>>,
    ) -> KineticsResult<ProductionRates>;
}
