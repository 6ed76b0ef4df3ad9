//! Contract for multi-point flow domains.

use crate::common::ComponentBounds;
use crate::context::EvalContext;
use crate::error::DomainResult;
use fc_kinetics::SpeciesSet;

/// Trait for the multi-point domain holding the reacting gas column.
///
/// Boundaries read a flow's species, component layout, and edge values; the
/// flow in turn reads the [`EdgeCondition`](crate::EdgeCondition)s its
/// boundaries produce from `ctx.left_edge` / `ctx.right_edge`.
///
/// Implementations must be thread-safe (Send + Sync) so residual assembly can
/// run across domains in parallel.
pub trait FlowDomain: Send + Sync {
    /// Flow name for debugging and identification.
    fn name(&self) -> &str;

    /// Variables per grid point.
    fn nv(&self) -> usize;

    /// Number of grid points.
    fn np(&self) -> usize;

    /// Gas-phase species carried by the flow.
    fn species(&self) -> &SpeciesSet;

    fn n_species(&self) -> usize {
        self.species().len()
    }

    /// Name of component `n`.
    fn component_name(&self, n: usize) -> Option<String>;

    /// Component index of the axial mass flux.
    fn mass_flux_component(&self) -> usize;

    /// Component index of the temperature.
    fn temperature_component(&self) -> usize;

    /// Component index of species `k`.
    fn species_component(&self, k: usize) -> usize;

    /// Whether the mass flux is imposed by an inlet. Freely propagating
    /// flames return `false` and determine it themselves.
    fn fixed_mass_flux(&self) -> bool;

    /// Write the flow's residual into `r`, which covers exactly its own slice.
    fn eval(&self, ctx: &EvalContext<'_>, r: &mut [f64]) -> DomainResult<()>;

    /// Starting guess for the flow's slice.
    fn initial_solution(&self, x: &mut [f64]);

    fn bounds(&self, component: usize) -> ComponentBounds;

    /// Whether row (`component`, `point`) carries a time derivative.
    fn is_differential(&self, component: usize, point: usize) -> bool;

    /// Called once the driver accepts a solution.
    fn finalize(&mut self, _x: &[f64]) -> DomainResult<()> {
        Ok(())
    }

    /// Log the flow's state at its edges.
    fn show_solution(&self, _x: &[f64]) {}
}
