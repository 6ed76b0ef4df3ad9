//! Wall boundaries: an inert surface and a reacting surface.

use crate::common::{ComponentBounds, argmax, check_temperature};
use crate::context::{Attachment, EvalContext, InitContext};
use crate::edge::EdgeCondition;
use crate::error::{DomainError, DomainResult};
use fc_core::numeric::{Tolerances, nearly_equal};
use fc_kinetics::{GasState, KineticsError, ProductionRates, SurfaceKinetics};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How far finalized coverages may drift from a unit sum before a warning.
const COVERAGE_SUM_TOL: Tolerances = Tolerances {
    abs: 1e-6,
    rel: 0.0,
};

fn coverages_sum_to_one(coverages: &[f64]) -> bool {
    nearly_equal(coverages.iter().sum(), 1.0, COVERAGE_SUM_TOL)
}

/// Non-reacting surface: one unknown, temperature, with `r = x_T - T_wall`.
///
/// No-slip and impermeability are applied by the flow from
/// [`EdgeCondition::Wall`].
#[derive(Debug, Clone)]
pub struct Surface {
    name: String,
    temperature: f64,
    attached: Option<Attachment>,
}

impl Surface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            temperature: 300.0,
            attached: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn set_temperature(&mut self, t: f64) -> DomainResult<()> {
        self.temperature = check_temperature(t)?;
        Ok(())
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attached.as_ref()
    }

    pub fn init(&mut self, ctx: &InitContext) -> DomainResult<()> {
        self.attached = ctx.attached_flow()?;
        Ok(())
    }

    pub fn eval(&self, ctx: &EvalContext<'_>, r: &mut [f64]) -> DomainResult<()> {
        if ctx.skip() {
            return Ok(());
        }
        let x = ctx.own_values()?;
        r[0] = x[0] - self.temperature;
        Ok(())
    }

    pub fn edge_condition(&self, ctx: &EvalContext<'_>) -> DomainResult<EdgeCondition> {
        let x = ctx.own_values()?;
        Ok(EdgeCondition::Wall {
            temperature: x[0],
            species_flux: Vec::new(),
        })
    }

    pub fn show_solution(&self, x: &[f64]) {
        info!(surface = %self.name, temperature = x[0], "surface state");
    }
}

/// How the coverage rows of a reacting surface are closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoverageClosure {
    /// Every coverage row is its species' net production rate. The evaluator
    /// is trusted to conserve sites; drift is the caller's responsibility.
    #[default]
    Trusted,
    /// The row of the species with the largest finalized coverage is replaced
    /// by `1 - Σθ`.
    SiteBalance,
}

/// Reacting surface: temperature plus one coverage per surface species.
///
/// With coverage equations enabled, row `1 + k` is the net production rate of
/// surface species `k` at the trial coverages and temperature, damped by
/// `rdt * (θ_k - θ_k,prev)` during pseudo-time stepping. Disabled, it holds
/// the coverages from the last `finalize()`: `r = θ_k - θ_k,fixed`.
#[derive(Clone)]
pub struct ReactingSurface {
    name: String,
    temperature: f64,
    kinetics: Option<Arc<dyn SurfaceKinetics>>,
    enabled: bool,
    closure: CoverageClosure,
    fixed_coverages: Vec<f64>,
    attached: Option<Attachment>,
}

impl fmt::Debug for ReactingSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactingSurface")
            .field("name", &self.name)
            .field("temperature", &self.temperature)
            .field("kinetics", &self.kinetics.as_ref().map(|k| k.name().to_string()))
            .field("enabled", &self.enabled)
            .field("closure", &self.closure)
            .field("fixed_coverages", &self.fixed_coverages)
            .finish()
    }
}

impl ReactingSurface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            temperature: 300.0,
            kinetics: None,
            enabled: true,
            closure: CoverageClosure::default(),
            fixed_coverages: Vec::new(),
            attached: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn set_temperature(&mut self, t: f64) -> DomainResult<()> {
        self.temperature = check_temperature(t)?;
        Ok(())
    }

    /// Attach a surface-kinetics evaluator.
    ///
    /// Coverages set earlier must match its surface species count; without
    /// them the evaluator's initial coverages are used.
    pub fn set_kinetics(&mut self, kinetics: Arc<dyn SurfaceKinetics>) -> DomainResult<()> {
        if kinetics.surface_phase_index() >= kinetics.n_phases() {
            return Err(DomainError::config(format!(
                "surface phase index {} out of range for {} phases",
                kinetics.surface_phase_index(),
                kinetics.n_phases()
            )));
        }
        let n = kinetics.n_surface_species();
        if self.fixed_coverages.is_empty() {
            let initial = kinetics.initial_coverages();
            if initial.len() != n {
                return Err(KineticsError::SpeciesCountMismatch {
                    what: "initial coverages",
                    expected: n,
                    actual: initial.len(),
                }
                .into());
            }
            self.fixed_coverages = initial;
        } else if self.fixed_coverages.len() != n {
            return Err(KineticsError::SpeciesCountMismatch {
                what: "stored coverages",
                expected: n,
                actual: self.fixed_coverages.len(),
            }
            .into());
        }
        debug!(surface = %self.name, kinetics = kinetics.name(), n_species = n, "kinetics attached");
        self.kinetics = Some(kinetics);
        Ok(())
    }

    pub fn kinetics(&self) -> Option<&Arc<dyn SurfaceKinetics>> {
        self.kinetics.as_ref()
    }

    pub fn n_surface_species(&self) -> usize {
        self.kinetics
            .as_ref()
            .map_or(self.fixed_coverages.len(), |k| k.n_surface_species())
    }

    /// Set the held coverages. Entries must be finite and non-negative.
    pub fn set_coverages(&mut self, coverages: &[f64]) -> DomainResult<()> {
        if let Some(kin) = &self.kinetics {
            if coverages.len() != kin.n_surface_species() {
                return Err(KineticsError::SpeciesCountMismatch {
                    what: "coverages",
                    expected: kin.n_surface_species(),
                    actual: coverages.len(),
                }
                .into());
            }
        }
        if coverages.iter().any(|c| !c.is_finite() || *c < 0.0) {
            return Err(KineticsError::NonPhysical { what: "coverage" }.into());
        }
        self.fixed_coverages = coverages.to_vec();
        Ok(())
    }

    /// Coverages from the last `finalize()` (or as set).
    pub fn fixed_coverages(&self) -> &[f64] {
        &self.fixed_coverages
    }

    pub fn enable_coverage_equations(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn coverage_equations_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_closure(&mut self, closure: CoverageClosure) {
        self.closure = closure;
    }

    pub fn closure(&self) -> CoverageClosure {
        self.closure
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attached.as_ref()
    }

    fn require_kinetics(&self) -> DomainResult<&Arc<dyn SurfaceKinetics>> {
        self.kinetics.as_ref().ok_or(DomainError::NotReady {
            what: "reacting surface without kinetics evaluator",
        })
    }

    /// Coverage row replaced by the site balance, if that closure is active.
    fn balance_row(&self) -> Option<usize> {
        match self.closure {
            CoverageClosure::SiteBalance => argmax(&self.fixed_coverages),
            CoverageClosure::Trusted => None,
        }
    }

    pub fn init(&mut self, ctx: &InitContext) -> DomainResult<()> {
        if self.kinetics.is_none() {
            return Err(DomainError::config(format!(
                "reacting surface '{}' has no kinetics evaluator",
                self.name
            )));
        }
        self.attached = ctx.attached_flow()?;
        Ok(())
    }

    fn rates(&self, ctx: &EvalContext<'_>, x: &[f64]) -> DomainResult<ProductionRates> {
        let kin = self.require_kinetics()?;
        let gas = match &self.attached {
            Some(att) => {
                let edge = ctx.neighbor_edge(att.side)?;
                let first = att.flow.first_species;
                let y = edge
                    .get(first..first + att.flow.n_species())
                    .ok_or(DomainError::NotReady {
                        what: "flow edge shorter than its species layout",
                    })?;
                Some(GasState {
                    temperature: edge[att.flow.temperature],
                    mass_fractions: y,
                })
            }
            None => None,
        };
        let rates = kin.production_rates(x[0], &x[1..], gas)?;
        if rates.surface.len() != x.len() - 1 {
            return Err(KineticsError::SpeciesCountMismatch {
                what: "surface production rates",
                expected: x.len() - 1,
                actual: rates.surface.len(),
            }
            .into());
        }
        Ok(rates)
    }

    pub fn eval(&self, ctx: &EvalContext<'_>, r: &mut [f64]) -> DomainResult<()> {
        self.require_kinetics()?;
        if ctx.skip() {
            return Ok(());
        }
        let x = ctx.own_values()?;
        let theta = &x[1..];
        r[0] = x[0] - self.temperature;

        if !self.enabled {
            for (k, th) in theta.iter().enumerate() {
                r[1 + k] = th - self.fixed_coverages[k];
            }
            return Ok(());
        }

        let rates = self.rates(ctx, x)?;
        let prev = ctx.previous_values()?;
        for (k, th) in theta.iter().enumerate() {
            r[1 + k] = rates.surface[k];
            if let Some(prev) = prev {
                r[1 + k] -= ctx.rdt * (th - prev[1 + k]);
            }
        }
        if let Some(k) = self.balance_row() {
            r[1 + k] = 1.0 - theta.iter().sum::<f64>();
        }
        Ok(())
    }

    pub fn edge_condition(&self, ctx: &EvalContext<'_>) -> DomainResult<EdgeCondition> {
        let x = ctx.own_values()?;
        let mut species_flux = Vec::new();
        if let (true, Some(att)) = (self.enabled, &self.attached) {
            let rates = self.rates(ctx, x)?;
            if !rates.gas.is_empty() {
                let mw = att.flow.species.molecular_weights();
                if rates.gas.len() != mw.len() {
                    return Err(KineticsError::SpeciesCountMismatch {
                        what: "gas production rates",
                        expected: mw.len(),
                        actual: rates.gas.len(),
                    }
                    .into());
                }
                species_flux = rates.gas.iter().zip(mw).map(|(w, m)| w * m).collect();
            }
        }
        Ok(EdgeCondition::Wall {
            temperature: x[0],
            species_flux,
        })
    }

    pub fn is_differential(&self, row: usize) -> bool {
        row >= 1 && self.enabled && self.balance_row() != Some(row - 1)
    }

    pub fn finalize(&mut self, x: &[f64]) {
        self.fixed_coverages = x[1..].to_vec();
        if !coverages_sum_to_one(&self.fixed_coverages) {
            let sum: f64 = self.fixed_coverages.iter().sum();
            warn!(surface = %self.name, coverage_sum = sum, "surface coverages do not sum to one");
        }
    }

    pub fn initial_solution(&self, x: &mut [f64]) {
        x[0] = self.temperature;
        for (xk, c) in x[1..].iter_mut().zip(&self.fixed_coverages) {
            *xk = *c;
        }
    }

    pub fn component_name(&self, n: usize) -> Option<String> {
        if n == 0 {
            return Some("temperature".into());
        }
        self.kinetics
            .as_ref()
            .and_then(|k| k.surface_species().name(n - 1).map(String::from))
    }

    pub fn bounds(&self, n: usize) -> ComponentBounds {
        if n == 0 {
            ComponentBounds::TEMPERATURE
        } else {
            ComponentBounds::COVERAGE
        }
    }

    pub fn show_solution(&self, x: &[f64]) {
        info!(surface = %self.name, temperature = x[0], "reacting surface state");
        for (n, th) in x.iter().enumerate().skip(1) {
            let species = self.component_name(n).unwrap_or_default();
            info!(surface = %self.name, species = %species, coverage = th, "surface coverage");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_sum_check_allows_small_drift() {
        assert!(coverages_sum_to_one(&[0.2, 0.3, 0.5]));
        assert!(coverages_sum_to_one(&[0.2, 0.3, 0.5 + 5e-7]));
        assert!(!coverages_sum_to_one(&[0.2, 0.3, 0.5 + 1e-4]));
        assert!(!coverages_sum_to_one(&[]));
    }

    #[test]
    fn finalize_stores_coverages_even_when_unnormalized() {
        let mut surf = ReactingSurface::new("wall");
        surf.finalize(&[700.0, 0.1, 0.6, 0.4]);
        assert_eq!(surf.fixed_coverages(), &[0.1, 0.6, 0.4]);
    }
}
