//! Reference flow domain: a one-dimensional upwind convection–diffusion
//! column.
//!
//! Per grid point the column carries `[u, V, T, λ, Y_0 .. Y_{K-1}]`:
//!
//! - `u` axial mass flux along +x [kg/m²/s]; continuity with a uniform sink
//!   `λ` so that two imposed edge fluxes (counterflow, impinging on a wall)
//!   can both be honoured: `u_j - u_{j-1} + Δz λ_j = 0`
//! - `V` spread rate, linear between its edge values
//! - `T`, `Y_k` transported by upwind convection and central diffusion with
//!   unit density and a single diffusivity
//! - `λ` constant along the column; zero unless both edges impose a flux
//!
//! Edge rows are closed from the [`EdgeCondition`]s of the two adjoining
//! boundaries. Interior `T` and `Y_k` rows are differential and take the
//! pseudo-time term `-rdt (φ - φ_prev)`.

use crate::common::ComponentBounds;
use crate::context::{EvalContext, Side};
use crate::edge::EdgeCondition;
use crate::error::{DomainError, DomainResult};
use crate::traits::FlowDomain;
use fc_core::units::{Length, meters};
use fc_kinetics::{SpeciesSet, check_mass_fractions};
use tracing::info;

/// How the column's mass flux is determined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MassFluxMode {
    /// Imposed by the inlets.
    Imposed,
    /// Determined by the column itself (freely propagating flame). The value
    /// pins `u` at a free inflow edge.
    Free { mass_flux: f64 },
}

/// Upwind convection–diffusion column used as a reference flow domain.
#[derive(Debug, Clone)]
pub struct ConvectionColumn {
    name: String,
    species: SpeciesSet,
    np: usize,
    /// Column length [m]
    length: f64,
    /// Diffusivity for temperature and species [m²/s at unit density]
    diffusivity: f64,
    mode: MassFluxMode,
    initial_temperature: f64,
    initial_mass_fractions: Vec<f64>,
}

impl ConvectionColumn {
    pub const U: usize = 0;
    pub const V: usize = 1;
    pub const T: usize = 2;
    pub const LAMBDA: usize = 3;
    pub const Y0: usize = 4;

    /// Create a column with `np >= 2` uniformly spaced points over `length`.
    pub fn new(
        name: impl Into<String>,
        species: SpeciesSet,
        np: usize,
        length: Length,
    ) -> DomainResult<Self> {
        let length = meters(length);
        if np < 2 {
            return Err(DomainError::config(format!(
                "flow column needs at least 2 points, got {np}"
            )));
        }
        if !length.is_finite() || length <= 0.0 {
            return Err(DomainError::config("flow column length must be positive"));
        }
        if species.is_empty() {
            return Err(DomainError::config("flow column needs at least one species"));
        }
        let mut initial_mass_fractions = vec![0.0; species.len()];
        initial_mass_fractions[0] = 1.0;
        Ok(Self {
            name: name.into(),
            species,
            np,
            length,
            diffusivity: 1.0e-3,
            mode: MassFluxMode::Imposed,
            initial_temperature: 300.0,
            initial_mass_fractions,
        })
    }

    pub fn with_diffusivity(mut self, diffusivity: f64) -> DomainResult<Self> {
        if !diffusivity.is_finite() || diffusivity <= 0.0 {
            return Err(DomainError::config("diffusivity must be positive"));
        }
        self.diffusivity = diffusivity;
        Ok(self)
    }

    pub fn with_mode(mut self, mode: MassFluxMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_initial_temperature(mut self, t: f64) -> DomainResult<Self> {
        self.initial_temperature = crate::common::check_temperature(t)?;
        Ok(self)
    }

    pub fn with_initial_mass_fractions(mut self, y: Vec<f64>) -> DomainResult<Self> {
        check_mass_fractions(&y, self.species.len())?;
        self.initial_mass_fractions = y;
        Ok(self)
    }

    pub fn mode(&self) -> MassFluxMode {
        self.mode
    }

    pub fn dz(&self) -> f64 {
        self.length / (self.np - 1) as f64
    }

    /// Grid point positions [m].
    pub fn grid(&self) -> Vec<f64> {
        (0..self.np).map(|j| j as f64 * self.dz()).collect()
    }

    fn anchor(&self, edge: &EdgeCondition) -> Option<f64> {
        match (edge, self.mode) {
            (EdgeCondition::Inflow { mass_flux: None, .. }, MassFluxMode::Free { mass_flux }) => {
                Some(mass_flux)
            }
            _ => edge.imposed_mass_flux(),
        }
    }

    fn edge_rows(
        &self,
        side: Side,
        edge: &EdgeCondition,
        x: &[f64],
        r: &mut [f64],
    ) -> DomainResult<()> {
        let nv = self.nv();
        let (je, ji) = match side {
            Side::Left => (0, 1),
            Side::Right => (self.np - 1, self.np - 2),
        };
        let val = |j: usize, c: usize| x[j * nv + c];
        let at = |j: usize, c: usize| j * nv + c;
        let dz = self.dz();
        let d = self.diffusivity;

        r[at(je, Self::V)] = match edge {
            EdgeCondition::Inflow { spread_rate, .. } => val(je, Self::V) - spread_rate,
            _ => val(je, Self::V),
        };

        r[at(je, Self::T)] = match edge {
            EdgeCondition::Inflow { temperature, .. } | EdgeCondition::Wall { temperature, .. } => {
                val(je, Self::T) - temperature
            }
            _ => val(je, Self::T) - val(ji, Self::T),
        };

        let u_edge = val(je, Self::U);
        let entering = match side {
            Side::Left => u_edge > 0.0,
            Side::Right => u_edge < 0.0,
        };
        for k in 0..self.species.len() {
            let c = Self::Y0 + k;
            let (ye, yi) = (val(je, c), val(ji, c));
            r[at(je, c)] = match edge {
                EdgeCondition::Inflow {
                    mass_flux,
                    mass_fractions,
                    ..
                } => {
                    let y_in = mass_fractions.get(k).copied().ok_or_else(|| {
                        DomainError::Flow {
                            message: format!(
                                "inflow carries {} species, column '{}' has {}",
                                mass_fractions.len(),
                                self.name,
                                self.species.len()
                            ),
                        }
                    })?;
                    let m = mass_flux.unwrap_or(u_edge).abs();
                    m * (ye - y_in) - d * (yi - ye) / dz
                }
                EdgeCondition::Outflow {
                    reservoir: Some(y_res),
                } if entering => ye - y_res.get(k).copied().unwrap_or(0.0),
                EdgeCondition::Wall { species_flux, .. } => {
                    d * (yi - ye) / dz + species_flux.get(k).copied().unwrap_or(0.0)
                }
                _ => ye - yi,
            };
        }
        Ok(())
    }
}

impl FlowDomain for ConvectionColumn {
    fn name(&self) -> &str {
        &self.name
    }

    fn nv(&self) -> usize {
        Self::Y0 + self.species.len()
    }

    fn np(&self) -> usize {
        self.np
    }

    fn species(&self) -> &SpeciesSet {
        &self.species
    }

    fn component_name(&self, n: usize) -> Option<String> {
        match n {
            Self::U => Some("u".into()),
            Self::V => Some("V".into()),
            Self::T => Some("T".into()),
            Self::LAMBDA => Some("lambda".into()),
            _ => self.species.name(n - Self::Y0).map(String::from),
        }
    }

    fn mass_flux_component(&self) -> usize {
        Self::U
    }

    fn temperature_component(&self) -> usize {
        Self::T
    }

    fn species_component(&self, k: usize) -> usize {
        Self::Y0 + k
    }

    fn fixed_mass_flux(&self) -> bool {
        self.mode == MassFluxMode::Imposed
    }

    fn eval(&self, ctx: &EvalContext<'_>, r: &mut [f64]) -> DomainResult<()> {
        let missing = |side: &str| DomainError::Flow {
            message: format!("column '{}' has no {side} edge condition", self.name),
        };
        let left = ctx.left_edge.ok_or_else(|| missing("left"))?;
        let right = ctx.right_edge.ok_or_else(|| missing("right"))?;
        let x = ctx.own_values()?;
        let prev = ctx.previous_values()?;

        let nv = self.nv();
        let np = self.np;
        let last = np - 1;
        let dz = self.dz();
        let d = self.diffusivity;
        let val = |j: usize, c: usize| x[j * nv + c];
        let at = |j: usize, c: usize| j * nv + c;

        // continuity, anchored at the edge that imposes a flux
        let m_left = self.anchor(left);
        let m_right = self.anchor(right);
        if m_left.is_some() || m_right.is_none() {
            r[at(0, Self::U)] = val(0, Self::U) - m_left.unwrap_or(0.0);
            for j in 1..np {
                r[at(j, Self::U)] =
                    val(j, Self::U) - val(j - 1, Self::U) + dz * val(j, Self::LAMBDA);
            }
        } else {
            r[at(last, Self::U)] = val(last, Self::U) - m_right.unwrap_or(0.0);
            for j in 0..last {
                r[at(j, Self::U)] =
                    val(j, Self::U) - val(j + 1, Self::U) - dz * val(j, Self::LAMBDA);
            }
        }

        for j in 0..last {
            r[at(j, Self::LAMBDA)] = val(j + 1, Self::LAMBDA) - val(j, Self::LAMBDA);
        }
        r[at(last, Self::LAMBDA)] = match (m_left, m_right) {
            (Some(_), Some(m)) => val(last, Self::U) - m,
            _ => val(last, Self::LAMBDA),
        };

        for j in 1..last {
            r[at(j, Self::V)] =
                val(j, Self::V) - 0.5 * (val(j - 1, Self::V) + val(j + 1, Self::V));

            let u = val(j, Self::U);
            let transported = std::iter::once(Self::T).chain(Self::Y0..nv);
            for c in transported {
                let (west, here, east) = (val(j - 1, c), val(j, c), val(j + 1, c));
                let convection = if u >= 0.0 {
                    u * (here - west) / dz
                } else {
                    u * (east - here) / dz
                };
                let diffusion = d * (east - 2.0 * here + west) / (dz * dz);
                let mut res = diffusion - convection;
                if let Some(prev) = prev {
                    res -= ctx.rdt * (here - prev[at(j, c)]);
                }
                r[at(j, c)] = res;
            }
        }

        self.edge_rows(Side::Left, left, x, r)?;
        self.edge_rows(Side::Right, right, x, r)
    }

    fn initial_solution(&self, x: &mut [f64]) {
        let nv = self.nv();
        let u0 = match self.mode {
            MassFluxMode::Imposed => 0.0,
            MassFluxMode::Free { mass_flux } => mass_flux,
        };
        for j in 0..self.np {
            let p = &mut x[j * nv..(j + 1) * nv];
            p[Self::U] = u0;
            p[Self::V] = 0.0;
            p[Self::T] = self.initial_temperature;
            p[Self::LAMBDA] = 0.0;
            p[Self::Y0..].copy_from_slice(&self.initial_mass_fractions);
        }
    }

    fn bounds(&self, component: usize) -> ComponentBounds {
        match component {
            Self::T => ComponentBounds::TEMPERATURE,
            c if c >= Self::Y0 => ComponentBounds::new(-1.0e-5, 1.1),
            _ => ComponentBounds::UNBOUNDED,
        }
    }

    fn is_differential(&self, component: usize, point: usize) -> bool {
        let interior = point > 0 && point + 1 < self.np;
        interior && (component == Self::T || component >= Self::Y0)
    }

    fn show_solution(&self, x: &[f64]) {
        let nv = self.nv();
        let last = (self.np - 1) * nv;
        info!(
            flow = %self.name,
            points = self.np,
            u_left = x[Self::U],
            u_right = x[last + Self::U],
            t_left = x[Self::T],
            t_right = x[last + Self::T],
            "flow edge state"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Extent;
    use fc_core::units::m;
    use fc_kinetics::Species;

    fn column(np: usize) -> ConvectionColumn {
        let gas = SpeciesSet::from_species(&[Species::CH4, Species::N2]);
        ConvectionColumn::new("col", gas, np, m(0.01)).unwrap()
    }

    fn uniform(col: &ConvectionColumn, u: f64, t: f64, y: &[f64]) -> Vec<f64> {
        let mut x = vec![0.0; col.nv() * col.np()];
        col.initial_solution(&mut x);
        for j in 0..col.np() {
            let p = &mut x[j * col.nv()..(j + 1) * col.nv()];
            p[ConvectionColumn::U] = u;
            p[ConvectionColumn::T] = t;
            p[ConvectionColumn::Y0..].copy_from_slice(y);
        }
        x
    }

    fn extent(col: &ConvectionColumn) -> Extent {
        Extent {
            offset: 0,
            nv: col.nv(),
            np: col.np(),
            first_point: 0,
        }
    }

    #[test]
    fn rejects_bad_construction() {
        let gas = SpeciesSet::from_species(&[Species::N2]);
        assert!(ConvectionColumn::new("c", gas.clone(), 1, m(0.01)).is_err());
        assert!(ConvectionColumn::new("c", gas, 5, m(0.0)).is_err());
    }

    #[test]
    fn uniform_inflow_is_a_steady_solution() {
        let col = column(6);
        let x = uniform(&col, 0.5, 300.0, &[0.2, 0.8]);
        let left = EdgeCondition::Inflow {
            mass_flux: Some(0.5),
            temperature: 300.0,
            mass_fractions: vec![0.2, 0.8],
            spread_rate: 0.0,
        };
        let right = EdgeCondition::Outflow { reservoir: None };
        let ctx = EvalContext::new(&x, extent(&col)).with_edges(Some(&left), Some(&right));
        let mut r = vec![f64::NAN; x.len()];
        col.eval(&ctx, &mut r).unwrap();
        assert!(r.iter().all(|v| v.abs() < 1e-12), "{r:?}");
    }

    #[test]
    fn counterflow_sink_matches_edge_fluxes() {
        let col = column(5);
        let left = EdgeCondition::Inflow {
            mass_flux: Some(0.4),
            temperature: 300.0,
            mass_fractions: vec![1.0, 0.0],
            spread_rate: 0.0,
        };
        let right = EdgeCondition::Wall {
            temperature: 300.0,
            species_flux: Vec::new(),
        };
        // u linear from 0.4 to 0, λ = 0.4 / L
        let mut x = uniform(&col, 0.0, 300.0, &[1.0, 0.0]);
        let lambda = 0.4 / 0.01;
        for j in 0..col.np() {
            x[j * col.nv() + ConvectionColumn::U] = 0.4 * (1.0 - j as f64 / 4.0);
            x[j * col.nv() + ConvectionColumn::LAMBDA] = lambda;
        }
        let ctx = EvalContext::new(&x, extent(&col)).with_edges(Some(&left), Some(&right));
        let mut r = vec![0.0; x.len()];
        col.eval(&ctx, &mut r).unwrap();
        for j in 0..col.np() {
            assert!(r[j * col.nv() + ConvectionColumn::U].abs() < 1e-12);
            assert!(r[j * col.nv() + ConvectionColumn::LAMBDA].abs() < 1e-9);
        }
    }

    #[test]
    fn missing_edge_is_an_error() {
        let col = column(3);
        let x = uniform(&col, 0.0, 300.0, &[1.0, 0.0]);
        let ctx = EvalContext::new(&x, extent(&col));
        let mut r = vec![0.0; x.len()];
        assert!(matches!(
            col.eval(&ctx, &mut r),
            Err(DomainError::Flow { .. })
        ));
    }

    #[test]
    fn transient_mask_covers_interior_transport_rows() {
        let col = column(4);
        assert!(!col.is_differential(ConvectionColumn::T, 0));
        assert!(col.is_differential(ConvectionColumn::T, 1));
        assert!(col.is_differential(ConvectionColumn::Y0 + 1, 2));
        assert!(!col.is_differential(ConvectionColumn::U, 2));
        assert!(!col.is_differential(ConvectionColumn::T, 3));
    }
}
