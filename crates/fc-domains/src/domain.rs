//! The closed set of domain variants and dispatch over them.

use crate::common::ComponentBounds;
use crate::composition::BoundaryComposition;
use crate::context::{EvalContext, InitContext};
use crate::edge::EdgeCondition;
use crate::error::{DomainError, DomainResult};
use crate::inlet::Inlet;
use crate::kind::DomainKind;
use crate::outlet::{Outlet, OutletReservoir};
use crate::snapshot::{DomainNode, VariableColumn};
use crate::surface::{ReactingSurface, Surface};
use crate::symmetry::Symmetry;
use crate::terminator::Terminator;
use crate::traits::FlowDomain;
use fc_kinetics::{Basis, CompositionSpec, SurfaceKinetics};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A unit of the chain owning a contiguous slice of the global vector.
pub enum Domain {
    Inlet(Inlet),
    Outlet(Outlet),
    OutletReservoir(OutletReservoir),
    Symmetry(Symmetry),
    Surface(Surface),
    ReactingSurface(ReactingSurface),
    Flow(Box<dyn FlowDomain>),
    Terminator(Terminator),
}

impl fmt::Debug for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Domain")
            .field("kind", &self.kind())
            .field("name", &self.name())
            .field("nv", &self.nv())
            .field("np", &self.np())
            .finish()
    }
}

impl Domain {
    pub fn flow(flow: impl FlowDomain + 'static) -> Self {
        Domain::Flow(Box::new(flow))
    }

    pub fn kind(&self) -> DomainKind {
        match self {
            Domain::Inlet(_) => DomainKind::Inlet,
            Domain::Outlet(_) => DomainKind::Outlet,
            Domain::OutletReservoir(_) => DomainKind::OutletReservoir,
            Domain::Symmetry(_) => DomainKind::Symmetry,
            Domain::Surface(_) => DomainKind::Surface,
            Domain::ReactingSurface(_) => DomainKind::ReactingSurface,
            Domain::Flow(_) => DomainKind::Flow,
            Domain::Terminator(_) => DomainKind::Terminator,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Domain::Inlet(d) => d.name(),
            Domain::Outlet(d) => d.name(),
            Domain::OutletReservoir(d) => d.name(),
            Domain::Symmetry(d) => d.name(),
            Domain::Surface(d) => d.name(),
            Domain::ReactingSurface(d) => d.name(),
            Domain::Flow(d) => d.name(),
            Domain::Terminator(d) => d.name(),
        }
    }

    pub fn is_boundary(&self) -> bool {
        self.kind().is_boundary()
    }

    /// Variables per grid point.
    pub fn nv(&self) -> usize {
        match self {
            Domain::Inlet(_) => 2,
            Domain::ReactingSurface(d) => 1 + d.n_surface_species(),
            Domain::Flow(d) => d.nv(),
            _ => 1,
        }
    }

    /// Grid points: one for every boundary, many for a flow.
    pub fn np(&self) -> usize {
        match self {
            Domain::Flow(d) => d.np(),
            _ => 1,
        }
    }

    pub fn component_name(&self, n: usize) -> Option<String> {
        match self {
            Domain::Inlet(d) => d.component_name(n),
            Domain::ReactingSurface(d) => d.component_name(n),
            Domain::Flow(d) => d.component_name(n),
            Domain::Terminator(_) => (n == 0).then(|| "dummy".to_string()),
            _ => (n == 0).then(|| "temperature".to_string()),
        }
    }

    pub fn component_names(&self) -> Vec<String> {
        (0..self.nv())
            .map(|n| {
                self.component_name(n)
                    .unwrap_or_else(|| format!("component_{n}"))
            })
            .collect()
    }

    pub fn init(&mut self, ctx: &InitContext) -> DomainResult<()> {
        debug!(id = %ctx.id, kind = %self.kind(), "init domain");
        match self {
            Domain::Inlet(d) => d.init(ctx),
            Domain::Outlet(d) => d.init(ctx),
            Domain::OutletReservoir(d) => d.init(ctx),
            Domain::Symmetry(d) => d.init(ctx),
            Domain::Surface(d) => d.init(ctx),
            Domain::ReactingSurface(d) => d.init(ctx),
            Domain::Flow(_) | Domain::Terminator(_) => Ok(()),
        }
    }

    /// Write this domain's residual into `r`, its own slice of the global
    /// residual. Reads go through `ctx.x`; persistent state is untouched.
    pub fn eval(&self, ctx: &EvalContext<'_>, r: &mut [f64]) -> DomainResult<()> {
        match self {
            Domain::Inlet(d) => d.eval(ctx, r),
            Domain::Outlet(d) => d.eval(ctx, r),
            Domain::OutletReservoir(d) => d.eval(ctx, r),
            Domain::Symmetry(d) => d.eval(ctx, r),
            Domain::Surface(d) => d.eval(ctx, r),
            Domain::ReactingSurface(d) => d.eval(ctx, r),
            Domain::Flow(d) => d.eval(ctx, r),
            Domain::Terminator(d) => d.eval(ctx, r),
        }
    }

    /// Condition this boundary imposes on its attached flow's edge.
    ///
    /// `None` for flows and terminators.
    pub fn edge_condition(&self, ctx: &EvalContext<'_>) -> DomainResult<Option<EdgeCondition>> {
        let edge = match self {
            Domain::Inlet(d) => d.edge_condition(ctx)?,
            Domain::Outlet(d) => d.edge_condition(),
            Domain::OutletReservoir(d) => d.edge_condition()?,
            Domain::Symmetry(d) => d.edge_condition(),
            Domain::Surface(d) => d.edge_condition(ctx)?,
            Domain::ReactingSurface(d) => d.edge_condition(ctx)?,
            Domain::Flow(_) | Domain::Terminator(_) => return Ok(None),
        };
        Ok(Some(edge))
    }

    /// Store the accepted solution slice `x`.
    pub fn finalize(&mut self, x: &[f64]) -> DomainResult<()> {
        match self {
            Domain::Inlet(d) => d.finalize(x),
            Domain::Outlet(d) => {
                d.finalize(x);
                Ok(())
            }
            Domain::OutletReservoir(d) => d.finalize(x),
            Domain::Symmetry(d) => {
                d.finalize(x);
                Ok(())
            }
            Domain::ReactingSurface(d) => {
                d.finalize(x);
                Ok(())
            }
            Domain::Flow(d) => d.finalize(x),
            Domain::Surface(_) | Domain::Terminator(_) => Ok(()),
        }
    }

    /// Fill this domain's slice with its starting guess.
    pub fn initial_solution(&self, x: &mut [f64]) {
        match self {
            Domain::Inlet(d) => d.initial_solution(x),
            Domain::Outlet(d) => x[0] = d.temperature(),
            Domain::OutletReservoir(d) => x[0] = d.temperature(),
            Domain::Symmetry(d) => x[0] = d.temperature(),
            Domain::Surface(d) => x[0] = d.temperature(),
            Domain::ReactingSurface(d) => d.initial_solution(x),
            Domain::Flow(d) => d.initial_solution(x),
            Domain::Terminator(_) => x[0] = 0.0,
        }
    }

    pub fn bounds(&self, n: usize) -> ComponentBounds {
        match self {
            Domain::Inlet(d) => d.bounds(n),
            Domain::ReactingSurface(d) => d.bounds(n),
            Domain::Flow(d) => d.bounds(n),
            Domain::Terminator(_) => ComponentBounds::UNBOUNDED,
            _ => ComponentBounds::TEMPERATURE,
        }
    }

    /// Whether local row `row` carries a time derivative.
    pub fn is_differential(&self, row: usize) -> bool {
        match self {
            Domain::ReactingSurface(d) => d.is_differential(row),
            Domain::Flow(d) => {
                let nv = d.nv().max(1);
                d.is_differential(row % nv, row / nv)
            }
            _ => false,
        }
    }

    pub fn show_solution(&self, x: &[f64]) {
        match self {
            Domain::Inlet(d) => d.show_solution(x),
            Domain::Outlet(d) => d.show_solution(x),
            Domain::OutletReservoir(d) => d.show_solution(x),
            Domain::Symmetry(d) => d.show_solution(x),
            Domain::Surface(d) => d.show_solution(x),
            Domain::ReactingSurface(d) => d.show_solution(x),
            Domain::Flow(d) => d.show_solution(x),
            Domain::Terminator(_) => {}
        }
    }

    // ---- capabilities ----

    pub fn temperature(&self) -> DomainResult<f64> {
        match self {
            Domain::Inlet(d) => Ok(d.temperature()),
            Domain::Outlet(d) => Ok(d.temperature()),
            Domain::OutletReservoir(d) => Ok(d.temperature()),
            Domain::Symmetry(d) => Ok(d.temperature()),
            Domain::Surface(d) => Ok(d.temperature()),
            Domain::ReactingSurface(d) => Ok(d.temperature()),
            _ => Err(self.unsupported("temperature")),
        }
    }

    pub fn set_temperature(&mut self, t: f64) -> DomainResult<()> {
        match self {
            Domain::Inlet(d) => d.set_temperature(t),
            Domain::Outlet(d) => d.set_temperature(t),
            Domain::OutletReservoir(d) => d.set_temperature(t),
            Domain::Symmetry(d) => d.set_temperature(t),
            Domain::Surface(d) => d.set_temperature(t),
            Domain::ReactingSurface(d) => d.set_temperature(t),
            _ => Err(self.unsupported("temperature")),
        }
    }

    pub fn mdot(&self) -> DomainResult<f64> {
        match self {
            Domain::Inlet(d) => Ok(d.mdot()),
            _ => Err(self.unsupported("mass flux")),
        }
    }

    pub fn set_mdot(&mut self, mdot: f64) -> DomainResult<()> {
        match self {
            Domain::Inlet(d) => d.set_mdot(mdot),
            _ => Err(self.unsupported("mass flux")),
        }
    }

    pub fn set_spread_rate(&mut self, v: f64) -> DomainResult<()> {
        match self {
            Domain::Inlet(d) => d.set_spread_rate(v),
            _ => Err(self.unsupported("spread rate")),
        }
    }

    pub fn composition(&self) -> DomainResult<&BoundaryComposition> {
        match self {
            Domain::Inlet(d) => Ok(d.composition()),
            Domain::OutletReservoir(d) => Ok(d.composition()),
            _ => Err(self.unsupported("composition")),
        }
    }

    fn composition_mut(&mut self) -> DomainResult<&mut BoundaryComposition> {
        match self {
            Domain::Inlet(d) => Ok(d.composition_mut()),
            Domain::OutletReservoir(d) => Ok(d.composition_mut()),
            _ => Err(self.unsupported("composition")),
        }
    }

    /// Set mole fractions from a `name:value` string.
    pub fn set_mole_fractions(&mut self, input: &str) -> DomainResult<()> {
        self.composition_mut()?.set_mole_fractions_str(input)
    }

    /// Set mass fractions from a `name:value` string.
    pub fn set_mass_fractions_str(&mut self, input: &str) -> DomainResult<()> {
        self.composition_mut()?.set_mass_fractions_str(input)
    }

    /// Set mole fractions ordered like the attached flow's species.
    pub fn set_mole_fraction_array(&mut self, x: &[f64]) -> DomainResult<()> {
        self.composition_mut()?.set_mole_fractions(x)
    }

    /// Set mass fractions ordered like the attached flow's species.
    pub fn set_mass_fractions(&mut self, y: &[f64]) -> DomainResult<()> {
        self.composition_mut()?.set_mass_fractions(y)
    }

    pub fn mass_fraction(&self, k: usize) -> DomainResult<f64> {
        self.composition()?.mass_fraction(k)
    }

    pub fn set_kinetics(&mut self, kinetics: Arc<dyn SurfaceKinetics>) -> DomainResult<()> {
        match self {
            Domain::ReactingSurface(d) => d.set_kinetics(kinetics),
            _ => Err(self.unsupported("surface kinetics")),
        }
    }

    fn unsupported(&self, what: &'static str) -> DomainError {
        DomainError::Unsupported {
            kind: self.kind(),
            what,
        }
    }

    pub fn as_inlet(&self) -> Option<&Inlet> {
        match self {
            Domain::Inlet(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_inlet_mut(&mut self) -> Option<&mut Inlet> {
        match self {
            Domain::Inlet(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_reacting_surface(&self) -> Option<&ReactingSurface> {
        match self {
            Domain::ReactingSurface(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_reacting_surface_mut(&mut self) -> Option<&mut ReactingSurface> {
        match self {
            Domain::ReactingSurface(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_flow(&self) -> Option<&dyn FlowDomain> {
        match self {
            Domain::Flow(d) => Some(d.as_ref()),
            _ => None,
        }
    }

    pub fn as_flow_mut(&mut self) -> Option<&mut (dyn FlowDomain + 'static)> {
        match self {
            Domain::Flow(d) => Some(d.as_mut()),
            _ => None,
        }
    }

    // ---- saved state ----

    /// Save this domain's slice `x` and stored state into a document node.
    pub fn save(&self, id: u32, x: &[f64]) -> DomainNode {
        let nv = self.nv();
        let np = self.np();
        let mut node = DomainNode::new(id, self.name(), self.kind(), np);
        for (n, name) in self.component_names().into_iter().enumerate() {
            let values = (0..np).map(|j| x[j * nv + n]).collect();
            node.variables.push(VariableColumn { name, values });
        }
        if let Ok(t) = self.temperature() {
            node.set_attribute("temperature", t);
        }
        match self {
            Domain::Inlet(d) => {
                node.set_attribute("mdot", d.mdot());
                node.set_attribute("spread_rate", d.spread_rate());
            }
            Domain::ReactingSurface(d) => {
                let enabled = if d.coverage_equations_enabled() { 1.0 } else { 0.0 };
                node.set_attribute("coverage_equations", enabled);
            }
            _ => {}
        }
        if let Ok(comp) = self.composition() {
            node.composition = comp
                .named_mass_fractions()
                .map(|pairs| pairs.into_iter().collect());
        }
        node
    }

    /// Restore this domain from a node into its slice `x`.
    ///
    /// Components are matched by name; missing ones take the variant's
    /// starting value.
    pub fn restore(&mut self, node: &DomainNode, x: &mut [f64]) -> DomainResult<()> {
        if node.kind != self.kind() {
            return Err(DomainError::config(format!(
                "cannot restore {} node into {} domain '{}'",
                node.kind,
                self.kind(),
                self.name()
            )));
        }
        if node.points != self.np() {
            return Err(DomainError::config(format!(
                "node has {} points, domain '{}' has {}",
                node.points,
                self.name(),
                self.np()
            )));
        }

        if let Some(t) = node.attribute("temperature") {
            self.set_temperature(t)?;
        }
        if let Domain::Inlet(d) = self {
            if let Some(mdot) = node.attribute("mdot") {
                d.set_mdot(mdot)?;
            }
            if let Some(v) = node.attribute("spread_rate") {
                d.set_spread_rate(v)?;
            }
        }
        if let (Domain::ReactingSurface(d), Some(flag)) =
            (&mut *self, node.attribute("coverage_equations"))
        {
            d.enable_coverage_equations(flag != 0.0);
        }
        if let Some(map) = &node.composition {
            let pairs = map.iter().map(|(k, v)| (k.clone(), *v)).collect();
            let spec = CompositionSpec::from_pairs(Basis::Mass, pairs)?;
            self.composition_mut()?.set_named(spec)?;
        }

        let nv = self.nv();
        let np = self.np();
        let mut defaults = vec![0.0; nv * np];
        self.initial_solution(&mut defaults);
        for (n, name) in self.component_names().iter().enumerate() {
            match node.variable(name) {
                Some(col) => {
                    for j in 0..np {
                        x[j * nv + n] = col[j];
                    }
                }
                None => {
                    debug!(domain = %self.name(), component = %name, "component missing, using default");
                    for j in 0..np {
                        x[j * nv + n] = defaults[j * nv + n];
                    }
                }
            }
        }
        if let Domain::ReactingSurface(d) = self {
            d.finalize(x);
        }
        Ok(())
    }
}

impl From<Inlet> for Domain {
    fn from(d: Inlet) -> Self {
        Domain::Inlet(d)
    }
}

impl From<Outlet> for Domain {
    fn from(d: Outlet) -> Self {
        Domain::Outlet(d)
    }
}

impl From<OutletReservoir> for Domain {
    fn from(d: OutletReservoir) -> Self {
        Domain::OutletReservoir(d)
    }
}

impl From<Symmetry> for Domain {
    fn from(d: Symmetry) -> Self {
        Domain::Symmetry(d)
    }
}

impl From<Surface> for Domain {
    fn from(d: Surface) -> Self {
        Domain::Surface(d)
    }
}

impl From<ReactingSurface> for Domain {
    fn from(d: ReactingSurface) -> Self {
        Domain::ReactingSurface(d)
    }
}

impl From<Terminator> for Domain {
    fn from(d: Terminator) -> Self {
        Domain::Terminator(d)
    }
}
