//! Outlet boundaries: a plain open outlet and one backed by a reservoir.

use crate::common::check_temperature;
use crate::composition::BoundaryComposition;
use crate::context::{Attachment, EvalContext, InitContext};
use crate::edge::EdgeCondition;
use crate::error::{DomainError, DomainResult};
use tracing::{debug, info};

/// Zero-gradient temperature row shared by outlets and symmetry planes:
/// `r = x_T - T_flow(edge)`.
pub(crate) fn zero_gradient(
    att: &Attachment,
    ctx: &EvalContext<'_>,
    r: &mut [f64],
) -> DomainResult<()> {
    let x = ctx.own_values()?;
    let edge = ctx.neighbor_edge(att.side)?;
    r[0] = x[0] - edge[att.flow.temperature];
    Ok(())
}

pub(crate) fn require_flow(ctx: &InitContext, what: &str) -> DomainResult<Attachment> {
    ctx.attached_flow()?.ok_or_else(|| DomainError::Topology {
        what: format!("{what} domain {} has no attached flow domain", ctx.id),
    })
}

/// Simple outlet: one unknown (temperature) with zero gradient against the
/// adjoining flow. Composition is not an unknown.
#[derive(Debug, Clone)]
pub struct Outlet {
    name: String,
    temperature: f64,
    attached: Option<Attachment>,
}

impl Outlet {
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

    /// Temperature stored at the last `finalize()`.
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
        let att = require_flow(ctx, "outlet")?;
        debug!(outlet = %self.name, side = ?att.side, "outlet attached");
        self.attached = Some(att);
        Ok(())
    }

    pub fn eval(&self, ctx: &EvalContext<'_>, r: &mut [f64]) -> DomainResult<()> {
        let att = self.attached.as_ref().ok_or(DomainError::NotReady {
            what: "outlet not initialized",
        })?;
        if ctx.skip() {
            return Ok(());
        }
        zero_gradient(att, ctx, r)
    }

    pub fn edge_condition(&self) -> EdgeCondition {
        EdgeCondition::Outflow { reservoir: None }
    }

    pub fn finalize(&mut self, x: &[f64]) {
        self.temperature = x[0];
    }

    pub fn show_solution(&self, x: &[f64]) {
        info!(outlet = %self.name, temperature = x[0], "outlet state");
    }
}

/// Outlet with a far-field reservoir.
///
/// Behaves like [`Outlet`] and additionally stores the reservoir composition,
/// which the flow uses as its Dirichlet source where the flow reverses locally.
#[derive(Debug, Clone)]
pub struct OutletReservoir {
    name: String,
    temperature: f64,
    composition: BoundaryComposition,
    attached: Option<Attachment>,
}

impl OutletReservoir {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            temperature: 300.0,
            composition: BoundaryComposition::new(),
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

    pub fn composition(&self) -> &BoundaryComposition {
        &self.composition
    }

    pub fn composition_mut(&mut self) -> &mut BoundaryComposition {
        &mut self.composition
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attached.as_ref()
    }

    pub fn init(&mut self, ctx: &InitContext) -> DomainResult<()> {
        let att = require_flow(ctx, "outlet reservoir")?;
        self.composition.resolve(&att.flow.species)?;
        debug!(
            outlet = %self.name,
            side = ?att.side,
            n_species = att.flow.n_species(),
            "outlet reservoir attached"
        );
        self.attached = Some(att);
        Ok(())
    }

    pub fn eval(&self, ctx: &EvalContext<'_>, r: &mut [f64]) -> DomainResult<()> {
        let att = self.attached.as_ref().ok_or(DomainError::NotReady {
            what: "outlet reservoir not initialized",
        })?;
        if ctx.skip() {
            return Ok(());
        }
        zero_gradient(att, ctx, r)
    }

    pub fn edge_condition(&self) -> DomainResult<EdgeCondition> {
        Ok(EdgeCondition::Outflow {
            reservoir: Some(self.composition.mass_fractions()?.to_vec()),
        })
    }

    pub fn finalize(&mut self, x: &[f64]) -> DomainResult<()> {
        self.temperature = x[0];
        if let Some(att) = &self.attached {
            let species = att.flow.species.clone();
            self.composition.resolve(&species)?;
        }
        Ok(())
    }

    pub fn show_solution(&self, x: &[f64]) {
        info!(outlet = %self.name, temperature = x[0], "outlet reservoir state");
        if let Some(named) = self.composition.named_mass_fractions() {
            for (name, y) in named {
                info!(outlet = %self.name, species = %name, mass_fraction = y, "reservoir composition");
            }
        }
    }
}
