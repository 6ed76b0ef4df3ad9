//! Symmetry plane.

use crate::common::check_temperature;
use crate::context::{Attachment, EvalContext, InitContext};
use crate::edge::EdgeCondition;
use crate::error::{DomainError, DomainResult};
use crate::outlet::{require_flow, zero_gradient};
use tracing::{debug, info};

/// Symmetry plane with one unknown, temperature, held at zero gradient against
/// the attached flow's nearest point. Zero axial velocity is enforced by the
/// flow from [`EdgeCondition::Symmetry`].
#[derive(Debug, Clone)]
pub struct Symmetry {
    name: String,
    temperature: f64,
    attached: Option<Attachment>,
}

impl Symmetry {
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
        let att = require_flow(ctx, "symmetry")?;
        debug!(symmetry = %self.name, side = ?att.side, "symmetry plane attached");
        self.attached = Some(att);
        Ok(())
    }

    pub fn eval(&self, ctx: &EvalContext<'_>, r: &mut [f64]) -> DomainResult<()> {
        let att = self.attached.as_ref().ok_or(DomainError::NotReady {
            what: "symmetry plane not initialized",
        })?;
        if ctx.skip() {
            return Ok(());
        }
        zero_gradient(att, ctx, r)
    }

    pub fn edge_condition(&self) -> EdgeCondition {
        EdgeCondition::Symmetry
    }

    pub fn finalize(&mut self, x: &[f64]) {
        self.temperature = x[0];
    }

    pub fn show_solution(&self, x: &[f64]) {
        info!(symmetry = %self.name, temperature = x[0], "symmetry plane state");
    }
}
