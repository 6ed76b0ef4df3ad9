//! Inlet boundary: imposes mass flux, temperature, and composition.

use crate::common::{ComponentBounds, MAX_MASS_FLUX, check_finite, check_temperature};
use crate::composition::BoundaryComposition;
use crate::context::{Attachment, EvalContext, InitContext, Side};
use crate::edge::EdgeCondition;
use crate::error::{DomainError, DomainResult};
use fc_core::units::{Temperature, kelvin};
use tracing::{debug, info};

/// Direction an inlet is expected to inject into its flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    /// Inlet sits left of the flow and injects along +x.
    Right,
    /// Inlet sits right of the flow and injects along -x.
    Left,
}

/// Inlet with two unknowns: mass flux (component 0) and temperature
/// (component 1).
///
/// Residuals are `x_mdot - mdot` and `x_T - T`. With a non-zero spreading rate
/// the temperature row instead enforces zero gradient against the first
/// interior point of the attached flow. When the flow does not fix its mass
/// flux, the mdot row follows the flow's edge mass flux and `finalize()`
/// stores the converged value.
#[derive(Debug, Clone)]
pub struct Inlet {
    name: String,
    /// Mass flux [kg/m²/s]
    mdot: f64,
    /// Temperature [K]
    temperature: f64,
    /// Tangential velocity gradient imposed on the flow edge [1/s]
    spread_rate: f64,
    composition: BoundaryComposition,
    facing: Option<Facing>,
    attached: Option<Attachment>,
}

impl Inlet {
    pub const MDOT: usize = 0;
    pub const TEMPERATURE: usize = 1;

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mdot: 0.0,
            temperature: 300.0,
            spread_rate: 0.0,
            composition: BoundaryComposition::new(),
            facing: None,
            attached: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mdot(&self) -> f64 {
        self.mdot
    }

    pub fn set_mdot(&mut self, mdot: f64) -> DomainResult<()> {
        let mdot = check_finite(mdot, "inlet mass flux")?;
        if mdot.abs() > MAX_MASS_FLUX {
            return Err(DomainError::config(format!(
                "inlet mass flux {mdot} outside ±{MAX_MASS_FLUX}"
            )));
        }
        self.mdot = mdot;
        Ok(())
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn set_temperature(&mut self, t: f64) -> DomainResult<()> {
        self.temperature = check_temperature(t)?;
        Ok(())
    }

    pub fn set_temperature_quantity(&mut self, t: Temperature) -> DomainResult<()> {
        self.set_temperature(kelvin(t))
    }

    pub fn spread_rate(&self) -> f64 {
        self.spread_rate
    }

    pub fn set_spread_rate(&mut self, v: f64) -> DomainResult<()> {
        self.spread_rate = check_finite(v, "spread rate")?;
        Ok(())
    }

    /// Request a facing; checked against the topology at `init()`.
    pub fn set_facing(&mut self, facing: Facing) {
        self.facing = Some(facing);
    }

    pub fn facing(&self) -> Option<Facing> {
        self.facing
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

    /// +1 when injecting along +x, -1 along -x.
    pub fn direction(&self) -> DomainResult<f64> {
        self.attached
            .as_ref()
            .map(Attachment::direction)
            .ok_or(DomainError::NotReady {
                what: "inlet direction before init",
            })
    }

    fn attached(&self) -> DomainResult<&Attachment> {
        self.attached.as_ref().ok_or(DomainError::NotReady {
            what: "inlet not initialized",
        })
    }

    pub fn init(&mut self, ctx: &InitContext) -> DomainResult<()> {
        let att = ctx.attached_flow()?.ok_or_else(|| DomainError::Topology {
            what: format!("inlet '{}' has no attached flow domain", self.name),
        })?;
        let facing = match att.side {
            Side::Right => Facing::Right,
            Side::Left => Facing::Left,
        };
        match self.facing {
            Some(requested) if requested != facing => {
                return Err(DomainError::config(format!(
                    "inlet '{}' requested to face {requested:?} but its flow lies to the {:?}",
                    self.name, att.side
                )));
            }
            _ => {}
        }
        self.composition.resolve(&att.flow.species)?;
        debug!(
            inlet = %self.name,
            side = ?att.side,
            n_species = att.flow.n_species(),
            fixed_mass_flux = att.flow.fixed_mass_flux,
            "inlet attached"
        );
        self.attached = Some(att);
        Ok(())
    }

    pub fn eval(&self, ctx: &EvalContext<'_>, r: &mut [f64]) -> DomainResult<()> {
        let att = self.attached()?;
        if ctx.skip() {
            return Ok(());
        }
        let x = ctx.own_values()?;
        let edge = ctx.neighbor_edge(att.side)?;

        r[Self::MDOT] = if att.flow.fixed_mass_flux {
            x[Self::MDOT] - self.mdot
        } else {
            x[Self::MDOT] - att.direction() * edge[att.flow.mass_flux]
        };

        r[Self::TEMPERATURE] = if self.spread_rate != 0.0 {
            let depth = usize::from(att.flow.np > 1);
            let interior = ctx.neighbor_point(att.side, depth)?;
            x[Self::TEMPERATURE] - interior[att.flow.temperature]
        } else {
            x[Self::TEMPERATURE] - self.temperature
        };
        Ok(())
    }

    pub fn edge_condition(&self, ctx: &EvalContext<'_>) -> DomainResult<EdgeCondition> {
        let att = self.attached()?;
        let x = ctx.own_values()?;
        let mass_flux = att
            .flow
            .fixed_mass_flux
            .then(|| att.direction() * x[Self::MDOT]);
        Ok(EdgeCondition::Inflow {
            mass_flux,
            temperature: x[Self::TEMPERATURE],
            mass_fractions: self.composition.mass_fractions()?.to_vec(),
            spread_rate: self.spread_rate,
        })
    }

    pub fn finalize(&mut self, x: &[f64]) -> DomainResult<()> {
        let att = self.attached.as_ref().ok_or(DomainError::NotReady {
            what: "inlet not initialized",
        })?;
        let free = !att.flow.fixed_mass_flux;
        self.composition.resolve(&att.flow.species)?;
        if free {
            self.mdot = x[Self::MDOT];
        }
        Ok(())
    }

    pub fn initial_solution(&self, x: &mut [f64]) {
        x[Self::MDOT] = self.mdot;
        x[Self::TEMPERATURE] = self.temperature;
    }

    pub fn component_name(&self, n: usize) -> Option<String> {
        match n {
            Self::MDOT => Some("mdot".into()),
            Self::TEMPERATURE => Some("temperature".into()),
            _ => None,
        }
    }

    pub fn bounds(&self, n: usize) -> ComponentBounds {
        match n {
            Self::MDOT => ComponentBounds::MASS_FLUX,
            _ => ComponentBounds::TEMPERATURE,
        }
    }

    pub fn show_solution(&self, x: &[f64]) {
        info!(
            inlet = %self.name,
            mdot = self.mdot,
            mdot_solution = x[Self::MDOT],
            temperature = self.temperature,
            temperature_solution = x[Self::TEMPERATURE],
            "inlet state"
        );
        if let Some(named) = self.composition.named_mass_fractions() {
            for (name, y) in named {
                info!(inlet = %self.name, species = %name, mass_fraction = y, "inlet composition");
            }
        }
    }
}
