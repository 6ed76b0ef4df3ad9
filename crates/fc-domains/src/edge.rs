//! Conditions a boundary imposes on the edge of its attached flow.
//!
//! Boundaries never write into a flow's residual slots. Each one produces an
//! [`EdgeCondition`] from the trial vector and the flow applies it to its own
//! edge rows, so every domain writes only the slice it owns.

/// Edge condition handed from a boundary to its attached flow.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeCondition {
    /// Inflow through an inlet.
    Inflow {
        /// Mass flux along +x [kg/m²/s]: `+mdot` from a left inlet, `-mdot` from
        /// a right one. `None` when the flow determines its own mass flux.
        mass_flux: Option<f64>,
        temperature: f64,
        mass_fractions: Vec<f64>,
        spread_rate: f64,
    },
    /// Open outflow. `reservoir` is the far-field composition used when the
    /// flow reverses locally.
    Outflow { reservoir: Option<Vec<f64>> },
    /// Symmetry plane: zero axial velocity, zero gradients.
    Symmetry,
    /// Impermeable no-slip wall.
    Wall {
        temperature: f64,
        /// Gas species mass production at the wall [kg/m²/s]; empty for an
        /// inert wall.
        species_flux: Vec<f64>,
    },
}

impl EdgeCondition {
    /// Axial mass flux this edge pins, if any.
    ///
    /// Walls and symmetry planes pin zero; outflows pin nothing.
    pub fn imposed_mass_flux(&self) -> Option<f64> {
        match self {
            EdgeCondition::Inflow { mass_flux, .. } => *mass_flux,
            EdgeCondition::Wall { .. } | EdgeCondition::Symmetry => Some(0.0),
            EdgeCondition::Outflow { .. } => None,
        }
    }

    pub fn is_inflow(&self) -> bool {
        matches!(self, EdgeCondition::Inflow { .. })
    }
}
