//! Common utilities shared by the domain variants.

use crate::error::{DomainError, DomainResult};
use fc_core::numeric::{Tolerances, ensure_finite};
use fc_core::units::constants::MIN_BOUNDARY_T;

/// Largest magnitude accepted for an inlet mass flux [kg/m²/s].
pub const MAX_MASS_FLUX: f64 = 1.0e5;

/// Upper temperature bound for boundary unknowns [K].
pub const MAX_TEMPERATURE: f64 = 1.0e5;

/// Bounds and error tolerances for one solution component.
///
/// The Newton driver keeps damped steps inside `[lower, upper]` and measures
/// step size with `rtol * |x| + atol`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentBounds {
    pub lower: f64,
    pub upper: f64,
    pub rtol: f64,
    pub atol: f64,
}

impl ComponentBounds {
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper,
            rtol: 1.0e-4,
            atol: 1.0e-9,
        }
    }

    pub const fn with_tolerances(mut self, rtol: f64, atol: f64) -> Self {
        self.rtol = rtol;
        self.atol = atol;
        self
    }

    pub fn tolerances(&self) -> Tolerances {
        Tolerances {
            abs: self.atol,
            rel: self.rtol,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    pub const MASS_FLUX: ComponentBounds = ComponentBounds::new(-MAX_MASS_FLUX, MAX_MASS_FLUX);
    pub const TEMPERATURE: ComponentBounds =
        ComponentBounds::new(MIN_BOUNDARY_T, MAX_TEMPERATURE);
    pub const COVERAGE: ComponentBounds = ComponentBounds::new(-1.0e-5, 2.0);
    pub const UNBOUNDED: ComponentBounds = ComponentBounds::new(-1.0e20, 1.0e20);
}

impl Default for ComponentBounds {
    fn default() -> Self {
        ComponentBounds::UNBOUNDED
    }
}

/// Ensure a value is finite, returning a configuration error if not.
pub fn check_finite(value: f64, what: &'static str) -> DomainResult<f64> {
    ensure_finite(value, what).map_err(|e| DomainError::config(e.to_string()))
}

/// Validate a temperature supplied by a setter.
pub fn check_temperature(t: f64) -> DomainResult<f64> {
    let t = check_finite(t, "temperature")?;
    if t <= 0.0 {
        return Err(DomainError::config(format!(
            "temperature must be positive, got {t} K"
        )));
    }
    Ok(t)
}

/// Index of the largest entry (first one on ties).
pub fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}
