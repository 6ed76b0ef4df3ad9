//! Solver configuration.

use serde::{Deserialize, Serialize};

use crate::error::{SolverError, SolverResult};

/// Newton solver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance for residual norm
    pub abs_tol: f64,
    /// Relative tolerance for residual norm
    pub rel_tol: f64,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_backtracks: usize,
    /// Relative finite-difference perturbation
    pub fd_epsilon: f64,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            abs_tol: 1e-9,
            rel_tol: 1e-12,
            line_search_beta: 0.5,
            max_backtracks: 20,
            fd_epsilon: 1e-7,
        }
    }
}

/// Pseudo-time stepping configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeStepConfig {
    /// First step size [s]
    pub initial_dt: f64,
    /// Factor applied to dt after an accepted step
    pub growth: f64,
    /// Factor applied to dt after a failed step
    pub cutback: f64,
    pub min_dt: f64,
    pub max_dt: f64,
    /// Accepted steps between steady retries
    pub steps_per_attempt: usize,
}

impl Default for TimeStepConfig {
    fn default() -> Self {
        Self {
            initial_dt: 1e-4,
            growth: 2.0,
            cutback: 0.5,
            min_dt: 1e-10,
            max_dt: 1e4,
            steps_per_attempt: 10,
        }
    }
}

/// Configuration for a full steady solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveConfig {
    pub newton: NewtonConfig,
    pub time_step: TimeStepConfig,
    /// Steady attempts, each followed by a round of time steps on failure
    pub max_attempts: usize,
    /// Evaluate domains in parallel during Jacobian assembly
    pub parallel: bool,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            newton: NewtonConfig::default(),
            time_step: TimeStepConfig::default(),
            max_attempts: 20,
            parallel: true,
        }
    }
}

impl SolveConfig {

    pub fn validate(&self) -> SolverResult<()> {
        let ts = &self.time_step;
        let checks = [
            (
                self.newton.max_iterations > 0,
                "newton.max_iterations must be positive",
            ),
            (self.newton.abs_tol > 0.0, "newton.abs_tol must be positive"),
            (
                self.newton.line_search_beta > 0.0 && self.newton.line_search_beta < 1.0,
                "newton.line_search_beta must lie in (0, 1)",
            ),
            (self.newton.fd_epsilon > 0.0, "newton.fd_epsilon must be positive"),
            (
                ts.min_dt > 0.0 && ts.min_dt <= ts.initial_dt,
                "time_step.min_dt must be in (0, initial_dt]",
            ),
            (ts.initial_dt <= ts.max_dt, "time_step.initial_dt exceeds max_dt"),
            (ts.growth >= 1.0, "time_step.growth must be at least 1"),
            (
                ts.cutback > 0.0 && ts.cutback < 1.0,
                "time_step.cutback must lie in (0, 1)",
            ),
            (
                ts.steps_per_attempt > 0,
                "time_step.steps_per_attempt must be positive",
            ),
            (self.max_attempts > 0, "max_attempts must be positive"),
        ];
        match checks.iter().find(|(ok, _)| !ok) {
            Some((_, what)) => Err(SolverError::InvalidArg {
                what: (*what).to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(SolveConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: SolveConfig =
            serde_json::from_str(r#"{"newton": {"max_iterations": 5}, "parallel": false}"#)
                .unwrap();
        assert_eq!(cfg.newton.max_iterations, 5);
        assert_eq!(cfg.newton.abs_tol, NewtonConfig::default().abs_tol);
        assert_eq!(cfg.max_attempts, 20);
        assert!(!cfg.parallel);
    }

    #[test]
    fn zero_attempts_rejected() {
        let cfg = SolveConfig {
            max_attempts: 0,
            ..SolveConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(SolverError::InvalidArg { .. })));
    }
}
