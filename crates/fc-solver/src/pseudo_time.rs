//! Backward-Euler pseudo-time stepping.
//!
//! Each step solves the transient residual with `rdt = 1/dt` against the
//! previous accepted state. Accepted steps grow `dt`; failed ones cut it
//! back and retry from the same state.

use crate::config::SolveConfig;
use crate::error::{SolverError, SolverResult};
use crate::steady::chain_newton;
use fc_chain::{Chain, EvalRequest};
use tracing::debug;

/// Outcome of a run of pseudo-time steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeStepReport {
    pub accepted: usize,
    pub rejected: usize,
    pub newton_iterations: usize,
    /// Step size to use next
    pub dt: f64,
}

/// Take `steps` accepted pseudo-time steps from `x`, starting with step
/// size `dt`. On return `x` holds the last accepted state.
pub fn advance(
    chain: &Chain,
    x: &mut [f64],
    dt: f64,
    steps: usize,
    config: &SolveConfig,
) -> SolverResult<TimeStepReport> {
    let ts = &config.time_step;
    let mut report = TimeStepReport {
        accepted: 0,
        rejected: 0,
        newton_iterations: 0,
        dt,
    };

    while report.accepted < steps {
        let prev = x.to_vec();
        let req = EvalRequest::transient(1.0 / report.dt, &prev);
        match chain_newton(chain, &prev, req, config) {
            Ok(result) => {
                x.copy_from_slice(result.x.as_slice());
                report.accepted += 1;
                report.newton_iterations += result.iterations;
                debug!(
                    step = report.accepted,
                    dt = report.dt,
                    residual = result.residual_norm,
                    "pseudo-time step accepted"
                );
                report.dt = (report.dt * ts.growth).min(ts.max_dt);
            }
            Err(e) if e.is_recoverable() => {
                report.rejected += 1;
                report.dt *= ts.cutback;
                debug!(dt = report.dt, error = %e, "pseudo-time step rejected");
                if report.dt < ts.min_dt {
                    return Err(SolverError::ConvergenceFailed {
                        what: format!("time step fell below {:e} s", ts.min_dt),
                    });
                }
            }
            Err(e) => return Err(e),
        }
    }
    Ok(report)
}
