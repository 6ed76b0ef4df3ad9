//! High-level solver interface.

use crate::config::SolveConfig;
use crate::error::{SolverError, SolverResult};
use crate::pseudo_time::advance;
use crate::steady::{SteadySolution, chain_newton};
use fc_chain::{Chain, ChainError, EvalRequest};
use tracing::{info, warn};

/// Solve a chain for its steady state.
///
/// This function:
/// 1. Initializes the chain if it changed since the last `init()`
/// 2. Starts from `initial_guess` or the domains' starting values
/// 3. Runs damped Newton on the steady residual
/// 4. On a recoverable failure takes a round of pseudo-time steps and
///    retries, up to `max_attempts` times
/// 5. Hands the converged solution to every domain through `finalize()`
pub fn solve(
    chain: &mut Chain,
    config: Option<SolveConfig>,
    initial_guess: Option<&[f64]>,
) -> SolverResult<SteadySolution> {
    let cfg = config.unwrap_or_default();
    cfg.validate()?;
    if !chain.is_initialized() {
        chain.init()?;
    }

    let mut x = match initial_guess {
        Some(guess) if guess.len() != chain.size() => {
            return Err(ChainError::LengthMismatch {
                what: "initial guess",
                expected: chain.size(),
                actual: guess.len(),
            }
            .into());
        }
        Some(guess) => guess.to_vec(),
        None => chain.initial_solution()?,
    };

    let mut dt = cfg.time_step.initial_dt;
    let mut newton_iterations = 0;
    let mut time_steps = 0;

    for attempt in 1..=cfg.max_attempts {
        match chain_newton(chain, &x, EvalRequest::steady(), &cfg) {
            Ok(result) => {
                newton_iterations += result.iterations;
                x.copy_from_slice(result.x.as_slice());
                chain.finalize(&x)?;
                info!(
                    attempt,
                    newton_iterations,
                    time_steps,
                    residual = result.residual_norm,
                    "steady solution converged"
                );
                return Ok(SteadySolution {
                    x,
                    residual_norm: result.residual_norm,
                    newton_iterations,
                    time_steps,
                    attempts: attempt,
                });
            }
            Err(e) if e.is_recoverable() => {
                warn!(attempt, dt, error = %e, "steady Newton failed, taking pseudo-time steps");
                let report = advance(chain, &mut x, dt, cfg.time_step.steps_per_attempt, &cfg)?;
                time_steps += report.accepted;
                newton_iterations += report.newton_iterations;
                dt = report.dt;
            }
            Err(e) => return Err(e),
        }
    }

    Err(SolverError::ConvergenceFailed {
        what: format!(
            "no steady solution after {} attempts and {} time steps",
            cfg.max_attempts, time_steps
        ),
    })
}
