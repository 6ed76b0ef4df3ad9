//! Damped Newton solver with per-component bounds.

use crate::config::NewtonConfig;
use crate::error::{SolverError, SolverResult};
use fc_core::numeric::weighted_rms;
use fc_domains::ComponentBounds;
use nalgebra::{DMatrix, DVector};
use tracing::debug;

/// Pivots smaller than this fraction of the largest one mark the Jacobian
/// as singular.
const PIVOT_RTOL: f64 = 1e-13;

/// Newton iteration result.
#[derive(Debug, Clone)]
pub struct NewtonResult {
    /// Solution vector
    pub x: DVector<f64>,
    /// Final residual norm
    pub residual_norm: f64,
    /// Number of iterations
    pub iterations: usize,
    /// Converged flag
    pub converged: bool,
}

/// Largest fraction of `dx` that keeps every component inside its bounds.
pub fn bounded_step_fraction(
    x: &DVector<f64>,
    dx: &DVector<f64>,
    bounds: &[ComponentBounds],
) -> f64 {
    let mut alpha = 1.0_f64;
    for ((&xi, &di), b) in x.iter().zip(dx.iter()).zip(bounds) {
        let target = xi + di;
        if target > b.upper && di > 0.0 {
            alpha = alpha.min((b.upper - xi) / di);
        } else if target < b.lower && di < 0.0 {
            alpha = alpha.min((b.lower - xi) / di);
        }
    }
    alpha.max(0.0)
}

/// Weighted RMS size of a step; below 1 the step is within tolerance.
pub fn step_norm(x: &DVector<f64>, dx: &DVector<f64>, bounds: &[ComponentBounds]) -> f64 {
    let tols: Vec<_> = bounds.iter().map(ComponentBounds::tolerances).collect();
    weighted_rms(dx.as_slice(), x.as_slice(), &tols)
}

/// Solve `jac * dx = rhs` by LU, rejecting (near-)singular matrices.
pub fn solve_linear(jac: DMatrix<f64>, rhs: &DVector<f64>) -> SolverResult<DVector<f64>> {
    let lu = jac.lu();
    let pivots = lu.u().diagonal();
    let largest = pivots.amax();
    let smallest = pivots.iter().fold(f64::INFINITY, |m, p| m.min(p.abs()));
    if largest.is_nan() || largest <= 0.0 || smallest <= PIVOT_RTOL * largest {
        return Err(SolverError::Numeric {
            what: format!("singular Jacobian (pivot ratio {:e})", smallest / largest),
        });
    }
    lu.solve(rhs).ok_or_else(|| SolverError::Numeric {
        what: "Jacobian solve failed".to_string(),
    })
}

/// Newton solver with bounded steps and backtracking line search.
///
/// Each step is first shortened so no component leaves its bounds, then
/// halved until the residual norm decreases. Converges when the residual
/// norm falls below the absolute or relative tolerance, or when a full step
/// is smaller than the components' tolerances.
pub fn newton_solve<F, J>(
    x0: DVector<f64>,
    bounds: &[ComponentBounds],
    residual_fn: F,
    jacobian_fn: J,
    config: &NewtonConfig,
) -> SolverResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
    J: Fn(&DVector<f64>) -> SolverResult<DMatrix<f64>>,
{
    if bounds.len() != x0.len() {
        return Err(SolverError::InvalidArg {
            what: format!("{} bounds for {} unknowns", bounds.len(), x0.len()),
        });
    }

    let mut x = x0;
    let mut r = residual_fn(&x)?;
    let mut r_norm = r.norm();
    let r0_norm = r_norm;

    for iter in 0..config.max_iterations {
        // Check convergence
        if r_norm < config.abs_tol || r_norm < config.rel_tol * r0_norm {
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
                converged: true,
            });
        }

        // Solve J * dx = -r
        let jac = jacobian_fn(&x)?;
        let dx = solve_linear(jac, &(-&r))?;

        let mut alpha = bounded_step_fraction(&x, &dx, bounds);
        if alpha <= 0.0 {
            return Err(SolverError::ConvergenceFailed {
                what: format!("Newton step blocked by bounds at iteration {}", iter),
            });
        }

        let mut x_new = &x + alpha * &dx;
        let mut r_new = residual_fn(&x_new)?;
        let mut r_new_norm = r_new.norm();
        let mut backtracks = 0;
        while r_new_norm.is_nan() || r_new_norm >= r_norm {
            if backtracks == config.max_backtracks {
                return Err(SolverError::ConvergenceFailed {
                    what: format!("Line search stagnated at iteration {}", iter),
                });
            }
            alpha *= config.line_search_beta;
            x_new = &x + alpha * &dx;
            r_new = residual_fn(&x_new)?;
            r_new_norm = r_new.norm();
            backtracks += 1;
        }

        let negligible = alpha == 1.0 && step_norm(&x, &dx, bounds) < 1.0;
        debug!(
            iteration = iter,
            residual = r_new_norm,
            damping = alpha,
            backtracks,
            "newton step"
        );

        x = x_new;
        r = r_new;
        r_norm = r_new_norm;

        if negligible {
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter + 1,
                converged: true,
            });
        }
    }

    Err(SolverError::ConvergenceFailed {
        what: format!(
            "Maximum iterations {} reached, residual = {}",
            config.max_iterations, r_norm
        ),
    })
}
