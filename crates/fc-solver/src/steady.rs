//! Newton on a chain residual and the converged steady solution.

use crate::config::SolveConfig;
use crate::error::SolverResult;
use crate::jacobian::chain_jacobian;
use crate::newton::{NewtonResult, newton_solve};
use fc_chain::{Chain, EvalRequest};
use fc_core::DomainId;
use nalgebra::{DMatrix, DVector};

/// Solution state for a steady chain.
#[derive(Clone, Debug)]
pub struct SteadySolution {
    /// Full solution vector in layout order
    pub x: Vec<f64>,
    /// Residual norm at convergence
    pub residual_norm: f64,
    /// Newton iterations, including those spent in pseudo-time steps
    pub newton_iterations: usize,
    /// Accepted pseudo-time steps
    pub time_steps: usize,
    /// Steady Newton attempts
    pub attempts: usize,
}

impl SteadySolution {
    /// Value of `component` at local `point` of domain `id`.
    pub fn value(
        &self,
        chain: &Chain,
        id: DomainId,
        point: usize,
        component: usize,
    ) -> Option<f64> {
        let ext = chain.layout().extent(id)?;
        if point >= ext.np || component >= ext.nv {
            return None;
        }
        self.x.get(ext.index(point, component)).copied()
    }

    /// Column of `component` over all points of domain `id`.
    pub fn profile(&self, chain: &Chain, id: DomainId, component: usize) -> Option<Vec<f64>> {
        let ext = chain.layout().extent(id)?;
        (0..ext.np)
            .map(|j| self.value(chain, id, j, component))
            .collect()
    }
}

/// Run the damped Newton solver on the chain residual selected by `req`,
/// starting from `x0`.
pub fn chain_newton(
    chain: &Chain,
    x0: &[f64],
    req: EvalRequest<'_>,
    config: &SolveConfig,
) -> SolverResult<NewtonResult> {
    let bounds = chain.bounds()?;
    let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
        Ok(DVector::from_vec(chain.residual(x.as_slice(), req)?))
    };
    let jacobian = |x: &DVector<f64>| -> SolverResult<DMatrix<f64>> {
        let jac = chain_jacobian(
            chain,
            x.as_slice(),
            req,
            config.newton.fd_epsilon,
            config.parallel,
        )?;
        Ok(jac.into_matrix())
    };
    newton_solve(
        DVector::from_column_slice(x0),
        &bounds,
        residual,
        jacobian,
        &config.newton,
    )
}
