//! Finite-difference Jacobian of a chain residual.
//!
//! Each global grid point is perturbed one variable at a time. Only the rows
//! the chain reports as touched by that point are read back, so boundary
//! domains far from the perturbation may skip their evaluation entirely.

use crate::error::{SolverError, SolverResult};
use fc_chain::{Chain, EvalRequest};
use nalgebra::DMatrix;
use rayon::prelude::*;
use tracing::debug;

/// Jacobian entries produced by perturbing one grid point: `(row, col, value)`.
type PointEntries = Vec<(usize, usize, f64)>;

/// Assembled Jacobian and its measured bandwidth.
#[derive(Debug, Clone)]
pub struct ChainJacobian {
    matrix: DMatrix<f64>,
    lower: usize,
    upper: usize,
}

impl ChainJacobian {
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    pub fn into_matrix(self) -> DMatrix<f64> {
        self.matrix
    }

    /// `(lower, upper)` bandwidth of the non-zero entries.
    pub fn bandwidth(&self) -> (usize, usize) {
        (self.lower, self.upper)
    }
}

/// Compute the Jacobian of the chain residual at `x` using forward finite
/// differences.
///
/// For each column j, perturbs x[j] by `epsilon * max(|x[j]|, 1)`.
pub fn chain_jacobian(
    chain: &Chain,
    x: &[f64],
    req: EvalRequest<'_>,
    epsilon: f64,
    parallel: bool,
) -> SolverResult<ChainJacobian> {
    let n = chain.size();
    let r0 = chain.residual(x, req)?;

    let perturb_point = |point: usize| -> SolverResult<PointEntries> {
        let columns = chain
            .layout()
            .point_rows(point)
            .ok_or_else(|| SolverError::Numeric {
                what: format!("grid point {point} outside layout"),
            })?;
        let touched = chain.rows_touched_by(point);
        let mut xp = x.to_vec();
        let mut rp = vec![0.0; n];
        let mut entries = Vec::new();

        for j in columns {
            let dx = epsilon * x[j].abs().max(1.0);
            xp[j] = x[j] + dx;
            chain.eval(&xp, &mut rp, req.at_point(point))?;
            xp[j] = x[j];

            for i in touched.clone() {
                let d = (rp[i] - r0[i]) / dx;
                if !d.is_finite() {
                    return Err(SolverError::Numeric {
                        what: format!(
                            "non-finite Jacobian entry at {} / {}",
                            chain.row_label(i).unwrap_or_default(),
                            chain.row_label(j).unwrap_or_default()
                        ),
                    });
                }
                if d != 0.0 {
                    entries.push((i, j, d));
                }
            }
        }
        Ok(entries)
    };

    let points = 0..chain.n_points();
    let per_point: Vec<PointEntries> = if parallel {
        points.into_par_iter().map(&perturb_point).collect::<SolverResult<_>>()?
    } else {
        points.map(&perturb_point).collect::<SolverResult<_>>()?
    };

    let mut matrix = DMatrix::zeros(n, n);
    let (mut lower, mut upper) = (0, 0);
    for (i, j, d) in per_point.into_iter().flatten() {
        matrix[(i, j)] = d;
        if i > j {
            lower = lower.max(i - j);
        } else {
            upper = upper.max(j - i);
        }
    }
    debug!(size = n, lower, upper, "assembled Jacobian");

    Ok(ChainJacobian {
        matrix,
        lower,
        upper,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc_chain::ChainBuilder;
    use fc_core::units::m;
    use fc_domains::{ConvectionColumn, Domain, FlowDomain, Inlet, Outlet};
    use fc_kinetics::{Species, SpeciesSet};

    fn burner(np: usize) -> (Chain, usize) {
        let gas = SpeciesSet::from_species(&[Species::CH4, Species::O2, Species::N2]);
        let col = ConvectionColumn::new("flame", gas, np, m(0.01)).unwrap();
        let nv = col.nv();
        let mut inlet = Domain::from(Inlet::new("fuel"));
        inlet.set_mdot(0.4).unwrap();
        inlet.set_mole_fractions("CH4:1, O2:2").unwrap();

        let mut builder = ChainBuilder::new();
        builder.push(inlet);
        builder.push_flow(col);
        builder.push(Outlet::new("exit"));
        let mut chain = builder.build().unwrap();
        chain.init().unwrap();
        (chain, nv)
    }

    fn trial_state(chain: &Chain) -> Vec<f64> {
        let mut x = chain.initial_solution().unwrap();
        for (i, v) in x.iter_mut().enumerate() {
            *v += 0.05 * ((i % 5) as f64);
        }
        x
    }

    #[test]
    fn banded_matches_dense() {
        let (chain, _) = burner(6);
        let x = trial_state(&chain);
        let req = EvalRequest::steady();
        let eps = 1e-7;
        let jac = chain_jacobian(&chain, &x, req, eps, false).unwrap();

        let r0 = chain.residual(&x, req).unwrap();
        for j in 0..x.len() {
            let mut xp = x.clone();
            let dx = eps * x[j].abs().max(1.0);
            xp[j] += dx;
            let rp = chain.residual(&xp, req).unwrap();
            for i in 0..x.len() {
                let dense = (rp[i] - r0[i]) / dx;
                let banded = jac.matrix()[(i, j)];
                assert!(
                    (dense - banded).abs() <= 1e-6 * (1.0 + dense.abs()),
                    "J[{i},{j}]: dense {dense} vs banded {banded}"
                );
            }
        }
    }

    #[test]
    fn bandwidth_spans_neighbouring_points() {
        let (chain, nv) = burner(8);
        let x = trial_state(&chain);
        let jac = chain_jacobian(&chain, &x, EvalRequest::steady(), 1e-7, false).unwrap();
        let (lower, upper) = jac.bandwidth();
        assert!(lower > 0 && upper > 0);
        assert!(lower < 3 * nv, "lower bandwidth {lower}");
        assert!(upper < 3 * nv, "upper bandwidth {upper}");
    }

    #[test]
    fn parallel_assembly_matches_serial() {
        let (chain, _) = burner(7);
        let x = trial_state(&chain);
        let prev = chain.initial_solution().unwrap();
        let req = EvalRequest::transient(20.0, &prev);
        let serial = chain_jacobian(&chain, &x, req, 1e-7, false).unwrap();
        let parallel = chain_jacobian(&chain, &x, req, 1e-7, true).unwrap();
        assert_eq!(serial.matrix(), parallel.matrix());
        assert_eq!(serial.bandwidth(), parallel.bandwidth());
    }
}
