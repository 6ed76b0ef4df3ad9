//! Steady-state solver for one-dimensional domain chains.
//!
//! This crate drives a [`fc_chain::Chain`] residual to zero with a damped
//! Newton method on a finite-difference Jacobian. When Newton fails on the
//! steady residual the solver takes backward-Euler pseudo-time steps and
//! retries, then hands the converged state back to the domains.

pub mod config;
pub mod error;
pub mod jacobian;
pub mod newton;
pub mod pseudo_time;
pub mod solve;
pub mod steady;

pub use config::{NewtonConfig, SolveConfig, TimeStepConfig};
pub use error::{SolverError, SolverResult};
pub use jacobian::{ChainJacobian, chain_jacobian};
pub use newton::{NewtonResult, newton_solve};
pub use pseudo_time::{TimeStepReport, advance};
pub use solve::solve;
pub use steady::{SteadySolution, chain_newton};
