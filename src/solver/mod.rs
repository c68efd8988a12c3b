// Solver adapters module

pub mod backtracking_solver;
#[cfg(feature = "ilp")]
pub mod coin_cbc_solver;
pub mod factory;
#[cfg(feature = "ilp")]
pub mod highs_solver;

pub use backtracking_solver::BacktrackingSolver;
#[cfg(feature = "ilp")]
pub use coin_cbc_solver::CoinCbcSolver;
pub use factory::SolverFactory;
#[cfg(feature = "ilp")]
pub use highs_solver::HighsSolver;

#[cfg(feature = "ilp")]
use crate::domain::{ConstraintModel, SolverError};

/// Largest magnitude an f64 holds without losing integer precision
#[cfg(feature = "ilp")]
const MAX_EXACT_F64: i64 = 1 << 53;

/// MIP backends work in f64; refuse models whose integers would be rounded.
#[cfg(feature = "ilp")]
fn check_exact_coefficients(model: &ConstraintModel) -> Result<(), SolverError> {
    let inexact = model.constraints().iter().find(|c| {
        c.bound.abs() > MAX_EXACT_F64 || c.coefficients.iter().any(|x| x.abs() > MAX_EXACT_F64)
    });
    match inexact {
        Some(c) => Err(SolverError::InvalidProblem(format!(
            "constraint '{}' has coefficients too large for floating point",
            c.name
        ))),
        None => Ok(()),
    }
}

#[cfg(feature = "ilp")]
fn round_binary(values: &[f64]) -> Vec<bool> {
    values.iter().map(|&v| v > 0.5).collect()
}
