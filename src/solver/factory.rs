use crate::domain::{
    models::SolverConfig,
    solver_service::{Result, SolverService},
    value_objects::SolverBackend,
};
use crate::solver::BacktrackingSolver;
use std::time::Duration;

#[cfg(feature = "ilp")]
use crate::solver::{CoinCbcSolver, HighsSolver};
#[cfg(not(feature = "ilp"))]
use crate::domain::solver_service::SolverError;

/// Factory for creating solver instances based on configuration
pub struct SolverFactory;

impl SolverFactory {
    /// Create a solver for the configured backend
    pub fn create(config: &SolverConfig) -> Result<Box<dyn SolverService>> {
        match config.backend {
            SolverBackend::Auto => Self::create(&SolverConfig {
                backend: Self::preferred_backend(),
                ..config.clone()
            }),
            SolverBackend::Backtracking => {
                let mut solver = BacktrackingSolver::new();
                if let Some(limit) = config.time_limit {
                    let limit =
                        Duration::try_from_secs_f64(limit.max(0.0)).unwrap_or(Duration::MAX);
                    solver = solver.with_time_limit(limit);
                }
                Ok(Box::new(solver))
            }
            SolverBackend::Highs | SolverBackend::CoinCbc => Self::create_ilp(config),
        }
    }

    #[cfg(feature = "ilp")]
    fn create_ilp(config: &SolverConfig) -> Result<Box<dyn SolverService>> {
        if config.backend == SolverBackend::CoinCbc {
            let mut solver = CoinCbcSolver::new().with_verbose(config.verbose);
            if let Some(limit) = config.time_limit {
                solver = solver.with_time_limit(limit);
            }
            Ok(Box::new(solver))
        } else {
            let mut solver = HighsSolver::new().with_verbose(config.verbose);
            if let Some(limit) = config.time_limit {
                solver = solver.with_time_limit(limit);
            }
            Ok(Box::new(solver))
        }
    }

    #[cfg(not(feature = "ilp"))]
    fn create_ilp(config: &SolverConfig) -> Result<Box<dyn SolverService>> {
        Err(SolverError::SolverNotAvailable(format!(
            "{} requires the `ilp` feature",
            config.backend
        )))
    }

    /// Backend `Auto` resolves to
    pub fn preferred_backend() -> SolverBackend {
        if cfg!(feature = "ilp") {
            SolverBackend::Highs
        } else {
            SolverBackend::Backtracking
        }
    }

    /// Concrete backends compiled into this build
    pub fn available_backends() -> Vec<SolverBackend> {
        let mut backends = vec![SolverBackend::Backtracking];
        if cfg!(feature = "ilp") {
            backends.push(SolverBackend::Highs);
            backends.push(SolverBackend::CoinCbc);
        }
        backends
    }

    /// Get the default solver
    pub fn default_solver() -> Box<dyn SolverService> {
        Box::new(BacktrackingSolver::new())
    }
}
