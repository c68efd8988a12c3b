// HiGHS Solver Adapter
// Implements the SolverService interface for HiGHS
// This is an adapter pattern - translates our constraint model to HiGHS API

use crate::domain::{
    models::{ConstraintModel, Solution, SolverStatistics},
    solver_service::{verify_assignment, Result, SolverError, SolverService},
    value_objects::{ConstraintType, SolutionStatus},
};
use std::time::Instant;
use tracing::debug;

use super::{check_exact_coefficients, round_binary};

pub struct HighsSolver {
    time_limit: Option<f64>,
    verbose: bool,
}

impl HighsSolver {
    pub fn new() -> Self {
        Self {
            time_limit: None,
            verbose: false,
        }
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, model: &ConstraintModel) -> Result<Solution> {
        // Validate first
        self.validate(model)?;
        check_exact_coefficients(model)?;

        let start_time = Instant::now();

        // Use HiGHS RowProblem (add variables first, then constraints)
        use highs::{HighsModelStatus, RowProblem, Sense};

        let mut pb = RowProblem::default();

        // Feasibility only: every column has a zero objective coefficient
        let cols: Vec<_> = model
            .variables()
            .iter()
            .map(|_| pb.add_integer_column(0.0, 0.0..=1.0))
            .collect();

        for constraint in model.constraints() {
            let terms: Vec<_> = constraint
                .terms()
                .map(|(i, coeff)| (cols[i], coeff as f64))
                .collect();
            let bound = constraint.bound as f64;

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    pb.add_row(..=bound, &terms);
                }
                ConstraintType::Equal => {
                    pb.add_row(bound..=bound, &terms);
                }
                ConstraintType::GreaterThanOrEqual => {
                    pb.add_row(bound.., &terms);
                }
            }
        }

        let mut highs_model = pb.optimise(Sense::Minimise);
        if !self.verbose {
            highs_model.make_quiet();
        }
        if let Some(limit) = self.time_limit {
            highs_model.set_option("time_limit", limit);
        }

        let solved = highs_model.solve();
        let solve_time = start_time.elapsed().as_secs_f64() * 1000.0;

        let statistics = SolverStatistics {
            nodes_explored: 0,
            solve_time_ms: solve_time,
            num_variables: model.num_variables() as u32,
            num_constraints: model.num_constraints() as u32,
        };
        debug!(time_ms = solve_time, status = ?solved.status(), "HiGHS finished");

        match solved.status() {
            HighsModelStatus::Optimal => {
                let solution_data = solved.get_solution();
                let assignment = round_binary(solution_data.columns());
                verify_assignment(self.name(), model, &assignment)?;
                Ok(Solution::satisfiable(assignment).with_statistics(statistics))
            }
            HighsModelStatus::Infeasible => {
                Ok(Solution::unsatisfiable().with_statistics(statistics))
            }
            HighsModelStatus::ReachedTimeLimit => Ok(Solution::new(
                SolutionStatus::TimeLimit,
                "HiGHS reached its time limit",
            )
            .with_statistics(statistics)),
            status => Err(SolverError::ExecutionFailed(format!(
                "HiGHS solver returned status: {:?}",
                status
            ))),
        }
    }

    fn name(&self) -> &str {
        "HiGHS"
    }
}
