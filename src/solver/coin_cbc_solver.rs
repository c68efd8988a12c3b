use crate::domain::{
    models::{ConstraintModel, Solution, SolverStatistics},
    solver_service::{verify_assignment, Result, SolverError, SolverService},
    value_objects::{ConstraintType, SolutionStatus},
};
use good_lp::{
    solvers::coin_cbc, variable, variables, Expression, ResolutionError,
    Solution as GoodLpSolutionTrait, SolverModel, Variable as GoodLpVariable,
};
use std::time::{Duration, Instant};
use tracing::debug;

use super::{check_exact_coefficients, round_binary};

pub struct CoinCbcSolver {
    time_limit: Option<f64>,
    verbose: bool,
}

impl CoinCbcSolver {
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

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, model: &ConstraintModel) -> Result<Solution> {
        // Validate first
        self.validate(model)?;
        check_exact_coefficients(model)?;

        let start_time = Instant::now();

        let mut vars = variables!();
        let lp_variables: Vec<GoodLpVariable> = model
            .variables()
            .iter()
            .map(|v| vars.add(variable().binary().name(v.name.clone())))
            .collect();

        // Feasibility only
        let objective: Expression = 0.into();
        let mut lp_model = vars.minimise(objective).using(coin_cbc::coin_cbc);
        lp_model.set_parameter("log", if self.verbose { "1" } else { "0" });
        if let Some(limit) = self.time_limit {
            lp_model.set_parameter("sec", &limit.to_string());
        }

        for constraint in model.constraints() {
            let mut lhs: Expression = 0.into();
            for (i, coeff) in constraint.terms() {
                lhs += (coeff as f64) * lp_variables[i];
            }
            let bound = constraint.bound as f64;

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    lp_model = lp_model.with(lhs.leq(bound));
                }
                ConstraintType::Equal => {
                    lp_model = lp_model.with(lhs.eq(bound));
                }
                ConstraintType::GreaterThanOrEqual => {
                    lp_model = lp_model.with(lhs.geq(bound));
                }
            }
        }

        let solution_result = lp_model.solve();
        let elapsed = start_time.elapsed();
        let solve_time = elapsed.as_secs_f64() * 1000.0;

        let statistics = SolverStatistics {
            nodes_explored: 0,
            solve_time_ms: solve_time,
            num_variables: model.num_variables() as u32,
            num_constraints: model.num_constraints() as u32,
        };
        debug!(time_ms = solve_time, "COIN-OR CBC finished");

        let hit_limit = timed_out(self.time_limit, elapsed);

        match solution_result {
            Ok(sol) => {
                let values: Vec<f64> = lp_variables.iter().map(|&var| sol.value(var)).collect();
                let assignment = round_binary(&values);
                match verify_assignment(self.name(), model, &assignment) {
                    Ok(()) => Ok(Solution::satisfiable(assignment).with_statistics(statistics)),
                    // an interrupted run returns its incomplete incumbent
                    Err(e) if hit_limit => {
                        debug!(error = %e, "COIN-OR CBC stopped at its time limit");
                        Ok(time_limit_reached(statistics))
                    }
                    Err(e) => Err(e),
                }
            }
            Err(ResolutionError::Infeasible) => {
                Ok(Solution::unsatisfiable().with_statistics(statistics))
            }
            Err(e) if hit_limit => {
                debug!(error = ?e, "COIN-OR CBC stopped at its time limit");
                Ok(time_limit_reached(statistics))
            }
            Err(e) => Err(SolverError::ExecutionFailed(format!("{:?}", e))),
        }
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }
}

fn time_limit_reached(statistics: SolverStatistics) -> Solution {
    Solution::new(
        SolutionStatus::TimeLimit,
        "COIN-OR CBC reached its time limit",
    )
    .with_statistics(statistics)
}

fn timed_out(time_limit: Option<f64>, elapsed: Duration) -> bool {
    time_limit.is_some_and(|limit| elapsed.as_secs_f64() >= limit)
}
