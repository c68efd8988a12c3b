// Backtracking Solver
// Implements the SolverService interface with a depth-first search over 0/1
// assignments, pruned by bound propagation on every linear constraint

use crate::domain::{
    models::{ConstraintModel, Solution, SolverStatistics},
    solver_service::{verify_assignment, Result, SolverService},
    value_objects::{ConstraintType, SolutionStatus},
};
use std::time::{Duration, Instant};
use tracing::debug;

pub struct BacktrackingSolver {
    time_limit: Option<Duration>,
}

impl BacktrackingSolver {
    pub fn new() -> Self {
        Self { time_limit: None }
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

impl Default for BacktrackingSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for BacktrackingSolver {
    fn solve(&self, model: &ConstraintModel) -> Result<Solution> {
        self.validate(model)?;

        let start_time = Instant::now();
        let deadline = self.time_limit.and_then(|limit| start_time.checked_add(limit));
        let mut search = Search::new(model, deadline);
        let outcome = search.run();
        let solve_time = start_time.elapsed().as_secs_f64() * 1000.0;

        let statistics = SolverStatistics {
            nodes_explored: search.nodes,
            solve_time_ms: solve_time,
            num_variables: model.num_variables() as u32,
            num_constraints: model.num_constraints() as u32,
        };
        debug!(
            nodes = search.nodes,
            time_ms = solve_time,
            "backtracking search finished"
        );

        let solution = match outcome {
            Outcome::Found => {
                let assignment: Vec<bool> =
                    search.values.iter().map(|v| *v == Some(true)).collect();
                verify_assignment(self.name(), model, &assignment)?;
                Solution::satisfiable(assignment)
            }
            Outcome::Exhausted => Solution::unsatisfiable(),
            Outcome::TimedOut => Solution::new(
                SolutionStatus::TimeLimit,
                "Time limit reached before the search finished",
            ),
        };

        Ok(solution.with_statistics(statistics))
    }

    fn name(&self) -> &str {
        "Backtracking"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Found,
    Exhausted,
    TimedOut,
}

/// Bounds of one constraint's activity under the current partial assignment.
///
/// `fixed` sums coefficients of variables set to 1; `free_pos` and
/// `free_neg` sum the positive and negative coefficients of unassigned
/// variables, so the activity ranges over `[fixed + free_neg, fixed + free_pos]`.
#[derive(Debug, Clone)]
struct Row {
    constraint_type: ConstraintType,
    bound: i128,
    terms: Vec<(usize, i128)>,
    fixed: i128,
    free_pos: i128,
    free_neg: i128,
    /// No integer activity can meet the bound
    infeasible: bool,
}

impl Row {
    /// Row with coefficients and bound divided by the gcd of the coefficients.
    ///
    /// An equality whose bound is not a multiple of that gcd can never hold,
    /// which interval bounds alone cannot detect.
    fn new(constraint_type: ConstraintType, terms: Vec<(usize, i128)>, bound: i128) -> Self {
        let divisor = terms.iter().fold(0, |g, &(_, c)| gcd(g, c.abs()));
        let (terms, bound, infeasible) = if divisor > 1 {
            let terms: Vec<_> = terms.into_iter().map(|(i, c)| (i, c / divisor)).collect();
            match constraint_type {
                ConstraintType::Equal => (
                    terms,
                    bound.div_euclid(divisor),
                    bound.rem_euclid(divisor) != 0,
                ),
                // floor for an upper bound
                ConstraintType::LessThanOrEqual => (terms, bound.div_euclid(divisor), false),
                // ceiling for a lower bound
                ConstraintType::GreaterThanOrEqual => {
                    (terms, -(-bound).div_euclid(divisor), false)
                }
            }
        } else {
            (terms, bound, false)
        };

        Self {
            constraint_type,
            bound,
            free_pos: terms.iter().map(|&(_, c)| c.max(0)).sum(),
            free_neg: terms.iter().map(|&(_, c)| c.min(0)).sum(),
            fixed: 0,
            terms,
            infeasible,
        }
    }

    fn min(&self) -> i128 {
        self.fixed + self.free_neg
    }

    fn max(&self) -> i128 {
        self.fixed + self.free_pos
    }

    fn needs_upper(&self) -> bool {
        matches!(
            self.constraint_type,
            ConstraintType::LessThanOrEqual | ConstraintType::Equal
        )
    }

    fn needs_lower(&self) -> bool {
        matches!(
            self.constraint_type,
            ConstraintType::GreaterThanOrEqual | ConstraintType::Equal
        )
    }

    fn is_violated(&self) -> bool {
        self.infeasible
            || (self.needs_upper() && self.min() > self.bound)
            || (self.needs_lower() && self.max() < self.bound)
    }

    /// Value a free variable with coefficient `coeff` is forced to, if any
    fn forced_value(&self, coeff: i128) -> Option<bool> {
        // Activity range after fixing the variable to 1 or to 0.
        let (min_one, max_one, min_zero, max_zero) = if coeff > 0 {
            (self.min() + coeff, self.max(), self.min(), self.max() - coeff)
        } else {
            (self.min(), self.max() + coeff, self.min() - coeff, self.max())
        };
        let fits = |lo: i128, hi: i128| {
            !(self.needs_upper() && lo > self.bound) && !(self.needs_lower() && hi < self.bound)
        };
        match (fits(min_one, max_one), fits(min_zero, max_zero)) {
            (true, false) => Some(true),
            (false, true) => Some(false),
            _ => None,
        }
    }
}

struct Search {
    rows: Vec<Row>,
    /// Row indices and coefficients each variable occurs in
    occurrences: Vec<Vec<(usize, i128)>>,
    values: Vec<Option<bool>>,
    trail: Vec<usize>,
    deadline: Option<Instant>,
    nodes: u64,
}

impl Search {
    fn new(model: &ConstraintModel, deadline: Option<Instant>) -> Self {
        let num_vars = model.num_variables();
        let mut occurrences = vec![Vec::new(); num_vars];
        let rows: Vec<Row> = model
            .constraints()
            .iter()
            .map(|constraint| {
                let terms: Vec<(usize, i128)> = constraint
                    .terms()
                    .map(|(i, c)| (i, c as i128))
                    .collect();
                Row::new(constraint.constraint_type, terms, constraint.bound as i128)
            })
            .collect();

        for (r, row) in rows.iter().enumerate() {
            for &(i, c) in &row.terms {
                occurrences[i].push((r, c));
            }
        }

        Self {
            rows,
            occurrences,
            values: vec![None; num_vars],
            trail: Vec::new(),
            deadline,
            nodes: 0,
        }
    }

    fn run(&mut self) -> Outcome {
        self.descend()
    }

    fn descend(&mut self) -> Outcome {
        self.nodes += 1;
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Outcome::TimedOut;
        }

        let mark = self.trail.len();
        if !self.propagate() {
            self.undo(mark);
            return Outcome::Exhausted;
        }

        let Some(var) = self.values.iter().position(Option::is_none) else {
            return Outcome::Found;
        };

        for value in [true, false] {
            let branch = self.trail.len();
            self.assign(var, value);
            match self.descend() {
                Outcome::Exhausted => self.undo(branch),
                other => return other,
            }
        }

        self.undo(mark);
        Outcome::Exhausted
    }

    /// Apply forced assignments until fixpoint; `false` on conflict
    fn propagate(&mut self) -> bool {
        loop {
            let mut changed = false;
            for r in 0..self.rows.len() {
                if self.rows[r].is_violated() {
                    return false;
                }
                let forced: Vec<(usize, bool)> = self.rows[r]
                    .terms
                    .iter()
                    .filter(|&&(i, _)| self.values[i].is_none())
                    .filter_map(|&(i, c)| self.rows[r].forced_value(c).map(|v| (i, v)))
                    .collect();
                for (var, value) in forced {
                    match self.values[var] {
                        None => {
                            self.assign(var, value);
                            changed = true;
                        }
                        Some(current) if current != value => return false,
                        Some(_) => {}
                    }
                }
                if self.rows[r].is_violated() {
                    return false;
                }
            }
            if !changed {
                return true;
            }
        }
    }

    fn assign(&mut self, var: usize, value: bool) {
        self.values[var] = Some(value);
        self.trail.push(var);
        for &(r, c) in &self.occurrences[var] {
            let row = &mut self.rows[r];
            if c > 0 {
                row.free_pos -= c;
            } else {
                row.free_neg -= c;
            }
            if value {
                row.fixed += c;
            }
        }
    }

    fn undo(&mut self, mark: usize) {
        while self.trail.len() > mark {
            let Some(var) = self.trail.pop() else { break };
            let value = self.values[var].take() == Some(true);
            for &(r, c) in &self.occurrences[var] {
                let row = &mut self.rows[r];
                if c > 0 {
                    row.free_pos += c;
                } else {
                    row.free_neg += c;
                }
                if value {
                    row.fixed -= c;
                }
            }
        }
    }
}

fn gcd(mut a: i128, mut b: i128) -> i128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
