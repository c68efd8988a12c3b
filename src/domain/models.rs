use super::value_objects::{
    ConstraintType, EnumerationMode, SolutionStatus, SolverBackend, WeightScale,
};
use crate::bank::QuestionId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary decision variable: 1 when its question is part of the exam
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub question: QuestionId,
    pub name: String,
}

impl Variable {
    pub fn binary(question: QuestionId) -> Self {
        let name = question.to_string();
        Self { question, name }
    }
}

/// Linear constraint over the binary variables of a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub constraint_type: ConstraintType,
    pub coefficients: Vec<i64>,
    pub bound: i64,
    pub name: String,
}

impl Constraint {
    pub fn new(constraint_type: ConstraintType, coefficients: Vec<i64>, bound: i64) -> Self {
        Self {
            constraint_type,
            coefficients,
            bound,
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Σ x_i ≥ 1 over the given variable indices
    pub fn at_least_one(num_vars: usize, members: impl IntoIterator<Item = usize>) -> Self {
        let mut coefficients = vec![0; num_vars];
        for i in members {
            coefficients[i] = 1;
        }
        Self::new(ConstraintType::GreaterThanOrEqual, coefficients, 1)
    }

    /// Constraint that rules out `assignment` for the rest of an enumeration.
    ///
    /// `Distinct` forbids this exact assignment:
    /// Σ_{i∉S} x_i − Σ_{i∈S} x_i ≥ 1 − |S|.
    /// `Disjoint` forbids every selected variable: Σ_{i∈S} x_i ≤ 0.
    pub fn exclusion(assignment: &[bool], mode: EnumerationMode) -> Self {
        let selected = assignment.iter().filter(|&&x| x).count() as i64;
        match mode {
            EnumerationMode::Distinct => {
                let coefficients = assignment
                    .iter()
                    .map(|&x| if x { -1 } else { 1 })
                    .collect();
                Self::new(
                    ConstraintType::GreaterThanOrEqual,
                    coefficients,
                    1 - selected,
                )
            }
            EnumerationMode::Disjoint => {
                let coefficients = assignment.iter().map(|&x| i64::from(x)).collect();
                Self::new(ConstraintType::LessThanOrEqual, coefficients, 0)
            }
        }
    }

    pub fn num_variables(&self) -> usize {
        self.coefficients.len()
    }

    /// Non-zero `(variable index, coefficient)` pairs
    pub fn terms(&self) -> impl Iterator<Item = (usize, i64)> + '_ {
        self.coefficients
            .iter()
            .enumerate()
            .filter(|(_, &c)| c != 0)
            .map(|(i, &c)| (i, c))
    }

    pub fn activity(&self, assignment: &[bool]) -> i128 {
        self.terms()
            .filter(|&(i, _)| assignment.get(i).copied().unwrap_or(false))
            .map(|(_, c)| c as i128)
            .sum()
    }

    pub fn is_satisfied_by(&self, assignment: &[bool]) -> bool {
        self.constraint_type
            .holds(self.activity(assignment), self.bound as i128)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lhs = self
            .terms()
            .map(|(i, c)| format!("{c}*x{i}"))
            .collect::<Vec<_>>()
            .join(" + ");
        let lhs = if lhs.is_empty() { "0".to_string() } else { lhs };
        if self.name.is_empty() {
            write!(f, "{} {} {}", lhs, self.constraint_type, self.bound)
        } else {
            write!(
                f,
                "{}: {} {} {}",
                self.name, lhs, self.constraint_type, self.bound
            )
        }
    }
}

/// Configuration for the solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default)]
    pub backend: SolverBackend,
    /// Wall-clock limit per solve, in seconds
    #[serde(default)]
    pub time_limit: Option<f64>,
    #[serde(default)]
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::Auto,
            time_limit: None,
            verbose: false,
        }
    }
}

impl SolverConfig {
    pub fn with_backend(mut self, backend: SolverBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }
}

/// Exam selection problem: binary variables plus linear constraints.
///
/// Constraints are only ever appended, so the feasible region can only
/// shrink over the lifetime of a model.
#[derive(Debug, Clone)]
pub struct ConstraintModel {
    pub name: String,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    scale: WeightScale,
}

impl ConstraintModel {
    pub fn new(variables: Vec<Variable>, scale: WeightScale) -> Self {
        Self {
            name: String::new(),
            variables,
            constraints: Vec::new(),
            scale,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn add_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn push_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn scale(&self) -> WeightScale {
        self.scale
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Constraints the assignment violates (empty when it is a solution)
    pub fn violated_by<'a>(
        &'a self,
        assignment: &'a [bool],
    ) -> impl Iterator<Item = &'a Constraint> {
        self.constraints
            .iter()
            .filter(move |c| !c.is_satisfied_by(assignment))
    }

    pub fn is_satisfied_by(&self, assignment: &[bool]) -> bool {
        assignment.len() == self.variables.len() && self.violated_by(assignment).next().is_none()
    }
}

/// Statistics about the solve process
#[derive(Debug, Clone, Default)]
pub struct SolverStatistics {
    pub nodes_explored: u64,
    pub solve_time_ms: f64,
    pub num_variables: u32,
    pub num_constraints: u32,
}

/// Result of one solver run
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolutionStatus,
    pub assignment: Vec<bool>,
    pub message: String,
    pub statistics: SolverStatistics,
}

impl Solution {
    pub fn new(status: SolutionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            assignment: Vec::new(),
            message: message.into(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn satisfiable(assignment: Vec<bool>) -> Self {
        Self {
            status: SolutionStatus::Satisfiable,
            assignment,
            message: "Satisfying assignment found".to_string(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn unsatisfiable() -> Self {
        Self::new(
            SolutionStatus::Unsatisfiable,
            "Problem is infeasible: no assignment satisfies all constraints",
        )
    }

    pub fn with_statistics(mut self, statistics: SolverStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn is_satisfiable(&self) -> bool {
        self.status == SolutionStatus::Satisfiable
    }

    /// Indices of the variables set to 1
    pub fn selected(&self) -> impl Iterator<Item = usize> + '_ {
        self.assignment
            .iter()
            .enumerate()
            .filter(|(_, &x)| x)
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_exclusion_rejects_only_the_excluded_assignment() {
        let previous = [true, false, true];
        let c = Constraint::exclusion(&previous, EnumerationMode::Distinct);
        assert!(!c.is_satisfied_by(&previous));
        assert!(c.is_satisfied_by(&[true, true, true]));
        assert!(c.is_satisfied_by(&[true, false, false]));
        assert!(c.is_satisfied_by(&[false, false, false]));
    }

    #[test]
    fn disjoint_exclusion_rejects_any_reuse() {
        let previous = [true, false, true];
        let c = Constraint::exclusion(&previous, EnumerationMode::Disjoint);
        assert!(!c.is_satisfied_by(&previous));
        assert!(!c.is_satisfied_by(&[true, true, false]));
        assert!(c.is_satisfied_by(&[false, true, false]));
    }

    #[test]
    fn at_least_one_counts_members_only() {
        let c = Constraint::at_least_one(4, [1, 3]);
        assert!(!c.is_satisfied_by(&[true, false, true, false]));
        assert!(c.is_satisfied_by(&[false, false, false, true]));
    }

    #[test]
    fn display_lists_nonzero_terms() {
        let c = Constraint::new(ConstraintType::Equal, vec![3, 0, 2], 5).with_name("total");
        assert_eq!(c.to_string(), "total: 3*x0 + 2*x2 == 5");
    }
}
