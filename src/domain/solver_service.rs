// Domain service interface for deciding exam selection problems
// Defines the contract that any solver implementation must follow

use super::models::{ConstraintModel, Solution};

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Domain service interface for satisfiability backends
///
/// An unsatisfiable model is a regular `Ok` outcome with
/// [`SolutionStatus::Unsatisfiable`](super::SolutionStatus::Unsatisfiable);
/// `Err` is reserved for failures of the backend itself.
pub trait SolverService: Send + Sync {
    /// Find an assignment satisfying every constraint of the model
    fn solve(&self, model: &ConstraintModel) -> Result<Solution>;

    /// Validate a model without solving it
    fn validate(&self, model: &ConstraintModel) -> Result<()> {
        let mut errors = Vec::new();

        let num_vars = model.num_variables();
        if num_vars == 0 {
            errors.push("Model must have at least one variable".to_string());
        }

        for (i, constraint) in model.constraints().iter().enumerate() {
            if constraint.num_variables() != num_vars {
                errors.push(format!(
                    "Constraint {} '{}' has {} coefficients but model has {} variables",
                    i,
                    constraint.name,
                    constraint.num_variables(),
                    num_vars
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;
}

/// Reject an assignment the backend claims satisfies the model but does not
pub(crate) fn verify_assignment(
    solver: &str,
    model: &ConstraintModel,
    assignment: &[bool],
) -> Result<()> {
    if assignment.len() != model.num_variables() {
        return Err(SolverError::ExecutionFailed(format!(
            "{} returned {} values for {} variables",
            solver,
            assignment.len(),
            model.num_variables()
        )));
    }
    if let Some(violated) = model.violated_by(assignment).next() {
        return Err(SolverError::ExecutionFailed(format!(
            "{} returned an assignment violating {}",
            solver, violated
        )));
    }
    Ok(())
}
