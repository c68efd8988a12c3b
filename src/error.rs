// Error types for bank construction and exam generation

use rust_decimal::Decimal;
use thiserror::Error;

use crate::bank::Category;
use crate::domain::SolverError;

/// Errors raised while building or loading a question bank.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("category name is empty")]
    EmptyCategoryName,

    #[error("question {index} in category '{category}' has non-positive weight {weight}")]
    NonPositiveWeight {
        index: usize,
        category: String,
        weight: Decimal,
    },

    #[error("category '{0}' not found")]
    UnknownCategory(String),

    #[error("question '{0}' not found")]
    UnknownQuestion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Errors raised while building an exam model or enumerating exams.
///
/// Running out of exams is not an error: the generator simply ends.
#[derive(Debug, Error)]
pub enum ExamError {
    #[error("at least one target category is required")]
    NoTargetCategories,

    #[error("category '{0}' not found")]
    UnknownCategory(String),

    #[error("category '{0}' has no questions")]
    EmptyCategory(Category),

    #[error("category '{0}' has no weight")]
    WeightlessCategory(Category),

    #[error("total weight must be positive, got {0}")]
    NonPositiveTotal(Decimal),

    #[error("weights cannot be represented exactly: {0}")]
    WeightOverflow(String),

    #[error("time limit reached after {produced} exams")]
    TimeLimitReached { produced: usize },

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Bank(#[from] BankError),
}

impl ExamError {
    /// Returns `true` if the error stems from invalid input rather than
    /// from the solver.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ExamError::NoTargetCategories
                | ExamError::UnknownCategory(_)
                | ExamError::EmptyCategory(_)
                | ExamError::WeightlessCategory(_)
                | ExamError::NonPositiveTotal(_)
                | ExamError::Bank(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ExamError>;
