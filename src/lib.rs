// Question bank: categories, questions, loading
pub mod bank;

// Domain layer: constraint model, solver contract, value objects
pub mod domain;

// Exam generation: model building, enumeration, results
pub mod exam;

// Solver adapters: Concrete implementations of SolverService
pub mod solver;

pub mod config;
pub mod error;

// Re-export commonly used types
pub use rust_decimal::Decimal;

pub use bank::{Category, Question, QuestionBank, QuestionDraft, QuestionId};

pub use config::{ConfigError, ExamConfig};

pub use domain::{
    Constraint, ConstraintModel, ConstraintType, EnumerationMode, Solution, SolutionStatus,
    SolverBackend, SolverConfig, SolverError, SolverService, Variable, WeightScale,
};

pub use error::{BankError, ExamError};

pub use exam::{build_model, Exam, ExamGenerator, GeneratorState, WEIGHT_TOLERANCE};

pub use solver::{BacktrackingSolver, SolverFactory};

#[cfg(feature = "ilp")]
pub use solver::{CoinCbcSolver, HighsSolver};
