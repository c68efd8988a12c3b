// Exam generation: model building, enumeration and results

pub mod builder;
pub mod generator;
pub mod result;

pub use builder::build_model;
pub use generator::{ExamGenerator, GeneratorState};
pub use result::{Exam, WEIGHT_TOLERANCE};
