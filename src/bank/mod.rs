// Question bank: categories, questions and their catalog

pub mod category;
pub mod loader;
pub mod question;
pub mod store;

pub use category::Category;
pub use question::{
    IdGenerator, Question, QuestionDraft, QuestionId, DEFAULT_MAX_LINES, DEFAULT_QUESTION_TYPE,
};
pub use store::QuestionBank;
