// TOML question bank format
//
//   [[questions]]
//   category = "Algebra"
//   text = "Solve x^2 = 4"
//   weight = "1.5"
//   type = "essay"      # optional
//   max_lines = 10      # optional

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

use super::{QuestionBank, QuestionDraft, DEFAULT_MAX_LINES, DEFAULT_QUESTION_TYPE};
use crate::error::BankError;

#[derive(Debug, Deserialize)]
struct BankFile {
    #[serde(default)]
    questions: Vec<QuestionRecord>,
}

#[derive(Debug, Deserialize)]
struct QuestionRecord {
    category: String,
    text: String,
    weight: Decimal,
    #[serde(default = "default_type", rename = "type")]
    question_type: String,
    #[serde(default = "default_max_lines")]
    max_lines: u32,
}

fn default_type() -> String {
    DEFAULT_QUESTION_TYPE.to_string()
}

fn default_max_lines() -> u32 {
    DEFAULT_MAX_LINES
}

impl From<QuestionRecord> for QuestionDraft {
    fn from(record: QuestionRecord) -> Self {
        QuestionDraft::new(record.category, record.text, record.weight)
            .with_type(record.question_type)
            .with_max_lines(record.max_lines)
    }
}

impl QuestionBank {
    pub fn from_toml_str(content: &str) -> Result<Self, BankError> {
        let file: BankFile = toml::from_str(content)?;
        Self::from_drafts(file.questions.into_iter().map(QuestionDraft::from))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, BankError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn loads_questions_with_defaults() {
        let bank = QuestionBank::from_toml_str(
            r#"
            [[questions]]
            category = "Algebra"
            text = "Solve x"
            weight = "1.5"

            [[questions]]
            category = "Geometry"
            text = "Draw a square"
            weight = 2
            type = "shortanswer"
            max_lines = 3
            "#,
        )
        .unwrap();

        assert_eq!(bank.len(), 2);
        let algebra = bank.category("Algebra").unwrap();
        let solve = bank.questions_in_category(algebra).next().unwrap();
        assert_eq!(solve.weight(), Decimal::from_str("1.5").unwrap());
        assert_eq!(solve.question_type(), "essay");
        assert_eq!(solve.max_lines(), 15);

        let geometry = bank.category("Geometry").unwrap();
        let square = bank.questions_in_category(geometry).next().unwrap();
        assert_eq!(square.question_type(), "shortanswer");
        assert_eq!(square.max_lines(), 3);
    }

    #[test]
    fn empty_file_is_an_empty_bank() {
        let bank = QuestionBank::from_toml_str("").unwrap();
        assert!(bank.is_empty());
    }

    #[test]
    fn malformed_file_is_a_toml_error() {
        let result = QuestionBank::from_toml_str("[[questions]]\ncategory = 3");
        assert!(matches!(result, Err(BankError::Toml(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = QuestionBank::load("/nonexistent/bank.toml");
        assert!(matches!(result, Err(BankError::Io(_))));
    }
}
