use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt;

use super::Category;

pub const DEFAULT_QUESTION_TYPE: &str = "essay";
pub const DEFAULT_MAX_LINES: u32 = 15;

/// Identifier of a question: its category plus a 1-based sequence number.
///
/// Displayed as `<category>-<n>`. Ordering is by category, then number.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuestionId {
    category: Category,
    seq: u32,
}

impl QuestionId {
    pub fn new(category: Category, seq: u32) -> Self {
        Self { category, seq }
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn seq(&self) -> u32 {
        self.seq
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.category, self.seq)
    }
}

/// Hands out sequential ids per category.
///
/// Each bank construction owns its own generator, so loading the same
/// questions twice yields the same ids.
#[derive(Debug, Default)]
pub struct IdGenerator {
    counters: HashMap<Category, u32>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id_for(&mut self, category: &Category) -> QuestionId {
        let counter = self.counters.entry(category.clone()).or_insert(0);
        *counter += 1;
        QuestionId::new(category.clone(), *counter)
    }
}

/// Question data before an id has been assigned
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionDraft {
    pub category: Category,
    pub text: String,
    pub question_type: String,
    pub weight: Decimal,
    pub max_lines: u32,
}

impl QuestionDraft {
    pub fn new(category: impl Into<Category>, text: impl Into<String>, weight: Decimal) -> Self {
        Self {
            category: category.into(),
            text: text.into(),
            question_type: DEFAULT_QUESTION_TYPE.to_string(),
            weight,
            max_lines: DEFAULT_MAX_LINES,
        }
    }

    pub fn with_type(mut self, question_type: impl Into<String>) -> Self {
        self.question_type = question_type.into();
        self
    }

    pub fn with_max_lines(mut self, max_lines: u32) -> Self {
        self.max_lines = max_lines;
        self
    }
}

/// A question of the bank
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    id: QuestionId,
    text: String,
    question_type: String,
    weight: Decimal,
    max_lines: u32,
}

impl Question {
    pub(crate) fn from_draft(id: QuestionId, draft: QuestionDraft) -> Self {
        Self {
            id,
            text: draft.text,
            question_type: draft.question_type,
            weight: draft.weight,
            max_lines: draft.max_lines,
        }
    }

    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    pub fn category(&self) -> &Category {
        self.id.category()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn question_type(&self) -> &str {
        &self.question_type
    }

    pub fn weight(&self) -> Decimal {
        self.weight
    }

    pub fn max_lines(&self) -> u32 {
        self.max_lines
    }

    pub(crate) fn scale_weight(&mut self, factor: Decimal) -> Option<()> {
        self.weight = self.weight.checked_mul(factor)?;
        Some(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_per_category() {
        let mut ids = IdGenerator::new();
        let a = Category::new("A");
        let b = Category::new("B");
        assert_eq!(ids.id_for(&a).to_string(), "A-1");
        assert_eq!(ids.id_for(&b).to_string(), "B-1");
        assert_eq!(ids.id_for(&a).to_string(), "A-2");
    }

    #[test]
    fn ids_order_numerically_within_category() {
        let a = Category::new("A");
        assert!(QuestionId::new(a.clone(), 2) < QuestionId::new(a.clone(), 10));
        assert!(QuestionId::new(a, 10) < QuestionId::new(Category::new("B"), 1));
    }
}
