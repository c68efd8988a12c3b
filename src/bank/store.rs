use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;

use super::{Category, IdGenerator, Question, QuestionDraft, QuestionId};
use crate::error::BankError;

/// Catalog of questions grouped by category.
///
/// Ids are unique across the bank and every weight is positive; both are
/// checked once at construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionBank {
    by_category: BTreeMap<Category, Vec<QuestionId>>,
    by_id: BTreeMap<QuestionId, Question>,
}

impl QuestionBank {
    /// Build a bank, assigning ids per category in iteration order.
    pub fn from_drafts(
        drafts: impl IntoIterator<Item = QuestionDraft>,
    ) -> Result<Self, BankError> {
        let mut ids = IdGenerator::new();
        let mut bank = Self::default();

        for (index, draft) in drafts.into_iter().enumerate() {
            if draft.category.is_empty() {
                return Err(BankError::EmptyCategoryName);
            }
            if draft.weight <= Decimal::ZERO {
                return Err(BankError::NonPositiveWeight {
                    index,
                    category: draft.category.to_string(),
                    weight: draft.weight,
                });
            }

            let id = ids.id_for(&draft.category);
            bank.by_category
                .entry(draft.category.clone())
                .or_default()
                .push(id.clone());
            bank.by_id.insert(id.clone(), Question::from_draft(id, draft));
        }

        Ok(bank)
    }

    /// Categories sorted by name
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.by_category.keys()
    }

    /// All questions sorted by id
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.by_id.values()
    }

    /// Resolve a category name to the bank's category
    pub fn category(&self, name: &str) -> Result<&Category, BankError> {
        let wanted = Category::new(name);
        self.by_category
            .get_key_value(&wanted)
            .map(|(category, _)| category)
            .ok_or_else(|| BankError::UnknownCategory(wanted.to_string()))
    }

    pub fn contains_category(&self, category: &Category) -> bool {
        self.by_category.contains_key(category)
    }

    pub fn question(&self, id: &QuestionId) -> Result<&Question, BankError> {
        self.by_id
            .get(id)
            .ok_or_else(|| BankError::UnknownQuestion(id.to_string()))
    }

    /// Questions of one category sorted by id; empty for unknown categories
    pub fn questions_in_category<'a>(
        &'a self,
        category: &Category,
    ) -> impl Iterator<Item = &'a Question> + 'a {
        self.by_category
            .get(category)
            .into_iter()
            .flatten()
            .filter_map(|id| self.by_id.get(id))
    }

    pub fn category_size(&self, category: &Category) -> usize {
        self.by_category.get(category).map_or(0, Vec::len)
    }

    pub fn category_weight(&self, category: &Category) -> Decimal {
        self.questions_in_category(category).map(Question::weight).sum()
    }

    pub fn total_weight(&self) -> Decimal {
        self.by_id.values().map(Question::weight).sum()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl fmt::Display for QuestionBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "# {} questions, total weight: {:.2}",
            self.len(),
            self.total_weight()
        )?;
        for category in self.categories() {
            writeln!(
                f,
                "## {} ({} questions, total weight: {:.2})",
                category,
                self.category_size(category),
                self.category_weight(category)
            )?;
            for question in self.questions_in_category(category) {
                writeln!(
                    f,
                    "- {} ({:.2}): {}",
                    question.id(),
                    question.weight(),
                    question.text()
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(category: &str, text: &str, weight: i64) -> QuestionDraft {
        QuestionDraft::new(category, text, Decimal::from(weight))
    }

    fn sample() -> QuestionBank {
        QuestionBank::from_drafts([
            draft("Algebra", "Solve x", 3),
            draft("Geometry", "Area of a circle", 2),
            draft("Algebra", "Factor y", 4),
        ])
        .unwrap()
    }

    #[test]
    fn groups_questions_by_category() {
        let bank = sample();
        let algebra = bank.category("Algebra").unwrap().clone();
        assert_eq!(bank.len(), 3);
        assert_eq!(bank.category_size(&algebra), 2);
        assert_eq!(bank.category_weight(&algebra), Decimal::from(7));
        assert_eq!(bank.total_weight(), Decimal::from(9));

        let ids: Vec<String> = bank
            .questions_in_category(&algebra)
            .map(|q| q.id().to_string())
            .collect();
        assert_eq!(ids, ["Algebra-1", "Algebra-2"]);
    }

    #[test]
    fn category_lookup_normalizes_names() {
        let bank = sample();
        assert!(bank.category(" Geo metry ").is_ok());
        assert!(matches!(
            bank.category("Calculus"),
            Err(BankError::UnknownCategory(name)) if name == "Calculus"
        ));
    }

    #[test]
    fn rejects_non_positive_weights() {
        let result = QuestionBank::from_drafts([draft("Algebra", "Free points", 0)]);
        assert!(matches!(result, Err(BankError::NonPositiveWeight { index: 0, .. })));
    }

    #[test]
    fn rejects_blank_categories() {
        let result = QuestionBank::from_drafts([draft("  ", "Orphan", 1)]);
        assert!(matches!(result, Err(BankError::EmptyCategoryName)));
    }

    #[test]
    fn same_input_yields_same_ids() {
        assert_eq!(sample(), sample());
    }

    #[test]
    fn summary_lists_every_question() {
        let text = sample().to_string();
        assert!(text.starts_with("# 3 questions, total weight: 9.00"));
        assert!(text.contains("## Algebra (2 questions, total weight: 7.00)"));
        assert!(text.contains("- Geometry-1 (2.00): Area of a circle"));
    }
}
