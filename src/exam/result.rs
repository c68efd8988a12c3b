use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::fmt;

use crate::bank::{Category, Question, QuestionId};
use crate::error::{ExamError, Result};

/// Largest deviation between an exam's weight sum and its total after
/// rescaling by a factor without a finite decimal expansion.
pub const WEIGHT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 9);

/// One generated exam: the selected questions, ordered by id.
///
/// Questions are copies of the bank's, so rescaling an exam leaves the
/// bank untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Exam {
    questions: Vec<Question>,
    total_weight: Decimal,
}

impl Exam {
    pub(crate) fn from_questions(mut questions: Vec<Question>, total_weight: Decimal) -> Self {
        questions.sort_by(|a, b| a.id().cmp(b.id()));
        questions.dedup_by(|a, b| a.id() == b.id());
        Self {
            questions,
            total_weight,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn ids(&self) -> impl Iterator<Item = &QuestionId> {
        self.questions.iter().map(Question::id)
    }

    pub fn id_set(&self) -> BTreeSet<QuestionId> {
        self.ids().cloned().collect()
    }

    pub fn contains(&self, id: &QuestionId) -> bool {
        self.questions
            .binary_search_by(|q| q.id().cmp(id))
            .is_ok()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Total the exam is graded on
    pub fn total_weight(&self) -> Decimal {
        self.total_weight
    }

    /// Sum of the member weights as currently stored
    pub fn weight_sum(&self) -> Decimal {
        self.questions.iter().map(Question::weight).sum()
    }

    pub fn categories(&self) -> BTreeSet<&Category> {
        self.questions.iter().map(Question::category).collect()
    }

    pub fn covers(&self, category: &Category) -> bool {
        self.questions.iter().any(|q| q.category() == category)
    }

    pub fn questions_in_category<'a>(
        &'a self,
        category: &'a Category,
    ) -> impl Iterator<Item = &'a Question> + 'a {
        self.questions
            .iter()
            .filter(move |q| q.category() == category)
    }

    /// Scale every weight by the same factor so they sum to `total`.
    ///
    /// Membership never changes. On error the exam is left as it was.
    pub fn rescale(&mut self, total: Decimal) -> Result<()> {
        if total <= Decimal::ZERO {
            return Err(ExamError::NonPositiveTotal(total));
        }
        let current = self.weight_sum();
        if total == current {
            self.total_weight = total;
            return Ok(());
        }

        let factor = total
            .checked_div(current)
            .ok_or_else(|| ExamError::WeightOverflow(format!("{total} / {current}")))?;
        let mut scaled = self.questions.clone();
        for question in &mut scaled {
            question.scale_weight(factor).ok_or_else(|| {
                ExamError::WeightOverflow(format!("{} * {}", question.weight(), factor))
            })?;
        }

        self.questions = scaled;
        self.total_weight = total;
        Ok(())
    }
}

impl fmt::Display for Exam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "# {} questions, total weight: {:.2}",
            self.len(),
            self.weight_sum()
        )?;
        for category in self.categories() {
            let members: Vec<_> = self.questions_in_category(category).collect();
            let weight: Decimal = members.iter().map(|q| q.weight()).sum();
            writeln!(
                f,
                "## {} ({} questions, total weight: {:.2})",
                category,
                members.len(),
                weight
            )?;
            for question in members {
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
    use crate::bank::{QuestionBank, QuestionDraft};

    fn exam(weights: &[i64]) -> Exam {
        let bank = QuestionBank::from_drafts(
            weights
                .iter()
                .enumerate()
                .map(|(i, &w)| QuestionDraft::new("T", format!("q{i}"), Decimal::from(w))),
        )
        .unwrap();
        let total = bank.total_weight();
        Exam::from_questions(bank.questions().cloned().collect(), total)
    }

    #[test]
    fn rescale_preserves_ratios() {
        let mut e = exam(&[3, 3, 2]);
        e.rescale(Decimal::from(16)).unwrap();
        let weights: Vec<Decimal> = e.questions().iter().map(|q| q.weight()).collect();
        assert_eq!(weights, vec![Decimal::from(6), Decimal::from(6), Decimal::from(4)]);
        assert_eq!(e.total_weight(), Decimal::from(16));
    }

    #[test]
    fn rescale_by_repeating_factor_stays_within_tolerance() {
        let mut e = exam(&[3, 3, 2, 1]);
        e.rescale(Decimal::from(10)).unwrap();
        assert!((e.weight_sum() - Decimal::from(10)).abs() <= WEIGHT_TOLERANCE);
    }

    #[test]
    fn rescale_to_current_total_is_a_no_op() {
        let mut e = exam(&[5, 5]);
        let before = e.clone();
        e.rescale(Decimal::from(10)).unwrap();
        assert_eq!(e, before);
    }

    #[test]
    fn rescale_rejects_non_positive_totals() {
        let mut e = exam(&[5, 5]);
        assert!(matches!(
            e.rescale(Decimal::ZERO),
            Err(ExamError::NonPositiveTotal(_))
        ));
        assert_eq!(e.weight_sum(), Decimal::from(10));
    }

    #[test]
    fn contains_only_selected_questions() {
        let e = Exam::from_questions(
            exam(&[3, 2, 4]).questions()[1..].to_vec(),
            Decimal::from(6),
        );
        let id = |seq| QuestionId::new(Category::new("T"), seq);
        assert!(!e.contains(&id(1)));
        assert!(e.contains(&id(2)));
        assert!(e.contains(&id(3)));
        assert!(!e.contains(&id(4)));
        assert!(!e.contains(&QuestionId::new(Category::new("U"), 2)));
    }

    #[test]
    fn summary_groups_by_category() {
        let text = exam(&[3, 2]).to_string();
        assert!(text.starts_with("# 2 questions, total weight: 5.00"));
        assert!(text.contains("## T (2 questions, total weight: 5.00)"));
        assert!(text.contains("- T-2 (2.00): q1"));
    }
}
