// Translation of a question bank into a constraint model

use rust_decimal::Decimal;
use std::collections::BTreeSet;
use tracing::debug;

use crate::bank::{Category, QuestionBank};
use crate::domain::{Constraint, ConstraintModel, ConstraintType, Variable, WeightScale};
use crate::error::{ExamError, Result};

/// Build the selection model for an exam.
///
/// Every question of the bank gets a binary variable, including questions
/// outside the target categories: they may pad the exam to the exact total.
/// Each target category must be covered by at least one selected question,
/// and the selected weights must sum to `total`.
pub fn build_model(
    bank: &QuestionBank,
    targets: &[Category],
    total: Decimal,
) -> Result<ConstraintModel> {
    if targets.is_empty() {
        return Err(ExamError::NoTargetCategories);
    }
    if total <= Decimal::ZERO {
        return Err(ExamError::NonPositiveTotal(total));
    }

    let targets: BTreeSet<&Category> = targets.iter().collect();
    for &category in &targets {
        if !bank.contains_category(category) {
            return Err(ExamError::UnknownCategory(category.to_string()));
        }
        if bank.category_size(category) == 0 {
            return Err(ExamError::EmptyCategory(category.clone()));
        }
        if bank.category_weight(category) <= Decimal::ZERO {
            return Err(ExamError::WeightlessCategory(category.clone()));
        }
    }

    let questions: Vec<_> = bank.questions().collect();
    let weights: Vec<Decimal> = questions.iter().map(|q| q.weight()).collect();
    let scale = WeightScale::covering(weights.iter().chain([&total]));

    let units = weights
        .iter()
        .map(|&w| {
            scale
                .to_units(w)
                .ok_or_else(|| ExamError::WeightOverflow(format!("weight {w}")))
        })
        .collect::<Result<Vec<i64>>>()?;
    let target_units = scale
        .to_units(total)
        .ok_or_else(|| ExamError::WeightOverflow(format!("total {total}")))?;

    let num_vars = questions.len();
    let variables = questions
        .iter()
        .map(|q| Variable::binary(q.id().clone()))
        .collect();
    let mut model = ConstraintModel::new(variables, scale).with_name("exam");

    for &category in &targets {
        let members = questions
            .iter()
            .enumerate()
            .filter(|(_, q)| q.category() == category)
            .map(|(i, _)| i);
        let coverage =
            Constraint::at_least_one(num_vars, members).with_name(format!("cover[{category}]"));
        debug!(constraint = %coverage, "coverage constraint");
        model.push_constraint(coverage);
    }

    let exact_sum = Constraint::new(ConstraintType::Equal, units, target_units)
        .with_name("total-weight");
    debug!(constraint = %exact_sum, scale = scale.decimals(), "exact-sum constraint");
    model.push_constraint(exact_sum);

    Ok(model)
}
