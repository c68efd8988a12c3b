// Pull-based enumeration of exams

use rust_decimal::Decimal;
use std::iter::FusedIterator;
use tracing::{debug, info, warn};

use super::{build_model, Exam};
use crate::bank::{Category, QuestionBank};
use crate::config::ExamConfig;
use crate::domain::{
    Constraint, ConstraintModel, EnumerationMode, Solution, SolutionStatus, SolverService,
};
use crate::error::{BankError, ExamError, Result};
use crate::solver::SolverFactory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    /// The next call runs the solver
    Ready,
    /// No further exam exists; terminal
    Exhausted,
}

/// Produces exams one at a time, each excluded from all later searches.
///
/// The generator owns its model and solver. Every yielded exam appends one
/// exclusion constraint, so no assignment is ever produced twice and the
/// enumeration ends after finitely many steps.
pub struct ExamGenerator<'bank> {
    bank: &'bank QuestionBank,
    model: ConstraintModel,
    solver: Box<dyn SolverService>,
    mode: EnumerationMode,
    target_total: Decimal,
    max_grade: Option<Decimal>,
    state: GeneratorState,
    produced: usize,
    halted: bool,
}

impl<'bank> ExamGenerator<'bank> {
    pub fn new(
        bank: &'bank QuestionBank,
        targets: &[Category],
        total: Decimal,
        mode: EnumerationMode,
        solver: Box<dyn SolverService>,
    ) -> Result<Self> {
        let model = build_model(bank, targets, total)?;
        info!(
            categories = ?targets.iter().map(Category::name).collect::<Vec<_>>(),
            %total,
            %mode,
            solver = solver.name(),
            "generating exams"
        );

        Ok(Self {
            bank,
            model,
            solver,
            mode,
            target_total: total,
            max_grade: None,
            state: GeneratorState::Ready,
            produced: 0,
            halted: false,
        })
    }

    /// Resolve the configured category names and solver, then build.
    pub fn from_config(bank: &'bank QuestionBank, config: &ExamConfig) -> Result<Self> {
        let targets = config
            .categories
            .iter()
            .map(|name| {
                bank.category(name).cloned().map_err(|e| match e {
                    BankError::UnknownCategory(name) => ExamError::UnknownCategory(name),
                    other => ExamError::Bank(other),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let solver = SolverFactory::create(&config.solver)?;

        Self::new(bank, &targets, config.total_weight, config.mode, solver)?
            .with_max_grade(config.max_grade)
    }

    /// Rescale every yielded exam to this total.
    ///
    /// Fails on a non-positive total before any solving happens.
    pub fn with_max_grade(mut self, max_grade: Option<Decimal>) -> Result<Self> {
        if let Some(max_grade) = max_grade.filter(|m| *m <= Decimal::ZERO) {
            return Err(ExamError::NonPositiveTotal(max_grade));
        }
        self.max_grade = max_grade;
        Ok(self)
    }

    /// Run one enumeration step.
    ///
    /// `Ok(None)` means no further exam exists. A time-limit stop is an
    /// error, since more exams may still exist.
    pub fn next_exam(&mut self) -> Result<Option<Exam>> {
        if self.state == GeneratorState::Exhausted {
            return Ok(None);
        }

        debug!(
            step = self.produced + 1,
            constraints = self.model.num_constraints(),
            "computing next exam"
        );
        let solution = self.solver.solve(&self.model)?;
        debug!(
            status = %solution.status,
            nodes = solution.statistics.nodes_explored,
            time_ms = solution.statistics.solve_time_ms,
            "solver returned"
        );

        match solution.status {
            SolutionStatus::Satisfiable => {
                // The assignment stays excluded even if conversion fails
                self.model.push_constraint(
                    Constraint::exclusion(&solution.assignment, self.mode)
                        .with_name(format!("exclude[{}]", self.produced + 1)),
                );
                self.produced += 1;
                let exam = self.to_exam(&solution)?;
                info!(
                    exam = self.produced,
                    questions = exam.len(),
                    "exam generated"
                );
                Ok(Some(exam))
            }
            SolutionStatus::Unsatisfiable => {
                self.state = GeneratorState::Exhausted;
                info!(produced = self.produced, "no more exams");
                Ok(None)
            }
            SolutionStatus::TimeLimit => {
                warn!(produced = self.produced, "solver hit its time limit");
                Err(ExamError::TimeLimitReached {
                    produced: self.produced,
                })
            }
        }
    }

    fn to_exam(&self, solution: &Solution) -> Result<Exam> {
        let questions = solution
            .selected()
            .map(|i| {
                let id = &self.model.variables()[i].question;
                self.bank.question(id).cloned()
            })
            .collect::<std::result::Result<Vec<_>, BankError>>()?;

        let mut exam = Exam::from_questions(questions, self.target_total);
        if let Some(max_grade) = self.max_grade {
            exam.rescale(max_grade)?;
        }
        Ok(exam)
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }

    /// Number of exams yielded so far
    pub fn produced(&self) -> usize {
        self.produced
    }

    pub fn mode(&self) -> EnumerationMode {
        self.mode
    }

    pub fn target_total(&self) -> Decimal {
        self.target_total
    }

    pub fn model(&self) -> &ConstraintModel {
        &self.model
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }
}

/// Ends after exhaustion, or right after yielding an error.
impl Iterator for ExamGenerator<'_> {
    type Item = Result<Exam>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted {
            return None;
        }
        let item = self.next_exam().transpose();
        if matches!(item, Some(Err(_))) {
            self.halted = true;
        }
        item
    }
}

impl FusedIterator for ExamGenerator<'_> {}
