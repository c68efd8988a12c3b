use examgen::{
    Category, Decimal, EnumerationMode, Exam, ExamConfig, ExamError, ExamGenerator, GeneratorState,
    QuestionBank, QuestionDraft, SolverBackend, SolverConfig, SolverFactory,
};
use std::collections::BTreeSet;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn bank(questions: &[(&str, &str)]) -> QuestionBank {
    QuestionBank::from_drafts(
        questions
            .iter()
            .enumerate()
            .map(|(i, (category, weight))| {
                QuestionDraft::new(*category, format!("question {}", i + 1), d(weight))
            }),
    )
    .unwrap()
}

fn generator<'a>(
    bank: &'a QuestionBank,
    targets: &[&str],
    total: &str,
    mode: EnumerationMode,
    backend: SolverBackend,
) -> ExamGenerator<'a> {
    let targets: Vec<Category> = targets.iter().map(|&c| Category::new(c)).collect();
    let solver = SolverFactory::create(&SolverConfig::default().with_backend(backend)).unwrap();
    ExamGenerator::new(bank, &targets, d(total), mode, solver).unwrap()
}

fn ids(exam: &Exam) -> BTreeSet<String> {
    exam.ids().map(|id| id.to_string()).collect()
}

#[test]
fn only_solution_is_the_whole_bank() {
    init_tracing();
    let bank = bank(&[("A", "3"), ("A", "3"), ("B", "2")]);

    for backend in SolverFactory::available_backends() {
        let mut gen = generator(&bank, &["A", "B"], "8", EnumerationMode::Distinct, backend);
        let exam = gen.next_exam().unwrap().expect("one exam exists");
        assert_eq!(ids(&exam), BTreeSet::from(["A-1".into(), "A-2".into(), "B-1".into()]));
        assert_eq!(exam.weight_sum(), d("8"));
        assert!(gen.next_exam().unwrap().is_none(), "{backend}");
        assert_eq!(gen.state(), GeneratorState::Exhausted);
    }
}

#[test]
fn unreachable_total_yields_nothing() {
    init_tracing();
    let bank = bank(&[("A", "3"), ("A", "3"), ("B", "2")]);

    for backend in SolverFactory::available_backends() {
        let mut gen = generator(&bank, &["A", "B"], "1", EnumerationMode::Distinct, backend);
        assert!(gen.next_exam().unwrap().is_none(), "{backend}");
        assert_eq!(gen.produced(), 0);
        assert_eq!(gen.state(), GeneratorState::Exhausted);
    }
}

#[test]
fn disjoint_mode_stops_when_no_question_is_left() {
    init_tracing();
    let bank = bank(&[("A", "5"), ("B", "5")]);

    for backend in SolverFactory::available_backends() {
        let exams: Vec<Exam> =
            generator(&bank, &["A", "B"], "10", EnumerationMode::Disjoint, backend)
                .collect::<Result<_, _>>()
                .unwrap();
        assert_eq!(exams.len(), 1, "{backend}");
        assert_eq!(ids(&exams[0]), BTreeSet::from(["A-1".into(), "B-1".into()]));
    }
}

#[test]
fn distinct_mode_enumerates_every_combination() {
    init_tracing();
    // A: 2, 2, 1   B: 1, 2   total 4 with A and B covered
    let bank = bank(&[("A", "2"), ("A", "2"), ("A", "1"), ("B", "1"), ("B", "2")]);
    let expected: BTreeSet<BTreeSet<String>> = [
        vec!["A-1", "B-2"],
        vec!["A-2", "B-2"],
        vec!["A-1", "A-3", "B-1"],
        vec!["A-2", "A-3", "B-1"],
        vec!["A-3", "B-1", "B-2"],
    ]
    .into_iter()
    .map(|exam| exam.into_iter().map(String::from).collect())
    .collect();

    for backend in SolverFactory::available_backends() {
        let found: BTreeSet<BTreeSet<String>> =
            generator(&bank, &["A", "B"], "4", EnumerationMode::Distinct, backend)
                .map(|exam| ids(&exam.unwrap()))
                .collect();
        assert_eq!(found, expected, "{backend}");
    }
}

#[test]
fn questions_outside_targets_can_pad_the_total() {
    init_tracing();
    let bank = bank(&[("A", "3"), ("C", "2")]);

    for backend in SolverFactory::available_backends() {
        let exams: Vec<Exam> = generator(&bank, &["A"], "5", EnumerationMode::Distinct, backend)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(exams.len(), 1);
        assert!(exams[0].covers(&Category::new("C")));
    }
}

#[test]
fn fractional_weights_sum_exactly() {
    init_tracing();
    let bank = bank(&[("A", "0.1"), ("A", "0.2"), ("B", "0.3"), ("B", "0.75")]);

    for backend in SolverFactory::available_backends() {
        let exams: Vec<Exam> =
            generator(&bank, &["A", "B"], "0.6", EnumerationMode::Distinct, backend)
                .collect::<Result<_, _>>()
                .unwrap();
        assert_eq!(exams.len(), 1, "{backend}");
        assert_eq!(exams[0].weight_sum(), d("0.6"));
    }
}

#[test]
fn odd_total_over_even_weights_is_exhausted_at_once() {
    init_tracing();
    let questions: Vec<(&str, &str)> = (0..26)
        .map(|i| (if i % 2 == 0 { "A" } else { "B" }, "2"))
        .collect();
    let bank = bank(&questions);
    let targets = [Category::new("A"), Category::new("B")];

    for backend in SolverFactory::available_backends() {
        let config = SolverConfig::default()
            .with_backend(backend)
            .with_time_limit(10.0);
        let solver = SolverFactory::create(&config).unwrap();
        let mut gen =
            ExamGenerator::new(&bank, &targets, d("27"), EnumerationMode::Distinct, solver)
                .unwrap();
        assert!(gen.next_exam().unwrap().is_none(), "{backend}");
        assert_eq!(gen.state(), GeneratorState::Exhausted);
    }
}

#[test]
fn generator_from_toml_config_and_bank() {
    init_tracing();
    let bank = QuestionBank::from_toml_str(
        r#"
        [[questions]]
        category = "Object Oriented"
        text = "Explain encapsulation"
        weight = 4

        [[questions]]
        category = "Object Oriented"
        text = "Explain polymorphism"
        weight = 4

        [[questions]]
        category = "Testing"
        text = "What is a mock?"
        weight = 2
        "#,
    )
    .unwrap();
    let config = ExamConfig::from_toml_str(
        r#"
        categories = ["Object Oriented", "Testing"]
        total_weight = 6
        max_grade = 30
        mode = "disjoint"

        [solver]
        backend = "backtracking"
        "#,
    )
    .unwrap();

    let mut gen = ExamGenerator::from_config(&bank, &config).unwrap();
    assert_eq!(gen.solver_name(), "Backtracking");

    let exam = gen.next_exam().unwrap().unwrap();
    assert_eq!(exam.len(), 2);
    assert_eq!(exam.total_weight(), d("30"));
    assert_eq!(exam.weight_sum(), d("30"));
    assert!(exam.to_string().contains("## ObjectOriented (1 questions, total weight: 20.00)"));

    // Testing-1 is used up, so no disjoint exam can cover Testing again
    assert!(gen.next_exam().unwrap().is_none());
}

#[test]
fn unknown_category_name_fails_before_solving() {
    let bank = bank(&[("A", "1")]);
    let config = ExamConfig::new(["Nope"]).with_total_weight(d("1"));
    let err = ExamGenerator::from_config(&bank, &config).err().unwrap();
    assert!(err.is_precondition());
    assert!(matches!(err, ExamError::UnknownCategory(name) if name == "Nope"));
}
