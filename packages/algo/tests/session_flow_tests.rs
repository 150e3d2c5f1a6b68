//! End-to-end tests for the tutoring loop through the public crate API.

use std::sync::Arc;
use std::time::Duration;

use area_tutor_algo::oracle::MisconceptionOracle;
use area_tutor_algo::{
    canonical_area, hints, AnswerEvaluator, Dimensions, LengthUnit, MasteryState, MasteryTracker,
    NullOracle, OracleError, Problem, RuleBookOracle, Session, SessionPhase, Shape,
    SubmittedAnswer, TimeoutOracle, TutorConfig, TutorError,
};

const RULES: &str = r#"{
    "rules": [
        { "label": "Area_cannot_be_negative", "when": [{ "kind": "nonPositive" }] }
    ]
}"#;

struct HangingOracle;

impl MisconceptionOracle for HangingOracle {
    fn diagnose(&self, _shape: Shape, _value: f64) -> Result<Option<String>, OracleError> {
        std::thread::sleep(Duration::from_millis(400));
        Ok(Some("Never_seen".to_string()))
    }
}

fn answer_correctly(session: &mut Session) {
    let area = canonical_area(session.problem());
    let unit = session.problem().canonical_area_unit();
    let submission = session.submit_answer(area, unit).unwrap();
    assert!(submission.result.is_correct());
}

#[test]
fn test_three_correct_rectangle_answers_clamp_mastery() {
    let tracker = MasteryTracker::default();
    let evaluator = AnswerEvaluator::default();
    let mut state = MasteryState::default();

    let problem = Problem::new(
        Dimensions::Rectangle {
            length: 10.0,
            width: 5.0,
        },
        LengthUnit::Cm,
    )
    .unwrap();

    for _ in 0..3 {
        let result = evaluator.evaluate(&problem, &SubmittedAnswer::new(50.0, "cm²"));
        assert!(result.is_correct());
        tracker.record(&mut state, problem.shape(), true);
    }

    assert_eq!(state.get(Shape::Rectangle), 1.0);
    for shape in Shape::ALL.iter().filter(|&&s| s != Shape::Rectangle) {
        assert_eq!(state.get(*shape), 0.5);
    }
}

#[test]
fn test_many_rounds_keep_invariants() {
    let mut session = Session::with_seed(TutorConfig::default(), Arc::new(NullOracle), 2024);

    for round in 0..200 {
        assert_eq!(session.phase(), SessionPhase::AwaitingAnswer);
        if round % 3 == 0 {
            session.submit_answer(-5.0, "cm²").unwrap();
        } else {
            answer_correctly(&mut session);
        }
        assert_eq!(session.phase(), SessionPhase::Evaluated);
        session.request_next_problem();
    }

    let stats = session.stats();
    assert_eq!(stats.attempts, 200);
    assert_eq!(stats.correct, 133);
    assert_eq!(stats.problems_seen, 201);
    for (_, m) in session.mastery_snapshot() {
        assert!((0.0..=1.0).contains(&m));
    }
}

#[test]
fn test_seeded_sessions_are_reproducible() {
    let mut a = Session::with_seed(TutorConfig::default(), Arc::new(NullOracle), 99);
    let mut b = Session::with_seed(TutorConfig::default(), Arc::new(NullOracle), 99);

    for _ in 0..25 {
        assert_eq!(a.current_problem_text(), b.current_problem_text());
        answer_correctly(&mut a);
        answer_correctly(&mut b);
        a.request_next_problem();
        b.request_next_problem();
    }
    assert_eq!(a.mastery_snapshot(), b.mastery_snapshot());
}

#[test]
fn test_rulebook_oracle_diagnoses_negative_area() {
    let oracle = RuleBookOracle::from_json(RULES).unwrap();
    let mut session = Session::with_seed(TutorConfig::default(), Arc::new(oracle), 7);

    let submission = session.submit_answer(-3.0, "cm²").unwrap();
    assert_eq!(
        submission.result.misconception.as_deref(),
        Some("Area_cannot_be_negative")
    );
    assert_eq!(submission.feedback, "Common mistake: Area cannot be negative");
}

#[test]
fn test_oracle_timeout_falls_back_and_still_updates_mastery() {
    let oracle = TimeoutOracle::new(HangingOracle, Duration::from_millis(30));
    let mut session = Session::with_seed(TutorConfig::default(), Arc::new(oracle), 11);
    let shape = session.problem().shape();

    let submission = session.submit_answer(-1.0, "furlongs").unwrap();
    assert_eq!(submission.result.misconception, None);
    assert_eq!(submission.feedback, "Incorrect – wrong number and wrong unit");
    assert!((session.mastery().get(shape) - 0.44).abs() < 1e-12);
}

#[test]
fn test_custom_config_constants_apply() {
    let mut config = TutorConfig::default();
    config.mastery.gain = 0.5;
    config.mastery.initial = 0.2;
    let mut session = Session::with_seed(config, Arc::new(NullOracle), 3);
    let shape = session.problem().shape();

    answer_correctly(&mut session);
    assert!((session.mastery().get(shape) - 0.7).abs() < 1e-12);
}

#[test]
fn test_hint_tiers_for_circle() {
    let circle = Problem::new(Dimensions::Circle { radius: 5.0 }, LengthUnit::Cm).unwrap();
    assert_eq!(
        hints::hint(1, &circle).unwrap(),
        "Hint: What measurements do you need for this shape?"
    );
    assert_eq!(hints::hint(2, &circle).unwrap(), "Use π and square the radius");
    assert_eq!(hints::hint(3, &circle).unwrap(), "Worked example: π × 5² = 78.54 cm²");
    assert_eq!(hints::hint(0, &circle), Err(TutorError::InvalidHintLevel(0)));
}
