//! Answer Evaluation
//!
//! Canonical area per shape and the value/unit comparison. Triangle, circle
//! and trapezium areas are rounded to two decimals; products of two sides are
//! left as computed.

use std::f64::consts::PI;

use crate::generator::round_to;
use crate::types::{Dimensions, EvaluationResult, Problem, SubmittedAnswer, DEFAULT_ANSWER_TOLERANCE};

/// Exact area the learner is expected to give, in the problem's area unit.
pub fn canonical_area(problem: &Problem) -> f64 {
    match *problem.dimensions() {
        Dimensions::Rectangle { length, width } => length * width,
        Dimensions::Square { length } => length * length,
        Dimensions::Parallelogram { base, height } => base * height,
        Dimensions::Triangle { base, height } => round_to(0.5 * base * height, 2),
        Dimensions::Circle { radius } => round_to(PI * radius.powi(2), 2),
        Dimensions::Trapezium { a, b, h } => round_to(0.5 * (a + b) * h, 2),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AnswerEvaluator {
    tolerance: f64,
}

impl Default for AnswerEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_ANSWER_TOLERANCE)
    }
}

impl AnswerEvaluator {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Score an answer. The misconception slot is left empty; diagnosis is the
    /// session's job.
    pub fn evaluate(&self, problem: &Problem, answer: &SubmittedAnswer) -> EvaluationResult {
        let expected = canonical_area(problem);
        EvaluationResult {
            value_correct: (answer.value - expected).abs() < self.tolerance,
            unit_correct: answer.unit == problem.canonical_area_unit(),
            misconception: None,
        }
    }
}
