//! Tutoring Session
//!
//! Drives one learner through the generate → answer → evaluate → update loop.
//!
//! States:
//! - `AwaitingAnswer`: a problem is on screen and has not been checked
//! - `Evaluated`: the problem was checked; only hints and "next" are allowed
//!
//! There is no terminal state. The session owns its mastery values, the
//! current problem and its random source; nothing is shared with other
//! sessions except the read-only oracle.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::TutorConfig;
use crate::error::{OracleError, TutorError};
use crate::evaluator::{canonical_area, AnswerEvaluator};
use crate::generator::ProblemGenerator;
use crate::hints;
use crate::mastery::{MasteryState, MasteryTracker};
use crate::oracle::{display_label, MisconceptionOracle, NullOracle};
use crate::sanitize;
use crate::types::{EvaluationResult, Problem, Shape, SubmittedAnswer};

pub const CORRECT_FEEDBACK: &str = "Correct! Well done!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    AwaitingAnswer,
    Evaluated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub problems_seen: u32,
    pub attempts: u32,
    pub correct: u32,
    pub hints_used: u32,
    pub skipped: u32,
}

impl SessionStats {
    pub fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.correct as f64 / self.attempts as f64
        }
    }
}

/// Everything the presentation layer needs after an answer is checked.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub shape: Shape,
    pub result: EvaluationResult,
    pub feedback: String,
    pub expected_area: f64,
    pub expected_unit: &'static str,
    pub mastery: f64,
}

pub struct Session<R = ChaCha8Rng> {
    tracker: MasteryTracker,
    generator: ProblemGenerator,
    evaluator: AnswerEvaluator,
    oracle: Arc<dyn MisconceptionOracle>,
    mastery: MasteryState,
    problem: Problem,
    phase: SessionPhase,
    stats: SessionStats,
    rng: R,
}

impl Session<ChaCha8Rng> {
    /// Session seeded from OS entropy.
    pub fn new(config: TutorConfig, oracle: Arc<dyn MisconceptionOracle>) -> Self {
        Self::with_rng(config, oracle, ChaCha8Rng::from_entropy())
    }

    pub fn with_seed(config: TutorConfig, oracle: Arc<dyn MisconceptionOracle>, seed: u64) -> Self {
        Self::with_rng(config, oracle, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(config: TutorConfig, oracle: Arc<dyn MisconceptionOracle>, mut rng: R) -> Self {
        let config = config.sanitized();
        let tracker = MasteryTracker::new(config.mastery);
        let generator = ProblemGenerator::new();
        let mastery = tracker.initial_state();
        let shape = tracker.select_shape(&mastery, &mut rng);
        let problem = generator.generate(shape, &mut rng);

        Self {
            tracker,
            generator,
            evaluator: AnswerEvaluator::new(config.tolerance),
            oracle,
            mastery,
            problem,
            phase: SessionPhase::AwaitingAnswer,
            stats: SessionStats {
                problems_seen: 1,
                ..SessionStats::default()
            },
            rng,
        }
    }

    /// Session without a diagnosis service; misses get the generic reason.
    pub fn without_oracle(config: TutorConfig, rng: R) -> Self {
        Self::with_rng(config, Arc::new(NullOracle), rng)
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn mastery(&self) -> &MasteryState {
        &self.mastery
    }

    pub fn current_problem_text(&self) -> String {
        self.problem.statement()
    }

    pub fn mastery_snapshot(&self) -> BTreeMap<Shape, f64> {
        self.mastery.snapshot()
    }

    /// Check an answer to the current problem and update mastery.
    pub fn submit_answer(&mut self, value: f64, unit: &str) -> Result<Submission, TutorError> {
        if self.phase == SessionPhase::Evaluated {
            return Err(TutorError::AlreadyAnswered);
        }
        let value = sanitize::validate_value(value)?;
        let answer = SubmittedAnswer::new(value, sanitize::normalize_unit(unit));

        let shape = self.problem.shape();
        let mut result = self.evaluator.evaluate(&self.problem, &answer);
        let correct = result.is_correct();

        if !correct {
            result.misconception = self.diagnose(shape, value);
        }
        let feedback = feedback_message(&result);
        let mastery = self.tracker.record(&mut self.mastery, shape, correct);

        self.stats.attempts += 1;
        if correct {
            self.stats.correct += 1;
        }
        self.phase = SessionPhase::Evaluated;

        tracing::info!(
            shape = %shape,
            value_correct = result.value_correct,
            unit_correct = result.unit_correct,
            misconception = result.misconception.as_deref().unwrap_or("-"),
            mastery,
            "answer evaluated"
        );

        Ok(Submission {
            shape,
            feedback,
            expected_area: canonical_area(&self.problem),
            expected_unit: self.problem.canonical_area_unit(),
            result,
            mastery,
        })
    }

    /// Parse raw text input and submit it. Unparsable input leaves the
    /// session untouched.
    pub fn submit_raw(&mut self, raw_value: &str, unit: &str) -> Result<Submission, TutorError> {
        let value = sanitize::parse_value(raw_value)?;
        self.submit_answer(value, unit)
    }

    pub fn request_hint(&mut self, level: u8) -> Result<String, TutorError> {
        let text = hints::hint(level, &self.problem)?;
        self.stats.hints_used += 1;
        Ok(text)
    }

    /// Replace the current problem. Moving on without answering counts as a
    /// skip and leaves mastery unchanged.
    pub fn request_next_problem(&mut self) -> &Problem {
        if self.phase == SessionPhase::AwaitingAnswer {
            self.stats.skipped += 1;
        }
        let shape = self.tracker.select_shape(&self.mastery, &mut self.rng);
        self.problem = self.generator.generate(shape, &mut self.rng);
        self.phase = SessionPhase::AwaitingAnswer;
        self.stats.problems_seen += 1;
        &self.problem
    }

    fn diagnose(&self, shape: Shape, value: f64) -> Option<String> {
        match self.oracle.diagnose(shape, value) {
            Ok(label) => label,
            Err(OracleError::Unavailable(reason)) => {
                tracing::debug!(shape = %shape, %reason, "misconception oracle unavailable");
                None
            }
            Err(err) => {
                tracing::warn!(shape = %shape, error = %err, "misconception diagnosis failed");
                None
            }
        }
    }
}

fn feedback_message(result: &EvaluationResult) -> String {
    if result.is_correct() {
        return CORRECT_FEEDBACK.to_string();
    }
    match &result.misconception {
        Some(label) => format!("Common mistake: {}", display_label(label)),
        None => format!(
            "Incorrect – {}",
            result.generic_reason().unwrap_or_default()
        ),
    }
}
