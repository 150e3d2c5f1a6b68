//! Error types for the tutoring core.

use std::time::Duration;

use thiserror::Error;

/// Errors surfaced to the caller of a session operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TutorError {
    /// The submitted value is not a finite number.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("hint level must be 1, 2 or 3, got {0}")]
    InvalidHintLevel(u8),

    /// The current problem was already checked; request the next one.
    #[error("the current problem has already been answered")]
    AlreadyAnswered,

    #[error("invalid problem: {0}")]
    InvalidProblem(String),
}

/// Failures of the misconception oracle. None of these is fatal to a round.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OracleError {
    #[error("oracle unavailable: {0}")]
    Unavailable(String),

    #[error("oracle did not answer within {0:?}")]
    Timeout(Duration),

    /// The rule file could not be read or parsed.
    #[error("rule file error: {0}")]
    RuleFile(String),
}
