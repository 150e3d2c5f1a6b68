//! Misconception Oracle
//!
//! Boundary to the external rule evaluation that names a learner's mistake.
//! The core hands over the shape and the value that failed evaluation and
//! gets back at most one label. How the rules are represented is the
//! oracle's business.
//!
//! Implementations:
//! - [`NullOracle`] - no diagnosis service configured
//! - [`StaticOracle`] - fixed in-memory answers, for tests
//! - [`RuleBookOracle`] - ordered rules loaded from a JSON rule file
//! - [`TimeoutOracle`] - puts a deadline and a worker cap on any other oracle

mod rulebook;
mod timeout;

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::OracleError;
use crate::types::Shape;

pub use rulebook::{Rule, RuleBook, RuleBookOracle, ValueCondition};
pub use timeout::{TimeoutOracle, DEFAULT_MAX_IN_FLIGHT};

pub trait MisconceptionOracle: Send + Sync {
    /// Diagnose a wrong answer. `Ok(None)` means no rule fired.
    fn diagnose(&self, shape: Shape, value: f64) -> Result<Option<String>, OracleError>;
}

impl<T: MisconceptionOracle + ?Sized> MisconceptionOracle for Arc<T> {
    fn diagnose(&self, shape: Shape, value: f64) -> Result<Option<String>, OracleError> {
        (**self).diagnose(shape, value)
    }
}

impl<T: MisconceptionOracle + ?Sized> MisconceptionOracle for Box<T> {
    fn diagnose(&self, shape: Shape, value: f64) -> Result<Option<String>, OracleError> {
        (**self).diagnose(shape, value)
    }
}

/// Rule labels are identifiers (`Forgot_to_halve`); learners see words.
pub fn display_label(label: &str) -> String {
    label.replace('_', " ")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullOracle;

impl MisconceptionOracle for NullOracle {
    fn diagnose(&self, _shape: Shape, _value: f64) -> Result<Option<String>, OracleError> {
        Err(OracleError::Unavailable("no misconception oracle configured".to_string()))
    }
}

/// Deterministic oracle answering from a fixed table keyed by shape and the
/// exact submitted value.
#[derive(Debug, Clone, Default)]
pub struct StaticOracle {
    answers: HashMap<(Shape, u64), String>,
}

impl StaticOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, shape: Shape, value: f64, label: impl Into<String>) -> Self {
        self.answers.insert((shape, value.to_bits()), label.into());
        self
    }
}

impl MisconceptionOracle for StaticOracle {
    fn diagnose(&self, shape: Shape, value: f64) -> Result<Option<String>, OracleError> {
        Ok(self.answers.get(&(shape, value.to_bits())).cloned())
    }
}
