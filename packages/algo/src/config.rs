use serde::{Deserialize, Serialize};

use crate::types::{
    DEFAULT_ANSWER_TOLERANCE, DEFAULT_INITIAL_MASTERY, DEFAULT_MASTERY_DECAY, DEFAULT_MASTERY_GAIN,
    DEFAULT_SELECTION_EPSILON,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasteryConfig {
    pub initial: f64,
    pub gain: f64,
    pub decay: f64,
    pub epsilon: f64,
}

impl Default for MasteryConfig {
    fn default() -> Self {
        Self {
            initial: DEFAULT_INITIAL_MASTERY,
            gain: DEFAULT_MASTERY_GAIN,
            decay: DEFAULT_MASTERY_DECAY,
            epsilon: DEFAULT_SELECTION_EPSILON,
        }
    }
}

impl MasteryConfig {
    /// Pull values back into ranges that keep mastery inside [0, 1] and
    /// selection weights finite. Out-of-range values fall back to defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            initial: valid_or(self.initial, defaults.initial, |v| (0.0..=1.0).contains(&v)),
            gain: valid_or(self.gain, defaults.gain, |v| (0.0..=1.0).contains(&v)),
            decay: valid_or(self.decay, defaults.decay, |v| v > 0.0 && v < 1.0),
            epsilon: valid_or(self.epsilon, defaults.epsilon, |v| v > 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorConfig {
    pub mastery: MasteryConfig,
    pub tolerance: f64,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            mastery: MasteryConfig::default(),
            tolerance: DEFAULT_ANSWER_TOLERANCE,
        }
    }
}

impl TutorConfig {
    pub fn sanitized(self) -> Self {
        Self {
            mastery: self.mastery.sanitized(),
            tolerance: valid_or(self.tolerance, DEFAULT_ANSWER_TOLERANCE, |v| v > 0.0),
        }
    }
}

fn valid_or(value: f64, fallback: f64, ok: impl Fn(f64) -> bool) -> f64 {
    if value.is_finite() && ok(value) {
        value
    } else {
        fallback
    }
}
