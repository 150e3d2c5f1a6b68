//! Mastery Tracking
//!
//! Per-shape proficiency estimate and the item-selection policy built on it.
//!
//! Core principles:
//! - Every shape holds a mastery scalar in [0, 1], starting at the configured
//!   initial value
//! - A correct answer adds a fixed gain (clamped at 1.0); an incorrect answer
//!   multiplies by a decay factor below 1
//! - Selection weights each shape by `1 / (mastery + epsilon)`, so weaker
//!   shapes come up proportionally more often

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::MasteryConfig;
use crate::types::Shape;

/// Mastery values for one session, one entry per shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasteryState {
    values: BTreeMap<Shape, f64>,
}

impl MasteryState {
    pub fn new(initial: f64) -> Self {
        Self {
            values: Shape::ALL.iter().map(|&shape| (shape, initial)).collect(),
        }
    }

    pub fn get(&self, shape: Shape) -> f64 {
        self.values.get(&shape).copied().unwrap_or(0.0)
    }

    pub fn snapshot(&self) -> BTreeMap<Shape, f64> {
        self.values.clone()
    }

    /// Weakest shape, ties broken by shape order.
    pub fn weakest(&self) -> Shape {
        self.values
            .iter()
            .fold((Shape::Rectangle, f64::INFINITY), |best, (&shape, &m)| {
                if m < best.1 {
                    (shape, m)
                } else {
                    best
                }
            })
            .0
    }

    fn set(&mut self, shape: Shape, value: f64) {
        self.values.insert(shape, value);
    }
}

impl Default for MasteryState {
    fn default() -> Self {
        Self::new(MasteryConfig::default().initial)
    }
}

/// Selection and update policy. Stateless apart from its constants; the
/// mastery values live in a session-owned [`MasteryState`].
#[derive(Debug, Clone, Default)]
pub struct MasteryTracker {
    config: MasteryConfig,
}

impl MasteryTracker {
    pub fn new(config: MasteryConfig) -> Self {
        Self {
            config: config.sanitized(),
        }
    }

    pub fn config(&self) -> &MasteryConfig {
        &self.config
    }

    pub fn initial_state(&self) -> MasteryState {
        MasteryState::new(self.config.initial)
    }

    /// Selection weight of each shape, in shape order.
    pub fn weights(&self, state: &MasteryState) -> Vec<(Shape, f64)> {
        Shape::ALL
            .iter()
            .map(|&shape| (shape, 1.0 / (state.get(shape) + self.config.epsilon)))
            .collect()
    }

    /// Draw the next shape to practise, weighted toward low mastery.
    pub fn select_shape<R: Rng>(&self, state: &MasteryState, rng: &mut R) -> Shape {
        let weights = self.weights(state);
        match weights.choose_weighted(rng, |&(_, weight)| weight) {
            Ok(&(shape, _)) => shape,
            // Only reachable with a non-finite weight from a hand-built state.
            Err(err) => {
                tracing::warn!(error = %err, "shape weights rejected, using weakest shape");
                state.weakest()
            }
        }
    }

    /// Returns the new mastery value.
    pub fn record_correct(&self, state: &mut MasteryState, shape: Shape) -> f64 {
        let updated = (state.get(shape) + self.config.gain).min(1.0);
        state.set(shape, updated);
        tracing::debug!(shape = %shape, mastery = updated, "mastery increased");
        updated
    }

    /// Returns the new mastery value.
    pub fn record_incorrect(&self, state: &mut MasteryState, shape: Shape) -> f64 {
        let updated = state.get(shape) * self.config.decay;
        state.set(shape, updated);
        tracing::debug!(shape = %shape, mastery = updated, "mastery decreased");
        updated
    }

    pub fn record(&self, state: &mut MasteryState, shape: Shape, correct: bool) -> f64 {
        if correct {
            self.record_correct(state, shape)
        } else {
            self.record_incorrect(state, shape)
        }
    }
}

// ==================== Unit Tests ====================
