//! Common Types and Constants
//!
//! Shared data structures used across the tutoring modules.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TutorError;

// ==================== Constants ====================

/// Mastery every shape starts a session with
pub const DEFAULT_INITIAL_MASTERY: f64 = 0.5;

/// Additive mastery gain on a correct answer
pub const DEFAULT_MASTERY_GAIN: f64 = 0.18;

/// Multiplicative mastery decay on an incorrect answer
pub const DEFAULT_MASTERY_DECAY: f64 = 0.88;

/// Keeps selection weights finite when mastery reaches zero
pub const DEFAULT_SELECTION_EPSILON: f64 = 0.01;

/// Absolute tolerance when comparing a submitted area with the canonical one
pub const DEFAULT_ANSWER_TOLERANCE: f64 = 0.2;

// ==================== Shapes ====================

/// The closed set of shapes the tutor practises.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Shape {
    Rectangle,
    Square,
    Triangle,
    Parallelogram,
    Trapezium,
    Circle,
}

impl Shape {
    pub const ALL: [Shape; 6] = [
        Shape::Rectangle,
        Shape::Square,
        Shape::Triangle,
        Shape::Parallelogram,
        Shape::Trapezium,
        Shape::Circle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Shape::Rectangle => "Rectangle",
            Shape::Square => "Square",
            Shape::Triangle => "Triangle",
            Shape::Parallelogram => "Parallelogram",
            Shape::Trapezium => "Trapezium",
            Shape::Circle => "Circle",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ==================== Units ====================

/// Length unit a problem is stated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Cm,
    M,
}

impl LengthUnit {
    pub const ALL: [LengthUnit; 2] = [LengthUnit::Cm, LengthUnit::M];

    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Cm => "cm",
            LengthUnit::M => "m",
        }
    }

    /// Unit the area answer must carry, e.g. `cm²`.
    pub fn area_symbol(self) -> &'static str {
        match self {
            LengthUnit::Cm => "cm²",
            LengthUnit::M => "m²",
        }
    }

    /// Factor applied to integer draws before converting back to this unit.
    pub fn scale(self) -> u32 {
        match self {
            LengthUnit::Cm => 1,
            LengthUnit::M => 100,
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ==================== Problems ====================

/// Dimensions of one problem, in the problem's display unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape")]
pub enum Dimensions {
    Rectangle { length: f64, width: f64 },
    Square { length: f64 },
    Triangle { base: f64, height: f64 },
    Parallelogram { base: f64, height: f64 },
    Trapezium { a: f64, b: f64, h: f64 },
    Circle { radius: f64 },
}

impl Dimensions {
    pub fn shape(&self) -> Shape {
        match self {
            Dimensions::Rectangle { .. } => Shape::Rectangle,
            Dimensions::Square { .. } => Shape::Square,
            Dimensions::Triangle { .. } => Shape::Triangle,
            Dimensions::Parallelogram { .. } => Shape::Parallelogram,
            Dimensions::Trapezium { .. } => Shape::Trapezium,
            Dimensions::Circle { .. } => Shape::Circle,
        }
    }

    /// Named magnitudes in statement order. A square reports its side as
    /// both length and width.
    pub fn named(&self) -> Vec<(&'static str, f64)> {
        match *self {
            Dimensions::Rectangle { length, width } => vec![("length", length), ("width", width)],
            Dimensions::Square { length } => vec![("length", length), ("width", length)],
            Dimensions::Triangle { base, height } | Dimensions::Parallelogram { base, height } => {
                vec![("base", base), ("height", height)]
            }
            Dimensions::Trapezium { a, b, h } => vec![("a", a), ("b", b), ("h", h)],
            Dimensions::Circle { radius } => vec![("radius", radius)],
        }
    }
}

/// One practice round. Immutable once built; a new round gets a new problem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Problem {
    dimensions: Dimensions,
    unit: LengthUnit,
}

impl Problem {
    /// Build a problem from explicit dimensions.
    pub fn new(dimensions: Dimensions, unit: LengthUnit) -> Result<Self, TutorError> {
        for (name, value) in dimensions.named() {
            if !value.is_finite() || value <= 0.0 {
                return Err(TutorError::InvalidProblem(format!(
                    "{} {} must be a positive number, got {}",
                    dimensions.shape(),
                    name,
                    value
                )));
            }
        }
        Ok(Self { dimensions, unit })
    }

    pub fn shape(&self) -> Shape {
        self.dimensions.shape()
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    pub fn canonical_area_unit(&self) -> &'static str {
        self.unit.area_symbol()
    }

    pub fn params(&self) -> BTreeMap<&'static str, f64> {
        self.dimensions.named().into_iter().collect()
    }

    /// Plain-text problem statement shown to the learner.
    pub fn statement(&self) -> String {
        let u = self.unit.symbol();
        match self.dimensions {
            Dimensions::Rectangle { length, width } => {
                format!("Rectangle: Length = {length} {u}, Width = {width} {u}")
            }
            Dimensions::Square { length } => {
                format!("Square: Length = {length} {u}, Width = {length} {u}")
            }
            Dimensions::Triangle { base, height } => {
                format!("Triangle: Base = {base} {u}, Height = {height} {u}")
            }
            Dimensions::Parallelogram { base, height } => {
                format!("Parallelogram: Base = {base} {u}, Height = {height} {u}")
            }
            Dimensions::Trapezium { a, b, h } => {
                format!("Trapezium: Parallel sides = {a} {u} and {b} {u}, Height = {h} {u}")
            }
            Dimensions::Circle { radius } => format!("Circle: Radius = {radius} {u}"),
        }
    }
}

// ==================== Answers ====================

/// A learner's answer, already parsed into a finite value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    pub value: f64,
    pub unit: String,
}

impl SubmittedAnswer {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }
}

/// Outcome of checking one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub value_correct: bool,
    pub unit_correct: bool,
    pub misconception: Option<String>,
}

impl EvaluationResult {
    pub fn is_correct(&self) -> bool {
        self.value_correct && self.unit_correct
    }

    /// Fallback explanation used when no misconception was diagnosed.
    pub fn generic_reason(&self) -> Option<String> {
        let mut reasons = Vec::new();
        if !self.value_correct {
            reasons.push("wrong number");
        }
        if !self.unit_correct {
            reasons.push("wrong unit");
        }
        if reasons.is_empty() {
            None
        } else {
            Some(reasons.join(" and "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_rejects_non_positive_dimension() {
        let err = Problem::new(
            Dimensions::Rectangle {
                length: 0.0,
                width: 5.0,
            },
            LengthUnit::Cm,
        )
        .unwrap_err();
        assert!(matches!(err, TutorError::InvalidProblem(_)));

        assert!(Problem::new(Dimensions::Circle { radius: f64::NAN }, LengthUnit::M).is_err());
    }

    #[test]
    fn test_statement_formats() {
        let p = Problem::new(
            Dimensions::Rectangle {
                length: 10.0,
                width: 5.0,
            },
            LengthUnit::Cm,
        )
        .unwrap();
        assert_eq!(p.statement(), "Rectangle: Length = 10 cm, Width = 5 cm");
        assert_eq!(p.canonical_area_unit(), "cm²");

        let t = Problem::new(Dimensions::Trapezium { a: 5.0, b: 8.0, h: 4.0 }, LengthUnit::M).unwrap();
        assert_eq!(
            t.statement(),
            "Trapezium: Parallel sides = 5 m and 8 m, Height = 4 m"
        );
    }

    #[test]
    fn test_square_params_mirror_side() {
        let p = Problem::new(Dimensions::Square { length: 7.0 }, LengthUnit::Cm).unwrap();
        let params = p.params();
        assert_eq!(params["length"], 7.0);
        assert_eq!(params["width"], 7.0);
        assert_eq!(p.shape(), Shape::Square);
    }

    #[test]
    fn test_generic_reason() {
        let both = EvaluationResult {
            value_correct: false,
            unit_correct: false,
            misconception: None,
        };
        assert_eq!(both.generic_reason().as_deref(), Some("wrong number and wrong unit"));

        let unit_only = EvaluationResult {
            value_correct: true,
            unit_correct: false,
            misconception: None,
        };
        assert_eq!(unit_only.generic_reason().as_deref(), Some("wrong unit"));

        let ok = EvaluationResult {
            value_correct: true,
            unit_correct: true,
            misconception: None,
        };
        assert!(ok.is_correct());
        assert_eq!(ok.generic_reason(), None);
    }
}
