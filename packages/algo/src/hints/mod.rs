//! Tiered hints. Pure functions of the hint level and the current problem.

use crate::error::TutorError;
use crate::evaluator::canonical_area;
use crate::types::{Dimensions, Problem, Shape};

pub const MIN_HINT_LEVEL: u8 = 1;
pub const MAX_HINT_LEVEL: u8 = 3;

const MEASUREMENTS_HINT: &str = "Hint: What measurements do you need for this shape?";
const GENERIC_FORMULA_HINT: &str = "Think carefully about the formula";

fn formula_hint(shape: Shape) -> &'static str {
    match shape {
        Shape::Triangle => "Remember to multiply by ½",
        Shape::Circle => "Use π and square the radius",
        Shape::Trapezium => "Add the two parallel sides first",
        _ => GENERIC_FORMULA_HINT,
    }
}

/// Hint text for `level` (1 = measurements, 2 = formula, 3 = worked answer).
pub fn hint(level: u8, problem: &Problem) -> Result<String, TutorError> {
    match level {
        1 => Ok(MEASUREMENTS_HINT.to_string()),
        2 => Ok(formula_hint(problem.shape()).to_string()),
        3 => Ok(worked_example(problem)),
        other => Err(TutorError::InvalidHintLevel(other)),
    }
}

/// The full answer with the formula written out in the problem's numbers.
pub fn worked_example(problem: &Problem) -> String {
    let working = match *problem.dimensions() {
        Dimensions::Rectangle { length, width } => format!("{length} × {width}"),
        Dimensions::Square { length } => format!("{length} × {length}"),
        Dimensions::Parallelogram { base, height } => format!("{base} × {height}"),
        Dimensions::Triangle { base, height } => format!("0.5 × {base} × {height}"),
        Dimensions::Trapezium { a, b, h } => format!("0.5 × ({a} + {b}) × {h}"),
        Dimensions::Circle { radius } => format!("π × {radius}²"),
    };
    format!(
        "Worked example: {} = {} {}",
        working,
        canonical_area(problem),
        problem.canonical_area_unit()
    )
}
