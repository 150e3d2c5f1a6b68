//! Problem Generation
//!
//! Samples a display unit and shape dimensions. Integer magnitudes are drawn
//! from shape-specific inclusive ranges, multiplied by the unit scale and
//! divided back, so small-number ranges stay the same in cm and m.

use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{Dimensions, LengthUnit, Problem, Shape};

const RECTANGLE_LENGTH: RangeInclusive<u32> = 4..=15;
const RECTANGLE_WIDTH: RangeInclusive<u32> = 3..=12;
const TRIANGLE_BASE: RangeInclusive<u32> = 5..=15;
const TRIANGLE_HEIGHT: RangeInclusive<u32> = 4..=12;
const PARALLELOGRAM_BASE: RangeInclusive<u32> = 6..=14;
const PARALLELOGRAM_HEIGHT: RangeInclusive<u32> = 4..=10;
const TRAPEZIUM_A: RangeInclusive<u32> = 5..=12;
const TRAPEZIUM_B: RangeInclusive<u32> = 8..=15;
const TRAPEZIUM_H: RangeInclusive<u32> = 4..=10;
const CIRCLE_RADIUS_MIN: f64 = 2.0;
const CIRCLE_RADIUS_MAX: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct ProblemGenerator;

impl ProblemGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate<R: Rng>(&self, shape: Shape, rng: &mut R) -> Problem {
        let unit = *LengthUnit::ALL.choose(rng).unwrap_or(&LengthUnit::Cm);
        let dimensions = self.sample_dimensions(shape, unit, rng);
        tracing::debug!(shape = %shape, unit = %unit, ?dimensions, "problem generated");
        Problem::from_sampled(dimensions, unit)
    }

    fn sample_dimensions<R: Rng>(&self, shape: Shape, unit: LengthUnit, rng: &mut R) -> Dimensions {
        let scale = unit.scale();

        match shape {
            Shape::Rectangle => Dimensions::Rectangle {
                length: draw_scaled(rng, RECTANGLE_LENGTH, scale),
                width: draw_scaled(rng, RECTANGLE_WIDTH, scale),
            },
            Shape::Square => Dimensions::Square {
                length: draw_scaled(rng, RECTANGLE_LENGTH, scale),
            },
            Shape::Triangle => Dimensions::Triangle {
                base: draw_scaled(rng, TRIANGLE_BASE, scale),
                height: draw_scaled(rng, TRIANGLE_HEIGHT, scale),
            },
            Shape::Parallelogram => Dimensions::Parallelogram {
                base: draw_scaled(rng, PARALLELOGRAM_BASE, scale),
                height: draw_scaled(rng, PARALLELOGRAM_HEIGHT, scale),
            },
            Shape::Trapezium => Dimensions::Trapezium {
                a: draw_scaled(rng, TRAPEZIUM_A, scale),
                b: draw_scaled(rng, TRAPEZIUM_B, scale),
                h: draw_scaled(rng, TRAPEZIUM_H, scale),
            },
            Shape::Circle => {
                // The scaled radius is not divided back: metre circles are
                // 20-100 m, centimetre circles 0.2-1.0 cm.
                let raw = rng.gen_range(CIRCLE_RADIUS_MIN..=CIRCLE_RADIUS_MAX);
                Dimensions::Circle {
                    radius: round_to(raw * scale as f64 / 10.0, 1),
                }
            }
        }
    }
}

impl Problem {
    /// Sampled dimensions are positive by construction of the ranges above.
    fn from_sampled(dimensions: Dimensions, unit: LengthUnit) -> Self {
        debug_assert!(dimensions.named().iter().all(|(_, v)| *v > 0.0));
        match Problem::new(dimensions, unit) {
            Ok(problem) => problem,
            Err(err) => unreachable!("sampled dimensions out of range: {err}"),
        }
    }
}

fn draw_scaled<R: Rng>(rng: &mut R, range: RangeInclusive<u32>, scale: u32) -> f64 {
    let scaled = rng.gen_range(range) * scale;
    scaled as f64 / scale as f64
}

/// Round half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

// ==================== Unit Tests ====================
