//! Input Sanitization
//!
//! Learner input is cleaned here before it reaches the evaluator.
//!
//! Functions:
//! - Numeric answer parsing (finite values only)
//! - Area unit normalization

use crate::error::TutorError;

/// Longest answer text accepted before parsing is attempted.
const MAX_INPUT_LEN: usize = 32;

/// Check that a value can be evaluated.
pub fn is_valid_value(value: f64) -> bool {
    value.is_finite()
}

/// Reject non-finite values the same way unparsable text is rejected.
pub fn validate_value(value: f64) -> Result<f64, TutorError> {
    if is_valid_value(value) {
        Ok(value)
    } else {
        Err(TutorError::InvalidInput(format!(
            "answer must be a finite number, got {value}"
        )))
    }
}

/// Parse a typed answer. Surrounding whitespace is ignored and a single
/// decimal comma is accepted. Digit grouping (`1,000`, `1,000.5`) is rejected
/// rather than guessed at.
pub fn parse_value(raw: &str) -> Result<f64, TutorError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TutorError::InvalidInput("answer is empty".to_string()));
    }
    if trimmed.len() > MAX_INPUT_LEN {
        return Err(TutorError::InvalidInput("answer is too long".to_string()));
    }

    let normalized = decimal_comma_to_point(trimmed)
        .ok_or_else(|| TutorError::InvalidInput(format!("'{trimmed}' is not a number")))?;
    let value = normalized
        .parse::<f64>()
        .map_err(|_| TutorError::InvalidInput(format!("'{trimmed}' is not a number")))?;
    validate_value(value)
}

/// `None` when commas cannot be read as one decimal separator. Exactly three
/// digits after the comma reads as a thousands group and is refused.
fn decimal_comma_to_point(raw: &str) -> Option<String> {
    match raw.matches(',').count() {
        0 => Some(raw.to_string()),
        1 if !raw.contains('.') => {
            let (_, fraction) = raw.split_once(',')?;
            let grouped = fraction.len() == 3 && fraction.bytes().all(|b| b.is_ascii_digit());
            (!grouped).then(|| raw.replacen(',', ".", 1))
        }
        _ => None,
    }
}

/// Map keyboard spellings of area units onto the canonical symbols.
/// Unknown units are returned trimmed but otherwise untouched, so they still
/// fail the exact unit comparison.
pub fn normalize_unit(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed {
        "cm2" | "cm^2" | "sq cm" | "cm²" => "cm²".to_string(),
        "m2" | "m^2" | "sq m" | "m²" => "m²".to_string(),
        other => other.to_string(),
    }
}
