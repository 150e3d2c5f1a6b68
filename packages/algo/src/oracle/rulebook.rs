use std::path::Path;

use serde::{Deserialize, Serialize};

use super::MisconceptionOracle;
use crate::error::OracleError;
use crate::types::Shape;

/// Predicate over the submitted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValueCondition {
    NonPositive,
    Range {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    Equals {
        value: f64,
        #[serde(default = "default_equals_tolerance")]
        tolerance: f64,
    },
}

fn default_equals_tolerance() -> f64 {
    1e-9
}

impl ValueCondition {
    pub fn holds(&self, value: f64) -> bool {
        match *self {
            ValueCondition::NonPositive => value <= 0.0,
            ValueCondition::Range { min, max } => {
                min.map_or(true, |lo| value >= lo) && max.map_or(true, |hi| value <= hi)
            }
            ValueCondition::Equals {
                value: expected,
                tolerance,
            } => (value - expected).abs() <= tolerance,
        }
    }
}

/// One rule: when every condition holds for a matching shape, the label fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub label: String,
    /// `None` applies to every shape.
    #[serde(default)]
    pub shape: Option<Shape>,
    #[serde(default)]
    pub when: Vec<ValueCondition>,
}

impl Rule {
    pub fn matches(&self, shape: Shape, value: f64) -> bool {
        self.shape.map_or(true, |s| s == shape) && self.when.iter().all(|c| c.holds(value))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleBook {
    pub rules: Vec<Rule>,
}

impl RuleBook {
    pub fn from_json(json: &str) -> Result<Self, OracleError> {
        let book: RuleBook =
            serde_json::from_str(json).map_err(|e| OracleError::RuleFile(e.to_string()))?;
        for rule in &book.rules {
            if rule.label.trim().is_empty() {
                return Err(OracleError::RuleFile("rule with empty label".to_string()));
            }
        }
        Ok(book)
    }

    /// First matching rule wins.
    pub fn first_match(&self, shape: Shape, value: f64) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matches(shape, value))
    }
}

/// Oracle backed by an externally authored rule file.
#[derive(Debug, Clone)]
pub struct RuleBookOracle {
    book: RuleBook,
}

impl RuleBookOracle {
    pub fn new(book: RuleBook) -> Self {
        Self { book }
    }

    pub fn from_json(json: &str) -> Result<Self, OracleError> {
        RuleBook::from_json(json).map(Self::new)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, OracleError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| OracleError::RuleFile(format!("{}: {}", path.display(), e)))?;
        let oracle = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), rules = oracle.book.rules.len(), "misconception rules loaded");
        Ok(oracle)
    }

    pub fn rule_count(&self) -> usize {
        self.book.rules.len()
    }
}

impl MisconceptionOracle for RuleBookOracle {
    fn diagnose(&self, shape: Shape, value: f64) -> Result<Option<String>, OracleError> {
        Ok(self
            .book
            .first_match(shape, value)
            .map(|rule| rule.label.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const RULES: &str = r#"{
        "rules": [
            { "label": "Area_cannot_be_negative", "when": [{ "kind": "nonPositive" }] },
            { "label": "Forgot_to_halve", "shape": "Triangle",
              "when": [{ "kind": "range", "min": 40.0, "max": 60.0 }] },
            { "label": "Used_diameter", "shape": "Circle",
              "when": [{ "kind": "equals", "value": 31.42, "tolerance": 0.05 }] },
            { "label": "Too_large", "when": [{ "kind": "range", "min": 40.0 }] }
        ]
    }"#;

    #[test]
    fn test_first_match_wins() {
        let oracle = RuleBookOracle::from_json(RULES).unwrap();
        assert_eq!(oracle.rule_count(), 4);

        // Both the triangle rule and the catch-all range fire; order decides.
        assert_eq!(
            oracle.diagnose(Shape::Triangle, 48.0).unwrap().as_deref(),
            Some("Forgot_to_halve")
        );
        assert_eq!(
            oracle.diagnose(Shape::Square, 48.0).unwrap().as_deref(),
            Some("Too_large")
        );
    }

    #[test]
    fn test_conditions() {
        let oracle = RuleBookOracle::from_json(RULES).unwrap();
        assert_eq!(
            oracle.diagnose(Shape::Rectangle, 0.0).unwrap().as_deref(),
            Some("Area_cannot_be_negative")
        );
        assert_eq!(
            oracle.diagnose(Shape::Circle, 31.4).unwrap().as_deref(),
            Some("Used_diameter")
        );
        assert_eq!(oracle.diagnose(Shape::Circle, 12.0).unwrap(), None);
    }

    #[test]
    fn test_rejects_malformed_rules() {
        assert!(matches!(
            RuleBookOracle::from_json("{ not json"),
            Err(OracleError::RuleFile(_))
        ));
        assert!(matches!(
            RuleBookOracle::from_json(r#"{"rules":[{"label":"  "}]}"#),
            Err(OracleError::RuleFile(_))
        ));
    }

    #[test]
    fn test_loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(RULES.as_bytes()).unwrap();

        let oracle = RuleBookOracle::from_path(file.path()).unwrap();
        assert_eq!(oracle.rule_count(), 4);

        let missing = RuleBookOracle::from_path("/definitely/not/here.json");
        assert!(matches!(missing, Err(OracleError::RuleFile(_))));
    }
}
