//! # area-tutor-algo - shape-area tutoring core
//!
//! Pure Rust implementation of an adaptive area tutor:
//!
//! - **Problem generation** - random rectangle, square, triangle,
//!   parallelogram, trapezium and circle problems in cm or m
//! - **Mastery tracking** - per-shape score with additive gain, multiplicative
//!   decay and inverse-mastery item selection
//! - **Answer evaluation** - canonical area with absolute tolerance and exact
//!   unit match
//! - **Hints** - three tiers, from "what do you need" to the worked answer
//! - **Misconception oracle** - narrow boundary to external diagnosis rules
//!
//! ## Module layout
//!
//! - [`types`] - shapes, units, problems, answers and default constants
//! - [`config`] - tunable mastery and tolerance values
//! - [`generator`] - problem sampling
//! - [`mastery`] - mastery state and selection policy
//! - [`evaluator`] - canonical area and answer checking
//! - [`hints`] - hint tiers
//! - [`oracle`] - misconception diagnosis boundary
//! - [`sanitize`] - learner input cleaning
//! - [`session`] - the per-learner controller tying it together
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use area_tutor_algo::{canonical_area, NullOracle, Session, TutorConfig};
//!
//! let mut session = Session::with_seed(TutorConfig::default(), Arc::new(NullOracle), 42);
//! println!("{}", session.current_problem_text());
//!
//! let area = canonical_area(session.problem());
//! let unit = session.problem().canonical_area_unit();
//! let submission = session.submit_answer(area, unit).unwrap();
//! assert!(submission.result.is_correct());
//!
//! session.request_next_problem();
//! ```

pub mod config;
pub mod error;
pub mod evaluator;
pub mod generator;
pub mod hints;
pub mod mastery;
pub mod oracle;
pub mod sanitize;
pub mod session;
pub mod types;

pub use types::*;

pub use config::{MasteryConfig, TutorConfig};
pub use error::{OracleError, TutorError};
pub use evaluator::{canonical_area, AnswerEvaluator};
pub use generator::ProblemGenerator;
pub use mastery::{MasteryState, MasteryTracker};
pub use oracle::{
    MisconceptionOracle, NullOracle, RuleBookOracle, StaticOracle, TimeoutOracle,
};
pub use session::{Session, SessionPhase, SessionStats, Submission};
