//! Route evaluation and constraint validation.
//!
//! - [`RouteEvaluator`] — Trip totals, loads and stop schedules of sequences
//! - [`RouteValidator`] — Post-hoc checks of finished routes

mod evaluator;
mod validator;
mod violation;

pub use evaluator::RouteEvaluator;
pub use validator::{validate, RouteValidator};
pub use violation::{ConstraintKind, ConstraintViolation, Severity, ValidatedRoute};
