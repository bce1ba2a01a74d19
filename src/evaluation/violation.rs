//! Constraint violation types.

use serde::{Deserialize, Serialize};

/// The constraint a violation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// Arrival outside a stop's time window.
    TimeWindow,
    /// Pallet capacity exceeded.
    CapacityPallets,
    /// Weight capacity exceeded.
    CapacityWeight,
    /// Volume capacity exceeded.
    CapacityVolume,
    /// Route duration above the driver's working time.
    WorkHours,
    /// Vehicle type not accepted by a stop.
    VehicleType,
    /// Mandatory driver breaks are due.
    DriverBreak,
}

/// How a violation affects route validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Invalidates the route.
    Error,
    /// Informational only.
    Warning,
}

/// One constraint violation found on a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintViolation {
    /// Violated constraint.
    pub kind: ConstraintKind,
    /// Error or warning.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// Position of the offending stop in the route, for per-stop checks.
    pub stop_index: Option<usize>,
}

impl ConstraintViolation {
    /// Creates an error-severity violation.
    pub fn error(kind: ConstraintKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            message: message.into(),
            stop_index: None,
        }
    }

    /// Creates a warning-severity violation.
    pub fn warning(kind: ConstraintKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            message: message.into(),
            stop_index: None,
        }
    }

    /// Attaches the offending stop position.
    pub fn at_stop(mut self, index: usize) -> Self {
        self.stop_index = Some(index);
        self
    }

    /// Returns `true` for error severity.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// A route together with the violations found on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedRoute {
    /// Vehicle serving the route.
    pub vehicle_id: String,
    /// Depot of the route.
    pub depot_id: String,
    /// Every violation found, in check order.
    pub violations: Vec<ConstraintViolation>,
}

impl ValidatedRoute {
    /// Returns `true` if no violation has error severity.
    pub fn is_valid(&self) -> bool {
        !self.violations.iter().any(ConstraintViolation::is_error)
    }

    /// Error-severity violations.
    pub fn errors(&self) -> impl Iterator<Item = &ConstraintViolation> {
        self.violations.iter().filter(|v| v.is_error())
    }

    /// Warning-severity violations.
    pub fn warnings(&self) -> impl Iterator<Item = &ConstraintViolation> {
        self.violations.iter().filter(|v| !v.is_error())
    }
}
