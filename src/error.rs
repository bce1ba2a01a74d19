//! Hard errors surfaced to the caller.
//!
//! Ordinary infeasibility is never an error: customers that cannot be served
//! end up in [`OptimizationResult::unassigned`](crate::models::OptimizationResult::unassigned).
//! These variants indicate inconsistent input data.

use thiserror::Error;

use crate::distance::DistanceError;

/// Contract violations detected while optimizing or validating.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizeError {
    /// A route or lookup referenced a point id absent from the input.
    #[error("unknown point `{0}`")]
    UnknownPoint(String),
    /// A route referenced a vehicle id absent from the input.
    #[error("unknown vehicle `{0}`")]
    UnknownVehicle(String),
    /// A route was validated against a vehicle other than its own.
    #[error("route is served by vehicle `{route}`, validated against `{vehicle}`")]
    VehicleMismatch {
        /// Vehicle id recorded on the route.
        route: String,
        /// Vehicle id supplied for validation.
        vehicle: String,
    },
    /// The distance matrix could not be built or read.
    #[error(transparent)]
    Distance(#[from] DistanceError),
}
