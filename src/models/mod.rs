//! Domain model types for multi-depot vehicle routing.
//!
//! Delivery points and depots with multi-dimensional demand, vehicles with
//! capacities, costs and driver rules, routes with their schedules and costs,
//! and the aggregated result of a run.

mod params;
mod point;
mod route;
mod solution;
mod vehicle;

pub use params::OptimizationParams;
pub(crate) use point::format_clock;
pub use point::{Depot, Dimension, Load, ParseTimeWindowError, Point, TimeWindow, ANY_VEHICLE_TYPE};
pub use route::{Route, RouteCosts, StopTime, TripMetrics};
pub use solution::{OptimizationResult, ALGORITHM_NAME};
pub use vehicle::{DriverRules, Vehicle};
