//! Optimization result type.

use serde::{Deserialize, Serialize};

use super::Route;

/// Algorithm label recorded on every result.
pub const ALGORITHM_NAME: &str = "Clarke-Wright Savings + 2-opt";

/// The outcome of one optimization run.
///
/// Every input customer appears exactly once, either in one route's stops or
/// in [`unassigned`](OptimizationResult::unassigned).
///
/// # Examples
///
/// ```
/// use u_mdvrp::models::OptimizationResult;
///
/// let result = OptimizationResult::new(Vec::new(), vec!["c9".into()], 3);
/// assert_eq!(result.vehicles_used(), 0);
/// assert_eq!(result.unassigned().to_vec(), vec!["c9".to_string()]);
/// assert_eq!(result.total_distance(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    routes: Vec<Route>,
    unassigned_point_ids: Vec<String>,
    total_distance_km: f64,
    total_cost: f64,
    computation_time_ms: u64,
    algorithm_name: String,
}

impl OptimizationResult {
    /// Aggregates routes and unassigned ids into a result.
    pub fn new(routes: Vec<Route>, unassigned: Vec<String>, computation_time_ms: u64) -> Self {
        let total_distance_km = routes.iter().map(Route::total_distance).sum();
        let total_cost = routes.iter().map(Route::total_cost).sum();
        Self {
            routes,
            unassigned_point_ids: unassigned,
            total_distance_km,
            total_cost,
            computation_time_ms,
            algorithm_name: ALGORITHM_NAME.to_string(),
        }
    }

    /// Routes, grouped by depot in depot input order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Customer ids no feasible vehicle could serve.
    pub fn unassigned(&self) -> &[String] {
        &self.unassigned_point_ids
    }

    /// Number of vehicles used (one per route).
    pub fn vehicles_used(&self) -> usize {
        self.routes.len()
    }

    /// Sum of route distances in km.
    pub fn total_distance(&self) -> f64 {
        self.total_distance_km
    }

    /// Sum of route costs.
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Wall-clock time spent in the run.
    pub fn computation_time_ms(&self) -> u64 {
        self.computation_time_ms
    }

    /// Name of the algorithm that produced this result.
    pub fn algorithm(&self) -> &str {
        &self.algorithm_name
    }
}
