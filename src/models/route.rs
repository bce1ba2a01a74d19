//! Route and stop-schedule types.

use serde::{Deserialize, Serialize};

use super::{Load, Vehicle};

/// Scheduled arrival and departure at one stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopTime {
    /// Point id of the stop.
    pub point_id: String,
    /// Arrival, in minutes since leaving the depot.
    pub arrival_min: f64,
    /// Departure (arrival + service duration).
    pub departure_min: f64,
}

/// Distance and time totals of a depot round trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TripMetrics {
    /// Total distance in km, depot to depot.
    pub distance_km: f64,
    /// Driving plus service time, in minutes.
    pub duration_min: f64,
    /// Driving time only.
    pub driving_min: f64,
    /// Service time only.
    pub service_min: f64,
}

/// Cost breakdown of a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteCosts {
    /// Fuel cost: `distance / 100 × consumption × fuel price`.
    pub fuel: f64,
    /// Distance cost: `distance × cost per km`.
    pub distance: f64,
    /// Fixed daily vehicle cost.
    pub fixed: f64,
    /// Sum of the three.
    pub total: f64,
}

impl RouteCosts {
    /// Computes the costs of driving `distance_km` with `vehicle`.
    pub fn compute(distance_km: f64, vehicle: &Vehicle, fuel_price_per_liter: f64) -> Self {
        let fuel = distance_km / 100.0 * vehicle.fuel_consumption_per_100km() * fuel_price_per_liter;
        let distance = distance_km * vehicle.cost_per_km();
        let fixed = vehicle.fixed_daily_cost();
        Self {
            fuel,
            distance,
            fixed,
            total: fuel + distance + fixed,
        }
    }
}

/// An ordered sequence of stops served by one vehicle from its depot.
///
/// The depot is the implicit first and last location and is not listed in
/// [`stops`](Route::stops).
///
/// # Examples
///
/// ```
/// use u_mdvrp::models::{Load, Route, RouteCosts, TripMetrics, Vehicle};
///
/// let vehicle = Vehicle::new("v1", "d1", "kamyon").with_costs(2.0, 25.0, 100.0);
/// let trip = TripMetrics { distance_km: 40.0, duration_min: 60.0, driving_min: 48.0, service_min: 12.0 };
/// let mut route = Route::new("v1", "d1", vec!["c1".into(), "c2".into()], trip, Vec::new(), Load::new(3.0, 0.0, 0.0));
/// route.apply_costs(&vehicle, 40.0);
/// assert_eq!(route.costs().distance, 80.0);
/// assert_eq!(route.costs().fuel, 400.0);
/// assert_eq!(route.total_cost(), 580.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    vehicle_id: String,
    depot_id: String,
    stops: Vec<String>,
    stop_times: Vec<StopTime>,
    trip: TripMetrics,
    load: Load,
    costs: RouteCosts,
}

impl Route {
    /// Creates a route with zero costs.
    pub fn new(
        vehicle_id: impl Into<String>,
        depot_id: impl Into<String>,
        stops: Vec<String>,
        trip: TripMetrics,
        stop_times: Vec<StopTime>,
        load: Load,
    ) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            depot_id: depot_id.into(),
            stops,
            stop_times,
            trip,
            load,
            costs: RouteCosts::default(),
        }
    }

    /// Vehicle serving this route.
    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }

    /// Depot this route starts and ends at.
    pub fn depot_id(&self) -> &str {
        &self.depot_id
    }

    /// Stop ids in visiting order.
    pub fn stops(&self) -> &[String] {
        &self.stops
    }

    /// Per-stop schedule.
    pub fn stop_times(&self) -> &[StopTime] {
        &self.stop_times
    }

    /// Number of stops.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Returns `true` if this route has no stops.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Distance and time totals.
    pub fn trip(&self) -> &TripMetrics {
        &self.trip
    }

    /// Total distance in km.
    pub fn total_distance(&self) -> f64 {
        self.trip.distance_km
    }

    /// Total duration (driving + service) in minutes.
    pub fn total_duration(&self) -> f64 {
        self.trip.duration_min
    }

    /// Total load per dimension.
    pub fn load(&self) -> &Load {
        &self.load
    }

    /// Cost breakdown.
    pub fn costs(&self) -> &RouteCosts {
        &self.costs
    }

    /// Total cost.
    pub fn total_cost(&self) -> f64 {
        self.costs.total
    }

    /// Replaces the stop order together with its recomputed trip and schedule.
    pub fn reorder(&mut self, stops: Vec<String>, trip: TripMetrics, stop_times: Vec<StopTime>) {
        self.stops = stops;
        self.trip = trip;
        self.stop_times = stop_times;
    }

    /// Recomputes costs from the current distance.
    pub fn apply_costs(&mut self, vehicle: &Vehicle, fuel_price_per_liter: f64) {
        self.costs = RouteCosts::compute(self.trip.distance_km, vehicle, fuel_price_per_liter);
    }
}
