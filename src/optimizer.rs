//! Multi-depot optimization orchestrator.
//!
//! # Pipeline
//!
//! 1. Each customer goes to its nearest depot (straight-line).
//! 2. One distance matrix is built over depots and customers.
//! 3. Per depot, in parallel: savings construction, 2-opt on every route,
//!    cost computation.
//! 4. Routes and unassigned customers are aggregated in input order.
//!
//! Depots without customers or without vehicles contribute no routes; their
//! customers are reported as unassigned. Only inconsistent input data is an
//! error.

use std::collections::HashSet;
use std::time::Instant;

use rayon::prelude::*;

use crate::constructive::{clarke_wright_savings, SavingsOutcome};
use crate::distance::{DistanceMatrix, DistanceProvider, StraightLineProvider};
use crate::error::OptimizeError;
use crate::evaluation::{RouteEvaluator, RouteValidator, ValidatedRoute};
use crate::local_search::two_opt_improve;
use crate::models::{Depot, OptimizationParams, OptimizationResult, Point, Route, Vehicle};

/// Runs the full pipeline with a pluggable [`DistanceProvider`].
///
/// # Examples
///
/// ```
/// use u_mdvrp::models::{Depot, OptimizationParams, Point, Vehicle};
/// use u_mdvrp::Optimizer;
///
/// let depots = vec![Depot::new("ist", 41.00, 29.00)];
/// let customers = vec![
///     Point::new("c1", 41.05, 29.02).with_demand(4.0, 800.0, 3.0),
///     Point::new("c2", 41.06, 29.03).with_demand(3.0, 500.0, 2.0),
///     Point::new("c3", 40.95, 28.90).with_demand(2.0, 300.0, 1.0),
/// ];
/// let vehicles = vec![
///     Vehicle::new("v1", "ist", "kamyon")
///         .with_capacity(10.0, 5000.0, 20.0)
///         .with_costs(3.0, 28.0, 900.0),
///     Vehicle::new("v2", "ist", "kamyon")
///         .with_capacity(10.0, 5000.0, 20.0)
///         .with_costs(3.0, 28.0, 900.0),
/// ];
///
/// let result = Optimizer::straight_line(50.0).optimize(
///     &depots,
///     &customers,
///     &vehicles,
///     &OptimizationParams::default(),
/// )?;
/// let served: usize = result.routes().iter().map(|r| r.len()).sum();
/// assert_eq!(served + result.unassigned().len(), 3);
/// assert!(result.total_cost() > 0.0);
/// # Ok::<(), u_mdvrp::OptimizeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Optimizer<P = StraightLineProvider> {
    provider: P,
}

impl Optimizer {
    /// Creates an optimizer with straight-line distances at the given speed.
    pub fn straight_line(average_speed_kmh: f64) -> Self {
        Self::new(StraightLineProvider::new(average_speed_kmh))
    }
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new(StraightLineProvider::default())
    }
}

impl<P: DistanceProvider> Optimizer<P> {
    /// Creates an optimizer using `provider` for the distance matrix.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The distance provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Optimizes routes for all depots.
    ///
    /// Vehicles are pooled by their `depot_id`; vehicles naming an unknown
    /// depot are ignored.
    ///
    /// # Errors
    ///
    /// [`OptimizeError::Distance`] if the matrix cannot be built, e.g. when a
    /// depot and a customer share an id.
    pub fn optimize(
        &self,
        depots: &[Depot],
        customers: &[Point],
        vehicles: &[Vehicle],
        params: &OptimizationParams,
    ) -> Result<OptimizationResult, OptimizeError> {
        self.plan(depots, customers, vehicles, params)
            .map(Plan::into_result)
    }

    /// Like [`optimize`](Optimizer::optimize), but keeps the run's distance
    /// matrix so the result can be validated against the same legs.
    ///
    /// # Errors
    ///
    /// As [`Optimizer::optimize`].
    pub fn plan(
        &self,
        depots: &[Depot],
        customers: &[Point],
        vehicles: &[Vehicle],
        params: &OptimizationParams,
    ) -> Result<Plan, OptimizeError> {
        let start = Instant::now();

        if customers.is_empty() || depots.is_empty() {
            if !customers.is_empty() {
                log::warn!("no depots given, {} customers unassigned", customers.len());
            }
            let unassigned = customers.iter().map(|c| c.id().to_string()).collect();
            return Ok(Plan {
                result: OptimizationResult::new(Vec::new(), unassigned, elapsed_ms(start)),
                distances: DistanceMatrix::new(Vec::<String>::new())?,
            });
        }

        let distances = self.build_matrix(depots, customers)?;
        let clusters = assign_to_depots(depots, customers);
        let pools = pool_vehicles(depots, vehicles);

        let outcomes = depots
            .par_iter()
            .zip(clusters.par_iter())
            .zip(pools.par_iter())
            .map(|((depot, cluster), pool)| plan_depot(depot, cluster, pool, &distances, params))
            .collect::<Result<Vec<_>, OptimizeError>>()?;

        let mut routes = Vec::new();
        let mut dropped = HashSet::new();
        for outcome in outcomes {
            routes.extend(outcome.routes);
            dropped.extend(outcome.unassigned);
        }
        let unassigned: Vec<String> = customers
            .iter()
            .filter(|c| dropped.contains(c.id()))
            .map(|c| c.id().to_string())
            .collect();

        let result = OptimizationResult::new(routes, unassigned, elapsed_ms(start));
        log::info!(
            "optimized {} customers over {} depots: {} routes, {} unassigned, {:.1} km, cost {:.2} in {} ms",
            customers.len(),
            depots.len(),
            result.vehicles_used(),
            result.unassigned().len(),
            result.total_distance(),
            result.total_cost(),
            result.computation_time_ms()
        );
        Ok(Plan { result, distances })
    }

    fn build_matrix(
        &self,
        depots: &[Depot],
        customers: &[Point],
    ) -> Result<DistanceMatrix, OptimizeError> {
        let points: Vec<&Point> = depots
            .iter()
            .map(Depot::point)
            .chain(customers.iter())
            .collect();
        let distances = self.provider.build_matrix(&points)?;
        if log::log_enabled!(log::Level::Debug) && !distances.is_symmetric(1e-6) {
            log::debug!("distance matrix over {} points is asymmetric", distances.size());
        }
        Ok(distances)
    }
}

/// A finished run together with the distance matrix it was planned on.
#[derive(Debug, Clone)]
pub struct Plan {
    result: OptimizationResult,
    distances: DistanceMatrix,
}

impl Plan {
    /// The optimization result.
    pub fn result(&self) -> &OptimizationResult {
        &self.result
    }

    /// The matrix built for this run, over depots then customers.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Consumes the plan, keeping only the result.
    pub fn into_result(self) -> OptimizationResult {
        self.result
    }

    /// Validates every route against the run's own matrix.
    ///
    /// # Errors
    ///
    /// As [`validate_result`].
    pub fn validate(
        &self,
        depots: &[Depot],
        customers: &[Point],
        vehicles: &[Vehicle],
    ) -> Result<Vec<ValidatedRoute>, OptimizeError> {
        validate_result(&self.result, &self.distances, depots, customers, vehicles)
    }
}

/// Validates every route of `result` against `distances`.
///
/// # Errors
///
/// - [`OptimizeError::UnknownVehicle`] if a route's vehicle is missing.
/// - [`OptimizeError::UnknownPoint`] if a route's depot or stop is missing
///   from the inputs or from `distances`.
pub fn validate_result(
    result: &OptimizationResult,
    distances: &DistanceMatrix,
    depots: &[Depot],
    customers: &[Point],
    vehicles: &[Vehicle],
) -> Result<Vec<ValidatedRoute>, OptimizeError> {
    let validator = RouteValidator::new(customers, distances);
    result
        .routes()
        .iter()
        .map(|route| {
            let vehicle = vehicles
                .iter()
                .find(|v| v.id() == route.vehicle_id())
                .ok_or_else(|| OptimizeError::UnknownVehicle(route.vehicle_id().to_string()))?;
            let depot = depots
                .iter()
                .find(|d| d.id() == route.depot_id())
                .ok_or_else(|| OptimizeError::UnknownPoint(route.depot_id().to_string()))?;
            validator.validate(route, vehicle, depot)
        })
        .collect()
}

/// Optimizes with straight-line distances at `params.average_speed_kmh`.
///
/// # Errors
///
/// As [`Optimizer::optimize`].
pub fn optimize_routes(
    depots: &[Depot],
    customers: &[Point],
    vehicles: &[Vehicle],
    params: &OptimizationParams,
) -> Result<OptimizationResult, OptimizeError> {
    Optimizer::straight_line(params.average_speed_kmh).optimize(depots, customers, vehicles, params)
}

/// Index of the depot nearest to `point`; ties go to the first depot.
fn nearest_depot(depots: &[Depot], point: &Point) -> Option<usize> {
    depots
        .iter()
        .enumerate()
        .map(|(i, d)| (i, d.point().distance_to(point)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Customers per depot, each list in input order.
fn assign_to_depots(depots: &[Depot], customers: &[Point]) -> Vec<Vec<Point>> {
    let mut clusters = vec![Vec::new(); depots.len()];
    for customer in customers {
        if let Some(i) = nearest_depot(depots, customer) {
            clusters[i].push(customer.clone());
        }
    }
    clusters
}

/// Vehicles per depot. Duplicate vehicle ids keep their first occurrence.
fn pool_vehicles(depots: &[Depot], vehicles: &[Vehicle]) -> Vec<Vec<Vehicle>> {
    let mut pools = vec![Vec::new(); depots.len()];
    let mut seen = HashSet::new();
    for vehicle in vehicles {
        if !seen.insert(vehicle.id()) {
            log::warn!("duplicate vehicle `{}` ignored", vehicle.id());
            continue;
        }
        match depots.iter().position(|d| d.id() == vehicle.depot_id()) {
            Some(i) => pools[i].push(vehicle.clone()),
            None => log::warn!(
                "vehicle `{}` belongs to unknown depot `{}`",
                vehicle.id(),
                vehicle.depot_id()
            ),
        }
    }
    pools
}

/// Savings construction, 2-opt and costs for one depot.
fn plan_depot(
    depot: &Depot,
    customers: &[Point],
    vehicles: &[Vehicle],
    distances: &DistanceMatrix,
    params: &OptimizationParams,
) -> Result<SavingsOutcome, OptimizeError> {
    if customers.is_empty() {
        return Ok(SavingsOutcome::default());
    }
    if vehicles.is_empty() {
        log::warn!(
            "depot `{}` has no vehicles, {} customers unassigned",
            depot.id(),
            customers.len()
        );
        return Ok(SavingsOutcome {
            routes: Vec::new(),
            unassigned: customers.iter().map(|c| c.id().to_string()).collect(),
        });
    }

    let evaluator = RouteEvaluator::new(depot, customers, distances)?;
    let mut outcome = clarke_wright_savings(&evaluator, vehicles, params);
    log::debug!(
        "depot `{}`: {} customers, {} vehicles, {} routes built",
        depot.id(),
        customers.len(),
        vehicles.len(),
        outcome.routes.len()
    );
    if !outcome.unassigned.is_empty() {
        log::warn!(
            "depot `{}`: {} customers left without a vehicle",
            depot.id(),
            outcome.unassigned.len()
        );
    }

    for route in &mut outcome.routes {
        improve_route(&evaluator, route)?;
        let vehicle = vehicles
            .iter()
            .find(|v| v.id() == route.vehicle_id())
            .ok_or_else(|| OptimizeError::UnknownVehicle(route.vehicle_id().to_string()))?;
        route.apply_costs(vehicle, params.fuel_price_per_liter);
    }
    Ok(outcome)
}

fn improve_route(evaluator: &RouteEvaluator<'_>, route: &mut Route) -> Result<(), OptimizeError> {
    let distances = evaluator.distances();
    let sequence = route
        .stops()
        .iter()
        .map(|id| distances.require_index(id))
        .collect::<Result<Vec<_>, _>>()?;
    let before = route.total_distance();
    let (improved, after) = two_opt_improve(&sequence, evaluator.depot_index(), distances);
    if after < before {
        log::debug!(
            "vehicle `{}`: 2-opt saved {:.2} km ({:.2} -> {:.2})",
            route.vehicle_id(),
            before - after,
            before,
            after
        );
        route.reorder(
            evaluator.stop_ids(&improved),
            evaluator.trip(&improved),
            evaluator.schedule(&improved),
        );
    }
    Ok(())
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
