//! Post-hoc constraint validation of finished routes.
//!
//! Validation is advisory: it never changes a route, it only reports what a
//! dispatcher should look at. A route is valid when no violation has error
//! severity.

use std::collections::HashMap;

use crate::distance::DistanceMatrix;
use crate::error::OptimizeError;
use crate::models::{format_clock, Depot, Dimension, Load, Point, Route, Vehicle};

use super::{ConstraintKind, ConstraintViolation, ValidatedRoute};

/// Validates routes against time windows, capacity, vehicle type and driver
/// rules.
///
/// # Examples
///
/// ```
/// use u_mdvrp::distance::{DistanceProvider, StraightLineProvider};
/// use u_mdvrp::evaluation::{RouteEvaluator, RouteValidator};
/// use u_mdvrp::models::{Depot, Point, Vehicle};
///
/// let depot = Depot::new("d", 41.0, 29.0);
/// let customers = vec![Point::new("a", 41.1, 29.0).with_demand(20.0, 0.0, 0.0)];
/// let mut refs = vec![depot.point()];
/// refs.extend(customers.iter());
/// let dm = StraightLineProvider::default().build_matrix(&refs)?;
///
/// let vehicle = Vehicle::new("v1", "d", "kamyon").with_capacity(15.0, 1000.0, 10.0);
/// let route = RouteEvaluator::new(&depot, &customers, &dm)?.build_route(&vehicle, &[1]);
///
/// let validated = RouteValidator::new(&customers, &dm).validate(&route, &vehicle, &depot)?;
/// assert!(!validated.is_valid());
/// assert_eq!(validated.errors().count(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct RouteValidator<'a> {
    points: HashMap<&'a str, &'a Point>,
    distances: &'a DistanceMatrix,
}

impl<'a> RouteValidator<'a> {
    /// Creates a validator resolving stop ids against `points`.
    pub fn new(points: &'a [Point], distances: &'a DistanceMatrix) -> Self {
        Self {
            points: points.iter().map(|p| (p.id(), p)).collect(),
            distances,
        }
    }

    /// Validates one route served by `vehicle` from `depot`.
    ///
    /// # Errors
    ///
    /// - [`OptimizeError::VehicleMismatch`] if `vehicle` does not serve `route`.
    /// - [`OptimizeError::UnknownPoint`] if a stop is missing from the points.
    /// - [`OptimizeError::Distance`] if the matrix does not cover a location.
    pub fn validate(
        &self,
        route: &Route,
        vehicle: &Vehicle,
        depot: &Depot,
    ) -> Result<ValidatedRoute, OptimizeError> {
        if route.vehicle_id() != vehicle.id() {
            return Err(OptimizeError::VehicleMismatch {
                route: route.vehicle_id().to_string(),
                vehicle: vehicle.id().to_string(),
            });
        }
        let stops = route
            .stops()
            .iter()
            .map(|id| {
                let point = self
                    .points
                    .get(id.as_str())
                    .copied()
                    .ok_or_else(|| OptimizeError::UnknownPoint(id.clone()))?;
                Ok((point, self.distances.require_index(id)?))
            })
            .collect::<Result<Vec<_>, OptimizeError>>()?;
        let depot_index = self.distances.require_index(depot.id())?;

        let mut violations = Vec::new();

        // Sequential arrival simulation from t = 0 at the depot.
        let mut clock = 0.0;
        let mut driving = 0.0;
        let mut service = 0.0;
        let mut prev = depot_index;
        for (i, &(point, idx)) in stops.iter().enumerate() {
            let leg = self.distances.duration(prev, idx);
            driving += leg;
            let arrival = clock + leg;
            if let Some(tw) = point.time_window() {
                if tw.is_early(arrival) {
                    violations.push(
                        ConstraintViolation::warning(
                            ConstraintKind::TimeWindow,
                            format!(
                                "early arrival at `{}` ({}), window {tw}",
                                point.id(),
                                format_clock(arrival)
                            ),
                        )
                        .at_stop(i),
                    );
                } else if tw.is_late(arrival) {
                    violations.push(
                        ConstraintViolation::error(
                            ConstraintKind::TimeWindow,
                            format!(
                                "late arrival at `{}` ({}), window {tw}",
                                point.id(),
                                format_clock(arrival)
                            ),
                        )
                        .at_stop(i),
                    );
                }
            }
            service += point.service_duration();
            clock = arrival + point.service_duration();
            prev = idx;
        }
        if !stops.is_empty() {
            driving += self.distances.duration(prev, depot_index);
        }
        let total_duration = driving + service;

        let load = stops
            .iter()
            .fold(Load::default(), |acc, (p, _)| acc + p.demand());
        violations.extend(capacity_violations(&load, &vehicle.capacity()));

        let rules = vehicle.driver();
        if total_duration > rules.max_work_minutes() {
            violations.push(ConstraintViolation::error(
                ConstraintKind::WorkHours,
                format!(
                    "driver working time exceeded: {:.1} h / {} h",
                    total_duration / 60.0,
                    rules.max_work_hours
                ),
            ));
        }

        let break_after = rules.break_after_minutes();
        if break_after > 0.0 && driving > break_after {
            let breaks = (driving / break_after).floor();
            violations.push(ConstraintViolation::warning(
                ConstraintKind::DriverBreak,
                format!(
                    "{breaks} break(s) of {} min required ({break_after} min driving per break)",
                    rules.break_duration_minutes
                ),
            ));
        }

        for (i, &(point, _)) in stops.iter().enumerate() {
            if !point.accepts_vehicle_type(vehicle.vehicle_type()) {
                violations.push(
                    ConstraintViolation::error(
                        ConstraintKind::VehicleType,
                        format!(
                            "`{}` requires {}, vehicle type is `{}`",
                            point.id(),
                            point.required_vehicle_types().join(", "),
                            vehicle.vehicle_type()
                        ),
                    )
                    .at_stop(i),
                );
            }
        }

        Ok(ValidatedRoute {
            vehicle_id: vehicle.id().to_string(),
            depot_id: depot.id().to_string(),
            violations,
        })
    }
}

/// Validates one route; see [`RouteValidator::validate`].
///
/// # Errors
///
/// As [`RouteValidator::validate`].
pub fn validate(
    route: &Route,
    vehicle: &Vehicle,
    depot: &Depot,
    points: &[Point],
    distances: &DistanceMatrix,
) -> Result<ValidatedRoute, OptimizeError> {
    RouteValidator::new(points, distances).validate(route, vehicle, depot)
}

fn capacity_violations(load: &Load, capacity: &Load) -> Vec<ConstraintViolation> {
    load.exceeded_dimensions(capacity)
        .into_iter()
        .map(|dim| {
            let (kind, label, unit) = match dim {
                Dimension::Pallets => (ConstraintKind::CapacityPallets, "pallet", ""),
                Dimension::Kg => (ConstraintKind::CapacityWeight, "weight", " kg"),
                Dimension::M3 => (ConstraintKind::CapacityVolume, "volume", " m³"),
            };
            ConstraintViolation::error(
                kind,
                format!(
                    "{label} capacity exceeded: {}{unit} / {}{unit}",
                    load.get(dim),
                    capacity.get(dim)
                ),
            )
        })
        .collect()
}
