//! Route evaluator: trip totals, loads and stop schedules for one depot.

use crate::distance::DistanceMatrix;
use crate::error::OptimizeError;
use crate::models::{Depot, Load, Point, Route, StopTime, TripMetrics, Vehicle};

/// Evaluates stop sequences of one depot against the shared matrix.
///
/// Sequences are lists of matrix indices of the depot's customers, excluding
/// the depot itself. Durations are driving time plus service time; vehicles
/// start at t = 0 and never wait.
///
/// # Examples
///
/// ```
/// use u_mdvrp::distance::{DistanceProvider, StraightLineProvider};
/// use u_mdvrp::evaluation::RouteEvaluator;
/// use u_mdvrp::models::{Depot, Point};
///
/// let depot = Depot::new("d", 41.0, 29.0);
/// let customers = vec![
///     Point::new("a", 41.1, 29.0).with_demand(2.0, 100.0, 1.0).with_service_duration(10.0),
///     Point::new("b", 41.2, 29.0).with_demand(1.0, 50.0, 0.5).with_service_duration(10.0),
/// ];
/// let mut refs = vec![depot.point()];
/// refs.extend(customers.iter());
/// let dm = StraightLineProvider::default().build_matrix(&refs)?;
///
/// let eval = RouteEvaluator::new(&depot, &customers, &dm)?;
/// let seq = eval.locations().to_vec();
/// let trip = eval.trip(&seq);
/// assert!((trip.service_min - 20.0).abs() < 1e-9);
/// assert_eq!(eval.load(&seq).pallets, 3.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct RouteEvaluator<'a> {
    depot: &'a Depot,
    depot_index: usize,
    distances: &'a DistanceMatrix,
    by_index: Vec<Option<&'a Point>>,
    locations: Vec<usize>,
}

impl<'a> RouteEvaluator<'a> {
    /// Creates an evaluator for `depot` serving `customers`.
    ///
    /// # Errors
    ///
    /// [`OptimizeError::Distance`] if the matrix does not cover the depot or a
    /// customer.
    pub fn new(
        depot: &'a Depot,
        customers: &'a [Point],
        distances: &'a DistanceMatrix,
    ) -> Result<Self, OptimizeError> {
        let depot_index = distances.require_index(depot.id())?;
        let mut by_index = vec![None; distances.size()];
        let mut locations = Vec::with_capacity(customers.len());
        for customer in customers {
            let idx = distances.require_index(customer.id())?;
            by_index[idx] = Some(customer);
            locations.push(idx);
        }
        Ok(Self {
            depot,
            depot_index,
            distances,
            by_index,
            locations,
        })
    }

    /// The depot.
    pub fn depot(&self) -> &'a Depot {
        self.depot
    }

    /// Matrix index of the depot.
    pub fn depot_index(&self) -> usize {
        self.depot_index
    }

    /// The shared matrix.
    pub fn distances(&self) -> &'a DistanceMatrix {
        self.distances
    }

    /// Matrix indices of the customers, in input order.
    pub fn locations(&self) -> &[usize] {
        &self.locations
    }

    /// Customer at matrix index `index`, if it belongs to this depot.
    pub fn point(&self, index: usize) -> Option<&'a Point> {
        self.by_index.get(index).copied().flatten()
    }

    /// Customers of a sequence, skipping indices not owned by this depot.
    pub fn points<'s>(&'s self, sequence: &'s [usize]) -> impl Iterator<Item = &'a Point> + 's {
        sequence.iter().filter_map(move |&idx| self.point(idx))
    }

    /// Trip totals of `depot → sequence… → depot`.
    pub fn trip(&self, sequence: &[usize]) -> TripMetrics {
        let leg = self.distances.round_trip(self.depot_index, sequence);
        let service_min: f64 = self.points(sequence).map(Point::service_duration).sum();
        TripMetrics {
            distance_km: leg.distance_km,
            duration_min: leg.duration_min + service_min,
            driving_min: leg.duration_min,
            service_min,
        }
    }

    /// Summed demand of a sequence.
    pub fn load(&self, sequence: &[usize]) -> Load {
        self.points(sequence)
            .fold(Load::default(), |acc, p| acc + p.demand())
    }

    /// Arrival and departure at each stop of a sequence.
    pub fn schedule(&self, sequence: &[usize]) -> Vec<StopTime> {
        let mut clock = 0.0;
        let mut prev = self.depot_index;
        let mut times = Vec::with_capacity(sequence.len());
        for &idx in sequence {
            let arrival = clock + self.distances.duration(prev, idx);
            let service = self.point(idx).map_or(0.0, Point::service_duration);
            times.push(StopTime {
                point_id: self.distances.id(idx).to_string(),
                arrival_min: arrival,
                departure_min: arrival + service,
            });
            clock = arrival + service;
            prev = idx;
        }
        times
    }

    /// Stop ids of a sequence.
    pub fn stop_ids(&self, sequence: &[usize]) -> Vec<String> {
        sequence
            .iter()
            .map(|&idx| self.distances.id(idx).to_string())
            .collect()
    }

    /// Builds a costless [`Route`] for `vehicle` visiting `sequence`.
    pub fn build_route(&self, vehicle: &Vehicle, sequence: &[usize]) -> Route {
        Route::new(
            vehicle.id(),
            self.depot.id(),
            self.stop_ids(sequence),
            self.trip(sequence),
            self.schedule(sequence),
            self.load(sequence),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{DistanceError, Leg};

    /// Depot plus three customers on a line, 10 km apart, 12 min per leg.
    fn setup() -> (Depot, Vec<Point>, DistanceMatrix) {
        let depot = Depot::new("d", 0.0, 0.0);
        let customers = vec![
            Point::new("a", 0.0, 0.0)
                .with_demand(1.0, 100.0, 1.0)
                .with_service_duration(5.0),
            Point::new("b", 0.0, 0.0)
                .with_demand(2.0, 200.0, 2.0)
                .with_service_duration(5.0),
            Point::new("c", 0.0, 0.0)
                .with_demand(3.0, 300.0, 3.0)
                .with_service_duration(5.0),
        ];
        let mut dm = DistanceMatrix::new(["d", "a", "b", "c"]).expect("unique ids");
        for i in 0..4usize {
            for j in 0..4usize {
                let km = 10.0 * i.abs_diff(j) as f64;
                dm.set(i, j, Leg::new(km, km * 1.2));
            }
        }
        (depot, customers, dm)
    }

    #[test]
    fn test_locations_follow_input_order() {
        let (depot, customers, dm) = setup();
        let eval = RouteEvaluator::new(&depot, &customers, &dm).expect("covered");
        assert_eq!(eval.depot_index(), 0);
        assert_eq!(eval.locations(), &[1, 2, 3]);
        assert_eq!(eval.point(2).map(Point::id), Some("b"));
        assert!(eval.point(0).is_none());
    }

    #[test]
    fn test_trip_includes_service() {
        let (depot, customers, dm) = setup();
        let eval = RouteEvaluator::new(&depot, &customers, &dm).expect("covered");
        let trip = eval.trip(&[1, 2, 3]);
        assert!((trip.distance_km - 60.0).abs() < 1e-9);
        assert!((trip.driving_min - 72.0).abs() < 1e-9);
        assert!((trip.service_min - 15.0).abs() < 1e-9);
        assert!((trip.duration_min - 87.0).abs() < 1e-9);
        assert_eq!(eval.trip(&[]), TripMetrics::default());
    }

    #[test]
    fn test_schedule_chain() {
        let (depot, customers, dm) = setup();
        let eval = RouteEvaluator::new(&depot, &customers, &dm).expect("covered");
        let times = eval.schedule(&[2, 1]);
        assert_eq!(times[0].point_id, "b");
        assert!((times[0].arrival_min - 24.0).abs() < 1e-9);
        assert!((times[0].departure_min - 29.0).abs() < 1e-9);
        assert!((times[1].arrival_min - 41.0).abs() < 1e-9);
    }

    #[test]
    fn test_build_route() {
        let (depot, customers, dm) = setup();
        let eval = RouteEvaluator::new(&depot, &customers, &dm).expect("covered");
        let vehicle = Vehicle::new("v1", "d", "kamyon");
        let route = eval.build_route(&vehicle, &[3, 1]);
        assert_eq!(route.vehicle_id(), "v1");
        assert_eq!(route.depot_id(), "d");
        assert_eq!(route.stops().to_vec(), vec!["c".to_string(), "a".to_string()]);
        assert_eq!(route.load(), &Load::new(4.0, 400.0, 4.0));
        assert_eq!(route.stop_times().len(), 2);
        assert_eq!(route.total_cost(), 0.0);
    }

    #[test]
    fn test_unknown_customer_is_error() {
        let (depot, mut customers, dm) = setup();
        customers.push(Point::new("ghost", 0.0, 0.0));
        let err = RouteEvaluator::new(&depot, &customers, &dm).expect_err("ghost not in matrix");
        assert_eq!(
            err,
            OptimizeError::Distance(DistanceError::UnknownPoint("ghost".into()))
        );
    }
}
