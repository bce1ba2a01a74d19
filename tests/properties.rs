//! Property-based tests for the multi-depot pipeline.
//!
//! # Invariants tested
//!
//! - **Capacity:** every route fits its vehicle in pallets, kg and m³.
//! - **Partition:** every customer is routed once or listed as unassigned.
//! - **Vehicle uniqueness:** no vehicle serves two routes.
//! - **2-opt monotonicity:** improvement never lengthens a route.
//! - **Determinism:** identical inputs give identical results.

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use u_mdvrp::distance::{DistanceMatrix, Leg};
use u_mdvrp::local_search::{route_distance, two_opt_improve};
use u_mdvrp::models::{Depot, Load, OptimizationParams, OptimizationResult, Point, Vehicle};
use u_mdvrp::Optimizer;

const TYPES: [&str; 3] = ["kamyon", "kamyonet", "tir"];

struct Instance {
    depots: Vec<Depot>,
    customers: Vec<Point>,
    vehicles: Vec<Vehicle>,
}

/// Random instance in the Marmara region, reproducible from `seed`.
fn instance(seed: u64, max_customers: usize) -> Instance {
    let mut rng = StdRng::seed_from_u64(seed);

    let depots: Vec<Depot> = (0..rng.random_range(1..=3))
        .map(|d| {
            Depot::new(
                format!("d{d}"),
                rng.random_range(40.5..41.5),
                rng.random_range(28.5..30.0),
            )
        })
        .collect();

    let customers = (0..rng.random_range(0..=max_customers))
        .map(|c| {
            let mut point = Point::new(
                format!("c{c}"),
                rng.random_range(40.4..41.6),
                rng.random_range(28.4..30.1),
            )
            .with_demand(
                rng.random_range(0.0..8.0),
                rng.random_range(0.0..3000.0),
                rng.random_range(0.0..10.0),
            )
            .with_service_duration(rng.random_range(5.0..30.0));
            if rng.random_bool(0.2) {
                point = point.with_required_vehicle_types([TYPES[rng.random_range(0..TYPES.len())]]);
            }
            point
        })
        .collect();

    let mut vehicles = Vec::new();
    for depot in &depots {
        for _ in 0..rng.random_range(0..=4) {
            let id = format!("v{}", vehicles.len());
            vehicles.push(
                Vehicle::new(id, depot.id(), TYPES[rng.random_range(0..TYPES.len())])
                    .with_capacity(
                        rng.random_range(4.0..20.0),
                        rng.random_range(2000.0..12000.0),
                        rng.random_range(10.0..40.0),
                    )
                    .with_costs(rng.random_range(1.0..6.0), 25.0, 500.0),
            );
        }
    }

    Instance {
        depots,
        customers,
        vehicles,
    }
}

fn solve(inst: &Instance, params: &OptimizationParams) -> OptimizationResult {
    Optimizer::straight_line(params.average_speed_kmh)
        .optimize(&inst.depots, &inst.customers, &inst.vehicles, params)
        .expect("generated instances are consistent")
}

fn params_strategy() -> impl Strategy<Value = OptimizationParams> {
    (
        proptest::option::of(50.0_f64..400.0),
        proptest::option::of(120.0_f64..600.0),
    )
        .prop_map(|(km, min)| OptimizationParams {
            max_route_distance_km: km,
            max_route_time_min: min,
            ..OptimizationParams::default()
        })
}

/// Serialized result without the wall-clock timing.
fn fingerprint(result: &OptimizationResult) -> serde_json::Value {
    let mut value = serde_json::to_value(result).expect("serializable");
    if let Some(map) = value.as_object_mut() {
        map.remove("computation_time_ms");
    }
    value
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn routes_respect_vehicle_capacity(seed in any::<u64>(), params in params_strategy()) {
        let inst = instance(seed, 25);
        let result = solve(&inst, &params);

        let demand: HashMap<&str, Load> =
            inst.customers.iter().map(|c| (c.id(), c.demand())).collect();
        let vehicles: HashMap<&str, &Vehicle> =
            inst.vehicles.iter().map(|v| (v.id(), v)).collect();

        for route in result.routes() {
            let vehicle = vehicles[route.vehicle_id()];
            let load = route
                .stops()
                .iter()
                .fold(Load::default(), |acc, id| acc + demand[id.as_str()]);
            let cap = vehicle.capacity();
            prop_assert!(
                load.pallets <= cap.pallets + 1e-9
                    && load.kg <= cap.kg + 1e-9
                    && load.m3 <= cap.m3 + 1e-9,
                "route of {} carries {:?} over capacity {:?}",
                vehicle.id(),
                load,
                cap
            );
            for id in route.stops() {
                let customer = inst
                    .customers
                    .iter()
                    .find(|c| c.id() == id.as_str())
                    .expect("routes visit input customers");
                prop_assert!(customer.accepts_vehicle_type(vehicle.vehicle_type()));
            }
        }
    }

    #[test]
    fn customers_are_partitioned(seed in any::<u64>(), params in params_strategy()) {
        let inst = instance(seed, 25);
        let result = solve(&inst, &params);

        let mut seen: Vec<&str> = result
            .routes()
            .iter()
            .flat_map(|r| r.stops().iter().map(String::as_str))
            .chain(result.unassigned().iter().map(String::as_str))
            .collect();
        let mut expected: Vec<&str> = inst.customers.iter().map(Point::id).collect();
        seen.sort_unstable();
        expected.sort_unstable();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn vehicles_serve_at_most_one_route(seed in any::<u64>()) {
        let inst = instance(seed, 25);
        let result = solve(&inst, &OptimizationParams::default());

        let mut used = HashSet::new();
        for route in result.routes() {
            prop_assert!(used.insert(route.vehicle_id()), "{} reused", route.vehicle_id());
            let vehicle = inst
                .vehicles
                .iter()
                .find(|v| v.id() == route.vehicle_id())
                .expect("routes use input vehicles");
            prop_assert_eq!(vehicle.depot_id(), route.depot_id());
        }
        prop_assert_eq!(result.vehicles_used(), used.len());
    }

    #[test]
    fn two_opt_never_lengthens(seed in any::<u64>(), n in 1_usize..12) {
        let mut rng = StdRng::seed_from_u64(seed);
        let coords: Vec<(f64, f64)> = (0..=n)
            .map(|_| (rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
            .collect();
        let ids: Vec<String> = (0..=n).map(|i| format!("p{i}")).collect();
        let mut dm = DistanceMatrix::new(ids).expect("unique ids");
        for (i, a) in coords.iter().enumerate() {
            for (j, b) in coords.iter().enumerate() {
                let d = ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt();
                dm.set(i, j, Leg::new(d, d));
            }
        }
        let mut route: Vec<usize> = (1..=n).collect();
        route.shuffle(&mut rng);

        let before = route_distance(&route, 0, &dm);
        let (improved, after) = two_opt_improve(&route, 0, &dm);

        prop_assert!(after <= before);
        prop_assert!((after - route_distance(&improved, 0, &dm)).abs() < 1e-9);
        let mut sorted = improved.clone();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, (1..=n).collect::<Vec<_>>());
    }

    #[test]
    fn runs_are_deterministic(seed in any::<u64>(), params in params_strategy()) {
        let inst = instance(seed, 20);
        let first = solve(&inst, &params);
        let second = solve(&inst, &params);
        prop_assert_eq!(fingerprint(&first), fingerprint(&second));
    }
}

#[test]
fn unassigned_follow_input_order() {
    for seed in 0..32 {
        let inst = instance(seed, 30);
        let result = solve(&inst, &OptimizationParams::default());
        let order: HashMap<&str, usize> = inst
            .customers
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id(), i))
            .collect();
        let positions: Vec<usize> = result
            .unassigned()
            .iter()
            .map(|id| order[id.as_str()])
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "seed {seed}");
    }
}
