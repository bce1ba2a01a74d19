//! Clarke-Wright savings construction for one depot.
//!
//! # Algorithm
//!
//! Every customer starts on its own route (depot → customer → depot). The
//! "savings" of serving two customers on one route instead of two round
//! trips is
//!
//! ```text
//! s(i, j) = d(0, i) + d(0, j) - d(i, j)
//! ```
//!
//! Positive savings are processed in decreasing order (ties keep pair
//! discovery order). Two routes are merged only through their endpoints, and
//! only if some vehicle of the depot can still carry the merged load, is
//! accepted by every stop, and can drive the merged route within its working
//! time. Finally every route is matched greedily, heaviest first, with the
//! first unused vehicle that fits.
//!
//! # Complexity
//!
//! O(n² log n) for the savings, plus O(n) per feasibility check.
//!
//! # Reference
//!
//! Clarke, G. & Wright, J.W. (1964). "Scheduling of Vehicles from a Central
//! Depot to a Number of Delivery Points", *Operations Research* 12(4), 568-581.

use std::cmp::Ordering;

use crate::evaluation::RouteEvaluator;
use crate::models::{Load, OptimizationParams, Route, Vehicle};

/// A savings value for merging the routes of customers `p` and `q`.
///
/// `p` and `q` are positions in the evaluator's customer list.
#[derive(Debug, Clone, Copy)]
struct Saving {
    p: usize,
    q: usize,
    value: f64,
}

/// A route slot of the merge arena. Emptied slots stay in place.
#[derive(Debug, Clone, Default)]
struct Slot {
    members: Vec<usize>,
    load: Load,
}

/// Routes built for one depot, plus the customers no vehicle could take.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavingsOutcome {
    /// Routes with vehicles assigned, costs not yet applied.
    pub routes: Vec<Route>,
    /// Ids of dropped customers, in input order.
    pub unassigned: Vec<String>,
}

/// Builds routes for the evaluator's depot with the Clarke-Wright savings
/// algorithm.
///
/// `vehicles` is the depot's pool; each vehicle serves at most one route.
/// Route distance and duration caps from `params` are enforced on merges.
///
/// # Examples
///
/// ```
/// use u_mdvrp::constructive::clarke_wright_savings;
/// use u_mdvrp::distance::{DistanceProvider, StraightLineProvider};
/// use u_mdvrp::evaluation::RouteEvaluator;
/// use u_mdvrp::models::{Depot, OptimizationParams, Point, Vehicle};
///
/// let depot = Depot::new("d", 41.00, 29.00);
/// let customers = vec![
///     Point::new("a", 41.07, 29.00).with_demand(2.0, 100.0, 1.0),
///     Point::new("b", 41.07, 29.01).with_demand(2.0, 100.0, 1.0),
/// ];
/// let mut refs = vec![depot.point()];
/// refs.extend(customers.iter());
/// let dm = StraightLineProvider::default().build_matrix(&refs)?;
/// let vehicles = vec![Vehicle::new("v1", "d", "kamyon").with_capacity(10.0, 1000.0, 10.0)];
///
/// let eval = RouteEvaluator::new(&depot, &customers, &dm)?;
/// let outcome = clarke_wright_savings(&eval, &vehicles, &OptimizationParams::default());
/// assert_eq!(outcome.routes.len(), 1);
/// assert_eq!(outcome.routes[0].len(), 2);
/// assert!(outcome.unassigned.is_empty());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn clarke_wright_savings(
    evaluator: &RouteEvaluator<'_>,
    vehicles: &[Vehicle],
    params: &OptimizationParams,
) -> SavingsOutcome {
    let locations = evaluator.locations();
    let n = locations.len();
    if n == 0 {
        return SavingsOutcome::default();
    }

    let savings = compute_savings(evaluator);

    let mut slots: Vec<Slot> = (0..n)
        .map(|p| Slot {
            members: vec![p],
            load: evaluator.load(&[locations[p]]),
        })
        .collect();
    let mut slot_of: Vec<usize> = (0..n).collect();

    for saving in &savings {
        let (rp, rq) = (slot_of[saving.p], slot_of[saving.q]);
        if rp == rq {
            continue;
        }
        let Some(members) =
            join_at_endpoints(&slots[rp].members, &slots[rq].members, saving.p, saving.q)
        else {
            continue;
        };
        let load = slots[rp].load + slots[rq].load;
        let sequence = to_sequence(locations, &members);
        if !merge_is_feasible(evaluator, vehicles, params, &sequence, &load) {
            continue;
        }

        for &m in &slots[rq].members {
            slot_of[m] = rp;
        }
        slots[rp] = Slot { members, load };
        slots[rq] = Slot::default();
    }

    assign_vehicles(evaluator, vehicles, slots)
}

/// Positive savings of every unordered customer pair, best first.
fn compute_savings(evaluator: &RouteEvaluator<'_>) -> Vec<Saving> {
    let locations = evaluator.locations();
    let distances = evaluator.distances();
    let depot = evaluator.depot_index();
    let n = locations.len();

    let mut savings = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for p in 0..n {
        for q in (p + 1)..n {
            let (i, j) = (locations[p], locations[q]);
            let value =
                distances.distance(depot, i) + distances.distance(depot, j) - distances.distance(i, j);
            if value > 0.0 {
                savings.push(Saving { p, q, value });
            }
        }
    }
    // Stable: equal savings keep discovery order.
    savings.sort_by(|a, b| b.value.total_cmp(&a.value));
    savings
}

/// Concatenates `a` and `b` so that `p` (in `a`) and `q` (in `b`) become
/// neighbours. Returns `None` unless both sit at an endpoint.
fn join_at_endpoints(a: &[usize], b: &[usize], p: usize, q: usize) -> Option<Vec<usize>> {
    let (p_first, p_last) = (a.first() == Some(&p), a.last() == Some(&p));
    let (q_first, q_last) = (b.first() == Some(&q), b.last() == Some(&q));

    let mut joined = Vec::with_capacity(a.len() + b.len());
    if p_last && q_first {
        joined.extend_from_slice(a);
        joined.extend_from_slice(b);
    } else if p_first && q_last {
        joined.extend_from_slice(b);
        joined.extend_from_slice(a);
    } else if p_last && q_last {
        joined.extend_from_slice(a);
        joined.extend(b.iter().rev().copied());
    } else if p_first && q_first {
        joined.extend(a.iter().rev().copied());
        joined.extend_from_slice(b);
    } else {
        return None;
    }
    Some(joined)
}

fn to_sequence(locations: &[usize], members: &[usize]) -> Vec<usize> {
    members.iter().map(|&p| locations[p]).collect()
}

fn merge_is_feasible(
    evaluator: &RouteEvaluator<'_>,
    vehicles: &[Vehicle],
    params: &OptimizationParams,
    sequence: &[usize],
    load: &Load,
) -> bool {
    let trip = evaluator.trip(sequence);
    if !params.within_route_caps(trip.distance_km, trip.duration_min) {
        return false;
    }
    vehicles.iter().any(|v| {
        v.can_carry(load)
            && trip.duration_min <= v.driver().max_work_minutes()
            && v.is_eligible_for(evaluator.points(sequence))
    })
}

/// Descending by pallets, then kg, then m³.
fn heavier_first(a: &Load, b: &Load) -> Ordering {
    b.pallets
        .total_cmp(&a.pallets)
        .then_with(|| b.kg.total_cmp(&a.kg))
        .then_with(|| b.m3.total_cmp(&a.m3))
}

fn assign_vehicles(
    evaluator: &RouteEvaluator<'_>,
    vehicles: &[Vehicle],
    slots: Vec<Slot>,
) -> SavingsOutcome {
    let locations = evaluator.locations();
    let mut candidates: Vec<Slot> = slots.into_iter().filter(|s| !s.members.is_empty()).collect();
    candidates.sort_by(|a, b| heavier_first(&a.load, &b.load));

    let mut used = vec![false; vehicles.len()];
    let mut routes = Vec::with_capacity(candidates.len().min(vehicles.len()));
    let mut dropped = Vec::new();

    for candidate in candidates {
        let sequence = to_sequence(locations, &candidate.members);
        let found = vehicles.iter().enumerate().find(|(k, v)| {
            !used[*k] && v.can_carry(&candidate.load) && v.is_eligible_for(evaluator.points(&sequence))
        });
        match found {
            Some((k, vehicle)) => {
                used[k] = true;
                routes.push(evaluator.build_route(vehicle, &sequence));
            }
            None => {
                log::debug!(
                    "depot {}: no vehicle left for a route of {} stops",
                    evaluator.depot().id(),
                    sequence.len()
                );
                dropped.extend(candidate.members);
            }
        }
    }

    dropped.sort_unstable();
    let distances = evaluator.distances();
    let unassigned = dropped
        .into_iter()
        .map(|p| distances.id(locations[p]).to_string())
        .collect();

    SavingsOutcome { routes, unassigned }
}
