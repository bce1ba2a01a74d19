//! Intra-route 2-opt improvement.
//!
//! # Algorithm
//!
//! For every pair of positions `i < j`, the candidate ordering reverses the
//! segment `[i+1..=j]`. Its full round-trip distance (depot → … → depot) is
//! recomputed from the matrix; a strictly shorter candidate is adopted at
//! once and the scan continues from the new ordering (first improvement).
//! Passes repeat until one finds nothing.
//!
//! Because every adopted move strictly shortens the route, the result is
//! never longer than the input.
//!
//! # Complexity
//!
//! O(n³) per pass with full recomputation.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::distance::DistanceMatrix;

/// Applies 2-opt improvement to a single route given as matrix indices.
///
/// The route is assumed to start and end at `depot`. Returns the improved
/// sequence and its total round-trip distance in km.
///
/// # Arguments
///
/// * `route` — Ordered stop indices (excluding depot)
/// * `depot` — Depot matrix index
/// * `distances` — Distance matrix
///
/// # Examples
///
/// ```
/// use u_mdvrp::distance::{DistanceMatrix, Leg};
/// use u_mdvrp::local_search::two_opt_improve;
///
/// // Depot 0 and stops 1..=4 on a line, one km apart.
/// let mut dm = DistanceMatrix::new(["d", "a", "b", "c", "e"])?;
/// for i in 0..5usize {
///     for j in 0..5usize {
///         let km = i.abs_diff(j) as f64;
///         dm.set(i, j, Leg::new(km, km));
///     }
/// }
///
/// let (improved, dist) = two_opt_improve(&[1, 3, 2, 4], 0, &dm);
/// assert_eq!(improved, vec![1, 2, 3, 4]);
/// assert!((dist - 8.0).abs() < 1e-10);
/// # Ok::<(), u_mdvrp::distance::DistanceError>(())
/// ```
pub fn two_opt_improve(
    route: &[usize],
    depot: usize,
    distances: &DistanceMatrix,
) -> (Vec<usize>, f64) {
    let mut best = route.to_vec();
    let mut best_dist = route_distance(&best, depot, distances);
    let n = best.len();
    if n < 3 {
        return (best, best_dist);
    }

    let mut improved = true;
    while improved {
        improved = false;
        for i in 0..n - 2 {
            // j = i + 1 would reverse a single stop.
            for j in (i + 2)..n {
                let mut candidate = best.clone();
                candidate[i + 1..=j].reverse();
                let dist = route_distance(&candidate, depot, distances);
                if dist < best_dist {
                    best = candidate;
                    best_dist = dist;
                    improved = true;
                }
            }
        }
    }

    (best, best_dist)
}

/// Total distance of `depot → route[0] → … → route[n-1] → depot`.
pub fn route_distance(route: &[usize], depot: usize, distances: &DistanceMatrix) -> f64 {
    distances.round_trip(depot, route).distance_km
}
