//! Distance provider trait and the straight-line implementation.

use crate::models::Point;

use super::{haversine_km, DistanceError, DistanceMatrix, Leg};

/// Supplies pairwise distances and travel times between points.
///
/// Implementations must return a fully populated matrix: every ordered pair
/// of input points has a leg, and the diagonal is zero. Consumers never see a
/// partially built matrix.
///
/// # Examples
///
/// ```
/// use u_mdvrp::distance::{DistanceProvider, StraightLineProvider};
/// use u_mdvrp::models::Point;
///
/// let points = [Point::new("a", 41.0, 29.0), Point::new("b", 41.1, 29.0)];
/// let refs: Vec<&Point> = points.iter().collect();
/// let dm = StraightLineProvider::default().build_matrix(&refs)?;
/// assert_eq!(dm.size(), 2);
/// assert!(dm.distance(0, 1) > 11.0 && dm.distance(0, 1) < 11.2);
/// assert_eq!(dm.distance(1, 1), 0.0);
/// # Ok::<(), u_mdvrp::distance::DistanceError>(())
/// ```
pub trait DistanceProvider {
    /// Distance and travel time from `a` to `b`.
    fn distance_duration(&self, a: &Point, b: &Point) -> Leg;

    /// Builds the matrix over `points`.
    ///
    /// The default implementation evaluates each unordered pair once and
    /// mirrors it, so the result is symmetric by construction.
    ///
    /// # Errors
    ///
    /// [`DistanceError::DuplicatePoint`] if two points share an id.
    fn build_matrix(&self, points: &[&Point]) -> Result<DistanceMatrix, DistanceError> {
        let mut dm = DistanceMatrix::new(points.iter().map(|p| p.id()))?;
        for (i, a) in points.iter().enumerate() {
            for (j, b) in points.iter().enumerate().skip(i + 1) {
                let leg = self.distance_duration(a, b);
                dm.set(i, j, leg);
                dm.set(j, i, leg);
            }
        }
        Ok(dm)
    }
}

/// Great-circle distances with durations at a fixed average speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StraightLineProvider {
    average_speed_kmh: f64,
}

impl Default for StraightLineProvider {
    fn default() -> Self {
        Self::new(50.0)
    }
}

impl StraightLineProvider {
    /// Creates a provider assuming the given average speed.
    pub fn new(average_speed_kmh: f64) -> Self {
        Self { average_speed_kmh }
    }

    /// Assumed average speed in km/h.
    pub fn average_speed_kmh(&self) -> f64 {
        self.average_speed_kmh
    }
}

impl DistanceProvider for StraightLineProvider {
    fn distance_duration(&self, a: &Point, b: &Point) -> Leg {
        if a.id() == b.id() {
            return Leg::default();
        }
        let km = a.distance_to(b);
        Leg::new(km, km / self.average_speed_kmh * 60.0)
    }
}

/// Straight-line estimate of a road leg: haversine distance inflated by
/// `detour_factor`, with the travel time of the uninflated distance at
/// `speed_kmh`.
pub(crate) fn road_estimate(a: &Point, b: &Point, detour_factor: f64, speed_kmh: f64) -> Leg {
    if a.id() == b.id() {
        return Leg::default();
    }
    let km = haversine_km(a.lat(), a.lng(), b.lat(), b.lng());
    Leg::new(km * detour_factor, km / speed_kmh * 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> Vec<Point> {
        vec![
            Point::new("d", 41.00, 29.00),
            Point::new("a", 41.05, 29.00),
            Point::new("b", 41.05, 29.05),
        ]
    }

    #[test]
    fn test_straight_line_duration_uses_speed() {
        let pts = points();
        let slow = StraightLineProvider::new(30.0).distance_duration(&pts[0], &pts[1]);
        let fast = StraightLineProvider::new(60.0).distance_duration(&pts[0], &pts[1]);
        assert_eq!(slow.distance_km, fast.distance_km);
        assert!((slow.duration_min - 2.0 * fast.duration_min).abs() < 1e-9);
        assert!((fast.duration_min - fast.distance_km).abs() < 1e-9);
    }

    #[test]
    fn test_matrix_is_full_and_symmetric() {
        let pts = points();
        let refs: Vec<&Point> = pts.iter().collect();
        let dm = StraightLineProvider::default()
            .build_matrix(&refs)
            .expect("unique ids");
        assert_eq!(dm.size(), 3);
        assert!(dm.is_symmetric(1e-12));
        for i in 0..3 {
            assert_eq!(dm.get(i, i), Leg::default());
            for j in 0..3 {
                if i != j {
                    assert!(dm.distance(i, j) > 0.0);
                }
            }
        }
    }

    #[test]
    fn test_matrix_rejects_duplicate_ids() {
        let pts = vec![Point::new("x", 0.0, 0.0), Point::new("x", 1.0, 1.0)];
        let refs: Vec<&Point> = pts.iter().collect();
        let err = StraightLineProvider::default()
            .build_matrix(&refs)
            .expect_err("duplicate id");
        assert_eq!(err, DistanceError::DuplicatePoint("x".into()));
    }

    #[test]
    fn test_road_estimate() {
        let pts = points();
        let straight = StraightLineProvider::new(50.0).distance_duration(&pts[0], &pts[2]);
        let road = road_estimate(&pts[0], &pts[2], 1.3, 50.0);
        assert!((road.distance_km - 1.3 * straight.distance_km).abs() < 1e-9);
        assert!((road.duration_min - straight.duration_min).abs() < 1e-9);
        assert_eq!(road_estimate(&pts[1], &pts[1], 1.3, 50.0), Leg::default());
    }
}
