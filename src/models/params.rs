//! Run parameters.

use serde::{Deserialize, Serialize};

/// Parameters of one optimization run.
///
/// Deserializes from a partial document: missing fields take their defaults.
///
/// # Examples
///
/// ```
/// use u_mdvrp::models::OptimizationParams;
///
/// let params = OptimizationParams::default()
///     .with_fuel_price(47.5)
///     .with_max_route_distance(500.0);
/// assert_eq!(params.fuel_price_per_liter, 47.5);
/// assert_eq!(params.max_route_distance_km, Some(500.0));
/// assert_eq!(params.average_speed_kmh, 50.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationParams {
    /// Fuel price per litre.
    #[serde(alias = "fuel_price")]
    pub fuel_price_per_liter: f64,
    /// Optional cap on a route's round-trip distance, in km.
    #[serde(alias = "max_route_distance")]
    pub max_route_distance_km: Option<f64>,
    /// Optional cap on a route's duration, in minutes.
    #[serde(alias = "max_route_time")]
    pub max_route_time_min: Option<f64>,
    /// Speed used by the straight-line distance fallback, in km/h.
    pub average_speed_kmh: f64,
}

impl Default for OptimizationParams {
    fn default() -> Self {
        Self {
            fuel_price_per_liter: 45.0,
            max_route_distance_km: None,
            max_route_time_min: None,
            average_speed_kmh: 50.0,
        }
    }
}

impl OptimizationParams {
    /// Sets the fuel price per litre.
    pub fn with_fuel_price(mut self, price: f64) -> Self {
        self.fuel_price_per_liter = price;
        self
    }

    /// Caps every route's round-trip distance.
    pub fn with_max_route_distance(mut self, km: f64) -> Self {
        self.max_route_distance_km = Some(km);
        self
    }

    /// Caps every route's duration.
    pub fn with_max_route_time(mut self, minutes: f64) -> Self {
        self.max_route_time_min = Some(minutes);
        self
    }

    /// Sets the straight-line fallback speed.
    pub fn with_average_speed(mut self, kmh: f64) -> Self {
        self.average_speed_kmh = kmh;
        self
    }

    /// Returns `true` if a route with these totals respects both caps.
    pub fn within_route_caps(&self, distance_km: f64, duration_min: f64) -> bool {
        self.max_route_distance_km.map_or(true, |max| distance_km <= max)
            && self.max_route_time_min.map_or(true, |max| duration_min <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = OptimizationParams::default();
        assert_eq!(p.fuel_price_per_liter, 45.0);
        assert!(p.max_route_distance_km.is_none());
        assert!(p.max_route_time_min.is_none());
        assert_eq!(p.average_speed_kmh, 50.0);
    }

    #[test]
    fn test_route_caps() {
        let p = OptimizationParams::default()
            .with_max_route_distance(100.0)
            .with_max_route_time(240.0);
        assert!(p.within_route_caps(100.0, 240.0));
        assert!(!p.within_route_caps(100.1, 10.0));
        assert!(!p.within_route_caps(10.0, 241.0));
        assert!(OptimizationParams::default().within_route_caps(1e9, 1e9));
    }

    #[test]
    fn test_partial_deserialize() {
        let p: OptimizationParams =
            serde_json::from_str(r#"{"fuel_price": 47.5, "max_route_time": 480}"#).expect("valid");
        assert_eq!(p.fuel_price_per_liter, 47.5);
        assert_eq!(p.max_route_time_min, Some(480.0));
        assert_eq!(p.average_speed_kmh, 50.0);
    }
}
