//! Delivery points, depots, loads and time windows.

use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::distance::haversine_km;

/// Vehicle type tag that matches every vehicle.
pub const ANY_VEHICLE_TYPE: &str = "any";

/// One of the three load dimensions tracked per stop and per vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Pallet count.
    Pallets,
    /// Weight in kilograms.
    Kg,
    /// Volume in cubic metres.
    M3,
}

/// A quantity along every load dimension.
///
/// Used both for demands (what a stop needs) and capacities (what a vehicle
/// can carry).
///
/// # Examples
///
/// ```
/// use u_mdvrp::models::{Dimension, Load};
///
/// let demand = Load::new(4.0, 900.0, 6.0) + Load::new(3.0, 700.0, 5.0);
/// let capacity = Load::new(6.0, 2000.0, 20.0);
/// assert!(!demand.fits_within(&capacity));
/// assert_eq!(demand.exceeded_dimensions(&capacity), vec![Dimension::Pallets]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Load {
    /// Pallet count.
    pub pallets: f64,
    /// Weight in kilograms.
    pub kg: f64,
    /// Volume in cubic metres.
    pub m3: f64,
}

impl Load {
    /// Creates a load from its three dimensions.
    pub fn new(pallets: f64, kg: f64, m3: f64) -> Self {
        Self { pallets, kg, m3 }
    }

    /// Value along a single dimension.
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Pallets => self.pallets,
            Dimension::Kg => self.kg,
            Dimension::M3 => self.m3,
        }
    }

    /// Returns `true` if every dimension is within `capacity`.
    pub fn fits_within(&self, capacity: &Load) -> bool {
        self.pallets <= capacity.pallets && self.kg <= capacity.kg && self.m3 <= capacity.m3
    }

    /// Dimensions in which this load exceeds `capacity`, in
    /// pallets/kg/m³ order.
    pub fn exceeded_dimensions(&self, capacity: &Load) -> Vec<Dimension> {
        [Dimension::Pallets, Dimension::Kg, Dimension::M3]
            .into_iter()
            .filter(|&d| self.get(d) > capacity.get(d))
            .collect()
    }
}

impl Add for Load {
    type Output = Load;

    fn add(self, rhs: Load) -> Load {
        Load {
            pallets: self.pallets + rhs.pallets,
            kg: self.kg + rhs.kg,
            m3: self.m3 + rhs.m3,
        }
    }
}

impl AddAssign for Load {
    fn add_assign(&mut self, rhs: Load) {
        *self = *self + rhs;
    }
}

/// Permitted arrival interval at a stop, in minutes since the vehicle leaves
/// the depot.
///
/// # Examples
///
/// ```
/// use u_mdvrp::models::TimeWindow;
///
/// let tw: TimeWindow = "08:30-12:00".parse().unwrap();
/// assert_eq!(tw.start_min(), 510.0);
/// assert!(tw.is_early(500.0));
/// assert!(tw.is_late(721.0));
/// assert!(tw.contains(600.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TimeWindowRepr")]
pub struct TimeWindow {
    start_min: f64,
    end_min: f64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `start > end` or either value is non-finite.
    pub fn new(start_min: f64, end_min: f64) -> Option<Self> {
        if !start_min.is_finite() || !end_min.is_finite() || start_min > end_min {
            return None;
        }
        Some(Self { start_min, end_min })
    }

    /// Earliest allowed arrival.
    pub fn start_min(&self) -> f64 {
        self.start_min
    }

    /// Latest allowed arrival.
    pub fn end_min(&self) -> f64 {
        self.end_min
    }

    /// Returns `true` if `arrival` lies within the window, bounds included.
    pub fn contains(&self, arrival: f64) -> bool {
        arrival >= self.start_min && arrival <= self.end_min
    }

    /// Returns `true` if `arrival` is before the window opens.
    pub fn is_early(&self, arrival: f64) -> bool {
        arrival < self.start_min
    }

    /// Returns `true` if `arrival` is after the window closes.
    pub fn is_late(&self, arrival: f64) -> bool {
        arrival > self.end_min
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            format_clock(self.start_min),
            format_clock(self.end_min)
        )
    }
}

/// Error parsing a `"HH:MM-HH:MM"` time window.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseTimeWindowError {
    /// The text is not two `HH:MM` values joined by `-`.
    #[error("expected `HH:MM-HH:MM`, got `{0}`")]
    Format(String),
    /// The window closes before it opens.
    #[error("time window `{0}` ends before it starts")]
    Reversed(String),
}

impl FromStr for TimeWindow {
    type Err = ParseTimeWindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_err = || ParseTimeWindowError::Format(s.to_string());
        let (start, end) = s.trim().split_once('-').ok_or_else(format_err)?;
        let start = parse_clock(start).ok_or_else(format_err)?;
        let end = parse_clock(end).ok_or_else(format_err)?;
        TimeWindow::new(start, end).ok_or_else(|| ParseTimeWindowError::Reversed(s.to_string()))
    }
}

/// Accepted input forms: minute bounds or `"HH:MM-HH:MM"` text.
#[derive(Deserialize)]
#[serde(untagged)]
enum TimeWindowRepr {
    Minutes { start_min: f64, end_min: f64 },
    Text(String),
}

impl TryFrom<TimeWindowRepr> for TimeWindow {
    type Error = ParseTimeWindowError;

    fn try_from(repr: TimeWindowRepr) -> Result<Self, Self::Error> {
        match repr {
            TimeWindowRepr::Minutes { start_min, end_min } => TimeWindow::new(start_min, end_min)
                .ok_or_else(|| ParseTimeWindowError::Reversed(format!("{start_min}-{end_min}"))),
            TimeWindowRepr::Text(text) => text.parse(),
        }
    }
}

fn parse_clock(text: &str) -> Option<f64> {
    let (hours, minutes) = text.trim().split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours > 24 || minutes > 59 || (hours == 24 && minutes > 0) {
        return None;
    }
    Some(f64::from(hours * 60 + minutes))
}

/// Renders minutes as `HH:MM`, rounding to the nearest minute.
pub(crate) fn format_clock(minutes: f64) -> String {
    let total = minutes.max(0.0).round() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// A delivery point (customer stop).
///
/// Immutable once an optimization run starts.
///
/// # Examples
///
/// ```
/// use u_mdvrp::models::Point;
///
/// let p = Point::new("c1", 41.01, 28.97)
///     .with_demand(4.0, 800.0, 3.5)
///     .with_required_vehicle_types(["tir"])
///     .with_service_duration(20.0);
/// assert_eq!(p.id(), "c1");
/// assert_eq!(p.demand().pallets, 4.0);
/// assert!(p.accepts_vehicle_type("tir"));
/// assert!(!p.accepts_vehicle_type("kamyon"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    id: String,
    lat: f64,
    lng: f64,
    #[serde(default, alias = "demand_pallet", alias = "demand")]
    demand_pallets: f64,
    #[serde(default)]
    demand_kg: f64,
    #[serde(default)]
    demand_m3: f64,
    #[serde(default)]
    priority: i32,
    #[serde(default)]
    required_vehicle_types: Vec<String>,
    #[serde(default)]
    time_window: Option<TimeWindow>,
    #[serde(default, alias = "service_duration", alias = "service_duration_min")]
    service_duration_minutes: f64,
}

impl Point {
    /// Creates a point with zero demand, no time window and no service time.
    pub fn new(id: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lng,
            demand_pallets: 0.0,
            demand_kg: 0.0,
            demand_m3: 0.0,
            priority: 0,
            required_vehicle_types: Vec::new(),
            time_window: None,
            service_duration_minutes: 0.0,
        }
    }

    /// Sets the demand along all three dimensions.
    pub fn with_demand(mut self, pallets: f64, kg: f64, m3: f64) -> Self {
        self.demand_pallets = pallets;
        self.demand_kg = kg;
        self.demand_m3 = m3;
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Restricts the vehicle types allowed to serve this point.
    pub fn with_required_vehicle_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_vehicle_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the arrival time window.
    pub fn with_time_window(mut self, tw: TimeWindow) -> Self {
        self.time_window = Some(tw);
        self
    }

    /// Sets the service duration in minutes.
    pub fn with_service_duration(mut self, minutes: f64) -> Self {
        self.service_duration_minutes = minutes;
        self
    }

    /// Point id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Demand along every dimension.
    pub fn demand(&self) -> Load {
        Load::new(self.demand_pallets, self.demand_kg, self.demand_m3)
    }

    /// Priority (informational).
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Vehicle types allowed to serve this point. Empty means any.
    pub fn required_vehicle_types(&self) -> &[String] {
        &self.required_vehicle_types
    }

    /// Returns `true` if this point restricts the vehicle type.
    pub fn has_vehicle_type_requirement(&self) -> bool {
        !self.required_vehicle_types.is_empty()
            && !self
                .required_vehicle_types
                .iter()
                .any(|t| t == ANY_VEHICLE_TYPE)
    }

    /// Returns `true` if a vehicle tagged `vehicle_type` may serve this point.
    pub fn accepts_vehicle_type(&self, vehicle_type: &str) -> bool {
        !self.has_vehicle_type_requirement()
            || self.required_vehicle_types.iter().any(|t| t == vehicle_type)
    }

    /// Arrival time window, if any.
    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.time_window.as_ref()
    }

    /// Service duration in minutes.
    pub fn service_duration(&self) -> f64 {
        self.service_duration_minutes
    }

    /// Great-circle distance to another point, in kilometres.
    pub fn distance_to(&self, other: &Point) -> f64 {
        haversine_km(self.lat, self.lng, other.lat, other.lng)
    }
}

/// A depot: the start and end of every route of its vehicles.
///
/// `capacity` is the aggregate depot capacity and is informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Depot {
    #[serde(flatten)]
    point: Point,
    #[serde(default)]
    capacity: f64,
}

impl Depot {
    /// Creates a depot at the given coordinates.
    pub fn new(id: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            point: Point::new(id, lat, lng),
            capacity: 0.0,
        }
    }

    /// Sets the aggregate capacity.
    pub fn with_capacity(mut self, capacity: f64) -> Self {
        self.capacity = capacity;
        self
    }

    /// Depot id.
    pub fn id(&self) -> &str {
        self.point.id()
    }

    /// The depot location as a point.
    pub fn point(&self) -> &Point {
        &self.point
    }

    /// Aggregate capacity.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window_valid() {
        let tw = TimeWindow::new(10.0, 20.0).expect("valid");
        assert_eq!(tw.start_min(), 10.0);
        assert_eq!(tw.end_min(), 20.0);
    }

    #[test]
    fn test_time_window_invalid() {
        assert!(TimeWindow::new(20.0, 10.0).is_none());
        assert!(TimeWindow::new(f64::NAN, 10.0).is_none());
        assert!(TimeWindow::new(10.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_time_window_bounds() {
        let tw = TimeWindow::new(10.0, 20.0).expect("valid");
        assert!(tw.contains(10.0));
        assert!(tw.contains(20.0));
        assert!(tw.is_early(9.9));
        assert!(!tw.is_early(10.0));
        assert!(tw.is_late(20.1));
        assert!(!tw.is_late(20.0));
    }

    #[test]
    fn test_time_window_parse() {
        let tw: TimeWindow = " 06:00 - 14:45 ".parse().expect("valid");
        assert_eq!(tw.start_min(), 360.0);
        assert_eq!(tw.end_min(), 885.0);
        assert_eq!(tw.to_string(), "06:00-14:45");
    }

    #[test]
    fn test_time_window_parse_errors() {
        assert!(matches!(
            "0600-1400".parse::<TimeWindow>(),
            Err(ParseTimeWindowError::Format(_))
        ));
        assert!(matches!(
            "10:75-11:00".parse::<TimeWindow>(),
            Err(ParseTimeWindowError::Format(_))
        ));
        assert!(matches!(
            "14:00-06:00".parse::<TimeWindow>(),
            Err(ParseTimeWindowError::Reversed(_))
        ));
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(605.4), "10:05");
        assert_eq!(format_clock(-3.0), "00:00");
    }

    #[test]
    fn test_load_add_and_fit() {
        let mut load = Load::new(1.0, 100.0, 1.0);
        load += Load::new(2.0, 50.0, 0.5);
        assert_eq!(load, Load::new(3.0, 150.0, 1.5));
        assert!(load.fits_within(&Load::new(3.0, 150.0, 1.5)));
        assert!(!load.fits_within(&Load::new(3.0, 149.0, 1.5)));
    }

    #[test]
    fn test_load_exceeded_dimensions() {
        let load = Load::new(10.0, 5000.0, 30.0);
        let cap = Load::new(8.0, 6000.0, 20.0);
        assert_eq!(
            load.exceeded_dimensions(&cap),
            vec![Dimension::Pallets, Dimension::M3]
        );
    }

    #[test]
    fn test_point_builder() {
        let tw = TimeWindow::new(60.0, 120.0).expect("valid");
        let p = Point::new("c7", 40.0, 29.0)
            .with_demand(2.0, 300.0, 1.2)
            .with_priority(3)
            .with_time_window(tw)
            .with_service_duration(15.0);
        assert_eq!(p.id(), "c7");
        assert_eq!(p.demand(), Load::new(2.0, 300.0, 1.2));
        assert_eq!(p.priority(), 3);
        assert_eq!(p.time_window(), Some(&tw));
        assert_eq!(p.service_duration(), 15.0);
    }

    #[test]
    fn test_vehicle_type_wildcard() {
        let open = Point::new("a", 0.0, 0.0);
        assert!(!open.has_vehicle_type_requirement());
        assert!(open.accepts_vehicle_type("kamyonet"));

        let any = Point::new("b", 0.0, 0.0).with_required_vehicle_types(["any"]);
        assert!(any.accepts_vehicle_type("tir"));

        let tir = Point::new("c", 0.0, 0.0).with_required_vehicle_types(["tir", "romork"]);
        assert!(tir.accepts_vehicle_type("romork"));
        assert!(!tir.accepts_vehicle_type("kamyon"));
    }

    #[test]
    fn test_point_deserialize_aliases() {
        let json = r#"{
            "id": "c1", "lat": 41.0, "lng": 29.0,
            "demand_pallet": 5, "demand_kg": 1200,
            "service_duration_min": 10,
            "time_window": {"start_min": 480, "end_min": 600}
        }"#;
        let p: Point = serde_json::from_str(json).expect("valid point");
        assert_eq!(p.demand(), Load::new(5.0, 1200.0, 0.0));
        assert_eq!(p.service_duration(), 10.0);
        assert_eq!(p.time_window().map(|tw| tw.start_min()), Some(480.0));
    }

    #[test]
    fn test_time_window_deserialize_text() {
        let json = r#"{"id": "c2", "lat": 41.0, "lng": 29.0, "time_window": "08:00-12:00"}"#;
        let p: Point = serde_json::from_str(json).expect("valid point");
        assert_eq!(p.time_window().copied(), TimeWindow::new(480.0, 720.0));
    }

    #[test]
    fn test_time_window_deserialize_rejects_reversed() {
        let minutes = serde_json::from_str::<TimeWindow>(r#"{"start_min": 600, "end_min": 480}"#);
        assert!(minutes.is_err());
        let text = serde_json::from_str::<TimeWindow>(r#""12:00-08:00""#);
        assert!(text.is_err());
        let garbage = serde_json::from_str::<TimeWindow>(r#""noon""#);
        assert!(garbage.is_err());
    }

    #[test]
    fn test_time_window_serde_keeps_minutes() {
        let tw = TimeWindow::new(510.0, 720.0).expect("ordered");
        let json = serde_json::to_string(&tw).expect("serializable");
        assert_eq!(json, r#"{"start_min":510.0,"end_min":720.0}"#);
        let back: TimeWindow = serde_json::from_str(&json).expect("round trip");
        assert_eq!(back, tw);
    }

    #[test]
    fn test_depot() {
        let d = Depot::new("d1", 41.0, 29.0).with_capacity(500.0);
        assert_eq!(d.id(), "d1");
        assert_eq!(d.point().lat(), 41.0);
        assert_eq!(d.capacity(), 500.0);
        assert_eq!(d.point().demand(), Load::default());
    }
}
