//! Vehicles, their capacities, costs and driver rules.

use serde::{Deserialize, Serialize};

use super::{Load, Point};

/// Driver working-time regulation attached to a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverRules {
    /// Maximum working time per route, in hours.
    pub max_work_hours: f64,
    /// Continuous driving allowed before a break, in hours.
    pub break_after_hours: f64,
    /// Length of a mandatory break, in minutes.
    pub break_duration_minutes: f64,
}

impl Default for DriverRules {
    fn default() -> Self {
        Self {
            max_work_hours: default_max_work_hours(),
            break_after_hours: default_break_after_hours(),
            break_duration_minutes: default_break_duration(),
        }
    }
}

fn default_max_work_hours() -> f64 {
    9.0
}

fn default_break_after_hours() -> f64 {
    4.5
}

fn default_break_duration() -> f64 {
    45.0
}

impl DriverRules {
    /// Maximum working time in minutes.
    pub fn max_work_minutes(&self) -> f64 {
        self.max_work_hours * 60.0
    }

    /// Driving time after which a break is due, in minutes.
    pub fn break_after_minutes(&self) -> f64 {
        self.break_after_hours * 60.0
    }
}

/// A vehicle stationed at a depot.
///
/// A vehicle serves at most one route per optimization run.
///
/// # Examples
///
/// ```
/// use u_mdvrp::models::{Load, Vehicle};
///
/// let v = Vehicle::new("v1", "d1", "kamyon")
///     .with_capacity(15.0, 12000.0, 40.0)
///     .with_costs(1.2, 22.0, 500.0);
/// assert_eq!(v.depot_id(), "d1");
/// assert!(v.can_carry(&Load::new(15.0, 9000.0, 10.0)));
/// assert!(!v.can_carry(&Load::new(16.0, 9000.0, 10.0)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    id: String,
    depot_id: String,
    #[serde(default, alias = "capacity_pallet")]
    capacity_pallets: f64,
    #[serde(default)]
    capacity_kg: f64,
    #[serde(default)]
    capacity_m3: f64,
    #[serde(default, alias = "type", alias = "allowed_vehicle_type_tag")]
    vehicle_type: String,
    #[serde(default)]
    cost_per_km: f64,
    #[serde(default)]
    fuel_consumption_per_100km: f64,
    #[serde(default)]
    fixed_daily_cost: f64,
    #[serde(default = "default_speed")]
    avg_speed_kmh: f64,
    #[serde(default = "default_max_work_hours")]
    driver_max_work_hours: f64,
    #[serde(default = "default_break_after_hours")]
    driver_break_after_hours: f64,
    #[serde(default = "default_break_duration", alias = "driver_break_duration")]
    driver_break_duration_minutes: f64,
}

fn default_speed() -> f64 {
    50.0
}

impl Vehicle {
    /// Creates a vehicle with zero capacity and costs, default driver rules
    /// and a 50 km/h average speed.
    pub fn new(
        id: impl Into<String>,
        depot_id: impl Into<String>,
        vehicle_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            depot_id: depot_id.into(),
            capacity_pallets: 0.0,
            capacity_kg: 0.0,
            capacity_m3: 0.0,
            vehicle_type: vehicle_type.into(),
            cost_per_km: 0.0,
            fuel_consumption_per_100km: 0.0,
            fixed_daily_cost: 0.0,
            avg_speed_kmh: default_speed(),
            driver_max_work_hours: default_max_work_hours(),
            driver_break_after_hours: default_break_after_hours(),
            driver_break_duration_minutes: default_break_duration(),
        }
    }

    /// Sets the capacity along all three dimensions.
    pub fn with_capacity(mut self, pallets: f64, kg: f64, m3: f64) -> Self {
        self.capacity_pallets = pallets;
        self.capacity_kg = kg;
        self.capacity_m3 = m3;
        self
    }

    /// Sets per-km cost, fuel consumption (l/100 km) and fixed daily cost.
    pub fn with_costs(mut self, cost_per_km: f64, fuel_per_100km: f64, fixed_daily: f64) -> Self {
        self.cost_per_km = cost_per_km;
        self.fuel_consumption_per_100km = fuel_per_100km;
        self.fixed_daily_cost = fixed_daily;
        self
    }

    /// Sets the average speed.
    pub fn with_avg_speed(mut self, kmh: f64) -> Self {
        self.avg_speed_kmh = kmh;
        self
    }

    /// Sets the driver rules.
    pub fn with_driver_rules(mut self, rules: DriverRules) -> Self {
        self.driver_max_work_hours = rules.max_work_hours;
        self.driver_break_after_hours = rules.break_after_hours;
        self.driver_break_duration_minutes = rules.break_duration_minutes;
        self
    }

    /// Vehicle id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Owning depot id.
    pub fn depot_id(&self) -> &str {
        &self.depot_id
    }

    /// Capacity along every dimension.
    pub fn capacity(&self) -> Load {
        Load::new(self.capacity_pallets, self.capacity_kg, self.capacity_m3)
    }

    /// Vehicle type tag (e.g. `"kamyon"`, `"tir"`).
    pub fn vehicle_type(&self) -> &str {
        &self.vehicle_type
    }

    /// Cost per kilometre driven.
    pub fn cost_per_km(&self) -> f64 {
        self.cost_per_km
    }

    /// Fuel consumption in litres per 100 km.
    pub fn fuel_consumption_per_100km(&self) -> f64 {
        self.fuel_consumption_per_100km
    }

    /// Fixed cost for using this vehicle for a day.
    pub fn fixed_daily_cost(&self) -> f64 {
        self.fixed_daily_cost
    }

    /// Average speed in km/h (informational).
    pub fn avg_speed_kmh(&self) -> f64 {
        self.avg_speed_kmh
    }

    /// Driver rules.
    pub fn driver(&self) -> DriverRules {
        DriverRules {
            max_work_hours: self.driver_max_work_hours,
            break_after_hours: self.driver_break_after_hours,
            break_duration_minutes: self.driver_break_duration_minutes,
        }
    }

    /// Returns `true` if `load` fits in every dimension.
    pub fn can_carry(&self, load: &Load) -> bool {
        load.fits_within(&self.capacity())
    }

    /// Returns `true` if every point in `points` accepts this vehicle's type.
    pub fn is_eligible_for<'a, I>(&self, points: I) -> bool
    where
        I: IntoIterator<Item = &'a Point>,
    {
        points
            .into_iter()
            .all(|p| p.accepts_vehicle_type(&self.vehicle_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_new() {
        let v = Vehicle::new("v1", "d1", "kamyonet");
        assert_eq!(v.id(), "v1");
        assert_eq!(v.depot_id(), "d1");
        assert_eq!(v.vehicle_type(), "kamyonet");
        assert_eq!(v.capacity(), Load::default());
        assert_eq!(v.avg_speed_kmh(), 50.0);
        assert_eq!(v.driver(), DriverRules::default());
    }

    #[test]
    fn test_vehicle_builder() {
        let rules = DriverRules {
            max_work_hours: 11.0,
            break_after_hours: 4.0,
            break_duration_minutes: 30.0,
        };
        let v = Vehicle::new("v2", "d1", "tir")
            .with_capacity(33.0, 24000.0, 90.0)
            .with_costs(2.5, 35.0, 1200.0)
            .with_avg_speed(70.0)
            .with_driver_rules(rules);
        assert_eq!(v.capacity(), Load::new(33.0, 24000.0, 90.0));
        assert_eq!(v.cost_per_km(), 2.5);
        assert_eq!(v.fuel_consumption_per_100km(), 35.0);
        assert_eq!(v.fixed_daily_cost(), 1200.0);
        assert_eq!(v.avg_speed_kmh(), 70.0);
        assert_eq!(v.driver().max_work_minutes(), 660.0);
        assert_eq!(v.driver().break_after_minutes(), 240.0);
    }

    #[test]
    fn test_vehicle_eligibility() {
        let tir = Vehicle::new("v", "d", "tir");
        let points = [
            Point::new("a", 0.0, 0.0),
            Point::new("b", 0.0, 0.0).with_required_vehicle_types(["tir", "romork"]),
        ];
        assert!(tir.is_eligible_for(&points));

        let kamyon = Vehicle::new("k", "d", "kamyon");
        assert!(!kamyon.is_eligible_for(&points));
        assert!(kamyon.is_eligible_for(&points[..1]));
    }

    #[test]
    fn test_vehicle_deserialize_aliases() {
        let json = r#"{
            "id": "v9", "depot_id": "d2", "type": "kamyon",
            "capacity_pallet": 15, "capacity_kg": 12000,
            "driver_max_work_hours": 11, "driver_break_duration": 30
        }"#;
        let v: Vehicle = serde_json::from_str(json).expect("valid vehicle");
        assert_eq!(v.vehicle_type(), "kamyon");
        assert_eq!(v.capacity().pallets, 15.0);
        assert_eq!(v.driver().max_work_hours, 11.0);
        assert_eq!(v.driver().break_after_hours, 4.5);
        assert_eq!(v.driver().break_duration_minutes, 30.0);
        assert_eq!(v.avg_speed_kmh(), 50.0);
    }
}
