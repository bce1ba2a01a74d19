//! # u-mdvrp
//!
//! Multi-depot capacitated vehicle routing for daily delivery planning:
//! customers go to their nearest depot, routes are built per depot with the
//! Clarke-Wright savings heuristic under multi-dimensional capacity, vehicle
//! type and driver working time limits, then polished with 2-opt and costed.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Point, Depot, Vehicle, Route, OptimizationResult)
//! - [`distance`] — Distance providers and the shared distance/time matrix
//! - [`evaluation`] — Route evaluation and post-hoc constraint validation
//! - [`constructive`] — Clarke-Wright savings construction
//! - [`local_search`] — 2-opt route improvement
//! - [`optimizer`] — Multi-depot orchestration
//!
//! ## Example
//!
//! ```
//! use u_mdvrp::models::{Depot, OptimizationParams, Point, Vehicle};
//!
//! let depots = vec![Depot::new("ankara", 39.93, 32.85)];
//! let customers = vec![
//!     Point::new("c1", 39.95, 32.80).with_demand(3.0, 600.0, 2.0),
//!     Point::new("c2", 39.96, 32.81).with_demand(2.0, 400.0, 1.5),
//! ];
//! let vehicles = vec![Vehicle::new("v1", "ankara", "kamyon").with_capacity(12.0, 8000.0, 30.0)];
//!
//! let result = u_mdvrp::optimize_routes(&depots, &customers, &vehicles, &OptimizationParams::default())?;
//! assert_eq!(result.vehicles_used(), 1);
//! assert!(result.unassigned().is_empty());
//! # Ok::<(), u_mdvrp::OptimizeError>(())
//! ```

pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod local_search;
pub mod models;
pub mod optimizer;

pub use error::OptimizeError;
pub use optimizer::{optimize_routes, validate_result, Optimizer, Plan};
