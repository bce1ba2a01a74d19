//! Distances and travel times between points.
//!
//! A [`DistanceProvider`] builds one [`DistanceMatrix`] per run over every
//! depot and customer. [`StraightLineProvider`] is the built-in haversine
//! implementation; [`BatchedProvider`] drives an external road-network
//! [`TableSource`] in bounded blocks with a straight-line fallback.

mod batched;
mod error;
mod haversine;
mod matrix;
mod provider;

pub use batched::{BatchedProvider, TableSource, DEFAULT_BATCH_SIZE, DEFAULT_DETOUR_FACTOR};
pub use error::DistanceError;
pub use haversine::{haversine_km, EARTH_RADIUS_KM};
pub use matrix::{DistanceMatrix, Leg};
pub use provider::{DistanceProvider, StraightLineProvider};
