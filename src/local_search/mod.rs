//! Local search operators for improving routes.
//!
//! - [`two_opt`] — Intra-route 2-opt segment reversal

mod two_opt;

pub use two_opt::{route_distance, two_opt_improve};
