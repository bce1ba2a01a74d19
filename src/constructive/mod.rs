//! Constructive heuristics for building initial routes.
//!
//! - [`clarke_wright`] — Clarke-Wright savings with multi-dimensional load,
//!   vehicle types and driver hours (1964), O(n² log n)

mod clarke_wright;

pub use clarke_wright::{clarke_wright_savings, SavingsOutcome};
