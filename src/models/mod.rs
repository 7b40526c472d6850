//! Domain model types for route optimization.
//!
//! Provides the core value types: geolocated stops, routes as ordered stop-id
//! sequences, and the result/record pair produced by each optimizer run.

mod optimization;
mod route;
mod stop;

pub use optimization::{OptimizationRecord, OptimizationResult};
pub use route::{Route, RouteStatus};
pub use stop::Stop;
