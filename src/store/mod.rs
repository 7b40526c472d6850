//! Collaborator contracts for routes, stops, and optimization history.
//!
//! These traits are intentionally minimal. The backend that embeds this crate
//! implements them over its own database; the in-memory implementations here
//! back the test suite and small deployments without external storage.

mod memory;

pub use memory::{InMemoryHistory, InMemoryRouteStore, InMemoryStopStore};

use thiserror::Error;

use crate::models::{OptimizationRecord, Route, Stop};

/// Error from a storage collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store rejected or lost a write.
    #[error("history write failed: {0}")]
    WriteFailed(String),
}

/// Read access to routes.
pub trait RouteStore: Send + Sync {
    /// Looks up a route by id. `None` if no such route exists.
    fn get_route(&self, route_id: &str) -> Option<Route>;
}

/// Read access to delivery stops.
pub trait StopStore: Send + Sync {
    /// Returns every known stop.
    ///
    /// Bulk fetch by contract; the optimizer filters by id in memory.
    fn all_stops(&self) -> Vec<Stop>;
}

/// Append-only optimization history.
pub trait OptimizationHistory: Send + Sync {
    /// Appends one record. Records are never updated or deleted.
    fn append(&self, record: OptimizationRecord) -> Result<(), StoreError>;

    /// Returns up to `limit` records in insertion order, optionally filtered
    /// to a single route.
    fn query(&self, route_id: Option<&str>, limit: usize) -> Vec<OptimizationRecord>;
}
