//! In-memory store implementations.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::models::{OptimizationRecord, Route, Stop};

use super::{OptimizationHistory, RouteStore, StopStore, StoreError};

/// Routes held in a `RwLock`-guarded map, keyed by id.
///
/// # Examples
///
/// ```
/// use route_optimizer::models::Route;
/// use route_optimizer::store::{InMemoryRouteStore, RouteStore};
///
/// let store = InMemoryRouteStore::new(vec![Route::new("r1", "North", vec![])]);
/// assert!(store.get_route("r1").is_some());
/// assert!(store.get_route("r2").is_none());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryRouteStore {
    routes: RwLock<HashMap<String, Route>>,
}

impl InMemoryRouteStore {
    /// Creates a store preloaded with the given routes.
    pub fn new(routes: Vec<Route>) -> Self {
        let map = routes.into_iter().map(|r| (r.id.clone(), r)).collect();
        Self {
            routes: RwLock::new(map),
        }
    }

    /// Inserts or replaces a route.
    pub fn insert(&self, route: Route) {
        self.routes
            .write()
            .expect("route store lock poisoned")
            .insert(route.id.clone(), route);
    }
}

impl RouteStore for InMemoryRouteStore {
    fn get_route(&self, route_id: &str) -> Option<Route> {
        self.routes
            .read()
            .expect("route store lock poisoned")
            .get(route_id)
            .cloned()
    }
}

/// Stops held in memory, returned wholesale on each fetch.
#[derive(Debug, Default)]
pub struct InMemoryStopStore {
    stops: RwLock<Vec<Stop>>,
}

impl InMemoryStopStore {
    /// Creates a store preloaded with the given stops.
    pub fn new(stops: Vec<Stop>) -> Self {
        Self {
            stops: RwLock::new(stops),
        }
    }

    /// Adds a stop.
    pub fn insert(&self, stop: Stop) {
        self.stops
            .write()
            .expect("stop store lock poisoned")
            .push(stop);
    }
}

impl StopStore for InMemoryStopStore {
    fn all_stops(&self) -> Vec<Stop> {
        self.stops
            .read()
            .expect("stop store lock poisoned")
            .clone()
    }
}

/// Append-only history held in an in-memory vector, insertion-ordered.
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    records: RwLock<Vec<OptimizationRecord>>,
}

impl InMemoryHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().expect("history lock poisoned").len()
    }

    /// Returns `true` if no records have been appended.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OptimizationHistory for InMemoryHistory {
    fn append(&self, record: OptimizationRecord) -> Result<(), StoreError> {
        self.records
            .write()
            .expect("history lock poisoned")
            .push(record);
        Ok(())
    }

    fn query(&self, route_id: Option<&str>, limit: usize) -> Vec<OptimizationRecord> {
        self.records
            .read()
            .expect("history lock poisoned")
            .iter()
            .filter(|r| route_id.map_or(true, |id| r.route_id == id))
            .take(limit)
            .cloned()
            .collect()
    }
}
