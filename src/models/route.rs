//! Delivery route type.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a route, maintained by the owning backend.
///
/// The optimizer reads routes in any state; the status is carried for
/// embedders that serialize routes alongside optimization results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    /// Created but not yet assigned or started.
    Planned,
    /// Currently being driven.
    Active,
    /// All stops visited.
    Completed,
}

/// An ordered collection of stop ids assigned to a driver.
///
/// The optimizer never mutates a route; it reads `stop_ids`, resolves them to
/// [`Stop`](crate::models::Stop)s, and writes a separate
/// [`OptimizationRecord`](crate::models::OptimizationRecord).
///
/// # Examples
///
/// ```
/// use route_optimizer::models::{Route, RouteStatus};
///
/// let route = Route::new("r1", "Morning run", vec!["a".into(), "b".into()]);
/// assert_eq!(route.stop_ids.len(), 2);
/// assert_eq!(route.status, RouteStatus::Planned);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    /// Stable route identifier.
    pub id: String,
    /// Display name, used in suggestion prompts.
    pub name: String,
    /// Stop ids in the currently planned visiting order.
    pub stop_ids: Vec<String>,
    /// Lifecycle state.
    pub status: RouteStatus,
}

impl Route {
    /// Creates a planned route with the given stops.
    pub fn new(id: impl Into<String>, name: impl Into<String>, stop_ids: Vec<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stop_ids,
            status: RouteStatus::Planned,
        }
    }

    /// Sets the lifecycle state.
    pub fn with_status(mut self, status: RouteStatus) -> Self {
        self.status = status;
        self
    }
}
