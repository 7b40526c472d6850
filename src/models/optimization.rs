//! Optimization result and history record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The outcome of one optimizer invocation.
///
/// `optimized_order` is a permutation of the stop ids the optimizer resolved:
/// same multiset, same length. Savings figures may be negative when the
/// heuristic fails to beat the original order, since the original order is
/// arbitrary rather than a randomized baseline.
///
/// # Examples
///
/// ```
/// use route_optimizer::models::OptimizationResult;
///
/// let result = OptimizationResult {
///     optimized_order: vec!["b".into(), "a".into()],
///     original_distance_km: 12.0,
///     optimized_distance_km: 9.0,
///     time_saved_minutes: 9,
///     fuel_saved_liters: 0.3,
///     suggestions: vec![],
/// };
/// assert!((result.distance_saved_km() - 3.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Stop ids in the improved visiting order.
    pub optimized_order: Vec<String>,
    /// Path distance of the as-given order, km.
    pub original_distance_km: f64,
    /// Path distance of the reordered sequence, km.
    pub optimized_distance_km: f64,
    /// Estimated driving time saved, whole minutes. Negative if worse.
    pub time_saved_minutes: i64,
    /// Estimated fuel saved, liters rounded to one decimal. Negative if worse.
    pub fuel_saved_liters: f64,
    /// Human-readable advice, possibly empty.
    pub suggestions: Vec<String>,
}

impl OptimizationResult {
    /// Distance saved by the reordering, km. Negative if the heuristic lost.
    pub fn distance_saved_km(&self) -> f64 {
        self.original_distance_km - self.optimized_distance_km
    }
}

/// A persisted history entry: one result plus identity and timestamp.
///
/// Records are append-only; they are created once per optimizer run and never
/// updated or deleted by this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationRecord {
    /// Record identifier, assigned at creation.
    pub id: Uuid,
    /// The route this run optimized.
    pub route_id: String,
    /// Creation time, UTC.
    pub created_at: DateTime<Utc>,
    /// The run's outcome.
    pub result: OptimizationResult,
}

impl OptimizationRecord {
    /// Creates a record for `route_id` stamped with the current time.
    pub fn new(route_id: impl Into<String>, result: OptimizationResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            route_id: route_id.into(),
            created_at: Utc::now(),
            result,
        }
    }
}
