//! Nearest-neighbor route optimizer.
//!
//! Takes a route's stop list, reorders it greedily (always drive to the
//! nearest unvisited stop), accounts the distance/time/fuel saved against the
//! as-given order, decorates the result with suggestions from an injected
//! [`AdviceGenerator`], and appends a record to the optimization history.
//!
//! The optimizer is stateless between calls; concurrent runs over the same
//! route are independent and each appends its own history record.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::advice::{fallback_suggestions, AdviceGenerator, AdvicePrompt};
use crate::geo::{distance_km, total_path_distance_km, GeoPoint};
use crate::models::{OptimizationRecord, OptimizationResult, Route, Stop};
use crate::store::{OptimizationHistory, RouteStore, StopStore};

/// Records returned by a history query when no limit is given.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// The single suggestion returned when a route cannot be optimized.
const TOO_FEW_STOPS_SUGGESTION: &str =
    "Route has fewer than two resolvable stops; there is nothing to reorder.";

/// Tunable business assumptions behind the savings figures.
///
/// The defaults reproduce the operation's historical constants: 3 minutes of
/// driving per kilometer saved (~20 km/h average urban speed) and 0.1 liters
/// of fuel per kilometer.
#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    /// Minutes of driving time attributed to each kilometer saved.
    pub minutes_per_km_saved: f64,
    /// Liters of fuel attributed to each kilometer saved.
    pub fuel_liters_per_km: f64,
    /// Upper bound on the advice-generator round-trip; expiry falls back to
    /// the static suggestion list.
    pub advice_timeout: Duration,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            minutes_per_km_saved: 3.0,
            fuel_liters_per_km: 0.1,
            advice_timeout: Duration::from_secs(5),
        }
    }
}

/// Error from [`RouteOptimizer::optimize_route`].
///
/// Only an unknown route id is fatal; every other failure mode (unresolvable
/// stops, advice outage, history write failure) degrades to a usable result.
#[derive(Debug, Error)]
pub enum OptimizeError {
    /// The route store has no route with this id.
    #[error("route not found: {0}")]
    RouteNotFound(String),
}

/// Greedy nearest-neighbor visiting order over a set of points.
///
/// Returns indices into `points`: the tour starts at index 0 (the anchor is
/// never re-selected) and repeatedly appends the unvisited point closest to
/// the tour's current end. Ties keep the lowest remaining index because the
/// scan only replaces the incumbent on a strictly smaller distance, so
/// symmetric geometries reproduce deterministically.
///
/// # Examples
///
/// ```
/// use route_optimizer::geo::GeoPoint;
/// use route_optimizer::optimizer::nearest_neighbor_order;
///
/// // Stops on the equator at longitudes 0, 2, 1; greedy visits 0, 1, 2.
/// let points = vec![
///     GeoPoint::new(0.0, 0.0),
///     GeoPoint::new(0.0, 2.0),
///     GeoPoint::new(0.0, 1.0),
/// ];
/// assert_eq!(nearest_neighbor_order(&points), vec![0, 2, 1]);
/// ```
pub fn nearest_neighbor_order(points: &[GeoPoint]) -> Vec<usize> {
    let n = points.len();
    if n <= 1 {
        return (0..n).collect();
    }

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    visited[0] = true;
    order.push(0);
    let mut current = 0;

    for _ in 1..n {
        let mut best: Option<(usize, f64)> = None;
        for (i, point) in points.iter().enumerate() {
            if visited[i] {
                continue;
            }
            let d = distance_km(points[current], *point);
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((i, d));
            }
        }
        let (next, _) = best.expect("unvisited point remains");
        visited[next] = true;
        order.push(next);
        current = next;
    }

    order
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// The route optimizer, wired to its four collaborators.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use route_optimizer::advice::{AdviceError, AdviceGenerator, AdvicePrompt};
/// use route_optimizer::models::{Route, Stop};
/// use route_optimizer::store::{InMemoryHistory, InMemoryRouteStore, InMemoryStopStore};
/// use route_optimizer::RouteOptimizer;
///
/// struct NoAdvice;
///
/// #[async_trait::async_trait]
/// impl AdviceGenerator for NoAdvice {
///     async fn suggest(&self, _prompt: &AdvicePrompt) -> Result<Vec<String>, AdviceError> {
///         Err(AdviceError::Empty)
///     }
/// }
///
/// # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
/// let routes = Arc::new(InMemoryRouteStore::new(vec![
///     Route::new("r1", "North loop", vec!["a".into(), "b".into(), "c".into()]),
/// ]));
/// let stops = Arc::new(InMemoryStopStore::new(vec![
///     Stop::new("a", "Shop A", 0.0, 0.0),
///     Stop::new("b", "Shop B", 0.0, 2.0),
///     Stop::new("c", "Shop C", 0.0, 1.0),
/// ]));
/// let history = Arc::new(InMemoryHistory::new());
/// let optimizer = RouteOptimizer::new(routes, stops, history, Arc::new(NoAdvice));
///
/// let result = optimizer.optimize_route("r1").await.unwrap();
/// assert_eq!(result.optimized_order, vec!["a", "c", "b"]);
/// # });
/// ```
pub struct RouteOptimizer {
    routes: Arc<dyn RouteStore>,
    stops: Arc<dyn StopStore>,
    history: Arc<dyn OptimizationHistory>,
    advice: Arc<dyn AdviceGenerator>,
    config: OptimizerConfig,
}

impl RouteOptimizer {
    /// Creates an optimizer with the default [`OptimizerConfig`].
    pub fn new(
        routes: Arc<dyn RouteStore>,
        stops: Arc<dyn StopStore>,
        history: Arc<dyn OptimizationHistory>,
        advice: Arc<dyn AdviceGenerator>,
    ) -> Self {
        Self::with_config(routes, stops, history, advice, OptimizerConfig::default())
    }

    /// Creates an optimizer with explicit configuration.
    pub fn with_config(
        routes: Arc<dyn RouteStore>,
        stops: Arc<dyn StopStore>,
        history: Arc<dyn OptimizationHistory>,
        advice: Arc<dyn AdviceGenerator>,
        config: OptimizerConfig,
    ) -> Self {
        Self {
            routes,
            stops,
            history,
            advice,
            config,
        }
    }

    /// Optimizes the visiting order of the given route.
    ///
    /// Loads the route, resolves its stop ids (ids that resolve to no known
    /// stop are dropped with a warning), reorders the resolved stops with
    /// [`nearest_neighbor_order`], derives the savings figures, fetches
    /// suggestions (falling back to the static list on any generator failure
    /// or timeout), and appends a history record.
    ///
    /// Routes with fewer than two resolvable stops short-circuit: the
    /// original id order is returned with all-zero metrics and a single
    /// explanatory suggestion, and no history record is written.
    ///
    /// Fails only with [`OptimizeError::RouteNotFound`].
    pub async fn optimize_route(&self, route_id: &str) -> Result<OptimizationResult, OptimizeError> {
        let route = self
            .routes
            .get_route(route_id)
            .ok_or_else(|| OptimizeError::RouteNotFound(route_id.to_string()))?;

        let resolved = self.resolve_stops(&route);

        if resolved.len() < 2 {
            debug!(route_id, resolved = resolved.len(), "too few stops, skipping optimization");
            return Ok(OptimizationResult {
                optimized_order: route.stop_ids.clone(),
                original_distance_km: 0.0,
                optimized_distance_km: 0.0,
                time_saved_minutes: 0,
                fuel_saved_liters: 0.0,
                suggestions: vec![TOO_FEW_STOPS_SUGGESTION.to_string()],
            });
        }

        let points: Vec<GeoPoint> = resolved.iter().map(Stop::position).collect();
        let original_distance_km = total_path_distance_km(&points);

        let order = nearest_neighbor_order(&points);
        let optimized_points: Vec<GeoPoint> = order.iter().map(|&i| points[i]).collect();
        let optimized_distance_km = total_path_distance_km(&optimized_points);

        let saved_km = original_distance_km - optimized_distance_km;
        let time_saved_minutes = (saved_km * self.config.minutes_per_km_saved).round() as i64;
        let fuel_saved_liters = round_to_tenth(saved_km * self.config.fuel_liters_per_km);

        let prompt = AdvicePrompt {
            route_name: route.name.clone(),
            original_stops: resolved.iter().map(|s| s.name.clone()).collect(),
            optimized_stops: order.iter().map(|&i| resolved[i].name.clone()).collect(),
            distance_saved_km: saved_km,
            time_saved_minutes,
            fuel_saved_liters,
        };
        let suggestions = self.request_suggestions(&prompt).await;

        let result = OptimizationResult {
            optimized_order: order.iter().map(|&i| resolved[i].id.clone()).collect(),
            original_distance_km,
            optimized_distance_km,
            time_saved_minutes,
            fuel_saved_liters,
            suggestions,
        };

        if let Err(err) = self
            .history
            .append(OptimizationRecord::new(&route.id, result.clone()))
        {
            warn!(route_id = %route.id, error = %err, "optimization record not persisted");
        }

        debug!(
            route_id = %route.id,
            original_km = original_distance_km,
            optimized_km = optimized_distance_km,
            "route optimized"
        );
        Ok(result)
    }

    /// Past optimization runs, optionally filtered to one route.
    ///
    /// `limit` defaults to [`DEFAULT_HISTORY_LIMIT`]; ordering is the
    /// history store's insertion order.
    pub fn optimization_history(
        &self,
        route_id: Option<&str>,
        limit: Option<usize>,
    ) -> Vec<OptimizationRecord> {
        self.history
            .query(route_id, limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
    }

    /// Resolves the route's stop ids against the stop store, preserving the
    /// route's order. Ids with no matching stop are dropped with a warning.
    fn resolve_stops(&self, route: &Route) -> Vec<Stop> {
        let by_id: HashMap<String, Stop> = self
            .stops
            .all_stops()
            .into_iter()
            .map(|s| (s.id.clone(), s))
            .collect();

        let mut resolved = Vec::with_capacity(route.stop_ids.len());
        for id in &route.stop_ids {
            match by_id.get(id) {
                Some(stop) => resolved.push(stop.clone()),
                None => warn!(route_id = %route.id, stop_id = %id, "stop id did not resolve, dropping"),
            }
        }
        resolved
    }

    async fn request_suggestions(&self, prompt: &AdvicePrompt) -> Vec<String> {
        match timeout(self.config.advice_timeout, self.advice.suggest(prompt)).await {
            Ok(Ok(suggestions)) => suggestions,
            Ok(Err(err)) => {
                warn!(error = %err, "advice generator failed, using fallback suggestions");
                fallback_suggestions()
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.config.advice_timeout.as_millis() as u64,
                    "advice generator timed out, using fallback suggestions"
                );
                fallback_suggestions()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::AdviceError;
    use crate::store::{InMemoryHistory, InMemoryRouteStore, InMemoryStopStore};
    use async_trait::async_trait;

    /// One degree of longitude on the equator, km.
    const DEG_KM: f64 = 111.194_926_644_558_73;

    struct StubAdvice(Vec<String>);

    #[async_trait]
    impl AdviceGenerator for StubAdvice {
        async fn suggest(&self, _prompt: &AdvicePrompt) -> Result<Vec<String>, AdviceError> {
            Ok(self.0.clone())
        }
    }

    struct FailingAdvice;

    #[async_trait]
    impl AdviceGenerator for FailingAdvice {
        async fn suggest(&self, _prompt: &AdvicePrompt) -> Result<Vec<String>, AdviceError> {
            Err(AdviceError::Empty)
        }
    }

    struct SlowAdvice;

    #[async_trait]
    impl AdviceGenerator for SlowAdvice {
        async fn suggest(&self, _prompt: &AdvicePrompt) -> Result<Vec<String>, AdviceError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(vec!["too late".into()])
        }
    }

    fn equator_stop(id: &str, lon: f64) -> Stop {
        Stop::new(id, format!("Shop {id}"), 0.0, lon)
    }

    /// Stops on the equator; route visits them in the order given by `ids`.
    fn fixture(
        stops: Vec<Stop>,
        ids: &[&str],
        advice: Arc<dyn AdviceGenerator>,
    ) -> (RouteOptimizer, Arc<InMemoryHistory>) {
        let routes = Arc::new(InMemoryRouteStore::new(vec![Route::new(
            "r1",
            "Test route",
            ids.iter().map(|s| s.to_string()).collect(),
        )]));
        let history = Arc::new(InMemoryHistory::new());
        let optimizer = RouteOptimizer::new(
            routes,
            Arc::new(InMemoryStopStore::new(stops)),
            history.clone(),
            advice,
        );
        (optimizer, history)
    }

    #[test]
    fn test_nn_order_line() {
        // Longitudes 0, 2, 1: greedy from index 0 visits 0, 2, 1.
        let points = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 2.0),
            GeoPoint::new(0.0, 1.0),
        ];
        assert_eq!(nearest_neighbor_order(&points), vec![0, 2, 1]);
    }

    #[test]
    fn test_nn_order_degenerate() {
        assert_eq!(nearest_neighbor_order(&[]), Vec::<usize>::new());
        assert_eq!(nearest_neighbor_order(&[GeoPoint::new(1.0, 2.0)]), vec![0]);
    }

    #[test]
    fn test_nn_order_tie_keeps_first_index() {
        // Unit square: from (0,0) both (0,1) and (1,0) are one degree away.
        // Strict-< tie-breaking keeps the earlier index, so the square is
        // traversed in its original corner order.
        let points = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(1.0, 0.0),
        ];
        assert_eq!(nearest_neighbor_order(&points), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_nn_order_is_permutation() {
        let points: Vec<GeoPoint> = (0..7)
            .map(|i| GeoPoint::new((i * 3 % 7) as f64, (i * 5 % 7) as f64))
            .collect();
        let mut order = nearest_neighbor_order(&points);
        order.sort_unstable();
        assert_eq!(order, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(11.119), 11.1);
        assert_eq!(round_to_tenth(-0.34), -0.3);
        assert_eq!(round_to_tenth(0.0), 0.0);
        assert_eq!(round_to_tenth(1.25), 1.3);
    }

    #[tokio::test]
    async fn test_route_not_found() {
        let (optimizer, _) = fixture(vec![], &[], Arc::new(FailingAdvice));
        let err = optimizer.optimize_route("missing").await.unwrap_err();
        assert!(matches!(err, OptimizeError::RouteNotFound(id) if id == "missing"));
    }

    #[tokio::test]
    async fn test_optimize_reorders_and_accounts_savings() {
        // Equator line visited out of order: a(0), c(2), b(1) is 3 degrees of
        // driving; nearest-neighbor from a gives a, b, c at 2 degrees.
        let stops = vec![
            equator_stop("a", 0.0),
            equator_stop("b", 1.0),
            equator_stop("c", 2.0),
        ];
        let (optimizer, history) =
            fixture(stops, &["a", "c", "b"], Arc::new(StubAdvice(vec!["tip".into()])));

        let result = optimizer.optimize_route("r1").await.expect("route exists");

        assert_eq!(result.optimized_order, vec!["a", "b", "c"]);
        assert!((result.original_distance_km - 3.0 * DEG_KM).abs() < 1e-6);
        assert!((result.optimized_distance_km - 2.0 * DEG_KM).abs() < 1e-6);
        // One degree saved: 111.19 km -> round(333.58) minutes, 11.1 liters.
        assert_eq!(result.time_saved_minutes, 334);
        assert_eq!(result.fuel_saved_liters, 11.1);
        assert_eq!(result.suggestions, vec!["tip"]);

        // Exactly one history record, matching the returned result.
        let records = optimizer.optimization_history(Some("r1"), None);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].route_id, "r1");
        assert_eq!(records[0].result.optimized_order, result.optimized_order);
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_optimize_preserves_anchor() {
        let stops = vec![
            equator_stop("a", 5.0),
            equator_stop("b", 0.0),
            equator_stop("c", 3.0),
        ];
        let (optimizer, _) = fixture(stops, &["a", "b", "c"], Arc::new(FailingAdvice));
        let result = optimizer.optimize_route("r1").await.expect("route exists");
        assert_eq!(result.optimized_order[0], "a");
    }

    #[tokio::test]
    async fn test_optimize_can_lose_to_original_order() {
        // Greedy trap on a line: from 0 the nearest stop is 1, which strands
        // the tour far from -2. The as-given order 0, -2, 1, 3 is shorter.
        let stops = vec![
            equator_stop("a", 0.0),
            equator_stop("b", -2.0),
            equator_stop("c", 1.0),
            equator_stop("d", 3.0),
        ];
        let (optimizer, _) = fixture(stops, &["a", "b", "c", "d"], Arc::new(FailingAdvice));
        let result = optimizer.optimize_route("r1").await.expect("route exists");

        // NN visits a, c, d, b: 1 + 2 + 5 = 8 degrees vs the original 7.
        assert_eq!(result.optimized_order, vec!["a", "c", "d", "b"]);
        assert!(result.distance_saved_km() < 0.0);
        assert_eq!(result.time_saved_minutes, -334);
        assert_eq!(result.fuel_saved_liters, -11.1);
    }

    #[tokio::test]
    async fn test_few_stops_short_circuit() {
        let stops = vec![equator_stop("a", 0.0)];
        let (optimizer, history) = fixture(stops, &["a"], Arc::new(FailingAdvice));
        let result = optimizer.optimize_route("r1").await.expect("route exists");

        assert_eq!(result.optimized_order, vec!["a"]);
        assert_eq!(result.original_distance_km, 0.0);
        assert_eq!(result.optimized_distance_km, 0.0);
        assert_eq!(result.time_saved_minutes, 0);
        assert_eq!(result.fuel_saved_liters, 0.0);
        assert_eq!(result.suggestions.len(), 1);
        assert!(result.suggestions[0].contains("fewer than two"));
        // No-op runs are kept out of the history.
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_empty_route_short_circuit() {
        let (optimizer, history) = fixture(vec![], &[], Arc::new(FailingAdvice));
        let result = optimizer.optimize_route("r1").await.expect("route exists");
        assert!(result.optimized_order.is_empty());
        assert_eq!(result.suggestions.len(), 1);
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_unresolved_stop_ids_are_dropped() {
        let stops = vec![equator_stop("a", 0.0), equator_stop("b", 1.0)];
        let (optimizer, _) = fixture(stops, &["a", "ghost", "b"], Arc::new(FailingAdvice));
        let result = optimizer.optimize_route("r1").await.expect("route exists");

        assert_eq!(result.optimized_order, vec!["a", "b"]);
        assert!(!result.optimized_order.contains(&"ghost".to_string()));
    }

    #[tokio::test]
    async fn test_advice_failure_falls_back() {
        let stops = vec![equator_stop("a", 0.0), equator_stop("b", 1.0)];
        let (optimizer, _) = fixture(stops, &["a", "b"], Arc::new(FailingAdvice));
        let result = optimizer.optimize_route("r1").await.expect("call must not fail");
        assert_eq!(result.suggestions, fallback_suggestions());
    }

    #[tokio::test]
    async fn test_advice_timeout_falls_back() {
        let stops = vec![equator_stop("a", 0.0), equator_stop("b", 1.0)];
        let routes = Arc::new(InMemoryRouteStore::new(vec![Route::new(
            "r1",
            "Test route",
            vec!["a".into(), "b".into()],
        )]));
        let optimizer = RouteOptimizer::with_config(
            routes,
            Arc::new(InMemoryStopStore::new(stops)),
            Arc::new(InMemoryHistory::new()),
            Arc::new(SlowAdvice),
            OptimizerConfig {
                advice_timeout: Duration::from_millis(20),
                ..OptimizerConfig::default()
            },
        );

        let result = optimizer.optimize_route("r1").await.expect("call must not fail");
        assert_eq!(result.suggestions, fallback_suggestions());
    }

    #[tokio::test]
    async fn test_history_default_limit_and_filter() {
        let stops = vec![equator_stop("a", 0.0), equator_stop("b", 1.0)];
        let (optimizer, _) = fixture(stops, &["a", "b"], Arc::new(StubAdvice(vec![])));

        for _ in 0..3 {
            optimizer.optimize_route("r1").await.expect("route exists");
        }

        assert_eq!(optimizer.optimization_history(None, None).len(), 3);
        assert_eq!(optimizer.optimization_history(Some("r1"), Some(2)).len(), 2);
        assert_eq!(optimizer.optimization_history(Some("other"), None).len(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_stop_ids_survive_reordering() {
        let stops = vec![equator_stop("a", 0.0), equator_stop("b", 1.0)];
        let (optimizer, _) = fixture(stops, &["a", "b", "a"], Arc::new(StubAdvice(vec![])));
        let result = optimizer.optimize_route("r1").await.expect("route exists");

        // Same multiset of ids, same length.
        let mut sorted = result.optimized_order.clone();
        sorted.sort();
        assert_eq!(sorted, vec!["a", "a", "b"]);
    }
}
