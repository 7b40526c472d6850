//! Suggestion generation for optimized routes.
//!
//! The optimizer asks an [`AdviceGenerator`] for human-readable advice after
//! each run. The production implementation ([`OpenAiAdviceGenerator`]) calls
//! a chat-completion API; tests inject stubs. Generator failure is never
//! fatal: the optimizer substitutes [`fallback_suggestions`].

mod openai;

pub use openai::{OpenAiAdviceGenerator, OpenAiConfig};

use async_trait::async_trait;
use thiserror::Error;

/// Context handed to the generator: what was optimized and what it saved.
#[derive(Debug, Clone)]
pub struct AdvicePrompt {
    /// Route display name.
    pub route_name: String,
    /// Stop names in the original visiting order.
    pub original_stops: Vec<String>,
    /// Stop names in the optimized visiting order.
    pub optimized_stops: Vec<String>,
    /// Distance saved, km. Negative if the reordering lost.
    pub distance_saved_km: f64,
    /// Time saved, whole minutes.
    pub time_saved_minutes: i64,
    /// Fuel saved, liters (one decimal).
    pub fuel_saved_liters: f64,
}

/// Error from a suggestion generator.
#[derive(Debug, Error)]
pub enum AdviceError {
    /// Transport-level failure reaching the service.
    #[error("advice request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered but the payload was not the expected shape.
    #[error("advice response malformed: {0}")]
    Parse(#[from] serde_json::Error),
    /// The service answered with no usable content.
    #[error("advice response empty")]
    Empty,
}

/// A service that turns an [`AdvicePrompt`] into a list of suggestions.
///
/// Injected into the optimizer as a constructor dependency so tests can
/// substitute a stub.
#[async_trait]
pub trait AdviceGenerator: Send + Sync {
    /// Produces suggestion strings for the given run.
    async fn suggest(&self, prompt: &AdvicePrompt) -> Result<Vec<String>, AdviceError>;
}

/// The fixed suggestions used when the generator fails or times out.
pub fn fallback_suggestions() -> Vec<String> {
    vec![
        "Group nearby stops together to cut back-and-forth driving.".to_string(),
        "Schedule deliveries outside peak traffic hours where possible.".to_string(),
        "Confirm stop addresses and coordinates are up to date before dispatch.".to_string(),
    ]
}
