//! OpenAI-backed suggestion generator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AdviceError, AdviceGenerator, AdvicePrompt};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for the chat-completion client.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Model name for the completions request.
    pub model: String,
    /// API base URL, overridable for proxies and tests.
    pub base_url: String,
}

impl OpenAiConfig {
    /// Builds a config from `OPENAI_API_KEY` and optional `OPENAI_MODEL`.
    ///
    /// Returns `None` when no API key is set, letting the embedder fall back
    /// to running without a generator.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").ok()?;
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Some(Self {
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }
}

/// Suggestion generator calling the OpenAI chat-completions API.
///
/// The prompt asks for a JSON array of short suggestion strings; the reply is
/// fence-stripped and parsed strictly. Any transport or shape failure
/// surfaces as an [`AdviceError`], which the optimizer converts into the
/// static fallback list.
pub struct OpenAiAdviceGenerator {
    client: reqwest::Client,
    config: OpenAiConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl OpenAiAdviceGenerator {
    /// Creates a generator with the given config and a fresh HTTP client.
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn build_prompt(prompt: &AdvicePrompt) -> String {
        format!(
            "A delivery route named \"{}\" was reordered to shorten driving.\n\
             Original stop order: {}\n\
             Optimized stop order: {}\n\
             Savings: {:.1} km, {} minutes, {:.1} liters of fuel.\n\
             Reply with only a JSON array of 3 short, practical suggestions \
             (strings) for the dispatcher to improve this route further.",
            prompt.route_name,
            prompt.original_stops.join(" -> "),
            prompt.optimized_stops.join(" -> "),
            prompt.distance_saved_km,
            prompt.time_saved_minutes,
            prompt.fuel_saved_liters,
        )
    }

    /// Parses the model reply as a JSON array of strings, tolerating markdown
    /// code fences around the payload.
    fn parse_suggestions(content: &str) -> Result<Vec<String>, AdviceError> {
        let trimmed = content
            .trim()
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim();
        let suggestions: Vec<String> = serde_json::from_str(trimmed)?;
        if suggestions.is_empty() {
            return Err(AdviceError::Empty);
        }
        Ok(suggestions)
    }
}

#[async_trait]
impl AdviceGenerator for OpenAiAdviceGenerator {
    async fn suggest(&self, prompt: &AdvicePrompt) -> Result<Vec<String>, AdviceError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: Self::build_prompt(prompt),
            }],
            temperature: 0.7,
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        let response: ChatResponse = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(AdviceError::Empty)?;

        debug!(len = content.len(), "advice response received");
        Self::parse_suggestions(&content)
    }
}
