//! Request composer and Gemini API client
//!
//! Builds the fixed travel-planning prompt from a [`TravelQuery`] and submits
//! it to the Gemini `generateContent` endpoint, returning the raw text reply.
//! The reply is untrusted free text; shaping it into rows is the tabulator's
//! job, not this module's.

use crate::config::AppConfig;
use crate::models::TravelQuery;
use crate::{PlannerError, Result};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Prompt template sent to the model. The table shape requested here is the
/// only "contract" the tabulator can rely on; the model may not honor it.
const PROMPT_TEMPLATE: &str = "\
You are a travel planning assistant. Provide travel options from {source} to {destination}.
Present the information in a structured table format with the following columns:

| Travel Type | Price (Estimated) | Time (Estimated) | Description | Comfort Level (1-5, 5 being highest) | Directness (Direct/Indirect) |
|-------------------|-------------------|-------------------|-------------|------------------------------------|-----------------------------|
| Cab/Taxi          |                   |                   |             |                                    |                             |
| Train             |                   |                   |             |                                    |                             |
| Bus               |                   |                   |             |                                    |                             |
| Flight            |                   |                   |             |                                    |                             |
| Ola/Uber          |                   |                   |             |                                    |                             |

Fill in the table with estimated prices, travel times, descriptions, comfort levels (1-5), and directness.
If a mode of transport is unavailable, indicate it in the table.
";

/// Build the natural-language instruction for one query
#[must_use]
pub fn build_prompt(query: &TravelQuery) -> String {
    PROMPT_TEMPLATE
        .replace("{source}", query.source.trim())
        .replace("{destination}", query.destination.trim())
}

/// Seam for the text-generation backend, so the API layer can be tested
/// without network access
#[async_trait]
pub trait TravelOptionsGenerator: Send + Sync {
    /// Produce the raw model reply for one query
    async fn generate(&self, query: &TravelQuery) -> Result<String>;
}

/// HTTP client for the Gemini generative language API
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    slow_threshold: Duration,
}

/// A call slower than half the configured timeout is worth a warning
fn slow_threshold(timeout: Duration) -> Duration {
    timeout / 2
}

impl GeminiClient {
    /// Create a new Gemini client from validated configuration
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.gemini.timeout_seconds.into());

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("Tripwise/0.1.0")
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {e}"))?;

        Ok(Self {
            client,
            api_key: config.gemini.api_key.clone(),
            model: config.gemini.model.clone(),
            base_url: config.gemini.base_url.trim_end_matches('/').to_string(),
            slow_threshold: slow_threshold(timeout),
        })
    }

    /// Endpoint URL for the configured model. The API key travels in the
    /// `x-goog-api-key` header, never in the URL, so it cannot leak through
    /// error text that echoes the request URL.
    fn endpoint_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    async fn generate_call(&self, prompt: String) -> Result<String> {
        let request = gemini::GenerateContentRequest {
            contents: vec![gemini::Content {
                parts: vec![gemini::Part { text: prompt }],
            }],
        };

        let start_time = Instant::now();

        let response = self
            .client
            .post(self.endpoint_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PlannerError::generation(format!("Request to Gemini failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<gemini::ErrorResponse>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP {status}"));
            return Err(PlannerError::generation(format!(
                "Gemini API returned an error: {detail}"
            )));
        }

        let reply: gemini::GenerateContentResponse = response.json().await.map_err(|e| {
            PlannerError::generation(format!("Invalid response from Gemini API: {e}"))
        })?;

        let total_duration = start_time.elapsed();
        info!(
            "Gemini reply received in {:.3}s",
            total_duration.as_secs_f64()
        );
        if total_duration > self.slow_threshold {
            warn!(
                "Slow Gemini response: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        reply
            .first_text()
            .ok_or_else(|| PlannerError::generation("Gemini reply contained no text candidates"))
    }
}

#[async_trait]
impl TravelOptionsGenerator for GeminiClient {
    #[instrument(skip(self), fields(source = %query.source, destination = %query.destination))]
    async fn generate(&self, query: &TravelQuery) -> Result<String> {
        let prompt = build_prompt(query);
        debug!("Submitting travel options prompt ({} chars)", prompt.len());
        self.generate_call(prompt).await
    }
}

/// Gemini `generateContent` wire format, request and response sides
mod gemini {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize)]
    pub struct GenerateContentRequest {
        pub contents: Vec<Content>,
    }

    #[derive(Debug, Serialize)]
    pub struct Content {
        pub parts: Vec<Part>,
    }

    #[derive(Debug, Serialize)]
    pub struct Part {
        pub text: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct GenerateContentResponse {
        #[serde(default)]
        pub candidates: Vec<Candidate>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Candidate {
        pub content: Option<CandidateContent>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CandidateContent {
        #[serde(default)]
        pub parts: Vec<ResponsePart>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponsePart {
        pub text: Option<String>,
    }

    /// Error body returned with non-2xx statuses
    #[derive(Debug, Deserialize)]
    pub struct ErrorResponse {
        pub error: ErrorDetail,
    }

    #[derive(Debug, Deserialize)]
    pub struct ErrorDetail {
        pub message: String,
    }

    impl GenerateContentResponse {
        /// Concatenated text of the first candidate, if any
        pub fn first_text(&self) -> Option<String> {
            let candidate = self.candidates.first()?;
            let content = candidate.content.as_ref()?;
            let text: String = content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect();
            if text.is_empty() { None } else { Some(text) }
        }
    }
}
