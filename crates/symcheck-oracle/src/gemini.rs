//! Generative Language API (`generateContent`) adapter.
//!
//! One `GeminiOracle` serves both roles: it asks the model for the next
//! question and, at the end of the session, for the ranked conditions. The
//! API key and endpoint are injected through [`GeminiConfig`].

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use symcheck_core::models::prediction::PredictionResult;
use symcheck_core::models::transcript::Turn;
use tracing::{debug, info};

use crate::error::OracleError;
use crate::oracle::{PredictionOracle, QuestionOracle};
use crate::{parse, prompt};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// ── Wire types ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────────────

pub struct GeminiOracle {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiOracle {
    pub fn new(config: GeminiConfig) -> Result<Self, OracleError> {
        if config.api_key.trim().is_empty() {
            return Err(OracleError::Config("Gemini API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OracleError::Config(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Send a single-part prompt and return the concatenated text of the
    /// first candidate.
    pub async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!(model = %self.config.model, prompt_len = prompt.len(), "calling generateContent");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| OracleError::ResponseParse(e.to_string()))?;

        let content = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .ok_or_else(|| OracleError::ResponseParse("no candidate in response".to_string()))?;

        let text = content
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        info!(model = %self.config.model, text_len = text.len(), "generateContent complete");

        Ok(text)
    }
}

#[async_trait]
impl QuestionOracle for GeminiOracle {
    async fn next_question(&self, transcript: &[Turn]) -> Result<String, OracleError> {
        let prompt = prompt::next_question_prompt(transcript)?;
        let text = self.generate(&prompt).await?;
        Ok(parse::extract_question(&text))
    }
}

#[async_trait]
impl PredictionOracle for GeminiOracle {
    async fn predict(&self, transcript: &[Turn]) -> Result<PredictionResult, OracleError> {
        let prompt = prompt::prediction_prompt(transcript)?;
        let text = self.generate(&prompt).await?;
        parse::parse_ranked_conditions(&text)
    }
}
