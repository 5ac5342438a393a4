//! Client for the external symptom inference microservice.
//!
//! The service exposes three JSON endpoints:
//!
//! - `POST /questions` with `{"symptoms": [...]}` returns a questionnaire,
//!   `[{"question": ..., "answers": [...]}]`.
//! - `POST /predict` with `{"symptoms": [...], "answers": [...]}` returns
//!   ranked diseases, `[{"disease", "probability", "reason", "precautions",
//!   "remedies"}]`.
//! - `POST /report` with the answers, symptoms and predictions generates a
//!   report on the service side and returns `{"file": "/path"}`, relative to
//!   the service root.
//!
//! Only the prediction maps onto an oracle trait; the questionnaire and the
//! hosted report are plain methods.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use symcheck_core::models::prediction::{Condition, PredictionResult};
use symcheck_core::models::question::FollowUpQuestion;
use symcheck_core::models::transcript::Turn;
use tracing::{debug, info};

use crate::error::OracleError;
use crate::oracle::PredictionOracle;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl InferenceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Serialize)]
struct QuestionsRequest<'a> {
    symptoms: &'a [String],
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    symptoms: &'a [String],
    answers: &'a [Turn],
}

#[derive(Debug, Serialize)]
struct ReportRequest<'a> {
    answers: &'a [Turn],
    symptoms: &'a [String],
    predictions: Vec<ReportedDisease<'a>>,
}

/// A condition in the shape `/predict` returned it.
#[derive(Debug, Serialize)]
struct ReportedDisease<'a> {
    disease: &'a str,
    reason: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    probability: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    precautions: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remedies: Option<&'a str>,
}

impl<'a> From<&'a Condition> for ReportedDisease<'a> {
    fn from(c: &'a Condition) -> Self {
        ReportedDisease {
            disease: &c.name,
            reason: &c.description,
            probability: c.likelihood.as_deref(),
            precautions: c.precautions.as_deref(),
            remedies: c.remedies.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReportResponse {
    file: String,
}

/// One entry of the `/predict` response.
#[derive(Debug, Deserialize)]
struct DiseasePrediction {
    disease: String,
    #[serde(default)]
    probability: Option<Value>,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    precautions: Option<Value>,
    #[serde(default)]
    remedies: Option<Value>,
}

impl From<DiseasePrediction> for Condition {
    fn from(p: DiseasePrediction) -> Self {
        Condition {
            name: p.disease,
            description: p.reason.unwrap_or_default(),
            likelihood: p.probability.map(value_to_text),
            precautions: p.precautions.map(value_to_text),
            remedies: p.remedies.map(value_to_text),
        }
    }
}

/// The service is loose about types: probabilities arrive as numbers or
/// strings, precautions as strings or lists.
fn value_to_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Array(items) => items
            .into_iter()
            .map(value_to_text)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

pub struct InferenceServiceOracle {
    config: InferenceConfig,
    client: reqwest::Client,
    symptoms: Vec<String>,
}

impl InferenceServiceOracle {
    pub fn new(config: InferenceConfig) -> Result<Self, OracleError> {
        reqwest::Url::parse(&config.base_url)
            .map_err(|e| OracleError::Config(format!("invalid inference URL {}: {e}", config.base_url)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OracleError::Config(e.to_string()))?;

        Ok(Self {
            config,
            client,
            symptoms: Vec::new(),
        })
    }

    /// Symptoms the user reported up front; sent with every prediction.
    pub fn with_symptoms(mut self, symptoms: Vec<String>) -> Self {
        self.symptoms = symptoms;
        self
    }

    pub fn symptoms(&self) -> &[String] {
        &self.symptoms
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn post<B: Serialize, T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, OracleError> {
        let url = self.url(path);
        debug!(%url, "calling inference service");

        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| OracleError::SchemaViolation(format!("{path}: {e}")))
    }

    /// Fetch the fixed questionnaire for a set of reported symptoms.
    pub async fn follow_up_questions(
        &self,
        symptoms: &[String],
    ) -> Result<Vec<FollowUpQuestion>, OracleError> {
        let questions: Vec<FollowUpQuestion> = self
            .post("questions", &QuestionsRequest { symptoms })
            .await?;

        info!(count = questions.len(), "received follow-up questions");

        Ok(questions)
    }

    /// Have the service generate its own report for a finished assessment.
    ///
    /// Returns the URL the report can be downloaded from.
    pub async fn report(
        &self,
        transcript: &[Turn],
        prediction: &PredictionResult,
    ) -> Result<String, OracleError> {
        let response: ReportResponse = self
            .post(
                "report",
                &ReportRequest {
                    answers: transcript,
                    symptoms: &self.symptoms,
                    predictions: prediction.conditions.iter().map(ReportedDisease::from).collect(),
                },
            )
            .await?;

        if response.file.trim().is_empty() {
            return Err(OracleError::SchemaViolation(
                "report: empty file path".to_string(),
            ));
        }

        let url = if response.file.starts_with("http://") || response.file.starts_with("https://") {
            response.file
        } else {
            self.url(response.file.trim_start_matches('/'))
        };
        info!(%url, "service report generated");

        Ok(url)
    }
}

#[async_trait]
impl PredictionOracle for InferenceServiceOracle {
    async fn predict(&self, transcript: &[Turn]) -> Result<PredictionResult, OracleError> {
        let predictions: Vec<DiseasePrediction> = self
            .post(
                "predict",
                &PredictRequest {
                    symptoms: &self.symptoms,
                    answers: transcript,
                },
            )
            .await?;

        info!(count = predictions.len(), "received disease predictions");

        Ok(PredictionResult::new(
            predictions.into_iter().map(Condition::from).collect(),
        ))
    }
}
