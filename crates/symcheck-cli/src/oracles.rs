use std::sync::Arc;

use symcheck_oracle::bedrock::{BedrockOracle, build_sdk_config};
use symcheck_oracle::gemini::GeminiOracle;
use symcheck_oracle::inference::InferenceServiceOracle;
use symcheck_oracle::retry::Retrying;
use symcheck_oracle::{PredictionOracle, QuestionOracle};
use tracing::{info, warn};

use crate::config::{ENV_GEMINI_API_KEY, ProviderConfig, SymcheckConfig};

/// The pair of oracles a session runs against.
pub struct Oracles {
    pub questions: Box<dyn QuestionOracle>,
    pub prediction: Box<dyn PredictionOracle>,
    /// Set when predictions come from the inference service, which can also
    /// produce a hosted report.
    pub inference: Option<Arc<InferenceServiceOracle>>,
}

/// Split a comma-separated symptom list, e.g. `"fever, cough"`.
pub fn parse_symptoms(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// The inference service client, if one is configured.
pub fn inference_service(
    config: &SymcheckConfig,
    symptoms: Vec<String>,
) -> eyre::Result<Option<InferenceServiceOracle>> {
    let Some(inference) = &config.inference else {
        return Ok(None);
    };
    let oracle = InferenceServiceOracle::new(inference.clone())?.with_symptoms(symptoms);
    info!(
        base_url = %inference.base_url,
        symptoms = oracle.symptoms().len(),
        "using inference service"
    );
    Ok(Some(oracle))
}

/// Build the configured oracles, each wrapped in the configured retry
/// policy. `symptoms` are sent to the inference service with every
/// prediction.
pub async fn build_oracles(config: &SymcheckConfig, symptoms: Vec<String>) -> eyre::Result<Oracles> {
    let policy = config.retry;

    let (questions, generative_prediction): (Box<dyn QuestionOracle>, Box<dyn PredictionOracle>) =
        match &config.provider {
            ProviderConfig::Gemini(gemini) => {
                let oracle = Arc::new(GeminiOracle::new(gemini.clone()).map_err(|e| {
                    eyre::eyre!(
                        "{e}. Run `symcheck config init --api-key <KEY>` or set {ENV_GEMINI_API_KEY}"
                    )
                })?);
                info!(model = oracle.model(), "using Gemini");
                (
                    Box::new(Retrying::new(oracle.clone(), policy)),
                    Box::new(Retrying::new(oracle, policy)),
                )
            }
            ProviderConfig::Bedrock {
                region,
                model_id,
                credentials,
            } => {
                let sdk_config = build_sdk_config(region, credentials).await;
                let oracle = Arc::new(BedrockOracle::new(&sdk_config, model_id.clone()));
                info!(%region, %model_id, "using Bedrock");
                (
                    Box::new(Retrying::new(oracle.clone(), policy)),
                    Box::new(Retrying::new(oracle, policy)),
                )
            }
        };

    if config.inference.is_none() && !symptoms.is_empty() {
        warn!("symptoms are only sent to the inference service, which is not configured");
    }

    let inference = inference_service(config, symptoms)?.map(Arc::new);
    let prediction: Box<dyn PredictionOracle> = match &inference {
        Some(oracle) => Box::new(Retrying::new(oracle.clone(), policy)),
        None => generative_prediction,
    };

    Ok(Oracles {
        questions,
        prediction,
        inference,
    })
}
