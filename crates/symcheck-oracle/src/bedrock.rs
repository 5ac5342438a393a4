//! AWS Bedrock adapter using the Converse API.
//!
//! The Converse API requires an inference profile ID as its `model_id`
//! (e.g. `us.anthropic.claude-sonnet-4-20250514-v1:0`); bare foundation
//! model IDs fail with "on-demand throughput isn't supported".
//!
//! ## Required IAM permissions
//!
//! ```text
//! bedrock:InvokeModel
//! ```

use async_trait::async_trait;
use aws_sdk_bedrockruntime::types::{ContentBlock, ConversationRole, Message, SystemContentBlock};
use serde::{Deserialize, Serialize};
use symcheck_core::models::prediction::PredictionResult;
use symcheck_core::models::transcript::Turn;
use tracing::info;

use crate::error::OracleError;
use crate::oracle::{PredictionOracle, QuestionOracle};
use crate::{parse, prompt};

/// Where the AWS credentials for Bedrock come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialSource {
    Inline {
        access_key_id: String,
        secret_access_key: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        session_token: Option<String>,
    },
    Profile {
        profile_name: String,
    },
    DefaultChain,
}

/// Build an `SdkConfig` from a region and credential source.
pub async fn build_sdk_config(region: &str, creds: &CredentialSource) -> aws_config::SdkConfig {
    let mut builder = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()));

    match creds {
        CredentialSource::Inline {
            access_key_id,
            secret_access_key,
            session_token,
        } => {
            builder = builder.credentials_provider(
                aws_sdk_bedrockruntime::config::Credentials::new(
                    access_key_id,
                    secret_access_key,
                    session_token.clone(),
                    None,
                    "symcheck-config",
                ),
            );
        }
        CredentialSource::Profile { profile_name } => {
            builder = builder.profile_name(profile_name);
        }
        CredentialSource::DefaultChain => {}
    }

    builder.load().await
}

pub struct BedrockOracle {
    client: aws_sdk_bedrockruntime::Client,
    model_id: String,
}

impl BedrockOracle {
    pub fn new(config: &aws_config::SdkConfig, model_id: impl Into<String>) -> Self {
        Self {
            client: aws_sdk_bedrockruntime::Client::new(config),
            model_id: model_id.into(),
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Send one user message under [`prompt::SYSTEM_PROMPT`] and return the
    /// assistant's reply text.
    pub async fn converse(&self, user_message: &str) -> Result<String, OracleError> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(user_message.to_string()))
            .build()
            .map_err(|e| OracleError::Invocation(e.to_string()))?;

        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .system(SystemContentBlock::Text(prompt::SYSTEM_PROMPT.to_string()))
            .messages(message)
            .send()
            .await
            .map_err(|e| OracleError::Invocation(e.into_service_error().to_string()))?;

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| OracleError::ResponseParse("no message in response".to_string()))?;

        let response_text = output_message
            .content()
            .iter()
            .filter_map(|block| {
                if let ContentBlock::Text(text) = block {
                    Some(text.as_str())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        info!(
            model_id = %self.model_id,
            text_len = response_text.len(),
            "converse complete"
        );

        Ok(response_text)
    }
}

#[async_trait]
impl QuestionOracle for BedrockOracle {
    async fn next_question(&self, transcript: &[Turn]) -> Result<String, OracleError> {
        let prompt = prompt::next_question_prompt(transcript)?;
        let text = self.converse(&prompt).await?;
        Ok(parse::extract_question(&text))
    }
}

#[async_trait]
impl PredictionOracle for BedrockOracle {
    async fn predict(&self, transcript: &[Turn]) -> Result<PredictionResult, OracleError> {
        let prompt = prompt::prediction_prompt(transcript)?;
        let text = self.converse(&prompt).await?;
        parse::parse_ranked_conditions(&text)
    }
}
