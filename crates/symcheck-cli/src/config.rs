use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use symcheck_export::styles::DocumentStyles;
use symcheck_oracle::bedrock::CredentialSource;
use symcheck_oracle::gemini::GeminiConfig;
use symcheck_oracle::inference::InferenceConfig;
use symcheck_oracle::retry::RetryPolicy;
use symcheck_session::SessionConfig;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

pub const ENV_GEMINI_API_KEY: &str = "SYMCHECK_GEMINI_API_KEY";
pub const ENV_INFERENCE_URL: &str = "SYMCHECK_INFERENCE_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymcheckConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    pub provider: ProviderConfig,
    /// When set, predictions come from the inference microservice instead
    /// of the question provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inference: Option<InferenceConfig>,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default)]
    pub export: ExportSettings,
    pub created_at: jiff::Timestamp,
}

/// Which generative service asks the questions (and, without an inference
/// service, makes the prediction).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    Gemini(GeminiConfig),
    Bedrock {
        region: String,
        model_id: String,
        credentials: CredentialSource,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Docx,
    Text,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub format: ReportFormat,
    /// Tera template used instead of the built-in layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
    pub styles: DocumentStyles,
}

impl SymcheckConfig {
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            config_version: CURRENT_VERSION,
            provider,
            inference: None,
            session: SessionConfig::default(),
            retry: RetryPolicy::default(),
            export: ExportSettings::default(),
            created_at: jiff::Timestamp::now(),
        }
    }

    /// Gemini with the default model and endpoint.
    pub fn gemini(api_key: impl Into<String>) -> Self {
        Self::new(ProviderConfig::Gemini(GeminiConfig::new(api_key)))
    }
}

/// Redacted config info safe to print.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigInfo {
    pub provider: String,
    pub model: String,
    pub api_key_hint: Option<String>,
    pub region: Option<String>,
    pub credential_type: Option<String>,
    pub profile_name: Option<String>,
    pub access_key_hint: Option<String>,
    pub inference_url: Option<String>,
    pub max_turns: usize,
    pub retry_attempts: u32,
    pub report_format: ReportFormat,
    pub created_at: String,
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("symcheck"))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

pub fn has_config() -> bool {
    config_path().map(|p| p.exists()).unwrap_or(false)
}

pub fn load_config() -> eyre::Result<SymcheckConfig> {
    load_config_from(&config_path()?)
}

/// The saved config (or Gemini defaults when none exists) with environment
/// overrides applied.
pub fn load_effective_config() -> eyre::Result<SymcheckConfig> {
    let mut config = if has_config() {
        load_config()?
    } else {
        tracing::debug!("no config file, using defaults");
        SymcheckConfig::gemini("")
    };
    apply_env_overrides(&mut config);
    Ok(config)
}

pub fn load_config_from(path: &Path) -> eyre::Result<SymcheckConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: SymcheckConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update symcheck."
        ));
    }

    // v0 → v1: flat `gemini_api_key` / `max_questions` move under
    // `provider` and `session`.
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;

        if !obj.contains_key("provider") {
            let api_key = obj
                .remove("gemini_api_key")
                .unwrap_or(serde_json::Value::String(String::new()));
            obj.insert(
                "provider".to_string(),
                serde_json::json!({ "type": "gemini", "api_key": api_key }),
            );
        }
        if let Some(max_questions) = obj.remove("max_questions") {
            obj.insert(
                "session".to_string(),
                serde_json::json!({ "max_turns": max_questions }),
            );
        }
        obj.entry("created_at")
            .or_insert_with(|| serde_json::Value::String(jiff::Timestamp::now().to_string()));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (nested provider and session)");
    }

    // Future migrations go here:
    // if from_version < 2 { ... }

    Ok(json)
}

pub fn save_config(config: &SymcheckConfig) -> eyre::Result<PathBuf> {
    let path = config_path()?;
    save_config_to(config, &path)?;
    Ok(path)
}

pub fn save_config_to(config: &SymcheckConfig, path: &Path) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("config path {} has no parent", path.display()))?;
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    // The file holds API keys.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

/// Apply `SYMCHECK_*` environment variables on top of the file config.
pub fn apply_env_overrides(config: &mut SymcheckConfig) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

pub fn apply_overrides(config: &mut SymcheckConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(key) = lookup(ENV_GEMINI_API_KEY).filter(|k| !k.trim().is_empty()) {
        match &mut config.provider {
            ProviderConfig::Gemini(gemini) => gemini.api_key = key,
            ProviderConfig::Bedrock { .. } => {
                tracing::debug!("{ENV_GEMINI_API_KEY} ignored: provider is bedrock");
            }
        }
    }

    if let Some(url) = lookup(ENV_INFERENCE_URL).filter(|u| !u.trim().is_empty()) {
        match &mut config.inference {
            Some(inference) => inference.base_url = url,
            None => config.inference = Some(InferenceConfig::new(url)),
        }
    }
}

pub fn config_info(config: &SymcheckConfig) -> ConfigInfo {
    let mut info = ConfigInfo {
        provider: String::new(),
        model: String::new(),
        api_key_hint: None,
        region: None,
        credential_type: None,
        profile_name: None,
        access_key_hint: None,
        inference_url: config.inference.as_ref().map(|i| i.base_url.clone()),
        max_turns: config.session.max_turns,
        retry_attempts: config.retry.max_attempts,
        report_format: config.export.format,
        created_at: config.created_at.to_string(),
    };

    match &config.provider {
        ProviderConfig::Gemini(gemini) => {
            info.provider = "gemini".to_string();
            info.model = gemini.model.clone();
            info.api_key_hint = Some(redact_secret(&gemini.api_key));
        }
        ProviderConfig::Bedrock {
            region,
            model_id,
            credentials,
        } => {
            info.provider = "bedrock".to_string();
            info.model = model_id.clone();
            info.region = Some(region.clone());

            let credential_type = match credentials {
                CredentialSource::Inline {
                    access_key_id,
                    session_token,
                    ..
                } => {
                    info.access_key_hint = Some(redact_secret(access_key_id));
                    if session_token.is_some() {
                        "temporary"
                    } else {
                        "inline"
                    }
                }
                CredentialSource::Profile { profile_name } => {
                    info.profile_name = Some(profile_name.clone());
                    "profile"
                }
                CredentialSource::DefaultChain => "default_chain",
            };
            info.credential_type = Some(credential_type.to_string());
        }
    }

    info
}

fn redact_secret(key: &str) -> String {
    if key.len() <= 8 || !key.is_ascii() {
        return "****".to_string();
    }
    let prefix = &key[..4];
    let suffix = &key[key.len() - 4..];
    format!("{prefix}...{suffix}")
}
