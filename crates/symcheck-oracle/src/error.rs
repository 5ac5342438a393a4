use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle invocation failed: {0}")]
    Invocation(String),

    #[error("oracle returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("response did not conform to expected schema: {0}")]
    SchemaViolation(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("oracle configuration error: {0}")]
    Config(String),
}

impl OracleError {
    /// Configuration problems never fix themselves; everything else may
    /// succeed on another attempt.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, OracleError::Config(_))
    }
}

impl From<reqwest::Error> for OracleError {
    fn from(e: reqwest::Error) -> Self {
        OracleError::Invocation(format_err_chain(&e))
    }
}

/// Walk the full error chain and join all causes into one string.
///
/// `reqwest` errors carry the useful detail (DNS, TLS, timeout) in their
/// source chain rather than in `Display`.
pub fn format_err_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
