use symcheck_core::error::CoreError;
use symcheck_core::models::session::SessionStatus;
use symcheck_oracle::OracleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The oracle call failed. The session is now `Failed` and must be
    /// restarted.
    #[error("oracle unavailable: {0}")]
    OracleUnavailable(#[from] OracleError),

    #[error("invalid answer {0:?}: expected one of No, Mild, Severe")]
    InvalidAnswer(String),

    #[error("cannot {operation} while session is {status}")]
    StateViolation {
        operation: &'static str,
        status: SessionStatus,
    },

    #[error("invalid session configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl SessionError {
    /// Local errors leave the session untouched; the caller can simply try
    /// again with a valid input or at the right time.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SessionError::InvalidAnswer(_) | SessionError::StateViolation { .. }
        )
    }
}
