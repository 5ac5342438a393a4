use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid severity {0:?}: expected one of No, Mild, Severe")]
    InvalidSeverity(String),

    #[error("transcript is full ({max_turns} turns)")]
    TranscriptFull { max_turns: usize },
}
