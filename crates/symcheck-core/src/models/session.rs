use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::prediction::PredictionResult;
use super::transcript::Transcript;

/// Finite state of one assessment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SessionStatus {
    Initializing,
    AwaitingAnswer,
    FetchingNext,
    Predicting,
    Complete,
    Failed,
}

impl SessionStatus {
    /// Complete and Failed can only be left through a restart.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Complete | SessionStatus::Failed)
    }

    /// An oracle call is in flight; input must be disabled.
    pub fn is_busy(&self) -> bool {
        matches!(self, SessionStatus::FetchingNext | SessionStatus::Predicting)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Initializing => "initializing",
            SessionStatus::AwaitingAnswer => "awaiting_answer",
            SessionStatus::FetchingNext => "fetching_next",
            SessionStatus::Predicting => "predicting",
            SessionStatus::Complete => "complete",
            SessionStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Snapshot of an assessment session.
///
/// Handed out by value; changing a snapshot never affects the session it
/// came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionState {
    pub session_id: Uuid,
    pub status: SessionStatus,
    pub transcript: Transcript,
    /// The question awaiting an answer. Empty before the first fetch.
    pub pending_question: String,
    /// Present only when `status` is `Complete`.
    pub prediction: Option<PredictionResult>,
    /// Description of the oracle failure when `status` is `Failed`.
    pub failure: Option<String>,
    pub started_at: jiff::Timestamp,
}

impl SessionState {
    pub fn new(max_turns: usize) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            status: SessionStatus::Initializing,
            transcript: Transcript::new(max_turns),
            pending_question: String::new(),
            prediction: None,
            failure: None,
            started_at: jiff::Timestamp::now(),
        }
    }

    pub fn max_turns(&self) -> usize {
        self.transcript.max_turns()
    }

    pub fn turns_remaining(&self) -> usize {
        self.max_turns().saturating_sub(self.transcript.len())
    }

    /// 1-based number of the question currently awaiting an answer, for
    /// "Question 3 of 20" style progress.
    pub fn question_number(&self) -> usize {
        (self.transcript.len() + 1).min(self.max_turns())
    }
}
