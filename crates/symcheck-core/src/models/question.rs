use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::severity::Severity;

/// A question with a fixed set of answer choices, as returned by services
/// that produce a whole questionnaire at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FollowUpQuestion {
    pub question: String,
    #[serde(default = "default_answers")]
    pub answers: Vec<String>,
}

fn default_answers() -> Vec<String> {
    Severity::ALL.iter().map(|s| s.to_string()).collect()
}

impl FollowUpQuestion {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answers: default_answers(),
        }
    }
}
