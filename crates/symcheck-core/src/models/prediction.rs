use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A candidate condition returned by a prediction oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Condition {
    pub name: String,
    pub description: String,

    /// Free-form likelihood label ("High", "62%") when the oracle supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likelihood: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precautions: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remedies: Option<String>,
}

impl Condition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            likelihood: None,
            precautions: None,
            remedies: None,
        }
    }
}

/// Ranked conditions, most likely first.
///
/// Nominally three entries, but whatever the oracle returned is kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PredictionResult {
    pub conditions: Vec<Condition>,
}

impl PredictionResult {
    pub fn new(conditions: Vec<Condition>) -> Self {
        Self { conditions }
    }

    pub fn top(&self) -> Option<&Condition> {
        self.conditions.first()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}
