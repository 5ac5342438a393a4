use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// The answer a user gives to a symptom question.
///
/// The set is closed: a question is always answered with exactly one of
/// these three levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Severity {
    No,
    Mild,
    Severe,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::No, Severity::Mild, Severity::Severe];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::No => "No",
            Severity::Mild => "Mild",
            Severity::Severe => "Severe",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts exactly `No`, `Mild` or `Severe`.
impl FromStr for Severity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|severity| severity.as_str() == s)
            .ok_or_else(|| CoreError::InvalidSeverity(s.to_string()))
    }
}
