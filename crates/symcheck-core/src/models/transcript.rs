use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::severity::Severity;
use crate::error::CoreError;

/// Default upper bound on the number of turns in one assessment.
pub const MAX_TURNS: usize = 20;

/// One question/answer exchange.
///
/// Fields are only readable: once a turn is in a transcript it cannot be
/// changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Turn {
    question: String,
    answer: Severity,
}

impl Turn {
    pub fn new(question: impl Into<String>, answer: Severity) -> Self {
        Self {
            question: question.into(),
            answer,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> Severity {
        self.answer
    }
}

/// Ordered, bounded list of turns.
///
/// Order matters: the transcript is replayed to the oracles as context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Transcript {
    turns: Vec<Turn>,
    max_turns: usize,
}

impl Transcript {
    pub fn new(max_turns: usize) -> Self {
        Self {
            turns: Vec::with_capacity(max_turns),
            max_turns,
        }
    }

    /// Append a turn. Fails once the bound has been reached.
    pub fn push(&mut self, turn: Turn) -> Result<(), CoreError> {
        if self.is_full() {
            return Err(CoreError::TranscriptFull {
                max_turns: self.max_turns,
            });
        }
        self.turns.push(turn);
        Ok(())
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    pub fn is_full(&self) -> bool {
        self.turns.len() >= self.max_turns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(MAX_TURNS)
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}
