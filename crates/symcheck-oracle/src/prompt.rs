//! Prompt construction for generative-language oracles.
//!
//! The transcript is replayed to the model as a JSON array of
//! `{"question": ..., "answer": ...}` objects, in answer order.

use symcheck_core::models::transcript::Turn;

use crate::error::OracleError;

/// System prompt for adapters that support one (Bedrock).
pub const SYSTEM_PROMPT: &str = "\
You are a health assessment assistant. You ask short symptom questions that \
the user answers with exactly one of \"No\", \"Mild\" or \"Severe\", and you \
suggest possible conditions once enough answers are collected. You never \
present a suggestion as a diagnosis.";

const FIRST_QUESTION_PROMPT: &str = "\
Ask a health-related question that can be answered with No, Mild or Severe. \
Respond with the question text only, without numbering, options or any \
other explanation.";

const NEXT_QUESTION_INSTRUCTIONS: &str = "\
Ask the next health-related question that best narrows down possible \
conditions given these answers. The user can only answer No, Mild or \
Severe, so phrase the question accordingly and do not repeat a question \
that was already asked. Respond with the question text only, without \
numbering, options or any other explanation.";

const PREDICTION_INSTRUCTIONS: &str = "\
Based on these responses, predict 3 possible conditions in order of \
likelihood. Format your response exactly as follows:
1. [First condition name]: Brief description
2. [Second condition name]: Brief description
3. [Third condition name]: Brief description";

/// Serialize the transcript the way it is shown to the model.
pub fn transcript_json(transcript: &[Turn]) -> Result<String, OracleError> {
    Ok(serde_json::to_string(transcript)?)
}

/// Prompt asking for the question that follows `transcript`.
///
/// An empty transcript yields the opening-question prompt.
pub fn next_question_prompt(transcript: &[Turn]) -> Result<String, OracleError> {
    if transcript.is_empty() {
        return Ok(FIRST_QUESTION_PROMPT.to_string());
    }

    Ok(format!(
        "Previous answers: {}\n\n{NEXT_QUESTION_INSTRUCTIONS}",
        transcript_json(transcript)?
    ))
}

/// Prompt asking for the ranked conditions for `transcript`.
pub fn prediction_prompt(transcript: &[Turn]) -> Result<String, OracleError> {
    Ok(format!(
        "{PREDICTION_INSTRUCTIONS}\n\nResponses: {}",
        transcript_json(transcript)?
    ))
}
