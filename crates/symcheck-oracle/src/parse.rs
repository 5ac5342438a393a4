//! Parsing of free-form model output into domain values.
//!
//! Generative models answer in loosely formatted text: questions wrapped in
//! quotes or code fences, JSON lists where a single question was asked for,
//! numbered condition lists with Markdown emphasis. This module is the only
//! place that text is interpreted.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use symcheck_core::models::prediction::{Condition, PredictionResult};
use symcheck_core::models::question::FollowUpQuestion;

use crate::error::OracleError;

/// `1. Name: description` (also `1) Name: description`).
static RANKED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)[.)]\s+(.+?):\s+(.+?)\s*$").unwrap());

/// Pull the question text out of a model response.
///
/// Never fails: when the text has no recognizable structure it is returned
/// trimmed but otherwise verbatim, even if empty.
pub fn extract_question(raw: &str) -> String {
    let body = strip_code_fence(raw.trim());

    if body.starts_with('[')
        && let Some(first) = parse_question_list(body)
            .ok()
            .and_then(|list| list.into_iter().next())
    {
        return first.question;
    }

    strip_wrapping_quotes(body.trim()).to_string()
}

/// Parse a numbered `N. Name: description` list into ranked conditions.
///
/// Lines that do not match are ignored; order of the matching lines is the
/// ranking. A response with no matching line at all is a schema violation.
pub fn parse_ranked_conditions(raw: &str) -> Result<PredictionResult, OracleError> {
    let conditions: Vec<Condition> = raw
        .lines()
        .filter_map(|line| {
            let line = line.replace("**", "");
            let caps = RANKED_LINE.captures(&line)?;
            let name = clean_condition_name(&caps[2]);
            if name.is_empty() {
                return None;
            }
            Some(Condition::new(name, caps[3].trim()))
        })
        .collect();

    if conditions.is_empty() {
        return Err(OracleError::SchemaViolation(format!(
            "no ranked conditions found in response: {raw}"
        )));
    }

    Ok(PredictionResult::new(conditions))
}

/// Parse a JSON list of follow-up questions.
///
/// Accepts plain strings or `{"question": ..., "answers": [...]}` objects,
/// optionally inside a Markdown code fence.
pub fn parse_follow_up_questions(raw: &str) -> Result<Vec<FollowUpQuestion>, OracleError> {
    parse_question_list(strip_code_fence(raw.trim()))
}

fn parse_question_list(body: &str) -> Result<Vec<FollowUpQuestion>, OracleError> {
    let value: Value = serde_json::from_str(body)?;
    let Value::Array(items) = value else {
        return Err(OracleError::SchemaViolation(
            "expected a JSON list of questions".to_string(),
        ));
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::String(question) => Ok(FollowUpQuestion::new(question)),
            Value::Object(_) => Ok(serde_json::from_value(item)?),
            other => Err(OracleError::SchemaViolation(format!(
                "unexpected question entry: {other}"
            ))),
        })
        .collect()
}

/// Remove a surrounding Markdown code fence (```` ```json ... ``` ````).
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (`json`, `text`, ...) on the opening line.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn strip_wrapping_quotes(text: &str) -> &str {
    for (open, close) in [('"', '"'), ('\u{201c}', '\u{201d}')] {
        if let Some(inner) = text
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            return inner.trim();
        }
    }
    text
}

fn clean_condition_name(raw: &str) -> String {
    raw.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim()
        .to_string()
}
