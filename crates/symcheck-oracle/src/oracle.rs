//! Oracle traits.
//!
//! An assessment session only ever sees these two traits. Every concrete
//! service (a generative-language API, Bedrock, the inference microservice)
//! is an adapter that implements one or both of them and does its own
//! response parsing, so callers receive validated values and never raw text.

use std::sync::Arc;

use async_trait::async_trait;
use symcheck_core::models::prediction::PredictionResult;
use symcheck_core::models::transcript::Turn;

use crate::error::OracleError;

/// Produces the next question given the turns answered so far.
///
/// `transcript` may be empty (first question). The returned string is used
/// verbatim; implementations must not reject empty text on the session's
/// behalf.
#[async_trait]
pub trait QuestionOracle: Send + Sync {
    async fn next_question(&self, transcript: &[Turn]) -> Result<String, OracleError>;
}

/// Produces ranked candidate conditions for a finished transcript.
///
/// Must tolerate transcripts shorter than the session bound.
#[async_trait]
pub trait PredictionOracle: Send + Sync {
    async fn predict(&self, transcript: &[Turn]) -> Result<PredictionResult, OracleError>;
}

#[async_trait]
impl<T: QuestionOracle + ?Sized> QuestionOracle for Arc<T> {
    async fn next_question(&self, transcript: &[Turn]) -> Result<String, OracleError> {
        (**self).next_question(transcript).await
    }
}

#[async_trait]
impl<T: QuestionOracle + ?Sized> QuestionOracle for Box<T> {
    async fn next_question(&self, transcript: &[Turn]) -> Result<String, OracleError> {
        (**self).next_question(transcript).await
    }
}

#[async_trait]
impl<T: PredictionOracle + ?Sized> PredictionOracle for Arc<T> {
    async fn predict(&self, transcript: &[Turn]) -> Result<PredictionResult, OracleError> {
        (**self).predict(transcript).await
    }
}

#[async_trait]
impl<T: PredictionOracle + ?Sized> PredictionOracle for Box<T> {
    async fn predict(&self, transcript: &[Turn]) -> Result<PredictionResult, OracleError> {
        (**self).predict(transcript).await
    }
}
