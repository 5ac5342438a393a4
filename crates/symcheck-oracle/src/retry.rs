//! Opt-in retry wrapper for oracles.
//!
//! Sessions never retry on their own; an integrator that wants retries wraps
//! the oracle before handing it to the session. Oracle calls are
//! idempotent-safe, so replaying the same transcript is harmless.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use symcheck_core::models::prediction::PredictionResult;
use symcheck_core::models::transcript::Turn;
use tracing::{debug, warn};

use crate::error::OracleError;
use crate::oracle::{PredictionOracle, QuestionOracle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts including the first one. `0` is treated as `1`.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    #[serde(with = "millis")]
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

/// An oracle that replays failed calls according to a [`RetryPolicy`].
pub struct Retrying<O> {
    inner: O,
    policy: RetryPolicy,
}

impl<O> Retrying<O> {
    pub fn new(inner: O, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }
}

async fn with_retry<T, F, Fut>(
    policy: RetryPolicy,
    operation: &str,
    mut call: F,
) -> Result<T, OracleError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, OracleError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match call().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(operation, attempt, "oracle call succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if attempt < max_attempts && e.is_retryable() => {
                warn!(operation, attempt, max_attempts, "oracle call failed, retrying: {e}");
                tokio::time::sleep(policy.backoff).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[async_trait]
impl<O: QuestionOracle> QuestionOracle for Retrying<O> {
    async fn next_question(&self, transcript: &[Turn]) -> Result<String, OracleError> {
        with_retry(self.policy, "next_question", move || {
            self.inner.next_question(transcript)
        })
        .await
    }
}

#[async_trait]
impl<O: PredictionOracle> PredictionOracle for Retrying<O> {
    async fn predict(&self, transcript: &[Turn]) -> Result<PredictionResult, OracleError> {
        with_retry(self.policy, "predict", move || self.inner.predict(transcript)).await
    }
}
