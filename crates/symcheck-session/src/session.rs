//! Assessment session state machine.
//!
//! ```text
//! Initializing --start() ok--------------------> AwaitingAnswer
//! Initializing --start() err-------------------> Failed
//! AwaitingAnswer --submit_answer() [more]------> FetchingNext --ok--> AwaitingAnswer
//!                                                             --err-> Failed
//! AwaitingAnswer --submit_answer() [last]------> Predicting   --ok--> Complete
//!                                                             --err-> Failed
//! any --restart()------------------------------> Initializing
//! ```
//!
//! The turn count is the only termination criterion. Every transition takes
//! `&mut self`, so calls are serialized by construction and at most one
//! oracle request is ever in flight.

use serde::{Deserialize, Serialize};
use symcheck_core::models::session::{SessionState, SessionStatus};
use symcheck_core::models::severity::Severity;
use symcheck_core::models::transcript::{MAX_TURNS, Transcript, Turn};
use symcheck_oracle::{OracleError, PredictionOracle, QuestionOracle};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::SessionError;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Number of answered questions after which the prediction is requested.
    pub max_turns: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_turns: MAX_TURNS,
        }
    }
}

impl SessionConfig {
    pub fn with_max_turns(max_turns: usize) -> Self {
        Self { max_turns }
    }

    fn validate(&self) -> Result<(), SessionError> {
        if self.max_turns == 0 {
            return Err(SessionError::InvalidConfig(
                "max_turns must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// A status transition, broadcast to subscribers.
///
/// Front-ends use these to disable input while an oracle call is in flight
/// (`FetchingNext`, `Predicting`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub session_id: Uuid,
    pub from: SessionStatus,
    pub to: SessionStatus,
}

/// One user's assessment run.
pub struct AssessmentSession<Q, P> {
    question_oracle: Q,
    prediction_oracle: P,
    state: SessionState,
    events: broadcast::Sender<StatusChange>,
}

impl<Q: QuestionOracle, P: PredictionOracle> AssessmentSession<Q, P> {
    pub fn new(
        question_oracle: Q,
        prediction_oracle: P,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            question_oracle,
            prediction_oracle,
            state: SessionState::new(config.max_turns),
            events,
        })
    }

    /// Owned snapshot of the session. No side effects.
    pub fn current_state(&self) -> SessionState {
        self.state.clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status
    }

    pub fn session_id(&self) -> Uuid {
        self.state.session_id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.state.transcript
    }

    pub fn pending_question(&self) -> &str {
        &self.state.pending_question
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatusChange> {
        self.events.subscribe()
    }

    /// Fetch the opening question.
    pub async fn start(&mut self) -> Result<SessionStatus, SessionError> {
        self.require(SessionStatus::Initializing, "start")?;

        info!(session_id = %self.state.session_id, max_turns = self.state.max_turns(), "starting assessment");

        match self.question_oracle.next_question(&[]).await {
            Ok(question) => {
                self.state.pending_question = question;
                self.transition(SessionStatus::AwaitingAnswer);
                Ok(SessionStatus::AwaitingAnswer)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Record the answer to the pending question, then either fetch the
    /// next question or, once the bound is reached, request the prediction.
    ///
    /// On an oracle failure the answered turn is kept, the session moves to
    /// `Failed` and [`SessionError::OracleUnavailable`] is returned.
    pub async fn submit_answer(&mut self, answer: Severity) -> Result<SessionStatus, SessionError> {
        self.require(SessionStatus::AwaitingAnswer, "submit an answer")?;

        let turn = Turn::new(self.state.pending_question.clone(), answer);
        self.state.transcript.push(turn)?;
        self.state.pending_question.clear();

        debug!(
            session_id = %self.state.session_id,
            turns = self.state.transcript.len(),
            %answer,
            "answer recorded"
        );

        if self.state.transcript.len() >= self.state.max_turns() {
            self.request_prediction().await
        } else {
            self.request_next_question().await
        }
    }

    /// Like [`submit_answer`](Self::submit_answer) for untyped input.
    ///
    /// Only the exact names `No`, `Mild` and `Severe` are accepted. Anything
    /// else is rejected before the session is touched.
    pub async fn submit_raw_answer(&mut self, raw: &str) -> Result<SessionStatus, SessionError> {
        let answer: Severity = raw
            .parse()
            .map_err(|_| SessionError::InvalidAnswer(raw.to_string()))?;
        self.submit_answer(answer).await
    }

    /// Discard everything and return to `Initializing` with a new session id.
    ///
    /// Allowed from any state. Call [`start`](Self::start) afterwards.
    pub fn restart(&mut self) {
        let from = self.state.status;
        let previous = self.state.session_id;

        self.state = SessionState::new(self.state.max_turns());

        info!(
            previous_session_id = %previous,
            session_id = %self.state.session_id,
            %from,
            "assessment restarted"
        );
        if from != SessionStatus::Initializing {
            self.emit(from, SessionStatus::Initializing);
        }
    }

    pub async fn restart_and_start(&mut self) -> Result<SessionStatus, SessionError> {
        self.restart();
        self.start().await
    }

    async fn request_next_question(&mut self) -> Result<SessionStatus, SessionError> {
        self.transition(SessionStatus::FetchingNext);

        match self
            .question_oracle
            .next_question(self.state.transcript.turns())
            .await
        {
            Ok(question) => {
                self.state.pending_question = question;
                self.transition(SessionStatus::AwaitingAnswer);
                Ok(SessionStatus::AwaitingAnswer)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    async fn request_prediction(&mut self) -> Result<SessionStatus, SessionError> {
        self.transition(SessionStatus::Predicting);

        match self
            .prediction_oracle
            .predict(self.state.transcript.turns())
            .await
        {
            Ok(prediction) => {
                info!(
                    session_id = %self.state.session_id,
                    conditions = prediction.len(),
                    "assessment complete"
                );
                self.state.prediction = Some(prediction);
                self.transition(SessionStatus::Complete);
                Ok(SessionStatus::Complete)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn require(&self, expected: SessionStatus, operation: &'static str) -> Result<(), SessionError> {
        if self.state.status != expected {
            return Err(SessionError::StateViolation {
                operation,
                status: self.state.status,
            });
        }
        Ok(())
    }

    fn fail(&mut self, error: OracleError) -> SessionError {
        warn!(
            session_id = %self.state.session_id,
            status = %self.state.status,
            turns = self.state.transcript.len(),
            "oracle call failed: {error}"
        );
        self.state.failure = Some(error.to_string());
        self.transition(SessionStatus::Failed);
        SessionError::OracleUnavailable(error)
    }

    fn transition(&mut self, to: SessionStatus) {
        let from = self.state.status;
        self.state.status = to;

        debug!(
            session_id = %self.state.session_id,
            %from,
            %to,
            turns = self.state.transcript.len(),
            "session transition"
        );
        self.emit(from, to);
    }

    fn emit(&self, from: SessionStatus, to: SessionStatus) {
        // No subscribers is fine.
        let _ = self.events.send(StatusChange {
            session_id: self.state.session_id,
            from,
            to,
        });
    }
}
