use std::io::Cursor;
use std::sync::Mutex;

use async_trait::async_trait;
use symcheck_cli::console::{self, ConsoleCommand, Outcome, parse_command, print_questionnaire};
use symcheck_core::models::prediction::{Condition, PredictionResult};
use symcheck_core::models::question::FollowUpQuestion;
use symcheck_core::models::session::SessionStatus;
use symcheck_core::models::severity::Severity;
use symcheck_core::models::transcript::Turn;
use symcheck_oracle::{OracleError, PredictionOracle, QuestionOracle};
use symcheck_session::{AssessmentSession, SessionConfig};

/// Asks "Question N?" and fails on the call numbers listed in `fail_on`.
struct Questions {
    calls: Mutex<usize>,
    fail_on: Vec<usize>,
}

impl Questions {
    fn new(fail_on: Vec<usize>) -> Self {
        Self {
            calls: Mutex::new(0),
            fail_on,
        }
    }
}

#[async_trait]
impl QuestionOracle for Questions {
    async fn next_question(&self, _transcript: &[Turn]) -> Result<String, OracleError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        if self.fail_on.contains(&call) {
            return Err(OracleError::Status {
                status: 503,
                body: "overloaded".to_string(),
            });
        }
        Ok(format!("Question {call}?"))
    }
}

struct Prediction;

#[async_trait]
impl PredictionOracle for Prediction {
    async fn predict(&self, _transcript: &[Turn]) -> Result<PredictionResult, OracleError> {
        let mut flu = Condition::new("Influenza", "Viral infection.");
        flu.likelihood = Some("High".to_string());
        Ok(PredictionResult::new(vec![flu]))
    }
}

fn session(fail_on: Vec<usize>, max_turns: usize) -> AssessmentSession<Questions, Prediction> {
    AssessmentSession::new(
        Questions::new(fail_on),
        Prediction,
        SessionConfig::with_max_turns(max_turns),
    )
    .unwrap()
}

async fn drive(
    session: &mut AssessmentSession<Questions, Prediction>,
    input: &str,
) -> (Outcome, String) {
    let mut out = Vec::new();
    let outcome = console::run(session, Cursor::new(input.to_string()), &mut out)
        .await
        .unwrap();
    (outcome, String::from_utf8(out).unwrap())
}

#[test]
fn commands_are_parsed_case_insensitively() {
    assert_eq!(parse_command("Q\n"), ConsoleCommand::Quit);
    assert_eq!(parse_command(" restart "), ConsoleCommand::Restart);
    assert_eq!(parse_command("r"), ConsoleCommand::Restart);
    assert_eq!(parse_command(" Severe\n"), ConsoleCommand::Answer(Severity::Severe));
    assert_eq!(parse_command("M"), ConsoleCommand::Answer(Severity::Mild));
    assert_eq!(parse_command("no"), ConsoleCommand::Answer(Severity::No));
    assert_eq!(
        parse_command(" sev \n"),
        ConsoleCommand::Unknown("sev".to_string())
    );
}

#[test]
fn questionnaire_is_numbered_with_its_choices() {
    let mut aches = FollowUpQuestion::new("Do you have body aches?");
    aches.answers = vec!["Yes".to_string(), "No".to_string()];
    let questions = vec![FollowUpQuestion::new("Do you have chills?"), aches];

    let mut out = Vec::new();
    print_questionnaire(&mut out, &questions).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "1. Do you have chills?\n   [No / Mild / Severe]\n2. Do you have body aches?\n   [Yes / No]\n"
    );
}

#[tokio::test]
async fn full_run_prints_progress_results_and_disclaimer() {
    let mut session = session(Vec::new(), 3);
    let (outcome, out) = drive(&mut session, "n\nmaybe\nmild\nS\n").await;

    let Outcome::Complete(state) = outcome else {
        panic!("expected a completed assessment");
    };
    assert_eq!(state.transcript.len(), 3);
    let answers: Vec<Severity> = state.transcript.iter().map(Turn::answer).collect();
    assert_eq!(answers, vec![Severity::No, Severity::Mild, Severity::Severe]);

    assert!(out.contains("Question 1 of 3: Question 1?"));
    assert!(out.contains("Question 3 of 3: Question 3?"));
    assert!(out.contains("invalid answer \"maybe\""));
    assert!(out.contains("1. Influenza: Viral infection."));
    assert!(out.contains("Likelihood: High"));
    assert!(out.contains("does not replace professional medical advice"));
}

#[tokio::test]
async fn failure_offers_restart() {
    // Second question fetch fails; after the restart the oracle recovers.
    let mut session = session(vec![2], 2);
    let (outcome, out) = drive(&mut session, "n\nm\nr\ns\ns\n").await;

    assert!(out.contains("Something went wrong"));
    assert!(out.contains("Type r to restart or q to quit."));
    assert!(out.contains("Starting over."));

    let Outcome::Complete(state) = outcome else {
        panic!("expected a completed assessment after restart");
    };
    let questions: Vec<&str> = state.transcript.iter().map(Turn::question).collect();
    assert_eq!(questions, vec!["Question 3?", "Question 4?"]);
}

#[tokio::test]
async fn quit_and_end_of_input_stop_the_loop() {
    let mut session = session(Vec::new(), 5);
    let (outcome, _) = drive(&mut session, "n\nq\n").await;
    let Outcome::Quit(state) = outcome else {
        panic!("expected quit");
    };
    assert_eq!(state.status, SessionStatus::AwaitingAnswer);
    assert_eq!(state.transcript.len(), 1);

    let mut session = self::session(Vec::new(), 5);
    let (outcome, _) = drive(&mut session, "").await;
    assert!(matches!(outcome, Outcome::Quit(_)));
}
