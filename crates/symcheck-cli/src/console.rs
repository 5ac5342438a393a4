//! Line-oriented assessment loop.
//!
//! Reads one command per line: an answer (`n`, `m`, `s` or the full word),
//! `r` to restart or `q` to quit. Input and output are generic so the loop
//! can be driven from tests.

use std::io::{BufRead, Write};

use symcheck_core::models::session::{SessionState, SessionStatus};
use symcheck_core::models::question::FollowUpQuestion;
use symcheck_core::models::severity::Severity;
use symcheck_export::render::DISCLAIMER;
use symcheck_oracle::{PredictionOracle, QuestionOracle};
use symcheck_session::{AssessmentSession, SessionError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Answer(Severity),
    Restart,
    Quit,
    /// Anything that is neither a command nor an answer.
    Unknown(String),
}

/// Case-insensitive. Answers may be typed as the full word or its first
/// letter.
pub fn parse_command(line: &str) -> ConsoleCommand {
    let trimmed = line.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => ConsoleCommand::Quit,
        "r" | "restart" => ConsoleCommand::Restart,
        "n" | "no" => ConsoleCommand::Answer(Severity::No),
        "m" | "mild" => ConsoleCommand::Answer(Severity::Mild),
        "s" | "severe" => ConsoleCommand::Answer(Severity::Severe),
        _ => ConsoleCommand::Unknown(trimmed.to_string()),
    }
}

/// How the loop ended.
#[derive(Debug)]
pub enum Outcome {
    Complete(SessionState),
    Quit(SessionState),
}

pub async fn run<Q, P, R, W>(
    session: &mut AssessmentSession<Q, P>,
    mut input: R,
    out: &mut W,
) -> eyre::Result<Outcome>
where
    Q: QuestionOracle,
    P: PredictionOracle,
    R: BufRead,
    W: Write,
{
    writeln!(
        out,
        "Answer each question with n (no), m (mild) or s (severe). Type r to restart, q to quit."
    )?;

    if let Err(e) = session.start().await {
        report_failure(out, &e)?;
    }

    loop {
        match session.status() {
            SessionStatus::Complete => {
                let state = session.current_state();
                print_results(out, &state)?;
                return Ok(Outcome::Complete(state));
            }
            SessionStatus::AwaitingAnswer => {
                let state = session.current_state();
                write!(
                    out,
                    "\nQuestion {} of {}: {}\n[n/m/s] > ",
                    state.question_number(),
                    state.max_turns(),
                    state.pending_question
                )?;
            }
            _ => write!(out, "[r/q] > ")?,
        }
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(Outcome::Quit(session.current_state()));
        }

        match parse_command(&line) {
            ConsoleCommand::Quit => return Ok(Outcome::Quit(session.current_state())),
            ConsoleCommand::Restart => {
                writeln!(out, "Starting over.")?;
                if let Err(e) = session.restart_and_start().await {
                    report_failure(out, &e)?;
                }
            }
            _ if session.status() != SessionStatus::AwaitingAnswer => {
                writeln!(out, "Type r to restart or q to quit.")?;
            }
            ConsoleCommand::Unknown(raw) => {
                writeln!(out, "invalid answer {raw:?}: type n, m or s")?;
            }
            ConsoleCommand::Answer(answer) => {
                if let Err(e) = session.submit_answer(answer).await {
                    report_failure(out, &e)?;
                }
            }
        }
    }
}

fn report_failure<W: Write>(out: &mut W, error: &SessionError) -> eyre::Result<()> {
    writeln!(out, "\nSomething went wrong: {error}")?;
    writeln!(out, "Type r to restart or q to quit.")?;
    Ok(())
}

pub fn print_results<W: Write>(out: &mut W, state: &SessionState) -> eyre::Result<()> {
    writeln!(out, "\nAssessment complete. Most likely conditions:")?;

    let conditions = state
        .prediction
        .as_ref()
        .map(|p| p.conditions.as_slice())
        .unwrap_or_default();

    if conditions.is_empty() {
        writeln!(out, "  (no conditions returned)")?;
    }
    for (i, condition) in conditions.iter().enumerate() {
        writeln!(out, "{}. {}: {}", i + 1, condition.name, condition.description)?;
        if let Some(likelihood) = &condition.likelihood {
            writeln!(out, "   Likelihood: {likelihood}")?;
        }
        if let Some(precautions) = &condition.precautions {
            writeln!(out, "   Precautions: {precautions}")?;
        }
        if let Some(remedies) = &condition.remedies {
            writeln!(out, "   Remedies: {remedies}")?;
        }
    }

    writeln!(out, "\n{DISCLAIMER}")?;
    Ok(())
}

/// Print the inference service's questionnaire as a numbered list.
pub fn print_questionnaire<W: Write>(
    out: &mut W,
    questions: &[FollowUpQuestion],
) -> eyre::Result<()> {
    if questions.is_empty() {
        writeln!(out, "No follow-up questions for these symptoms.")?;
    }
    for (i, question) in questions.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, question.question)?;
        if !question.answers.is_empty() {
            writeln!(out, "   [{}]", question.answers.join(" / "))?;
        }
    }
    Ok(())
}
