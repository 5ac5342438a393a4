use symcheck_core::models::severity::Severity;
use symcheck_core::models::transcript::Turn;
use symcheck_oracle::prompt::{next_question_prompt, prediction_prompt, transcript_json};

fn sample() -> Vec<Turn> {
    vec![
        Turn::new("Do you have a headache?", Severity::Severe),
        Turn::new("Are you sensitive to light?", Severity::Mild),
    ]
}

#[test]
fn transcript_is_serialized_as_question_answer_pairs() {
    let json = transcript_json(&sample()).unwrap();
    assert_eq!(
        json,
        r#"[{"question":"Do you have a headache?","answer":"Severe"},{"question":"Are you sensitive to light?","answer":"Mild"}]"#
    );
}

#[test]
fn empty_transcript_asks_for_an_opening_question() {
    let prompt = next_question_prompt(&[]).unwrap();
    assert!(prompt.contains("No, Mild or Severe"));
    assert!(!prompt.contains("Previous answers"));
}

#[test]
fn follow_up_prompt_replays_the_transcript() {
    let prompt = next_question_prompt(&sample()).unwrap();
    assert!(prompt.starts_with("Previous answers: ["));
    assert!(prompt.contains("Are you sensitive to light?"));
}

#[test]
fn prediction_prompt_requests_numbered_format() {
    let prompt = prediction_prompt(&sample()).unwrap();
    assert!(prompt.contains("1. [First condition name]: Brief description"));
    assert!(prompt.contains(r#""answer":"Severe""#));
}
