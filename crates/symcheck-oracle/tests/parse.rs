use symcheck_oracle::OracleError;
use symcheck_oracle::parse::{extract_question, parse_follow_up_questions, parse_ranked_conditions};

#[test]
fn plain_question_is_trimmed() {
    assert_eq!(
        extract_question("  Do you have a headache?\n"),
        "Do you have a headache?"
    );
}

#[test]
fn quoted_question_loses_its_quotes() {
    assert_eq!(extract_question("\"Do you feel tired?\""), "Do you feel tired?");
    assert_eq!(
        extract_question("\u{201c}Do you feel dizzy?\u{201d}"),
        "Do you feel dizzy?"
    );
}

#[test]
fn json_list_yields_first_question() {
    let raw = r#"```json
[
  {"question": "Do you have a fever?", "answers": ["No", "Mild", "Severe"]},
  {"question": "Do you have a cough?", "answers": ["No", "Mild", "Severe"]}
]
```"#;
    assert_eq!(extract_question(raw), "Do you have a fever?");

    assert_eq!(
        extract_question(r#"["Are you nauseous?", "Any chest pain?"]"#),
        "Are you nauseous?"
    );
}

#[test]
fn empty_and_unparseable_text_is_kept_verbatim() {
    assert_eq!(extract_question(""), "");
    assert_eq!(extract_question("   "), "");
    // Looks like JSON but is not; falls back to the raw text.
    assert_eq!(extract_question("[not json"), "[not json");
}

#[test]
fn ranked_conditions_keep_order() {
    let raw = "\
Here are the most likely conditions:
1. [Migraine]: Recurring moderate to severe headaches.
2. **Tension headache**: Pain caused by muscle tension.
3. Sinusitis: Inflammation of the sinuses: often after a cold.

Please consult a doctor.";

    let result = parse_ranked_conditions(raw).unwrap();
    let names: Vec<&str> = result.conditions.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Migraine", "Tension headache", "Sinusitis"]);
    assert_eq!(
        result.conditions[2].description,
        "Inflammation of the sinuses: often after a cold."
    );
}

#[test]
fn fewer_than_three_conditions_are_accepted() {
    let result = parse_ranked_conditions("1. Common cold: Viral infection").unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.conditions[0].name, "Common cold");
}

#[test]
fn response_without_ranked_lines_is_a_schema_violation() {
    let err = parse_ranked_conditions("I cannot help with that.").unwrap_err();
    assert!(matches!(err, OracleError::SchemaViolation(_)));
}

#[test]
fn follow_up_questions_default_their_answers() {
    let raw = r#"[{"question": "Do you have a rash?"}, "Is it itchy?"]"#;
    let questions = parse_follow_up_questions(raw).unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].answers, vec!["No", "Mild", "Severe"]);
    assert_eq!(questions[1].question, "Is it itchy?");
}

#[test]
fn follow_up_questions_reject_non_lists() {
    let err = parse_follow_up_questions(r#"{"question": "x"}"#).unwrap_err();
    assert!(matches!(err, OracleError::SchemaViolation(_)));

    let err = parse_follow_up_questions("not json at all").unwrap_err();
    assert!(matches!(err, OracleError::Serialization(_)));
}
