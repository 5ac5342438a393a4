use symcheck_core::models::prediction::{Condition, PredictionResult};
use symcheck_core::models::session::{SessionState, SessionStatus};
use symcheck_core::models::severity::Severity;
use symcheck_core::models::transcript::Turn;
use symcheck_export::render::{DISCLAIMER, MARKDOWN_TEMPLATE, ReportContext, render_report};
use symcheck_export::renderer::DOCX_MIME_TYPE;
use symcheck_export::{DocxRenderer, ExportError, ReportRenderer, TextRenderer, render_completed};

fn date() -> jiff::civil::Date {
    jiff::civil::date(2026, 3, 14)
}

fn transcript() -> Vec<Turn> {
    vec![
        Turn::new("Do you have a fever?", Severity::Severe),
        Turn::new("Do you have a runny nose?", Severity::No),
        Turn::new("Do you feel tired?", Severity::Mild),
    ]
}

fn prediction() -> PredictionResult {
    let mut flu = Condition::new("Influenza", "Viral infection of the airways.");
    flu.precautions = Some("Rest, fluids".to_string());
    PredictionResult::new(vec![flu, Condition::new("Common cold", "Milder viral infection.")])
}

fn complete_state() -> SessionState {
    let mut state = SessionState::new(3);
    for turn in transcript() {
        state.transcript.push(turn).unwrap();
    }
    state.status = SessionStatus::Complete;
    state.prediction = Some(prediction());
    state
}

#[test]
fn markdown_report_has_table_results_and_disclaimer() {
    let context = ReportContext::new(&transcript(), &prediction(), date());
    let rendered = render_report("report.md", MARKDOWN_TEMPLATE, &context).unwrap();

    assert!(rendered.starts_with("# Health Assessment Report\n"));
    assert!(rendered.contains("Date: 2026-03-14"));
    assert!(rendered.contains("| 1 | Do you have a fever? | Severe |\n"));
    assert!(rendered.contains("| 3 | Do you feel tired? | Mild |\n"));
    assert!(rendered.contains("1. **Influenza**: Viral infection of the airways.\n"));
    assert!(rendered.contains("- Precautions: Rest, fluids\n"));
    assert!(rendered.contains("2. **Common cold**: Milder viral infection.\n"));
    assert!(!rendered.contains("Likelihood"));
    assert!(rendered.contains(DISCLAIMER));
}

#[test]
fn oracle_text_is_flattened_for_the_layout() {
    let turns = vec![Turn::new("Pain in\nthe chest | arm?", Severity::Mild)];
    let context = ReportContext::new(&turns, &prediction(), date());
    assert_eq!(context.responses[0].question, "Pain in the chest / arm?");

    let mut angina = Condition::new("Angina", "Reduced blood flow.");
    angina.likelihood = Some("High\n# urgent".to_string());
    angina.precautions = Some("Rest\n| a | b |".to_string());
    angina.remedies = Some("  Nitrates,\n\tsee a doctor ".to_string());
    let context = ReportContext::new(&turns, &PredictionResult::new(vec![angina]), date());
    let row = &context.conditions[0];
    assert_eq!(row.likelihood.as_deref(), Some("High # urgent"));
    assert_eq!(row.precautions.as_deref(), Some("Rest / a / b /"));
    assert_eq!(row.remedies.as_deref(), Some("Nitrates, see a doctor"));

    let rendered = render_report("report.md", MARKDOWN_TEMPLATE, &context).unwrap();
    assert!(rendered.contains("- Likelihood: High # urgent\n"));
    assert!(!rendered.lines().any(|line| line.starts_with("# urgent")));
    assert!(!rendered.lines().any(|line| line.starts_with("| a")));
}

#[test]
fn text_report_lists_responses_and_conditions() {
    let text = TextRenderer::new()
        .with_date(date())
        .render_string(&transcript(), &prediction())
        .unwrap();

    assert!(text.starts_with("HEALTH ASSESSMENT REPORT\nDate: 2026-03-14\n"));
    assert!(text.contains("2. Do you have a runny nose?\n   Response: No\n"));
    assert!(text.contains("1. Influenza: Viral infection of the airways.\n"));
    assert!(text.contains("   Precautions: Rest, fluids\n"));
    assert!(text.trim_end().ends_with("diagnosis and treatment."));
}

#[test]
fn text_renderer_produces_a_named_document() {
    let document = TextRenderer::new()
        .with_date(date())
        .render(&transcript(), &prediction())
        .unwrap();

    assert_eq!(document.filename, "health-assessment-2026-03-14.txt");
    assert!(document.mime_type.starts_with("text/plain"));
    assert!(String::from_utf8(document.bytes).unwrap().contains("Influenza"));
}

#[test]
fn docx_renderer_produces_a_zip_package() {
    let document = DocxRenderer::default()
        .with_date(date())
        .render(&transcript(), &prediction())
        .unwrap();

    assert_eq!(document.filename, "health-assessment-2026-03-14.docx");
    assert_eq!(document.mime_type, DOCX_MIME_TYPE);
    assert!(document.bytes.starts_with(b"PK"));
}

#[test]
fn docx_renderer_accepts_a_custom_template() {
    let template = "# {{ title }}\n\n{% for c in conditions %}- {{ c.name }}\n{% endfor %}";
    let document = DocxRenderer::default()
        .with_template(template)
        .render(&transcript(), &prediction())
        .unwrap();
    assert!(document.bytes.starts_with(b"PK"));
}

#[test]
fn broken_template_is_a_parse_error() {
    let err = TextRenderer::new()
        .with_template("{% for x in %}")
        .render(&transcript(), &prediction())
        .unwrap_err();
    assert!(matches!(err, ExportError::TemplateParse(_)));
}

#[test]
fn completed_session_can_be_exported() {
    let renderer = TextRenderer::new().with_date(date());
    let document = render_completed(&renderer, &complete_state()).unwrap();
    let text = String::from_utf8(document.bytes).unwrap();
    assert!(text.contains("Do you feel tired?"));
}

#[test]
fn unfinished_session_is_not_exported() {
    let mut state = complete_state();
    state.status = SessionStatus::Failed;
    state.prediction = None;

    let err = render_completed(&TextRenderer::new(), &state).unwrap_err();
    assert!(matches!(err, ExportError::NotComplete(SessionStatus::Failed)));

    let fresh = SessionState::new(3);
    let boxed: Box<dyn ReportRenderer> = Box::new(DocxRenderer::default());
    let err = render_completed(&boxed, &fresh).unwrap_err();
    assert!(matches!(err, ExportError::NotComplete(SessionStatus::Initializing)));
}
