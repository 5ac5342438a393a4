use serde::Serialize;
use tera::{Context, Tera};

use symcheck_core::models::prediction::PredictionResult;
use symcheck_core::models::transcript::Turn;

use crate::error::ExportError;

pub const REPORT_TITLE: &str = "Health Assessment Report";

pub const DISCLAIMER: &str = "This assessment is for informational purposes only and does not \
replace professional medical advice. Please consult with a healthcare provider for proper \
diagnosis and treatment.";

/// Markdown-ish layout consumed by the DOCX generator.
///
/// Pipe rows become a table; `#` lines become headings; `- ` lines become
/// bullets; `**text**` becomes bold.
pub const MARKDOWN_TEMPLATE: &str = r#"# {{ title }}

Date: {{ generated_on }}

## Questions and Responses

| # | Question | Response |
| --- | --- | --- |
{% for item in responses %}| {{ item.number }} | {{ item.question }} | {{ item.answer }} |
{% endfor %}
## Assessment Results

{% for condition in conditions %}{{ condition.rank }}. **{{ condition.name }}**: {{ condition.description }}
{% if condition.likelihood %}- Likelihood: {{ condition.likelihood }}
{% endif %}{% if condition.precautions %}- Precautions: {{ condition.precautions }}
{% endif %}{% if condition.remedies %}- Remedies: {{ condition.remedies }}
{% endif %}{% endfor %}
## Disclaimer

{{ disclaimer }}
"#;

pub const TEXT_TEMPLATE: &str = r#"{{ title | upper }}
Date: {{ generated_on }}

QUESTIONS AND RESPONSES
{% for item in responses %}{{ item.number }}. {{ item.question }}
   Response: {{ item.answer }}
{% endfor %}
ASSESSMENT RESULTS
{% for condition in conditions %}{{ condition.rank }}. {{ condition.name }}: {{ condition.description }}
{% if condition.likelihood %}   Likelihood: {{ condition.likelihood }}
{% endif %}{% if condition.precautions %}   Precautions: {{ condition.precautions }}
{% endif %}{% if condition.remedies %}   Remedies: {{ condition.remedies }}
{% endif %}{% endfor %}
{{ disclaimer }}
"#;

/// Template variables for a report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportContext {
    pub title: String,
    pub generated_on: String,
    pub responses: Vec<ResponseRow>,
    pub conditions: Vec<ConditionRow>,
    pub disclaimer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseRow {
    pub number: usize,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConditionRow {
    pub rank: usize,
    pub name: String,
    pub description: String,
    pub likelihood: Option<String>,
    pub precautions: Option<String>,
    pub remedies: Option<String>,
}

impl ReportContext {
    pub fn new(
        transcript: &[Turn],
        prediction: &PredictionResult,
        generated_on: jiff::civil::Date,
    ) -> Self {
        let responses = transcript
            .iter()
            .enumerate()
            .map(|(i, turn)| ResponseRow {
                number: i + 1,
                question: single_line(turn.question()),
                answer: turn.answer().to_string(),
            })
            .collect();

        let conditions = prediction
            .conditions
            .iter()
            .enumerate()
            .map(|(i, c)| ConditionRow {
                rank: i + 1,
                name: single_line(&c.name),
                description: single_line(&c.description),
                likelihood: c.likelihood.as_deref().map(single_line),
                precautions: c.precautions.as_deref().map(single_line),
                remedies: c.remedies.as_deref().map(single_line),
            })
            .collect();

        Self {
            title: REPORT_TITLE.to_string(),
            generated_on: generated_on.to_string(),
            responses,
            conditions,
            disclaimer: DISCLAIMER.to_string(),
        }
    }
}

/// Oracle text can contain newlines and pipes, which would break the
/// line-oriented layout.
fn single_line(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "/")
}

/// Render a Tera template with a report context.
///
/// The `template_content` is the raw template string (Jinja2 syntax).
/// The context fields become the template variables.
pub fn render_report(
    template_name: &str,
    template_content: &str,
    report: &ReportContext,
) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.add_raw_template(template_name, template_content)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let value = serde_json::to_value(report)?;
    let context = Context::from_value(value)
        .map_err(|e| ExportError::TemplateRender(e.to_string()))?;

    let rendered = tera.render(template_name, &context)?;
    Ok(rendered)
}
