use symcheck_core::models::prediction::PredictionResult;
use symcheck_core::models::transcript::Turn;

use crate::error::ExportError;
use crate::render::{ReportContext, TEXT_TEMPLATE, render_report};
use crate::renderer::{ReportDocument, ReportOptions, ReportRenderer};

/// Plain-text report, also used as the fallback when DOCX generation fails.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    options: ReportOptions,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self {
            options: ReportOptions::default(),
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.options.template = Some(template.into());
        self
    }

    pub fn with_date(mut self, date: jiff::civil::Date) -> Self {
        self.options.date = Some(date);
        self
    }

    pub fn render_string(
        &self,
        transcript: &[Turn],
        prediction: &PredictionResult,
    ) -> Result<String, ExportError> {
        let context = ReportContext::new(transcript, prediction, self.options.date());
        render_report("report.txt", self.options.template(TEXT_TEMPLATE), &context)
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for TextRenderer {
    fn render(
        &self,
        transcript: &[Turn],
        prediction: &PredictionResult,
    ) -> Result<ReportDocument, ExportError> {
        let text = self.render_string(transcript, prediction)?;
        Ok(ReportDocument {
            filename: self.options.filename("txt"),
            mime_type: "text/plain; charset=utf-8".to_string(),
            bytes: text.into_bytes(),
        })
    }
}
