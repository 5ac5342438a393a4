use symcheck_core::models::prediction::PredictionResult;
use symcheck_core::models::session::{SessionState, SessionStatus};
use symcheck_core::models::transcript::Turn;
use tracing::info;

use crate::docx::generate_docx;
use crate::error::ExportError;
use crate::render::{MARKDOWN_TEMPLATE, ReportContext, render_report};
use crate::styles::DocumentStyles;

pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// A rendered, shareable report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Turns a finished assessment into a document.
///
/// Only called by the presentation layer once a session is complete; the
/// session itself never renders.
pub trait ReportRenderer {
    fn render(
        &self,
        transcript: &[Turn],
        prediction: &PredictionResult,
    ) -> Result<ReportDocument, ExportError>;
}

impl<R: ReportRenderer + ?Sized> ReportRenderer for &R {
    fn render(
        &self,
        transcript: &[Turn],
        prediction: &PredictionResult,
    ) -> Result<ReportDocument, ExportError> {
        (**self).render(transcript, prediction)
    }
}

impl<R: ReportRenderer + ?Sized> ReportRenderer for Box<R> {
    fn render(
        &self,
        transcript: &[Turn],
        prediction: &PredictionResult,
    ) -> Result<ReportDocument, ExportError> {
        (**self).render(transcript, prediction)
    }
}

/// Render the report for a session snapshot. Only a `Complete` session has
/// something to report.
pub fn render_completed<R: ReportRenderer + ?Sized>(
    renderer: &R,
    state: &SessionState,
) -> Result<ReportDocument, ExportError> {
    match (&state.status, &state.prediction) {
        (SessionStatus::Complete, Some(prediction)) => {
            let document = renderer.render(state.transcript.turns(), prediction)?;
            info!(
                session_id = %state.session_id,
                filename = %document.filename,
                bytes = document.bytes.len(),
                "report rendered"
            );
            Ok(document)
        }
        _ => Err(ExportError::NotComplete(state.status)),
    }
}

/// Report date and file name stem shared by the renderers.
#[derive(Debug, Clone, Default)]
pub(crate) struct ReportOptions {
    pub template: Option<String>,
    pub date: Option<jiff::civil::Date>,
}

impl ReportOptions {
    pub fn date(&self) -> jiff::civil::Date {
        self.date.unwrap_or_else(|| jiff::Zoned::now().date())
    }

    pub fn template<'a>(&'a self, default: &'a str) -> &'a str {
        self.template.as_deref().unwrap_or(default)
    }

    pub fn filename(&self, extension: &str) -> String {
        format!("health-assessment-{}.{extension}", self.date())
    }
}

#[derive(Debug, Clone)]
pub struct DocxRenderer {
    styles: DocumentStyles,
    options: ReportOptions,
}

impl DocxRenderer {
    pub fn new(styles: DocumentStyles) -> Self {
        Self {
            styles,
            options: ReportOptions::default(),
        }
    }

    /// Use a caller-supplied Tera template instead of [`MARKDOWN_TEMPLATE`].
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.options.template = Some(template.into());
        self
    }

    /// Fix the report date instead of using today.
    pub fn with_date(mut self, date: jiff::civil::Date) -> Self {
        self.options.date = Some(date);
        self
    }
}

impl Default for DocxRenderer {
    fn default() -> Self {
        Self::new(DocumentStyles::default())
    }
}

impl ReportRenderer for DocxRenderer {
    fn render(
        &self,
        transcript: &[Turn],
        prediction: &PredictionResult,
    ) -> Result<ReportDocument, ExportError> {
        let context = ReportContext::new(transcript, prediction, self.options.date());
        let rendered = render_report(
            "report.md",
            self.options.template(MARKDOWN_TEMPLATE),
            &context,
        )?;
        let bytes = generate_docx(&rendered, &self.styles)?;

        Ok(ReportDocument {
            filename: self.options.filename("docx"),
            mime_type: DOCX_MIME_TYPE.to_string(),
            bytes,
        })
    }
}
