use symcheck_core::models::session::SessionStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("report can only be exported from a complete session (status: {0})")]
    NotComplete(SessionStatus),

    #[error("template rendering failed: {0}")]
    TemplateRender(String),

    #[error("template parse error: {0}")]
    TemplateParse(String),

    #[error("DOCX generation failed: {0}")]
    Docx(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<tera::Error> for ExportError {
    fn from(e: tera::Error) -> Self {
        ExportError::TemplateRender(e.to_string())
    }
}
