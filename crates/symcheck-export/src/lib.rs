//! symcheck-export
//!
//! Turns a finished assessment into a shareable report (DOCX or plain text).

pub mod docx;
pub mod error;
pub mod render;
pub mod renderer;
pub mod styles;
pub mod text;

pub use error::ExportError;
pub use renderer::{DocxRenderer, ReportDocument, ReportRenderer, render_completed};
pub use text::TextRenderer;
