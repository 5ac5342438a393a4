use serde::{Deserialize, Serialize};
use symcheck_core::models::severity::Severity;

/// Document styling configuration for exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentStyles {
    /// Font for body text (e.g. "Times New Roman", "Calibri").
    pub body_font: String,

    /// Font for headings (e.g. "Arial", "Calibri").
    pub heading_font: String,

    /// Body text font size in points.
    pub body_size: usize,

    /// Heading 1 font size in points.
    pub heading1_size: usize,

    /// Heading 2 font size in points.
    pub heading2_size: usize,

    /// Heading 3 font size in points.
    pub heading3_size: usize,

    /// Hex colors (no `#`) for the response column.
    pub no_color: String,
    pub mild_color: String,
    pub severe_color: String,
}

impl DocumentStyles {
    pub fn severity_color(&self, severity: Severity) -> &str {
        match severity {
            Severity::No => &self.no_color,
            Severity::Mild => &self.mild_color,
            Severity::Severe => &self.severe_color,
        }
    }
}

impl Default for DocumentStyles {
    fn default() -> Self {
        Self {
            body_font: "Calibri".to_string(),
            heading_font: "Arial".to_string(),
            body_size: 11,
            heading1_size: 16,
            heading2_size: 14,
            heading3_size: 12,
            no_color: "4CAF50".to_string(),
            mild_color: "FF9800".to_string(),
            severe_color: "F44336".to_string(),
        }
    }
}
