use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::comparison::SideLabels;
use crate::error::ReportError;
use crate::report::terminal::CHART_WIDTH;
use crate::report::ExportFormat;

/// Settings for one report generation.
///
/// Every field has a default, so a config file only needs the keys it wants
/// to change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ReportConfig {
    /// Display name of the primary architecture.
    pub label_a: String,
    /// Display name of the architecture it is compared against.
    pub label_b: String,
    /// File prefix of the primary architecture's summaries
    /// (`{prefix}_*_summary.json`).
    pub prefix_a: String,
    pub prefix_b: String,
    /// Width of the terminal latency chart in characters.
    pub chart_width: usize,
    /// Output formats to write.
    pub formats: Vec<ExportFormat>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            label_a: "Microservices".to_string(),
            label_b: "Monolithic".to_string(),
            prefix_a: "microservices".to_string(),
            prefix_b: "monolithic".to_string(),
            chart_width: CHART_WIDTH,
            formats: vec![ExportFormat::Markdown],
        }
    }
}

impl ReportConfig {
    pub fn labels(&self) -> SideLabels {
        SideLabels::new(self.label_a.clone(), self.label_b.clone())
    }

    /// Requested formats, sorted and without duplicates.
    pub fn formats(&self) -> Vec<ExportFormat> {
        let mut formats = self.formats.clone();
        formats.sort_unstable();
        formats.dedup();
        formats
    }

    /// Validate the config and return a list of problems.
    ///
    /// An empty `Vec` means the config is usable.
    pub fn validate(&self) -> Vec<ReportError> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("label_a", &self.label_a),
            ("label_b", &self.label_b),
            ("prefix_a", &self.prefix_a),
            ("prefix_b", &self.prefix_b),
        ] {
            if value.trim().is_empty() {
                errors.push(ReportError::Config(format!("{field} must not be empty")));
            }
        }

        if !self.prefix_a.trim().is_empty() && self.prefix_a == self.prefix_b {
            errors.push(ReportError::Config(format!(
                "prefix_a and prefix_b must differ (both are '{}')",
                self.prefix_a
            )));
        }

        if self.chart_width == 0 {
            errors.push(ReportError::Config(
                "chart_width must be at least 1".to_string(),
            ));
        }

        if self.formats.is_empty() {
            errors.push(ReportError::Config(
                "at least one output format is required".to_string(),
            ));
        }

        errors
    }
}

/// Read a JSON config file. Missing keys take their defaults.
pub async fn load_config(path: impl AsRef<Path>) -> Result<ReportConfig, ReportError> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        ReportError::Config(format!("cannot read config {}: {e}", path.display()))
    })?;
    serde_json::from_str(&content)
        .map_err(|e| ReportError::Config(format!("invalid config {}: {e}", path.display())))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
