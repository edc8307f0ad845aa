pub mod export;
pub mod markdown;
pub mod terminal;

use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp layout embedded in report file names.
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Timestamp layout shown inside report documents.
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// ExportFormat
// ---------------------------------------------------------------------------

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Markdown,
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

// ---------------------------------------------------------------------------
// ReportKind
// ---------------------------------------------------------------------------

/// What a report describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReportKind {
    /// Metrics of a single architecture.
    Single { label: String },
    /// Side-by-side comparison of two architectures.
    Comparison,
}

impl ReportKind {
    /// File name prefix, e.g. `report_microservices` or `comparison_report`.
    pub fn slug(&self) -> String {
        match self {
            ReportKind::Single { label } => format!("report_{}", slugify(label)),
            ReportKind::Comparison => "comparison_report".to_string(),
        }
    }
}

/// Lowercase `label`, replacing every run of non-alphanumerics with `_`.
fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    for ch in label.trim().chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        "architecture".to_string()
    } else {
        slug.to_string()
    }
}

// ---------------------------------------------------------------------------
// RunSources
// ---------------------------------------------------------------------------

/// Summary files a comparison was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RunSources {
    pub a: PathBuf,
    pub b: PathBuf,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// A rendered report document.
///
/// The report does not know where it will be stored; [`Report::suggested_filename`]
/// only proposes a name for the caller's output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Report {
    pub kind: ReportKind,
    pub format: ExportFormat,
    pub generated_at: NaiveDateTime,
    pub body: String,
}

impl Report {
    /// `{kind}_{YYYYMMDD_HHMMSS}.{ext}`.
    pub fn suggested_filename(&self) -> String {
        format!(
            "{}_{}.{}",
            self.kind.slug(),
            self.generated_at.format(FILE_TIMESTAMP_FORMAT),
            self.format.extension()
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
