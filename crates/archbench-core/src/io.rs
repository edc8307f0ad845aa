//! Filesystem side of report generation: locating and reading k6 summaries,
//! writing finished reports.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ReportError;
use crate::metrics::{extract, parse_summary, MetricSet};
use crate::report::Report;

/// Find the newest `{prefix}_*_summary.json` in `dir`.
///
/// Summary names embed a `YYYYMMDD_HHMMSS` timestamp, so the lexicographically
/// greatest name is the most recent run. Returns `None` when nothing matches.
pub async fn find_latest_summary(
    dir: impl AsRef<Path>,
    prefix: &str,
) -> Result<Option<PathBuf>, ReportError> {
    let dir = dir.as_ref();
    let pattern = Regex::new(&format!(r"^{}_.*_summary\.json$", regex::escape(prefix)))
        .map_err(|e| ReportError::Internal(format!("bad summary pattern: {e}")))?;

    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| {
        ReportError::MissingInput(format!("cannot read directory {}: {e}", dir.display()))
    })?;

    let mut latest: Option<String> = None;
    while let Some(entry) = entries.next_entry().await.map_err(|e| {
        ReportError::MissingInput(format!("cannot list directory {}: {e}", dir.display()))
    })? {
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if !pattern.is_match(&name) {
            continue;
        }
        if latest.as_deref().map_or(true, |current| name.as_str() > current) {
            latest = Some(name);
        }
    }

    debug!(dir = %dir.display(), prefix, found = ?latest, "summary lookup");
    Ok(latest.map(|name| dir.join(name)))
}

/// Read and parse a summary file.
///
/// A file that cannot be read is [`ReportError::MissingInput`]; one that is
/// not JSON is [`ReportError::MalformedInput`].
pub async fn read_summary(path: impl AsRef<Path>) -> Result<Value, ReportError> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => {
            ReportError::MissingInput(format!("summary not found: {}", path.display()))
        }
        ErrorKind::InvalidData => {
            ReportError::MalformedInput(format!("{} is not UTF-8 text", path.display()))
        }
        _ => ReportError::MissingInput(format!("cannot read {}: {e}", path.display())),
    })?;
    parse_summary(&content).map_err(|e| match e {
        ReportError::MalformedInput(msg) => {
            ReportError::MalformedInput(format!("{}: {msg}", path.display()))
        }
        other => other,
    })
}

/// Read a summary file and extract its metric set.
pub async fn load_metrics(path: impl AsRef<Path>) -> Result<MetricSet, ReportError> {
    let path = path.as_ref();
    let raw = read_summary(path).await?;
    let metrics = extract(&raw).map_err(|e| match e {
        ReportError::MalformedInput(msg) => {
            ReportError::MalformedInput(format!("{}: {msg}", path.display()))
        }
        other => other,
    })?;
    info!(path = %path.display(), "loaded summary");
    Ok(metrics)
}

/// Write `report` into `dir` under its suggested file name.
///
/// Returns the path written.
pub async fn write_report(dir: impl AsRef<Path>, report: &Report) -> Result<PathBuf, ReportError> {
    let path = dir.as_ref().join(report.suggested_filename());
    tokio::fs::write(&path, report.body.as_bytes()).await?;
    info!(path = %path.display(), bytes = report.body.len(), "report written");
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
