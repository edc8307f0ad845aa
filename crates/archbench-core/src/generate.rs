//! One report run over a results directory: locate and load both sides,
//! write every requested format, then print the console summary.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{error, info, warn};

use crate::comparison::compare;
use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::io::{find_latest_summary, load_metrics, write_report};
use crate::metrics::MetricSet;
use crate::report::export::{export_comparison, export_single};
use crate::report::terminal::print_summary;
use crate::report::RunSources;

/// Where to find the inputs of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunRequest {
    /// Holds the `{prefix}_*_summary.json` files; reports are written here.
    pub results_dir: PathBuf,
    /// Explicit summary for side A, instead of the newest by prefix.
    pub summary_a: Option<PathBuf>,
    pub summary_b: Option<PathBuf>,
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// `false` when side B was unusable and only A was reported.
    pub compared: bool,
    /// Report files, in format order.
    pub written: Vec<PathBuf>,
}

/// Run the whole report generation.
///
/// Side A is required: any failure loading it is returned. A failure on
/// side B is logged and the run falls back to a single-architecture report.
pub async fn generate<W: Write>(
    request: &RunRequest,
    config: &ReportConfig,
    generated_at: NaiveDateTime,
    out: &mut W,
) -> Result<RunOutcome, ReportError> {
    let problems = config.validate();
    if !problems.is_empty() {
        for problem in &problems {
            error!("{problem}");
        }
        return Err(ReportError::Config(format!(
            "{} invalid setting(s)",
            problems.len()
        )));
    }

    let dir = request.results_dir.as_path();
    let is_dir = tokio::fs::metadata(dir)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return Err(ReportError::MissingInput(format!(
            "results directory {} does not exist",
            dir.display()
        )));
    }

    let (path_a, a) = load_side(request.summary_a.as_deref(), dir, &config.prefix_a).await?;
    let b = match load_side(request.summary_b.as_deref(), dir, &config.prefix_b).await {
        Ok(side) => Some(side),
        Err(e) => {
            warn!(
                "{e}; writing a single-architecture report for {}",
                config.label_a
            );
            None
        }
    };

    let labels = config.labels();
    let comparison = b.as_ref().map(|(path_b, b)| {
        let sources = RunSources {
            a: path_a.clone(),
            b: path_b.clone(),
        };
        (compare(&a, b), sources)
    });

    let mut written = Vec::new();
    for format in config.formats() {
        let report = match &comparison {
            Some((cmp, sources)) => {
                export_comparison(cmp, &labels, Some(sources), format, generated_at)?
            }
            None => export_single(&a, &labels.a, format, generated_at)?,
        };
        written.push(write_report(dir, &report).await?);
    }

    print_summary(
        out,
        &a,
        b.as_ref().map(|(_, b)| b),
        &labels,
        config.chart_width,
    )?;
    for path in &written {
        writeln!(out, "Report saved to {}", path.display())?;
    }

    Ok(RunOutcome {
        compared: comparison.is_some(),
        written,
    })
}

/// Load one side from `explicit`, or from the newest summary in `dir`
/// matching `prefix`.
async fn load_side(
    explicit: Option<&Path>,
    dir: &Path,
    prefix: &str,
) -> Result<(PathBuf, MetricSet), ReportError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => find_latest_summary(dir, prefix).await?.ok_or_else(|| {
            ReportError::MissingInput(format!(
                "no {prefix}_*_summary.json in {}",
                dir.display()
            ))
        })?,
    };
    info!(path = %path.display(), prefix, "using summary");
    let metrics = load_metrics(&path).await?;
    Ok((path, metrics))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
