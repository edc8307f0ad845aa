use chrono::NaiveDateTime;
use serde::Serialize;

use super::markdown::{assemble_comparison, assemble_single};
use super::{ExportFormat, Report, ReportKind, RunSources};
use crate::comparison::{ComparisonResult, MetricId, Side, SideLabels};
use crate::error::ReportError;
use crate::metrics::MetricSet;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Render a single-architecture report in `format`.
pub fn export_single(
    metrics: &MetricSet,
    label: &str,
    format: ExportFormat,
    generated_at: NaiveDateTime,
) -> Result<Report, ReportError> {
    let body = match format {
        ExportFormat::Markdown => return Ok(assemble_single(metrics, label, generated_at)),
        ExportFormat::Json => metrics_json(metrics, label, generated_at)?,
        ExportFormat::Csv => metrics_csv(metrics)?,
    };
    Ok(Report {
        kind: ReportKind::Single {
            label: label.to_string(),
        },
        format,
        generated_at,
        body,
    })
}

/// Render a comparative report in `format`. CSV output does not carry
/// `sources`.
pub fn export_comparison(
    cmp: &ComparisonResult,
    labels: &SideLabels,
    sources: Option<&RunSources>,
    format: ExportFormat,
    generated_at: NaiveDateTime,
) -> Result<Report, ReportError> {
    let body = match format {
        ExportFormat::Markdown => {
            return Ok(assemble_comparison(cmp, labels, sources, generated_at))
        }
        ExportFormat::Json => comparison_json(cmp, labels, sources, generated_at)?,
        ExportFormat::Csv => comparison_csv(cmp, labels)?,
    };
    Ok(Report {
        kind: ReportKind::Comparison,
        format,
        generated_at,
        body,
    })
}

// ---------------------------------------------------------------------------
// JSON export
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SingleDocument<'a> {
    label: &'a str,
    generated_at: NaiveDateTime,
    metrics: &'a MetricSet,
}

#[derive(Serialize)]
struct ComparisonDocument<'a> {
    labels: &'a SideLabels,
    #[serde(skip_serializing_if = "Option::is_none")]
    sources: Option<&'a RunSources>,
    generated_at: NaiveDateTime,
    overall_winner: Side,
    latency_winner: Side,
    comparison: &'a ComparisonResult,
}

fn metrics_json(
    metrics: &MetricSet,
    label: &str,
    generated_at: NaiveDateTime,
) -> Result<String, ReportError> {
    let doc = SingleDocument {
        label,
        generated_at,
        metrics,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

fn comparison_json(
    cmp: &ComparisonResult,
    labels: &SideLabels,
    sources: Option<&RunSources>,
    generated_at: NaiveDateTime,
) -> Result<String, ReportError> {
    let doc = ComparisonDocument {
        labels,
        sources,
        generated_at,
        overall_winner: cmp.overall_winner(),
        latency_winner: cmp.latency_winner(),
        comparison: cmp,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// One row per registered metric: `metric,unit,value`.
fn metrics_csv(metrics: &MetricSet) -> Result<String, ReportError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["metric", "unit", "value"])?;
    for metric in MetricId::ALL {
        let value = format!("{:.2}", metric.value(metrics));
        wtr.write_record([metric.label(), metric.unit().symbol(), value.as_str()])?;
    }
    finish_csv(wtr)
}

/// One row per registered metric: `metric,unit,<a>,<b>,diff_pct,winner`.
fn comparison_csv(cmp: &ComparisonResult, labels: &SideLabels) -> Result<String, ReportError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        "metric",
        "unit",
        labels.a.as_str(),
        labels.b.as_str(),
        "diff_pct",
        "winner",
    ])?;
    for row in &cmp.rows {
        let a = format!("{:.2}", row.a);
        let b = format!("{:.2}", row.b);
        let diff = format!("{:.2}", row.diff_pct);
        wtr.write_record([
            row.metric.label(),
            row.metric.unit().symbol(),
            a.as_str(),
            b.as_str(),
            diff.as_str(),
            labels.name(row.winner),
        ])?;
    }
    finish_csv(wtr)
}

fn finish_csv(wtr: csv::Writer<Vec<u8>>) -> Result<String, ReportError> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| ReportError::Internal(format!("CSV flush failed: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| ReportError::Internal(format!("CSV output is not UTF-8: {e}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::comparison::compare;

    fn fixed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 2)
            .and_then(|d| d.and_hms_opt(3, 4, 5))
            .expect("valid timestamp")
    }

    fn make_set(avg: f64, rate: f64) -> MetricSet {
        let mut set = MetricSet::default();
        set.duration.avg = avg;
        set.requests.rate = rate;
        set
    }

    fn labels() -> SideLabels {
        SideLabels::new("Micro, services", "Mono")
    }

    // -----------------------------------------------------------------------
    // JSON
    // -----------------------------------------------------------------------

    #[test]
    fn comparison_json_carries_both_winners() {
        let cmp = compare(&make_set(50.0, 10.0), &make_set(60.0, 100.0));
        let report = export_comparison(&cmp, &labels(), None, ExportFormat::Json, fixed_time())
            .expect("export should succeed");
        let parsed: serde_json::Value =
            serde_json::from_str(&report.body).expect("output should be valid JSON");
        assert_eq!(parsed["overall_winner"], "b");
        assert_eq!(parsed["latency_winner"], "a");
        assert_eq!(parsed["comparison"]["rows"].as_array().map(Vec::len), Some(17));
        assert_eq!(
            report.suggested_filename(),
            "comparison_report_20250102_030405.json"
        );
    }

    #[test]
    fn comparison_json_includes_sources_when_given() {
        let cmp = compare(&make_set(100.0, 50.0), &make_set(200.0, 30.0));
        let without = export_comparison(&cmp, &labels(), None, ExportFormat::Json, fixed_time())
            .expect("export should succeed");
        let parsed: serde_json::Value =
            serde_json::from_str(&without.body).expect("output should be valid JSON");
        assert!(parsed.get("sources").is_none());

        let sources = RunSources {
            a: "a_summary.json".into(),
            b: "b_summary.json".into(),
        };
        let with =
            export_comparison(&cmp, &labels(), Some(&sources), ExportFormat::Json, fixed_time())
                .expect("export should succeed");
        let parsed: serde_json::Value =
            serde_json::from_str(&with.body).expect("output should be valid JSON");
        assert_eq!(parsed["sources"]["a"], "a_summary.json");
        assert_eq!(parsed["sources"]["b"], "b_summary.json");
    }

    #[test]
    fn single_json_round_trips_metric_set() {
        let set = make_set(120.5, 16.67);
        let report = export_single(&set, "Microservices", ExportFormat::Json, fixed_time())
            .expect("export should succeed");
        let parsed: serde_json::Value =
            serde_json::from_str(&report.body).expect("output should be valid JSON");
        assert_eq!(parsed["label"], "Microservices");
        let metrics: MetricSet =
            serde_json::from_value(parsed["metrics"].clone()).expect("metrics should decode");
        assert_eq!(metrics, set);
    }

    // -----------------------------------------------------------------------
    // CSV
    // -----------------------------------------------------------------------

    #[test]
    fn comparison_csv_has_header_and_one_row_per_metric() {
        let cmp = compare(&make_set(100.0, 50.0), &make_set(200.0, 30.0));
        let report = export_comparison(&cmp, &labels(), None, ExportFormat::Csv, fixed_time())
            .expect("export should succeed");
        let lines: Vec<&str> = report.body.lines().collect();
        // Labels containing commas are quoted by the writer.
        assert_eq!(lines[0], "metric,unit,\"Micro, services\",Mono,diff_pct,winner");
        assert_eq!(lines.len(), 1 + MetricId::ALL.len());
        assert!(lines.contains(&"Average,ms,100.00,200.00,-50.00,\"Micro, services\""));
    }

    #[test]
    fn single_csv_lists_every_metric() {
        let mut set = make_set(120.5, 16.67);
        set.failure_rate = 2.0;
        let report = export_single(&set, "Microservices", ExportFormat::Csv, fixed_time())
            .expect("export should succeed");
        assert!(report.body.starts_with("metric,unit,value\n"));
        assert!(report.body.contains("Average,ms,120.50\n"));
        assert!(report.body.contains("Error rate,%,2.00\n"));
        assert_eq!(report.body.lines().count(), 1 + MetricId::ALL.len());
    }

    #[test]
    fn markdown_dispatch_matches_assembler() {
        let cmp = compare(&make_set(100.0, 50.0), &make_set(200.0, 30.0));
        let via_export = export_comparison(&cmp, &labels(), None, ExportFormat::Markdown, fixed_time())
            .expect("export should succeed");
        let direct = assemble_comparison(&cmp, &labels(), None, fixed_time());
        assert_eq!(via_export, direct);
    }
}
