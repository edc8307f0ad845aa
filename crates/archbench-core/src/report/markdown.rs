//! Markdown report assembly.
//!
//! Both assemblers are pure: for the same inputs and `generated_at` they
//! return byte-identical text. Row order comes from the [`MetricId`] and
//! [`CustomOperation`] registries, never from map iteration over hashed keys.

use chrono::NaiveDateTime;

use super::{ExportFormat, Report, ReportKind, RunSources, DISPLAY_TIMESTAMP_FORMAT};
use crate::comparison::{ComparisonResult, MetricId, Section, Side, SideLabels};
use crate::metrics::MetricSet;
use crate::stats::{format_bytes, format_count};

const RULE: &str = "\n---\n\n";
const FOOTER: &str = "*Generated by archbench from k6 summary exports.*\n";

// ---------------------------------------------------------------------------
// Single-architecture report
// ---------------------------------------------------------------------------

/// Assemble the report for one architecture.
pub fn assemble_single(metrics: &MetricSet, label: &str, generated_at: NaiveDateTime) -> Report {
    let m = metrics;
    let mut out = String::new();

    out.push_str(&format!("# Performance Report - {label}\n\n"));
    out.push_str(&format!(
        "**Generated:** {}\n",
        generated_at.format(DISPLAY_TIMESTAMP_FORMAT)
    ));
    out.push_str(RULE);

    out.push_str("## Executive Summary\n\n");
    out.push_str(&format!(
        "This report presents the load-test metrics of the **{label}** architecture.\n"
    ));
    out.push_str(RULE);

    // Requests, iterations and virtual users.
    out.push_str("## General Metrics\n\n");
    out.push_str(&format!(
        "- **Total requests:** {}\n",
        format_count(m.requests.count)
    ));
    out.push_str(&format!("- **Request rate:** {:.2} req/s\n", m.requests.rate));
    out.push_str(&format!(
        "- **VU iterations:** {}\n",
        format_count(m.iterations.count)
    ));
    out.push_str(&format!(
        "- **Iteration rate:** {:.2} iter/s\n",
        m.iterations.rate
    ));
    out.push_str(&format!("- **Max VUs:** {}\n", m.virtual_users.max));
    out.push_str(RULE);

    out.push_str("## Request Latency\n\n");
    out.push_str("| Metric | Value (ms) |\n");
    out.push_str("|--------|------------|\n");
    for metric in MetricId::ALL
        .into_iter()
        .filter(|id| id.section() == Section::Latency)
    {
        out.push_str(&format!(
            "| **{}** | {:.2} |\n",
            metric.label(),
            metric.value(m)
        ));
    }
    out.push_str(RULE);

    out.push_str("## Reliability\n\n");
    out.push_str(&format!("- **Success rate:** {:.2}%\n", m.success_rate()));
    out.push_str(&format!("- **Error rate:** {:.2}%\n", m.failure_rate));
    out.push_str(RULE);

    out.push_str("## Data Transfer\n\n");
    out.push_str(&format!(
        "- **Data received:** {} ({}/s)\n",
        format_bytes(m.data_transfer.received.bytes as f64),
        format_bytes(m.data_transfer.received.rate)
    ));
    out.push_str(&format!(
        "- **Data sent:** {} ({}/s)\n",
        format_bytes(m.data_transfer.sent.bytes as f64),
        format_bytes(m.data_transfer.sent.rate)
    ));

    if m.has_custom_operations() {
        out.push_str(RULE);
        out.push_str("## Duration by Operation\n\n");
        out.push_str("| Operation | Avg (ms) | P95 (ms) | P99 (ms) |\n");
        out.push_str("|-----------|----------|----------|----------|\n");
        for (op, t) in &m.custom_operations {
            out.push_str(&format!(
                "| {} | {:.2} | {:.2} | {:.2} |\n",
                op.label(),
                t.avg,
                t.p95,
                t.p99
            ));
        }
    }
    out.push_str(RULE);

    out.push_str("## Latency Components\n\n");
    out.push_str("| Component | Avg (ms) |\n");
    out.push_str("|-----------|----------|\n");
    out.push_str(&format!("| **Blocked** | {:.2} |\n", m.blocked_duration));
    out.push_str(&format!("| **Connecting** | {:.2} |\n", m.connecting_duration));
    out.push_str(&format!("| **Waiting** | {:.2} |\n", m.wait_duration));
    out.push_str(RULE);

    out.push_str("## Observations\n\n");
    out.push_str("### Strengths\n\n");
    out.push_str(&format!(
        "- A success rate of {:.2}% indicates how reliably requests were served\n",
        m.success_rate()
    ));
    out.push_str(&format!(
        "- A throughput of {:.2} req/s shows the sustained capacity under load\n",
        m.requests.rate
    ));
    out.push_str("\n### Points of Attention\n\n");
    out.push_str(&format!(
        "- P99 at {:.2} ms may indicate occasional outliers\n",
        m.duration.p99
    ));
    out.push_str(&format!(
        "- Maximum latency of {:.2} ms deserves investigation\n",
        m.duration.max
    ));
    out.push_str(RULE);
    out.push_str(FOOTER);

    Report {
        kind: ReportKind::Single {
            label: label.to_string(),
        },
        format: ExportFormat::Markdown,
        generated_at,
        body: out,
    }
}

// ---------------------------------------------------------------------------
// Comparative report
// ---------------------------------------------------------------------------

/// Assemble the comparative report of run A against baseline B.
///
/// With `sources`, the report ends with the summary files it was built from.
pub fn assemble_comparison(
    cmp: &ComparisonResult,
    labels: &SideLabels,
    sources: Option<&RunSources>,
    generated_at: NaiveDateTime,
) -> Report {
    let (a, b) = (labels.a.as_str(), labels.b.as_str());
    let winner = labels.name(cmp.overall_winner());
    let mut out = String::new();

    out.push_str(&format!("# Comparison Report - {a} vs {b}\n\n"));
    out.push_str(&format!(
        "**Generated:** {}\n",
        generated_at.format(DISPLAY_TIMESTAMP_FORMAT)
    ));
    out.push_str(RULE);

    out.push_str("## Executive Summary\n\n");
    out.push_str(&format!(
        "This report compares the **{a}** and **{b}** architectures under the same k6 load test.\n\n"
    ));
    out.push_str("### Overall Result\n\n");
    out.push_str(&format!(
        "**Overall winner (composite score):** **{winner}**\n\n"
    ));
    out.push_str("| Architecture | Composite score |\n");
    out.push_str("|--------------|-----------------|\n");
    out.push_str(&format!("| **{a}** | {:.2} |\n", cmp.score_a));
    out.push_str(&format!("| **{b}** | {:.2} |\n", cmp.score_b));
    out.push_str(
        "\nComposite score = (1000 / average latency in ms) x request rate; higher is better.\n",
    );

    for section in Section::ALL {
        out.push_str(RULE);
        out.push_str(&format!("## {}\n\n", section.title()));
        out.push_str(&format!("| Metric | {a} | {b} | Difference | Winner |\n"));
        out.push_str("|--------|");
        out.push_str(&"-".repeat(a.len().max(3) + 2));
        out.push('|');
        out.push_str(&"-".repeat(b.len().max(3) + 2));
        out.push_str("|------------|--------|\n");
        for row in cmp.section_rows(section) {
            let unit = row.metric.unit();
            out.push_str(&format!(
                "| {} | {} | {} | {:+.2}% | {} |\n",
                row.metric.label(),
                unit.format(row.a),
                unit.format(row.b),
                row.diff_pct,
                labels.name(row.winner)
            ));
        }
        if section == Section::Scalability {
            out.push_str(&format!(
                "| Max VUs | {} | {} | - | - |\n",
                cmp.run_a.virtual_users.max, cmp.run_b.virtual_users.max
            ));
        }
    }
    out.push_str(RULE);

    out.push_str("## Analysis\n\n");
    out.push_str("### Performance\n\n");
    out.push_str(&latency_narrative(cmp, labels));
    out.push_str(&throughput_narrative(cmp, labels));
    out.push_str(RULE);

    out.push_str("## Recommendation\n\n");
    out.push_str(&format!(
        "Based on the composite score, **{winner}** delivered the better overall performance \
         for this workload ({:.2} vs {:.2}).\n\n",
        score_of(cmp, cmp.overall_winner()),
        score_of(cmp, other(cmp.overall_winner()))
    ));
    if cmp.latency_winner() != cmp.overall_winner() {
        out.push_str(&format!(
            "Note that **{}** still had the lower average latency; the composite score \
             favours **{winner}** because of its throughput.\n\n",
            labels.name(cmp.latency_winner())
        ));
    }
    out.push_str(
        "Performance is one input among several: operational complexity, team structure and \
         deployment needs should weigh into the final architecture choice.\n",
    );
    if let Some(sources) = sources {
        out.push_str(RULE);
        out.push_str("## Input Files\n\n");
        out.push_str(&format!("- **{a}:** `{}`\n", sources.a.display()));
        out.push_str(&format!("- **{b}:** `{}`\n", sources.b.display()));
    }
    out.push_str(RULE);
    out.push_str(FOOTER);

    Report {
        kind: ReportKind::Comparison,
        format: ExportFormat::Markdown,
        generated_at,
        body: out,
    }
}

fn other(side: Side) -> Side {
    match side {
        Side::A => Side::B,
        Side::B => Side::A,
    }
}

fn score_of(cmp: &ComparisonResult, side: Side) -> f64 {
    match side {
        Side::A => cmp.score_a,
        Side::B => cmp.score_b,
    }
}

/// `**N% lower**` or `**N% higher**` for A against B. The figure is left out
/// when B is zero, since no percentage exists against a zero baseline.
fn relative_to_b(a: f64, b: f64, diff_pct: f64) -> String {
    let direction = if a < b { "lower" } else { "higher" };
    if b == 0.0 {
        format!("**{direction}**")
    } else {
        format!("**{:.1}% {direction}**", diff_pct.abs())
    }
}

/// Average latency of A stated against B, using the same difference as the
/// latency table.
fn latency_narrative(cmp: &ComparisonResult, labels: &SideLabels) -> String {
    let (a_ms, b_ms) = (cmp.run_a.duration.avg, cmp.run_b.duration.avg);
    if a_ms == b_ms {
        return format!(
            "- **{}** and **{}** had the same average latency ({a_ms:.2} ms).\n",
            labels.a, labels.b
        );
    }
    format!(
        "- **{}** had {} average latency than **{}** ({a_ms:.2} ms vs {b_ms:.2} ms).\n",
        labels.a,
        relative_to_b(a_ms, b_ms, cmp.latency_diff_pct()),
        labels.b
    )
}

/// Request rate of A stated against B, using the same difference as the
/// throughput table.
fn throughput_narrative(cmp: &ComparisonResult, labels: &SideLabels) -> String {
    let (a_rate, b_rate) = (cmp.run_a.requests.rate, cmp.run_b.requests.rate);
    if a_rate == b_rate {
        return format!(
            "- **{}** and **{}** had the same throughput ({a_rate:.2} req/s).\n",
            labels.a, labels.b
        );
    }
    format!(
        "- **{}** had {} throughput than **{}** ({a_rate:.2} req/s vs {b_rate:.2} req/s).\n",
        labels.a,
        relative_to_b(a_rate, b_rate, cmp.throughput_diff_pct()),
        labels.b
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
