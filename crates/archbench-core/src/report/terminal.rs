//! Condensed console summary.
//!
//! Output goes to any [`Write`] so the CLI can pass stdout and tests can pass
//! a buffer. The winner printed here is the latency-only one
//! ([`ComparisonResult::latency_winner`]), not the composite-score winner of
//! the markdown report.

use std::io::{self, Write};

use crate::comparison::{compare, ComparisonResult, SideLabels};
use crate::metrics::MetricSet;
use crate::stats::format_count;

/// Default bar chart width in characters.
pub const CHART_WIDTH: usize = 50;

const RULE_WIDTH: usize = 70;
const LABEL_WIDTH: usize = 20;

/// Length of the bar for `value` in a chart scaled so that `max` spans `width`.
///
/// All bars are empty when `max` is not positive.
pub fn bar_length(value: f64, max: f64, width: usize) -> usize {
    if !(max.is_finite() && max > 0.0) {
        return 0;
    }
    let len = (value / max * width as f64).round();
    if len.is_finite() && len > 0.0 {
        (len as usize).min(width)
    } else {
        0
    }
}

/// Render a horizontal bar chart, one line per `(label, value)` pair.
pub fn render_bar_chart(title: &str, data: &[(&str, f64)], width: usize) -> String {
    if data.is_empty() {
        return "No data to display\n".to_string();
    }
    let max = data.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);

    let mut out = String::new();
    out.push_str(&format!("\n{title}\n{}\n", "═".repeat(width + LABEL_WIDTH)));
    for (label, value) in data {
        let bar = "█".repeat(bar_length(*value, max, width));
        out.push_str(&format!(
            "{label:<width$} {bar} {value:.2}\n",
            width = LABEL_WIDTH
        ));
    }
    out
}

/// Print the console summary for `a`, compared against `b` when present.
pub fn print_summary<W: Write>(
    out: &mut W,
    a: &MetricSet,
    b: Option<&MetricSet>,
    labels: &SideLabels,
    chart_width: usize,
) -> io::Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "\n{rule}")?;
    writeln!(out, "METRICS SUMMARY")?;
    writeln!(out, "{rule}\n")?;

    match b {
        Some(b) => print_comparison(out, &compare(a, b), labels)?,
        None => print_single(out, a, &labels.a, chart_width)?,
    }

    writeln!(out, "\n{rule}")?;
    out.flush()
}

fn print_comparison<W: Write>(
    out: &mut W,
    cmp: &ComparisonResult,
    labels: &SideLabels,
) -> io::Result<()> {
    let name_a = format!("{}:", labels.a);
    let name_b = format!("{}:", labels.b);
    let width = name_a.len().max(name_b.len()).max("Difference:".len()) + 1;

    writeln!(out, "THROUGHPUT")?;
    writeln!(out, "  {name_a:<width$}{:>10.2} req/s", cmp.run_a.requests.rate)?;
    writeln!(out, "  {name_b:<width$}{:>10.2} req/s", cmp.run_b.requests.rate)?;
    writeln!(out, "  {:<width$}{:>+10.2}%", "Difference:", cmp.throughput_diff_pct())?;

    writeln!(out, "\nAVERAGE LATENCY")?;
    writeln!(out, "  {name_a:<width$}{:>10.2} ms", cmp.run_a.duration.avg)?;
    writeln!(out, "  {name_b:<width$}{:>10.2} ms", cmp.run_b.duration.avg)?;
    writeln!(out, "  {:<width$}{:>+10.2}%", "Difference:", cmp.latency_diff_pct())?;

    writeln!(out, "\nSUCCESS RATE")?;
    writeln!(out, "  {name_a:<width$}{:>10.2}%", cmp.run_a.success_rate())?;
    writeln!(out, "  {name_b:<width$}{:>10.2}%", cmp.run_b.success_rate())?;

    writeln!(out, "\nWINNER")?;
    writeln!(
        out,
        "  {} had the lower average latency!",
        labels.name(cmp.latency_winner())
    )
}

fn print_single<W: Write>(
    out: &mut W,
    m: &MetricSet,
    label: &str,
    chart_width: usize,
) -> io::Result<()> {
    writeln!(out, "{}", label.to_uppercase())?;
    writeln!(out, "  Total requests: {}", format_count(m.requests.count))?;
    writeln!(out, "  Rate: {:.2} req/s", m.requests.rate)?;

    writeln!(out, "\nLATENCY")?;
    writeln!(out, "  Average: {:.2} ms", m.duration.avg)?;
    writeln!(out, "  P95:     {:.2} ms", m.duration.p95)?;
    writeln!(out, "  P99:     {:.2} ms", m.duration.p99)?;

    writeln!(out, "\nRELIABILITY")?;
    writeln!(out, "  Error rate:   {:.2}%", m.failure_rate)?;
    writeln!(out, "  Success rate: {:.2}%", m.success_rate())?;

    let latencies = [
        ("Average", m.duration.avg),
        ("P90", m.duration.p90),
        ("P95", m.duration.p95),
        ("P99", m.duration.p99),
    ];
    write!(
        out,
        "{}",
        render_bar_chart("Latencies (ms)", &latencies, chart_width)
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
