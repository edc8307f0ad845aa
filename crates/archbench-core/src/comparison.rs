//! Side-by-side comparison of two [`MetricSet`]s.
//!
//! [`MetricId`] is the single registry of comparable metrics: it knows each
//! metric's label, unit, report section and [`Polarity`]. The markdown
//! tables, the narrative, the CSV export and the terminal summary all read
//! from it.

use serde::{Deserialize, Serialize};

use crate::metrics::MetricSet;
use crate::stats::{composite_score, format_bytes, format_count, percentage_diff};

// ---------------------------------------------------------------------------
// Side / labels
// ---------------------------------------------------------------------------

/// One of the two compared runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

/// Display names for the two compared architectures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SideLabels {
    pub a: String,
    pub b: String,
}

impl SideLabels {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }

    pub fn name(&self, side: Side) -> &str {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }
}

// ---------------------------------------------------------------------------
// Polarity
// ---------------------------------------------------------------------------

/// Whether a smaller or a larger value is the better outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    LowerIsBetter,
    HigherIsBetter,
}

impl Polarity {
    /// Side holding the better value. Ties go to [`Side::B`].
    pub fn winner(self, a: f64, b: f64) -> Side {
        let a_wins = match self {
            Polarity::LowerIsBetter => a < b,
            Polarity::HigherIsBetter => a > b,
        };
        if a_wins {
            Side::A
        } else {
            Side::B
        }
    }
}

// ---------------------------------------------------------------------------
// Unit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Count,
    RequestsPerSecond,
    IterationsPerSecond,
    Milliseconds,
    Percent,
    Bytes,
    BytesPerSecond,
}

impl Unit {
    /// Short unit symbol for tabular exports.
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Count => "count",
            Unit::RequestsPerSecond => "req/s",
            Unit::IterationsPerSecond => "iter/s",
            Unit::Milliseconds => "ms",
            Unit::Percent => "%",
            Unit::Bytes => "B",
            Unit::BytesPerSecond => "B/s",
        }
    }

    /// Human-readable rendering of `value` in this unit.
    pub fn format(self, value: f64) -> String {
        match self {
            Unit::Count => format_count(if value > 0.0 { value.round() as u64 } else { 0 }),
            Unit::RequestsPerSecond => format!("{value:.2} req/s"),
            Unit::IterationsPerSecond => format!("{value:.2} iter/s"),
            Unit::Milliseconds => format!("{value:.2} ms"),
            Unit::Percent => format!("{value:.2}%"),
            Unit::Bytes => format_bytes(value),
            Unit::BytesPerSecond => format!("{}/s", format_bytes(value)),
        }
    }
}

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

/// Report section a comparable metric belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Throughput,
    Latency,
    Reliability,
    Scalability,
    DataTransfer,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Throughput,
        Section::Latency,
        Section::Reliability,
        Section::Scalability,
        Section::DataTransfer,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Throughput => "Throughput",
            Section::Latency => "Latency",
            Section::Reliability => "Reliability",
            Section::Scalability => "Scalability",
            Section::DataTransfer => "Data Transfer",
        }
    }
}

// ---------------------------------------------------------------------------
// MetricId
// ---------------------------------------------------------------------------

/// Every metric that is compared between the two runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricId {
    RequestRate,
    RequestCount,
    DurationAvg,
    DurationMed,
    DurationP90,
    DurationP95,
    DurationP99,
    DurationMin,
    DurationMax,
    SuccessRate,
    FailureRate,
    IterationCount,
    IterationRate,
    DataReceived,
    DataReceivedRate,
    DataSent,
    DataSentRate,
}

impl MetricId {
    /// Registry order; report tables list rows in this order.
    pub const ALL: [MetricId; 17] = [
        MetricId::RequestRate,
        MetricId::RequestCount,
        MetricId::DurationAvg,
        MetricId::DurationMed,
        MetricId::DurationP90,
        MetricId::DurationP95,
        MetricId::DurationP99,
        MetricId::DurationMin,
        MetricId::DurationMax,
        MetricId::SuccessRate,
        MetricId::FailureRate,
        MetricId::IterationCount,
        MetricId::IterationRate,
        MetricId::DataReceived,
        MetricId::DataReceivedRate,
        MetricId::DataSent,
        MetricId::DataSentRate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MetricId::RequestRate => "Request rate",
            MetricId::RequestCount => "Total requests",
            MetricId::DurationAvg => "Average",
            MetricId::DurationMed => "Median (P50)",
            MetricId::DurationP90 => "P90",
            MetricId::DurationP95 => "P95",
            MetricId::DurationP99 => "P99",
            MetricId::DurationMin => "Minimum",
            MetricId::DurationMax => "Maximum",
            MetricId::SuccessRate => "Success rate",
            MetricId::FailureRate => "Error rate",
            MetricId::IterationCount => "Completed iterations",
            MetricId::IterationRate => "Iteration rate",
            MetricId::DataReceived => "Data received",
            MetricId::DataReceivedRate => "Download rate",
            MetricId::DataSent => "Data sent",
            MetricId::DataSentRate => "Upload rate",
        }
    }

    pub fn polarity(self) -> Polarity {
        match self {
            MetricId::RequestRate
            | MetricId::RequestCount
            | MetricId::SuccessRate
            | MetricId::IterationCount
            | MetricId::IterationRate => Polarity::HigherIsBetter,
            MetricId::DurationAvg
            | MetricId::DurationMed
            | MetricId::DurationP90
            | MetricId::DurationP95
            | MetricId::DurationP99
            | MetricId::DurationMin
            | MetricId::DurationMax
            | MetricId::FailureRate
            | MetricId::DataReceived
            | MetricId::DataReceivedRate
            | MetricId::DataSent
            | MetricId::DataSentRate => Polarity::LowerIsBetter,
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            MetricId::RequestRate => Unit::RequestsPerSecond,
            MetricId::RequestCount | MetricId::IterationCount => Unit::Count,
            MetricId::DurationAvg
            | MetricId::DurationMed
            | MetricId::DurationP90
            | MetricId::DurationP95
            | MetricId::DurationP99
            | MetricId::DurationMin
            | MetricId::DurationMax => Unit::Milliseconds,
            MetricId::SuccessRate | MetricId::FailureRate => Unit::Percent,
            MetricId::IterationRate => Unit::IterationsPerSecond,
            MetricId::DataReceived | MetricId::DataSent => Unit::Bytes,
            MetricId::DataReceivedRate | MetricId::DataSentRate => Unit::BytesPerSecond,
        }
    }

    pub fn section(self) -> Section {
        match self {
            MetricId::RequestRate | MetricId::RequestCount => Section::Throughput,
            MetricId::DurationAvg
            | MetricId::DurationMed
            | MetricId::DurationP90
            | MetricId::DurationP95
            | MetricId::DurationP99
            | MetricId::DurationMin
            | MetricId::DurationMax => Section::Latency,
            MetricId::SuccessRate | MetricId::FailureRate => Section::Reliability,
            MetricId::IterationCount | MetricId::IterationRate => Section::Scalability,
            MetricId::DataReceived
            | MetricId::DataReceivedRate
            | MetricId::DataSent
            | MetricId::DataSentRate => Section::DataTransfer,
        }
    }

    /// Read this metric from a set.
    pub fn value(self, set: &MetricSet) -> f64 {
        match self {
            MetricId::RequestRate => set.requests.rate,
            MetricId::RequestCount => set.requests.count as f64,
            MetricId::DurationAvg => set.duration.avg,
            MetricId::DurationMed => set.duration.med,
            MetricId::DurationP90 => set.duration.p90,
            MetricId::DurationP95 => set.duration.p95,
            MetricId::DurationP99 => set.duration.p99,
            MetricId::DurationMin => set.duration.min,
            MetricId::DurationMax => set.duration.max,
            MetricId::SuccessRate => set.success_rate(),
            MetricId::FailureRate => set.failure_rate,
            MetricId::IterationCount => set.iterations.count as f64,
            MetricId::IterationRate => set.iterations.rate,
            MetricId::DataReceived => set.data_transfer.received.bytes as f64,
            MetricId::DataReceivedRate => set.data_transfer.received.rate,
            MetricId::DataSent => set.data_transfer.sent.bytes as f64,
            MetricId::DataSentRate => set.data_transfer.sent.rate,
        }
    }
}

// ---------------------------------------------------------------------------
// ComparisonResult
// ---------------------------------------------------------------------------

/// One compared metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MetricComparison {
    pub metric: MetricId,
    pub a: f64,
    pub b: f64,
    /// `(a - b) / b * 100`, `0` when `b` is zero.
    pub diff_pct: f64,
    pub winner: Side,
}

/// Full comparison of two runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ComparisonResult {
    pub run_a: MetricSet,
    pub run_b: MetricSet,
    /// One entry per [`MetricId::ALL`], in registry order.
    pub rows: Vec<MetricComparison>,
    pub score_a: f64,
    pub score_b: f64,
}

impl ComparisonResult {
    pub fn row(&self, metric: MetricId) -> Option<&MetricComparison> {
        self.rows.iter().find(|r| r.metric == metric)
    }

    pub fn section_rows(&self, section: Section) -> impl Iterator<Item = &MetricComparison> {
        self.rows.iter().filter(move |r| r.metric.section() == section)
    }

    /// Winner by composite score; ties go to [`Side::B`].
    pub fn overall_winner(&self) -> Side {
        Polarity::HigherIsBetter.winner(self.score_a, self.score_b)
    }

    /// Winner by average latency alone; ties go to [`Side::B`].
    ///
    /// This is deliberately narrower than [`Self::overall_winner`] and can
    /// disagree with it.
    pub fn latency_winner(&self) -> Side {
        Polarity::LowerIsBetter.winner(self.run_a.duration.avg, self.run_b.duration.avg)
    }

    /// Average-latency difference of A relative to B, in percent.
    pub fn latency_diff_pct(&self) -> f64 {
        percentage_diff(self.run_a.duration.avg, self.run_b.duration.avg)
    }

    /// Request-rate difference of A relative to B, in percent.
    pub fn throughput_diff_pct(&self) -> f64 {
        percentage_diff(self.run_a.requests.rate, self.run_b.requests.rate)
    }
}

/// Compare run `a` against baseline `b`.
pub fn compare(a: &MetricSet, b: &MetricSet) -> ComparisonResult {
    let rows = MetricId::ALL
        .into_iter()
        .map(|metric| {
            let va = metric.value(a);
            let vb = metric.value(b);
            MetricComparison {
                metric,
                a: va,
                b: vb,
                diff_pct: percentage_diff(va, vb),
                winner: metric.polarity().winner(va, vb),
            }
        })
        .collect();

    ComparisonResult {
        run_a: a.clone(),
        run_b: b.clone(),
        rows,
        score_a: composite_score(a),
        score_b: composite_score(b),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
