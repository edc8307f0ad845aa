//! Derived statistics shared by the report assembler and terminal printer.

use crate::metrics::MetricSet;

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Signed percentage difference of `a` relative to `b`: `(a - b) / b * 100`.
///
/// Returns `0.0` when `b` is zero. That is a saturation policy, not a claim
/// that the values are equal.
pub fn percentage_diff(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        return 0.0;
    }
    (a - b) / b * 100.0
}

/// Format a byte count with a binary unit suffix, e.g. `"1.50 MB"`.
///
/// Divides by 1024 while the value is at least 1024, stopping at TB.
pub fn format_bytes(bytes: f64) -> String {
    let mut value = bytes;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, BYTE_UNITS[unit])
}

/// Format an integer with `,` thousands separators, e.g. `12,345`.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Composite performance score: `(1000 / avg_ms) * requests_per_second`.
///
/// Higher is better. A run without a positive average latency scores `0.0`.
pub fn composite_score(set: &MetricSet) -> f64 {
    let avg = set.duration.avg;
    if !(avg.is_finite() && avg > 0.0) {
        return 0.0;
    }
    (1000.0 / avg) * set.requests.rate
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
