//! Metric extractor: turns a raw k6 summary into a [`MetricSet`].
//!
//! The mapping from `(metric, field)` in the summary to a slot of the
//! `MetricSet` is a static table; every lookup goes through
//! [`crate::lookup::number_or_zero`], so a summary that omits any metric or
//! field still yields a complete set with zeros in the gaps.

use serde_json::Value;
use tracing::debug;

use super::{CustomOperation, MetricSet, OperationTimings};
use crate::error::ReportError;
use crate::lookup::{contains, number_or_zero};

/// Writes one raw value into its slot of the set under construction.
type Apply = fn(&mut MetricSet, f64);

struct FieldMapping {
    metric: &'static str,
    field: &'static str,
    apply: Apply,
}

#[rustfmt::skip]
const FIELD_TABLE: &[FieldMapping] = &[
    FieldMapping { metric: "http_reqs", field: "count", apply: |m, v| m.requests.count = to_count(v) },
    FieldMapping { metric: "http_reqs", field: "rate", apply: |m, v| m.requests.rate = v },
    FieldMapping { metric: "http_req_duration", field: "avg", apply: |m, v| m.duration.avg = v },
    FieldMapping { metric: "http_req_duration", field: "med", apply: |m, v| m.duration.med = v },
    FieldMapping { metric: "http_req_duration", field: "p(90)", apply: |m, v| m.duration.p90 = v },
    FieldMapping { metric: "http_req_duration", field: "p(95)", apply: |m, v| m.duration.p95 = v },
    FieldMapping { metric: "http_req_duration", field: "p(99)", apply: |m, v| m.duration.p99 = v },
    FieldMapping { metric: "http_req_duration", field: "min", apply: |m, v| m.duration.min = v },
    FieldMapping { metric: "http_req_duration", field: "max", apply: |m, v| m.duration.max = v },
    // k6 reports the failed-request rate as a fraction.
    FieldMapping { metric: "http_req_failed", field: "rate", apply: |m, v| m.failure_rate = v * 100.0 },
    FieldMapping { metric: "http_req_waiting", field: "avg", apply: |m, v| m.wait_duration = v },
    FieldMapping { metric: "http_req_blocked", field: "avg", apply: |m, v| m.blocked_duration = v },
    FieldMapping { metric: "http_req_connecting", field: "avg", apply: |m, v| m.connecting_duration = v },
    FieldMapping { metric: "iterations", field: "count", apply: |m, v| m.iterations.count = to_count(v) },
    FieldMapping { metric: "iterations", field: "rate", apply: |m, v| m.iterations.rate = v },
    FieldMapping { metric: "vus", field: "max", apply: |m, v| m.virtual_users.max = to_count(v) },
    FieldMapping { metric: "vus", field: "min", apply: |m, v| m.virtual_users.min = to_count(v) },
    FieldMapping { metric: "data_received", field: "count", apply: |m, v| m.data_transfer.received.bytes = to_count(v) },
    FieldMapping { metric: "data_received", field: "rate", apply: |m, v| m.data_transfer.received.rate = v },
    FieldMapping { metric: "data_sent", field: "count", apply: |m, v| m.data_transfer.sent.bytes = to_count(v) },
    FieldMapping { metric: "data_sent", field: "rate", apply: |m, v| m.data_transfer.sent.rate = v },
];

/// Built-in metric names read through [`FIELD_TABLE`].
const CORE_METRICS: &[&str] = &[
    "http_reqs",
    "http_req_duration",
    "http_req_failed",
    "http_req_waiting",
    "http_req_blocked",
    "http_req_connecting",
    "iterations",
    "vus",
    "data_received",
    "data_sent",
];

/// Counters are integral; negative or non-finite readings collapse to zero.
fn to_count(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

/// Parse summary text into a JSON tree.
///
/// Unparseable text is reported as [`ReportError::MalformedInput`].
pub fn parse_summary(text: &str) -> Result<Value, ReportError> {
    serde_json::from_str(text)
        .map_err(|e| ReportError::MalformedInput(format!("summary is not valid JSON: {e}")))
}

/// Normalize a raw k6 summary into a [`MetricSet`].
///
/// Fails only when the summary has no `metrics` mapping. Missing metrics or
/// fields default to `0`; metric names outside the recognized set are
/// ignored.
pub fn extract(raw: &Value) -> Result<MetricSet, ReportError> {
    let metrics = raw
        .get("metrics")
        .filter(|m| m.is_object())
        .ok_or_else(|| {
            ReportError::MalformedInput("summary has no 'metrics' mapping".to_string())
        })?;

    let mut set = MetricSet::default();
    let mut missing = 0usize;
    for mapping in FIELD_TABLE {
        let path = [mapping.metric, "values", mapping.field];
        if !contains(metrics, &path) {
            missing += 1;
        }
        (mapping.apply)(&mut set, number_or_zero(metrics, &path));
    }

    for op in CustomOperation::ALL {
        let name = op.metric_name();
        if !contains(metrics, &[name]) {
            continue;
        }
        set.custom_operations.insert(
            op,
            OperationTimings {
                avg: number_or_zero(metrics, &[name, "values", "avg"]),
                p95: number_or_zero(metrics, &[name, "values", "p(95)"]),
                p99: number_or_zero(metrics, &[name, "values", "p(99)"]),
            },
        );
    }

    let ignored = metrics.as_object().map_or(0, |all| {
        all.keys()
            .filter(|name| {
                !CORE_METRICS.contains(&name.as_str())
                    && CustomOperation::from_metric_name(name).is_none()
            })
            .count()
    });
    debug!(
        missing_fields = missing,
        ignored_metrics = ignored,
        custom_operations = set.custom_operations.len(),
        "extracted metric set"
    );

    Ok(set)
}

/// Parse and normalize in one step.
pub fn extract_str(text: &str) -> Result<MetricSet, ReportError> {
    extract(&parse_summary(text)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn full_summary() -> Value {
        json!({
            "metrics": {
                "http_reqs": { "values": { "count": 12345, "rate": 205.75 } },
                "http_req_duration": { "values": {
                    "avg": 120.5, "med": 98.1, "p(90)": 210.0, "p(95)": 340.2,
                    "p(99)": 780.9, "min": 3.2, "max": 2100.0
                } },
                "http_req_failed": { "values": { "rate": 0.0125 } },
                "http_req_waiting": { "values": { "avg": 110.4 } },
                "http_req_blocked": { "values": { "avg": 0.8 } },
                "http_req_connecting": { "values": { "avg": 0.3 } },
                "iterations": { "values": { "count": 2469, "rate": 41.15 } },
                "vus": { "values": { "max": 100, "min": 1 } },
                "data_received": { "values": { "count": 52428800, "rate": 873813.3 } },
                "data_sent": { "values": { "count": 1048576, "rate": 17476.2 } },
                "feed_load_duration": { "values": { "avg": 150.0, "p(95)": 400.0, "p(99)": 900.0 } }
            }
        })
    }

    // -----------------------------------------------------------------------
    // extract
    // -----------------------------------------------------------------------

    #[test]
    fn extract_reads_every_core_field() {
        let set = extract(&full_summary()).expect("summary should be valid");

        assert_eq!(set.requests.count, 12345);
        assert!((set.requests.rate - 205.75).abs() < 1e-9);
        assert_eq!(set.duration.avg, 120.5);
        assert_eq!(set.duration.med, 98.1);
        assert_eq!(set.duration.p90, 210.0);
        assert_eq!(set.duration.p95, 340.2);
        assert_eq!(set.duration.p99, 780.9);
        assert_eq!(set.duration.min, 3.2);
        assert_eq!(set.duration.max, 2100.0);
        assert!((set.failure_rate - 1.25).abs() < 1e-9);
        assert_eq!(set.wait_duration, 110.4);
        assert_eq!(set.blocked_duration, 0.8);
        assert_eq!(set.connecting_duration, 0.3);
        assert_eq!(set.iterations.count, 2469);
        assert_eq!(set.iterations.rate, 41.15);
        assert_eq!(set.virtual_users.max, 100);
        assert_eq!(set.virtual_users.min, 1);
        assert_eq!(set.data_transfer.received.bytes, 52_428_800);
        assert_eq!(set.data_transfer.sent.bytes, 1_048_576);
        assert_eq!(set.data_transfer.sent.rate, 17476.2);
    }

    #[test]
    fn extract_converts_failed_fraction_to_percentage() {
        let raw = json!({ "metrics": { "http_req_failed": { "values": { "rate": 0.02 } } } });
        let set = extract(&raw).expect("summary should be valid");
        assert!((set.failure_rate - 2.0).abs() < 1e-9);
    }

    #[test]
    fn extract_without_metrics_key_is_malformed() {
        for raw in [
            json!({}),
            json!({ "root_group": {} }),
            json!({ "metrics": null }),
            json!({ "metrics": [1, 2, 3] }),
            json!("metrics"),
            json!(null),
        ] {
            let err = extract(&raw).expect_err("summary without metrics must be rejected");
            assert!(matches!(err, ReportError::MalformedInput(_)));
        }
    }

    #[test]
    fn extract_empty_metrics_yields_all_zeros() {
        let set = extract(&json!({ "metrics": {} })).expect("empty metrics is still valid");
        assert_eq!(set, MetricSet::default());
        assert!(!set.has_custom_operations());
    }

    #[test]
    fn extract_defaults_every_removed_field_to_zero() {
        // Drop each field in turn; extraction must succeed and the slot must
        // fall back to zero while every other field keeps its value.
        let baseline = extract(&full_summary()).expect("summary should be valid");
        for mapping in FIELD_TABLE {
            let mut raw = full_summary();
            raw["metrics"][mapping.metric]["values"]
                .as_object_mut()
                .expect("values should be an object")
                .remove(mapping.field);
            let set = extract(&raw).expect("partial summary should be valid");

            let mut expected = baseline.clone();
            (mapping.apply)(&mut expected, 0.0);
            assert_eq!(
                set, expected,
                "removing {}.{} should only zero its slot",
                mapping.metric, mapping.field
            );
        }
    }

    #[test]
    fn extract_tolerates_missing_values_mapping() {
        let raw = json!({ "metrics": { "http_reqs": {}, "http_req_duration": { "type": "trend" } } });
        let set = extract(&raw).expect("summary should be valid");
        assert_eq!(set.requests.count, 0);
        assert_eq!(set.duration.avg, 0.0);
    }

    #[test]
    fn extract_negative_counts_collapse_to_zero() {
        let raw = json!({ "metrics": { "http_reqs": { "values": { "count": -5, "rate": 1.0 } } } });
        let set = extract(&raw).expect("summary should be valid");
        assert_eq!(set.requests.count, 0);
        assert_eq!(set.requests.rate, 1.0);
    }

    #[test]
    fn extract_includes_only_present_custom_operations() {
        let set = extract(&full_summary()).expect("summary should be valid");
        assert_eq!(set.custom_operations.len(), 1);
        let feed = set.custom_operations[&CustomOperation::FeedLoad];
        assert_eq!(feed.avg, 150.0);
        assert_eq!(feed.p95, 400.0);
        assert_eq!(feed.p99, 900.0);
    }

    #[test]
    fn extract_custom_operation_without_values_defaults_to_zero() {
        let raw = json!({ "metrics": { "user_creation_duration": { "type": "trend" } } });
        let set = extract(&raw).expect("summary should be valid");
        assert_eq!(
            set.custom_operations.get(&CustomOperation::UserCreation),
            Some(&OperationTimings::default())
        );
    }

    #[test]
    fn extract_ignores_unrecognized_metrics() {
        let mut raw = full_summary();
        raw["metrics"]["checkout_duration"] = json!({ "values": { "avg": 1.0 } });
        raw["metrics"]["grpc_reqs"] = json!({ "values": { "count": 7 } });
        let with_extra = extract(&raw).expect("summary should be valid");
        let baseline = extract(&full_summary()).expect("summary should be valid");
        assert_eq!(with_extra, baseline);
    }

    // -----------------------------------------------------------------------
    // parse_summary / extract_str
    // -----------------------------------------------------------------------

    #[test]
    fn parse_summary_rejects_invalid_json() {
        let err = parse_summary("{ not json").expect_err("invalid JSON must fail");
        assert!(matches!(err, ReportError::MalformedInput(_)));
    }

    #[test]
    fn extract_str_parses_and_extracts() {
        let text = r#"{"metrics":{"http_req_duration":{"values":{"avg":42.0}}}}"#;
        let set = extract_str(text).expect("valid summary text");
        assert_eq!(set.duration.avg, 42.0);
    }
}
