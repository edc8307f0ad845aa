pub mod extract;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use extract::{extract, extract_str, parse_summary};

// ---------------------------------------------------------------------------
// Metric groups
// ---------------------------------------------------------------------------

/// A counter together with its per-second rate (requests, iterations).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Throughput {
    pub count: u64,
    /// Per second.
    pub rate: f64,
}

/// Request duration distribution, all values in milliseconds.
///
/// `min <= avg <= max` holds for well-formed input but is not enforced; the
/// values are whatever the summary reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DurationStats {
    pub avg: f64,
    pub med: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VirtualUsers {
    pub max: u64,
    pub min: u64,
}

/// Bytes moved in one direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TransferStats {
    pub bytes: u64,
    /// Bytes per second.
    pub rate: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DataTransfer {
    pub received: TransferStats,
    pub sent: TransferStats,
}

/// Timings recorded by a custom k6 trend for one business operation (ms).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OperationTimings {
    pub avg: f64,
    pub p95: f64,
    pub p99: f64,
}

// ---------------------------------------------------------------------------
// CustomOperation
// ---------------------------------------------------------------------------

/// Business operations whose custom trend metrics are recognized.
///
/// Declaration order is the order operations appear in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomOperation {
    UserCreation,
    PostCreation,
    CommentCreation,
    LikeCreation,
    FriendshipCreation,
    FeedLoad,
    GetOperation,
}

impl CustomOperation {
    pub const ALL: [CustomOperation; 7] = [
        CustomOperation::UserCreation,
        CustomOperation::PostCreation,
        CustomOperation::CommentCreation,
        CustomOperation::LikeCreation,
        CustomOperation::FriendshipCreation,
        CustomOperation::FeedLoad,
        CustomOperation::GetOperation,
    ];

    /// Name of the k6 trend metric carrying this operation's timings.
    pub fn metric_name(self) -> &'static str {
        match self {
            CustomOperation::UserCreation => "user_creation_duration",
            CustomOperation::PostCreation => "post_creation_duration",
            CustomOperation::CommentCreation => "comment_creation_duration",
            CustomOperation::LikeCreation => "like_creation_duration",
            CustomOperation::FriendshipCreation => "friendship_creation_duration",
            CustomOperation::FeedLoad => "feed_load_duration",
            CustomOperation::GetOperation => "get_operation_duration",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CustomOperation::UserCreation => "User creation",
            CustomOperation::PostCreation => "Post creation",
            CustomOperation::CommentCreation => "Comment creation",
            CustomOperation::LikeCreation => "Like creation",
            CustomOperation::FriendshipCreation => "Friendship creation",
            CustomOperation::FeedLoad => "Feed load",
            CustomOperation::GetOperation => "GET operations",
        }
    }

    pub fn from_metric_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.metric_name() == name)
    }
}

// ---------------------------------------------------------------------------
// MetricSet
// ---------------------------------------------------------------------------

/// Normalized metrics of one load-test run.
///
/// Built once per summary by [`extract`]; every field is always present, with
/// `0` standing in for anything the summary did not report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MetricSet {
    pub requests: Throughput,
    pub duration: DurationStats,
    /// Percentage of failed requests, 0–100.
    pub failure_rate: f64,
    /// Average time spent waiting for the first response byte (ms).
    pub wait_duration: f64,
    /// Average time blocked before the request started (ms).
    pub blocked_duration: f64,
    /// Average TCP connection setup time (ms).
    pub connecting_duration: f64,
    pub iterations: Throughput,
    pub virtual_users: VirtualUsers,
    pub data_transfer: DataTransfer,
    /// Only operations present in the summary have an entry.
    #[serde(default)]
    pub custom_operations: BTreeMap<CustomOperation, OperationTimings>,
}

impl MetricSet {
    /// Percentage of successful requests.
    pub fn success_rate(&self) -> f64 {
        100.0 - self.failure_rate
    }

    pub fn has_custom_operations(&self) -> bool {
        !self.custom_operations.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
