//! Burrow v2 HTTP API response types.
//!
//! Every endpoint answers with the same envelope; only the fields relevant
//! to that endpoint are populated. Missing fields fall back to their
//! defaults so one type decodes all of them.

use serde::Deserialize;

/// Response envelope shared by every Burrow v2 endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiResponse {
    /// Set by Burrow when the request failed.
    pub error: bool,
    pub message: String,

    /// `GET /v2/kafka`
    pub clusters: Vec<String>,

    /// `GET /v2/kafka/{cluster}/consumer`
    #[serde(rename = "consumers")]
    pub groups: Vec<String>,

    /// `GET /v2/kafka/{cluster}/topic`
    pub topics: Vec<String>,

    /// `GET /v2/kafka/{cluster}/topic/{topic}`, indexed by partition.
    pub offsets: Vec<i64>,

    /// `GET /v2/kafka/{cluster}/consumer/{group}/lag`
    pub status: Option<ConsumerStatus>,

    /// Echo of the request that produced this response.
    pub request: Request,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Request {
    pub url: String,
    pub host: String,
    pub cluster: String,
    pub group: String,
    pub topic: String,
}

/// Evaluated status of one consumer group.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConsumerStatus {
    pub cluster: String,
    pub group: String,
    pub status: String,
    pub partitions: Vec<PartitionStatus>,
    pub partition_count: Option<i64>,

    /// Partition with the largest current lag, absent when nothing lags.
    pub maxlag: Option<PartitionStatus>,
    pub totallag: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PartitionStatus {
    pub topic: String,
    pub partition: i32,
    pub status: String,
    pub start: Offset,
    pub end: Offset,
}

/// A committed offset sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Offset {
    pub offset: i64,
    /// Milliseconds since the epoch.
    pub timestamp: i64,
    pub lag: i64,
}
