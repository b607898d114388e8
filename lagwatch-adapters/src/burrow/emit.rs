//! Conversion of Burrow leaf responses into metric records.
//!
//! Records are pushed to the accumulator as soon as they are built. Callers
//! pass the cluster/group/topic tag values explicitly: the driver prefers the
//! names Burrow echoes back and falls back to the names it walked.

use lagwatch_types::{remap_status, Accumulator, MetricRecord, MetricRecordBuilder};

use super::api::{ConsumerStatus, Offset, PartitionStatus};

pub const TOPIC_OFFSET: &str = "burrow_topic_offset";
pub const GROUP_SUMMARY: &str = "burrow_group_summary";
pub const GROUP_TOPIC: &str = "burrow_group_topic";

/// One `burrow_topic_offset` record per partition. The partition tag is
/// the offset's index in the list.
pub fn topic_offsets(acc: &dyn Accumulator, cluster: &str, topic: &str, offsets: &[i64]) {
    for (partition, offset) in offsets.iter().enumerate() {
        acc.add_record(
            MetricRecord::builder(TOPIC_OFFSET)
                .tag("cluster", cluster)
                .tag("topic", topic)
                .tag("partition", partition.to_string())
                .field("offset", *offset)
                .build(),
        );
    }
}

/// One `burrow_group_summary` record for the group as a whole.
///
/// `maxlag.*` fields are only present when Burrow reported a max-lag
/// partition. The partition index is written as `maxlag.partition`, not the
/// misspelled `maxlag.parittion` some other Burrow collectors emit, so
/// queries carried over from those need the corrected key.
pub fn group_summary(acc: &dyn Accumulator, cluster: &str, group: &str, status: &ConsumerStatus) {
    let mut record = MetricRecord::builder(GROUP_SUMMARY)
        .tag("cluster", cluster)
        .tag("group", group)
        .field("status", status.status.as_str())
        .field("status_code", remap_status(&status.status))
        .field_opt("partition_count", status.partition_count)
        .field_opt("total_lag", status.totallag);

    if let Some(maxlag) = &status.maxlag {
        record = record
            .field("maxlag.topic", maxlag.topic.as_str())
            .field("maxlag.partition", maxlag.partition)
            .field("maxlag.status", maxlag.status.as_str())
            .field("maxlag.status_code", remap_status(&maxlag.status));
        record = offset_fields(record, "maxlag.start", &maxlag.start);
        record = offset_fields(record, "maxlag.end", &maxlag.end);
    }

    acc.add_record(record.build());
}

/// One `burrow_group_topic` record per partition the group consumes.
pub fn group_topics(
    acc: &dyn Accumulator,
    cluster: &str,
    group: &str,
    partitions: &[PartitionStatus],
) {
    for partition in partitions {
        let record = MetricRecord::builder(GROUP_TOPIC)
            .tag("cluster", cluster)
            .tag("group", group)
            .tag("topic", partition.topic.as_str())
            .tag("partition", partition.partition.to_string())
            .field("status", partition.status.as_str())
            .field("status_code", remap_status(&partition.status));
        let record = offset_fields(record, "start", &partition.start);
        let record = offset_fields(record, "end", &partition.end);
        acc.add_record(record.build());
    }
}

fn offset_fields(record: MetricRecordBuilder, prefix: &str, offset: &Offset) -> MetricRecordBuilder {
    record
        .field(format!("{prefix}.offset"), offset.offset)
        .field(format!("{prefix}.timestamp"), offset.timestamp)
        .field(format!("{prefix}.lag"), offset.lag)
}
