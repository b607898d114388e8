//! The sink interface records are emitted into.

use std::sync::Arc;

use crate::MetricRecord;

/// Receives records as a gather cycle produces them.
///
/// Implementations must accept concurrent calls from any number of workers.
/// Emission is append-only and unacknowledged.
pub trait Accumulator: Send + Sync {
    /// Append one record.
    fn add_record(&self, record: MetricRecord);
}

impl<A: Accumulator + ?Sized> Accumulator for Arc<A> {
    fn add_record(&self, record: MetricRecord) {
        (**self).add_record(record)
    }
}

impl<A: Accumulator + ?Sized> Accumulator for &A {
    fn add_record(&self, record: MetricRecord) {
        (**self).add_record(record)
    }
}
