//! In-memory accumulator.

use lagwatch_types::{Accumulator, MetricRecord};
use parking_lot::RwLock;

/// Collects records in memory, safe for concurrent writers.
///
/// The runner drains it once per cycle; tests inspect it directly.
#[derive(Debug, Default)]
pub struct MemoryAccumulator {
    records: RwLock<Vec<MetricRecord>>,
}

impl MemoryAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records collected so far.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// True when no record has been collected.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Copy of every record collected so far.
    pub fn records(&self) -> Vec<MetricRecord> {
        self.records.read().clone()
    }

    /// Take every record out, leaving the accumulator empty.
    pub fn drain(&self) -> Vec<MetricRecord> {
        std::mem::take(&mut *self.records.write())
    }

    /// True when at least one record has this name.
    pub fn has_measurement(&self, name: &str) -> bool {
        self.records.read().iter().any(|r| r.name == name)
    }

    /// Records with this name.
    pub fn measurement(&self, name: &str) -> Vec<MetricRecord> {
        self.records
            .read()
            .iter()
            .filter(|r| r.name == name)
            .cloned()
            .collect()
    }

    /// First record with this name whose tags include all of `tags`.
    pub fn find<'a>(
        &self,
        name: &str,
        tags: impl IntoIterator<Item = (&'a str, &'a str)> + Clone,
    ) -> Option<MetricRecord> {
        self.records
            .read()
            .iter()
            .find(|r| r.name == name && r.has_tags(tags.clone()))
            .cloned()
    }
}

impl Accumulator for MemoryAccumulator {
    fn add_record(&self, record: MetricRecord) {
        self.records.write().push(record);
    }
}
