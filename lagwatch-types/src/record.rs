//! MetricRecord - one measurement emitted by a gather cycle.

use std::collections::BTreeMap;

use crate::FieldValue;

/// Tag set of a record, keyed by stable identifiers (`cluster`, `group`, ...).
pub type Tags = BTreeMap<String, String>;

/// Field set of a record.
pub type Fields = BTreeMap<String, FieldValue>;

/// A `(name, tags, fields)` triple.
///
/// Records are immutable once built and carry no timestamp: two cycles over
/// unchanged data produce equal records. Outputs stamp them when written.
///
/// # Example
///
/// ```rust
/// use lagwatch_types::MetricRecord;
///
/// let record = MetricRecord::builder("burrow_topic_offset")
///     .tag("cluster", "local")
///     .tag("topic", "orders")
///     .tag("partition", "0")
///     .field("offset", 1500i64)
///     .build();
///
/// assert_eq!(record.name, "burrow_topic_offset");
/// assert_eq!(record.tags.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricRecord {
    /// Measurement name, one per metric family.
    pub name: String,

    /// Tags identifying the measured node.
    pub tags: Tags,

    /// Measured values.
    pub fields: Fields,
}

impl MetricRecord {
    /// Create a builder for a record with the given name.
    pub fn builder(name: impl Into<String>) -> MetricRecordBuilder {
        MetricRecordBuilder::new(name)
    }

    /// Get a tag value.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Get a field value.
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// True when every given tag is present with the given value.
    pub fn has_tags<'a>(&self, tags: impl IntoIterator<Item = (&'a str, &'a str)>) -> bool {
        tags.into_iter().all(|(k, v)| self.tag(k) == Some(v))
    }
}

/// Builder for `MetricRecord`.
#[derive(Debug)]
pub struct MetricRecordBuilder {
    name: String,
    tags: Tags,
    fields: Fields,
}

impl MetricRecordBuilder {
    /// Create a new builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Tags::new(),
            fields: Fields::new(),
        }
    }

    /// Add a tag.
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Add a field.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Add a field only when a value is present.
    pub fn field_opt<V: Into<FieldValue>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.field(key, value),
            None => self,
        }
    }

    /// Build the record.
    pub fn build(self) -> MetricRecord {
        MetricRecord {
            name: self.name,
            tags: self.tags,
            fields: self.fields,
        }
    }
}
