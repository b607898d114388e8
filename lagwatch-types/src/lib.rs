//! # lagwatch-types
//!
//! Core types shared by every lagwatch crate. A gather cycle produces
//! [`MetricRecord`]s, each a `(name, tags, fields)` triple, and hands them to
//! an [`Accumulator`] as soon as they are built.
//!
//! ## Features
//!
//! - `serde`: JSON/etc. serialization of records via serde
//!
//! ## Example
//!
//! ```rust
//! use lagwatch_types::{MetricRecord, StatusCode};
//!
//! let record = MetricRecord::builder("burrow_group_summary")
//!     .tag("cluster", "local")
//!     .tag("group", "billing")
//!     .field("status", "WARN")
//!     .field("status_code", StatusCode::remap("WARN").code())
//!     .build();
//!
//! assert_eq!(record.tags["group"], "billing");
//! assert_eq!(record.fields["status_code"].as_i64(), Some(3));
//! ```

mod record;
mod sink;
mod status;
mod value;

pub use record::*;
pub use sink::*;
pub use status::*;
pub use value::*;
