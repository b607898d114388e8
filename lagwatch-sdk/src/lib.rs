//! # lagwatch-sdk
//!
//! Sinks and outputs for the records a lagwatch gather cycle produces.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lagwatch_sdk::{MemoryAccumulator, Output};
//! use lagwatch_types::{Accumulator, MetricRecord};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let acc = MemoryAccumulator::new();
//!
//!     // Workers push records concurrently during a cycle
//!     acc.add_record(MetricRecord::builder("burrow_topic_offset").field("offset", 1i64).build());
//!
//!     // After the cycle, flush everything to an output
//!     let records = acc.drain();
//!     Output::file("records.jsonl").emit(&records).await
//! }
//! ```
//!
//! ## Features
//!
//! - **Thread-safe sink**: `MemoryAccumulator` takes records from any task
//! - **Multiple outputs**: stdout, file, TCP, or custom channel
//! - **JSON lines**: one stamped record per line

mod accumulator;
mod output;

pub use accumulator::MemoryAccumulator;
pub use output::{Output, StampedRecord};

// Re-export types for convenience
pub use lagwatch_types::{Accumulator, FieldValue, MetricRecord};
