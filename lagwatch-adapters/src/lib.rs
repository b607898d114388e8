//! # lagwatch-adapters
//!
//! Pollers that walk a tree of REST resources (clusters, then consumer
//! groups or topics, then partitions), fetch each node under a fixed worker
//! budget per level, and emit one metric record per node discovered.
//!
//! ## Layout
//!
//! - [`gather`]: the generic engine. Whitelist filtering, a bounded worker
//!   pool, and a level orchestrator that recurses level by level.
//! - [`burrow`] (`burrow` feature): the Burrow consumer-lag API. HTTP
//!   fetcher, response types, metric emission, and the top-level driver.
//!
//! ## Quick Start (Burrow)
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lagwatch_adapters::burrow::BurrowAdapter;
//! use lagwatch_types::{Accumulator, MetricRecord};
//!
//! struct Print;
//!
//! impl Accumulator for Print {
//!     fn add_record(&self, record: MetricRecord) {
//!         println!("{record:?}");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = BurrowAdapter::builder()
//!         .server("http://localhost:8000")
//!         .groups(["billing"])
//!         .build()?;
//!
//!     let errors = adapter.gather(Arc::new(Print)).await;
//!     for error in errors {
//!         eprintln!("branch failed: {error}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod gather;

#[cfg(feature = "burrow")]
pub mod burrow;

pub use error::GatherError;

// Re-export types for convenience
pub use lagwatch_types::{Accumulator, MetricRecord, StatusCode};
