//! # lagwatch
//!
//! Polls one or more Burrow servers for Kafka consumer lag on a fixed
//! interval and writes each cycle's records as JSON lines.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌─────────────────────────┐    ┌────────┐
//! │ settings │───▶│  runner  │───▶│ BurrowAdapter (gather)  │───▶│ Output │
//! │ (config) │    │ (ticks)  │    │ clusters ▶ groups/topics│    │ (jsonl)│
//! └──────────┘    └──────────┘    └─────────────────────────┘    └────────┘
//! ```
//!
//! - **[`settings`]**: configuration file plus `LAGWATCH_*` environment
//! - **[`runner`]**: one gather per tick, flushed to the configured output
//! - **[`duration`]**: compact duration strings (`500ms`, `5s`, `2m`, `1h`)
//!
//! The gather engine and the Burrow client live in `lagwatch-adapters`;
//! records and sinks in `lagwatch-types` and `lagwatch-sdk`.
//!
//! ## Usage
//!
//! ```bash
//! # Poll a local Burrow every 10s and print records
//! lagwatch
//!
//! # One cycle against the servers in a config file, appended to a file
//! lagwatch --config lagwatch.toml --output records.jsonl --once
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use lagwatch::{Runner, Settings};
//! use lagwatch_sdk::Output;
//!
//! # tokio_test::block_on(async {
//! let settings = Settings::load(None).unwrap();
//! let runner = Runner::new(settings.adapter().unwrap(), Output::Stdout, settings.interval);
//! let cycle = runner.run_once().await.unwrap();
//! println!("{} records", cycle.records.len());
//! # });
//! ```

pub mod duration;
pub mod runner;
pub mod settings;

pub use runner::{Cycle, Runner};
pub use settings::Settings;
