//! Periodic gather cycles.
//!
//! Each cycle collects into a fresh in-memory accumulator and flushes the
//! whole batch to the output once every branch has completed. Cycles never
//! overlap: a slow cycle delays the next tick instead of racing it.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use lagwatch_adapters::burrow::BurrowAdapter;
use lagwatch_adapters::GatherError;
use lagwatch_sdk::{MemoryAccumulator, Output};
use lagwatch_types::MetricRecord;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::duration::format_duration;

/// Outcome of one gather cycle.
#[derive(Debug)]
pub struct Cycle {
    pub records: Vec<MetricRecord>,
    pub errors: Vec<GatherError>,
    pub elapsed: Duration,
}

pub struct Runner {
    adapter: BurrowAdapter,
    output: Output,
    interval: Duration,
}

impl Runner {
    pub fn new(adapter: BurrowAdapter, output: Output, interval: Duration) -> Self {
        Self {
            adapter,
            output,
            interval,
        }
    }

    /// Gather once without writing anything.
    pub async fn gather(&self) -> Cycle {
        let started = Instant::now();
        let acc = Arc::new(MemoryAccumulator::new());
        let errors = self.adapter.gather(acc.clone()).await;

        for err in &errors {
            warn!(error = %err, "Gather error");
        }

        Cycle {
            records: acc.drain(),
            errors,
            elapsed: started.elapsed(),
        }
    }

    /// Gather once and write the records to the output.
    pub async fn run_once(&self) -> Result<Cycle> {
        let cycle = self.gather().await;

        self.output
            .emit(&cycle.records)
            .await
            .with_context(|| format!("Failed to write to {}", self.output.description()))?;

        info!(
            records = cycle.records.len(),
            errors = cycle.errors.len(),
            elapsed = %format_duration(cycle.elapsed),
            "Gather cycle complete"
        );
        Ok(cycle)
    }

    /// Gather every interval until `shutdown` resolves. The first cycle
    /// starts immediately.
    pub async fn run<S>(&self, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(
            servers = ?self.adapter.servers(),
            interval = %format_duration(self.interval),
            output = %self.output.description(),
            "Starting"
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutting down");
                    return Ok(());
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.run_once().await {
                        error!(error = %e, "Gather cycle failed");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lagwatch_adapters::burrow::ApiResponse;
    use lagwatch_adapters::gather::Fetcher;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use url::Url;

    /// One cluster with one topic of two partitions, and no consumers.
    #[derive(Default)]
    struct SmallBurrow {
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl Fetcher for SmallBurrow {
        type Response = ApiResponse;

        async fn fetch(&self, address: &Url) -> Result<ApiResponse, GatherError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let mut res = ApiResponse::default();
            match address.path() {
                "/v2/kafka" => res.clusters = vec!["local".to_string()],
                "/v2/kafka/local/topic" => res.topics = vec!["orders".to_string()],
                "/v2/kafka/local/topic/orders" => res.offsets = vec![5, 6],
                "/v2/kafka/local/consumer" => {}
                _ => {
                    return Err(GatherError::Status {
                        url: address.to_string(),
                        status: 404,
                    })
                }
            }
            Ok(res)
        }
    }

    fn runner(fetcher: Arc<SmallBurrow>, output: Output, interval: Duration) -> Runner {
        let adapter = BurrowAdapter::builder()
            .server("http://burrow:8000")
            .fetcher(fetcher)
            .build()
            .unwrap();
        Runner::new(adapter, output, interval)
    }

    #[tokio::test]
    async fn run_once_emits_the_cycle() {
        let (output, mut rx) = Output::channel(4);
        let runner = runner(Arc::default(), output, Duration::from_secs(10));

        let cycle = runner.run_once().await.unwrap();
        assert!(cycle.errors.is_empty());
        assert_eq!(cycle.records.len(), 2);

        let batch = rx.recv().await.unwrap();
        assert_eq!(batch, cycle.records);
        assert!(batch.iter().all(|r| r.name == "burrow_topic_offset"));
    }

    #[tokio::test]
    async fn file_output_gets_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.jsonl");
        let runner = runner(Arc::default(), Output::file(&path), Duration::from_secs(10));

        runner.run_once().await.unwrap();
        runner.run_once().await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0]["name"], "burrow_topic_offset");
        assert_eq!(lines[0]["tags"]["cluster"], "local");
        assert!(lines[0]["timestamp_ms"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn unwritable_output_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("records.jsonl");
        let runner = runner(Arc::default(), Output::file(path), Duration::from_secs(10));

        assert!(runner.run_once().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn run_ticks_until_shutdown() {
        let fetcher = Arc::new(SmallBurrow::default());
        let (output, mut rx) = Output::channel(16);
        let runner = runner(fetcher.clone(), output, Duration::from_secs(10));

        // First tick is immediate, then one per interval: t=0, 10, 20
        runner
            .run(tokio::time::sleep(Duration::from_secs(25)))
            .await
            .unwrap();

        let mut batches = 0;
        while rx.try_recv().is_ok() {
            batches += 1;
        }
        assert_eq!(batches, 3);
        // root, topic list, topic offsets, consumer list per cycle
        assert_eq!(fetcher.fetches.load(Ordering::SeqCst), 12);
    }
}
