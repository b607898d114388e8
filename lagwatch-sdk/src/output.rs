//! Output backends for emitting records.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use lagwatch_types::MetricRecord;
use serde::Serialize;

/// Output destination for the records of a cycle.
#[derive(Debug)]
pub enum Output {
    /// Write JSON lines to standard output.
    Stdout,

    /// Append JSON lines to a file, creating it if needed.
    File(PathBuf),

    /// Send JSON lines to a TCP server.
    ///
    /// A fresh connection is made per emission; failures to connect are ignored.
    Tcp(String),

    /// Send each batch through a channel.
    ///
    /// Use `Output::channel()` to create this variant and get the receiver.
    /// A full or closed channel fails the emission rather than waiting.
    #[cfg(feature = "tokio")]
    Channel(tokio::sync::mpsc::Sender<Vec<MetricRecord>>),
}

/// A record with the time it was written, the shape of one output line.
#[derive(Debug, Serialize)]
pub struct StampedRecord<'a> {
    #[serde(flatten)]
    pub record: &'a MetricRecord,
    pub timestamp_ms: u64,
}

impl Output {
    /// Parse an output target: `-` is stdout, `tcp://host:port` is TCP,
    /// anything else is a file path.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lagwatch_sdk::Output;
    ///
    /// assert!(matches!(Output::parse("-"), Output::Stdout));
    /// assert!(matches!(Output::parse("tcp://localhost:9090"), Output::Tcp(_)));
    /// assert!(matches!(Output::parse("records.jsonl"), Output::File(_)));
    /// ```
    pub fn parse(target: &str) -> Self {
        match target {
            "-" | "" => Output::Stdout,
            _ => match target.strip_prefix("tcp://") {
                Some(addr) => Output::tcp(addr),
                None => Output::file(target),
            },
        }
    }

    /// Create a file output.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Output::File(path.into())
    }

    /// Create a TCP output.
    pub fn tcp(addr: impl Into<String>) -> Self {
        Output::Tcp(addr.into())
    }

    /// Create a channel output and return both the output and receiver.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lagwatch_sdk::Output;
    ///
    /// let (output, mut rx) = Output::channel(16);
    ///
    /// // Later, receive batches
    /// // while let Some(records) = rx.recv().await {
    /// //     println!("Got {} records", records.len());
    /// // }
    /// ```
    #[cfg(feature = "tokio")]
    pub fn channel(buffer: usize) -> (Self, tokio::sync::mpsc::Receiver<Vec<MetricRecord>>) {
        let (tx, rx) = tokio::sync::mpsc::channel(buffer);
        (Output::Channel(tx), rx)
    }

    /// Human-readable description, for logs.
    pub fn description(&self) -> String {
        match self {
            Output::Stdout => "stdout".to_string(),
            Output::File(path) => format!("file: {}", path.display()),
            Output::Tcp(addr) => format!("tcp: {}", addr),
            #[cfg(feature = "tokio")]
            Output::Channel(_) => "channel".to_string(),
        }
    }

    /// Emit a batch of records to this output.
    #[cfg(feature = "tokio")]
    pub async fn emit(&self, records: &[MetricRecord]) -> std::io::Result<()> {
        use tokio::io::AsyncWriteExt;

        if records.is_empty() {
            return Ok(());
        }

        match self {
            Output::Stdout => {
                let lines = to_json_lines(records, current_timestamp_ms())?;
                let mut stdout = tokio::io::stdout();
                stdout.write_all(lines.as_bytes()).await?;
                stdout.flush().await?;
            }
            Output::File(path) => {
                let lines = to_json_lines(records, current_timestamp_ms())?;
                let mut file = tokio::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .await?;
                file.write_all(lines.as_bytes()).await?;
                file.flush().await?;
            }
            Output::Tcp(addr) => {
                use tokio::net::TcpStream;

                // Best effort, like a metrics relay that may be down
                if let Ok(mut stream) = TcpStream::connect(addr).await {
                    let lines = to_json_lines(records, current_timestamp_ms())?;
                    let _ = stream.write_all(lines.as_bytes()).await;
                }
            }
            Output::Channel(tx) => {
                // Don't block a cycle on a slow reader
                tx.try_send(records.to_vec()).map_err(|e| {
                    std::io::Error::other(format!(
                        "dropped batch of {} records: {e}",
                        records.len()
                    ))
                })?;
            }
        }
        Ok(())
    }
}

/// Serialize records as newline-terminated JSON lines sharing one timestamp.
pub(crate) fn to_json_lines(
    records: &[MetricRecord],
    timestamp_ms: u64,
) -> serde_json::Result<String> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(&StampedRecord {
            record,
            timestamp_ms,
        })?);
        out.push('\n');
    }
    Ok(out)
}

fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
