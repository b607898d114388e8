use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use lagwatch::{Runner, Settings};
use lagwatch_sdk::Output;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "lagwatch")]
#[command(about = "Poll Burrow for Kafka consumer lag and emit JSON line metrics")]
struct Args {
    /// Configuration file (TOML, YAML or JSON). LAGWATCH_* variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write records: "-" for stdout, tcp://host:port, or a file path
    #[arg(short, long)]
    output: Option<String>,

    /// Run a single gather cycle and exit
    #[arg(long)]
    once: bool,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let settings = Settings::load(args.config.as_deref())?;
    let output = Output::parse(args.output.as_deref().unwrap_or(&settings.output));
    let runner = Runner::new(settings.adapter()?, output, settings.interval);

    if args.once {
        let cycle = runner.run_once().await?;
        if !cycle.errors.is_empty() {
            anyhow::bail!("{} branch(es) failed during the cycle", cycle.errors.len());
        }
        return Ok(());
    }

    runner
        .run(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}

/// Log to stderr so stdout carries only records.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
