//! `burnin` - run the full synthetic workload suite and save a CSV report.
//!
//! Takes no arguments. Output location and console verbosity follow the
//! `BENCH_*` environment variables; logging follows `BURNIN_LOG` or `RUST_LOG`.

use anyhow::Result;
use burnin::{Harness, HarnessConfig, TrackingAllocator};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Parser, Debug)]
#[command(
    name = "burnin",
    version,
    about = "Time a fixed CPU/memory workload suite on one core, then on all cores"
)]
struct Cli {}

fn init_logging() {
    let filter = std::env::var("BURNIN_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
        .and_then(|expr| EnvFilter::try_new(expr).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

fn main() -> Result<()> {
    let _cli = Cli::parse();
    init_logging();

    println!("Starting Benchmarking...");
    let report = Harness::new(HarnessConfig::from_env()).run();
    tracing::debug!(rows = report.len(), "report handed off");
    println!("Benchmarking completed.");

    Ok(())
}
