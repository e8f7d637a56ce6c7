//! # burnin
//!
//! A synthetic workload harness. It runs a fixed suite of CPU- and
//! memory-heavy computations (sorting, naive Fibonacci, Monte Carlo π,
//! dense matrix multiplication, Mandelbrot escape times and a pure
//! floating-point summation), first on one thread and then fanned out over
//! every hardware execution unit. Each phase is timed once, followed by a
//! single heap reading, and the rows are written to a CSV report.
//!
//! This is not a statistical benchmark framework: no warmup, no repeated
//! trials, no outlier rejection.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use burnin::{Harness, HarnessConfig, TrackingAllocator};
//!
//! #[global_allocator]
//! static GLOBAL: TrackingAllocator = TrackingAllocator;
//!
//! fn main() {
//!     let report = Harness::new(HarnessConfig::from_env()).run();
//!     assert!(report.total().is_some());
//! }
//! ```
//!
//! Heap readings come from [`TrackingAllocator`]; without it every reading
//! is 0 MB.

mod config;
mod harness;
pub mod memory;
pub mod progress;
mod report;
mod result;
mod sampler;
pub mod strategy;
mod suite;
pub mod workloads;

pub use config::HarnessConfig;
pub use harness::Harness;
pub use memory::{FixedProbe, HeapProbe, MemoryProbe, Reclamation, TrackingAllocator};
pub use progress::{ConsoleProgress, NoProgress, Progress};
pub use report::{
    write_csv_report, ConsoleReporter, CsvReporter, JsonReporter, MultiReporter, Reporter, RunInfo,
};
pub use result::{Measurement, Report, HEADER, TOTAL_LABEL};
pub use sampler::Sampler;
pub use suite::{SuiteParams, FAN_OUT_LABELS, SINGLE_WORKER_LABELS};
