//! Top-level driver: single-worker phases, fan-out phases, total row, hand-off.

use crate::config::HarnessConfig;
use crate::memory::{self, HeapProbe, MemoryProbe};
use crate::progress::{ConsoleProgress, NoProgress, Progress};
use crate::report::{ConsoleReporter, CsvReporter, JsonReporter, MultiReporter, Reporter, RunInfo};
use crate::result::{Measurement, Report, TOTAL_LABEL};
use crate::sampler::Sampler;
use crate::strategy;
use crate::suite::SuiteParams;
use std::time::Instant;

/// Runs the fixed suite once and hands the report to its reporters.
///
/// # Example
///
/// ```rust,no_run
/// use burnin::{Harness, HarnessConfig};
///
/// let report = Harness::new(HarnessConfig::from_env()).run();
/// println!("{} rows", report.len());
/// ```
pub struct Harness {
    config: HarnessConfig,
    params: SuiteParams,
    degree: usize,
    reporter: Box<dyn Reporter>,
    progress: Box<dyn Progress>,
    probe: Box<dyn MemoryProbe>,
}

impl Harness {
    /// Full-size suite with console output (when verbose) and CSV persistence.
    pub fn new(config: HarnessConfig) -> Self {
        let mut reporters: Vec<Box<dyn Reporter>> = Vec::new();
        if config.verbose {
            reporters.push(Box::new(ConsoleReporter::new()));
        }
        reporters.push(Box::new(CsvReporter::new(config.output_dir.clone())));
        if config.json {
            reporters.push(Box::new(JsonReporter::new(config.output_dir.clone())));
        }

        let progress: Box<dyn Progress> = if config.verbose {
            Box::new(ConsoleProgress)
        } else {
            Box::new(NoProgress)
        };

        Self {
            config,
            params: SuiteParams::standard(),
            degree: strategy::available_degree(),
            reporter: Box::new(MultiReporter::new(reporters)),
            progress,
            probe: Box::new(HeapProbe),
        }
    }

    /// Replace the workload sizes.
    pub fn params(mut self, params: SuiteParams) -> Self {
        self.params = params;
        self
    }

    /// Replace the reporters.
    pub fn reporter(mut self, reporter: Box<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Replace the progress sink.
    pub fn progress(mut self, progress: Box<dyn Progress>) -> Self {
        self.progress = progress;
        self
    }

    /// Replace the memory probe.
    pub fn probe(mut self, probe: Box<dyn MemoryProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Fan-out degree this harness will use.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Run the whole suite and return the report that was handed to the reporters.
    ///
    /// Installs the configured reclamation mode first. Persistence failures
    /// are logged by the reporters and never abort the run.
    pub fn run(self) -> Report {
        if let Err(e) = memory::configure(self.config.reclamation) {
            tracing::warn!("{}; keeping {}", e, e.active);
        }

        let start = Instant::now();
        let mut run = RunInfo::new(self.degree, memory::reclamation());
        tracing::info!(degree = self.degree, reclamation = %run.reclamation, "benchmark started");
        self.reporter.suite_start(&run);

        let sampler = Sampler::new(self.probe.as_ref());
        let progress = self.progress.as_ref();
        let mut report = Report::new();

        self.reporter.group_start("single core");
        let phases = self.params.single_worker_phases(progress);
        report.extend(strategy::single_worker(&sampler, self.reporter.as_ref(), &phases));

        self.reporter.group_start("multi-core");
        let phases = self.params.fan_out_phases(progress);
        report.extend(strategy::parallel(
            &sampler,
            self.reporter.as_ref(),
            self.degree,
            &phases,
        ));

        report.push(Measurement::new(
            TOTAL_LABEL,
            start.elapsed(),
            sampler.memory_mb(),
        ));

        run.finished_at = chrono::Local::now();
        tracing::info!(rows = report.len(), "benchmark finished");
        self.reporter.suite_end(&run, &report);

        report
    }
}
