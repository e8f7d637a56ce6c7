//! Pluggable reporters for harness output and report persistence.

use crate::memory::Reclamation;
use crate::progress;
use crate::result::{Measurement, Report, HEADER};
use anyhow::Context;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Facts about one harness run, shared with every reporter.
#[derive(Debug, Clone, Serialize)]
pub struct RunInfo {
    pub started_at: DateTime<Local>,
    /// Equal to `started_at` until the run completes.
    pub finished_at: DateTime<Local>,
    /// Fan-out degree (hardware execution units)
    pub degree: usize,
    pub reclamation: Reclamation,
}

impl RunInfo {
    pub fn new(degree: usize, reclamation: Reclamation) -> Self {
        let now = Local::now();
        Self {
            started_at: now,
            finished_at: now,
            degree,
            reclamation,
        }
    }

    /// Sortable timestamp used in report file names, e.g. `20240131_235959`.
    pub fn file_stamp(&self) -> String {
        self.finished_at.format("%Y%m%d_%H%M%S").to_string()
    }
}

/// Trait for harness reporters.
pub trait Reporter: Send + Sync {
    /// Called before the first phase.
    fn suite_start(&self, _run: &RunInfo) {}

    /// Called when a group of phases (single-worker or fan-out) starts.
    fn group_start(&self, _name: &str) {}

    /// Called after a phase has been measured.
    fn phase_end(&self, _measurement: &Measurement) {}

    /// Called once with the complete report, total row included.
    fn suite_end(&self, _run: &RunInfo, _report: &Report) {}
}

/// Prints status lines to stderr.
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn suite_start(&self, run: &RunInfo) {
        eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        eprintln!("  Benchmarking system characteristics...");
        eprintln!(
            "  Workers: {}, Reclamation: {}",
            run.degree, run.reclamation
        );
        eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    fn group_start(&self, name: &str) {
        eprintln!("Benchmarking {}...", name);
        std::io::stderr().flush().ok();
    }

    fn phase_end(&self, m: &Measurement) {
        progress::finish_line();
        eprintln!("Memory usage: {:.2}MB", m.memory_mb);
        eprintln!("  {} ... {:.2}s", m.label, m.elapsed_secs);
    }

    fn suite_end(&self, _run: &RunInfo, report: &Report) {
        eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        if let Some(total) = report.total() {
            eprintln!("Memory usage: {:.2}MB", total.memory_mb);
            eprintln!(
                "  Completed {} phases in {:.2}s",
                report.len() - 1,
                total.elapsed_secs
            );
        }
        eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }
}

/// Writes the report as `result_<stamp>.csv` under `output_dir`.
pub struct CsvReporter {
    output_dir: PathBuf,
}

impl CsvReporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl Reporter for CsvReporter {
    fn suite_end(&self, run: &RunInfo, report: &Report) {
        match write_csv_report(&self.output_dir, &run.file_stamp(), report) {
            Ok(path) => eprintln!("Results saved to {}", path.display()),
            Err(e) => tracing::warn!("failed to write CSV results: {:#}", e),
        }
    }
}

/// Write `report` to `<output_dir>/result_<stamp>.csv`, creating the directory.
pub fn write_csv_report(output_dir: &Path, stamp: &str, report: &Report) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating directory {}", output_dir.display()))?;

    let path = output_dir.join(format!("result_{}.csv", stamp));
    let mut wtr = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;

    for row in report.rows() {
        wtr.write_record(&row)
            .with_context(|| format!("writing row {:?}", row[0]))?;
    }
    wtr.flush()?;

    tracing::info!(path = %path.display(), rows = report.len(), "report written");
    Ok(path)
}

/// Writes the report and run metadata as `result_<stamp>.json`.
pub struct JsonReporter {
    output_dir: PathBuf,
}

impl JsonReporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl Reporter for JsonReporter {
    fn suite_end(&self, run: &RunInfo, report: &Report) {
        match write_json_report(&self.output_dir, run, report) {
            Ok(path) => eprintln!("Results written to {}", path.display()),
            Err(e) => tracing::warn!("failed to write JSON results: {:#}", e),
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    run: &'a RunInfo,
    header: [&'static str; 3],
    measurements: &'a [Measurement],
}

fn write_json_report(output_dir: &Path, run: &RunInfo, report: &Report) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating directory {}", output_dir.display()))?;

    let path = output_dir.join(format!("result_{}.json", run.file_stamp()));
    let json = serde_json::to_string_pretty(&JsonReport {
        run,
        header: HEADER,
        measurements: report.measurements(),
    })?;

    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Combines multiple reporters.
pub struct MultiReporter {
    reporters: Vec<Box<dyn Reporter>>,
}

impl MultiReporter {
    pub fn new(reporters: Vec<Box<dyn Reporter>>) -> Self {
        Self { reporters }
    }
}

impl Reporter for MultiReporter {
    fn suite_start(&self, run: &RunInfo) {
        for r in &self.reporters {
            r.suite_start(run);
        }
    }

    fn group_start(&self, name: &str) {
        for r in &self.reporters {
            r.group_start(name);
        }
    }

    fn phase_end(&self, measurement: &Measurement) {
        for r in &self.reporters {
            r.phase_end(measurement);
        }
    }

    fn suite_end(&self, run: &RunInfo, report: &Report) {
        for r in &self.reporters {
            r.suite_end(run, report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sample_report() -> Report {
        let mut report = Report::new();
        report.push(Measurement::new(
            "Multi-core Sorting, Matrix Multiplication, and Monte Carlo Simulation",
            Duration::from_millis(1500),
            12.346,
        ));
        report.push(Measurement::new(
            crate::result::TOTAL_LABEL,
            Duration::from_secs(2),
            13.0,
        ));
        report
    }

    #[test]
    fn should_write_csv_with_header_and_quoted_labels() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("results");

        let path = write_csv_report(&out, "20240101_120000", &sample_report()).unwrap();
        assert_eq!(path, out.join("result_20240101_120000.csv"));

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Task,Time Taken (s),Memory Usage (MB)");
        assert_eq!(
            lines[1],
            "\"Multi-core Sorting, Matrix Multiplication, and Monte Carlo Simulation\",1.50,12.35"
        );
        assert_eq!(lines[2], "Total Benchmark Time,2.00,13.00");
    }

    #[test]
    fn should_persist_exactly_the_report_rows() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_report();

        let path = write_csv_report(dir.path(), "stamp", &report).unwrap();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .unwrap();
        let written: Vec<Vec<String>> = rdr
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();

        assert_eq!(written, report.rows());
    }

    #[test]
    fn should_fail_when_output_dir_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("results");
        std::fs::write(&blocker, b"not a directory").unwrap();

        assert!(write_csv_report(&blocker, "stamp", &sample_report()).is_err());
    }

    #[test]
    fn should_not_panic_when_csv_reporter_cannot_write() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("results");
        std::fs::write(&blocker, b"x").unwrap();

        let reporter = CsvReporter::new(&blocker);
        reporter.suite_end(&RunInfo::new(2, Reclamation::Disabled), &sample_report());
        assert!(blocker.is_file());
    }

    #[test]
    fn should_write_json_with_run_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let run = RunInfo::new(4, Reclamation::Disabled);

        let path = write_json_report(dir.path(), &run, &sample_report()).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();

        assert_eq!(value["run"]["degree"], 4);
        assert_eq!(value["run"]["reclamation"], "disabled");
        assert_eq!(value["measurements"].as_array().unwrap().len(), 2);
        assert_eq!(value["header"][0], "Task");
    }

    #[test]
    fn should_format_sortable_file_stamp() {
        let stamp = RunInfo::new(1, Reclamation::Disabled).file_stamp();
        assert_eq!(stamp.len(), 15);
        assert_eq!(&stamp[8..9], "_");
        assert!(stamp.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }
}
