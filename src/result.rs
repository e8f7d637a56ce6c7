//! Measurement and report types.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Column headers of every report, in order.
pub const HEADER: [&str; 3] = ["Task", "Time Taken (s)", "Memory Usage (MB)"];

/// Label of the closing row.
pub const TOTAL_LABEL: &str = "Total Benchmark Time";

/// One measured phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Phase label, e.g. "Single-core Sorting"
    pub label: String,
    /// Wall-clock seconds spent in the phase
    pub elapsed_secs: f64,
    /// Memory reading taken right after the phase, in MB
    pub memory_mb: f64,
}

impl Measurement {
    pub fn new(label: impl Into<String>, elapsed: Duration, memory_mb: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_secs: elapsed.as_secs_f64(),
            memory_mb,
        }
    }

    /// Tabular form: label, seconds and megabytes with two decimals.
    pub fn to_record(&self) -> [String; 3] {
        [
            self.label.clone(),
            format!("{:.2}", self.elapsed_secs),
            format!("{:.2}", self.memory_mb),
        ]
    }
}

/// Ordered measurements of one harness run.
///
/// Rows keep insertion order: single-worker phases, fan-out phases, then the
/// total row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    measurements: Vec<Measurement>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, measurement: Measurement) {
        self.measurements.push(measurement);
    }

    pub fn extend(&mut self, measurements: impl IntoIterator<Item = Measurement>) {
        self.measurements.extend(measurements);
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Number of data rows (header excluded).
    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.measurements.iter().map(|m| m.label.as_str()).collect()
    }

    /// The closing total row, if it has been recorded.
    pub fn total(&self) -> Option<&Measurement> {
        self.measurements.last().filter(|m| m.label == TOTAL_LABEL)
    }

    /// Header row followed by one record per measurement.
    pub fn rows(&self) -> Vec<Vec<String>> {
        std::iter::once(HEADER.iter().map(|h| h.to_string()).collect())
            .chain(self.measurements.iter().map(|m| m.to_record().to_vec()))
            .collect()
    }
}
