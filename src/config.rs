//! Configuration for the harness.

use crate::memory::Reclamation;
use std::path::PathBuf;

/// Configuration for a harness run.
///
/// Workload sizes are deliberately absent; see [`crate::SuiteParams`].
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Directory the CSV (and optional JSON) report is written to.
    pub output_dir: PathBuf,
    /// Print progress and status lines.
    pub verbose: bool,
    /// Also write a JSON copy of the report.
    pub json: bool,
    /// Heap reading mode installed at harness start.
    pub reclamation: Reclamation,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("results"),
            verbose: true,
            json: false,
            reclamation: Reclamation::Disabled,
        }
    }
}

impl HarnessConfig {
    /// Create a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse config from environment variables.
    ///
    /// Supported variables:
    /// - `BENCH_OUTPUT_DIR`: report directory (default: `results`)
    /// - `BENCH_VERBOSE`: console output (default: true)
    /// - `BENCH_JSON`: also write a JSON report (default: false)
    /// - `BENCH_RECLAMATION`: `disabled` or `enabled` (default: disabled)
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("BENCH_OUTPUT_DIR") {
            cfg.output_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("BENCH_VERBOSE") {
            cfg.verbose = env_flag(&v);
        }
        if let Ok(v) = std::env::var("BENCH_JSON") {
            cfg.json = env_flag(&v);
        }
        if let Ok(v) = std::env::var("BENCH_RECLAMATION") {
            match v.parse() {
                Ok(mode) => cfg.reclamation = mode,
                Err(e) => tracing::warn!("ignoring BENCH_RECLAMATION: {}", e),
            }
        }

        cfg
    }

    /// Set the output directory.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }

    /// Set verbose output.
    pub fn verbose(mut self, v: bool) -> Self {
        self.verbose = v;
        self
    }

    /// Enable or disable the JSON report.
    pub fn json(mut self, v: bool) -> Self {
        self.json = v;
        self
    }

    /// Set the heap reading mode.
    pub fn reclamation(mut self, mode: Reclamation) -> Self {
        self.reclamation = mode;
        self
    }
}

fn env_flag(v: &str) -> bool {
    v != "0" && !v.eq_ignore_ascii_case("false")
}
