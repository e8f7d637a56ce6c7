//! Wall-clock and memory sampling around a unit of work.

use crate::memory::MemoryProbe;
use crate::result::Measurement;
use std::time::Instant;

/// Times a closure and takes one memory reading after it returns.
///
/// The reading reflects the whole process at that moment, not the
/// allocations of the measured closure alone.
pub struct Sampler<'a> {
    probe: &'a dyn MemoryProbe,
}

impl<'a> Sampler<'a> {
    pub fn new(probe: &'a dyn MemoryProbe) -> Self {
        Self { probe }
    }

    /// Run `work` once and record it under `label`.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use burnin::{FixedProbe, Sampler};
    /// let probe = FixedProbe(0);
    /// let sampler = Sampler::new(&probe);
    /// let m = sampler.measure("noop", || {});
    /// assert_eq!(m.label, "noop");
    /// ```
    pub fn measure<F>(&self, label: &str, work: F) -> Measurement
    where
        F: FnOnce(),
    {
        let start = Instant::now();
        work();
        let elapsed = start.elapsed();
        let memory_mb = self.probe.megabytes();

        tracing::debug!(
            phase = label,
            elapsed_secs = elapsed.as_secs_f64(),
            memory_mb,
            "phase measured"
        );

        Measurement::new(label, elapsed, memory_mb)
    }

    /// Reading taken at an arbitrary point, for the closing total row.
    pub fn memory_mb(&self) -> f64 {
        self.probe.megabytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::FixedProbe;
    use std::time::Duration;

    #[test]
    fn should_measure_duration_when_called() {
        let probe = FixedProbe(0);
        let sampler = Sampler::new(&probe);
        let m = sampler.measure("sleep", || std::thread::sleep(Duration::from_millis(10)));

        assert_eq!(m.label, "sleep");
        assert!(m.elapsed_secs >= 0.010);
        assert!(m.elapsed_secs < 1.0);
    }

    #[test]
    fn should_sample_memory_after_work() {
        let probe = FixedProbe(2 * 1024 * 1024);
        let sampler = Sampler::new(&probe);
        let m = sampler.measure("noop", || {});
        assert_eq!(m.memory_mb, 2.0);
    }

    #[test]
    fn should_run_work_exactly_once() {
        let probe = FixedProbe(0);
        let sampler = Sampler::new(&probe);
        let mut calls = 0;
        sampler.measure("count", || calls += 1);
        assert_eq!(calls, 1);
    }
}
