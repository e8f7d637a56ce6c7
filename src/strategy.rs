//! Single-worker and fan-out execution of benchmark phases.

use crate::report::Reporter;
use crate::result::Measurement;
use crate::sampler::Sampler;
use std::num::NonZeroUsize;
use std::thread;

/// A labelled unit of work run once on the calling thread.
pub struct Phase<'a> {
    pub label: &'static str,
    work: Box<dyn Fn() + Sync + 'a>,
}

impl<'a> Phase<'a> {
    pub fn new(label: &'static str, work: impl Fn() + Sync + 'a) -> Self {
        Self {
            label,
            work: Box::new(work),
        }
    }
}

/// How many invocations of a fan-out phase each worker runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocations {
    /// Split a batch across workers. The remainder of `total / degree` is dropped.
    Split(usize),
    /// Every worker runs this many invocations.
    PerWorker(usize),
}

impl Invocations {
    /// Invocations assigned to a single worker.
    pub fn share(self, degree: usize) -> usize {
        match self {
            Invocations::Split(total) => total / degree.max(1),
            Invocations::PerWorker(n) => n,
        }
    }
}

/// A labelled unit of work replicated across concurrent workers.
pub struct FanOutPhase<'a> {
    pub label: &'static str,
    pub invocations: Invocations,
    work: Box<dyn Fn() + Sync + 'a>,
}

impl<'a> FanOutPhase<'a> {
    pub fn new(label: &'static str, invocations: Invocations, work: impl Fn() + Sync + 'a) -> Self {
        Self {
            label,
            invocations,
            work: Box::new(work),
        }
    }
}

/// Number of hardware execution units, at least 1.
pub fn available_degree() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Run every phase in order on this thread, one measurement each.
pub fn single_worker(
    sampler: &Sampler<'_>,
    reporter: &dyn Reporter,
    phases: &[Phase<'_>],
) -> Vec<Measurement> {
    phases
        .iter()
        .map(|phase| {
            let m = sampler.measure(phase.label, || (phase.work)());
            reporter.phase_end(&m);
            m
        })
        .collect()
}

/// Spawn `degree` scoped workers, each calling `work` `share` times in a row.
///
/// Returns once every worker has finished, with the number of invocations
/// performed (`degree * share`).
pub fn fan_out(degree: usize, share: usize, work: &(dyn Fn() + Sync)) -> usize {
    let degree = degree.max(1);
    thread::scope(|s| {
        for _ in 0..degree {
            s.spawn(move || {
                for _ in 0..share {
                    work();
                }
            });
        }
    });
    degree * share
}

/// Run every fan-out phase in order, one measurement per phase covering
/// spawn to completion of the slowest worker.
pub fn parallel(
    sampler: &Sampler<'_>,
    reporter: &dyn Reporter,
    degree: usize,
    phases: &[FanOutPhase<'_>],
) -> Vec<Measurement> {
    phases
        .iter()
        .map(|phase| {
            let share = phase.invocations.share(degree);
            tracing::debug!(phase = phase.label, degree, share, "fanning out");
            let m = sampler.measure(phase.label, || {
                fan_out(degree, share, phase.work.as_ref());
            });
            reporter.phase_end(&m);
            m
        })
        .collect()
}
