//! The fixed benchmark suite: phase labels, order and workload sizes.

use crate::progress::Progress;
use crate::strategy::{FanOutPhase, Invocations, Phase};
use crate::workloads;
use std::hint::black_box;

/// Single-worker phase labels, in execution order.
pub const SINGLE_WORKER_LABELS: [&str; 7] = [
    "Single-core Pi Calculation",
    "Single-core Fibonacci Calculation",
    "Single-core Sorting",
    "Single-core Matrix Multiplication",
    "Single-core Monte Carlo Simulation",
    "Single-core Merge Sort",
    "Single-core Mandelbrot Set",
];

/// Fan-out phase labels, in execution order.
pub const FAN_OUT_LABELS: [&str; 3] = [
    "Multi-core Pi and Fibonacci Calculation",
    "Multi-core Sorting, Matrix Multiplication, and Monte Carlo Simulation",
    "Multi-core Merge Sort and Mandelbrot Set",
];

/// Sizes and counts for every workload in the suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteParams {
    /// Outer iterations per pi summation call
    pub pi_iterations: usize,
    /// Pi summation calls in the single-worker phase
    pub pi_repeats: usize,
    pub fibonacci_n: u32,
    /// Fibonacci calls in the single-worker phase
    pub fibonacci_repeats: usize,
    /// Batch of (pi, fibonacci) pairs split across fan-out workers
    pub pi_fibonacci_batch: usize,
    pub sort_len: usize,
    pub matrix_size: usize,
    pub monte_carlo_points: usize,
    pub merge_sort_len: usize,
    pub mandelbrot_width: usize,
    pub mandelbrot_height: usize,
    pub mandelbrot_max_iterations: u32,
}

impl Default for SuiteParams {
    fn default() -> Self {
        Self::standard()
    }
}

impl SuiteParams {
    /// Full-size suite run by the binary.
    pub fn standard() -> Self {
        Self {
            pi_iterations: 20,
            pi_repeats: 5_000,
            fibonacci_n: 35,
            fibonacci_repeats: 5_000,
            pi_fibonacci_batch: 10_000,
            sort_len: 100_000_000,
            matrix_size: 2_000,
            monte_carlo_points: 50_000_000,
            merge_sort_len: 1_000_000,
            mandelbrot_width: 800,
            mandelbrot_height: 600,
            mandelbrot_max_iterations: 1_000,
        }
    }

    /// Every size and count divided by `divisor` (each kept at 1 or more).
    ///
    /// Fibonacci is exponential, so its argument is capped at 20 instead.
    pub fn scaled_down(divisor: usize) -> Self {
        let d = divisor.max(1);
        let s = Self::standard();
        let shrink = |v: usize| (v / d).max(1);
        Self {
            pi_iterations: shrink(s.pi_iterations),
            pi_repeats: shrink(s.pi_repeats),
            fibonacci_n: if d > 1 { s.fibonacci_n.min(20) } else { s.fibonacci_n },
            fibonacci_repeats: shrink(s.fibonacci_repeats),
            pi_fibonacci_batch: shrink(s.pi_fibonacci_batch),
            sort_len: shrink(s.sort_len),
            matrix_size: shrink(s.matrix_size),
            monte_carlo_points: shrink(s.monte_carlo_points),
            merge_sort_len: shrink(s.merge_sort_len),
            mandelbrot_width: shrink(s.mandelbrot_width),
            mandelbrot_height: shrink(s.mandelbrot_height),
            mandelbrot_max_iterations: (s.mandelbrot_max_iterations
                / u32::try_from(d).unwrap_or(u32::MAX))
            .max(1),
        }
    }

    /// Single-worker phases in report order.
    pub fn single_worker_phases<'a>(&'a self, progress: &'a dyn Progress) -> Vec<Phase<'a>> {
        vec![
            Phase::new(SINGLE_WORKER_LABELS[0], move || {
                for _ in 0..self.pi_repeats {
                    black_box(workloads::calculate_pi(self.pi_iterations, progress));
                }
            }),
            Phase::new(SINGLE_WORKER_LABELS[1], move || {
                let total = self.fibonacci_repeats;
                for i in 0..total {
                    black_box(workloads::fibonacci(self.fibonacci_n));
                    if i % 100 == 0 {
                        progress.update("Fibonacci Calculation", i, total);
                    }
                }
            }),
            Phase::new(SINGLE_WORKER_LABELS[2], move || self.sort(progress)),
            Phase::new(SINGLE_WORKER_LABELS[3], move || self.matrix(progress)),
            Phase::new(SINGLE_WORKER_LABELS[4], move || self.monte_carlo(progress)),
            Phase::new(SINGLE_WORKER_LABELS[5], move || self.merge_sort()),
            Phase::new(SINGLE_WORKER_LABELS[6], move || self.mandelbrot()),
        ]
    }

    /// Fan-out phases in report order.
    pub fn fan_out_phases<'a>(&'a self, progress: &'a dyn Progress) -> Vec<FanOutPhase<'a>> {
        vec![
            FanOutPhase::new(
                FAN_OUT_LABELS[0],
                Invocations::Split(self.pi_fibonacci_batch),
                move || {
                    black_box(workloads::calculate_pi(self.pi_iterations, progress));
                    black_box(workloads::fibonacci(self.fibonacci_n));
                },
            ),
            FanOutPhase::new(FAN_OUT_LABELS[1], Invocations::PerWorker(1), move || {
                self.sort(progress);
                self.matrix(progress);
                self.monte_carlo(progress);
            }),
            FanOutPhase::new(FAN_OUT_LABELS[2], Invocations::PerWorker(1), move || {
                self.merge_sort();
                self.mandelbrot();
            }),
        ]
    }

    fn sort(&self, progress: &dyn Progress) {
        let mut values = vec![0i64; self.sort_len];
        workloads::sorting(&mut values, self.sort_len, progress);
        black_box(&values);
    }

    fn matrix(&self, progress: &dyn Progress) {
        workloads::matrix_multiplication(self.matrix_size, progress);
    }

    fn monte_carlo(&self, progress: &dyn Progress) {
        black_box(workloads::monte_carlo(self.monte_carlo_points, progress));
    }

    fn merge_sort(&self) {
        let values = vec![0i64; self.merge_sort_len];
        black_box(workloads::merge_sort(&values));
    }

    fn mandelbrot(&self) {
        black_box(workloads::mandelbrot(
            self.mandelbrot_width,
            self.mandelbrot_height,
            self.mandelbrot_max_iterations,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;

    #[test]
    fn should_list_phases_in_fixed_order() {
        let params = SuiteParams::scaled_down(1_000);
        let single: Vec<_> = params
            .single_worker_phases(&NoProgress)
            .iter()
            .map(|p| p.label)
            .collect();
        let fan_out: Vec<_> = params
            .fan_out_phases(&NoProgress)
            .iter()
            .map(|p| p.label)
            .collect();

        assert_eq!(single, SINGLE_WORKER_LABELS);
        assert_eq!(fan_out, FAN_OUT_LABELS);
    }

    #[test]
    fn should_keep_every_size_positive_when_scaled_down() {
        let p = SuiteParams::scaled_down(usize::MAX);
        assert_eq!(p.sort_len, 1);
        assert_eq!(p.pi_iterations, 1);
        assert_eq!(p.mandelbrot_max_iterations, 1);
        assert!(p.fibonacci_n <= 20);
    }

    #[test]
    fn should_match_standard_when_divisor_is_one() {
        assert_eq!(SuiteParams::scaled_down(1), SuiteParams::standard());
        assert_eq!(SuiteParams::default().sort_len, 100_000_000);
    }

    #[test]
    fn should_split_pi_fibonacci_batch_and_run_others_once_per_worker() {
        let params = SuiteParams::standard();
        let phases = params.fan_out_phases(&NoProgress);
        assert_eq!(phases[0].invocations, Invocations::Split(10_000));
        assert_eq!(phases[1].invocations, Invocations::PerWorker(1));
        assert_eq!(phases[2].invocations, Invocations::PerWorker(1));
    }
}
