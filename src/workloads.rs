//! Synthetic CPU- and memory-bound workloads.
//!
//! Every function here takes only sizes and counts, performs no I/O and owns
//! all of its data, so any of them can run on several threads at once. The
//! only side channel is the [`Progress`] sink, which never influences the
//! computed value.

use crate::progress::Progress;
use rand::Rng;
use std::f64::consts::PI;
use std::hint::black_box;

/// Inner loop length of [`calculate_pi`].
pub const PI_POINTS: usize = 1_000_000;

/// Sort `values` in place with the standard library's O(n log n) sort.
///
/// Afterwards walks `total` progress units, emitting every 100th.
pub fn sorting(values: &mut [i64], total: usize, progress: &dyn Progress) {
    values.sort_unstable();
    for i in (0..total).step_by(100) {
        progress.update("Sorting", i, total);
    }
}

/// Recursive top-down merge sort returning a freshly allocated vector.
pub fn merge_sort(values: &[i64]) -> Vec<i64> {
    if values.len() < 2 {
        return values.to_vec();
    }
    let mid = values.len() / 2;
    let left = merge_sort(&values[..mid]);
    let right = merge_sort(&values[mid..]);
    merge(&left, &right)
}

fn merge(left: &[i64], right: &[i64]) -> Vec<i64> {
    let mut out = Vec::with_capacity(left.len() + right.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        if left[i] <= right[j] {
            out.push(left[i]);
            i += 1;
        } else {
            out.push(right[j]);
            j += 1;
        }
    }
    out.extend_from_slice(&left[i..]);
    out.extend_from_slice(&right[j..]);
    out
}

/// Naive doubly recursive Fibonacci. Exponential on purpose.
pub fn fibonacci(n: u32) -> u64 {
    match n {
        0 => 0,
        1 => 1,
        _ => fibonacci(n - 1) + fibonacci(n - 2),
    }
}

/// Estimate π from `points` uniform samples in the unit square.
pub fn monte_carlo(points: usize, progress: &dyn Progress) -> f64 {
    if points == 0 {
        return 0.0;
    }
    let mut rng = rand::thread_rng();
    let mut inside = 0usize;
    for i in 0..points {
        let x: f64 = rng.gen();
        let y: f64 = rng.gen();
        if x * x + y * y <= 1.0 {
            inside += 1;
        }
        if i % 100_000 == 0 {
            progress.update("Monte Carlo Simulation", i, points);
        }
    }
    4.0 * inside as f64 / points as f64
}

/// Multiply two random `size`×`size` matrices with the textbook triple loop.
///
/// The product is discarded.
pub fn matrix_multiplication(size: usize, progress: &dyn Progress) {
    let mut rng = rand::thread_rng();
    let a: Vec<Vec<f64>> = (0..size)
        .map(|_| (0..size).map(|_| rng.gen()).collect())
        .collect();
    let b: Vec<Vec<f64>> = (0..size)
        .map(|_| (0..size).map(|_| rng.gen()).collect())
        .collect();
    let mut product = vec![vec![0.0f64; size]; size];

    for i in 0..size {
        for j in 0..size {
            let mut sum = 0.0;
            for k in 0..size {
                sum += a[i][k] * b[k][j];
            }
            product[i][j] = sum;
        }
        if i % 10 == 0 {
            progress.update("Matrix Multiplication", i, size);
        }
    }
    black_box(&product);
}

/// Escape-time iteration counts for a `width`×`height` grid over
/// re ∈ [-2.5, 1.0], im ∈ [-1.0, 1.0].
///
/// Rows are indexed by `y`, so `grid[y][x]` is the pixel at column `x`.
pub fn mandelbrot(width: usize, height: usize, max_iterations: u32) -> Vec<Vec<u32>> {
    let mut grid = Vec::with_capacity(height);
    for y in 0..height {
        let mut row = Vec::with_capacity(width);
        let ci = y as f64 / height as f64 * 2.0 - 1.0;
        for x in 0..width {
            let cr = x as f64 / width as f64 * 3.5 - 2.5;
            let (mut zr, mut zi) = (0.0f64, 0.0f64);
            let mut iterations = 0;
            while zr * zr + zi * zi < 4.0 && iterations < max_iterations {
                let next_r = zr * zr - zi * zi + cr;
                zi = 2.0 * zr * zi + ci;
                zr = next_r;
                iterations += 1;
            }
            row.push(iterations);
        }
        grid.push(row);
    }
    grid
}

/// Add π/[`PI_POINTS`] to an accumulator [`PI_POINTS`] times, `iterations` times over.
///
/// Pure floating-point throughput; allocates nothing. Progress every 10
/// outer iterations.
pub fn calculate_pi(iterations: usize, progress: &dyn Progress) -> f64 {
    let step = PI / PI_POINTS as f64;
    let mut pi = 0.0f64;
    for i in 0..iterations {
        for _ in 0..PI_POINTS {
            pi = black_box(pi + step);
        }
        if i % 10 == 0 {
            progress.update("Pi Calculation", i, iterations);
        }
    }
    pi
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{NoProgress, RecordingProgress};

    fn is_non_decreasing(v: &[i64]) -> bool {
        v.windows(2).all(|w| w[0] <= w[1])
    }

    fn sample_input(n: usize) -> Vec<i64> {
        let mut rng = rand::thread_rng();
        (0..n).map(|_| rng.gen_range(-1000..1000)).collect()
    }

    #[test]
    fn should_sort_in_place_preserving_values() {
        for n in [0, 1, 2, 7, 100, 1_000] {
            let input = sample_input(n);
            let mut sorted = input.clone();
            sorting(&mut sorted, n, &NoProgress);

            assert!(is_non_decreasing(&sorted));
            let mut expected = input;
            expected.sort();
            assert_eq!(sorted, expected);
        }
    }

    #[test]
    fn should_merge_sort_into_same_multiset() {
        for n in [0, 1, 2, 3, 64, 1_001] {
            let input = sample_input(n);
            let sorted = merge_sort(&input);

            assert_eq!(sorted.len(), input.len());
            assert!(is_non_decreasing(&sorted));
            let mut expected = input.clone();
            expected.sort();
            assert_eq!(sorted, expected);
        }
    }

    #[test]
    fn should_return_equal_sequence_when_merge_sorting_sorted_input() {
        let once = merge_sort(&sample_input(500));
        assert_eq!(merge_sort(&once), once);
    }

    #[test]
    fn should_follow_fibonacci_recurrence() {
        assert_eq!(fibonacci(0), 0);
        assert_eq!(fibonacci(1), 1);
        for n in 2..25 {
            assert_eq!(fibonacci(n), fibonacci(n - 1) + fibonacci(n - 2));
        }
        assert_eq!(fibonacci(20), 6765);
    }

    #[test]
    fn should_estimate_pi_within_tolerance_for_large_sample() {
        let estimate = monte_carlo(10_000_000, &NoProgress);
        assert!((estimate - PI).abs() < 0.01, "estimate was {estimate}");
    }

    #[test]
    fn should_bound_mandelbrot_iterations() {
        let max = 200;
        let grid = mandelbrot(64, 48, max);
        assert_eq!(grid.len(), 48);
        assert!(grid.iter().all(|row| row.len() == 64));
        assert!(grid.iter().flatten().all(|&n| n <= max));
    }

    #[test]
    fn should_reach_max_iterations_inside_the_set() {
        // x = 4/7 of the width maps to re = -0.5, y = h/2 maps to im = 0.
        let (w, h, max) = (70, 40, 1_000);
        let grid = mandelbrot(w, h, max);
        assert_eq!(grid[h / 2][w * 4 / 7], max);
        // Far corner escapes immediately.
        assert!(grid[0][0] < 5);
    }

    #[test]
    fn should_accumulate_pi_per_outer_iteration() {
        let pi = calculate_pi(2, &NoProgress);
        assert!((pi - 2.0 * PI).abs() < 1e-6, "got {pi}");
    }

    #[test]
    fn should_report_progress_without_changing_result() {
        let recorder = RecordingProgress::default();
        let with = calculate_pi(21, &recorder);
        let without = calculate_pi(21, &NoProgress);
        assert_eq!(with, without);

        let currents: Vec<usize> = recorder.events().iter().map(|e| e.current).collect();
        assert_eq!(currents, vec![0, 10, 20]);
    }

    #[test]
    fn should_throttle_sorting_progress_every_hundred_units() {
        let recorder = RecordingProgress::default();
        let mut values = vec![3, 1, 2];
        sorting(&mut values, 250, &recorder);
        let currents: Vec<usize> = recorder.events().iter().map(|e| e.current).collect();
        assert_eq!(currents, vec![0, 100, 200]);
    }

    #[test]
    fn should_multiply_empty_and_small_matrices() {
        matrix_multiplication(0, &NoProgress);
        let recorder = RecordingProgress::default();
        matrix_multiplication(12, &recorder);
        assert_eq!(recorder.events().len(), 2);
    }
}
