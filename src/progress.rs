//! Progress sinks for long-running workloads.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Set while a `\r`-rewritten progress line is on screen without its newline.
static LINE_OPEN: AtomicBool = AtomicBool::new(false);

/// End an unterminated progress line so status output starts on a fresh line.
///
/// Returns whether a newline was written.
pub fn finish_line() -> bool {
    if LINE_OPEN.swap(false, Ordering::SeqCst) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out);
        out.flush().ok();
        true
    } else {
        false
    }
}

/// Receives progress updates from workloads.
///
/// Callers decide how often to report; implementations render every update
/// they receive. Updates from concurrent workers may interleave.
pub trait Progress: Send + Sync {
    fn update(&self, task: &str, current: usize, total: usize);
}

/// Rewrites a single console line with the completion percentage.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleProgress;

impl ConsoleProgress {
    fn percentage(current: usize, total: usize) -> f64 {
        if total == 0 {
            return 100.0;
        }
        current as f64 / total as f64 * 100.0
    }
}

impl Progress for ConsoleProgress {
    fn update(&self, task: &str, current: usize, total: usize) {
        let mut out = std::io::stdout().lock();
        let _ = write!(
            out,
            "\r{}: {:.2}% complete",
            task,
            Self::percentage(current, total)
        );
        if current + 1 == total {
            let _ = writeln!(out);
            LINE_OPEN.store(false, Ordering::SeqCst);
        } else {
            LINE_OPEN.store(true, Ordering::SeqCst);
        }
        out.flush().ok();
    }
}

/// Discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn update(&self, _task: &str, _current: usize, _total: usize) {}
}

/// One update captured by [`RecordingProgress`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub task: String,
    pub current: usize,
    pub total: usize,
}

/// Keeps every update in memory. Used by tests.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    /// Snapshot of the updates received so far.
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }
}

impl Progress for RecordingProgress {
    fn update(&self, task: &str, current: usize, total: usize) {
        if let Ok(mut events) = self.events.lock() {
            events.push(ProgressEvent {
                task: task.to_string(),
                current,
                total,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_compute_percentage_of_total() {
        assert_eq!(ConsoleProgress::percentage(50, 200), 25.0);
        assert_eq!(ConsoleProgress::percentage(0, 10), 0.0);
    }

    #[test]
    fn should_treat_empty_total_as_complete() {
        assert_eq!(ConsoleProgress::percentage(0, 0), 100.0);
    }

    #[test]
    fn should_close_open_line_once_and_skip_terminated_lines() {
        ConsoleProgress.update("Line", 3, 10);
        assert!(finish_line());
        assert!(!finish_line());

        ConsoleProgress.update("Line", 9, 10);
        assert!(!finish_line());
    }

    #[test]
    fn should_record_updates_in_order() {
        let sink = RecordingProgress::default();
        sink.update("a", 0, 3);
        sink.update("a", 2, 3);
        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].current, 2);
        assert_eq!(events[1].task, "a");
    }
}
