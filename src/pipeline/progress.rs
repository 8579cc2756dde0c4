//! Progress accounting and the periodic reporter.
//!
//! Counters are plain atomics incremented by whichever worker did the work.
//! Readers take a snapshot that may mix moments in time; the display is
//! advisory, so cross-counter ordering is not guaranteed and not needed.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use crossbeam::channel::{Receiver, RecvTimeoutError};

use crate::logger::StatusLine;

use super::queue::WorkQueues;

/// Refresh interval of the status line.
pub const TICK: Duration = Duration::from_millis(200);

/// Shared progress counters for one pipeline run.
///
/// All counters are monotone. `discovery_done` transitions false to true
/// exactly once and never reverts.
pub struct Progress {
    seen: AtomicUsize,
    to_transform: AtomicUsize,
    transformed: AtomicUsize,
    to_copy: AtomicUsize,
    copied: AtomicUsize,
    discovery_done: AtomicBool,
}

impl Progress {
    pub fn new() -> Self {
        Self {
            seen: AtomicUsize::new(0),
            to_transform: AtomicUsize::new(0),
            transformed: AtomicUsize::new(0),
            to_copy: AtomicUsize::new(0),
            copied: AtomicUsize::new(0),
            discovery_done: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn add_seen(&self) {
        self.seen.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_queued_transform(&self) {
        self.to_transform.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_transformed(&self) {
        self.transformed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_queued_copy(&self) {
        self.to_copy.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_copied(&self) {
        self.copied.fetch_add(1, Ordering::Relaxed);
    }

    /// Mark discovery finished. Part of the discoverer's terminal step;
    /// consumers treat this flag, not the wake signal, as the source of
    /// truth for termination.
    pub fn finish_discovery(&self) {
        self.discovery_done.store(true, Ordering::SeqCst);
    }

    pub fn discovery_done(&self) -> bool {
        self.discovery_done.load(Ordering::SeqCst)
    }

    /// Take a point-in-time reading of all counters.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            seen: self.seen.load(Ordering::Relaxed),
            to_transform: self.to_transform.load(Ordering::Relaxed),
            transformed: self.transformed.load(Ordering::Relaxed),
            to_copy: self.to_copy.load(Ordering::Relaxed),
            copied: self.copied.load(Ordering::Relaxed),
            discovery_done: self.discovery_done(),
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time reading of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub seen: usize,
    pub to_transform: usize,
    pub transformed: usize,
    pub to_copy: usize,
    pub copied: usize,
    pub discovery_done: bool,
}

impl Snapshot {
    /// Format the six counters plus live queue depths for the status line.
    ///
    /// Example: `seen(12) render(3/5) copy(2/7) queue(2|5) [walking]`
    pub fn status_line(&self, transform_depth: usize, copy_depth: usize) -> String {
        let walk = if self.discovery_done { "done" } else { "walking" };
        format!(
            "seen({}) render({}/{}) copy({}/{}) queue({}|{}) [{walk}]",
            self.seen,
            self.transformed,
            self.to_transform,
            self.copied,
            self.to_copy,
            transform_depth,
            copy_depth,
        )
    }
}

/// Periodic reporter: refresh the status line every [`TICK`] until the
/// orchestrator signals stop, then leave a final snapshot on screen.
pub fn run_reporter(progress: &Progress, queues: &WorkQueues, stop: &Receiver<()>) {
    let line = StatusLine::new();
    loop {
        match stop.recv_timeout(TICK) {
            Err(RecvTimeoutError::Timeout) => {
                let snap = progress.snapshot();
                line.update(&snap.status_line(queues.transform.len(), queues.copy.len()));
            }
            // Stop requested, or the orchestrator dropped the sender.
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    let snap = progress.snapshot();
    line.finish(&snap.status_line(queues.transform.len(), queues.copy.len()));
}
