//! Work queues shared between the discoverer and its consumers.
//!
//! Each queue is a lock-free FIFO paired with a wait/wake signal. The
//! signal is a latency optimization only: consumers always wait with a
//! bounded timeout and re-check the discovery-done flag, so a missed
//! notification can never hang a worker.

use std::path::PathBuf;
use std::time::Duration;

use crossbeam::queue::SegQueue;
use parking_lot::{Condvar, Mutex};

/// Unbounded concurrent FIFO of discovered file paths.
///
/// Single producer (the discoverer), single consumer per queue. Pushes are
/// lock-free; the mutex exists only to park a consumer that found the queue
/// empty.
pub struct WorkQueue {
    items: SegQueue<PathBuf>,
    gate: Mutex<()>,
    available: Condvar,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self {
            items: SegQueue::new(),
            gate: Mutex::new(()),
            available: Condvar::new(),
        }
    }

    /// Enqueue a path and wake a waiting consumer.
    pub fn push(&self, path: PathBuf) {
        self.items.push(path);
        self.available.notify_one();
    }

    /// Dequeue the oldest path, if any.
    pub fn pop(&self) -> Option<PathBuf> {
        self.items.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current queue depth (advisory, for the progress display).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Park until new work may be available, or the timeout elapses.
    ///
    /// Returns immediately when the queue is non-empty. The caller must
    /// re-check its exit condition afterwards either way.
    pub fn wait(&self, timeout: Duration) {
        let mut gate = self.gate.lock();
        if !self.items.is_empty() {
            return;
        }
        let _ = self.available.wait_for(&mut gate, timeout);
    }

    /// Wake every waiting consumer (the producer's terminal release step).
    pub fn wake_all(&self) {
        self.available.notify_all();
    }
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// The two disjoint queues of one pipeline run.
///
/// Owned by the orchestrator invocation and passed to the workers, so
/// independent runs (and tests) never share state.
pub struct WorkQueues {
    pub transform: WorkQueue,
    pub copy: WorkQueue,
}

impl WorkQueues {
    pub fn new() -> Self {
        Self {
            transform: WorkQueue::new(),
            copy: WorkQueue::new(),
        }
    }
}

impl Default for WorkQueues {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_fifo_order() {
        let queue = WorkQueue::new();
        queue.push(PathBuf::from("/a"));
        queue.push(PathBuf::from("/b"));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some(PathBuf::from("/a")));
        assert_eq!(queue.pop(), Some(PathBuf::from("/b")));
        assert_eq!(queue.pop(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_wait_returns_immediately_when_non_empty() {
        let queue = WorkQueue::new();
        queue.push(PathBuf::from("/a"));
        let start = Instant::now();
        queue.wait(Duration::from_secs(5));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_wait_times_out_on_empty_queue() {
        let queue = WorkQueue::new();
        let start = Instant::now();
        queue.wait(Duration::from_millis(20));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_push_wakes_waiting_consumer() {
        let queue = WorkQueue::new();
        std::thread::scope(|s| {
            let consumer = s.spawn(|| {
                loop {
                    if let Some(path) = queue.pop() {
                        return path;
                    }
                    queue.wait(Duration::from_millis(50));
                }
            });
            std::thread::sleep(Duration::from_millis(10));
            queue.push(PathBuf::from("/woken"));
            assert_eq!(consumer.join().unwrap(), PathBuf::from("/woken"));
        });
    }

    #[test]
    fn test_wake_all_releases_parked_consumer() {
        let queue = WorkQueue::new();
        std::thread::scope(|s| {
            let consumer = s.spawn(|| {
                let start = Instant::now();
                queue.wait(Duration::from_secs(5));
                start.elapsed()
            });
            std::thread::sleep(Duration::from_millis(20));
            queue.wake_all();
            assert!(consumer.join().unwrap() < Duration::from_secs(4));
        });
    }
}
