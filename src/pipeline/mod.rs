//! The concurrent conversion pipeline.
//!
//! One discoverer streams classified paths into two disjoint queues; a
//! transformer and a copier drain them independently while a periodic
//! reporter prints live counters. The orchestrator here owns the queues
//! and counters for exactly one run - nothing is process-global, so
//! independent runs never share state.
//!
//! Termination protocol: the discoverer's terminal step (set
//! discovery-done, wake both consumers) moves the run into draining; each
//! consumer exits once it observes discovery-done together with an empty
//! queue; the orchestrator then stops the reporter, prints a final
//! snapshot and aggregates the results.

pub mod classify;
pub mod copy;
pub mod discover;
pub mod progress;
pub mod queue;
pub mod transform;

use std::time::Duration;

use anyhow::{Result, anyhow};
use crossbeam::channel;

use crate::config::RunConfig;
use crate::log;

use progress::{Progress, Snapshot};
use queue::WorkQueues;

pub use transform::transform_file;

/// Upper bound on a consumer's wait before it re-checks discovery-done.
/// The safety net against a missed wake signal.
pub(crate) const WAIT_SLICE: Duration = Duration::from_millis(50);

/// Run the whole pipeline to completion and return the final counters.
///
/// Success only if discovery and every per-item step succeeded; otherwise
/// the first error in lane order (discovery, transform, copy).
pub fn run(config: &RunConfig) -> Result<Snapshot> {
    let queues = WorkQueues::new();
    let progress = Progress::new();

    log_header(config);

    let (stop_tx, stop_rx) = channel::bounded::<()>(1);

    let (discovered, transformed, copied) = std::thread::scope(|s| {
        let discoverer = s.spawn(|| discover::run(config, &queues, &progress));
        let transformer = s.spawn(|| transform::run(&queues.transform, config, &progress));
        let copier = s.spawn(|| copy::run(&queues.copy, config, &progress));
        let reporter = (!config.quiet).then(|| {
            let stop = stop_rx.clone();
            let (progress, queues) = (&progress, &queues);
            s.spawn(move || progress::run_reporter(progress, queues, &stop))
        });

        let discovered = join_worker(discoverer, "discovery");
        let transformed = join_worker(transformer, "transform");
        let copied = join_worker(copier, "copy");

        // Stop the reporter; it prints the final snapshot on its way out.
        stop_tx.send(()).ok();
        if let Some(reporter) = reporter {
            reporter.join().ok();
        }

        (discovered, transformed, copied)
    });

    discovered?;
    transformed?;
    copied?;

    Ok(progress.snapshot())
}

fn log_header(config: &RunConfig) {
    let target = match &config.output_root {
        Some(out) => out.display().to_string(),
        None => "(in place)".to_string(),
    };
    log!(
        "build";
        "{}converting {} -> {}{}",
        config.drt(),
        config.input_root.display(),
        target,
        if config.recurse { " (recursive)" } else { "" }
    );
}

fn join_worker(handle: std::thread::ScopedJoinHandle<'_, Result<()>>, name: &str) -> Result<()> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(anyhow!("{name} worker panicked")),
    }
}
