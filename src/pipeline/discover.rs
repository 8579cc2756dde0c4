//! Discovery: walk the input tree, classify every file, feed the queues.
//!
//! The discoverer is the sole producer for both queues. Whatever happens
//! during enumeration, its terminal step runs exactly once: set the
//! discovery-done flag, then wake both consumers, so no worker can stay
//! parked on an empty queue forever.

use std::path::Path;

use anyhow::{Context, Result};
use jwalk::WalkDir;

use crate::config::RunConfig;
use crate::notice;

use super::classify::{Classification, classify};
use super::progress::Progress;
use super::queue::WorkQueues;

/// Walk the input root and enqueue every classified file.
///
/// The terminal release step runs on every exit path, including
/// enumeration errors, before the error propagates.
pub fn run(config: &RunConfig, queues: &WorkQueues, progress: &Progress) -> Result<()> {
    let result = walk(config, queues, progress);

    progress.finish_discovery();
    queues.transform.wake_all();
    queues.copy.wake_all();

    result
}

fn walk(config: &RunConfig, queues: &WorkQueues, progress: &Progress) -> Result<()> {
    let root = &config.input_root;

    if config.recurse {
        // Hidden entries are walked too; exclusion is classification's
        // job, and they must still be counted as seen.
        for entry in WalkDir::new(root).skip_hidden(false) {
            let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
            if entry.file_type().is_file() {
                dispatch(entry.path(), config, queues, progress);
            }
        }
    } else {
        let entries = std::fs::read_dir(root)
            .with_context(|| format!("failed to list {}", root.display()))?;
        for entry in entries {
            let entry = entry.with_context(|| format!("failed to list {}", root.display()))?;
            let path = entry.path();
            if path.is_file() {
                dispatch(path, config, queues, progress);
            }
        }
    }

    Ok(())
}

/// Route one discovered file to its lane.
fn dispatch(path: std::path::PathBuf, config: &RunConfig, queues: &WorkQueues, progress: &Progress) {
    progress.add_seen();

    match classify(&path, config.copy_enabled()) {
        Classification::Transform => {
            progress.add_queued_transform();
            queues.transform.push(path);
        }
        Classification::Copy => {
            progress.add_queued_copy();
            queues.copy.push(path);
        }
        Classification::Skip => {
            let rel = relative(&path, &config.input_root);
            notice!(config; "walk"; "{}xx> (skipped) {}", config.drt(), rel.display());
        }
    }
}

fn relative<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}
