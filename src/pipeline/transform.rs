//! Transformer: drain the transform queue, render documents to HTML.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::config::RunConfig;
use crate::render;
use crate::template;
use crate::{log, notice};

use super::WAIT_SLICE;
use super::classify::RENDERED_EXT;
use super::progress::Progress;
use super::queue::WorkQueue;

/// Transform worker: drain until discovery is done and the queue is empty.
///
/// Per-item failures are fatal to the run but do not abandon the queue:
/// the first error is recorded, remaining items are drained unprocessed,
/// and the error is returned once the termination condition holds
/// (drain-then-fail).
pub fn run(queue: &WorkQueue, config: &RunConfig, progress: &Progress) -> Result<()> {
    let mut first_err: Option<anyhow::Error> = None;

    loop {
        while let Some(path) = queue.pop() {
            if first_err.is_some() {
                continue;
            }
            match transform_file(&path, config) {
                Ok(()) => progress.add_transformed(),
                Err(e) => first_err = Some(e),
            }
        }

        // Checked together, re-checked after every drain pass: a
        // last-moment enqueue right before discovery-done is still seen.
        if progress.discovery_done() && queue.is_empty() {
            break;
        }
        queue.wait(WAIT_SLICE);
    }

    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Convert one document: read, render, apply template, mirror, write.
///
/// Also the whole of single-file mode, which is why it is public.
pub fn transform_file(source: &Path, config: &RunConfig) -> Result<()> {
    if !source.is_file() {
        bail!("input file does not exist ({})", source.display());
    }

    let raw = fs::read_to_string(source)
        .with_context(|| format!("failed to read {}", source.display()))?;

    let stem = source.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    let title = stem.replace('_', " ");
    let page = template::apply(&config.template, &title, &render::to_html(&raw));

    let source_dir = source.parent().unwrap_or(Path::new("."));
    let rel_dir = source_dir
        .strip_prefix(&config.input_root)
        .unwrap_or(Path::new(""));
    let out_dir = match &config.output_root {
        Some(out) => out.join(rel_dir),
        None => source_dir.to_path_buf(),
    };

    if !out_dir.exists() {
        notice!(config; "render"; "{}+!> created directory: {}", config.drt(), out_dir.display());
        if !config.dry_run {
            fs::create_dir_all(&out_dir)
                .with_context(|| format!("failed to create {}", out_dir.display()))?;
        }
    }

    let file_name = format!("{stem}.{RENDERED_EXT}");
    let out_file = out_dir.join(&file_name);
    if !config.dry_run {
        fs::write(&out_file, &page)
            .with_context(|| format!("failed to write {}", out_file.display()))?;
    }

    log!("render"; "{}~~> {}, {} bytes", config.drt(), rel_dir.join(file_name).display(), page.len());

    Ok(())
}
