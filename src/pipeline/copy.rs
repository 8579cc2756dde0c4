//! Copier: drain the copy queue, mirror assets into the output tree.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::config::RunConfig;
use crate::{log, notice};

use super::WAIT_SLICE;
use super::progress::Progress;
use super::queue::WorkQueue;

/// Copy worker: same drain/terminate discipline as the transformer.
///
/// When no output root is configured the discoverer never populates this
/// queue, so the worker just observes discovery-done and returns.
pub fn run(queue: &WorkQueue, config: &RunConfig, progress: &Progress) -> Result<()> {
    let mut first_err: Option<anyhow::Error> = None;

    loop {
        while let Some(path) = queue.pop() {
            if first_err.is_some() {
                continue;
            }
            match copy_file(&path, config) {
                Ok(CopyOutcome::Copied) => progress.add_copied(),
                Ok(CopyOutcome::SkippedSubsite) => {}
                Err(e) => first_err = Some(e),
            }
        }

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

/// What happened to one copy item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CopyOutcome {
    Copied,
    /// The source already lives under the output tree; copying it again
    /// would feed the tool its own output.
    SkippedSubsite,
}

/// Mirror one asset to the output tree, overwriting any existing file.
fn copy_file(source: &Path, config: &RunConfig) -> Result<CopyOutcome> {
    let Some(output_root) = config.output_root.as_deref() else {
        // The discoverer only enqueues copy items when an output root is
        // configured.
        bail!("copy item without an output root: {}", source.display());
    };

    let rel = source
        .strip_prefix(&config.input_root)
        .with_context(|| format!("{} is outside the input root", source.display()))?;

    let source_dir = source.parent().unwrap_or(Path::new(""));
    if source_dir.starts_with(output_root) {
        notice!(config; "copy"; "{}xx> (skipped:subsite) {}", config.drt(), rel.display());
        return Ok(CopyOutcome::SkippedSubsite);
    }

    log!("copy"; "{}++> {}", config.drt(), rel.display());

    if !config.dry_run {
        let target = output_root.join(rel);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::copy(source, &target).with_context(|| {
            format!("failed to copy {} to {}", source.display(), target.display())
        })?;
    }

    Ok(CopyOutcome::Copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn config(root: &Path, output: PathBuf, dry_run: bool) -> RunConfig {
        RunConfig {
            input_root: root.canonicalize().unwrap(),
            output_root: Some(output),
            recurse: true,
            dry_run,
            quiet: true,
            template: template::BARE_TEMPLATE.to_string(),
        }
    }

    #[test]
    fn test_copy_mirrors_relative_path() {
        let dir = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("img")).unwrap();
        fs::write(dir.path().join("img/logo.png"), "png bytes").unwrap();

        let cfg = config(dir.path(), out.path().canonicalize().unwrap(), false);
        let outcome = copy_file(&cfg.input_root.join("img/logo.png"), &cfg).unwrap();

        assert_eq!(outcome, CopyOutcome::Copied);
        let copied = fs::read(out.path().join("img/logo.png")).unwrap();
        assert_eq!(copied, b"png bytes");
    }

    #[test]
    fn test_copy_overwrites_existing_target() {
        let dir = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "new").unwrap();
        fs::write(out.path().join("b.txt"), "old").unwrap();

        let cfg = config(dir.path(), out.path().canonicalize().unwrap(), false);
        copy_file(&cfg.input_root.join("b.txt"), &cfg).unwrap();

        assert_eq!(fs::read_to_string(out.path().join("b.txt")).unwrap(), "new");
    }

    #[test]
    fn test_subsite_sources_are_skipped() {
        let dir = TempDir::new().unwrap();
        let out_dir = dir.path().join("out");
        fs::create_dir_all(&out_dir).unwrap();
        fs::write(out_dir.join("stale.txt"), "generated earlier").unwrap();

        let cfg = config(dir.path(), out_dir.canonicalize().unwrap(), false);
        let outcome = copy_file(&cfg.input_root.join("out/stale.txt"), &cfg).unwrap();

        assert_eq!(outcome, CopyOutcome::SkippedSubsite);
    }

    #[test]
    fn test_dry_run_copies_nothing_but_reports_copied() {
        let dir = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();

        let cfg = config(dir.path(), out.path().canonicalize().unwrap(), true);
        let outcome = copy_file(&cfg.input_root.join("b.txt"), &cfg).unwrap();

        assert_eq!(outcome, CopyOutcome::Copied);
        assert!(!out.path().join("b.txt").exists());
    }

    #[test]
    fn test_worker_counts_copies() {
        let dir = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();

        let cfg = config(dir.path(), out.path().canonicalize().unwrap(), false);
        let queue = WorkQueue::new();
        let progress = Progress::new();
        queue.push(cfg.input_root.join("a.txt"));
        queue.push(cfg.input_root.join("b.txt"));
        progress.finish_discovery();

        run(&queue, &cfg, &progress).unwrap();

        assert_eq!(progress.snapshot().copied, 2);
        assert!(out.path().join("a.txt").exists());
        assert!(out.path().join("b.txt").exists());
    }

    #[test]
    fn test_worker_records_first_error_and_drains() {
        let dir = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();

        let cfg = config(dir.path(), out.path().canonicalize().unwrap(), false);
        let queue = WorkQueue::new();
        let progress = Progress::new();
        queue.push(cfg.input_root.join("ghost.txt"));
        queue.push(cfg.input_root.join("b.txt"));
        progress.finish_discovery();

        let err = run(&queue, &cfg, &progress).unwrap_err();
        assert!(err.to_string().contains("ghost.txt"));
        assert!(queue.is_empty());
        assert_eq!(progress.snapshot().copied, 0);
    }
}
