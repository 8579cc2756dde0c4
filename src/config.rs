//! Run configuration: input selection, path validation, template resolution.
//!
//! Everything here runs before any worker is spawned. A [`ConfigError`]
//! means the run never started and maps to its own exit code.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::cli::Cli;
use crate::template;

/// Configuration/validation failures detected before the pipeline starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("you must specify some input: --markdown (-m), --file (-f) or --path (-p)")]
    NoInput,

    #[error("you must specify only one kind of input: --markdown (-m), --file (-f) or --path (-p)")]
    ConflictingInputs,

    #[error("--recurse (-r) only works with --path (-p)")]
    RecurseWithoutTree,

    #[error("input path does not exist: {0}")]
    InputPathMissing(PathBuf),

    #[error("output path does not exist: {0}")]
    OutputPathMissing(PathBuf),

    #[error("template not found ({0})")]
    TemplateNotFound(PathBuf),

    #[error("failed to read template {path}: {source}")]
    TemplateUnreadable { path: PathBuf, source: io::Error },
}

/// Which of the three input modes was selected.
#[derive(Debug, Clone)]
pub enum Mode {
    /// Render a markdown string to stdout.
    Raw(String),
    /// Convert a single file.
    File(PathBuf),
    /// Convert a whole directory tree.
    Tree,
}

/// Resolved configuration shared by every worker in one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Input root (absolute). Tree mode: the walked directory.
    /// Other modes: the current directory.
    pub input_root: PathBuf,
    /// Output root (absolute), if one was configured.
    pub output_root: Option<PathBuf>,
    /// Walk subdirectories too, not just direct children.
    pub recurse: bool,
    /// Decide and report everything, change no files.
    pub dry_run: bool,
    /// Suppress per-item skip notices and the progress line.
    pub quiet: bool,
    /// Resolved template text with `{{title}}` and `{{body}}` slots.
    pub template: String,
}

impl RunConfig {
    /// Whether the copy lane is active: an output root is configured and
    /// differs from the input root.
    pub fn copy_enabled(&self) -> bool {
        self.output_root
            .as_deref()
            .is_some_and(|out| out != self.input_root)
    }

    /// Dry-run token prepended to output lines, mirroring the flag.
    pub fn drt(&self) -> &'static str {
        if self.dry_run { "(dry-run)" } else { "" }
    }
}

/// Validate the CLI arguments and resolve them into a [`RunConfig`].
pub fn resolve(cli: &Cli) -> Result<(Mode, RunConfig), ConfigError> {
    let mode = select_mode(cli)?;

    if cli.recurse && !matches!(mode, Mode::Tree) {
        return Err(ConfigError::RecurseWithoutTree);
    }

    let input_root = match (&mode, &cli.path) {
        (Mode::Tree, Some(path)) => {
            if !path.is_dir() {
                return Err(ConfigError::InputPathMissing(path.clone()));
            }
            normalize_path(path)
        }
        _ => current_dir(),
    };

    let output_root = match &cli.output {
        Some(out) => {
            if !out.is_dir() {
                return Err(ConfigError::OutputPathMissing(out.clone()));
            }
            Some(normalize_path(out))
        }
        None => None,
    };

    // Raw mode without an explicit template renders the bare body.
    let no_template = cli.no_template || (matches!(mode, Mode::Raw(_)) && cli.template.is_none());
    let template = resolve_template(no_template, cli.template.as_deref(), &input_root)?;

    let config = RunConfig {
        input_root,
        output_root,
        recurse: cli.recurse,
        dry_run: cli.dry_run,
        quiet: cli.quiet,
        template,
    };

    Ok((mode, config))
}

fn select_mode(cli: &Cli) -> Result<Mode, ConfigError> {
    match (&cli.markdown, &cli.file, &cli.path) {
        (None, None, None) => Err(ConfigError::NoInput),
        (Some(raw), None, None) => Ok(Mode::Raw(raw.clone())),
        (None, Some(file), None) => Ok(Mode::File(file.clone())),
        (None, None, Some(_)) => Ok(Mode::Tree),
        _ => Err(ConfigError::ConflictingInputs),
    }
}

/// Resolve the template text.
///
/// `no_template` wins and yields the bare `{{body}}` slot. Without a
/// template argument the embedded default is used. A given template file is
/// looked up as-is first, then relative to the input root.
fn resolve_template(
    no_template: bool,
    template_arg: Option<&Path>,
    input_root: &Path,
) -> Result<String, ConfigError> {
    let fallback = if no_template {
        template::BARE_TEMPLATE.to_string()
    } else {
        template::DEFAULT_TEMPLATE.to_string()
    };

    let Some(arg) = template_arg else {
        return Ok(fallback);
    };

    let path = if arg.is_file() {
        arg.to_path_buf()
    } else {
        let in_root = input_root.join(arg);
        if !in_root.is_file() {
            return Err(ConfigError::TemplateNotFound(arg.to_path_buf()));
        }
        in_root
    };

    std::fs::read_to_string(&path).map_err(|source| ConfigError::TemplateUnreadable { path, source })
}

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`), falling
/// back to joining with the current directory.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
