//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Cartwheel markdown-to-html converter CLI
///
/// Exactly one input must be given: `--markdown`, `--file` or `--path`.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Raw markdown to render straight to stdout
    #[arg(short, long)]
    pub markdown: Option<String>,

    /// Single input file to convert
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Input directory tree to convert
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub path: Option<PathBuf>,

    /// Recurse into subdirectories (tree mode only)
    #[arg(short, long)]
    pub recurse: bool,

    /// Output directory (input tree is mirrored underneath)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Template file with {{title}} and {{body}} slots
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub template: Option<PathBuf>,

    /// Render without any template (bare body)
    #[arg(short, long)]
    pub no_template: bool,

    /// Dry run: decide and report everything, change no files
    #[arg(short, long)]
    pub dry_run: bool,

    /// Less noise: suppress per-item skip notices and the progress line
    #[arg(short, long)]
    pub quiet: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,
}
