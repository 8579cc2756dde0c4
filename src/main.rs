//! Cartwheel - turn a tree of markdown into a tree of html, concurrently.

mod cli;
mod config;
mod logger;
mod pipeline;
mod render;
mod template;

use std::process::ExitCode;

use anyhow::Result;
use clap::{ColorChoice, Parser};

use cli::Cli;
use config::{Mode, RunConfig};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let (mode, config) = match config::resolve(&cli) {
        Ok(resolved) => resolved,
        Err(e) => {
            logger::error(&e.to_string());
            return ExitCode::from(2);
        }
    };

    match run(&mode, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(mode: &Mode, config: &RunConfig) -> Result<()> {
    match mode {
        Mode::Raw(raw) => render_raw(raw, config),
        Mode::File(file) => pipeline::transform_file(&config::normalize_path(file), config),
        Mode::Tree => pipeline::run(config).map(|_| ()),
    }
}

/// Raw mode: render a markdown string straight to stdout.
///
/// Shells make it hard to pass real newlines, so literal `\r\n` and `\n`
/// sequences in the argument are unescaped first.
fn render_raw(raw: &str, config: &RunConfig) -> Result<()> {
    let text = raw.replace("\\r\\n", "\\n").replace("\\n", "\n");
    let page = template::apply(&config.template, "", &render::to_html(&text));
    println!("{}{}", config.drt(), page);
    Ok(())
}
