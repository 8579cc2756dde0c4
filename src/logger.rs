//! Logging utilities with colored output and an in-place status line.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `notice!` macro for per-item chatter that the run's quiet flag
//!   suppresses
//! - `StatusLine` for a single overwriting progress line
//!
//! # Example
//!
//! ```ignore
//! log!("render"; "~~> posts/hello.html, {} bytes", len);
//! notice!(config; "walk"; "xx> (skipped) {}", rel.display());
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{Write, stderr, stdout},
    sync::atomic::{AtomicUsize, Ordering},
};

/// Active status line count (for log coordination)
static BAR_COUNT: AtomicUsize = AtomicUsize::new(0);

// ============================================================================
// Log Macros
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a per-item notice, suppressed when the given config's quiet flag
/// is set
///
/// # Usage
/// ```ignore
/// notice!(config; "copy"; "xx> (skipped:subsite) {}", rel.display());
/// ```
#[macro_export]
macro_rules! notice {
    ($config:expr; $module:expr; $($arg:tt)*) => {{
        if !$config.quiet {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
#[allow(clippy::cast_possible_truncation)] // Safe: bar count is always small
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);

    let mut stdout = stdout().lock();

    let bar_count = BAR_COUNT.load(Ordering::SeqCst);
    if bar_count > 0 {
        execute!(stdout, cursor::MoveUp(bar_count as u16)).ok();
        execute!(stdout, Clear(ClearType::FromCursorDown)).ok();
    } else {
        execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    }

    writeln!(stdout, "{prefix} {message}").ok();

    if bar_count > 0 {
        for _ in 0..bar_count {
            writeln!(stdout).ok();
        }
    }

    stdout.flush().ok();
}

/// Log an error to stderr, distinct from the progress stream
pub fn error(message: &str) {
    let prefix = format!("{}", "[error]".bright_red().bold());
    let mut stderr = stderr().lock();
    writeln!(stderr, "{prefix} {message}").ok();
    stderr.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str) -> String {
    let prefix = format!("[{module}]");
    match module {
        "walk" => prefix.bright_green().bold().to_string(),
        "copy" => prefix.bright_blue().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Status Line (single overwriting line)
// ============================================================================

/// Single-line status display updated in place
///
/// Displays one line such as `[build] seen(42) render(3/5) copy(2/7)` that
/// is rewritten on each update. Regular `log!` output moves above it.
/// Uses `try_lock` so concurrent updates never block a worker - if the
/// display is busy, the refresh is skipped
///
/// # Example
///
/// ```ignore
/// let status = StatusLine::new();
/// status.update("seen(1) render(0/1)");
/// drop(status); // clears the line
/// ```
pub struct StatusLine {
    lock: Mutex<()>,
}

impl StatusLine {
    /// Create a new status line and reserve the bottom row for it.
    pub fn new() -> Self {
        BAR_COUNT.store(1, Ordering::SeqCst);
        let mut stdout = stdout().lock();
        writeln!(stdout).ok();
        stdout.flush().ok();
        Self {
            lock: Mutex::new(()),
        }
    }

    /// Rewrite the status line in place.
    ///
    /// Non-blocking: if the display lock is held, skips the refresh.
    pub fn update(&self, line: &str) {
        let Some(_guard) = self.lock.try_lock() else {
            return;
        };
        let prefix = colorize_prefix("build");

        let mut stdout = stdout().lock();
        execute!(stdout, cursor::MoveUp(1), Clear(ClearType::CurrentLine)).ok();
        writeln!(stdout, "{prefix} {line}").ok();
        stdout.flush().ok();
    }

    /// Finish the status display, preserving the last line.
    pub fn finish(self, line: &str) {
        {
            let _guard = self.lock.lock(); // Wait for any pending update
            let prefix = colorize_prefix("build");

            let mut stdout = stdout().lock();
            execute!(stdout, cursor::MoveUp(1), Clear(ClearType::CurrentLine)).ok();
            writeln!(stdout, "{prefix} {line}").ok();
            stdout.flush().ok();
        }
        BAR_COUNT.store(0, Ordering::SeqCst);

        std::mem::forget(self); // Prevent Drop from clearing
    }
}

impl Drop for StatusLine {
    fn drop(&mut self) {
        BAR_COUNT.store(0, Ordering::SeqCst);

        // Clear the line on drop (if not finished properly)
        let mut stdout = stdout().lock();
        execute!(stdout, cursor::MoveUp(1), Clear(ClearType::CurrentLine)).ok();
        stdout.flush().ok();
    }
}

// ============================================================================
// Tests
// ============================================================================
