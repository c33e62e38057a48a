//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro for output that only appears with `--verbose`
//! - `warn!` macro for recoverable problems (skipped files, failed roots)
//!
//! # Example
//!
//! ```ignore
//! log!("generate"; "{} assets", count);
//! debug!("walk"; "skipping {}", path.display());
//! ```

use owo_colors::{OwoColorize, Stream, Style};
use std::{
    io::{Write, stderr, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

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

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

/// Log a warning to stderr with a colored module prefix
#[macro_export]
macro_rules! warn {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::warn($module, &format!($($arg)*))
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module, &module.to_ascii_lowercase());
    let mut stdout = stdout().lock();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Log a warning line on stderr
#[inline]
pub fn warn(module: &str, message: &str) {
    let prefix = paint(
        format!("[{module}]"),
        Stream::Stderr,
        Style::new().bright_red().bold(),
    );
    let label = paint("warning:", Stream::Stderr, Style::new().yellow());
    let mut stderr = stderr().lock();
    writeln!(stderr, "{prefix} {label} {message}").ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let style = match module_lower {
        "generate" => Style::new().bright_blue(),
        "walk" => Style::new().bright_green(),
        "error" => Style::new().bright_red(),
        _ => Style::new().bright_yellow(),
    };
    paint(format!("[{module}]"), Stream::Stdout, style.bold())
}

/// Style text only when the stream supports color (honors `--color`).
fn paint(text: impl std::fmt::Display, stream: Stream, style: Style) -> String {
    text.if_supports_color(stream, |t| t.style(style)).to_string()
}
