//! Terminal output for CLI handlers.
//!
//! A handler checks [`is_json`] once. In JSON mode it emits a single
//! [`result`] object; otherwise it prints colored lines through the text
//! helpers, which `--quiet` silences. Errors always reach stderr.

use std::fmt::Display;
use std::sync::OnceLock;

use owo_colors::OwoColorize;
use serde_json::{json, Value};

/// Output mode selected by the global CLI flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// One JSON object per command instead of text.
    pub json: bool,
    /// No text output except errors.
    pub quiet: bool,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool) -> Self {
        Self { json, quiet }
    }
}

static MODE: OnceLock<OutputConfig> = OnceLock::new();

/// Fix the output mode for the process. Later calls are ignored.
pub fn configure(config: OutputConfig) {
    let _ = MODE.set(config);
}

fn mode() -> OutputConfig {
    MODE.get().copied().unwrap_or_default()
}

fn text_enabled() -> bool {
    let mode = mode();
    !mode.json && !mode.quiet
}

#[must_use]
pub fn is_json() -> bool {
    mode().json
}

/// Emit a command's structured result as `{"type": "result", "payload"}`.
/// Does nothing in text mode.
pub fn result(payload: Value) {
    if is_json() {
        println!("{}", json!({ "type": "result", "payload": payload }));
    }
}

pub fn section(title: &str) {
    if text_enabled() {
        println!();
        println!("{}", title.bold());
    }
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    if text_enabled() {
        println!("  {:<14} {}", label.dimmed(), value);
    }
}

pub fn success(message: &str) {
    if text_enabled() {
        println!("  {} {}", "✓".green(), message);
    }
}

pub fn note(message: &str) {
    if text_enabled() {
        println!("  {}", message.dimmed());
    }
}

/// Print an error to stderr, as a JSON object in JSON mode.
pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", json!({ "type": "error", "payload": { "message": message } }));
    } else {
        eprintln!("  {} {}", "×".red(), message);
    }
}

/// Cyan in text mode, plain in JSON mode.
pub fn highlight(value: impl Display) -> String {
    if is_json() {
        value.to_string()
    } else {
        value.cyan().to_string()
    }
}
