//! Terminal output for CLI handlers.
//!
//! Human output goes to stdout. Report content (headings, tables, totals)
//! and warnings always print; progress chatter (sections, fields, notes,
//! hints, success marks) is dropped by `--quiet`.
//!
//! With `--json`, stdout carries exactly one document, written by
//! [`json_output`]. Every text helper is silent, and warnings and errors go
//! to stderr as `{"level", "message"}` records.

use std::fmt::Display;
use std::sync::{OnceLock, RwLock};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde_json::json;

/// Runtime output configuration shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Emit one JSON document instead of human-readable text.
    pub json: bool,
    /// Drop progress chatter.
    pub quiet: bool,
    /// Verbosity level (0 = normal, 1+ = increasingly verbose).
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }
}

/// How a line fares under `--quiet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Weight {
    Chatter,
    Content,
}

static OUTPUT_CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn config_cell() -> &'static RwLock<OutputConfig> {
    OUTPUT_CONFIG.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn read_config() -> OutputConfig {
    match config_cell().read() {
        Ok(config) => *config,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Apply output settings from global CLI flags.
pub fn configure(config: OutputConfig) {
    match config_cell().write() {
        Ok(mut current) => *current = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

const fn visible(config: OutputConfig, weight: Weight) -> bool {
    !config.json && (matches!(weight, Weight::Content) || !config.quiet)
}

fn shows(weight: Weight) -> bool {
    visible(read_config(), weight)
}

fn stderr_record(level: &str, message: &str) {
    eprintln!("{}", json!({ "level": level, "message": message }));
}

/// Return whether machine-readable JSON output is enabled.
#[must_use]
pub fn is_json() -> bool {
    read_config().json
}

/// Return the global verbosity level from `-v` flags.
#[must_use]
pub fn verbosity() -> u8 {
    read_config().verbose
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    if shows(Weight::Chatter) {
        println!("  {:<16} {}", label.dimmed(), value);
    }
}

pub fn success(message: &str) {
    if shows(Weight::Chatter) {
        println!("  {} {}", "✓".green(), message);
    }
}

/// Print a warning line. Survives `--quiet`.
pub fn warning(message: &str) {
    if is_json() {
        stderr_record("warning", message);
    } else {
        println!("  {} {}", "⚠".yellow(), message);
    }
}

/// Print an error line to stderr.
pub fn error(message: &str) {
    if is_json() {
        stderr_record("error", message);
    } else {
        eprintln!("  {} {}", "×".red(), message);
    }
}

pub fn section(title: &str) {
    if shows(Weight::Chatter) {
        println!();
        println!("{}", title.bold());
    }
}

/// Print a report heading. Unlike [`section`], survives `--quiet`.
pub fn heading(title: &str) {
    if shows(Weight::Content) {
        println!();
        println!("{}", title.bold());
    }
}

pub fn note(message: &str) {
    if shows(Weight::Chatter) {
        println!("  {}", message.dimmed());
    }
}

/// Print a hint with "hint:" prefix.
pub fn hint(message: &str) {
    if shows(Weight::Chatter) {
        println!("  {}: {}", "hint".cyan().dimmed(), message.dimmed());
    }
}

/// Print report content, each line indented. Survives `--quiet`.
pub fn lines(content: &str) {
    if shows(Weight::Content) {
        for line in content.lines() {
            println!("  {line}");
        }
    }
}

/// Write the command's single JSON document to stdout.
pub fn json_output(value: serde_json::Value) {
    println!("{value}");
}

const BRAILLE_SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Start a progress spinner on stderr; hidden when chatter is off.
pub fn spinner(message: &str) -> ProgressBar {
    if !shows(Weight::Chatter) {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(BRAILLE_SPINNER)
        .template("  {spinner:.cyan} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn spinner_success(pb: &ProgressBar, message: &str) {
    if pb.is_hidden() {
        pb.finish_and_clear();
    } else {
        pb.finish_with_message(format!("{} {}", "✓".green(), message));
    }
}

pub fn spinner_fail(pb: &ProgressBar, message: &str) {
    if pb.is_hidden() {
        pb.finish_and_clear();
    } else {
        pb.finish_with_message(format!("{} {}", "×".red(), message));
    }
}

/// Green in human mode, plain in JSON mode.
pub fn positive(value: impl Display) -> String {
    if is_json() {
        value.to_string()
    } else {
        value.green().to_string()
    }
}

pub fn negative(value: impl Display) -> String {
    if is_json() {
        value.to_string()
    } else {
        value.red().to_string()
    }
}

pub fn muted(value: impl Display) -> String {
    if is_json() {
        value.to_string()
    } else {
        value.dimmed().to_string()
    }
}
