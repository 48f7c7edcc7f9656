//! Terminal output formatting for the drawables CLI.
//!
//! Provides Cargo-style status output with right-aligned coloured verbs.
//! All status output goes to stderr; stdout is reserved for machine-readable output.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use crate::generator::Event;

/// ANSI escape codes.
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const UNDERLINE: &str = "\x1b[4m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Width for right-aligned verb column.
const VERB_WIDTH: usize = 12;

/// Terminal-aware status printer.
///
/// Prints Cargo-style status lines to stderr with optional ANSI colours.
/// Colour is enabled when stderr is a terminal.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    color: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self {
            color: io::stderr().is_terminal(),
        }
    }

    /// A printer that never emits escape codes.
    pub fn plain() -> Self {
        Self { color: false }
    }

    /// Print an underlined section header surrounded by blank lines.
    pub fn header(&self, title: &str) {
        let mut stderr = io::stderr().lock();
        if self.color {
            let _ = writeln!(stderr, "\n {CYAN}{UNDERLINE}{title}{RESET}\n");
        } else {
            let _ = writeln!(stderr, "\n {title}\n");
        }
    }

    /// Print a status line with a green bold verb.
    /// e.g. "     Created res/drawable-mdpi/icon.png (48×48)"
    pub fn status(&self, verb: &str, message: &str) {
        self.print_line(GREEN, verb, message);
    }

    /// Print an informational line with a cyan bold verb.
    pub fn info(&self, verb: &str, message: &str) {
        self.print_line(CYAN, verb, message);
    }

    /// Print a warning line with a yellow bold verb.
    pub fn warning(&self, verb: &str, message: &str) {
        self.print_line(YELLOW, verb, message);
    }

    /// Print an error line with a red bold verb.
    pub fn error(&self, verb: &str, message: &str) {
        self.print_line(RED, verb, message);
    }

    /// Format a string as dim/grey.
    pub fn dim(&self, text: &str) -> String {
        if self.color {
            format!("{DIM}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    /// Print the status line for a progress event.
    pub fn event(&self, event: &Event) {
        let (verb, message) = describe(event);
        match event {
            Event::Started { .. } => self.info(verb, &message),
            Event::Created(_) => self.status(verb, &message),
            Event::Missing { .. } | Event::Failed { .. } => self.error(verb, &message),
        }
    }

    fn print_line(&self, color: &str, verb: &str, message: &str) {
        let mut stderr = io::stderr().lock();
        if self.color {
            let _ = writeln!(
                stderr,
                "{BOLD}{color}{verb:>VERB_WIDTH$}{RESET} {message}"
            );
        } else {
            let _ = writeln!(stderr, "{verb:>VERB_WIDTH$} {message}");
        }
    }
}

/// Verb and message for an event.
pub fn describe(event: &Event) -> (&'static str, String) {
    match event {
        Event::Started { source, width, height } => (
            "Scaling",
            format!("{} ({}×{})", display_path(source), width, height),
        ),
        Event::Created(artifact) => (
            "Created",
            format!("{} ({})", display_path(&artifact.path), artifact.dimensions()),
        ),
        Event::Missing { source } => ("Missing", format!("{} not found", display_path(source))),
        Event::Failed { source, message } => ("Failed", format!("{}: {}", display_path(source), message)),
    }
}

/// Pluralize a count: `plural(1, "drawable", "drawables")` → "1 drawable".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, pluralized)
    }
}

/// Return a relative display path when possible, absolute otherwise.
pub fn display_path(path: &Path) -> String {
    if let Ok(cwd) = std::env::current_dir() {
        if let Ok(relative) = path.strip_prefix(&cwd) {
            let s = relative.display().to_string();
            if s.is_empty() {
                return ".".to_string();
            }
            return s;
        }
    }
    path.display().to_string()
}
