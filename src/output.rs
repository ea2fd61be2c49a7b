//! Terminal output formatting for the dtk CLI.
//!
//! Status lines go to stderr with a right-aligned verb column, the way Cargo
//! reports progress. stdout is kept free for machine-readable output such as
//! `dtk list --json` and shell completions.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use crate::validation::{Severity, ValidationResult};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Width for right-aligned verb column.
const VERB_WIDTH: usize = 12;

/// Terminal-aware status printer.
///
/// Colour is enabled when stderr is a terminal. A quiet printer drops
/// status and info lines but still reports warnings and errors.
#[derive(Debug, Clone)]
pub struct Printer {
    color: bool,
    quiet: bool,
}

impl Printer {
    pub fn new() -> Self {
        Self {
            color: io::stderr().is_terminal(),
            quiet: false,
        }
    }

    /// A printer that only reports warnings and errors.
    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Self::new()
        }
    }

    /// Progress line with a green verb, e.g. `    Building product_dark (12 sets)`.
    pub fn status(&self, verb: &str, message: &str) {
        if !self.quiet {
            self.print_line(GREEN, verb, message);
        }
    }

    /// Informational line with a cyan verb.
    pub fn info(&self, verb: &str, message: &str) {
        if !self.quiet {
            self.print_line(CYAN, verb, message);
        }
    }

    pub fn warning(&self, verb: &str, message: &str) {
        self.print_line(YELLOW, verb, message);
    }

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

    /// Print every diagnostic followed by a one-line summary.
    pub fn diagnostics(&self, result: &ValidationResult) {
        for d in result.iter() {
            let line = match &d.help {
                Some(help) => format!("{} {}", d.message, self.dim(&format!("({})", help))),
                None => d.message.clone(),
            };
            match d.severity {
                Severity::Error => self.error("error", &line),
                Severity::Warning => self.warning("warning", &line),
            }
        }
    }

    fn print_line(&self, color: &str, verb: &str, message: &str) {
        let mut stderr = io::stderr().lock();
        if self.color {
            let _ = writeln!(stderr, "{BOLD}{color}{verb:>VERB_WIDTH$}{RESET} {message}");
        } else {
            let _ = writeln!(stderr, "{verb:>VERB_WIDTH$} {message}");
        }
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

/// Pluralize a count: `plural(1, "theme", "themes")` → "1 theme".
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_singular() {
        assert_eq!(plural(1, "theme", "themes"), "1 theme");
    }

    #[test]
    fn test_plural_zero_and_many() {
        assert_eq!(plural(0, "set", "sets"), "0 sets");
        assert_eq!(plural(4, "set", "sets"), "4 sets");
    }

    #[test]
    fn test_display_path_outside_cwd() {
        let p = Path::new("/nonexistent/tokens/dark.json");
        assert_eq!(display_path(p), "/nonexistent/tokens/dark.json");
    }

    #[test]
    fn test_quiet_printer_keeps_colour_detection() {
        let printer = Printer::quiet();
        assert!(printer.quiet);
        assert!(printer.dim("x").contains('x'));
    }
}
