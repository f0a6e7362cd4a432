//! Colored terminal output utilities.

use console::{Style, Term};

/// Terminal output formatter for status messages (stderr).
pub struct Output {
    term: Term,
    yellow: Style,
    red: Style,
    cyan: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan: Style::new().cyan(),
        }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a highlighted message (cyan).
    pub fn highlight(&self, msg: &str) {
        let _ = self.term.write_line(&self.cyan.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
