//! Console output

use console::{style, Term};
use tierloc::report::HEADING_PREFIX;

use crate::error::CliResult;

/// Writes results to stdout and status lines to stderr
#[derive(Debug)]
pub struct ConsoleReporter {
    out: Term,
    err: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(false, false)
    }
}

impl ConsoleReporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            use_color,
            quiet,
        }
    }

    /// Print rendered report text, styling section headings
    pub fn print_report(&self, text: &str) -> CliResult<()> {
        self.out.write_str(&stylize_report(text, self.use_color))?;
        Ok(())
    }

    /// Print text unchanged
    pub fn print_raw(&self, text: &str) -> CliResult<()> {
        self.out.write_line(text)?;
        Ok(())
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("✓").green().bold().force_styling(true).to_string()
        } else {
            "OK".to_string()
        };

        let _ = self.err.write_line(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("⚠").yellow().bold().force_styling(true).to_string()
        } else {
            "WARN".to_string()
        };

        let _ = self.err.write_line(&format!("{prefix} {message}"));
    }
}

/// Bold the `### title ###` lines of a text report when coloring
#[must_use]
pub fn stylize_report(text: &str, use_color: bool) -> String {
    if !use_color {
        return text.to_string();
    }
    let mut output = String::with_capacity(text.len());
    for line in text.lines() {
        if line.starts_with(HEADING_PREFIX) {
            output.push_str(&style(line).cyan().bold().force_styling(true).to_string());
        } else {
            output.push_str(line);
        }
        output.push('\n');
    }
    output
}
