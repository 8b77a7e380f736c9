//! Utilities module - Console reporting

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Console output settings, passed to every component that prints
#[derive(Clone, Copy, Debug, Default)]
pub struct Reporter {
    pub verbose: bool,
    pub quiet: bool,
}

impl Reporter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Silent reporter, used by tests
    #[cfg(test)]
    pub fn silent() -> Self {
        Self {
            verbose: false,
            quiet: true,
        }
    }

    /// Print the banner
    pub fn banner(&self) {
        if self.quiet {
            return;
        }
        println!("{}", "🔥 Bootforge - bootloader + kernel → disk.fat".bright_cyan().bold());
        println!();
    }

    /// Print a heading line
    pub fn heading(&self, message: &str) {
        if !self.quiet {
            println!("{}", message.bright_yellow());
        }
    }

    /// Print a `key: value` line under a heading
    pub fn field(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("   {}: {}", key, value.bright_green());
        }
    }

    /// Print a step message
    pub fn step(&self, message: &str) {
        if !self.quiet {
            println!("   {} {}", "→".bright_blue(), message);
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("   {} {}", "✓".bright_green(), message);
        }
    }

    /// Print an error message (never suppressed)
    pub fn error(&self, message: &str) {
        eprintln!("   {} {}", "✗".bright_red(), message);
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("   {} {}", "⚠".bright_yellow(), message);
        }
    }

    /// Print an info message, only in verbose mode
    pub fn info(&self, message: &str) {
        if self.verbose && !self.quiet {
            println!("   {} {}", "ℹ".bright_cyan(), message.bright_black());
        }
    }

    /// Progress bar over `steps` steps; hidden when quiet or verbose
    pub fn progress(&self, steps: u64) -> ProgressBar {
        if self.quiet || self.verbose {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(steps);
        if let Ok(style) = ProgressStyle::with_template("   {bar:30.cyan/blue} {pos}/{len} {msg}") {
            bar.set_style(style.progress_chars("█▓░"));
        }
        bar
    }
}
