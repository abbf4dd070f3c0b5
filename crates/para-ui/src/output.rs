//! Output formatting for the para CLI.

use crate::printer::Printer;
use crate::progress::{Progress, Spinner};
use crate::style::Style;
use para_core::{Failure, FailureKind};
use std::io::{self, Write};

/// Output handler for consistent CLI output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    printer: Printer,
}

impl Output {
    /// Create an output handler for the given printer.
    pub fn with_printer(printer: Printer) -> Self {
        Self { printer }
    }

    /// Check if verbose output is enabled.
    pub fn is_verbose(&self) -> bool {
        self.printer.is_verbose()
    }

    /// Print a status message with a step title.
    pub fn status(&self, action: &str, message: &str) {
        if self.printer.info_enabled() {
            eprintln!("{:>12} {}", Style::bold(Style::success(action)), message);
        }
    }

    /// Print a line to stdout.
    pub fn println(&self, message: &str) {
        if self.printer.stderr_enabled() {
            println!("{}", message);
        }
    }

    /// Print a failure.
    ///
    /// A failure caused by bad user input is reported by its message and the
    /// offending path only. Anything else shows the chain of causes in
    /// verbose mode.
    pub fn print_failure(&self, failure: &Failure) {
        if !self.printer.stderr_enabled() {
            return;
        }

        if let Some(Failure::UserInput { message, path }) = failure.user_input_cause() {
            eprintln!("{}: {}", Style::error("error"), message);
            if let Some(p) = path {
                eprintln!("  {} {}", Style::dim("-->"), p.display());
            }
            return;
        }

        match failure.kind() {
            FailureKind::UserCancelled => {
                eprintln!("{}", Style::warning("Cancelled by user"));
            }
            _ if self.is_verbose() => {
                eprintln!("{}: {}", Style::error("error"), failure.chain());
            }
            _ => {
                eprintln!("{}: {}", Style::error("error"), failure);
            }
        }
    }

    /// Print the tool banner.
    pub fn banner(&self, title: &str, version: &str) {
        if self.printer.info_enabled() {
            eprintln!("{} {}", Style::banner(title), Style::dim(version));
        }
    }

    /// Print the banner shown when a phase is aborted.
    pub fn abort_banner(&self, step: &str) {
        if self.printer.stderr_enabled() {
            eprintln!();
            eprintln!(
                "{} {}",
                Style::error("✗ Aborted:"),
                Style::bold(format!("{} did not finish", step))
            );
        }
    }

    /// Print the banner shown when an operation has finished.
    pub fn result_banner(&self, label: &str, success: bool) {
        if !self.printer.stderr_enabled() {
            return;
        }
        eprintln!();
        if success {
            eprintln!("{} {}", Style::success("✓"), Style::bold(format!("{} finished", label)));
        } else {
            eprintln!("{} {}", Style::error("✗"), Style::bold(format!("{} failed", label)));
        }
    }

    /// Create a progress bar drawn according to the printer.
    pub fn progress(&self, total: u64, message: impl Into<String>) -> Progress {
        Progress::with_target(total, message, self.printer.target())
    }

    /// Create a spinner drawn according to the printer.
    pub fn spinner(&self, message: impl Into<String>) -> Spinner {
        Spinner::with_target(message, self.printer.target())
    }

    /// Flush stdout and stderr.
    pub fn flush(&self) {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
    }
}
