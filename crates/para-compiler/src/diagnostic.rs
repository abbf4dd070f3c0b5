//! Compiler diagnostics.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// Error - compilation cannot continue.
    Error,
    /// Warning - potential issue.
    Warning,
}

/// A diagnostic message from the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level.
    pub severity: DiagnosticSeverity,
    /// The diagnostic message.
    pub message: String,
    /// Source file path.
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Line number (1-indexed).
    #[serde(default)]
    pub line: Option<u32>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            message: message.into(),
            file: None,
            line: None,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            message: message.into(),
            file: None,
            line: None,
        }
    }

    /// Log the diagnostic at its severity.
    pub fn log(&self) {
        match self.severity {
            DiagnosticSeverity::Error => tracing::error!("{}", self),
            DiagnosticSeverity::Warning => tracing::warn!("{}", self),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
        };

        if let Some(ref file) = self.file {
            write!(f, "{}:", file.display())?;
            if let Some(line) = self.line {
                write!(f, "{}:", line)?;
            }
            write!(f, " ")?;
        }

        write!(f, "{}: {}", severity, self.message)
    }
}

/// Shared tally of reported diagnostics.
///
/// Clones count into the same totals.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCounter {
    errors: Arc<AtomicUsize>,
    warnings: Arc<AtomicUsize>,
}

impl DiagnosticCounter {
    /// Create a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a diagnostic.
    pub fn record(&self, diagnostic: &Diagnostic) {
        let slot = match diagnostic.severity {
            DiagnosticSeverity::Error => &self.errors,
            DiagnosticSeverity::Warning => &self.warnings,
        };
        slot.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of errors recorded.
    pub fn errors(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }

    /// Number of warnings recorded.
    pub fn warnings(&self) -> usize {
        self.warnings.load(Ordering::Relaxed)
    }
}
