//! Printer abstraction for controlling output verbosity.
//!
//! A `Printer` decides which output is shown and where progress indicators
//! are drawn.

use indicatif::ProgressDrawTarget;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Printer {
    /// Suppress all output.
    Silent,
    /// Suppress most output but keep errors and banners.
    Quiet,
    /// Normal output (default).
    #[default]
    Normal,
    /// Normal output but exclude progress bars.
    NoProgress,
    /// Verbose output including debug messages.
    Verbose,
}

impl Printer {
    /// Create a printer from quiet/verbose flags.
    pub fn from_flags(quiet: u8, verbose: bool) -> Self {
        if quiet >= 2 {
            Self::Silent
        } else if quiet == 1 {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Drop progress bars from normal output, for CI logs.
    pub fn without_progress(self) -> Self {
        match self {
            Self::Normal => Self::NoProgress,
            other => other,
        }
    }

    /// Get the progress bar draw target for this printer.
    pub fn target(self) -> ProgressDrawTarget {
        if self.progress_enabled() {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        }
    }

    /// Check if stderr output is enabled.
    pub fn stderr_enabled(self) -> bool {
        !matches!(self, Self::Silent)
    }

    /// Check if informational output is enabled.
    pub fn info_enabled(self) -> bool {
        matches!(self, Self::Normal | Self::NoProgress | Self::Verbose)
    }

    /// Check if progress output is enabled.
    pub fn progress_enabled(self) -> bool {
        matches!(self, Self::Normal | Self::Verbose)
    }

    /// Check if verbose output is enabled.
    pub fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(Printer::from_flags(0, false), Printer::Normal);
        assert_eq!(Printer::from_flags(0, true), Printer::Verbose);
        assert_eq!(Printer::from_flags(1, true), Printer::Quiet);
        assert_eq!(Printer::from_flags(2, false), Printer::Silent);
    }

    #[test]
    fn test_progress_hidden_when_quiet() {
        assert!(Printer::Normal.progress_enabled());
        assert!(!Printer::NoProgress.progress_enabled());
        assert!(!Printer::Quiet.progress_enabled());
        assert!(Printer::Silent.target().is_hidden());
    }

    #[test]
    fn test_without_progress_keeps_info() {
        let printer = Printer::Normal.without_progress();
        assert_eq!(printer, Printer::NoProgress);
        assert!(printer.info_enabled());
        assert!(printer.target().is_hidden());
        assert_eq!(Printer::Verbose.without_progress(), Printer::Verbose);
        assert_eq!(Printer::Quiet.without_progress(), Printer::Quiet);
    }
}
