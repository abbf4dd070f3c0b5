//! Configuration merging utilities.
//!
//! This module provides the `Combine` trait for merging configuration from
//! multiple sources:
//!
//! - `Option<T>`: first `Some` value wins
//! - Sections: merged field by field

use crate::{CompilerConfig, Config, DefaultsConfig, OutputConfig};

/// Trait for combining configuration values.
///
/// The convention is that `self` has higher precedence than `other`.
pub trait Combine {
    /// Combine two values, preferring values in `self`.
    #[must_use]
    fn combine(self, other: Self) -> Self;
}

// ─── Option<T> ───────────────────────────────────────────────────────────────

impl<T> Combine for Option<T> {
    fn combine(self, other: Self) -> Self {
        self.or(other)
    }
}

// ─── Config ──────────────────────────────────────────────────────────────────

impl Combine for Config {
    fn combine(self, other: Self) -> Self {
        Self {
            compiler: self.compiler.combine(other.compiler),
            output: self.output.combine(other.output),
            defaults: self.defaults.combine(other.defaults),
        }
    }
}

impl Combine for CompilerConfig {
    fn combine(self, other: Self) -> Self {
        Self {
            path: self.path.combine(other.path),
            args: self.args.combine(other.args),
        }
    }
}

impl Combine for OutputConfig {
    fn combine(self, other: Self) -> Self {
        Self {
            build_dir: self.build_dir.combine(other.build_dir),
            dist_dir: self.dist_dir.combine(other.dist_dir),
        }
    }
}

impl Combine for DefaultsConfig {
    fn combine(self, other: Self) -> Self {
        Self {
            encoding: self.encoding.combine(other.encoding),
            log: self.log.combine(other.log),
        }
    }
}
