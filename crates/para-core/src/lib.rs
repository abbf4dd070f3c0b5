//! Core types for the para CLI.
//!
//! This crate provides the failure taxonomy, the abort policies attached to
//! guarded call sites, argument sanitization and the environment variables
//! shared by every para crate.

pub mod env;
pub mod error;
pub mod policy;
pub mod sanitize;

pub use env::EnvVars;
pub use error::{Abort, BoxError, Failure, FailureKind, Halt};
pub use policy::AbortPolicy;
pub use sanitize::Sanitize;

/// Exit codes for the para CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Any abort: cancellation, unhandled defect, failed check
    Aborted = 1,
}

impl ExitCode {
    /// Map a boolean outcome onto an exit code.
    pub fn from_success(success: bool) -> Self {
        if success {
            ExitCode::Success
        } else {
            ExitCode::Aborted
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}
