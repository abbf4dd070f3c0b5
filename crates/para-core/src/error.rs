//! Failure taxonomy for para.
//!
//! Every failure a command can run into is one of four [`Failure`] kinds.
//! Guarded operations return [`Halt`], which additionally carries the raw
//! interrupt signal and already-reported aborts.

use crate::ExitCode;
use std::error::Error as StdError;
use std::path::{Path, PathBuf};

/// Boxed error used as the cause of a failure.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// The tag of a [`Failure`], used for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The user cancelled the operation
    UserCancelled,
    /// The user supplied unusable input
    UserInput,
    /// The compiler reported an error
    Collaborator,
    /// Anything unclassified
    InternalDefect,
}

/// A classified failure.
#[derive(Debug, thiserror::Error)]
pub enum Failure {
    #[error("operation cancelled by the user")]
    UserCancelled,

    #[error("{message}")]
    UserInput {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("{message}")]
    Collaborator {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("{message}")]
    InternalDefect {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl Failure {
    /// Get the kind of this failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            Failure::UserCancelled => FailureKind::UserCancelled,
            Failure::UserInput { .. } => FailureKind::UserInput,
            Failure::Collaborator { .. } => FailureKind::Collaborator,
            Failure::InternalDefect { .. } => FailureKind::InternalDefect,
        }
    }

    /// Create a user input error.
    pub fn user_input(message: impl Into<String>) -> Self {
        Failure::UserInput {
            message: message.into(),
            path: None,
        }
    }

    /// Create a user input error naming the offending path.
    pub fn user_input_at(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Failure::UserInput {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a collaborator error without a cause.
    pub fn collaborator(message: impl Into<String>) -> Self {
        Failure::Collaborator {
            message: message.into(),
            source: None,
        }
    }

    /// Create a collaborator error with a cause.
    pub fn collaborator_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Failure::Collaborator {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a collaborator-class failure from a filesystem error.
    pub fn io(message: impl AsRef<str>, path: &Path, source: std::io::Error) -> Self {
        Failure::Collaborator {
            message: format!("{}: {}", message.as_ref(), path.display()),
            source: Some(Box::new(source)),
        }
    }

    /// Wrap a failure as an internal defect, keeping it as the cause.
    ///
    /// An internal defect is returned unchanged so that nested guards do not
    /// stack wrappers.
    pub fn into_internal(self, message: impl Into<String>) -> Self {
        match self {
            defect @ Failure::InternalDefect { .. } => defect,
            other => Failure::InternalDefect {
                message: message.into(),
                source: Some(Box::new(other)),
            },
        }
    }

    /// Find the user input error this failure was caused by, if any.
    pub fn user_input_cause(&self) -> Option<&Failure> {
        if self.kind() == FailureKind::UserInput {
            return Some(self);
        }
        let mut cause = self.source();
        while let Some(err) = cause {
            if let Some(failure) = err.downcast_ref::<Failure>()
                && failure.kind() == FailureKind::UserInput
            {
                return Some(failure);
            }
            cause = err.source();
        }
        None
    }

    /// Render the failure together with its chain of causes.
    pub fn chain(&self) -> String {
        let mut rendered = self.to_string();
        let mut cause = self.source();
        while let Some(err) = cause {
            rendered.push_str(": ");
            rendered.push_str(&err.to_string());
            cause = err.source();
        }
        rendered
    }
}

/// A terminal abort that has already been reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abort {
    /// The phase that was running when the abort happened.
    pub step: String,
    /// The exit code the process ends with.
    pub exit_code: ExitCode,
    /// Whether the abort banner was printed.
    pub banner_printed: bool,
}

impl Abort {
    /// Create an abort for the given step.
    pub fn new(step: impl Into<String>, banner_printed: bool) -> Self {
        Self {
            step: step.into(),
            exit_code: ExitCode::Aborted,
            banner_printed,
        }
    }
}

/// The error side of every guarded operation.
#[derive(Debug, thiserror::Error)]
pub enum Halt {
    /// The process received an interactive cancellation signal.
    #[error("interrupted")]
    Interrupt,

    #[error(transparent)]
    Failure(#[from] Failure),

    /// Non-resumable: passed through every outer guard untouched.
    #[error("aborted during {}", .0.step)]
    Abort(Abort),
}

impl Halt {
    /// Get the failure, if this halt carries one.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Halt::Failure(failure) => Some(failure),
            _ => None,
        }
    }

    /// Check whether this halt is a completed abort.
    pub fn is_abort(&self) -> bool {
        matches!(self, Halt::Abort(_))
    }

    /// The exit code the process should end with for this halt.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Halt::Abort(abort) => abort.exit_code,
            Halt::Interrupt | Halt::Failure(_) => ExitCode::Aborted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(Failure::UserCancelled.kind(), FailureKind::UserCancelled);
        assert_eq!(Failure::user_input("x").kind(), FailureKind::UserInput);
        assert_eq!(Failure::collaborator("x").kind(), FailureKind::Collaborator);
        assert_eq!(
            Failure::collaborator("x").into_internal("y").kind(),
            FailureKind::InternalDefect
        );
    }

    #[test]
    fn test_into_internal_keeps_cause() {
        let defect = Failure::collaborator("backend crashed").into_internal("unexpected");
        assert_eq!(defect.to_string(), "unexpected");
        assert_eq!(defect.chain(), "unexpected: backend crashed");
    }

    #[test]
    fn test_into_internal_does_not_rewrap() {
        let defect = Failure::collaborator("inner").into_internal("first");
        let again = defect.into_internal("second");
        assert_eq!(again.to_string(), "first");
    }

    #[test]
    fn test_user_input_cause_through_wrapper() {
        let defect = Failure::user_input("Path can not be empty").into_internal("unexpected");
        let cause = defect.user_input_cause().unwrap();
        assert_eq!(cause.to_string(), "Path can not be empty");

        assert!(Failure::collaborator("x").user_input_cause().is_none());
    }

    #[test]
    fn test_io_failure_names_path() {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let failure = Failure::io("failed to create directory", Path::new("/tmp/build"), err);
        assert_eq!(failure.kind(), FailureKind::Collaborator);
        assert!(failure.to_string().contains("/tmp/build"));
        assert!(failure.chain().ends_with("denied"));
    }

    #[test]
    fn test_halt_exit_codes() {
        assert_eq!(Halt::Interrupt.exit_code(), ExitCode::Aborted);
        let abort = Halt::Abort(Abort::new("Setup", true));
        assert!(abort.is_abort());
        assert_eq!(abort.exit_code(), ExitCode::Aborted);
        assert_eq!(abort.to_string(), "aborted during Setup");
    }
}
