//! Progress events emitted during a streamed compilation.

use crate::{CompileResult, CompilerError};
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

/// The event sequence of one streamed compilation.
pub type EventStream = BoxStream<'static, Result<ProgressEvent, CompilerError>>;

/// Log level attached to a status event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    #[serde(alias = "warn")]
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Emit `message` through `tracing` at this level.
    ///
    /// `Critical` has no tracing counterpart and is logged as an error
    /// tagged with `severity = "critical"`.
    pub fn log(self, message: &str) {
        match self {
            LogLevel::Debug => tracing::debug!("{}", message),
            LogLevel::Info => tracing::info!("{}", message),
            LogLevel::Warning => tracing::warn!("{}", message),
            LogLevel::Error => tracing::error!("{}", message),
            LogLevel::Critical => tracing::error!(severity = "critical", "{}", message),
        }
    }
}

/// One unit of the progress stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A status line and the progress reached so far.
    Status {
        percent: u8,
        message: String,
        level: LogLevel,
    },
    /// The compilation finished. Ends a well-formed stream.
    Terminal { percent: u8, result: CompileResult },
}

impl ProgressEvent {
    /// Create a status event.
    pub fn status(percent: u8, message: impl Into<String>) -> Self {
        ProgressEvent::Status {
            percent,
            message: message.into(),
            level: LogLevel::Info,
        }
    }

    /// Create a terminal event at 100%.
    pub fn terminal(result: CompileResult) -> Self {
        ProgressEvent::Terminal {
            percent: 100,
            result,
        }
    }

}
