//! The JSON-lines protocol spoken by backend executables.
//!
//! Each stdout line of the backend is one JSON object tagged by `event`:
//!
//! ```text
//! {"event":"status","percent":40,"message":"Parsing","level":"info"}
//! {"event":"diagnostic","severity":"error","message":"...","file":"main.para","line":3}
//! {"event":"result","percent":100,"result":{"errors":0,"warnings":1}}
//! ```

use crate::{CompileResult, Diagnostic, LogLevel, ProgressEvent};
use serde::Deserialize;

/// One decoded backend line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub(crate) enum BackendLine {
    Status {
        percent: u8,
        message: String,
        #[serde(default)]
        level: LogLevel,
    },
    Result {
        #[serde(default = "full")]
        percent: u8,
        result: CompileResult,
    },
    Diagnostic(Diagnostic),
}

fn full() -> u8 {
    100
}

impl BackendLine {
    /// Decode a line. Anything that is not a protocol object yields `None`.
    pub(crate) fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if !line.starts_with('{') {
            return None;
        }
        serde_json::from_str(line).ok()
    }

    /// The progress event this line carries, if any.
    pub(crate) fn into_event(self) -> Result<ProgressEvent, Diagnostic> {
        match self {
            BackendLine::Status {
                percent,
                message,
                level,
            } => Ok(ProgressEvent::Status {
                percent,
                message,
                level,
            }),
            BackendLine::Result { percent, result } => {
                Ok(ProgressEvent::Terminal { percent, result })
            }
            BackendLine::Diagnostic(diagnostic) => Err(diagnostic),
        }
    }
}
