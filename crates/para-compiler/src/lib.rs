//! Compiler collaborator for para.
//!
//! The compiler proper lives outside this tool. This crate defines the
//! contract the CLI talks to ([`Compiler`]) and [`ExternalCompiler`], which
//! drives a backend executable over a JSON-lines protocol.

pub mod diagnostic;
pub mod event;
pub mod external;
pub mod process;
mod protocol;

pub use diagnostic::{Diagnostic, DiagnosticCounter, DiagnosticSeverity};
pub use event::{EventStream, LogLevel, ProgressEvent};
pub use external::ExternalCompiler;
pub use process::{CommandOutput, CommandRunner};

use async_trait::async_trait;
use para_core::{Failure, Halt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for compiler operations.
#[derive(Debug, Error)]
pub enum CompilerError {
    #[error("compiler not found: {program}")]
    NotFound {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("compiler exited with {}{}", exit_label(.exit_code), stderr_suffix(.stderr))]
    Failed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("syntax check failed with {errors} error(s)")]
    Rejected { errors: usize },

    #[error("compiler finished without reporting a result")]
    MissingResult,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

impl From<CompilerError> for Failure {
    fn from(err: CompilerError) -> Self {
        Failure::collaborator_with("the compiler reported an error", err)
    }
}

impl From<CompilerError> for Halt {
    fn from(err: CompilerError) -> Self {
        Halt::Failure(err.into())
    }
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, CompilerError>;

/// What to compile and where to put the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationRequest {
    /// Source files, compiled and linked together.
    pub files: Vec<PathBuf>,
    /// Encoding the files are read with.
    pub encoding: String,
    /// Directory for intermediate build output.
    pub build_dir: PathBuf,
    /// Directory for the final artifacts.
    pub dist_dir: PathBuf,
    /// Emit generated C source.
    pub source: bool,
    /// Produce an executable.
    pub executable: bool,
    /// Request debug information from the compiler.
    pub debug: bool,
}

/// Outcome of a compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileResult {
    /// Number of errors reported.
    #[serde(default)]
    pub errors: usize,
    /// Number of warnings reported.
    #[serde(default)]
    pub warnings: usize,
    /// The produced executable, if one was requested and built.
    #[serde(default)]
    pub executable: Option<PathBuf>,
}

impl CompileResult {
    /// Check whether the compilation produced no errors.
    pub fn is_success(&self) -> bool {
        self.errors == 0
    }
}

/// The compiler as seen from the CLI.
#[async_trait]
pub trait Compiler: Send + Sync {
    /// Name shown in log output.
    fn name(&self) -> &str;

    /// Compile to completion and return the result.
    async fn compile(&self, request: &CompilationRequest) -> Result<CompileResult>;

    /// Start a compilation and return its progress events.
    ///
    /// A well-formed stream yields status events and ends with exactly one
    /// terminal event.
    async fn compile_with_progress(&self, request: &CompilationRequest) -> Result<EventStream>;

    /// Check a single entry file for syntax errors.
    ///
    /// Every diagnostic is recorded in `counter`. With `report_to_log` the
    /// diagnostics are also logged at their severity. Malformed input is
    /// reported as [`CompilerError::Rejected`] after recording.
    async fn validate_syntax(
        &self,
        file: &Path,
        encoding: &str,
        report_to_log: bool,
        counter: &DiagnosticCounter,
    ) -> Result<()>;
}
