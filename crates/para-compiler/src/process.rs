//! Child process execution.

use crate::CompilerError;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::{Child, Command};
use tracing::{debug, instrument};

/// Output from a command execution.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

impl CommandOutput {
    /// Check if the command succeeded.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs child processes in a fixed working directory.
#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    /// Working directory for commands
    pub working_dir: Option<PathBuf>,
}

impl CommandRunner {
    /// Create a new command runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the working directory.
    pub fn with_working_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    fn command(&self, program: &OsStr, args: &[OsString]) -> Command {
        debug!("Running command: {} {:?}", program.to_string_lossy(), args);

        let mut cmd = Command::new(program);
        cmd.args(args);

        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Run a command and capture its output.
    #[instrument(skip(self, args), fields(program = %program.as_ref().to_string_lossy()))]
    pub async fn run<S, I>(&self, program: S, args: I) -> Result<CommandOutput, CompilerError>
    where
        S: AsRef<OsStr>,
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        let program = program.as_ref();
        let args = collect_args(args);

        let mut cmd = self.command(program, &args);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let start = Instant::now();
        let output = cmd
            .output()
            .await
            .map_err(|e| spawn_error(program, e))?;
        let duration = start.elapsed();

        let exit_code = output.status.code();
        debug!(
            exit_code = ?exit_code,
            duration_ms = duration.as_millis() as u64,
            "Command completed"
        );

        Ok(CommandOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// Start a command with piped stdout and stderr.
    ///
    /// The child is killed when the returned handle is dropped.
    pub fn spawn<S, I>(&self, program: S, args: I) -> Result<Child, CompilerError>
    where
        S: AsRef<OsStr>,
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        let program = program.as_ref();
        let args = collect_args(args);

        let mut cmd = self.command(program, &args);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        cmd.spawn().map_err(|e| spawn_error(program, e))
    }

    /// Run a command attached to the terminal and return its exit code.
    #[instrument(skip(self, args), fields(program = %program.as_ref().to_string_lossy()))]
    pub async fn run_inherited<S, I>(&self, program: S, args: I) -> Result<Option<i32>, CompilerError>
    where
        S: AsRef<OsStr>,
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        let program = program.as_ref();
        let args = collect_args(args);

        let status = self
            .command(program, &args)
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| spawn_error(program, e))?;

        debug!(exit_code = ?status.code(), "Command completed");
        Ok(status.code())
    }
}

fn collect_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator,
    I::Item: AsRef<OsStr>,
{
    args.into_iter().map(|a| a.as_ref().to_os_string()).collect()
}

fn spawn_error(program: &OsStr, e: std::io::Error) -> CompilerError {
    if e.kind() == std::io::ErrorKind::NotFound {
        CompilerError::NotFound {
            program: program.to_string_lossy().to_string(),
            source: e,
        }
    } else {
        CompilerError::Io(e)
    }
}
