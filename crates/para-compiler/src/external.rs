//! A compiler backend reached as a separate executable.

use crate::protocol::BackendLine;
use crate::{
    CommandRunner, CompilationRequest, CompileResult, Compiler, CompilerError, DiagnosticCounter,
    EventStream, ProgressEvent, Result,
};
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, ChildStdout};
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

/// Drives a backend executable over the JSON-lines protocol.
#[derive(Debug, Clone)]
pub struct ExternalCompiler {
    program: PathBuf,
    leading_args: Vec<OsString>,
    runner: CommandRunner,
}

impl ExternalCompiler {
    /// Create an adapter for the given backend executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            runner: CommandRunner::new(),
        }
    }

    /// Arguments placed before the subcommand on every invocation.
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Run the backend from `dir`.
    pub fn with_working_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.runner = self.runner.with_working_dir(dir);
        self
    }

    fn compile_args(&self, request: &CompilationRequest, progress: bool) -> Vec<OsString> {
        let mut args = self.leading_args.clone();
        args.push("compile".into());
        args.push("--encoding".into());
        args.push(request.encoding.clone().into());
        args.push("--build-dir".into());
        args.push(request.build_dir.clone().into());
        args.push("--dist-dir".into());
        args.push(request.dist_dir.clone().into());
        if request.source {
            args.push("--source".into());
        }
        if request.executable {
            args.push("--executable".into());
        }
        if request.debug {
            args.push("--debug".into());
        }
        if progress {
            args.push("--progress".into());
        }
        args.extend(request.files.iter().map(|f| f.clone().into_os_string()));
        args
    }

    fn syntax_check_args(&self, file: &Path, encoding: &str) -> Vec<OsString> {
        let mut args = self.leading_args.clone();
        args.push("syntax-check".into());
        args.push("--encoding".into());
        args.push(encoding.into());
        args.push(file.as_os_str().to_os_string());
        args
    }
}

#[async_trait]
impl Compiler for ExternalCompiler {
    fn name(&self) -> &str {
        self.program
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("compiler")
    }

    #[instrument(skip(self, request), fields(files = request.files.len()))]
    async fn compile(&self, request: &CompilationRequest) -> Result<CompileResult> {
        let output = self
            .runner
            .run(&self.program, self.compile_args(request, false))
            .await?;

        let mut result = None;
        for line in output.stdout.lines() {
            match BackendLine::parse(line).map(BackendLine::into_event) {
                Some(Ok(ProgressEvent::Terminal { result: r, .. })) => {
                    if result.is_none() {
                        result = Some(r);
                    }
                }
                Some(Ok(ProgressEvent::Status { message, level, .. })) => level.log(&message),
                Some(Err(diagnostic)) => diagnostic.log(),
                None => debug!(target: "para::backend", "{}", line),
            }
        }

        match result {
            Some(result) => Ok(result),
            None if !output.success() => Err(CompilerError::Failed {
                exit_code: output.exit_code,
                stderr: output.stderr,
            }),
            None => Err(CompilerError::MissingResult),
        }
    }

    async fn compile_with_progress(&self, request: &CompilationRequest) -> Result<EventStream> {
        let mut child = self
            .runner
            .spawn(&self.program, self.compile_args(request, true))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("backend stdout is not piped"))?;
        let stderr = child.stderr.take().map(|mut stderr| {
            tokio::spawn(async move {
                let mut buf = String::new();
                let _ = stderr.read_to_string(&mut buf).await;
                buf
            })
        });

        let reader = EventReader {
            stdout: BufReader::new(stdout),
            line: Vec::new(),
            child,
            stderr,
        };
        Ok(event_stream(reader))
    }

    #[instrument(skip(self, counter))]
    async fn validate_syntax(
        &self,
        file: &Path,
        encoding: &str,
        report_to_log: bool,
        counter: &DiagnosticCounter,
    ) -> Result<()> {
        let output = self
            .runner
            .run(&self.program, self.syntax_check_args(file, encoding))
            .await?;

        let errors_before = counter.errors();
        for line in output.stdout.lines() {
            match BackendLine::parse(line).map(BackendLine::into_event) {
                Some(Err(diagnostic)) => {
                    counter.record(&diagnostic);
                    if report_to_log {
                        diagnostic.log();
                    }
                }
                Some(Ok(event)) => debug!(target: "para::backend", ?event, "ignoring event"),
                None => debug!(target: "para::backend", "{}", line),
            }
        }

        let errors = counter.errors() - errors_before;
        if output.success() && errors == 0 {
            Ok(())
        } else if errors > 0 {
            Err(CompilerError::Rejected { errors })
        } else {
            Err(CompilerError::Failed {
                exit_code: output.exit_code,
                stderr: output.stderr,
            })
        }
    }
}

/// Reads progress events from a running backend.
struct EventReader {
    stdout: BufReader<ChildStdout>,
    line: Vec<u8>,
    child: Child,
    stderr: Option<JoinHandle<String>>,
}

impl EventReader {
    async fn next_event(&mut self) -> Result<Option<ProgressEvent>> {
        while let Some(line) = self.next_line().await? {
            match BackendLine::parse(&line).map(BackendLine::into_event) {
                Some(Ok(event)) => return Ok(Some(event)),
                Some(Err(diagnostic)) => diagnostic.log(),
                None => debug!(target: "para::backend", "{}", line),
            }
        }

        let status = self.child.wait().await?;
        if status.success() {
            return Ok(None);
        }
        let stderr = match self.stderr.take() {
            Some(handle) => handle.await.unwrap_or_default(),
            None => String::new(),
        };
        Err(CompilerError::Failed {
            exit_code: status.code(),
            stderr,
        })
    }

    /// The next stdout line, decoded lossily like the captured output of `compile`.
    async fn next_line(&mut self) -> Result<Option<String>> {
        self.line.clear();
        if self.stdout.read_until(b'\n', &mut self.line).await? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&self.line);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

fn event_stream(reader: EventReader) -> EventStream {
    stream::unfold(Some(reader), |state| async move {
        let mut reader = state?;
        match reader.next_event().await {
            Ok(Some(event)) => Some((Ok(event), Some(reader))),
            Ok(None) => None,
            Err(e) => Some((Err(e), None)),
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompilationRequest {
        CompilationRequest {
            files: vec![PathBuf::from("main.para"), PathBuf::from("util.para")],
            encoding: "utf-8".to_string(),
            build_dir: PathBuf::from("/work/build"),
            dist_dir: PathBuf::from("/work/dist_2"),
            source: true,
            executable: false,
            debug: true,
        }
    }

    #[test]
    fn test_compile_args() {
        let compiler = ExternalCompiler::new("parac");
        let args: Vec<String> = compiler
            .compile_args(&request(), true)
            .into_iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        assert_eq!(
            args,
            [
                "compile",
                "--encoding",
                "utf-8",
                "--build-dir",
                "/work/build",
                "--dist-dir",
                "/work/dist_2",
                "--source",
                "--debug",
                "--progress",
                "main.para",
                "util.para",
            ]
        );
    }

    #[test]
    fn test_leading_args_and_name() {
        let compiler = ExternalCompiler::new("/opt/para/bin/parac").with_leading_args(["--quiet"]);
        let args = compiler.syntax_check_args(Path::new("main.para"), "latin-1");
        assert_eq!(args[0], OsString::from("--quiet"));
        assert_eq!(args[1], OsString::from("syntax-check"));
        assert_eq!(compiler.name(), "parac");
    }

    #[cfg(unix)]
    mod backend {
        use super::*;
        use futures::TryStreamExt;
        use std::fs;
        use tempfile::TempDir;

        /// A compiler run as `sh <script>` so no file needs to be executable.
        fn backend(script: &str) -> (TempDir, ExternalCompiler) {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("backend.sh");
            fs::write(&path, script).unwrap();
            let compiler = ExternalCompiler::new("sh").with_leading_args([path]);
            (dir, compiler)
        }

        #[tokio::test]
        async fn test_compile_reads_result() {
            let (_dir, compiler) = backend(
                r#"echo 'not a protocol line'
echo '{"event":"result","percent":100,"result":{"errors":0,"warnings":1}}'
"#,
            );
            let result = compiler.compile(&request()).await.unwrap();
            assert_eq!(result.warnings, 1);
            assert!(result.is_success());
        }

        #[tokio::test]
        async fn test_compile_failure_without_result() {
            let (_dir, compiler) = backend("echo 'cannot open main.para' >&2\nexit 2\n");
            let err = compiler.compile(&request()).await.unwrap_err();
            match err {
                CompilerError::Failed { exit_code, stderr } => {
                    assert_eq!(exit_code, Some(2));
                    assert!(stderr.contains("cannot open"));
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[tokio::test]
        async fn test_progress_stream_in_order() {
            let (_dir, compiler) = backend(
                r#"echo '{"event":"status","percent":10,"message":"Reading"}'
echo '{"event":"diagnostic","severity":"warning","message":"unused"}'
echo '{"event":"status","percent":60,"message":"Generating","level":"debug"}'
echo '{"event":"result","percent":100,"result":{"errors":0,"warnings":1}}'
"#,
            );
            let events: Vec<ProgressEvent> = compiler
                .compile_with_progress(&request())
                .await
                .unwrap()
                .try_collect()
                .await
                .unwrap();

            let percents: Vec<u8> = events
                .iter()
                .map(|event| match event {
                    ProgressEvent::Status { percent, .. } => *percent,
                    ProgressEvent::Terminal { percent, .. } => *percent,
                })
                .collect();
            assert_eq!(percents, [10, 60, 100]);
            assert!(matches!(events[2], ProgressEvent::Terminal { .. }));
        }

        #[tokio::test]
        async fn test_progress_stream_tolerates_invalid_utf8() {
            let (_dir, compiler) = backend(
                r#"printf 'warn \377\n'
echo '{"event":"result","percent":100,"result":{"errors":0,"warnings":0}}'
"#,
            );
            let events: Vec<ProgressEvent> = compiler
                .compile_with_progress(&request())
                .await
                .unwrap()
                .try_collect()
                .await
                .unwrap();

            assert_eq!(events.len(), 1);
            match &events[0] {
                ProgressEvent::Terminal { result, .. } => assert!(result.is_success()),
                other => panic!("unexpected event: {other:?}"),
            }

            let result = compiler.compile(&request()).await.unwrap();
            assert!(result.is_success());
        }

        #[tokio::test]
        async fn test_progress_stream_failed_backend() {
            let (_dir, compiler) = backend(
                "echo '{\"event\":\"status\",\"percent\":10,\"message\":\"Reading\"}'\necho boom >&2\nexit 1\n",
            );
            let mut stream = compiler.compile_with_progress(&request()).await.unwrap();
            assert!(matches!(stream.next().await, Some(Ok(ProgressEvent::Status { .. }))));
            match stream.next().await {
                Some(Err(CompilerError::Failed { stderr, .. })) => assert_eq!(stderr.trim(), "boom"),
                other => panic!("unexpected item: {other:?}"),
            }
            assert!(stream.next().await.is_none());
        }

        #[tokio::test]
        async fn test_validate_syntax_counts_diagnostics() {
            let (_dir, compiler) = backend(
                r#"echo '{"event":"diagnostic","severity":"error","message":"expected ;","file":"main.para","line":2}'
echo '{"event":"diagnostic","severity":"warning","message":"unused"}'
exit 1
"#,
            );
            let counter = DiagnosticCounter::new();
            let err = compiler
                .validate_syntax(Path::new("main.para"), "utf-8", false, &counter)
                .await
                .unwrap_err();

            assert!(matches!(err, CompilerError::Rejected { errors: 1 }));
            assert_eq!(counter.errors(), 1);
            assert_eq!(counter.warnings(), 1);
        }

        #[tokio::test]
        async fn test_validate_syntax_clean() {
            let (_dir, compiler) = backend("exit 0\n");
            let counter = DiagnosticCounter::new();
            compiler
                .validate_syntax(Path::new("main.para"), "utf-8", true, &counter)
                .await
                .unwrap();
            assert_eq!(counter.errors(), 0);
        }
    }
}
