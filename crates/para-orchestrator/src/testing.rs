//! Test doubles.

use crate::Context;
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use para_compiler::{
    CompilationRequest, CompileResult, Compiler, CompilerError, DiagnosticCounter, EventStream,
    ProgressEvent,
};
use para_ui::{Output, Printer, ScriptedPrompter};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// An in-memory compiler replaying fixed events.
#[derive(Default)]
pub struct MockCompiler {
    events: Mutex<Vec<Result<ProgressEvent, CompilerError>>>,
    result: CompileResult,
    requests: Mutex<Vec<CompilationRequest>>,
}

impl MockCompiler {
    pub fn with_result(result: CompileResult) -> Self {
        Self {
            result,
            ..Self::default()
        }
    }

    pub fn with_events(events: Vec<Result<ProgressEvent, CompilerError>>) -> Self {
        Self {
            events: Mutex::new(events),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<CompilationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Compiler for MockCompiler {
    fn name(&self) -> &str {
        "mock"
    }

    async fn compile(&self, request: &CompilationRequest) -> Result<CompileResult, CompilerError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.result.clone())
    }

    async fn compile_with_progress(
        &self,
        request: &CompilationRequest,
    ) -> Result<EventStream, CompilerError> {
        self.requests.lock().unwrap().push(request.clone());
        let events = std::mem::take(&mut *self.events.lock().unwrap());
        Ok(stream::iter(events).boxed())
    }

    async fn validate_syntax(
        &self,
        _file: &Path,
        _encoding: &str,
        _report_to_log: bool,
        _counter: &DiagnosticCounter,
    ) -> Result<(), CompilerError> {
        Ok(())
    }
}

/// A silent context rooted at `work_dir`.
pub fn context(work_dir: &Path, prompter: ScriptedPrompter) -> Context {
    context_with(work_dir, prompter, Arc::new(MockCompiler::default()))
}

/// A silent context driving `compiler`, which the caller can still inspect.
pub fn context_with(
    work_dir: &Path,
    prompter: ScriptedPrompter,
    compiler: Arc<MockCompiler>,
) -> Context {
    Context::new(work_dir, compiler, Arc::new(prompter))
        .with_output(Output::with_printer(Printer::Silent))
}
