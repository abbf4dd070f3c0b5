//! Run command implementation.

use super::compile::compile;
use crate::cli::RunArgs;
use para_compiler::{CommandRunner, CompileResult};
use para_core::{AbortPolicy, Failure, Halt};
use para_orchestrator::{Context, run_command};
use std::path::{Path, PathBuf};

const RUNNING: AbortPolicy = AbortPolicy::new("Running");

/// Run the run command.
pub async fn run(ctx: &Context, keep_open: bool, args: RunArgs) -> Result<i32, Halt> {
    run_command(ctx, RUNNING, keep_open, args, |args| execute(ctx, args)).await
}

async fn execute(ctx: &Context, args: RunArgs) -> Result<i32, Halt> {
    let result = compile(ctx, &args.compile, true).await?;
    let executable = executable(&ctx.work_dir, &result)?;

    ctx.output.status("Running", &executable.display().to_string());
    let code = CommandRunner::new()
        .with_working_dir(&ctx.work_dir)
        .run_inherited(&executable, &args.args)
        .await?;

    // A program killed by a signal has no exit code.
    Ok(code.unwrap_or(1))
}

/// The executable produced by a successful compilation.
fn executable(work_dir: &Path, result: &CompileResult) -> Result<PathBuf, Failure> {
    if !result.is_success() {
        return Err(Failure::collaborator(format!(
            "Compilation failed with {} error(s)",
            result.errors
        )));
    }
    match &result.executable {
        Some(path) if path.is_absolute() => Ok(path.clone()),
        Some(path) => Ok(work_dir.join(path)),
        None => Err(Failure::collaborator(
            "The compiler did not produce an executable",
        )),
    }
}
