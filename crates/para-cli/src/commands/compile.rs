//! Compile command implementation.

use super::{ask, init_logging, source_file};
use crate::cli::CompileArgs;
use para_compiler::CompileResult;
use para_core::{AbortPolicy, ExitCode, Failure, Halt};
use para_orchestrator::{CompileOptions, Context, run_command};
use std::path::PathBuf;

const COMPILING: AbortPolicy = AbortPolicy::new("Compiling");

/// Banner label for a compilation.
pub(super) const LABEL: &str = "Compilation";

/// Run the compile command.
///
/// A compilation that ran to the end exits successfully even when the
/// compiler reported errors; the result banner shows the failure.
pub async fn run(ctx: &Context, keep_open: bool, args: CompileArgs) -> Result<i32, Halt> {
    run_command(ctx, COMPILING, keep_open, args, |args| async move {
        compile(ctx, &args, false).await?;
        Ok::<i32, Halt>(ExitCode::Success.into())
    })
    .await
}

/// Compile the program described by `args`.
///
/// With `force_executable` an executable is requested regardless of the flags.
pub(super) async fn compile(
    ctx: &Context,
    args: &CompileArgs,
    force_executable: bool,
) -> Result<CompileResult, Halt> {
    let files = input_files(ctx, &args.files).await?;
    init_logging(ctx, args.log.as_deref(), args.debug, LABEL)?;
    para_orchestrator::compile(ctx, &options(args, files, force_executable)).await
}

fn options(args: &CompileArgs, files: Vec<PathBuf>, force_executable: bool) -> CompileOptions {
    CompileOptions {
        files,
        encoding: args.encoding.clone(),
        overwrite_build: args.overwrite_build,
        overwrite_dist: args.overwrite_dist,
        source: args.emit_source(),
        executable: force_executable || args.emit_executable(),
        debug: args.debug,
        progress: !args.no_progress,
    }
}

/// The source files to compile, prompting when none were given.
async fn input_files(ctx: &Context, given: &[PathBuf]) -> Result<Vec<PathBuf>, Halt> {
    let files = if given.is_empty() {
        let answer = ask(
            ctx,
            "Specify the files for your Para program (comma separated): ",
            "--file",
        )
        .await?;
        split_files(&answer)
    } else {
        given.to_vec()
    };

    if files.is_empty() {
        return Err(Failure::user_input("No source files were given").into());
    }
    files
        .iter()
        .map(|file| source_file(ctx, file).map_err(Halt::from))
        .collect()
}

fn split_files(answer: &str) -> Vec<PathBuf> {
    answer
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(PathBuf::from)
        .collect()
}
