//! A compilation from provisioning to the printed summary.

use crate::Context;
use crate::guard::guard;
use crate::progress::consume;
use crate::provision::provision_output_dirs;
use para_compiler::{CompilationRequest, CompileResult};
use para_core::{AbortPolicy, Halt};
use para_telemetry::TimingGuard;
use para_ui::Style;
use std::path::PathBuf;
use tracing::debug;

/// The collaborator call. Failures are wrapped and reraised so the trace
/// carries this phase and the command's guard decides how to end.
const COMPILATION: AbortPolicy = AbortPolicy::new("Compilation").reraise();

/// What to compile and how.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub files: Vec<PathBuf>,
    /// Falls back to the configured encoding.
    pub encoding: Option<String>,
    pub overwrite_build: bool,
    pub overwrite_dist: bool,
    pub source: bool,
    pub executable: bool,
    pub debug: bool,
    /// Stream progress events instead of waiting for the result.
    pub progress: bool,
}

/// Provision the output directories, run the compiler and print the summary.
///
/// The result banner is printed only once logging is active.
pub async fn compile(ctx: &Context, options: &CompileOptions) -> Result<CompileResult, Halt> {
    let dirs = provision_output_dirs(ctx, options.overwrite_build, options.overwrite_dist).await?;
    let request = CompilationRequest {
        files: options.files.clone(),
        encoding: options
            .encoding
            .clone()
            .unwrap_or_else(|| ctx.config.encoding().to_string()),
        build_dir: dirs.build.path,
        dist_dir: dirs.dist.path,
        source: options.source,
        executable: options.executable,
        debug: options.debug,
    };
    debug!(?request, compiler = ctx.compiler.name(), "compiling");

    ctx.output.status(
        "Compiling",
        &format!("{} file(s) into {}", request.files.len(), request.dist_dir.display()),
    );

    let _timing = TimingGuard::new("compile");
    let result = guard(ctx, COMPILATION, run_compiler(ctx, &request, options.progress)).await?;

    if let Some(label) = ctx.logging.banner_label() {
        ctx.output.result_banner(label, result.is_success());
    }
    ctx.output.println(&format!(
        "{} {}",
        Style::warning(format!("{} Warnings", result.warnings)),
        Style::error(format!("{} Errors", result.errors))
    ));
    Ok(result)
}

async fn run_compiler(
    ctx: &Context,
    request: &CompilationRequest,
    progress: bool,
) -> Result<CompileResult, Halt> {
    if !progress {
        return Ok(ctx.compiler.compile(request).await?);
    }
    let events = ctx.compiler.compile_with_progress(request).await?;
    Ok(consume(&ctx.output, events).await?)
}
