//! Syntax check command implementation.

use super::{ask, init_logging, source_file};
use crate::cli::SyntaxCheckArgs;
use para_compiler::{CompilerError, DiagnosticCounter};
use para_core::{AbortPolicy, ExitCode, Halt};
use para_orchestrator::{Context, run_command};
use para_ui::Style;
use std::path::PathBuf;

const SYNTAX_CHECK: AbortPolicy = AbortPolicy::new("Syntax Check");

const LABEL: &str = "Syntax Check";

/// Run the syntax-check command.
pub async fn run(ctx: &Context, keep_open: bool, args: SyntaxCheckArgs) -> Result<i32, Halt> {
    run_command(ctx, SYNTAX_CHECK, keep_open, args, |args| check(ctx, args)).await
}

async fn check(ctx: &Context, args: SyntaxCheckArgs) -> Result<i32, Halt> {
    let file = match args.file {
        Some(file) => file,
        None => PathBuf::from(ask(ctx, "Specify the entry file of your Para program: ", "--file").await?),
    };
    let file = source_file(ctx, &file)?;
    init_logging(ctx, args.log.as_deref(), args.debug, LABEL)?;

    let encoding = args
        .encoding
        .unwrap_or_else(|| ctx.config.encoding().to_string());
    let counter = DiagnosticCounter::new();
    let spinner = ctx
        .output
        .spinner(format!("Checking {}", file.display()));
    match ctx
        .compiler
        .validate_syntax(&file, &encoding, true, &counter)
        .await
    {
        // Malformed input is already reported through the diagnostics.
        Ok(()) | Err(CompilerError::Rejected { .. }) => spinner.finish_clear(),
        Err(e) => {
            spinner.finish_error("Syntax check failed");
            return Err(e.into());
        }
    }

    let errors = counter.errors();
    let warnings = counter.warnings();
    let label = ctx.logging.banner_label().unwrap_or(LABEL);
    ctx.output.result_banner(label, errors == 0);
    ctx.output.println(&verdict(errors));
    ctx.output.println(&format!(
        "{} {}",
        Style::bold(Style::warning(format!("{} Warnings", warnings))),
        Style::bold(Style::error(format!("{} Errors", errors)))
    ));

    Ok(ExitCode::from_success(errors == 0).into())
}

fn verdict(errors: usize) -> String {
    match errors {
        0 => Style::bold(Style::info("Syntax check finished successfully")).to_string(),
        1 => Style::bold(Style::warning("Syntax check detected an error")).to_string(),
        _ => Style::bold(Style::warning("Syntax check detected multiple errors")).to_string(),
    }
}
