//! Command implementations.

mod compile;
mod run;
mod syntax_check;

use crate::cli::{Cli, Commands};
use anyhow::{Context as _, Result};
use para_compiler::ExternalCompiler;
use para_config::Config;
use para_core::{AbortPolicy, Failure, Halt, env};
use para_orchestrator::{Context, Interrupts, guard, hold_open, resolve_path};
use para_telemetry::TelemetryError;
use para_ui::{Output, Printer, TerminalPrompter, style};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Level;

const ENTRY: AbortPolicy = AbortPolicy::new("Process");
const VALIDATING_INPUT: AbortPolicy = AbortPolicy::new("Validating Input").reraise();

/// Run the CLI command.
pub async fn run(cli: Cli) -> Result<i32> {
    let mut printer = Printer::from_flags(cli.global.quiet, cli.global.verbose);
    if env::is_ci() {
        printer = printer.without_progress();
    }
    if cli.global.no_color || env::no_color() {
        style::set_colors(false);
    }
    let output = Output::with_printer(printer);

    let work_dir = std::env::current_dir().context("failed to determine the working directory")?;
    let config = Config::load(&work_dir, cli.global.config_file.as_deref())?;
    let compiler = ExternalCompiler::new(config.compiler_path())
        .with_leading_args(config.compiler_args())
        .with_working_dir(&work_dir);
    let prompter = TerminalPrompter::detect(cli.global.no_input);

    let ctx = Context::new(work_dir, Arc::new(compiler), Arc::new(prompter))
        .with_output(output)
        .with_config(config)
        .with_interrupts(Interrupts::install());

    let keep_open = cli.global.keep_open;
    let outcome = match cli.command {
        Some(Commands::Compile(args)) => compile::run(&ctx, keep_open, args).await,
        Some(Commands::Run(args)) => run::run(&ctx, keep_open, args).await,
        Some(Commands::SyntaxCheck(args)) => syntax_check::run(&ctx, keep_open, args).await,
        None => {
            // No command - show banner and help
            let outcome = guard(&ctx, ENTRY, async {
                use clap::CommandFactory;
                ctx.output.banner("Para Compiler CLI", env!("CARGO_PKG_VERSION"));
                Cli::command()
                    .print_help()
                    .map_err(|e| Halt::from(Failure::collaborator_with("failed to print help", e)))?;
                println!();
                Ok::<_, Halt>(0)
            })
            .await;
            if keep_open && outcome.is_ok() {
                hold_open(&ctx).await;
            }
            outcome
        }
    };

    Ok(exit_code(&ctx.output, outcome))
}

fn exit_code(output: &Output, outcome: Result<i32, Halt>) -> i32 {
    match outcome {
        Ok(code) => code,
        Err(halt) => {
            if let Some(failure) = halt.failure() {
                output.print_failure(failure);
            }
            i32::from(halt.exit_code())
        }
    }
}

/// Initialise logging for a command.
///
/// The log file defaults to the configured one and is resolved against the
/// working directory.
fn init_logging(
    ctx: &Context,
    log: Option<&Path>,
    debug: bool,
    banner_label: &str,
) -> Result<(), Failure> {
    let log = match log {
        Some(path) => path.to_path_buf(),
        None => ctx.config.log_file(),
    };
    let log = resolve_path(&ctx.work_dir, &log)?;
    let level = if debug || ctx.output.is_verbose() {
        Level::DEBUG
    } else {
        Level::INFO
    };

    ctx.logging
        .init(Some(&log), level, banner_label)
        .map_err(|e| match e {
            TelemetryError::LogFile { path, .. } => {
                Failure::user_input_at("The log file can not be opened", path)
            }
        })
}

/// Ask for a value the user did not pass on the command line.
async fn ask(ctx: &Context, question: &str, flag: &str) -> Result<String, Halt> {
    if !ctx.is_interactive() {
        return Err(Failure::user_input(format!("Missing input: pass it with {}", flag)).into());
    }
    let answer = guard(ctx, VALIDATING_INPUT, async {
        ctx.prompter.ask(question).await.map_err(Halt::from)
    })
    .await?;
    Ok(para_core::sanitize::strip_escapes(answer.trim()))
}

/// Resolve a source file, which must exist.
fn source_file(ctx: &Context, path: &Path) -> Result<PathBuf, Failure> {
    let resolved = resolve_path(&ctx.work_dir, path)?;
    if resolved.is_file() {
        Ok(resolved)
    } else {
        Err(Failure::user_input_at("Source file does not exist", resolved))
    }
}
