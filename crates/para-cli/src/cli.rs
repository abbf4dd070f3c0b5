//! CLI argument parsing.

use clap::{Args, Parser, Subcommand};
use para_core::{EnvVars, Sanitize};
use std::path::PathBuf;

use crate::styles::STYLES;

/// para - Para compiler CLI
#[derive(Parser, Debug)]
#[command(name = "para")]
#[command(author, version, about = "Command-line interface for the Para compiler")]
#[command(long_about = None)]
#[command(propagate_version = true)]
#[command(styles = STYLES)]
#[command(after_help = "Use `para help <command>` for more information about a command.")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global arguments available to all commands.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true, env = EnvVars::PARA_VERBOSE)]
    pub verbose: bool,

    /// Suppress output (use twice for complete silence)
    #[arg(short, long, global = true, action = clap::ArgAction::Count, env = EnvVars::PARA_QUIET)]
    pub quiet: u8,

    /// Disable colored output
    #[arg(long, global = true, env = EnvVars::PARA_NO_COLOR)]
    pub no_color: bool,

    /// Never prompt for missing input
    #[arg(long, global = true, env = EnvVars::PARA_NO_INPUT)]
    pub no_input: bool,

    /// Path to the global configuration file
    #[arg(long, global = true, env = EnvVars::PARA_CONFIG_FILE)]
    pub config_file: Option<PathBuf>,

    /// Wait for Enter before exiting
    #[arg(long, global = true)]
    pub keep_open: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile and link a Para program
    Compile(CompileArgs),

    /// Compile a Para program and run the executable
    Run(RunArgs),

    /// Check a single file for syntax errors (imports excluded)
    SyntaxCheck(SyntaxCheckArgs),
}

/// Options shared by `compile` and `run`.
#[derive(Args, Debug, Clone, Default)]
pub struct CompileArgs {
    /// Files of the program, compiled and linked together (repeat or comma separate)
    #[arg(short = 'f', long = "file", value_delimiter = ',')]
    pub files: Vec<PathBuf>,

    /// Encoding the files are read with [default: utf-8]
    #[arg(long)]
    pub encoding: Option<String>,

    /// Log file for program messages [default: para.log]
    #[arg(short, long)]
    pub log: Option<PathBuf>,

    /// Overwrite the build folder without asking
    #[arg(long)]
    pub overwrite_build: bool,

    /// Overwrite the dist folder without asking
    #[arg(long)]
    pub overwrite_dist: bool,

    /// Emit the generated C source (default)
    #[arg(long, overrides_with = "no_source")]
    pub source: bool,

    /// Do not emit the generated C source
    #[arg(long, overrides_with = "source")]
    pub no_source: bool,

    /// Produce an executable next to the generated source
    #[arg(long, overrides_with = "no_executable")]
    pub executable: bool,

    /// Do not produce an executable (default)
    #[arg(long, overrides_with = "executable")]
    pub no_executable: bool,

    /// Compile without the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Log debug messages and request debug information
    #[arg(long)]
    pub debug: bool,
}

impl CompileArgs {
    /// Whether C source is emitted.
    pub fn emit_source(&self) -> bool {
        !self.no_source
    }

    /// Whether an executable is produced.
    pub fn emit_executable(&self) -> bool {
        self.executable && !self.no_executable
    }
}

impl Sanitize for CompileArgs {
    fn sanitize(self) -> Self {
        Self {
            files: self.files.sanitize(),
            encoding: self.encoding.sanitize(),
            log: self.log.sanitize(),
            ..self
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub compile: CompileArgs,

    /// Arguments passed to the program
    #[arg(last = true)]
    pub args: Vec<String>,
}

impl Sanitize for RunArgs {
    fn sanitize(self) -> Self {
        Self {
            compile: self.compile.sanitize(),
            args: self.args.sanitize(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SyntaxCheckArgs {
    /// Entry file to check
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Encoding the file is read with [default: utf-8]
    #[arg(long)]
    pub encoding: Option<String>,

    /// Log file for program messages [default: para.log]
    #[arg(short, long)]
    pub log: Option<PathBuf>,

    /// Log debug messages
    #[arg(long)]
    pub debug: bool,
}

impl Sanitize for SyntaxCheckArgs {
    fn sanitize(self) -> Self {
        Self {
            file: self.file.sanitize(),
            encoding: self.encoding.sanitize(),
            log: self.log.sanitize(),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_compile_flags() {
        let cli = Cli::parse_from([
            "para",
            "compile",
            "-f",
            "main.para,util.para",
            "--file",
            "extra.para",
            "--no-source",
            "--executable",
        ]);
        let Some(Commands::Compile(args)) = cli.command else {
            panic!("expected compile");
        };
        assert_eq!(args.files.len(), 3);
        assert!(!args.emit_source());
        assert!(args.emit_executable());
    }

    #[test]
    fn test_last_flag_wins() {
        let cli = Cli::parse_from(["para", "compile", "--no-source", "--source"]);
        let Some(Commands::Compile(args)) = cli.command else {
            panic!("expected compile");
        };
        assert!(args.emit_source());
        assert!(!args.emit_executable());
    }

    #[test]
    fn test_run_trailing_args() {
        let cli = Cli::parse_from(["para", "run", "-f", "main.para", "--", "--count", "3"]);
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.args, ["--count", "3"]);
    }

    #[test]
    fn test_keep_open_on_subcommand() {
        let cli = Cli::parse_from(["para", "syntax-check", "--keep-open", "-f", "main.para"]);
        assert!(cli.global.keep_open);
    }

    #[test]
    fn test_sanitize_compile_args() {
        let cli = Cli::parse_from(["para", "compile", "-f", "\u{1b}[32mmain.para\u{1b}[0m"]);
        let Some(Commands::Compile(args)) = cli.command else {
            panic!("expected compile");
        };
        assert_eq!(args.sanitize().files, [PathBuf::from("main.para")]);
    }
}
