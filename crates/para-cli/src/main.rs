//! para - Para compiler CLI
//!
//! Front end to the Para compiler: compiles programs, runs them and checks
//! source files for syntax errors.

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod styles;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging starts lazily, once a command knows its log file.
    let exit_code = commands::run(cli).await?;

    // Exit here so a prompt still blocked on stdin cannot hold up shutdown.
    std::process::exit(exit_code);
}
