//! Terminal UI helpers for para.
//!
//! This crate provides consistent output formatting, banners, the progress
//! indicator, spinners and interactive prompts for the para CLI.

pub mod output;
pub mod printer;
pub mod progress;
pub mod prompt;
pub mod style;

pub use output::Output;
pub use printer::Printer;
pub use progress::{Progress, Spinner};
pub use prompt::{Prompter, ScriptedPrompter, TerminalPrompter};
pub use style::Style;
