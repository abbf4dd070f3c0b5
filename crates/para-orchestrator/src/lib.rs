//! Command orchestration for para.
//!
//! This crate holds the layers every command goes through: the abort guard,
//! output directory provisioning, the progress stream consumer and the
//! compilation built from them.

pub mod compilation;
pub mod context;
pub mod guard;
pub mod pipeline;
pub mod progress;
pub mod provision;

#[cfg(test)]
mod testing;

pub use compilation::{CompileOptions, compile};
pub use context::{Context, Interrupts};
pub use guard::guard;
pub use pipeline::{hold_open, run_command};
pub use progress::{consume, consume_with};
pub use provision::{
    DirectoryOutcome, DirectoryRequest, OutputDirs, Resolution, provision_output_dirs, resolve,
    resolve_path,
};
