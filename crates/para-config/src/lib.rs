//! Configuration for para.
//!
//! This crate handles:
//! - Parsing `para.toml` in the working directory
//! - Locating and parsing the global configuration file
//! - Merging both over the built-in defaults

pub mod combine;
pub mod config;

pub use combine::Combine;
pub use config::{
    CompilerConfig, Config, ConfigError, DefaultsConfig, OutputConfig, global_config_path,
};

/// The project configuration filename.
pub const CONFIG_FILENAME: &str = "para.toml";

/// Default backend executable.
pub const DEFAULT_COMPILER: &str = "parac";

/// Default build directory name.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Default dist directory name.
pub const DEFAULT_DIST_DIR: &str = "dist";

/// Default source encoding.
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Default log file.
pub const DEFAULT_LOG_FILE: &str = "para.log";
