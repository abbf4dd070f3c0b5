//! Environment variable constants for para.
//!
//! This module defines all environment variables that para recognizes,
//! providing a single source of truth for environment configuration.

/// Environment variable names used by para.
pub struct EnvVars;

impl EnvVars {
    // ─── Global Settings ─────────────────────────────────────────────────────

    /// Path to the global para configuration file.
    pub const PARA_CONFIG_FILE: &'static str = "PARA_CONFIG_FILE";

    /// Enable verbose output.
    pub const PARA_VERBOSE: &'static str = "PARA_VERBOSE";

    /// Suppress output.
    pub const PARA_QUIET: &'static str = "PARA_QUIET";

    /// Disable colored output.
    pub const PARA_NO_COLOR: &'static str = "PARA_NO_COLOR";

    /// Never prompt, even on a terminal.
    pub const PARA_NO_INPUT: &'static str = "PARA_NO_INPUT";

    /// Enable JSON log output on the console.
    pub const PARA_LOG_JSON: &'static str = "PARA_LOG_JSON";

    // ─── Compiler Settings ───────────────────────────────────────────────────

    /// Path to the compiler backend executable.
    pub const PARA_COMPILER: &'static str = "PARA_COMPILER";

    // ─── Standard Environment Variables ──────────────────────────────────────

    /// Standard NO_COLOR environment variable.
    pub const NO_COLOR: &'static str = "NO_COLOR";

    /// Standard CLICOLOR environment variable.
    pub const CLICOLOR: &'static str = "CLICOLOR";

    /// CI environment indicator.
    pub const CI: &'static str = "CI";
}

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    std::env::var(EnvVars::CI).is_ok()
}

/// Check if colors should be disabled based on environment.
pub fn no_color() -> bool {
    std::env::var(EnvVars::NO_COLOR).is_ok()
        || std::env::var(EnvVars::PARA_NO_COLOR).is_ok()
        || std::env::var(EnvVars::CLICOLOR)
            .map(|v| v == "0")
            .unwrap_or(false)
}
