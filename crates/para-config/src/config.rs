//! Configuration files.
//!
//! ```toml
//! # para.toml
//!
//! [compiler]
//! path = "python3"
//! args = ["-m", "parac"]
//!
//! [output]
//! build_dir = "build"
//! dist_dir = "dist"
//!
//! [defaults]
//! encoding = "utf-8"
//! log = "para.log"
//! ```

use crate::combine::Combine;
use crate::{
    CONFIG_FILENAME, DEFAULT_BUILD_DIR, DEFAULT_COMPILER, DEFAULT_DIST_DIR, DEFAULT_ENCODING,
    DEFAULT_LOG_FILE,
};
use para_core::EnvVars;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Compiler backend section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Backend executable
    pub path: Option<String>,
    /// Arguments placed before the backend subcommand
    pub args: Option<Vec<String>>,
}

/// Output directory section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Build directory name, relative to the working directory
    pub build_dir: Option<String>,
    /// Dist directory name, relative to the working directory
    pub dist_dir: Option<String>,
}

/// Defaults for command options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Source file encoding
    pub encoding: Option<String>,
    /// Log file
    pub log: Option<PathBuf>,
}

/// para configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub compiler: CompilerConfig,
    pub output: OutputConfig,
    pub defaults: DefaultsConfig,
}

impl Config {
    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Parse configuration from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `para.toml` from `work_dir` merged over the global configuration.
    ///
    /// `global` replaces the platform location of the global file. Missing
    /// files are skipped.
    pub fn load(work_dir: &Path, global: Option<&Path>) -> Result<Self, ConfigError> {
        let project = load_optional(&work_dir.join(CONFIG_FILENAME))?;
        let global_path = global.map(Path::to_path_buf).or_else(global_config_path);
        let global = match global_path {
            Some(path) => load_optional(&path)?,
            None => None,
        };

        Ok(project
            .unwrap_or_default()
            .combine(global.unwrap_or_default()))
    }

    /// The backend executable. `PARA_COMPILER` takes precedence.
    pub fn compiler_path(&self) -> String {
        env_compiler()
            .or_else(|| self.compiler.path.clone())
            .unwrap_or_else(|| DEFAULT_COMPILER.to_string())
    }

    /// Leading backend arguments. `PARA_COMPILER` replaces the whole
    /// invocation, so none apply while it is set.
    pub fn compiler_args(&self) -> &[String] {
        if env_compiler().is_some() {
            return &[];
        }
        self.compiler.args.as_deref().unwrap_or_default()
    }

    /// The build directory name.
    pub fn build_dir(&self) -> &str {
        self.output.build_dir.as_deref().unwrap_or(DEFAULT_BUILD_DIR)
    }

    /// The dist directory name.
    pub fn dist_dir(&self) -> &str {
        self.output.dist_dir.as_deref().unwrap_or(DEFAULT_DIST_DIR)
    }

    /// The default source encoding.
    pub fn encoding(&self) -> &str {
        self.defaults.encoding.as_deref().unwrap_or(DEFAULT_ENCODING)
    }

    /// The default log file.
    pub fn log_file(&self) -> PathBuf {
        self.defaults
            .log
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
    }
}

fn env_compiler() -> Option<String> {
    std::env::var(EnvVars::PARA_COMPILER)
        .ok()
        .filter(|p| !p.trim().is_empty())
}

fn load_optional(path: &Path) -> Result<Option<Config>, ConfigError> {
    if !path.exists() {
        debug!("config file does not exist: {}", path.display());
        return Ok(None);
    }
    debug!("loading config from: {}", path.display());
    Config::from_file(path).map(Some)
}

/// Get the path to the global config file.
///
/// `PARA_CONFIG_FILE` overrides the platform location. Returns `None` if no
/// home directory can be determined.
pub fn global_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(EnvVars::PARA_CONFIG_FILE)
        && !path.trim().is_empty()
    {
        return Some(PathBuf::from(path));
    }
    directories::ProjectDirs::from("", "", "para").map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_empty() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.build_dir(), "build");
        assert_eq!(config.dist_dir(), "dist");
        assert_eq!(config.encoding(), "utf-8");
        assert_eq!(config.log_file(), PathBuf::from("para.log"));
    }

    #[test]
    fn test_parse_sections() {
        let toml = r#"
[compiler]
path = "/opt/para/bin/parac"
args = ["--color", "never"]

[output]
build_dir = "out"

[defaults]
encoding = "latin-1"
log = "logs/para.log"
"#;
        let config = Config::parse(toml).unwrap();
        assert_eq!(config.compiler.path.as_deref(), Some("/opt/para/bin/parac"));
        assert_eq!(
            config.compiler.args.as_deref(),
            Some(["--color".to_string(), "never".to_string()].as_slice())
        );
        assert_eq!(config.build_dir(), "out");
        assert_eq!(config.dist_dir(), "dist");
        assert_eq!(config.encoding(), "latin-1");
        assert_eq!(config.log_file(), PathBuf::from("logs/para.log"));
    }

    #[test]
    fn test_load_project_over_global() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILENAME),
            "[output]\nbuild_dir = \"project-build\"\n",
        )
        .unwrap();
        let global = dir.path().join("global.toml");
        std::fs::write(
            &global,
            "[output]\nbuild_dir = \"global-build\"\ndist_dir = \"global-dist\"\n",
        )
        .unwrap();

        let config = Config::load(dir.path(), Some(global.as_path())).unwrap();
        assert_eq!(config.build_dir(), "project-build");
        assert_eq!(config.dist_dir(), "global-dist");
    }

    #[test]
    fn test_load_missing_files() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path(), Some(dir.path().join("absent.toml").as_path())).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "[output\n").unwrap();
        let err = Config::load(dir.path(), Some(dir.path().join("absent.toml").as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }
}
