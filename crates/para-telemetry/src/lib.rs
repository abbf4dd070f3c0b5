//! Telemetry and logging for para.
//!
//! Logging is not set up at startup. Commands initialise it once they know
//! where the log file goes, and the abort guard initialises it lazily on the
//! first failure. [`LoggingHandle::init`] is idempotent: only the first call
//! has an effect.

use para_core::EnvVars;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Error type for logging setup.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("unable to open log file: {}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Handle on the process logging setup.
#[derive(Debug, Default)]
pub struct LoggingHandle {
    banner_label: OnceLock<String>,
}

impl LoggingHandle {
    /// Create a handle with logging not yet initialised.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether logging is active.
    pub fn is_ready(&self) -> bool {
        self.banner_label.get().is_some()
    }

    /// The label result banners are printed with, set by the first `init`.
    pub fn banner_label(&self) -> Option<&str> {
        self.banner_label.get().map(String::as_str)
    }

    /// Initialise logging.
    ///
    /// Console output goes to stderr. When `log_file` is given, every line is
    /// also written there without colors. `RUST_LOG` overrides `level`.
    /// Calls after the first one return without changing anything.
    pub fn init(
        &self,
        log_file: Option<&Path>,
        level: Level,
        banner_label: &str,
    ) -> Result<(), TelemetryError> {
        if self.is_ready() {
            return Ok(());
        }

        let file = match log_file {
            Some(path) => Some(open_log_file(path)?),
            None => None,
        };

        install_subscriber(level, file);

        let _ = self.banner_label.set(banner_label.to_string());
        tracing::debug!(level = %level, log_file = ?log_file, "logging initialised");
        Ok(())
    }

    /// Initialise console-only logging at info level if nothing is active.
    pub fn ensure(&self) {
        // Console-only setup cannot fail.
        let _ = self.init(None, Level::INFO, "Para");
    }
}

fn open_log_file(path: &Path) -> Result<File, TelemetryError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| TelemetryError::LogFile {
            path: path.to_path_buf(),
            source,
        })?;
    }
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| TelemetryError::LogFile {
            path: path.to_path_buf(),
            source,
        })
}

/// Install the global subscriber.
///
/// A subscriber installed earlier in the process (by a test harness, for
/// example) stays in place.
fn install_subscriber(level: Level, file: Option<File>) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let file_layer = file.map(|f| {
        fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_writer(Mutex::new(f))
    });

    let subscriber = tracing_subscriber::registry().with(filter).with(file_layer);

    if std::env::var(EnvVars::PARA_LOG_JSON).is_ok() {
        let json_layer = fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_writer(std::io::stderr);

        let _ = subscriber.with(json_layer).try_init();
    } else {
        let console_layer = fmt::layer()
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr);

        let _ = subscriber.with(console_layer).try_init();
    }
}

/// A timing guard that logs duration on drop.
pub struct TimingGuard {
    name: String,
    start: std::time::Instant,
}

impl TimingGuard {
    /// Start timing an operation.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        tracing::debug!(
            operation = %self.name,
            duration_ms = duration.as_millis() as u64,
            "operation completed"
        );
    }
}
