//! Per-invocation state shared by every layer of a command.

use para_compiler::Compiler;
use para_config::Config;
use para_telemetry::LoggingHandle;
use para_ui::{Output, Prompter};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

/// Process-level interactive cancellation.
///
/// Once triggered the signal stays set for the rest of the invocation.
#[derive(Debug, Clone)]
pub struct Interrupts {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl Interrupts {
    /// Create a signal that only fires when [`trigger`](Self::trigger) is
    /// called.
    pub fn manual() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    /// Create a signal fed by Ctrl-C.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn install() -> Self {
        let interrupts = Self::manual();
        let tx = Arc::clone(&interrupts.tx);
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("received interrupt");
                tx.send_replace(true);
            }
        });
        interrupts
    }

    /// Fire the signal.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// Check whether the signal has fired.
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until the signal fires.
    pub async fn wait(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|fired| *fired).await.is_err() {
            // The sender lives as long as `self`.
            std::future::pending::<()>().await;
        }
    }
}

/// Everything a command needs from its surroundings.
pub struct Context {
    /// Console output.
    pub output: Output,
    /// Logging setup, initialised lazily.
    pub logging: LoggingHandle,
    /// The compiler collaborator.
    pub compiler: Arc<dyn Compiler>,
    /// Source of answers to interactive questions.
    pub prompter: Arc<dyn Prompter>,
    /// Cancellation signal.
    pub interrupts: Interrupts,
    /// Directory relative paths are resolved against.
    pub work_dir: PathBuf,
    /// Merged configuration.
    pub config: Config,
}

impl Context {
    /// Create a context with default output and configuration and a manual
    /// interrupt signal.
    pub fn new(
        work_dir: impl Into<PathBuf>,
        compiler: Arc<dyn Compiler>,
        prompter: Arc<dyn Prompter>,
    ) -> Self {
        Self {
            output: Output::default(),
            logging: LoggingHandle::new(),
            compiler,
            prompter,
            interrupts: Interrupts::manual(),
            work_dir: work_dir.into(),
            config: Config::default(),
        }
    }

    /// Replace the output handler.
    pub fn with_output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Replace the interrupt signal.
    pub fn with_interrupts(mut self, interrupts: Interrupts) -> Self {
        self.interrupts = interrupts;
        self
    }

    /// Whether a user can answer questions.
    pub fn is_interactive(&self) -> bool {
        self.prompter.is_interactive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_manual_trigger_wakes_waiters() {
        let interrupts = Interrupts::manual();
        assert!(!interrupts.is_triggered());

        let waiter = interrupts.clone();
        let handle = tokio::spawn(async move { waiter.wait().await });
        interrupts.trigger();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(interrupts.is_triggered());
    }

    #[tokio::test]
    async fn test_wait_pending_until_triggered() {
        let interrupts = Interrupts::manual();
        let waited = tokio::time::timeout(Duration::from_millis(20), interrupts.wait()).await;
        assert!(waited.is_err());
    }
}
