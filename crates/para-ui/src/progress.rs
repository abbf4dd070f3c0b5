//! Progress indicators for long-running operations.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// A progress bar for determinate progress.
///
/// The bar is released when the value is dropped: a bar that was never
/// finished is abandoned in place so the last drawn state stays visible.
pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    /// Create a progress bar that draws to the given target.
    pub fn with_target(
        total: u64,
        message: impl Into<String>,
        target: ProgressDrawTarget,
    ) -> Self {
        let bar = ProgressBar::with_draw_target(Some(total), target);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40.cyan/dim}] {percent:>3}%")
                .expect("valid template")
                .progress_chars("━━─"),
        );
        bar.set_message(message.into());
        Self { bar }
    }

    /// Create a progress bar that is never drawn.
    pub fn hidden(total: u64) -> Self {
        Self::with_target(total, "", ProgressDrawTarget::hidden())
    }

    /// Advance the progress by `delta` units.
    pub fn advance(&self, delta: u64) {
        self.bar.inc(delta);
    }

    /// Current position.
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Run `f` with the bar hidden, so that lines printed by `f` do not
    /// tear the bar.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }

    /// A second handle on the underlying bar.
    pub fn bar(&self) -> ProgressBar {
        self.bar.clone()
    }

    /// Finish the progress bar, leaving it on screen.
    pub fn finish(self) {
        self.bar.finish();
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.abandon();
        }
    }
}

/// A spinner for indeterminate progress.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Create a spinner that draws to the given target.
    pub fn with_target(message: impl Into<String>, target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(None, target);
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .expect("valid template"),
        );
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    /// Finish the spinner with a failure message.
    pub fn finish_error(self, message: impl Into<String>) {
        self.bar.set_style(
            ProgressStyle::default_spinner()
                .template("{msg}")
                .expect("valid template"),
        );
        self.bar
            .finish_with_message(format!("{} {}", console::style("✗").red(), message.into()));
    }

    /// Finish and clear the spinner.
    pub fn finish_clear(self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
