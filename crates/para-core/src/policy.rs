//! Abort policies for guarded call sites.

/// How a guarded call reacts to a failure.
///
/// One policy is attached to each guarded call site. Policies are built with
/// `const` builders so call sites can declare them as constants:
///
/// ```
/// use para_core::AbortPolicy;
///
/// const SETUP: AbortPolicy = AbortPolicy::new("Setup").reraise().preserve_exception();
/// assert!(SETUP.reraise);
/// assert!(SETUP.print_banner);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbortPolicy {
    /// Propagate failures to the caller instead of aborting.
    pub reraise: bool,
    /// Pass the original failure upward instead of wrapping it as an
    /// internal defect.
    pub preserve_exception: bool,
    /// Treat an internal defect like an explicit abort.
    pub abort_on_internal_errors: bool,
    /// Print the abort banner when aborting.
    pub print_banner: bool,
    /// Human-readable phase name shown on abort.
    pub step: &'static str,
}

impl AbortPolicy {
    /// A policy that aborts on every failure and prints the banner.
    pub const fn new(step: &'static str) -> Self {
        Self {
            reraise: false,
            preserve_exception: false,
            abort_on_internal_errors: false,
            print_banner: true,
            step,
        }
    }

    /// Propagate failures instead of aborting.
    pub const fn reraise(self) -> Self {
        Self {
            reraise: true,
            ..self
        }
    }

    /// Keep the original failure instead of wrapping it.
    pub const fn preserve_exception(self) -> Self {
        Self {
            preserve_exception: true,
            ..self
        }
    }

    /// Abort on internal defects even when reraising.
    pub const fn abort_on_internal_errors(self) -> Self {
        Self {
            abort_on_internal_errors: true,
            ..self
        }
    }

    /// Abort without printing the banner.
    pub const fn silent(self) -> Self {
        Self {
            print_banner: false,
            ..self
        }
    }
}

impl Default for AbortPolicy {
    fn default() -> Self {
        Self::new("Process")
    }
}
