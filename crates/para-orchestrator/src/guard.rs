//! The abort guard.
//!
//! Every guarded operation ends in one of three ways: its failure is
//! propagated to the caller, the process is aborted with the banner, or the
//! process is aborted silently. An abort is returned as [`Halt::Abort`] and
//! passes every outer guard untouched until `main` turns it into the exit
//! status.

use crate::Context;
use para_core::{Abort, AbortPolicy, Failure, FailureKind, Halt};
use std::future::Future;
use tracing::{debug, error};

const UNEXPECTED: &str = "Encountered unexpected failure while running";

/// Run `operation` under `policy`.
///
/// The interrupt signal is observed while the operation is suspended. When it
/// fires, the operation is dropped and the interrupt is classified like any
/// other failure.
pub async fn guard<T, F>(ctx: &Context, policy: AbortPolicy, operation: F) -> Result<T, Halt>
where
    F: Future<Output = Result<T, Halt>>,
{
    let outcome = tokio::select! {
        biased;
        result = operation => result,
        () = ctx.interrupts.wait() => Err(Halt::Interrupt),
    };

    outcome.map_err(|halt| classify(ctx, policy, halt))
}

/// Decide what a guard does with `halt`.
fn classify(ctx: &Context, policy: AbortPolicy, halt: Halt) -> Halt {
    let raised = match halt {
        Halt::Abort(abort) => return Halt::Abort(abort),

        Halt::Failure(Failure::UserCancelled) => return abort(ctx, policy, None),

        Halt::Interrupt if policy.preserve_exception => Halt::Interrupt,
        Halt::Interrupt => {
            debug!(step = policy.step, "interrupt treated as cancellation");
            return abort(ctx, policy, None);
        }

        Halt::Failure(failure) => Halt::Failure(settle(ctx, policy, failure)),
    };

    let is_defect = raised.failure().map(Failure::kind) == Some(FailureKind::InternalDefect);
    if policy.abort_on_internal_errors && is_defect {
        abort(ctx, policy, raised.failure())
    } else if policy.reraise {
        raised
    } else {
        abort(ctx, policy, raised.failure())
    }
}

/// Trace a failure and wrap it unless the policy preserves it.
fn settle(ctx: &Context, policy: AbortPolicy, failure: Failure) -> Failure {
    ctx.logging.ensure();

    match failure.kind() {
        FailureKind::Collaborator => critical(policy, &failure),
        FailureKind::InternalDefect if !traced(&failure) => critical(policy, &failure),
        _ => debug!(step = policy.step, error = %failure.chain(), "guarded operation failed"),
    }

    if policy.preserve_exception {
        failure
    } else {
        failure.into_internal(UNEXPECTED)
    }
}

fn critical(policy: AbortPolicy, failure: &Failure) {
    error!(severity = "critical", step = policy.step, error = %failure.chain(), "{}", UNEXPECTED);
}

/// Whether a defect wraps a collaborator failure that was traced already.
fn traced(failure: &Failure) -> bool {
    std::error::Error::source(failure)
        .and_then(|cause| cause.downcast_ref::<Failure>())
        .is_some_and(|cause| cause.kind() == FailureKind::Collaborator)
}

fn abort(ctx: &Context, policy: AbortPolicy, failure: Option<&Failure>) -> Halt {
    if let Some(failure) = failure
        && failure.user_input_cause().is_some()
    {
        ctx.output.print_failure(failure);
    }
    if policy.print_banner {
        ctx.output.abort_banner(policy.step);
    }
    debug!(step = policy.step, banner = policy.print_banner, "aborting");
    Halt::Abort(Abort::new(policy.step, policy.print_banner))
}
