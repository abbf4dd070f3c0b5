//! The layers wrapped around every command handler.
//!
//! Arguments are sanitized first, the handler runs under the abort guard, and
//! the keep-open wait comes strictly after the guarded call has finished.

use crate::Context;
use crate::guard::guard;
use para_core::{AbortPolicy, Halt, Sanitize};
use std::future::Future;
use tracing::debug;

const KEEP_OPEN_PROMPT: &str = "Press Enter to exit...";

/// Run a command handler inside the standard layers.
pub async fn run_command<A, T, F, Fut>(
    ctx: &Context,
    policy: AbortPolicy,
    keep_open: bool,
    args: A,
    handler: F,
) -> Result<T, Halt>
where
    A: Sanitize,
    F: FnOnce(A) -> Fut,
    Fut: Future<Output = Result<T, Halt>>,
{
    let args = args.sanitize();
    let outcome = guard(ctx, policy, handler(args)).await;
    if keep_open && finished(&outcome) {
        hold_open(ctx).await;
    }
    outcome
}

/// The call completed or already reported its abort.
fn finished<T>(outcome: &Result<T, Halt>) -> bool {
    match outcome {
        Ok(_) => true,
        Err(halt) => halt.is_abort(),
    }
}

/// Block on a single interactive read.
///
/// Returns immediately when nobody can answer or the user interrupted.
pub async fn hold_open(ctx: &Context) {
    if !ctx.is_interactive() || ctx.interrupts.is_triggered() {
        debug!("keep-open skipped");
        return;
    }
    ctx.output.flush();
    tokio::select! {
        answer = ctx.prompter.ask(KEEP_OPEN_PROMPT) => {
            debug!(ok = answer.is_ok(), "keep-open released");
        }
        () = ctx.interrupts.wait() => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::context;
    use para_core::Failure;
    use para_ui::ScriptedPrompter;
    use std::path::PathBuf;
    use std::sync::Arc;

    #[derive(Debug)]
    struct Args {
        file: String,
        log: Option<PathBuf>,
    }

    impl Sanitize for Args {
        fn sanitize(self) -> Self {
            Self {
                file: self.file.sanitize(),
                log: self.log.sanitize(),
            }
        }
    }

    #[tokio::test]
    async fn test_handler_sees_sanitized_args() {
        let ctx = context(&std::env::temp_dir(), ScriptedPrompter::non_interactive());
        let args = Args {
            file: "\u{1b}[1mmain.para\u{1b}[0m".to_string(),
            log: Some(PathBuf::from("\u{1b}[2Jpara.log")),
        };
        let seen = run_command(&ctx, AbortPolicy::default(), false, args, |args| async move {
            Ok(args)
        })
        .await
        .unwrap();
        assert_eq!(seen.file, "main.para");
        assert_eq!(seen.log, Some(PathBuf::from("para.log")));
    }

    fn keep_open_context(prompter: Arc<ScriptedPrompter>) -> Context {
        let mut ctx = context(&std::env::temp_dir(), ScriptedPrompter::default());
        ctx.prompter = prompter;
        ctx
    }

    #[tokio::test]
    async fn test_keep_open_waits_after_success() {
        let prompter = Arc::new(ScriptedPrompter::new([""]));
        let ctx = keep_open_context(Arc::clone(&prompter));
        run_command(&ctx, AbortPolicy::default(), true, String::new(), |_| async { Ok(()) })
            .await
            .unwrap();
        assert_eq!(prompter.questions(), vec![KEEP_OPEN_PROMPT]);
    }

    #[tokio::test]
    async fn test_keep_open_waits_after_abort() {
        let prompter = Arc::new(ScriptedPrompter::new([""]));
        let ctx = keep_open_context(Arc::clone(&prompter));
        let halt = run_command(&ctx, AbortPolicy::default(), true, String::new(), |_| async {
            Err::<(), _>(Halt::from(Failure::collaborator("backend crashed")))
        })
        .await
        .unwrap_err();
        assert!(halt.is_abort());
        assert_eq!(prompter.questions().len(), 1);
    }

    #[tokio::test]
    async fn test_no_wait_unless_requested() {
        let prompter = Arc::new(ScriptedPrompter::new([""]));
        let ctx = keep_open_context(Arc::clone(&prompter));
        run_command(&ctx, AbortPolicy::default(), false, String::new(), |_| async { Ok(()) })
            .await
            .unwrap();
        assert!(prompter.questions().is_empty());
    }

    #[tokio::test]
    async fn test_no_wait_after_propagated_failure() {
        let prompter = Arc::new(ScriptedPrompter::new([""]));
        let ctx = keep_open_context(Arc::clone(&prompter));
        let policy = AbortPolicy::new("Compiling").reraise().preserve_exception();
        let halt = run_command(&ctx, policy, true, String::new(), |_| async {
            Err::<(), _>(Halt::from(Failure::user_input("bad")))
        })
        .await
        .unwrap_err();
        assert!(!halt.is_abort());
        assert!(prompter.questions().is_empty());
    }

    #[tokio::test]
    async fn test_no_wait_after_interrupt() {
        let prompter = Arc::new(ScriptedPrompter::new([""]));
        let ctx = keep_open_context(Arc::clone(&prompter));
        ctx.interrupts.trigger();
        let halt = run_command(&ctx, AbortPolicy::default(), true, String::new(), |_| {
            std::future::pending::<Result<(), Halt>>()
        })
        .await
        .unwrap_err();
        assert!(halt.is_abort());
        assert!(prompter.questions().is_empty());
    }
}
