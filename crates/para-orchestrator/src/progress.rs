//! Rendering a streamed compilation.

use futures::StreamExt;
use para_compiler::{CompileResult, EventStream, ProgressEvent};
use para_core::Failure;
use para_ui::{Output, Progress};

/// Position of a finished indicator.
const FULL: u64 = 100;

/// Drive a progress bar from `events` and return the compilation result.
///
/// The bar is released on every exit path, including when the returned
/// future is dropped mid-stream.
pub async fn consume(output: &Output, events: EventStream) -> Result<CompileResult, Failure> {
    consume_with(output.progress(FULL, "Processing..."), events).await
}

/// [`consume`] with a caller-supplied indicator.
///
/// Status events are logged at their level with the bar suspended and
/// advance it by the difference to the last percentage seen. Percentages
/// that go backwards or past 100 are clamped. Only the first terminal event
/// counts; a stream that ends without one is a collaborator failure.
pub async fn consume_with(
    progress: Progress,
    mut events: EventStream,
) -> Result<CompileResult, Failure> {
    let mut current: u64 = 0;

    while let Some(event) = events.next().await {
        match event? {
            ProgressEvent::Status {
                percent,
                message,
                level,
            } => {
                progress.suspend(|| level.log(&message));
                current = advance_to(&progress, current, percent);
            }
            ProgressEvent::Terminal { percent, result } => {
                advance_to(&progress, current, percent);
                progress.finish();
                return Ok(result);
            }
        }
    }

    Err(Failure::collaborator(
        "the compiler ended the progress stream without a result",
    ))
}

fn advance_to(progress: &Progress, current: u64, percent: u8) -> u64 {
    let target = u64::from(percent).min(FULL);
    progress.advance(target.saturating_sub(current));
    current.max(target)
}
