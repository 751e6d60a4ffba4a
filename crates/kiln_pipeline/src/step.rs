//! The step interface.

use std::future::Future;
use std::pin::Pin;

use crate::cancel::CancellationToken;

/// Error type returned by steps.
///
/// Steps come from independent modules with their own error types, so the
/// runner only requires them to be errors.
pub type StepError = Box<dyn std::error::Error + Send + Sync>;

/// The future returned by [`PipelineStep::run`].
pub type StepFuture<'a> = Pin<Box<dyn Future<Output = Result<(), StepError>> + Send + 'a>>;

/// A unit of work executed by a [`PipelineRunner`](crate::PipelineRunner).
///
/// Steps are ordered by descending [`priority`](Self::priority). A step may
/// do its work synchronously and return an already completed future, or
/// suspend on I/O; the runner awaits it before starting the next step.
pub trait PipelineStep<C>: Send + Sync {
    /// Name used in logs and failure reports.
    fn name(&self) -> &str;

    /// Position in the pipeline; higher runs earlier.
    fn priority(&self) -> f64;

    /// Runs the step against the shared context.
    ///
    /// Steps doing external work should pass `cancel` on to it.
    fn run<'a>(&'a self, context: &'a mut C, cancel: &'a CancellationToken) -> StepFuture<'a>;
}

/// Wraps the result of synchronous work as a [`StepFuture`].
pub fn ready(result: Result<(), StepError>) -> StepFuture<'static> {
    Box::pin(std::future::ready(result))
}
