//! Deterministic, priority-ordered execution of pluggable steps.
//!
//! Transformation passes, build providers and hardware configurators are
//! written independently of each other. Each implements [`PipelineStep`]
//! with a priority; the [`PipelineRunner`] executes them one at a time in
//! descending priority, keeping registration order among equal priorities,
//! so any two runs with the same steps execute in the same order.
//!
//! # Usage
//!
//! ```
//! use kiln_pipeline::{CancellationToken, PipelineRunner, PipelineStep, RunOutcome, StepFuture};
//!
//! struct Push(&'static str, f64);
//!
//! impl PipelineStep<Vec<&'static str>> for Push {
//!     fn name(&self) -> &str {
//!         self.0
//!     }
//!
//!     fn priority(&self) -> f64 {
//!         self.1
//!     }
//!
//!     fn run<'a>(
//!         &'a self,
//!         trace: &'a mut Vec<&'static str>,
//!         _cancel: &'a CancellationToken,
//!     ) -> StepFuture<'a> {
//!         Box::pin(async move {
//!             trace.push(self.0);
//!             Ok(())
//!         })
//!     }
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let mut runner = PipelineRunner::new();
//! runner.register(Push("build", 100.0)).unwrap();
//! runner.register(Push("transform", 200.0)).unwrap();
//!
//! let mut trace = Vec::new();
//! let outcome = runner.run(&mut trace, &CancellationToken::new()).await.unwrap();
//! assert!(matches!(outcome, RunOutcome::Completed(_)));
//! assert_eq!(trace, ["transform", "build"]);
//! # });
//! ```

#![warn(missing_docs)]

pub mod cancel;
pub mod error;
pub mod order;
pub mod runner;
pub mod step;

pub use cancel::CancellationToken;
pub use error::PipelineError;
pub use order::order_by_priority;
pub use runner::{FailurePolicy, PipelineReport, PipelineRunner, RunOutcome, StepFailure};
pub use step::{ready, PipelineStep, StepError, StepFuture};
