//! Pipeline errors.

use crate::step::StepError;

/// Errors that end a pipeline run or reject a step.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A step failed and the runner aborts on failure.
    #[error("pipeline step '{step}' (priority {priority}) failed: {source}")]
    StepFailed {
        /// Name of the failing step.
        step: String,
        /// Its priority.
        priority: f64,
        /// What the step reported.
        source: StepError,
    },

    /// A step's priority cannot be ordered.
    #[error("pipeline step '{step}' has an unorderable priority {priority}")]
    InvalidPriority {
        /// Name of the rejected step.
        step: String,
        /// The rejected priority.
        priority: f64,
    },
}
