//! The pipeline runner.

use std::fmt;

use crate::cancel::CancellationToken;
use crate::error::PipelineError;
use crate::order::order_by_priority;
use crate::step::{PipelineStep, StepError};

/// What the runner does when a step fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failure and return it.
    #[default]
    Abort,
    /// Record the failure and run the remaining steps.
    Continue,
}

/// A failure recorded under [`FailurePolicy::Continue`].
#[derive(Debug)]
pub struct StepFailure {
    /// Name of the failing step.
    pub step: String,
    /// Its priority.
    pub priority: f64,
    /// What the step reported.
    pub error: StepError,
}

/// Summary of a run that was not cancelled.
#[derive(Debug, Default)]
pub struct PipelineReport {
    /// Steps that completed successfully, in execution order.
    pub executed: Vec<String>,
    /// Steps that failed, in execution order. Empty under [`FailurePolicy::Abort`].
    pub failures: Vec<StepFailure>,
}

impl PipelineReport {
    /// Returns `true` if every step succeeded.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// How a pipeline run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// Every step was invoked.
    Completed(PipelineReport),
    /// The run was cancelled; results of the completed steps are to be discarded.
    Cancelled {
        /// Steps that completed before cancellation.
        completed: Vec<String>,
    },
}

impl RunOutcome {
    /// Returns `true` for a cancelled run.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Executes registered steps sequentially in descending priority.
///
/// Steps never run concurrently: each step's future is awaited to
/// completion before the next step starts, so side effects on the shared
/// context happen in one observable order.
pub struct PipelineRunner<C> {
    steps: Vec<Box<dyn PipelineStep<C>>>,
    policy: FailurePolicy,
}

impl<C> Default for PipelineRunner<C> {
    fn default() -> Self {
        Self {
            steps: Vec::new(),
            policy: FailurePolicy::default(),
        }
    }
}

impl<C> fmt::Debug for PipelineRunner<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineRunner")
            .field("steps", &self.execution_order())
            .field("policy", &self.policy)
            .finish()
    }
}

impl<C> PipelineRunner<C> {
    /// Creates an empty runner that aborts on the first failure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the failure policy.
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the failure policy.
    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Registers a step.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidPriority`] for a NaN priority.
    pub fn register<S: PipelineStep<C> + 'static>(&mut self, step: S) -> Result<(), PipelineError> {
        self.register_boxed(Box::new(step))
    }

    /// Registers an already boxed step.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidPriority`] for a NaN priority.
    pub fn register_boxed(&mut self, step: Box<dyn PipelineStep<C>>) -> Result<(), PipelineError> {
        let priority = step.priority();
        if priority.is_nan() {
            return Err(PipelineError::InvalidPriority {
                step: step.name().to_string(),
                priority,
            });
        }
        log::debug!("registered pipeline step '{}' (priority {priority})", step.name());
        self.steps.push(step);
        order_by_priority(&mut self.steps, |s| s.priority());
        Ok(())
    }

    /// Returns step names in the order [`run`](Self::run) invokes them.
    pub fn execution_order(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Returns the number of registered steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if no step is registered.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<C: Send> PipelineRunner<C> {
    /// Runs every step once, in order, against `context`.
    ///
    /// The token is checked before each step and raced against the running
    /// step; cancellation ends the run with [`RunOutcome::Cancelled`].
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::Abort`], returns the first step failure as
    /// [`PipelineError::StepFailed`]. Under [`FailurePolicy::Continue`]
    /// failures are collected in the report instead.
    pub async fn run(
        &self,
        context: &mut C,
        cancel: &CancellationToken,
    ) -> Result<RunOutcome, PipelineError> {
        let mut report = PipelineReport::default();

        for step in &self.steps {
            let name = step.name();
            let priority = step.priority();

            if cancel.is_cancelled() {
                log::info!("pipeline cancelled before step '{name}'");
                return Ok(RunOutcome::Cancelled {
                    completed: report.executed,
                });
            }

            log::debug!("running step '{name}' (priority {priority})");
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = step.run(context, cancel) => Some(result),
            };

            match result {
                None => {
                    log::info!("pipeline cancelled during step '{name}'");
                    return Ok(RunOutcome::Cancelled {
                        completed: report.executed,
                    });
                }
                Some(Ok(())) => {
                    log::debug!("step '{name}' finished");
                    report.executed.push(name.to_string());
                }
                Some(Err(error)) => match self.policy {
                    FailurePolicy::Abort => {
                        log::error!("step '{name}' failed: {error}");
                        return Err(PipelineError::StepFailed {
                            step: name.to_string(),
                            priority,
                            source: error,
                        });
                    }
                    FailurePolicy::Continue => {
                        log::warn!("step '{name}' failed, continuing: {error}");
                        report.failures.push(StepFailure {
                            step: name.to_string(),
                            priority,
                            error,
                        });
                    }
                },
            }
        }

        Ok(RunOutcome::Completed(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::{ready, StepFuture};
    use std::time::Duration;

    /// Appends its name to the trace.
    struct Record {
        name: &'static str,
        priority: f64,
    }

    impl PipelineStep<Vec<String>> for Record {
        fn name(&self) -> &str {
            self.name
        }

        fn priority(&self) -> f64 {
            self.priority
        }

        fn run<'a>(&'a self, trace: &'a mut Vec<String>, _cancel: &'a CancellationToken) -> StepFuture<'a> {
            trace.push(self.name.to_string());
            ready(Ok(()))
        }
    }

    /// Fails without touching the trace.
    struct Fail(f64);

    impl PipelineStep<Vec<String>> for Fail {
        fn name(&self) -> &str {
            "fail"
        }

        fn priority(&self) -> f64 {
            self.0
        }

        fn run<'a>(&'a self, _trace: &'a mut Vec<String>, _cancel: &'a CancellationToken) -> StepFuture<'a> {
            ready(Err("disk full".into()))
        }
    }

    /// Sleeps between a start and an end marker.
    struct Slow {
        name: &'static str,
        priority: f64,
    }

    impl PipelineStep<Vec<String>> for Slow {
        fn name(&self) -> &str {
            self.name
        }

        fn priority(&self) -> f64 {
            self.priority
        }

        fn run<'a>(&'a self, trace: &'a mut Vec<String>, _cancel: &'a CancellationToken) -> StepFuture<'a> {
            Box::pin(async move {
                trace.push(format!("{} start", self.name));
                tokio::time::sleep(Duration::from_millis(5)).await;
                trace.push(format!("{} end", self.name));
                Ok(())
            })
        }
    }

    /// Cancels the run and then waits for an external operation that never ends.
    struct CancelInside(f64);

    impl PipelineStep<Vec<String>> for CancelInside {
        fn name(&self) -> &str {
            "cancel-inside"
        }

        fn priority(&self) -> f64 {
            self.0
        }

        fn run<'a>(&'a self, _trace: &'a mut Vec<String>, cancel: &'a CancellationToken) -> StepFuture<'a> {
            Box::pin(async move {
                cancel.cancel();
                std::future::pending::<()>().await;
                Ok(())
            })
        }
    }

    fn recorded(priorities: &[(&'static str, f64)]) -> PipelineRunner<Vec<String>> {
        let mut runner = PipelineRunner::new();
        for &(name, priority) in priorities {
            runner.register(Record { name, priority }).unwrap();
        }
        runner
    }

    #[tokio::test]
    async fn descending_priority_with_stable_ties() {
        let runner = recorded(&[("step1", 1.0), ("step2", 5.0), ("step3", 3.0), ("step4", 5.0)]);
        assert_eq!(runner.execution_order(), ["step2", "step4", "step3", "step1"]);

        let mut trace = Vec::new();
        let outcome = runner.run(&mut trace, &CancellationToken::new()).await.unwrap();
        assert_eq!(trace, ["step2", "step4", "step3", "step1"]);
        match outcome {
            RunOutcome::Completed(report) => {
                assert!(report.is_success());
                assert_eq!(report.executed, ["step2", "step4", "step3", "step1"]);
            }
            RunOutcome::Cancelled { .. } => panic!("run was cancelled"),
        }
    }

    #[test]
    fn signed_zero_priorities_keep_registration_order() {
        let runner = recorded(&[("first", -0.0), ("second", 0.0), ("last", -1.0)]);
        assert_eq!(runner.execution_order(), ["first", "second", "last"]);
    }

    #[tokio::test]
    async fn order_is_identical_across_runs() {
        let runner = recorded(&[("a", 2.0), ("b", 2.0), ("c", 9.0), ("d", -3.0), ("e", 2.0)]);
        let mut first = Vec::new();
        let mut second = Vec::new();
        runner.run(&mut first, &CancellationToken::new()).await.unwrap();
        runner.run(&mut second, &CancellationToken::new()).await.unwrap();
        assert_eq!(first, ["c", "a", "b", "e", "d"]);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn abort_stops_at_first_failure() {
        let mut runner = recorded(&[("before", 10.0), ("after", 1.0)]);
        runner.register(Fail(5.0)).unwrap();

        let mut trace = Vec::new();
        let err = runner.run(&mut trace, &CancellationToken::new()).await.unwrap_err();
        assert_eq!(trace, ["before"]);
        match err {
            PipelineError::StepFailed { step, priority, .. } => {
                assert_eq!(step, "fail");
                assert_eq!(priority, 5.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn continue_collects_failures() {
        let mut runner = recorded(&[("before", 10.0), ("after", 1.0)]).with_policy(FailurePolicy::Continue);
        runner.register(Fail(5.0)).unwrap();

        let mut trace = Vec::new();
        let outcome = runner.run(&mut trace, &CancellationToken::new()).await.unwrap();
        assert_eq!(trace, ["before", "after"]);
        let RunOutcome::Completed(report) = outcome else {
            panic!("run was cancelled");
        };
        assert_eq!(report.executed, ["before", "after"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].step, "fail");
        assert_eq!(report.failures[0].error.to_string(), "disk full");
    }

    #[tokio::test]
    async fn async_steps_do_not_interleave() {
        let mut runner = PipelineRunner::new();
        runner.register(Slow { name: "first", priority: 2.0 }).unwrap();
        runner.register(Slow { name: "second", priority: 1.0 }).unwrap();

        let mut trace = Vec::new();
        runner.run(&mut trace, &CancellationToken::new()).await.unwrap();
        assert_eq!(trace, ["first start", "first end", "second start", "second end"]);
    }

    #[tokio::test]
    async fn cancelled_before_start() {
        let runner = recorded(&[("a", 1.0)]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut trace = Vec::new();
        let outcome = runner.run(&mut trace, &cancel).await.unwrap();
        assert!(trace.is_empty());
        assert!(matches!(outcome, RunOutcome::Cancelled { completed } if completed.is_empty()));
    }

    #[tokio::test]
    async fn cancelled_during_step() {
        let mut runner = recorded(&[("early", 10.0), ("late", 1.0)]);
        runner.register(CancelInside(5.0)).unwrap();

        let mut trace = Vec::new();
        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            runner.run(&mut trace, &CancellationToken::new()),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(trace, ["early"]);
        match outcome {
            RunOutcome::Cancelled { completed } => assert_eq!(completed, ["early"]),
            RunOutcome::Completed(_) => panic!("run was not cancelled"),
        }
    }

    #[test]
    fn nan_priority_is_rejected() {
        let mut runner: PipelineRunner<Vec<String>> = PipelineRunner::new();
        let err = runner
            .register(Record {
                name: "bad",
                priority: f64::NAN,
            })
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidPriority { ref step, .. } if step == "bad"));
        assert!(runner.is_empty());
    }
}
