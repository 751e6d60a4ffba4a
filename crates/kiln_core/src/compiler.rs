//! The compilation entry point.

use std::fmt;
use std::sync::Arc;

use kiln_config::HardwareGenerationConfig;
use kiln_device::{DriverRegistry, MemoryConfiguration};
use kiln_pipeline::{CancellationToken, FailurePolicy, PipelineRunner, PipelineStep, RunOutcome, StepFailure};

use crate::context::CompileContext;
use crate::error::CompileError;
use crate::program::TypedProgram;
use crate::representation::HardwareRepresentation;
use crate::steps::{ChannelConfigurator, HardwareTransformer, VhdlBuildProvider};

/// How a compilation ended.
#[derive(Debug)]
pub enum CompileOutcome {
    /// The pipeline ran to the end.
    Completed {
        /// What the compilation produced.
        representation: HardwareRepresentation,
        /// Steps that failed under [`FailurePolicy::Continue`].
        failures: Vec<StepFailure>,
    },
    /// The compilation was cancelled; partial results were discarded.
    Cancelled,
}

impl CompileOutcome {
    /// Returns the representation of a completed compilation.
    pub fn representation(&self) -> Option<&HardwareRepresentation> {
        match self {
            Self::Completed { representation, .. } => Some(representation),
            Self::Cancelled => None,
        }
    }

    /// Returns `true` for a cancelled compilation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Compiles typed programs into hardware for the registered devices.
///
/// A compiler starts with the built-in steps registered; further steps
/// join the same priority order.
pub struct Compiler {
    registry: DriverRegistry,
    pipeline: PipelineRunner<CompileContext>,
}

impl fmt::Debug for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiler")
            .field("devices", &self.registry.len())
            .field("steps", &self.pipeline.execution_order())
            .finish()
    }
}

impl Compiler {
    /// Creates a compiler over `registry` with the built-in steps.
    ///
    /// # Errors
    ///
    /// Fails only if a built-in step cannot be registered.
    pub fn new(registry: DriverRegistry) -> Result<Self, CompileError> {
        let mut pipeline = PipelineRunner::new();
        pipeline.register(ChannelConfigurator)?;
        pipeline.register(HardwareTransformer)?;
        pipeline.register(VhdlBuildProvider)?;
        Ok(Self { registry, pipeline })
    }

    /// Creates a compiler over the built-in device drivers.
    ///
    /// # Errors
    ///
    /// Fails only if a built-in driver or step is invalid.
    pub fn with_builtin_drivers() -> Result<Self, CompileError> {
        Self::new(DriverRegistry::with_builtin_drivers()?)
    }

    /// Sets the failure policy of the pipeline.
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.pipeline = std::mem::take(&mut self.pipeline).with_policy(policy);
        self
    }

    /// Adds a pipeline step.
    ///
    /// # Errors
    ///
    /// Fails for a NaN priority.
    pub fn add_step<S: PipelineStep<CompileContext> + 'static>(&mut self, step: S) -> Result<(), CompileError> {
        Ok(self.pipeline.register(step)?)
    }

    /// Adds an already boxed pipeline step.
    ///
    /// # Errors
    ///
    /// Fails for a NaN priority.
    pub fn add_boxed_step(&mut self, step: Box<dyn PipelineStep<CompileContext>>) -> Result<(), CompileError> {
        Ok(self.pipeline.register_boxed(step)?)
    }

    /// The device drivers available to compilations.
    pub fn registry(&self) -> &DriverRegistry {
        &self.registry
    }

    /// Step names in execution order.
    pub fn step_order(&self) -> Vec<&str> {
        self.pipeline.execution_order()
    }

    /// Compiles `program` for the device named in `config`.
    ///
    /// Validation happens before any step runs: in-memory assemblies, an
    /// unknown device and invalid memory settings fail fast.
    ///
    /// # Errors
    ///
    /// Returns the first validation error, the failing step under
    /// [`FailurePolicy::Abort`], or [`CompileError::Incomplete`] if the
    /// steps that ran produced no artifact.
    pub async fn compile(
        &self,
        program: TypedProgram,
        config: HardwareGenerationConfig,
        cancel: &CancellationToken,
    ) -> Result<CompileOutcome, CompileError> {
        let assemblies = program.assembly_paths()?;
        let driver = Arc::clone(self.registry.driver(&config.device_name)?);
        let memory = MemoryConfiguration::create(&config, &self.registry)?;
        log::info!(
            "compiling {} members from {} assemblies for {}",
            program.members.len(),
            assemblies.len(),
            config.device_name
        );

        let mut context = CompileContext::new(program, config, driver, memory);
        let failures = match self.pipeline.run(&mut context, cancel).await? {
            RunOutcome::Cancelled { completed } => {
                log::warn!("compilation cancelled after {} steps", completed.len());
                return Ok(CompileOutcome::Cancelled);
            }
            RunOutcome::Completed(report) => report.failures,
        };
        if cancel.is_cancelled() {
            log::warn!("compilation cancelled after the last step; discarding results");
            return Ok(CompileOutcome::Cancelled);
        }

        let representation = HardwareRepresentation::from_context(context)?;
        log::info!(
            "compiled {} for {}",
            representation.implementation().artifact_path.display(),
            representation.manifest().name()
        );
        Ok(CompileOutcome::Completed {
            representation,
            failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::{BUILD_PROVIDER_PRIORITY, CHANNEL_CONFIGURATOR_PRIORITY};
    use kiln_pipeline::{ready, StepFuture};

    struct Named(&'static str, f64);

    impl PipelineStep<CompileContext> for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn priority(&self) -> f64 {
            self.1
        }

        fn run<'a>(&'a self, _context: &'a mut CompileContext, _cancel: &'a CancellationToken) -> StepFuture<'a> {
            ready(Ok(()))
        }
    }

    #[test]
    fn builtin_step_order() {
        let compiler = Compiler::with_builtin_drivers().unwrap();
        assert_eq!(
            compiler.step_order(),
            ["channel-configurator", "hardware-transformer", "vhdl-build-provider"]
        );
    }

    #[test]
    fn added_steps_join_priority_order() {
        let mut compiler = Compiler::with_builtin_drivers().unwrap();
        compiler.add_step(Named("lint", 250.0)).unwrap();
        compiler
            .add_boxed_step(Box::new(Named("report", BUILD_PROVIDER_PRIORITY)))
            .unwrap();
        compiler.add_step(Named("first", CHANNEL_CONFIGURATOR_PRIORITY + 1.0)).unwrap();
        assert_eq!(
            compiler.step_order(),
            [
                "first",
                "channel-configurator",
                "lint",
                "hardware-transformer",
                "vhdl-build-provider",
                "report"
            ]
        );
    }

    #[test]
    fn nan_priority_is_rejected() {
        let mut compiler = Compiler::with_builtin_drivers().unwrap();
        assert!(matches!(
            compiler.add_step(Named("broken", f64::NAN)),
            Err(CompileError::Pipeline(_))
        ));
        assert_eq!(compiler.step_order().len(), 3);
    }

    #[test]
    fn policy_survives_builder() {
        let compiler = Compiler::with_builtin_drivers()
            .unwrap()
            .with_policy(FailurePolicy::Continue);
        assert_eq!(compiler.pipeline.policy(), FailurePolicy::Continue);
        assert_eq!(compiler.step_order().len(), 3);
    }
}
