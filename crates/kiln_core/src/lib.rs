//! Compilation of typed programs into FPGA hardware.
//!
//! A [`Compiler`] validates a [`TypedProgram`] and a
//! [`HardwareGenerationConfig`](kiln_config::HardwareGenerationConfig),
//! selects the device driver, derives the memory configuration and then
//! runs its pipeline of steps over a shared [`CompileContext`]:
//!
//! 1. [`ChannelConfigurator`] resolves the host communication channel.
//! 2. [`HardwareTransformer`] prices every operation on the device and
//!    generates one VHDL entity per member.
//! 3. [`VhdlBuildProvider`] writes the VHDL artifact.
//!
//! Third-party steps registered with [`Compiler::add_step`] run in the
//! same descending-priority order. A successful run yields a
//! [`HardwareRepresentation`].
//!
//! # Usage
//!
//! ```no_run
//! use kiln_config::HardwareGenerationConfig;
//! use kiln_core::{CompileOutcome, Compiler, TypedProgram};
//! use kiln_pipeline::CancellationToken;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let program = TypedProgram::load("program.json".as_ref())?;
//! let config = HardwareGenerationConfig::new("Alveo U50");
//! let compiler = Compiler::with_builtin_drivers()?;
//! if let CompileOutcome::Completed { representation, .. } =
//!     compiler.compile(program, config, &CancellationToken::new()).await?
//! {
//!     println!("{}", representation.implementation().artifact_path.display());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod compiler;
pub mod context;
pub mod error;
pub mod program;
pub mod representation;
pub mod steps;

pub use compiler::{CompileOutcome, Compiler};
pub use context::{CompileContext, MemberCost};
pub use error::{BuildError, ChannelError, CompileError, TransformError};
pub use program::{AssemblySource, HardwareMember, Port, ScalarType, TypedExpr, TypedProgram};
pub use representation::{HardwareImplementation, HardwareRepresentation};
pub use steps::{ChannelConfigurator, HardwareTransformer, VhdlBuildProvider};
