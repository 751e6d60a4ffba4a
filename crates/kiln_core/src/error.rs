//! Errors of the compilation flow and its built-in steps.

use std::path::PathBuf;

use kiln_config::ConfigError;
use kiln_device::DeviceError;
use kiln_pipeline::PipelineError;
use kiln_timing::TimingError;

/// The single terminal error of a compilation.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// An assembly exists only in memory and cannot be handed to the toolchain.
    #[error("assembly '{name}' exists only in memory; hardware compilation requires file-backed assemblies")]
    InMemoryAssembly {
        /// Name of the in-memory assembly.
        name: String,
    },

    /// The program lists no assemblies.
    #[error("the program lists no assemblies")]
    NoAssemblies,

    /// The pipeline finished without producing a required result.
    #[error("compilation finished without {missing}; no registered step produced it")]
    Incomplete {
        /// What is missing.
        missing: &'static str,
    },

    /// The program file could not be read.
    #[error("failed to read program '{path}': {source}")]
    ProgramRead {
        /// The program file.
        path: PathBuf,
        /// The I/O error.
        source: std::io::Error,
    },

    /// The program is not valid JSON for the input model.
    #[error("invalid program: {0}")]
    Program(#[from] serde_json::Error),

    /// Device selection or memory configuration failed.
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// The request configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A pipeline step failed or could not be registered.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Errors of the channel configurator step.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Neither the request nor the device names a channel.
    #[error("device '{device}' has no communication channel")]
    NoChannel {
        /// The device.
        device: String,
    },

    /// The requested channel is not supported by the device.
    #[error("device '{device}' does not support channel '{channel}' (supported: {})", .supported.join(", "))]
    Unsupported {
        /// The device.
        device: String,
        /// The requested channel.
        channel: String,
        /// Channels the device supports.
        supported: Vec<String>,
    },
}

/// Errors of the hardware transformer step.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// The program has no members to implement.
    #[error("the program has no hardware members")]
    NoMembers,

    /// Two members map to the same hardware entity name, ignoring case.
    #[error("members '{first}' and '{second}' map to the same entity name '{entity}'")]
    NameCollision {
        /// The first member.
        first: String,
        /// The second member.
        second: String,
        /// The shared entity name.
        entity: String,
    },

    /// Two inputs of a member map to the same port name.
    #[error("member '{member}': inputs '{first}' and '{second}' map to the same port '{port}'")]
    PortCollision {
        /// The member.
        member: String,
        /// The first input.
        first: String,
        /// The second input.
        second: String,
        /// The shared port name.
        port: String,
    },

    /// A variable does not name an input of its member.
    #[error("member '{member}': unknown variable '{name}'")]
    UnknownVariable {
        /// The member.
        member: String,
        /// The variable.
        name: String,
    },

    /// An operation has no operands.
    #[error("member '{member}': `{op}` has no operands")]
    EmptyOperands {
        /// The member.
        member: String,
        /// The operator mnemonic.
        op: &'static str,
    },

    /// A non-associative operation does not have exactly two operands.
    #[error("member '{member}': `{op}` takes exactly two operands, found {count}")]
    OperandCount {
        /// The member.
        member: String,
        /// The operator mnemonic.
        op: &'static str,
        /// Operands found.
        count: usize,
    },

    /// A comparison appears below the top of a member body.
    #[error("member '{member}': comparisons are only supported as the member's result")]
    NestedComparison {
        /// The member.
        member: String,
    },

    /// A comparison member does not return a single bit.
    #[error("member '{member}': a comparison result must be one bit wide, found {width}")]
    ComparisonWidth {
        /// The member.
        member: String,
        /// The declared result width.
        width: u32,
    },

    /// Negation of an unsigned value.
    #[error("member '{member}': negation requires a signed operand")]
    UnsignedNegation {
        /// The member.
        member: String,
    },

    /// A port, constant or operation is zero bits wide.
    #[error("member '{member}': zero-width value")]
    ZeroWidth {
        /// The member.
        member: String,
    },

    /// Pricing an operation failed.
    #[error(transparent)]
    Timing(#[from] TimingError),

    /// The member's data does not fit the device memory.
    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// Errors of the VHDL build provider step.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// No earlier step produced a hardware description.
    #[error("no hardware description to build")]
    NoDescription,

    /// The description is not VHDL.
    #[error("the VHDL build provider cannot build {language} sources")]
    UnsupportedLanguage {
        /// The description's language.
        language: kiln_hdl::HdlLanguage,
    },

    /// Writing the artifact failed.
    #[error("failed to write '{path}': {source}")]
    Write {
        /// The artifact path.
        path: PathBuf,
        /// The I/O error.
        source: std::io::Error,
    },

    /// Removing the artifact of a cancelled build failed.
    #[error("failed to remove '{path}' after cancellation: {source}")]
    Remove {
        /// The artifact path.
        path: PathBuf,
        /// The I/O error.
        source: std::io::Error,
    },
}
