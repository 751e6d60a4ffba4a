//! The result of a successful compilation.

use std::path::PathBuf;

use kiln_arch::DeviceManifest;
use kiln_common::ContentHash;
use kiln_device::{MemoryConfiguration, MemoryLayout};
use kiln_hdl::HardwareDescription;
use serde::Serialize;

use crate::context::{CompileContext, MemberCost};
use crate::error::CompileError;

/// The artifact a build provider produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HardwareImplementation {
    /// Where the artifact was written.
    pub artifact_path: PathBuf,
    /// Fingerprint of the artifact's bytes.
    pub checksum: ContentHash,
}

/// Everything a compilation produced, fixed at construction.
#[derive(Debug, Clone)]
pub struct HardwareRepresentation {
    assembly_paths: Vec<PathBuf>,
    description: HardwareDescription,
    implementation: HardwareImplementation,
    manifest: DeviceManifest,
    memory: MemoryConfiguration,
    memory_layout: Option<MemoryLayout>,
    channel: Option<String>,
    member_costs: Vec<MemberCost>,
}

impl HardwareRepresentation {
    /// Assembles the representation from a finished compile context.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Incomplete`] if no step produced a
    /// description or an implementation, and the assembly validation errors
    /// of [`TypedProgram::assembly_paths`](crate::TypedProgram::assembly_paths).
    pub(crate) fn from_context(context: CompileContext) -> Result<Self, CompileError> {
        let assembly_paths = context.program.assembly_paths()?;
        let manifest = context.manifest().clone();
        let description = context.description.ok_or(CompileError::Incomplete {
            missing: "a hardware description",
        })?;
        let implementation = context.implementation.ok_or(CompileError::Incomplete {
            missing: "an implementation artifact",
        })?;
        Ok(Self {
            assembly_paths,
            description,
            implementation,
            manifest,
            memory: context.memory,
            memory_layout: context.memory_layout,
            channel: context.channel,
            member_costs: context.member_costs,
        })
    }

    /// Paths of the compiled assemblies.
    pub fn assembly_paths(&self) -> &[PathBuf] {
        &self.assembly_paths
    }

    /// The generated hardware description.
    pub fn description(&self) -> &HardwareDescription {
        &self.description
    }

    /// The built artifact.
    pub fn implementation(&self) -> &HardwareImplementation {
        &self.implementation
    }

    /// The device the hardware was compiled for.
    pub fn manifest(&self) -> &DeviceManifest {
        &self.manifest
    }

    /// Memory settings used for the device.
    pub fn memory(&self) -> &MemoryConfiguration {
        &self.memory
    }

    /// Largest planned host buffer, if a step planned one.
    pub fn memory_layout(&self) -> Option<&MemoryLayout> {
        self.memory_layout.as_ref()
    }

    /// The communication channel.
    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    /// Timing of every implemented member.
    pub fn member_costs(&self) -> &[MemberCost] {
        &self.member_costs
    }
}
