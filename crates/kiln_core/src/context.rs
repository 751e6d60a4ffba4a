//! State shared by the steps of one compilation.

use std::sync::Arc;

use kiln_arch::DeviceManifest;
use kiln_config::HardwareGenerationConfig;
use kiln_device::{DeviceDriver, MemoryConfiguration, MemoryLayout};
use kiln_hdl::HardwareDescription;
use kiln_timing::ClockCycles;

use crate::program::TypedProgram;
use crate::representation::HardwareImplementation;

/// Critical-path cost of one implemented member.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberCost {
    /// Member name in the source program.
    pub member: String,
    /// Generated entity name.
    pub entity: String,
    /// Delay of the longest operation chain, in clock cycles.
    pub cycles: ClockCycles,
    /// Whole clock cycles the hardware waits before the result is valid.
    pub wait_cycles: u32,
}

/// The context every pipeline step of a compilation works on.
///
/// Inputs are set before the pipeline starts. Built-in steps fill the
/// result fields; third-party steps may read and replace them. The memory
/// configuration is fixed once created and is only readable.
#[derive(Debug)]
pub struct CompileContext {
    /// The program being compiled.
    pub program: TypedProgram,
    /// The request, including the custom configuration store.
    pub config: HardwareGenerationConfig,
    /// The selected device driver.
    pub driver: Arc<dyn DeviceDriver>,
    pub(crate) memory: MemoryConfiguration,
    /// The resolved communication channel.
    pub channel: Option<String>,
    /// Largest buffer any member exchanges with the host.
    pub memory_layout: Option<MemoryLayout>,
    /// Per-member timing.
    pub member_costs: Vec<MemberCost>,
    /// The generated hardware description.
    pub description: Option<HardwareDescription>,
    /// The built implementation artifact.
    pub implementation: Option<HardwareImplementation>,
}

impl CompileContext {
    /// Creates a context with no results yet.
    pub fn new(
        program: TypedProgram,
        config: HardwareGenerationConfig,
        driver: Arc<dyn DeviceDriver>,
        memory: MemoryConfiguration,
    ) -> Self {
        Self {
            program,
            config,
            driver,
            memory,
            channel: None,
            memory_layout: None,
            member_costs: Vec::new(),
            description: None,
            implementation: None,
        }
    }

    /// The target device's manifest.
    pub fn manifest(&self) -> &DeviceManifest {
        self.driver.manifest()
    }

    /// Memory settings for the device.
    pub fn memory(&self) -> &MemoryConfiguration {
        &self.memory
    }
}
