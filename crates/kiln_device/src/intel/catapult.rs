//! Catapult FPGA nodes.
//!
//! Catapult v2 servers carry an Arria 10 GX 1150 attached to the host over
//! PCIe. The shell moves data in 16-byte flits.

use kiln_arch::DeviceManifest;
use kiln_common::Frequency;
use kiln_config::HardwareGenerationConfig;
use kiln_timing::{LazyTimingReport, TimingError, TimingReport};

use crate::driver::DeviceDriver;
use crate::error::DeviceError;
use crate::memory::MemoryConfigurationBuilder;

/// Device name of a Catapult node.
pub const DEVICE_NAME: &str = "Catapult";

const TIMING_REPORT: &str = include_str!("../../reports/arria10_catapult.txt");

const ALIGNMENT: i64 = 16;
const MINIMUM_PREFIX: i64 = 0;

/// Driver for Catapult nodes.
#[derive(Debug)]
pub struct CatapultDriver {
    manifest: DeviceManifest,
    report: LazyTimingReport,
}

impl CatapultDriver {
    /// Creates the driver.
    ///
    /// # Errors
    ///
    /// Fails only if the built-in manifest is invalid.
    pub fn new() -> Result<Self, DeviceError> {
        let manifest = DeviceManifest::builder(DEVICE_NAME)
            .family("Arria 10")
            .tool_chain("Quartus")
            .clock_frequency(Frequency::from_mhz(150))
            .available_memory_bytes(4 * 1024 * 1024 * 1024)
            .channel("Catapult")
            .build()?;
        Ok(Self {
            manifest,
            report: LazyTimingReport::from_source(TIMING_REPORT),
        })
    }
}

impl DeviceDriver for CatapultDriver {
    fn manifest(&self) -> &DeviceManifest {
        &self.manifest
    }

    fn timing_report(&self) -> Result<&TimingReport, TimingError> {
        self.report.get()
    }

    fn configure_memory(
        &self,
        memory: &mut MemoryConfigurationBuilder,
        config: &HardwareGenerationConfig,
    ) -> Result<(), DeviceError> {
        memory.set_alignment(ALIGNMENT)?;
        memory.set_minimum_prefix(MINIMUM_PREFIX)?;
        memory.apply_overrides(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_arch::{BinaryOperator, OperationDescriptor};

    #[test]
    fn manifest() {
        let driver = CatapultDriver::new().unwrap();
        assert_eq!(driver.manifest().family(), "Arria 10");
        assert_eq!(driver.manifest().supported_channels(), ["Catapult"]);
    }

    #[test]
    fn eight_bit_add_is_scaled() {
        let driver = CatapultDriver::new().unwrap();
        let report = driver.timing_report().unwrap();
        let add8 = OperationDescriptor::binary(BinaryOperator::Add, 8, false);
        assert_eq!(report.delay_ns(&add8), None);
        let cycles = kiln_timing::clock_cycles(driver.manifest(), report, &add8).unwrap();
        assert!(cycles.value() > 0.0);
        assert!(cycles.value() < 1.105 / driver.manifest().clock_period_ns());
    }

    #[test]
    fn memory_override_applies() {
        let driver = CatapultDriver::new().unwrap();
        let config = kiln_config::load_config_from_str(
            "[hardware]\ndevice = \"Catapult\"\n[custom.MemoryConfiguration]\nalignment = 64\n",
        )
        .unwrap();
        let mut memory = MemoryConfigurationBuilder::new();
        driver.configure_memory(&mut memory, &config).unwrap();
        assert_eq!(memory.alignment(), 64);
        assert_eq!(memory.minimum_prefix(), 0);
    }
}
