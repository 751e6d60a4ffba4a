//! Digilent Nexys A7-100T.
//!
//! An Artix-7 `xc7a100tcsg324-1` board running the hardware framework from
//! its on-board DDR2. Data moves over a UART or the 100 Mb/s Ethernet port,
//! both of which transfer whole 32-bit cells.

use kiln_arch::DeviceManifest;
use kiln_common::Frequency;
use kiln_config::HardwareGenerationConfig;
use kiln_timing::{LazyTimingReport, TimingError, TimingReport};

use crate::driver::DeviceDriver;
use crate::error::DeviceError;
use crate::memory::MemoryConfigurationBuilder;

/// Device name of the board.
pub const DEVICE_NAME: &str = "Nexys A7-100T";

const TIMING_REPORT: &str = include_str!("../../reports/artix7_nexys_a7_100t.txt");

/// Cell-aligned buffers, no header.
const ALIGNMENT: i64 = 4;
const MINIMUM_PREFIX: i64 = 0;

/// Driver for the Nexys A7-100T board.
#[derive(Debug)]
pub struct NexysA7Driver {
    manifest: DeviceManifest,
    report: LazyTimingReport,
}

impl NexysA7Driver {
    /// Creates the driver.
    ///
    /// # Errors
    ///
    /// Fails only if the built-in manifest is invalid.
    pub fn new() -> Result<Self, DeviceError> {
        let manifest = DeviceManifest::builder(DEVICE_NAME)
            .family("Artix-7")
            .tool_chain("Vivado")
            .clock_frequency(Frequency::from_mhz(100))
            .available_memory_bytes(128 * 1024 * 1024)
            .channel("Serial")
            .channel("Ethernet")
            .build()?;
        Ok(Self {
            manifest,
            report: LazyTimingReport::from_source(TIMING_REPORT),
        })
    }
}

impl DeviceDriver for NexysA7Driver {
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

    #[test]
    fn manifest() {
        let driver = NexysA7Driver::new().unwrap();
        let m = driver.manifest();
        assert_eq!(m.name(), "Nexys A7-100T");
        assert_eq!(m.tool_chain(), "Vivado");
        assert_eq!(m.clock_period_ns(), 10.0);
        assert_eq!(m.supported_channels(), ["Serial", "Ethernet"]);
        assert_eq!(m.default_channel(), Some("Serial"));
    }

    #[test]
    fn report_parses_lazily() {
        let driver = NexysA7Driver::new().unwrap();
        assert!(!driver.report.is_initialized());
        let report = driver.timing_report().unwrap();
        assert!(!report.is_empty());
        assert!(driver.report.is_initialized());
    }

    #[test]
    fn memory_defaults() {
        let driver = NexysA7Driver::new().unwrap();
        let mut memory = MemoryConfigurationBuilder::new();
        driver
            .configure_memory(&mut memory, &HardwareGenerationConfig::new(DEVICE_NAME))
            .unwrap();
        assert_eq!(memory.alignment(), 4);
        assert_eq!(memory.minimum_prefix(), 0);
    }
}
