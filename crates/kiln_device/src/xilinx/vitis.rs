//! Alveo accelerator cards driven through Vitis.
//!
//! All cards share the UltraScale+ timing characteristics and the Vitis
//! kernel clock. The host runtime transfers buffers in 4 KiB pages and
//! prepends a four-cell header with the kernel arguments, which fixes the
//! memory defaults for the whole family.

use kiln_arch::DeviceManifest;
use kiln_common::Frequency;
use kiln_config::HardwareGenerationConfig;
use kiln_timing::{LazyTimingReport, TimingError, TimingReport};

use crate::driver::DeviceDriver;
use crate::error::DeviceError;
use crate::memory::MemoryConfigurationBuilder;

const TIMING_REPORT: &str = include_str!("../../reports/ultrascale_plus_alveo.txt");

/// Vitis kernel clock shared by every card.
const KERNEL_CLOCK: Frequency = Frequency::from_mhz(300);

const ALIGNMENT: i64 = 4096;
const MINIMUM_PREFIX: i64 = 4;

const GIB: u64 = 1024 * 1024 * 1024;

/// Alveo cards with a built-in driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlveoModel {
    /// Alveo U50, 8 GiB HBM2.
    U50,
    /// Alveo U200, 64 GiB DDR4.
    U200,
    /// Alveo U250, 64 GiB DDR4.
    U250,
    /// Alveo U280, 32 GiB DDR4 plus 8 GiB HBM2.
    U280,
    /// Alveo U250 as deployed in Azure NP-series instances.
    AzureU250,
}

impl AlveoModel {
    /// Every model, in registration order.
    pub const ALL: [AlveoModel; 5] = [Self::U50, Self::U200, Self::U250, Self::U280, Self::AzureU250];

    /// Returns the device name.
    pub fn device_name(self) -> &'static str {
        match self {
            Self::U50 => "Alveo U50",
            Self::U200 => "Alveo U200",
            Self::U250 => "Alveo U250",
            Self::U280 => "Alveo U280",
            Self::AzureU250 => "Azure Alveo U250",
        }
    }

    /// Returns the Vitis platform the card is built for.
    pub fn platform(self) -> &'static str {
        match self {
            Self::U50 => "xilinx_u50_gen3x16_xdma_201920_3",
            Self::U200 => "xilinx_u200_gen3x16_xdma_2_202110_1",
            Self::U250 => "xilinx_u250_gen3x16_xdma_4_1_202210_1",
            Self::U280 => "xilinx_u280_gen3x16_xdma_1_202211_1",
            Self::AzureU250 => "xilinx_u250_gen3x16_xdma_shell_2_1",
        }
    }

    fn family(self) -> &'static str {
        match self {
            Self::U50 | Self::U280 => "Virtex UltraScale+ HBM",
            Self::U200 | Self::U250 | Self::AzureU250 => "Virtex UltraScale+",
        }
    }

    fn memory_bytes(self) -> u64 {
        match self {
            Self::U50 => 8 * GIB,
            Self::U200 | Self::U250 | Self::AzureU250 => 64 * GIB,
            Self::U280 => 40 * GIB,
        }
    }
}

/// Driver for one Alveo card.
#[derive(Debug)]
pub struct VitisDriver {
    model: AlveoModel,
    manifest: DeviceManifest,
    report: LazyTimingReport,
}

impl VitisDriver {
    /// Creates the driver for a card.
    ///
    /// # Errors
    ///
    /// Fails only if the built-in manifest is invalid.
    pub fn new(model: AlveoModel) -> Result<Self, DeviceError> {
        let manifest = DeviceManifest::builder(model.device_name())
            .family(model.family())
            .tool_chain("Vitis")
            .clock_frequency(KERNEL_CLOCK)
            .available_memory_bytes(model.memory_bytes())
            .channel("Vitis")
            .platform(model.platform())
            .build()?;
        Ok(Self {
            model,
            manifest,
            report: LazyTimingReport::from_source(TIMING_REPORT),
        })
    }

    /// Returns the card this driver targets.
    pub fn model(&self) -> AlveoModel {
        self.model
    }
}

impl DeviceDriver for VitisDriver {
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
    use std::collections::HashSet;

    #[test]
    fn every_model_builds() {
        let mut names = HashSet::new();
        for model in AlveoModel::ALL {
            let driver = VitisDriver::new(model).unwrap();
            let m = driver.manifest();
            assert!(names.insert(m.name().to_string()));
            assert_eq!(m.clock_frequency(), Frequency::from_mhz(300));
            assert_eq!(m.default_channel(), Some("Vitis"));
            assert!(m.supported_platforms().contains(model.platform()));
            assert_eq!(driver.model(), model);
        }
    }

    #[test]
    fn alveo_u50_memory_defaults() {
        let driver = VitisDriver::new(AlveoModel::U50).unwrap();
        let mut memory = MemoryConfigurationBuilder::new();
        driver
            .configure_memory(&mut memory, &HardwareGenerationConfig::new("Alveo U50"))
            .unwrap();
        assert_eq!(memory.alignment(), 4096);
        assert_eq!(memory.minimum_prefix(), 4);
    }

    #[test]
    fn reports_are_per_driver_instance() {
        let u50 = VitisDriver::new(AlveoModel::U50).unwrap();
        let u280 = VitisDriver::new(AlveoModel::U280).unwrap();
        let a = u50.timing_report().unwrap();
        assert!(!u280.report.is_initialized());
        let b = u280.timing_report().unwrap();
        assert_eq!(a, b);
        assert!(!std::ptr::eq(a, b));
    }

    #[test]
    fn report_shared_across_threads() {
        let driver = VitisDriver::new(AlveoModel::U250).unwrap();
        let addresses: Vec<usize> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(|| driver.timing_report().map(|r| r as *const TimingReport as usize))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap().unwrap())
                .collect()
        });
        assert!(addresses.windows(2).all(|w| w[0] == w[1]));
    }
}
