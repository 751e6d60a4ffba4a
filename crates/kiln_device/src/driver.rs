//! The device driver interface.

use std::fmt;

use kiln_arch::DeviceManifest;
use kiln_config::HardwareGenerationConfig;
use kiln_timing::{TimingError, TimingReport};

use crate::error::DeviceError;
use crate::memory::MemoryConfigurationBuilder;

/// A compilation target.
///
/// Drivers are registered with a [`DriverRegistry`](crate::DriverRegistry)
/// and looked up by the exact name in their manifest. Implementations live
/// outside the core; adding a device never requires changing it.
///
/// Operation costs are not a driver concern: callers combine the driver's
/// manifest and report with [`kiln_timing::clock_cycles`].
pub trait DeviceDriver: Send + Sync + fmt::Debug {
    /// Static description of the device.
    fn manifest(&self) -> &DeviceManifest;

    /// The device's timing report, parsed at most once per driver instance.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the shipped report is malformed.
    fn timing_report(&self) -> Result<&TimingReport, TimingError>;

    /// Sets the device's memory defaults and merges user overrides.
    ///
    /// # Errors
    ///
    /// Fails if a default or an override is not a valid alignment or prefix.
    fn configure_memory(
        &self,
        memory: &mut MemoryConfigurationBuilder,
        config: &HardwareGenerationConfig,
    ) -> Result<(), DeviceError>;
}
