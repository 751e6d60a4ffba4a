//! The set of device drivers known to a compilation.

use std::collections::HashSet;
use std::sync::Arc;

use kiln_arch::{DeviceManifest, OperationDescriptor};
use kiln_timing::ClockCycles;

use crate::driver::DeviceDriver;
use crate::error::DeviceError;
use crate::intel::CatapultDriver;
use crate::xilinx::{AlveoModel, NexysA7Driver, VitisDriver};

/// Registered device drivers in registration order.
///
/// Several drivers may register under the same device name; the one
/// registered first is the one every lookup resolves to.
#[derive(Debug, Default, Clone)]
pub struct DriverRegistry {
    drivers: Vec<Arc<dyn DeviceDriver>>,
}

impl DriverRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in driver.
    ///
    /// # Errors
    ///
    /// Fails only if a built-in manifest is invalid.
    pub fn with_builtin_drivers() -> Result<Self, DeviceError> {
        let mut registry = Self::new();
        registry.register(NexysA7Driver::new()?);
        for model in AlveoModel::ALL {
            registry.register(VitisDriver::new(model)?);
        }
        registry.register(CatapultDriver::new()?);
        Ok(registry)
    }

    /// Adds a driver after all previously registered ones.
    pub fn register<D: DeviceDriver + 'static>(&mut self, driver: D) {
        self.register_shared(Arc::new(driver));
    }

    /// Adds a shared driver after all previously registered ones.
    pub fn register_shared(&mut self, driver: Arc<dyn DeviceDriver>) {
        let name = driver.manifest().name();
        if self.drivers.iter().any(|d| d.manifest().name() == name) {
            log::warn!("device '{name}' is already registered; the new driver is shadowed");
        } else {
            log::debug!("registered device driver '{name}'");
        }
        self.drivers.push(driver);
    }

    /// Returns one manifest per distinct device name, in registration order.
    pub fn supported_devices(&self) -> Vec<&DeviceManifest> {
        let mut seen = HashSet::new();
        self.drivers
            .iter()
            .map(|d| d.manifest())
            .filter(|m| seen.insert(m.name()))
            .collect()
    }

    /// Returns the driver whose manifest name is exactly `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::UnknownDevice`] listing the supported names.
    pub fn driver(&self, name: &str) -> Result<&Arc<dyn DeviceDriver>, DeviceError> {
        match self.drivers.iter().find(|d| d.manifest().name() == name) {
            Some(driver) => {
                log::debug!("selected device '{name}'");
                Ok(driver)
            }
            None => Err(DeviceError::UnknownDevice {
                name: name.to_string(),
                known: self
                    .supported_devices()
                    .into_iter()
                    .map(|m| m.name().to_string())
                    .collect(),
            }),
        }
    }

    /// Prices one operation on the named device.
    ///
    /// # Errors
    ///
    /// Fails for an unknown device, an unusable timing report or an operator
    /// the report does not cover.
    pub fn clock_cycles(
        &self,
        device: &str,
        operation: &OperationDescriptor,
    ) -> Result<ClockCycles, DeviceError> {
        let driver = self.driver(device)?;
        let report = driver.timing_report()?;
        Ok(kiln_timing::clock_cycles(driver.manifest(), report, operation)?)
    }

    /// Returns the number of registered drivers, shadowed ones included.
    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    /// Returns `true` if no driver is registered.
    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}
