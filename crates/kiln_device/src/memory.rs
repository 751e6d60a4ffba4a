//! Memory layout of the data exchanged with the hardware.
//!
//! Data passed into the generated hardware is a sequence of 32-bit cells
//! preceded by a header of `minimum_prefix` cells, with the whole buffer
//! padded to a multiple of `alignment` bytes. Both values are device
//! specific and set by the driver's [`configure_memory`] callback, which may
//! merge user overrides stored under [`MEMORY_CONFIGURATION_KEY`].
//!
//! [`configure_memory`]: crate::DeviceDriver::configure_memory

use kiln_arch::DeviceManifest;
use kiln_config::HardwareGenerationConfig;
use serde::{Deserialize, Serialize};

use crate::error::DeviceError;
use crate::registry::DriverRegistry;

/// Custom configuration key holding [`MemoryOverrides`].
pub const MEMORY_CONFIGURATION_KEY: &str = "MemoryConfiguration";

/// Size of one memory cell in bytes.
pub const CELL_SIZE_BYTES: u64 = 4;

/// User overrides read from the custom configuration store.
///
/// Only `alignment` and `minimum_prefix` are recognized; other fields in
/// the stored entry are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryOverrides {
    /// Alignment in bytes.
    pub alignment: Option<i64>,
    /// Header size in cells.
    #[serde(alias = "minimumPrefix")]
    pub minimum_prefix: Option<i64>,
}

/// Validated memory settings under construction.
///
/// Every setter checks its value immediately, so an invalid alignment is
/// rejected whether it comes from a device default or a user override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryConfigurationBuilder {
    alignment: u64,
    minimum_prefix: u64,
}

impl Default for MemoryConfigurationBuilder {
    fn default() -> Self {
        Self {
            alignment: 1,
            minimum_prefix: 0,
        }
    }
}

impl MemoryConfigurationBuilder {
    /// Creates a builder with byte alignment and no header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the alignment in bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::InvalidAlignment`] unless `value` is a positive
    /// power of two. The current alignment is left unchanged.
    pub fn set_alignment(&mut self, value: i64) -> Result<(), DeviceError> {
        let alignment = u64::try_from(value)
            .ok()
            .filter(|v| v.is_power_of_two())
            .ok_or(DeviceError::InvalidAlignment { value })?;
        self.alignment = alignment;
        Ok(())
    }

    /// Sets the header size in cells.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::InvalidPrefix`] for negative values.
    pub fn set_minimum_prefix(&mut self, value: i64) -> Result<(), DeviceError> {
        self.minimum_prefix =
            u64::try_from(value).map_err(|_| DeviceError::InvalidPrefix { value })?;
        Ok(())
    }

    /// Returns the alignment set so far.
    pub fn alignment(&self) -> u64 {
        self.alignment
    }

    /// Returns the header size set so far.
    pub fn minimum_prefix(&self) -> u64 {
        self.minimum_prefix
    }

    /// Applies the overrides stored under [`MEMORY_CONFIGURATION_KEY`], if any.
    ///
    /// # Errors
    ///
    /// Fails if the stored entry is malformed or holds an invalid value.
    pub fn apply_overrides(&mut self, config: &HardwareGenerationConfig) -> Result<(), DeviceError> {
        let Some(overrides) = config
            .custom
            .get::<MemoryOverrides>(MEMORY_CONFIGURATION_KEY)?
        else {
            return Ok(());
        };
        if let Some(alignment) = overrides.alignment {
            log::debug!("memory alignment overridden to {alignment}");
            self.set_alignment(alignment)?;
        }
        if let Some(prefix) = overrides.minimum_prefix {
            log::debug!("memory prefix overridden to {prefix}");
            self.set_minimum_prefix(prefix)?;
        }
        Ok(())
    }

    pub(crate) fn build(self) -> MemoryConfiguration {
        MemoryConfiguration {
            alignment: self.alignment,
            minimum_prefix: self.minimum_prefix,
        }
    }
}

/// The final memory settings for one compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryConfiguration {
    alignment: u64,
    minimum_prefix: u64,
}

impl MemoryConfiguration {
    /// Builds the memory configuration for the requested device.
    ///
    /// Looks up the driver whose manifest name equals
    /// `config.device_name` and lets it set defaults and merge overrides.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::UnknownDevice`] for an unregistered name, or
    /// the driver's error for invalid values.
    pub fn create(
        config: &HardwareGenerationConfig,
        registry: &DriverRegistry,
    ) -> Result<Self, DeviceError> {
        let driver = registry.driver(&config.device_name)?;
        let mut builder = MemoryConfigurationBuilder::new();
        driver.configure_memory(&mut builder, config)?;
        let memory = builder.build();
        log::info!(
            "{}: memory alignment {} bytes, prefix {} cells",
            config.device_name,
            memory.alignment,
            memory.minimum_prefix
        );
        Ok(memory)
    }

    /// Alignment in bytes; always a power of two.
    pub fn alignment(&self) -> u64 {
        self.alignment
    }

    /// Header size in cells.
    pub fn minimum_prefix(&self) -> u64 {
        self.minimum_prefix
    }

    /// Header size in bytes.
    pub fn header_bytes(&self) -> u64 {
        self.minimum_prefix.saturating_mul(CELL_SIZE_BYTES)
    }

    /// Rounds `bytes` up to the alignment, saturating at `u64::MAX`.
    pub fn align(&self, bytes: u64) -> u64 {
        bytes
            .checked_next_multiple_of(self.alignment)
            .unwrap_or(u64::MAX)
    }

    /// Lays out `payload_cells` cells of data for the given device.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::OutOfMemory`] when the aligned buffer is larger
    /// than the device memory.
    pub fn plan(&self, payload_cells: u64, manifest: &DeviceManifest) -> Result<MemoryLayout, DeviceError> {
        let header_bytes = self.header_bytes();
        let payload_bytes = payload_cells.saturating_mul(CELL_SIZE_BYTES);
        let total_bytes = self.align(header_bytes.saturating_add(payload_bytes));

        if total_bytes > manifest.available_memory_bytes() {
            return Err(DeviceError::OutOfMemory {
                device: manifest.name().to_string(),
                required: total_bytes,
                available: manifest.available_memory_bytes(),
            });
        }

        Ok(MemoryLayout {
            header_bytes,
            payload_bytes,
            total_bytes,
        })
    }
}

/// Byte sizes of one planned buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryLayout {
    /// Header bytes before the payload.
    pub header_bytes: u64,
    /// Payload bytes.
    pub payload_bytes: u64,
    /// Header plus payload, rounded up to the alignment.
    pub total_bytes: u64,
}
