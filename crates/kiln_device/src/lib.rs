//! Device drivers, the driver registry and device memory configuration.
//!
//! A [`DeviceDriver`] pairs a static [`DeviceManifest`] with the device's
//! lazily parsed timing report and a callback that sets the device's memory
//! layout defaults. The [`DriverRegistry`] holds every driver known to a
//! compilation and resolves devices by exact name.
//!
//! # Usage
//!
//! ```
//! use kiln_config::HardwareGenerationConfig;
//! use kiln_device::{DriverRegistry, MemoryConfiguration};
//!
//! let registry = DriverRegistry::with_builtin_drivers().unwrap();
//! let config = HardwareGenerationConfig::new("Alveo U50");
//! let memory = MemoryConfiguration::create(&config, &registry).unwrap();
//! assert_eq!(memory.alignment(), 4096);
//! assert_eq!(memory.minimum_prefix(), 4);
//! ```
//!
//! # Built-in drivers
//!
//! - [`xilinx::NexysA7Driver`] for the Digilent Nexys A7-100T board
//! - [`xilinx::VitisDriver`] for the Alveo accelerator cards
//! - [`intel::CatapultDriver`] for Catapult FPGA nodes
//!
//! [`DeviceManifest`]: kiln_arch::DeviceManifest

#![warn(missing_docs)]

pub mod driver;
pub mod error;
pub mod intel;
pub mod memory;
pub mod registry;
pub mod xilinx;

pub use driver::DeviceDriver;
pub use error::DeviceError;
pub use memory::{
    MemoryConfiguration, MemoryConfigurationBuilder, MemoryLayout, MemoryOverrides,
    CELL_SIZE_BYTES, MEMORY_CONFIGURATION_KEY,
};
pub use registry::DriverRegistry;
