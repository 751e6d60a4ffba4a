//! Static device descriptions for the Kiln hardware compiler.
//!
//! This crate defines what the rest of the toolchain knows about a target
//! before anything is compiled: the immutable [`DeviceManifest`] of each
//! device and the [`OperationDescriptor`] keys used to price operations on it.
//!
//! ```
//! use kiln_arch::DeviceManifest;
//! use kiln_common::Frequency;
//!
//! let manifest = DeviceManifest::builder("Nexys A7-100T")
//!     .clock_frequency(Frequency::from_mhz(100))
//!     .available_memory_bytes(110 * 1024 * 1024)
//!     .channel("Serial")
//!     .build()
//!     .unwrap();
//! assert_eq!(manifest.clock_period_ns(), 10.0);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod manifest;
pub mod ops;

pub use error::ArchError;
pub use manifest::{DeviceManifest, DeviceManifestBuilder};
pub use ops::{BinaryOperator, OperationDescriptor, OperatorKind, ScalingRule, UnaryOperator};
