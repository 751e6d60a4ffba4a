//! Per-device operation timing and the clock-cycle cost model.
//!
//! A device's vendor timing run is reduced to a small text report listing
//! the data-path delay of every measured operator, operand width and
//! signedness. This crate parses those reports, memoizes the parse per
//! driver, and turns delays into clock cycles for a given device clock.
//!
//! # Usage
//!
//! ```
//! use kiln_arch::{BinaryOperator, DeviceManifest, OperationDescriptor};
//! use kiln_common::Frequency;
//! use kiln_timing::{clock_cycles, TimingReport};
//!
//! let report = TimingReport::parse("add signed32 2.5\n").unwrap();
//! let manifest = DeviceManifest::builder("demo")
//!     .clock_frequency(Frequency::from_mhz(100))
//!     .available_memory_bytes(1 << 20)
//!     .build()
//!     .unwrap();
//! let op = OperationDescriptor::binary(BinaryOperator::Add, 32, true);
//! let cycles = clock_cycles(&manifest, &report, &op).unwrap();
//! assert_eq!(cycles.value(), 0.25);
//! ```
//!
//! # Architecture
//!
//! - [`report`]: the timing table and its text parser
//! - [`lazy`]: one-time, thread-safe parse of a driver's report
//! - [`cost`]: delay lookup, width scaling and conversion to cycles

#![warn(missing_docs)]

pub mod cost;
pub mod error;
pub mod lazy;
pub mod report;

pub use cost::{clock_cycles, resolve_delay, ClockCycles, DelayEstimate, DelaySource};
pub use error::TimingError;
pub use lazy::LazyTimingReport;
pub use report::TimingReport;
