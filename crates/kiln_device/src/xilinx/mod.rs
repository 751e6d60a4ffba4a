//! Drivers for Xilinx (AMD) devices.
//!
//! The Nexys A7 is a Vivado-built development board reached over a serial
//! or Ethernet link. The Alveo cards are datacenter accelerators built and
//! driven through Vitis.

pub mod nexys_a7;
pub mod vitis;

pub use nexys_a7::NexysA7Driver;
pub use vitis::{AlveoModel, VitisDriver};
