//! Drivers for Intel devices.

pub mod catapult;

pub use catapult::CatapultDriver;
