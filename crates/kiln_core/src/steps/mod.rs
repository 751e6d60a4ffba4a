//! Built-in pipeline steps.
//!
//! | Step | Priority | Work |
//! |---|---|---|
//! | [`ChannelConfigurator`] | 300 | resolves the communication channel |
//! | [`HardwareTransformer`] | 200 | prices operations and generates VHDL |
//! | [`VhdlBuildProvider`] | 100 | writes the VHDL artifact |
//!
//! Third-party steps pick priorities relative to these.

pub mod build;
pub mod channel;
pub mod transform;

pub use build::VhdlBuildProvider;
pub use channel::ChannelConfigurator;
pub use transform::HardwareTransformer;

/// Priority of [`ChannelConfigurator`].
pub const CHANNEL_CONFIGURATOR_PRIORITY: f64 = 300.0;

/// Priority of [`HardwareTransformer`].
pub const HARDWARE_TRANSFORMER_PRIORITY: f64 = 200.0;

/// Priority of [`VhdlBuildProvider`].
pub const BUILD_PROVIDER_PRIORITY: f64 = 100.0;
