//! Parsing and validation of `kiln.toml` hardware-generation requests.
//!
//! This crate reads the request configuration and produces a strongly-typed
//! [`HardwareGenerationConfig`], including the [`CustomConfigStore`] through
//! which independently developed drivers and steps exchange typed settings.

#![warn(missing_docs)]

pub mod custom;
pub mod error;
pub mod loader;
pub mod types;

pub use custom::CustomConfigStore;
pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use types::HardwareGenerationConfig;
