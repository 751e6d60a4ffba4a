//! Configuration types deserialized from `kiln.toml`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::custom::CustomConfigStore;

/// Default directory build providers write artifacts to.
pub const DEFAULT_OUTPUT_DIR: &str = "build";

/// Default name of the generated top-level hardware unit.
pub const DEFAULT_TOP: &str = "kiln_hardware";

/// A validated hardware-generation request.
///
/// Names the target device, optionally the communication channel, where
/// artifacts go, and carries the custom settings of drivers and steps.
#[derive(Debug)]
pub struct HardwareGenerationConfig {
    /// Exact name of the device to compile for (e.g. `"Alveo U50"`).
    pub device_name: String,
    /// Communication channel; `None` means the device's default channel.
    pub channel: Option<String>,
    /// Directory for generated artifacts.
    pub output_dir: PathBuf,
    /// Name of the generated top-level hardware unit.
    pub top: String,
    /// Settings owned by drivers and pipeline steps, keyed by name.
    pub custom: CustomConfigStore,
}

impl HardwareGenerationConfig {
    /// Creates a request for the given device with default settings.
    pub fn new(device_name: impl Into<String>) -> Self {
        Self {
            device_name: device_name.into(),
            channel: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            top: DEFAULT_TOP.to_string(),
            custom: CustomConfigStore::new(),
        }
    }

    /// Sets the communication channel.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Sets the artifact output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}

impl From<ConfigDocument> for HardwareGenerationConfig {
    fn from(doc: ConfigDocument) -> Self {
        Self {
            device_name: doc.hardware.device,
            channel: doc.hardware.channel,
            output_dir: doc
                .hardware
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            top: doc.hardware.top.unwrap_or_else(|| DEFAULT_TOP.to_string()),
            custom: CustomConfigStore::from_raw(doc.custom),
        }
    }
}

/// The on-disk shape of `kiln.toml`.
#[derive(Debug, Deserialize)]
pub(crate) struct ConfigDocument {
    /// The `[hardware]` table.
    pub hardware: HardwareSection,
    /// The `[custom.<key>]` tables, kept raw.
    #[serde(default)]
    pub custom: BTreeMap<String, toml::Value>,
}

/// The `[hardware]` table.
#[derive(Debug, Deserialize)]
pub(crate) struct HardwareSection {
    /// Device name.
    pub device: String,
    /// Communication channel.
    #[serde(default)]
    pub channel: Option<String>,
    /// Artifact directory.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Top-level unit name.
    #[serde(default)]
    pub top: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_defaults() {
        let config = HardwareGenerationConfig::new("Alveo U50");
        assert_eq!(config.device_name, "Alveo U50");
        assert_eq!(config.channel, None);
        assert_eq!(config.output_dir, PathBuf::from("build"));
        assert_eq!(config.top, "kiln_hardware");
        assert!(config.custom.is_empty());
    }

    #[test]
    fn builder_methods() {
        let config = HardwareGenerationConfig::new("Nexys A7-100T")
            .with_channel("Ethernet")
            .with_output_dir("/tmp/out");
        assert_eq!(config.channel.as_deref(), Some("Ethernet"));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
    }
}
