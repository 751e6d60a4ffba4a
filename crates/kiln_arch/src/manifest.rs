//! Device manifests: the static capability sheet of a compilation target.

use std::collections::BTreeSet;

use kiln_common::Frequency;
use serde::{Deserialize, Serialize};

use crate::error::ArchError;

/// Immutable description of what a target device offers.
///
/// Manifests are created once per device type by its driver and never
/// mutated afterwards. The `name` is the lookup key when a device is
/// selected for compilation, so it must be unique within a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ManifestFields")]
pub struct DeviceManifest {
    name: String,
    family: String,
    tool_chain: String,
    clock_frequency: Frequency,
    available_memory_bytes: u64,
    supported_channels: Vec<String>,
    supported_platforms: BTreeSet<String>,
}

impl DeviceManifest {
    /// Starts building a manifest for the device with the given name.
    pub fn builder(name: impl Into<String>) -> DeviceManifestBuilder {
        DeviceManifestBuilder {
            fields: ManifestFields {
                name: name.into(),
                family: String::new(),
                tool_chain: String::new(),
                clock_frequency: Frequency::from_hz(0),
                available_memory_bytes: 0,
                supported_channels: Vec::new(),
                supported_platforms: BTreeSet::new(),
            },
        }
    }

    /// Returns the unique device name (e.g. `"Alveo U50"`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the device family (e.g. `"Artix-7"`), empty if unspecified.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Returns the vendor tool chain that builds bitstreams for this device.
    pub fn tool_chain(&self) -> &str {
        &self.tool_chain
    }

    /// Returns the clock the generated hardware runs at.
    pub fn clock_frequency(&self) -> Frequency {
        self.clock_frequency
    }

    /// Returns the length of one clock cycle in nanoseconds.
    pub fn clock_period_ns(&self) -> f64 {
        self.clock_frequency.period_ns()
    }

    /// Returns how many bytes of device memory the host may use.
    pub fn available_memory_bytes(&self) -> u64 {
        self.available_memory_bytes
    }

    /// Returns the communication channels in preference order.
    pub fn supported_channels(&self) -> &[String] {
        &self.supported_channels
    }

    /// Returns the channel used when a request does not name one.
    pub fn default_channel(&self) -> Option<&str> {
        self.supported_channels.first().map(String::as_str)
    }

    /// Returns `true` if the device can talk over the named channel.
    pub fn supports_channel(&self, channel: &str) -> bool {
        self.supported_channels.iter().any(|c| c == channel)
    }

    /// Returns the shell/platform identifiers the device can be built for.
    pub fn supported_platforms(&self) -> &BTreeSet<String> {
        &self.supported_platforms
    }
}

/// Builder for [`DeviceManifest`]; validation happens in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct DeviceManifestBuilder {
    fields: ManifestFields,
}

impl DeviceManifestBuilder {
    /// Sets the device family.
    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.fields.family = family.into();
        self
    }

    /// Sets the vendor tool chain name.
    pub fn tool_chain(mut self, tool_chain: impl Into<String>) -> Self {
        self.fields.tool_chain = tool_chain.into();
        self
    }

    /// Sets the device clock.
    pub fn clock_frequency(mut self, frequency: Frequency) -> Self {
        self.fields.clock_frequency = frequency;
        self
    }

    /// Sets the host-visible device memory in bytes.
    pub fn available_memory_bytes(mut self, bytes: u64) -> Self {
        self.fields.available_memory_bytes = bytes;
        self
    }

    /// Appends a communication channel; repeated names keep their first position.
    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        let channel = channel.into();
        if !self.fields.supported_channels.contains(&channel) {
            self.fields.supported_channels.push(channel);
        }
        self
    }

    /// Adds a supported platform identifier.
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.fields.supported_platforms.insert(platform.into());
        self
    }

    /// Validates the fields and produces the manifest.
    ///
    /// # Errors
    ///
    /// Fails if the name is empty, the clock is 0 Hz, or no memory is available.
    pub fn build(self) -> Result<DeviceManifest, ArchError> {
        DeviceManifest::try_from(self.fields)
    }
}

/// Unvalidated manifest fields, shared by the builder and deserialization.
#[derive(Debug, Clone, Deserialize)]
struct ManifestFields {
    name: String,
    #[serde(default)]
    family: String,
    #[serde(default)]
    tool_chain: String,
    clock_frequency: Frequency,
    available_memory_bytes: u64,
    #[serde(default)]
    supported_channels: Vec<String>,
    #[serde(default)]
    supported_platforms: BTreeSet<String>,
}

impl TryFrom<ManifestFields> for DeviceManifest {
    type Error = ArchError;

    fn try_from(fields: ManifestFields) -> Result<Self, Self::Error> {
        if fields.name.trim().is_empty() {
            return Err(ArchError::EmptyName);
        }
        if fields.clock_frequency.is_zero() {
            return Err(ArchError::ZeroClockFrequency {
                device: fields.name,
            });
        }
        if fields.available_memory_bytes == 0 {
            return Err(ArchError::ZeroMemory {
                device: fields.name,
            });
        }

        let mut supported_channels = Vec::with_capacity(fields.supported_channels.len());
        for channel in fields.supported_channels {
            if !supported_channels.contains(&channel) {
                supported_channels.push(channel);
            }
        }

        Ok(Self {
            name: fields.name,
            family: fields.family,
            tool_chain: fields.tool_chain,
            clock_frequency: fields.clock_frequency,
            available_memory_bytes: fields.available_memory_bytes,
            supported_channels,
            supported_platforms: fields.supported_platforms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alveo() -> DeviceManifest {
        DeviceManifest::builder("Alveo U50")
            .family("UltraScale+")
            .tool_chain("Vitis")
            .clock_frequency(Frequency::from_mhz(300))
            .available_memory_bytes(8 << 30)
            .channel("Vitis")
            .platform("xilinx_u50_gen3x16_xdma_201920_3")
            .build()
            .unwrap()
    }

    #[test]
    fn builder_sets_all_fields() {
        let m = alveo();
        assert_eq!(m.name(), "Alveo U50");
        assert_eq!(m.family(), "UltraScale+");
        assert_eq!(m.tool_chain(), "Vitis");
        assert_eq!(m.clock_frequency().hz(), 300_000_000);
        assert_eq!(m.available_memory_bytes(), 8 << 30);
        assert_eq!(m.default_channel(), Some("Vitis"));
        assert!(m.supports_channel("Vitis"));
        assert!(!m.supports_channel("Serial"));
        assert_eq!(m.supported_platforms().len(), 1);
    }

    #[test]
    fn channels_keep_first_position() {
        let m = DeviceManifest::builder("Nexys A7-100T")
            .clock_frequency(Frequency::from_mhz(100))
            .available_memory_bytes(1024)
            .channel("Serial")
            .channel("Ethernet")
            .channel("Serial")
            .build()
            .unwrap();
        assert_eq!(m.supported_channels(), ["Serial", "Ethernet"]);
    }

    #[test]
    fn platforms_may_be_empty() {
        let m = DeviceManifest::builder("Catapult")
            .clock_frequency(Frequency::from_mhz(150))
            .available_memory_bytes(1)
            .build()
            .unwrap();
        assert!(m.supported_platforms().is_empty());
        assert_eq!(m.default_channel(), None);
    }

    #[test]
    fn rejects_invalid_fields() {
        let err = DeviceManifest::builder("")
            .clock_frequency(Frequency::from_mhz(1))
            .available_memory_bytes(1)
            .build()
            .unwrap_err();
        assert_eq!(err, ArchError::EmptyName);

        let err = DeviceManifest::builder("x")
            .available_memory_bytes(1)
            .build()
            .unwrap_err();
        assert!(matches!(err, ArchError::ZeroClockFrequency { .. }));

        let err = DeviceManifest::builder("x")
            .clock_frequency(Frequency::from_mhz(1))
            .build()
            .unwrap_err();
        assert!(matches!(err, ArchError::ZeroMemory { .. }));
    }

    #[test]
    fn serde_roundtrip_validates() {
        let m = alveo();
        let json = serde_json::to_string(&m).unwrap();
        let back: DeviceManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);

        let bad = r#"{"name":"x","clock_frequency":0,"available_memory_bytes":1}"#;
        assert!(serde_json::from_str::<DeviceManifest>(bad).is_err());
    }
}
