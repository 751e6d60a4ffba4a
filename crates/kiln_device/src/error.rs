//! Errors from device selection and memory configuration.

use kiln_arch::ArchError;
use kiln_config::ConfigError;
use kiln_timing::TimingError;

/// Errors raised by drivers, the registry and memory configuration.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// No registered driver has a manifest with this exact name.
    #[error("unknown device '{name}' (supported devices: {})", .known.join(", "))]
    UnknownDevice {
        /// The requested name.
        name: String,
        /// Names of all registered devices.
        known: Vec<String>,
    },

    /// Alignment must be a positive power of two.
    #[error("memory alignment {value} is not a positive power of two")]
    InvalidAlignment {
        /// The rejected value.
        value: i64,
    },

    /// The header prefix is measured in cells and cannot be negative.
    #[error("minimum memory prefix {value} is negative")]
    InvalidPrefix {
        /// The rejected value.
        value: i64,
    },

    /// A memory layout does not fit into the device.
    #[error("device '{device}' has {available} bytes of memory but the layout needs {required}")]
    OutOfMemory {
        /// The device the layout was planned for.
        device: String,
        /// Aligned layout size in bytes.
        required: u64,
        /// Memory available on the device in bytes.
        available: u64,
    },

    /// A built-in device manifest is invalid.
    #[error(transparent)]
    Arch(#[from] ArchError),

    /// Reading a custom configuration entry failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The device's timing report is unusable.
    #[error(transparent)]
    Timing(#[from] TimingError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_device_lists_known_names() {
        let err = DeviceError::UnknownDevice {
            name: "Alveo U55".to_string(),
            known: vec!["Alveo U50".to_string(), "Catapult".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "unknown device 'Alveo U55' (supported devices: Alveo U50, Catapult)"
        );
    }

    #[test]
    fn invalid_alignment_names_value() {
        let err = DeviceError::InvalidAlignment { value: 4095 };
        assert!(err.to_string().contains("4095"));
    }
}
