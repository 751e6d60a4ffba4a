//! Errors raised while describing a device.

/// Errors that can occur when constructing a [`DeviceManifest`](crate::DeviceManifest).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArchError {
    /// The manifest has no name, so it could never be selected.
    #[error("device manifest has an empty name")]
    EmptyName,

    /// The device clock must be faster than 0 Hz.
    #[error("device '{device}' has a zero clock frequency")]
    ZeroClockFrequency {
        /// The device name.
        device: String,
    },

    /// The device must expose some memory to the host.
    #[error("device '{device}' has no available memory")]
    ZeroMemory {
        /// The device name.
        device: String,
    },

    /// An operator mnemonic is not one the toolchain knows how to price.
    #[error("unknown operator mnemonic '{0}'")]
    UnknownOperator(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_device() {
        let err = ArchError::ZeroClockFrequency {
            device: "Alveo U50".to_string(),
        };
        assert_eq!(err.to_string(), "device 'Alveo U50' has a zero clock frequency");
    }

    #[test]
    fn display_unknown_operator() {
        let err = ArchError::UnknownOperator("pow".to_string());
        assert_eq!(err.to_string(), "unknown operator mnemonic 'pow'");
    }
}
