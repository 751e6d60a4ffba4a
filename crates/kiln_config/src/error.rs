//! Error types for configuration loading and validation.

/// Errors that can occur when loading a `kiln.toml` or reading custom settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// A raw custom configuration entry does not deserialize into the requested type.
    #[error("custom configuration '{key}' is malformed: {reason}")]
    CustomValue {
        /// The custom configuration key.
        key: String,
        /// Why deserialization failed.
        reason: String,
    },

    /// A custom configuration entry already holds a value of another type.
    #[error("custom configuration '{key}' does not hold a {expected}")]
    CustomTypeMismatch {
        /// The custom configuration key.
        key: String,
        /// The requested Rust type.
        expected: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_field() {
        let err = ConfigError::MissingField("hardware.device".to_string());
        assert_eq!(err.to_string(), "missing required field: hardware.device");
    }

    #[test]
    fn display_custom_value() {
        let err = ConfigError::CustomValue {
            key: "MemoryConfiguration".to_string(),
            reason: "invalid type".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "custom configuration 'MemoryConfiguration' is malformed: invalid type"
        );
    }

    #[test]
    fn display_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ConfigError::IoError(io_err);
        assert!(err.to_string().starts_with("failed to read configuration:"));
    }
}
