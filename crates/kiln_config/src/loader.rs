//! Configuration file loading and validation.

use std::path::Path;

use crate::error::ConfigError;
use crate::types::{ConfigDocument, HardwareGenerationConfig};

/// File name looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "kiln.toml";

/// Loads and validates `<project_dir>/kiln.toml`.
pub fn load_config(project_dir: &Path) -> Result<HardwareGenerationConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<HardwareGenerationConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<HardwareGenerationConfig, ConfigError> {
    let doc: ConfigDocument =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate(&doc)?;
    Ok(doc.into())
}

/// Checks required fields and the shape of names that end up in generated code.
fn validate(doc: &ConfigDocument) -> Result<(), ConfigError> {
    if doc.hardware.device.trim().is_empty() {
        return Err(ConfigError::MissingField("hardware.device".to_string()));
    }
    if let Some(channel) = &doc.hardware.channel {
        if channel.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "hardware.channel must not be empty".to_string(),
            ));
        }
    }
    if let Some(top) = &doc.hardware.top {
        if !is_hdl_identifier(top) {
            return Err(ConfigError::ValidationError(format!(
                "hardware.top '{top}' is not a valid HDL identifier"
            )));
        }
    }
    Ok(())
}

/// Letters, digits and single underscores, starting with a letter.
fn is_hdl_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.ends_with('_')
        && !name.contains("__")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::path::PathBuf;

    #[test]
    fn parse_minimal_config() {
        let config = load_config_from_str("[hardware]\ndevice = \"Alveo U50\"\n").unwrap();
        assert_eq!(config.device_name, "Alveo U50");
        assert_eq!(config.output_dir, PathBuf::from("build"));
        assert_eq!(config.top, "kiln_hardware");
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[hardware]
device = "Nexys A7-100T"
channel = "Ethernet"
output_dir = "out/hw"
top = "adder_tree"

[custom.MemoryConfiguration]
alignment = 64
minimum_prefix = 2

[custom.SerialPort]
baud_rate = 230400
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.channel.as_deref(), Some("Ethernet"));
        assert_eq!(config.output_dir, PathBuf::from("out/hw"));
        assert_eq!(config.top, "adder_tree");
        let keys: Vec<_> = config.custom.keys().collect();
        assert_eq!(keys, vec!["MemoryConfiguration", "SerialPort"]);
    }

    #[test]
    fn custom_tables_stay_raw_until_read() {
        #[derive(Debug, Clone, Default, Deserialize)]
        struct SerialPort {
            baud_rate: u32,
        }

        let mut config = load_config_from_str(
            "[hardware]\ndevice = \"x\"\n[custom.SerialPort]\nbaud_rate = 9600\n",
        )
        .unwrap();
        let port = config.custom.get_or_create::<SerialPort>("SerialPort").unwrap();
        assert_eq!(port.baud_rate, 9600);
    }

    #[test]
    fn missing_device_errors() {
        let err = load_config_from_str("[hardware]\ndevice = \"  \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn missing_hardware_table_errors() {
        let err = load_config_from_str("[custom.x]\na = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn invalid_top_errors() {
        for top in ["1st", "has space", "trailing_", "double__underscore", ""] {
            let src = format!("[hardware]\ndevice = \"x\"\ntop = \"{top}\"\n");
            let err = load_config_from_str(&src).unwrap_err();
            assert!(matches!(err, ConfigError::ValidationError(_)), "{top}");
        }
    }

    #[test]
    fn empty_channel_errors() {
        let err = load_config_from_str("[hardware]\ndevice = \"x\"\nchannel = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn load_from_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[hardware]\ndevice = \"Catapult\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.device_name, "Catapult");
    }

    #[test]
    fn io_error_from_nonexistent_dir() {
        let err = load_config(Path::new("/nonexistent/dir")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
