//! `kiln memory`: shows the memory configuration of a request.

use kiln_config::HardwareGenerationConfig;
use kiln_device::{DriverRegistry, MemoryConfiguration};
use serde::Serialize;

use crate::{GlobalArgs, MemoryArgs, ReportFormat};

#[derive(Debug, Serialize)]
struct MemoryReport<'a> {
    device: &'a str,
    #[serde(flatten)]
    memory: MemoryConfiguration,
    header_bytes: u64,
}

/// Runs the `kiln memory` command.
pub fn run(args: &MemoryArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut config = global.load_config()?;
    if let Some(device) = &args.device {
        config.device_name = device.clone();
    }
    let registry = DriverRegistry::with_builtin_drivers()?;
    let memory = MemoryConfiguration::create(&config, &registry)?;

    match args.format {
        ReportFormat::Text => print!("{}", render_text(&config, &memory)),
        ReportFormat::Json => {
            let report = MemoryReport {
                device: &config.device_name,
                memory,
                header_bytes: memory.header_bytes(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(0)
}

fn render_text(config: &HardwareGenerationConfig, memory: &MemoryConfiguration) -> String {
    format!(
        "device          {}\nalignment       {} bytes\nminimum prefix  {} cells ({} bytes)\n",
        config.device_name,
        memory.alignment(),
        memory.minimum_prefix(),
        memory.header_bytes()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_config::load_config_from_str;

    fn resolve(toml: &str) -> (HardwareGenerationConfig, MemoryConfiguration) {
        let config = load_config_from_str(toml).unwrap();
        let registry = DriverRegistry::with_builtin_drivers().unwrap();
        let memory = MemoryConfiguration::create(&config, &registry).unwrap();
        (config, memory)
    }

    #[test]
    fn device_defaults() {
        let (config, memory) = resolve("[hardware]\ndevice = \"Alveo U50\"\n");
        assert_eq!(
            render_text(&config, &memory),
            "device          Alveo U50\nalignment       4096 bytes\nminimum prefix  4 cells (16 bytes)\n"
        );
    }

    #[test]
    fn overrides_from_request() {
        let (_, memory) = resolve(
            "[hardware]\ndevice = \"Nexys A7-100T\"\n\n[custom.MemoryConfiguration]\nalignment = 8192\nminimumPrefix = 8\n",
        );
        assert_eq!(memory.alignment(), 8192);
        assert_eq!(memory.minimum_prefix(), 8);
    }

    #[test]
    fn json_report_is_flat() {
        let (config, memory) = resolve("[hardware]\ndevice = \"Catapult\"\n");
        let report = MemoryReport {
            device: &config.device_name,
            memory,
            header_bytes: memory.header_bytes(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["device"], "Catapult");
        assert_eq!(json["alignment"], 16);
        assert_eq!(json["minimum_prefix"], 0);
        assert_eq!(json["header_bytes"], 0);
    }
}
