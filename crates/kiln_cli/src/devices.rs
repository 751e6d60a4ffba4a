//! `kiln devices`: lists the supported devices.

use kiln_arch::DeviceManifest;
use kiln_device::DriverRegistry;

use crate::{DevicesArgs, GlobalArgs, ReportFormat};

/// Runs the `kiln devices` command.
pub fn run(args: &DevicesArgs, _global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let registry = DriverRegistry::with_builtin_drivers()?;
    let devices = registry.supported_devices();
    match args.format {
        ReportFormat::Text => print!("{}", render_table(&devices)),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&devices)?),
    }
    Ok(0)
}

/// One line per device, columns aligned.
fn render_table(devices: &[&DeviceManifest]) -> String {
    let width = devices.iter().map(|m| m.name().len()).max().unwrap_or(0);
    let mut out = String::new();
    for manifest in devices {
        out.push_str(&format!(
            "{:<width$}  {:<10} {:<8} {:>8}  {:>9}  {}\n",
            manifest.name(),
            manifest.family(),
            manifest.tool_chain(),
            manifest.clock_frequency().to_string(),
            format_bytes(manifest.available_memory_bytes()),
            manifest.supported_channels().join(", "),
        ));
    }
    out
}

fn format_bytes(bytes: u64) -> String {
    const GIB: u64 = 1 << 30;
    const MIB: u64 = 1 << 20;
    if bytes >= GIB && bytes % GIB == 0 {
        format!("{} GiB", bytes / GIB)
    } else if bytes >= MIB && bytes % MIB == 0 {
        format!("{} MiB", bytes / MIB)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lists_every_device_once() {
        let registry = DriverRegistry::with_builtin_drivers().unwrap();
        let table = render_table(&registry.supported_devices());
        assert_eq!(table.lines().count(), 7);
        let nexys = table.lines().next().unwrap();
        assert!(nexys.starts_with("Nexys A7-100T"));
        assert!(nexys.contains("128 MiB"));
        assert!(nexys.ends_with("Serial, Ethernet"));
    }

    #[test]
    fn bytes_are_humanized_when_exact() {
        assert_eq!(format_bytes(4 << 30), "4 GiB");
        assert_eq!(format_bytes(128 << 20), "128 MiB");
        assert_eq!(format_bytes(1000), "1000 B");
    }

    #[test]
    fn json_names_match_registry() {
        let registry = DriverRegistry::with_builtin_drivers().unwrap();
        let json = serde_json::to_value(registry.supported_devices()).unwrap();
        let names: Vec<_> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names.first().map(String::as_str), Some("Nexys A7-100T"));
        assert_eq!(names.last().map(String::as_str), Some("Catapult"));
    }
}
