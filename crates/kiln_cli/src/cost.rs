//! `kiln cost`: prices one operation on a device.

use kiln_arch::OperationDescriptor;
use kiln_device::DriverRegistry;
use kiln_timing::{DelaySource, TimingError};

use crate::{CostArgs, GlobalArgs};

/// Runs the `kiln cost` command.
pub fn run(args: &CostArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let registry = DriverRegistry::with_builtin_drivers()?;
    let operation = OperationDescriptor {
        operator: args.op,
        width_bits: args.width,
        signed: args.signed,
    };
    let cycles = registry.clock_cycles(&args.device, &operation)?;

    if global.quiet {
        println!("{}", cycles.value());
        return Ok(0);
    }
    println!("{operation} on {}: {cycles} ({} whole)", args.device, cycles.ceil_cycles());

    if global.verbose {
        let driver = registry.driver(&args.device)?;
        let report = driver.timing_report()?;
        let estimate = kiln_timing::resolve_delay(report, &operation).ok_or_else(|| TimingError::MissingOperator {
            device: args.device.clone(),
            operator: operation.operator.to_string(),
        })?;
        match estimate.source {
            DelaySource::Exact => println!("  delay {:.3} ns, measured", estimate.delay_ns),
            DelaySource::Scaled {
                from_width,
                from_signed,
            } => {
                let sign = if from_signed { "signed" } else { "unsigned" };
                println!("  delay {:.3} ns, scaled from {sign}{from_width}", estimate.delay_ns);
            }
        }
        println!("  clock period {:.3} ns", driver.manifest().clock_period_ns());
    }
    Ok(0)
}
