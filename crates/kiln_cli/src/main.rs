//! Kiln CLI, the command-line front end of the kiln hardware compiler.
//!
//! Provides `kiln devices` to list the supported boards, `kiln cost` to
//! price a single operation on a device, `kiln memory` to show the memory
//! configuration a request resolves to, and `kiln build` to compile a typed
//! program into VHDL.

#![warn(missing_docs)]

mod build;
mod cost;
mod devices;
mod memory;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use kiln_arch::OperatorKind;
use kiln_config::{ConfigError, HardwareGenerationConfig};

/// Kiln compiles typed programs into FPGA hardware.
#[derive(Parser, Debug)]
#[command(name = "kiln", version, about = "Kiln hardware compiler")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a `kiln.toml` request; defaults to `./kiln.toml`.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the supported devices.
    Devices(DevicesArgs),
    /// Price one operation on a device.
    Cost(CostArgs),
    /// Show the memory configuration of the request.
    Memory(MemoryArgs),
    /// Compile a typed program to VHDL.
    Build(BuildArgs),
}

/// Arguments for the `kiln devices` subcommand.
#[derive(Parser, Debug)]
pub struct DevicesArgs {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `kiln cost` subcommand.
#[derive(Parser, Debug)]
pub struct CostArgs {
    /// Exact device name, e.g. "Alveo U50".
    #[arg(short, long)]
    pub device: String,

    /// Operator mnemonic, e.g. `add` or `neg`.
    #[arg(long)]
    pub op: OperatorKind,

    /// Operand width in bits.
    #[arg(short, long)]
    pub width: u32,

    /// Price signed operands.
    #[arg(short, long)]
    pub signed: bool,
}

/// Arguments for the `kiln memory` subcommand.
#[derive(Parser, Debug)]
pub struct MemoryArgs {
    /// Device to use instead of the one in the request.
    #[arg(short, long)]
    pub device: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `kiln build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Typed program in JSON.
    #[arg(short, long)]
    pub program: PathBuf,

    /// Output directory instead of the one in the request.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

/// Output format of listing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a request file.
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    /// Loads the request named by `--config`, or `./kiln.toml`.
    pub fn load_config(&self) -> Result<HardwareGenerationConfig, ConfigError> {
        match &self.config {
            Some(path) => kiln_config::load_config_file(path),
            None => kiln_config::load_config(Path::new(".")),
        }
    }

    /// Default log filter for these flags.
    fn log_filter(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(global.log_filter()))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Command::Devices(ref args) => devices::run(args, &global),
        Command::Cost(ref args) => cost::run(args, &global),
        Command::Memory(ref args) => memory::run(args, &global),
        Command::Build(ref args) => build::run(args, &global).await,
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
