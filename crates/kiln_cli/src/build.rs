//! `kiln build`: compiles a typed program to VHDL.

use kiln_core::{CompileOutcome, Compiler, HardwareRepresentation, TypedProgram};
use kiln_pipeline::CancellationToken;

use crate::{BuildArgs, GlobalArgs};

/// Exit code of an interrupted build, as for a shell job killed by SIGINT.
const EXIT_CANCELLED: i32 = 130;

/// Runs the `kiln build` command.
///
/// Ctrl-C cancels the running compilation; the command then exits with
/// code 130 and leaves no partial artifact registered.
pub async fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut config = global.load_config()?;
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    let program = TypedProgram::load(&args.program)?;
    let compiler = Compiler::with_builtin_drivers()?;

    if !global.quiet {
        eprintln!("   Compiling {} for {}", args.program.display(), config.device_name);
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("interrupt received, cancelling the build");
            on_interrupt.cancel();
        }
    });
    let outcome = compiler.compile(program, config, &cancel).await;
    interrupt.abort();

    match outcome? {
        CompileOutcome::Cancelled => {
            eprintln!("   Cancelled");
            Ok(EXIT_CANCELLED)
        }
        CompileOutcome::Completed {
            representation,
            failures,
        } => {
            for failure in &failures {
                eprintln!("warning: step '{}' failed: {}", failure.step, failure.error);
            }
            if !global.quiet {
                eprint!("{}", summary(&representation));
            }
            Ok(0)
        }
    }
}

fn summary(representation: &HardwareRepresentation) -> String {
    let implementation = representation.implementation();
    let mut out = format!(
        "      Device {} ({})\n",
        representation.manifest().name(),
        representation.channel().unwrap_or("no channel")
    );
    for cost in representation.member_costs() {
        out.push_str(&format!(
            "      Member {} -> {}: {} ({} wait)\n",
            cost.member, cost.entity, cost.cycles, cost.wait_cycles
        ));
    }
    if let Some(layout) = representation.memory_layout() {
        out.push_str(&format!(
            "      Memory {} bytes ({} header, {} payload)\n",
            layout.total_bytes, layout.header_bytes, layout.payload_bytes
        ));
    }
    out.push_str(&format!(
        "       Wrote {} [{}]\n",
        implementation.artifact_path.display(),
        implementation.checksum.short()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const PROGRAM: &str = r#"{
        "assemblies": [{ "file": "Calc.dll" }],
        "members": [{
            "name": "Calc::Xor",
            "inputs": [
                { "name": "a", "width": 8, "signed": false },
                { "name": "b", "width": 8, "signed": false }
            ],
            "result": { "width": 8, "signed": false },
            "body": {
                "kind": "binary", "op": "xor", "width": 8, "signed": false,
                "operands": [
                    { "kind": "variable", "name": "a" },
                    { "kind": "variable", "name": "b" }
                ]
            }
        }]
    }"#;

    fn setup(dir: &std::path::Path) -> (BuildArgs, GlobalArgs) {
        let program = dir.join("calc.json");
        std::fs::write(&program, PROGRAM).unwrap();
        let config = dir.join("kiln.toml");
        std::fs::write(&config, "[hardware]\ndevice = \"Nexys A7-100T\"\n").unwrap();
        let args = BuildArgs {
            program,
            output_dir: Some(dir.join("out")),
        };
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            config: Some(config),
        };
        (args, global)
    }

    #[tokio::test]
    async fn build_writes_vhdl() {
        let dir = tempfile::tempdir().unwrap();
        let (args, global) = setup(dir.path());
        assert_eq!(run(&args, &global).await.unwrap(), 0);
        let vhdl = std::fs::read_to_string(dir.path().join("out/kiln_hardware.vhd")).unwrap();
        assert!(vhdl.contains("result <= (in_b xor in_a);"));
    }

    #[tokio::test]
    async fn missing_program_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let (mut args, global) = setup(dir.path());
        args.program = PathBuf::from("/nonexistent/calc.json");
        let err = run(&args, &global).await.unwrap_err();
        assert!(err.to_string().contains("/nonexistent/calc.json"));
    }
}
