//! Listing emitter.

use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use qlower_compile::{LoweredInstruction, LoweredProgram, ScheduleItem, ScheduledProgram};
use qlower_ir::{IrError, is_valid_name};

use crate::config::{EmitterConfig, OutputTarget, Verbosity};
use crate::error::EmitResult;

/// File extension of written listings.
pub const LISTING_EXTENSION: &str = "qasm";

/// Render a scheduled program as a bundle/skip listing.
pub fn emit(program: &ScheduledProgram, config: &EmitterConfig) -> String {
    let mut emitter = Emitter::new(config);
    emitter.emit_header(&program.name);
    if config.verbosity == Verbosity::Detailed {
        emitter.writeln(&format!("# total cycles: {}", program.total_cycles));
    }
    emitter.separator();

    for item in &program.items {
        match item {
            ScheduleItem::Section(name) => emitter.writeln(&format!(".{name}")),
            ScheduleItem::Bundle(bundle) => {
                emitter.writeln(&format!("    {{ # start at cycle {}", bundle.cycle));
                for inst in &bundle.instructions {
                    emitter.writeln(&format!("        {inst}"));
                }
                emitter.writeln("    }");
            }
            ScheduleItem::Skip(n) => emitter.writeln(&format!("    skip {n}")),
        }
    }

    debug!(
        "Emitted {} bundles for '{}'",
        program.num_bundles(),
        program.name
    );
    emitter.output
}

/// Render a lowered program without cycle information.
pub fn emit_flat(program: &LoweredProgram, config: &EmitterConfig) -> String {
    let mut emitter = Emitter::new(config);
    emitter.emit_header(&program.name);
    if config.verbosity == Verbosity::Detailed {
        emitter.writeln(&format!("# operations: {}", program.num_operations()));
    }
    emitter.separator();

    for inst in &program.instructions {
        match inst {
            LoweredInstruction::Label(_) => emitter.writeln(&inst.to_string()),
            _ => emitter.writeln(&format!("    {inst}")),
        }
    }

    emitter.output
}

/// Deliver a rendered listing according to the configured output target.
///
/// Returns the written path, or `None` when the target is stdout and the
/// caller is expected to print the text.
///
/// # Errors
///
/// Returns [`EmitError::Ir`](crate::EmitError::Ir) if `name` is not a
/// valid program name, so the file always lands directly inside the
/// directory. Returns [`EmitError::Io`](crate::EmitError::Io) if the
/// directory cannot be created or the file cannot be written.
pub fn write_listing(text: &str, name: &str, config: &EmitterConfig) -> EmitResult<Option<PathBuf>> {
    match &config.output {
        OutputTarget::Stdout => Ok(None),
        OutputTarget::Directory(dir) => {
            if !is_valid_name(name) {
                return Err(IrError::InvalidName(name.to_string()).into());
            }
            fs::create_dir_all(dir)?;
            let path = dir.join(format!("{name}.{LISTING_EXTENSION}"));
            fs::write(&path, text)?;
            info!("Wrote listing to {}", path.display());
            Ok(Some(path))
        }
    }
}

struct Emitter<'a> {
    output: String,
    config: &'a EmitterConfig,
}

impl<'a> Emitter<'a> {
    fn new(config: &'a EmitterConfig) -> Self {
        Self {
            output: String::new(),
            config,
        }
    }

    fn emit_header(&mut self, name: &str) {
        let line = format!("pragma @{}.name(\"{name}\")", self.config.namespace);
        self.writeln(&line);
    }

    fn separator(&mut self) {
        if self.config.verbosity != Verbosity::Quiet {
            self.writeln("");
        }
    }

    fn writeln(&mut self, s: &str) {
        self.output.push_str(s);
        self.output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qlower_compile::{Bundle, ScheduledInstruction, lower};
    use qlower_ir::{Block, Operation, Program, QubitId};

    fn small_schedule() -> ScheduledProgram {
        ScheduledProgram {
            name: "demo".into(),
            num_qubits: 2,
            items: vec![
                ScheduleItem::Section("kernel".into()),
                ScheduleItem::Bundle(Bundle {
                    cycle: 0,
                    instructions: vec![
                        ScheduledInstruction::Op(Operation::measure(QubitId(0))),
                        ScheduledInstruction::Op(Operation::measure(QubitId(1))),
                    ],
                }),
                ScheduleItem::Skip(14),
            ],
            total_cycles: 15,
        }
    }

    #[test]
    fn test_emit_normal() {
        let text = emit(&small_schedule(), &EmitterConfig::default());
        let expected = "pragma @ql.name(\"demo\")\n\
                        \n\
                        .kernel\n    \
                        { # start at cycle 0\n        \
                        measure q[0]\n        \
                        measure q[1]\n    \
                        }\n    \
                        skip 14\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_emit_quiet_and_detailed() {
        let quiet = emit(
            &small_schedule(),
            &EmitterConfig::default().with_verbosity(Verbosity::Quiet),
        );
        assert!(quiet.starts_with("pragma @ql.name(\"demo\")\n.kernel\n"));

        let detailed = emit(
            &small_schedule(),
            &EmitterConfig::default().with_verbosity(Verbosity::Detailed),
        );
        assert!(detailed.starts_with("pragma @ql.name(\"demo\")\n# total cycles: 15\n\n"));
    }

    #[test]
    fn test_emit_namespace() {
        let text = emit(
            &small_schedule(),
            &EmitterConfig::default().with_namespace("cq"),
        );
        assert!(text.starts_with("pragma @cq.name(\"demo\")"));
    }

    #[test]
    fn test_emit_flat() {
        let mut k = Block::new("kernel");
        k.h(QubitId(0)).cnot(QubitId(0), QubitId(1));
        let mut program = Program::new("flat", 2, 0);
        program.add_block(k).unwrap();

        let text = emit_flat(&lower(&program).unwrap(), &EmitterConfig::default());
        assert_eq!(
            text,
            "pragma @ql.name(\"flat\")\n\n.kernel\n    h q[0]\n    cnot q[0], q[1]\n"
        );
    }

    #[test]
    fn test_write_listing_stdout() {
        let path = write_listing("x", "demo", &EmitterConfig::default()).unwrap();
        assert!(path.is_none());
    }

    #[test]
    fn test_write_listing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");
        let config = EmitterConfig::default().with_output_dir(&out);

        let path = write_listing("body\n", "demo", &config).unwrap().unwrap();
        assert_eq!(path, out.join("demo.qasm"));
        assert_eq!(fs::read_to_string(path).unwrap(), "body\n");
    }

    #[test]
    fn test_write_listing_rejects_path_names() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("listings");
        let config = EmitterConfig::default().with_output_dir(&out);

        for name in ["../escape", "a/b", ""] {
            let err = write_listing("body\n", name, &config).unwrap_err();
            assert!(matches!(err, crate::EmitError::Ir(IrError::InvalidName(_))));
        }
        assert!(!out.exists());
        assert!(!dir.path().join("escape.qasm").exists());
    }
}
