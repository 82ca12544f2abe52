//! Compile command implementation.

use anyhow::{Context, Result};
use console::style;
use std::path::Path;
use tracing::{info, warn};

use qlower_compile::{compile, lower};
use qlower_cqasm::{Verbosity, emit, emit_flat, write_listing};

use crate::config::QlowerConfig;
use crate::programs;

/// Options of the compile command.
#[derive(Debug, Clone)]
pub struct CompileOptions<'a> {
    pub program: &'a str,
    pub output_dir: Option<&'a Path>,
    pub flat: bool,
    pub verbosity: Verbosity,
    pub marked: u32,
}

/// Execute the compile command.
pub fn execute(options: &CompileOptions<'_>, config: &QlowerConfig) -> Result<()> {
    let program = programs::build(options.program, options.marked)?;
    let emitter = config.emitter_config(options.output_dir, options.verbosity);
    info!(
        "Compiling '{}': {} qubits, {} registers, {} control nodes",
        program.name(),
        program.num_qubits(),
        program.num_registers(),
        program.len()
    );

    let (text, summary) = if options.flat {
        let lowered = lower(&program).context("Lowering failed")?;
        let summary = format!(
            "{} instructions, {} operations",
            lowered.len(),
            lowered.num_operations()
        );
        (emit_flat(&lowered, &emitter), summary)
    } else {
        let scheduled = match compile(&program, &config.timing) {
            Ok(s) => s,
            Err(e) if e.is_recoverable() => {
                warn!("Nothing to schedule: {e}");
                return Ok(());
            }
            Err(e) => return Err(e).context("Compilation failed"),
        };
        let summary = format!(
            "{} bundles, {} skipped cycles, {} total cycles",
            scheduled.num_bundles(),
            scheduled.skipped_cycles(),
            scheduled.total_cycles
        );
        (emit(&scheduled, &emitter), summary)
    };

    match write_listing(&text, program.name(), &emitter)? {
        Some(path) => {
            println!(
                "{} Compiled {} ({})",
                style("✓").green().bold(),
                style(program.name()).green(),
                summary
            );
            println!("  Output: {}", style(path.display()).green());
        }
        None => {
            info!("{summary}");
            print!("{text}");
        }
    }

    Ok(())
}
