//! qlower Command-Line Interface
//!
//! Compiles the built-in example programs to cycle-scheduled cQASM
//! listings and inspects listings produced earlier.
//!
//! ```text
//! qlower compile teleport
//! qlower compile lotto --output-dir out/
//! qlower inspect out/quantum_lotto.qasm
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod programs;

use commands::{compile, inspect, version};
use config::QlowerConfig;
use qlower_cqasm::Verbosity;

/// qlower - quantum control-flow lowering and cycle scheduling
#[derive(Parser)]
#[command(name = "qlower")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a catalog program to a listing
    Compile {
        /// Program name (see `qlower programs`)
        program: String,

        /// Write the listing into this directory instead of stdout
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Emit the lowered instruction stream without scheduling
        #[arg(long)]
        flat: bool,

        /// Listing commentary level
        #[arg(long, value_enum, default_value = "normal")]
        detail: Detail,

        /// Value flagged by the Grover oracle
        #[arg(long, default_value = "0")]
        marked: u32,
    },

    /// Parse a listing and print its statistics
    Inspect {
        /// Listing file
        file: PathBuf,
    },

    /// List the built-in programs
    Programs,

    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Detail {
    Quiet,
    Normal,
    Detailed,
}

impl From<Detail> for Verbosity {
    fn from(detail: Detail) -> Self {
        match detail {
            Detail::Quiet => Verbosity::Quiet,
            Detail::Normal => Verbosity::Normal,
            Detail::Detailed => Verbosity::Detailed,
        }
    }
}

/// Log filter for a `-v` count, falling back to the configured level.
fn log_filter(verbose: u8, configured: &str) -> &str {
    match verbose {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = QlowerConfig::load(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_filter(cli.verbose, &config.log_level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Compile {
            program,
            output_dir,
            flat,
            detail,
            marked,
        } => {
            let options = compile::CompileOptions {
                program: &program,
                output_dir: output_dir.as_deref(),
                flat,
                verbosity: detail.into(),
                marked,
            };
            compile::execute(&options, &config)
        }

        Commands::Inspect { file } => inspect::execute(&file),

        Commands::Programs => {
            commands::programs::execute();
            Ok(())
        }

        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
