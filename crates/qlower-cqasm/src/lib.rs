//! cQASM Listing Emitter and Parser for qlower
//!
//! This crate renders scheduled programs as cQASM-style listings and reads
//! them back. A listing opens with a name pragma, then lists sections,
//! braced bundles annotated with their start cycle, and skip markers for
//! idle cycles.
//!
//! # Listing Format
//!
//! | Element | Example |
//! |---------|---------|
//! | Program name | `pragma @ql.name("teleport")` |
//! | Section | `.kernel` |
//! | Bundle | `{ # start at cycle 5` ... `}` |
//! | Idle cycles | `skip 14` |
//! | Gate | `cnot q[0], q[1]` |
//! | Compare | `cmp.lt r[0], r[1]` |
//! | Else jump | `br.else` |
//!
//! # Example: Emitting a Schedule
//!
//! ```rust
//! use qlower_compile::{compile, TimingModel};
//! use qlower_cqasm::{emit, EmitterConfig};
//! use qlower_ir::{Block, Program, QubitId};
//!
//! let mut kernel = Block::new("kernel");
//! kernel.prepz(QubitId(0)).h(QubitId(0)).measure(QubitId(0));
//! let mut program = Program::new("coin", 1, 0);
//! program.add_block(kernel).unwrap();
//!
//! let scheduled = compile(&program, &TimingModel::default()).unwrap();
//! let text = emit(&scheduled, &EmitterConfig::default());
//!
//! assert!(text.starts_with("pragma @ql.name(\"coin\")"));
//! assert!(text.contains("    { # start at cycle 2\n        measure q[0]\n    }"));
//! assert!(text.ends_with("    skip 14\n"));
//! ```
//!
//! # Example: Round-Trip
//!
//! ```rust
//! use qlower_compile::{compile, TimingModel};
//! use qlower_cqasm::{emit, parse, EmitterConfig};
//! use qlower_ir::{Block, Program, QubitId};
//!
//! let mut kernel = Block::new("bell");
//! kernel.h(QubitId(0)).cnot(QubitId(0), QubitId(1));
//! let mut program = Program::new("bell", 2, 0);
//! program.add_block(kernel).unwrap();
//!
//! let scheduled = compile(&program, &TimingModel::default()).unwrap();
//! let listing = parse(&emit(&scheduled, &EmitterConfig::default())).unwrap();
//!
//! assert_eq!(listing.timed_operations(), scheduled.timed_operations());
//! assert_eq!(listing.total_cycles(), scheduled.total_cycles);
//! ```

pub mod config;
pub mod emitter;
pub mod error;
pub mod lexer;
pub mod listing;
pub mod parser;

pub use config::{DEFAULT_NAMESPACE, EmitterConfig, OutputTarget, Verbosity};
pub use emitter::{LISTING_EXTENSION, emit, emit_flat, write_listing};
pub use error::{EmitError, EmitResult};
pub use listing::{Listing, ListingBundle, ListingInstruction, ListingItem};
pub use parser::parse;
