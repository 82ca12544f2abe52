//! qlower Lowering and Scheduling Framework
//!
//! This crate turns a [`qlower_ir::Program`] into a cycle-scheduled
//! instruction stream. It implements a pass-based architecture: lowering
//! flattens the control-flow graph once, then a [`PassManager`] runs
//! analyses over the flat program.
//!
//! # Architecture
//!
//! ```text
//! Program (control-flow graph)
//!       │
//!       ▼
//!  LoweringPass ──► LoweredProgram (labels, ops, compare/branch markers)
//!       │
//!       ▼
//! ┌─────────────┐
//! │ PassManager │ ◄── PropertySet (timing model, schedule)
//! └─────────────┘
//!       │
//!       ├── CycleScheduling
//!       └── ScheduleVerification
//!       │
//!       ▼
//! ScheduledProgram (sections, bundles, skips)
//! ```
//!
//! # Example: Basic Compilation
//!
//! ```rust
//! use qlower_compile::{compile, TimingModel};
//! use qlower_ir::{Block, Program, QubitId};
//!
//! let mut kernel = Block::new("kernel");
//! kernel.prepz(QubitId(0)).h(QubitId(0)).measure(QubitId(0));
//!
//! let mut program = Program::new("coin", 1, 0);
//! program.add_block(kernel).unwrap();
//!
//! let scheduled = compile(&program, &TimingModel::default()).unwrap();
//! assert_eq!(scheduled.num_bundles(), 3);
//! assert_eq!(scheduled.total_cycles, 3 + 14);
//! ```
//!
//! # Custom Passes
//!
//! Implement the [`Pass`] trait to run extra work between scheduling steps:
//!
//! ```rust
//! use qlower_compile::{CompileResult, LoweredProgram, Pass, PassKind, PropertySet};
//!
//! struct CountMeasurements;
//!
//! impl Pass for CountMeasurements {
//!     fn name(&self) -> &str { "count_measurements" }
//!     fn kind(&self) -> PassKind { PassKind::Analysis }
//!
//!     fn run(&self, program: &mut LoweredProgram, props: &mut PropertySet) -> CompileResult<()> {
//!         let n = program.operations().filter(|op| op.is_measure()).count();
//!         props.insert(n);
//!         Ok(())
//!     }
//! }
//! ```

pub mod error;
pub mod lowering;
pub mod manager;
pub mod pass;
pub mod property;
pub mod schedule;

// Built-in passes
pub mod passes;

pub use error::{CompileError, CompileResult};
pub use lowering::{BranchKind, LoweredInstruction, LoweredProgram, LoweringPass, lower};
pub use manager::{PassManager, PassManagerBuilder, compile};
pub use pass::{Pass, PassKind};
pub use passes::{CycleScheduling, ScheduleVerification, VerificationReport};
pub use property::PropertySet;
pub use schedule::{
    Bundle, DEFAULT_READOUT_GAP, MAX_DURATION, ScheduleItem, ScheduledInstruction,
    ScheduledProgram, Scheduler, TimingModel,
};
