//! qlower Program Model
//!
//! This crate provides the data structures a qlower program is built from:
//! elementary operations, basic blocks, classical registers and the
//! control-flow graph that strings blocks together. It is the input side of
//! the `qlower` compilation stack.
//!
//! # Overview
//!
//! A [`Program`] declares how many qubits and classical registers it uses,
//! then receives control nodes in program order. Each node is a plain
//! [`Block`], an if/else pair, a counted loop or a post-tested loop. All
//! indices are checked as the node is added, so downstream passes can rely
//! on every reference being in range.
//!
//! # Core Components
//!
//! - **Identifiers**: [`QubitId`], [`RegisterId`] and the [`Reference`] union
//! - **Gates**: [`SingleQubitGate`], [`TwoQubitGate`] and [`GateKind`]
//! - **Operations**: [`Operation`] combining a gate with its operands
//! - **Blocks**: [`Block`], a named straight-line list of operations
//! - **Registers**: [`CmpOp`], [`Condition`] and the [`RegisterFile`] store
//! - **Program**: [`Program`], a petgraph-backed control-flow graph
//!
//! # Example: Teleportation Kernel
//!
//! ```rust
//! use qlower_ir::{Block, Program, QubitId};
//!
//! let mut kernel = Block::new("First");
//! for q in 0..3 {
//!     kernel.prepz(QubitId(q));
//! }
//! kernel
//!     .h(QubitId(1))
//!     .cz(QubitId(1), QubitId(2))
//!     .cnot(QubitId(0), QubitId(1))
//!     .h(QubitId(0))
//!     .measure(QubitId(0))
//!     .measure(QubitId(1))
//!     .cnot(QubitId(1), QubitId(2))
//!     .cz(QubitId(0), QubitId(2));
//!
//! let mut program = Program::new("teleport", 3, 0);
//! program.add_block(kernel).unwrap();
//!
//! assert_eq!(program.num_operations(), 11);
//! ```
//!
//! # Supported Gates
//!
//! | Mnemonic | Qubits | Description |
//! |----------|--------|-------------|
//! | `prep_z` | 1 | Prepare in \|0⟩ |
//! | `h` | 1 | Hadamard gate |
//! | `x`, `y` | 1 | Pauli gates |
//! | `cnot` | 2 | Controlled-NOT |
//! | `cz` | 2 | Controlled-Z |
//! | `measure` | 1 | Computational-basis measurement |

pub mod block;
pub mod error;
pub mod gate;
pub mod operation;
pub mod program;
pub mod qubit;
pub mod register;

pub use block::{Block, is_valid_name};
pub use error::{IrError, IrResult};
pub use gate::{GateKind, SingleQubitGate, TwoQubitGate};
pub use operation::Operation;
pub use program::{ControlNode, FlowEdge, NodeIndex, Program};
pub use qubit::{QubitId, Reference, RegisterId};
pub use register::{CmpOp, Condition, RegisterFile};
