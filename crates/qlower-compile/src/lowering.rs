//! Control-flow lowering.
//!
//! Flattens a [`Program`]'s control-flow graph into one linear instruction
//! stream. Block boundaries survive as [`LoweredInstruction::Label`] markers
//! and classical control survives as compare/branch markers; everything else
//! is the blocks' operations, in program order.
//!
//! | Construct | Lowered form |
//! |-----------|--------------|
//! | block | `Label`, ops |
//! | if/else | `Label(then)`, `Compare`, then-ops, `SkipElse`, `Label(else)`, else-ops |
//! | for k | `Label`, ops repeated k times |
//! | do-while | `Label`, ops once, `Compare` |

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use qlower_ir::{Block, Condition, ControlNode, Operation, Program};

use crate::error::{CompileError, CompileResult};

/// Which construct a compare marker came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BranchKind {
    /// Guard of an if/else; on false, control continues at the else label.
    IfElse,
    /// Loop test of a do-while; on true, control returns to the body label.
    DoWhile,
}

/// One entry of the lowered stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoweredInstruction {
    /// Start of a block. Structural only.
    Label(String),
    /// A quantum operation.
    Op(Operation),
    /// Classical comparison driving a branch.
    Compare {
        /// The compared registers.
        condition: Condition,
        /// Originating construct.
        kind: BranchKind,
    },
    /// End of the then-arm: jump over the else-arm.
    SkipElse,
}

impl LoweredInstruction {
    /// Get the operation if this entry is one.
    #[inline]
    pub fn operation(&self) -> Option<&Operation> {
        match self {
            LoweredInstruction::Op(op) => Some(op),
            _ => None,
        }
    }

    /// Check if this entry is a classical compare or branch marker.
    #[inline]
    pub fn is_classical(&self) -> bool {
        matches!(
            self,
            LoweredInstruction::Compare { .. } | LoweredInstruction::SkipElse
        )
    }
}

impl fmt::Display for LoweredInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoweredInstruction::Label(name) => write!(f, ".{name}"),
            LoweredInstruction::Op(op) => write!(f, "{op}"),
            LoweredInstruction::Compare { condition, .. } => write!(
                f,
                "cmp.{} {}, {}",
                condition.op.mnemonic(),
                condition.lhs,
                condition.rhs
            ),
            LoweredInstruction::SkipElse => f.write_str("br.else"),
        }
    }
}

/// The linear result of lowering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoweredProgram {
    /// Program name.
    pub name: String,
    /// Declared qubit count.
    pub num_qubits: u32,
    /// Declared register count.
    pub num_registers: u32,
    /// Instructions in program order.
    pub instructions: Vec<LoweredInstruction>,
}

impl LoweredProgram {
    /// Create an empty lowered program.
    pub fn new(name: impl Into<String>, num_qubits: u32, num_registers: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_registers,
            instructions: vec![],
        }
    }

    /// The quantum operations, labels and classical markers stripped.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> + '_ {
        self.instructions
            .iter()
            .filter_map(LoweredInstruction::operation)
    }

    /// Number of quantum operations.
    pub fn num_operations(&self) -> usize {
        self.operations().count()
    }

    /// Label names in order.
    pub fn labels(&self) -> Vec<&str> {
        self.instructions
            .iter()
            .filter_map(|inst| match inst {
                LoweredInstruction::Label(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of entries, markers included.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Check if there are no entries at all.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// Lower a program to its linear instruction stream.
///
/// # Errors
///
/// Returns [`CompileError::EmptyProgram`] if the program has no control
/// nodes, and [`CompileError::UnresolvedCondition`] if a condition names a
/// register the program does not declare.
pub fn lower(program: &Program) -> CompileResult<LoweredProgram> {
    LoweringPass.run(program)
}

/// The lowering stage as a reusable value.
///
/// Lowering changes the program representation, so it runs ahead of the
/// [`PassManager`](crate::PassManager) rather than inside it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoweringPass;

impl LoweringPass {
    /// Name used in logs.
    pub fn name(&self) -> &'static str {
        "control_flow_lowering"
    }

    /// Lower `program`. Pure: equal inputs give equal outputs.
    pub fn run(&self, program: &Program) -> CompileResult<LoweredProgram> {
        if program.is_empty() {
            return Err(CompileError::EmptyProgram(program.name().to_string()));
        }

        let mut lowered = LoweredProgram::new(
            program.name(),
            program.num_qubits(),
            program.num_registers(),
        );

        for (idx, node) in program.nodes() {
            let before = lowered.instructions.len();
            self.lower_node(node, program.num_registers(), &mut lowered.instructions)?;
            debug!(
                "Lowered {} node {} into {} instructions",
                node.kind_name(),
                idx.index(),
                lowered.instructions.len() - before
            );
        }

        info!(
            "Lowered '{}': {} control nodes, {} instructions, {} operations",
            lowered.name,
            program.len(),
            lowered.len(),
            lowered.num_operations()
        );

        Ok(lowered)
    }

    #[allow(clippy::unused_self)]
    fn lower_node(
        &self,
        node: &ControlNode,
        num_registers: u32,
        out: &mut Vec<LoweredInstruction>,
    ) -> CompileResult<()> {
        match node {
            ControlNode::Block(block) => emit_block(block, out),
            ControlNode::IfElse {
                condition,
                then_block,
                else_block,
            } => {
                check_condition(condition, num_registers)?;
                out.push(LoweredInstruction::Label(then_block.name().to_string()));
                out.push(LoweredInstruction::Compare {
                    condition: *condition,
                    kind: BranchKind::IfElse,
                });
                out.extend(then_block.operations().iter().copied().map(LoweredInstruction::Op));
                out.push(LoweredInstruction::SkipElse);
                emit_block(else_block, out);
            }
            ControlNode::For { body, iterations } => {
                out.push(LoweredInstruction::Label(body.name().to_string()));
                for _ in 0..*iterations {
                    out.extend(body.operations().iter().copied().map(LoweredInstruction::Op));
                }
            }
            ControlNode::DoWhile { body, condition } => {
                check_condition(condition, num_registers)?;
                emit_block(body, out);
                out.push(LoweredInstruction::Compare {
                    condition: *condition,
                    kind: BranchKind::DoWhile,
                });
            }
        }
        Ok(())
    }
}

fn emit_block(block: &Block, out: &mut Vec<LoweredInstruction>) {
    out.push(LoweredInstruction::Label(block.name().to_string()));
    out.extend(block.operations().iter().copied().map(LoweredInstruction::Op));
}

fn check_condition(condition: &Condition, num_registers: u32) -> CompileResult<()> {
    if condition
        .registers()
        .iter()
        .any(|reg| reg.0 >= num_registers)
    {
        return Err(CompileError::UnresolvedCondition {
            condition: condition.to_string(),
            declared: num_registers,
        });
    }
    Ok(())
}
