//! Basic blocks: named, straight-line lists of operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{IrError, IrResult};
use crate::gate::{GateKind, SingleQubitGate, TwoQubitGate};
use crate::operation::Operation;
use crate::qubit::QubitId;

/// Words the listing lexer reserves.
const RESERVED_NAMES: [&str; 2] = ["skip", "pragma"];

/// Check whether `name` can label a block or program.
///
/// Names start with an ASCII letter or `_` and continue with ASCII
/// alphanumerics, `_` or `-`. Listing keywords are rejected.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !RESERVED_NAMES.contains(&name)
}

pub(crate) fn check_name(name: &str) -> IrResult<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(IrError::InvalidName(name.to_string()))
    }
}

/// A basic block (kernel).
///
/// Blocks carry no branching of their own; control flow is attached by the
/// [`Program`](crate::Program) node that owns the block. Index validation
/// against the program's declared sizes happens when the block is added to a
/// program, so the builder methods here are infallible apart from
/// [`Block::gate`], which resolves a mnemonic string.
///
/// ```rust
/// use qlower_ir::{Block, QubitId};
///
/// let mut block = Block::new("bell");
/// block
///     .prepz(QubitId(0))
///     .prepz(QubitId(1))
///     .h(QubitId(0))
///     .cnot(QubitId(0), QubitId(1))
///     .measure(QubitId(0))
///     .measure(QubitId(1));
///
/// assert_eq!(block.len(), 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    name: String,
    operations: Vec<Operation>,
}

impl Block {
    /// Create a new empty block.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operations: vec![],
        }
    }

    /// Create a block from an existing operation list.
    pub fn with_operations(name: impl Into<String>, operations: Vec<Operation>) -> Self {
        Self {
            name: name.into(),
            operations,
        }
    }

    /// Append an already-built operation.
    pub fn push(&mut self, operation: Operation) -> &mut Self {
        self.operations.push(operation);
        self
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Prepare a qubit in |0⟩.
    pub fn prepz(&mut self, qubit: QubitId) -> &mut Self {
        self.push(Operation::single(SingleQubitGate::PrepZ, qubit))
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> &mut Self {
        self.push(Operation::single(SingleQubitGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> &mut Self {
        self.push(Operation::single(SingleQubitGate::X, qubit))
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> &mut Self {
        self.push(Operation::single(SingleQubitGate::Y, qubit))
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT gate.
    pub fn cnot(&mut self, control: QubitId, target: QubitId) -> &mut Self {
        self.push(Operation::two(TwoQubitGate::Cnot, control, target))
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> &mut Self {
        self.push(Operation::two(TwoQubitGate::Cz, control, target))
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Measure a qubit.
    pub fn measure(&mut self, qubit: QubitId) -> &mut Self {
        self.push(Operation::measure(qubit))
    }

    /// Apply a gate by mnemonic.
    ///
    /// Accepts the listing mnemonics plus the aliases `prepz`, `hadamard` and
    /// `cx`. Unknown names and wrong operand counts are rejected.
    pub fn gate(&mut self, mnemonic: &str, qubits: &[u32]) -> IrResult<&mut Self> {
        let kind: GateKind = mnemonic.parse()?;
        let qubits: Vec<QubitId> = qubits.iter().copied().map(QubitId).collect();
        let operation = Operation::from_kind(kind, &qubits)?;
        Ok(self.push(operation))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the block name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the operations in program order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if the block has no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Sorted set of qubits referenced by the block.
    pub fn qubits_used(&self) -> Vec<QubitId> {
        self.operations
            .iter()
            .flat_map(Operation::qubits)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Check the name, then every operand against a declared qubit count.
    pub(crate) fn validate(&self, num_qubits: u32) -> IrResult<()> {
        check_name(&self.name)?;
        for op in &self.operations {
            if let Operation::Two {
                control, target, ..
            } = op
            {
                if control == target {
                    return Err(IrError::DuplicateQubit {
                        qubit: *control,
                        gate_name: op.name().to_string(),
                        block: Some(self.name.clone()),
                    });
                }
            }
            for qubit in op.qubits() {
                if qubit.0 >= num_qubits {
                    return Err(IrError::OutOfRangeReference {
                        reference: qubit.into(),
                        declared: num_qubits,
                        block: Some(self.name.clone()),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qubit::Reference;

    #[test]
    fn test_new_block() {
        let block = Block::new("First");
        assert_eq!(block.name(), "First");
        assert!(block.is_empty());
    }

    #[test]
    fn test_fluent_api() {
        let mut block = Block::new("teleport");
        block
            .prepz(QubitId(0))
            .h(QubitId(1))
            .cz(QubitId(1), QubitId(2))
            .measure(QubitId(0));

        assert_eq!(block.len(), 4);
        assert_eq!(block.operations()[2].name(), "cz");
        assert_eq!(block.qubits_used(), vec![QubitId(0), QubitId(1), QubitId(2)]);
    }

    #[test]
    fn test_gate_by_mnemonic() {
        let mut block = Block::new("Thenpart");
        block.gate("x", &[0]).unwrap();
        block.gate("cnot", &[0, 1]).unwrap();
        assert_eq!(block.operations()[0].to_string(), "x q[0]");
        assert_eq!(block.operations()[1].to_string(), "cnot q[0], q[1]");
    }

    #[test]
    fn test_gate_unknown_mnemonic_leaves_block_untouched() {
        let mut block = Block::new("k");
        assert!(matches!(
            block.gate("ccx", &[0, 1, 2]),
            Err(IrError::UnknownGate(_))
        ));
        assert!(block.is_empty());
    }

    #[test]
    fn test_gate_wrong_arity() {
        let mut block = Block::new("k");
        assert!(matches!(
            block.gate("h", &[0, 1]),
            Err(IrError::QubitCountMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_out_of_range() {
        let mut block = Block::new("k");
        block.h(QubitId(0)).cnot(QubitId(0), QubitId(3));

        assert!(block.validate(4).is_ok());
        match block.validate(3) {
            Err(IrError::OutOfRangeReference {
                reference,
                declared,
                block,
            }) => {
                assert_eq!(reference, Reference::Qubit(QubitId(3)));
                assert_eq!(declared, 3);
                assert_eq!(block.as_deref(), Some("k"));
            }
            other => panic!("Expected OutOfRangeReference, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_duplicate_qubit() {
        let mut block = Block::new("k");
        block.cz(QubitId(1), QubitId(1));
        assert!(matches!(
            block.validate(2),
            Err(IrError::DuplicateQubit { .. })
        ));
    }

    #[test]
    fn test_valid_names() {
        for name in ["First", "teleportation_kernel", "_tmp", "loop-2", "skipped"] {
            assert!(is_valid_name(name), "{name}");
        }
        for name in ["", "my kernel", "2nd", "a\"b", "../out", "a.b", "skip", "pragma"] {
            assert!(!is_valid_name(name), "{name}");
        }
    }

    #[test]
    fn test_validate_rejects_name() {
        let mut block = Block::new("my kernel");
        block.h(QubitId(0));
        assert!(matches!(
            block.validate(1),
            Err(IrError::InvalidName(ref name)) if name == "my kernel"
        ));
    }
}
