//! Error types for the IR crate.

use crate::qubit::{QubitId, Reference};
use thiserror::Error;

/// Errors raised while constructing blocks and programs.
///
/// Everything here is detected eagerly, before lowering starts. A program
/// that produced one of these errors never reaches the compiler.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A qubit or register index is not below the declared count.
    #[error("{reference} out of range (declared {declared}){}", format_block_context(.block))]
    OutOfRangeReference {
        /// The offending reference.
        reference: Reference,
        /// The declared number of qubits or registers.
        declared: u32,
        /// Block that contained the reference, if any.
        block: Option<String>,
    },

    /// Gate mnemonic is not part of the supported set.
    #[error("Unknown gate mnemonic '{0}'")]
    UnknownGate(String),

    /// Gate requires a different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: usize,
        /// Actual number of qubits provided.
        got: usize,
    },

    /// Same qubit used twice in one operation.
    #[error("Duplicate qubit {qubit} in '{gate_name}'{}", format_block_context(.block))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Gate that named it twice.
        gate_name: String,
        /// Block that contained the operation, if any.
        block: Option<String>,
    },

    /// A block or program name that a listing cannot carry.
    #[error("Invalid name '{0}': expected an identifier other than 'skip' or 'pragma'")]
    InvalidName(String),

    /// The control-flow graph lost its linear shape.
    #[error("Invalid control-flow graph: {0}")]
    InvalidGraph(String),
}

impl IrError {
    /// Whether this error belongs to the construction-time reference class:
    /// an index, arity or mnemonic that can never be valid for the program.
    pub fn is_reference_error(&self) -> bool {
        matches!(
            self,
            IrError::OutOfRangeReference { .. }
                | IrError::UnknownGate(_)
                | IrError::QubitCountMismatch { .. }
                | IrError::DuplicateQubit { .. }
        )
    }
}

#[allow(clippy::ref_option)]
fn format_block_context(block: &Option<String>) -> String {
    match block {
        Some(name) => format!(" (block: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qubit::RegisterId;

    #[test]
    fn test_out_of_range_message() {
        let err = IrError::OutOfRangeReference {
            reference: Reference::Qubit(QubitId(5)),
            declared: 3,
            block: Some("kernel".into()),
        };
        assert_eq!(
            err.to_string(),
            "qubit q[5] out of range (declared 3) (block: kernel)"
        );
        assert!(err.is_reference_error());
    }

    #[test]
    fn test_register_out_of_range_without_block() {
        let err = IrError::OutOfRangeReference {
            reference: Reference::Register(RegisterId(10)),
            declared: 10,
            block: None,
        };
        assert_eq!(err.to_string(), "register r[10] out of range (declared 10)");
    }

    #[test]
    fn test_graph_error_is_not_reference_class() {
        assert!(!IrError::InvalidGraph("cycle".into()).is_reference_error());
        assert!(!IrError::InvalidName("my kernel".into()).is_reference_error());
        assert!(IrError::UnknownGate("toffoli".into()).is_reference_error());
    }
}
