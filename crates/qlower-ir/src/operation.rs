//! Elementary operations combining a gate with its operands.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::gate::{GateKind, SingleQubitGate, TwoQubitGate};
use crate::qubit::QubitId;

/// A single quantum operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// A single-qubit gate.
    Single {
        /// The gate.
        gate: SingleQubitGate,
        /// Operand.
        qubit: QubitId,
    },
    /// A two-qubit gate.
    Two {
        /// The gate.
        gate: TwoQubitGate,
        /// Control operand.
        control: QubitId,
        /// Target operand.
        target: QubitId,
    },
    /// Measurement in the computational basis.
    Measure {
        /// Operand.
        qubit: QubitId,
    },
}

impl Operation {
    /// Create a single-qubit gate operation.
    pub fn single(gate: SingleQubitGate, qubit: QubitId) -> Self {
        Operation::Single { gate, qubit }
    }

    /// Create a two-qubit gate operation.
    pub fn two(gate: TwoQubitGate, control: QubitId, target: QubitId) -> Self {
        Operation::Two {
            gate,
            control,
            target,
        }
    }

    /// Create a measurement.
    pub fn measure(qubit: QubitId) -> Self {
        Operation::Measure { qubit }
    }

    /// Build an operation from a gate kind and an operand list.
    ///
    /// Returns an error if the operand count does not match the gate's arity.
    pub fn from_kind(kind: GateKind, qubits: &[QubitId]) -> IrResult<Self> {
        if qubits.len() != kind.num_qubits() {
            return Err(IrError::QubitCountMismatch {
                gate_name: kind.name().to_string(),
                expected: kind.num_qubits(),
                got: qubits.len(),
            });
        }
        Ok(match kind {
            GateKind::Single(gate) => Operation::single(gate, qubits[0]),
            GateKind::Two(gate) => Operation::two(gate, qubits[0], qubits[1]),
            GateKind::Measure => Operation::measure(qubits[0]),
        })
    }

    /// The gate kind of this operation.
    pub fn kind(&self) -> GateKind {
        match self {
            Operation::Single { gate, .. } => GateKind::Single(*gate),
            Operation::Two { gate, .. } => GateKind::Two(*gate),
            Operation::Measure { .. } => GateKind::Measure,
        }
    }

    /// Get the mnemonic of the operation.
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Qubit operands, control first for two-qubit gates.
    pub fn qubits(&self) -> Vec<QubitId> {
        match *self {
            Operation::Single { qubit, .. } | Operation::Measure { qubit } => vec![qubit],
            Operation::Two {
                control, target, ..
            } => vec![control, target],
        }
    }

    /// Check whether the operation touches `qubit`.
    pub fn acts_on(&self, qubit: QubitId) -> bool {
        match *self {
            Operation::Single { qubit: q, .. } | Operation::Measure { qubit: q } => q == qubit,
            Operation::Two {
                control, target, ..
            } => control == qubit || target == qubit,
        }
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self, Operation::Measure { .. })
    }

    /// Check if this is a state preparation.
    pub fn is_prep(&self) -> bool {
        matches!(
            self,
            Operation::Single {
                gate: SingleQubitGate::PrepZ,
                ..
            }
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Single { gate, qubit } => write!(f, "{} {qubit}", gate.name()),
            Operation::Two {
                gate,
                control,
                target,
            } => write!(f, "{} {control}, {target}", gate.name()),
            Operation::Measure { qubit } => write!(f, "measure {qubit}"),
        }
    }
}
