//! Gate mnemonics understood by the compiler.
//!
//! The set is closed: a mnemonic either resolves to one of these variants
//! or the block that asked for it is rejected with [`IrError::UnknownGate`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::IrError;

/// Single-qubit gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SingleQubitGate {
    /// Prepare the qubit in |0⟩.
    PrepZ,
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
}

impl SingleQubitGate {
    /// Listing mnemonic.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            SingleQubitGate::PrepZ => "prep_z",
            SingleQubitGate::H => "h",
            SingleQubitGate::X => "x",
            SingleQubitGate::Y => "y",
        }
    }
}

/// Two-qubit gates. The control qubit is always listed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TwoQubitGate {
    /// Controlled-NOT.
    Cnot,
    /// Controlled-Z.
    Cz,
}

impl TwoQubitGate {
    /// Listing mnemonic.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            TwoQubitGate::Cnot => "cnot",
            TwoQubitGate::Cz => "cz",
        }
    }
}

/// Any mnemonic an operation can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    /// One-qubit unitary or preparation.
    Single(SingleQubitGate),
    /// Two-qubit controlled gate.
    Two(TwoQubitGate),
    /// Computational-basis measurement.
    Measure,
}

impl GateKind {
    /// Listing mnemonic.
    pub fn name(&self) -> &'static str {
        match self {
            GateKind::Single(g) => g.name(),
            GateKind::Two(g) => g.name(),
            GateKind::Measure => "measure",
        }
    }

    /// Number of qubit operands.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        match self {
            GateKind::Single(_) | GateKind::Measure => 1,
            GateKind::Two(_) => 2,
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GateKind {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prep_z" | "prepz" => Ok(GateKind::Single(SingleQubitGate::PrepZ)),
            "h" | "hadamard" => Ok(GateKind::Single(SingleQubitGate::H)),
            "x" => Ok(GateKind::Single(SingleQubitGate::X)),
            "y" => Ok(GateKind::Single(SingleQubitGate::Y)),
            "cnot" | "cx" => Ok(GateKind::Two(TwoQubitGate::Cnot)),
            "cz" => Ok(GateKind::Two(TwoQubitGate::Cz)),
            "measure" => Ok(GateKind::Measure),
            _ => Err(IrError::UnknownGate(s.to_string())),
        }
    }
}
