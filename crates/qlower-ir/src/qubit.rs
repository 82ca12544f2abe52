//! Qubit and classical register identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a qubit within a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q[{}]", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// Index of a classical register within a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegisterId(pub u32);

impl fmt::Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r[{}]", self.0)
    }
}

impl From<u32> for RegisterId {
    fn from(id: u32) -> Self {
        RegisterId(id)
    }
}

/// Anything a program can index: a qubit or a classical register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reference {
    /// A qubit operand.
    Qubit(QubitId),
    /// A classical register operand.
    Register(RegisterId),
}

impl Reference {
    /// The raw index, regardless of kind.
    pub fn index(&self) -> u32 {
        match self {
            Reference::Qubit(q) => q.0,
            Reference::Register(r) => r.0,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Qubit(q) => write!(f, "qubit {q}"),
            Reference::Register(r) => write!(f, "register {r}"),
        }
    }
}

impl From<QubitId> for Reference {
    fn from(q: QubitId) -> Self {
        Reference::Qubit(q)
    }
}

impl From<RegisterId> for Reference {
    fn from(r: RegisterId) -> Self {
        Reference::Register(r)
    }
}
