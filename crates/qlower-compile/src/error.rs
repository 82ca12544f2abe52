//! Error types for the compilation crate.

use qlower_ir::QubitId;
use thiserror::Error;

/// Errors that can occur during lowering and scheduling.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] qlower_ir::IrError),

    /// The program has no control nodes.
    #[error("Program '{0}' has no control nodes")]
    EmptyProgram(String),

    /// A branch or loop condition references an undeclared register.
    #[error("Condition '{condition}' cannot be resolved with {declared} registers")]
    UnresolvedCondition {
        /// Rendered condition.
        condition: String,
        /// Declared register count.
        declared: u32,
    },

    /// Two instructions were placed on the same qubit in overlapping cycles.
    #[error("Scheduling conflict: '{instruction}' needs {qubit} at cycle {cycle} but it is busy")]
    SchedulingConflict {
        /// The instruction that could not be placed.
        instruction: String,
        /// The contended qubit.
        qubit: QubitId,
        /// Cycle at which the conflict was detected.
        cycle: u64,
    },

    /// A pass expected a schedule that no earlier pass produced.
    #[error("No schedule available; run cycle scheduling first")]
    MissingSchedule,

    /// Pass execution failed.
    #[error("Pass '{name}' failed: {reason}")]
    PassFailed { name: String, reason: String },

    /// Invalid pass configuration.
    #[error("Invalid pass configuration: {0}")]
    InvalidConfiguration(String),
}

impl CompileError {
    /// Whether a caller may treat the error as an empty result instead of a failure.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CompileError::EmptyProgram(_))
    }
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
