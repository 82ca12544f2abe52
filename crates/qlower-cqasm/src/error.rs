//! Error types for listing emission and parsing.

use thiserror::Error;

/// Errors that can occur while writing or reading a listing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmitError {
    /// Lexer error (invalid token).
    #[error("Lexer error at line {line}, position {position}: {message}")]
    LexerError {
        line: usize,
        position: usize,
        message: String,
    },

    /// Unexpected token.
    #[error("Unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: {0}")]
    UnexpectedEof(String),

    /// Mnemonic is not part of the instruction set.
    #[error("Unknown gate at line {line}: {name}")]
    UnknownGate { line: usize, name: String },

    /// A bundle's cycle comment disagrees with the preceding bundles and skips.
    #[error("Bundle at line {line} claims cycle {found}, but preceding items account for {expected}")]
    CycleMismatch {
        line: usize,
        expected: u64,
        found: u64,
    },

    /// Bundles and skips add up to more cycles than a `u64` holds.
    #[error("Cycle count overflows at line {line}")]
    CycleOverflow { line: usize },

    /// Reading or writing a listing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// IR error while rebuilding an operation.
    #[error("IR error: {0}")]
    Ir(#[from] qlower_ir::IrError),
}

/// Result type for emitter and parser operations.
pub type EmitResult<T> = Result<T, EmitError>;
