//! Error types for Wavefront file operations.

use thiserror::Error;

/// Errors that can occur while reading or writing Wavefront files.
#[derive(Error, Debug)]
pub enum WavefrontError {
    /// I/O error reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed statement: wrong token arity, a non-numeric token where a
    /// number was expected, or an unrecognized sub-keyword.
    #[error("Malformed statement at line {line}: {message}")]
    Statement {
        /// Physical line number where the statement starts (1-indexed).
        line: usize,
        /// Error message.
        message: String,
    },

    /// A resolved 1-based or negative index falls outside the referenced
    /// pool's current bounds.
    #[error("Index out of range at line {line}: {index} (pool holds {len} entries)")]
    Index {
        /// Physical line number where the statement starts (1-indexed).
        line: usize,
        /// The index as written in the file.
        index: i64,
        /// Current length of the referenced pool.
        len: usize,
    },

    /// A recognized but deliberately unsupported legacy statement
    /// (`bsp`, `bzp`, `cdc`, `cdp`, `res`).
    #[error("Unimplemented statement at line {line}: {keyword}")]
    Unimplemented {
        /// Physical line number where the statement starts (1-indexed).
        line: usize,
        /// The legacy keyword.
        keyword: String,
    },
}

impl WavefrontError {
    /// Create a malformed-statement error.
    pub fn statement(line: usize, message: impl Into<String>) -> Self {
        Self::Statement {
            line,
            message: message.into(),
        }
    }

    /// Create an index-out-of-range error.
    pub fn index(line: usize, index: i64, len: usize) -> Self {
        Self::Index { line, index, len }
    }

    /// Create an unimplemented-statement error.
    pub fn unimplemented(line: usize, keyword: impl Into<String>) -> Self {
        Self::Unimplemented {
            line,
            keyword: keyword.into(),
        }
    }
}
