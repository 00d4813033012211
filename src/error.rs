//! Error types for compilation and execution

use std::{fmt, io, ops::Range, str::Utf8Error};

/// Which bracket was left without a partner.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Bracket {
    /// A `[` that is never closed
    Open,
    /// A `]` with no `[` before it
    Close,
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bracket::Open => f.write_str("["),
            Bracket::Close => f.write_str("]"),
        }
    }
}

/// Brackets of the source text do not balance.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error("unmatched '{kind}' at offset {offset}")]
pub struct SyntaxError {
    pub kind: Bracket,
    /// Byte offset of the offending bracket in the source text
    pub offset: usize,
}

/// The cursor left the tape.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error("cursor moved to {cursor}, outside of the tape range 0..{tape_size}")]
pub struct MemoryError {
    /// The position the cursor would have landed on
    pub cursor: isize,
    pub tape_size: usize,
}

impl MemoryError {
    pub fn valid_range(&self) -> Range<usize> {
        0..self.tape_size
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("source is not valid text: {0}")]
    InvalidInput(#[from] Utf8Error),

    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),

    #[error("invalid options: {0}")]
    InvalidOptions(&'static str),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
