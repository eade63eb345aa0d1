//! Error types for RTF conversion

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;

/// The structural malformations the converter can detect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParseErrorKind {
    /// A `}` with no open group, or a group still open at end of input
    UnmatchedBrace,
    /// A non-hex character where a `\'xx` digit was expected
    InvalidHexEscape,
    /// Input ended in the middle of an escape sequence
    IncompleteEscape,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ParseErrorKind::UnmatchedBrace => "unmatched brace",
            ParseErrorKind::InvalidHexEscape => "invalid hexadecimal escape sequence",
            ParseErrorKind::IncompleteEscape => "incomplete escape sequence",
        };
        f.write_str(text)
    }
}

/// A conversion failure
///
/// `offset` is the zero-based index of the character at which the failure
/// was detected. Failures found at end of input carry the input length.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind} at character {offset}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
}

impl ParseError {
    /// Create an error of `kind` detected at character `offset`
    pub fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    /// The kind of malformation
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }
}

/// Crate error type
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed RTF input
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Output text contains a character Latin-1 cannot represent
    #[error("Cannot encode {ch:?} at character {index} as Latin-1")]
    Unencodable { ch: char, index: usize },

    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, Error>;
