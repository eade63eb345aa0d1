//! RTF lexical converter
//!
//! A stateful parser that turns an RTF character stream into the plain text
//! a reader would see. No document model is built: groups are only counted,
//! formatting directives are dropped, and the header is skipped.

mod control;
mod state;

pub use control::{unicode_char, ControlWord, NON_BREAKING_SPACE};
pub use state::{Parser, ParserState};

use tracing::debug;

use crate::error::ParseError;
use crate::source::decode_latin1;

/// Convert a complete RTF document to plain text
pub fn convert_to_plain_text(input: &str) -> Result<String, ParseError> {
    debug!(bytes = input.len(), "converting document");

    let mut parser = Parser::new();
    parser.feed(input)?;
    let text = parser.finish()?;

    debug!(bytes = text.len(), "document converted");
    Ok(text)
}

/// Convert a complete RTF document given as raw single-byte data
pub fn convert_bytes(input: &[u8]) -> Result<String, ParseError> {
    convert_to_plain_text(&decode_latin1(input))
}
