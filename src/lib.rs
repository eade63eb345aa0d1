//! RTF to plain text
//!
//! Converts Rich Text Format documents to the text a reader would see,
//! parsing RTF's escape grammar directly without building a document model.
//!
//! - `parser`: single-pass RTF lexical converter
//! - `source`: Latin-1 reading and writing of documents
//! - `document`: documents cached until their file changes
//! - `config`: file, environment and default configuration

pub mod config;
pub mod document;
pub mod error;
pub mod parser;
pub mod source;

pub use config::{Config, ConfigError};
pub use document::{CachedDocument, DocumentOptions, FsClock, ModificationClock};
pub use error::{Error, ParseError, ParseErrorKind, Result};
pub use parser::{convert_bytes, convert_to_plain_text, Parser, ParserState};
