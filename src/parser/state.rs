//! Parser State Machine
//!
//! Converts an RTF character stream to plain text in a single pass.
//! The parser handles arbitrary chunk boundaries: feeding a document in
//! pieces produces exactly the text of feeding it whole.
//!
//! # State Machine
//!
//! States:
//! - Header: Discarding header content until two consecutive newlines
//! - Body: Plain text, structural braces, and escape introducers
//! - Escape: After `\`, collecting a control word and its parameter
//! - Hex: After `\'`, collecting two hex digits of a literal byte
//! - Fallback: After `\uN\`, deciding what the fallback representation is
//! - FallbackHex: Skipping the two hex digits of a `\'xx` fallback
//!
//! Braces are counted in every state that is not mid-escape, including the
//! header, since the `{\rtf1` group opens there.

use tracing::trace;

use super::control::{ControlWord, NON_BREAKING_SPACE};
use crate::error::{ParseError, ParseErrorKind};

/// Parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Leading header, discarded
    Header,
    /// Normal text processing
    Body,
    /// After `\`
    Escape,
    /// After `\'`, collecting a literal byte
    Hex,
    /// After `\uN\`
    Fallback,
    /// After `\uN\'`, skipping the fallback byte
    FallbackHex,
}

/// The RTF parser
#[derive(Debug, Clone)]
pub struct Parser {
    /// Current state
    state: ParserState,
    /// Accumulated plain text
    output: String,
    /// Open, unmatched `{` groups
    brace_depth: usize,
    /// Previous header character was a newline
    last_char_was_newline: bool,
    /// Control word name being collected
    control: String,
    /// Control word parameter being collected (digits, optional leading `-`)
    param: String,
    /// Value of the hex digits seen so far
    hex_value: u8,
    /// Number of hex digits seen so far
    hex_digits: u8,
    /// Index of the next character
    offset: usize,
    /// First failure; the parser refuses further input once set
    error: Option<ParseError>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a new parser at the start of a document
    pub fn new() -> Self {
        Self {
            state: ParserState::Header,
            output: String::new(),
            brace_depth: 0,
            last_char_was_newline: false,
            control: String::with_capacity(16),
            param: String::with_capacity(8),
            hex_value: 0,
            hex_digits: 0,
            offset: 0,
            error: None,
        }
    }

    /// Get current parser state
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Number of currently open groups
    pub fn brace_depth(&self) -> usize {
        self.brace_depth
    }

    /// Whether the header is still being skipped
    pub fn in_header(&self) -> bool {
        self.state == ParserState::Header
    }

    /// Number of characters consumed so far
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Reset the parser to the start of a new document
    pub fn reset(&mut self) {
        self.state = ParserState::Header;
        self.output.clear();
        self.brace_depth = 0;
        self.last_char_was_newline = false;
        self.control.clear();
        self.param.clear();
        self.hex_value = 0;
        self.hex_digits = 0;
        self.offset = 0;
        self.error = None;
    }

    /// Process a chunk of input
    pub fn feed(&mut self, input: &str) -> Result<(), ParseError> {
        for c in input.chars() {
            self.advance(c)?;
        }
        Ok(())
    }

    /// Advance the parser by one character
    pub fn advance(&mut self, c: char) -> Result<(), ParseError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let result = match self.state {
            ParserState::Header => self.handle_header(c),
            ParserState::Body => self.handle_body(c),
            ParserState::Escape => self.handle_escape(c),
            ParserState::Hex | ParserState::FallbackHex => self.handle_hex(c),
            ParserState::Fallback => self.handle_fallback(c),
        };

        match result {
            Ok(()) => {
                self.offset += 1;
                Ok(())
            }
            Err(kind) => Err(self.fail(kind)),
        }
    }

    /// Finish the document and return its text
    pub fn finish(mut self) -> Result<String, ParseError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        match self.state {
            ParserState::Escape
            | ParserState::Hex
            | ParserState::Fallback
            | ParserState::FallbackHex => Err(self.fail(ParseErrorKind::IncompleteEscape)),
            ParserState::Header | ParserState::Body if self.brace_depth != 0 => {
                Err(self.fail(ParseErrorKind::UnmatchedBrace))
            }
            ParserState::Header | ParserState::Body => Ok(self.output),
        }
    }

    fn fail(&mut self, kind: ParseErrorKind) -> ParseError {
        let error = ParseError::new(kind, self.offset);
        self.error = Some(error);
        error
    }

    fn handle_header(&mut self, c: char) -> Result<(), ParseErrorKind> {
        match c {
            '{' | '}' => self.handle_brace(c)?,
            '\n' => {
                if self.last_char_was_newline {
                    trace!(offset = self.offset, "header ended");
                    self.state = ParserState::Body;
                }
                self.last_char_was_newline = true;
            }
            _ => self.last_char_was_newline = false,
        }
        Ok(())
    }

    fn handle_body(&mut self, c: char) -> Result<(), ParseErrorKind> {
        match c {
            '{' | '}' => self.handle_brace(c)?,
            '\\' => self.enter_escape(),
            _ => self.output.push(c),
        }
        Ok(())
    }

    fn handle_brace(&mut self, c: char) -> Result<(), ParseErrorKind> {
        if c == '{' {
            self.brace_depth += 1;
        } else {
            self.brace_depth = self
                .brace_depth
                .checked_sub(1)
                .ok_or(ParseErrorKind::UnmatchedBrace)?;
        }
        Ok(())
    }

    fn enter_escape(&mut self) {
        self.state = ParserState::Escape;
        self.control.clear();
        self.param.clear();
    }

    fn enter_hex(&mut self, state: ParserState) {
        self.state = state;
        self.hex_value = 0;
        self.hex_digits = 0;
    }

    fn handle_escape(&mut self, c: char) -> Result<(), ParseErrorKind> {
        match c {
            '\'' if self.control.is_empty() => self.enter_hex(ParserState::Hex),
            '~' if self.control.is_empty() => {
                self.output.push(NON_BREAKING_SPACE);
                self.state = ParserState::Body;
            }
            c if c.is_alphabetic() && self.param.is_empty() => self.control.push(c),
            c if c.is_ascii_digit() => self.param.push(c),
            '-' if self.param.is_empty() => self.param.push(c),
            _ => return self.resolve(c),
        }
        Ok(())
    }

    /// Resolve the collected control word, then deal with its delimiter
    fn resolve(&mut self, delimiter: char) -> Result<(), ParseErrorKind> {
        let word = ControlWord::from_name(&self.control);
        let text = word.text(&self.param);
        let symbol = self.control.is_empty();
        self.control.clear();
        self.param.clear();
        self.state = ParserState::Body;

        if let Some(c) = text {
            self.output.push(c);

            if word.has_fallback() {
                match delimiter {
                    '\\' => {
                        self.state = ParserState::Fallback;
                        return Ok(());
                    }
                    '\'' => {
                        self.enter_hex(ParserState::FallbackHex);
                        return Ok(());
                    }
                    '{' | '}' => {}
                    // Space, newline, or the fallback character itself
                    _ => return Ok(()),
                }
            }
        }

        match delimiter {
            ' ' => {}
            '\n' => self.output.push('\n'),
            '\\' => self.enter_escape(),
            // Control symbol such as `\{`, `\}` or `\*`: the character is literal
            _ if symbol => self.output.push(delimiter),
            _ => self.handle_body(delimiter)?,
        }
        Ok(())
    }

    fn handle_hex(&mut self, c: char) -> Result<(), ParseErrorKind> {
        let digit = c.to_digit(16).ok_or(ParseErrorKind::InvalidHexEscape)?;
        self.hex_value = (self.hex_value << 4) | digit as u8;
        self.hex_digits += 1;

        if self.hex_digits == 2 {
            if self.state == ParserState::Hex {
                self.output.push(char::from(self.hex_value));
            }
            self.state = ParserState::Body;
        }
        Ok(())
    }

    /// The escape following `\uN\` is its fallback unless a control word starts
    fn handle_fallback(&mut self, c: char) -> Result<(), ParseErrorKind> {
        match c {
            '\'' => self.enter_hex(ParserState::FallbackHex),
            c if c.is_alphabetic() => {
                self.enter_escape();
                self.control.push(c);
            }
            _ => self.state = ParserState::Body,
        }
        Ok(())
    }
}
