//! Control word table
//!
//! Maps a resolved control word and its numeric parameter to the text it
//! contributes. Everything outside the table is a formatting directive and
//! produces nothing.

/// Non-breaking space emitted for `\~`
pub const NON_BREAKING_SPACE: char = '\u{00A0}';

/// Control words with a text effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlWord {
    /// `\par` - paragraph break
    Par,
    /// `\line` - line break
    Line,
    /// `\tab`
    Tab,
    /// `\emdash`
    EmDash,
    /// `\endash`
    EnDash,
    /// `\uN` - Unicode character, followed by a fallback to skip
    Unicode,
    /// Formatting directive or anything unrecognized
    Other,
}

impl ControlWord {
    /// Look up a control word by name
    pub fn from_name(name: &str) -> Self {
        match name {
            "par" => ControlWord::Par,
            "line" => ControlWord::Line,
            "tab" => ControlWord::Tab,
            "emdash" => ControlWord::EmDash,
            "endash" => ControlWord::EnDash,
            "u" => ControlWord::Unicode,
            _ => ControlWord::Other,
        }
    }

    /// The character this word contributes, given its raw parameter text
    pub fn text(self, param: &str) -> Option<char> {
        match self {
            ControlWord::Par | ControlWord::Line => Some('\n'),
            ControlWord::Tab => Some('\t'),
            ControlWord::EmDash => Some('\u{2014}'),
            ControlWord::EnDash => Some('\u{2013}'),
            ControlWord::Unicode => unicode_char(param),
            ControlWord::Other => None,
        }
    }

    /// Whether a fallback representation follows this word once it produced text
    pub fn has_fallback(self) -> bool {
        self == ControlWord::Unicode
    }
}

/// Decode the parameter of `\uN`
///
/// Negative values use RTF's signed 16-bit convention and get 65536 added.
/// Values that still are not a Unicode scalar value decode to U+FFFD.
/// Returns `None` when there are no parameter digits at all.
pub fn unicode_char(param: &str) -> Option<char> {
    if !param.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    let code_point = match param.parse::<i64>() {
        Ok(n) if n < 0 => n + 65536,
        Ok(n) => n,
        Err(_) => return Some(char::REPLACEMENT_CHARACTER),
    };

    let c = u32::try_from(code_point)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER);
    Some(c)
}
