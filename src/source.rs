//! Document source
//!
//! Reads and writes documents as single-byte (Latin-1) text. Every byte maps
//! to the code point of the same value, so decoding never fails; encoding
//! fails for characters above U+00FF unless a replacement is configured.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// Options for reading a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceOptions {
    /// Translate `\r\n` and lone `\r` to `\n` after decoding
    pub normalize_newlines: bool,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            normalize_newlines: true,
        }
    }
}

/// Decode Latin-1 bytes
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Encode text as Latin-1
///
/// Characters outside Latin-1 become `replacement` when one is given.
pub fn encode_latin1(text: &str, replacement: Option<char>) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(text.len());

    for (index, ch) in text.chars().enumerate() {
        let encoded = u8::try_from(u32::from(ch))
            .ok()
            .or_else(|| replacement.and_then(|r| u8::try_from(u32::from(r)).ok()));
        match encoded {
            Some(b) => bytes.push(b),
            None => return Err(Error::Unencodable { ch, index }),
        }
    }

    Ok(bytes)
}

/// Translate `\r\n` and lone `\r` line endings to `\n`
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// Read a document from disk as Latin-1 text
pub fn read_document(path: &Path, options: &SourceOptions) -> Result<String> {
    let bytes = fs::read(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "read document");

    let text = decode_latin1(&bytes);
    if options.normalize_newlines {
        Ok(normalize_newlines(&text).into_owned())
    } else {
        Ok(text)
    }
}

/// Write text to disk as Latin-1, creating or truncating the file
pub fn write_document(path: &Path, text: &str, replacement: Option<char>) -> Result<()> {
    let bytes = encode_latin1(text, replacement)?;
    fs::write(path, &bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_latin1_maps_bytes_directly() {
        let bytes: Vec<u8> = (0..=255).collect();
        let text = decode_latin1(&bytes);
        assert_eq!(text.chars().count(), 256);
        for (b, c) in bytes.iter().zip(text.chars()) {
            assert_eq!(u32::from(*b), u32::from(c));
        }
    }

    #[test]
    fn test_encode_latin1() {
        assert_eq!(encode_latin1("caf\u{e9}", None).unwrap(), b"caf\xe9");
    }

    #[test]
    fn test_encode_latin1_rejects_wide_chars() {
        match encode_latin1("a\u{2014}b", None) {
            Err(Error::Unencodable { ch, index }) => {
                assert_eq!(ch, '\u{2014}');
                assert_eq!(index, 1);
            }
            other => panic!("Expected Unencodable, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_latin1_with_replacement() {
        assert_eq!(
            encode_latin1("a\u{2014}b\u{2019}", Some('?')).unwrap(),
            b"a?b?"
        );
    }

    #[test]
    fn test_encode_latin1_replacement_must_fit() {
        assert!(encode_latin1("\u{2014}", Some('\u{2013}')).is_err());
    }

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("a\r\nb\rc\nd"), "a\nb\nc\nd");
        assert_eq!(normalize_newlines("\r\r\n"), "\n\n");
        assert!(matches!(normalize_newlines("plain\n"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_read_document_normalizes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.rtf");
        fs::write(&path, b"{\\rtf1\r\n\r\nHi\xe9}").unwrap();

        let text = read_document(&path, &SourceOptions::default()).unwrap();
        assert_eq!(text, "{\\rtf1\n\nHi\u{e9}}");

        let raw = read_document(
            &path,
            &SourceOptions {
                normalize_newlines: false,
            },
        )
        .unwrap();
        assert_eq!(raw, "{\\rtf1\r\n\r\nHi\u{e9}}");
    }

    #[test]
    fn test_read_document_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_document(&dir.path().join("nope.rtf"), &SourceOptions::default());
        assert!(matches!(err, Err(Error::Io(_))));
    }

    #[test]
    fn test_write_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_document(&path, "na\u{ef}ve", None).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"na\xefve");
    }
}
