//! Golden tests for the RTF converter
//!
//! Each test wraps a body in the minimal `{\rtf1` header and checks the
//! plain text (or the failure kind) the converter produces for it.

use rtf_text::{convert_bytes, convert_to_plain_text, ParseErrorKind, Parser};

/// Wrap a body in a minimal RTF document
fn document(body: &str) -> String {
    format!("{{\\rtf1\n\n{}}}", body)
}

/// Helper to run a golden test
fn run_golden_test(body: &str) -> String {
    convert_to_plain_text(&document(body)).expect("conversion failed")
}

/// Helper to run a golden test that must fail
fn run_failing_test(input: &str) -> ParseErrorKind {
    match convert_to_plain_text(input) {
        Ok(text) => panic!("Expected failure, got {:?}", text),
        Err(e) => e.kind,
    }
}

/// Helper to run a golden test with chunked input (tests streaming)
fn run_golden_test_chunked(body: &str, chunk_size: usize) -> String {
    let input: Vec<char> = document(body).chars().collect();
    let mut parser = Parser::new();

    for chunk in input.chunks(chunk_size) {
        let chunk: String = chunk.iter().collect();
        parser.feed(&chunk).expect("conversion failed");
    }

    parser.finish().expect("conversion failed")
}

// ============================================================================
// Documented scenarios
// ============================================================================

#[test]
fn test_plain_body() {
    assert_eq!(run_golden_test("Hello!"), "Hello!");
}

#[test]
fn test_paragraph_tab_and_hex() {
    assert_eq!(
        run_golden_test("Hello\\par World\\tab\\'41!"),
        "Hello\nWorld\tA!"
    );
}

#[test]
fn test_special_characters() {
    assert_eq!(
        run_golden_test("A\\line B\\emdash C\\endash\\tab\\~\\u8217\\'3fD"),
        "A\nB\u{2014}C\u{2013}\t\u{00a0}\u{2019}D"
    );
}

#[test]
fn test_trailing_backslash() {
    assert_eq!(
        run_failing_test("{\\rtf1\n\nHello\\"),
        ParseErrorKind::IncompleteEscape
    );
}

#[test]
fn test_extra_closing_brace() {
    assert_eq!(
        run_failing_test(&document("Hello}")),
        ParseErrorKind::UnmatchedBrace
    );
}

#[test]
fn test_invalid_hex_digit() {
    assert_eq!(
        run_failing_test(&document("\\'4G")),
        ParseErrorKind::InvalidHexEscape
    );
}

#[test]
fn test_escaped_open_brace() {
    assert_eq!(run_golden_test("\\{"), "{");
}

// ============================================================================
// Header handling
// ============================================================================

#[test]
fn test_realistic_header() {
    let input = "{\\rtf1\\ansi\\ansicpg1252\\cocoartf2639\n\
                 {\\fonttbl\\f0\\fswiss\\fcharset0 Helvetica;}\n\
                 {\\colortbl;\\red255\\green255\\blue255;}\n\
                 \\margl1440\\margr1440\\f0\\fs24 \\cf0 \n\
                 \n\
                 Dear reader,\\\n\
                 Thanks.}";
    assert_eq!(convert_to_plain_text(input).unwrap(), "Dear reader,\nThanks.");
}

#[test]
fn test_header_text_never_leaks() {
    let input = "{\\rtf1 SECRET\n\nVisible}";
    let text = convert_to_plain_text(input).unwrap();
    assert!(!text.contains("SECRET"));
    assert_eq!(text, "Visible");
}

#[test]
fn test_document_without_body() {
    assert_eq!(convert_to_plain_text("{\\rtf1\\ansi Hello}").unwrap(), "");
}

// ============================================================================
// Groups and escapes
// ============================================================================

#[test]
fn test_nested_groups() {
    assert_eq!(
        run_golden_test("{\\b Bold {\\i both}} plain"),
        "Bold both plain"
    );
}

#[test]
fn test_escaped_braces_do_not_nest() {
    assert_eq!(run_golden_test("\\}\\}\\{"), "}}{");
}

#[test]
fn test_unclosed_group() {
    assert_eq!(
        run_failing_test(&document("{\\b open")),
        ParseErrorKind::UnmatchedBrace
    );
}

#[test]
fn test_incomplete_hex() {
    assert_eq!(
        run_failing_test("{\\rtf1\n\n\\'4"),
        ParseErrorKind::IncompleteEscape
    );
}

#[test]
fn test_incomplete_escape_wins_over_open_group() {
    assert_eq!(
        run_failing_test("{\\rtf1\n\n{\\b"),
        ParseErrorKind::IncompleteEscape
    );
}

#[test]
fn test_formatting_words_are_silent() {
    assert_eq!(
        run_golden_test("\\pard\\plain\\f0\\fs20\\cf1 Text\\b0\\i0 ."),
        "Text."
    );
}

#[test]
fn test_unicode_escapes() {
    assert_eq!(
        run_golden_test("\\u8220\\'93quoted\\u8221\\'94"),
        "\u{201c}quoted\u{201d}"
    );
    assert_eq!(run_golden_test("\\u-3913\\'3f"), "\u{f0b7}");
}

#[test]
fn test_unicode_fallback_character_is_skipped() {
    assert_eq!(run_golden_test("\\u8217?x"), "\u{2019}x");
    assert_eq!(run_golden_test("it\\u8217?s"), "it\u{2019}s");
    assert_eq!(run_golden_test("\\u8217\nx"), "\u{2019}x");
}

#[test]
fn test_line_breaks_after_words() {
    assert_eq!(run_golden_test("One\\par\nTwo"), "One\n\nTwo");
    assert_eq!(run_golden_test("One\\\nTwo"), "One\nTwo");
}

#[test]
fn test_raw_body_newlines_are_kept() {
    assert_eq!(run_golden_test("a\nb"), "a\nb");
}

// ============================================================================
// Streaming and bytes
// ============================================================================

#[test]
fn test_chunk_boundary_parsing() {
    let body = "A\\line B\\emdash C\\u8217\\'3fD {\\b x}\\{";
    let whole = run_golden_test(body);
    for size in [1, 2, 3, 7, 64] {
        assert_eq!(run_golden_test_chunked(body, size), whole);
    }
}

#[test]
fn test_latin1_bytes() {
    let input = b"{\\rtf1\n\nna\xefve \\'e9}";
    assert_eq!(convert_bytes(input).unwrap(), "na\u{ef}ve \u{e9}");
}
