// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! This module contains HTTP syntax semantics, valid across all representations
//! of HTTP messages: header names, header values, methods and cookie names.
//!
//! # References
//! * [RFC 9110](https://www.rfc-editor.org/rfc/rfc9110.html)
//! * [RFC 6265](https://www.rfc-editor.org/rfc/rfc6265.html)

use crate::{
    abnf,
    HttpParseError,
};

/// Validate a field character. Note that in HTTP, UTF-8 is optional (US-ASCII),
/// and isn't used before validating the content.
///
/// ```text
/// field-vchar    = VCHAR / obs-text
/// ```
#[inline]
fn is_field_value_character(byte: u8) -> bool {
    abnf::is_visible_character(byte) || validate_obs_text(byte)
}

/// Returns whether or not the character is whitespace according to the HTTP
/// specification. This is in effect just `U+0020 SPACE` and `U+0009 CHARACTER
/// TABULATION`.
///
/// # Definition
/// ```text
/// OWS            = *( SP / HTAB )
///                ; optional whitespace
/// ```
///
/// # References
/// * [RFC 9110 Section 5.6.3](https://www.rfc-editor.org/rfc/rfc9110.html#name-whitespace)
#[inline]
pub fn is_whitespace_character(character: char) -> bool {
    character == ' ' || character == '\t'
}

/// Validate obs-text.
/// ```text
/// obs-text       = %x80-FF
/// ```
#[inline]
fn validate_obs_text(byte: u8) -> bool {
    matches!(byte, 0x80..=0xFF)
}

/// Validate a field character. Note that in HTTP, UTF-8 is optional (US-ASCII),
/// and isn't used before validating the content.
///
/// Line breaks are never allowed, which rules out header injection as well as
/// the deprecated `obs-fold` line folding.
pub fn validate_field_content(value: &[u8]) -> Result<(), HttpParseError> {
    if value.iter().all(|byte| is_field_value_character(*byte) || *byte == b' ' || *byte == b'\t') {
        Ok(())
    } else {
        Err(HttpParseError::FieldValueContainsInvalidCharacters)
    }
}

pub fn validate_token(value: &str) -> Result<(), HttpParseError> {
    if value.is_empty() {
        return Err(HttpParseError::TokenEmpty);
    }

    for character in value.bytes() {
        validate_token_character(character)?;
    }

    Ok(())
}

/// Validate a token character.
///
/// ```text
/// tchar          = "!" / "#" / "$" / "%" / "&" / "'" / "*"
///                / "+" / "-" / "." / "^" / "_" / "`" / "|" / "~"
///                / DIGIT / ALPHA
///                ; any VCHAR, except delimiters
/// ```
fn validate_token_character(character: u8) -> Result<(), HttpParseError> {
    match character {
        b' ' | b'\t' => Err(HttpParseError::TokenContainsWhitespace),

        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' |
        b'^' | b'_' | b'`' | b'|' | b'~' => Ok(()),

        b'0'..=b'9' => Ok(()),
        b'A'..=b'Z' => Ok(()),
        b'a'..=b'z' => Ok(()),

        b'"' | b'(' | b')' | b',' | b'/' | b':' | b';' | b'<' | b'=' | b'>' |
        b'?' | b'@' | b'[' | b'\\' | b']' | b'{' | b'}' => Err(HttpParseError::TokenContainsDelimiter),

        _ => Err(HttpParseError::TokenContainsNonVisibleAscii),
    }
}

/// Is the name usable as a cookie name? Cookie names are rendered
/// URL-encoded, but the separators of the `Set-Cookie` grammar are refused up
/// front, as are control characters.
pub fn is_valid_cookie_name(name: &str) -> bool {
    !name.is_empty() && !name.bytes().any(|byte| {
        matches!(byte, b'=' | b',' | b';' | b' ') || abnf::is_control_character(byte)
    })
}

/// ```text
/// scheme         = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
/// ```
///
/// # References
/// * [RFC 3986 Section 3.1](https://www.rfc-editor.org/rfc/rfc3986.html#section-3.1)
pub fn is_valid_scheme(scheme: &str) -> bool {
    let mut bytes = scheme.bytes();
    match bytes.next() {
        Some(first) if first.is_ascii_alphabetic() => (),
        _ => return false,
    }

    bytes.all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'+' | b'-' | b'.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0x00, false)]
    #[case(0x10, false)]
    #[case(0x1F, false)]
    #[case(b'A', true)]
    #[case(b'z', true)]
    #[case(b'0', true)]
    #[case(b'9', true)]
    #[case(0xFF, true)]
    fn test_is_field_value_character(#[case] input: u8, #[case] expected: bool) {
        assert_eq!(is_field_value_character(input), expected, "character isn't matching: {}", input);
    }

    #[rstest]
    #[case("text/html; charset=utf-8", Ok(()))]
    #[case("a\tb", Ok(()))]
    #[case("", Ok(()))]
    #[case("value\r\nSet-Cookie: x=y", Err(HttpParseError::FieldValueContainsInvalidCharacters))]
    #[case("value\n folded", Err(HttpParseError::FieldValueContainsInvalidCharacters))]
    #[case("bell\x07", Err(HttpParseError::FieldValueContainsInvalidCharacters))]
    fn test_validate_field_content(#[case] input: &str, #[case] expected: Result<(), HttpParseError>) {
        assert_eq!(validate_field_content(input.as_bytes()), expected);
    }

    #[test]
    fn test_validate_token() {
        assert_eq!(validate_token(""), Err(HttpParseError::TokenEmpty));
        assert_eq!(validate_token("hello"), Ok(()));
        assert_eq!(validate_token(" hello"), Err(HttpParseError::TokenContainsWhitespace));
        assert_eq!(validate_token("hello "), Err(HttpParseError::TokenContainsWhitespace));
        assert_eq!(validate_token("hel lo"), Err(HttpParseError::TokenContainsWhitespace));
        assert_eq!(validate_token("Content:Type"), Err(HttpParseError::TokenContainsDelimiter));
    }

    #[rstest]
    #[case(b' ', Err(HttpParseError::TokenContainsWhitespace))]
    #[case(b'\t', Err(HttpParseError::TokenContainsWhitespace))]
    #[case(b'!', Ok(()))]
    #[case(b'"', Err(HttpParseError::TokenContainsDelimiter))]
    #[case(0x00, Err(HttpParseError::TokenContainsNonVisibleAscii))]
    #[case(b'~', Ok(()))]
    #[case(0x7F, Err(HttpParseError::TokenContainsNonVisibleAscii))]
    fn test_validate_token_character(#[case] input: u8, #[case] expected: Result<(), HttpParseError>) {
        assert_eq!(validate_token_character(input), expected);
    }

    #[rstest]
    #[case("session", true)]
    #[case("__Host-id", true)]
    #[case("", false)]
    #[case("a=b", false)]
    #[case("a,b", false)]
    #[case("a;b", false)]
    #[case("a b", false)]
    #[case("a\tb", false)]
    #[case("a\rb", false)]
    #[case("a\nb", false)]
    #[case("a\x0Bb", false)]
    #[case("a\x0Cb", false)]
    fn test_is_valid_cookie_name(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_valid_cookie_name(input), expected);
    }

    #[rstest]
    #[case("http", true)]
    #[case("svn+ssh", true)]
    #[case("h2c", true)]
    #[case("", false)]
    #[case("1http", false)]
    #[case("ht tp", false)]
    fn test_is_valid_scheme(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_valid_scheme(input), expected);
    }
}
