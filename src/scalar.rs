//! Scalar decoding for tape builders.
//!
//! The structural parser hands builders the first byte of each scalar and
//! nothing more; everything here runs inside the builder's callbacks. Numbers
//! are validated against the RFC 8259 grammar before conversion, literals
//! must be exact and delimited, and strings are decoded with full escape
//! handling including surrogate pairs.

use alloc::string::String;

use thiserror::Error;

use crate::{scan::structural_or_whitespace, value::Value};

/// Error from decoding a scalar token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScalarError {
    /// The token was empty; the document ended where a value was required.
    #[error("unexpected end of input where a value was expected")]
    UnexpectedEnd,

    /// The first byte cannot begin any JSON scalar.
    #[error("byte 0x{0:02x} cannot start a value")]
    InvalidScalar(u8),

    /// A `true`, `false` or `null` literal was misspelled or not delimited.
    #[error("invalid literal")]
    InvalidLiteral,

    /// A number token violated the JSON number grammar.
    #[error("invalid number")]
    InvalidNumber,

    /// A string token had no closing quote.
    #[error("unterminated string")]
    UnterminatedString,

    /// An unknown character followed a backslash.
    #[error("invalid escape character '{0}'")]
    InvalidEscape(char),

    /// A `\u` escape contained a non-hex digit.
    #[error("invalid character '{0}' in unicode escape")]
    InvalidUnicodeEscapeChar(char),

    /// A `\u` escape produced an unpaired surrogate or invalid code point.
    #[error("invalid unicode escape sequence \\u{0:04X}")]
    InvalidUnicodeEscape(u32),

    /// A control character appeared unescaped inside a string.
    #[error("unescaped control character 0x{0:02x} in string")]
    UnescapedControl(u8),

    /// String bytes were not valid UTF-8.
    #[error("string is not valid UTF-8")]
    InvalidUtf8,
}

/// Decodes the scalar token at the start of `token` into a [`Value`].
///
/// # Examples
///
/// ```
/// use jsontape::{parse_scalar, Value};
///
/// assert_eq!(parse_scalar(b"null,"), Ok(Value::Null));
/// assert_eq!(parse_scalar(b"-2.5e2]"), Ok(Value::Number(-250.0)));
/// assert_eq!(
///     parse_scalar(br#""a\nb""#),
///     Ok(Value::String("a\nb".into()))
/// );
/// ```
pub fn parse_scalar(token: &[u8]) -> Result<Value, ScalarError> {
    match token.first() {
        None => Err(ScalarError::UnexpectedEnd),
        Some(b'"') => decode_string(token).map(Value::String),
        Some(b't') => literal(token, b"true").map(|()| Value::Boolean(true)),
        Some(b'f') => literal(token, b"false").map(|()| Value::Boolean(false)),
        Some(b'n') => literal(token, b"null").map(|()| Value::Null),
        Some(b'-' | b'0'..=b'9') => parse_number(token).map(Value::Number),
        Some(&other) => Err(ScalarError::InvalidScalar(other)),
    }
}

fn literal(token: &[u8], expected: &[u8]) -> Result<(), ScalarError> {
    if !token.starts_with(expected) {
        return Err(ScalarError::InvalidLiteral);
    }
    match token.get(expected.len()) {
        None => Ok(()),
        Some(&b) if structural_or_whitespace(b) => Ok(()),
        Some(_) => Err(ScalarError::InvalidLiteral),
    }
}

/// Validates and converts the number token at the start of `token`.
///
/// The token must satisfy the JSON number grammar (no leading `+`, no bare
/// `.`, no leading zeros, mandatory digits after `.` and the exponent marker)
/// and must be followed by a delimiter or the end of input.
pub fn parse_number(token: &[u8]) -> Result<f64, ScalarError> {
    let mut i = 0;
    if token.get(i) == Some(&b'-') {
        i += 1;
    }
    match token.get(i) {
        Some(b'0') => {
            i += 1;
            if matches!(token.get(i), Some(b'0'..=b'9')) {
                return Err(ScalarError::InvalidNumber);
            }
        }
        Some(b'1'..=b'9') => {
            while matches!(token.get(i), Some(b'0'..=b'9')) {
                i += 1;
            }
        }
        _ => return Err(ScalarError::InvalidNumber),
    }
    if token.get(i) == Some(&b'.') {
        i += 1;
        if !matches!(token.get(i), Some(b'0'..=b'9')) {
            return Err(ScalarError::InvalidNumber);
        }
        while matches!(token.get(i), Some(b'0'..=b'9')) {
            i += 1;
        }
    }
    if matches!(token.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(token.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        if !matches!(token.get(i), Some(b'0'..=b'9')) {
            return Err(ScalarError::InvalidNumber);
        }
        while matches!(token.get(i), Some(b'0'..=b'9')) {
            i += 1;
        }
    }
    match token.get(i) {
        None => {}
        Some(&b) if structural_or_whitespace(b) => {}
        Some(_) => return Err(ScalarError::InvalidNumber),
    }

    // The validated prefix is ASCII, so the conversions cannot fail.
    core::str::from_utf8(&token[..i])
        .ok()
        .and_then(|text| text.parse::<f64>().ok())
        .ok_or(ScalarError::InvalidNumber)
}

/// Decodes the string token at the start of `token`, resolving all escapes.
///
/// `token` must begin with the opening quote; decoding stops at the matching
/// close quote, so trailing bytes after the string are ignored.
pub fn decode_string(token: &[u8]) -> Result<String, ScalarError> {
    match token.first() {
        None => return Err(ScalarError::UnexpectedEnd),
        Some(b'"') => {}
        Some(&other) => return Err(ScalarError::InvalidScalar(other)),
    }

    let mut out = String::new();
    let mut i = 1;
    // Start of the current run of bytes that need no rewriting.
    let mut run = 1;
    loop {
        match token.get(i) {
            None => return Err(ScalarError::UnterminatedString),
            Some(b'"') => {
                push_raw(&mut out, &token[run..i])?;
                return Ok(out);
            }
            Some(b'\\') => {
                push_raw(&mut out, &token[run..i])?;
                i += 1;
                match token.get(i) {
                    None => return Err(ScalarError::UnterminatedString),
                    Some(b'"') => out.push('"'),
                    Some(b'\\') => out.push('\\'),
                    Some(b'/') => out.push('/'),
                    Some(b'b') => out.push('\u{0008}'),
                    Some(b'f') => out.push('\u{000C}'),
                    Some(b'n') => out.push('\n'),
                    Some(b'r') => out.push('\r'),
                    Some(b't') => out.push('\t'),
                    Some(b'u') => {
                        let (ch, next) = unicode_escape(token, i)?;
                        out.push(ch);
                        i = next;
                        run = i;
                        continue;
                    }
                    Some(&other) => return Err(ScalarError::InvalidEscape(other as char)),
                }
                i += 1;
                run = i;
            }
            Some(&b) if b < 0x20 => return Err(ScalarError::UnescapedControl(b)),
            Some(_) => i += 1,
        }
    }
}

fn push_raw(out: &mut String, bytes: &[u8]) -> Result<(), ScalarError> {
    let text = core::str::from_utf8(bytes).map_err(|_| ScalarError::InvalidUtf8)?;
    out.push_str(text);
    Ok(())
}

/// Reads the `\uXXXX` escape whose `u` sits at `token[at]`, consuming a
/// trailing low surrogate when the first unit is a high surrogate. Returns
/// the decoded character and the index just past the escape.
fn unicode_escape(token: &[u8], at: usize) -> Result<(char, usize), ScalarError> {
    let first = hex4(token, at + 1)?;
    match first {
        0xD800..=0xDBFF => {
            if token.get(at + 5) != Some(&b'\\') || token.get(at + 6) != Some(&b'u') {
                return Err(ScalarError::InvalidUnicodeEscape(first));
            }
            let second = hex4(token, at + 7)?;
            if !(0xDC00..=0xDFFF).contains(&second) {
                return Err(ScalarError::InvalidUnicodeEscape(second));
            }
            let combined = 0x10000 + (((first - 0xD800) << 10) | (second - 0xDC00));
            let ch = char::from_u32(combined)
                .ok_or(ScalarError::InvalidUnicodeEscape(combined))?;
            Ok((ch, at + 11))
        }
        0xDC00..=0xDFFF => Err(ScalarError::InvalidUnicodeEscape(first)),
        _ => {
            let ch = char::from_u32(first).ok_or(ScalarError::InvalidUnicodeEscape(first))?;
            Ok((ch, at + 5))
        }
    }
}

fn hex4(token: &[u8], at: usize) -> Result<u32, ScalarError> {
    let mut unit = 0u32;
    for offset in 0..4 {
        let byte = token
            .get(at + offset)
            .copied()
            .ok_or(ScalarError::UnterminatedString)?;
        let digit = match byte {
            b'0'..=b'9' => u32::from(byte - b'0'),
            b'a'..=b'f' => u32::from(byte - b'a') + 10,
            b'A'..=b'F' => u32::from(byte - b'A') + 10,
            _ => return Err(ScalarError::InvalidUnicodeEscapeChar(byte as char)),
        };
        unit = unit << 4 | digit;
    }
    Ok(unit)
}

/// Returns the exact bytes of the scalar token at the start of `token`.
///
/// Strings extend through their closing quote (or to the end of input when
/// unterminated); every other scalar runs to the first delimiter. This is
/// the extent a builder copies when it wants the token verbatim.
#[must_use]
pub fn raw_scalar(token: &[u8]) -> &[u8] {
    if token.first() == Some(&b'"') {
        let mut i = 1;
        loop {
            match token.get(i) {
                None => return token,
                Some(b'\\') => i += 2,
                Some(b'"') => return &token[..=i],
                Some(_) => i += 1,
            }
        }
    } else {
        let end = token
            .iter()
            .position(|&b| structural_or_whitespace(b) || b == b'"')
            .unwrap_or(token.len());
        &token[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_must_be_exact_and_delimited() {
        assert_eq!(parse_scalar(b"true"), Ok(Value::Boolean(true)));
        assert_eq!(parse_scalar(b"false,"), Ok(Value::Boolean(false)));
        assert_eq!(parse_scalar(b"null]"), Ok(Value::Null));
        assert_eq!(parse_scalar(b"tru"), Err(ScalarError::InvalidLiteral));
        assert_eq!(parse_scalar(b"truex"), Err(ScalarError::InvalidLiteral));
        assert_eq!(parse_scalar(b"nullnull"), Err(ScalarError::InvalidLiteral));
    }

    #[test]
    fn numbers_follow_the_json_grammar() {
        assert_eq!(parse_number(b"0"), Ok(0.0));
        assert_eq!(parse_number(b"-0"), Ok(-0.0));
        assert_eq!(parse_number(b"12.25,"), Ok(12.25));
        assert_eq!(parse_number(b"-2.5e2]"), Ok(-250.0));
        assert_eq!(parse_number(b"1E+2"), Ok(100.0));
        assert_eq!(parse_number(b"5e-1"), Ok(0.5));

        for bad in [
            &b"01"[..],
            b"-",
            b"+1",
            b"1.",
            b".5",
            b"1e",
            b"1e+",
            b"1.e3",
            b"0x10",
        ] {
            assert!(parse_number(bad).is_err(), "accepted {bad:?}");
        }
        // `1,2` stops at the comma and is two tokens, not one bad number.
        assert_eq!(parse_number(b"1,"), Ok(1.0));
    }

    #[test]
    fn strings_decode_escapes() {
        assert_eq!(decode_string(br#""plain""#).unwrap(), "plain");
        assert_eq!(
            decode_string(br#""a\"b\\c\/d\n\t""#).unwrap(),
            "a\"b\\c/d\n\t"
        );
        assert_eq!(decode_string(br#""\u0041\u00e9""#).unwrap(), "A\u{e9}");
        assert_eq!(decode_string(r#""Aé""#.as_bytes()).unwrap(), "Aé");
        // Astral escapes arrive as surrogate pairs; raw UTF-8 passes through.
        assert_eq!(decode_string(br#""\ud83d\ude00""#).unwrap(), "\u{1f600}");
        assert_eq!(decode_string(r#""😀""#.as_bytes()).unwrap(), "😀");
        // Trailing bytes past the close quote are someone else's problem.
        assert_eq!(decode_string(br#""key": 1"#).unwrap(), "key");
    }

    #[test]
    fn string_errors() {
        assert_eq!(
            decode_string(br#""open"#),
            Err(ScalarError::UnterminatedString)
        );
        assert_eq!(
            decode_string(br#""\q""#),
            Err(ScalarError::InvalidEscape('q'))
        );
        assert_eq!(
            decode_string(br#""\u12G4""#),
            Err(ScalarError::InvalidUnicodeEscapeChar('G'))
        );
        assert_eq!(
            decode_string(br#""\ud800x""#),
            Err(ScalarError::InvalidUnicodeEscape(0xD800))
        );
        assert_eq!(
            decode_string(br#""\ude00""#),
            Err(ScalarError::InvalidUnicodeEscape(0xDE00))
        );
        assert_eq!(
            decode_string(b"\"a\x01b\""),
            Err(ScalarError::UnescapedControl(0x01))
        );
    }

    #[test]
    fn raw_scalar_extents() {
        assert_eq!(raw_scalar(b"123,456"), b"123");
        assert_eq!(raw_scalar(b"true}"), b"true");
        assert_eq!(raw_scalar(br#""a\"b",1"#), br#""a\"b""#);
        assert_eq!(raw_scalar(br#""open"#), br#""open"#);
        assert_eq!(raw_scalar(b""), b"");
    }
}
