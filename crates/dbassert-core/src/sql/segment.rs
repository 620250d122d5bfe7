//! Shared token grammar for SQL names.
//!
//! A name segment is either a double-quoted token, where an embedded `"` is
//! written as `""`, or an unquoted run of `[A-Za-z0-9_]`. The qualified and
//! simple checkers drive these scanners with different framing rules.

use std::borrow::Cow;
use std::fmt;

use crate::error::NameError;

pub(crate) const QUOTE: u8 = b'"';
pub(crate) const SEPARATOR: u8 = b'.';

/// Whitespace as classified by C `isspace` in the "C" locale.
///
/// Unlike [`u8::is_ascii_whitespace`] this includes vertical tab.
#[inline]
pub(crate) fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Bytes allowed in an unquoted token. National characters are rejected.
#[inline]
pub(crate) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// One decoded name segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Quoted token with the delimiters removed and `""` collapsed to `"`.
    /// Borrowed from the input when the token contains no escapes.
    Quoted(Cow<'a, [u8]>),
    /// Unquoted token, exactly as written.
    Unquoted(&'a [u8]),
}

impl Segment<'_> {
    /// Decoded value of the segment.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Segment::Quoted(value) => value.as_ref(),
            Segment::Unquoted(value) => *value,
        }
    }

    pub fn is_quoted(&self) -> bool {
        matches!(self, Segment::Quoted(_))
    }

    /// Write the segment back in SQL form, re-escaping embedded quotes.
    pub fn write_sql(&self, out: &mut Vec<u8>) {
        match self {
            Segment::Unquoted(value) => out.extend_from_slice(value),
            Segment::Quoted(value) => {
                out.reserve(value.len() + 2);
                out.push(QUOTE);
                for &b in value.iter() {
                    if b == QUOTE {
                        out.push(QUOTE);
                    }
                    out.push(b);
                }
                out.push(QUOTE);
            }
        }
    }

    pub fn to_sql(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_sql(&mut out);
        out
    }
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.to_sql()))
    }
}

/// Scan a quoted token whose opening quote sits at `start`.
///
/// Returns the decoded segment and the offset just past the closing quote.
pub(crate) fn scan_quoted(input: &[u8], start: usize) -> Result<(Segment<'_>, usize), NameError> {
    debug_assert_eq!(input.get(start), Some(&QUOTE));

    let body = start + 1;
    let mut decoded: Option<Vec<u8>> = None;
    let mut run_start = body;
    let mut pos = body;

    loop {
        let Some(offset) = input[pos..].iter().position(|&b| b == QUOTE) else {
            return Err(NameError::MismatchedQuotes { position: start });
        };
        let quote = pos + offset;

        if input.get(quote + 1) != Some(&QUOTE) {
            let value = match decoded {
                Some(mut buf) => {
                    buf.extend_from_slice(&input[run_start..quote]);
                    Cow::Owned(buf)
                }
                None => Cow::Borrowed(&input[body..quote]),
            };
            return Ok((Segment::Quoted(value), quote + 1));
        }

        // escaped pair: keep one quote, resume after the second
        let buf = decoded.get_or_insert_with(Vec::new);
        buf.extend_from_slice(&input[run_start..=quote]);
        pos = quote + 2;
        run_start = pos;
    }
}

/// Scan an unquoted token starting at `start`, stopping at `.`, whitespace or
/// end of input.
///
/// Returns the token and the offset of the first byte after it. An empty
/// token is reported as [`NameError::EmptySegment`].
pub(crate) fn scan_unquoted(input: &[u8], start: usize) -> Result<(Segment<'_>, usize), NameError> {
    let mut pos = start;
    while let Some(&b) = input.get(pos) {
        if b == SEPARATOR || is_space(b) {
            break;
        }
        if !is_ident_byte(b) {
            return Err(NameError::IllegalCharacter { position: pos, byte: b });
        }
        pos += 1;
    }

    if pos == start {
        return Err(NameError::EmptySegment { position: start });
    }
    Ok((Segment::Unquoted(&input[start..pos]), pos))
}
