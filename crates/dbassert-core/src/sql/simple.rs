//! Simple (single, unqualified) SQL names.
//!
//! The token must occupy the whole input: no surrounding whitespace and no
//! `.` separators. Inside a quoted token those bytes are ordinary content.

use std::borrow::Cow;

use super::segment::{is_ident_byte, Segment, QUOTE};
use crate::error::NameError;

/// Parse `input` as exactly one identifier token.
///
/// A zero-length input is accepted as an empty unquoted name; callers that
/// must reject it check for emptiness first.
pub fn parse_simple_name<I>(input: &I) -> Result<Segment<'_>, NameError>
where
    I: AsRef<[u8]> + ?Sized,
{
    let input = input.as_ref();

    if input.first() != Some(&QUOTE) {
        if let Some(position) = input.iter().position(|&b| !is_ident_byte(b)) {
            return Err(NameError::IllegalCharacter { position, byte: input[position] });
        }
        return Ok(Segment::Unquoted(input));
    }

    let last = input.len() - 1;
    if last == 0 || input[last] != QUOTE {
        return Err(NameError::MismatchedQuotes { position: 0 });
    }

    let body = &input[1..last];
    let mut decoded: Option<Vec<u8>> = None;
    let mut i = 0;
    while i < body.len() {
        if body[i] != QUOTE {
            if let Some(buf) = decoded.as_mut() {
                buf.push(body[i]);
            }
            i += 1;
            continue;
        }
        if body.get(i + 1) != Some(&QUOTE) {
            return Err(NameError::InvalidQuotePairing { position: i + 1 });
        }
        decoded
            .get_or_insert_with(|| body[..i].to_vec())
            .push(QUOTE);
        i += 2;
    }

    let value = match decoded {
        Some(buf) => Cow::Owned(buf),
        None => Cow::Borrowed(body),
    };
    Ok(Segment::Quoted(value))
}

/// Whether `input` is exactly one valid SQL identifier token.
pub fn is_valid_simple_name<I>(input: &I) -> bool
where
    I: AsRef<[u8]> + ?Sized,
{
    parse_simple_name(input).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquoted_names() {
        assert!(is_valid_simple_name("abc"));
        assert!(is_valid_simple_name("Table_01"));
        assert!(is_valid_simple_name("1abc"));
        assert_eq!(
            parse_simple_name("a.b"),
            Err(NameError::IllegalCharacter { position: 1, byte: b'.' })
        );
        assert!(!is_valid_simple_name("a b"));
        assert!(!is_valid_simple_name(" abc"));
        assert!(!is_valid_simple_name("abc "));
        assert!(!is_valid_simple_name("čaj"));
    }

    #[test]
    fn quoted_names() {
        assert!(is_valid_simple_name("\"ab\"\"c\""));
        assert!(is_valid_simple_name("\"\""));
        assert!(is_valid_simple_name("\"\"\"\""));
        assert_eq!(parse_simple_name("\"ab\"\"c\"").unwrap().as_bytes(), b"ab\"c");
        assert_eq!(parse_simple_name("\"\"\"\"").unwrap().as_bytes(), b"\"");
    }

    #[test]
    fn separators_and_spaces_are_content_inside_quotes() {
        assert!(is_valid_simple_name("\"a.b\""));
        assert!(is_valid_simple_name("\" spaced out \""));
        assert!(is_valid_simple_name("\"čaj\""));
    }

    #[test]
    fn unterminated_quotes() {
        assert_eq!(parse_simple_name("\"abc"), Err(NameError::MismatchedQuotes { position: 0 }));
        assert_eq!(parse_simple_name("\""), Err(NameError::MismatchedQuotes { position: 0 }));
    }

    #[test]
    fn unpaired_interior_quotes() {
        assert_eq!(
            parse_simple_name("\"a\"b\""),
            Err(NameError::InvalidQuotePairing { position: 2 })
        );
        // odd number of interior quotes can never pair up
        assert_eq!(
            parse_simple_name("\"a\"\"\"\""),
            Err(NameError::InvalidQuotePairing { position: 4 })
        );
        assert_eq!(
            parse_simple_name("\"\"\""),
            Err(NameError::InvalidQuotePairing { position: 1 })
        );
    }

    #[test]
    fn empty_input_is_vacuously_valid() {
        assert_eq!(parse_simple_name(""), Ok(Segment::Unquoted(b"")));
    }

    #[test]
    fn quoting_round_trips() {
        for input in ["abc", "\"ab\"\"c\"", "\"\"", "\"\"\"\"", "\"x.y z\"", "\"\"\"a\"\"\"\"b\""] {
            let segment = parse_simple_name(input).unwrap();
            assert_eq!(segment.to_sql(), input.as_bytes(), "round trip of {input}");
        }
    }
}
