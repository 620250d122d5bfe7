//! Dot-qualified SQL names such as `public."My Table"`.

use std::fmt;

use super::segment::{is_space, scan_quoted, scan_unquoted, Segment, QUOTE, SEPARATOR};
use crate::error::NameError;

/// Longest identifier the catalog keeps, in bytes (`NAMEDATALEN - 1`).
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Case folding applied to unquoted segments when building a name list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fold {
    /// Keep segments as written.
    #[default]
    None,
    /// Lower-case unquoted segments, as the SQL parser does.
    Lower,
}

/// A parsed qualified name. Empty when the input was empty or blank.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QualifiedName<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> QualifiedName<'a> {
    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Render the name back to SQL with canonical spacing.
    pub fn to_sql(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push(SEPARATOR);
            }
            segment.write_sql(&mut out);
        }
        out
    }

    /// Catalog-facing form: one string per segment, unquoted segments folded
    /// per `fold`, each truncated to [`MAX_IDENTIFIER_LEN`] bytes.
    pub fn name_list(&self, fold: Fold) -> Vec<String> {
        self.segments
            .iter()
            .map(|segment| {
                let mut name = String::from_utf8_lossy(segment.as_bytes()).into_owned();
                if fold == Fold::Lower && !segment.is_quoted() {
                    name.make_ascii_lowercase();
                }
                truncate_identifier(&mut name);
                name
            })
            .collect()
    }
}

impl fmt::Display for QualifiedName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.to_sql()))
    }
}

fn truncate_identifier(name: &mut String) {
    if name.len() <= MAX_IDENTIFIER_LEN {
        return;
    }
    let mut cut = MAX_IDENTIFIER_LEN;
    while !name.is_char_boundary(cut) {
        cut -= 1;
    }
    name.truncate(cut);
}

fn skip_space(input: &[u8], mut pos: usize) -> usize {
    while input.get(pos).copied().is_some_and(is_space) {
        pos += 1;
    }
    pos
}

/// Parse a possibly dot-qualified, possibly quoted SQL name.
///
/// Whitespace is tolerated around the name and around each `.`. An empty or
/// all-whitespace input yields an empty [`QualifiedName`]; callers that need
/// a non-empty name must check for that themselves.
pub fn parse_qualified_name<I>(input: &I) -> Result<QualifiedName<'_>, NameError>
where
    I: AsRef<[u8]> + ?Sized,
{
    let input = input.as_ref();
    let mut segments = Vec::new();

    let mut pos = skip_space(input, 0);
    if pos == input.len() {
        return Ok(QualifiedName { segments });
    }

    loop {
        let (segment, end) = if input.get(pos) == Some(&QUOTE) {
            scan_quoted(input, pos)?
        } else {
            scan_unquoted(input, pos)?
        };
        segments.push(segment);

        pos = skip_space(input, end);
        match input.get(pos) {
            Some(&SEPARATOR) => {
                pos = skip_space(input, pos + 1);
            }
            None => break,
            Some(&byte) => return Err(NameError::MalformedSeparator { position: pos, byte }),
        }
    }

    Ok(QualifiedName { segments })
}

/// Whether `input` is a syntactically valid qualified SQL name.
pub fn is_valid_qualified_name<I>(input: &I) -> bool
where
    I: AsRef<[u8]> + ?Sized,
{
    parse_qualified_name(input).is_ok()
}
