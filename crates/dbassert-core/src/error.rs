//! Error types for dbassert core

use serde::Serialize;
use thiserror::Error;

/// Why a candidate SQL name was rejected by the grammar.
///
/// Positions are byte offsets into the original input.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameError {
    #[error("mismatched quotes: quoted name opened at byte {position} is never closed")]
    MismatchedQuotes { position: usize },

    #[error("illegal character {} at byte {position}", show_byte(.byte))]
    IllegalCharacter { position: usize, byte: u8 },

    #[error("empty name segment at byte {position}")]
    EmptySegment { position: usize },

    #[error("expected `.` or end of name, found {} at byte {position}", show_byte(.byte))]
    MalformedSeparator { position: usize, byte: u8 },

    #[error("unpaired quote at byte {position}")]
    InvalidQuotePairing { position: usize },
}

/// Fieldless discriminant of [`NameError`], for mapping onto diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NameErrorKind {
    MismatchedQuotes,
    IllegalCharacter,
    EmptySegment,
    MalformedSeparator,
    InvalidQuotePairing,
}

impl NameError {
    pub fn kind(&self) -> NameErrorKind {
        match self {
            NameError::MismatchedQuotes { .. } => NameErrorKind::MismatchedQuotes,
            NameError::IllegalCharacter { .. } => NameErrorKind::IllegalCharacter,
            NameError::EmptySegment { .. } => NameErrorKind::EmptySegment,
            NameError::MalformedSeparator { .. } => NameErrorKind::MalformedSeparator,
            NameError::InvalidQuotePairing { .. } => NameErrorKind::InvalidQuotePairing,
        }
    }

    pub fn position(&self) -> usize {
        match *self {
            NameError::MismatchedQuotes { position }
            | NameError::IllegalCharacter { position, .. }
            | NameError::EmptySegment { position }
            | NameError::MalformedSeparator { position, .. }
            | NameError::InvalidQuotePairing { position } => position,
        }
    }
}

fn show_byte(byte: &u8) -> String {
    if byte.is_ascii_graphic() {
        format!("`{}`", *byte as char)
    } else {
        format!("0x{byte:02x}")
    }
}

/// Failures of a [`Catalog`](crate::catalog::Catalog) backend.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("cross-database references are not implemented: {0}")]
    CrossDatabaseReference(String),

    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by the `DBMS_ASSERT` style checks.
///
/// The display strings and SQLSTATE codes follow the Oracle package.
#[derive(Error, Debug)]
pub enum AssertError {
    #[error("invalid schema name")]
    InvalidSchemaName,

    #[error("invalid object name")]
    InvalidObjectName,

    #[error("string is not simple SQL name")]
    NotSimpleSqlName {
        #[source]
        reason: Option<NameError>,
    },

    #[error("string is not qualified SQL name")]
    NotQualifiedSqlName {
        #[source]
        reason: Option<NameError>,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl AssertError {
    /// SQLSTATE reported for this error.
    pub fn sqlstate(&self) -> &'static str {
        match self {
            AssertError::InvalidSchemaName => "44001",
            AssertError::InvalidObjectName => "44002",
            AssertError::NotSimpleSqlName { .. } => "44003",
            AssertError::NotQualifiedSqlName { .. } => "44004",
            // internal_error
            AssertError::Catalog(_) => "XX000",
        }
    }

    /// The grammar rule that failed, when the rejection came from the parser.
    pub fn reason(&self) -> Option<&NameError> {
        match self {
            AssertError::NotSimpleSqlName { reason }
            | AssertError::NotQualifiedSqlName { reason } => reason.as_ref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AssertError>;
