//! `dbassert` checks and quotes SQL names before they are spliced into
//! dynamic SQL.
//!
//! The grammar, quoting and catalog lookups live in `dbassert-core` and are
//! re-exported here; this crate adds the `dbassert` command line tool.
//!
//! ```
//! use dbassert::{DbmsAssert, MemoryCatalog};
//!
//! let package = DbmsAssert::new(MemoryCatalog::default());
//! assert!(package.qualified_sql_name(Some("public.\"Order Lines\"")).is_ok());
//! assert!(package.simple_sql_name(Some("users; drop table x")).is_err());
//! ```

#![deny(missing_docs)]

#[doc(inline)]
pub use dbassert_core::*;

/// `dbassert::core::...` paths for callers that prefer them.
pub use dbassert_core as core;

/// Command line interface of the `dbassert` binary.
pub mod cli;
