//! SQL name grammar and `DBMS_ASSERT` style checks for dbassert

pub mod assert;
pub mod catalog;
pub mod error;
pub mod sql;
pub mod sqlx_pg;

pub use assert::DbmsAssert;
pub use catalog::{Catalog, MemoryCatalog, Oid, RelationName};
pub use error::*;
pub use sql::*;
pub use sqlx_pg::PgCatalog;
