//! `DBMS_ASSERT` style input checks for dynamic SQL.
//!
//! Arguments are `Option<&str>` because the SQL functions accept NULL, which
//! every check rejects. On success the input is handed back unchanged.

use tracing::{debug, instrument, warn};

use crate::catalog::{Catalog, RelationName};
use crate::error::{AssertError, Result};
use crate::sql::{parse_qualified_name, parse_simple_name, Fold, PgQuoter, Quoter};

/// The assertion package, wired to a catalog and a quoting service.
pub struct DbmsAssert<C, Q = PgQuoter> {
    catalog: C,
    quoter: Q,
    lowercase_enquoted: bool,
}

impl<C: Catalog> DbmsAssert<C> {
    pub fn new(catalog: C) -> Self {
        Self::with_quoter(catalog, PgQuoter)
    }
}

impl<C: Catalog, Q: Quoter> DbmsAssert<C, Q> {
    pub fn with_quoter(catalog: C, quoter: Q) -> Self {
        Self {
            catalog,
            quoter,
            lowercase_enquoted: true,
        }
    }

    /// Default for the `lowercase` argument of [`enquote_name`](Self::enquote_name)
    /// when the caller leaves it out.
    pub fn lowercase_enquoted(mut self, lowercase: bool) -> Self {
        self.lowercase_enquoted = lowercase;
        self
    }

    /// Return a copy of the input without any checking.
    pub fn noop(&self, value: &str) -> String {
        value.to_owned()
    }

    /// Enclose `value` in single quotes, doubling embedded quotes.
    pub fn enquote_literal(&self, value: &str) -> String {
        self.quoter.quote_literal(value)
    }

    /// Enclose `value` in double quotes when it is not a plain identifier.
    ///
    /// With `lowercase` (defaulting to the configured value) the result is
    /// folded to lower case afterwards. Oracle upper-cases here instead.
    pub fn enquote_name(&self, value: &str, lowercase: Option<bool>) -> String {
        let quoted = self.quoter.quote_ident(value);
        if lowercase.unwrap_or(self.lowercase_enquoted) {
            self.quoter.lower(&quoted)
        } else {
            quoted
        }
    }

    /// Verify that `value` is a qualified SQL name.
    pub fn qualified_sql_name<'a>(&self, value: Option<&'a str>) -> Result<&'a str> {
        let value = non_empty(value).ok_or(AssertError::NotQualifiedSqlName { reason: None })?;
        match parse_qualified_name(value) {
            Ok(_) => Ok(value),
            Err(reason) => {
                debug!(%reason, kind = ?reason.kind(), "rejected qualified SQL name");
                Err(AssertError::NotQualifiedSqlName { reason: Some(reason) })
            }
        }
    }

    /// Verify that `value` is a simple SQL name.
    pub fn simple_sql_name<'a>(&self, value: Option<&'a str>) -> Result<&'a str> {
        let value = non_empty(value).ok_or(AssertError::NotSimpleSqlName { reason: None })?;
        match parse_simple_name(value) {
            Ok(_) => Ok(value),
            Err(reason) => {
                debug!(%reason, kind = ?reason.kind(), "rejected simple SQL name");
                Err(AssertError::NotSimpleSqlName { reason: Some(reason) })
            }
        }
    }

    /// Verify that `value` names an existing schema the current user may use.
    #[instrument(skip(self))]
    pub async fn schema_name<'a>(&self, value: Option<&'a str>) -> Result<&'a str> {
        let value = non_empty(value).ok_or(AssertError::InvalidSchemaName)?;
        let name = parse_qualified_name(value).map_err(|reason| {
            debug!(%reason, "schema name does not parse");
            AssertError::InvalidSchemaName
        })?;

        let mut names = name.name_list(Fold::Lower);
        if names.len() != 1 {
            return Err(AssertError::InvalidSchemaName);
        }
        let schema = names.remove(0);

        let oid = self
            .catalog
            .schema_oid(&schema)
            .await
            .map_err(log_catalog_error)?
            .ok_or(AssertError::InvalidSchemaName)?;

        if !self
            .catalog
            .has_schema_usage(oid)
            .await
            .map_err(log_catalog_error)?
        {
            debug!(%schema, oid, "no usage privilege on schema");
            return Err(AssertError::InvalidSchemaName);
        }
        Ok(value)
    }

    /// Verify that `value` is a qualified name of an existing relation.
    #[instrument(skip(self))]
    pub async fn object_name<'a>(&self, value: Option<&'a str>) -> Result<&'a str> {
        let value = non_empty(value).ok_or(AssertError::InvalidObjectName)?;
        let name = parse_qualified_name(value).map_err(|reason| {
            debug!(%reason, "object name does not parse");
            AssertError::InvalidObjectName
        })?;

        let relation = RelationName::from_name_list(name.name_list(Fold::Lower))
            .ok_or(AssertError::InvalidObjectName)?;

        self.catalog
            .relation_oid(&relation)
            .await
            .map_err(log_catalog_error)?
            .ok_or(AssertError::InvalidObjectName)?;
        Ok(value)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn log_catalog_error(err: crate::error::CatalogError) -> AssertError {
    warn!(error = %err, "catalog lookup failed");
    AssertError::from(err)
}
