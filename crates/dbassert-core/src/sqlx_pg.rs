//! [`Catalog`] backed by a live PostgreSQL connection pool.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{types::Oid as PgOid, PgPool, PgPoolOptions};
use tracing::{debug, instrument};

use crate::catalog::{Catalog, Oid, RelationName};
use crate::error::CatalogError;
use crate::sql::PgQuoter;

/// Resolves names through `pg_catalog` using the session's current user and
/// search path.
#[derive(Debug, Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `url`.
    pub async fn connect(
        url: &str,
        max_connections: u32,
        connect_timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(connect_timeout)
            .connect(url)
            .await?;
        debug!(max_connections, "connected catalog pool");
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl Catalog for PgCatalog {
    #[instrument(skip(self))]
    async fn schema_oid(&self, name: &str) -> Result<Option<Oid>, CatalogError> {
        let oid: Option<PgOid> =
            sqlx::query_scalar("SELECT oid FROM pg_catalog.pg_namespace WHERE nspname = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(oid.map(|oid| oid.0))
    }

    #[instrument(skip(self))]
    async fn has_schema_usage(&self, schema: Oid) -> Result<bool, CatalogError> {
        let allowed: bool =
            sqlx::query_scalar("SELECT pg_catalog.has_schema_privilege($1, 'USAGE')")
                .bind(PgOid(schema))
                .fetch_one(&self.pool)
                .await?;
        Ok(allowed)
    }

    #[instrument(skip(self))]
    async fn relation_oid(&self, name: &RelationName) -> Result<Option<Oid>, CatalogError> {
        // to_regclass re-parses its argument, so decoded parts are quoted again
        let text = name.to_sql(&PgQuoter);
        let oid: Option<PgOid> = sqlx::query_scalar("SELECT pg_catalog.to_regclass($1)::oid")
            .bind(text)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                let cross_database = err
                    .as_database_error()
                    .filter(|db| db.code().as_deref() == Some("0A000"))
                    .map(|db| db.message().to_string());
                match cross_database {
                    Some(message) => CatalogError::CrossDatabaseReference(message),
                    None => CatalogError::Database(err),
                }
            })?;
        Ok(oid.map(|oid| oid.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATABASE_URL_VAR: &str = "DBASSERT_TEST_DATABASE_URL";

    async fn connect() -> PgCatalog {
        let url = std::env::var(DATABASE_URL_VAR).expect("DBASSERT_TEST_DATABASE_URL not set");
        PgCatalog::connect(&url, 2, Duration::from_secs(5)).await.unwrap()
    }

    #[tokio::test]
    #[ignore = "requires DBASSERT_TEST_DATABASE_URL"]
    async fn resolves_builtin_schemas_and_relations() {
        let catalog = connect().await;

        let pg_catalog = catalog.schema_oid("pg_catalog").await.unwrap().unwrap();
        assert!(catalog.has_schema_usage(pg_catalog).await.unwrap());
        assert_eq!(catalog.schema_oid("no_such_schema_here").await.unwrap(), None);

        let pg_class = RelationName::new("pg_class").with_schema("pg_catalog");
        assert!(catalog.relation_oid(&pg_class).await.unwrap().is_some());
        assert_eq!(catalog.relation_oid(&RelationName::new("no_such_table")).await.unwrap(), None);
    }

    #[tokio::test]
    #[ignore = "requires DBASSERT_TEST_DATABASE_URL"]
    async fn rejects_cross_database_references() {
        let catalog = connect().await;
        let remote = RelationName::new("t").with_schema("s").with_catalog("surely_not_this_db");
        assert!(matches!(
            catalog.relation_oid(&remote).await,
            Err(CatalogError::CrossDatabaseReference(_))
        ));
    }
}
