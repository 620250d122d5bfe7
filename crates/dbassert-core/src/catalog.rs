//! Catalog lookups used by the schema and object assertions.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CatalogError;
use crate::sql::Quoter;

/// Catalog object identifier.
pub type Oid = u32;

/// First identifier handed out to user objects.
const FIRST_NORMAL_OID: Oid = 16384;

/// A relation reference, optionally qualified by schema and database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationName {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub relation: String,
}

impl RelationName {
    pub fn new(relation: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: None,
            relation: relation.into(),
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// Build from a decoded name list of one to three parts
    /// (`relation`, `schema.relation`, `catalog.schema.relation`).
    pub fn from_name_list(mut names: Vec<String>) -> Option<Self> {
        let relation = names.pop()?;
        let schema = names.pop();
        let catalog = names.pop();
        if !names.is_empty() {
            return None;
        }
        Some(Self {
            catalog,
            schema,
            relation,
        })
    }

    /// Render as SQL text, quoting each part as needed.
    pub fn to_sql(&self, quoter: &dyn Quoter) -> String {
        [&self.catalog, &self.schema]
            .into_iter()
            .flatten()
            .chain(std::iter::once(&self.relation))
            .map(|part| quoter.quote_ident(part))
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Name resolution against the database catalog.
///
/// Names passed in are already decoded: no quotes, folded and truncated.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Look up a schema by exact name.
    async fn schema_oid(&self, name: &str) -> Result<Option<Oid>, CatalogError>;

    /// Whether the current user may use the schema.
    async fn has_schema_usage(&self, schema: Oid) -> Result<bool, CatalogError>;

    /// Resolve a relation, consulting the search path when it has no schema.
    async fn relation_oid(&self, name: &RelationName) -> Result<Option<Oid>, CatalogError>;
}

#[async_trait]
impl<C: Catalog + ?Sized> Catalog for Arc<C> {
    async fn schema_oid(&self, name: &str) -> Result<Option<Oid>, CatalogError> {
        (**self).schema_oid(name).await
    }

    async fn has_schema_usage(&self, schema: Oid) -> Result<bool, CatalogError> {
        (**self).has_schema_usage(schema).await
    }

    async fn relation_oid(&self, name: &RelationName) -> Result<Option<Oid>, CatalogError> {
        (**self).relation_oid(name).await
    }
}

#[async_trait]
impl<C: Catalog + ?Sized> Catalog for Box<C> {
    async fn schema_oid(&self, name: &str) -> Result<Option<Oid>, CatalogError> {
        (**self).schema_oid(name).await
    }

    async fn has_schema_usage(&self, schema: Oid) -> Result<bool, CatalogError> {
        (**self).has_schema_usage(schema).await
    }

    async fn relation_oid(&self, name: &RelationName) -> Result<Option<Oid>, CatalogError> {
        (**self).relation_oid(name).await
    }
}

#[derive(Debug, Clone)]
struct SchemaEntry {
    oid: Oid,
    usage: bool,
}

/// In-memory catalog, immutable once built.
#[derive(Debug, Clone)]
pub struct MemoryCatalog {
    database: String,
    schemas: HashMap<String, SchemaEntry>,
    relations: HashMap<(String, String), Oid>,
    search_path: Vec<String>,
    next_oid: Oid,
}

impl MemoryCatalog {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            schemas: HashMap::new(),
            relations: HashMap::new(),
            search_path: vec!["public".to_string()],
            next_oid: FIRST_NORMAL_OID,
        }
    }

    fn allocate_oid(&mut self) -> Oid {
        let oid = self.next_oid;
        self.next_oid += 1;
        oid
    }

    /// Add a schema; `usage` says whether the current user holds `USAGE` on it.
    pub fn with_schema(mut self, name: impl Into<String>, usage: bool) -> Self {
        let oid = self.allocate_oid();
        self.schemas.insert(name.into(), SchemaEntry { oid, usage });
        self
    }

    /// Add a relation, creating its schema (with usage) if it is unknown.
    pub fn with_relation(mut self, schema: impl Into<String>, relation: impl Into<String>) -> Self {
        let schema = schema.into();
        if !self.schemas.contains_key(&schema) {
            self = self.with_schema(schema.clone(), true);
        }
        let oid = self.allocate_oid();
        self.relations.insert((schema, relation.into()), oid);
        self
    }

    pub fn with_search_path<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_path = path.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new("postgres")
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn schema_oid(&self, name: &str) -> Result<Option<Oid>, CatalogError> {
        Ok(self.schemas.get(name).map(|entry| entry.oid))
    }

    async fn has_schema_usage(&self, schema: Oid) -> Result<bool, CatalogError> {
        Ok(self
            .schemas
            .values()
            .any(|entry| entry.oid == schema && entry.usage))
    }

    async fn relation_oid(&self, name: &RelationName) -> Result<Option<Oid>, CatalogError> {
        if let Some(catalog) = &name.catalog {
            if *catalog != self.database {
                return Err(CatalogError::CrossDatabaseReference(format!(
                    "{}.{}.{}",
                    catalog,
                    name.schema.as_deref().unwrap_or_default(),
                    name.relation
                )));
            }
        }

        let lookup = |schema: &str| {
            self.relations
                .get(&(schema.to_string(), name.relation.clone()))
                .copied()
        };

        Ok(match &name.schema {
            Some(schema) => lookup(schema),
            None => self.search_path.iter().find_map(|schema| lookup(schema)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::PgQuoter;

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::new("app")
            .with_schema("locked", false)
            .with_relation("public", "users")
            .with_relation("sales", "orders")
            .with_search_path(["sales", "public"])
    }

    #[test]
    fn relation_name_from_name_list() {
        let names = |parts: &[&str]| parts.iter().map(|p| p.to_string()).collect::<Vec<_>>();

        assert_eq!(RelationName::from_name_list(names(&["t"])), Some(RelationName::new("t")));
        assert_eq!(
            RelationName::from_name_list(names(&["db", "s", "t"])),
            Some(RelationName::new("t").with_schema("s").with_catalog("db"))
        );
        assert_eq!(RelationName::from_name_list(names(&[])), None);
        assert_eq!(RelationName::from_name_list(names(&["a", "b", "c", "d"])), None);
    }

    #[test]
    fn relation_name_renders_quoted_parts() {
        let name = RelationName::new("My Table").with_schema("public");
        assert_eq!(name.to_sql(&PgQuoter), "public.\"My Table\"");
    }

    #[tokio::test]
    async fn schema_lookup_and_usage() {
        let catalog = catalog();
        let public = catalog.schema_oid("public").await.unwrap().unwrap();
        let locked = catalog.schema_oid("locked").await.unwrap().unwrap();

        assert!(catalog.has_schema_usage(public).await.unwrap());
        assert!(!catalog.has_schema_usage(locked).await.unwrap());
        assert_eq!(catalog.schema_oid("missing").await.unwrap(), None);
        assert_eq!(catalog.schema_oid("PUBLIC").await.unwrap(), None);
    }

    #[tokio::test]
    async fn relations_resolve_through_search_path() {
        let catalog = catalog();
        let orders = catalog
            .relation_oid(&RelationName::new("orders").with_schema("sales"))
            .await
            .unwrap();
        assert!(orders.is_some());
        assert_eq!(catalog.relation_oid(&RelationName::new("orders")).await.unwrap(), orders);
        assert!(catalog.relation_oid(&RelationName::new("users")).await.unwrap().is_some());
        assert_eq!(
            catalog
                .relation_oid(&RelationName::new("users").with_schema("sales"))
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn cross_database_references_fail() {
        let catalog = catalog();
        let local = RelationName::new("users").with_schema("public").with_catalog("app");
        assert!(catalog.relation_oid(&local).await.unwrap().is_some());

        let remote = RelationName::new("users").with_schema("public").with_catalog("other");
        assert!(matches!(
            catalog.relation_oid(&remote).await,
            Err(CatalogError::CrossDatabaseReference(_))
        ));
    }

    #[tokio::test]
    async fn shared_catalogs_delegate() {
        let shared: Arc<dyn Catalog> = Arc::new(catalog());
        assert!(shared.schema_oid("sales").await.unwrap().is_some());
    }
}
