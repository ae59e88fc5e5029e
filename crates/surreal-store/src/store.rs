use async_trait::async_trait;
use ingest_core::{Document, DocumentStore, StoreConnection, StoreError};
use serde_json::Value;
use std::collections::BTreeMap;
use surrealdb::engine::any::Any;
use surrealdb::Surreal;
use tracing::{debug, info, trace};

/// An open SurrealDB session with namespace and database selected.
///
/// Clones share the underlying session.
#[derive(Clone)]
pub struct SurrealConnection {
    db: Surreal<Any>,
}

impl SurrealConnection {
    pub(crate) fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }

    async fn table_names(&self) -> Result<BTreeMap<String, Value>, StoreError> {
        let mut response = self
            .db
            .query("INFO FOR DB")
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let tables: Option<BTreeMap<String, Value>> = response
            .take((0, "tables"))
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(tables.unwrap_or_default())
    }

    fn store(&self, name: &str) -> SurrealStore {
        SurrealStore {
            db: self.db.clone(),
            table: name.to_string(),
        }
    }
}

#[async_trait]
impl StoreConnection for SurrealConnection {
    type Store = SurrealStore;

    async fn store_exists(&self, name: &str) -> Result<bool, StoreError> {
        validate_store_name(name)?;
        Ok(self.table_names().await?.contains_key(name))
    }

    async fn create_store(&self, name: &str) -> Result<SurrealStore, StoreError> {
        validate_store_name(name)?;
        self.db
            .query(format!("DEFINE TABLE `{name}` SCHEMALESS"))
            .await
            .and_then(|response| response.check())
            .map_err(|e| StoreError::Query(e.to_string()))?;
        debug!("Defined table '{name}'");
        Ok(self.store(name))
    }

    async fn get_store(&self, name: &str) -> Result<SurrealStore, StoreError> {
        if !self.store_exists(name).await? {
            return Err(StoreError::NotFound(name.to_string()));
        }
        Ok(self.store(name))
    }

    async fn close(self) {
        drop(self.db);
        info!("Closed SurrealDB connection");
    }
}

/// A SurrealDB table holding ingested documents.
pub struct SurrealStore {
    db: Surreal<Any>,
    table: String,
}

#[async_trait]
impl DocumentStore for SurrealStore {
    fn name(&self) -> &str {
        &self.table
    }

    async fn insert(&self, document: &Document) -> Result<(), StoreError> {
        let id = document.require_id()?.to_string();
        let fields = Value::Object(document.fields().clone());

        trace!("Creating record {}:{id}", self.table);

        let result = self
            .db
            .query("CREATE type::thing($table, $id) SET fields = $fields")
            .bind(("table", self.table.clone()))
            .bind(("id", id.clone()))
            .bind(("fields", fields))
            .await
            .and_then(|response| response.check());

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let reason = e.to_string();
                if reason.contains("already exists") {
                    Err(StoreError::AlreadyExists(id))
                } else {
                    Err(StoreError::Rejected { id, reason })
                }
            }
        }
    }

    async fn exists(&self, id: &str) -> Result<bool, StoreError> {
        let mut response = self
            .db
            .query("SELECT VALUE meta::id(id) FROM type::thing($table, $id)")
            .bind(("table", self.table.clone()))
            .bind(("id", id.to_string()))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let found: Vec<Value> = response
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(!found.is_empty())
    }
}

/// Store names are interpolated into DDL, so only a conservative character set
/// is accepted.
fn validate_store_name(name: &str) -> Result<(), StoreError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '/'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}
