//! In-process document store.
//!
//! Used for dry runs and tests. Clones of a [`MemoryConnection`] share the same
//! stores, so a caller can keep a handle to inspect what a run inserted after
//! the run closed its connection.

use crate::document::Document;
use crate::error::StoreError;
use crate::store::{DocumentStore, StoreConnection};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

type Collections = HashMap<String, BTreeMap<String, Document>>;

#[derive(Clone, Default)]
pub struct MemoryConnection {
    collections: Arc<Mutex<Collections>>,
    closed: Arc<AtomicBool>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn store_names(&self) -> Vec<String> {
        let mut names: Vec<String> = lock(&self.collections).keys().cloned().collect();
        names.sort();
        names
    }

    /// Documents currently held by `store`, ordered by identifier.
    pub fn documents(&self, store: &str) -> Vec<Document> {
        lock(&self.collections)
            .get(store)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl StoreConnection for MemoryConnection {
    type Store = MemoryStore;

    async fn store_exists(&self, name: &str) -> Result<bool, StoreError> {
        Ok(lock(&self.collections).contains_key(name))
    }

    async fn create_store(&self, name: &str) -> Result<MemoryStore, StoreError> {
        if name.is_empty() {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        lock(&self.collections)
            .entry(name.to_string())
            .or_default();
        Ok(MemoryStore {
            name: name.to_string(),
            collections: Arc::clone(&self.collections),
        })
    }

    async fn get_store(&self, name: &str) -> Result<MemoryStore, StoreError> {
        if !lock(&self.collections).contains_key(name) {
            return Err(StoreError::NotFound(name.to_string()));
        }
        Ok(MemoryStore {
            name: name.to_string(),
            collections: Arc::clone(&self.collections),
        })
    }

    async fn close(self) {
        self.closed.store(true, Ordering::SeqCst);
        debug!("Closed in-memory store connection");
    }
}

pub struct MemoryStore {
    name: String,
    collections: Arc<Mutex<Collections>>,
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn insert(&self, document: &Document) -> Result<(), StoreError> {
        let id = document.require_id()?;
        let mut collections = lock(&self.collections);
        let docs = collections
            .get_mut(&self.name)
            .ok_or_else(|| StoreError::NotFound(self.name.clone()))?;
        if docs.contains_key(id) {
            return Err(StoreError::AlreadyExists(id.to_string()));
        }
        docs.insert(id.to_string(), document.clone());
        Ok(())
    }

    async fn exists(&self, id: &str) -> Result<bool, StoreError> {
        Ok(lock(&self.collections)
            .get(&self.name)
            .is_some_and(|docs| docs.contains_key(id)))
    }
}

// A poisoned lock only means another test thread panicked mid-insert; the map
// itself is still consistent.
fn lock(collections: &Mutex<Collections>) -> MutexGuard<'_, Collections> {
    collections
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
