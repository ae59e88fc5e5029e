//! Document store traits.
//!
//! These traits are the boundary to the database. The pipeline is generic
//! over them, so the binary branches once on the concrete connection type and
//! everything after that is statically dispatched.

use crate::document::Document;
use crate::error::StoreError;
use tracing::info;

/// A named collection of documents addressable by identifier.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    fn name(&self) -> &str;

    /// Insert one document. The document's identifier must be set.
    async fn insert(&self, document: &Document) -> Result<(), StoreError>;

    /// Whether a document with `id` is present.
    async fn exists(&self, id: &str) -> Result<bool, StoreError>;
}

/// An open connection that can look up and create stores.
#[async_trait::async_trait]
pub trait StoreConnection: Send + Sync + Sized {
    type Store: DocumentStore;

    async fn store_exists(&self, name: &str) -> Result<bool, StoreError>;

    async fn create_store(&self, name: &str) -> Result<Self::Store, StoreError>;

    async fn get_store(&self, name: &str) -> Result<Self::Store, StoreError>;

    /// Release the connection. Called exactly once at the end of a run.
    async fn close(self);
}

/// Open the store called `name`, creating it first when it does not exist.
pub async fn open_or_create<C: StoreConnection>(
    connection: &C,
    name: &str,
) -> Result<C::Store, StoreError> {
    if connection.store_exists(name).await? {
        info!("Get store: {name}");
        connection.get_store(name).await
    } else {
        info!("Creating store: {name}");
        connection.create_store(name).await
    }
}
