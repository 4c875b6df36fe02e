//! Main document store interface.
//!
//! [`DocumentStore`] owns the injected backend and hands out typed collections. It is
//! cheap to clone; every clone shares the same backend.
//!
//! # Example
//!
//! ```ignore
//! use roster_core::store::DocumentStore;
//!
//! let store = DocumentStore::new(backend);
//! let students = store.typed_collection::<Student>();
//! ```

use std::sync::Arc;

use crate::{
    backend::StoreBackend, collection::TypedCollection, document::Document,
    error::DocumentStoreResult,
};

#[derive(Debug, Clone)]
pub struct DocumentStore {
    backend: Arc<dyn StoreBackend>,
}

impl DocumentStore {
    /// Creates a new document store with the given backend.
    pub fn new<B: StoreBackend + 'static>(backend: B) -> Self {
        Self { backend: Arc::new(backend) }
    }

    /// Gets a typed collection for the specified document type.
    ///
    /// The collection name is determined by the document type's `collection_name()` method.
    pub fn typed_collection<D: Document>(&self) -> TypedCollection<D> {
        TypedCollection::new(Arc::clone(&self.backend))
    }

    /// Shuts down the backend and releases its resources.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to shut down cleanly.
    pub async fn shutdown(&self) -> DocumentStoreResult<()> {
        self.backend.shutdown().await
    }
}
