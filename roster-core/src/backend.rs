//! Storage backend abstraction for the document store.
//!
//! The [`StoreBackend`] trait is the single seam between domain code and a concrete
//! document store. It mirrors the one-document-at-a-time operations of a typical
//! document database client (insert one, find one, update one, delete one, find),
//! addressed by collection name.
//!
//! The trait is object safe, so applications inject a backend as
//! `Arc<dyn StoreBackend>` and tests can substitute an in-memory implementation.
//!
//! # Examples
//!
//! ```ignore
//! use roster_core::backend::StoreBackend;
//! use bson::{Bson, doc};
//!
//! let backend = MyBackendImpl::new();
//! let id = backend
//!     .insert_document(Bson::Document(doc! { "name": "Alice", "age": 30 }), "students")
//!     .await?;
//! let found = backend.get_document(&id, "students").await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::Bson;
use std::fmt::Debug;

use crate::{error::DocumentStoreResult, id::RecordId, query::Query};

/// Abstract interface for document storage backends.
///
/// # Thread Safety
///
/// All implementations must be thread-safe and support concurrent access from multiple
/// async tasks. No operation spans more than one document, and no ordering is promised
/// between concurrent calls.
///
/// # Error Handling
///
/// Absence is never an error: lookups return `None` and mutations return `false` when
/// no document matched. Errors are reserved for rejected writes
/// ([`Write`](crate::error::DocumentStoreError::Write)), connectivity failures
/// ([`Unavailable`](crate::error::DocumentStoreError::Unavailable)) and malformed data.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts a new document and returns the identifier the store assigned to it.
    ///
    /// `document` must be a BSON document without an `_id` key. The collection is
    /// created on first use.
    async fn insert_document(&self, document: Bson, collection: &str) -> DocumentStoreResult<RecordId>;

    /// Fetches a single document by identifier.
    ///
    /// The returned document does not contain the store's `_id` key.
    async fn get_document(&self, id: &RecordId, collection: &str) -> DocumentStoreResult<Option<Bson>>;

    /// Merges the top-level keys of `changes` into an existing document.
    ///
    /// Keys not present in `changes` are left untouched. Returns `true` when a document
    /// with the given identifier existed.
    async fn update_document(
        &self,
        id: &RecordId,
        changes: Bson,
        collection: &str,
    ) -> DocumentStoreResult<bool>;

    /// Removes a document. Returns `true` when a document existed and was removed.
    async fn delete_document(&self, id: &RecordId, collection: &str) -> DocumentStoreResult<bool>;

    /// Queries documents in a collection.
    ///
    /// Applies the filter, then the exclusion projection, then the limit. Results come
    /// back in the store's natural iteration order and without `_id` keys.
    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Bson>>;

    /// Releases connections and other resources held by the backend.
    ///
    /// The default implementation is a no-op.
    async fn shutdown(&self) -> DocumentStoreResult<()> {
        Ok(())
    }
}

/// Factory for backends whose construction needs async setup (e.g. connecting).
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
