//! Typed access to a single collection.
//!
//! A [`TypedCollection`] binds a [`Document`] type to its collection and converts between
//! the type and BSON on every call, so callers never handle raw documents.

use bson::Bson;
use std::{fmt, marker::PhantomData, sync::Arc};

use crate::{
    backend::StoreBackend,
    document::{Document, DocumentExt},
    error::DocumentStoreResult,
    id::RecordId,
    query::Query,
};

pub struct TypedCollection<D: Document> {
    name: &'static str,
    backend: Arc<dyn StoreBackend>,
    _marker: PhantomData<fn() -> D>,
}

impl<D: Document> TypedCollection<D> {
    /// Creates a collection handle (internal use; see [`DocumentStore::typed_collection`](crate::store::DocumentStore::typed_collection)).
    pub(crate) fn new(backend: Arc<dyn StoreBackend>) -> Self {
        Self {
            name: D::collection_name(),
            backend,
            _marker: PhantomData,
        }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Inserts a document and returns its store-assigned identifier.
    pub async fn insert(&self, document: &D) -> DocumentStoreResult<RecordId> {
        self.backend
            .insert_document(document.to_bson()?, self.name)
            .await
    }

    /// Retrieves a document by identifier.
    pub async fn get(&self, id: &RecordId) -> DocumentStoreResult<Option<D>> {
        self.backend
            .get_document(id, self.name)
            .await?
            .map(D::from_bson)
            .transpose()
    }

    /// Merges `changes` (a BSON document of top-level keys) into the stored document.
    ///
    /// Returns `true` if a document with `id` existed.
    pub async fn update(&self, id: &RecordId, changes: bson::Document) -> DocumentStoreResult<bool> {
        self.backend
            .update_document(id, Bson::Document(changes), self.name)
            .await
    }

    /// Deletes a document by identifier, returning `true` if it existed.
    pub async fn delete(&self, id: &RecordId) -> DocumentStoreResult<bool> {
        self.backend
            .delete_document(id, self.name)
            .await
    }

    /// Queries the collection, decoding every result.
    pub async fn query(&self, query: Query) -> DocumentStoreResult<Vec<D>> {
        self.backend
            .query_documents(query, self.name)
            .await?
            .into_iter()
            .map(D::from_bson)
            .collect()
    }
}

impl<D: Document> Clone for TypedCollection<D> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            backend: Arc::clone(&self.backend),
            _marker: PhantomData,
        }
    }
}

impl<D: Document> fmt::Debug for TypedCollection<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedCollection")
            .field("name", &self.name)
            .field("backend", &self.backend)
            .finish()
    }
}
