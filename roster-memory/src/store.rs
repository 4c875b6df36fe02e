//! In-memory storage implementation for document stores.
//!
//! Documents live in per-collection ordered maps keyed by [`RecordId`], guarded by an
//! async-aware read-write lock. Identifiers grow monotonically within a process, so
//! iteration order is insertion order.

use std::{collections::{BTreeMap, HashMap}, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::{Bson, Document};

use roster_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{DocumentStoreError, DocumentStoreResult},
    id::RecordId,
    query::Query,
};

use crate::evaluator::DocumentEvaluator;

type CollectionMap = BTreeMap<RecordId, Bson>;
type StoreMap = HashMap<String, CollectionMap>;


/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, so clones
/// share the same data. Queries scan the whole collection; there is no indexing.
///
/// # Example
///
/// ```ignore
/// use roster_memory::InMemoryStore;
/// use roster_core::backend::StoreBackend;
/// use bson::{Bson, doc};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = InMemoryStore::new();
///
///     let id = store.insert_document(Bson::Document(doc! { "name": "Ana" }), "students").await?;
///     assert!(store.get_document(&id, "students").await?.is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> (document_id -> document)
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder
    }
}

fn into_document(bson: Bson) -> DocumentStoreResult<Document> {
    match bson {
        Bson::Document(document) => Ok(document),
        other => Err(DocumentStoreError::InvalidDocument(format!(
            "expected document, got {:?}",
            other.element_type()
        ))),
    }
}

fn project(bson: &Bson, exclude: &[String]) -> Bson {
    match bson {
        Bson::Document(document) if !exclude.is_empty() => Bson::Document(
            document
                .iter()
                .filter(|(key, _)| !exclude.contains(*key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_document(&self, document: Bson, collection: &str) -> DocumentStoreResult<RecordId> {
        let mut document = into_document(document)?;
        // Identity is always assigned here, never taken from the caller.
        document.remove("_id");

        let id = RecordId::new();
        self.store
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id, Bson::Document(document));

        Ok(id)
    }

    async fn get_document(&self, id: &RecordId, collection: &str) -> DocumentStoreResult<Option<Bson>> {
        Ok(
            self.store
                .read()
                .await
                .get(collection)
                .and_then(|collection_map| collection_map.get(id))
                .cloned()
        )
    }

    async fn update_document(&self, id: &RecordId, changes: Bson, collection: &str) -> DocumentStoreResult<bool> {
        let changes = into_document(changes)?;
        let mut store = self.store.write().await;

        let Some(existing) = store
            .get_mut(collection)
            .and_then(|collection_map| collection_map.get_mut(id))
            .and_then(Bson::as_document_mut)
        else {
            return Ok(false);
        };

        for (key, value) in changes {
            if key != "_id" {
                existing.insert(key, value);
            }
        }

        Ok(true)
    }

    async fn delete_document(&self, id: &RecordId, collection: &str) -> DocumentStoreResult<bool> {
        Ok(
            self.store
                .write()
                .await
                .get_mut(collection)
                .is_some_and(|collection_map| collection_map.remove(id).is_some())
        )
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        let matched = match &query.filter {
            Some(filter) => DocumentEvaluator::filter_documents(collection_map.values(), filter)?,
            None => collection_map.values().collect(),
        };

        Ok(
            matched
                .into_iter()
                .take(query.limit.unwrap_or(usize::MAX))
                .map(|doc| project(doc, &query.exclude))
                .collect()
        )
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Always succeeds and returns a freshly initialized store.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
