use async_trait::async_trait;
use futures::TryStreamExt;
use bson::{Document, Bson, doc};
use mongodb::{
    Client, Collection as MongoCollection,
    error::{Error as MongoError, ErrorKind},
    options::{ClientOptions, FindOptions},
};
use tracing::debug;
use roster_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{DocumentStoreError, DocumentStoreResult},
    id::RecordId,
    query::{Query, QueryVisitor},
};

use crate::query::{MongoQueryTranslator, exclusion_projection};


/// Sorts driver errors into the store error taxonomy.
pub(crate) fn classify(err: MongoError) -> DocumentStoreError {
    match err.kind.as_ref() {
        ErrorKind::Io(_)
        | ErrorKind::ServerSelection { .. }
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::DnsResolve { .. } => DocumentStoreError::Unavailable(err.to_string()),
        ErrorKind::Write(_) => DocumentStoreError::Write(err.to_string()),
        _ => DocumentStoreError::Backend(err.to_string()),
    }
}

fn into_document(bson: Bson) -> DocumentStoreResult<Document> {
    match bson {
        Bson::Document(document) => Ok(document),
        _ => Err(DocumentStoreError::InvalidDocument("Expected document".into())),
    }
}

fn restore_document(mut document: Document) -> Bson {
    document.remove("_id");
    Bson::Document(document)
}


#[derive(Debug, Clone)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_document(&self, document: Bson, collection: &str) -> DocumentStoreResult<RecordId> {
        let mut document = into_document(document)?;
        document.remove("_id");

        let result = self.get_collection(collection)
            .insert_one(document)
            .await
            .map_err(classify)?;

        match result.inserted_id {
            Bson::ObjectId(oid) => Ok(RecordId::from(oid)),
            other => Err(DocumentStoreError::Write(format!("store assigned no ObjectId (got {other})"))),
        }
    }

    async fn get_document(&self, id: &RecordId, collection: &str) -> DocumentStoreResult<Option<Bson>> {
        Ok(
            self.get_collection(collection)
                .find_one(doc! { "_id": id })
                .await
                .map_err(classify)?
                .map(restore_document)
        )
    }

    async fn update_document(&self, id: &RecordId, changes: Bson, collection: &str) -> DocumentStoreResult<bool> {
        let mut changes = into_document(changes)?;
        changes.remove("_id");

        if changes.is_empty() {
            // `$set` rejects an empty document; only report whether the record exists.
            return Ok(self.get_document(id, collection).await?.is_some());
        }

        let result = self.get_collection(collection)
            .update_one(doc! { "_id": id }, doc! { "$set": changes })
            .await
            .map_err(classify)?;

        debug!(%id, matched = result.matched_count, modified = result.modified_count, "update_one");
        Ok(result.matched_count > 0)
    }

    async fn delete_document(&self, id: &RecordId, collection: &str) -> DocumentStoreResult<bool> {
        let result = self.get_collection(collection)
            .delete_one(doc! { "_id": id })
            .await
            .map_err(classify)?;

        Ok(result.deleted_count > 0)
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let mut options = FindOptions::default();

        if let Some(limit) = query.limit {
            options.limit = Some(limit as i64);
        }
        options.projection = exclusion_projection(&query.exclude);

        let filter = match &query.filter {
            Some(expr) => MongoQueryTranslator.visit_expr(expr)?,
            None => doc! {},
        };
        debug!(%collection, ?filter, "find");

        Ok(
            self.get_collection(collection)
                .find(filter)
                .with_options(options)
                .await
                .map_err(classify)?
                .try_collect::<Vec<Document>>()
                .await
                .map_err(classify)?
                .into_iter()
                .map(restore_document)
                .collect()
        )
    }

    async fn shutdown(&self) -> DocumentStoreResult<()> {
        self.client.clone().shutdown().await;

        Ok(())
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(MongoDbStore::new(
            Client::with_options(
                ClientOptions::parse(&self.dsn)
                    .await
                    .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            )
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            self.database,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_drops_store_id() {
        let restored = restore_document(doc! { "_id": RecordId::new(), "name": "Ana" });
        assert_eq!(restored, Bson::Document(doc! { "name": "Ana" }));
    }

    #[test]
    fn rejects_non_documents() {
        assert!(matches!(
            into_document(Bson::String("nope".into())),
            Err(DocumentStoreError::InvalidDocument(_))
        ));
    }

    #[tokio::test]
    async fn malformed_dsn_fails_initialization() {
        let err = MongoDbStore::builder("not-a-uri", "roster").build().await.unwrap_err();
        assert!(matches!(err, DocumentStoreError::Initialization(_)));
    }
}
