//! Error types and result types for document store operations.
//!
//! Use [`DocumentStoreResult<T>`] as the return type for fallible store operations.
//! Lookups that find nothing are not errors: backends report them as `None` or `false`
//! so callers can tell "absent" apart from "the store could not answer".

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a document store.
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// Serialization/deserialization error when converting between document formats (BSON, JSON).
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Error during store initialization or connection setup.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// The document has an invalid structure (e.g. a non-document BSON value).
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// A string could not be parsed as a record identifier.
    #[error("Invalid record id: {0}")]
    InvalidId(String),
    /// The store rejected an insert or update.
    #[error("Write rejected: {0}")]
    Write(String),
    /// The store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    /// Any other error raised by the underlying storage backend.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// A specialized `Result` type for document store operations.
pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

impl From<BsonError> for DocumentStoreError {
    fn from(err: BsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for DocumentStoreError {
    fn from(err: SerdeJsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}
