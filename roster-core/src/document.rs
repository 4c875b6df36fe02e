//! Core traits for document representation and serialization.
//!
//! Documents carry only domain fields. Their identity is assigned by the store on insert
//! and travels alongside the document as a [`RecordId`](crate::id::RecordId), never inside it.

use bson::{Bson, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Deserialize, Serialize};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// Core trait that all documents stored in a document store must implement.
///
/// # Example
///
/// ```ignore
/// use roster_core::document::Document;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Course {
///     pub title: Option<String>,
/// }
///
/// impl Document for Course {
///     fn collection_name() -> &'static str {
///         "courses"
///     }
/// }
/// ```
pub trait Document: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns the name of the collection this document belongs to.
    ///
    /// This should be a static, lowercase identifier (e.g., "students").
    fn collection_name() -> &'static str;
}

/// Extension trait providing BSON conversion for documents.
///
/// Automatically implemented for all types that implement [`Document`].
pub trait DocumentExt: Document {
    /// Converts this document to a BSON value for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the value is not a BSON document.
    fn to_bson(&self) -> DocumentStoreResult<Bson>;

    /// Creates a document from a BSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure is invalid.
    fn from_bson(bson: Bson) -> DocumentStoreResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_bson(&self) -> DocumentStoreResult<Bson> {
        match serialize_to_bson(self)? {
            document @ Bson::Document(_) => Ok(document),
            other => Err(DocumentStoreError::InvalidDocument(format!(
                "{} serialized to {:?}, expected a document",
                D::collection_name(),
                other.element_type()
            ))),
        }
    }

    fn from_bson(bson: Bson) -> DocumentStoreResult<Self> {
        Ok(deserialize_from_bson(bson)?)
    }
}
