//! Record store adapter for students.
//!
//! [`StudentStore`] is the only code that talks to the document store on behalf of the
//! API. It turns malformed ids into "not found", applies partial updates as merges and
//! shapes list results.
//!
//! Known limitation: an update is a write followed by a re-read. A delete that lands
//! between the two makes the update report "not found" even though the write matched.

use tracing::{debug, info};

use roster_core::{
    collection::TypedCollection,
    error::DocumentStoreResult,
    id::RecordId,
    query::{Expr, Filter, Query},
    store::DocumentStore,
};

use crate::model::{Student, StudentPatch};

/// Upper bound on the number of records a list call returns.
pub const LIST_CAP: usize = 100;

/// Optional list predicates, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    /// Exact match on `address.country`.
    pub country: Option<String>,
    /// Inclusive lower bound on `age`.
    pub min_age: Option<u32>,
}

impl StudentFilter {
    fn expr(&self) -> Option<Expr> {
        let mut predicates = Vec::new();

        if let Some(country) = &self.country {
            predicates.push(Filter::eq("address.country", country.as_str()));
        }
        if let Some(min_age) = self.min_age {
            predicates.push(Filter::gte("age", i64::from(min_age)));
        }

        match predicates.len() {
            0 => None,
            1 => predicates.pop(),
            _ => Some(Filter::and(predicates)),
        }
    }

    /// The store query for this filter: capped, and without the `address` sub-record.
    pub fn to_query(&self) -> Query {
        Query::builder()
            .maybe_filter(self.expr())
            .exclude("address")
            .limit(LIST_CAP)
            .build()
    }
}

#[derive(Debug, Clone)]
pub struct StudentStore {
    students: TypedCollection<Student>,
}

impl StudentStore {
    pub fn new(store: &DocumentStore) -> Self {
        Self { students: store.typed_collection::<Student>() }
    }

    /// Inserts a student and returns the id the store assigned.
    pub async fn create(&self, student: &Student) -> DocumentStoreResult<RecordId> {
        let id = self.students.insert(student).await?;
        info!(%id, "student created");
        Ok(id)
    }

    /// Fetches a student. Ids that are not well-formed are simply not found.
    pub async fn get(&self, id: &str) -> DocumentStoreResult<Option<Student>> {
        let Ok(id) = id.parse::<RecordId>() else {
            debug!(id, "malformed student id");
            return Ok(None);
        };

        self.students.get(&id).await
    }

    /// Applies the keys present in `patch`, then re-reads the record.
    ///
    /// Returns `false` when the id is malformed or unknown, or when the patch is empty.
    pub async fn update(&self, id: &str, patch: &StudentPatch) -> DocumentStoreResult<bool> {
        if patch.is_empty() {
            debug!(id, "empty student patch");
            return Ok(false);
        }
        let Ok(id) = id.parse::<RecordId>() else {
            debug!(id, "malformed student id");
            return Ok(false);
        };

        if !self.students.update(&id, patch.changes()?).await? {
            return Ok(false);
        }

        let persisted = self.students.get(&id).await?.is_some();
        if persisted {
            info!(%id, "student updated");
        }
        Ok(persisted)
    }

    /// Deletes a student, returning whether one existed.
    pub async fn delete(&self, id: &str) -> DocumentStoreResult<bool> {
        let Ok(id) = id.parse::<RecordId>() else {
            debug!(id, "malformed student id");
            return Ok(false);
        };

        let deleted = self.students.delete(&id).await?;
        if deleted {
            info!(%id, "student deleted");
        }
        Ok(deleted)
    }

    /// Lists up to [`LIST_CAP`] students matching `filter`.
    ///
    /// Every returned record has `address` set to `None`, whatever the stored document holds.
    pub async fn list(&self, filter: &StudentFilter) -> DocumentStoreResult<Vec<Student>> {
        let students = self
            .students
            .query(filter.to_query())
            .await?
            .into_iter()
            .map(|student| Student { address: None, ..student })
            .collect::<Vec<_>>();

        debug!(count = students.len(), ?filter, "students listed");
        Ok(students)
    }
}
