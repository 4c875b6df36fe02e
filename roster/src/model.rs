//! Student records and their partial-update payload.

use bson::Document as BsonDocument;
use serde::{Deserialize, Serialize};

use roster_core::{document::Document, error::DocumentStoreResult, patch::Patch};

/// Postal location embedded in a [`Student`]. Has no identity of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// A student record. Every field is optional; partial records are valid.
///
/// The store-assigned id is not part of the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub address: Option<Address>,
}

impl Document for Student {
    fn collection_name() -> &'static str {
        "students"
    }
}

/// Body of a partial update. Only keys present in the payload are written.
///
/// An explicit `null` writes `null`. `address` is replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StudentPatch {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub age: Patch<u32>,
    #[serde(default)]
    pub address: Patch<Address>,
}

impl StudentPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_missing() && self.age.is_missing() && self.address.is_missing()
    }

    /// The `$set`-style change set: one entry per key present in the payload.
    pub fn changes(&self) -> DocumentStoreResult<BsonDocument> {
        let mut changes = BsonDocument::new();

        for (key, value) in [
            ("name", self.name.to_bson()?),
            ("age", self.age.to_bson()?),
            ("address", self.address.to_bson()?),
        ] {
            if let Some(value) = value {
                changes.insert(key, value);
            }
        }

        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{Bson, doc};
    use serde_json::json;

    #[test]
    fn absent_keys_produce_no_changes() {
        let patch: StudentPatch = serde_json::from_value(json!({})).unwrap();
        assert!(patch.is_empty());
        assert!(patch.changes().unwrap().is_empty());
    }

    #[test]
    fn only_present_keys_are_written() {
        let patch: StudentPatch = serde_json::from_value(json!({ "age": 0 })).unwrap();
        assert!(!patch.is_empty());
        assert_eq!(patch.changes().unwrap(), doc! { "age": 0_i64 });
    }

    #[test]
    fn explicit_null_is_written() {
        let patch: StudentPatch = serde_json::from_value(json!({ "name": null })).unwrap();
        assert_eq!(patch.changes().unwrap(), doc! { "name": Bson::Null });
    }

    #[test]
    fn address_replaces_whole_subrecord() {
        let patch: StudentPatch =
            serde_json::from_value(json!({ "address": { "city": "Cusco" } })).unwrap();
        assert_eq!(
            patch.changes().unwrap(),
            doc! { "address": { "city": "Cusco", "country": Bson::Null } }
        );
    }

    #[test]
    fn students_tolerate_missing_and_unknown_keys() {
        let student: Student =
            serde_json::from_value(json!({ "name": "Ana", "_id": "x" })).unwrap();
        assert_eq!(student, Student { name: Some("Ana".into()), ..Student::default() });
    }

    #[test]
    fn negative_age_is_not_a_student() {
        assert!(serde_json::from_value::<Student>(json!({ "age": -1 })).is_err());
    }
}
