//! Tri-state field wrapper for merge-patch payloads.
//!
//! A plain `Option<T>` cannot tell "the client left this key out" apart from "the
//! client sent `null`". [`Patch<T>`] keeps the two apart so that an update applies
//! exactly the keys that were sent, including falsy values such as `0` or `""`.
//!
//! Fields must be annotated with `#[serde(default)]` so a missing key falls back to
//! [`Patch::Missing`]:
//!
//! ```ignore
//! #[derive(Deserialize)]
//! struct UserPatch {
//!     #[serde(default)]
//!     name: Patch<String>,
//! }
//! ```

use bson::{Bson, ser::serialize_to_bson};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DocumentStoreResult;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// The key was not present in the payload.
    #[default]
    Missing,
    /// The key was present with an explicit `null`.
    Null,
    /// The key was present with a value.
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Patch::Missing)
    }
}

impl<T: Serialize> Patch<T> {
    /// Converts the patch into the BSON value to write, or `None` when the key
    /// should be left untouched.
    pub fn to_bson(&self) -> DocumentStoreResult<Option<Bson>> {
        Ok(match self {
            Patch::Missing => None,
            Patch::Null => Some(Bson::Null),
            Patch::Value(value) => Some(serialize_to_bson(value)?),
        })
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Only reached when the key is present; absence is handled by `#[serde(default)]`.
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default)]
        count: Patch<u32>,
        #[serde(default)]
        label: Patch<String>,
    }

    #[test]
    fn distinguishes_missing_null_and_value() {
        let sample: Sample = serde_json::from_value(json!({ "count": 0, "label": null })).unwrap();
        assert_eq!(sample.count, Patch::Value(0));
        assert_eq!(sample.label, Patch::Null);

        let sample: Sample = serde_json::from_value(json!({})).unwrap();
        assert!(sample.count.is_missing());
        assert!(sample.label.is_missing());
    }

    #[test]
    fn zero_is_written_not_skipped() {
        assert_eq!(Patch::Value(0u32).to_bson().unwrap(), Some(Bson::Int64(0)));
        assert_eq!(Patch::<u32>::Null.to_bson().unwrap(), Some(Bson::Null));
        assert_eq!(Patch::<u32>::Missing.to_bson().unwrap(), None);
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(serde_json::from_value::<Sample>(json!({ "count": "three" })).is_err());
        assert!(serde_json::from_value::<Sample>(json!({ "count": -1 })).is_err());
    }
}
