//! Storage entity traits

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};

/// Trait for records persisted in the document store
pub trait StorageEntity: Clone + Debug + Send + Sync + Serialize + DeserializeOwned {
    /// Collection the record lives in
    const COLLECTION: &'static str;

    /// The record's own business key (may be empty for records keyed on save)
    fn key(&self) -> &str;
}

/// Records that receive a freshly generated key when saved
pub trait GeneratedKeyEntity: StorageEntity {
    /// Stores the generated key on the record
    fn assign_key(&mut self, key: String);
}
