//! Key strategies chosen by the caller when saving a record

use std::fmt::Debug;

use uuid::Uuid;

use super::entity::{GeneratedKeyEntity, StorageEntity};

/// Decides the document key for a record about to be saved
pub trait KeyStrategy<E: StorageEntity>: Send + Sync + Debug {
    /// Returns the key to save under, updating the record if the strategy
    /// writes the key back into it
    fn prepare(&self, entity: &mut E) -> String;
}

/// Saves under the record's own business key. Saving twice overwrites.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityKey;

impl<E: StorageEntity> KeyStrategy<E> for IdentityKey {
    fn prepare(&self, entity: &mut E) -> String {
        entity.key().to_string()
    }
}

/// Saves under a fresh random UUID. Saving twice yields two documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneratedKey;

impl<E: GeneratedKeyEntity> KeyStrategy<E> for GeneratedKey {
    fn prepare(&self, entity: &mut E) -> String {
        let key = Uuid::new_v4().to_string();
        entity.assign_key(key.clone());
        key
    }
}
