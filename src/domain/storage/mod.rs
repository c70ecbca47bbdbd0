//! Storage domain - document store abstraction and key strategies

mod entity;
mod key;
mod repository;

pub use entity::{GeneratedKeyEntity, StorageEntity};
pub use key::{GeneratedKey, IdentityKey, KeyStrategy};
pub use repository::{Document, DocumentStore};

#[cfg(test)]
pub use repository::MockDocumentStore;
