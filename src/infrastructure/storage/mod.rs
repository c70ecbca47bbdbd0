//! Storage infrastructure - document store backends and typed client

mod client;
mod factory;
mod in_memory;
mod postgres;

pub use client::DocumentClient;
pub use factory::{StorageConfig, StorageFactory, StorageType};
pub use in_memory::InMemoryDocumentStore;
pub use postgres::{PostgresConfig, PostgresDocumentStore};
