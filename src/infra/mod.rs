//! Infrastructure adapters for constraint and instance storage.

pub mod store;

pub use store::{InMemoryStore, PostgresStore};
