//! Storage layer
//!
//! Persists the catalog collections to a durable key-value store and
//! handles backup documents.
//!
//! ## Layout
//!
//! - `tags` slot: JSON array of `{name, color}`
//! - `books` slot: JSON array of `{title, author, year, link, tags}`
//!
//! With `FileStore` each slot is a `<key>.json` file in the data directory.

pub mod backup;
pub mod error;
pub mod gateway;
pub mod kv;

pub use backup::{export_backup, parse_backup, Backup};
pub use error::{StorageError, StorageResult};
pub use gateway::{PersistenceGateway, BOOKS_KEY, TAGS_KEY};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
