//! Loading and saving the catalog collections
//!
//! Tags and books live in two independent slots. Reads never fail: a
//! missing or unreadable slot is logged and reported as absent.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::models::{Book, Tag, TagEntry};
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::kv::KeyValueStore;

/// Slot holding the JSON array of tags
pub const TAGS_KEY: &str = "tags";

/// Slot holding the JSON array of books
pub const BOOKS_KEY: &str = "books";

/// Persistence for the tag and book collections
pub struct PersistenceGateway {
    store: Box<dyn KeyValueStore>,
}

impl PersistenceGateway {
    /// Create a gateway over a key-value backend
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Load stored tags
    ///
    /// Returns `None` when the slot is absent or corrupt so the caller can
    /// seed defaults. Bare-name entries get a derived color.
    pub fn load_tags(&self) -> Option<Vec<Tag>> {
        let entries: Vec<TagEntry> = self.read_or_log(TAGS_KEY)?;
        Some(entries.into_iter().filter_map(TagEntry::into_tag).collect())
    }

    /// Load stored books, empty when absent or corrupt
    pub fn load_books(&self) -> Vec<Book> {
        self.read_or_log(BOOKS_KEY).unwrap_or_default()
    }

    /// Overwrite the tags slot
    pub fn save_tags(&mut self, tags: &[Tag]) -> StorageResult<()> {
        self.write_slot(TAGS_KEY, tags)
    }

    /// Overwrite the books slot
    pub fn save_books(&mut self, books: &[Book]) -> StorageResult<()> {
        self.write_slot(BOOKS_KEY, books)
    }

    fn read_or_log<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.read_slot(key) {
            Ok(value) => value,
            Err(e) => {
                match e.recovery_suggestion() {
                    Some(hint) => warn!("Ignoring stored {}: {}. {}", key, e, hint),
                    None => warn!("Ignoring stored {}: {}", key, e),
                }
                None
            }
        }
    }

    fn read_slot<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        let Some(raw) = self.store.get(key)? else {
            debug!("No stored {}", key);
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::Corrupt {
                key: key.to_string(),
                details: e.to_string(),
            })
    }

    fn write_slot<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> StorageResult<()> {
        let json = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &json)?;
        debug!("Saved {} ({} bytes)", key, json.len());
        Ok(())
    }
}
