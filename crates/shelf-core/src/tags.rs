//! Tag palette
//!
//! `TagStore` owns the set of tags. Names are unique (case-sensitive) and
//! the set is kept sorted by `compare_names` after every mutation.

use std::cmp::Ordering;

use tracing::{debug, info};

use crate::color::color_for;
use crate::models::{Tag, TagEntry};
use crate::storage::{PersistenceGateway, StorageResult};

/// Tags created on first run
pub const PREDEFINED_TAGS: [(&str, &str); 3] =
    [("Math", "green"), ("Physics", "red"), ("Biology", "olive")];

/// Order tag names the way a reader expects
///
/// Case-insensitive first; names differing only in case fall back to a
/// byte comparison so the order stays total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Result of `TagStore::ensure`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ensured {
    /// The tag already existed and was left unchanged
    Existing(Tag),
    /// The tag was created; tag widgets need a refresh
    Created(Tag),
}

impl Ensured {
    pub fn tag(&self) -> &Tag {
        match self {
            Ensured::Existing(tag) | Ensured::Created(tag) => tag,
        }
    }

    pub fn into_tag(self) -> Tag {
        match self {
            Ensured::Existing(tag) | Ensured::Created(tag) => tag,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Ensured::Created(_))
    }
}

/// Sorted set of tags
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagStore {
    tags: Vec<Tag>,
}

impl TagStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding only the predefined tags
    pub fn predefined() -> Self {
        Self::from_tags(
            PREDEFINED_TAGS
                .iter()
                .map(|(name, color)| Tag::new(*name, *color)),
        )
    }

    /// Build a store from arbitrary tags
    ///
    /// Empty names are dropped; for duplicate names the first one wins.
    pub fn from_tags(tags: impl IntoIterator<Item = Tag>) -> Self {
        let mut store = Self::new();
        for tag in tags {
            if !tag.name.trim().is_empty() {
                store.insert_sorted(tag);
            }
        }
        store
    }

    /// Load tags from storage, seeding the predefined set when none are stored
    ///
    /// Corrupt data counts as none stored. Seeded tags are persisted.
    pub fn load(gateway: &mut PersistenceGateway) -> StorageResult<Self> {
        if let Some(tags) = gateway.load_tags() {
            let store = Self::from_tags(tags);
            debug!("Loaded {} tags", store.len());
            return Ok(store);
        }

        let store = Self::predefined();
        gateway.save_tags(store.all())?;
        info!("Seeded {} predefined tags", store.len());
        Ok(store)
    }

    /// All tags, sorted by name
    pub fn all(&self) -> &[Tag] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Look up a tag by exact name
    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.position(name).ok().map(|i| &self.tags[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_ok()
    }

    /// Color to render a tag name with
    ///
    /// Falls back to a derived color for names not in the store.
    pub fn color_of(&self, name: &str) -> String {
        self.get(name)
            .map(|t| t.color.clone())
            .unwrap_or_else(|| color_for(name))
    }

    /// Get a tag by name, creating it if needed
    ///
    /// The name is trimmed; an empty name yields `None`.
    pub fn ensure(&mut self, name: &str) -> Option<Ensured> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        match self.position(name) {
            Ok(i) => Some(Ensured::Existing(self.tags[i].clone())),
            Err(i) => {
                let tag = Tag::with_derived_color(name);
                self.tags.insert(i, tag.clone());
                debug!("Created tag {}", name);
                Some(Ensured::Created(tag))
            }
        }
    }

    /// Remove a tag by name
    pub fn remove(&mut self, name: &str) -> Option<Tag> {
        let i = self.position(name).ok()?;
        Some(self.tags.remove(i))
    }

    /// Replace the whole palette
    ///
    /// Bare names get a derived color; empty and duplicate names are dropped.
    pub fn replace_all(&mut self, entries: impl IntoIterator<Item = TagEntry>) {
        *self = Self::from_tags(entries.into_iter().filter_map(TagEntry::into_tag));
    }

    fn position(&self, name: &str) -> Result<usize, usize> {
        self.tags
            .binary_search_by(|t| compare_names(&t.name, name))
    }

    fn insert_sorted(&mut self, tag: Tag) {
        if let Err(i) = self.position(&tag.name) {
            self.tags.insert(i, tag);
        }
    }
}
