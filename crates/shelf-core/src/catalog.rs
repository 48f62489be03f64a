//! Unified catalog interface
//!
//! The `Catalog` owns the tag palette, the book list and the persistence
//! gateway, and exposes every intent a view can send.
//!
//! ## Consistency
//!
//! Mutating intents run against a staged copy of both stores. The copy is
//! persisted first and only then replaces the live stores, so a failed
//! validation, lookup or write leaves the catalog exactly as it was.
//!
//! ## Usage
//!
//! ```ignore
//! let mut catalog = Catalog::open()?;
//!
//! catalog.add_book(&BookDraft::new("Dune", "Frank Herbert").tag("SciFi"))?;
//! catalog.sort_by(SortKey::Title)?;
//!
//! for row in catalog.visible_books(&Filter::default()) {
//!     println!("{} {}", row.index, row.book.title);
//! }
//! ```

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::books::{BookChange, BookStore, SortKey, SortOrder, SortState};
use crate::config::Config;
use crate::error::CatalogResult;
use crate::models::{Book, BookDraft, Tag};
use crate::query::{self, Filter, TagUsage, VisibleBook};
use crate::storage::{self, FileStore, KeyValueStore, PersistenceGateway};
use crate::tags::{Ensured, TagStore};

/// What deleting a tag would do, for the confirmation prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDeletion {
    pub name: String,
    /// Books that carry the tag and will lose it
    pub affected_books: usize,
}

/// What an import replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    /// Number of books imported, `None` if the book list was kept
    pub books: Option<usize>,
    /// Number of tags imported, `None` if the palette was kept
    pub tags: Option<usize>,
    /// Tags created because imported books referenced them
    pub created_tags: usize,
}

/// Book catalog backed by a key-value store
pub struct Catalog {
    tags: TagStore,
    books: BookStore,
    gateway: PersistenceGateway,
}

impl Catalog {
    /// Open the catalog using the default configuration
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(&config)
    }

    /// Open the catalog stored in the configured data directory
    pub fn open_with_config(config: &Config) -> Result<Self> {
        Self::open_with_storage(FileStore::from_config(config))
            .with_context(|| format!("Failed to open catalog in {:?}", config.data_dir))
    }

    /// Open the catalog on any key-value backend
    ///
    /// Missing or unreadable tags are replaced by the predefined set (and
    /// written back); missing or unreadable books start an empty list.
    pub fn open_with_storage(store: impl KeyValueStore + 'static) -> CatalogResult<Self> {
        let mut gateway = PersistenceGateway::new(store);
        let tags = TagStore::load(&mut gateway)?;
        let books = BookStore::load(&gateway);

        info!(
            "Opened catalog with {} books and {} tags",
            books.len(),
            tags.len()
        );

        Ok(Self {
            tags,
            books,
            gateway,
        })
    }

    /// Flush both collections and close the catalog
    pub fn close(mut self) -> CatalogResult<()> {
        self.gateway.save_tags(self.tags.all())?;
        self.gateway.save_books(self.books.all())?;
        debug!("Catalog closed");
        Ok(())
    }

    // ==================== Read access ====================

    /// All tags, sorted by name
    pub fn tags(&self) -> &[Tag] {
        self.tags.all()
    }

    /// All books in current order
    pub fn books(&self) -> &[Book] {
        self.books.all()
    }

    pub fn tag_store(&self) -> &TagStore {
        &self.tags
    }

    pub fn book_store(&self) -> &BookStore {
        &self.books
    }

    /// Book at a position, if any
    pub fn book(&self, index: usize) -> Option<&Book> {
        self.books.get(index)
    }

    pub fn sort_state(&self) -> SortState {
        self.books.sort_state()
    }

    // ==================== Book intents ====================

    /// Add a book, creating any tags it references
    pub fn add_book(&mut self, draft: &BookDraft) -> CatalogResult<BookChange> {
        let change = self.commit(|tags, books| books.add(draft, tags))?;
        debug!("Added book at {}", change.index);
        Ok(change)
    }

    /// Replace the book at `index`
    pub fn update_book(&mut self, index: usize, draft: &BookDraft) -> CatalogResult<BookChange> {
        let change = self.commit(|tags, books| books.update(index, draft, tags))?;
        debug!("Updated book at {}", index);
        Ok(change)
    }

    /// The book a deletion at `index` would remove, for confirmation
    pub fn plan_book_deletion(&self, index: usize) -> Option<&Book> {
        self.books.get(index)
    }

    /// Delete the book at `index`
    ///
    /// An out-of-range index is a no-op and returns `None`.
    pub fn delete_book(&mut self, index: usize) -> CatalogResult<Option<Book>> {
        if index >= self.books.len() {
            return Ok(None);
        }
        let removed = self.commit(|_, books| Ok(books.remove(index)))?;
        debug!("Deleted book at {}", index);
        Ok(removed)
    }

    /// Sort the list by `key`, toggling direction when the key repeats
    pub fn sort_by(&mut self, key: SortKey) -> CatalogResult<SortState> {
        self.commit(|_, books| Ok(books.sort_by(key)))
    }

    /// Sort the list by `key` in an explicit direction
    pub fn sort_with(&mut self, key: SortKey, order: SortOrder) -> CatalogResult<SortState> {
        self.commit(|_, books| Ok(books.sort_with(key, order)))
    }

    // ==================== Tag intents ====================

    /// Get a tag by name, creating it if needed
    ///
    /// Returns `None` for an empty name.
    pub fn ensure_tag(&mut self, name: &str) -> CatalogResult<Option<Ensured>> {
        self.commit(|tags, _| Ok(tags.ensure(name)))
    }

    /// What deleting `name` would affect, or `None` if no such tag exists
    pub fn plan_tag_deletion(&self, name: &str) -> Option<TagDeletion> {
        self.tags.get(name).map(|tag| TagDeletion {
            name: tag.name.clone(),
            affected_books: query::count_by_tag(&self.books, &tag.name),
        })
    }

    /// Delete a tag and remove it from every book
    ///
    /// Unknown names are a no-op and return `None`.
    pub fn delete_tag(&mut self, name: &str) -> CatalogResult<Option<TagDeletion>> {
        if !self.tags.contains(name) {
            return Ok(None);
        }
        let deletion = self.commit(|tags, books| {
            tags.remove(name);
            Ok(TagDeletion {
                name: name.to_string(),
                affected_books: books.purge_tag(name),
            })
        })?;
        info!(
            "Deleted tag {} from {} books",
            deletion.name, deletion.affected_books
        );
        Ok(Some(deletion))
    }

    // ==================== Queries ====================

    /// Books matching `filter`, with their current positions
    pub fn visible_books(&self, filter: &Filter) -> Vec<VisibleBook<'_>> {
        query::visible_books(&self.books, filter)
    }

    pub fn distinct_authors(&self) -> Vec<String> {
        query::distinct_authors(&self.books)
    }

    pub fn distinct_years(&self) -> Vec<String> {
        query::distinct_years(&self.books)
    }

    pub fn count_by_tag(&self, name: &str) -> usize {
        query::count_by_tag(&self.books, name)
    }

    /// Every tag with its usage count
    pub fn tag_usage(&self) -> Vec<TagUsage<'_>> {
        query::tag_usage(&self.tags, &self.books)
    }

    // ==================== Backup ====================

    /// Serialize both collections as a backup document
    pub fn export_backup(&self) -> CatalogResult<String> {
        let document = storage::export_backup(self.books.all(), self.tags.all())?;
        info!(
            "Exported {} books and {} tags",
            self.books.len(),
            self.tags.len()
        );
        Ok(document)
    }

    /// Replace the collections present in a backup document
    ///
    /// A malformed document leaves the catalog untouched.
    pub fn import_backup(&mut self, document: &str) -> CatalogResult<ImportSummary> {
        let backup = storage::parse_backup(document)?;

        let summary = self.commit(|tags, books| {
            let mut summary = ImportSummary::default();

            if let Some(entries) = backup.tags {
                tags.replace_all(entries);
                summary.tags = Some(tags.len());
            }
            if let Some(mut imported) = backup.books {
                imported.iter_mut().for_each(Book::normalize_tags);
                summary.books = Some(imported.len());
                books.replace_all(imported);
            }

            // Keep every referenced tag in the palette
            for book in books.all() {
                for name in &book.tags {
                    if tags.ensure(name).is_some_and(|e| e.is_created()) {
                        summary.created_tags += 1;
                    }
                }
            }

            Ok(summary)
        })?;

        info!(
            "Imported backup: books={:?} tags={:?} created_tags={}",
            summary.books, summary.tags, summary.created_tags
        );
        Ok(summary)
    }

    /// Apply a change to staged copies, persist them, then make them live
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut TagStore, &mut BookStore) -> CatalogResult<T>,
    ) -> CatalogResult<T> {
        let mut tags = self.tags.clone();
        let mut books = self.books.clone();

        let result = change(&mut tags, &mut books)?;

        let tags_changed = tags != self.tags;
        if tags_changed {
            self.gateway.save_tags(tags.all())?;
        }
        if books != self.books {
            if let Err(e) = self.gateway.save_books(books.all()) {
                // The tags slot must not get ahead of the books slot
                if tags_changed {
                    if let Err(restore) = self.gateway.save_tags(self.tags.all()) {
                        warn!("Could not restore tags after failed books write: {}", restore);
                    }
                }
                return Err(e.into());
            }
        }

        self.tags = tags;
        self.books = books;
        Ok(result)
    }
}
