//! Book list
//!
//! `BookStore` owns the ordered list of books and the current sort state.
//! Books are addressed by position; a position is only meaningful until the
//! next mutation.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{Book, BookDraft, Tag};
use crate::storage::PersistenceGateway;
use crate::tags::TagStore;

/// Field a book list can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Title,
    Author,
    Year,
    Link,
    Tags,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Title,
        SortKey::Author,
        SortKey::Year,
        SortKey::Link,
        SortKey::Tags,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::Author => "author",
            SortKey::Year => "year",
            SortKey::Link => "link",
            SortKey::Tags => "tags",
        }
    }

    /// Lowercased field text used for comparison
    fn sort_text(&self, book: &Book) -> String {
        match self {
            SortKey::Title => book.title.to_lowercase(),
            SortKey::Author => book.author.to_lowercase(),
            SortKey::Year => book.year.to_string().to_lowercase(),
            SortKey::Link => book.link.to_lowercase(),
            SortKey::Tags => book.tags.join(",").to_lowercase(),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized sort key name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown sort key '{0}'. Valid keys: title, author, year, link, tags")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| UnknownSortKey(s.to_string()))
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// Current sort key and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    /// `None` until the list has been sorted
    pub key: Option<SortKey>,
    pub order: SortOrder,
}

impl SortState {
    /// State after a sort request on `key`
    ///
    /// Same key flips the direction, a new key starts ascending.
    pub fn next(self, key: SortKey) -> Self {
        let order = if self.key == Some(key) {
            self.order.reversed()
        } else {
            SortOrder::Ascending
        };
        Self {
            key: Some(key),
            order,
        }
    }
}

/// Outcome of adding or editing a book
#[derive(Debug, Clone, PartialEq)]
pub struct BookChange {
    /// Current position of the book
    pub index: usize,
    /// Tags that had to be created for this book
    pub created_tags: Vec<Tag>,
}

/// Ordered list of books
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookStore {
    books: Vec<Book>,
    sort: SortState,
}

impl BookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding the given books in the given order
    pub fn from_books(books: Vec<Book>) -> Self {
        Self {
            books,
            sort: SortState::default(),
        }
    }

    /// Load books from storage (empty when absent or corrupt)
    pub fn load(gateway: &PersistenceGateway) -> Self {
        let store = Self::from_books(gateway.load_books());
        debug!("Loaded {} books", store.len());
        store
    }

    /// All books in current order
    pub fn all(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Book> {
        self.books.get(index)
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    /// Append a new book
    ///
    /// Validates the draft before touching anything; tags that do not exist
    /// yet are created in `tags`.
    pub fn add(&mut self, draft: &BookDraft, tags: &mut TagStore) -> CatalogResult<BookChange> {
        let book = draft.normalize()?;
        let created_tags = ensure_book_tags(&book, tags);

        self.books.push(book);
        Ok(BookChange {
            index: self.books.len() - 1,
            created_tags,
        })
    }

    /// Replace the book at `index`
    pub fn update(
        &mut self,
        index: usize,
        draft: &BookDraft,
        tags: &mut TagStore,
    ) -> CatalogResult<BookChange> {
        let book = draft.normalize()?;
        if index >= self.books.len() {
            return Err(CatalogError::Index {
                index,
                len: self.books.len(),
            });
        }
        let created_tags = ensure_book_tags(&book, tags);

        self.books[index] = book;
        Ok(BookChange {
            index,
            created_tags,
        })
    }

    /// Remove the book at `index`; out-of-range is a no-op
    pub fn remove(&mut self, index: usize) -> Option<Book> {
        if index < self.books.len() {
            Some(self.books.remove(index))
        } else {
            None
        }
    }

    /// Drop a tag name from every book, returning how many books had it
    pub fn purge_tag(&mut self, name: &str) -> usize {
        self.books
            .iter_mut()
            .map(|book| book.remove_tag(name))
            .filter(|removed| *removed)
            .count()
    }

    /// Sort by `key`, toggling direction on repeated requests
    pub fn sort_by(&mut self, key: SortKey) -> SortState {
        let next = self.sort.next(key);
        self.sort_with(key, next.order)
    }

    /// Sort by `key` in an explicit direction
    pub fn sort_with(&mut self, key: SortKey, order: SortOrder) -> SortState {
        match order {
            SortOrder::Ascending => self.books.sort_by_cached_key(|b| key.sort_text(b)),
            SortOrder::Descending => self
                .books
                .sort_by_cached_key(|b| Reverse(key.sort_text(b))),
        }

        self.sort = SortState {
            key: Some(key),
            order,
        };
        self.sort
    }

    /// Replace the whole list, clearing the sort state
    pub fn replace_all(&mut self, books: Vec<Book>) {
        *self = Self::from_books(books);
    }
}

/// Make sure every tag of `book` exists, returning the ones created
fn ensure_book_tags(book: &Book, tags: &mut TagStore) -> Vec<Tag> {
    book.tags
        .iter()
        .filter_map(|name| tags.ensure(name))
        .filter(|ensured| ensured.is_created())
        .map(|ensured| ensured.into_tag())
        .collect()
}
