//! SHELF Core Library
//!
//! This crate provides the core functionality for SHELF, a local-first
//! catalog of books with a shared palette of colored tags.
//!
//! # Architecture
//!
//! - **TagStore / BookStore**: own the collections and their invariants
//! - **Query**: derives filtered views without mutating anything
//! - **Storage**: persists both collections to a key-value store and
//!   reads/writes JSON backup documents
//!
//! Rendering is left to the caller: everything here returns plain data.
//!
//! # Quick Start
//!
//! ```text
//! let mut catalog = Catalog::open()?;
//!
//! // Add a book (missing tags are created)
//! catalog.add_book(&BookDraft::new("Dune", "Frank Herbert").year("1965").tag("SciFi"))?;
//!
//! // Query books
//! let filter = Filter { query: "dune".into(), ..Default::default() };
//! let rows = catalog.visible_books(&filter);
//! ```
//!
//! # Modules
//!
//! - `catalog`: Unified interface (main entry point)
//! - `models`: Data structures for books and tags
//! - `tags`: Tag palette
//! - `books`: Book list and sorting
//! - `query`: Filtering and facets
//! - `color`: Derived tag colors
//! - `storage`: Persistence and backups
//! - `config`: Application configuration

pub mod books;
pub mod catalog;
pub mod color;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod storage;
pub mod tags;

pub use books::{BookChange, BookStore, SortKey, SortOrder, SortState, UnknownSortKey};
pub use catalog::{Catalog, ImportSummary, TagDeletion};
pub use color::color_for;
pub use config::Config;
pub use error::{CatalogError, CatalogResult, ImportError, ValidationError};
pub use models::{Book, BookDraft, Tag, TagEntry, Year};
pub use query::{Filter, FilterPatch, TagUsage, VisibleBook};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use tags::{Ensured, TagStore, PREDEFINED_TAGS};
