//! Catalog error handling
//!
//! Every intent the view sends either succeeds completely or returns one of
//! these errors with no visible mutation.

use thiserror::Error;

use crate::storage::StorageError;

/// A book draft is missing required input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is required")]
    MissingTitle,

    #[error("Author is required")]
    MissingAuthor,
}

/// A backup document could not be imported
#[derive(Error, Debug)]
pub enum ImportError {
    /// Not valid JSON at all
    #[error("Backup is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Valid JSON, but not an object with `books`/`tags`
    #[error("Backup must be a JSON object with \"books\" and/or \"tags\" arrays")]
    NotAnObject,

    /// An entry of the `books` array is not a book
    #[error("Invalid book at position {index}: {source}")]
    InvalidBook {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// An entry of the `tags` array is neither a name nor a tag object
    #[error("Invalid tag at position {index}: {source}")]
    InvalidTag {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors returned by catalog intents
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid book: {0}")]
    Validation(#[from] ValidationError),

    /// Index no longer points at a book (stale view)
    #[error("No book at position {index} (catalog has {len} books)")]
    Index { index: usize, len: usize },

    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CatalogError {
    /// Hint shown next to the error message
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            CatalogError::Storage(e) => e.recovery_suggestion(),
            CatalogError::Index { .. } => Some("Positions shift after deletes; list the books again."),
            CatalogError::Validation(_) | CatalogError::Import(_) => None,
        }
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = CatalogError::from(ValidationError::MissingTitle);
        assert_eq!(err.to_string(), "Invalid book: Title is required");
        assert!(err.recovery_suggestion().is_none());
    }

    #[test]
    fn test_index_display() {
        let err = CatalogError::Index { index: 7, len: 3 };
        let msg = err.to_string();
        assert!(msg.contains('7'));
        assert!(msg.contains("3 books"));
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_import_display() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = CatalogError::from(ImportError::Malformed(json_err));
        assert!(err.to_string().starts_with("Import failed: Backup is not valid JSON"));
    }

    #[test]
    fn test_storage_suggestion_passes_through() {
        let err = CatalogError::from(StorageError::Corrupt {
            key: "books".to_string(),
            details: "eof".to_string(),
        });
        assert!(err.recovery_suggestion().unwrap().contains("shelf import"));
    }
}
