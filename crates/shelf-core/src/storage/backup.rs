//! Backup documents
//!
//! A backup is a JSON object `{ "books": [...], "tags": [...] }` using the
//! same shapes as the stored slots. Tag entries may be bare names.

use serde::Serialize;
use serde_json::Value;

use crate::error::ImportError;
use crate::models::{Book, Tag, TagEntry};
use crate::storage::error::{StorageError, StorageResult};

#[derive(Serialize)]
struct BackupRef<'a> {
    books: &'a [Book],
    tags: &'a [Tag],
}

/// Contents of a parsed backup document
///
/// A collection is `None` when the document did not carry it as an array;
/// that collection is then left as it is.
#[derive(Debug, Default, PartialEq)]
pub struct Backup {
    pub books: Option<Vec<Book>>,
    pub tags: Option<Vec<TagEntry>>,
}

/// Serialize both collections as a pretty-printed backup document
pub fn export_backup(books: &[Book], tags: &[Tag]) -> StorageResult<String> {
    serde_json::to_string_pretty(&BackupRef { books, tags }).map_err(|source| {
        StorageError::Encode {
            key: "backup".to_string(),
            source,
        }
    })
}

/// Parse a backup document
///
/// Fails on malformed JSON, on a document that is not an object, and on any
/// entry that is not a valid book or tag. Non-array `books`/`tags` members
/// are ignored.
pub fn parse_backup(document: &str) -> Result<Backup, ImportError> {
    let value: Value = serde_json::from_str(document).map_err(ImportError::Malformed)?;
    let Value::Object(mut root) = value else {
        return Err(ImportError::NotAnObject);
    };

    let books = match root.remove("books") {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    serde_json::from_value::<Book>(item)
                        .map_err(|source| ImportError::InvalidBook { index, source })
                })
                .collect::<Result<Vec<_>, _>>()?,
        ),
        _ => None,
    };

    let tags = match root.remove("tags") {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    serde_json::from_value::<TagEntry>(item)
                        .map_err(|source| ImportError::InvalidTag { index, source })
                })
                .collect::<Result<Vec<_>, _>>()?,
        ),
        _ => None,
    };

    Ok(Backup { books, tags })
}
