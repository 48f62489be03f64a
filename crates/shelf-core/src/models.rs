//! Data models for SHELF
//!
//! Defines the core data structures: Book, Tag and the BookDraft used to
//! create or edit a book. The serialized shapes are the ones written to the
//! key-value store and to backup documents.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::color_for;
use crate::error::ValidationError;
use crate::tags::compare_names;

/// A named, colored label
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Tag {
    /// Unique, trimmed, non-empty name
    pub name: String,
    /// CSS color value
    pub color: String,
}

impl Tag {
    /// Create a tag with an explicit color
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }

    /// Create a tag whose color is derived from its name
    pub fn with_derived_color(name: impl Into<String>) -> Self {
        let name = name.into();
        let color = color_for(&name);
        Self { name, color }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A tag as it may appear in stored or imported data
///
/// Older documents list tags as bare names; newer ones as objects, possibly
/// without a color.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TagEntry {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        color: Option<String>,
    },
}

impl TagEntry {
    /// Normalize into a tag, returning `None` for empty names
    pub fn into_tag(self) -> Option<Tag> {
        let (name, color) = match self {
            TagEntry::Name(name) => (name, None),
            TagEntry::Full { name, color } => (name, color),
        };
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(match color.filter(|c| !c.trim().is_empty()) {
            Some(color) => Tag::new(name, color),
            None => Tag::with_derived_color(name),
        })
    }
}

/// Publication year of a book
///
/// Numeric when the entered value parses as an integer, free text otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Year {
    Number(i64),
    Text(String),
}

impl Year {
    /// Normalize user input
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => Year::Number(n),
            Err(_) => Year::Text(trimmed.to_string()),
        }
    }

    /// Whether no year was given
    pub fn is_empty(&self) -> bool {
        matches!(self, Year::Text(s) if s.is_empty())
    }
}

impl Default for Year {
    fn default() -> Self {
        Year::Text(String::new())
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Year::Number(n) => write!(f, "{}", n),
            Year::Text(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for Year {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Year::Number(n) => serializer.serialize_i64(*n),
            Year::Text(s) => serializer.serialize_str(s),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawYear {
    Int(i64),
    Float(f64),
    Text(String),
    Null(()),
}

impl<'de> Deserialize<'de> for Year {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawYear::deserialize(deserializer)? {
            RawYear::Int(n) => Year::Number(n),
            RawYear::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Year::Number(f as i64)
            }
            RawYear::Float(f) => Year::Text(f.to_string()),
            RawYear::Text(s) => Year::Text(s),
            RawYear::Null(()) => Year::default(),
        })
    }
}

/// A book record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub year: Year,
    #[serde(default)]
    pub link: String,
    /// Tag names, deduplicated and sorted
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Book {
    /// Whether the book carries the given tag
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t == name)
    }

    /// Trim, deduplicate and sort the tag names, dropping empty ones
    pub fn normalize_tags(&mut self) {
        let mut tags: Vec<String> = self
            .tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        tags.sort_by(|a, b| compare_names(a, b));
        tags.dedup();
        self.tags = tags;
    }

    /// Remove a tag, returning whether it was present
    pub fn remove_tag(&mut self, name: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != name);
        self.tags.len() != before
    }
}

/// User input for creating or editing a book
///
/// Fields are raw strings as typed; `BookDraft::normalize` validates and
/// cleans them up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub year: String,
    pub link: String,
    pub tags: Vec<String>,
}

impl BookDraft {
    /// Create a draft with the two required fields
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            ..Default::default()
        }
    }

    pub fn year(mut self, year: impl Into<String>) -> Self {
        self.year = year.into();
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Draft prefilled from an existing book (for editing)
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year.to_string(),
            link: book.link.clone(),
            tags: book.tags.clone(),
        }
    }

    /// Validate and normalize into a book
    ///
    /// Tag names are trimmed, deduplicated and sorted. The caller is
    /// responsible for making sure each tag exists in the tag store.
    pub fn normalize(&self) -> Result<Book, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        let author = self.author.trim();
        if author.is_empty() {
            return Err(ValidationError::MissingAuthor);
        }

        let mut book = Book {
            title: title.to_string(),
            author: author.to_string(),
            year: Year::parse(&self.year),
            link: self.link.trim().to_string(),
            tags: self.tags.clone(),
        };
        book.normalize_tags();
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_parse() {
        assert_eq!(Year::parse(" 2001 "), Year::Number(2001));
        assert_eq!(Year::parse("c. 1850"), Year::Text("c. 1850".to_string()));
        assert_eq!(Year::parse("   "), Year::default());
        assert!(Year::parse("").is_empty());
    }

    #[test]
    fn test_year_serialization() {
        assert_eq!(serde_json::to_string(&Year::Number(1999)).unwrap(), "1999");
        assert_eq!(
            serde_json::to_string(&Year::Text("n.d.".into())).unwrap(),
            "\"n.d.\""
        );
        assert_eq!(serde_json::to_string(&Year::default()).unwrap(), "\"\"");
    }

    #[test]
    fn test_year_deserialization() {
        let y: Year = serde_json::from_str("2001").unwrap();
        assert_eq!(y, Year::Number(2001));
        let y: Year = serde_json::from_str("2001.0").unwrap();
        assert_eq!(y, Year::Number(2001));
        let y: Year = serde_json::from_str("\"unknown\"").unwrap();
        assert_eq!(y, Year::Text("unknown".to_string()));
        let y: Year = serde_json::from_str("null").unwrap();
        assert!(y.is_empty());
    }

    #[test]
    fn test_book_missing_optional_fields() {
        let book: Book = serde_json::from_str(r#"{"title":"T","author":"A"}"#).unwrap();
        assert!(book.year.is_empty());
        assert!(book.link.is_empty());
        assert!(book.tags.is_empty());
    }

    #[test]
    fn test_draft_normalize() {
        let draft = BookDraft::new("  Dune ", " Herbert ")
            .year(" 1965 ")
            .link(" https://example.com ")
            .tag("Physics")
            .tag(" Math ")
            .tag("Physics")
            .tag("  ");

        let book = draft.normalize().unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "Herbert");
        assert_eq!(book.year, Year::Number(1965));
        assert_eq!(book.link, "https://example.com");
        assert_eq!(book.tags, vec!["Math", "Physics"]);
    }

    #[test]
    fn test_draft_requires_title_and_author() {
        assert_eq!(
            BookDraft::new("", "X").normalize(),
            Err(ValidationError::MissingTitle)
        );
        assert_eq!(
            BookDraft::new("T", "   ").normalize(),
            Err(ValidationError::MissingAuthor)
        );
    }

    #[test]
    fn test_draft_from_book() {
        let book = BookDraft::new("T", "A").year("2000").tag("x").normalize().unwrap();
        let draft = BookDraft::from_book(&book);
        assert_eq!(draft.normalize().unwrap(), book);
    }

    #[test]
    fn test_tag_entry_normalization() {
        let bare: TagEntry = serde_json::from_str("\"History\"").unwrap();
        assert_eq!(bare.into_tag(), Some(Tag::with_derived_color("History")));

        let full: TagEntry = serde_json::from_str(r#"{"name":"Math","color":"green"}"#).unwrap();
        assert_eq!(full.into_tag(), Some(Tag::new("Math", "green")));

        let no_color: TagEntry = serde_json::from_str(r#"{"name":"Art"}"#).unwrap();
        assert_eq!(no_color.into_tag(), Some(Tag::with_derived_color("Art")));

        let empty: TagEntry = serde_json::from_str("\"  \"").unwrap();
        assert_eq!(empty.into_tag(), None);
    }

    #[test]
    fn test_book_tag_helpers() {
        let mut book = BookDraft::new("T", "A").tag("a").tag("b").normalize().unwrap();
        assert!(book.has_tag("a"));
        assert!(book.remove_tag("a"));
        assert!(!book.remove_tag("a"));
        assert_eq!(book.tags, vec!["b"]);
    }
}
