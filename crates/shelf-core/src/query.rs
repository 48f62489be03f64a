//! Filtered views over the book list
//!
//! Everything here borrows the stores and returns freshly computed data;
//! nothing is cached and nothing is mutated.

use crate::books::BookStore;
use crate::models::{Book, Tag};
use crate::tags::{compare_names, TagStore};

/// Constraints on the visible books
///
/// Empty fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    /// Case-insensitive substring of title, author or tag names
    pub query: String,
    /// Exact author
    pub author: String,
    /// Exact year, as displayed
    pub year: String,
    /// Tags that must all be present
    pub tags: Vec<String>,
}

/// Partial filter update; `None` leaves a field as it is
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub query: Option<String>,
    pub author: Option<String>,
    pub year: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl Filter {
    /// Apply a partial update
    pub fn apply(&mut self, patch: FilterPatch) {
        if let Some(query) = patch.query {
            self.query = query;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
    }

    /// Whether the filter lets everything through
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
            && self.author.is_empty()
            && self.year.is_empty()
            && self.tags.is_empty()
    }

    /// Whether a book satisfies every constraint
    pub fn matches(&self, book: &Book) -> bool {
        self.matches_text(book)
            && (self.author.is_empty() || book.author == self.author)
            && (self.year.is_empty() || book.year.to_string() == self.year)
            && self.tags.iter().all(|t| book.has_tag(t))
    }

    fn matches_text(&self, book: &Book) -> bool {
        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        book.title.to_lowercase().contains(&query)
            || book.author.to_lowercase().contains(&query)
            || book.tags.join(" ").to_lowercase().contains(&query)
    }
}

/// A book that passed the filter, with its current position in the store
///
/// The index is only valid until the store changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleBook<'a> {
    pub index: usize,
    pub book: &'a Book,
}

/// A tag with the number of books using it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TagUsage<'a> {
    pub tag: &'a Tag,
    pub count: usize,
}

/// Books matching `filter`, in store order
pub fn visible_books<'a>(books: &'a BookStore, filter: &Filter) -> Vec<VisibleBook<'a>> {
    books
        .all()
        .iter()
        .enumerate()
        .filter(|(_, book)| filter.matches(book))
        .map(|(index, book)| VisibleBook { index, book })
        .collect()
}

/// Distinct non-empty authors, sorted ascending
pub fn distinct_authors(books: &BookStore) -> Vec<String> {
    distinct(books.all().iter().map(|b| b.author.clone()))
}

/// Distinct non-empty years as strings, sorted ascending
pub fn distinct_years(books: &BookStore) -> Vec<String> {
    distinct(books.all().iter().map(|b| b.year.to_string()))
}

/// Number of books carrying a tag
pub fn count_by_tag(books: &BookStore, name: &str) -> usize {
    books.all().iter().filter(|b| b.has_tag(name)).count()
}

/// Every tag in the palette with its usage count
pub fn tag_usage<'a>(tags: &'a TagStore, books: &BookStore) -> Vec<TagUsage<'a>> {
    tags.all()
        .iter()
        .map(|tag| TagUsage {
            tag,
            count: count_by_tag(books, &tag.name),
        })
        .collect()
}

fn distinct(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut values: Vec<String> = values.filter(|v| !v.is_empty()).collect();
    values.sort_by(|a, b| compare_names(a, b));
    values.dedup();
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::books::SortKey;
    use crate::models::BookDraft;

    fn catalog() -> BookStore {
        let mut tags = TagStore::predefined();
        let mut books = BookStore::new();
        for draft in [
            BookDraft::new("Quantum Mechanics", "Dirac")
                .year("1930")
                .tag("Physics")
                .tag("Math"),
            BookDraft::new("Origin of Species", "Darwin")
                .year("1859")
                .tag("Biology"),
            BookDraft::new("Calculus", "Spivak").year("1967").tag("Math"),
            BookDraft::new("Notes", "Darwin"),
        ] {
            books.add(&draft, &mut tags).unwrap();
        }
        books
    }

    fn titles(visible: &[VisibleBook<'_>]) -> Vec<String> {
        visible.iter().map(|v| v.book.title.clone()).collect()
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let books = catalog();
        let filter = Filter::default();
        assert!(filter.is_empty());

        let visible = visible_books(&books, &filter);
        assert_eq!(visible.len(), 4);
        assert_eq!(
            visible.iter().map(|v| v.index).collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn test_query_matches_tag_names() {
        let books = catalog();
        let filter = Filter {
            query: "phys".to_string(),
            ..Default::default()
        };

        assert_eq!(titles(&visible_books(&books, &filter)), vec!["Quantum Mechanics"]);
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let books = catalog();
        let filter = Filter {
            query: "DARWIN".to_string(),
            ..Default::default()
        };

        assert_eq!(
            titles(&visible_books(&books, &filter)),
            vec!["Origin of Species", "Notes"]
        );
    }

    #[test]
    fn test_author_and_year_are_exact() {
        let books = catalog();
        let filter = Filter {
            author: "Darw".to_string(),
            ..Default::default()
        };
        assert!(visible_books(&books, &filter).is_empty());

        let filter = Filter {
            year: "1859".to_string(),
            ..Default::default()
        };
        assert_eq!(titles(&visible_books(&books, &filter)), vec!["Origin of Species"]);
    }

    #[test]
    fn test_tags_are_anded() {
        let books = catalog();
        let filter = Filter {
            tags: vec!["Math".to_string(), "Physics".to_string()],
            ..Default::default()
        };
        assert_eq!(titles(&visible_books(&books, &filter)), vec!["Quantum Mechanics"]);

        let filter = Filter {
            tags: vec!["Math".to_string()],
            ..Default::default()
        };
        assert_eq!(
            titles(&visible_books(&books, &filter)),
            vec!["Quantum Mechanics", "Calculus"]
        );
    }

    #[test]
    fn test_combined_predicates() {
        let books = catalog();
        let filter = Filter {
            query: "o".to_string(),
            author: "Darwin".to_string(),
            year: "1859".to_string(),
            tags: vec!["Biology".to_string()],
        };
        let visible = visible_books(&books, &filter);
        assert_eq!(titles(&visible), vec!["Origin of Species"]);
        assert_eq!(visible[0].index, 1);
    }

    #[test]
    fn test_preserves_store_order() {
        let mut books = catalog();
        books.sort_by(SortKey::Title);
        books.sort_by(SortKey::Title);

        let filter = Filter {
            tags: vec!["Math".to_string()],
            ..Default::default()
        };
        let visible = visible_books(&books, &filter);
        assert_eq!(titles(&visible), vec!["Quantum Mechanics", "Calculus"]);
        // Indices follow the sorted store
        assert_eq!(books.get(visible[1].index).unwrap().title, "Calculus");
    }

    #[test]
    fn test_filter_patch() {
        let mut filter = Filter {
            query: "x".to_string(),
            author: "Darwin".to_string(),
            ..Default::default()
        };

        filter.apply(FilterPatch {
            author: Some(String::new()),
            tags: Some(vec!["Math".to_string()]),
            ..Default::default()
        });

        assert_eq!(filter.query, "x");
        assert!(filter.author.is_empty());
        assert_eq!(filter.tags, vec!["Math"]);
    }

    #[test]
    fn test_distinct_values() {
        let books = catalog();
        assert_eq!(distinct_authors(&books), vec!["Darwin", "Dirac", "Spivak"]);
        assert_eq!(distinct_years(&books), vec!["1859", "1930", "1967"]);
    }

    #[test]
    fn test_tag_counts() {
        let books = catalog();
        let tags = TagStore::predefined();

        assert_eq!(count_by_tag(&books, "Math"), 2);
        assert_eq!(count_by_tag(&books, "Unknown"), 0);

        let usage: Vec<(&str, usize)> = tag_usage(&tags, &books)
            .iter()
            .map(|u| (u.tag.name.as_str(), u.count))
            .collect();
        assert_eq!(usage, vec![("Biology", 1), ("Math", 2), ("Physics", 1)]);
    }
}
