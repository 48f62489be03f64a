//! Book command handlers

use anyhow::{anyhow, bail, Context, Result};

use shelf_core::{Book, BookDraft, Catalog, Filter, SortKey, SortOrder};

use crate::output::{position, Output};
use crate::prompt::{approve_delete, confirm};

/// Field changes requested by `book edit`
#[derive(Debug, Default)]
pub struct BookEdit {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<String>,
    pub link: Option<String>,
    pub add_tags: Vec<String>,
    pub remove_tags: Vec<String>,
    pub clear_tags: bool,
}

impl BookEdit {
    /// Apply the changes on top of an existing draft
    pub fn apply(self, draft: &mut BookDraft) {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(author) = self.author {
            draft.author = author;
        }
        if let Some(year) = self.year {
            draft.year = year;
        }
        if let Some(link) = self.link {
            draft.link = link;
        }
        if self.clear_tags {
            draft.tags.clear();
        }
        draft
            .tags
            .retain(|t| !self.remove_tags.iter().any(|r| r.trim() == t));
        draft.tags.extend(self.add_tags);
    }
}

/// Convert a 1-based position from the command line to an index
pub fn index_from_position(position: usize) -> Result<usize> {
    if position == 0 {
        bail!("Positions start at 1");
    }
    Ok(position - 1)
}

/// Add a new book
pub fn add(catalog: &mut Catalog, draft: BookDraft, output: &Output) -> Result<()> {
    let change = catalog.add_book(&draft).context("Failed to add book")?;

    for tag in &change.created_tags {
        output.message(&format!("Created tag: {}", tag.name));
    }
    output.success(&format!("Added book at position {}", position(change.index)));
    if let Some(book) = catalog.book(change.index) {
        output.print_book(change.index, book, catalog.tag_store());
    }

    Ok(())
}

/// List books matching a filter
pub fn list(catalog: &Catalog, filter: &Filter, output: &Output) -> Result<()> {
    let rows = catalog.visible_books(filter);
    output.print_books(&rows, catalog.books().len());
    Ok(())
}

/// Show a single book
pub fn show(catalog: &Catalog, pos: usize, output: &Output) -> Result<()> {
    let index = index_from_position(pos)?;
    let book = catalog
        .book(index)
        .ok_or_else(|| anyhow!("No book at position {}", pos))?;

    output.print_book(index, book, catalog.tag_store());
    Ok(())
}

/// Edit a book
pub fn edit(catalog: &mut Catalog, pos: usize, edit: BookEdit, output: &Output) -> Result<()> {
    let index = index_from_position(pos)?;
    let book = catalog
        .book(index)
        .ok_or_else(|| anyhow!("No book at position {}", pos))?;

    let mut draft = BookDraft::from_book(book);
    edit.apply(&mut draft);

    let change = catalog
        .update_book(index, &draft)
        .context("Failed to update book")?;

    for tag in &change.created_tags {
        output.message(&format!("Created tag: {}", tag.name));
    }
    output.success("Book updated");
    if let Some(book) = catalog.book(change.index) {
        output.print_book(change.index, book, catalog.tag_store());
    }

    Ok(())
}

/// Delete a book
pub fn delete(
    catalog: &mut Catalog,
    pos: usize,
    confirm_deletes: bool,
    output: &Output,
) -> Result<()> {
    let index = index_from_position(pos)?;

    let Some(book) = catalog.plan_book_deletion(index) else {
        output.message(&format!("No book at position {}.", pos));
        return Ok(());
    };

    let notice = deletion_notice(pos, book);
    if !approve_delete(&notice, confirm_deletes, output, || confirm("Are you sure?"))? {
        return Ok(());
    }

    if let Some(removed) = catalog
        .delete_book(index)
        .context("Failed to delete book")?
    {
        output.success(&format!("Deleted book: {}", removed.title));
    }

    Ok(())
}

fn deletion_notice(pos: usize, book: &Book) -> String {
    format!("Delete book: {} - {} by {}", pos, book.title, book.author)
}

/// Sort the catalog
pub fn sort(catalog: &mut Catalog, key: SortKey, descending: bool, output: &Output) -> Result<()> {
    let order = if descending {
        SortOrder::Descending
    } else {
        SortOrder::Ascending
    };
    let state = catalog
        .sort_with(key, order)
        .context("Failed to sort books")?;

    output.print_sort(state);
    Ok(())
}

/// Show distinct authors and years
pub fn facets(catalog: &Catalog, output: &Output) -> Result<()> {
    output.print_facets(&catalog.distinct_authors(), &catalog.distinct_years());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use shelf_core::MemoryStore;

    #[test]
    fn test_index_from_position() {
        assert_eq!(index_from_position(1).unwrap(), 0);
        assert_eq!(index_from_position(10).unwrap(), 9);
        assert!(index_from_position(0).is_err());
    }

    #[test]
    fn test_deletion_notice() {
        let book = BookDraft::new("Dune", "Herbert").normalize().unwrap();
        assert_eq!(deletion_notice(2, &book), "Delete book: 2 - Dune by Herbert");
    }

    #[test]
    fn test_delete_without_prompt() {
        let mut catalog = Catalog::open_with_storage(MemoryStore::new()).unwrap();
        catalog.add_book(&BookDraft::new("One", "A")).unwrap();
        catalog.add_book(&BookDraft::new("Two", "B")).unwrap();

        let output = Output::new(OutputFormat::Quiet);
        delete(&mut catalog, 1, true, &output).unwrap();
        assert_eq!(catalog.books().len(), 1);
        assert_eq!(catalog.books()[0].title, "Two");

        // Stale position is reported, not an error
        delete(&mut catalog, 5, false, &output).unwrap();
        assert_eq!(catalog.books().len(), 1);
    }

    #[test]
    fn test_edit_keeps_untouched_fields() {
        let mut draft = BookDraft::new("Dune", "Herbert").year("1965").tag("SciFi");

        BookEdit {
            title: Some("Dune Messiah".to_string()),
            ..Default::default()
        }
        .apply(&mut draft);

        assert_eq!(draft.title, "Dune Messiah");
        assert_eq!(draft.author, "Herbert");
        assert_eq!(draft.year, "1965");
        assert_eq!(draft.tags, vec!["SciFi"]);
    }

    #[test]
    fn test_edit_tags() {
        let mut draft = BookDraft::new("T", "A").tag("Math").tag("Physics");

        BookEdit {
            add_tags: vec!["Art".to_string()],
            remove_tags: vec![" Math ".to_string()],
            ..Default::default()
        }
        .apply(&mut draft);
        assert_eq!(draft.tags, vec!["Physics", "Art"]);

        BookEdit {
            clear_tags: true,
            add_tags: vec!["Only".to_string()],
            ..Default::default()
        }
        .apply(&mut draft);
        assert_eq!(draft.tags, vec!["Only"]);
    }

    #[test]
    fn test_edit_can_clear_year() {
        let mut draft = BookDraft::new("T", "A").year("2001");
        BookEdit {
            year: Some(String::new()),
            ..Default::default()
        }
        .apply(&mut draft);
        assert!(draft.year.is_empty());
    }
}
