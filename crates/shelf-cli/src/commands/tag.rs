//! Tag command handlers

use anyhow::{Context, Result};

use shelf_core::{Catalog, Ensured, TagDeletion};

use crate::output::Output;
use crate::prompt::{approve_delete, confirm};

/// List all tags with usage counts
pub fn list(catalog: &Catalog, output: &Output) -> Result<()> {
    output.print_tags(&catalog.tag_usage());
    Ok(())
}

/// Add a tag to the palette
pub fn add(catalog: &mut Catalog, name: &str, output: &Output) -> Result<()> {
    match catalog.ensure_tag(name).context("Failed to add tag")? {
        Some(Ensured::Created(tag)) => {
            output.success(&format!("Created tag: {} [{}]", tag.name, tag.color))
        }
        Some(Ensured::Existing(tag)) => {
            output.message(&format!("Tag already exists: {} [{}]", tag.name, tag.color))
        }
        None => anyhow::bail!("Tag name cannot be empty"),
    }
    Ok(())
}

/// Delete a tag and strip it from every book
pub fn delete(
    catalog: &mut Catalog,
    name: &str,
    confirm_deletes: bool,
    output: &Output,
) -> Result<()> {
    let Some(plan) = catalog.plan_tag_deletion(name) else {
        output.message(&format!("No tag named '{}'.", name));
        return Ok(());
    };

    let notice = deletion_notice(&plan);
    if !approve_delete(&notice, confirm_deletes, output, || confirm("Are you sure?"))? {
        return Ok(());
    }

    if let Some(deleted) = catalog.delete_tag(name).context("Failed to delete tag")? {
        output.success(&format!(
            "Deleted tag: {} (removed from {} book(s))",
            deleted.name, deleted.affected_books
        ));
    }

    Ok(())
}

fn deletion_notice(plan: &TagDeletion) -> String {
    if plan.affected_books == 0 {
        format!("Delete tag: {}", plan.name)
    } else {
        format!(
            "Delete tag: {}\nIt will be removed from {} book(s).",
            plan.name, plan.affected_books
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use shelf_core::{BookDraft, MemoryStore};

    #[test]
    fn test_deletion_notice_mentions_affected_books() {
        let unused = TagDeletion {
            name: "Art".to_string(),
            affected_books: 0,
        };
        assert_eq!(deletion_notice(&unused), "Delete tag: Art");

        let used = TagDeletion {
            name: "Math".to_string(),
            affected_books: 2,
        };
        assert!(deletion_notice(&used).ends_with("removed from 2 book(s)."));
    }

    #[test]
    fn test_delete_strips_tag_from_books() {
        let mut catalog = Catalog::open_with_storage(MemoryStore::new()).unwrap();
        catalog
            .add_book(&BookDraft::new("Algebra", "A").tag("Math"))
            .unwrap();

        let output = Output::new(OutputFormat::Json);
        delete(&mut catalog, "Math", true, &output).unwrap();

        assert!(!catalog.tag_store().contains("Math"));
        assert!(catalog.books()[0].tags.is_empty());

        // Unknown names are a no-op
        delete(&mut catalog, "Math", true, &output).unwrap();
    }

    #[test]
    fn test_add_rejects_empty_name() {
        let mut catalog = Catalog::open_with_storage(MemoryStore::new()).unwrap();
        let output = Output::new(OutputFormat::Quiet);

        add(&mut catalog, "History", &output).unwrap();
        assert!(catalog.tag_store().contains("History"));
        assert!(add(&mut catalog, "   ", &output).is_err());
    }
}
