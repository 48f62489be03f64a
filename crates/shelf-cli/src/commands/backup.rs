//! Backup export/import handlers

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use shelf_core::Catalog;

use crate::output::Output;

/// Default backup file name for a given day
pub fn default_backup_name(date: NaiveDate) -> String {
    format!("shelf-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Export books and tags to a JSON document
///
/// `-` writes to stdout.
pub fn export(catalog: &Catalog, path: Option<PathBuf>, output: &Output) -> Result<()> {
    let document = catalog
        .export_backup()
        .context("Failed to serialize backup")?;

    let path = path.unwrap_or_else(|| PathBuf::from(default_backup_name(Local::now().date_naive())));
    if path == Path::new("-") {
        println!("{}", document);
        return Ok(());
    }

    std::fs::write(&path, document)
        .with_context(|| format!("Failed to write backup file: {:?}", path))?;

    output.success(&format!(
        "Exported {} book(s) and {} tag(s) to {}",
        catalog.books().len(),
        catalog.tags().len(),
        path.display()
    ));
    Ok(())
}

/// Replace books and/or tags with the contents of a backup
pub fn import(catalog: &mut Catalog, path: &Path, output: &Output) -> Result<()> {
    let document = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read backup file: {:?}", path))?;

    let summary = catalog
        .import_backup(&document)
        .context("Failed to import backup")?;

    output.print_import(&summary);
    Ok(())
}
