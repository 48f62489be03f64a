//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)
//!
//! Books are shown with 1-based positions; `position(index)` and
//! `commands::book::index_from_position` convert between the two.

use serde_json::json;

use shelf_core::{Book, ImportSummary, SortState, TagStore, TagUsage, VisibleBook};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print a single book, with the palette color of each tag
    pub fn print_book(&self, index: usize, book: &Book, palette: &TagStore) {
        match self.format {
            OutputFormat::Human => {
                println!("Position: {}", position(index));
                println!("Title:    {}", book.title);
                println!("Author:   {}", book.author);
                if !book.year.is_empty() {
                    println!("Year:     {}", book.year);
                }
                if !book.link.is_empty() {
                    println!("Link:     {}", book.link);
                }
                if !book.tags.is_empty() {
                    println!("Tags:     {}", tag_labels(&book.tags, palette));
                }
            }
            OutputFormat::Json => {
                let mut value = book_json(index, book);
                let colors: serde_json::Map<_, _> = book
                    .tags
                    .iter()
                    .map(|t| (t.clone(), json!(palette.color_of(t))))
                    .collect();
                value["tag_colors"] = json!(colors);
                print_json(&value);
            }
            OutputFormat::Quiet => {
                println!("{}", position(index));
            }
        }
    }

    /// Print the visible books
    pub fn print_books(&self, rows: &[VisibleBook<'_>], total: usize) {
        match self.format {
            OutputFormat::Human => {
                if rows.is_empty() {
                    println!("No books found.");
                    return;
                }
                for row in rows {
                    let year = row.book.year.to_string();
                    println!(
                        "{:>4} | {} | {} | {}{}",
                        position(row.index),
                        truncate(&row.book.title, 35),
                        truncate(&row.book.author, 20),
                        if year.is_empty() { "-" } else { year.as_str() },
                        tags_suffix(&row.book.tags)
                    );
                }
                if rows.len() == total {
                    println!("\n{} book(s)", total);
                } else {
                    println!("\n{} of {} book(s)", rows.len(), total);
                }
            }
            OutputFormat::Json => {
                let books: Vec<_> = rows.iter().map(|r| book_json(r.index, r.book)).collect();
                print_json(&json!(books));
            }
            OutputFormat::Quiet => {
                for row in rows {
                    println!("{}", position(row.index));
                }
            }
        }
    }

    /// Print tags with their usage counts
    pub fn print_tags(&self, tags: &[TagUsage<'_>]) {
        match self.format {
            OutputFormat::Human => {
                if tags.is_empty() {
                    println!("No tags found.");
                    return;
                }
                for usage in tags {
                    println!(
                        "{} ({}) [{}]",
                        usage.tag.name, usage.count, usage.tag.color
                    );
                }
                println!("\n{} tag(s)", tags.len());
            }
            OutputFormat::Json => {
                let json_tags: Vec<_> = tags
                    .iter()
                    .map(|u| json!({"name": u.tag.name, "color": u.tag.color, "count": u.count}))
                    .collect();
                print_json(&json!(json_tags));
            }
            OutputFormat::Quiet => {
                for usage in tags {
                    println!("{}", usage.tag.name);
                }
            }
        }
    }

    /// Print distinct authors and years
    pub fn print_facets(&self, authors: &[String], years: &[String]) {
        match self.format {
            OutputFormat::Human => {
                println!("Authors:");
                for author in authors {
                    println!("  {}", author);
                }
                println!();
                println!("Years:");
                for year in years {
                    println!("  {}", year);
                }
            }
            OutputFormat::Json => {
                print_json(&json!({"authors": authors, "years": years}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print the sort state after a sort
    pub fn print_sort(&self, state: SortState) {
        let key = state.key.map(|k| k.to_string()).unwrap_or_default();
        let order = match state.order {
            shelf_core::SortOrder::Ascending => "ascending",
            shelf_core::SortOrder::Descending => "descending",
        };
        match self.format {
            OutputFormat::Human => println!("✓ Sorted by {} ({})", key, order),
            OutputFormat::Json => print_json(&json!({"key": key, "order": order})),
            OutputFormat::Quiet => {}
        }
    }

    /// Print what an import replaced
    pub fn print_import(&self, summary: &ImportSummary) {
        match self.format {
            OutputFormat::Human => {
                println!("✓ Backup imported");
                match summary.books {
                    Some(n) => println!("  Books: {} (replaced)", n),
                    None => println!("  Books: unchanged"),
                }
                match summary.tags {
                    Some(n) => println!("  Tags:  {} (replaced)", n),
                    None => println!("  Tags:  unchanged"),
                }
                if summary.created_tags > 0 {
                    println!("  Added {} tag(s) referenced by books", summary.created_tags);
                }
            }
            OutputFormat::Json => print_json(&json!({
                "status": "success",
                "books": summary.books,
                "tags": summary.tags,
                "created_tags": summary.created_tags
            })),
            OutputFormat::Quiet => {}
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!("{}", json!({"status": "success", "message": message}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// 1-based position shown to users
pub fn position(index: usize) -> usize {
    index + 1
}

fn book_json(index: usize, book: &Book) -> serde_json::Value {
    json!({
        "position": position(index),
        "title": book.title,
        "author": book.author,
        "year": book.year,
        "link": book.link,
        "tags": book.tags,
    })
}

fn print_json(value: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    );
}

/// "Math (green), Physics (red)"
fn tag_labels(tags: &[String], palette: &TagStore) -> String {
    tags.iter()
        .map(|t| format!("{} ({})", t, palette.color_of(t)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn tags_suffix(tags: &[String]) -> String {
    if tags.is_empty() {
        String::new()
    } else {
        format!(" | {}", tags.join(", "))
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
