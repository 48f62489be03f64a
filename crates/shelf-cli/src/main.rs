//! SHELF CLI
//!
//! Command-line interface for SHELF - a catalog of books and colored tags.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use shelf_core::{BookDraft, Catalog, CatalogError, Config, Filter, SortKey, StorageError};

mod commands;
mod output;
mod prompt;

use commands::book::BookEdit;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "SHELF - A catalog of books with colored tags")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use an alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage books
    Book {
        #[command(subcommand)]
        command: BookCommands,
    },
    /// Manage tags
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },
    /// Export books and tags to a JSON backup
    Export {
        /// Output file ("-" for stdout); defaults to shelf-backup-<date>.json
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace books and/or tags from a JSON backup
    Import {
        /// Backup file
        path: PathBuf,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum BookCommands {
    /// Add a book
    #[command(alias = "create")]
    Add {
        #[arg(short = 'T', long)]
        title: String,
        #[arg(short, long)]
        author: String,
        #[arg(short, long, default_value = "")]
        year: String,
        #[arg(short, long, default_value = "")]
        link: String,
        /// Tags to attach (created if missing)
        #[arg(short, long)]
        tag: Vec<String>,
    },
    /// List books, optionally filtered
    #[command(alias = "ls")]
    List {
        /// Free-text search over title, author and tags
        #[arg(short = 's', long, default_value = "")]
        query: String,
        /// Exact author
        #[arg(short, long, default_value = "")]
        author: String,
        /// Exact year
        #[arg(short, long, default_value = "")]
        year: String,
        /// Required tags (all must match)
        #[arg(short, long)]
        tag: Vec<String>,
    },
    /// Show one book
    Show {
        /// Position as shown by `book list`
        position: usize,
    },
    /// Edit a book
    Edit {
        /// Position as shown by `book list`
        position: usize,
        #[arg(short = 'T', long)]
        title: Option<String>,
        #[arg(short, long)]
        author: Option<String>,
        #[arg(short, long)]
        year: Option<String>,
        #[arg(short, long)]
        link: Option<String>,
        /// Add a tag
        #[arg(short, long)]
        tag: Vec<String>,
        /// Remove a tag
        #[arg(long)]
        untag: Vec<String>,
        /// Remove all tags before applying --tag
        #[arg(long)]
        clear_tags: bool,
    },
    /// Delete a book
    #[command(alias = "rm")]
    Delete {
        /// Position as shown by `book list`
        position: usize,
    },
    /// Reorder books by a field
    Sort {
        /// title, author, year, link or tags
        key: SortKey,
        /// Sort descending
        #[arg(long)]
        desc: bool,
    },
    /// Show distinct authors and years
    Facets,
}

#[derive(Subcommand)]
enum TagCommands {
    /// List tags with usage counts
    #[command(alias = "ls")]
    List,
    /// Add a tag
    Add { name: String },
    /// Delete a tag and remove it from every book
    #[command(alias = "rm")]
    Delete { name: String },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, log_file, confirm_deletes)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    let result = run(cli, &output);
    if let Err(e) = &result {
        if let Some(hint) = recovery_hint(e) {
            eprintln!("Hint: {}", hint);
        }
    }
    result
}

fn run(cli: Cli, output: &Output) -> Result<()> {
    // Config commands don't need the catalog
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    init_logging(&config);

    let mut catalog = Catalog::open_with_config(&config)?;

    let is_write = is_write_command(&cli.command);

    let result = match cli.command {
        Commands::Book { command } => handle_book_command(command, &mut catalog, &config, output),
        Commands::Tag { command } => handle_tag_command(command, &mut catalog, &config, output),
        Commands::Export { output: path } => commands::backup::export(&catalog, path, output),
        Commands::Import { path } => commands::backup::import(&mut catalog, &path, output),
        Commands::Config { .. } => unreachable!(), // Handled above
    };
    result?;

    if is_write {
        catalog.close().context("Failed to save catalog")?;
    }
    Ok(())
}

/// Commands that change the catalog
fn is_write_command(command: &Commands) -> bool {
    matches!(
        command,
        Commands::Book {
            command: BookCommands::Add { .. }
                | BookCommands::Edit { .. }
                | BookCommands::Delete { .. }
                | BookCommands::Sort { .. }
        } | Commands::Tag {
            command: TagCommands::Add { .. } | TagCommands::Delete { .. }
        } | Commands::Import { .. }
    )
}

/// Suggestion attached to a catalog error anywhere in the chain
fn recovery_hint(error: &anyhow::Error) -> Option<&'static str> {
    error.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<CatalogError>() {
            e.recovery_suggestion()
        } else {
            cause
                .downcast_ref::<StorageError>()
                .and_then(StorageError::recovery_suggestion)
        }
    })
}

fn handle_book_command(
    command: BookCommands,
    catalog: &mut Catalog,
    config: &Config,
    output: &Output,
) -> Result<()> {
    match command {
        BookCommands::Add {
            title,
            author,
            year,
            link,
            tag,
        } => {
            let draft = BookDraft {
                title,
                author,
                year,
                link,
                tags: tag,
            };
            commands::book::add(catalog, draft, output)
        }
        BookCommands::List {
            query,
            author,
            year,
            tag,
        } => {
            let filter = Filter {
                query,
                author,
                year,
                tags: tag,
            };
            commands::book::list(catalog, &filter, output)
        }
        BookCommands::Show { position } => commands::book::show(catalog, position, output),
        BookCommands::Edit {
            position,
            title,
            author,
            year,
            link,
            tag,
            untag,
            clear_tags,
        } => {
            let edit = BookEdit {
                title,
                author,
                year,
                link,
                add_tags: tag,
                remove_tags: untag,
                clear_tags,
            };
            commands::book::edit(catalog, position, edit, output)
        }
        BookCommands::Delete { position } => {
            commands::book::delete(catalog, position, config.confirm_deletes, output)
        }
        BookCommands::Sort { key, desc } => commands::book::sort(catalog, key, desc, output),
        BookCommands::Facets => commands::book::facets(catalog, output),
    }
}

fn handle_tag_command(
    command: TagCommands,
    catalog: &mut Catalog,
    config: &Config,
    output: &Output,
) -> Result<()> {
    match command {
        TagCommands::List => commands::tag::list(catalog, output),
        TagCommands::Add { name } => commands::tag::add(catalog, &name, output),
        TagCommands::Delete { name } => {
            commands::tag::delete(catalog, &name, config.confirm_deletes, output)
        }
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize file logging when SHELF_LOG is set
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("SHELF_LOG") else {
        return;
    };

    let log_path = config.log_path();
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!("shelf_core={},shelf_cli={}", log_level, log_level));

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("Logging initialized to {:?}", log_path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sort_key() {
        let cli = Cli::try_parse_from(["shelf", "book", "sort", "year", "--desc"]).unwrap();
        match cli.command {
            Commands::Book {
                command: BookCommands::Sort { key, desc },
            } => {
                assert_eq!(key, SortKey::Year);
                assert!(desc);
            }
            _ => panic!("expected book sort"),
        }

        assert!(Cli::try_parse_from(["shelf", "book", "sort", "color"]).is_err());
    }

    #[test]
    fn test_parse_book_add() {
        let cli = Cli::try_parse_from([
            "shelf", "book", "add", "--title", "Dune", "--author", "Herbert", "-t", "SciFi",
        ])
        .unwrap();
        match cli.command {
            Commands::Book {
                command: BookCommands::Add { title, author, year, tag, .. },
            } => {
                assert_eq!(title, "Dune");
                assert_eq!(author, "Herbert");
                assert!(year.is_empty());
                assert_eq!(tag, vec!["SciFi"]);
            }
            _ => panic!("expected book add"),
        }
    }

    #[test]
    fn test_write_commands() {
        let parse = |args: &[&str]| Cli::try_parse_from(args).unwrap().command;

        assert!(is_write_command(&parse(&["shelf", "book", "delete", "1"])));
        assert!(is_write_command(&parse(&["shelf", "tag", "add", "Art"])));
        assert!(is_write_command(&parse(&["shelf", "import", "b.json"])));
        assert!(!is_write_command(&parse(&["shelf", "book", "list"])));
        assert!(!is_write_command(&parse(&["shelf", "tag", "list"])));
        assert!(!is_write_command(&parse(&["shelf", "export"])));
    }

    #[test]
    fn test_recovery_hint_found_through_context() {
        let corrupt = StorageError::Corrupt {
            key: "books".to_string(),
            details: "eof".to_string(),
        };
        let err = anyhow::Error::new(CatalogError::from(corrupt)).context("Failed to add book");
        assert!(recovery_hint(&err).unwrap().contains("shelf import"));

        let plain = anyhow::anyhow!("No book at position 3");
        assert!(recovery_hint(&plain).is_none());
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["shelf", "tag", "list", "--json"]).unwrap();
        assert!(cli.json);
        assert!(!cli.quiet);
    }
}
