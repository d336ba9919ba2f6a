//! Command-line interface for folio.
//!
//! This module provides the CLI structure, output rendering and the
//! interactive browse loop for the `folio` binary.

mod browse;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use browse::{run_browse, BrowseInput};
pub use commands::{
    BooksCommand, ConfigCommand, FacetsCommand, NotesCommand, OutputFormat, StatusCommand,
};
pub use render::{render_books, render_controls, render_facets, render_notes, BooksReport};

/// folio - Browse a book catalog and keep dictated notes
///
/// Filters a catalog by genre, author and free text, pages through the
/// results, and stores short notes in a local database.
#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List books matching the given filters
    Books(BooksCommand),

    /// Show genre and author options
    Facets(FacetsCommand),

    /// Browse the catalog interactively
    Browse,

    /// Manage saved notes
    #[command(subcommand)]
    Notes(NotesCommand),

    /// Show catalog, notes and capability status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}
