//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::catalog::ItemId;

/// Books command arguments.
#[derive(Debug, Args)]
pub struct BooksCommand {
    /// Only show this genre
    #[arg(short, long)]
    pub genre: Option<String>,

    /// Only show this author
    #[arg(short, long)]
    pub author: Option<String>,

    /// Case-insensitive text to find in titles or authors
    #[arg(short, long)]
    pub search: Option<String>,

    /// Page to show (1-based)
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Mark a book as favorite (repeatable)
    #[arg(long = "favorite", value_name = "ID")]
    pub favorites: Vec<ItemId>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Facets command arguments.
#[derive(Debug, Args)]
pub struct FacetsCommand {
    /// Restrict author options to this genre
    #[arg(short, long)]
    pub genre: Option<String>,

    /// Restrict author options to books matching this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Notes commands.
#[derive(Debug, Subcommand)]
pub enum NotesCommand {
    /// List saved notes, newest first
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Save a new note
    Add {
        /// Note text
        text: String,
    },

    /// Delete a note by id
    Delete {
        /// Note id
        id: i64,
    },

    /// Delete every note
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
