//! `folio` - CLI for browsing a book catalog and keeping notes
//!
//! This binary loads the configured catalog, renders filtered listings, runs
//! an interactive browse loop, and manages notes in the local database.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;

use folio::capability::Capabilities;
use folio::catalog::{self, BrowseSession, LoadStatus, LoadedCatalog};
use folio::cli::{
    self, BooksCommand, BooksReport, Cli, Command, ConfigCommand, FacetsCommand, NotesCommand,
};
use folio::notes::{NotesSession, SqliteNoteStore};
use folio::{init_logging, Config, Error, Storage};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    // Execute the command
    match cli.command {
        Command::Books(books_cmd) => handle_books(&config, &books_cmd),
        Command::Facets(facets_cmd) => handle_facets(&config, &facets_cmd),
        Command::Browse => handle_browse(&config),
        Command::Notes(notes_cmd) => handle_notes(&config, notes_cmd),
        Command::Status(status_cmd) => handle_status(&config, status_cmd.json),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn load_catalog(config: &Config) -> anyhow::Result<LoadedCatalog> {
    let location = config.catalog_source();
    let source = catalog::source_for(&location, &config.catalog);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    Ok(runtime.block_on(catalog::load_catalog(source.as_ref())))
}

fn open_session(config: &Config) -> anyhow::Result<BrowseSession> {
    let loaded = load_catalog(config)?;
    if let LoadStatus::Failed { reason } = &loaded.status {
        eprintln!("Could not load the catalog: {reason}");
    }
    Ok(BrowseSession::new(loaded.catalog, config.catalog.page_size))
}

fn handle_books(config: &Config, cmd: &BooksCommand) -> anyhow::Result<()> {
    let mut session = open_session(config)?;

    session.set_category(cmd.genre.clone().unwrap_or_default());
    session.set_author(cmd.author.clone().unwrap_or_default());
    session.set_search(cmd.search.clone().unwrap_or_default());
    session.goto_page(cmd.page);
    for &id in &cmd.favorites {
        session.toggle_favorite(id);
    }

    let report = BooksReport::from_session(&session, &config.catalog.placeholder_cover);
    let mut out = io::stdout().lock();
    cli::render_books(&mut out, &report, cmd.format)?;
    Ok(())
}

fn handle_facets(config: &Config, cmd: &FacetsCommand) -> anyhow::Result<()> {
    let mut session = open_session(config)?;
    session.set_category(cmd.genre.clone().unwrap_or_default());
    session.set_search(cmd.search.clone().unwrap_or_default());

    let view = session.view();
    let mut out = io::stdout().lock();
    cli::render_facets(
        &mut out,
        session.catalog().genres(),
        &view.available_authors,
        cmd.json,
    )?;
    Ok(())
}

fn handle_browse(config: &Config) -> anyhow::Result<()> {
    let mut session = open_session(config)?;
    let stdin = io::stdin().lock();
    let mut out = io::stdout().lock();
    cli::run_browse(
        &mut session,
        &config.catalog.placeholder_cover,
        stdin,
        &mut out,
    )?;
    Ok(())
}

fn open_notes(config: &Config) -> anyhow::Result<NotesSession<SqliteNoteStore>> {
    let path = config.notes_database_path();
    let storage = Storage::open(&path)
        .with_context(|| format!("opening notes database {}", path.display()))?;
    let store = SqliteNoteStore::new(storage, config.notes.storage_key.clone());
    Ok(NotesSession::open(store)?)
}

fn handle_notes(config: &Config, cmd: NotesCommand) -> anyhow::Result<()> {
    let mut notes = open_notes(config)?;
    let mut out = io::stdout().lock();

    match cmd {
        NotesCommand::List { json } => cli::render_notes(&mut out, notes.notes(), json)?,
        NotesCommand::Add { text } => {
            notes.set_input(text);
            match notes.save_note() {
                Ok(note) => writeln!(out, "Saved {} [{}]", note.title, note.id)?,
                Err(Error::EmptyNote) => {
                    anyhow::bail!("Please add some content to save!");
                }
                Err(e) => return Err(e.into()),
            }
        }
        NotesCommand::Delete { id } => {
            if notes.delete_note(id)? {
                writeln!(out, "Deleted note {id}")?;
            } else {
                writeln!(out, "No note with id {id}")?;
            }
        }
        NotesCommand::Clear { yes } => {
            if yes {
                let count = notes.notes().len();
                notes.clear_all()?;
                writeln!(out, "Deleted {count} notes")?;
            } else {
                writeln!(out, "This will delete all {} notes.", notes.notes().len())?;
                writeln!(out, "Use --yes to confirm.")?;
            }
        }
    }
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let location = config.catalog_source();
    let loaded = load_catalog(config)?;
    let (catalog_state, catalog_error) = match &loaded.status {
        LoadStatus::Loaded => ("loaded", None),
        LoadStatus::Failed { reason } => ("failed", Some(reason.as_str())),
    };

    let notes_path = config.notes_database_path();
    let notes = open_notes(config)?;
    let stats = notes.store().storage().stats()?;
    let capabilities = Capabilities::from_config(&config.capabilities);

    let mut out = io::stdout().lock();
    if json {
        let status = serde_json::json!({
            "catalog": {
                "source": location,
                "state": catalog_state,
                "error": catalog_error,
                "books": loaded.catalog.len(),
                "genres": loaded.catalog.genres().len(),
            },
            "notes": {
                "database_path": notes_path,
                "key": config.notes.storage_key,
                "count": notes.notes().len(),
                "db_size_bytes": stats.db_size_bytes,
            },
            "capabilities": capabilities,
            "advisory": capabilities.advisory(),
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&status)?)?;
    } else {
        writeln!(out, "folio status")?;
        writeln!(out, "------------")?;
        writeln!(out, "Catalog:       {location}")?;
        match catalog_error {
            None => writeln!(
                out,
                "               {} books, {} genres",
                loaded.catalog.len(),
                loaded.catalog.genres().len()
            )?,
            Some(reason) => writeln!(out, "               failed: {reason}")?,
        }
        writeln!(out, "Notes:         {}", notes_path.display())?;
        writeln!(out, "               {} notes", notes.notes().len())?;
        writeln!(out, "Speech:        {}", capabilities.speech)?;
        writeln!(out, "Audio:         {}", capabilities.audio)?;
        if let Some(advisory) = capabilities.advisory() {
            writeln!(out)?;
            writeln!(out, "{advisory}")?;
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(config)?)?;
            } else {
                writeln!(out, "Current Configuration")?;
                writeln!(out, "=====================")?;
                writeln!(out)?;
                writeln!(out, "[Catalog]")?;
                writeln!(out, "  Source:             {}", config.catalog_source())?;
                writeln!(out, "  Page size:          {}", config.catalog.page_size)?;
                writeln!(out, "  Placeholder cover:  {}", config.catalog.placeholder_cover)?;
                writeln!(out, "  CSV max rows:       {}", config.catalog.csv_max_rows)?;
                writeln!(out)?;
                writeln!(out, "[Notes]")?;
                writeln!(
                    out,
                    "  Database path:      {}",
                    config.notes_database_path().display()
                )?;
                writeln!(out, "  Storage key:        {}", config.notes.storage_key)?;
                writeln!(out)?;
                writeln!(out, "[Capabilities]")?;
                writeln!(out, "  Speech:             {}", config.capabilities.speech)?;
                writeln!(out, "  Audio:              {}", config.capabilities.audio)?;
            }
        }
        ConfigCommand::Path => {
            writeln!(out, "{}", Config::default_config_path().display())?;
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            writeln!(out, "Validating configuration: {}", path.display())?;
            match Config::load_from(Some(path)) {
                Ok(_) => writeln!(out, "Configuration is valid.")?,
                Err(e) => writeln!(out, "Configuration error: {e}")?,
            }
        }
    }
    Ok(())
}
