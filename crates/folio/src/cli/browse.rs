//! Line-oriented interactive browsing.

use std::io::{BufRead, Write};
use std::str::FromStr;

use tracing::debug;

use super::commands::OutputFormat;
use super::render::{render_books, BooksReport};
use crate::catalog::{BrowseSession, ItemId};
use crate::error::Result;

const HELP: &str = "\
Commands:
  genre [NAME]     filter by genre (no name clears)
  author [NAME]    filter by author (no name clears)
  search [TEXT]    set search text, or rerun the current search
  page N           go to page N
  next | prev      move one page
  fav ID           toggle a favorite
  favs             list favorite ids
  show             redraw the results
  help             show this help
  quit             leave";

/// One line of input to the browse loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseInput {
    /// Set or clear the genre.
    Genre(String),
    /// Set or clear the author.
    Author(String),
    /// Set the search text.
    Search(String),
    /// Rerun the search with the current text.
    Rerun,
    /// Jump to a page.
    Page(usize),
    /// Next page.
    Next,
    /// Previous page.
    Prev,
    /// Toggle a favorite.
    Fav(ItemId),
    /// List favorites.
    Favs,
    /// Redraw.
    Show,
    /// Print the command list.
    Help,
    /// Leave the loop.
    Quit,
}

impl FromStr for BrowseInput {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let input = match word.to_ascii_lowercase().as_str() {
            "genre" => Self::Genre(rest.to_string()),
            "author" => Self::Author(rest.to_string()),
            "search" if rest.is_empty() => Self::Rerun,
            "search" => Self::Search(rest.to_string()),
            "page" => Self::Page(
                rest.parse()
                    .map_err(|_| format!("not a page number: {rest:?}"))?,
            ),
            "next" | "n" => Self::Next,
            "prev" | "p" => Self::Prev,
            "fav" => Self::Fav(rest.parse().map_err(|_| format!("not a book id: {rest:?}"))?),
            "favs" => Self::Favs,
            "show" | "" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(format!("unknown command: {other} (try 'help')")),
        };
        Ok(input)
    }
}

/// Read commands from `input` until `quit` or end of input, redrawing the
/// results after each one.
///
/// # Errors
///
/// Returns an error if reading or writing fails.
pub fn run_browse(
    session: &mut BrowseSession,
    placeholder_cover: &str,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    draw(session, placeholder_cover, out)?;
    write!(out, "> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        match line.parse::<BrowseInput>() {
            Ok(BrowseInput::Quit) => break,
            Ok(BrowseInput::Help) => writeln!(out, "{HELP}")?,
            Ok(BrowseInput::Favs) => {
                let ids: Vec<String> = session.favorites().ids().iter().map(ToString::to_string).collect();
                if ids.is_empty() {
                    writeln!(out, "No favorites yet")?;
                } else {
                    writeln!(out, "Favorites: {}", ids.join(", "))?;
                }
            }
            Ok(command) => {
                debug!(?command, "Browse command");
                apply(session, command);
                draw(session, placeholder_cover, out)?;
            }
            Err(message) => writeln!(out, "{message}")?,
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}

fn apply(session: &mut BrowseSession, command: BrowseInput) {
    match command {
        BrowseInput::Genre(genre) => session.set_category(genre),
        BrowseInput::Author(author) => session.set_author(author),
        BrowseInput::Search(text) => session.set_search(text),
        BrowseInput::Rerun => session.search(),
        BrowseInput::Page(page) => session.goto_page(page),
        BrowseInput::Next => session.next_page(),
        BrowseInput::Prev => session.prev_page(),
        BrowseInput::Fav(id) => {
            session.toggle_favorite(id);
        }
        BrowseInput::Favs | BrowseInput::Show | BrowseInput::Help | BrowseInput::Quit => {}
    }
}

fn draw(session: &BrowseSession, placeholder_cover: &str, out: &mut impl Write) -> Result<()> {
    let report = BooksReport::from_session(session, placeholder_cover);
    render_books(out, &report, OutputFormat::Plain)
}
