//! Text and JSON rendering for CLI output.

use std::io::Write;

use serde_json::{json, Value};

use super::commands::OutputFormat;
use crate::catalog::view::{BOOK_OF_THE_DAY, FAVORITES_PANEL, RESULT_CARD};
use crate::catalog::{
    BrowseSession, BrowseView, FavoritesPreview, FavoritesSet, FilterState, Item, PageControls,
    PageLink, PREVIEW_LIMIT,
};
use crate::error::Result;
use crate::notes::Note;

/// Everything the books listing shows.
#[derive(Debug)]
pub struct BooksReport<'a> {
    /// Active filters.
    pub filter: &'a FilterState,
    /// Results area for the current filters.
    pub view: BrowseView<'a>,
    /// Favorites panel.
    pub favorites: FavoritesPreview<'a>,
    /// All favorite ids, for marking result rows.
    pub favorite_ids: &'a FavoritesSet,
    /// First item of the catalog.
    pub book_of_the_day: Option<&'a Item>,
    /// Cover shown for items without one.
    pub placeholder_cover: &'a str,
}

impl<'a> BooksReport<'a> {
    /// Snapshot the current state of `session`.
    #[must_use]
    pub fn from_session(session: &'a BrowseSession, placeholder_cover: &'a str) -> Self {
        Self {
            filter: session.filter(),
            view: session.view(),
            favorites: session.favorites().preview(session.catalog(), PREVIEW_LIMIT),
            favorite_ids: session.favorites(),
            book_of_the_day: session.catalog().book_of_the_day(),
            placeholder_cover,
        }
    }
}

/// Write the books listing in the requested format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn render_books(out: &mut impl Write, report: &BooksReport<'_>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&books_json(report))?)?;
        }
        OutputFormat::Plain => render_books_plain(out, report)?,
        OutputFormat::Table => render_books_table(out, report)?,
    }
    Ok(())
}

fn item_json(item: &Item, report: &BooksReport<'_>) -> Value {
    json!({
        "id": item.id,
        "isbn": item.isbn,
        "title": item.title,
        "author": item.author,
        "genre": item.category,
        "cover": item.cover_or(report.placeholder_cover),
        "rating": item.rating_text,
        "favorite": report.favorite_ids.contains(item.id),
    })
}

fn books_json(report: &BooksReport<'_>) -> Value {
    let view = &report.view;
    json!({
        "total": view.matched_count(),
        "page": view.page_index,
        "page_count": view.page_count,
        "items": view.page_items().iter().map(|item| item_json(item, report)).collect::<Vec<_>>(),
        "available_authors": view.available_authors,
        "controls": view.controls,
        "book_of_the_day": report.book_of_the_day.map(|item| item_json(item, report)),
        "favorites": report.favorite_ids.ids(),
    })
}

fn favorite_marker(report: &BooksReport<'_>, item: &Item) -> char {
    if report.favorite_ids.contains(item.id) {
        '*'
    } else {
        ' '
    }
}

fn render_books_plain(out: &mut impl Write, report: &BooksReport<'_>) -> Result<()> {
    if let Some(item) = report.book_of_the_day {
        writeln!(
            out,
            "Book of the day: {} by {}",
            BOOK_OF_THE_DAY.title(&item.title),
            BOOK_OF_THE_DAY.author(&item.author)
        )?;
        writeln!(out)?;
    }

    let view = &report.view;
    if view.page_items().is_empty() {
        writeln!(out, "No books found.")?;
    }
    for item in view.page_items() {
        writeln!(
            out,
            "{} #{:<4} {} by {} ({})",
            favorite_marker(report, item),
            item.id,
            RESULT_CARD.title(&item.title),
            RESULT_CARD.author(&item.author),
            item.category
        )?;
    }

    render_footer(out, report)
}

fn render_books_table(out: &mut impl Write, report: &BooksReport<'_>) -> Result<()> {
    let title_width = RESULT_CARD.title + 3;
    let author_width = RESULT_CARD.author + 3;

    writeln!(
        out,
        "{:<2}{:<6}{:<title_width$}  {:<author_width$}  {:<16}{}",
        "", "ID", "TITLE", "AUTHOR", "GENRE", "RATING"
    )?;
    writeln!(out, "{}", "-".repeat(2 + 6 + title_width + 2 + author_width + 2 + 16 + 6))?;

    for item in report.view.page_items() {
        writeln!(
            out,
            "{:<2}{:<6}{:<title_width$}  {:<author_width$}  {:<16}{}",
            favorite_marker(report, item),
            item.id,
            RESULT_CARD.title(&item.title),
            RESULT_CARD.author(&item.author),
            item.category,
            item.rating_text.as_deref().unwrap_or("")
        )?;
    }

    render_footer(out, report)
}

fn describe_filter(filter: &FilterState) -> String {
    let mut parts = Vec::new();
    if !filter.category.is_empty() {
        parts.push(format!("genre={}", filter.category));
    }
    if !filter.author.is_empty() {
        parts.push(format!("author={}", filter.author));
    }
    if !filter.search_text.trim().is_empty() {
        parts.push(format!("search={:?}", filter.search_text));
    }
    parts.join(", ")
}

fn render_footer(out: &mut impl Write, report: &BooksReport<'_>) -> Result<()> {
    let view = &report.view;
    writeln!(out)?;
    writeln!(
        out,
        "Page {} of {} ({} books)",
        view.page_index,
        view.page_count,
        view.matched_count()
    )?;
    if !report.filter.is_unconstrained() {
        writeln!(out, "Filters: {}", describe_filter(report.filter))?;
    }
    if let Some(controls) = &view.controls {
        writeln!(out, "{}", render_controls(controls, view.page_index))?;
    }

    if !report.favorite_ids.is_empty() {
        writeln!(out)?;
        writeln!(out, "Favorites:")?;
        for item in &report.favorites.shown {
            writeln!(
                out,
                "  {} by {}",
                FAVORITES_PANEL.title(&item.title),
                FAVORITES_PANEL.author(&item.author)
            )?;
        }
        if report.favorites.overflow > 0 {
            writeln!(out, "  +{} more favorites", report.favorites.overflow)?;
        }
    }
    Ok(())
}

/// One-line pagination bar, e.g. `< Prev  1 ... 4 [5] 6 ... 9  Next >`.
///
/// Disabled buttons are drawn in parentheses.
#[must_use]
pub fn render_controls(controls: &PageControls, current: usize) -> String {
    let prev = if controls.prev_enabled { "< Prev" } else { "(< Prev)" };
    let next = if controls.next_enabled { "Next >" } else { "(Next >)" };

    let links: Vec<String> = controls
        .links
        .iter()
        .map(|link| match link {
            PageLink::Page(n) if *n == current => format!("[{n}]"),
            PageLink::Page(n) => n.to_string(),
            PageLink::Gap => "...".to_string(),
        })
        .collect();

    format!("{prev}  {}  {next}", links.join(" "))
}

/// Write genre and author options.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn render_facets(
    out: &mut impl Write,
    genres: &[String],
    authors: &[&str],
    as_json: bool,
) -> Result<()> {
    if as_json {
        let value = json!({ "genres": genres, "authors": authors });
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        return Ok(());
    }

    writeln!(out, "Genres:")?;
    for genre in genres {
        writeln!(out, "  {genre}")?;
    }
    writeln!(out)?;
    writeln!(out, "Authors:")?;
    for author in authors {
        writeln!(out, "  {author}")?;
    }
    Ok(())
}

/// Write saved notes, newest first.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn render_notes(out: &mut impl Write, notes: &[Note], as_json: bool) -> Result<()> {
    if as_json {
        writeln!(out, "{}", serde_json::to_string_pretty(notes)?)?;
        return Ok(());
    }

    if notes.is_empty() {
        writeln!(out, "No notes yet")?;
        return Ok(());
    }
    for note in notes {
        writeln!(out, "{} [{}] {}", note.title, note.id, note.timestamp)?;
        writeln!(out, "  {}", note.content)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{page_controls, Catalog};

    fn session() -> BrowseSession {
        let items = (1..=10)
            .map(|id| {
                Item::new(
                    id,
                    format!("Title {id}"),
                    format!("Author {id}"),
                    if id <= 4 { "Fantasy" } else { "Fiction" },
                )
            })
            .collect();
        BrowseSession::new(Catalog::new(items), 8)
    }

    fn render(session: &BrowseSession, format: OutputFormat) -> String {
        let report = BooksReport::from_session(session, "/covers/placeholder.jpg");
        let mut out = Vec::new();
        render_books(&mut out, &report, format).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_render_controls() {
        let controls = page_controls(5, 9).unwrap();
        assert_eq!(
            render_controls(&controls, 5),
            "< Prev  1 ... 3 4 [5] 6 7 ... 9  Next >"
        );

        let controls = page_controls(1, 2).unwrap();
        assert_eq!(render_controls(&controls, 1), "(< Prev)  [1] 2  Next >");
    }

    #[test]
    fn test_plain_listing() {
        let mut session = session();
        session.toggle_favorite(2);
        let text = render(&session, OutputFormat::Plain);

        assert!(text.starts_with("Book of the day: Title 1 by Author 1"));
        assert!(text.contains("* #2    Title 2 by Author 2 (Fantasy)"));
        assert!(text.contains("Page 1 of 2 (10 books)"));
        assert!(text.contains("[1] 2"));
        assert!(text.contains("Favorites:\n  Title 2 by Author 2"));
        assert!(!text.contains("Filters:"));
    }

    #[test]
    fn test_plain_listing_names_active_filters() {
        let mut session = session();
        session.set_category("Fantasy");
        session.set_author("Author 3");
        let text = render(&session, OutputFormat::Plain);

        assert!(text.contains("Page 1 of 1 (1 books)"));
        assert!(text.contains("Filters: genre=Fantasy, author=Author 3"));

        session.set_category("");
        session.set_author("");
        session.set_search("   ");
        assert!(!render(&session, OutputFormat::Plain).contains("Filters:"));
    }

    #[test]
    fn test_plain_listing_without_results() {
        let mut session = session();
        session.set_search("nothing matches");
        let text = render(&session, OutputFormat::Plain);

        assert!(text.contains("No books found."));
        assert!(text.contains("Page 1 of 0 (0 books)"));
        assert!(text.contains("Filters: search=\"nothing matches\""));
        assert!(!text.contains("Prev"));
    }

    #[test]
    fn test_table_listing_has_header() {
        let text = render(&session(), OutputFormat::Table);
        let first = text.lines().next().unwrap();
        assert!(first.contains("TITLE"));
        assert!(first.contains("RATING"));
    }

    #[test]
    fn test_json_listing() {
        let mut session = session();
        session.set_category("Fantasy");
        let value: Value = serde_json::from_str(&render(&session, OutputFormat::Json)).unwrap();

        assert_eq!(value["total"], 4);
        assert_eq!(value["page_count"], 1);
        assert_eq!(value["items"].as_array().unwrap().len(), 4);
        assert_eq!(value["items"][0]["cover"], "/covers/placeholder.jpg");
        assert_eq!(value["items"][0]["genre"], "Fantasy");
        assert!(value["controls"].is_null());
    }

    #[test]
    fn test_render_facets_plain() {
        let mut out = Vec::new();
        render_facets(&mut out, &["Fantasy".to_string()], &["Tolkien"], false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "Genres:\n  Fantasy\n\nAuthors:\n  Tolkien\n");
    }

    #[test]
    fn test_render_empty_notes() {
        let mut out = Vec::new();
        render_notes(&mut out, &[], false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No notes yet\n");
    }
}
