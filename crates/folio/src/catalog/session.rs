//! Interactive browsing state on top of the filter and pagination stages.

use tracing::debug;

use super::favorites::FavoritesSet;
use super::filter::{self, FilterState};
use super::item::{Catalog, Item, ItemId};
use super::paginate::{self, page_controls, page_slice, PageControls};

/// One browsing session over a loaded catalog.
///
/// Owns the filter state and favorites. Every change to the genre, author
/// or search text sends the user back to page 1; nothing else touches the
/// page index, so a stale page can still come up empty.
#[derive(Debug, Clone)]
pub struct BrowseSession {
    catalog: Catalog,
    filter: FilterState,
    favorites: FavoritesSet,
    page_size: usize,
}

/// Everything needed to draw the results area for the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseView<'a> {
    /// All items matching the filters, in catalog order.
    pub matched: Vec<&'a Item>,
    /// Author options consistent with the genre and search filters.
    pub available_authors: Vec<&'a str>,
    /// The requested 1-based page.
    pub page_index: usize,
    /// Total number of pages.
    pub page_count: usize,
    /// Pagination bar, absent when there is at most one page.
    pub controls: Option<PageControls>,
    page_size: usize,
}

impl<'a> BrowseView<'a> {
    /// Items on the current page. Empty when the page is out of range.
    #[must_use]
    pub fn page_items(&self) -> &[&'a Item] {
        page_slice(&self.matched, self.page_index, self.page_size)
    }

    /// Number of items matching all filters.
    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.matched.len()
    }
}

impl BrowseSession {
    /// Start a session with default filters.
    #[must_use]
    pub fn new(catalog: Catalog, page_size: usize) -> Self {
        Self {
            catalog,
            filter: FilterState::default(),
            favorites: FavoritesSet::new(),
            page_size,
        }
    }

    /// The loaded catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Current filter state.
    #[must_use]
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Current favorites.
    #[must_use]
    pub fn favorites(&self) -> &FavoritesSet {
        &self.favorites
    }

    /// Items per page.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Select a genre (empty for all) and go back to page 1.
    pub fn set_category(&mut self, category: impl Into<String>) {
        self.filter.category = category.into();
        self.reset_page();
    }

    /// Select an author (empty for all) and go back to page 1.
    pub fn set_author(&mut self, author: impl Into<String>) {
        self.filter.author = author.into();
        self.reset_page();
    }

    /// Change the search text and go back to page 1.
    pub fn set_search(&mut self, search_text: impl Into<String>) {
        self.filter.search_text = search_text.into();
        self.reset_page();
    }

    /// The explicit "Search" action: go back to page 1.
    pub fn search(&mut self) {
        self.reset_page();
    }

    /// Jump to `page`, kept within the pages of the current results.
    pub fn goto_page(&mut self, page: usize) {
        let last = self.page_count().max(1);
        self.filter.page_index = page.clamp(1, last);
    }

    /// Move to the next page if there is one.
    pub fn next_page(&mut self) {
        if self.filter.page_index < self.page_count() {
            self.filter.page_index += 1;
        }
    }

    /// Move to the previous page if there is one.
    pub fn prev_page(&mut self) {
        if self.filter.page_index > 1 {
            self.filter.page_index -= 1;
        }
    }

    /// Flip `id` in the favorites. Returns `true` if it is now a favorite.
    pub fn toggle_favorite(&mut self, id: ItemId) -> bool {
        let now_favorite = self.favorites.toggle(id);
        debug!(id, now_favorite, "Toggled favorite");
        now_favorite
    }

    /// Number of pages for the current filters.
    #[must_use]
    pub fn page_count(&self) -> usize {
        let outcome = filter::compute(self.catalog.items(), &self.filter);
        paginate::page_count(outcome.matched.len(), self.page_size)
    }

    /// Compute the results area for the current state.
    ///
    /// The matched list is rebuilt from the catalog on every call.
    #[must_use]
    pub fn view(&self) -> BrowseView<'_> {
        let outcome = filter::compute(self.catalog.items(), &self.filter);
        let page_count = paginate::page_count(outcome.matched.len(), self.page_size);

        BrowseView {
            matched: outcome.matched,
            available_authors: outcome.available_authors,
            page_index: self.filter.page_index,
            page_count,
            controls: page_controls(self.filter.page_index, page_count),
            page_size: self.page_size,
        }
    }

    fn reset_page(&mut self) {
        self.filter.page_index = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(n: u64) -> Catalog {
        Catalog::new(
            (1..=n)
                .map(|id| {
                    let genre = if id % 2 == 0 { "Even" } else { "Odd" };
                    Item::new(id, format!("Book {id}"), format!("Author {}", id % 3), genre)
                })
                .collect(),
        )
    }

    #[test]
    fn test_new_session_defaults() {
        let session = BrowseSession::new(catalog(3), 8);
        assert_eq!(session.filter(), &FilterState::default());
        assert!(session.favorites().is_empty());
        assert_eq!(session.page_size(), 8);
    }

    #[test]
    fn test_view_first_page() {
        let session = BrowseSession::new(catalog(17), 8);
        let view = session.view();

        assert_eq!(view.matched_count(), 17);
        assert_eq!(view.page_items().len(), 8);
        assert_eq!(view.page_count, 3);
        assert!(view.controls.is_some());
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut session = BrowseSession::new(catalog(17), 8);
        session.goto_page(3);
        assert_eq!(session.filter().page_index, 3);

        session.set_category("Odd");
        assert_eq!(session.filter().page_index, 1);

        session.goto_page(2);
        session.set_author("Author 1");
        assert_eq!(session.filter().page_index, 1);

        session.goto_page(2);
        session.set_search("book");
        assert_eq!(session.filter().page_index, 1);
    }

    #[test]
    fn test_next_and_prev_stay_in_range() {
        let mut session = BrowseSession::new(catalog(17), 8);

        session.prev_page();
        assert_eq!(session.filter().page_index, 1);

        session.next_page();
        session.next_page();
        session.next_page();
        assert_eq!(session.filter().page_index, 3);

        session.prev_page();
        assert_eq!(session.filter().page_index, 2);

        let view = session.view();
        assert_eq!(view.page_items().len(), 8);
        assert_eq!(view.page_items()[0].id, 9);
    }

    #[test]
    fn test_goto_page_clamps() {
        let mut session = BrowseSession::new(catalog(17), 8);
        session.goto_page(99);
        assert_eq!(session.filter().page_index, 3);
        session.goto_page(0);
        assert_eq!(session.filter().page_index, 1);
    }

    #[test]
    fn test_empty_results_view() {
        let mut session = BrowseSession::new(catalog(5), 8);
        session.set_search("no such book");

        let view = session.view();
        assert_eq!(view.matched_count(), 0);
        assert_eq!(view.page_count, 0);
        assert!(view.page_items().is_empty());
        assert!(view.controls.is_none());
    }

    #[test]
    fn test_toggle_favorite() {
        let mut session = BrowseSession::new(catalog(5), 8);
        assert!(session.toggle_favorite(2));
        assert!(session.favorites().contains(2));
        assert!(!session.toggle_favorite(2));
        assert!(session.favorites().is_empty());
    }
}
