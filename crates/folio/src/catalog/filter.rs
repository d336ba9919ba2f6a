//! The filter stage of the catalog pipeline.
//!
//! Filtering runs in a fixed order: category, then free-text search, then
//! author. The author facet is taken between the second and third step so
//! the author list never restricts itself.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::item::Item;

/// User-selected filter criteria.
///
/// Empty strings mean "no constraint". `page_index` is 1-based and is not
/// clamped here; see [`BrowseSession`](super::BrowseSession) for the reset
/// policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    /// Exact, case-sensitive genre to keep.
    pub category: String,
    /// Exact author to keep.
    pub author: String,
    /// Case-insensitive substring matched against title and author.
    pub search_text: String,
    /// 1-based page number.
    pub page_index: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            category: String::new(),
            author: String::new(),
            search_text: String::new(),
            page_index: 1,
        }
    }
}

impl FilterState {
    /// Whether no filter constraint is active.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.category.is_empty() && self.author.is_empty() && self.search_text.trim().is_empty()
    }
}

/// Result of running the filters over a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome<'a> {
    /// Items passing every constraint, in source order.
    pub matched: Vec<&'a Item>,
    /// Distinct non-empty authors under the category and search
    /// constraints only, sorted ascending.
    pub available_authors: Vec<&'a str>,
}

/// Run the category, search and author filters over `items`.
#[must_use]
pub fn compute<'a>(items: &'a [Item], state: &FilterState) -> FilterOutcome<'a> {
    let needle = normalized_query(&state.search_text);

    let narrowed: Vec<&Item> = items
        .iter()
        .filter(|item| matches_category(item, &state.category))
        .filter(|item| needle.as_deref().map_or(true, |n| matches_search(item, n)))
        .collect();

    let available_authors = narrowed
        .iter()
        .map(|item| item.author.as_str())
        .filter(|author| !author.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let matched = narrowed
        .into_iter()
        .filter(|item| state.author.is_empty() || item.author == state.author)
        .collect();

    FilterOutcome {
        matched,
        available_authors,
    }
}

fn matches_category(item: &Item, category: &str) -> bool {
    category.is_empty() || item.category == category
}

/// Whitespace-only queries impose no constraint. Otherwise the query is
/// lowercased as typed; surrounding spaces still take part in the match.
fn normalized_query(search_text: &str) -> Option<String> {
    if search_text.trim().is_empty() {
        None
    } else {
        Some(search_text.to_lowercase())
    }
}

fn matches_search(item: &Item, needle: &str) -> bool {
    item.title.to_lowercase().contains(needle) || item.author.to_lowercase().contains(needle)
}
