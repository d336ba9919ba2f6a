//! Catalog item records.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Identifier of a catalog item.
pub type ItemId = u64;

/// A single book in the catalog.
///
/// Field names on the wire follow the catalog JSON format: `genre`,
/// `cover` and `rating` map to [`category`](Self::category),
/// [`image_ref`](Self::image_ref) and [`rating_text`](Self::rating_text).
/// Missing text fields decode as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier within the catalog.
    pub id: ItemId,

    /// ISBN, when known.
    #[serde(default)]
    pub isbn: String,

    /// Book title.
    #[serde(default)]
    pub title: String,

    /// Author name.
    #[serde(default)]
    pub author: String,

    /// Genre the book is filed under.
    #[serde(default, rename = "genre")]
    pub category: String,

    /// Reference to the cover image.
    #[serde(default, rename = "cover", skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,

    /// Display-only rating text. Never parsed.
    #[serde(default, rename = "rating", skip_serializing_if = "Option::is_none")]
    pub rating_text: Option<String>,
}

impl Item {
    /// Create an item with no ISBN, cover or rating.
    #[must_use]
    pub fn new(
        id: ItemId,
        title: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            isbn: String::new(),
            title: title.into(),
            author: author.into(),
            category: category.into(),
            image_ref: None,
            rating_text: None,
        }
    }

    /// Set the cover reference.
    #[must_use]
    pub fn with_cover(mut self, cover: impl Into<String>) -> Self {
        self.image_ref = Some(cover.into());
        self
    }

    /// Set the rating text.
    #[must_use]
    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.rating_text = Some(rating.into());
        self
    }

    /// The cover reference, or `placeholder` when absent or blank.
    #[must_use]
    pub fn cover_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        match self.image_ref.as_deref() {
            Some(cover) if !cover.trim().is_empty() => cover,
            _ => placeholder,
        }
    }
}

/// The read-only set of items loaded for a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<Item>,
    genres: Vec<String>,
}

impl Catalog {
    /// Build a catalog, keeping the source order of `items`.
    #[must_use]
    pub fn new(items: Vec<Item>) -> Self {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id) {
                warn!(id = item.id, "Duplicate item id in catalog");
            }
        }

        let genres = items
            .iter()
            .map(|item| item.category.as_str())
            .filter(|genre| !genre.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        Self { items, genres }
    }

    /// An empty catalog, as left behind by a failed load.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// All items in source order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Distinct non-empty genres, sorted ascending.
    #[must_use]
    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    /// Look an item up by id.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// The featured "book of the day": the first item of the catalog.
    #[must_use]
    pub fn book_of_the_day(&self) -> Option<&Item> {
        self.items.first()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
