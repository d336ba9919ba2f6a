//! Session-scoped favorites.

use super::item::{Catalog, Item, ItemId};

/// How many favorites the side panel lists before summarising the rest.
pub const PREVIEW_LIMIT: usize = 5;

/// Set of favorite item ids, kept in the order they were added.
///
/// Ids are not checked against the catalog; a stale id stays in the set
/// until toggled off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesSet {
    ids: Vec<ItemId>,
}

/// The favorites panel: the first few favorites plus an overflow count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoritesPreview<'a> {
    /// Favorites resolved against the catalog. Stale ids are skipped.
    pub shown: Vec<&'a Item>,
    /// How many favorites lie beyond the preview limit.
    pub overflow: usize,
}

impl FavoritesSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` if absent, remove it if present.
    ///
    /// Returns `true` if `id` is a favorite afterwards.
    pub fn toggle(&mut self, id: ItemId) -> bool {
        if let Some(pos) = self.ids.iter().position(|&fav| fav == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    /// Whether `id` is a favorite.
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.ids.contains(&id)
    }

    /// Favorite ids in insertion order.
    #[must_use]
    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    /// Number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether there are no favorites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Resolve the first `limit` favorites against `catalog`.
    #[must_use]
    pub fn preview<'a>(&self, catalog: &'a Catalog, limit: usize) -> FavoritesPreview<'a> {
        let shown = self
            .ids
            .iter()
            .take(limit)
            .filter_map(|&id| catalog.get(id))
            .collect();

        FavoritesPreview {
            shown,
            overflow: self.ids.len().saturating_sub(limit),
        }
    }
}
