//! Page slicing and pagination controls.

use serde::Serialize;

/// Page counts at or below this show every page number.
const FULL_LIST_MAX_PAGES: usize = 7;

/// Width of the sliding page-number window for longer lists.
const WINDOW_WIDTH: usize = 5;

/// One page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// Items on this page. Empty when `page_index` is out of range.
    pub items: &'a [T],
    /// The requested 1-based page number.
    pub page_index: usize,
    /// Total number of pages.
    pub page_count: usize,
    /// Total number of matched items across all pages.
    pub total: usize,
}

/// Number of pages needed for `total` items. Zero items need zero pages.
///
/// A `page_size` of zero yields zero pages.
#[must_use]
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// The slice of `items` shown on the 1-based `page_index`.
///
/// Out-of-range pages (including page 0) give an empty slice.
#[must_use]
pub fn page_slice<T>(items: &[T], page_index: usize, page_size: usize) -> &[T] {
    if page_index == 0 || page_size == 0 {
        return &[];
    }
    let Some(start) = (page_index - 1).checked_mul(page_size) else {
        return &[];
    };
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Slice `items` into the requested page.
#[must_use]
pub fn paginate<T>(items: &[T], page_index: usize, page_size: usize) -> Page<'_, T> {
    Page {
        items: page_slice(items, page_index, page_size),
        page_index,
        page_count: page_count(items.len(), page_size),
        total: items.len(),
    }
}

/// An entry in the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageLink {
    /// A clickable page number.
    Page(usize),
    /// An ellipsis between non-adjacent page numbers.
    Gap,
}

/// State of the pagination bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageControls {
    /// The "Previous" button is clickable.
    pub prev_enabled: bool,
    /// The "Next" button is clickable.
    pub next_enabled: bool,
    /// Page numbers and gaps, left to right.
    pub links: Vec<PageLink>,
}

/// Build the pagination bar for `current` of `total` pages.
///
/// Returns `None` when there is at most one page, in which case no
/// controls are shown. Up to seven pages are all listed; beyond that a
/// five-page window around `current` is shown, with the first and last
/// page pinned and gaps marking skipped ranges.
#[must_use]
pub fn page_controls(current: usize, total: usize) -> Option<PageControls> {
    if total <= 1 {
        return None;
    }

    let links = if total <= FULL_LIST_MAX_PAGES {
        (1..=total).map(PageLink::Page).collect()
    } else {
        windowed_links(current, total)
    };

    Some(PageControls {
        prev_enabled: current > 1,
        next_enabled: current < total,
        links,
    })
}

fn windowed_links(current: usize, total: usize) -> Vec<PageLink> {
    let mut links = Vec::with_capacity(WINDOW_WIDTH + 4);

    if current > 3 {
        links.push(PageLink::Page(1));
        if current > 4 {
            links.push(PageLink::Gap);
        }
    }

    let start = current
        .saturating_sub(2)
        .min(total - (WINDOW_WIDTH - 1))
        .max(1);
    links.extend((start..start + WINDOW_WIDTH).map(PageLink::Page));

    if current < total.saturating_sub(2) {
        if current < total.saturating_sub(3) {
            links.push(PageLink::Gap);
        }
        links.push(PageLink::Page(total));
    }

    links
}
