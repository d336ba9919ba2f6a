//! Book catalog browsing.
//!
//! A catalog is loaded once from a [`CatalogSource`] and is read-only
//! afterwards. Browsing runs the items through a fixed pipeline:
//! genre filter, then search, then author filter, then pagination. The
//! author options offered to the user are computed before the author
//! filter so that selecting an author never hides the other options.

mod favorites;
mod filter;
mod item;
mod paginate;
mod session;
mod source;
pub mod view;

pub use favorites::{FavoritesPreview, FavoritesSet, PREVIEW_LIMIT};
pub use filter::{compute, FilterOutcome, FilterState};
pub use item::{Catalog, Item, ItemId};
pub use paginate::{page_controls, page_count, page_slice, paginate, Page, PageControls, PageLink};
pub use session::{BrowseSession, BrowseView};
pub use source::{
    load_catalog, parse_csv, source_for, BundledSource, CatalogFormat, CatalogSource, FileSource,
    HttpSource, LoadStatus, LoadedCatalog,
};
