//! `folio` - Browse a book catalog and keep dictated notes
//!
//! This library provides a filter and pagination engine over a read-only
//! book catalog, a notes collection persisted in a local key-value store,
//! and a voice dictation session driven by injected host capabilities.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod capability;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod notes;
pub mod storage;
pub mod voice;

pub use capability::{Capabilities, Capability};
pub use catalog::{BrowseSession, Catalog, FilterState, Item, ItemId};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use notes::{Note, NotesSession};
pub use storage::{Storage, StorageStats};
pub use voice::{VoiceControls, VoiceSession};
