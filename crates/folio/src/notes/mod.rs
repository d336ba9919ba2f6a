//! Saved text notes with a dictation input buffer.
//!
//! The whole collection is stored as one JSON array under a single key
//! (`voice-notes` by default), newest note first.

mod note;
mod session;
mod store;

pub use note::{Note, TIMESTAMP_FORMAT};
pub use session::NotesSession;
pub use store::{MemoryNoteStore, NoteStore, SqliteNoteStore};
