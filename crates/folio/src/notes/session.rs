use chrono::{DateTime, Local};
use tracing::{debug, info};

use super::note::Note;
use super::store::NoteStore;
use crate::error::{Error, Result};

/// The notes panel: an input buffer plus the saved collection, newest first.
#[derive(Debug)]
pub struct NotesSession<S> {
    store: S,
    notes: Vec<Note>,
    input: String,
}

impl<S: NoteStore> NotesSession<S> {
    /// Load the saved collection from `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored collection cannot be read or decoded.
    pub fn open(store: S) -> Result<Self> {
        let notes = store.load()?;
        debug!(count = notes.len(), "Loaded notes");
        Ok(Self {
            store,
            notes,
            input: String::new(),
        })
    }

    /// Saved notes, newest first.
    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// The current input buffer.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the input buffer.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Append recognized speech to the input buffer, space-separated.
    pub fn append_transcript(&mut self, text: &str) {
        self.input.push(' ');
        self.input.push_str(text);
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Save the input buffer as a new note, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyNote`] if the buffer is blank, or a storage
    /// error if the collection cannot be written.
    pub fn save_note(&mut self) -> Result<&Note> {
        self.save_note_at(&Local::now())
    }

    /// Save the input buffer as a new note created at `now`.
    ///
    /// The note is placed first. On a storage error the collection and the
    /// input buffer are left as they were.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyNote`] if the buffer is blank, or a storage
    /// error if the collection cannot be written.
    pub fn save_note_at(&mut self, now: &DateTime<Local>) -> Result<&Note> {
        let content = self.input.trim();
        if content.is_empty() {
            return Err(Error::EmptyNote);
        }

        let id = self.next_id(now.timestamp_millis());
        let note = Note::new(id, self.notes.len() + 1, content, now);
        self.notes.insert(0, note);

        if let Err(e) = self.store.save_all(&self.notes) {
            self.notes.remove(0);
            return Err(e);
        }

        self.input.clear();
        let saved = &self.notes[0];
        info!(id = saved.id, title = %saved.title, "Saved note");
        Ok(saved)
    }

    /// Delete the note with `id` and rewrite the collection.
    ///
    /// Returns `true` if a note was removed. The collection is written
    /// even when nothing matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be written, in which case
    /// the note is kept.
    pub fn delete_note(&mut self, id: i64) -> Result<bool> {
        let remaining: Vec<Note> = self
            .notes
            .iter()
            .filter(|note| note.id != id)
            .cloned()
            .collect();
        self.store.save_all(&remaining)?;

        let removed = remaining.len() != self.notes.len();
        self.notes = remaining;
        debug!(id, removed, "Deleted note");
        Ok(removed)
    }

    /// Drop every note and remove the stored key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be removed.
    pub fn clear_all(&mut self) -> Result<()> {
        self.store.clear()?;
        let count = self.notes.len();
        self.notes.clear();
        info!(count, "Cleared all notes");
        Ok(())
    }

    // Ids are creation milliseconds; two saves in the same millisecond
    // would collide, so step past the largest existing id.
    fn next_id(&self, now_ms: i64) -> i64 {
        match self.notes.iter().map(|note| note.id).max() {
            Some(max) if max >= now_ms => max + 1,
            _ => now_ms,
        }
    }
}
