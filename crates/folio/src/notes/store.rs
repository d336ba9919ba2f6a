use std::collections::HashMap;
use std::sync::Mutex;

use tracing::{debug, warn};

use super::note::Note;
use crate::error::{Error, Result};
use crate::storage::Storage;

/// Persistence for the note collection.
///
/// The whole collection lives under one key and is rewritten on every
/// change.
pub trait NoteStore {
    /// Read the collection. A missing key is an empty collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails or the stored value is
    /// not a valid note collection.
    fn load(&self) -> Result<Vec<Note>>;

    /// Replace the stored collection with `notes`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn save_all(&self, notes: &[Note]) -> Result<()>;

    /// Remove the key entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn clear(&self) -> Result<()>;
}

fn decode(key: &str, raw: Option<String>) -> Result<Vec<Note>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    serde_json::from_str(&raw).map_err(|e| {
        warn!(key, error = %e, "Stored notes are not valid JSON");
        Error::Json(e)
    })
}

/// Notes kept in the SQLite key-value table.
#[derive(Debug)]
pub struct SqliteNoteStore {
    storage: Storage,
    key: String,
}

impl SqliteNoteStore {
    /// Use `key` inside `storage`.
    #[must_use]
    pub fn new(storage: Storage, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// The underlying storage.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// The key holding the collection.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl NoteStore for SqliteNoteStore {
    fn load(&self) -> Result<Vec<Note>> {
        decode(&self.key, self.storage.get(&self.key)?)
    }

    fn save_all(&self, notes: &[Note]) -> Result<()> {
        let json = serde_json::to_string(notes)?;
        self.storage.put(&self.key, &json)?;
        debug!(key = %self.key, count = notes.len(), "Saved notes");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let removed = self.storage.remove(&self.key)?;
        debug!(key = %self.key, removed, "Cleared notes");
        Ok(())
    }
}

/// In-memory key-value store, for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryNoteStore {
    key: String,
    values: Mutex<HashMap<String, String>>,
}

impl MemoryNoteStore {
    /// Create an empty store using `key`.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            values: Mutex::new(HashMap::new()),
        }
    }

    /// The raw stored value, if any.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.lock().get(&self.key).cloned()
    }

    /// Overwrite the raw stored value.
    pub fn set_raw(&self, value: impl Into<String>) {
        self.lock().insert(self.key.clone(), value.into());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map.
        self.values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl NoteStore for MemoryNoteStore {
    fn load(&self) -> Result<Vec<Note>> {
        decode(&self.key, self.raw())
    }

    fn save_all(&self, notes: &[Note]) -> Result<()> {
        let json = serde_json::to_string(notes)?;
        self.set_raw(json);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.lock().remove(&self.key);
        Ok(())
    }
}
