//! NoteStore — mutex-guarded note repository with JSON snapshot persistence
//!
//! Holds the single authoritative copy of every note for the process. Every
//! operation takes the store lock for its full duration, including the
//! snapshot write, so callers always observe a linearizable sequence of
//! states. Mutations are written through to disk before returning; there is
//! no background flushing.

use notes_types::{Note, PaginationMeta};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::file_ops;

/// Largest page a caller may request
pub const MAX_PAGE_SIZE: i64 = 100;

/// Failure to read or write the persistence target
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to access notes file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse notes file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Malformed notes file {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },
    #[error("No note ids left to assign")]
    IdsExhausted,
}

struct Inner {
    notes: BTreeMap<i64, Note>,
    next_id: i64,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            notes: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// Note repository shared by all request handlers
pub struct NoteStore {
    path: Option<PathBuf>,
    inner: Mutex<Inner>,
}

impl NoteStore {
    /// Open a store mirrored to `path`, loading any existing snapshot.
    ///
    /// With `None` the store is purely in-memory. A snapshot that exists but
    /// cannot be read or parsed fails construction.
    pub fn open(path: Option<PathBuf>) -> Result<Self, StorageError> {
        let mut inner = Inner::default();

        if let Some(path) = path.as_deref() {
            if let Some(notes) = file_ops::read_store_file(path)? {
                inner.notes = notes.into_iter().map(|n| (n.id, n)).collect();
                inner.next_id = match inner.notes.keys().next_back() {
                    None => 1,
                    Some(max) => max.checked_add(1).ok_or_else(|| StorageError::Malformed {
                        path: path.to_path_buf(),
                        reason: format!("note id {} leaves no id to assign next", max),
                    })?,
                };
                log::info!(
                    "[NOTES] Loaded {} notes from {} (next id {})",
                    inner.notes.len(),
                    path.display(),
                    inner.next_id
                );
            } else {
                log::info!("[NOTES] No snapshot at {}, starting empty", path.display());
            }
        } else {
            log::info!("[NOTES] Persistence disabled, notes are kept in memory only");
        }

        Ok(Self {
            path,
            inner: Mutex::new(inner),
        })
    }

    /// Store with no persistence target
    pub fn in_memory() -> Self {
        Self {
            path: None,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn persistence_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One page of notes in ascending id order.
    ///
    /// `page_size` is clamped to `1..=MAX_PAGE_SIZE` and `page` to the valid
    /// page range, so this never fails.
    pub fn list(&self, page: i64, page_size: i64) -> (Vec<Note>, PaginationMeta) {
        let inner = self.inner.lock();

        let page_size = page_size.clamp(1, MAX_PAGE_SIZE) as usize;
        let total = inner.notes.len();
        let total_pages = if total == 0 { 1 } else { total.div_ceil(page_size) };
        let page = page.clamp(1, total_pages as i64) as usize;

        let items = inner
            .notes
            .values()
            .skip((page - 1) * page_size)
            .take(page_size)
            .cloned()
            .collect();

        let meta = PaginationMeta {
            total,
            total_pages,
            page,
            previous_page: (page > 1).then(|| page - 1),
            next_page: (page < total_pages).then(|| page + 1),
        };

        (items, meta)
    }

    pub fn get(&self, id: i64) -> Option<Note> {
        self.inner.lock().notes.get(&id).cloned()
    }

    /// Create a note with the next id and persist the snapshot
    pub fn create(&self, title: String, content: String) -> Result<Note, StorageError> {
        let mut inner = self.inner.lock();

        let id = inner.next_id;
        inner.next_id = id.checked_add(1).ok_or(StorageError::IdsExhausted)?;

        let now = now_secs();
        let note = Note {
            id,
            title,
            content,
            created_at: now,
            updated_at: now,
        };
        inner.notes.insert(id, note.clone());

        self.persist(&inner)?;
        Ok(note)
    }

    /// Overwrite the provided fields of a note.
    ///
    /// Returns `Ok(None)` if the note does not exist. When no field actually
    /// changes, the note is returned untouched and nothing is written.
    pub fn update(
        &self,
        id: i64,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<Option<Note>, StorageError> {
        let mut inner = self.inner.lock();

        let Some(note) = inner.notes.get_mut(&id) else {
            return Ok(None);
        };

        let mut changed = false;
        if let Some(title) = title {
            if note.title != title {
                note.title = title;
                changed = true;
            }
        }
        if let Some(content) = content {
            if note.content != content {
                note.content = content;
                changed = true;
            }
        }

        if !changed {
            log::debug!("[NOTES] Update of note {} changed nothing", id);
            return Ok(Some(note.clone()));
        }

        note.updated_at = now_secs().max(note.created_at);
        let updated = note.clone();

        self.persist(&inner)?;
        Ok(Some(updated))
    }

    /// Remove a note. Returns whether it existed.
    pub fn delete(&self, id: i64) -> Result<bool, StorageError> {
        let mut inner = self.inner.lock();

        if inner.notes.remove(&id).is_none() {
            return Ok(false);
        }

        self.persist(&inner)?;
        Ok(true)
    }

    /// Write the full snapshot. Called with the lock held; the in-memory
    /// change is kept even if the write fails.
    fn persist(&self, inner: &Inner) -> Result<(), StorageError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        file_ops::write_store_file(path, inner.notes.values()).inspect_err(|e| {
            log::error!("[NOTES] {}", e);
        })
    }
}

/// Current time as fractional seconds since the Unix epoch
fn now_secs() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
