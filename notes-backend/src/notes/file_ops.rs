//! File operations for the notes store
//!
//! Reads and writes the flat JSON snapshot `{"notes": [...]}` that mirrors the
//! in-memory note set.

use notes_types::Note;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use super::store::StorageError;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    notes: Vec<&'a Note>,
}

/// Read the snapshot at `path`.
///
/// Returns `Ok(None)` when the file does not exist. Entries without an `id`
/// are skipped; a missing `notes` key reads as an empty collection. Entries
/// that are not JSON objects make the whole file malformed.
pub fn read_store_file(path: &Path) -> Result<Option<Vec<Note>>, StorageError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let parse_err = |source| StorageError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let mut doc: serde_json::Value = serde_json::from_str(&raw).map_err(parse_err)?;
    let is_object = doc.is_object();
    let entries = match doc.get_mut("notes").map(serde_json::Value::take) {
        Some(serde_json::Value::Array(entries)) => entries,
        None if is_object => Vec::new(),
        _ => {
            return Err(StorageError::Malformed {
                path: path.to_path_buf(),
                reason: "expected an object with a \"notes\" array".to_string(),
            })
        }
    };

    let mut notes = Vec::with_capacity(entries.len());
    for entry in entries {
        if !entry.is_object() {
            return Err(StorageError::Malformed {
                path: path.to_path_buf(),
                reason: format!("note entry is not an object: {}", entry),
            });
        }
        if entry.get("id").is_none() {
            continue;
        }
        notes.push(serde_json::from_value::<Note>(entry).map_err(parse_err)?);
    }

    Ok(Some(notes))
}

/// Overwrite the snapshot at `path` with `notes` (creates parent directories as needed)
pub fn write_store_file<'a, I>(path: &Path, notes: I) -> Result<(), StorageError>
where
    I: IntoIterator<Item = &'a Note>,
{
    let io_err = |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };

    let snapshot = SnapshotRef {
        notes: notes.into_iter().collect(),
    };
    let body = serde_json::to_string_pretty(&snapshot).map_err(|source| StorageError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    let mut file = fs::File::create(path).map_err(io_err)?;
    file.write_all(body.as_bytes()).map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn note(id: i64, title: &str) -> Note {
        Note {
            id,
            title: title.to_string(),
            content: "body".to_string(),
            created_at: 1_700_000_000.5,
            updated_at: 1_700_000_001.25,
        }
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let result = read_store_file(&dir.path().join("nope.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a/b/notes.json");
        let notes = vec![note(1, "First"), note(2, "Second")];

        write_store_file(&path, &notes).unwrap();
        assert!(path.exists());

        let loaded = read_store_file(&path).unwrap().unwrap();
        assert_eq!(loaded, notes);
    }

    #[test]
    fn test_written_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");

        write_store_file(&path, &[note(1, "Héllo")]).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("{\n  \"notes\": [\n    {\n      \"id\": 1,"));
        assert!(raw.contains("\"title\": \"Héllo\""));
        assert!(raw.contains("\"created_at\": 1700000000.5"));

        write_store_file(&path, Vec::<Note>::new().iter()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\n  \"notes\": []\n}");
    }

    #[test]
    fn test_entries_without_id_are_dropped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");
        fs::write(
            &path,
            r#"{"notes": [
                {"title": "orphan"},
                {"id": 4, "title": "T", "content": "", "created_at": 1.0, "updated_at": 2.0}
            ]}"#,
        )
        .unwrap();

        let loaded = read_store_file(&path).unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, 4);
    }

    #[test]
    fn test_missing_notes_key_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");
        fs::write(&path, "{}").unwrap();

        let loaded = read_store_file(&path).unwrap().unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");

        fs::write(&path, "{not json").unwrap();
        assert!(matches!(read_store_file(&path), Err(StorageError::Parse { .. })));

        fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(matches!(read_store_file(&path), Err(StorageError::Malformed { .. })));

        fs::write(&path, r#"{"notes": [{"id": "seven"}]}"#).unwrap();
        assert!(matches!(read_store_file(&path), Err(StorageError::Parse { .. })));

        fs::write(&path, r#"{"notes": [5]}"#).unwrap();
        assert!(matches!(read_store_file(&path), Err(StorageError::Malformed { .. })));

        fs::write(&path, r#"{"notes": ["x", {"title": "no id"}]}"#).unwrap();
        assert!(matches!(read_store_file(&path), Err(StorageError::Malformed { .. })));
    }
}
