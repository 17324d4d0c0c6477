//! JSON file note storage.
//!
//! # Responsibility
//! - Keep the encoded note collection in a single JSON file.
//!
//! # Invariants
//! - Writes go to a sibling temp file that is renamed over the target, so
//!   the target never holds a partial collection.
//! - A missing file loads as an empty collection.
//! - A failed save leaves no temp file behind.

use crate::model::note::Note;
use crate::storage::codec::{decode_notes, encode_notes};
use crate::storage::{NoteStorage, StorageResult};
use log::debug;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// File-backed implementation of [`NoteStorage`].
#[derive(Debug, Clone)]
pub struct JsonFileNoteStorage {
    path: PathBuf,
}

impl JsonFileNoteStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "notes.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl NoteStorage for JsonFileNoteStorage {
    fn load(&self) -> StorageResult<Vec<Note>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let decoded = decode_notes(&bytes)?;
        debug!(
            "event=storage_load module=storage backend=file status=ok count={} format_version={}",
            decoded.notes.len(),
            decoded.version
        );
        Ok(decoded.notes)
    }

    fn save(&mut self, notes: &[Note]) -> StorageResult<()> {
        let bytes = encode_notes(notes)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.temp_path();
        if let Err(err) = replace_via(&temp_path, &self.path, &bytes) {
            let _ = fs::remove_file(&temp_path);
            debug!("event=storage_save module=storage backend=file status=error error={err}");
            return Err(err.into());
        }

        debug!(
            "event=storage_save module=storage backend=file status=ok count={} bytes={}",
            notes.len(),
            bytes.len()
        );
        Ok(())
    }
}

fn replace_via(temp_path: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(temp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);
    fs::rename(temp_path, target)
}

#[cfg(test)]
mod tests {
    use super::JsonFileNoteStorage;
    use crate::storage::{NoteStorage, StorageError};
    use std::fs;

    #[test]
    fn save_writes_target_and_removes_temp() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonFileNoteStorage::new(dir.path().join("notes.json"));

        storage.save(&[]).unwrap();

        assert!(storage.path().is_file());
        assert!(!storage.temp_path().exists());
    }

    #[test]
    fn failed_rename_cleans_up_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("notes.json");
        // A non-empty directory at the target path makes the rename fail.
        fs::create_dir_all(target.join("occupied")).unwrap();
        let mut storage = JsonFileNoteStorage::new(&target);

        let err = storage.save(&[]).unwrap_err();

        assert!(matches!(err, StorageError::Io(_)));
        assert!(!storage.temp_path().exists());
        assert!(target.join("occupied").is_dir());
    }
}
