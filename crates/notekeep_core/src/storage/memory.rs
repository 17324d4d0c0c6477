//! In-process note storage.
//!
//! Keeps encoded bytes rather than `Note` values so reads exercise the same
//! codec as durable adapters.

use crate::model::note::Note;
use crate::storage::codec::{decode_notes, encode_notes};
use crate::storage::{NoteStorage, StorageResult};

#[derive(Debug, Clone, Default)]
pub struct MemoryNoteStorage {
    bytes: Option<Vec<u8>>,
}

impl MemoryNoteStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the storage with an already encoded record.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Some(bytes.into()),
        }
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }
}

impl NoteStorage for MemoryNoteStorage {
    fn load(&self) -> StorageResult<Vec<Note>> {
        match self.bytes.as_deref() {
            Some(bytes) => Ok(decode_notes(bytes)?.notes),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, notes: &[Note]) -> StorageResult<()> {
        self.bytes = Some(encode_notes(notes)?);
        Ok(())
    }
}
