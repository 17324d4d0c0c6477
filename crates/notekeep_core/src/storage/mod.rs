//! Persistence adapters for the note collection.
//!
//! # Responsibility
//! - Define the load/save contract the store writes through to.
//! - Provide SQLite, JSON file and in-memory adapters sharing one wire codec.
//!
//! # Invariants
//! - `save` replaces the whole stored collection in a single write.
//! - `load` of a missing or empty record yields an empty collection.
//! - Loaded notes always satisfy note validation and have unique ids.

use crate::model::note::Note;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod codec;
pub mod file;
pub mod memory;
pub mod schema;
pub mod sqlite;

pub type StorageResult<T> = Result<T, StorageError>;

/// Durable storage failure.
#[derive(Debug)]
pub enum StorageError {
    Db(rusqlite::Error),
    /// Database schema was upgraded by a newer binary.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    Io(std::io::Error),
    Encode(serde_json::Error),
    /// Stored bytes cannot be decoded into a valid collection.
    InvalidData(String),
    /// Stored record was written by a newer format version.
    UnsupportedFormatVersion { found: u64, latest_supported: u32 },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "sqlite failed: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Io(err) => write!(f, "storage io failed: {err}"),
            Self::Encode(err) => write!(f, "failed to encode notes: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted notes: {message}"),
            Self::UnsupportedFormatVersion {
                found,
                latest_supported,
            } => write!(
                f,
                "notes format version {found} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::InvalidData(_)
            | Self::UnsupportedFormatVersion { .. }
            | Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(value)
    }
}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Durable key-value storage for the whole note collection.
pub trait NoteStorage {
    /// Reads the stored collection in persisted order.
    fn load(&self) -> StorageResult<Vec<Note>>;
    /// Replaces the stored collection.
    fn save(&mut self, notes: &[Note]) -> StorageResult<()>;
}

impl<S: NoteStorage + ?Sized> NoteStorage for Box<S> {
    fn load(&self) -> StorageResult<Vec<Note>> {
        (**self).load()
    }

    fn save(&mut self, notes: &[Note]) -> StorageResult<()> {
        (**self).save(notes)
    }
}
