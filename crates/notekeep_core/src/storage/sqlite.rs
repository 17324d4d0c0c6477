//! SQLite-backed key-value note storage.
//!
//! # Responsibility
//! - Keep the encoded note collection as one row of `kv_store`.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - The connection schema is current before any read or write.
//! - `save` is a single upsert statement, so readers see old or new bytes.

use crate::model::note::Note;
use crate::storage::codec::{decode_notes, encode_notes};
use crate::storage::schema::{open_connection, upgrade_schema};
use crate::storage::{NoteStorage, StorageResult};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Record key holding the note collection.
pub const NOTES_KEY: &str = "notes";

/// SQLite implementation of [`NoteStorage`].
pub struct SqliteNoteStorage {
    conn: Connection,
    key: String,
}

impl SqliteNoteStorage {
    /// Wraps a caller-supplied connection, upgrading its schema first.
    pub fn try_new(mut conn: Connection) -> StorageResult<Self> {
        upgrade_schema(&mut conn)?;
        Ok(Self::from_ready(conn))
    }

    /// Opens (or creates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        open_connection(Some(path.as_ref())).map(Self::from_ready)
    }

    pub fn open_in_memory() -> StorageResult<Self> {
        open_connection(None).map(Self::from_ready)
    }

    fn from_ready(conn: Connection) -> Self {
        Self {
            conn,
            key: NOTES_KEY.to_string(),
        }
    }

    /// Uses a different record key, e.g. one collection per profile.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns the stored bytes as-is, `None` when no record exists.
    pub fn load_raw(&self) -> StorageResult<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                params![self.key.as_str()],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Replaces the stored bytes as-is.
    pub fn save_raw(&self, bytes: &[u8]) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![self.key.as_str(), bytes],
        )?;
        Ok(())
    }
}

impl NoteStorage for SqliteNoteStorage {
    fn load(&self) -> StorageResult<Vec<Note>> {
        let Some(bytes) = self.load_raw()? else {
            debug!("event=storage_load module=storage backend=sqlite status=ok count=0 record=missing");
            return Ok(Vec::new());
        };
        let decoded = decode_notes(&bytes)?;
        debug!(
            "event=storage_load module=storage backend=sqlite status=ok count={} format_version={}",
            decoded.notes.len(),
            decoded.version
        );
        Ok(decoded.notes)
    }

    fn save(&mut self, notes: &[Note]) -> StorageResult<()> {
        let bytes = encode_notes(notes)?;
        self.save_raw(&bytes)?;
        debug!(
            "event=storage_save module=storage backend=sqlite status=ok count={} bytes={}",
            notes.len(),
            bytes.len()
        );
        Ok(())
    }
}
