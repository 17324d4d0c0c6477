//! Core bootstrap configuration.
//!
//! # Responsibility
//! - Describe where notes and logs live and at which level to log.
//! - Open a ready-to-use store from that description.
//!
//! # Invariants
//! - Logging is initialized before the database is opened, so `db_open`
//!   events are captured.

use crate::logging::{default_log_level, init_logging};
use crate::service::note_store::{NotesStore, StoreError, StoreResult};
use crate::storage::sqlite::SqliteNoteStorage;
use log::warn;
use std::path::{Path, PathBuf};

/// Default database file name inside a data directory.
pub const DB_FILE_NAME: &str = "notekeep.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Paths and levels needed to bring the core up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Standard layout under one data directory.
    pub fn for_data_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            db_path: data_dir.join(DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: Some(data_dir.join(LOG_DIR_NAME)),
        }
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn without_logging(mut self) -> Self {
        self.log_dir = None;
        self
    }
}

/// Initializes logging (when configured) and opens the SQLite-backed store.
///
/// A logging setup failure is logged and does not prevent the store from
/// opening.
///
/// # Errors
/// - `StorageUnavailable` when the database cannot be opened or loaded.
pub fn open_store(config: &CoreConfig) -> StoreResult<NotesStore<SqliteNoteStorage>> {
    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = init_logging(config.log_level.as_str(), &log_dir.to_string_lossy()) {
            warn!("event=core_init module=config status=degraded error={err}");
        }
    }

    let storage = SqliteNoteStorage::open(&config.db_path).map_err(|source| {
        StoreError::StorageUnavailable {
            applied: None,
            source,
        }
    })?;
    NotesStore::open(storage)
}
