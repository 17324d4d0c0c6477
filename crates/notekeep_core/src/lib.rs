//! Core domain logic for Notekeep.
//! This crate is the single source of truth for note invariants.

pub mod clock;
pub mod config;
pub mod logging;
pub mod model;
pub mod search;
pub mod service;
pub mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{open_store, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::note::{Category, Note, NoteDraft, NoteId};
pub use model::validation::{
    validate, validate_all, ErrorKind, NoteField, ValidNote, ValidationError,
    DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS, TITLE_MIN_CHARS,
};
pub use search::filter::{filter_notes, EmptyState, FilteredView, ViewControls};
pub use service::note_store::{NotesStore, StoreError, StoreResult};
pub use storage::file::JsonFileNoteStorage;
pub use storage::memory::MemoryNoteStorage;
pub use storage::sqlite::SqliteNoteStorage;
pub use storage::{NoteStorage, StorageError, StorageResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
