//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose note store operations to Dart via FRB as flat envelopes.
//! - Map store errors to stable codes the UI can branch on.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Each call opens the store, performs one operation and drops it.
//! - `storage_unavailable` responses still carry the applied note.

use notekeep_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Category, Note, NoteDraft, NoteId, NotesStore, SqliteNoteStorage, StoreError, ViewControls,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const DB_FILE_NAME: &str = "notekeep_ffi.sqlite3";
const DB_PATH_ENV: &str = "NOTEKEEP_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the note database file for this process.
///
/// # FFI contract
/// - Call before the first note operation; otherwise `NOTEKEEP_DB_PATH` or
///   the temp directory default is used.
/// - Safe to call repeatedly with the same path.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_db_path(db_path: String) -> String {
    match set_db_path(db_path.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Flat note shape for Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub completed: bool,
    /// `YYYY-MM-DD`.
    pub date: String,
}

impl From<&Note> for NoteItem {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id.to_string(),
            title: note.title.clone(),
            description: note.description.clone(),
            category: note.category.name().to_string(),
            completed: note.completed,
            date: note.date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Response envelope for single-note operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    pub ok: bool,
    /// Empty on success; otherwise `not_found`, `storage_unavailable`,
    /// `invalid_id` or a validation code such as `title_too_short`.
    pub error_code: String,
    /// Offending field for validation errors.
    pub field: Option<String>,
    /// Affected note; also set for `storage_unavailable`.
    pub note: Option<NoteItem>,
    pub message: String,
}

impl NoteActionResponse {
    fn success(message: impl Into<String>, note: &Note) -> Self {
        Self {
            ok: true,
            error_code: String::new(),
            field: None,
            note: Some(NoteItem::from(note)),
            message: message.into(),
        }
    }

    fn failure(err: &StoreError) -> Self {
        let field = match err {
            StoreError::Validation(validation) => Some(validation.field.as_str().to_string()),
            _ => None,
        };
        let message = match err {
            StoreError::Validation(validation) => validation.message(),
            other => other.to_string(),
        };
        Self {
            ok: false,
            error_code: err.code().to_string(),
            field,
            note: err.applied_note().map(NoteItem::from),
            message,
        }
    }

    fn invalid_id(raw: &str) -> Self {
        Self {
            ok: false,
            error_code: "invalid_id".to_string(),
            field: None,
            note: None,
            message: format!("invalid note id `{raw}`"),
        }
    }
}

/// Response envelope for list/view calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesListResponse {
    pub ok: bool,
    pub items: Vec<NoteItem>,
    /// Size of the unfiltered collection.
    pub total: u32,
    /// Empty-state message when `items` is empty; otherwise empty.
    pub empty_message: String,
    pub message: String,
}

impl NotesListResponse {
    fn failure(err: &StoreError) -> Self {
        Self {
            ok: false,
            items: Vec::new(),
            total: 0,
            empty_message: String::new(),
            message: err.to_string(),
        }
    }
}

/// Lists all notes in insertion order.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_list() -> NotesListResponse {
    notes_view(String::new(), false)
}

/// Lists notes filtered by title search and completed-only flag.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_view(search_text: String, completed_only: bool) -> NotesListResponse {
    let store = match open_store() {
        Ok(store) => store,
        Err(err) => return NotesListResponse::failure(&err),
    };
    let controls = ViewControls::new(search_text, completed_only);
    let view = store.view(&controls);
    let items = view
        .notes()
        .iter()
        .map(|note| NoteItem::from(*note))
        .collect::<Vec<_>>();
    NotesListResponse {
        ok: true,
        message: format!("{} of {} note(s).", items.len(), view.total()),
        total: u32::try_from(view.total()).unwrap_or(u32::MAX),
        empty_message: view
            .empty_state()
            .map(|state| state.message().to_string())
            .unwrap_or_default(),
        items,
    }
}

/// Creates a note. `completed` starts false and `date` is today.
#[flutter_rust_bridge::frb(sync)]
pub fn note_create(title: String, description: String, category: String) -> NoteActionResponse {
    let draft = NoteDraft::new(title, description, category);
    with_store(|store| store.add(&draft), "Note added.")
}

/// Replaces title, description and category of a note.
#[flutter_rust_bridge::frb(sync)]
pub fn note_update(
    id: String,
    title: String,
    description: String,
    category: String,
) -> NoteActionResponse {
    let Some(id) = parse_id(&id) else {
        return NoteActionResponse::invalid_id(&id);
    };
    let draft = NoteDraft::new(title, description, category);
    with_store(|store| store.update(id, &draft), "Note updated.")
}

/// Deletes a note; the response carries the deleted note for confirmation copy.
#[flutter_rust_bridge::frb(sync)]
pub fn note_delete(id: String) -> NoteActionResponse {
    let Some(id) = parse_id(&id) else {
        return NoteActionResponse::invalid_id(&id);
    };
    with_store(|store| store.remove(id), "Note deleted.")
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_toggle_completed(id: String) -> NoteActionResponse {
    let Some(id) = parse_id(&id) else {
        return NoteActionResponse::invalid_id(&id);
    };
    with_store(|store| store.toggle_completed(id), "Note updated.")
}

/// Category names a picker should offer, placeholder excluded.
#[flutter_rust_bridge::frb(sync)]
pub fn note_categories() -> Vec<String> {
    Category::assignable()
        .map(|category| category.name().to_string())
        .collect()
}

fn parse_id(raw: &str) -> Option<NoteId> {
    NoteId::parse_str(raw.trim()).ok()
}

fn set_db_path(raw: &str) -> Result<(), String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("db_path cannot be empty".to_string());
    }
    let requested = PathBuf::from(trimmed);
    if !requested.is_absolute() {
        return Err(format!("db_path must be an absolute path, got `{trimmed}`"));
    }
    let active = DB_PATH.get_or_init(|| requested.clone());
    if *active != requested {
        return Err(format!(
            "database already opened at `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        ));
    }
    Ok(())
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn open_store() -> Result<NotesStore<SqliteNoteStorage>, StoreError> {
    let storage = SqliteNoteStorage::open(resolve_db_path()).map_err(|source| {
        StoreError::StorageUnavailable {
            applied: None,
            source,
        }
    })?;
    NotesStore::open(storage)
}

fn with_store(
    f: impl FnOnce(&mut NotesStore<SqliteNoteStorage>) -> Result<Note, StoreError>,
    success_message: &str,
) -> NoteActionResponse {
    let result = open_store().and_then(|mut store| f(&mut store));
    match result {
        Ok(note) => NoteActionResponse::success(success_message, &note),
        Err(err) => {
            log::warn!(
                "event=ffi_call module=ffi status=error error_code={}",
                err.code()
            );
            NoteActionResponse::failure(&err)
        }
    }
}
