//! Notes store: sole owner of the note collection.
//!
//! # Responsibility
//! - Provide add/update/remove/toggle/list entry points for collaborators.
//! - Validate drafts before mutation and write through to storage after.
//! - Derive filtered views over the current collection.
//!
//! # Invariants
//! - Ids are unique across the collection; new ids are random v4 UUIDs.
//! - Collection order is insertion order.
//! - A failed validation or lookup never mutates the collection.
//! - A failed save keeps the in-memory mutation and is reported as
//!   `StorageUnavailable`, never swallowed.

use crate::clock::{Clock, SystemClock};
use crate::model::note::{Note, NoteDraft, NoteId};
use crate::model::validation::{validate, ValidationError};
use crate::search::filter::{filter_notes, FilteredView, ViewControls};
use crate::storage::{NoteStorage, StorageError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation failure.
#[derive(Debug)]
pub enum StoreError {
    /// Draft rejected; collection untouched.
    Validation(ValidationError),
    /// No note with this id; collection untouched.
    NotFound(NoteId),
    /// Storage failed. When `applied` is set, the mutation that produced
    /// (or removed) that note is kept in memory but not persisted.
    StorageUnavailable {
        applied: Option<Box<Note>>,
        source: StorageError,
    },
}

impl StoreError {
    /// Note produced by a mutation whose save failed.
    pub fn applied_note(&self) -> Option<&Note> {
        match self {
            Self::StorageUnavailable { applied, .. } => applied.as_deref(),
            _ => None,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.kind.code(),
            Self::NotFound(_) => "not_found",
            Self::StorageUnavailable { .. } => "storage_unavailable",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::StorageUnavailable { source, .. } => {
                write!(f, "storage unavailable, changes may not survive a reload: {source}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::StorageUnavailable { source, .. } => Some(source),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// In-memory note collection with write-through persistence.
pub struct NotesStore<S: NoteStorage> {
    storage: S,
    notes: Vec<Note>,
    clock: Box<dyn Clock>,
    unsaved_changes: bool,
}

impl<S: NoteStorage> NotesStore<S> {
    /// Loads the collection once from `storage`, stamping dates with the
    /// UTC calendar date.
    ///
    /// # Errors
    /// - `StorageUnavailable` (without `applied`) when loading fails.
    pub fn open(storage: S) -> StoreResult<Self> {
        Self::open_with_clock(storage, SystemClock)
    }

    /// Same as [`NotesStore::open`] with a caller-provided date source.
    pub fn open_with_clock(storage: S, clock: impl Clock + 'static) -> StoreResult<Self> {
        let notes = storage.load().map_err(|source| {
            warn!("event=store_open module=store status=error error={source}");
            StoreError::StorageUnavailable {
                applied: None,
                source,
            }
        })?;
        info!(
            "event=store_open module=store status=ok count={}",
            notes.len()
        );
        Ok(Self {
            storage,
            notes,
            clock: Box::new(clock),
            unsaved_changes: false,
        })
    }

    /// Read-only snapshot in insertion order.
    pub fn list(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.notes.iter().filter(|note| note.completed).count()
    }

    /// Filtered display list for `controls`.
    pub fn view(&self, controls: &ViewControls) -> FilteredView<'_> {
        filter_notes(&self.notes, controls)
    }

    /// Validates and appends a new note.
    ///
    /// # Contract
    /// - New note has a fresh id, `completed = false` and today's date.
    /// - Returns the stored note.
    pub fn add(&mut self, draft: &NoteDraft) -> StoreResult<Note> {
        let valid = validate(draft).inspect_err(|err| {
            debug!(
                "event=note_add module=store status=rejected field={} kind={}",
                err.field.as_str(),
                err.kind.code()
            );
        })?;

        let note = Note {
            id: self.fresh_id(),
            title: valid.title,
            description: valid.description,
            category: valid.category,
            completed: false,
            date: self.clock.today(),
        };
        self.notes.push(note.clone());
        info!(
            "event=note_add module=store status=ok note_id={} count={}",
            note.id,
            self.notes.len()
        );
        self.commit(note)
    }

    /// Replaces title, description and category of an existing note.
    ///
    /// # Contract
    /// - Draft is validated before the id lookup.
    /// - `id` and `completed` are preserved; `date` is refreshed to today.
    pub fn update(&mut self, id: NoteId, draft: &NoteDraft) -> StoreResult<Note> {
        let valid = validate(draft).inspect_err(|err| {
            debug!(
                "event=note_update module=store status=rejected note_id={id} field={} kind={}",
                err.field.as_str(),
                err.kind.code()
            );
        })?;
        let today = self.clock.today();
        let note = self.find_mut(id)?;

        note.title = valid.title;
        note.description = valid.description;
        note.category = valid.category;
        note.date = today;
        let updated = note.clone();

        info!("event=note_update module=store status=ok note_id={id}");
        self.commit(updated)
    }

    /// Removes a note and returns it.
    pub fn remove(&mut self, id: NoteId) -> StoreResult<Note> {
        let Some(position) = self.notes.iter().position(|note| note.id == id) else {
            debug!("event=note_remove module=store status=not_found note_id={id}");
            return Err(StoreError::NotFound(id));
        };
        let removed = self.notes.remove(position);
        info!(
            "event=note_remove module=store status=ok note_id={id} count={}",
            self.notes.len()
        );
        self.commit(removed)
    }

    /// Flips `completed` and returns the updated note. `date` is untouched.
    pub fn toggle_completed(&mut self, id: NoteId) -> StoreResult<Note> {
        let note = self.find_mut(id)?;
        note.completed = !note.completed;
        let updated = note.clone();
        info!(
            "event=note_toggle module=store status=ok note_id={id} completed={}",
            updated.completed
        );
        self.commit(updated)
    }

    /// Whether memory holds changes a previous save failed to persist.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved_changes
    }

    /// Writes the current collection again.
    ///
    /// Intended for an explicit user retry after `StorageUnavailable`.
    pub fn persist(&mut self) -> StoreResult<()> {
        match self.storage.save(&self.notes) {
            Ok(()) => {
                self.unsaved_changes = false;
                info!(
                    "event=store_persist module=store status=ok count={}",
                    self.notes.len()
                );
                Ok(())
            }
            Err(source) => {
                self.unsaved_changes = true;
                warn!("event=store_persist module=store status=error error={source}");
                Err(StoreError::StorageUnavailable {
                    applied: None,
                    source,
                })
            }
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn find_mut(&mut self, id: NoteId) -> StoreResult<&mut Note> {
        self.notes
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn fresh_id(&self) -> NoteId {
        loop {
            let candidate = Uuid::new_v4();
            if self.notes.iter().all(|note| note.id != candidate) {
                return candidate;
            }
        }
    }

    fn commit(&mut self, applied: Note) -> StoreResult<Note> {
        match self.storage.save(&self.notes) {
            Ok(()) => {
                self.unsaved_changes = false;
                Ok(applied)
            }
            Err(source) => {
                self.unsaved_changes = true;
                warn!(
                    "event=store_save module=store status=error note_id={} error_code=storage_unavailable error={source}",
                    applied.id
                );
                Err(StoreError::StorageUnavailable {
                    applied: Some(Box::new(applied)),
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NotesStore, StoreError};
    use crate::clock::FixedClock;
    use crate::model::note::NoteDraft;
    use crate::storage::memory::MemoryNoteStorage;
    use crate::storage::NoteStorage;
    use chrono::NaiveDate;

    fn store() -> NotesStore<MemoryNoteStorage> {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        NotesStore::open_with_clock(MemoryNoteStorage::new(), clock).unwrap()
    }

    #[test]
    fn toggle_keeps_date_and_persists() {
        let mut store = store();
        let note = store
            .add(&NoteDraft::new("Groceries", "", "Personal"))
            .unwrap();

        let toggled = store.toggle_completed(note.id).unwrap();
        assert!(toggled.completed);
        assert_eq!(toggled.date, note.date);

        let persisted = store.storage().load().unwrap();
        assert!(persisted[0].completed);
    }

    #[test]
    fn update_validation_runs_before_lookup() {
        let mut store = store();
        let err = store
            .update(uuid::Uuid::new_v4(), &NoteDraft::new("ab", "", "Work"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(err.code(), "title_too_short");
    }

    #[test]
    fn counts_follow_mutations() {
        let mut store = store();
        let a = store.add(&NoteDraft::new("First", "", "Work")).unwrap();
        store.add(&NoteDraft::new("Second", "", "Work")).unwrap();
        store.toggle_completed(a.id).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.completed_count(), 1);
        assert!(!store.has_unsaved_changes());
    }
}
