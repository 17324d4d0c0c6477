use chrono::{NaiveDate, Utc};
use notekeep_core::{
    Category, ErrorKind, FixedClock, MemoryNoteStorage, Note, NoteDraft, NoteStorage, NotesStore,
    StorageError, StorageResult, StoreError,
};
use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;
use uuid::Uuid;

fn day(year: i32, month: u32, date: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, date).unwrap()
}

fn store_on(day_one: NaiveDate) -> NotesStore<MemoryNoteStorage> {
    NotesStore::open_with_clock(MemoryNoteStorage::new(), FixedClock(day_one)).unwrap()
}

fn groceries() -> NoteDraft {
    NoteDraft::new("Groceries", "", "Personal")
}

/// Memory storage whose writes can be switched off from the test.
struct FlakyStorage {
    inner: MemoryNoteStorage,
    available: Rc<Cell<bool>>,
}

impl NoteStorage for FlakyStorage {
    fn load(&self) -> StorageResult<Vec<Note>> {
        self.inner.load()
    }

    fn save(&mut self, notes: &[Note]) -> StorageResult<()> {
        if !self.available.get() {
            return Err(StorageError::Io(std::io::Error::other("disk unplugged")));
        }
        self.inner.save(notes)
    }
}

#[test]
fn add_to_empty_store_then_list() {
    let mut store = NotesStore::open(MemoryNoteStorage::new()).unwrap();
    let before = Utc::now().date_naive();
    let created = store.add(&groceries()).unwrap();
    let after = Utc::now().date_naive();

    let listed = store.list();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], created);
    assert_eq!(listed[0].title, "Groceries");
    assert_eq!(listed[0].description, "");
    assert_eq!(listed[0].category, Category::Personal);
    assert!(!listed[0].completed);
    assert!(listed[0].date == before || listed[0].date == after);
}

#[test]
fn add_generates_distinct_ids_and_keeps_insertion_order() {
    let mut store = store_on(day(2024, 3, 1));
    let mut seen = HashSet::new();

    for idx in 0..50 {
        let existing = store.list().iter().map(|note| note.id).collect::<HashSet<_>>();
        let note = store
            .add(&NoteDraft::new(format!("note {idx}"), "", "Work"))
            .unwrap();
        assert!(!existing.contains(&note.id));
        assert!(!note.id.is_nil());
        assert!(seen.insert(note.id));
    }

    let titles = store
        .list()
        .iter()
        .map(|note| note.title.clone())
        .collect::<Vec<_>>();
    let expected = (0..50).map(|idx| format!("note {idx}")).collect::<Vec<_>>();
    assert_eq!(titles, expected);
}

#[test]
fn add_validation_failure_leaves_collection_untouched() {
    let mut store = store_on(day(2024, 3, 1));
    store.add(&groceries()).unwrap();
    let bytes_before = store.storage().bytes().map(<[u8]>::to_vec);

    let err = store
        .add(&NoteDraft::with_category_index("Title", "", 0))
        .unwrap_err();
    match err {
        StoreError::Validation(err) => assert_eq!(err.kind, ErrorKind::CategoryRequired),
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(store.len(), 1);
    assert_eq!(store.storage().bytes().map(<[u8]>::to_vec), bytes_before);
}

#[test]
fn update_replaces_fields_refreshes_date_and_keeps_identity() {
    let mut first_session = store_on(day(2024, 3, 1));
    let created = first_session.add(&groceries()).unwrap();
    first_session.toggle_completed(created.id).unwrap();

    let storage = first_session.into_storage();
    let mut store = NotesStore::open_with_clock(storage, FixedClock(day(2024, 3, 9))).unwrap();
    let draft = NoteDraft::new("Weekly groceries", "milk, bread", "Shopping");
    let updated = store.update(created.id, &draft).unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, draft.title);
    assert_eq!(updated.description, draft.description);
    assert_eq!(updated.category, Category::Shopping);
    assert_eq!(updated.date, day(2024, 3, 9));
    assert!(updated.completed);
    assert_eq!(store.list(), &[updated]);
}

#[test]
fn update_missing_id_returns_not_found_without_mutation() {
    let mut store = store_on(day(2024, 3, 1));
    let existing = store.add(&groceries()).unwrap();
    let missing = Uuid::new_v4();

    let err = store
        .update(missing, &NoteDraft::new("Other", "", "Work"))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == missing));
    assert_eq!(store.list(), &[existing]);
}

#[test]
fn update_invalid_draft_keeps_note() {
    let mut store = store_on(day(2024, 3, 1));
    let existing = store.add(&groceries()).unwrap();

    let err = store
        .update(existing.id, &NoteDraft::new("ab", "", "Work"))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(store.get(existing.id), Some(&existing));
}

#[test]
fn remove_returns_note_and_second_remove_is_not_found() {
    let mut store = store_on(day(2024, 3, 1));
    let first = store.add(&groceries()).unwrap();
    let second = store.add(&NoteDraft::new("Pay bills", "", "Personal")).unwrap();

    let removed = store.remove(first.id).unwrap();
    assert_eq!(removed, first);
    assert_eq!(store.list(), &[second.clone()]);

    let err = store.remove(first.id).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == first.id));
    assert_eq!(store.list(), &[second]);
}

#[test]
fn toggle_flips_and_missing_id_is_not_found() {
    let mut store = store_on(day(2024, 3, 1));
    let note = store.add(&groceries()).unwrap();

    assert!(store.toggle_completed(note.id).unwrap().completed);
    assert!(!store.toggle_completed(note.id).unwrap().completed);

    let err = store.toggle_completed(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn every_mutation_is_written_through() {
    let mut store = store_on(day(2024, 3, 1));
    let note = store.add(&groceries()).unwrap();
    assert_eq!(store.storage().load().unwrap(), store.list());

    store
        .update(note.id, &NoteDraft::new("Groceries!", "", "Personal"))
        .unwrap();
    assert_eq!(store.storage().load().unwrap(), store.list());

    store.toggle_completed(note.id).unwrap();
    assert_eq!(store.storage().load().unwrap(), store.list());

    store.remove(note.id).unwrap();
    assert!(store.storage().load().unwrap().is_empty());
}

#[test]
fn reopening_restores_collection() {
    let mut store = store_on(day(2024, 3, 1));
    store.add(&groceries()).unwrap();
    store.add(&NoteDraft::new("Pay bills", "rent", "Work")).unwrap();
    let snapshot = store.list().to_vec();

    let reopened = NotesStore::open(store.into_storage()).unwrap();
    assert_eq!(reopened.list(), snapshot.as_slice());
}

#[test]
fn storage_failure_keeps_mutation_and_reports_it() {
    let available = Rc::new(Cell::new(true));
    let storage = FlakyStorage {
        inner: MemoryNoteStorage::new(),
        available: Rc::clone(&available),
    };
    let mut store = NotesStore::open_with_clock(storage, FixedClock(day(2024, 3, 1))).unwrap();
    store.add(&groceries()).unwrap();

    available.set(false);
    let err = store
        .add(&NoteDraft::new("Pay bills", "", "Personal"))
        .unwrap_err();
    assert_eq!(err.code(), "storage_unavailable");
    let applied = err.applied_note().cloned().unwrap();
    assert_eq!(applied.title, "Pay bills");
    assert!(matches!(
        err,
        StoreError::StorageUnavailable {
            source: StorageError::Io(_),
            ..
        }
    ));

    assert_eq!(store.len(), 2);
    assert_eq!(store.get(applied.id), Some(&applied));
    assert!(store.has_unsaved_changes());
    assert_eq!(store.storage().inner.load().unwrap().len(), 1);

    assert!(store.persist().is_err());

    available.set(true);
    store.persist().unwrap();
    assert!(!store.has_unsaved_changes());
    assert_eq!(store.storage().inner.load().unwrap(), store.list());
}

#[test]
fn remove_with_storage_failure_reports_removed_note() {
    let available = Rc::new(Cell::new(true));
    let storage = FlakyStorage {
        inner: MemoryNoteStorage::new(),
        available: Rc::clone(&available),
    };
    let mut store = NotesStore::open(storage).unwrap();
    let note = store.add(&groceries()).unwrap();

    available.set(false);
    let err = store.remove(note.id).unwrap_err();
    assert_eq!(err.applied_note(), Some(&note));
    assert!(store.is_empty());
}

#[test]
fn open_with_corrupt_storage_is_storage_unavailable() {
    let storage = MemoryNoteStorage::from_bytes("{not json");
    let err = NotesStore::open(storage).err().unwrap();
    assert!(matches!(
        err,
        StoreError::StorageUnavailable {
            applied: None,
            source: StorageError::InvalidData(_),
        }
    ));
}
