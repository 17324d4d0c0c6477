//! Display-list derivation from view controls.
//!
//! # Responsibility
//! - Project the note collection through search text and completed-only.
//! - Tell callers which empty state applies when nothing is shown.
//!
//! # Invariants
//! - Only `title` is matched, case-insensitively, as a substring.
//! - Both controls combine with AND; source order is preserved.
//! - Derivation is pure and holds no cached state.

use crate::model::note::Note;

/// View controls owned by the search/filter UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewControls {
    pub search_text: String,
    pub completed_only: bool,
}

impl ViewControls {
    pub fn new(search_text: impl Into<String>, completed_only: bool) -> Self {
        Self {
            search_text: search_text.into(),
            completed_only,
        }
    }

    pub fn search_active(&self) -> bool {
        !self.search_text.is_empty()
    }

    /// Whether `note` passes both controls.
    pub fn matches(&self, note: &Note) -> bool {
        self.matches_with(note, &self.search_text.to_lowercase())
    }

    fn matches_with(&self, note: &Note, needle: &str) -> bool {
        let title_ok = needle.is_empty() || note.title.to_lowercase().contains(needle);
        title_ok && (!self.completed_only || note.completed)
    }
}

/// Which message a caller should show for an empty view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// Nothing shown and no control is active.
    NoNotes,
    /// Search text is active and matched nothing.
    NoMatches,
    /// Only completed-only is active and no note is completed.
    NoCompletedNotes,
}

impl EmptyState {
    pub fn message(self) -> &'static str {
        match self {
            Self::NoNotes => "No notes yet",
            Self::NoMatches => "No notes found",
            Self::NoCompletedNotes => "No completed notes yet",
        }
    }
}

/// Filtered, order-preserving view over a note collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredView<'a> {
    notes: Vec<&'a Note>,
    total: usize,
    search_active: bool,
    completed_only: bool,
}

impl<'a> FilteredView<'a> {
    pub fn notes(&self) -> &[&'a Note] {
        &self.notes
    }

    pub fn into_notes(self) -> Vec<&'a Note> {
        self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Size of the unfiltered source collection.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn search_active(&self) -> bool {
        self.search_active
    }

    pub fn completed_only(&self) -> bool {
        self.completed_only
    }

    /// Returns `None` while anything is shown.
    ///
    /// Search wins over completed-only when both are active.
    pub fn empty_state(&self) -> Option<EmptyState> {
        if !self.notes.is_empty() {
            return None;
        }
        Some(if self.search_active {
            EmptyState::NoMatches
        } else if self.completed_only {
            EmptyState::NoCompletedNotes
        } else {
            EmptyState::NoNotes
        })
    }

    pub fn titles(&self) -> Vec<&'a str> {
        self.notes.iter().map(|note| note.title.as_str()).collect()
    }
}

/// Derives the display sequence for `controls`.
pub fn filter_notes<'a>(notes: &'a [Note], controls: &ViewControls) -> FilteredView<'a> {
    let needle = controls.search_text.to_lowercase();
    FilteredView {
        notes: notes
            .iter()
            .filter(|note| controls.matches_with(note, &needle))
            .collect(),
        total: notes.len(),
        search_active: controls.search_active(),
        completed_only: controls.completed_only,
    }
}

#[cfg(test)]
mod tests {
    use super::{filter_notes, EmptyState, ViewControls};
    use crate::model::note::{Category, Note};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn note(title: &str, completed: bool) -> Note {
        Note {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: String::new(),
            category: Category::Personal,
            completed,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn search_ignores_description() {
        let mut with_desc = note("Groceries", false);
        with_desc.description = "milk".to_string();
        let notes = vec![with_desc];

        let view = filter_notes(&notes, &ViewControls::new("milk", false));
        assert!(view.is_empty());
        assert_eq!(view.total(), 1);
    }

    #[test]
    fn search_is_not_trimmed() {
        let notes = vec![note("Pay bills", false)];
        assert_eq!(filter_notes(&notes, &ViewControls::new("y b", false)).len(), 1);
        assert!(filter_notes(&notes, &ViewControls::new(" pay", false)).is_empty());
    }

    #[test]
    fn empty_state_prefers_search_over_completed_only() {
        let notes = vec![note("Pay bills", false)];
        let view = filter_notes(&notes, &ViewControls::new("zzz", true));
        assert_eq!(view.empty_state(), Some(EmptyState::NoMatches));
        assert_eq!(EmptyState::NoMatches.message(), "No notes found");
    }
}
