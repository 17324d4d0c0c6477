//! Note domain record and category set.
//!
//! # Responsibility
//! - Define the persisted `Note` shape and its wire field names.
//! - Define the fixed, ordered `Category` set including the unset placeholder.
//! - Provide `NoteDraft`, the unvalidated payload accepted by the store.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `Category::Unset` sits at index 0 and is never assignable.
//! - Deserializing a `Note` re-runs field validation.

use crate::model::validation::{validate_fields, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every note.
pub type NoteId = Uuid;

/// Fixed category set, in display order.
///
/// Index 0 is the "nothing selected" placeholder shown by pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Select category")]
    Unset,
    Personal,
    Work,
    Study,
    Shopping,
    Health,
    Other,
}

impl Category {
    /// All categories in index order, placeholder first.
    pub const ALL: [Category; 7] = [
        Category::Unset,
        Category::Personal,
        Category::Work,
        Category::Study,
        Category::Shopping,
        Category::Health,
        Category::Other,
    ];

    /// Display/wire name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Unset => "Select category",
            Self::Personal => "Personal",
            Self::Work => "Work",
            Self::Study => "Study",
            Self::Shopping => "Shopping",
            Self::Health => "Health",
            Self::Other => "Other",
        }
    }

    /// Position in [`Category::ALL`].
    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|candidate| *candidate == self)
            .unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Exact name lookup. Returns the placeholder for its own name; callers
    /// must still check [`Category::is_assignable`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.name() == name)
    }

    /// Whether a note may carry this category.
    pub fn is_assignable(self) -> bool {
        self != Self::Unset
    }

    /// Categories a picker should offer (index >= 1).
    pub fn assignable() -> impl Iterator<Item = Category> {
        Self::ALL.into_iter().filter(|category| category.is_assignable())
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Unvalidated note payload supplied by callers of `add`/`update`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub description: String,
    /// Category name as picked by the caller.
    pub category: String,
}

impl NoteDraft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category: category.into(),
        }
    }

    /// Builds a draft from a picker index.
    ///
    /// Index 0 and out-of-range indices produce a draft that fails with
    /// `CategoryRequired`.
    pub fn with_category_index(
        title: impl Into<String>,
        description: impl Into<String>,
        index: usize,
    ) -> Self {
        let category = Category::from_index(index)
            .map(|category| category.name().to_string())
            .unwrap_or_default();
        Self::new(title, description, category)
    }
}

impl From<&Note> for NoteDraft {
    /// Prefills an edit form from an existing note.
    fn from(note: &Note) -> Self {
        Self::new(
            note.title.clone(),
            note.description.clone(),
            note.category.name(),
        )
    }
}

/// Canonical stored note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NoteWire")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub completed: bool,
    /// Creation date, refreshed on every update. Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
}

impl Note {
    /// Re-checks the field rules for an already constructed note.
    ///
    /// # Errors
    /// - Returns the first failing field in title, description, category order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.title, &self.description, Some(self.category)).map(|_| ())
    }
}

/// Lenient decode shape for persisted notes.
///
/// Missing `description`/`completed` default so older records still load.
#[derive(Deserialize)]
struct NoteWire {
    id: NoteId,
    title: String,
    #[serde(default)]
    description: String,
    category: Category,
    #[serde(default)]
    completed: bool,
    date: NaiveDate,
}

impl TryFrom<NoteWire> for Note {
    type Error = ValidationError;

    fn try_from(wire: NoteWire) -> Result<Self, Self::Error> {
        let note = Note {
            id: wire.id,
            title: wire.title,
            description: wire.description,
            category: wire.category,
            completed: wire.completed,
            date: wire.date,
        };
        note.validate()?;
        Ok(note)
    }
}
