//! Draft validation rules.
//!
//! # Responsibility
//! - Check caller drafts before they reach the store.
//! - Report failures per field so callers can re-prompt precisely.
//!
//! # Invariants
//! - Lengths are counted in chars, not bytes; input is never trimmed.
//! - The placeholder category is rejected by an explicit rule.
//! - Validation is pure: no I/O, no store access.

use crate::model::note::{Category, NoteDraft};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 50;
pub const DESCRIPTION_MAX_CHARS: usize = 200;

/// Note field addressed by a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteField {
    Title,
    Description,
    Category,
}

impl NoteField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Category => "category",
        }
    }
}

/// Specific reason a draft was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TitleTooShort,
    TitleTooLong,
    DescriptionTooLong,
    CategoryRequired,
}

impl ErrorKind {
    pub fn field(self) -> NoteField {
        match self {
            Self::TitleTooShort | Self::TitleTooLong => NoteField::Title,
            Self::DescriptionTooLong => NoteField::Description,
            Self::CategoryRequired => NoteField::Category,
        }
    }

    /// Stable machine-readable code, used by the FFI envelope.
    pub fn code(self) -> &'static str {
        match self {
            Self::TitleTooShort => "title_too_short",
            Self::TitleTooLong => "title_too_long",
            Self::DescriptionTooLong => "description_too_long",
            Self::CategoryRequired => "category_required",
        }
    }
}

/// Field-level validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationError {
    pub field: NoteField,
    pub kind: ErrorKind,
}

impl ValidationError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            field: kind.field(),
            kind,
        }
    }

    /// User-facing message for the failing field.
    pub fn message(&self) -> String {
        match self.kind {
            ErrorKind::TitleTooShort => {
                format!("Title must contain at least {TITLE_MIN_CHARS} characters")
            }
            ErrorKind::TitleTooLong => {
                format!("Title must contain at most {TITLE_MAX_CHARS} characters")
            }
            ErrorKind::DescriptionTooLong => {
                format!("Description must contain at most {DESCRIPTION_MAX_CHARS} characters")
            }
            ErrorKind::CategoryRequired => "Category is required.".to_string(),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: {}", self.field.as_str(), self.message())
    }
}

impl Error for ValidationError {}

/// Fields of a draft that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidNote {
    pub title: String,
    pub description: String,
    pub category: Category,
}

/// Validates a draft, reporting the first failing field.
///
/// Fields are checked in title, description, category order.
pub fn validate(draft: &NoteDraft) -> Result<ValidNote, ValidationError> {
    let category = validate_fields(
        &draft.title,
        &draft.description,
        Category::from_name(&draft.category),
    )?;
    Ok(ValidNote {
        title: draft.title.clone(),
        description: draft.description.clone(),
        category,
    })
}

/// Validates a draft and returns every failing field.
///
/// Returns an empty list for a valid draft.
pub fn validate_all(draft: &NoteDraft) -> Vec<ValidationError> {
    [
        check_title(&draft.title),
        check_description(&draft.description),
        check_category(Category::from_name(&draft.category)).map(|_| ()),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect()
}

pub(crate) fn validate_fields(
    title: &str,
    description: &str,
    category: Option<Category>,
) -> Result<Category, ValidationError> {
    check_title(title)?;
    check_description(description)?;
    check_category(category)
}

fn check_title(title: &str) -> Result<(), ValidationError> {
    let len = title.chars().count();
    if len < TITLE_MIN_CHARS {
        return Err(ValidationError::new(ErrorKind::TitleTooShort));
    }
    if len > TITLE_MAX_CHARS {
        return Err(ValidationError::new(ErrorKind::TitleTooLong));
    }
    Ok(())
}

fn check_description(description: &str) -> Result<(), ValidationError> {
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(ValidationError::new(ErrorKind::DescriptionTooLong));
    }
    Ok(())
}

fn check_category(category: Option<Category>) -> Result<Category, ValidationError> {
    match category {
        Some(category) if category.is_assignable() => Ok(category),
        _ => Err(ValidationError::new(ErrorKind::CategoryRequired)),
    }
}
