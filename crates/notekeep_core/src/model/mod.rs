//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record and the caller-facing draft shape.
//! - Own the category set and the validation rules for note fields.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - A `Note` value can only be produced from a validated draft or from
//!   persisted data that passes the same rules.

pub mod note;
pub mod validation;
