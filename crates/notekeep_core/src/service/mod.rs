//! Core use-case services.
//!
//! # Responsibility
//! - Own the note collection and orchestrate validation and persistence.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod note_store;
