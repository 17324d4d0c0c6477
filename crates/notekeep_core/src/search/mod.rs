//! View derivation over the note collection.
//!
//! # Responsibility
//! - Compute display lists from the collection and explicit view controls.
//! - Keep view controls out of global state.

pub mod filter;
