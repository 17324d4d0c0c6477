//! Flutter bridge for Notekeep core.

pub mod api;
