//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `notekeep_core` linkage.
//! - Optionally open a database and print collection counters.

use notekeep_core::{NotesStore, SqliteNoteStorage};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("notekeep_core ping={}", notekeep_core::ping());
    println!("notekeep_core version={}", notekeep_core::core_version());

    let Some(db_path) = std::env::args_os().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let store = match SqliteNoteStorage::open(&db_path)
        .map_err(|err| err.to_string())
        .and_then(|storage| NotesStore::open(storage).map_err(|err| err.to_string()))
    {
        Ok(store) => store,
        Err(err) => {
            eprintln!("notekeep_core open failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    println!(
        "notekeep_core notes={} completed={}",
        store.len(),
        store.completed_count()
    );
    ExitCode::SUCCESS
}
