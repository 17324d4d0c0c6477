//! SQLite connection bootstrap and `kv_store` schema upgrades.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version` and only moves forward.
//! - All pending upgrades apply in one transaction or not at all.
//! - A database stamped by a newer binary is refused, never downgraded.

use crate::storage::{StorageError, StorageResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Ordered schema upgrades; index `i` moves the schema to version `i + 1`.
const UPGRADES: &[&str] = &[include_str!("migrations/0001_init.sql")];

/// Schema version this binary writes.
pub fn schema_version() -> u32 {
    UPGRADES.len() as u32
}

/// Brings `conn` up to [`schema_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the database is ahead of this binary.
pub fn upgrade_schema(conn: &mut Connection) -> StorageResult<()> {
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let target = schema_version();
    if found > target {
        return Err(StorageError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: target,
        });
    }
    if found == target {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, sql) in (1..).zip(UPGRADES.iter()).skip(found as usize) {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;
    info!("event=schema_upgrade module=storage status=ok from_version={found} to_version={target}");
    Ok(())
}

/// Opens a database file (or memory when `path` is `None`) ready for use.
pub(crate) fn open_connection(path: Option<&Path>) -> StorageResult<Connection> {
    let started_at = Instant::now();
    let mode = if path.is_some() { "file" } else { "memory" };

    let result = match path {
        Some(path) => Connection::open(path),
        None => Connection::open_in_memory(),
    }
    .map_err(StorageError::from)
    .and_then(|mut conn| {
        conn.busy_timeout(Duration::from_secs(5))?;
        upgrade_schema(&mut conn)?;
        Ok(conn)
    });

    match &result {
        Ok(_) => info!(
            "event=db_open module=storage status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=storage status=error mode={mode} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
    result
}
