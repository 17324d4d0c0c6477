//! Versioned JSON encoding of the note collection.
//!
//! # Responsibility
//! - Encode notes into the `{"version": N, "notes": [...]}` envelope.
//! - Decode current and legacy (bare array) layouts.
//!
//! # Invariants
//! - Encoding is deterministic: same notes, same bytes.
//! - Decoding rejects newer versions, invalid notes and duplicate ids.

use crate::model::note::{Note, NoteId};
use crate::storage::{StorageError, StorageResult};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

/// Envelope version written by this binary.
pub const FORMAT_VERSION: u32 = 1;

/// Version reported for the unversioned bare-array layout.
pub const LEGACY_FORMAT_VERSION: u32 = 0;

#[derive(Serialize)]
struct Envelope<'a> {
    version: u32,
    notes: &'a [Note],
}

/// Result of decoding a stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedNotes {
    /// Format version found in the record.
    pub version: u32,
    pub notes: Vec<Note>,
}

/// Encodes notes as a current-version envelope.
pub fn encode_notes(notes: &[Note]) -> StorageResult<Vec<u8>> {
    serde_json::to_vec(&Envelope {
        version: FORMAT_VERSION,
        notes,
    })
    .map_err(StorageError::Encode)
}

/// Decodes a stored record.
///
/// Blank input decodes to an empty collection at the current version.
pub fn decode_notes(bytes: &[u8]) -> StorageResult<DecodedNotes> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(DecodedNotes {
            version: FORMAT_VERSION,
            notes: Vec::new(),
        });
    }

    let value: Value = serde_json::from_slice(bytes)
        .map_err(|err| StorageError::InvalidData(format!("malformed json: {err}")))?;

    let (version, raw_notes) = match value {
        Value::Array(items) => (LEGACY_FORMAT_VERSION, items),
        Value::Object(mut map) => {
            let version = map
                .get("version")
                .and_then(Value::as_u64)
                .ok_or_else(|| {
                    StorageError::InvalidData("missing numeric `version` field".to_string())
                })?;
            if version > u64::from(FORMAT_VERSION) {
                return Err(StorageError::UnsupportedFormatVersion {
                    found: version,
                    latest_supported: FORMAT_VERSION,
                });
            }
            let items = match map.remove("notes") {
                Some(Value::Array(items)) => items,
                None | Some(Value::Null) => Vec::new(),
                Some(other) => {
                    return Err(StorageError::InvalidData(format!(
                        "`notes` must be an array, got {}",
                        json_kind(&other)
                    )));
                }
            };
            // Bounded by FORMAT_VERSION above.
            (version as u32, items)
        }
        other => {
            return Err(StorageError::InvalidData(format!(
                "expected object or array, got {}",
                json_kind(&other)
            )));
        }
    };

    let mut seen: HashSet<NoteId> = HashSet::with_capacity(raw_notes.len());
    let mut notes = Vec::with_capacity(raw_notes.len());
    for (position, raw) in raw_notes.into_iter().enumerate() {
        let note: Note = serde_json::from_value(raw).map_err(|err| {
            StorageError::InvalidData(format!("note at position {position}: {err}"))
        })?;
        if !seen.insert(note.id) {
            return Err(StorageError::InvalidData(format!(
                "duplicate note id `{}` at position {position}",
                note.id
            )));
        }
        notes.push(note);
    }

    Ok(DecodedNotes { version, notes })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_notes, encode_notes, FORMAT_VERSION, LEGACY_FORMAT_VERSION};
    use crate::storage::StorageError;

    #[test]
    fn blank_record_is_empty_collection() {
        let decoded = decode_notes(b"  \n").unwrap();
        assert!(decoded.notes.is_empty());
        assert_eq!(decoded.version, FORMAT_VERSION);
    }

    #[test]
    fn legacy_array_defaults_missing_fields() {
        let raw = br#"[{
            "id": "11111111-2222-4333-8444-555555555555",
            "title": "Buy milk",
            "category": "Shopping",
            "date": "2024-03-01",
            "pinned": true
        }]"#;
        let decoded = decode_notes(raw).unwrap();
        assert_eq!(decoded.version, LEGACY_FORMAT_VERSION);
        assert_eq!(decoded.notes.len(), 1);
        assert_eq!(decoded.notes[0].description, "");
        assert!(!decoded.notes[0].completed);
    }

    #[test]
    fn newer_version_is_rejected() {
        let err = decode_notes(br#"{"version": 7, "notes": []}"#).unwrap_err();
        assert!(matches!(
            err,
            StorageError::UnsupportedFormatVersion { found: 7, .. }
        ));
    }

    #[test]
    fn placeholder_category_in_storage_is_invalid_data() {
        let raw = br#"{"version": 1, "notes": [{
            "id": "11111111-2222-4333-8444-555555555555",
            "title": "Buy milk",
            "description": "",
            "category": "Select category",
            "completed": false,
            "date": "2024-03-01"
        }]}"#;
        let err = decode_notes(raw).unwrap_err();
        assert!(matches!(err, StorageError::InvalidData(_)), "{err}");
    }

    #[test]
    fn empty_collection_encodes_as_versioned_envelope() {
        let bytes = encode_notes(&[]).unwrap();
        assert_eq!(bytes, br#"{"version":1,"notes":[]}"#);
    }
}
