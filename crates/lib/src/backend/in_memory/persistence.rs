//! Persistence operations for the InMemory backend
//!
//! This module handles serialization and file I/O for saving/loading
//! the in-memory store to/from JSON files.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use super::InMemory;
use crate::{Error, Result, backend::BackendError, record::NodeInfo};

/// The current persistence file format version.
/// v0 indicates this is an unstable format subject to breaking changes.
const PERSISTENCE_VERSION: u8 = 0;

/// Helper to check if version is default (0) for serde skip_serializing_if
fn is_v0(v: &u8) -> bool {
    *v == 0
}

/// Serializable form of the store.
#[derive(Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: DeserializeOwned"))]
struct SerializableStore<T> {
    /// File format version for compatibility checking
    #[serde(rename = "_v", default, skip_serializing_if = "is_v0")]
    version: u8,
    next_id: i64,
    rows: Vec<T>,
}

/// Saves every record of `backend` to `path` as pretty-printed JSON.
pub(crate) fn save_to_file<T, P>(backend: &InMemory<T>, path: P) -> Result<()>
where
    T: Serialize + DeserializeOwned + NodeInfo,
    P: AsRef<Path>,
{
    let serializable = SerializableStore {
        version: PERSISTENCE_VERSION,
        next_id: backend.next_id,
        rows: backend.rows.values().collect::<Vec<&T>>(),
    };

    let json = serde_json::to_string_pretty(&serializable)
        .map_err(|e| -> Error { BackendError::SerializationFailed { source: e }.into() })?;
    std::fs::write(path, json).map_err(|e| -> Error { BackendError::FileIo { source: e }.into() })
}

/// Loads a store from `path`.
///
/// If the file does not exist, a new, empty store is returned.
pub(crate) fn load_from_file<T, P>(path: P) -> Result<InMemory<T>>
where
    T: Serialize + DeserializeOwned + NodeInfo,
    P: AsRef<Path>,
{
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(InMemory::new()),
        Err(e) => return Err(BackendError::FileIo { source: e }.into()),
    };

    let stored: SerializableStore<T> = serde_json::from_str(&json)
        .map_err(|e| -> Error { BackendError::DeserializationFailed { source: e }.into() })?;
    if stored.version != PERSISTENCE_VERSION {
        return Err(BackendError::UnsupportedVersion {
            found: stored.version,
            supported: PERSISTENCE_VERSION,
        }
        .into());
    }

    let rows: BTreeMap<i64, T> = stored.rows.into_iter().map(|row| (row.id(), row)).collect();
    let next_id = rows
        .keys()
        .next_back()
        .map_or(stored.next_id, |max| stored.next_id.max(max + 1));

    Ok(InMemory { rows, next_id })
}
