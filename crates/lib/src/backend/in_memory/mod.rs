//! In-memory store backend implementation
//!
//! This module provides an in-memory implementation of the Backend trait,
//! suitable for testing, development, or scenarios where data persistence
//! is handled externally by saving and loading the whole store as JSON.

mod persistence;
mod storage;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::Result;
use crate::backend::{Backend, Filter, Query, Update};
use crate::config::Field;
use crate::record::NodeInfo;

/// A simple in-memory store keeping records in a `BTreeMap` keyed by id.
///
/// Ids are assigned from an auto-increment counter starting at `1`. Scans
/// without an explicit order return records in id order.
#[derive(Debug, Clone)]
pub struct InMemory<T> {
    pub(crate) rows: BTreeMap<i64, T>,
    pub(crate) next_id: i64,
}

impl<T> Default for InMemory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> InMemory<T> {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The stored copy of the record with `id`.
    pub fn get(&self, id: i64) -> Option<&T> {
        self.rows.get(&id)
    }

    /// All stored records in id order.
    pub fn all(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }
}

impl<T: Serialize + DeserializeOwned + NodeInfo> InMemory<T> {
    /// Saves every record to `path` as JSON.
    ///
    /// # Returns
    /// A `Result` indicating success or an I/O or serialization error.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persistence::save_to_file(self, path)
    }

    /// Loads a store previously written by [`save_to_file`](Self::save_to_file).
    ///
    /// If the file does not exist, a new, empty store is returned.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        persistence::load_from_file(path)
    }
}

impl<T: NodeInfo + Clone> Backend<T> for InMemory<T> {
    fn scan(&self, query: &Query) -> Result<Vec<T>> {
        Ok(storage::scan(self, query))
    }

    fn update(&mut self, update: &Update) -> Result<usize> {
        Ok(storage::update(self, update))
    }

    fn delete(&mut self, filter: &Filter) -> Result<usize> {
        Ok(storage::delete(self, filter))
    }

    fn persist(&mut self, record: &mut T) -> Result<()> {
        storage::persist(self, record);
        Ok(())
    }

    fn max(&self, field: Field, root: Option<i64>) -> Result<Option<i64>> {
        Ok(storage::max(self, field, root))
    }
}
