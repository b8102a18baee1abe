//! Store backends for nested-set records.
//!
//! This module provides the core [`Backend`] trait and the [`InMemory`]
//! reference implementation.
//!
//! The `Backend` trait defines the handful of set-oriented operations the
//! tree engine needs: ordered range scans, bulk numeric updates, bulk deletes,
//! single-record persistence, detaching records from managed tracking, and a
//! maximum-value query. Everything structural (where gaps open, in which order
//! shifts run) lives in the engine, so a backend only has to evaluate the
//! [`Filter`]/[`Query`]/[`Update`] values it is handed.
//!
//! Backends do not provide transactions. Every structural operation issues a
//! sequence of bulk updates that must run inside one transaction owned by the
//! caller; on failure the whole transaction has to be discarded.

mod errors;
mod in_memory;
mod query;

pub use errors::BackendError;
pub use in_memory::InMemory;
pub use query::{Assignment, Condition, Describe, Direction, Filter, Query, Update};

use crate::Result;
use crate::config::Field;
use crate::record::NodeInfo;

/// Storage abstraction for records of type `T`.
///
/// Errors returned by a backend are propagated unmodified by the engine.
pub trait Backend<T: NodeInfo> {
    /// Returns the records matching `query.filter`, ordered by `query.order`
    /// (store order when absent) and truncated to `query.limit`.
    fn scan(&self, query: &Query) -> Result<Vec<T>>;

    /// Applies `update` to every record matching its filter and returns the
    /// number of records changed.
    fn update(&mut self, update: &Update) -> Result<usize>;

    /// Deletes every record matching `filter` and returns how many were removed.
    fn delete(&mut self, filter: &Filter) -> Result<usize>;

    /// Inserts or overwrites a single record.
    ///
    /// Records with id `0` are new; the backend assigns an id and writes it
    /// back into `record`.
    fn persist(&mut self, record: &mut T) -> Result<()>;

    /// Releases the record with `id` from any managed tracking the store keeps.
    ///
    /// Called for every record removed by a delete. Stores without a session
    /// cache have nothing to release.
    fn detach(&mut self, id: i64) -> Result<()> {
        let _ = id;
        Ok(())
    }

    /// Maximum value of `field` over all records, optionally within one tree.
    /// Returns `None` when no record matches.
    fn max(&self, field: Field, root: Option<i64>) -> Result<Option<i64>>;
}

impl<T: NodeInfo, B: Backend<T> + ?Sized> Backend<T> for Box<B> {
    fn scan(&self, query: &Query) -> Result<Vec<T>> {
        (**self).scan(query)
    }

    fn update(&mut self, update: &Update) -> Result<usize> {
        (**self).update(update)
    }

    fn delete(&mut self, filter: &Filter) -> Result<usize> {
        (**self).delete(filter)
    }

    fn persist(&mut self, record: &mut T) -> Result<()> {
        (**self).persist(record)
    }

    fn detach(&mut self, id: i64) -> Result<()> {
        (**self).detach(id)
    }

    fn max(&self, field: Field, root: Option<i64>) -> Result<Option<i64>> {
        (**self).max(field, root)
    }
}
