//! Core storage operations for the InMemory backend

use std::cmp::Ordering;

use super::InMemory;
use crate::backend::{Direction, Filter, Query, Update};
use crate::config::Field;
use crate::record::NodeInfo;

/// Filters, orders and limits the stored rows.
///
/// Ties in the requested order fall back to id order so results are stable.
pub(crate) fn scan<T: NodeInfo + Clone>(backend: &InMemory<T>, query: &Query) -> Vec<T> {
    let mut rows: Vec<T> = backend
        .rows
        .values()
        .filter(|row| query.filter.matches(*row))
        .cloned()
        .collect();

    if let Some((field, direction)) = query.order {
        rows.sort_by(|a, b| {
            let ord = a.value_of(field).cmp(&b.value_of(field));
            let ord = match direction {
                Direction::Ascending => ord,
                Direction::Descending => ord.reverse(),
            };
            match ord {
                Ordering::Equal => a.id().cmp(&b.id()),
                other => other,
            }
        });
    }

    if let Some(limit) = query.limit {
        rows.truncate(limit);
    }
    rows
}

/// Applies a bulk update. The filter is evaluated per row before that row's
/// assignments, matching set-based update semantics.
pub(crate) fn update<T: NodeInfo>(backend: &mut InMemory<T>, update: &Update) -> usize {
    let mut changed = 0;
    for row in backend.rows.values_mut() {
        if update.filter.matches(&*row) {
            update.apply(row);
            changed += 1;
        }
    }
    changed
}

pub(crate) fn delete<T: NodeInfo>(backend: &mut InMemory<T>, filter: &Filter) -> usize {
    let before = backend.rows.len();
    backend.rows.retain(|_, row| !filter.matches(&*row));
    before - backend.rows.len()
}

/// Inserts or overwrites a record, assigning an id to new records.
pub(crate) fn persist<T: NodeInfo + Clone>(backend: &mut InMemory<T>, record: &mut T) {
    if record.id() == 0 {
        record.set_id(backend.next_id);
    }
    let id = record.id();
    if id >= backend.next_id {
        backend.next_id = id + 1;
    }
    backend.rows.insert(id, record.clone());
}

pub(crate) fn max<T: NodeInfo>(backend: &InMemory<T>, field: Field, root: Option<i64>) -> Option<i64> {
    backend
        .rows
        .values()
        .filter(|row| root.is_none_or(|root| row.root() == root))
        .map(|row| row.value_of(field))
        .max()
}
