//! Record contract for hierarchical records.
//!
//! Any type stored in a nested set exposes its identity and the four integers
//! describing its position: left bound, right bound, level and root (tree) id.
//! The engine never inspects anything else about a record.

use std::any::TypeId;
use std::fmt;

use crate::config::{Configuration, Field};

/// A record carrying its identity and its position in a nested set.
///
/// A record with `right <= left` has no position yet and is not a node.
/// Freshly constructed records usually start at `(0, 0, 0, 0)`.
pub trait NodeInfo {
    /// Store-assigned identity. `0` means the record has never been persisted.
    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);

    fn left(&self) -> i64;
    fn set_left(&mut self, value: i64);

    fn right(&self) -> i64;
    fn set_right(&mut self, value: i64);

    fn level(&self) -> i64;
    fn set_level(&mut self, value: i64);

    /// Tree id in multi-root configurations. Ignored for single-tree types.
    fn root(&self) -> i64;
    fn set_root(&mut self, value: i64);

    /// Reads the field playing `field`'s role.
    fn value_of(&self, field: Field) -> i64 {
        match field {
            Field::Id => self.id(),
            Field::Left => self.left(),
            Field::Right => self.right(),
            Field::Level => self.level(),
            Field::Root => self.root(),
        }
    }

    /// Writes the field playing `field`'s role.
    fn set_value_of(&mut self, field: Field, value: i64) {
        match field {
            Field::Id => self.set_id(value),
            Field::Left => self.set_left(value),
            Field::Right => self.set_right(value),
            Field::Level => self.set_level(value),
            Field::Root => self.set_root(value),
        }
    }
}

/// Record types that declare how their position fields are stored.
///
/// The configuration is resolved once per manager and cached for its lifetime.
pub trait NestedSet: NodeInfo + Clone + 'static {
    fn configuration() -> Configuration;
}

/// Identity of a node view in the registry: the record type plus its id.
///
/// Keys are cheap handles; the view itself is owned by the manager and looked
/// up through the key, so holding a key never aliases registry state.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey {
    type_id: TypeId,
    id: i64,
}

impl NodeKey {
    /// Builds the key identifying the record of type `T` with the given id.
    pub fn of<T: 'static>(id: i64) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            id,
        }
    }

    /// The record id this key refers to.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Whether this key identifies a record of type `T`.
    pub fn is_of<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl fmt::Debug for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeKey({})", self.id)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.id)
    }
}
