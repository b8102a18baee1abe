//! Node views: live wrappers adding navigation and mutation to a positioned record.
//!
//! A [`Node`] owns one record together with lazily filled caches of its parent,
//! children, ancestors and descendants. Views live in the registry of a
//! [`NestedSetManager`](crate::NestedSetManager) and are addressed through
//! [`NodeKey`] handles; [`NodeMut`] borrows the manager to run navigation
//! queries and structural mutations on one of them.
//!
//! Every shift applied to the store is mirrored onto the cached views, and any
//! view whose bounds or level change drops all four caches at once.

mod errors;
mod mutation;
mod navigation;

pub use errors::NodeError;

use std::fmt;

use crate::backend::Backend;
use crate::manager::NestedSetManager;
use crate::record::{NestedSet, NodeInfo, NodeKey};

/// Snapshot of the four position fields of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub left: i64,
    pub right: i64,
    pub level: i64,
    pub root: i64,
}

impl Position {
    pub fn of<T: NodeInfo + ?Sized>(record: &T) -> Self {
        Self {
            left: record.left(),
            right: record.right(),
            level: record.level(),
            root: record.root(),
        }
    }

    /// Number of values the subtree occupies, `right - left + 1`.
    pub fn width(&self) -> i64 {
        self.right - self.left + 1
    }

    /// Whether `other` lies strictly inside this interval in the same tree.
    pub fn contains(&self, other: &Position) -> bool {
        other.left > self.left && other.right < self.right && other.root == self.root
    }
}

/// Where a node is placed relative to a destination node.
///
/// Each primitive has a numeric tag (`1..=4`), accepted through `TryFrom<u8>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovePrimitive {
    PrevSibling = 1,
    FirstChild = 2,
    NextSibling = 3,
    LastChild = 4,
}

impl MovePrimitive {
    /// New `(left, right, level)` of a single node placed relative to `dest`.
    pub fn placement(&self, dest: &Position) -> (i64, i64, i64) {
        match self {
            MovePrimitive::PrevSibling => (dest.left, dest.left + 1, dest.level),
            MovePrimitive::NextSibling => (dest.right + 1, dest.right + 2, dest.level),
            MovePrimitive::FirstChild => (dest.left + 1, dest.left + 2, dest.level + 1),
            MovePrimitive::LastChild => (dest.right, dest.right + 1, dest.level + 1),
        }
    }

    pub(crate) fn insertion(&self) -> &'static str {
        match self {
            MovePrimitive::PrevSibling => "add previous sibling",
            MovePrimitive::FirstChild => "add first child",
            MovePrimitive::NextSibling => "add next sibling",
            MovePrimitive::LastChild => "add child",
        }
    }

    pub(crate) fn operation(&self) -> &'static str {
        match self {
            MovePrimitive::PrevSibling => "move as previous sibling",
            MovePrimitive::FirstChild => "move as first child",
            MovePrimitive::NextSibling => "move as next sibling",
            MovePrimitive::LastChild => "move as last child",
        }
    }
}

impl TryFrom<u8> for MovePrimitive {
    type Error = NodeError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            1 => Ok(MovePrimitive::PrevSibling),
            2 => Ok(MovePrimitive::FirstChild),
            3 => Ok(MovePrimitive::NextSibling),
            4 => Ok(MovePrimitive::LastChild),
            tag => Err(NodeError::UnknownMovePrimitive { tag }),
        }
    }
}

/// Tree state reachable from one node. Cleared as a whole whenever the node's
/// bounds or level change.
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeCache {
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Option<Vec<NodeKey>>,
    pub(crate) ancestors: Option<Vec<NodeKey>>,
    pub(crate) descendants: Option<Vec<NodeKey>>,
    /// Depth the cached descendant list reaches; `None` means unbounded.
    pub(crate) descendant_depth: Option<u32>,
}

impl NodeCache {
    /// Whether the cached descendants answer a request for `depth`.
    pub(crate) fn covers_depth(&self, depth: Option<u32>) -> bool {
        if self.descendants.is_none() {
            return false;
        }
        match (self.descendant_depth, depth) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(cached), Some(requested)) => requested <= cached,
        }
    }
}

/// A registry-held view of one positioned record.
#[derive(Debug, Clone)]
pub struct Node<T> {
    record: T,
    pub(crate) cache: NodeCache,
}

impl<T: NodeInfo> Node<T> {
    pub(crate) fn new(record: T) -> Self {
        Self {
            record,
            cache: NodeCache::default(),
        }
    }

    /// The wrapped record.
    pub fn record(&self) -> &T {
        &self.record
    }

    pub(crate) fn record_mut(&mut self) -> &mut T {
        &mut self.record
    }

    pub(crate) fn into_record(self) -> T {
        self.record
    }

    pub fn id(&self) -> i64 {
        self.record.id()
    }

    pub fn left(&self) -> i64 {
        self.record.left()
    }

    pub fn right(&self) -> i64 {
        self.record.right()
    }

    pub fn level(&self) -> i64 {
        self.record.level()
    }

    pub fn root(&self) -> i64 {
        self.record.root()
    }

    pub fn position(&self) -> Position {
        Position::of(&self.record)
    }

    pub fn is_root(&self) -> bool {
        self.left() == 1
    }

    pub fn has_parent(&self) -> bool {
        !self.is_root()
    }

    pub fn has_children(&self) -> bool {
        self.right() - self.left() > 1
    }

    pub fn is_leaf(&self) -> bool {
        self.right() - self.left() == 1
    }

    /// A valid node has a position in a tree.
    pub fn is_valid(&self) -> bool {
        self.right() > self.left()
    }

    pub fn number_of_descendants(&self) -> i64 {
        (self.right() - self.left() - 1) / 2
    }

    /// Whether this node lies strictly inside `other` in the same tree.
    pub fn is_descendant_of(&self, other: &Node<T>) -> bool {
        other.position().contains(&self.position())
    }

    /// Drops every cached relation of this node.
    pub(crate) fn invalidate(&mut self) {
        self.cache = NodeCache::default();
    }

    /// Resets the position to the detached sentinel `(0, 0, 0, 0)`.
    pub(crate) fn detach(&mut self) {
        self.record.set_left(0);
        self.record.set_right(0);
        self.record.set_level(0);
        self.record.set_root(0);
        self.invalidate();
    }
}

impl<T: NestedSet> Node<T> {
    /// Registry handle of this view.
    pub fn key(&self) -> NodeKey {
        NodeKey::of::<T>(self.id())
    }
}

impl<T: NodeInfo + fmt::Display> fmt::Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[left: {}, right: {}, level: {}, node: {}]",
            self.left(),
            self.right(),
            self.level(),
            self.record
        )
    }
}

/// Mutable handle on one registered node.
///
/// Obtained from [`NestedSetManager::node_mut`]. Navigation goes through this
/// handle because filling a cache may register further views.
pub struct NodeMut<'a, T: NestedSet, B: Backend<T>> {
    pub(crate) manager: &'a mut NestedSetManager<T, B>,
    pub(crate) key: NodeKey,
}

impl<'a, T: NestedSet, B: Backend<T>> NodeMut<'a, T, B> {
    pub(crate) fn new(manager: &'a mut NestedSetManager<T, B>, key: NodeKey) -> Self {
        Self { manager, key }
    }

    pub fn key(&self) -> NodeKey {
        self.key
    }

    /// Read access to the underlying view.
    pub fn view(&self) -> crate::Result<&Node<T>> {
        self.manager.node(self.key)
    }

    pub(crate) fn position(&self) -> crate::Result<Position> {
        self.manager.position(self.key)
    }
}
