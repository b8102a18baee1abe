//! Detached, read-only trees built from plain records.
//!
//! A [`TreeView`] links a left-ordered record list the same way the manager
//! links its views, but owns the records outright: there is no registry and no
//! synchronisation with the store. It is meant for snapshots that outlive the
//! session that produced them, and can be serialised as nested
//! `{ "node": .., "children": [..] }` documents.

mod errors;

pub use errors::TreeViewError;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::{debug, warn};

use crate::record::NodeInfo;

struct Entry<T> {
    record: T,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// A forest of records linked by parent and children.
///
/// Usually a single tree; a list spanning several top-level nodes yields one
/// root per top-level node.
pub struct TreeView<T> {
    entries: Vec<Entry<T>>,
    roots: Vec<usize>,
}

impl<T: NodeInfo> TreeView<T> {
    /// Links `records`, which must be non-empty and ordered by left bound.
    pub fn build(records: Vec<T>) -> Result<Self, TreeViewError> {
        Self::build_with_max_level(records, None)
    }

    /// Like [`build`](Self::build), dropping every record deeper than
    /// `max_level`.
    pub fn build_with_max_level(
        records: Vec<T>,
        max_level: Option<i64>,
    ) -> Result<Self, TreeViewError> {
        if records.is_empty() {
            return Err(TreeViewError::EmptyInput);
        }
        if let Some(position) = records
            .windows(2)
            .position(|pair| pair[1].left() <= pair[0].left())
        {
            return Err(TreeViewError::NotSortedByLeft {
                position: position + 1,
            });
        }

        let mut entries: Vec<Entry<T>> = Vec::with_capacity(records.len());
        let mut roots = Vec::new();
        let mut stack: Vec<usize> = Vec::new();

        for record in records {
            let level = record.level();
            if let Some(max) = max_level
                && level > max
            {
                warn!(id = record.id(), level, max_level = max, "Skipped record beyond the maximum level");
                continue;
            }
            while stack
                .last()
                .is_some_and(|&top| entries[top].record.level() >= level)
            {
                stack.pop();
            }

            let index = entries.len();
            let parent = stack.last().copied();
            match parent {
                Some(parent) => entries[parent].children.push(index),
                None => roots.push(index),
            }

            let expands = record.right() - record.left() > 1 && max_level.is_none_or(|max| level < max);
            entries.push(Entry {
                record,
                parent,
                children: Vec::new(),
            });
            if expands {
                stack.push(index);
            }
        }

        if entries.is_empty() {
            return Err(TreeViewError::EmptyInput);
        }
        debug!(nodes = entries.len(), roots = roots.len(), "Built tree view");
        Ok(Self { entries, roots })
    }
}

impl<T> TreeView<T> {
    /// The first root, i.e. the node built from the first record.
    pub fn root(&self) -> TreeNode<'_, T> {
        TreeNode {
            tree: self,
            index: self.roots[0],
        }
    }

    pub fn roots(&self) -> impl Iterator<Item = TreeNode<'_, T>> {
        self.roots.iter().map(|&index| TreeNode { tree: self, index })
    }

    /// Every node in left-bound order.
    pub fn iter(&self) -> impl Iterator<Item = TreeNode<'_, T>> {
        (0..self.entries.len()).map(|index| TreeNode { tree: self, index })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the view and returns the linked records in left-bound order.
    pub fn into_records(self) -> Vec<T> {
        self.entries.into_iter().map(|entry| entry.record).collect()
    }
}

/// One node of a [`TreeView`].
pub struct TreeNode<'a, T> {
    tree: &'a TreeView<T>,
    index: usize,
}

impl<T> Clone for TreeNode<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TreeNode<'_, T> {}

impl<'a, T> TreeNode<'a, T> {
    fn entry(&self) -> &'a Entry<T> {
        &self.tree.entries[self.index]
    }

    fn at(&self, index: usize) -> TreeNode<'a, T> {
        TreeNode {
            tree: self.tree,
            index,
        }
    }

    pub fn record(&self) -> &'a T {
        &self.entry().record
    }

    pub fn parent(&self) -> Option<TreeNode<'a, T>> {
        self.entry().parent.map(|index| self.at(index))
    }

    pub fn children(&self) -> impl Iterator<Item = TreeNode<'a, T>> + 'a {
        let tree = self.tree;
        self.entry()
            .children
            .iter()
            .map(move |&index| TreeNode { tree, index })
    }

    pub fn number_of_children(&self) -> usize {
        self.entry().children.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.entry().children.is_empty()
    }

    /// Ancestors from the top of the view down to the parent.
    pub fn ancestors(&self) -> Vec<TreeNode<'a, T>> {
        let mut ancestors = Vec::new();
        let mut current = self.parent();
        while let Some(node) = current {
            ancestors.push(node);
            current = node.parent();
        }
        ancestors.reverse();
        ancestors
    }

    /// Every linked descendant in left-bound order.
    pub fn descendants(&self) -> Vec<TreeNode<'a, T>> {
        let mut descendants = Vec::new();
        let mut pending: Vec<usize> = self.entry().children.iter().rev().copied().collect();
        while let Some(index) = pending.pop() {
            descendants.push(self.at(index));
            pending.extend(self.tree.entries[index].children.iter().rev());
        }
        descendants
    }
}

impl<T: Serialize> Serialize for TreeNode<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let children: Vec<TreeNode<'_, T>> = self.children().collect();
        let mut state = serializer.serialize_struct("TreeNode", 2)?;
        state.serialize_field("node", self.record())?;
        state.serialize_field("children", &children)?;
        state.end()
    }
}

impl<T: Serialize> Serialize for TreeView<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.roots())
    }
}
