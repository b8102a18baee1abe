//! Identity map of node views.
//!
//! The registry owns every live [`Node`] of one manager, at most one per
//! [`NodeKey`]. Structural mutations call the `update_*` methods right after
//! the matching bulk store update so that each cached view keeps reflecting
//! exactly what a fresh scan would return.
//!
//! Every range method takes a root scope: `Some(root)` restricts it to the
//! views of one tree, `None` (single-tree types) matches every view.

use std::collections::HashMap;

use tracing::trace;

use crate::node::Node;
use crate::record::{NodeInfo, NodeKey};

#[derive(Debug)]
pub(crate) struct Registry<T> {
    nodes: HashMap<NodeKey, Node<T>>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }
}

fn in_scope(root: i64, scope: Option<i64>) -> bool {
    scope.is_none_or(|scope| root == scope)
}

fn in_range(value: i64, first: i64, last: Option<i64>) -> bool {
    value >= first && last.is_none_or(|last| value <= last)
}

impl<T: NodeInfo> Registry<T> {
    pub(crate) fn get(&self, key: &NodeKey) -> Option<&Node<T>> {
        self.nodes.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &NodeKey) -> Option<&mut Node<T>> {
        self.nodes.get_mut(key)
    }

    pub(crate) fn contains(&self, key: &NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Registers a view, replacing any previous view with the same key.
    pub(crate) fn insert(&mut self, key: NodeKey, node: Node<T>) {
        self.nodes.insert(key, node);
    }

    pub(crate) fn remove(&mut self, key: &NodeKey) -> Option<Node<T>> {
        self.nodes.remove(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &NodeKey> {
        self.nodes.keys()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&NodeKey, &Node<T>)> {
        self.nodes.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    pub(crate) fn invalidate_all(&mut self) {
        for node in self.nodes.values_mut() {
            node.invalidate();
        }
    }

    /// Adds `delta` to the left bound of every view with `left` in
    /// `[first, last]`.
    pub(crate) fn update_left_values(
        &mut self,
        first: i64,
        last: Option<i64>,
        delta: i64,
        root: Option<i64>,
    ) -> usize {
        let mut synced = 0;
        for node in self.nodes.values_mut() {
            if in_scope(node.root(), root) && in_range(node.left(), first, last) {
                let record = node.record_mut();
                record.set_left(record.left() + delta);
                node.invalidate();
                synced += 1;
            }
        }
        trace!(first, ?last, delta, ?root, synced, "Synced left bounds");
        synced
    }

    /// Adds `delta` to the right bound of every view with `right` in
    /// `[first, last]`.
    pub(crate) fn update_right_values(
        &mut self,
        first: i64,
        last: Option<i64>,
        delta: i64,
        root: Option<i64>,
    ) -> usize {
        let mut synced = 0;
        for node in self.nodes.values_mut() {
            if in_scope(node.root(), root) && in_range(node.right(), first, last) {
                let record = node.record_mut();
                record.set_right(record.right() + delta);
                node.invalidate();
                synced += 1;
            }
        }
        trace!(first, ?last, delta, ?root, synced, "Synced right bounds");
        synced
    }

    /// Adds `delta` to the level of every view strictly inside `(left, right)`.
    pub(crate) fn update_levels(
        &mut self,
        left: i64,
        right: i64,
        delta: i64,
        root: Option<i64>,
    ) -> usize {
        let mut synced = 0;
        for node in self.nodes.values_mut() {
            if in_scope(node.root(), root) && node.left() > left && node.right() < right {
                let record = node.record_mut();
                record.set_level(record.level() + delta);
                node.invalidate();
                synced += 1;
            }
        }
        trace!(left, right, delta, ?root, synced, "Synced levels");
        synced
    }

    /// Moves every view strictly inside `(left, right)` of tree `from` into
    /// tree `to`, shifting bounds by `diff` and levels by `level_diff`.
    pub(crate) fn relocate(
        &mut self,
        left: i64,
        right: i64,
        from: i64,
        to: i64,
        diff: i64,
        level_diff: i64,
    ) -> usize {
        let mut synced = 0;
        for node in self.nodes.values_mut() {
            if node.root() == from && node.left() > left && node.right() < right {
                let record = node.record_mut();
                record.set_left(record.left() + diff);
                record.set_right(record.right() + diff);
                record.set_level(record.level() + level_diff);
                record.set_root(to);
                node.invalidate();
                synced += 1;
            }
        }
        trace!(left, right, from, to, diff, level_diff, synced, "Relocated views");
        synced
    }

    /// Unregisters every view inside `[left, right]` and returns them detached,
    /// their positions reset to `(0, 0, 0, 0)`.
    pub(crate) fn remove_nodes(&mut self, left: i64, right: i64, root: Option<i64>) -> Vec<Node<T>> {
        let keys: Vec<NodeKey> = self
            .nodes
            .iter()
            .filter(|(_, node)| {
                in_scope(node.root(), root) && node.left() >= left && node.right() <= right
            })
            .map(|(key, _)| *key)
            .collect();

        let mut removed: Vec<Node<T>> = keys
            .iter()
            .filter_map(|key| self.nodes.remove(key))
            .collect();
        removed.sort_by_key(|node| node.left());
        for node in &mut removed {
            node.detach();
        }
        trace!(left, right, ?root, removed = removed.len(), "Removed views");
        removed
    }
}
