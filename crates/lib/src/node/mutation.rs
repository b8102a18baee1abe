//! Structural mutation of a node view.
//!
//! Every operation here is a fixed sequence of range shifts. The order of the
//! steps matters: a destination gap is always opened before the moving
//! subtree leaves its old place, and the old gap is closed last.

use tracing::debug;

use crate::Result;
use crate::backend::{Backend, Direction, Filter, Query};
use crate::config::Field;
use crate::node::{MovePrimitive, NodeError, NodeMut, Position};
use crate::record::{NestedSet, NodeInfo, NodeKey};

impl<T: NestedSet, B: Backend<T>> NodeMut<'_, T, B> {
    /// Adds `record` as the last child of this node and returns its view.
    pub fn add_child(&mut self, record: T) -> Result<NodeKey> {
        self.insert_record(record, MovePrimitive::LastChild)
    }

    /// Adds `record` as the first child of this node.
    pub fn add_first_child(&mut self, record: T) -> Result<NodeKey> {
        self.insert_record(record, MovePrimitive::FirstChild)
    }

    /// Adds `record` right before this node, at the same level.
    pub fn add_prev_sibling(&mut self, record: T) -> Result<NodeKey> {
        self.insert_record(record, MovePrimitive::PrevSibling)
    }

    /// Adds `record` right after this node, at the same level.
    pub fn add_next_sibling(&mut self, record: T) -> Result<NodeKey> {
        self.insert_record(record, MovePrimitive::NextSibling)
    }

    fn insert_record(&mut self, mut record: T, primitive: MovePrimitive) -> Result<NodeKey> {
        if record.id() != 0 && NodeKey::of::<T>(record.id()) == self.key {
            return Err(NodeError::SelfReference {
                id: record.id(),
                operation: primitive.insertion(),
            }
            .into());
        }
        if record.left() < record.right() {
            return Err(NodeError::AlreadyPositioned {
                id: record.id(),
                left: record.left(),
                right: record.right(),
            }
            .into());
        }

        let dest = self.position()?;
        let (left, right, level) = self.open_slot(&dest, primitive)?;
        record.set_left(left);
        record.set_right(right);
        record.set_level(level);
        record.set_root(dest.root);
        self.manager.backend.persist(&mut record)?;

        debug!(
            id = record.id(),
            destination = self.key.id(),
            left,
            level,
            "Inserted node ({})",
            primitive.insertion()
        );
        Ok(self.manager.adopt(record))
    }

    /// Opens a gap of two at the placement of `primitive` relative to `dest`
    /// and returns the new `(left, right, level)`.
    fn open_slot(&mut self, dest: &Position, primitive: MovePrimitive) -> Result<(i64, i64, i64)> {
        let placement = primitive.placement(dest);
        self.manager.shift_range(placement.0, None, 2, dest.root)?;
        Ok(placement)
    }

    pub fn move_as_prev_sibling_of(&mut self, dest: NodeKey) -> Result<()> {
        self.move_to(dest, MovePrimitive::PrevSibling)
    }

    pub fn move_as_next_sibling_of(&mut self, dest: NodeKey) -> Result<()> {
        self.move_to(dest, MovePrimitive::NextSibling)
    }

    pub fn move_as_first_child_of(&mut self, dest: NodeKey) -> Result<()> {
        self.move_to(dest, MovePrimitive::FirstChild)
    }

    pub fn move_as_last_child_of(&mut self, dest: NodeKey) -> Result<()> {
        self.move_to(dest, MovePrimitive::LastChild)
    }

    /// Moves this node and its subtree to the placement `primitive` describes
    /// relative to `dest`, within the tree or into another one.
    pub fn move_to(&mut self, dest: NodeKey, primitive: MovePrimitive) -> Result<()> {
        if dest == self.key {
            return Err(NodeError::SelfReference {
                id: self.key.id(),
                operation: primitive.operation(),
            }
            .into());
        }
        let pos = self.position()?;
        let target = self.manager.position(dest)?;

        if !self.manager.same_tree(&pos, &target) {
            return self.move_between_trees(dest, primitive);
        }
        if target.left > pos.left && target.right < pos.right {
            return Err(NodeError::DestinationInsideSubtree {
                id: self.key.id(),
                destination: dest.id(),
            }
            .into());
        }

        let (new_left, _, new_level) = primitive.placement(&target);
        debug!(
            id = self.key.id(),
            destination = dest.id(),
            new_left,
            new_level,
            "Moving node ({})",
            primitive.operation()
        );
        self.update_node(new_left, new_level - pos.level)
    }

    /// Relocates the subtree inside its tree so that it starts at
    /// `dest_left`, changing every level in it by `level_diff`.
    fn update_node(&mut self, dest_left: i64, level_diff: i64) -> Result<()> {
        let node = self.manager.node_entry(self.key)?;
        let level = node.level();
        node.record_mut().set_level(level + level_diff);
        node.invalidate();

        let pos = self.position()?;
        let size = pos.width();
        self.manager.shift_range(dest_left, None, size, pos.root)?;

        // Re-read: the gap above may have moved the subtree itself.
        let pos = self.position()?;
        self.manager
            .shift_levels(pos.left, pos.right, level_diff, pos.root)?;
        self.manager
            .shift_range(pos.left, Some(pos.right), dest_left - pos.left, pos.root)?;
        self.manager.shift_range(pos.right + 1, None, -size, pos.root)?;

        self.manager.persist_node(self.key)
    }

    /// Moves the subtree into the tree of `dest`.
    fn move_between_trees(&mut self, dest: NodeKey, primitive: MovePrimitive) -> Result<()> {
        let old = self.position()?;
        let target = self.manager.position(dest)?;

        let node = self.manager.node_entry(self.key)?;
        let record = node.record_mut();
        record.set_root(target.root);
        record.set_left(0);
        record.set_right(0);
        node.invalidate();

        let (new_left, new_right, new_level) = self.open_slot(&target, primitive)?;
        let record = self.manager.node_entry(self.key)?.record_mut();
        record.set_left(new_left);
        record.set_right(new_right);
        record.set_level(new_level);
        self.manager.persist_node(self.key)?;

        // Room for the descendants, right after the node's own left bound.
        let span = old.right - old.left - 1;
        self.manager
            .shift_range(new_left + 1, None, span, target.root)?;
        self.manager
            .node_entry(self.key)?
            .record_mut()
            .set_right(new_left + old.right - old.left);
        self.manager.persist_node(self.key)?;

        self.manager.relocate_descendants(
            old.left,
            old.right,
            old.root,
            target.root,
            new_left - old.left,
            new_level - old.level,
        )?;
        self.manager
            .shift_range(old.right + 1, None, old.left - old.right - 1, old.root)?;

        debug!(
            id = self.key.id(),
            from = old.root,
            to = target.root,
            new_left,
            "Moved subtree between trees ({})",
            primitive.operation()
        );
        Ok(())
    }

    /// Detaches this subtree from its tree and makes it the tree `new_root`.
    ///
    /// Only available for multi-root types. A node that already is a root is
    /// left untouched.
    pub fn make_root(&mut self, new_root: i64) -> Result<()> {
        if !self.manager.configuration().has_many_roots() {
            return Err(NodeError::NotMultiRoot {
                operation: "make root",
            }
            .into());
        }
        let view = self.view()?;
        if view.is_root() {
            return Ok(());
        }
        let old = view.position();

        self.manager.relocate_descendants(
            old.left,
            old.right,
            old.root,
            new_root,
            1 - old.left,
            -old.level,
        )?;
        self.manager
            .shift_range(old.right + 1, None, old.left - old.right - 1, old.root)?;

        let node = self.manager.node_entry(self.key)?;
        let record = node.record_mut();
        record.set_left(1);
        record.set_right(old.right - old.left + 1);
        record.set_level(0);
        record.set_root(new_root);
        node.invalidate();
        self.manager.persist_node(self.key)?;

        debug!(id = self.key.id(), from = old.root, to = new_root, "Made node a root");
        Ok(())
    }

    /// Deletes this node and its whole subtree, closing the gap it leaves.
    ///
    /// Returns the deleted records ordered by their former left bound, each
    /// reset to the detached position `(0, 0, 0, 0)`. Their views are dropped
    /// from the registry and the store is told to release them.
    pub fn delete(self) -> Result<Vec<T>> {
        let pos = self.position()?;
        let scope = self.manager.scope(pos.root);
        let filter = Filter::new()
            .ge(Field::Left, pos.left)
            .le(Field::Right, pos.right)
            .in_root(scope);

        let mut removed = self.manager.backend.scan(
            &Query::new(filter.clone()).order_by(Field::Left, Direction::Ascending),
        )?;
        let deleted = self.manager.backend.delete(&filter)?;
        self.manager.registry.remove_nodes(pos.left, pos.right, scope);
        for record in &mut removed {
            record.set_left(0);
            record.set_right(0);
            record.set_level(0);
            record.set_root(0);
            self.manager.backend.detach(record.id())?;
        }

        self.manager
            .shift_range(pos.right + 1, None, pos.left - pos.right - 1, pos.root)?;

        debug!(id = self.key.id(), deleted, "Deleted subtree");
        Ok(removed)
    }
}
