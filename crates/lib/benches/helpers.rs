//! Shared helpers for benchmark tests

use nestedset::backend::InMemory;
use nestedset::{Configuration, NestedSet, NestedSetManager, NodeInfo, NodeKey};

#[derive(Debug, Clone, Default)]
pub struct Item {
    id: i64,
    lft: i64,
    rgt: i64,
    level: i64,
}

impl NodeInfo for Item {
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn left(&self) -> i64 {
        self.lft
    }
    fn set_left(&mut self, value: i64) {
        self.lft = value;
    }
    fn right(&self) -> i64 {
        self.rgt
    }
    fn set_right(&mut self, value: i64) {
        self.rgt = value;
    }
    fn level(&self) -> i64 {
        self.level
    }
    fn set_level(&mut self, value: i64) {
        self.level = value;
    }
    fn root(&self) -> i64 {
        0
    }
    fn set_root(&mut self, _value: i64) {}
}

impl NestedSet for Item {
    fn configuration() -> Configuration {
        Configuration::new("item")
    }
}

pub type Manager = NestedSetManager<Item, InMemory<Item>>;

/// Builds a tree with `fanout` children under the root and `fanout` leaves
/// under each child. Returns the manager, the root and the children.
pub fn setup_tree(fanout: usize) -> (Manager, NodeKey, Vec<NodeKey>) {
    let mut manager = NestedSetManager::new(InMemory::new()).expect("Failed to create manager");
    let root = manager
        .create_root(Item::default())
        .expect("Failed to create root");
    let mut children = Vec::with_capacity(fanout);
    for _ in 0..fanout {
        let child = manager
            .node_mut(root)
            .and_then(|mut node| node.add_child(Item::default()))
            .expect("Failed to add child");
        for _ in 0..fanout {
            manager
                .node_mut(child)
                .and_then(|mut node| node.add_child(Item::default()))
                .expect("Failed to add leaf");
        }
        children.push(child);
    }
    (manager, root, children)
}
