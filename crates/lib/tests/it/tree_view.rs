//! Detached tree views built from store snapshots.

use nestedset::backend::{Backend, Direction, Filter, Query};
use nestedset::tree_view::TreeNode;
use nestedset::{Field, TreeView};

use crate::helpers::*;

fn snapshot() -> Vec<Category> {
    let mut manager = manager();
    lettered_tree(&mut manager);
    let backend = manager.into_backend();
    backend
        .scan(&Query::new(Filter::new()).order_by(Field::Left, Direction::Ascending))
        .unwrap()
}

fn labels<'a>(nodes: impl IntoIterator<Item = TreeNode<'a, Category>>) -> Vec<&'a str> {
    nodes.into_iter().map(|node| node.record().name.as_str()).collect()
}

fn find<'a>(tree: &'a TreeView<Category>, name: &str) -> TreeNode<'a, Category> {
    tree.iter().find(|node| node.record().name == name).unwrap()
}

#[test]
fn test_builds_full_tree() {
    let tree = TreeView::build(snapshot()).unwrap();
    assert_eq!(tree.len(), 11);

    let root = tree.root();
    assert_eq!(root.record().name, "A");
    assert_eq!(labels(root.children()), ["B", "C"]);
    assert_eq!(labels(find(&tree, "C").children()), ["E", "F", "G"]);
    assert_eq!(labels(find(&tree, "I").children()), ["J", "K"]);
    assert_eq!(find(&tree, "G").parent().unwrap().record().name, "C");
    assert!(find(&tree, "H").is_leaf());
}

#[test]
fn test_ancestors_and_descendants() {
    let tree = TreeView::build(snapshot()).unwrap();

    assert_eq!(labels(find(&tree, "K").ancestors()), ["A", "C", "F", "I"]);
    assert_eq!(labels(find(&tree, "C").descendants()), ["E", "F", "I", "J", "K", "G"]);
    assert_eq!(find(&tree, "A").descendants().len(), 10);
}

#[test]
fn test_max_level_drops_deeper_records() {
    let tree = TreeView::build_with_max_level(snapshot(), Some(2)).unwrap();

    assert_eq!(tree.len(), 7);
    assert_eq!(labels(find(&tree, "C").children()), ["E", "F", "G"]);
    assert!(find(&tree, "F").is_leaf());
    assert!(tree.iter().all(|node| node.record().level <= 2));
}

#[test]
fn test_subtree_snapshot() {
    let records: Vec<Category> = snapshot()
        .into_iter()
        .filter(|record| record.lft >= 11 && record.rgt <= 18)
        .collect();
    let tree = TreeView::build(records).unwrap();

    assert_eq!(tree.root().record().name, "F");
    assert_eq!(labels(tree.root().descendants()), ["I", "J", "K"]);
}

#[test]
fn test_forest_of_top_level_nodes() {
    let mut manager = manager();
    basic_tree(&mut manager);
    manager.create_root(category("Other")).unwrap();
    let records = manager
        .backend()
        .scan(&Query::new(Filter::new()).order_by(Field::Left, Direction::Ascending))
        .unwrap();

    let tree = TreeView::build(records).unwrap();
    assert_eq!(labels(tree.roots()), ["Prog", "Other"]);
    assert_eq!(labels(tree.root().children()), ["Java", "Net"]);
}

#[test]
fn test_rejects_invalid_input() {
    let err = TreeView::<Category>::build(Vec::new()).err().unwrap();
    assert!(err.is_invalid_input());

    let mut records = snapshot();
    records.swap(1, 2);
    let err = TreeView::build(records).err().unwrap();
    let err: nestedset::Error = err.into();
    assert!(err.is_caller_error());
    assert_eq!(err.module(), "tree_view");
}

#[test]
fn test_serialises_nested_snapshot() {
    let mut manager = manager();
    basic_tree(&mut manager);
    let records = manager
        .into_backend()
        .scan(&Query::new(Filter::new()).order_by(Field::Left, Direction::Ascending))
        .unwrap();
    let tree = TreeView::build(records).unwrap();

    let value = serde_json::to_value(tree.root()).unwrap();
    assert_eq!(value["node"]["name"], "Prog");
    assert_eq!(value["children"][1]["node"]["name"], "Net");
    assert_eq!(value["children"][1]["node"]["lft"], 4);

    let forest = serde_json::to_value(&tree).unwrap();
    assert_eq!(forest.as_array().map(Vec::len), Some(1));
}
