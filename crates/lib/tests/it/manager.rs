//! Registry and tree-fetching tests for the manager.

use nestedset::backend::InMemory;
use nestedset::{Configuration, NestedSetManager, NodeKey};

use crate::helpers::*;

#[test]
fn test_get_node_returns_canonical_view() {
    let mut manager = manager();
    let tree = basic_tree(&mut manager);

    // A stale copy taken before the tree grew.
    let stale = manager.node(tree.prog).unwrap().record().clone();
    manager.node_mut(tree.prog).unwrap().add_child(category("WPF")).unwrap();

    let key = manager.get_node(stale).unwrap();
    assert_eq!(key, tree.prog);
    assert_eq!(bounds(&manager, key), (1, 8, 0));
}

#[test]
fn test_get_node_rejects_unpositioned_record() {
    let mut manager = manager();
    let err = manager.get_node(category("Loose")).unwrap_err();
    assert!(err.is_not_a_node());
    assert!(manager.is_empty());
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let config = Configuration::new("category").with_left_field("rgt");
    let err = NestedSetManager::<Category, InMemory<Category>>::with_configuration(InMemory::new(), config)
        .unwrap_err();
    assert!(err.is_config_error());
}

#[test]
fn test_configuration_is_cached() {
    let manager = multi_root_manager();
    assert!(manager.configuration().has_many_roots());
    assert_eq!(manager.configuration().entity_name(), "category");
}

#[test]
fn test_fetch_tree_links_without_queries() {
    let (backend, faults) = FailingBackend::create();
    let mut manager = NestedSetManager::new(backend).unwrap();
    let prog = manager.create_root(category("Prog")).unwrap();
    let java = manager.node_mut(prog).unwrap().add_child(category("Java")).unwrap();
    let ejb = manager.node_mut(java).unwrap().add_child(category("EJB")).unwrap();
    let net = manager.node_mut(prog).unwrap().add_child(category("Net")).unwrap();
    manager.clear();

    let list = manager.fetch_tree_as_list(0).unwrap();
    assert_eq!(list, vec![prog, java, ejb, net]);
    let scans = faults.scan_count.get();

    let mut root = manager.node_mut(prog).unwrap();
    assert_eq!(root.children().unwrap(), vec![java, net]);
    assert_eq!(root.descendants().unwrap(), vec![java, ejb, net]);
    assert_eq!(root.first_child().unwrap(), Some(java));
    assert_eq!(root.last_child().unwrap(), Some(net));
    assert_eq!(root.ancestors().unwrap(), Vec::<NodeKey>::new());

    let mut leaf = manager.node_mut(ejb).unwrap();
    assert_eq!(leaf.parent().unwrap(), Some(java));
    assert_eq!(leaf.ancestors().unwrap(), vec![prog, java]);
    assert!(leaf.children().unwrap().is_empty());
    assert_eq!(leaf.path(" > ").unwrap(), "Prog > Java");

    assert_eq!(faults.scan_count.get(), scans);
}

#[test]
fn test_fetch_tree() {
    let mut manager = manager();
    let tree = basic_tree(&mut manager);
    manager.clear();

    let root = manager.fetch_tree(0).unwrap();
    assert_eq!(root, Some(tree.prog));
    assert_eq!(manager.len(), 3);

    let mut empty = crate::helpers::manager();
    assert_eq!(empty.fetch_tree(0).unwrap(), None);
    assert!(empty.fetch_tree_as_list(0).unwrap().is_empty());
}

#[test]
fn test_list_nodes_ordered_by_left() {
    let mut manager = manager();
    let keys = lettered_tree(&mut manager);
    manager.clear();

    let listed = manager.list_nodes(0).unwrap();
    assert_eq!(
        names(&manager, &listed),
        ["A", "B", "D", "H", "C", "E", "F", "I", "J", "K", "G"]
    );
    assert_eq!(listed[0], keys["A"]);
}

#[test]
fn test_find_and_refresh() {
    let mut manager = manager();
    let tree = basic_tree(&mut manager);
    manager.clear();

    let net = manager.find(tree.net.id()).unwrap();
    assert_eq!(net, tree.net);
    assert_eq!(bounds(&manager, net), (4, 5, 1));

    manager.node_mut(net).unwrap().parent().unwrap();
    manager.refresh(net).unwrap();
    assert_eq!(bounds(&manager, net), (4, 5, 1));

    assert!(manager.find(99).unwrap_err().is_not_found());
    assert!(manager.refresh(NodeKey::of::<Category>(99)).unwrap_err().is_not_found());
}

#[test]
fn test_evict_and_clear() {
    let mut manager = manager();
    let tree = basic_tree(&mut manager);
    assert_eq!(manager.len(), 3);

    let record = manager.evict(tree.java).unwrap();
    assert_eq!(record.name, "Java");
    assert!(manager.node(tree.java).is_err());
    assert!(manager.evict(tree.java).is_none());

    // Re-fetched through the registry after eviction.
    let children = manager.node_mut(tree.prog).unwrap().children().unwrap();
    assert_eq!(children, vec![tree.java, tree.net]);
    assert!(manager.contains(tree.java));

    manager.clear();
    assert!(manager.is_empty());
    assert_eq!(manager.backend().len(), 3);
}

#[test]
fn test_scoped_evicts_views_created_inside() {
    let mut manager = manager();
    let tree = basic_tree(&mut manager);
    manager.clear();
    let prog = manager.find(tree.prog.id()).unwrap();

    let count = manager.scoped(|m| {
        let children = m.node_mut(prog).unwrap().children().unwrap();
        assert_eq!(m.len(), 3);
        children.len()
    });

    assert_eq!(count, 2);
    assert_eq!(manager.len(), 1);
    assert!(manager.contains(prog));
    assert!(!manager.contains(tree.java));
}

#[test]
fn test_managed_nodes_snapshot() {
    let mut manager = multi_root_manager();
    let second = manager.create_root(category_in("Second", 2)).unwrap();
    let first = manager.create_root(category_in("First", 1)).unwrap();
    manager.node_mut(first).unwrap().add_child(category("Child")).unwrap();

    let ids: Vec<i64> = manager.managed_nodes().iter().map(|node| node.id()).collect();
    assert_eq!(ids.len(), 3);
    assert_eq!(ids[0], first.id());
    assert_eq!(ids[2], second.id());
}
