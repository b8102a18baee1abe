use nestedset::NodeKey;

use crate::helpers::*;

#[test]
fn test_root_then_two_children() {
    let mut manager = manager();
    let root = manager.create_root(category("Root")).unwrap();
    assert_eq!(bounds(&manager, root), (1, 2, 0));

    let first = manager.node_mut(root).unwrap().add_child(category("First")).unwrap();
    assert_eq!(bounds(&manager, first), (2, 3, 1));
    assert_eq!(bounds(&manager, root), (1, 4, 0));

    let second = manager.node_mut(root).unwrap().add_child(category("Second")).unwrap();
    assert_eq!(bounds(&manager, second), (4, 5, 1));
    assert_eq!(bounds(&manager, root), (1, 6, 0));

    assert_consistent(&manager);
}

#[test]
fn test_created_records_are_persisted() {
    let mut manager = manager();
    let tree = basic_tree(&mut manager);

    assert_eq!(manager.backend().len(), 3);
    let stored = manager.backend().get(tree.net.id()).unwrap();
    assert_eq!(stored.name, "Net");
    assert_eq!((stored.lft, stored.rgt, stored.level), (4, 5, 1));
}

#[test]
fn test_single_tree_roots_are_appended() {
    let mut manager = manager();
    basic_tree(&mut manager);
    let other = manager.create_root(category("Other")).unwrap();

    assert_eq!(bounds(&manager, other), (7, 8, 0));
    assert!(!manager.node(other).unwrap().is_root());
    assert_consistent(&manager);
}

#[test]
fn test_create_root_rejects_positioned_record() {
    let mut manager = manager();
    let tree = basic_tree(&mut manager);
    let java = manager.node(tree.java).unwrap().record().clone();

    let err = manager.create_root(java).unwrap_err();
    assert!(err.is_caller_error());
    assert_eq!(err.module(), "node");
}

#[test]
fn test_add_first_child_is_one_level_deeper() {
    let mut manager = manager();
    let tree = basic_tree(&mut manager);

    let csharp = manager
        .node_mut(tree.prog)
        .unwrap()
        .add_first_child(category("C#"))
        .unwrap();

    assert_eq!(bounds(&manager, csharp), (2, 3, 1));
    assert_eq!(bounds(&manager, tree.java), (4, 5, 1));
    assert_eq!(bounds(&manager, tree.net), (6, 7, 1));
    assert_eq!(bounds(&manager, tree.prog), (1, 8, 0));
    assert_consistent(&manager);
}

#[test]
fn test_add_siblings() {
    let mut manager = manager();
    let tree = basic_tree(&mut manager);

    let before = manager
        .node_mut(tree.java)
        .unwrap()
        .add_prev_sibling(category("Before"))
        .unwrap();
    let after = manager
        .node_mut(tree.java)
        .unwrap()
        .add_next_sibling(category("After"))
        .unwrap();

    assert_eq!(bounds(&manager, before), (2, 3, 1));
    assert_eq!(bounds(&manager, tree.java), (4, 5, 1));
    assert_eq!(bounds(&manager, after), (6, 7, 1));
    assert_eq!(bounds(&manager, tree.net), (8, 9, 1));
    assert_eq!(bounds(&manager, tree.prog), (1, 10, 0));
    assert_consistent(&manager);
}

#[test]
fn test_add_rejects_positioned_or_self_record() {
    let mut manager = manager();
    let tree = basic_tree(&mut manager);

    let net = manager.node(tree.net).unwrap().record().clone();
    let err = manager.node_mut(tree.java).unwrap().add_child(net.clone()).unwrap_err();
    assert!(err.is_caller_error());
    assert!(!err.is_self_reference());

    let err = manager.node_mut(tree.net).unwrap().add_child(net).unwrap_err();
    assert!(err.is_self_reference());
    assert_eq!(manager.backend().len(), 3);
}

#[test]
fn test_node_read_api() {
    let mut manager = manager();
    let tree = basic_tree(&mut manager);

    let prog = manager.node(tree.prog).unwrap();
    assert!(prog.is_root());
    assert!(!prog.has_parent());
    assert!(prog.has_children());
    assert!(!prog.is_leaf());
    assert!(prog.is_valid());
    assert_eq!(prog.number_of_descendants(), 2);
    assert_eq!(prog.key(), tree.prog);
    assert_eq!(prog.to_string(), "[left: 1, right: 6, level: 0, node: Prog]");

    let java = manager.node(tree.java).unwrap();
    assert!(java.is_leaf());
    assert!(java.has_parent());
    assert!(java.is_descendant_of(prog));
    assert!(!prog.is_descendant_of(java));
    assert_eq!(java.number_of_descendants(), 0);
    assert_eq!(tree.java, NodeKey::of::<Category>(java.id()));
}
