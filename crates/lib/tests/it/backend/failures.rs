use nestedset::NestedSetManager;

use crate::helpers::*;

#[test]
fn test_update_failure_propagates() {
    let (backend, faults) = FailingBackend::create();
    let mut manager = NestedSetManager::new(backend).unwrap();
    let root = manager.create_root(category("Root")).unwrap();

    faults.updates.set(true);
    let err = manager
        .node_mut(root)
        .unwrap()
        .add_child(category("Child"))
        .unwrap_err();

    assert!(err.is_backend_error());
    assert!(!err.is_caller_error());
    assert!(err.to_string().contains("injected failure"));
    assert_eq!(bounds(&manager, root), (1, 2, 0));
}

#[test]
fn test_scan_failure_propagates() {
    let (backend, faults) = FailingBackend::create();
    let mut manager = NestedSetManager::new(backend).unwrap();
    let root = manager.create_root(category("Root")).unwrap();
    manager.node_mut(root).unwrap().add_child(category("Child")).unwrap();

    faults.scans.set(true);
    assert!(manager.node_mut(root).unwrap().children().unwrap_err().is_backend_error());
    assert!(manager.fetch_tree_as_list(0).unwrap_err().is_backend_error());

    faults.scans.set(false);
    assert_eq!(manager.node_mut(root).unwrap().children().unwrap().len(), 1);
}
