use std::fs;

use tempfile::TempDir;

use nestedset::NestedSetManager;
use nestedset::backend::InMemory;

use crate::helpers::*;

#[test]
fn test_save_and_reload_tree() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("categories.json");

    let mut manager = manager();
    let keys = lettered_tree(&mut manager);
    manager.node_mut(keys["I"]).unwrap().move_as_next_sibling_of(keys["B"]).unwrap();
    manager.backend().save_to_file(&path).unwrap();
    assert!(path.exists());

    let loaded = InMemory::<Category>::load_from_file(&path).unwrap();
    assert_eq!(loaded.len(), 11);
    let mut reloaded = NestedSetManager::new(loaded).unwrap();
    let listed = reloaded.fetch_tree_as_list(0).unwrap();
    assert_eq!(
        names(&reloaded, &listed),
        ["A", "B", "D", "H", "I", "J", "K", "C", "E", "F", "G"]
    );
    assert_eq!(bounds(&reloaded, keys["I"]), (8, 13, 1));
    assert_consistent(&reloaded);

    // Ids keep counting after the highest stored id.
    let extra = reloaded
        .node_mut(keys["A"])
        .unwrap()
        .add_child(category("L"))
        .unwrap();
    assert_eq!(extra.id(), 12);
}

#[test]
fn test_load_missing_file_gives_empty_store() {
    let dir = TempDir::new().unwrap();
    let store = InMemory::<Category>::load_from_file(dir.path().join("absent.json")).unwrap();
    assert!(store.is_empty());
}

#[test]
fn test_load_rejects_unknown_version() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("future.json");
    fs::write(&path, r#"{"_v": 9, "next_id": 1, "rows": []}"#).unwrap();

    let err = InMemory::<Category>::load_from_file(&path).unwrap_err();
    assert!(err.is_backend_error());
    assert!(err.is_io_error());
}

#[test]
fn test_load_rejects_malformed_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "not json").unwrap();

    let err = InMemory::<Category>::load_from_file(&path).unwrap_err();
    assert_eq!(err.module(), "backend");
}
