use nestedset::Field;
use nestedset::backend::{Backend, Direction, Filter, InMemory, Query, Update};

use crate::helpers::*;

fn placed(name: &str, lft: i64, rgt: i64, level: i64, root: i64) -> Category {
    Category {
        lft,
        rgt,
        level,
        root_id: root,
        ..category(name)
    }
}

fn store() -> InMemory<Category> {
    let mut store = InMemory::new();
    for mut record in [
        placed("A", 1, 6, 0, 1),
        placed("B", 2, 3, 1, 1),
        placed("C", 4, 5, 1, 1),
        placed("X", 1, 2, 0, 2),
    ] {
        store.persist(&mut record).unwrap();
    }
    store
}

#[test]
fn test_persist_assigns_ids() {
    let store = store();
    assert_eq!(store.len(), 4);
    let names: Vec<&str> = store.all().map(|record| record.name.as_str()).collect();
    assert_eq!(names, ["A", "B", "C", "X"]);
    assert_eq!(store.get(4).unwrap().name, "X");
}

#[test]
fn test_scan_filters_orders_and_limits() {
    let store = store();
    let query = Query::new(Filter::new().ge(Field::Left, 2).in_root(Some(1)))
        .order_by(Field::Left, Direction::Descending);
    let found = store.scan(&query).unwrap();
    let names: Vec<&str> = found.iter().map(|record| record.name.as_str()).collect();
    assert_eq!(names, ["C", "B"]);

    let first = store.scan(&query.clone().limit(1)).unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].name, "C");
}

#[test]
fn test_update_and_delete_by_range() {
    let mut store = store();
    let update = Update::new(Filter::new().ge(Field::Right, 5).in_root(Some(1))).add(Field::Right, 2);
    assert_eq!(store.update(&update).unwrap(), 2);
    assert_eq!(store.get(1).unwrap().rgt, 8);
    assert_eq!(store.get(4).unwrap().rgt, 2);

    let removed = store
        .delete(&Filter::new().ge(Field::Left, 4).le(Field::Right, 7).in_root(Some(1)))
        .unwrap();
    assert_eq!(removed, 1);
    assert!(store.get(3).is_none());
}

#[test]
fn test_max_per_root() {
    let store = store();
    assert_eq!(store.max(Field::Right, None).unwrap(), Some(6));
    assert_eq!(store.max(Field::Right, Some(2)).unwrap(), Some(2));
    assert_eq!(store.max(Field::Right, Some(3)).unwrap(), None);
}

#[test]
fn test_filter_description_uses_field_names() {
    let config = multi_root_configuration();
    let filter = Filter::new()
        .gt(Field::Left, 3)
        .lt(Field::Right, 8)
        .in_root(Some(1));
    assert_eq!(filter.describe(&config).to_string(), "lft > 3 AND rgt < 8 AND root_id = 1");
}
