// End-to-end user flow over a 32-node, 5-replica index.

use serde_json::json;

use crate::db::{DeleteOutcome, InsertOutcome, Storage};
use crate::support::seeded_db;

/// Full lifecycle of one user record: insert, locate, update, delete.
#[test]
fn test_user_record_lifecycle() {
    let db = seeded_db(101);
    let key = "user:101".to_string();

    assert_eq!(
        db.insert(key.clone(), json!({"tier": "premium"})).unwrap(),
        InsertOutcome::Inserted
    );

    let replicas = db.replicas_for(&key).unwrap();
    assert_eq!(replicas.len(), 5);
    for _ in 0..5 {
        assert_eq!(db.replicas_for(&key).unwrap(), replicas);
    }
    let mut unique = replicas.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), 5);
    assert!(replicas.iter().all(|slot| *slot < 32));

    assert_eq!(db.search(&key).unwrap(), Some(json!({"tier": "premium"})));

    assert_eq!(
        db.insert(key.clone(), json!({"tier": "gold"})).unwrap(),
        InsertOutcome::Updated
    );
    assert_eq!(db.search(&key).unwrap(), Some(json!({"tier": "gold"})));
    assert_eq!(db.len(), 1);

    assert_eq!(db.delete(&key).unwrap(), DeleteOutcome::Deleted);
    assert_eq!(db.search(&key).unwrap(), None);
    assert!(db.sorted_entries().is_empty());
}

/// Replica placement is independent of what the tree holds.
#[test]
fn test_replicas_do_not_depend_on_contents() {
    let empty = seeded_db::<u8>(1);
    let full = seeded_db::<u8>(2);
    for i in 0..100u8 {
        full.insert(format!("user:{}", i), i).unwrap();
    }
    for i in 0..100u8 {
        let key = format!("user:{}", i);
        assert_eq!(empty.replicas_for(&key).unwrap(), full.replicas_for(&key).unwrap());
    }
}

/// Many users inserted, a third removed, survivors still readable.
#[test]
fn test_bulk_catalog() {
    let db = seeded_db(3);
    for i in 0..300 {
        db.insert(format!("user:{:04}", i), json!({"id": i})).unwrap();
    }
    for i in (0..300).step_by(3) {
        assert_eq!(
            db.delete(&format!("user:{:04}", i)).unwrap(),
            DeleteOutcome::Deleted
        );
    }

    assert_eq!(db.len(), 200);
    for i in 0..300 {
        let found = db.search(&format!("user:{:04}", i)).unwrap();
        if i % 3 == 0 {
            assert!(found.is_none());
        } else {
            assert_eq!(found, Some(json!({"id": i})));
        }
    }
    db.check_invariants().unwrap();
}
