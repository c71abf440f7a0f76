// Concurrent access through the shared index.

use std::sync::Arc;
use std::thread;

use crate::db::replica::ReplicaMapper;
use crate::db::Storage;
use crate::support::{assert_strictly_ascending, seeded_db};

/// Writers on disjoint key ranges while readers scan; nothing is lost.
#[test]
fn test_parallel_writers_and_readers() {
    let db = Arc::new(seeded_db::<usize>(9));

    thread::scope(|s| {
        for writer in 0..4usize {
            let db = Arc::clone(&db);
            s.spawn(move || {
                for i in 0..250usize {
                    let key = format!("w{}:{:04}", writer, i);
                    db.insert(key, writer * 1_000 + i).unwrap();
                }
            });
        }
        for _ in 0..4 {
            let db = Arc::clone(&db);
            s.spawn(move || {
                for _ in 0..50 {
                    assert_strictly_ascending(&db.sorted_entries());
                }
            });
        }
    });

    assert_eq!(db.len(), 1_000);
    for writer in 0..4usize {
        for i in (0..250usize).step_by(37) {
            let key = format!("w{}:{:04}", writer, i);
            assert_eq!(db.search(&key).unwrap(), Some(writer * 1_000 + i));
        }
    }
    db.check_invariants().unwrap();
}

/// Inserts and deletes racing on the same keys leave a valid tree.
#[test]
fn test_racing_insert_delete() {
    let db = Arc::new(seeded_db::<u32>(10));

    thread::scope(|s| {
        for t in 0..4u32 {
            let db = Arc::clone(&db);
            s.spawn(move || {
                for i in 0..400u32 {
                    let key = format!("shared:{}", i % 64);
                    if (i + t) % 2 == 0 {
                        db.insert(key, i).unwrap();
                    } else {
                        db.delete(&key).unwrap();
                    }
                }
            });
        }
    });

    assert!(db.len() <= 64);
    db.check_invariants().unwrap();
}

/// The mapper is shared by copy with no locking.
#[test]
fn test_mapper_from_many_threads() {
    let mapper = ReplicaMapper::new(32, 5).unwrap();
    let expected = mapper.replicas_for("user:101").unwrap();

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(move || mapper.replicas_for("user:101").unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(results.iter().all(|r| *r == expected));
}
