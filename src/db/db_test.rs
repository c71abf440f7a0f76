//! Tests for the index facade.

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::config::new_test_config;
    use crate::db::error::{ConfigError, Error, KeyTypeError};
    use crate::db::{DeleteOutcome, InsertOutcome, Placement, Storage, DB};
    use crate::model::Key;

    fn db() -> DB<String, u32> {
        DB::with_seed(16, 3, 1).expect("valid cluster")
    }

    #[test]
    fn test_configure_validates_bounds() {
        assert!(matches!(
            DB::<String, u32>::configure(0, 1),
            Err(Error::Config(ConfigError::ZeroNodes))
        ));
        assert!(matches!(
            DB::<String, u32>::configure(5, 0),
            Err(Error::Config(ConfigError::ZeroReplicaFactor))
        ));
        assert!(matches!(
            DB::<String, u32>::configure(2, 5),
            Err(Error::Config(ConfigError::ReplicaFactorExceedsNodes { .. }))
        ));
        assert!(DB::<String, u32>::configure(5, 5).is_ok());
    }

    #[test]
    fn test_insert_update_delete_cycle() {
        let db = db();
        let key = "alpha".to_string();

        assert_eq!(db.insert(key.clone(), 1).unwrap(), InsertOutcome::Inserted);
        assert_eq!(db.search(&key).unwrap(), Some(1));

        assert_eq!(db.insert(key.clone(), 2).unwrap(), InsertOutcome::Updated);
        assert_eq!(db.search(&key).unwrap(), Some(2));
        assert_eq!(db.len(), 1);

        assert_eq!(db.delete(&key).unwrap(), DeleteOutcome::Deleted);
        assert_eq!(db.search(&key).unwrap(), None);
        assert!(db.is_empty());
    }

    #[test]
    fn test_delete_absent_reports_not_found() {
        let db = db();
        db.insert("a".to_string(), 1).unwrap();
        db.insert("c".to_string(), 3).unwrap();
        let before = db.sorted_entries();

        assert_eq!(db.delete(&"b".to_string()).unwrap(), DeleteOutcome::NotFound);
        assert_eq!(db.delete(&"b".to_string()).unwrap(), DeleteOutcome::NotFound);

        assert_eq!(db.sorted_entries(), before);
    }

    #[test]
    fn test_sorted_entries_are_ascending() {
        let db = db();
        for name in ["delta", "alpha", "echo", "charlie", "bravo"] {
            db.insert(name.to_string(), name.len() as u32).unwrap();
        }
        let keys: Vec<_> = db.sorted_entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["alpha", "bravo", "charlie", "delta", "echo"]);
        db.check_invariants().unwrap();
    }

    #[test]
    fn test_replicas_match_mapper() {
        let db = db();
        let key = "user:7".to_string();
        let replicas = db.replicas_for(&key).unwrap();
        assert_eq!(replicas, db.mapper().replicas_for(&key).unwrap());
        assert_eq!(replicas.len(), 3);
    }

    #[test]
    fn test_placement_reports_presence() {
        let db = db();
        let key = "user:9".to_string();
        let absent = db.placement(&key).unwrap();
        assert!(!absent.present);

        db.insert(key.clone(), 9).unwrap();
        assert_eq!(
            db.placement(&key).unwrap(),
            Placement {
                replicas: absent.replicas.clone(),
                present: true
            }
        );
    }

    #[test]
    fn test_slot_loads_count_every_replica() {
        let db = db();
        for i in 0..200 {
            db.insert(format!("k{}", i), i).unwrap();
        }
        let loads = db.slot_loads().unwrap();
        assert_eq!(loads.len(), 16);
        assert_eq!(loads.iter().sum::<usize>(), 200 * 3);
    }

    #[test]
    fn test_key_type_error_is_surfaced() {
        let db: DB<Key, &str> = DB::with_seed(8, 2, 3).unwrap();
        db.insert(Key::from("a"), "first").unwrap();

        let err = db.insert(Key::from(1), "second").unwrap_err();
        assert_eq!(err, Error::KeyType(KeyTypeError::new("int", "str")));
        assert!(db.search(&Key::from(1.5)).is_err());
        assert!(db.delete(&Key::from(vec![1u8])).is_err());
        assert!(db.placement(&Key::from(1)).is_err());

        assert_eq!(db.sorted_entries(), vec![(Key::from("a"), "first")]);
    }

    #[test]
    fn test_clear_empties_index() {
        let db = db();
        for i in 0..20 {
            db.insert(format!("k{}", i), i).unwrap();
        }
        db.clear();
        assert!(db.is_empty());
        assert_eq!(db.height(), 0);
        assert!(db.slot_loads().unwrap().iter().all(|load| *load == 0));
    }

    #[test]
    fn test_from_config() {
        let cfg = new_test_config();
        let db: DB<String, u32> = DB::from_config(&cfg).unwrap();
        assert_eq!(db.mapper().num_nodes(), 32);
        assert_eq!(db.mapper().replica_factor(), 5);

        let mut bad = new_test_config();
        bad.index.cluster.replica_factor = 33;
        assert!(DB::<String, u32>::from_config(&bad).is_err());
    }

    #[test]
    fn test_seeded_indexes_share_shape() {
        let build = |db: &DB<u32, (), StdRng>| {
            for k in [50, 20, 80, 10, 30, 70, 90] {
                db.insert(k, ()).unwrap();
            }
            db.height()
        };
        let a = DB::with_rng(4, 2, StdRng::seed_from_u64(5)).unwrap();
        let b = DB::with_rng(4, 2, StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(build(&a), build(&b));
    }
}
