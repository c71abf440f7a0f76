// Shared test support code for scenario tests.

use std::collections::BTreeMap;

use crate::db::{Storage, DB};

/// Index with the cluster shape used across scenarios and a fixed seed.
pub fn seeded_db<V>(seed: u64) -> DB<String, V> {
    match DB::with_seed(32, 5, seed) {
        Ok(db) => db,
        Err(err) => panic!("test cluster rejected: {}", err),
    }
}

/// Asserts that the index holds exactly what `model` holds, in order.
pub fn assert_matches_model<V>(db: &DB<String, V>, model: &BTreeMap<String, V>)
where
    V: Clone + PartialEq + std::fmt::Debug + Send + Sync,
{
    let expected: Vec<_> = model.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    assert_eq!(db.sorted_entries(), expected);
    assert_eq!(db.len(), model.len());
}

/// Asserts strictly ascending keys.
pub fn assert_strictly_ascending<K: Ord + std::fmt::Debug, V>(entries: &[(K, V)]) {
    for pair in entries.windows(2) {
        assert!(
            pair[0].0 < pair[1].0,
            "{:?} is not below {:?}",
            pair[0].0,
            pair[1].0
        );
    }
}
