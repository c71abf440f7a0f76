// Index facade: one treap behind a readers-writer lock plus the stateless
// replica mapper.

use parking_lot::RwLock;
use rand::RngCore;
use tracing::{debug, info, warn};

use crate::config::{Config, ConfigTrait};
use crate::db::error::{Error, KeyTypeError, TreapViolation};
use crate::db::replica::{KeyBytes, ReplicaMapper};
use crate::db::treap::{InsertOutcome, KeyOrd, Treap};
use crate::metrics;
use crate::rng::SplitMix64;

const COMP_DB: &str = "db";

/// Result of [`Storage::delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Where a key lives and whether it is currently stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub replicas: Vec<usize>,
    pub present: bool,
}

/// Trait for key/value index backends.
pub trait Storage<K, V>: Send + Sync {
    /// Stores `value` under `key`, replacing any previous value.
    fn insert(&self, key: K, value: V) -> Result<InsertOutcome, Error>;

    /// Returns a copy of the value stored under `key`.
    fn search(&self, key: &K) -> Result<Option<V>, Error>;

    /// Removes `key`. Deleting an absent key changes nothing.
    fn delete(&self, key: &K) -> Result<DeleteOutcome, Error>;

    /// Slots that hold `key`, primary first.
    fn replicas_for(&self, key: &K) -> Result<Vec<usize>, Error>;

    /// Snapshot of all entries in ascending key order.
    fn sorted_entries(&self) -> Vec<(K, V)>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry.
    fn clear(&self);
}

/// In-process index over a single global treap.
///
/// Replica placement is advisory: every key lives in the same tree no
/// matter which slots it maps to.
pub struct DB<K, V, R = SplitMix64> {
    mapper: ReplicaMapper,
    treap: RwLock<Treap<K, V, R>>,
}

impl<K, V> DB<K, V, SplitMix64> {
    /// Builds an index over `num_nodes` slots with `replica_factor` copies
    /// per key and clock-seeded priorities.
    pub fn configure(num_nodes: usize, replica_factor: usize) -> Result<Self, Error> {
        let mapper = ReplicaMapper::new(num_nodes, replica_factor)?;
        Ok(Self::with_treap(mapper, Treap::new()))
    }

    /// Like [`DB::configure`] but with reproducible priorities.
    pub fn with_seed(num_nodes: usize, replica_factor: usize, seed: u64) -> Result<Self, Error> {
        let mapper = ReplicaMapper::new(num_nodes, replica_factor)?;
        Ok(Self::with_treap(mapper, Treap::with_seed(seed)))
    }

    /// Builds an index from the `cluster` and `treap` config sections.
    pub fn from_config(cfg: &Config) -> Result<Self, Error> {
        let cluster = cfg.cluster();
        let treap_cfg = cfg.treap();
        let mapper = ReplicaMapper::new(cluster.num_nodes, cluster.replica_factor)?;

        let mut treap = match treap_cfg.seed {
            Some(seed) => Treap::with_seed(seed),
            None => Treap::new(),
        };
        treap.set_trace_rotations(treap_cfg.trace_rotations);

        info!(
            component = COMP_DB,
            event = "configured",
            num_nodes = cluster.num_nodes,
            replica_factor = cluster.replica_factor,
            seeded = treap_cfg.seed.is_some(),
            trace_rotations = treap_cfg.trace_rotations,
            "index configured"
        );
        Ok(Self::with_treap(mapper, treap))
    }
}

impl<K, V, R> DB<K, V, R> {
    /// Builds an index drawing treap priorities from `rng`.
    pub fn with_rng(num_nodes: usize, replica_factor: usize, rng: R) -> Result<Self, Error> {
        let mapper = ReplicaMapper::new(num_nodes, replica_factor)?;
        Ok(Self::with_treap(mapper, Treap::with_rng(rng)))
    }

    fn with_treap(mapper: ReplicaMapper, treap: Treap<K, V, R>) -> Self {
        Self {
            mapper,
            treap: RwLock::new(treap),
        }
    }

    pub fn mapper(&self) -> ReplicaMapper {
        self.mapper
    }

    /// Current tree height; 0 when empty.
    pub fn height(&self) -> usize {
        self.treap.read().height()
    }
}

impl<K: KeyOrd + KeyBytes, V, R> DB<K, V, R> {
    /// Replica slots for `key` plus whether it is stored right now.
    pub fn placement(&self, key: &K) -> Result<Placement, Error> {
        let replicas = self.mapper.replicas_for(key)?;
        let present = observe(self.treap.read().contains_key(key), "placement")?;
        Ok(Placement { replicas, present })
    }

    /// For each slot, how many stored keys it replicates.
    pub fn slot_loads(&self) -> Result<Vec<usize>, Error> {
        let mut loads = vec![0usize; self.mapper.num_nodes()];
        let treap = self.treap.read();
        for key in treap.keys() {
            for slot in self.mapper.replicas_for(key)? {
                loads[slot] += 1;
            }
        }
        Ok(loads)
    }

    pub fn check_invariants(&self) -> Result<(), TreapViolation> {
        self.treap.read().check_invariants()
    }
}

impl<K, V, R> Storage<K, V> for DB<K, V, R>
where
    K: KeyOrd + KeyBytes + Clone + Send + Sync,
    V: Clone + Send + Sync,
    R: RngCore + Send + Sync,
{
    fn insert(&self, key: K, value: V) -> Result<InsertOutcome, Error> {
        let (outcome, len) = {
            let mut treap = self.treap.write();
            let outcome = observe(treap.insert(key, value), "insert")?;
            (outcome, treap.len())
        };

        match outcome {
            InsertOutcome::Inserted => metrics::add_inserts(1),
            InsertOutcome::Updated => metrics::add_updates(1),
        }
        metrics::set_length(len);
        debug!(component = COMP_DB, event = "insert", outcome = ?outcome, len, "key stored");
        Ok(outcome)
    }

    fn search(&self, key: &K) -> Result<Option<V>, Error> {
        let found = observe(self.treap.read().search(key).map(|v| v.cloned()), "search")?;
        if found.is_none() {
            metrics::add_misses(1);
        }
        Ok(found)
    }

    fn delete(&self, key: &K) -> Result<DeleteOutcome, Error> {
        let (removed, len) = {
            let mut treap = self.treap.write();
            let removed = observe(treap.delete(key), "delete")?;
            (removed.is_some(), treap.len())
        };

        if !removed {
            metrics::add_misses(1);
            return Ok(DeleteOutcome::NotFound);
        }
        metrics::add_deletes(1);
        metrics::set_length(len);
        debug!(component = COMP_DB, event = "delete", len, "key removed");
        Ok(DeleteOutcome::Deleted)
    }

    fn replicas_for(&self, key: &K) -> Result<Vec<usize>, Error> {
        Ok(self.mapper.replicas_for(key)?)
    }

    fn sorted_entries(&self) -> Vec<(K, V)> {
        self.treap
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn len(&self) -> usize {
        self.treap.read().len()
    }

    fn clear(&self) {
        self.treap.write().clear();
        metrics::set_length(0);
        info!(component = COMP_DB, event = "clear", "index cleared");
    }
}

/// Logs and counts rejected keys before handing the error to the caller.
fn observe<T>(res: Result<T, KeyTypeError>, op: &'static str) -> Result<T, Error> {
    res.map_err(|err| {
        metrics::add_key_type_errors(1);
        warn!(component = COMP_DB, event = "key_type_error", op, error = %err, "rejected key");
        Error::from(err)
    })
}
