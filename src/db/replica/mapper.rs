//! Deterministic key -> replica slot assignment.
//
// seed    = SHA-256(canonical key bytes)
// probe i = SHA-256(seed || i as u64 LE), first 8 bytes big-endian, mod num_nodes
// Probes that hit an already chosen slot are skipped.

use sha2::{Digest, Sha256};
use std::collections::HashSet;

use crate::db::error::ConfigError;

use super::bytes::KeyBytes;

/// Upper bound on probes, as a multiple of `num_nodes`.
pub const PROBE_FACTOR: usize = 64;

/// Maps keys onto `replica_factor` distinct slots out of `num_nodes`.
///
/// Holds no state beyond the two bounds, so it can be copied into and
/// called from any number of threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplicaMapper {
    num_nodes: usize,
    replica_factor: usize,
}

impl ReplicaMapper {
    /// Validates `1 <= replica_factor <= num_nodes`.
    pub fn new(num_nodes: usize, replica_factor: usize) -> Result<Self, ConfigError> {
        if num_nodes == 0 {
            return Err(ConfigError::ZeroNodes);
        }
        if replica_factor == 0 {
            return Err(ConfigError::ZeroReplicaFactor);
        }
        if replica_factor > num_nodes {
            return Err(ConfigError::ReplicaFactorExceedsNodes {
                replica_factor,
                num_nodes,
            });
        }
        Ok(Self {
            num_nodes,
            replica_factor,
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn replica_factor(&self) -> usize {
        self.replica_factor
    }

    /// Returns the slots holding `key`, in probe order. The first element
    /// is the primary owner.
    pub fn replicas_for<K: KeyBytes + ?Sized>(&self, key: &K) -> Result<Vec<usize>, ConfigError> {
        let seed = seed_digest(key);
        let max_probes = self.num_nodes.saturating_mul(PROBE_FACTOR);

        // Memory stays O(replica_factor) whatever num_nodes is.
        let mut chosen = HashSet::with_capacity(self.replica_factor);
        let mut replicas = Vec::with_capacity(self.replica_factor);
        for probe in 0..max_probes {
            let slot = probe_slot(&seed, probe as u64, self.num_nodes);
            if !chosen.insert(slot) {
                continue;
            }
            replicas.push(slot);
            if replicas.len() == self.replica_factor {
                return Ok(replicas);
            }
        }

        Err(ConfigError::ProbesExhausted {
            collected: replicas.len(),
            wanted: self.replica_factor,
            probes: max_probes,
        })
    }

    /// First slot of [`Self::replicas_for`].
    pub fn primary_for<K: KeyBytes + ?Sized>(&self, key: &K) -> usize {
        probe_slot(&seed_digest(key), 0, self.num_nodes)
    }

    /// Hex form of the seed digest, for diagnostics.
    pub fn digest_hex<K: KeyBytes + ?Sized>(&self, key: &K) -> String {
        hex::encode(seed_digest(key))
    }
}

fn seed_digest<K: KeyBytes + ?Sized>(key: &K) -> [u8; 32] {
    let digest = Sha256::digest(&*key.canonical_bytes());
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&digest);
    seed
}

fn probe_slot(seed: &[u8; 32], probe: u64, num_nodes: usize) -> usize {
    let mut hasher = Sha256::new();
    hasher.update(seed);
    hasher.update(probe.to_le_bytes());
    let digest = hasher.finalize();

    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(head) % num_nodes as u64) as usize
}
