//! Error taxonomy for the index.

/// Invalid cluster shape, or a replica reduction that could not complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("number of nodes must be a positive integer")]
    ZeroNodes,
    #[error("replica factor must be a positive integer")]
    ZeroReplicaFactor,
    #[error("replica factor {replica_factor} exceeds number of nodes {num_nodes}")]
    ReplicaFactorExceedsNodes {
        replica_factor: usize,
        num_nodes: usize,
    },
    #[error("replica probing gave up after {probes} probes with {collected} of {wanted} slots")]
    ProbesExhausted {
        collected: usize,
        wanted: usize,
        probes: usize,
    },
}

/// Two keys that have no defined order relative to each other.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot order {left} key against {right} key")]
pub struct KeyTypeError {
    pub left: &'static str,
    pub right: &'static str,
}

impl KeyTypeError {
    pub fn new(left: &'static str, right: &'static str) -> Self {
        Self { left, right }
    }
}

/// Any failure surfaced by the DB facade.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    KeyType(#[from] KeyTypeError),
}

/// First structural breach found by `Treap::check_invariants`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreapViolation {
    #[error("key at in-order position {position} is not greater than its predecessor")]
    OutOfOrder { position: usize },
    #[error("child priority {child} exceeds parent priority {parent}")]
    HeapOrder { parent: u64, child: u64 },
    #[error("cached length {cached} differs from node count {counted}")]
    Length { cached: usize, counted: usize },
    #[error(transparent)]
    KeyType(#[from] KeyTypeError),
}
