// Configuration loading and management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::db::error::ConfigError;
use crate::db::replica::ReplicaMapper;

pub const PROD: &str = "prod";
#[allow(dead_code)]
pub const DEV: &str = "dev";
#[allow(dead_code)]
pub const TEST: &str = "test";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Index {
    #[serde(rename = "index")]
    pub index: IndexBox,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexBox {
    pub env: String,
    pub logs: Option<Logs>,
    pub cluster: Cluster,
    pub treap: Option<Treap>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Logs {
    pub level: Option<String>,
}

/// Shape of the logical node set keys are replicated across.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Cluster {
    #[serde(rename = "num_nodes")]
    pub num_nodes: usize,
    #[serde(rename = "replica_factor")]
    pub replica_factor: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Treap {
    /// Fixed priority seed; clock-seeded when absent.
    pub seed: Option<u64>,
    #[serde(rename = "trace_rotations", default)]
    pub trace_rotations: bool,
}

static DEFAULT_TREAP: Treap = Treap {
    seed: None,
    trace_rotations: false,
};

// Config trait
pub trait ConfigTrait {
    fn logs(&self) -> Option<&Logs>;
    fn is_prod(&self) -> bool;
    #[allow(dead_code)]
    fn is_dev(&self) -> bool;
    #[allow(dead_code)]
    fn is_test(&self) -> bool;
    fn cluster(&self) -> &Cluster;
    fn treap(&self) -> &Treap;
}

// Config type alias for convenience
pub type Config = Index;

impl ConfigTrait for Config {
    fn logs(&self) -> Option<&Logs> {
        self.index.logs.as_ref()
    }

    fn is_prod(&self) -> bool {
        self.index.env == PROD
    }

    fn is_dev(&self) -> bool {
        self.index.env == DEV
    }

    fn is_test(&self) -> bool {
        self.index.env == TEST
    }

    fn cluster(&self) -> &Cluster {
        &self.index.cluster
    }

    fn treap(&self) -> &Treap {
        self.index.treap.as_ref().unwrap_or(&DEFAULT_TREAP)
    }
}

impl Config {
    /// Loads configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Resolve absolute path
        let abs_path = path
            .canonicalize()
            .with_context(|| format!("failed to resolve absolute config filepath: {:?}", path))?;

        // Read file
        let data = std::fs::read_to_string(&abs_path)
            .with_context(|| format!("read config yaml file {:?}", abs_path))?;

        Self::from_yaml(&data).with_context(|| format!("invalid config {:?}", abs_path))
    }

    /// Parses and validates configuration from YAML text.
    pub fn from_yaml(data: &str) -> Result<Self> {
        let cfg: Index = serde_yaml::from_str(data).context("unmarshal yaml")?;
        cfg.validate().context("validate cluster section")?;
        Ok(cfg)
    }

    /// Checks `1 <= replica_factor <= num_nodes`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cluster = self.cluster();
        ReplicaMapper::new(cluster.num_nodes, cluster.replica_factor).map(|_| ())
    }
}

// Test config is always available for integration tests
mod test_config;
#[allow(dead_code)]
pub use test_config::new_test_config;
