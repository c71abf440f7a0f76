use super::{Cluster, Config, IndexBox, Logs, Treap};

/// Creates a new test configuration.
pub fn new_test_config() -> Config {
    Config {
        index: IndexBox {
            env: super::TEST.to_string(),
            logs: Some(Logs {
                level: Some("debug".to_string()),
            }),
            cluster: Cluster {
                num_nodes: 32,
                replica_factor: 5,
            },
            treap: Some(Treap {
                seed: Some(7),
                trace_rotations: false,
            }),
        },
    }
}
