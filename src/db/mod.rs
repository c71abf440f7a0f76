//! Key/value index: treap storage plus replica placement.

#[allow(clippy::module_inception)]
pub mod db;
pub mod error;
pub mod replica;
pub mod treap;

#[cfg(test)]
mod db_test;

// Re-export main types
pub use db::{DeleteOutcome, Placement, Storage, DB};
pub use error::{ConfigError, Error, KeyTypeError, TreapViolation};
pub use replica::{KeyBytes, ReplicaMapper};
pub use treap::{InsertOutcome, KeyOrd, Treap};
