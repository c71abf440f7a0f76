#[path = "shared/rand/mod.rs"]
pub mod rng;
#[cfg(test)]
mod tests;

#[cfg(test)]
pub use tests::support;

pub mod config;
pub mod db;
pub mod metrics;
pub mod model;

pub use db::{DeleteOutcome, InsertOutcome, Storage, DB};
pub use model::Key;
