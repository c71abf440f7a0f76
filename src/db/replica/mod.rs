//! Hash-derived replica placement.

mod bytes;
mod mapper;


pub use bytes::KeyBytes;
pub use mapper::{ReplicaMapper, PROBE_FACTOR};
