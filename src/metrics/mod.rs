//! Operation counters for the index.
//
//! Recorded through the `metrics` facade; without an installed recorder
//! every call is a no-op.

pub mod meter;

pub use meter::*;
