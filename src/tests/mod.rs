//! Cross-module scenarios for the index.
//!
//! Covers the end-to-end user flow, randomized invariant checks and
//! concurrent access through the shared facade.

mod cases_concurrent_test;
mod cases_scenario_test;

pub mod support;
