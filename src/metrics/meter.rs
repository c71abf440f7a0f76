// Metric names and recording helpers for index operations.

pub const INSERTS: &str = "treap_inserts_total";
pub const UPDATES: &str = "treap_updates_total";
pub const DELETES: &str = "treap_deletes_total";
pub const MISSES: &str = "treap_misses_total";
pub const KEY_TYPE_ERRORS: &str = "treap_key_type_errors_total";
pub const LENGTH: &str = "treap_length";

/// Adds newly inserted keys.
pub fn add_inserts(value: u64) {
    metrics::counter!(INSERTS).increment(value);
}

/// Adds in-place value updates.
pub fn add_updates(value: u64) {
    metrics::counter!(UPDATES).increment(value);
}

/// Adds removed keys.
pub fn add_deletes(value: u64) {
    metrics::counter!(DELETES).increment(value);
}

/// Adds lookups and deletes that found nothing.
pub fn add_misses(value: u64) {
    metrics::counter!(MISSES).increment(value);
}

/// Adds rejected incomparable keys.
pub fn add_key_type_errors(value: u64) {
    metrics::counter!(KEY_TYPE_ERRORS).increment(value);
}

/// Sets the number of stored keys.
pub fn set_length(len: usize) {
    metrics::gauge!(LENGTH).set(len as f64);
}
