//! Key types stored in the index.

pub mod key;


pub use key::Key;
