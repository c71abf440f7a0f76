//! Priority-randomized binary search tree holding every key/value pair.

mod iter;
mod node;
mod ord;
#[allow(clippy::module_inception)]
mod treap;


pub use iter::{Iter, Keys};
pub use ord::KeyOrd;
pub use treap::{InsertOutcome, Treap};
