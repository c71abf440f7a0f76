//! Fallible key ordering.

use std::cmp::Ordering;

use crate::db::error::KeyTypeError;

/// Total order over keys that may refuse to compare.
///
/// Statically typed keys never fail. Dynamically typed keys (see
/// [`crate::model::Key`]) fail when the two sides have no common order,
/// and the treap surfaces that to the caller instead of guessing a side.
pub trait KeyOrd {
    fn try_cmp(&self, other: &Self) -> Result<Ordering, KeyTypeError>;
}

macro_rules! key_ord_via_ord {
    ($($t:ty),* $(,)?) => {
        $(
            impl KeyOrd for $t {
                #[inline]
                fn try_cmp(&self, other: &Self) -> Result<Ordering, KeyTypeError> {
                    Ok(self.cmp(other))
                }
            }
        )*
    };
}

key_ord_via_ord!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, bool, char, str, String,
    Vec<u8>, [u8],
);

impl<T: KeyOrd + ?Sized> KeyOrd for &T {
    #[inline]
    fn try_cmp(&self, other: &Self) -> Result<Ordering, KeyTypeError> {
        (**self).try_cmp(*other)
    }
}
