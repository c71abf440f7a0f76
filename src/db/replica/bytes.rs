//! Canonical byte form of keys, the input to replica hashing.

use std::borrow::Cow;

/// Stable byte representation of a key.
///
/// Two keys that must land on the same replica slots must produce the same
/// bytes. Integers serialize as decimal text, so `101` and `"101"` agree.
pub trait KeyBytes {
    fn canonical_bytes(&self) -> Cow<'_, [u8]>;
}

impl KeyBytes for str {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl KeyBytes for String {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl KeyBytes for [u8] {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl KeyBytes for Vec<u8> {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl<T: KeyBytes + ?Sized> KeyBytes for &T {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        (**self).canonical_bytes()
    }
}

macro_rules! key_bytes_via_decimal {
    ($($t:ty),* $(,)?) => {
        $(
            impl KeyBytes for $t {
                fn canonical_bytes(&self) -> Cow<'_, [u8]> {
                    Cow::Owned(self.to_string().into_bytes())
                }
            }
        )*
    };
}

key_bytes_via_decimal!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
