// Package model provides the dynamically typed index key.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::db::error::KeyTypeError;
use crate::db::replica::KeyBytes;
use crate::db::treap::KeyOrd;

/// Key whose type is only known at runtime.
///
/// Integers and floats order numerically against each other. Strings only
/// order against strings and byte keys only against byte keys; any other
/// pairing, or a NaN, is a [`KeyTypeError`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
}

impl Key {
    /// Short type name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Key::Int(_) => "int",
            Key::Float(_) => "float",
            Key::Str(_) => "str",
            Key::Bytes(_) => "bytes",
        }
    }

    fn mismatch(&self, other: &Key) -> KeyTypeError {
        KeyTypeError::new(self.kind(), other.kind())
    }
}

impl KeyOrd for Key {
    fn try_cmp(&self, other: &Self) -> Result<Ordering, KeyTypeError> {
        let ordering = match (self, other) {
            (Key::Int(a), Key::Int(b)) => Some(a.cmp(b)),
            (Key::Str(a), Key::Str(b)) => Some(a.cmp(b)),
            (Key::Bytes(a), Key::Bytes(b)) => Some(a.cmp(b)),
            (Key::Float(a), Key::Float(b)) => a.partial_cmp(b),
            (Key::Int(a), Key::Float(b)) => cmp_int_float(*a, *b),
            (Key::Float(a), Key::Int(b)) => cmp_int_float(*b, *a).map(Ordering::reverse),
            _ => None,
        };
        ordering.ok_or_else(|| self.mismatch(other))
    }
}

/// Keys are equal exactly when [`KeyOrd::try_cmp`] says so, so `Int(2)`
/// equals `Float(2.0)` and nothing equals a NaN.
impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        matches!(self.try_cmp(other), Ok(Ordering::Equal))
    }
}

// 2^63 as f64; every float in [-2^63, 2^63) truncates to an i64 exactly.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Exact ordering of `int` against `float`, without rounding the integer
/// through f64. `None` for NaN.
fn cmp_int_float(int: i64, float: f64) -> Option<Ordering> {
    if float.is_nan() {
        return None;
    }
    if float >= I64_BOUND {
        return Some(Ordering::Less);
    }
    if float < -I64_BOUND {
        return Some(Ordering::Greater);
    }
    let whole = float.trunc();
    Some(int.cmp(&(whole as i64)).then_with(|| {
        // Same integer part: the fraction decides.
        0.0f64.partial_cmp(&(float - whole)).unwrap_or(Ordering::Equal)
    }))
}

/// The integer an integral in-range float is equal to, if any.
fn as_exact_int(float: f64) -> Option<i64> {
    (float.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&float)).then(|| float as i64)
}

/// Keys that compare equal produce identical bytes: an integral float hashes
/// like the matching `Int`, and `-0.0` like `0`.
impl KeyBytes for Key {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        match self {
            Key::Str(s) => Cow::Borrowed(s.as_bytes()),
            Key::Bytes(b) => Cow::Borrowed(b.as_slice()),
            Key::Int(n) => Cow::Owned(n.to_string().into_bytes()),
            Key::Float(f) => match as_exact_int(*f) {
                Some(n) => Cow::Owned(n.to_string().into_bytes()),
                None => Cow::Owned(f.to_string().into_bytes()),
            },
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(n) => write!(f, "{}", n),
            Key::Float(x) => write!(f, "{}", x),
            Key::Str(s) => f.write_str(s),
            Key::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
        }
    }
}

/// Integers parse as [`Key::Int`]; everything else is a [`Key::Str`].
impl FromStr for Key {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(n) => Key::Int(n),
            Err(_) => Key::Str(s.to_string()),
        })
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Int(n)
    }
}

impl From<i32> for Key {
    fn from(n: i32) -> Self {
        Key::Int(n as i64)
    }
}

impl From<f64> for Key {
    fn from(x: f64) -> Self {
        Key::Float(x)
    }
}

impl From<Vec<u8>> for Key {
    fn from(b: Vec<u8>) -> Self {
        Key::Bytes(b)
    }
}
