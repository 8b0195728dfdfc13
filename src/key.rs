//! Key abstractions.
//!
//! Trees navigate with [`Key::compare_to`], a three-way comparison between two
//! keys of the same concrete type. Tries never compare keys; they consume the
//! 64-bit representation produced by [`RawKey::to_raw`].

use std::cmp::Ordering;
use std::fmt;

use crate::error::{Error, Result};

/// A key that can be ordered against another key of the same type.
///
/// `Less` routes a lookup into the left subtree, `Greater` into the right
/// subtree and `Equal` identifies the node, so an in-order walk of any tree is
/// ascending.
pub trait Key {
    /// Compare `self` against `other`.
    ///
    /// Fails with [`Error::InvalidKeyType`] when the two keys are of
    /// incompatible kinds.
    fn compare_to(&self, other: &Self) -> Result<Ordering>;
}

/// A key with a fixed-width 64-bit unsigned representation, usable with tries.
pub trait RawKey {
    /// The raw bits a trie indexes this key by.
    fn to_raw(&self) -> Result<u64>;
}

macro_rules! impl_ord_key {
    ($($t:ty),* $(,)?) => {
        $(
            impl Key for $t {
                #[inline]
                fn compare_to(&self, other: &Self) -> Result<Ordering> {
                    Ok(self.cmp(other))
                }
            }
        )*
    };
}

impl_ord_key!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, String, Vec<u8>);

macro_rules! impl_raw_key {
    ($($t:ty),* $(,)?) => {
        $(
            impl RawKey for $t {
                #[inline]
                fn to_raw(&self) -> Result<u64> {
                    Ok(u64::from(*self))
                }
            }
        )*
    };
}

impl_raw_key!(u8, u16, u32, u64);

/// An unsigned 64-bit key.
///
/// This is the key type for a trie viewed through
/// [`TrieTree`](crate::TrieTree): it orders numerically and converts to its
/// raw bits unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uint64Key(pub u64);

impl From<u64> for Uint64Key {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl From<Uint64Key> for u64 {
    fn from(k: Uint64Key) -> Self {
        k.0
    }
}

impl Key for Uint64Key {
    #[inline]
    fn compare_to(&self, other: &Self) -> Result<Ordering> {
        Ok(self.0.cmp(&other.0))
    }
}

impl RawKey for Uint64Key {
    #[inline]
    fn to_raw(&self) -> Result<u64> {
        Ok(self.0)
    }
}

impl fmt::Display for Uint64Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A key whose kind is only known at run time.
///
/// Keys of the same kind compare naturally. Comparing keys of different kinds
/// fails with [`Error::InvalidKeyType`], as does asking a non-`Uint` key for a
/// raw trie representation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DynKey {
    Uint(u64),
    Int(i64),
    Str(String),
}

impl DynKey {
    /// Name of this key's kind, as reported in errors.
    pub fn kind(&self) -> &'static str {
        match self {
            DynKey::Uint(_) => "uint",
            DynKey::Int(_) => "int",
            DynKey::Str(_) => "str",
        }
    }
}

impl Key for DynKey {
    fn compare_to(&self, other: &Self) -> Result<Ordering> {
        match (self, other) {
            (DynKey::Uint(a), DynKey::Uint(b)) => Ok(a.cmp(b)),
            (DynKey::Int(a), DynKey::Int(b)) => Ok(a.cmp(b)),
            (DynKey::Str(a), DynKey::Str(b)) => Ok(a.cmp(b)),
            _ => Err(Error::InvalidKeyType {
                expected: other.kind(),
                found: self.kind(),
            }),
        }
    }
}

impl RawKey for DynKey {
    fn to_raw(&self) -> Result<u64> {
        match self {
            DynKey::Uint(v) => Ok(*v),
            _ => Err(Error::InvalidKeyType {
                expected: "uint",
                found: self.kind(),
            }),
        }
    }
}

impl From<u64> for DynKey {
    fn from(v: u64) -> Self {
        DynKey::Uint(v)
    }
}

impl From<i64> for DynKey {
    fn from(v: i64) -> Self {
        DynKey::Int(v)
    }
}

impl From<&str> for DynKey {
    fn from(v: &str) -> Self {
        DynKey::Str(v.to_owned())
    }
}

impl From<String> for DynKey {
    fn from(v: String) -> Self {
        DynKey::Str(v)
    }
}
