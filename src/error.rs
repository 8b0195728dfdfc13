//! Error types shared by every structure in the crate.
//!
//! Only two things can go wrong. A key can be compared against a key of a
//! different kind ([`Error::InvalidKeyType`]), which fails the calling
//! operation. Or a structure can find one of its own invariants broken
//! ([`Error::InvariantViolation`]), which is a bug with no defined recovery and
//! is raised as a panic through [`invariant_violation`].
//!
//! A missing key is not an error: lookups and deletes report it as `None`.

use thiserror::Error;

/// Errors produced by dynamic-set operations and constructors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Two keys of incompatible kinds were compared, or a key that has no
    /// 64-bit representation was handed to a trie.
    #[error("invalid key type: expected {expected} key, found {found} key")]
    InvalidKeyType {
        /// Kind of key the operation required.
        expected: &'static str,
        /// Kind of key that was supplied.
        found: &'static str,
    },

    /// A radix trie was configured with an unsupported radix width.
    #[error("invalid radix width {width}: must be within {min}..={max}")]
    InvalidRadixWidth {
        /// The rejected width.
        width: u32,
        /// Smallest supported width.
        min: u32,
        /// Largest supported width.
        max: u32,
    },

    /// An internal structural invariant was found broken.
    #[error("structural invariant violated: {0}")]
    InvariantViolation(&'static str),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Abort the current operation after detecting a broken invariant.
#[cold]
#[inline(never)]
pub(crate) fn invariant_violation(what: &'static str) -> ! {
    let err = Error::InvariantViolation(what);
    log::error!("{err}");
    panic!("{err}")
}
