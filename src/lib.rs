//! # dynset
//!
//! Ordered key-value dynamic sets behind one uniform contract: lookup,
//! insert-or-update and delete.
//!
//! Tree structures over any [`Key`]:
//! - [`BinarySearchTree`]: unbalanced baseline.
//! - [`SplayTree`]: self-adjusting, amortized O(log n), moves every accessed
//!   node to the root.
//!
//! Bitwise tries over `u64` keys:
//! - [`BinaryTrie`]: 64-level baseline.
//! - [`ClzTrie`]: binary trie entered through a leading-zero jump table, so
//!   small keys skip their zero prefix.
//! - [`RadixTrie`]: path-compressed, internal nodes only where keys diverge.
//!
//! Any trie can be used as a [`Tree`] through [`TrieTree`].
//!
//! ## Example
//!
//! ```rust
//! use dynset::{RadixTrie, SplayTree, Tree, TrieTree, Uint64Key};
//!
//! let mut splay: SplayTree<u64, &str> = SplayTree::new();
//! assert_eq!(splay.set(5, "a")?, None);
//! assert_eq!(splay.set(5, "b")?, Some("a"));
//! assert_eq!(splay.get(&5)?, Some(&"b"));
//! assert_eq!(splay.root_key(), Some(&5));
//!
//! let mut trie: TrieTree<RadixTrie<&str>> = TrieTree::new(RadixTrie::new());
//! trie.set(Uint64Key(5), "a")?;
//! assert_eq!(trie.del(&Uint64Key(5))?, Some("a"));
//! assert_eq!(trie.get(&Uint64Key(5))?, None);
//! # Ok::<(), dynset::Error>(())
//! ```
//!
//! None of the structures synchronize internally. Share them across threads
//! behind a lock; note that a splay tree mutates even on `get`.

#![deny(unsafe_code)]

mod binary_trie;
mod bst;
mod clz_trie;
mod error;
mod key;
mod radix_trie;
mod splay;
mod trie_tree;

pub use binary_trie::BinaryTrie;
pub use bst::BinarySearchTree;
pub use clz_trie::ClzTrie;
pub use error::{Error, Result};
pub use key::{DynKey, Key, RawKey, Uint64Key};
pub use radix_trie::RadixTrie;
pub use splay::SplayTree;
pub use trie_tree::TrieTree;

// =============================================================================
// Configuration
// =============================================================================

/// Width of every trie key, in bits.
pub const KEY_BITS: u32 = 64;

/// Radix width used by [`RadixTrie::new`].
pub const DEFAULT_RADIX_WIDTH: u32 = 4;
/// Smallest radix width accepted by [`RadixTrie::with_width`].
pub const MIN_RADIX_WIDTH: u32 = 2;
/// Largest radix width accepted by [`RadixTrie::with_width`]; a node at this
/// width holds 256 child slots.
pub const MAX_RADIX_WIDTH: u32 = 8;

// =============================================================================
// Contracts
// =============================================================================

/// Ordered-key dynamic set.
///
/// Operations fail only with [`Error::InvalidKeyType`], when keys of
/// incompatible kinds meet. A missing key is reported as `Ok(None)`.
pub trait Tree<K, V> {
    /// Value stored under `key`.
    ///
    /// Takes `&mut self` because self-adjusting trees restructure on lookup.
    fn get(&mut self, key: &K) -> Result<Option<&V>>;

    /// Insert `value` under `key`, returning the value it replaced.
    fn set(&mut self, key: K, value: V) -> Result<Option<V>>;

    /// Remove `key`, returning its value.
    fn del(&mut self, key: &K) -> Result<Option<V>>;
}

/// Dynamic set keyed by fixed-width 64-bit unsigned integers.
pub trait Trie<V> {
    /// Value stored under `key`.
    fn get(&self, key: u64) -> Option<&V>;

    /// Insert `value` under `key`, returning the value it replaced.
    fn set(&mut self, key: u64, value: V) -> Option<V>;

    /// Remove `key`, returning its value.
    fn del(&mut self, key: u64) -> Option<V>;
}

#[cfg(test)]
mod proptests;
