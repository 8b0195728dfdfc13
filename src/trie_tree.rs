//! View a [`Trie`] through the [`Tree`] contract.

use std::fmt;

use crate::error::Result;
use crate::key::{Key, RawKey};
use crate::{Trie, Tree};

/// Adapts any 64-bit-keyed trie to the ordered-key [`Tree`] contract by
/// converting each key to its raw bits with [`RawKey::to_raw`].
///
/// Use [`Uint64Key`](crate::Uint64Key) (or plain `u64`) keys; keys without a
/// 64-bit representation fail with
/// [`Error::InvalidKeyType`](crate::Error::InvalidKeyType).
pub struct TrieTree<T> {
    trie: T,
}

impl<T> TrieTree<T> {
    pub fn new(trie: T) -> Self {
        Self { trie }
    }

    pub fn trie(&self) -> &T {
        &self.trie
    }

    pub fn into_inner(self) -> T {
        self.trie
    }
}

impl<T: Default> Default for TrieTree<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for TrieTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TrieTree").field(&self.trie).finish()
    }
}

impl<T, K, V> Tree<K, V> for TrieTree<T>
where
    T: Trie<V>,
    K: Key + RawKey,
{
    fn get(&mut self, key: &K) -> Result<Option<&V>> {
        Ok(self.trie.get(key.to_raw()?))
    }

    fn set(&mut self, key: K, value: V) -> Result<Option<V>> {
        Ok(self.trie.set(key.to_raw()?, value))
    }

    fn del(&mut self, key: &K) -> Result<Option<V>> {
        Ok(self.trie.del(key.to_raw()?))
    }
}
