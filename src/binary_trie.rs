//! Plain bitwise trie over 64-bit keys.
//!
//! One node per bit level, most significant bit first; every operation walks
//! all 64 levels. No path compression and no shortcuts.

use std::fmt;

use crate::{Trie, KEY_BITS};

struct TrieNode<V> {
    value: Option<V>,
    children: [Option<Box<TrieNode<V>>>; 2],
}

impl<V> TrieNode<V> {
    fn new() -> Self {
        Self {
            value: None,
            children: [None, None],
        }
    }
}

#[inline]
fn bit(key: u64, level: u32) -> usize {
    ((key >> (KEY_BITS - 1 - level)) & 1) as usize
}

/// A fixed-depth binary trie. Every operation costs exactly 64 steps.
pub struct BinaryTrie<V> {
    root: TrieNode<V>,
    count: usize,
}

impl<V> BinaryTrie<V> {
    pub fn new() -> Self {
        Self {
            root: TrieNode::new(),
            count: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn get(&self, key: u64) -> Option<&V> {
        let mut node = &self.root;
        for level in 0..KEY_BITS {
            node = node.children[bit(key, level)].as_deref()?;
        }
        node.value.as_ref()
    }

    pub fn contains_key(&self, key: u64) -> bool {
        self.get(key).is_some()
    }

    pub fn set(&mut self, key: u64, value: V) -> Option<V> {
        let mut node = &mut self.root;
        for level in 0..KEY_BITS {
            let child = &mut node.children[bit(key, level)];
            node = &mut **child.get_or_insert_with(|| Box::new(TrieNode::new()));
        }
        let old = node.value.replace(value);
        if old.is_none() {
            self.count += 1;
        }
        old
    }

    /// Remove `key`, unlinking its terminal node. Intermediate nodes are left
    /// in place.
    pub fn del(&mut self, key: u64) -> Option<V> {
        let mut node = &mut self.root;
        for level in 0..KEY_BITS - 1 {
            node = node.children[bit(key, level)].as_deref_mut()?;
        }
        let terminal = node.children[bit(key, KEY_BITS - 1)].take()?;
        let old = terminal.value;
        if old.is_some() {
            self.count -= 1;
        }
        old
    }
}

impl<V> Default for BinaryTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for BinaryTrie<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryTrie").field("len", &self.count).finish()
    }
}

impl<V> Trie<V> for BinaryTrie<V> {
    fn get(&self, key: u64) -> Option<&V> {
        BinaryTrie::get(self, key)
    }

    fn set(&mut self, key: u64, value: V) -> Option<V> {
        BinaryTrie::set(self, key, value)
    }

    fn del(&mut self, key: u64) -> Option<V> {
        BinaryTrie::del(self, key)
    }
}
