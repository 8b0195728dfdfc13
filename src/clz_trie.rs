//! Binary trie with a leading-zero jump table.
//!
//! Integer key sets are rarely spread over the whole key space: most keys are
//! small and share a long run of leading zero bits. Every such key walks the
//! same chain of zero children from the root (the *spine*). The jump table
//! records the spine node at each depth, so an operation on a key with `lz`
//! leading zeros starts at depth `lz` and walks `64 - lz` levels instead of 64.
//!
//! Nodes are kept in an arena and never freed: deletion clears the stored
//! value and leaves the path in place, which keeps every jump-table entry
//! valid for the lifetime of the trie.

use std::fmt;

use crate::error::invariant_violation;
use crate::{Trie, KEY_BITS};

/// One entry per possible leading-zero count, `0..=64`.
const JUMP_TABLE_LEN: usize = KEY_BITS as usize + 1;

const ROOT: u32 = 0;

/// Number of leading zero bits; `clz(0) == 64`.
#[inline]
fn clz(key: u64) -> u32 {
    key.leading_zeros()
}

/// Bit consumed when leaving depth `level`, most significant bit first.
#[inline]
fn bit(key: u64, level: u32) -> usize {
    ((key >> (KEY_BITS - 1 - level)) & 1) as usize
}

/// Arena id for slot `index`.
fn node_id(index: usize) -> u32 {
    match u32::try_from(index) {
        Ok(id) => id,
        Err(_) => invariant_violation("clz trie arena exhausted its node ids"),
    }
}

struct ClzNode<V> {
    value: Option<V>,
    children: [Option<u32>; 2],
}

impl<V> ClzNode<V> {
    fn new() -> Self {
        Self {
            value: None,
            children: [None, None],
        }
    }
}

/// A binary trie optimized for numerically small keys.
pub struct ClzTrie<V> {
    nodes: Vec<ClzNode<V>>,
    /// `spine[d]` is the node reached from the root by `d` zero bits, if it
    /// exists. `spine[0]` is the root and always present.
    spine: [Option<u32>; JUMP_TABLE_LEN],
    count: usize,
}

impl<V> ClzTrie<V> {
    pub fn new() -> Self {
        let mut spine = [None; JUMP_TABLE_LEN];
        spine[0] = Some(ROOT);
        Self {
            nodes: vec![ClzNode::new()],
            spine,
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

    #[inline]
    fn node(&self, id: u32) -> &ClzNode<V> {
        &self.nodes[id as usize]
    }

    #[inline]
    fn node_mut(&mut self, id: u32) -> &mut ClzNode<V> {
        &mut self.nodes[id as usize]
    }

    fn alloc(&mut self) -> u32 {
        let id = node_id(self.nodes.len());
        self.nodes.push(ClzNode::new());
        id
    }

    /// Terminal node for `key`, entering the trie through the jump table.
    ///
    /// A missing jump-table entry means no stored key has this many leading
    /// zeros, so the lookup fails without touching any node.
    fn locate(&self, key: u64) -> Option<u32> {
        let lz = clz(key);
        let mut id = self.spine[lz as usize]?;
        for level in lz..KEY_BITS {
            id = self.node(id).children[bit(key, level)]?;
        }
        Some(id)
    }

    pub fn get(&self, key: u64) -> Option<&V> {
        let id = self.locate(key)?;
        self.node(id).value.as_ref()
    }

    pub fn contains_key(&self, key: u64) -> bool {
        self.get(key).is_some()
    }

    pub fn set(&mut self, key: u64, value: V) -> Option<V> {
        let lz = clz(key);

        // Deepest existing spine node on this key's path.
        let mut depth = lz;
        let mut id = loop {
            if let Some(id) = self.spine[depth as usize] {
                break id;
            }
            if depth == 0 {
                invariant_violation("clz trie jump table lost its root");
            }
            depth -= 1;
        };

        for level in depth..KEY_BITS {
            let b = bit(key, level);
            let existing = self.node(id).children[b];
            id = match existing {
                Some(child) => child,
                None => {
                    let child = self.alloc();
                    self.node_mut(id).children[b] = Some(child);
                    // Above `lz` every bit is zero: the new node extends the spine.
                    if level < lz {
                        self.spine[level as usize + 1] = Some(child);
                    }
                    child
                }
            };
        }

        if depth < lz {
            log::trace!("clz trie spine extended from depth {depth} to {lz}");
        }

        let old = self.node_mut(id).value.replace(value);
        if old.is_none() {
            self.count += 1;
        }
        old
    }

    /// Remove `key`. The terminal node and its path stay allocated.
    pub fn del(&mut self, key: u64) -> Option<V> {
        let id = self.locate(key)?;
        let old = self.node_mut(id).value.take();
        if old.is_some() {
            self.count -= 1;
        }
        old
    }
}

impl<V> Default for ClzTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for ClzTrie<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spine_depth = self.spine.iter().rposition(Option::is_some).unwrap_or(0);
        f.debug_struct("ClzTrie")
            .field("len", &self.count)
            .field("spine_depth", &spine_depth)
            .finish()
    }
}

impl<V> Trie<V> for ClzTrie<V> {
    fn get(&self, key: u64) -> Option<&V> {
        ClzTrie::get(self, key)
    }

    fn set(&mut self, key: u64, value: V) -> Option<V> {
        ClzTrie::set(self, key, value)
    }

    fn del(&mut self, key: u64) -> Option<V> {
        ClzTrie::del(self, key)
    }
}

#[cfg(test)]
impl<V> ClzTrie<V> {
    /// Every jump-table entry must be exactly the node reached by that many
    /// zero bits, and the stored value count must match `len`.
    pub(crate) fn validate(&self) {
        let mut id = Some(ROOT);
        for depth in 0..JUMP_TABLE_LEN {
            assert_eq!(
                self.spine[depth], id,
                "jump table entry {depth} must match the zero spine"
            );
            id = id.and_then(|id| self.node(id).children[0]);
        }

        let live = self.nodes.iter().filter(|n| n.value.is_some()).count();
        assert_eq!(live, self.count, "stored values must match len");
    }
}
