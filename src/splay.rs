//! Splay tree: a self-adjusting binary search tree.
//!
//! Every access moves the touched node to the root with a sequence of splay
//! steps, giving amortized O(log n) operations without storing any balance
//! metadata. Recently used keys stay near the root, so workloads with locality
//! of reference run well below the worst case.

use std::fmt;

use crate::bst::{BinarySearchTree, NodeId};
use crate::error::Result;
use crate::key::Key;
use crate::Tree;

/// A splay tree over the same node layout as [`BinarySearchTree`].
///
/// Note that [`get`](SplayTree::get) restructures the tree and therefore needs
/// `&mut self`.
pub struct SplayTree<K, V> {
    bst: BinarySearchTree<K, V>,
}

impl<K, V> SplayTree<K, V> {
    pub fn new() -> Self {
        Self {
            bst: BinarySearchTree::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bst.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bst.is_empty()
    }

    /// Key stored at the root: after any successful `get` or `set` this is the
    /// key that was just accessed.
    pub fn root_key(&self) -> Option<&K> {
        self.bst.root_key()
    }

    /// Move `node` to the root.
    ///
    /// Each iteration is one splay step, classified by where `node` and its
    /// parent hang:
    /// - zig: the parent is the root; one rotation lifts `node`.
    /// - zig-zig: `node` and its parent hang on the same side of their
    ///   parents; rotate the grandparent, then the parent.
    /// - zig-zag: they hang on opposite sides; rotate the parent, then the
    ///   grandparent.
    fn splay(&mut self, node: NodeId) {
        while let Some(parent) = self.bst.node(node).parent {
            let side = self.bst.side_of(parent, node);
            match self.bst.node(parent).parent {
                None => self.bst.rotate(parent, side),
                Some(grandparent) => {
                    let parent_side = self.bst.side_of(grandparent, parent);
                    if side == parent_side {
                        self.bst.rotate(grandparent, parent_side);
                        self.bst.rotate(parent, side);
                    } else {
                        self.bst.rotate(parent, side);
                        self.bst.rotate(grandparent, parent_side);
                    }
                }
            }
        }
        debug_assert_eq!(self.bst.root(), Some(node));
    }
}

impl<K: Key, V> SplayTree<K, V> {
    pub fn get(&mut self, key: &K) -> Result<Option<&V>> {
        let Some(id) = self.bst.find(key)? else {
            return Ok(None);
        };
        self.splay(id);
        Ok(Some(&self.bst.node(id).value))
    }

    /// Insert or update, then splay the key's node to the root.
    pub fn set(&mut self, key: K, value: V) -> Result<Option<V>> {
        let (id, old) = self.bst.add(key, value)?;
        self.splay(id);
        Ok(old)
    }

    /// Remove `key`, then splay the removed node's former parent so the
    /// neighbourhood of the deletion moves up.
    pub fn del(&mut self, key: &K) -> Result<Option<V>> {
        let Some(removed) = self.bst.remove(key)? else {
            return Ok(None);
        };
        if let Some(parent) = removed.parent {
            self.splay(parent);
        }
        Ok(Some(removed.value))
    }
}

impl<K, V> Default for SplayTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V> fmt::Debug for SplayTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplayTree")
            .field("len", &self.len())
            .field("root", &self.root_key())
            .finish()
    }
}

impl<K: Key, V> Tree<K, V> for SplayTree<K, V> {
    fn get(&mut self, key: &K) -> Result<Option<&V>> {
        SplayTree::get(self, key)
    }

    fn set(&mut self, key: K, value: V) -> Result<Option<V>> {
        SplayTree::set(self, key, value)
    }

    fn del(&mut self, key: &K) -> Result<Option<V>> {
        SplayTree::del(self, key)
    }
}

#[cfg(test)]
impl<K: Key, V> SplayTree<K, V> {
    pub(crate) fn validate(&self) {
        self.bst.validate();
    }

    /// Key of the parent of the node holding `key`, without splaying.
    pub(crate) fn parent_key(&self, key: &K) -> Option<&K> {
        let id = self.bst.find(key).ok().flatten()?;
        let parent = self.bst.node(id).parent?;
        Some(&self.bst.node(parent).key)
    }
}
