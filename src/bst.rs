//! Unbalanced binary search tree.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. Child links
//! are the owning structure; the parent link is a plain back-reference kept in
//! sync with every splice and rotation so [`SplayTree`](crate::SplayTree) can
//! walk upward from any node.

use std::cmp::Ordering;
use std::fmt;
use std::mem;

use crate::error::{invariant_violation, Result};
use crate::key::Key;
use crate::Tree;

// =============================================================================
// Node storage
// =============================================================================

/// Index of a node in the tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct NodeId(u32);

impl NodeId {
    /// Id for arena slot `index`; the arena never outgrows `u32` ids.
    fn from_index(index: usize) -> Self {
        match u32::try_from(index) {
            Ok(id) => NodeId(id),
            Err(_) => invariant_violation("binary search tree arena exhausted its node ids"),
        }
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Which child link of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

impl<K, V> Node<K, V> {
    #[inline]
    fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    fn set_child(&mut self, side: Side, child: Option<NodeId>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }
}

/// A node unlinked by [`BinarySearchTree::remove`].
pub(crate) struct Removed<V> {
    pub(crate) value: V,
    /// Parent of the removed node at the time it was unlinked.
    pub(crate) parent: Option<NodeId>,
}

// =============================================================================
// Tree
// =============================================================================

/// An unbalanced binary search tree.
///
/// Lookups, inserts and deletes cost O(depth); depth degrades to O(n) for
/// sorted insertion orders.
pub struct BinarySearchTree<K, V> {
    /// Arena slots; `None` marks a freed slot awaiting reuse.
    nodes: Vec<Option<Node<K, V>>>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    count: usize,
}

impl<K, V> BinarySearchTree<K, V> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
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

    /// Key stored at the root, if any.
    pub fn root_key(&self) -> Option<&K> {
        self.root.map(|id| &self.node(id).key)
    }

    #[inline]
    pub(crate) fn root(&self) -> Option<NodeId> {
        self.root
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<K, V> {
        match self.nodes.get(id.index()) {
            Some(Some(node)) => node,
            _ => invariant_violation("dangling node reference in binary search tree"),
        }
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match self.nodes.get_mut(id.index()) {
            Some(Some(node)) => node,
            _ => invariant_violation("dangling node reference in binary search tree"),
        }
    }

    fn alloc(&mut self, key: K, value: V, parent: Option<NodeId>) -> NodeId {
        let node = Node {
            key,
            value,
            parent,
            left: None,
            right: None,
        };
        self.count += 1;
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = Some(node);
                id
            }
            None => {
                let id = NodeId::from_index(self.nodes.len());
                self.nodes.push(Some(node));
                id
            }
        }
    }

    fn release(&mut self, id: NodeId) -> Node<K, V> {
        let Some(node) = self.nodes.get_mut(id.index()).and_then(Option::take) else {
            invariant_violation("released a node twice");
        };
        self.free.push(id);
        self.count -= 1;
        node
    }

    /// Which side of `parent` the node `child` hangs from.
    pub(crate) fn side_of(&self, parent: NodeId, child: NodeId) -> Side {
        let p = self.node(parent);
        if p.left == Some(child) {
            Side::Left
        } else if p.right == Some(child) {
            Side::Right
        } else {
            invariant_violation("parent back-reference does not match child links")
        }
    }

    /// Point whatever link held `old` (a child slot of `parent`, or the root)
    /// at `new`. Does not touch `new`'s parent link.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let side = self.side_of(p, old);
                self.node_mut(p).set_child(side, new);
            }
        }
    }

    fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.node(id).left {
            id = left;
        }
        id
    }

    /// Rotate at `pivot`, lifting its child on `side` into its place.
    ///
    /// The lifted child's inner subtree (the one on the opposite side) is
    /// handed over to `pivot`, which keeps the in-order sequence unchanged.
    pub(crate) fn rotate(&mut self, pivot: NodeId, side: Side) {
        let Some(lifted) = self.node(pivot).child(side) else {
            invariant_violation("rotation towards a missing child");
        };
        let inner = self.node(lifted).child(side.opposite());
        let parent = self.node(pivot).parent;

        self.node_mut(pivot).set_child(side, inner);
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(pivot);
        }

        self.replace_child(parent, pivot, Some(lifted));
        let l = self.node_mut(lifted);
        l.parent = parent;
        l.set_child(side.opposite(), Some(pivot));

        self.node_mut(pivot).parent = Some(lifted);
    }
}

impl<K: Key, V> BinarySearchTree<K, V> {
    pub fn get(&self, key: &K) -> Result<Option<&V>> {
        Ok(self.find(key)?.map(|id| &self.node(id).value))
    }

    pub fn contains_key(&self, key: &K) -> Result<bool> {
        Ok(self.find(key)?.is_some())
    }

    /// Insert or update. Returns the previous value if the key was present.
    pub fn set(&mut self, key: K, value: V) -> Result<Option<V>> {
        let (_, old) = self.add(key, value)?;
        Ok(old)
    }

    pub fn del(&mut self, key: &K) -> Result<Option<V>> {
        Ok(self.remove(key)?.map(|removed| removed.value))
    }

    /// Find the node holding `key`.
    pub(crate) fn find(&self, key: &K) -> Result<Option<NodeId>> {
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.node(id);
            current = match key.compare_to(&node.key)? {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Ok(Some(id)),
            };
        }
        Ok(None)
    }

    /// Return the node holding `key`, creating it if absent. The previous value
    /// is returned when the key already existed; the stored key is kept.
    pub(crate) fn add(&mut self, key: K, value: V) -> Result<(NodeId, Option<V>)> {
        let Some(mut current) = self.root else {
            let id = self.alloc(key, value, None);
            self.root = Some(id);
            return Ok((id, None));
        };

        loop {
            let node = self.node_mut(current);
            let side = match key.compare_to(&node.key)? {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => {
                    let old = mem::replace(&mut node.value, value);
                    return Ok((current, Some(old)));
                }
            };
            match node.child(side) {
                Some(child) => current = child,
                None => {
                    let id = self.alloc(key, value, Some(current));
                    self.node_mut(current).set_child(side, Some(id));
                    return Ok((id, None));
                }
            }
        }
    }

    /// Unlink the node holding `key`.
    ///
    /// A node with two children is replaced by its in-order successor: the
    /// successor node itself is moved into the vacated position (keys are never
    /// copied between nodes), so node identities stay stable for splaying.
    pub(crate) fn remove(&mut self, key: &K) -> Result<Option<Removed<V>>> {
        let Some(id) = self.find(key)? else {
            return Ok(None);
        };

        let (left, right, parent) = {
            let n = self.node(id);
            (n.left, n.right, n.parent)
        };

        let replacement = match (left, right) {
            (Some(_), Some(right)) => {
                let successor = self.leftmost(right);

                // Splice the successor out of its current position.
                let (succ_parent, succ_right) = {
                    let s = self.node(successor);
                    (s.parent, s.right)
                };
                self.replace_child(succ_parent, successor, succ_right);
                if let Some(r) = succ_right {
                    self.node_mut(r).parent = succ_parent;
                }

                // Adopt the removed node's (possibly updated) children.
                let (left, right) = {
                    let n = self.node(id);
                    (n.left, n.right)
                };
                let s = self.node_mut(successor);
                s.left = left;
                s.right = right;
                for child in [left, right].into_iter().flatten() {
                    self.node_mut(child).parent = Some(successor);
                }

                Some(successor)
            }
            (Some(child), None) | (None, Some(child)) => Some(child),
            (None, None) => None,
        };

        self.replace_child(parent, id, replacement);
        if let Some(r) = replacement {
            self.node_mut(r).parent = parent;
        }

        let node = self.release(id);
        Ok(Some(Removed {
            value: node.value,
            parent: node.parent,
        }))
    }
}

impl<K, V> Default for BinarySearchTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V> fmt::Debug for BinarySearchTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinarySearchTree")
            .field("len", &self.count)
            .field("root", &self.root_key())
            .finish()
    }
}

impl<K: Key, V> Tree<K, V> for BinarySearchTree<K, V> {
    fn get(&mut self, key: &K) -> Result<Option<&V>> {
        BinarySearchTree::get(self, key)
    }

    fn set(&mut self, key: K, value: V) -> Result<Option<V>> {
        BinarySearchTree::set(self, key, value)
    }

    fn del(&mut self, key: &K) -> Result<Option<V>> {
        BinarySearchTree::del(self, key)
    }
}

// =============================================================================
// Validation
// =============================================================================

#[cfg(test)]
impl<K: Key, V> BinarySearchTree<K, V> {
    /// Check ordering, parent back-references and the live node count.
    pub(crate) fn validate(&self) {
        if let Some(root) = self.root {
            assert_eq!(self.node(root).parent, None, "root must have no parent");
        }

        // Iterative in-order walk; degenerate trees can be very deep.
        let mut stack: Vec<NodeId> = Vec::new();
        let mut current = self.root;
        let mut prev: Option<NodeId> = None;
        let mut seen = 0usize;
        while current.is_some() || !stack.is_empty() {
            while let Some(id) = current {
                let node = self.node(id);
                for child in [node.left, node.right].into_iter().flatten() {
                    assert_eq!(
                        self.node(child).parent,
                        Some(id),
                        "child must point back at its parent"
                    );
                }
                stack.push(id);
                current = node.left;
            }
            let Some(id) = stack.pop() else { break };
            if let Some(p) = prev {
                assert_eq!(
                    self.node(p).key.compare_to(&self.node(id).key),
                    Ok(Ordering::Less),
                    "in-order keys must be strictly ascending"
                );
            }
            prev = Some(id);
            seen += 1;
            current = self.node(id).right;
        }

        assert_eq!(seen, self.count, "reachable nodes must match len");
        assert_eq!(
            self.nodes.iter().filter(|n| n.is_some()).count(),
            self.count,
            "live arena slots must match len"
        );
    }
}
