//! Path-compressed radix trie over 64-bit keys.
//!
//! Keys are split into groups of `width` bits. Level `l` covers bits
//! `l * width .. (l + 1) * width`, with level 0 holding the least significant
//! group; lookups start at the highest level. Internal nodes fan out by
//! `2^width` and exist only where two stored keys first diverge, so a node
//! with a single child is never kept: it is replaced by that child. Each
//! internal node records the key bits above its level (its prefix), which lets
//! a lookup reject a key as soon as the prefix stops matching.

use std::fmt;
use std::mem;

use crate::error::{invariant_violation, Error, Result};
use crate::{Trie, DEFAULT_RADIX_WIDTH, KEY_BITS, MAX_RADIX_WIDTH, MIN_RADIX_WIDTH};

// =============================================================================
// Geometry
// =============================================================================

/// Bit layout derived from the radix width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Geometry {
    width: u32,
    mask: u64,
    fanout: usize,
    /// Highest internal level; `ceil(64 / width) - 1`.
    top: u32,
}

impl Geometry {
    fn new(width: u32) -> Self {
        debug_assert!((MIN_RADIX_WIDTH..=MAX_RADIX_WIDTH).contains(&width));
        let fanout = 1usize << width;
        Self {
            width,
            mask: fanout as u64 - 1,
            fanout,
            top: KEY_BITS.div_ceil(width) - 1,
        }
    }

    /// Child index of `key` in a node at `level`.
    #[inline]
    fn slot(self, key: u64, level: u32) -> usize {
        ((key >> (level * self.width)) & self.mask) as usize
    }

    /// Clear every bit below `level`.
    #[inline]
    fn trim(self, key: u64, level: u32) -> u64 {
        let shift = level * self.width;
        if shift >= KEY_BITS {
            0
        } else {
            (key >> shift) << shift
        }
    }

    /// Whether `key` can live below `inner`.
    #[inline]
    fn is_descendant<V>(self, inner: &Inner<V>, key: u64) -> bool {
        inner.level == self.top || self.trim(key, inner.level + 1) == inner.prefix
    }

    /// Highest level whose bit group differs between two distinct keys.
    fn diff_level(self, a: u64, b: u64) -> u32 {
        let diff = a ^ b;
        if diff == 0 {
            invariant_violation("diff level requested for equal keys");
        }
        let highest_bit = KEY_BITS - 1 - diff.leading_zeros();
        highest_bit / self.width
    }

    /// Build the internal node that separates the new key from an existing
    /// subtree. `old_key` is any key routed into `old` (a leaf's key or an
    /// internal node's prefix).
    fn split<V>(self, old: RadixNode<V>, old_key: u64, key: u64, value: V) -> RadixNode<V> {
        let level = self.diff_level(key, old_key);
        let mut inner = Inner::new(self, self.trim(key, level + 1), level);
        inner.children[self.slot(key, level)] = Some(RadixNode::Leaf { key, value });
        inner.children[self.slot(old_key, level)] = Some(old);
        inner.count = 2;
        log::trace!("radix trie split at level {level} for key {key:#x}");
        RadixNode::Inner(Box::new(inner))
    }
}

// =============================================================================
// Nodes
// =============================================================================

enum RadixNode<V> {
    Leaf { key: u64, value: V },
    Inner(Box<Inner<V>>),
}

struct Inner<V> {
    /// Key bits above this node's level; lower bits are zero.
    prefix: u64,
    level: u32,
    /// Number of occupied child slots; at least 2 while linked.
    count: usize,
    children: Box<[Option<RadixNode<V>>]>,
}

impl<V> Inner<V> {
    fn new(geometry: Geometry, prefix: u64, level: u32) -> Self {
        Self {
            prefix,
            level,
            count: 0,
            children: (0..geometry.fanout).map(|_| None).collect(),
        }
    }
}

fn insert<V>(geometry: Geometry, slot: &mut Option<RadixNode<V>>, key: u64, value: V) -> Option<V> {
    let diverging = match slot {
        None => {
            *slot = Some(RadixNode::Leaf { key, value });
            return None;
        }
        Some(RadixNode::Leaf { key: k, value: v }) if *k == key => {
            return Some(mem::replace(v, value));
        }
        Some(RadixNode::Leaf { key: k, .. }) => *k,
        Some(RadixNode::Inner(inner)) if geometry.is_descendant(&**inner, key) => {
            let idx = geometry.slot(key, inner.level);
            if inner.children[idx].is_none() {
                inner.count += 1;
            }
            return insert(geometry, &mut inner.children[idx], key, value);
        }
        Some(RadixNode::Inner(inner)) => inner.prefix,
    };

    // The key diverges from everything under this slot.
    let Some(old) = slot.take() else {
        invariant_violation("radix slot emptied during insert");
    };
    *slot = Some(geometry.split(old, diverging, key, value));
    None
}

fn remove<V>(geometry: Geometry, slot: &mut Option<RadixNode<V>>, key: u64) -> Option<V> {
    match slot {
        None => None,
        Some(RadixNode::Leaf { key: k, .. }) if *k != key => None,
        Some(RadixNode::Leaf { .. }) => match slot.take() {
            Some(RadixNode::Leaf { value, .. }) => Some(value),
            _ => invariant_violation("radix leaf vanished during remove"),
        },
        Some(RadixNode::Inner(inner)) => {
            if !geometry.is_descendant(inner, key) {
                return None;
            }
            let idx = geometry.slot(key, inner.level);
            let value = remove(geometry, &mut inner.children[idx], key)?;
            if inner.children[idx].is_none() {
                inner.count -= 1;
            }
            if inner.count < 2 {
                collapse(slot);
            }
            Some(value)
        }
    }
}

/// Replace the single-child internal node in `slot` with its remaining child.
fn collapse<V>(slot: &mut Option<RadixNode<V>>) {
    let Some(RadixNode::Inner(mut inner)) = slot.take() else {
        invariant_violation("collapsing a radix slot that holds no internal node");
    };
    let Some(sole) = inner.children.iter_mut().find_map(Option::take) else {
        invariant_violation("radix node child count out of sync with its children");
    };
    log::trace!("radix trie collapsed level {} node", inner.level);
    *slot = Some(sole);
}

// =============================================================================
// Trie
// =============================================================================

/// A path-compressed radix trie.
///
/// Depth is bounded by the number of distinguishing bit groups among the
/// stored keys rather than by the key width.
pub struct RadixTrie<V> {
    root: Option<RadixNode<V>>,
    geometry: Geometry,
    count: usize,
}

impl<V> RadixTrie<V> {
    /// Create an empty trie with the default radix width.
    pub fn new() -> Self {
        Self::from_geometry(Geometry::new(DEFAULT_RADIX_WIDTH))
    }

    /// Create an empty trie consuming `width` key bits per level.
    ///
    /// `width` must lie in [`MIN_RADIX_WIDTH`]`..=`[`MAX_RADIX_WIDTH`]. Every
    /// internal node allocates `2^width` child slots up front, so wider
    /// radices (9 through 16 and beyond) are rejected with
    /// [`Error::InvalidRadixWidth`] rather than building 512-slot to
    /// 65536-slot nodes on each split.
    pub fn with_width(width: u32) -> Result<Self> {
        if !(MIN_RADIX_WIDTH..=MAX_RADIX_WIDTH).contains(&width) {
            return Err(Error::InvalidRadixWidth {
                width,
                min: MIN_RADIX_WIDTH,
                max: MAX_RADIX_WIDTH,
            });
        }
        Ok(Self::from_geometry(Geometry::new(width)))
    }

    fn from_geometry(geometry: Geometry) -> Self {
        log::debug!(
            "radix trie: width={} fanout={} levels={}",
            geometry.width,
            geometry.fanout,
            geometry.top + 1
        );
        Self {
            root: None,
            geometry,
            count: 0,
        }
    }

    /// Key bits consumed per internal level.
    #[inline]
    pub fn width(&self) -> u32 {
        self.geometry.width
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
        let mut node = self.root.as_ref()?;
        loop {
            match node {
                RadixNode::Leaf { key: k, value } => return (*k == key).then_some(value),
                RadixNode::Inner(inner) => {
                    if !self.geometry.is_descendant(inner, key) {
                        return None;
                    }
                    node = inner.children[self.geometry.slot(key, inner.level)].as_ref()?;
                }
            }
        }
    }

    pub fn contains_key(&self, key: u64) -> bool {
        self.get(key).is_some()
    }

    pub fn set(&mut self, key: u64, value: V) -> Option<V> {
        let old = insert(self.geometry, &mut self.root, key, value);
        if old.is_none() {
            self.count += 1;
        }
        old
    }

    pub fn del(&mut self, key: u64) -> Option<V> {
        let old = remove(self.geometry, &mut self.root, key);
        if old.is_some() {
            self.count -= 1;
        }
        old
    }
}

impl<V> Default for RadixTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for RadixTrie<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RadixTrie")
            .field("width", &self.geometry.width)
            .field("len", &self.count)
            .finish()
    }
}

impl<V> Trie<V> for RadixTrie<V> {
    fn get(&self, key: u64) -> Option<&V> {
        RadixTrie::get(self, key)
    }

    fn set(&mut self, key: u64, value: V) -> Option<V> {
        RadixTrie::set(self, key, value)
    }

    fn del(&mut self, key: u64) -> Option<V> {
        RadixTrie::del(self, key)
    }
}

// =============================================================================
// Validation
// =============================================================================

#[cfg(test)]
impl<V> RadixTrie<V> {
    /// Walk the whole trie checking child counts, levels and prefixes.
    /// Returns the maximum depth in internal nodes.
    pub(crate) fn validate(&self) -> usize {
        let g = self.geometry;
        // (node, (parent level, slot in parent, parent prefix), depth)
        let mut stack: Vec<(&RadixNode<V>, Option<(u32, usize, u64)>, usize)> = Vec::new();
        if let Some(root) = &self.root {
            stack.push((root, None, 0));
        }

        let mut leaves = 0usize;
        let mut max_depth = 0usize;
        while let Some((node, parent, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            let route_key = match node {
                RadixNode::Leaf { key, .. } => {
                    leaves += 1;
                    *key
                }
                RadixNode::Inner(inner) => {
                    assert!(inner.level <= g.top, "level above the top level");
                    assert_eq!(inner.children.len(), g.fanout);
                    let occupied = inner.children.iter().filter(|c| c.is_some()).count();
                    assert_eq!(inner.count, occupied, "child count must match children");
                    assert!(inner.count >= 2, "internal node with fewer than 2 children");
                    assert_eq!(
                        g.trim(inner.prefix, inner.level + 1),
                        inner.prefix,
                        "prefix must have bits at and below its level cleared"
                    );
                    for (idx, child) in inner.children.iter().enumerate() {
                        if let Some(child) = child {
                            stack.push((child, Some((inner.level, idx, inner.prefix)), depth + 1));
                        }
                    }
                    inner.prefix
                }
            };

            if let Some((level, idx, prefix)) = parent {
                assert_eq!(g.slot(route_key, level), idx, "node filed under the wrong slot");
                assert_eq!(g.trim(route_key, level + 1), prefix, "node outside its parent's prefix");
                if let RadixNode::Inner(inner) = node {
                    assert!(inner.level < level, "child level must be below its parent");
                }
            }
        }

        assert_eq!(leaves, self.count, "reachable leaves must match len");
        max_depth
    }
}
