use super::*;

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use proptest_derive::Arbitrary;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;

const NUM_KEYS: u64 = 10_000;

fn key_strategy() -> impl Strategy<Value = u64> {
    // Small keys collide often and share long zero prefixes; single-bit keys
    // hit every spine depth and radix level.
    prop_oneof![
        4 => 0u64..64,
        2 => (0u32..64).prop_map(|shift| 1u64 << shift),
        1 => any::<u64>(),
    ]
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 5)]
    Set {
        #[proptest(strategy = "key_strategy()")]
        key: u64,
        value: u64,
    },
    #[proptest(weight = 3)]
    Del {
        #[proptest(strategy = "key_strategy()")]
        key: u64,
    },
    #[proptest(weight = 2)]
    Get {
        #[proptest(strategy = "key_strategy()")]
        key: u64,
    },
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(any::<Op>(), 0..=1000)
}

/// Apply `ops` to `t` and to a `BTreeMap`, requiring identical results.
fn check_against_model<T>(
    t: &mut T,
    ops: &[Op],
) -> std::result::Result<BTreeMap<u64, u64>, TestCaseError>
where
    T: Tree<Uint64Key, u64>,
{
    let mut m: BTreeMap<u64, u64> = BTreeMap::new();
    for op in ops {
        match *op {
            Op::Set { key, value } => {
                prop_assert_eq!(t.set(Uint64Key(key), value), Ok(m.insert(key, value)));
            }
            Op::Del { key } => {
                prop_assert_eq!(t.del(&Uint64Key(key)), Ok(m.remove(&key)));
            }
            Op::Get { key } => {
                let got = t.get(&Uint64Key(key)).map(|v| v.copied());
                prop_assert_eq!(got, Ok(m.get(&key).copied()));
            }
        }
    }
    Ok(m)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_bst_equivalence(ops in ops_strategy()) {
        let mut t: BinarySearchTree<Uint64Key, u64> = BinarySearchTree::new();
        let m = check_against_model(&mut t, &ops)?;
        prop_assert_eq!(t.len(), m.len());
        t.validate();
    }

    #[test]
    fn prop_splay_equivalence(ops in ops_strategy()) {
        let mut t: SplayTree<Uint64Key, u64> = SplayTree::new();
        let m = check_against_model(&mut t, &ops)?;
        prop_assert_eq!(t.len(), m.len());
        t.validate();
    }

    #[test]
    fn prop_splay_accessed_node_is_root(ops in ops_strategy()) {
        let mut t: SplayTree<Uint64Key, u64> = SplayTree::new();
        for op in ops {
            match op {
                Op::Set { key, value } => {
                    prop_assert!(t.set(Uint64Key(key), value).is_ok());
                    prop_assert_eq!(t.root_key(), Some(&Uint64Key(key)));
                }
                Op::Get { key } => {
                    if matches!(t.get(&Uint64Key(key)), Ok(Some(_))) {
                        prop_assert_eq!(t.root_key(), Some(&Uint64Key(key)));
                    }
                }
                Op::Del { key } => {
                    let parent = t.parent_key(&Uint64Key(key)).copied();
                    let removed = t.del(&Uint64Key(key));
                    prop_assert!(removed.is_ok());
                    prop_assert_ne!(t.root_key(), Some(&Uint64Key(key)));
                    // The deleted node's parent is splayed; a deleted root has none.
                    if let Some(parent) = parent {
                        prop_assert_eq!(t.root_key(), Some(&parent));
                    }
                }
            }
        }
        t.validate();
    }

    #[test]
    fn prop_binary_trie_equivalence(ops in ops_strategy()) {
        let mut t = TrieTree::new(BinaryTrie::<u64>::new());
        let m = check_against_model(&mut t, &ops)?;
        prop_assert_eq!(t.trie().len(), m.len());
    }

    #[test]
    fn prop_clz_trie_equivalence(ops in ops_strategy()) {
        let mut t = TrieTree::new(ClzTrie::<u64>::new());
        let m = check_against_model(&mut t, &ops)?;
        prop_assert_eq!(t.trie().len(), m.len());
        t.trie().validate();
    }

    #[test]
    fn prop_radix_trie_equivalence(
        width in MIN_RADIX_WIDTH..=MAX_RADIX_WIDTH,
        ops in ops_strategy(),
    ) {
        let trie = RadixTrie::<u64>::with_width(width).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let mut t = TrieTree::new(trie);
        let m = check_against_model(&mut t, &ops)?;
        prop_assert_eq!(t.trie().len(), m.len());
        t.trie().validate();
    }
}

type DynTree = Box<dyn Tree<Uint64Key, u64>>;

fn boxed<T: Tree<Uint64Key, u64> + 'static>(t: T) -> DynTree {
    Box::new(t)
}

fn all_structures() -> Vec<(&'static str, DynTree)> {
    vec![
        ("bst", boxed(BinarySearchTree::<Uint64Key, u64>::new())),
        ("splay", boxed(SplayTree::<Uint64Key, u64>::new())),
        ("binary", boxed(TrieTree::new(BinaryTrie::<u64>::new()))),
        ("clz", boxed(TrieTree::new(ClzTrie::<u64>::new()))),
        ("radix", boxed(TrieTree::new(RadixTrie::<u64>::new()))),
    ]
}

#[test]
fn permutation_round_trip() {
    let mut rng = StdRng::seed_from_u64(1);
    for (name, mut t) in all_structures() {
        let mut perm: Vec<u64> = (0..NUM_KEYS).collect();
        perm.shuffle(&mut rng);
        for &k in &perm {
            assert_eq!(t.set(Uint64Key(k), k), Ok(None), "{name}: set {k}");
        }
        for k in 0..NUM_KEYS {
            assert_eq!(t.get(&Uint64Key(k)), Ok(Some(&k)), "{name}: get {k}");
        }

        // Overwrite every key; the old value comes back.
        perm.shuffle(&mut rng);
        for &k in &perm {
            assert_eq!(t.set(Uint64Key(k), k + NUM_KEYS), Ok(Some(k)), "{name}: overwrite {k}");
        }
        for k in 0..NUM_KEYS {
            assert_eq!(t.get(&Uint64Key(k)), Ok(Some(&(k + NUM_KEYS))), "{name}: get {k}");
        }
    }
}

#[test]
fn missing_keys() {
    for (name, mut t) in all_structures() {
        for k in (0..100).map(|i| i * 7919 + (1 << 40)) {
            assert_eq!(t.get(&Uint64Key(k)), Ok(None), "{name}: get {k}");
            assert_eq!(t.del(&Uint64Key(k)), Ok(None), "{name}: del {k}");
        }

        // Deleting an absent key leaves other keys alone.
        t.set(Uint64Key(1), 10).unwrap();
        assert_eq!(t.del(&Uint64Key(2)), Ok(None), "{name}");
        assert_eq!(t.get(&Uint64Key(1)), Ok(Some(&10)), "{name}");
    }
}

#[test]
fn random_half_delete() {
    let mut rng = StdRng::seed_from_u64(2);
    for (name, mut t) in all_structures() {
        let mut perm: Vec<u64> = (0..NUM_KEYS).collect();
        perm.shuffle(&mut rng);
        for &k in &perm {
            t.set(Uint64Key(k), k).unwrap();
        }

        perm.shuffle(&mut rng);
        let (gone, kept) = perm.split_at(perm.len() / 2);
        for &k in gone {
            assert_eq!(t.del(&Uint64Key(k)), Ok(Some(k)), "{name}: del {k}");
        }
        for &k in gone {
            assert_eq!(t.get(&Uint64Key(k)), Ok(None), "{name}: deleted {k}");
        }
        for &k in kept {
            assert_eq!(t.get(&Uint64Key(k)), Ok(Some(&k)), "{name}: kept {k}");
        }
    }
}

#[test]
fn example_scenario_all_structures() {
    for (name, mut t) in all_structures() {
        let k = Uint64Key(5);
        assert_eq!(t.set(k, 1), Ok(None), "{name}");
        assert_eq!(t.set(k, 2), Ok(Some(1)), "{name}");
        assert_eq!(t.get(&k), Ok(Some(&2)), "{name}");
        assert_eq!(t.del(&k), Ok(Some(2)), "{name}");
        assert_eq!(t.get(&k), Ok(None), "{name}");
    }
}

#[test]
fn edge_keys_match_binary_trie() {
    let keys = [0, 1, 2, 1 << 62, 1 << 63, (1 << 63) | 1, u64::MAX - 1, u64::MAX];
    let mut baseline: BinaryTrie<usize> = BinaryTrie::new();
    let mut clz: ClzTrie<usize> = ClzTrie::new();
    let mut radix: RadixTrie<usize> = RadixTrie::with_width(3).unwrap();

    for (i, &k) in keys.iter().enumerate() {
        let expected = baseline.set(k, i);
        assert_eq!(clz.set(k, i), expected, "clz set {k:#x}");
        assert_eq!(radix.set(k, i), expected, "radix set {k:#x}");
    }
    for &k in keys.iter().rev() {
        let expected = baseline.get(k).copied();
        assert_eq!(clz.get(k).copied(), expected, "clz get {k:#x}");
        assert_eq!(radix.get(k).copied(), expected, "radix get {k:#x}");
    }
    for &k in keys.iter().step_by(2) {
        let expected = baseline.del(k);
        assert_eq!(clz.del(k), expected, "clz del {k:#x}");
        assert_eq!(radix.del(k), expected, "radix del {k:#x}");
    }
    for &k in &keys {
        let expected = baseline.get(k).copied();
        assert_eq!(clz.get(k).copied(), expected, "clz get {k:#x}");
        assert_eq!(radix.get(k).copied(), expected, "radix get {k:#x}");
    }
    clz.validate();
    radix.validate();
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

// Keys diverging at levels 0, 1, 3 and 15 of a width-4 radix trie.
const SMALL_SET: [u64; 6] = [0x00, 0x01, 0x10, 0x1000, 0x1001, 1 << 63];

#[test]
fn exhaustive_insert_order_small_set() {
    for_each_permutation(&SMALL_SET, |perm| {
        let mut radix: RadixTrie<u64> = RadixTrie::new();
        let mut splay: SplayTree<u64, u64> = SplayTree::new();
        for &k in &perm {
            assert_eq!(radix.set(k, k), None);
            assert_eq!(splay.set(k, k), Ok(None));
            radix.validate();
            splay.validate();
        }
        for &k in &SMALL_SET {
            assert_eq!(radix.get(k), Some(&k));
            assert_eq!(splay.get(&k), Ok(Some(&k)));
        }
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    for_each_permutation(&SMALL_SET, |perm| {
        let mut radix: RadixTrie<u64> = RadixTrie::new();
        let mut splay: SplayTree<u64, u64> = SplayTree::new();
        for &k in &SMALL_SET {
            radix.set(k, k);
            splay.set(k, k).unwrap();
        }

        for (removed, &k) in perm.iter().enumerate() {
            assert_eq!(radix.del(k), Some(k));
            assert_eq!(splay.del(&k), Ok(Some(k)));
            radix.validate();
            splay.validate();
            assert_eq!(radix.len(), SMALL_SET.len() - removed - 1);
        }
        assert!(radix.is_empty());
        assert!(splay.is_empty());
    });
}
