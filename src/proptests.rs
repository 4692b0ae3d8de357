use crate::hashtable::Config;
use crate::ordered::{OrderedMap, OrderedSet};
use crate::rbtree::RbTree;
use crate::unordered::{UnorderedMap, UnorderedSet};
use crate::{primes, Comparator};

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::{BTreeMap, BTreeSet, HashMap};

fn validate_tree<K, P, C: Comparator<K>>(t: &RbTree<K, P, C>) {
    let issues = t.verify_integrity();
    assert!(issues.is_empty(), "tree invariants broken: {issues:?}");

    let bound = 2.0 * ((t.len() + 1) as f64).log2();
    assert!(
        t.height() as f64 <= bound,
        "height {} exceeds 2*log2(n+1) = {bound}",
        t.height()
    );
}

fn validate_table<K, V>(m: &UnorderedMap<K, V>)
where
    K: crate::NaturalKey,
{
    let t = m.table();
    let issues = t.verify_integrity();
    assert!(issues.is_empty(), "table invariants broken: {issues:?}");
    assert!(primes::CAPACITIES.contains(&t.capacity()));
}

// Small key ranges force duplicates, deletes of present keys and long
// probe runs.
#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 5)]
    Add(#[proptest(strategy = "-64i64..64")] i64, u32),
    #[proptest(weight = 3)]
    Del(#[proptest(strategy = "-64i64..64")] i64),
    #[proptest(weight = 2)]
    Get(#[proptest(strategy = "-64i64..64")] i64),
    #[proptest(skip)]
    Clear,
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(any::<Op>(), 0..=1500)
}

fn ops_with_clear_strategy() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        60 => any::<Op>(),
        1 => Just(Op::Clear),
    ];
    prop::collection::vec(op, 0..=1500)
}

fn string_key_strategy() -> impl Strategy<Value = String> {
    "[a-d]{0,4}"
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_ordered_map_equivalence(ops in ops_strategy()) {
        let mut t: OrderedMap<i64, u32> = OrderedMap::new();
        let mut m: BTreeMap<i64, u32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Add(key, value) => {
                    let existed = t.add(key, value).unwrap();
                    prop_assert_eq!(existed, m.insert(key, value).is_some());
                }
                Op::Del(key) => {
                    prop_assert_eq!(t.del(&key), m.remove(&key));
                }
                Op::Get(key) => {
                    prop_assert_eq!(t.get(&key), m.get(&key));
                }
                Op::Clear => {
                    t.clear();
                    m.clear();
                }
            }
            prop_assert_eq!(t.len(), m.len());
            validate_tree(t.tree());
        }

        let got: Vec<(i64, u32)> = t.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(i64, u32)> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_ordered_set_equivalence(ops in ops_with_clear_strategy()) {
        let mut t: OrderedSet<i64> = OrderedSet::new();
        let mut m: BTreeSet<i64> = BTreeSet::new();

        for op in ops {
            match op {
                Op::Add(key, _) => {
                    prop_assert_eq!(t.add(key).unwrap(), !m.insert(key));
                }
                Op::Del(key) => {
                    prop_assert_eq!(t.del(&key), m.remove(&key));
                }
                Op::Get(key) => {
                    prop_assert_eq!(t.has(&key), m.contains(&key));
                }
                Op::Clear => {
                    t.clear();
                    m.clear();
                }
            }
            prop_assert_eq!(t.len(), m.len());
            validate_tree(t.tree());
        }

        prop_assert_eq!(t.first(), m.first());
        prop_assert_eq!(t.last(), m.last());
        let got: Vec<i64> = t.iter().copied().collect();
        let expected: Vec<i64> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_unordered_map_equivalence(ops in ops_with_clear_strategy()) {
        let mut t: UnorderedMap<i64, u32> = UnorderedMap::new();
        let mut m: HashMap<i64, u32> = HashMap::new();

        for op in ops {
            match op {
                Op::Add(key, value) => {
                    let existed = t.add(key, value).unwrap();
                    prop_assert_eq!(existed, m.insert(key, value).is_some());
                    prop_assert!((t.len() as f64) < 0.8 * t.capacity() as f64);
                }
                Op::Del(key) => {
                    prop_assert_eq!(t.del(&key), m.remove(&key));
                }
                Op::Get(key) => {
                    prop_assert_eq!(t.get(&key), m.get(&key));
                }
                Op::Clear => {
                    t.clear();
                    m.clear();
                }
            }
            prop_assert_eq!(t.len(), m.len());
        }

        validate_table(&t);
        for (k, v) in &m {
            prop_assert_eq!(t.get(k), Some(v));
        }
    }

    #[test]
    fn prop_unordered_set_string_keys(
        adds in prop::collection::vec(string_key_strategy(), 0..200),
        dels in prop::collection::vec(string_key_strategy(), 0..200),
    ) {
        let mut t: UnorderedSet<String> = UnorderedSet::new();
        let mut m: BTreeSet<String> = BTreeSet::new();

        for key in adds {
            prop_assert_eq!(t.add(key.clone()).unwrap(), !m.insert(key));
        }
        for key in &dels {
            prop_assert_eq!(t.del(key), m.remove(key));
        }

        prop_assert_eq!(t.len(), m.len());
        for key in &m {
            prop_assert!(t.has(key));
        }
        let mut got: Vec<String> = t.iter().cloned().collect();
        got.sort();
        prop_assert_eq!(got, m.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn prop_load_factor_respected(
        load_factor in 0.3f64..=1.0,
        n in 0usize..2000,
    ) {
        let config = Config::default().with_load_factor(load_factor);
        let mut t: UnorderedSet<i64> = UnorderedSet::with_config(&config).unwrap();
        for k in 0..n as i64 {
            t.add(k).unwrap();
            prop_assert!((t.len() as f64) < load_factor * t.capacity() as f64);
        }
        prop_assert!(t.table().verify_integrity().is_empty());
        prop_assert!((0..n as i64).all(|k| t.has(&k)));
    }
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

const SMALL_KEYS: [i64; 7] = [10, 20, 30, 40, 50, 60, 70];

#[test]
fn exhaustive_insert_order_small_set() {
    for_each_permutation(&SMALL_KEYS, |perm| {
        let mut t: OrderedMap<i64, usize> = OrderedMap::new();
        for (i, k) in perm.iter().enumerate() {
            assert!(!t.add(*k, i).unwrap());
            validate_tree(t.tree());
        }
        let got: Vec<i64> = t.keys().copied().collect();
        assert_eq!(got, SMALL_KEYS.to_vec());
        for (i, k) in perm.iter().enumerate() {
            assert_eq!(t.get(k), Some(&i));
        }
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    // Insert in a fixed order, then remove in all permutations.
    let mut base: OrderedMap<i64, i64> = OrderedMap::new();
    for k in SMALL_KEYS {
        base.add(k, -k).unwrap();
    }

    for_each_permutation(&SMALL_KEYS, |perm| {
        let mut t = base.clone();
        let mut m: BTreeMap<i64, i64> = SMALL_KEYS.iter().map(|&k| (k, -k)).collect();

        for k in perm {
            assert_eq!(t.del(&k), m.remove(&k));
            assert_eq!(t.len(), m.len());
            validate_tree(t.tree());
            let got: Vec<(i64, i64)> = t.iter().map(|(k, v)| (*k, *v)).collect();
            let expected: Vec<(i64, i64)> = m.iter().map(|(k, v)| (*k, *v)).collect();
            assert_eq!(got, expected);
        }
        assert!(t.is_empty());
        assert!(t.tree().root().is_none());
    });
}

#[test]
fn exhaustive_colliding_delete_order() {
    // All keys share one home slot, so every delete exercises the shift.
    let keys = [1i64, 2, 3, 4, 5, 6];
    let hasher = crate::FnHasher::new(|_: &i64| 7u64, |a: &i64, b: &i64| a == b);
    let mut base = UnorderedMap::with_hasher(hasher);
    for k in keys {
        base.add(k, k * 10).unwrap();
    }

    for_each_permutation(&keys, |perm| {
        let mut t = base.clone();
        let mut left: BTreeSet<i64> = keys.iter().copied().collect();
        for k in perm {
            assert_eq!(t.del(&k), Some(k * 10));
            left.remove(&k);
            for other in &left {
                assert_eq!(t.get(other), Some(&(other * 10)), "lost {other}");
            }
            assert!(t.table().verify_integrity().is_empty());
        }
        assert!(t.is_empty());
    });
}
