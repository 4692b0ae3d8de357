//! End-to-end scenarios across the public containers.

use assoc::{Config, FnHasher, OrderedMap, OrderedSet, UnorderedMap, UnorderedSet};

#[test]
fn ascending_inserts_keep_tree_shallow() {
    let mut set = OrderedSet::new();
    for k in 1..=1000i64 {
        assert!(!set.add(k).unwrap());
    }
    assert_eq!(set.len(), 1000);

    let height = set.tree().height() as f64;
    assert!(height <= 2.0 * 1001f64.log2(), "height {height}");
    assert!(set.tree().verify_integrity().is_empty());
    assert!(set.iter().copied().eq(1..=1000));
}

#[test]
fn string_keys_round_trip_through_unordered_map() {
    let mut map = UnorderedMap::new();
    for i in 0..50i64 {
        assert!(!map.add(format!("key-{i}"), i).unwrap());
    }
    assert_eq!(map.len(), 50);
    for i in 0..50i64 {
        assert_eq!(map.get(&format!("key-{i}")), Some(&i));
    }

    // Updating reports the key as existing and keeps the count.
    assert!(map.add("key-7".to_string(), 700).unwrap());
    assert_eq!(map.get(&"key-7".to_string()), Some(&700));
    assert_eq!(map.len(), 50);
}

#[test]
fn deleting_two_child_node_keeps_order() {
    let mut map = OrderedMap::new();
    for k in [4i64, 2, 6, 1, 3, 5, 7] {
        map.add(k, k * 11).unwrap();
    }
    let tree = map.tree();
    let root = tree.root().unwrap();
    assert_eq!(*tree.key(root), 4);
    assert!(tree.predecessor(root).is_some() && tree.successor(root).is_some());

    assert_eq!(map.del(&4), Some(44));
    let pairs: Vec<(i64, i64)> = map.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(
        pairs,
        vec![(1, 11), (2, 22), (3, 33), (5, 55), (6, 66), (7, 77)]
    );
    assert!(map.tree().verify_integrity().is_empty());
}

#[test]
fn keys_survive_repeated_growth() {
    let mut map = UnorderedMap::new();
    let mut capacities = vec![map.capacity()];
    let mut k = 0i64;
    while capacities.len() < 4 {
        map.add(k, k * k).unwrap();
        if map.capacity() != *capacities.last().unwrap() {
            capacities.push(map.capacity());
        }
        k += 1;
    }
    assert!(capacities.windows(2).all(|w| w[0] < w[1]));
    for i in 0..k {
        assert_eq!(map.get(&i), Some(&(i * i)), "lost {i}");
    }
    assert!(map.table().verify_integrity().is_empty());
}

#[test]
fn insert_after_delete_in_shared_probe_run() {
    // Every key lands in the same home slot.
    let hasher = FnHasher::new(|_: &String| 0u64, |a: &String, b: &String| a == b);
    let mut set = UnorderedSet::with_hasher(hasher);
    for key in ["a", "b", "c"] {
        set.add(key.to_string()).unwrap();
    }

    assert!(set.del(&"a".to_string()));
    assert!(!set.add("d".to_string()).unwrap());

    for key in ["b", "c", "d"] {
        assert!(set.has(&key.to_string()), "lost {key}");
    }
    assert!(!set.has(&"a".to_string()));
    assert_eq!(set.len(), 3);
    assert!(set.table().verify_integrity().is_empty());
}

#[test]
fn configured_table_rejects_bad_load_factor() {
    let config = Config::default().with_load_factor(1.5);
    let err = UnorderedMap::<i64, i64>::with_config(&config).unwrap_err();
    assert_eq!(err.category(), "config");
    assert!(err.to_string().contains("1.5"));
}
