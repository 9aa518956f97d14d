//! Property-based tests for `BinarySearchTreeMap`.
//!
//! These tests verify that the unbalanced tree satisfies the ordered-map
//! laws for arbitrary input sequences, and that it degenerates on sorted
//! input exactly as designed.

use arbors::map::{BinarySearchTreeMap, MapError, OrderedMap};
use proptest::prelude::*;
use std::collections::BTreeSet;

// =============================================================================
// Strategies for Generating Test Data
// =============================================================================

/// Strategy for generating a `BinarySearchTreeMap` from a vector of
/// key-value pairs.
fn arbitrary_map(max_size: usize) -> impl Strategy<Value = BinarySearchTreeMap<i32, i32>> {
    prop::collection::vec((any::<i32>(), any::<i32>()), 0..max_size)
        .prop_map(|entries| entries.into_iter().collect())
}

// =============================================================================
// Ordering Laws
// =============================================================================

proptest! {
    /// Law: iteration yields keys in strictly ascending order.
    #[test]
    fn prop_iteration_is_strictly_ascending(map in arbitrary_map(40)) {
        let keys: Vec<i32> = map.iter().map(|(key, _)| *key).collect();
        prop_assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
    }

    /// Law: the map holds one entry per distinct inserted key.
    #[test]
    fn prop_len_counts_distinct_keys(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..40)
    ) {
        let distinct: BTreeSet<i32> = entries.iter().map(|(key, _)| *key).collect();
        let map: BinarySearchTreeMap<i32, i32> = entries.into_iter().collect();
        prop_assert_eq!(map.len(), distinct.len());
    }
}

// =============================================================================
// Search-Insert Laws
// =============================================================================

proptest! {
    /// Law: search after insert returns the inserted value.
    #[test]
    fn prop_search_after_insert_law(
        map in arbitrary_map(20),
        key: i32,
        value: i32
    ) {
        let mut map = map;
        map.insert(key, value);
        prop_assert_eq!(map.search(&key), Ok(&value));
    }

    /// Law: insert does not affect other keys.
    #[test]
    fn prop_insert_preserves_other_keys(
        map in arbitrary_map(20),
        key1: i32,
        key2: i32,
        value: i32
    ) {
        prop_assume!(key1 != key2);
        let mut map = map;
        let before = map.search(&key2).copied();
        map.insert(key1, value);
        prop_assert_eq!(map.search(&key2).copied(), before);
    }

    /// Law: re-inserting a key overwrites the value without growing the
    /// map.
    #[test]
    fn prop_reinsert_overwrites_in_place(
        map in arbitrary_map(20),
        key: i32,
        first: i32,
        second: i32
    ) {
        let mut map = map;
        map.insert(key, first);
        let length = map.len();
        map.insert(key, second);
        prop_assert_eq!(map.len(), length);
        prop_assert_eq!(map.search(&key), Ok(&second));
    }
}

// =============================================================================
// Remove Laws
// =============================================================================

proptest! {
    /// Law: a removed key is reported absent afterwards.
    #[test]
    fn prop_search_after_remove_fails(
        map in arbitrary_map(20),
        key: i32,
        value: i32
    ) {
        let mut map = map;
        map.insert(key, value);
        prop_assert_eq!(map.remove(&key), Ok(value));
        prop_assert_eq!(map.search(&key), Err(MapError::KeyNotFound));
    }

    /// Law: remove does not affect other keys.
    #[test]
    fn prop_remove_preserves_other_keys(
        map in arbitrary_map(20),
        key1: i32,
        key2: i32
    ) {
        prop_assume!(key1 != key2);
        let mut map = map;
        let before = map.search(&key2).copied();
        let _ = map.remove(&key1);
        prop_assert_eq!(map.search(&key2).copied(), before);
    }
}

// =============================================================================
// Range Laws
// =============================================================================

proptest! {
    /// Law: range equals ordered iteration filtered to the inclusive
    /// bounds, including the empty result for inverted bounds.
    #[test]
    fn prop_range_equals_filtered_iteration(
        map in arbitrary_map(40),
        low: i32,
        high: i32
    ) {
        let expected: Vec<(i32, i32)> = map
            .iter()
            .filter(|(key, _)| low <= **key && **key <= high)
            .map(|(key, value)| (*key, *value))
            .collect();
        let actual: Vec<(i32, i32)> = map
            .range(&low, &high)
            .map(|(key, value)| (*key, *value))
            .collect();
        prop_assert_eq!(actual, expected);
    }
}

// =============================================================================
// Degenerate Shape Laws
// =============================================================================

proptest! {
    /// Law: strictly ascending insertion produces a linked-list shape
    /// whose height equals the number of entries.
    #[test]
    fn prop_sorted_insertion_degenerates(count in 1usize..40) {
        let mut map = BinarySearchTreeMap::new();
        for key in 0..count {
            map.insert(key, key);
        }
        prop_assert_eq!(map.height(), count);
    }

    /// Law: strictly descending insertion degenerates the same way.
    #[test]
    fn prop_reverse_sorted_insertion_degenerates(count in 1usize..40) {
        let mut map = BinarySearchTreeMap::new();
        for key in (0..count).rev() {
            map.insert(key, key);
        }
        prop_assert_eq!(map.height(), count);
    }
}
