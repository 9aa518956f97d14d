//! Unbalanced binary search tree map.
//!
//! This module provides [`BinarySearchTreeMap`], an ordered map backed by a
//! classic binary search tree that never restructures itself.
//!
//! # Overview
//!
//! Insertion order directly determines the tree's shape: shuffled input
//! produces a bushy tree with roughly logarithmic depth, while strictly
//! ascending or descending input degenerates into a linked list with O(n)
//! depth. The degeneration is intentional: this type is the baseline the
//! height-balanced [`AvlTreeMap`](super::AvlTreeMap) is measured against.
//!
//! - O(depth) search, insert, remove (O(log n) on average, O(n) degenerate)
//! - O(n) ordered iteration
//! - O(1) len and `is_empty`
//!
//! # Examples
//!
//! ```rust
//! use arbors::map::{BinarySearchTreeMap, OrderedMap};
//!
//! let mut map = BinarySearchTreeMap::new();
//! for key in 1..=5 {
//!     map.insert(key, key * key);
//! }
//!
//! // Ascending insertion leaves every left child empty.
//! assert_eq!(map.height(), 5);
//! assert_eq!(map.search(&4), Ok(&16));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::rc::Rc;
use std::time::Instant;

use super::{
    MapEntryIterator, MapError, MapIntoIterator, MapRangeIterator, OperationStats, OrderedMap,
    SharedComparator, StatsCell, natural_order,
};

// =============================================================================
// Node Definition
// =============================================================================

/// Owned link to a subtree; `None` is the empty slot a new node attaches to.
type Link<K, V> = Option<Box<BstNode<K, V>>>;

/// Internal node of the unbalanced tree. Each child link is exclusively
/// owned, so detaching a subtree is a constant-time ownership transfer.
#[derive(Clone)]
struct BstNode<K, V> {
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
}

impl<K, V> BstNode<K, V> {
    const fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
        }
    }
}

// =============================================================================
// BinarySearchTreeMap Definition
// =============================================================================

/// An ordered map backed by an unbalanced binary search tree.
///
/// Keys are ordered by a comparator fixed at construction: the natural
/// [`Ord`] order for [`new`](Self::new), or any total order supplied to
/// [`with_comparator`](Self::with_comparator). No rebalancing ever occurs,
/// so the shape, and therefore the cost of every operation, is decided
/// entirely by insertion order.
///
/// # Time Complexity
///
/// | Operation  | Average    | Degenerate |
/// |------------|------------|------------|
/// | `insert`   | O(log n)   | O(n)       |
/// | `search`   | O(log n)   | O(n)       |
/// | `remove`   | O(log n)   | O(n)       |
/// | `iter`     | O(n)       | O(n)       |
/// | `range`    | O(depth + k) | O(n)     |
/// | `len`      | O(1)       | O(1)       |
///
/// # Examples
///
/// ```rust
/// use arbors::map::{BinarySearchTreeMap, OrderedMap};
///
/// let mut map = BinarySearchTreeMap::new();
/// map.insert("banana", 2);
/// map.insert("apple", 1);
/// map.insert("cherry", 3);
///
/// let keys: Vec<&&str> = map.iter().map(|(key, _)| key).collect();
/// assert_eq!(keys, vec![&"apple", &"banana", &"cherry"]);
/// ```
#[derive(Clone)]
pub struct BinarySearchTreeMap<K, V> {
    /// Root node, `None` when the map is empty.
    root: Link<K, V>,
    /// Total order over keys, fixed at construction.
    comparator: SharedComparator<K>,
    /// Number of distinct keys present.
    length: usize,
    /// Instrumentation frozen at the exit of the last mutating or searching
    /// operation.
    last_stats: StatsCell,
}

impl<K: Ord + 'static, V> BinarySearchTreeMap<K, V> {
    /// Creates an empty map ordered by the key type's natural order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbors::map::{BinarySearchTreeMap, OrderedMap};
    ///
    /// let map: BinarySearchTreeMap<i32, String> = BinarySearchTreeMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: None,
            comparator: natural_order(),
            length: 0,
            last_stats: StatsCell::default(),
        }
    }
}

impl<K, V> BinarySearchTreeMap<K, V> {
    /// Creates an empty map ordered by the supplied comparator.
    ///
    /// The comparator must be a total order over `K`; it is fixed for the
    /// lifetime of the map and shared with clones.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbors::map::{BinarySearchTreeMap, OrderedMap};
    ///
    /// let mut map = BinarySearchTreeMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// map.insert(1, "one");
    /// map.insert(3, "three");
    /// map.insert(2, "two");
    ///
    /// // Reversed comparator, reversed iteration order.
    /// let keys: Vec<&i32> = map.iter().map(|(key, _)| key).collect();
    /// assert_eq!(keys, vec![&3, &2, &1]);
    /// ```
    #[must_use]
    pub fn with_comparator<F>(comparator: F) -> Self
    where
        K: 'static,
        F: Fn(&K, &K) -> Ordering + 'static,
    {
        Self {
            root: None,
            comparator: Rc::new(comparator),
            length: 0,
            last_stats: StatsCell::default(),
        }
    }

    /// Returns `true` if the map contains `key`.
    ///
    /// Unlike [`search`](OrderedMap::search) this probe does not touch the
    /// instrumentation state.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        let mut scratch = 0;
        Self::search_node(
            self.root.as_deref(),
            key,
            self.comparator.as_ref(),
            &mut scratch,
        )
        .is_some()
    }

    /// Returns the entry with the smallest key, or `None` when empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbors::map::{BinarySearchTreeMap, OrderedMap};
    ///
    /// let mut map = BinarySearchTreeMap::new();
    /// map.insert(3, "three");
    /// map.insert(1, "one");
    /// assert_eq!(map.min(), Some((&1, &"one")));
    /// ```
    #[must_use]
    pub fn min(&self) -> Option<(&K, &V)> {
        let mut current = self.root.as_deref()?;
        while let Some(left) = current.left.as_deref() {
            current = left;
        }
        Some((&current.key, &current.value))
    }

    /// Returns the entry with the largest key, or `None` when empty.
    #[must_use]
    pub fn max(&self) -> Option<(&K, &V)> {
        let mut current = self.root.as_deref()?;
        while let Some(right) = current.right.as_deref() {
            current = right;
        }
        Some((&current.key, &current.value))
    }
}

impl<K: Ord + 'static, V: Clone> BinarySearchTreeMap<K, V> {
    /// Builds a new map by re-keying every entry of an existing map through
    /// a key-extraction function.
    ///
    /// The source is walked in ascending order and each value is inserted
    /// under its derived key, so construction order matches the source's
    /// sorted order and the result is deterministic. When two source
    /// entries derive the same key the later one wins, matching
    /// [`insert`](OrderedMap::insert)'s overwrite semantics.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbors::map::{AvlTreeMap, BinarySearchTreeMap, OrderedMap};
    ///
    /// let mut by_name = AvlTreeMap::new();
    /// by_name.insert("one".to_string(), 1_u32);
    /// by_name.insert("two".to_string(), 2_u32);
    ///
    /// let by_id = BinarySearchTreeMap::rekeyed_from(&by_name, |value| *value);
    /// assert_eq!(by_id.search(&2), Ok(&2));
    /// ```
    pub fn rekeyed_from<J, M, F>(source: &M, mut key_extractor: F) -> Self
    where
        M: OrderedMap<J, V>,
        F: FnMut(&V) -> K,
    {
        let mut map = Self::new();
        for (_, value) in source.iter() {
            map.insert(key_extractor(value), value.clone());
        }
        map
    }
}

// =============================================================================
// Internal Tree Operations
// =============================================================================

impl<K, V> BinarySearchTreeMap<K, V> {
    /// Recursive helper for insert. Returns the (re-attached) subtree and
    /// whether a new node was created.
    fn insert_into_node(
        node: Link<K, V>,
        key: K,
        value: V,
        comparator: &dyn Fn(&K, &K) -> Ordering,
        comparisons: &mut u64,
    ) -> (Box<BstNode<K, V>>, bool) {
        match node {
            None => (Box::new(BstNode::new(key, value)), true),
            Some(mut node_ref) => {
                *comparisons += 1;
                match comparator(&key, &node_ref.key) {
                    Ordering::Less => {
                        let (child, added) = Self::insert_into_node(
                            node_ref.left.take(),
                            key,
                            value,
                            comparator,
                            comparisons,
                        );
                        node_ref.left = Some(child);
                        (node_ref, added)
                    }
                    Ordering::Greater => {
                        let (child, added) = Self::insert_into_node(
                            node_ref.right.take(),
                            key,
                            value,
                            comparator,
                            comparisons,
                        );
                        node_ref.right = Some(child);
                        (node_ref, added)
                    }
                    Ordering::Equal => {
                        node_ref.value = value;
                        (node_ref, false)
                    }
                }
            }
        }
    }

    /// Recursive helper for search.
    fn search_node<'a>(
        node: Option<&'a BstNode<K, V>>,
        key: &K,
        comparator: &dyn Fn(&K, &K) -> Ordering,
        comparisons: &mut u64,
    ) -> Option<&'a V> {
        let node_ref = node?;
        *comparisons += 1;
        match comparator(key, &node_ref.key) {
            Ordering::Less => Self::search_node(node_ref.left.as_deref(), key, comparator, comparisons),
            Ordering::Greater => {
                Self::search_node(node_ref.right.as_deref(), key, comparator, comparisons)
            }
            Ordering::Equal => Some(&node_ref.value),
        }
    }

    /// Recursive helper for remove. Returns the re-attached subtree and the
    /// removed value, `None` when the key was absent.
    fn remove_from_node(
        node: Link<K, V>,
        key: &K,
        comparator: &dyn Fn(&K, &K) -> Ordering,
        comparisons: &mut u64,
    ) -> (Link<K, V>, Option<V>) {
        match node {
            None => (None, None),
            Some(mut node_ref) => {
                *comparisons += 1;
                match comparator(key, &node_ref.key) {
                    Ordering::Less => {
                        let (child, removed) = Self::remove_from_node(
                            node_ref.left.take(),
                            key,
                            comparator,
                            comparisons,
                        );
                        node_ref.left = child;
                        (Some(node_ref), removed)
                    }
                    Ordering::Greater => {
                        let (child, removed) = Self::remove_from_node(
                            node_ref.right.take(),
                            key,
                            comparator,
                            comparisons,
                        );
                        node_ref.right = child;
                        (Some(node_ref), removed)
                    }
                    Ordering::Equal => Self::detach_node(*node_ref),
                }
            }
        }
    }

    /// Detaches a located node by the three structural cases: leaf,
    /// one child, or two children with in-order-successor splicing.
    fn detach_node(node: BstNode<K, V>) -> (Link<K, V>, Option<V>) {
        let BstNode {
            value, left, right, ..
        } = node;
        match (left, right) {
            (None, None) => (None, Some(value)),
            (Some(child), None) | (None, Some(child)) => (Some(child), Some(value)),
            (Some(left_child), Some(right_child)) => {
                // The successor (leftmost of the right subtree) has no left
                // child, so extracting it never recurses into this case.
                let (right_rest, successor_key, successor_value) = Self::take_min(right_child);
                let mut replacement = Box::new(BstNode::new(successor_key, successor_value));
                replacement.left = Some(left_child);
                replacement.right = right_rest;
                (Some(replacement), Some(value))
            }
        }
    }

    /// Extracts the minimum entry of a subtree, returning the remaining
    /// subtree and the detached key and value.
    fn take_min(mut node: Box<BstNode<K, V>>) -> (Link<K, V>, K, V) {
        match node.left.take() {
            None => {
                let BstNode {
                    key, value, right, ..
                } = *node;
                (right, key, value)
            }
            Some(left_child) => {
                let (rest, key, value) = Self::take_min(left_child);
                node.left = rest;
                (Some(node), key, value)
            }
        }
    }

    /// Collects all entries in ascending order (in-order traversal).
    fn collect_entries_in_order<'a>(
        node: Option<&'a BstNode<K, V>>,
        entries: &mut Vec<(&'a K, &'a V)>,
    ) {
        if let Some(node_ref) = node {
            Self::collect_entries_in_order(node_ref.left.as_deref(), entries);
            entries.push((&node_ref.key, &node_ref.value));
            Self::collect_entries_in_order(node_ref.right.as_deref(), entries);
        }
    }

    /// Collects entries within the inclusive bound pair, pruning subtrees
    /// that cannot contain qualifying keys.
    fn collect_range<'a>(
        node: Option<&'a BstNode<K, V>>,
        low: &K,
        high: &K,
        comparator: &dyn Fn(&K, &K) -> Ordering,
        entries: &mut Vec<(&'a K, &'a V)>,
    ) {
        let Some(node_ref) = node else {
            return;
        };
        let above_low = comparator(&node_ref.key, low) != Ordering::Less;
        let below_high = comparator(&node_ref.key, high) != Ordering::Greater;

        if above_low {
            Self::collect_range(node_ref.left.as_deref(), low, high, comparator, entries);
        }
        if above_low && below_high {
            entries.push((&node_ref.key, &node_ref.value));
        }
        if below_high {
            Self::collect_range(node_ref.right.as_deref(), low, high, comparator, entries);
        }
    }

    /// Consumes a subtree, pushing its entries in ascending order.
    fn push_entries_in_order(node: Link<K, V>, entries: &mut Vec<(K, V)>) {
        if let Some(node_ref) = node {
            let BstNode {
                key,
                value,
                left,
                right,
            } = *node_ref;
            Self::push_entries_in_order(left, entries);
            entries.push((key, value));
            Self::push_entries_in_order(right, entries);
        }
    }

    /// Recomputed height of a subtree; the unbalanced variant caches
    /// nothing.
    fn node_height(node: Option<&BstNode<K, V>>) -> usize {
        node.map_or(0, |node_ref| {
            1 + Self::node_height(node_ref.left.as_deref())
                .max(Self::node_height(node_ref.right.as_deref()))
        })
    }
}

// =============================================================================
// OrderedMap Implementation
// =============================================================================

impl<K, V> OrderedMap<K, V> for BinarySearchTreeMap<K, V> {
    fn insert(&mut self, key: K, value: V) -> usize {
        let started = Instant::now();
        let mut comparisons = 0;

        let root = self.root.take();
        let (new_root, added) =
            Self::insert_into_node(root, key, value, self.comparator.as_ref(), &mut comparisons);
        self.root = Some(new_root);
        if added {
            self.length += 1;
        }

        self.last_stats.set(OperationStats {
            comparisons,
            elapsed: started.elapsed(),
        });
        self.length
    }

    fn search(&self, key: &K) -> Result<&V, MapError> {
        let started = Instant::now();
        let mut comparisons = 0;

        let result = Self::search_node(
            self.root.as_deref(),
            key,
            self.comparator.as_ref(),
            &mut comparisons,
        );

        self.last_stats.set(OperationStats {
            comparisons,
            elapsed: started.elapsed(),
        });
        result.ok_or(MapError::KeyNotFound)
    }

    fn remove(&mut self, key: &K) -> Result<V, MapError> {
        let started = Instant::now();
        let mut comparisons = 0;

        let root = self.root.take();
        let (new_root, removed) =
            Self::remove_from_node(root, key, self.comparator.as_ref(), &mut comparisons);
        self.root = new_root;
        if removed.is_some() {
            self.length -= 1;
        }

        self.last_stats.set(OperationStats {
            comparisons,
            elapsed: started.elapsed(),
        });
        removed.ok_or(MapError::KeyNotFound)
    }

    fn len(&self) -> usize {
        self.length
    }

    fn height(&self) -> usize {
        Self::node_height(self.root.as_deref())
    }

    fn iter(&self) -> MapEntryIterator<'_, K, V> {
        let mut entries = Vec::with_capacity(self.length);
        Self::collect_entries_in_order(self.root.as_deref(), &mut entries);
        MapEntryIterator::new(entries)
    }

    fn range(&self, low: &K, high: &K) -> MapRangeIterator<'_, K, V> {
        let comparator = self.comparator.as_ref();
        let mut entries = Vec::new();
        if comparator(low, high) != Ordering::Greater {
            Self::collect_range(self.root.as_deref(), low, high, comparator, &mut entries);
        }
        MapRangeIterator::new(entries)
    }

    fn last_stats(&self) -> OperationStats {
        self.last_stats.get()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K: Ord + 'static, V> Default for BinarySearchTreeMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + 'static, V> FromIterator<(K, V)> for BinarySearchTreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<K, V> IntoIterator for BinarySearchTreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = MapIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let mut entries = Vec::with_capacity(self.length);
        Self::push_entries_in_order(self.root, &mut entries);
        MapIntoIterator::new(entries)
    }
}

impl<'a, K, V> IntoIterator for &'a BinarySearchTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = MapEntryIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for BinarySearchTreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for BinarySearchTreeMap<K, V> {}

/// The hash covers the length and then every entry in ascending order, so
/// equal maps hash equally regardless of insertion order.
impl<K: Hash, V: Hash> Hash for BinarySearchTreeMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for BinarySearchTreeMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for BinarySearchTreeMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for BinarySearchTreeMap<K, V>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.length))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct BinarySearchTreeMapVisitor<K, V> {
    key_marker: std::marker::PhantomData<K>,
    value_marker: std::marker::PhantomData<V>,
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for BinarySearchTreeMapVisitor<K, V>
where
    K: serde::Deserialize<'de> + Ord + 'static,
    V: serde::Deserialize<'de>,
{
    type Value = BinarySearchTreeMap<K, V>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = BinarySearchTreeMap::new();
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for BinarySearchTreeMap<K, V>
where
    K: serde::Deserialize<'de> + Ord + 'static,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(BinarySearchTreeMapVisitor {
            key_marker: std::marker::PhantomData,
            value_marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn map_of(keys: &[i32]) -> BinarySearchTreeMap<i32, i32> {
        let mut map = BinarySearchTreeMap::new();
        for &key in keys {
            map.insert(key, key * 10);
        }
        map
    }

    // =========================================================================
    // Insert and Search
    // =========================================================================

    #[rstest]
    fn test_new_creates_empty() {
        let map: BinarySearchTreeMap<i32, String> = BinarySearchTreeMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.height(), 0);
    }

    #[rstest]
    fn test_insert_returns_new_length() {
        let mut map = BinarySearchTreeMap::new();
        assert_eq!(map.insert(2, "two"), 1);
        assert_eq!(map.insert(1, "one"), 2);
        assert_eq!(map.insert(3, "three"), 3);
    }

    #[rstest]
    fn test_insert_and_search() {
        let map = map_of(&[4, 2, 6, 1, 3]);
        assert_eq!(map.search(&1), Ok(&10));
        assert_eq!(map.search(&4), Ok(&40));
        assert_eq!(map.search(&6), Ok(&60));
    }

    #[rstest]
    fn test_search_absent_key_fails() {
        let map = map_of(&[4, 2, 6]);
        assert_eq!(map.search(&5), Err(MapError::KeyNotFound));
    }

    #[rstest]
    fn test_search_empty_map_fails() {
        let map: BinarySearchTreeMap<i32, i32> = BinarySearchTreeMap::new();
        assert_eq!(map.search(&1), Err(MapError::KeyNotFound));
    }

    #[rstest]
    fn test_insert_overwrite_keeps_length() {
        let mut map = BinarySearchTreeMap::new();
        map.insert(1, "one");
        let length = map.insert(1, "ONE");

        assert_eq!(length, 1);
        assert_eq!(map.len(), 1);
        assert_eq!(map.search(&1), Ok(&"ONE"));
    }

    #[rstest]
    fn test_contains_key() {
        let map = map_of(&[4, 2, 6]);
        assert!(map.contains_key(&2));
        assert!(!map.contains_key(&5));
    }

    // =========================================================================
    // Shape
    // =========================================================================

    #[rstest]
    fn test_ascending_insertion_degenerates() {
        let map = map_of(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(map.height(), 10);
    }

    #[rstest]
    fn test_descending_insertion_degenerates() {
        let map = map_of(&[10, 9, 8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(map.height(), 10);
    }

    #[rstest]
    fn test_balanced_insertion_order_stays_shallow() {
        let map = map_of(&[4, 2, 6, 1, 3, 5, 7]);
        assert_eq!(map.height(), 3);
    }

    // =========================================================================
    // Ordered Iteration
    // =========================================================================

    #[rstest]
    fn test_iter_is_sorted() {
        let map = map_of(&[5, 1, 4, 2, 3]);
        let keys: Vec<i32> = map.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec![1, 2, 3, 4, 5]);
    }

    #[rstest]
    fn test_iter_is_restartable() {
        let map = map_of(&[2, 1, 3]);
        assert_eq!(map.iter().count(), 3);
        assert_eq!(map.iter().count(), 3);
    }

    #[rstest]
    fn test_reverse_comparator_reverses_order() {
        let mut map = BinarySearchTreeMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
        for key in [1, 3, 2] {
            map.insert(key, ());
        }
        let keys: Vec<i32> = map.iter().map(|(key, ())| *key).collect();
        assert_eq!(keys, vec![3, 2, 1]);
    }

    #[rstest]
    fn test_into_iter_owned() {
        let map = map_of(&[2, 1, 3]);
        let entries: Vec<(i32, i32)> = map.into_iter().collect();
        assert_eq!(entries, vec![(1, 10), (2, 20), (3, 30)]);
    }

    // =========================================================================
    // Removal
    // =========================================================================

    #[rstest]
    fn test_remove_leaf() {
        let mut map = map_of(&[4, 2, 6]);
        assert_eq!(map.remove(&2), Ok(20));
        assert_eq!(map.len(), 2);
        assert_eq!(map.search(&2), Err(MapError::KeyNotFound));
    }

    #[rstest]
    fn test_remove_node_with_one_child() {
        let mut map = map_of(&[4, 2, 1]);
        assert_eq!(map.remove(&2), Ok(20));
        let keys: Vec<i32> = map.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec![1, 4]);
    }

    #[rstest]
    fn test_remove_node_with_two_children_splices_successor() {
        let mut map = map_of(&[4, 2, 6, 5, 7]);
        assert_eq!(map.remove(&4), Ok(40));
        let keys: Vec<i32> = map.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec![2, 5, 6, 7]);
        assert_eq!(map.search(&5), Ok(&50));
    }

    #[rstest]
    fn test_remove_root_until_empty() {
        let mut map = map_of(&[2, 1, 3]);
        assert_eq!(map.remove(&2), Ok(20));
        assert_eq!(map.remove(&1), Ok(10));
        assert_eq!(map.remove(&3), Ok(30));
        assert!(map.is_empty());
        assert_eq!(map.height(), 0);
    }

    #[rstest]
    fn test_remove_absent_key_fails_and_preserves_map() {
        let mut map = map_of(&[2, 1, 3]);
        assert_eq!(map.remove(&9), Err(MapError::KeyNotFound));
        assert_eq!(map.len(), 3);
        let keys: Vec<i32> = map.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec![1, 2, 3]);
    }

    #[rstest]
    fn test_removed_key_stays_absent_after_reinserting_others() {
        let mut map = map_of(&[5, 3, 8]);
        map.remove(&3).unwrap();
        map.insert(4, 40);
        assert_eq!(map.search(&3), Err(MapError::KeyNotFound));
    }

    // =========================================================================
    // Range Extraction
    // =========================================================================

    #[rstest]
    #[case(3, 7, vec![3, 5, 7])]
    #[case(4, 6, vec![5])]
    #[case(10, 20, vec![])]
    #[case(1, 9, vec![1, 3, 5, 7, 9])]
    #[case(0, 1, vec![1])]
    fn test_range_inclusive_bounds(
        #[case] low: i32,
        #[case] high: i32,
        #[case] expected: Vec<i32>,
    ) {
        let map = map_of(&[1, 3, 5, 7, 9]);
        let keys: Vec<i32> = map.range(&low, &high).map(|(key, _)| *key).collect();
        assert_eq!(keys, expected);
    }

    #[rstest]
    fn test_range_inverted_bounds_is_empty() {
        let map = map_of(&[1, 3, 5, 7, 9]);
        assert_eq!(map.range(&7, &3).count(), 0);
    }

    #[rstest]
    fn test_range_on_empty_map_is_empty() {
        let map: BinarySearchTreeMap<i32, i32> = BinarySearchTreeMap::new();
        assert_eq!(map.range(&1, &9).count(), 0);
    }

    // =========================================================================
    // Instrumentation
    // =========================================================================

    #[rstest]
    fn test_stats_are_zero_before_any_operation() {
        let map: BinarySearchTreeMap<i32, i32> = BinarySearchTreeMap::new();
        assert_eq!(map.last_stats(), OperationStats::default());
    }

    #[rstest]
    fn test_search_comparisons_equal_node_depth() {
        // Shape: 4 at the root, 2 and 6 below it, 1 below 2.
        let map = map_of(&[4, 2, 6, 1]);

        map.search(&4).unwrap();
        assert_eq!(map.last_comparisons(), 1);

        map.search(&2).unwrap();
        assert_eq!(map.last_comparisons(), 2);

        map.search(&1).unwrap();
        assert_eq!(map.last_comparisons(), 3);
    }

    #[rstest]
    fn test_failed_search_counts_visited_nodes() {
        let map = map_of(&[4, 2, 6, 1]);
        // 5 descends 4 -> 6 and hits the empty slot below 6.
        assert_eq!(map.search(&5), Err(MapError::KeyNotFound));
        assert_eq!(map.last_comparisons(), 2);
    }

    #[rstest]
    fn test_each_operation_resets_the_counter() {
        let mut map = map_of(&[1, 2, 3, 4, 5]);
        map.search(&5).unwrap();
        assert_eq!(map.last_comparisons(), 5);

        map.insert(0, 0);
        assert_eq!(map.last_comparisons(), 1);

        map.search(&2).unwrap();
        assert_eq!(map.last_comparisons(), 2);
    }

    // =========================================================================
    // Re-keying Constructor
    // =========================================================================

    #[rstest]
    fn test_rekeyed_from_preserves_source_order() {
        let mut by_name: BinarySearchTreeMap<String, u32> = BinarySearchTreeMap::new();
        by_name.insert("cherry".to_string(), 3);
        by_name.insert("apple".to_string(), 1);
        by_name.insert("banana".to_string(), 2);

        let by_id = BinarySearchTreeMap::rekeyed_from(&by_name, |value| *value);
        let keys: Vec<u32> = by_id.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec![1, 2, 3]);
    }

    #[rstest]
    fn test_rekeyed_from_duplicate_keys_last_wins() {
        let mut source: BinarySearchTreeMap<i32, String> = BinarySearchTreeMap::new();
        source.insert(1, "one".to_string());
        source.insert(2, "uno".to_string());

        // Both values derive the key 3 ("one" and "uno" are three bytes);
        // the entry walked later in ascending source order wins.
        let derived = BinarySearchTreeMap::rekeyed_from(&source, |value| value.len());
        assert_eq!(derived.len(), 1);
        assert_eq!(derived.search(&3), Ok(&"uno".to_string()));
    }

    // =========================================================================
    // Standard Traits
    // =========================================================================

    #[rstest]
    fn test_eq_ignores_insertion_order() {
        let first = map_of(&[1, 2, 3]);
        let second = map_of(&[3, 1, 2]);
        assert_eq!(first, second);
    }

    #[rstest]
    fn test_display_formats_sorted_entries() {
        let mut map = BinarySearchTreeMap::new();
        map.insert(2, "two");
        map.insert(1, "one");
        assert_eq!(format!("{map}"), "{1: one, 2: two}");
    }

    #[rstest]
    fn test_from_iter_collects() {
        let map: BinarySearchTreeMap<i32, i32> =
            vec![(3, 30), (1, 10), (2, 20)].into_iter().collect();
        assert_eq!(map.len(), 3);
        assert_eq!(map.search(&2), Ok(&20));
    }

    #[rstest]
    fn test_min_and_max() {
        let map = map_of(&[4, 2, 6, 1, 7]);
        assert_eq!(map.min(), Some((&1, &10)));
        assert_eq!(map.max(), Some((&7, &70)));
    }

    #[rstest]
    fn test_clone_is_independent() {
        let mut original = map_of(&[1, 2, 3]);
        let cloned = original.clone();
        original.remove(&2).unwrap();

        assert_eq!(original.len(), 2);
        assert_eq!(cloned.len(), 3);
        assert_eq!(cloned.search(&2), Ok(&20));
    }
}
