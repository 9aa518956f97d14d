//! Height-balanced (AVL) tree map.
//!
//! This module provides [`AvlTreeMap`], an ordered map backed by an AVL
//! tree: a binary search tree that repairs itself with local rotations
//! after every structural mutation.
//!
//! # Overview
//!
//! `AvlTreeMap` exposes exactly the same contract as
//! [`BinarySearchTreeMap`](super::BinarySearchTreeMap) but maintains the
//! balance invariant `|height(left) - height(right)| <= 1` at every node,
//! which bounds the tree height, and therefore every descent, to
//! O(log n) regardless of insertion order.
//!
//! - O(log n) search, insert, remove
//! - O(n) ordered iteration
//! - O(1) len, `is_empty`, and `height`
//!
//! # Internal Structure
//!
//! Every node caches the height of its subtree (a leaf has height 1).
//! After an insertion or removal the heights along the mutated path are
//! recomputed bottom-up; a node whose balance factor reaches ±2 is
//! repaired with a single or double rotation before the walk continues
//! upward. Rotations relink owned subtrees in constant time and never
//! change the in-order key sequence.
//!
//! # Examples
//!
//! ```rust
//! use arbors::map::{AvlTreeMap, OrderedMap};
//!
//! let mut map = AvlTreeMap::new();
//! for key in 1..=100 {
//!     map.insert(key, ());
//! }
//!
//! // Sorted insertion, logarithmic height anyway.
//! assert!(map.height() <= 9);
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
type Link<K, V> = Option<Box<AvlNode<K, V>>>;

/// Internal node of the AVL tree. Each child link is exclusively owned, so
/// rotations transfer subtrees in constant time.
#[derive(Clone)]
struct AvlNode<K, V> {
    key: K,
    value: V,
    /// Cached height of the subtree rooted here; a leaf caches 1.
    height: usize,
    left: Link<K, V>,
    right: Link<K, V>,
}

/// Height of an optional subtree, 0 for the empty slot.
fn height_of<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |node_ref| node_ref.height)
}

impl<K, V> AvlNode<K, V> {
    const fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        }
    }

    /// Recomputes the cached height from the children's cached heights.
    fn update_height(&mut self) {
        self.height = 1 + height_of(&self.left).max(height_of(&self.right));
    }

    /// Left height minus right height; the balance invariant keeps this in
    /// {-1, 0, 1}, and the rebalance pass repairs ±2.
    #[allow(clippy::cast_possible_wrap)]
    fn balance_factor(&self) -> isize {
        height_of(&self.left) as isize - height_of(&self.right) as isize
    }
}

// =============================================================================
// AvlTreeMap Definition
// =============================================================================

/// An ordered map backed by a height-balanced AVL tree.
///
/// Keys are ordered by a comparator fixed at construction: the natural
/// [`Ord`] order for [`new`](Self::new), or any total order supplied to
/// [`with_comparator`](Self::with_comparator). Every insertion and removal
/// that changes the tree's shape is followed by a bottom-up rebalance pass
/// along the mutated path, so the height, and with it the cost of every
/// descent, stays O(log n) for any input order.
///
/// # Time Complexity
///
/// | Operation  | Complexity   |
/// |------------|--------------|
/// | `insert`   | O(log n)     |
/// | `search`   | O(log n)     |
/// | `remove`   | O(log n)     |
/// | `iter`     | O(n)         |
/// | `range`    | O(log n + k) |
/// | `len`      | O(1)         |
/// | `height`   | O(1)         |
///
/// # Examples
///
/// ```rust
/// use arbors::map::{AvlTreeMap, OrderedMap};
///
/// let mut map = AvlTreeMap::new();
/// map.insert("banana", 2);
/// map.insert("apple", 1);
/// map.insert("cherry", 3);
///
/// let keys: Vec<&&str> = map.iter().map(|(key, _)| key).collect();
/// assert_eq!(keys, vec![&"apple", &"banana", &"cherry"]);
/// ```
#[derive(Clone)]
pub struct AvlTreeMap<K, V> {
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

impl<K: Ord + 'static, V> AvlTreeMap<K, V> {
    /// Creates an empty map ordered by the key type's natural order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbors::map::{AvlTreeMap, OrderedMap};
    ///
    /// let map: AvlTreeMap<i32, String> = AvlTreeMap::new();
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

impl<K, V> AvlTreeMap<K, V> {
    /// Creates an empty map ordered by the supplied comparator.
    ///
    /// The comparator must be a total order over `K`; it is fixed for the
    /// lifetime of the map and shared with clones.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbors::map::{AvlTreeMap, OrderedMap};
    ///
    /// let mut map = AvlTreeMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// map.insert(1, "one");
    /// map.insert(3, "three");
    /// map.insert(2, "two");
    ///
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
    /// use arbors::map::{AvlTreeMap, OrderedMap};
    ///
    /// let mut map = AvlTreeMap::new();
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

    /// Returns `true` if every node satisfies the balance invariant and
    /// caches a consistent height.
    ///
    /// The invariant is enforced by construction; this probe exists so
    /// tests can assert it after arbitrary operation sequences. A `false`
    /// return indicates an implementation defect, not a runtime condition
    /// to handle.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        Self::verify_node(self.root.as_deref()).is_some()
    }

    /// Recursive invariant check; returns the verified height of the
    /// subtree, or `None` on the first violation.
    fn verify_node(node: Option<&AvlNode<K, V>>) -> Option<usize> {
        match node {
            None => Some(0),
            Some(node_ref) => {
                let left_height = Self::verify_node(node_ref.left.as_deref())?;
                let right_height = Self::verify_node(node_ref.right.as_deref())?;
                let computed = 1 + left_height.max(right_height);
                (left_height.abs_diff(right_height) <= 1 && node_ref.height == computed)
                    .then_some(computed)
            }
        }
    }
}

impl<K: Ord + 'static, V: Clone> AvlTreeMap<K, V> {
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
    /// let mut by_name = BinarySearchTreeMap::new();
    /// by_name.insert("one".to_string(), 1_u32);
    /// by_name.insert("two".to_string(), 2_u32);
    ///
    /// let by_id = AvlTreeMap::rekeyed_from(&by_name, |value| *value);
    /// assert_eq!(by_id.search(&1), Ok(&1));
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
// Rotations and Rebalancing
// =============================================================================

impl<K, V> AvlTreeMap<K, V> {
    /// Right rotation: the left child becomes the subtree root, the old
    /// root becomes its right child, and the pivot's original right child
    /// becomes the old root's new left child. Heights are recomputed for
    /// the demoted node first, then the promoted one.
    fn rotate_right(mut node: Box<AvlNode<K, V>>) -> Box<AvlNode<K, V>> {
        match node.left.take() {
            Some(mut pivot) => {
                node.left = pivot.right.take();
                node.update_height();
                pivot.right = Some(node);
                pivot.update_height();
                pivot
            }
            // A rotation is only requested for a left-heavy node, which
            // always has a left child; an empty pivot slot means there is
            // nothing to rotate.
            None => node,
        }
    }

    /// Left rotation, the mirror of [`rotate_right`](Self::rotate_right).
    fn rotate_left(mut node: Box<AvlNode<K, V>>) -> Box<AvlNode<K, V>> {
        match node.right.take() {
            Some(mut pivot) => {
                node.right = pivot.left.take();
                node.update_height();
                pivot.left = Some(node);
                pivot.update_height();
                pivot
            }
            None => node,
        }
    }

    /// Recomputes this node's height and repairs a ±2 balance factor with
    /// the appropriate single or double rotation.
    fn rebalance(mut node: Box<AvlNode<K, V>>) -> Box<AvlNode<K, V>> {
        node.update_height();
        match node.balance_factor() {
            2.. => {
                // Left-heavy. A left child leaning right first needs a left
                // rotation of the child (left-right case).
                let left_factor = node.left.as_deref().map_or(0, AvlNode::balance_factor);
                if left_factor < 0 {
                    if let Some(left_child) = node.left.take() {
                        node.left = Some(Self::rotate_left(left_child));
                    }
                }
                Self::rotate_right(node)
            }
            ..=-2 => {
                // Right-heavy, mirrored (right-left case when the right
                // child leans left).
                let right_factor = node.right.as_deref().map_or(0, AvlNode::balance_factor);
                if right_factor > 0 {
                    if let Some(right_child) = node.right.take() {
                        node.right = Some(Self::rotate_right(right_child));
                    }
                }
                Self::rotate_left(node)
            }
            _ => node,
        }
    }
}

// =============================================================================
// Internal Tree Operations
// =============================================================================

impl<K, V> AvlTreeMap<K, V> {
    /// Recursive helper for insert. Returns the rebalanced subtree and
    /// whether a new node was created.
    fn insert_into_node(
        node: Link<K, V>,
        key: K,
        value: V,
        comparator: &dyn Fn(&K, &K) -> Ordering,
        comparisons: &mut u64,
    ) -> (Box<AvlNode<K, V>>, bool) {
        match node {
            None => (Box::new(AvlNode::new(key, value)), true),
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
                        let node_ref = if added {
                            Self::rebalance(node_ref)
                        } else {
                            node_ref
                        };
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
                        let node_ref = if added {
                            Self::rebalance(node_ref)
                        } else {
                            node_ref
                        };
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
        node: Option<&'a AvlNode<K, V>>,
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

    /// Recursive helper for remove. Returns the rebalanced subtree and the
    /// removed value, `None` when the key was absent. Removal can shorten
    /// a subtree, so every ancestor on the unwind path is height-checked.
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
                        let node_ref = if removed.is_some() {
                            Self::rebalance(node_ref)
                        } else {
                            node_ref
                        };
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
                        let node_ref = if removed.is_some() {
                            Self::rebalance(node_ref)
                        } else {
                            node_ref
                        };
                        (Some(node_ref), removed)
                    }
                    Ordering::Equal => Self::detach_node(*node_ref),
                }
            }
        }
    }

    /// Detaches a located node by the three structural cases: leaf,
    /// one child, or two children with in-order-successor splicing.
    fn detach_node(node: AvlNode<K, V>) -> (Link<K, V>, Option<V>) {
        let AvlNode {
            value, left, right, ..
        } = node;
        match (left, right) {
            (None, None) => (None, Some(value)),
            (Some(child), None) | (None, Some(child)) => (Some(child), Some(value)),
            (Some(left_child), Some(right_child)) => {
                // The successor (leftmost of the right subtree) has no left
                // child, so extracting it never recurses into this case.
                let (right_rest, successor_key, successor_value) = Self::take_min(right_child);
                let mut replacement = Box::new(AvlNode::new(successor_key, successor_value));
                replacement.left = Some(left_child);
                replacement.right = right_rest;
                (Some(Self::rebalance(replacement)), Some(value))
            }
        }
    }

    /// Extracts the minimum entry of a subtree, rebalancing the unwind
    /// path, and returns the remaining subtree with the detached key and
    /// value.
    fn take_min(mut node: Box<AvlNode<K, V>>) -> (Link<K, V>, K, V) {
        match node.left.take() {
            None => {
                let AvlNode {
                    key, value, right, ..
                } = *node;
                (right, key, value)
            }
            Some(left_child) => {
                let (rest, key, value) = Self::take_min(left_child);
                node.left = rest;
                (Some(Self::rebalance(node)), key, value)
            }
        }
    }

    /// Collects all entries in ascending order (in-order traversal).
    fn collect_entries_in_order<'a>(
        node: Option<&'a AvlNode<K, V>>,
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
        node: Option<&'a AvlNode<K, V>>,
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
            let AvlNode {
                key,
                value,
                left,
                right,
                ..
            } = *node_ref;
            Self::push_entries_in_order(left, entries);
            entries.push((key, value));
            Self::push_entries_in_order(right, entries);
        }
    }
}

// =============================================================================
// OrderedMap Implementation
// =============================================================================

impl<K, V> OrderedMap<K, V> for AvlTreeMap<K, V> {
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
        height_of(&self.root)
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

impl<K: Ord + 'static, V> Default for AvlTreeMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + 'static, V> FromIterator<(K, V)> for AvlTreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<K, V> IntoIterator for AvlTreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = MapIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let mut entries = Vec::with_capacity(self.length);
        Self::push_entries_in_order(self.root, &mut entries);
        MapIntoIterator::new(entries)
    }
}

impl<'a, K, V> IntoIterator for &'a AvlTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = MapEntryIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for AvlTreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for AvlTreeMap<K, V> {}

/// The hash covers the length and then every entry in ascending order, so
/// equal maps hash equally regardless of insertion order.
impl<K: Hash, V: Hash> Hash for AvlTreeMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AvlTreeMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for AvlTreeMap<K, V> {
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
impl<K, V> serde::Serialize for AvlTreeMap<K, V>
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
struct AvlTreeMapVisitor<K, V> {
    key_marker: std::marker::PhantomData<K>,
    value_marker: std::marker::PhantomData<V>,
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for AvlTreeMapVisitor<K, V>
where
    K: serde::Deserialize<'de> + Ord + 'static,
    V: serde::Deserialize<'de>,
{
    type Value = AvlTreeMap<K, V>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = AvlTreeMap::new();
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for AvlTreeMap<K, V>
where
    K: serde::Deserialize<'de> + Ord + 'static,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(AvlTreeMapVisitor {
            key_marker: std::marker::PhantomData,
            value_marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
