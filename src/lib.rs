//! # arbors
//!
//! Ordered key-value maps over comparable keys, with two interchangeable
//! backing structures behind one common contract.
//!
//! ## Overview
//!
//! The crate exists to compare the behavior of a plain binary search tree
//! against its height-balanced counterpart on identical inputs. It provides:
//!
//! - **[`map::BinarySearchTreeMap`]**: a classic unbalanced binary search
//!   tree. Insertion order directly determines shape, so sorted insertion
//!   degenerates into an O(n)-deep list. This is the baseline.
//! - **[`map::AvlTreeMap`]**: an AVL tree with the same external contract,
//!   guaranteeing O(log n) height through rotation repair after every
//!   structural mutation.
//! - **[`map::OrderedMap`]**: the contract both variants implement, so a
//!   harness can drive either through a single code path and diff their
//!   instrumentation output.
//! - **Per-operation instrumentation**: every `insert`/`search`/`remove`
//!   records the number of key comparisons performed and the elapsed wall
//!   time, readable immediately after the call.
//!
//! Ordering is supplied as a comparator value fixed at construction, so the
//! same tree engine works over any key type with a total order.
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` support for both map types
//!
//! ## Example
//!
//! ```rust
//! use arbors::prelude::*;
//!
//! let mut sorted_input = BinarySearchTreeMap::new();
//! let mut balanced = AvlTreeMap::new();
//!
//! for key in 1..=7 {
//!     sorted_input.insert(key, key * 10);
//!     balanced.insert(key, key * 10);
//! }
//!
//! // The unbalanced tree degenerates on sorted input; the AVL tree does not.
//! assert_eq!(sorted_input.height(), 7);
//! assert_eq!(balanced.height(), 3);
//!
//! // Both expose identical contents through the shared contract.
//! assert!(sorted_input.iter().eq(balanced.iter()));
//! ```
//!
//! ## Concurrency
//!
//! All operations are single-threaded and synchronous. The map types are
//! deliberately neither `Send` nor `Sync`; callers that need concurrent
//! access must serialize calls themselves.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports the map types, the [`map::OrderedMap`] contract, and the
/// supporting error and instrumentation types.
///
/// # Usage
///
/// ```rust
/// use arbors::prelude::*;
/// ```
pub mod prelude {
    pub use crate::map::*;
}

pub mod map;
