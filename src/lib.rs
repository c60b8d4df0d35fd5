//! Threaded order-statistic AVL trees for Rust.
//!
//! This crate provides [`AvlTree`], an ordered map over numeric keys that combines three
//! structures in one set of nodes:
//!
//! - a height-balanced binary search tree, so every lookup and update is O(log n),
//! - per-node subtree sizes, giving O(log n) [`rank`](AvlTree::rank) and
//!   [`select`](AvlTree::select), and indexing by [`Rank`],
//! - a doubly-linked in-order thread, so [`min`](AvlTree::min)/[`max`](AvlTree::max) are
//!   O(1) and iteration steps from one key to the next without climbing the tree.
//!
//! # Example
//!
//! ```
//! use osavl_tree::{AvlTree, Error, Rank};
//!
//! let mut tree = AvlTree::new();
//! for key in [5u32, 3, 8, 1, 4, 7, 9] {
//!     tree.insert(key, key.to_string());
//! }
//!
//! assert_eq!(tree.len(), 7);
//! assert_eq!(tree.height(), 2);
//!
//! // Order statistics are one-based.
//! assert_eq!(tree.rank(&7), Some(5));
//! assert_eq!(tree.select(1).map(|(k, _)| *k), Some(1));
//! assert_eq!(tree[Rank(4)], "5");
//!
//! // Neighbours in key order.
//! assert_eq!(tree.successor(&5).map(|(k, _)| *k), Some(7));
//! assert_eq!(tree.predecessor(&5).map(|(k, _)| *k), Some(4));
//!
//! // Removing a key re-links its neighbours.
//! tree.delete(&5)?;
//! assert!(matches!(tree.get_value(&5), Err(Error::KeyNotFound { .. })));
//! assert_eq!(tree.successor(&4).map(|(k, _)| *k), Some(7));
//! assert_eq!(tree.len(), 6);
//! # Ok::<(), Error>(())
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Numeric keys** - Any primitive integer or float; floats use a total order, so `NaN`
//!   is a valid key
//! - **Arena storage** - Nodes live in one contiguous arena and are addressed by handles,
//!   with freed slots reused by later inserts
//! - **Structural walks** - Lazy pre-order and post-order iterators alongside the in-order
//!   ones
//!
//! # Logging
//!
//! Rotations are reported at `trace` level and bulk clears at `debug` level through the
//! [`log`](https://docs.rs/log) facade. Nothing is emitted unless the application installs
//! a logger.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
// Only `deny`: the sealed key trait allows it locally.
#![deny(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod key;
mod order_statistic;
mod raw;
mod traversal;

pub mod avl_tree;

pub use avl_tree::AvlTree;
pub use error::{Error, Result};
pub use key::Key;
pub use order_statistic::Rank;
pub use traversal::Traversal;
