//! An ordered set backed by a 2-3 search tree.
//!
//! This crate provides [`TwoThreeSet`], an ordered set in which every
//! internal node holds either one key and two children (a "2-node") or two
//! ordered keys and three children (a "3-node"), and every leaf sits at the
//! same depth. Membership tests, insertion, removal and minimum/maximum
//! retrieval all run in O(log n); ascending iteration visits each element in
//! amortized constant time.
//!
//! # Example
//!
//! ```
//! use two_three_tree::TwoThreeSet;
//!
//! let mut primes = TwoThreeSet::new();
//! primes.insert(5);
//! primes.insert(2);
//! primes.insert(3);
//!
//! assert!(primes.contains(&3));
//! assert_eq!(primes.first(), Ok(&2));
//! assert_eq!(primes.last(), Ok(&5));
//!
//! let ascending: Vec<_> = primes.iter().copied().collect();
//! assert_eq!(ascending, [2, 3, 5]);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library
//!   dependency
//! - **Perfectly height-balanced** - Growth and shrinkage both move every
//!   leaf at once, so all leaves stay at equal depth at all times
//! - **Handle-based node storage** - Nodes live in a flat arena and refer to
//!   each other through indices, not pointers
//!
//! # Implementation
//!
//! Insertion splits overflowing 3-nodes and promotes the middle key one
//! level at a time; removal replaces an emptied 2-node with a transient
//! "hole" that is resolved upward by borrowing from or merging with a
//! sibling. Both phases rewrite each affected node in place under a stable
//! arena handle, so the rest of the tree never needs relinking.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod raw;

pub mod two_three_set;

pub use error::Error;
pub use two_three_set::TwoThreeSet;
