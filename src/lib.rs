//! A single-threaded, ARENA based skiplist that provides ordered set and map
//! semantics with expected `O(log n)` search, insert and remove.
//!
//! Nodes live in an index addressed arena, so links between nodes are plain
//! integers instead of pointers. Every node owns a tower of forward links whose
//! height is drawn from a geometric distribution (`p = 1/4`), plus one backward
//! link on the bottom level for reverse iteration.
//!
//! ## Example
//!
//! ```rust
//! use skl_ord::{SkipMap, SkipSet};
//!
//! let mut set = SkipSet::new();
//! for k in [5, 3, 8, 1, 9, 2] {
//!   set.insert(k).unwrap();
//! }
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 5, 8, 9]);
//!
//! let mut map = SkipMap::new();
//! map.insert(1, "a").unwrap();
//! let (_, inserted) = map.insert(1, "z").unwrap();
//! assert!(!inserted);
//! assert_eq!(map.get(&1), Some(&"a"));
//! ```
#![cfg_attr(not(all(feature = "std", test)), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(docsrs, allow(unused_attributes))]
#![deny(missing_docs)]
#![allow(clippy::type_complexity, rustdoc::bare_urls)]

#[cfg(not(feature = "std"))]
extern crate alloc as std;

#[cfg(feature = "std")]
extern crate std;

use core::cmp;

mod arena;
mod node;
mod utils;

/// Allocator strategies which decide how storage follows a container on copy, move and swap.
pub mod allocator;

/// The generic skiplist engine shared by [`SkipSet`] and [`SkipMap`].
pub mod base;

mod error;
pub use error::Error;

/// Key extraction policies.
pub mod key;

/// A map implementation based on skiplist.
pub mod map;

mod options;
pub use options::Options;

/// A set implementation based on skiplist.
pub mod set;

mod types;
pub use types::Height;

pub use allocator::{AlwaysPropagate, Global, NeverPropagate, Pool};
pub use base::{Cursor, CursorMut, SkipList};
pub use key::{Identity, KeyTraits, SelectFirst};
pub use map::SkipMap;
pub use set::SkipSet;

/// The maximum height of a tower, every node participates in at most this many levels.
pub const MAX_HEIGHT: usize = 32;

/// Comparator defines the order of the keys in a skiplist.
///
/// `Q` is the type the comparator works on. Lookups may use any `Q` the stored
/// key can be borrowed as, as long as the comparator orders `Q` the same way
/// it orders the key.
pub trait Comparator<Q: ?Sized> {
  /// Compares two keys.
  fn compare(&self, a: &Q, b: &Q) -> cmp::Ordering;
}

/// Ascend is a comparator that orders keys by their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Ascend;

impl<Q: ?Sized + Ord> Comparator<Q> for Ascend {
  #[inline]
  fn compare(&self, a: &Q, b: &Q) -> cmp::Ordering {
    a.cmp(b)
  }
}

/// Descend is a comparator that orders keys in the reverse of their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Descend;

impl<Q: ?Sized + Ord> Comparator<Q> for Descend {
  #[inline]
  fn compare(&self, a: &Q, b: &Q) -> cmp::Ordering {
    b.cmp(a)
  }
}
