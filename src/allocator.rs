//! Every [`SkipList`](crate::SkipList) charges the memory of its nodes to an
//! [`Allocator`]. The allocator type decides, at compile time, what happens to
//! storage when a container is copied, moved or swapped:
//!
//! - [`Global`]: stateless and always equal, storage moves freely.
//! - [`Pool<AlwaysPropagate>`]: the allocator travels with the storage.
//! - [`Pool<NeverPropagate>`]: the allocator stays put, storage may only be
//!   handed over between containers sharing the same pool.

use core::{cell::Cell, marker::PhantomData};
use std::rc::Rc;

use super::Error;

/// An allocator strategy.
///
/// Nodes are stored in the container's own arena, the allocator accounts for
/// them: [`Allocator::allocate`] is asked before a node is created and may
/// refuse, [`Allocator::deallocate`] is called when a node is destroyed.
pub trait Allocator: Clone {
  /// Whether copy assignment replaces the destination's allocator with the source's.
  const PROPAGATE_ON_COPY_ASSIGNMENT: bool;

  /// Whether move assignment replaces the destination's allocator with the source's.
  const PROPAGATE_ON_MOVE_ASSIGNMENT: bool;

  /// Whether swap exchanges the allocators.
  const PROPAGATE_ON_SWAP: bool;

  /// Whether any two instances of this allocator compare equal.
  const IS_ALWAYS_EQUAL: bool;

  /// Reserves `size` bytes for a new node.
  fn allocate(&self, size: usize) -> Result<(), Error>;

  /// Releases `size` bytes of a destroyed node.
  fn deallocate(&self, size: usize);

  /// Returns `true` if memory charged to `self` may be released through `other`.
  fn is_equal(&self, other: &Self) -> bool;

  /// Returns the allocator a copy of a container should use.
  #[inline]
  fn select_on_copy(&self) -> Self {
    self.clone()
  }

  /// Returns `true` if storage charged to `self` can be handed over to a container using `other`.
  #[inline]
  fn compatible(&self, other: &Self) -> bool {
    Self::IS_ALWAYS_EQUAL || self.is_equal(other)
  }
}

/// The global allocator, stateless and never refuses.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Global;

impl Allocator for Global {
  const PROPAGATE_ON_COPY_ASSIGNMENT: bool = false;
  const PROPAGATE_ON_MOVE_ASSIGNMENT: bool = false;
  const PROPAGATE_ON_SWAP: bool = false;
  const IS_ALWAYS_EQUAL: bool = true;

  #[inline]
  fn allocate(&self, _size: usize) -> Result<(), Error> {
    Ok(())
  }

  #[inline]
  fn deallocate(&self, _size: usize) {}

  #[inline]
  fn is_equal(&self, _other: &Self) -> bool {
    true
  }
}

/// Propagation behavior of a [`Pool`].
pub trait Propagation {
  /// Whether the pool propagates on copy assignment, move assignment and swap.
  const PROPAGATE: bool;
}

/// A [`Pool`] with this marker travels with its storage on copy assignment,
/// move assignment and swap.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlwaysPropagate;

impl Propagation for AlwaysPropagate {
  const PROPAGATE: bool = true;
}

/// A [`Pool`] with this marker stays with its container.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NeverPropagate;

impl Propagation for NeverPropagate {
  const PROPAGATE: bool = false;
}

#[derive(Debug)]
struct PoolInner {
  limit: Option<usize>,
  nodes: Cell<usize>,
  bytes: Cell<usize>,
}

/// A shared accounting pool.
///
/// Clones of a pool share the same counters and compare equal, two pools
/// created separately never compare equal. A pool may be created with a limit
/// on the number of live nodes, allocations over the limit fail with
/// [`Error::Full`].
///
/// ## Example
///
/// ```rust
/// use skl_ord::{Pool, SkipSet, Options, Error};
///
/// let pool = Pool::<skl_ord::NeverPropagate>::with_limit(2);
/// let mut set = SkipSet::with_options_in(Options::new(), skl_ord::Ascend, pool.clone());
/// set.insert(1).unwrap();
/// set.insert(2).unwrap();
/// assert_eq!(set.insert(3).unwrap_err(), Error::Full { limit: 2 });
/// assert_eq!(pool.nodes(), 2);
/// ```
#[derive(Debug)]
pub struct Pool<P = NeverPropagate> {
  inner: Rc<PoolInner>,
  _marker: PhantomData<P>,
}

impl<P> Clone for Pool<P> {
  #[inline]
  fn clone(&self) -> Self {
    Self {
      inner: self.inner.clone(),
      _marker: PhantomData,
    }
  }
}

impl<P> Default for Pool<P> {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl<P> Pool<P> {
  /// Creates a new pool without a limit.
  #[inline]
  pub fn new() -> Self {
    Self::build(None)
  }

  /// Creates a new pool which hands out at most `limit` nodes at a time.
  #[inline]
  pub fn with_limit(limit: usize) -> Self {
    Self::build(Some(limit))
  }

  #[inline]
  fn build(limit: Option<usize>) -> Self {
    Self {
      inner: Rc::new(PoolInner {
        limit,
        nodes: Cell::new(0),
        bytes: Cell::new(0),
      }),
      _marker: PhantomData,
    }
  }

  /// Returns the node limit of the pool.
  #[inline]
  pub fn limit(&self) -> Option<usize> {
    self.inner.limit
  }

  /// Returns the number of live nodes charged to the pool.
  #[inline]
  pub fn nodes(&self) -> usize {
    self.inner.nodes.get()
  }

  /// Returns the number of bytes charged to the pool.
  #[inline]
  pub fn bytes(&self) -> usize {
    self.inner.bytes.get()
  }
}

impl<P: Propagation> Allocator for Pool<P> {
  const PROPAGATE_ON_COPY_ASSIGNMENT: bool = P::PROPAGATE;
  const PROPAGATE_ON_MOVE_ASSIGNMENT: bool = P::PROPAGATE;
  const PROPAGATE_ON_SWAP: bool = P::PROPAGATE;
  const IS_ALWAYS_EQUAL: bool = false;

  fn allocate(&self, size: usize) -> Result<(), Error> {
    let nodes = self.inner.nodes.get();
    if let Some(limit) = self.inner.limit {
      if nodes >= limit {
        #[cfg(feature = "tracing")]
        tracing::warn!(limit, "pool refused to allocate a node");
        return Err(Error::Full { limit });
      }
    }
    self.inner.nodes.set(nodes + 1);
    self.inner.bytes.set(self.inner.bytes.get() + size);
    Ok(())
  }

  #[inline]
  fn deallocate(&self, size: usize) {
    let inner = &self.inner;
    inner.nodes.set(inner.nodes.get().saturating_sub(1));
    inner.bytes.set(inner.bytes.get().saturating_sub(size));
  }

  #[inline]
  fn is_equal(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.inner, &other.inner)
  }
}
