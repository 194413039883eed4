use std::{boxed::Box, vec};

use super::{Height, MAX_HEIGHT};

/// Index of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
  #[inline]
  pub(crate) const fn new(idx: u32) -> Self {
    Self(idx)
  }

  #[inline]
  pub(crate) const fn index(self) -> usize {
    self.0 as usize
  }
}

/// A link to another node.
///
/// Read as a predecessor, `None` is the header. Read as a successor, `None` is the end of the level.
pub(crate) type Link = Option<NodeId>;

#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
  pub(crate) value: T,
  /// Backward link on level 0.
  pub(crate) prev: Link,
  /// Forward links, `tower[i]` is the next node on level `i`. The length is the node's height.
  pub(crate) tower: Box<[Link]>,
}

impl<T> Node<T> {
  #[inline]
  pub(crate) fn new(value: T, height: Height) -> Self {
    Self {
      value,
      prev: None,
      tower: vec![None; height.to_usize()].into_boxed_slice(),
    }
  }

  #[inline]
  pub(crate) fn height(&self) -> usize {
    self.tower.len()
  }

  #[inline]
  pub(crate) fn tower_height(&self) -> Height {
    Height::new(self.tower.len() as u8).unwrap_or(Height::MAX)
  }

  /// The memory footprint of a node with a tower of `height` links, used for allocator accounting.
  #[inline]
  pub(crate) const fn size(height: usize) -> usize {
    core::mem::size_of::<Self>() + height * core::mem::size_of::<Link>()
  }
}

/// The sentinel: list heads for every level and the last node of level 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Header {
  pub(crate) next: [Link; MAX_HEIGHT],
  pub(crate) tail: Link,
}

impl Default for Header {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl Header {
  #[inline]
  pub(crate) const fn new() -> Self {
    Self {
      next: [None; MAX_HEIGHT],
      tail: None,
    }
  }

  #[inline]
  pub(crate) fn reset(&mut self) {
    *self = Self::new();
  }
}
