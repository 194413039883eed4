use core::ops::{Index, IndexMut};
use std::vec::Vec;

use super::{node::NodeId, Error};

#[derive(Debug, Clone)]
pub(crate) enum Slot<T> {
  Occupied(T),
  Vacant { next_free: Option<NodeId> },
}

/// A growable slab that hands out stable indices.
///
/// Removed slots are chained into a free list and reused before the
/// backing vector grows.
#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
  slots: Vec<Slot<T>>,
  free: Option<NodeId>,
  len: usize,
}

impl<T> Default for Arena<T> {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl<T> Arena<T> {
  #[inline]
  pub(crate) const fn new() -> Self {
    Self {
      slots: Vec::new(),
      free: None,
      len: 0,
    }
  }

  /// Creates an arena with room for up to `cap` values.
  ///
  /// The reservation is best effort: if it cannot be made, the arena starts
  /// empty and grows on demand.
  #[inline]
  pub(crate) fn with_capacity(cap: usize) -> Self {
    let mut arena = Self::new();
    if arena.slots.try_reserve_exact(cap).is_err() {
      #[cfg(feature = "tracing")]
      tracing::debug!(cap, "skipping up-front arena reservation");
    }
    arena
  }

  /// Returns the number of occupied slots.
  #[inline]
  pub(crate) const fn len(&self) -> usize {
    self.len
  }

  /// Makes room for `additional` more values.
  pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
    if self.slots.len().saturating_add(additional) > u32::MAX as usize {
      return Err(Error::Capacity);
    }
    self.slots.try_reserve(additional).map_err(Into::into)
  }

  /// Stores `value` and returns its index.
  ///
  /// Growth is fallible: if the backing vector cannot be extended the value is
  /// dropped and the reservation error is returned.
  pub(crate) fn insert(&mut self, value: T) -> Result<NodeId, Error> {
    if let Some(id) = self.free {
      let slot = &mut self.slots[id.index()];
      match slot {
        Slot::Vacant { next_free } => self.free = *next_free,
        Slot::Occupied(_) => panic!("arena free list points to an occupied slot"),
      }
      *slot = Slot::Occupied(value);
      self.len += 1;
      return Ok(id);
    }

    let idx = self.slots.len();
    if idx >= u32::MAX as usize {
      return Err(Error::Capacity);
    }
    self.slots.try_reserve(1)?;
    self.slots.push(Slot::Occupied(value));
    self.len += 1;
    Ok(NodeId::new(idx as u32))
  }

  /// Removes the value at `id` and puts the slot on the free list.
  ///
  /// ## Panics
  /// - If `id` is vacant.
  pub(crate) fn remove(&mut self, id: NodeId) -> T {
    let slot = core::mem::replace(
      &mut self.slots[id.index()],
      Slot::Vacant {
        next_free: self.free,
      },
    );
    match slot {
      Slot::Occupied(value) => {
        self.free = Some(id);
        self.len -= 1;
        value
      }
      Slot::Vacant { next_free } => {
        // restore the slot before reporting the misuse
        self.slots[id.index()] = Slot::Vacant { next_free };
        panic!("removing a vacant arena slot {}", id.index())
      }
    }
  }

  #[inline]
  pub(crate) fn get(&self, id: NodeId) -> Option<&T> {
    match self.slots.get(id.index()) {
      Some(Slot::Occupied(value)) => Some(value),
      _ => None,
    }
  }

  #[inline]
  pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
    match self.slots.get_mut(id.index()) {
      Some(Slot::Occupied(value)) => Some(value),
      _ => None,
    }
  }

  /// Returns a raw pointer to the value at `id`.
  ///
  /// # Safety
  /// - `base` must come from [`Arena::as_mut_ptr`] on an arena that has not
  ///   been resized since, and `id` must be occupied.
  #[inline]
  pub(crate) unsafe fn value_ptr(base: *mut Slot<T>, id: NodeId) -> *mut T {
    // Safety: the caller guarantees `id` is in bounds and occupied.
    match &mut *base.add(id.index()) {
      Slot::Occupied(value) => value as *mut T,
      Slot::Vacant { .. } => unreachable!("dangling node id {}", id.index()),
    }
  }

  #[inline]
  pub(crate) fn as_mut_ptr(&mut self) -> *mut Slot<T> {
    self.slots.as_mut_ptr()
  }

  /// Drops every value and forgets all slots, keeping the allocation.
  #[inline]
  pub(crate) fn clear(&mut self) {
    self.slots.clear();
    self.free = None;
    self.len = 0;
  }
}

impl<T> Index<NodeId> for Arena<T> {
  type Output = T;

  #[inline]
  fn index(&self, id: NodeId) -> &T {
    match self.get(id) {
      Some(value) => value,
      None => panic!("dangling node id {}", id.index()),
    }
  }
}

impl<T> IndexMut<NodeId> for Arena<T> {
  #[inline]
  fn index_mut(&mut self, id: NodeId) -> &mut T {
    match self.get_mut(id) {
      Some(value) => value,
      None => panic!("dangling node id {}", id.index()),
    }
  }
}
