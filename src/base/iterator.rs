use core::iter::FusedIterator;

use super::{
  super::{allocator::Allocator, key::KeyTraits, node::Link, Comparator},
  Node, SkipList, Storage,
};

/// An iterator over the elements of a skiplist, in order.
pub struct Iter<'a, T> {
  storage: &'a Storage<T>,
  front: Link,
  back: Link,
  len: usize,
}

impl<T> Clone for Iter<'_, T> {
  #[inline]
  fn clone(&self) -> Self {
    Self {
      storage: self.storage,
      front: self.front,
      back: self.back,
      len: self.len,
    }
  }
}

impl<'a, T> Iter<'a, T> {
  #[inline]
  pub(crate) fn new(storage: &'a Storage<T>) -> Self {
    Self {
      storage,
      front: storage.first(),
      back: storage.last(),
      len: storage.len(),
    }
  }
}

impl<'a, T> Iterator for Iter<'a, T> {
  type Item = &'a T;

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    if self.len == 0 {
      return None;
    }
    let node = self.storage.node(self.front?);
    self.front = node.tower[0];
    self.len -= 1;
    Some(&node.value)
  }

  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.len, Some(self.len))
  }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
  #[inline]
  fn next_back(&mut self) -> Option<Self::Item> {
    if self.len == 0 {
      return None;
    }
    let node = self.storage.node(self.back?);
    self.back = node.prev;
    self.len -= 1;
    Some(&node.value)
  }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// An owning iterator over the elements of a skiplist, in order.
pub struct IntoIter<T, A: Allocator> {
  storage: Storage<T>,
  alloc: A,
  front: Link,
  back: Link,
  len: usize,
}

impl<T, A: Allocator> IntoIter<T, A> {
  #[inline]
  pub(crate) fn new(storage: Storage<T>, alloc: A) -> Self {
    Self {
      front: storage.first(),
      back: storage.last(),
      len: storage.len(),
      storage,
      alloc,
    }
  }

  #[inline]
  fn free(&mut self, link: Link) -> Option<Node<T>> {
    let node = self.storage.arena.remove(link?);
    self.alloc.deallocate(Node::<T>::size(node.height()));
    self.len -= 1;
    Some(node)
  }
}

impl<T, A: Allocator> Drop for IntoIter<T, A> {
  fn drop(&mut self) {
    for _ in self.by_ref() {}
  }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
  type Item = T;

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    if self.len == 0 {
      return None;
    }
    let node = self.free(self.front)?;
    self.front = node.tower[0];
    Some(node.value)
  }

  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.len, Some(self.len))
  }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
  #[inline]
  fn next_back(&mut self) -> Option<Self::Item> {
    if self.len == 0 {
      return None;
    }
    let node = self.free(self.back)?;
    self.back = node.prev;
    Some(node.value)
  }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

/// A cursor over a skiplist.
///
/// A cursor either points at an element or at the end position, which sits
/// one past the last element. Moving forward from the last element lands on
/// the end position, moving forward again wraps around to the first element.
/// Moving backward from the first element lands on the end position, moving
/// backward again wraps around to the last element.
pub struct Cursor<'a, T> {
  storage: &'a Storage<T>,
  current: Link,
}

impl<T> Clone for Cursor<'_, T> {
  #[inline]
  fn clone(&self) -> Self {
    *self
  }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> PartialEq for Cursor<'_, T> {
  /// Two cursors are equal if they point into the same skiplist at the same position.
  #[inline]
  fn eq(&self, other: &Self) -> bool {
    core::ptr::eq(self.storage, other.storage) && self.current == other.current
  }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T: core::fmt::Debug> core::fmt::Debug for Cursor<'_, T> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_tuple("Cursor").field(&self.current()).finish()
  }
}

impl<'a, T> Cursor<'a, T> {
  #[inline]
  pub(crate) const fn new(storage: &'a Storage<T>, current: Link) -> Self {
    Self { storage, current }
  }

  /// Returns the element the cursor points at, or `None` at the end position.
  #[inline]
  pub fn current(&self) -> Option<&'a T> {
    self.current.map(|id| self.storage.value(id))
  }

  /// Returns `true` if the cursor is at the end position.
  #[inline]
  pub const fn is_end(&self) -> bool {
    self.current.is_none()
  }

  /// Moves to the next element.
  #[inline]
  pub fn move_next(&mut self) {
    self.current = self.storage.next_of(self.current, 0);
  }

  /// Moves to the previous element.
  #[inline]
  pub fn move_prev(&mut self) {
    self.current = self.storage.prev_of(self.current);
  }

  /// Returns the element [`move_next`](Cursor::move_next) would move to.
  #[inline]
  pub fn peek_next(&self) -> Option<&'a T> {
    self
      .storage
      .next_of(self.current, 0)
      .map(|id| self.storage.value(id))
  }

  /// Returns the element [`move_prev`](Cursor::move_prev) would move to.
  #[inline]
  pub fn peek_prev(&self) -> Option<&'a T> {
    self
      .storage
      .prev_of(self.current)
      .map(|id| self.storage.value(id))
  }
}

impl<'a, K, V> Cursor<'a, (K, V)> {
  /// Returns the key of the entry the cursor points at.
  #[inline]
  pub fn key(&self) -> Option<&'a K> {
    self.current().map(|(k, _)| k)
  }

  /// Returns the value of the entry the cursor points at.
  #[inline]
  pub fn value(&self) -> Option<&'a V> {
    self.current().map(|(_, v)| v)
  }
}

/// A cursor over a skiplist that can remove elements.
///
/// Moves like [`Cursor`]. [`remove_current`](CursorMut::remove_current)
/// removes the element under the cursor and leaves the cursor on the
/// element that followed it.
pub struct CursorMut<'a, KT: KeyTraits, C, A: Allocator> {
  list: &'a mut SkipList<KT, C, A>,
  current: Link,
}

impl<'a, KT: KeyTraits, C, A: Allocator> CursorMut<'a, KT, C, A> {
  #[inline]
  pub(crate) fn new(list: &'a mut SkipList<KT, C, A>, current: Link) -> Self {
    Self { list, current }
  }

  /// Returns the element the cursor points at, or `None` at the end position.
  #[inline]
  pub fn current(&self) -> Option<&KT::Value> {
    self.current.map(|id| self.list.storage.value(id))
  }

  /// Returns `true` if the cursor is at the end position.
  #[inline]
  pub const fn is_end(&self) -> bool {
    self.current.is_none()
  }

  /// Moves to the next element.
  #[inline]
  pub fn move_next(&mut self) {
    self.current = self.list.storage.next_of(self.current, 0);
  }

  /// Moves to the previous element.
  #[inline]
  pub fn move_prev(&mut self) {
    self.current = self.list.storage.prev_of(self.current);
  }

  /// Returns the element [`move_next`](CursorMut::move_next) would move to.
  #[inline]
  pub fn peek_next(&self) -> Option<&KT::Value> {
    let storage = &self.list.storage;
    storage.next_of(self.current, 0).map(|id| storage.value(id))
  }

  /// Returns the element [`move_prev`](CursorMut::move_prev) would move to.
  #[inline]
  pub fn peek_prev(&self) -> Option<&KT::Value> {
    let storage = &self.list.storage;
    storage.prev_of(self.current).map(|id| storage.value(id))
  }

  /// Returns a read-only cursor at the same position.
  #[inline]
  pub fn as_cursor(&self) -> Cursor<'_, KT::Value> {
    Cursor::new(&self.list.storage, self.current)
  }
}

impl<KT: KeyTraits, C: Comparator<KT::Key>, A: Allocator> CursorMut<'_, KT, C, A> {
  /// Removes the element under the cursor and returns it, moving the cursor
  /// to the element that followed it.
  ///
  /// Returns `None` and does nothing at the end position.
  #[inline]
  pub fn remove_current(&mut self) -> Option<KT::Value> {
    let id = self.current?;
    self.current = self.list.storage.node(id).tower[0];
    Some(self.list.remove_node(id))
  }
}

impl<K, V, C, A: Allocator> CursorMut<'_, crate::key::SelectFirst<K, V>, C, A> {
  /// Returns the key of the entry the cursor points at.
  #[inline]
  pub fn key(&self) -> Option<&K> {
    self.current().map(|(k, _)| k)
  }

  /// Returns the value of the entry the cursor points at.
  #[inline]
  pub fn value(&self) -> Option<&V> {
    self.current().map(|(_, v)| v)
  }

  /// Returns a mutable reference to the value of the entry the cursor points at.
  #[inline]
  pub fn value_mut(&mut self) -> Option<&mut V> {
    let id = self.current?;
    Some(&mut self.list.value_mut(id).1)
  }
}
