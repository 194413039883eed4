use core::{iter::FusedIterator, marker::PhantomData};

use crate::{
  allocator::Allocator,
  arena::{Arena, Slot},
  base::{self, Storage},
  node::{Link, Node},
};

/// An iterator over the entries of a [`SkipMap`](super::SkipMap), in key order.
pub struct Iter<'a, K, V>(base::Iter<'a, (K, V)>);

impl<K, V> Clone for Iter<'_, K, V> {
  #[inline]
  fn clone(&self) -> Self {
    Self(self.0.clone())
  }
}

impl<'a, K, V> Iter<'a, K, V> {
  #[inline]
  pub(super) fn new(iter: base::Iter<'a, (K, V)>) -> Self {
    Self(iter)
  }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
  type Item = (&'a K, &'a V);

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    self.0.next().map(|(k, v)| (k, v))
  }

  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    self.0.size_hint()
  }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
  #[inline]
  fn next_back(&mut self) -> Option<Self::Item> {
    self.0.next_back().map(|(k, v)| (k, v))
  }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// An iterator over the entries of a [`SkipMap`](super::SkipMap), in key
/// order, with mutable values.
pub struct IterMut<'a, K, V> {
  slots: *mut Slot<Node<(K, V)>>,
  front: Link,
  back: Link,
  len: usize,
  _marker: PhantomData<&'a mut (K, V)>,
}

impl<'a, K, V> IterMut<'a, K, V> {
  #[inline]
  pub(super) fn new(storage: &'a mut Storage<(K, V)>) -> Self {
    let (slots, front, back, len) = storage.raw_parts_mut();
    Self {
      slots,
      front,
      back,
      len,
      _marker: PhantomData,
    }
  }

  /// # Safety
  /// - `link` must point at a live node of the storage this iterator borrows,
  ///   and that node must not have been yielded before.
  #[inline]
  unsafe fn node(&self, link: Link) -> Option<&'a mut Node<(K, V)>> {
    // Safety: the storage is mutably borrowed for `'a` and every node is yielded at most once.
    link.map(|id| &mut *Arena::value_ptr(self.slots, id))
  }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
  type Item = (&'a K, &'a mut V);

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    if self.len == 0 {
      return None;
    }
    // Safety: `len` bounds the walk, so the front never passes the back.
    let node = unsafe { self.node(self.front)? };
    self.front = node.tower[0];
    self.len -= 1;
    let (k, v) = &mut node.value;
    Some((&*k, v))
  }

  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.len, Some(self.len))
  }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
  #[inline]
  fn next_back(&mut self) -> Option<Self::Item> {
    if self.len == 0 {
      return None;
    }
    // Safety: `len` bounds the walk, so the back never passes the front.
    let node = unsafe { self.node(self.back)? };
    self.back = node.prev;
    self.len -= 1;
    let (k, v) = &mut node.value;
    Some((&*k, v))
  }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// An iterator over the keys of a [`SkipMap`](super::SkipMap), in order.
pub struct Keys<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V> Keys<'a, K, V> {
  #[inline]
  pub(super) fn new(iter: Iter<'a, K, V>) -> Self {
    Self(iter)
  }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
  type Item = &'a K;

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    self.0.next().map(|(k, _)| k)
  }

  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    self.0.size_hint()
  }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
  #[inline]
  fn next_back(&mut self) -> Option<Self::Item> {
    self.0.next_back().map(|(k, _)| k)
  }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// An iterator over the values of a [`SkipMap`](super::SkipMap), in key order.
pub struct Values<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V> Values<'a, K, V> {
  #[inline]
  pub(super) fn new(iter: Iter<'a, K, V>) -> Self {
    Self(iter)
  }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
  type Item = &'a V;

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    self.0.next().map(|(_, v)| v)
  }

  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    self.0.size_hint()
  }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
  #[inline]
  fn next_back(&mut self) -> Option<Self::Item> {
    self.0.next_back().map(|(_, v)| v)
  }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// An iterator over mutable values of a [`SkipMap`](super::SkipMap), in key order.
pub struct ValuesMut<'a, K, V>(IterMut<'a, K, V>);

impl<'a, K, V> ValuesMut<'a, K, V> {
  #[inline]
  pub(super) fn new(iter: IterMut<'a, K, V>) -> Self {
    Self(iter)
  }
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
  type Item = &'a mut V;

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    self.0.next().map(|(_, v)| v)
  }

  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    self.0.size_hint()
  }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
  #[inline]
  fn next_back(&mut self) -> Option<Self::Item> {
    self.0.next_back().map(|(_, v)| v)
  }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

/// An owning iterator over the entries of a [`SkipMap`](super::SkipMap), in key order.
pub struct IntoIter<K, V, A: Allocator>(base::IntoIter<(K, V), A>);

impl<K, V, A: Allocator> IntoIter<K, V, A> {
  #[inline]
  pub(super) fn new(iter: base::IntoIter<(K, V), A>) -> Self {
    Self(iter)
  }
}

impl<K, V, A: Allocator> Iterator for IntoIter<K, V, A> {
  type Item = (K, V);

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    self.0.next()
  }

  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    self.0.size_hint()
  }
}

impl<K, V, A: Allocator> DoubleEndedIterator for IntoIter<K, V, A> {
  #[inline]
  fn next_back(&mut self) -> Option<Self::Item> {
    self.0.next_back()
  }
}

impl<K, V, A: Allocator> ExactSizeIterator for IntoIter<K, V, A> {}

impl<K, V, A: Allocator> FusedIterator for IntoIter<K, V, A> {}
