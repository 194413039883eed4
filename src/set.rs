use core::{borrow::Borrow, fmt};

use super::{
  allocator::{Allocator, Global},
  base::{Cursor, CursorMut, IntoIter, Iter, SkipList},
  key::Identity,
  Ascend, Comparator, Error, Height, Options,
};

#[cfg(test)]
mod tests;

/// An ordered set based on a skiplist.
///
/// ## Example
///
/// ```rust
/// use skl_ord::SkipSet;
///
/// let mut set = SkipSet::new();
/// set.insert("b").unwrap();
/// set.insert("a").unwrap();
/// assert!(set.contains(&"a"));
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), ["a", "b"]);
/// ```
pub struct SkipSet<T, C = Ascend, A: Allocator = Global>(SkipList<Identity<T>, C, A>);

impl<T, C: Default, A: Allocator + Default> Default for SkipSet<T, C, A> {
  #[inline]
  fn default() -> Self {
    Self(SkipList::default())
  }
}

impl<T> SkipSet<T> {
  /// Creates an empty set ordered by the natural order of `T`.
  #[inline]
  pub fn new() -> Self {
    Self(SkipList::new())
  }

  /// Creates an empty set with the given options.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skl_ord::{SkipSet, Options};
  ///
  /// let set = SkipSet::<u64>::with_options(Options::new().with_seed(Some(7)).with_capacity(16));
  /// assert!(set.is_empty());
  /// ```
  #[inline]
  pub fn with_options(opts: Options) -> Self {
    Self(SkipList::with_options(opts))
  }
}

impl<T, C> SkipSet<T, C> {
  /// Creates an empty set ordered by `cmp`.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skl_ord::{SkipSet, Descend};
  ///
  /// let mut set = SkipSet::with_comparator(Descend);
  /// set.try_extend([1, 3, 2]).unwrap();
  /// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [3, 2, 1]);
  /// ```
  #[inline]
  pub fn with_comparator(cmp: C) -> Self {
    Self(SkipList::with_comparator(cmp))
  }

  /// Creates an empty set with the given options, ordered by `cmp`.
  #[inline]
  pub fn with_options_and_comparator(opts: Options, cmp: C) -> Self {
    Self(SkipList::with_options_and_comparator(opts, cmp))
  }
}

impl<T, C, A: Allocator> SkipSet<T, C, A> {
  /// Creates an empty set ordered by `cmp`, charging its nodes to `alloc`.
  #[inline]
  pub fn new_in(cmp: C, alloc: A) -> Self {
    Self(SkipList::new_in(cmp, alloc))
  }

  /// Creates an empty set with the given options, ordered by `cmp`, charging its nodes to `alloc`.
  #[inline]
  pub fn with_options_in(opts: Options, cmp: C, alloc: A) -> Self {
    Self(SkipList::with_options_in(opts, cmp, alloc))
  }

  /// Returns the number of elements.
  #[inline]
  pub fn len(&self) -> usize {
    self.0.len()
  }

  /// Returns `true` if the set holds no elements.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Returns the number of levels in use.
  #[inline]
  pub fn height(&self) -> u8 {
    self.0.height()
  }

  /// Returns the maximum height a tower may have.
  #[inline]
  pub const fn max_height(&self) -> Height {
    self.0.max_height()
  }

  /// Returns the comparator.
  #[inline]
  pub const fn comparator(&self) -> &C {
    self.0.comparator()
  }

  /// Returns the allocator.
  #[inline]
  pub const fn allocator(&self) -> &A {
    self.0.allocator()
  }

  /// Returns the options the set was created with.
  #[inline]
  pub const fn options(&self) -> &Options {
    self.0.options()
  }

  /// Returns the smallest element.
  #[inline]
  pub fn first(&self) -> Option<&T> {
    self.0.first()
  }

  /// Returns the largest element.
  #[inline]
  pub fn last(&self) -> Option<&T> {
    self.0.last()
  }

  /// Returns an iterator over the elements in order.
  #[inline]
  pub fn iter(&self) -> Iter<'_, T> {
    self.0.iter()
  }

  /// Returns a cursor at the first element.
  #[inline]
  pub fn cursor_front(&self) -> Cursor<'_, T> {
    self.0.cursor_front()
  }

  /// Returns a cursor at the last element.
  #[inline]
  pub fn cursor_back(&self) -> Cursor<'_, T> {
    self.0.cursor_back()
  }

  /// Returns a cursor at the end position.
  #[inline]
  pub fn cursor_end(&self) -> Cursor<'_, T> {
    self.0.cursor_end()
  }

  /// Returns a mutable cursor at the first element.
  #[inline]
  pub fn cursor_front_mut(&mut self) -> CursorMut<'_, Identity<T>, C, A> {
    self.0.cursor_front_mut()
  }

  /// Returns a mutable cursor at the last element.
  #[inline]
  pub fn cursor_back_mut(&mut self) -> CursorMut<'_, Identity<T>, C, A> {
    self.0.cursor_back_mut()
  }

  /// Returns a mutable cursor at the end position.
  #[inline]
  pub fn cursor_end_mut(&mut self) -> CursorMut<'_, Identity<T>, C, A> {
    self.0.cursor_end_mut()
  }

  /// Removes every element.
  #[inline]
  pub fn clear(&mut self) {
    self.0.clear()
  }

  /// Moves the elements out of `self` in O(1), leaving `self` empty.
  #[inline]
  pub fn take(&mut self) -> Self
  where
    C: Clone,
  {
    Self(self.0.take())
  }

  /// Replaces the contents of `self` with the contents of `source`, leaving `source` empty.
  ///
  /// See [`SkipList::try_move_from`].
  #[inline]
  pub fn try_move_from(&mut self, source: &mut Self) -> Result<(), Error>
  where
    C: Clone,
  {
    self.0.try_move_from(&mut source.0)
  }

  /// Exchanges the contents of `self` and `other`.
  ///
  /// See [`SkipList::try_swap`].
  #[inline]
  pub fn try_swap(&mut self, other: &mut Self) -> Result<(), Error> {
    self.0.try_swap(&mut other.0)
  }
}

impl<T: Clone, C: Clone, A: Allocator> SkipSet<T, C, A> {
  /// Copies the set, see [`SkipList::try_clone`].
  #[inline]
  pub fn try_clone(&self) -> Result<Self, Error> {
    self.0.try_clone().map(Self)
  }

  /// Replaces the contents of `self` with a copy of `source`, see [`SkipList::try_clone_from`].
  #[inline]
  pub fn try_clone_from(&mut self, source: &Self) -> Result<(), Error> {
    self.0.try_clone_from(&source.0)
  }
}

impl<T, C: Comparator<T>, A: Allocator> SkipSet<T, C, A> {
  /// Adds `value` to the set.
  ///
  /// Returns a cursor at the element equal to `value`, and whether `value`
  /// was inserted. An equal element already in the set is left untouched.
  #[inline]
  pub fn insert(&mut self, value: T) -> Result<(Cursor<'_, T>, bool), Error> {
    self.0.insert(value)
  }

  /// Adds `value` with a tower of exactly `height` levels.
  #[inline]
  pub fn insert_at_height(
    &mut self,
    height: Height,
    value: T,
  ) -> Result<(Cursor<'_, T>, bool), Error> {
    self.0.insert_at_height(height, value)
  }

  /// Returns the element equal to `value`, inserting the one built by `f` if there is none.
  ///
  /// ## Panics
  /// - If the element built by `f` is not equal to `value`.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skl_ord::SkipSet;
  ///
  /// let mut set = SkipSet::<String>::new();
  /// let v = set.get_or_insert_with("a", || "a".to_string()).unwrap();
  /// assert_eq!(v, "a");
  /// ```
  #[inline]
  pub fn get_or_insert_with<Q, F>(&mut self, value: &Q, f: F) -> Result<&T, Error>
  where
    T: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
    F: FnOnce() -> T,
  {
    self.0.get_or_insert_with(value, f)
  }

  /// Adds every element of `iter`, stopping at the first allocation failure.
  #[inline]
  pub fn try_extend<I: IntoIterator<Item = T>>(&mut self, iter: I) -> Result<(), Error> {
    self.0.try_extend(iter)
  }

  /// Returns the element equal to `value`.
  #[inline]
  pub fn get<Q>(&self, value: &Q) -> Option<&T>
  where
    T: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    self.0.get(value)
  }

  /// Returns `true` if the set contains an element equal to `value`.
  #[inline]
  pub fn contains<Q>(&self, value: &Q) -> bool
  where
    T: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    self.0.contains(value)
  }

  /// Returns the number of elements equal to `value`, `0` or `1`.
  #[inline]
  pub fn count<Q>(&self, value: &Q) -> usize
  where
    T: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    self.0.count(value)
  }

  /// Returns a cursor at the element equal to `value`, or at the end position.
  #[inline]
  pub fn find<Q>(&self, value: &Q) -> Cursor<'_, T>
  where
    T: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    self.0.find(value)
  }

  /// Returns a cursor at the first element not ordered before `value`.
  #[inline]
  pub fn lower_bound<Q>(&self, value: &Q) -> Cursor<'_, T>
  where
    T: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    self.0.lower_bound(value)
  }

  /// Returns a cursor at the first element ordered after `value`.
  #[inline]
  pub fn upper_bound<Q>(&self, value: &Q) -> Cursor<'_, T>
  where
    T: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    self.0.upper_bound(value)
  }

  /// Returns `(lower_bound(value), upper_bound(value))`.
  #[inline]
  pub fn equal_range<Q>(&self, value: &Q) -> (Cursor<'_, T>, Cursor<'_, T>)
  where
    T: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    self.0.equal_range(value)
  }

  /// Removes the element equal to `value` and returns a cursor at the element that followed it.
  #[inline]
  pub fn erase<Q>(&mut self, value: &Q) -> CursorMut<'_, Identity<T>, C, A>
  where
    T: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    self.0.erase(value)
  }

  /// Removes the element equal to `value` and returns it.
  #[inline]
  pub fn remove<Q>(&mut self, value: &Q) -> Option<T>
  where
    T: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    self.0.remove(value)
  }

  /// Removes the smallest element and returns it.
  #[inline]
  pub fn pop_first(&mut self) -> Option<T> {
    self.0.pop_first()
  }

  /// Removes the largest element and returns it.
  #[inline]
  pub fn pop_last(&mut self) -> Option<T> {
    self.0.pop_last()
  }
}

impl<T: Clone, C: Clone, A: Allocator> Clone for SkipSet<T, C, A> {
  #[inline]
  fn clone(&self) -> Self {
    Self(self.0.clone())
  }
}

impl<T: fmt::Debug, C, A: Allocator> fmt::Debug for SkipSet<T, C, A> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set().entries(self.iter()).finish()
  }
}

impl<T: PartialEq, C, A: Allocator> PartialEq for SkipSet<T, C, A> {
  #[inline]
  fn eq(&self, other: &Self) -> bool {
    self.0 == other.0
  }
}

impl<T: Eq, C, A: Allocator> Eq for SkipSet<T, C, A> {}

impl<T: PartialOrd, C, A: Allocator> PartialOrd for SkipSet<T, C, A> {
  #[inline]
  fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
    self.0.partial_cmp(&other.0)
  }
}

impl<T: Ord, C, A: Allocator> Ord for SkipSet<T, C, A> {
  #[inline]
  fn cmp(&self, other: &Self) -> core::cmp::Ordering {
    self.0.cmp(&other.0)
  }
}

impl<T, C, A> FromIterator<T> for SkipSet<T, C, A>
where
  C: Comparator<T> + Default,
  A: Allocator + Default,
{
  /// ## Panics
  /// - If the allocator refuses a node.
  #[inline]
  fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
    Self(SkipList::from_iter(iter))
  }
}

impl<T, C, A: Allocator> IntoIterator for SkipSet<T, C, A> {
  type Item = T;
  type IntoIter = IntoIter<T, A>;

  #[inline]
  fn into_iter(self) -> Self::IntoIter {
    self.0.into_iter()
  }
}

impl<'a, T, C, A: Allocator> IntoIterator for &'a SkipSet<T, C, A> {
  type Item = &'a T;
  type IntoIter = Iter<'a, T>;

  #[inline]
  fn into_iter(self) -> Self::IntoIter {
    self.0.iter()
  }
}
