use core::{borrow::Borrow, fmt};

use super::{
  allocator::{Allocator, Global},
  base::{Cursor, CursorMut, SkipList},
  key::SelectFirst,
  Ascend, Comparator, Error, Height, Options,
};

mod iterator;
pub use iterator::*;

#[cfg(test)]
mod tests;

/// An ordered map based on a skiplist.
///
/// Entries are stored as `(K, V)` pairs ordered by the key.
///
/// ## Example
///
/// ```rust
/// use skl_ord::SkipMap;
///
/// let mut map = SkipMap::new();
/// map.insert("b", 2).unwrap();
/// map.insert("a", 1).unwrap();
/// *map.get_or_insert_default("c").unwrap() += 3;
///
/// assert_eq!(map.get(&"a"), Some(&1));
/// assert_eq!(
///   map.iter().collect::<Vec<_>>(),
///   [(&"a", &1), (&"b", &2), (&"c", &3)],
/// );
/// ```
pub struct SkipMap<K, V, C = Ascend, A: Allocator = Global>(SkipList<SelectFirst<K, V>, C, A>);

impl<K, V, C: Default, A: Allocator + Default> Default for SkipMap<K, V, C, A> {
  #[inline]
  fn default() -> Self {
    Self(SkipList::default())
  }
}

impl<K, V> SkipMap<K, V> {
  /// Creates an empty map ordered by the natural order of `K`.
  #[inline]
  pub fn new() -> Self {
    Self(SkipList::new())
  }

  /// Creates an empty map with the given options.
  #[inline]
  pub fn with_options(opts: Options) -> Self {
    Self(SkipList::with_options(opts))
  }
}

impl<K, V, C> SkipMap<K, V, C> {
  /// Creates an empty map ordered by `cmp`.
  #[inline]
  pub fn with_comparator(cmp: C) -> Self {
    Self(SkipList::with_comparator(cmp))
  }

  /// Creates an empty map with the given options, ordered by `cmp`.
  #[inline]
  pub fn with_options_and_comparator(opts: Options, cmp: C) -> Self {
    Self(SkipList::with_options_and_comparator(opts, cmp))
  }
}

impl<K, V, C, A: Allocator> SkipMap<K, V, C, A> {
  /// Creates an empty map ordered by `cmp`, charging its nodes to `alloc`.
  #[inline]
  pub fn new_in(cmp: C, alloc: A) -> Self {
    Self(SkipList::new_in(cmp, alloc))
  }

  /// Creates an empty map with the given options, ordered by `cmp`, charging its nodes to `alloc`.
  #[inline]
  pub fn with_options_in(opts: Options, cmp: C, alloc: A) -> Self {
    Self(SkipList::with_options_in(opts, cmp, alloc))
  }

  /// Returns the number of entries.
  #[inline]
  pub fn len(&self) -> usize {
    self.0.len()
  }

  /// Returns `true` if the map holds no entries.
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

  /// Returns the options the map was created with.
  #[inline]
  pub const fn options(&self) -> &Options {
    self.0.options()
  }

  /// Returns the entry with the smallest key.
  #[inline]
  pub fn first_key_value(&self) -> Option<(&K, &V)> {
    self.0.first().map(|(k, v)| (k, v))
  }

  /// Returns the entry with the largest key.
  #[inline]
  pub fn last_key_value(&self) -> Option<(&K, &V)> {
    self.0.last().map(|(k, v)| (k, v))
  }

  /// Returns an iterator over the entries in key order.
  #[inline]
  pub fn iter(&self) -> Iter<'_, K, V> {
    Iter::new(self.0.iter())
  }

  /// Returns an iterator over the entries in key order, with mutable values.
  #[inline]
  pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
    IterMut::new(self.0.storage_mut())
  }

  /// Returns an iterator over the keys in order.
  #[inline]
  pub fn keys(&self) -> Keys<'_, K, V> {
    Keys::new(self.iter())
  }

  /// Returns an iterator over the values in key order.
  #[inline]
  pub fn values(&self) -> Values<'_, K, V> {
    Values::new(self.iter())
  }

  /// Returns an iterator over mutable values in key order.
  #[inline]
  pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
    ValuesMut::new(self.iter_mut())
  }

  /// Returns a cursor at the first entry.
  #[inline]
  pub fn cursor_front(&self) -> Cursor<'_, (K, V)> {
    self.0.cursor_front()
  }

  /// Returns a cursor at the last entry.
  #[inline]
  pub fn cursor_back(&self) -> Cursor<'_, (K, V)> {
    self.0.cursor_back()
  }

  /// Returns a cursor at the end position.
  #[inline]
  pub fn cursor_end(&self) -> Cursor<'_, (K, V)> {
    self.0.cursor_end()
  }

  /// Returns a mutable cursor at the first entry.
  #[inline]
  pub fn cursor_front_mut(&mut self) -> CursorMut<'_, SelectFirst<K, V>, C, A> {
    self.0.cursor_front_mut()
  }

  /// Returns a mutable cursor at the last entry.
  #[inline]
  pub fn cursor_back_mut(&mut self) -> CursorMut<'_, SelectFirst<K, V>, C, A> {
    self.0.cursor_back_mut()
  }

  /// Returns a mutable cursor at the end position.
  #[inline]
  pub fn cursor_end_mut(&mut self) -> CursorMut<'_, SelectFirst<K, V>, C, A> {
    self.0.cursor_end_mut()
  }

  /// Removes every entry.
  #[inline]
  pub fn clear(&mut self) {
    self.0.clear()
  }

  /// Moves the entries out of `self` in O(1), leaving `self` empty.
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

impl<K: Clone, V: Clone, C: Clone, A: Allocator> SkipMap<K, V, C, A> {
  /// Copies the map, see [`SkipList::try_clone`].
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

impl<K, V, C: Comparator<K>, A: Allocator> SkipMap<K, V, C, A> {
  /// Inserts `value` under `key` if the key is absent.
  ///
  /// Returns a cursor at the entry with `key` and whether the entry was
  /// inserted. An existing entry keeps its value.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use skl_ord::SkipMap;
  ///
  /// let mut map = SkipMap::new();
  /// map.insert(1, "a").unwrap();
  /// let (cursor, inserted) = map.insert(1, "z").unwrap();
  /// assert!(!inserted);
  /// assert_eq!(cursor.value(), Some(&"a"));
  /// ```
  #[inline]
  pub fn insert(&mut self, key: K, value: V) -> Result<(Cursor<'_, (K, V)>, bool), Error> {
    self.0.insert((key, value))
  }

  /// Inserts `value` under `key` with a tower of exactly `height` levels.
  #[inline]
  pub fn insert_at_height(
    &mut self,
    height: Height,
    key: K,
    value: V,
  ) -> Result<(Cursor<'_, (K, V)>, bool), Error> {
    self.0.insert_at_height(height, (key, value))
  }

  /// Returns the value under `key`, inserting the one built by `f` if the key is absent.
  ///
  /// `f` is only called when the key is absent.
  pub fn get_or_insert_with<F>(&mut self, key: K, f: F) -> Result<&mut V, Error>
  where
    F: FnOnce() -> V,
  {
    let id = self.0.get_or_insert_key(key, |k| (k, f()))?;
    Ok(&mut self.0.value_mut(id).1)
  }

  /// Returns the value under `key`, inserting `V::default()` if the key is absent.
  #[inline]
  pub fn get_or_insert_default(&mut self, key: K) -> Result<&mut V, Error>
  where
    V: Default,
  {
    self.get_or_insert_with(key, V::default)
  }

  /// Inserts every entry of `iter`, stopping at the first allocation failure.
  #[inline]
  pub fn try_extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) -> Result<(), Error> {
    self.0.try_extend(iter)
  }

  /// Returns the value under `key`.
  #[inline]
  pub fn get<Q>(&self, key: &Q) -> Option<&V>
  where
    K: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    self.0.get(key).map(|(_, v)| v)
  }

  /// Returns the entry under `key`.
  #[inline]
  pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
  where
    K: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    self.0.get(key).map(|(k, v)| (k, v))
  }

  /// Returns a mutable reference to the value under `key`.
  #[inline]
  pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
  where
    K: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    let id = self.0.get_node(key)?;
    Some(&mut self.0.value_mut(id).1)
  }

  /// Returns `true` if the map holds an entry under `key`.
  #[inline]
  pub fn contains_key<Q>(&self, key: &Q) -> bool
  where
    K: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    self.0.contains(key)
  }

  /// Returns the number of entries under `key`, `0` or `1`.
  #[inline]
  pub fn count<Q>(&self, key: &Q) -> usize
  where
    K: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    self.0.count(key)
  }

  /// Returns a cursor at the entry under `key`, or at the end position.
  #[inline]
  pub fn find<Q>(&self, key: &Q) -> Cursor<'_, (K, V)>
  where
    K: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    self.0.find(key)
  }

  /// Returns a cursor at the first entry whose key is not ordered before `key`.
  #[inline]
  pub fn lower_bound<Q>(&self, key: &Q) -> Cursor<'_, (K, V)>
  where
    K: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    self.0.lower_bound(key)
  }

  /// Returns a cursor at the first entry whose key is ordered after `key`.
  #[inline]
  pub fn upper_bound<Q>(&self, key: &Q) -> Cursor<'_, (K, V)>
  where
    K: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    self.0.upper_bound(key)
  }

  /// Returns `(lower_bound(key), upper_bound(key))`.
  #[inline]
  pub fn equal_range<Q>(&self, key: &Q) -> (Cursor<'_, (K, V)>, Cursor<'_, (K, V)>)
  where
    K: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    self.0.equal_range(key)
  }

  /// Removes the entry under `key` and returns a cursor at the entry that followed it.
  #[inline]
  pub fn erase<Q>(&mut self, key: &Q) -> CursorMut<'_, SelectFirst<K, V>, C, A>
  where
    K: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    self.0.erase(key)
  }

  /// Removes the entry under `key` and returns its value.
  #[inline]
  pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
  where
    K: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    self.0.remove(key).map(|(_, v)| v)
  }

  /// Removes the entry under `key` and returns it.
  #[inline]
  pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
  where
    K: Borrow<Q>,
    C: Comparator<Q>,
    Q: ?Sized,
  {
    self.0.remove(key)
  }

  /// Removes the entry with the smallest key and returns it.
  #[inline]
  pub fn pop_first(&mut self) -> Option<(K, V)> {
    self.0.pop_first()
  }

  /// Removes the entry with the largest key and returns it.
  #[inline]
  pub fn pop_last(&mut self) -> Option<(K, V)> {
    self.0.pop_last()
  }
}

impl<K: Clone, V: Clone, C: Clone, A: Allocator> Clone for SkipMap<K, V, C, A> {
  #[inline]
  fn clone(&self) -> Self {
    Self(self.0.clone())
  }
}

impl<K: fmt::Debug, V: fmt::Debug, C, A: Allocator> fmt::Debug for SkipMap<K, V, C, A> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map().entries(self.iter()).finish()
  }
}

impl<K: PartialEq, V: PartialEq, C, A: Allocator> PartialEq for SkipMap<K, V, C, A> {
  #[inline]
  fn eq(&self, other: &Self) -> bool {
    self.0 == other.0
  }
}

impl<K: Eq, V: Eq, C, A: Allocator> Eq for SkipMap<K, V, C, A> {}

impl<K: PartialOrd, V: PartialOrd, C, A: Allocator> PartialOrd for SkipMap<K, V, C, A> {
  #[inline]
  fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
    self.0.partial_cmp(&other.0)
  }
}

impl<K: Ord, V: Ord, C, A: Allocator> Ord for SkipMap<K, V, C, A> {
  #[inline]
  fn cmp(&self, other: &Self) -> core::cmp::Ordering {
    self.0.cmp(&other.0)
  }
}

impl<K, V, C, A> FromIterator<(K, V)> for SkipMap<K, V, C, A>
where
  C: Comparator<K> + Default,
  A: Allocator + Default,
{
  /// ## Panics
  /// - If the allocator refuses a node.
  #[inline]
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self(SkipList::from_iter(iter))
  }
}

impl<K, V, C, A: Allocator> IntoIterator for SkipMap<K, V, C, A> {
  type Item = (K, V);
  type IntoIter = IntoIter<K, V, A>;

  #[inline]
  fn into_iter(self) -> Self::IntoIter {
    IntoIter::new(self.0.into_iter())
  }
}

impl<'a, K, V, C, A: Allocator> IntoIterator for &'a SkipMap<K, V, C, A> {
  type Item = (&'a K, &'a V);
  type IntoIter = Iter<'a, K, V>;

  #[inline]
  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl<'a, K, V, C, A: Allocator> IntoIterator for &'a mut SkipMap<K, V, C, A> {
  type Item = (&'a K, &'a mut V);
  type IntoIter = IterMut<'a, K, V>;

  #[inline]
  fn into_iter(self) -> Self::IntoIter {
    self.iter_mut()
  }
}
