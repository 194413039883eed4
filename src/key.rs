use core::{borrow::Borrow, cmp::Ordering, marker::PhantomData};

use super::Comparator;

/// Describes how a stored value yields the key it is ordered by.
///
/// A skiplist stores values of type [`KeyTraits::Value`] and orders them by
/// the [`KeyTraits::Key`] extracted from each one. Sets store the key itself
/// ([`Identity`]), maps store `(key, value)` pairs and order by the first
/// component ([`SelectFirst`]).
pub trait KeyTraits {
  /// The type the skiplist orders by.
  type Key;

  /// The type the skiplist stores.
  type Value;

  /// Extracts the key from a stored value.
  fn key(value: &Self::Value) -> &Self::Key;

  /// Compares the key of `value` with `key` using `cmp`.
  #[inline]
  fn compare<C, Q>(cmp: &C, value: &Self::Value, key: &Q) -> Ordering
  where
    C: Comparator<Q>,
    Self::Key: Borrow<Q>,
    Q: ?Sized,
  {
    cmp.compare(Self::key(value).borrow(), key)
  }
}

/// The set policy, a value is its own key.
pub struct Identity<T>(PhantomData<T>);

impl<T> KeyTraits for Identity<T> {
  type Key = T;
  type Value = T;

  #[inline]
  fn key(value: &T) -> &T {
    value
  }
}

/// The map policy, values are `(key, mapped)` pairs ordered by the key.
pub struct SelectFirst<K, V>(PhantomData<(K, V)>);

impl<K, V> KeyTraits for SelectFirst<K, V> {
  type Key = K;
  type Value = (K, V);

  #[inline]
  fn key(value: &(K, V)) -> &K {
    &value.0
  }
}
