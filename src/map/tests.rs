use super::*;
use crate::{AlwaysPropagate, Descend, NeverPropagate, Pool};
use std::{
  format,
  string::{String, ToString},
  vec::Vec,
};

fn make_int_key(i: usize) -> String {
  format!("{:05}", i)
}

fn make_value(i: usize) -> String {
  format!("v{:05}", i)
}

fn seeded() -> Options {
  Options::new().with_seed(Some(3))
}

fn empty_in<A: Allocator>(mut l: SkipMap<String, String, Ascend, A>) {
  assert!(l.is_empty());
  assert!(l.first_key_value().is_none());
  assert!(l.last_key_value().is_none());
  assert!(l.get("aaa").is_none());
  assert!(l.get_mut("aaa").is_none());
  assert!(!l.contains_key("aaa"));
  assert!(l.remove("aaa").is_none());
  assert!(l.pop_first().is_none());
  assert!(l.find("aaa").is_end());
  assert_eq!(l.iter().len(), 0);
  assert_eq!(l.iter_mut().len(), 0);
}

#[test]
fn test_empty() {
  empty_in(SkipMap::with_options(seeded()));
}

#[test]
fn test_empty_pool() {
  empty_in(SkipMap::with_options_in(
    seeded(),
    Ascend,
    Pool::<NeverPropagate>::new(),
  ));
}

#[test]
fn test_scenario() {
  let mut map = SkipMap::with_options(seeded());
  assert!(map.insert(1, "a").unwrap().1);
  assert!(map.insert(2, "b").unwrap().1);

  let c = map.find(&1);
  assert_eq!(c.key(), Some(&1));
  assert_eq!(c.value(), Some(&"a"));

  let (c, inserted) = map.insert(1, "z").unwrap();
  assert!(!inserted);
  assert_eq!(c.value(), Some(&"a"));
  assert_eq!(map.get(&1), Some(&"a"));
  assert_eq!(map.len(), 2);
}

fn basic_in<A: Allocator>(mut l: SkipMap<String, String, Ascend, A>) {
  for i in 0..100 {
    assert!(l.insert(make_int_key(i), make_value(i)).unwrap().1);
  }
  l.0.check_invariants();

  for i in 0..100 {
    let k = make_int_key(i);
    assert_eq!(l.get(k.as_str()), Some(&make_value(i)));
    assert_eq!(
      l.get_key_value(k.as_str()),
      Some((&k, &make_value(i)))
    );
  }
  assert_eq!(
    l.first_key_value(),
    Some((&make_int_key(0), &make_value(0)))
  );
  assert_eq!(
    l.last_key_value(),
    Some((&make_int_key(99), &make_value(99)))
  );

  *l.get_mut("00042").unwrap() = "changed".to_string();
  assert_eq!(l.get("00042").map(String::as_str), Some("changed"));

  assert_eq!(l.remove("00042").as_deref(), Some("changed"));
  assert_eq!(
    l.remove_entry("00043"),
    Some((make_int_key(43), make_value(43)))
  );
  assert_eq!(l.len(), 98);
  assert_eq!(l.lower_bound("00042").key().map(String::as_str), Some("00044"));
  assert_eq!(l.upper_bound("00041").key().map(String::as_str), Some("00044"));
  l.0.check_invariants();
}

#[test]
fn test_basic() {
  basic_in(SkipMap::with_options(seeded()));
}

#[test]
fn test_basic_pool() {
  let pool = Pool::<AlwaysPropagate>::new();
  basic_in(SkipMap::with_options_in(seeded(), Ascend, pool.clone()));
  assert_eq!(pool.nodes(), 0);
}

#[test]
fn test_get_or_insert() {
  let mut map = SkipMap::<&str, usize>::with_options(seeded());
  for word in ["a", "b", "a", "c", "a", "b"] {
    *map.get_or_insert_default(word).unwrap() += 1;
  }
  assert_eq!(map.iter().collect::<Vec<_>>(), [(&"a", &3), (&"b", &2), (&"c", &1)]);

  let v = map
    .get_or_insert_with("a", || unreachable!("key is present"))
    .unwrap();
  assert_eq!(*v, 3);
  let v = map.get_or_insert_with("d", || 10).unwrap();
  *v += 1;
  assert_eq!(map.get(&"d"), Some(&11));
  map.0.check_invariants();
}

#[test]
fn test_get_or_insert_full() {
  let pool = Pool::<NeverPropagate>::with_limit(1);
  let mut map = SkipMap::with_options_in(seeded(), Ascend, pool);
  map.insert(1, 1).unwrap();
  *map.get_or_insert_default(1).unwrap() += 1;
  assert_eq!(
    map.get_or_insert_default(2).unwrap_err(),
    Error::Full { limit: 1 }
  );
  assert_eq!(map.iter().collect::<Vec<_>>(), [(&1, &2)]);
}

#[test]
fn test_iter_mut() {
  let mut map: SkipMap<u32, u32> = (0..10).map(|i| (i, i)).collect();
  for (k, v) in map.iter_mut() {
    *v = k * 10;
  }
  for v in map.values_mut().rev().take(2) {
    *v += 1;
  }
  for (_, v) in &mut map {
    *v += 1;
  }
  assert_eq!(
    map.values().copied().collect::<Vec<_>>(),
    [1, 11, 21, 31, 41, 51, 61, 71, 82, 92]
  );
  assert_eq!(map.keys().copied().collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());

  // both ends meet without yielding an entry twice
  let mut it = map.iter_mut();
  let mut seen = 0;
  while let (Some(_), Some(_)) = (it.next(), it.next_back()) {
    seen += 2;
  }
  assert_eq!(seen, 10);
  assert!(it.next().is_none());
}

#[test]
fn test_cursor_mut() {
  let mut map: SkipMap<u32, &str> = [(1, "a"), (2, "b"), (3, "c")].into_iter().collect();
  let mut c = map.cursor_front_mut();
  assert_eq!(c.key(), Some(&1));
  if let Some(v) = c.value_mut() {
    *v = "A";
  }
  c.move_next();
  assert_eq!(c.remove_current(), Some((2, "b")));
  assert_eq!(c.key(), Some(&3));
  assert_eq!(c.value(), Some(&"c"));
  c.move_next();
  assert!(c.is_end());
  assert!(c.value_mut().is_none());

  let mut c = map.erase(&1);
  assert_eq!(c.key(), Some(&3));
  assert_eq!(c.peek_prev(), None);
  c.move_prev();
  assert!(c.is_end());
  assert_eq!(map.iter().collect::<Vec<_>>(), [(&3, &"c")]);
}

#[test]
fn test_descend() {
  let mut map = SkipMap::with_options_and_comparator(seeded(), Descend);
  map.try_extend([(1, 'a'), (3, 'c'), (2, 'b')]).unwrap();
  assert_eq!(map.keys().copied().collect::<Vec<_>>(), [3, 2, 1]);
  assert_eq!(map.pop_first(), Some((3, 'c')));
  assert_eq!(map.pop_last(), Some((1, 'a')));
  let (lo, hi) = map.equal_range(&2);
  assert_eq!(lo.value(), Some(&'b'));
  assert!(hi.is_end());
}

#[test]
fn test_lifecycle() {
  let pa = Pool::<NeverPropagate>::new();
  let mut a = SkipMap::with_options_in(seeded(), Ascend, pa.clone());
  a.try_extend((0..5).map(|i| (i, make_value(i)))).unwrap();

  let b = a.try_clone().unwrap();
  assert_eq!(a, b);
  let mut moved = a.take();
  assert!(a.is_empty());
  assert_eq!(moved, b);

  let pb = Pool::<NeverPropagate>::new();
  let mut c = SkipMap::with_options_in(seeded(), Ascend, pb.clone());
  assert_eq!(
    c.try_swap(&mut moved).unwrap_err(),
    Error::IncompatibleAllocators
  );
  c.try_move_from(&mut moved).unwrap();
  assert_eq!(c, b);
  assert_eq!(pb.nodes(), 5);
  assert_eq!(pa.nodes(), 5);

  let mut d = SkipMap::with_options_in(seeded(), Ascend, pb.clone());
  d.try_clone_from(&c).unwrap();
  assert_eq!(d, c);
  assert_eq!(pb.nodes(), 10);
  d.try_swap(&mut c).unwrap();
}

#[test]
fn test_traits() {
  let a: SkipMap<u32, char> = [(2, 'b'), (1, 'a')].into_iter().collect();
  assert_eq!(format!("{a:?}"), "{1: 'a', 2: 'b'}");
  let b = a.clone();
  assert_eq!(a, b);
  assert!(a < [(1, 'a'), (2, 'c')].into_iter().collect());
  assert_eq!(
    b.into_iter().rev().collect::<Vec<_>>(),
    [(2, 'b'), (1, 'a')]
  );
  assert_eq!((&a).into_iter().count(), 2);
}
