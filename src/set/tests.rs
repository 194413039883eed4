use super::*;
use crate::{AlwaysPropagate, Descend, NeverPropagate, Pool};
use std::{format, string::String, vec::Vec};

fn make_int_key(i: usize) -> String {
  format!("{:05}", i)
}

fn seeded() -> Options {
  Options::new().with_seed(Some(1))
}

fn empty_in<A: Allocator>(l: SkipSet<String, Ascend, A>) {
  assert!(l.is_empty());
  assert!(l.first().is_none());
  assert!(l.last().is_none());
  assert!(l.get("aaa").is_none());
  assert!(!l.contains("aaa"));
  assert!(l.find("aaa").is_end());
  assert!(l.lower_bound("aaa").is_end());
  assert_eq!(l.iter().next(), None);
}

#[test]
fn test_empty() {
  empty_in(SkipSet::with_options(seeded()));
}

#[test]
fn test_empty_pool() {
  empty_in(SkipSet::with_options_in(
    seeded(),
    Ascend,
    Pool::<NeverPropagate>::new(),
  ));
}

fn basic_in<A: Allocator>(mut l: SkipSet<String, Ascend, A>) {
  for i in (0..100).rev() {
    assert!(l.insert(make_int_key(i)).unwrap().1);
  }
  assert_eq!(l.len(), 100);
  for i in 0..100 {
    let k = make_int_key(i);
    assert_eq!(l.get(k.as_str()), Some(&k));
    assert_eq!(l.count(k.as_str()), 1);
  }
  assert_eq!(l.first().map(String::as_str), Some("00000"));
  assert_eq!(l.last().map(String::as_str), Some("00099"));

  let (lo, hi) = l.equal_range("00050");
  assert_eq!(lo.current().map(String::as_str), Some("00050"));
  assert_eq!(hi.current().map(String::as_str), Some("00051"));
  assert_eq!(
    l.upper_bound("00050x").current().map(String::as_str),
    Some("00051")
  );

  for i in (0..100).step_by(2) {
    assert_eq!(l.remove(make_int_key(i).as_str()), Some(make_int_key(i)));
  }
  assert_eq!(l.len(), 50);
  assert!(l.iter().all(|k| k.ends_with(['1', '3', '5', '7', '9'])));
  l.0.check_invariants();

  assert_eq!(l.pop_first().as_deref(), Some("00001"));
  assert_eq!(l.pop_last().as_deref(), Some("00099"));
  l.clear();
  assert!(l.is_empty());
}

#[test]
fn test_basic() {
  basic_in(SkipSet::with_options(seeded()));
}

#[test]
fn test_basic_pool() {
  let pool = Pool::<AlwaysPropagate>::new();
  basic_in(SkipSet::with_options_in(seeded(), Ascend, pool.clone()));
  assert_eq!(pool.nodes(), 0);
}

#[test]
fn test_scenario() {
  let mut set = SkipSet::with_options(seeded());
  set.try_extend([5, 3, 8, 1, 9, 2]).unwrap();
  assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 5, 8, 9]);

  let mut c = set.erase(&8);
  assert_eq!(c.current(), Some(&9));
  c.move_prev();
  assert_eq!(c.current(), Some(&5));

  assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 5, 9]);
  assert_eq!(set.len(), 5);
  assert!(set.find(&8).is_end());
  assert_eq!(set.find(&9).current(), Some(&9));
}

#[test]
fn test_insert_existing_keeps_original() {
  #[derive(Debug, Clone)]
  struct Tagged(u32, &'static str);

  impl PartialEq for Tagged {
    fn eq(&self, other: &Self) -> bool {
      self.0 == other.0
    }
  }
  impl Eq for Tagged {}
  impl PartialOrd for Tagged {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
      Some(self.cmp(other))
    }
  }
  impl Ord for Tagged {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
      self.0.cmp(&other.0)
    }
  }

  let mut set = SkipSet::with_options(seeded());
  set.insert(Tagged(1, "first")).unwrap();
  let (c, inserted) = set.insert(Tagged(1, "second")).unwrap();
  assert!(!inserted);
  assert_eq!(c.current().map(|t| t.1), Some("first"));
  assert_eq!(set.len(), 1);
}

#[test]
#[should_panic(expected = "new value is not equal to the key")]
fn test_get_or_insert_with_mismatched_value() {
  let mut set = SkipSet::with_options(seeded());
  set.try_extend([10, 20, 30]).unwrap();
  assert_eq!(set.get_or_insert_with(&20, || unreachable!()), Ok(&20));
  let _ = set.get_or_insert_with(&15, || 99);
}

#[test]
fn test_descend() {
  let mut set = SkipSet::with_options_and_comparator(seeded(), Descend);
  set.try_extend(["b", "c", "a"]).unwrap();
  assert_eq!(set.iter().copied().collect::<Vec<_>>(), ["c", "b", "a"]);
  assert_eq!(set.iter().rev().copied().collect::<Vec<_>>(), ["a", "b", "c"]);
  assert_eq!(set.first(), Some(&"c"));
}

#[test]
fn test_cursor_mut_retain() {
  let mut set: SkipSet<u32> = (0..20).collect();
  let mut c = set.cursor_front_mut();
  while !c.is_end() {
    if c.current().is_some_and(|v| v % 3 != 0) {
      c.remove_current();
    } else {
      c.move_next();
    }
  }
  assert_eq!(set.iter().copied().collect::<Vec<_>>(), [0, 3, 6, 9, 12, 15, 18]);
}

#[test]
fn test_lifecycle() {
  let pool = Pool::<NeverPropagate>::new();
  let mut a = SkipSet::with_options_in(seeded(), Ascend, pool.clone());
  a.try_extend([1, 2, 3]).unwrap();

  let b = a.try_clone().unwrap();
  assert_eq!(a, b);
  assert_eq!(pool.nodes(), 6);

  let mut c = a.take();
  assert!(a.is_empty());
  assert_eq!(c, b);

  let mut d = SkipSet::with_options_in(seeded(), Ascend, Pool::<NeverPropagate>::new());
  d.insert(42).unwrap();
  assert_eq!(c.try_swap(&mut d).unwrap_err(), Error::IncompatibleAllocators);

  d.try_move_from(&mut c).unwrap();
  assert!(c.is_empty());
  assert_eq!(d, b);
  assert_eq!(pool.nodes(), 3);

  a.try_clone_from(&d).unwrap();
  assert_eq!(a, d);
  assert_eq!(pool.nodes(), 6);
}

#[test]
fn test_traits() {
  let a: SkipSet<u32> = [3, 1, 2].into_iter().collect();
  let b = a.clone();
  assert_eq!(a, b);
  assert_eq!(format!("{a:?}"), "{1, 2, 3}");
  assert!(a < [1, 2, 4].into_iter().collect());

  let mut sum = 0;
  for v in &a {
    sum += v;
  }
  assert_eq!(sum, 6);
  assert_eq!(a.into_iter().rev().collect::<Vec<_>>(), [3, 2, 1]);
}
