use std::collections::{BTreeMap, BTreeSet};

use rand::{rngs::SmallRng, Rng, SeedableRng};
use skl_ord::{Ascend, Error, NeverPropagate, Options, Pool, SkipMap, SkipSet};

const ROUNDS: usize = 20_000;
const KEYS: u32 = 512;

fn opts(seed: u64) -> Options {
  Options::new().with_seed(Some(seed))
}

fn check_map(map: &SkipMap<u32, u64>, model: &BTreeMap<u32, u64>) {
  assert_eq!(map.len(), model.len());
  assert!(map.iter().eq(model.iter()));
  assert!(map.iter().rev().eq(model.iter().rev()));
  assert_eq!(map.first_key_value(), model.first_key_value());
  assert_eq!(map.last_key_value(), model.last_key_value());
}

#[test]
fn map_matches_btreemap() {
  let mut rng = SmallRng::seed_from_u64(0x5eed);
  let mut map = SkipMap::with_options(opts(1));
  let mut model = BTreeMap::new();

  for round in 0..ROUNDS {
    let k = rng.random_range(0..KEYS);
    match rng.random_range(0..6) {
      0 | 1 => {
        let v = rng.random::<u64>();
        let inserted = map.insert(k, v).unwrap().1;
        assert_eq!(inserted, !model.contains_key(&k));
        model.entry(k).or_insert(v);
      }
      2 => assert_eq!(map.remove(&k), model.remove(&k)),
      3 => {
        // the cursor lands on the successor whether or not `k` was present
        let expect = model.range(k + 1..).next().map(|(k, _)| *k);
        assert_eq!(map.erase(&k).key().copied(), expect);
        model.remove(&k);
      }
      4 => {
        *map.get_or_insert_default(k).unwrap() += 1;
        *model.entry(k).or_default() += 1;
      }
      _ => {
        assert_eq!(map.get(&k), model.get(&k));
        assert_eq!(
          map.lower_bound(&k).key(),
          model.range(k..).next().map(|(k, _)| k)
        );
        assert_eq!(
          map.upper_bound(&k).key(),
          model.range(k + 1..).next().map(|(k, _)| k)
        );
      }
    }

    if round % 1000 == 0 {
      check_map(&map, &model);
    }
  }
  check_map(&map, &model);

  while let Some((k, v)) = map.pop_first() {
    assert_eq!(model.pop_first(), Some((k, v)));
  }
  assert!(model.is_empty());
}

#[test]
fn set_matches_btreeset() {
  let mut rng = SmallRng::seed_from_u64(0xfeed);
  let mut set = SkipSet::with_options(opts(2));
  let mut model = BTreeSet::new();

  for _ in 0..ROUNDS {
    let k = rng.random_range(0..KEYS);
    if rng.random_bool(0.6) {
      assert_eq!(set.insert(k).unwrap().1, model.insert(k));
    } else {
      assert_eq!(set.remove(&k), model.take(&k));
    }
  }

  assert!(set.iter().eq(model.iter()));
  let copy = set.try_clone().unwrap();
  assert!(copy.into_iter().eq(model.into_iter()));
  assert!(set.height() as usize <= skl_ord::MAX_HEIGHT);
}

#[test]
fn pool_limit_is_respected() {
  let pool = Pool::<NeverPropagate>::with_limit(100);
  let mut set = SkipSet::with_options_in(opts(3), Ascend, pool.clone());
  let mut rng = SmallRng::seed_from_u64(7);
  let mut model = BTreeSet::new();

  for _ in 0..5_000 {
    let k = rng.random_range(0..1_000u32);
    if rng.random_bool(0.7) {
      match set.insert(k) {
        Ok((_, inserted)) => assert_eq!(inserted, model.insert(k)),
        Err(e) => {
          assert_eq!(e, Error::Full { limit: 100 });
          assert_eq!(model.len(), 100);
          assert!(!model.contains(&k));
        }
      }
    } else {
      assert_eq!(set.remove(&k).is_some(), model.remove(&k));
    }
    assert_eq!(pool.nodes(), model.len());
  }

  assert!(set.iter().eq(model.iter()));
  drop(set);
  assert_eq!(pool.nodes(), 0);
  assert_eq!(pool.bytes(), 0);
}
