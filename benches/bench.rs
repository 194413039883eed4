use std::collections::{BTreeMap, BTreeSet};

use criterion::*;
use rand::prelude::*;
use skl_ord::{Options, SkipMap, SkipSet};

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

fn random_keys(n: usize) -> Vec<u64> {
  let mut rng = SmallRng::seed_from_u64(42);
  (0..n).map(|_| rng.random()).collect()
}

fn filled_set(keys: &[u64]) -> SkipSet<u64> {
  let mut set = SkipSet::with_options(Options::new().with_seed(Some(7)));
  set.try_extend(keys.iter().copied()).unwrap();
  set
}

fn bench_insert(c: &mut Criterion) {
  let mut group = c.benchmark_group("insert");
  for n in SIZES {
    let keys = random_keys(n);
    group.throughput(Throughput::Elements(n as u64));
    group.bench_with_input(BenchmarkId::new("skipset", n), &keys, |b, keys| {
      b.iter_batched(
        || SkipSet::with_options(Options::new().with_seed(Some(7))),
        |mut set| {
          for k in keys {
            set.insert(*k).unwrap();
          }
          set
        },
        BatchSize::LargeInput,
      )
    });
    group.bench_with_input(BenchmarkId::new("btreeset", n), &keys, |b, keys| {
      b.iter_batched(
        BTreeSet::new,
        |mut set| {
          for k in keys {
            set.insert(*k);
          }
          set
        },
        BatchSize::LargeInput,
      )
    });
  }
  group.finish();
}

fn bench_get(c: &mut Criterion) {
  let mut group = c.benchmark_group("get");
  for n in SIZES {
    let keys = random_keys(n);
    let set = filled_set(&keys);
    let model: BTreeSet<u64> = keys.iter().copied().collect();
    let mut rng = SmallRng::seed_from_u64(1);

    group.bench_function(BenchmarkId::new("skipset", n), |b| {
      b.iter_batched_ref(
        || keys[rng.random_range(0..keys.len())],
        |k| black_box(set.contains(k)),
        BatchSize::SmallInput,
      )
    });
    group.bench_function(BenchmarkId::new("btreeset", n), |b| {
      b.iter_batched_ref(
        || keys[rng.random_range(0..keys.len())],
        |k| black_box(model.contains(k)),
        BatchSize::SmallInput,
      )
    });
  }
  group.finish();
}

fn bench_iter(c: &mut Criterion) {
  let mut group = c.benchmark_group("iter");
  for n in SIZES {
    let keys = random_keys(n);
    let mut map = SkipMap::new();
    let mut model = BTreeMap::new();
    for (i, k) in keys.iter().enumerate() {
      map.insert(*k, i).unwrap();
      model.insert(*k, i);
    }

    group.throughput(Throughput::Elements(n as u64));
    group.bench_function(BenchmarkId::new("skipmap", n), |b| {
      b.iter(|| map.values().sum::<usize>())
    });
    group.bench_function(BenchmarkId::new("btreemap", n), |b| {
      b.iter(|| model.values().sum::<usize>())
    });
  }
  group.finish();
}

fn bench_remove(c: &mut Criterion) {
  let mut group = c.benchmark_group("remove");
  for n in SIZES {
    let keys = random_keys(n);
    group.throughput(Throughput::Elements(n as u64));
    group.bench_with_input(BenchmarkId::new("skipset", n), &keys, |b, keys| {
      b.iter_batched(
        || filled_set(keys),
        |mut set| {
          for k in keys {
            set.remove(k);
          }
          set
        },
        BatchSize::LargeInput,
      )
    });
  }
  group.finish();
}

criterion_group!(benches, bench_insert, bench_get, bench_iter, bench_remove);
criterion_main!(benches);
