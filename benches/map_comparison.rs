use alloc::format;
use core::hash::BuildHasherDefault;
use core::hash::Hash;
use core::hint::black_box;
use std::collections::HashMap as StdHashMap;

use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::HashMap as HashbrownHashMap;
use rand::Rng;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::distr;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;
use siphasher::sip::SipHasher;
use slot_hash::Config;
use slot_hash::HashMap as SlotHashMap;
use slot_hash::probe::ProbeStrategy;

extern crate alloc;

// Every map hashes with the same function so only the table layout differs.
type SipState = BuildHasherDefault<SipHasher>;

trait TestKey: Clone + Hash + Eq {
    fn new(key: u64) -> Self;
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct StringKey(String);

impl TestKey for StringKey {
    fn new(key: u64) -> Self {
        black_box(Self(format!("key_{:016X}", key)))
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct SmallKey(u64);

impl TestKey for SmallKey {
    fn new(key: u64) -> Self {
        black_box(Self(key))
    }
}

/// Operations shared by every map under comparison.
trait BenchMap<K> {
    const NAME: &'static str;

    fn with_capacity(capacity: usize) -> Self;
    fn insert(&mut self, key: K, value: u64) -> Option<u64>;
    fn get(&self, key: &K) -> Option<&u64>;
    fn remove(&mut self, key: &K) -> Option<u64>;
    fn sum_values(&self) -> u64;
}

struct SlotLinear<K>(SlotHashMap<K, u64, SipState>);
struct SlotDoubleHash<K>(SlotHashMap<K, u64, SipState>);

macro_rules! impl_bench_map {
    ($ty:ident, $name:literal, |$cap:ident| $ctor:expr) => {
        impl<K: TestKey> BenchMap<K> for $ty<K> {
            const NAME: &'static str = $name;

            fn with_capacity($cap: usize) -> Self {
                $ty($ctor)
            }

            fn insert(&mut self, key: K, value: u64) -> Option<u64> {
                self.0.insert(key, value)
            }

            fn get(&self, key: &K) -> Option<&u64> {
                self.0.get(key)
            }

            fn remove(&mut self, key: &K) -> Option<u64> {
                self.0.remove(key)
            }

            fn sum_values(&self) -> u64 {
                self.0.values().fold(0u64, |acc, v| acc.wrapping_add(*v))
            }
        }
    };
}

struct Hashbrown<K>(HashbrownHashMap<K, u64, SipState>);
struct Std<K>(StdHashMap<K, u64, SipState>);

impl_bench_map!(SlotLinear, "slot_hash_linear", |capacity| {
    SlotHashMap::with_config_and_hasher(capacity, Config::new(), SipState::default())
});
impl_bench_map!(SlotDoubleHash, "slot_hash_double", |capacity| {
    SlotHashMap::with_config_and_hasher(
        capacity,
        Config::new().with_probe_strategy(ProbeStrategy::DoubleHash),
        SipState::default(),
    )
});
impl_bench_map!(Hashbrown, "hashbrown", |capacity| {
    HashbrownHashMap::with_capacity_and_hasher(capacity, SipState::default())
});
impl_bench_map!(Std, "std", |capacity| {
    StdHashMap::with_capacity_and_hasher(capacity, SipState::default())
});

const SIZES: &[usize] = &[
    (1 << 10),
    (1 << 11),
    (1 << 12),
    (1 << 13),
    (1 << 14),
    (1 << 15),
    (1 << 16),
    (1 << 17),
    (1 << 18),
];

fn random_keys<K: TestKey>(count: usize) -> Vec<K> {
    let mut rng = OsRng;
    (0..count)
        .map(|_| K::new(rng.try_next_u64().unwrap()))
        .collect()
}

fn filled<K: TestKey, M: BenchMap<K>>(keys: &[K]) -> M {
    let mut map = M::with_capacity(0);
    for (i, key) in keys.iter().cloned().enumerate() {
        map.insert(key, i as u64);
    }
    map
}

fn insert_random<K: TestKey, M: BenchMap<K>>(
    group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
    keys: &[K],
    preallocate: bool,
) {
    group.bench_function(M::NAME, |b| {
        b.iter_batched(
            || {
                let mut keys = keys.to_vec();
                keys.shuffle(&mut SmallRng::from_os_rng());
                keys
            },
            |keys| {
                let mut map = M::with_capacity(if preallocate { keys.len() } else { 0 });
                for (i, key) in keys.into_iter().enumerate() {
                    black_box(map.insert(key, i as u64));
                }
                black_box(map)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_random<K: TestKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("insert_random_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(*size);

        group.throughput(Throughput::Elements(*size as u64));
        insert_random::<K, SlotLinear<K>>(&mut group, &keys, false);
        insert_random::<K, SlotDoubleHash<K>>(&mut group, &keys, false);
        insert_random::<K, Hashbrown<K>>(&mut group, &keys, false);
        insert_random::<K, Std<K>>(&mut group, &keys, false);
    }

    group.finish();
}

fn bench_insert_random_preallocated<K: TestKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!(
        "insert_random_preallocated_{}",
        core::any::type_name::<K>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(*size);

        group.throughput(Throughput::Elements(*size as u64));
        insert_random::<K, SlotLinear<K>>(&mut group, &keys, true);
        insert_random::<K, SlotDoubleHash<K>>(&mut group, &keys, true);
        insert_random::<K, Hashbrown<K>>(&mut group, &keys, true);
        insert_random::<K, Std<K>>(&mut group, &keys, true);
    }

    group.finish();
}

fn find<K: TestKey, M: BenchMap<K>>(
    group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
    present: &[K],
    probes: &[K],
) {
    let map: M = filled(present);
    group.bench_function(M::NAME, |b| {
        b.iter(|| {
            for key in probes {
                black_box(map.get(key));
            }
        })
    });
}

fn bench_find_hit<K: TestKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("find_hit_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(*size);
        let mut probes = keys.clone();
        probes.shuffle(&mut SmallRng::from_os_rng());

        group.throughput(Throughput::Elements(*size as u64));
        find::<K, SlotLinear<K>>(&mut group, &keys, &probes);
        find::<K, SlotDoubleHash<K>>(&mut group, &keys, &probes);
        find::<K, Hashbrown<K>>(&mut group, &keys, &probes);
        find::<K, Std<K>>(&mut group, &keys, &probes);
    }

    group.finish();
}

fn bench_find_miss<K: TestKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("find_miss_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES[..=MAX_SIZE].iter() {
        // Present keys are even, probes are odd.
        let keys = (0..*size as u64).map(|i| K::new(i * 2)).collect::<Vec<_>>();
        let probes = (0..*size as u64)
            .map(|i| K::new(i * 2 + 1))
            .collect::<Vec<_>>();

        group.throughput(Throughput::Elements(*size as u64));
        find::<K, SlotLinear<K>>(&mut group, &keys, &probes);
        find::<K, SlotDoubleHash<K>>(&mut group, &keys, &probes);
        find::<K, Hashbrown<K>>(&mut group, &keys, &probes);
        find::<K, Std<K>>(&mut group, &keys, &probes);
    }

    group.finish();
}

fn remove<K: TestKey, M: BenchMap<K>>(
    group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
    keys: &[K],
) {
    group.bench_function(M::NAME, |b| {
        b.iter_batched(
            || {
                let map: M = filled(keys);
                let mut order = keys.to_vec();
                order.shuffle(&mut SmallRng::from_os_rng());
                (map, order)
            },
            |(mut map, order)| {
                for key in &order {
                    black_box(map.remove(key));
                }
                black_box(map)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_remove<K: TestKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("remove_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(*size);

        group.throughput(Throughput::Elements(*size as u64));
        remove::<K, SlotLinear<K>>(&mut group, &keys);
        remove::<K, SlotDoubleHash<K>>(&mut group, &keys);
        remove::<K, Hashbrown<K>>(&mut group, &keys);
        remove::<K, Std<K>>(&mut group, &keys);
    }

    group.finish();
}

fn iteration<K: TestKey, M: BenchMap<K>>(
    group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
    keys: &[K],
) {
    let map: M = filled(keys);
    group.bench_function(M::NAME, |b| b.iter(|| black_box(map.sum_values())));
}

fn bench_iteration<K: TestKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("iteration_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(*size);

        group.throughput(Throughput::Elements(*size as u64));
        iteration::<K, SlotLinear<K>>(&mut group, &keys);
        iteration::<K, SlotDoubleHash<K>>(&mut group, &keys);
        iteration::<K, Hashbrown<K>>(&mut group, &keys);
        iteration::<K, Std<K>>(&mut group, &keys);
    }

    group.finish();
}

fn churn<K: TestKey, M: BenchMap<K>>(
    group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
    keys: &[K],
) {
    group.bench_function(M::NAME, |b| {
        b.iter_batched(
            || filled::<K, M>(&keys[..keys.len() / 2]),
            |mut map| {
                // Each step removes the oldest key and inserts a fresh one, so
                // the live count stays flat while tombstones accumulate.
                let half = keys.len() / 2;
                for i in 0..half {
                    black_box(map.remove(&keys[i]));
                    black_box(map.insert(keys[half + i].clone(), i as u64));
                }
                black_box(map)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_churn<K: TestKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("churn_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(*size * 2);

        group.throughput(Throughput::Elements(*size as u64 * 2));
        churn::<K, SlotLinear<K>>(&mut group, &keys);
        churn::<K, SlotDoubleHash<K>>(&mut group, &keys);
        churn::<K, Hashbrown<K>>(&mut group, &keys);
        churn::<K, Std<K>>(&mut group, &keys);
    }

    group.finish();
}

#[derive(Clone, Copy)]
enum Operation {
    Insert(u64),
    Remove(u64),
    Find(u64),
}

fn mixed_zipf<K: TestKey, M: BenchMap<K>>(
    group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
    operations: &[Operation],
) {
    group.bench_function(M::NAME, |b| {
        b.iter(|| {
            let mut map = M::with_capacity(0);
            for op in operations {
                match *op {
                    Operation::Insert(key) => {
                        black_box(map.insert(K::new(key), key));
                    }
                    Operation::Remove(key) => {
                        black_box(map.remove(&K::new(key)));
                    }
                    Operation::Find(key) => {
                        black_box(map.get(&K::new(key)));
                    }
                }
            }
            black_box(map)
        })
    });
}

fn bench_mixed_probabilistic_zipf<K: TestKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!(
        "mixed_probabilistic_zipf_{}",
        core::any::type_name::<K>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    const KEY_SPACE_MULTIPLIER: f32 = 2.0;

    for size in SIZES[..=MAX_SIZE].iter() {
        let mut rng = SmallRng::from_os_rng();
        let key_distr = Zipf::new(*size as f32 * KEY_SPACE_MULTIPLIER - 1.0, 1.0).unwrap();

        let operations = (0..*size * 3)
            .map(|_| {
                let key = rng.sample(key_distr) as u64;
                let op_choice: f64 = rng.sample(distr::Uniform::new(0.0, 1.0).unwrap());
                if op_choice < 0.5 {
                    Operation::Find(key)
                } else if op_choice < 0.75 {
                    Operation::Insert(key)
                } else {
                    Operation::Remove(key)
                }
            })
            .collect::<Vec<Operation>>();

        group.throughput(Throughput::Elements(operations.len() as u64));
        mixed_zipf::<K, SlotLinear<K>>(&mut group, &operations);
        mixed_zipf::<K, SlotDoubleHash<K>>(&mut group, &operations);
        mixed_zipf::<K, Hashbrown<K>>(&mut group, &operations);
        mixed_zipf::<K, Std<K>>(&mut group, &operations);
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_random::<SmallKey, 8>,
    bench_insert_random::<StringKey, 6>,
    bench_insert_random_preallocated::<SmallKey, 8>,
    bench_insert_random_preallocated::<StringKey, 6>,
    bench_find_hit::<SmallKey, 8>,
    bench_find_hit::<StringKey, 6>,
    bench_find_miss::<SmallKey, 8>,
    bench_find_miss::<StringKey, 6>,
    bench_remove::<SmallKey, 8>,
    bench_remove::<StringKey, 6>,
    bench_iteration::<SmallKey, 8>,
    bench_iteration::<StringKey, 6>,
    bench_churn::<SmallKey, 8>,
    bench_churn::<StringKey, 6>,
    bench_mixed_probabilistic_zipf::<SmallKey, 8>,
    bench_mixed_probabilistic_zipf::<StringKey, 6>,
);

criterion_main!(benches);
