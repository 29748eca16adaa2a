use core::hint::black_box;

use chain_hash::Cost;
use chain_hash::HashTable as ChainHashTable;
use criterion::AxisScale;
use criterion::BatchSize;
use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::HashMap as HashbrownMap;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Distribution;
use rand_distr::Zipf;

const SIZES: &[usize] = &[1 << 8, 1 << 10, 1 << 12, 1 << 14, 1 << 16];

fn random_keys(count: usize) -> Vec<String> {
    let mut rng = SmallRng::from_os_rng();
    (0..count)
        .map(|_| format!("key_{:016X}", rng.random::<u64>()))
        .collect()
}

fn bench_insert_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_random");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = random_keys(size);
        group.throughput(Throughput::Elements(size as u64));

        for (name, cost) in [("chain_constant", Cost::Constant), ("chain_log_n", Cost::LogN)] {
            group.bench_function(BenchmarkId::new(name, size), |b| {
                b.iter_batched(
                    || {
                        let mut keys = keys.clone();
                        keys.shuffle(&mut SmallRng::from_os_rng());
                        keys
                    },
                    |keys| {
                        let mut table = ChainHashTable::new();
                        for key in keys {
                            table.insert(key, 0u64, cost);
                        }
                        black_box(table)
                    },
                    BatchSize::SmallInput,
                )
            });
        }

        group.bench_function(BenchmarkId::new("hashbrown", size), |b| {
            b.iter_batched(
                || {
                    let mut keys = keys.clone();
                    keys.shuffle(&mut SmallRng::from_os_rng());
                    keys
                },
                |keys| {
                    let mut map = HashbrownMap::new();
                    for key in keys {
                        map.insert(key, 0u64);
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_lookup_zipf(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup_zipf");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = random_keys(size);
        let mut chain = ChainHashTable::new();
        let mut brown = HashbrownMap::new();
        for (i, key) in keys.iter().enumerate() {
            chain.insert(key.clone(), i as u64, Cost::Constant);
            brown.insert(key.clone(), i as u64);
        }

        let zipf = Zipf::new(size as f64, 1.03).unwrap();
        let mut rng = SmallRng::from_os_rng();
        let lookups: Vec<&String> = (0..size)
            .map(|_| {
                let rank = (zipf.sample(&mut rng) as usize).min(size);
                &keys[rank - 1]
            })
            .collect();

        group.throughput(Throughput::Elements(size as u64));

        for (name, cost) in [("chain_constant", Cost::Constant), ("chain_log_n", Cost::LogN)] {
            group.bench_function(BenchmarkId::new(name, size), |b| {
                b.iter(|| {
                    let mut hits = 0u64;
                    for key in &lookups {
                        if chain.get(*key, cost).is_some() {
                            hits += 1;
                        }
                    }
                    black_box(hits)
                })
            });
        }

        group.bench_function(BenchmarkId::new("hashbrown", size), |b| {
            b.iter(|| {
                let mut hits = 0u64;
                for key in &lookups {
                    if brown.get(*key).is_some() {
                        hits += 1;
                    }
                }
                black_box(hits)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert_random, bench_lookup_zipf);
criterion_main!(benches);
