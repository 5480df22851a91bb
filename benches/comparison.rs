// Copyright © SurrealDB Ltd
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Criterion benchmarks comparing the two balancing strategies against
//! `std::collections::BTreeMap`.
//!
//! This benchmark suite compares:
//! - `navtree::RbTreeMap` - Red-Black balanced tree map
//! - `navtree::AvlTreeMap` - AVL balanced tree map
//! - `std::collections::BTreeMap` - Standard library B-tree
//!
//! Red-Black trees rotate less on update; AVL trees are shallower and should
//! win on lookup-heavy groups.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use navtree::{AvlTreeMap, Balance, RbTreeMap, TreeMap};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::BTreeMap;
use std::hint::black_box;
use std::ops::Bound;

const SEED: u64 = 42;

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

// ============================================================================
// Helper Functions
// ============================================================================

/// Generate sequential keys from 0 to count-1
fn sequential_keys(count: usize) -> Vec<i64> {
	(0..count as i64).collect()
}

/// Generate random keys using a seeded RNG
fn random_keys(count: usize) -> Vec<i64> {
	let mut rng = StdRng::seed_from_u64(SEED);
	(0..count).map(|_| rng.random()).collect()
}

/// Generate keys that fall between the even keys of `even_keys`
fn odd_keys(count: usize) -> Vec<i64> {
	(0..count as i64).map(|i| i * 2 + 1).collect()
}

fn even_keys(count: usize) -> Vec<i64> {
	(0..count as i64).map(|i| i * 2).collect()
}

fn populated<B: Balance>(keys: &[i64]) -> TreeMap<i64, i64, B> {
	keys.iter().map(|&k| (k, k)).collect()
}

fn populated_btree(keys: &[i64]) -> BTreeMap<i64, i64> {
	keys.iter().map(|&k| (k, k)).collect()
}

// ============================================================================
// Insert Benchmarks
// ============================================================================

fn bench_insert(c: &mut Criterion, name: &str, generate: fn(usize) -> Vec<i64>) {
	let mut group = c.benchmark_group(name);

	for count in SIZES {
		let keys = generate(count);
		group.throughput(Throughput::Elements(count as u64));

		// Red-Black
		group.bench_with_input(BenchmarkId::new("red_black", count), &keys, |b, keys| {
			b.iter_batched(
				RbTreeMap::<i64, i64>::new,
				|mut map| {
					for &k in keys {
						black_box(map.insert(k, k));
					}
					map
				},
				criterion::BatchSize::SmallInput,
			)
		});

		// AVL
		group.bench_with_input(BenchmarkId::new("avl", count), &keys, |b, keys| {
			b.iter_batched(
				AvlTreeMap::<i64, i64>::new,
				|mut map| {
					for &k in keys {
						black_box(map.insert(k, k));
					}
					map
				},
				criterion::BatchSize::SmallInput,
			)
		});

		// BTreeMap
		group.bench_with_input(BenchmarkId::new("btreemap", count), &keys, |b, keys| {
			b.iter_batched(
				BTreeMap::new,
				|mut map| {
					for &k in keys {
						black_box(map.insert(k, k));
					}
					map
				},
				criterion::BatchSize::SmallInput,
			)
		});
	}
	group.finish();
}

fn bench_insert_sequential(c: &mut Criterion) {
	bench_insert(c, "insert_sequential", sequential_keys);
}

fn bench_insert_random(c: &mut Criterion) {
	bench_insert(c, "insert_random", random_keys);
}

// ============================================================================
// Lookup Benchmarks
// ============================================================================

fn bench_lookup_hit(c: &mut Criterion) {
	let mut group = c.benchmark_group("lookup_hit");

	for count in SIZES {
		let keys = random_keys(count);
		let rb = populated::<navtree::RedBlack>(&keys);
		let avl = populated::<navtree::Avl>(&keys);
		let btreemap = populated_btree(&keys);

		group.throughput(Throughput::Elements(count as u64));

		group.bench_function(BenchmarkId::new("red_black", count), |b| {
			b.iter(|| {
				for k in &keys {
					black_box(rb.get(k));
				}
			})
		});

		group.bench_function(BenchmarkId::new("avl", count), |b| {
			b.iter(|| {
				for k in &keys {
					black_box(avl.get(k));
				}
			})
		});

		group.bench_function(BenchmarkId::new("btreemap", count), |b| {
			b.iter(|| {
				for k in &keys {
					black_box(btreemap.get(k));
				}
			})
		});
	}
	group.finish();
}

// ============================================================================
// Navigation Benchmarks
// ============================================================================

fn bench_floor_ceiling(c: &mut Criterion) {
	let mut group = c.benchmark_group("floor_ceiling");

	for count in SIZES {
		let keys = even_keys(count);
		let lookups = odd_keys(count);
		let rb = populated::<navtree::RedBlack>(&keys);
		let avl = populated::<navtree::Avl>(&keys);
		let btreemap = populated_btree(&keys);

		group.throughput(Throughput::Elements(count as u64 * 2));

		group.bench_function(BenchmarkId::new("red_black", count), |b| {
			b.iter(|| {
				for p in &lookups {
					black_box(rb.floor_key(p));
					black_box(rb.ceiling_key(p));
				}
			})
		});

		group.bench_function(BenchmarkId::new("avl", count), |b| {
			b.iter(|| {
				for p in &lookups {
					black_box(avl.floor_key(p));
					black_box(avl.ceiling_key(p));
				}
			})
		});

		// BTreeMap has no floor/ceiling; a one-step range is the closest
		group.bench_function(BenchmarkId::new("btreemap", count), |b| {
			b.iter(|| {
				for p in &lookups {
					black_box(btreemap.range(..=p).next_back());
					black_box(btreemap.range(p..).next());
				}
			})
		});
	}
	group.finish();
}

// ============================================================================
// Removal Benchmarks
// ============================================================================

fn bench_remove(c: &mut Criterion) {
	let mut group = c.benchmark_group("remove_random");

	for count in SIZES {
		let keys = random_keys(count);
		let rb = populated::<navtree::RedBlack>(&keys);
		let avl = populated::<navtree::Avl>(&keys);
		let btreemap = populated_btree(&keys);

		group.throughput(Throughput::Elements(count as u64));

		group.bench_with_input(BenchmarkId::new("red_black", count), &keys, |b, keys| {
			b.iter_batched(
				|| rb.clone(),
				|mut map| {
					for k in keys {
						black_box(map.remove(k));
					}
					map
				},
				criterion::BatchSize::LargeInput,
			)
		});

		group.bench_with_input(BenchmarkId::new("avl", count), &keys, |b, keys| {
			b.iter_batched(
				|| avl.clone(),
				|mut map| {
					for k in keys {
						black_box(map.remove(k));
					}
					map
				},
				criterion::BatchSize::LargeInput,
			)
		});

		group.bench_with_input(BenchmarkId::new("btreemap", count), &keys, |b, keys| {
			b.iter_batched(
				|| btreemap.clone(),
				|mut map| {
					for k in keys {
						black_box(map.remove(k));
					}
					map
				},
				criterion::BatchSize::LargeInput,
			)
		});
	}
	group.finish();
}

fn bench_poll_first(c: &mut Criterion) {
	let mut group = c.benchmark_group("poll_first");

	for count in SIZES {
		let keys = sequential_keys(count);
		let rb = populated::<navtree::RedBlack>(&keys);
		let avl = populated::<navtree::Avl>(&keys);
		let btreemap = populated_btree(&keys);

		group.throughput(Throughput::Elements(count as u64));

		group.bench_function(BenchmarkId::new("red_black", count), |b| {
			b.iter_batched(
				|| rb.clone(),
				|mut map| {
					while let Some(entry) = map.poll_first() {
						black_box(entry);
					}
				},
				criterion::BatchSize::LargeInput,
			)
		});

		group.bench_function(BenchmarkId::new("avl", count), |b| {
			b.iter_batched(
				|| avl.clone(),
				|mut map| {
					while let Some(entry) = map.poll_first() {
						black_box(entry);
					}
				},
				criterion::BatchSize::LargeInput,
			)
		});

		group.bench_function(BenchmarkId::new("btreemap", count), |b| {
			b.iter_batched(
				|| btreemap.clone(),
				|mut map| {
					while let Some(entry) = map.pop_first() {
						black_box(entry);
					}
				},
				criterion::BatchSize::LargeInput,
			)
		});
	}
	group.finish();
}

// ============================================================================
// Range Benchmarks
// ============================================================================

fn bench_range(c: &mut Criterion) {
	let mut group = c.benchmark_group("range");

	for count in SIZES {
		let keys = sequential_keys(count);
		let rb = populated::<navtree::RedBlack>(&keys);
		let avl = populated::<navtree::Avl>(&keys);
		let btreemap = populated_btree(&keys);

		// Range covers 10% of entries in the middle
		let range_size = count / 10;
		let start = (count / 2 - range_size / 2) as i64;
		let end = start + range_size as i64;

		group.throughput(Throughput::Elements(range_size as u64));

		group.bench_function(BenchmarkId::new("red_black_sub_map", count), |b| {
			b.iter(|| {
				let mut sum = 0i64;
				if let Ok(view) = rb.sub_map(start, true, end, false) {
					for (k, v) in view.iter() {
						sum = sum.wrapping_add(*k).wrapping_add(*v);
					}
				}
				black_box(sum)
			})
		});

		group.bench_function(BenchmarkId::new("avl_range", count), |b| {
			b.iter(|| {
				let mut sum = 0i64;
				if let Ok(range) = avl.range((Bound::Included(start), Bound::Excluded(end))) {
					for (k, v) in range {
						sum = sum.wrapping_add(*k).wrapping_add(*v);
					}
				}
				black_box(sum)
			})
		});

		group.bench_function(BenchmarkId::new("btreemap", count), |b| {
			b.iter(|| {
				let mut sum = 0i64;
				for (&k, &v) in btreemap.range(start..end) {
					sum = sum.wrapping_add(k).wrapping_add(v);
				}
				black_box(sum)
			})
		});
	}
	group.finish();
}

fn bench_cursor_removal(c: &mut Criterion) {
	let mut group = c.benchmark_group("remove_odd_while_iterating");

	for count in SIZES {
		let keys = sequential_keys(count);
		let rb = populated::<navtree::RedBlack>(&keys);
		let btreemap = populated_btree(&keys);

		group.throughput(Throughput::Elements(count as u64));

		group.bench_function(BenchmarkId::new("red_black_cursor", count), |b| {
			b.iter_batched(
				|| rb.clone(),
				|mut map| {
					let mut cursor = map.cursor_mut();
					while let Some((k, _)) = cursor.next() {
						if k % 2 == 1 {
							black_box(cursor.remove().ok());
						}
					}
					map
				},
				criterion::BatchSize::LargeInput,
			)
		});

		group.bench_function(BenchmarkId::new("red_black_retain", count), |b| {
			b.iter_batched(
				|| rb.clone(),
				|mut map| {
					map.retain(|k, _| k % 2 == 0);
					map
				},
				criterion::BatchSize::LargeInput,
			)
		});

		group.bench_function(BenchmarkId::new("btreemap_retain", count), |b| {
			b.iter_batched(
				|| btreemap.clone(),
				|mut map| {
					map.retain(|k, _| k % 2 == 0);
					map
				},
				criterion::BatchSize::LargeInput,
			)
		});
	}
	group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
	benches,
	bench_insert_sequential,
	bench_insert_random,
	bench_lookup_hit,
	bench_floor_ceiling,
	bench_remove,
	bench_poll_first,
	bench_range,
	bench_cursor_removal,
);

criterion_main!(benches);
