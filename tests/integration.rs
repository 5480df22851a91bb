//! # Integration Tests for the Navigable Tree Map
//!
//! This module contains end-to-end integration tests that exercise the map
//! through its public API with realistic workloads, for both balancing
//! strategies.

use std::collections::BTreeMap;

use navtree::{AvlTreeMap, Balance, Error, Natural, RbTreeMap, Reversed, TreeMap};
use rand::prelude::*;

// ===========================================================================
// Large Scale Operation Tests
// ===========================================================================

fn insert_and_lookup<B: Balance>() {
	let mut map: TreeMap<i32, i32, B> = TreeMap::new();

	// Insert 10,000 entries
	for i in 0..10_000 {
		map.insert(i, i * 10);
	}

	map.assert_invariants();
	assert_eq!(map.len(), 10_000);

	// Verify all entries are findable
	for i in 0..10_000 {
		assert_eq!(map.get(&i), Some(&(i * 10)), "Failed to find key {}", i);
	}
}

#[test]
fn large_scale_insert_and_lookup() {
	insert_and_lookup::<navtree::RedBlack>();
	insert_and_lookup::<navtree::Avl>();
}

fn insert_and_remove<B: Balance>() {
	let mut map: TreeMap<i32, i32, B> = TreeMap::new();

	for i in 0..10_000 {
		map.insert(i, i);
	}
	map.assert_invariants();

	// Remove from the middle outwards to hit every deletion shape
	for i in (0..10_000).rev().step_by(2).chain((0..10_000).step_by(2)) {
		assert_eq!(map.remove(&i), Some(i), "Failed to remove key {}", i);
	}

	map.assert_invariants();
	assert!(map.is_empty());
	assert_eq!(map.first_key(), Err(Error::NoSuchElement));
}

#[test]
fn large_scale_insert_and_remove() {
	insert_and_remove::<navtree::RedBlack>();
	insert_and_remove::<navtree::Avl>();
}

#[test]
fn large_scale_random_operations() {
	let mut rb: RbTreeMap<i32, i32> = RbTreeMap::new();
	let mut avl: AvlTreeMap<i32, i32> = AvlTreeMap::new();
	let mut expected: BTreeMap<i32, i32> = BTreeMap::new();
	let mut rng = rand::rng();

	for _ in 0..10_000 {
		let key: i32 = rng.random_range(0..1000);
		match rng.random_range(0..3) {
			0 => {
				let value: i32 = rng.random();
				assert_eq!(rb.insert(key, value), expected.insert(key, value));
				avl.insert(key, value);
			}
			1 => {
				assert_eq!(rb.remove(&key), expected.remove(&key));
				avl.remove(&key);
			}
			_ => {
				assert_eq!(rb.get(&key), expected.get(&key));
				assert_eq!(avl.get(&key), expected.get(&key));
			}
		}
	}

	rb.assert_invariants();
	avl.assert_invariants();
	assert_eq!(rb.len(), expected.len());
	assert!(rb.iter().eq(expected.iter()));
	assert!(avl.iter().eq(expected.iter()));
}

// ===========================================================================
// Navigation Tests
// ===========================================================================

#[test]
fn navigation_matches_btree_range_queries() {
	let mut rng = StdRng::seed_from_u64(7);
	let keys: Vec<i32> = (0..500).map(|_| rng.random_range(0..2000) * 2).collect();

	let map: TreeMap<i32, ()> = keys.iter().map(|&k| (k, ())).collect();
	let expected: BTreeMap<i32, ()> = keys.iter().map(|&k| (k, ())).collect();

	for target in -5..4005 {
		assert_eq!(map.lower_key(&target), expected.range(..target).next_back().map(|(k, _)| k));
		assert_eq!(map.floor_key(&target), expected.range(..=target).next_back().map(|(k, _)| k));
		assert_eq!(map.ceiling_key(&target), expected.range(target..).next().map(|(k, _)| k));
		assert_eq!(
			map.higher_key(&target),
			expected.range((std::ops::Bound::Excluded(target), std::ops::Bound::Unbounded)).next().map(|(k, _)| k)
		);
	}
}

#[test]
fn poll_drains_in_order() {
	let mut map: AvlTreeMap<i32, i32> = (0..100).map(|k| (k, -k)).collect();

	let mut front = 0;
	let mut back = 99;
	while !map.is_empty() {
		assert_eq!(map.poll_first(), Some((front, -front)));
		front += 1;
		if let Some((k, _)) = map.poll_last() {
			assert_eq!(k, back);
			back -= 1;
		}
		map.assert_invariants();
	}
	assert_eq!(front + (99 - back), 100);
}

// ===========================================================================
// Comparator Tests
// ===========================================================================

#[test]
fn reversed_comparator_flips_everything() {
	let mut map: RbTreeMap<i32, (), Reversed<Natural>> = RbTreeMap::with_comparator(Reversed(Natural));
	for k in 1..=5 {
		map.insert(k, ());
	}

	assert_eq!(map.first_key(), Ok(&5));
	assert_eq!(map.last_key(), Ok(&1));
	// "higher" follows the comparator, not the integer order
	assert_eq!(map.higher_key(&3), Some(&2));
	assert_eq!(map.iter().map(|(k, _)| *k).collect::<Vec<_>>(), vec![5, 4, 3, 2, 1]);
	map.assert_invariants();
}

#[test]
fn string_keys() {
	let mut map: TreeMap<String, usize> = TreeMap::new();
	for word in "the quick brown fox jumps over the lazy dog".split(' ') {
		map.merge(word.to_string(), 1, |count, one| Some(count + one));
	}

	assert_eq!(map.get(&"the".to_string()), Some(&2));
	assert_eq!(map.first_key().map(String::as_str), Ok("brown"));
	assert_eq!(map.last_key().map(String::as_str), Ok("the"));
	assert_eq!(map.len(), 8);
}

// ===========================================================================
// Accumulator Tests
// ===========================================================================

#[test]
fn accumulator_histogram() {
	let mut counts: TreeMap<u8, u32> = TreeMap::new();
	for byte in b"mississippi" {
		counts.add_to(*byte, 1);
	}

	assert_eq!(counts.get(&b'i'), Some(&4));
	assert_eq!(counts.get(&b's'), Some(&4));
	assert_eq!(counts.get(&b'p'), Some(&2));
	assert_eq!(counts.get(&b'm'), Some(&1));

	// Subtracting everything back removes the keys
	for byte in b"mississippi" {
		counts.sub_from(*byte, 1);
	}
	assert!(counts.is_empty());
}

#[test]
fn accumulator_through_view() {
	let mut map: TreeMap<i32, i64> = TreeMap::new();
	{
		let mut low = map.head_map_mut(10, false);
		assert_eq!(low.add_to(3, 7), Ok(0));
		assert_eq!(low.add_to(10, 1), Err(Error::KeyOutOfRange));
		assert_eq!(low.sub_from(3, 7), Ok(7));
	}
	assert!(map.is_empty());
}

// ===========================================================================
// Copy and Equality Tests
// ===========================================================================

#[test]
fn copy_is_independent() {
	let mut original: RbTreeMap<i32, Vec<i32>> = (0..50).map(|k| (k, vec![k])).collect();
	original.set_default_return_value(vec![]);

	let copy = original.clone();
	original.get_mut(&0).unwrap().push(99);
	original.remove(&1);

	copy.assert_invariants();
	assert_eq!(copy.get(&0), Some(&vec![0]));
	assert_eq!(copy.get(&1), Some(&vec![1]));
	assert_eq!(copy.default_return_value(), Some(&vec![]));
	assert_ne!(original, copy);
}

#[test]
fn from_entries_with_comparator() {
	let map = TreeMap::<i32, char, navtree::Avl, _>::from_entries(Reversed(Natural), [(1, 'a'), (2, 'b'), (1, 'c')]);
	assert_eq!(map.len(), 2);
	assert_eq!(map.get(&1), Some(&'c'));
	assert_eq!(map.first_entry(), Some((&2, &'b')));
}
