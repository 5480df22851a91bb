//! # Navtree: An In-Memory Navigable Tree Map
//!
//! This crate provides an ordered key-value map backed by a self-balancing
//! binary search tree, with a navigable-map API: ordered traversal,
//! predecessor/successor queries and live range views.
//!
//! ## Design Overview
//!
//! ### Key Concepts
//!
//! **Pluggable Balancing**: One generic tree engine is parameterised by a
//! [`Balance`] strategy. [`RedBlack`] keeps a colour per node; [`Avl`] keeps a
//! height per node and a stricter balance. Both give identical ordering and
//! navigation behaviour.
//!
//! **Cached Endpoints**: The engine caches its minimum and maximum nodes, so
//! `first_key`, `last_key`, `poll_first` and `poll_last` start without a
//! descent.
//!
//! **Navigation Without Scans**: `lower`/`floor`/`ceiling`/`higher` walk one
//! root-to-leaf path and, on a miss, climb to the nearest ancestor on the
//! correct side. Range views reuse the same primitives plus a bound check.
//!
//! **Windows and Views**: A [`SubMap`] narrows which entries are visible
//! through a [`Window`]: [`Full`] for the whole map, [`Bounds`] for a key
//! range. A view can be ascending or descending. Views never copy nodes;
//! writes through a view land in the backing map.
//!
//! **Fences**: A [`Cursor`] over a range records the first node outside the
//! range on each side and stops when it reaches one, instead of re-checking
//! both bounds at every step.
//!
//! ### Tree Structure
//!
//! ```text
//!                    ┌─────────────────┐
//!                    │     TreeMap     │  <- comparator, default value
//!                    │   ┌─────────┐   │
//!                    │   │ RawTree │   │  <- root, first, last, len
//!                    └───┴────┬────┴───┘
//!                             │
//!                             ▼
//!                    ┌─────────────────┐
//!                    │   Node arena    │  <- slots indexed by NodeIndex
//!                    └────────┬────────┘
//!                             │
//!              ┌──────────────┼──────────────┐
//!              ▼              ▼              ▼
//!        ┌──────────┐  ┌──────────┐  ┌──────────┐
//!        │ key, val │  │ key, val │  │ key, val │  <- parent/left/right
//!        │   tag    │  │   tag    │  │   tag    │     indices + colour
//!        └──────────┘  └──────────┘  └──────────┘     or height
//! ```
//!
//! ## Basic Usage
//!
//! ```
//! use navtree::TreeMap;
//!
//! let mut map: TreeMap<i32, &str> = TreeMap::new();
//!
//! // Insert key-value pairs
//! map.insert(3, "three");
//! map.insert(1, "one");
//! map.insert(5, "five");
//!
//! // Lookup and navigate
//! assert_eq!(map.get(&1), Some(&"one"));
//! assert_eq!(map.floor_key(&4), Some(&3));
//! assert_eq!(map.higher_key(&3), Some(&5));
//!
//! // Views write through to the map
//! let mut head = map.head_map_mut(3, true);
//! assert_eq!(head.len(), 2);
//! assert_eq!(head.poll_first(), Some((1, "one")));
//! assert!(head.insert(9, "nine").is_err());
//!
//! assert_eq!(map.len(), 2);
//! ```
//!
//! ## Thread Safety
//!
//! The map is not internally synchronised. Every structural change takes
//! `&mut self`, and views and cursors borrow the map, so the borrow checker
//! rules out modification of a map while anything else is observing it.

use std::fmt;
use std::mem;
use std::ops::{Bound, RangeBounds};

use tracing::trace;

pub mod accumulate;
pub mod balance;
pub mod collections;
pub mod compare;
pub mod error;
pub mod iter;
mod node;
mod tree;
pub mod view;
pub mod window;

pub use accumulate::Accumulate;
pub use balance::{Avl, Balance, RedBlack};
pub use collections::{EntrySet, KeySet, Values};
pub use compare::{Comparator, Natural, Reversed};
pub use error::{Error, Result};
pub use iter::{Cursor, CursorState, IntoIter, Iter};
pub use view::SubMap;
pub use window::{Bounds, Full, Window};

use tree::RawTree;
use window::sealed::Resolve;

// ---------------------------------------------------------------------------
// Public Type Aliases
// ---------------------------------------------------------------------------

/// A tree map balanced as a Red-Black tree.
///
/// This is the recommended type for most use cases: updates perform at most
/// a constant number of rotations.
pub type RbTreeMap<K, V, C = Natural> = TreeMap<K, V, RedBlack, C>;

/// A tree map balanced as an AVL tree.
///
/// AVL trees are more rigidly balanced than Red-Black trees, which favours
/// lookup-heavy workloads at the cost of more rotations on update.
pub type AvlTreeMap<K, V, C = Natural> = TreeMap<K, V, Avl, C>;

/// Iteration order of a view or cursor.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Direction {
	/// Toward higher keys.
	Forward,
	/// Toward lower keys.
	Reverse,
}

impl Direction {
	/// The opposite direction.
	#[inline]
	pub fn flip(self) -> Direction {
		match self {
			Direction::Forward => Direction::Reverse,
			Direction::Reverse => Direction::Forward,
		}
	}
}

// ---------------------------------------------------------------------------
// Core Map Structure
// ---------------------------------------------------------------------------

/// An ordered map with navigation and range views.
///
/// # Type Parameters
///
/// - `K`: The key type. Ordered by `C`.
/// - `V`: The value type.
/// - `B`: The balancing strategy, [`RedBlack`] (default) or [`Avl`].
/// - `C`: The key comparator, [`Natural`] (default, uses `K: Ord`) or any
///   `Fn(&K, &K) -> Ordering`.
///
/// # Default Return Value
///
/// The map carries an optional default return value. It matters only to the
/// accumulator operations [`add_to`](TreeMap::add_to) and
/// [`sub_from`](TreeMap::sub_from): an absent key counts as holding the
/// default, and an entry whose value becomes the default is removed. When
/// unset, [`Accumulate::ZERO`] is used.
pub struct TreeMap<K, V, B: Balance = RedBlack, C = Natural> {
	raw: RawTree<K, V, B>,
	cmp: C,
	default_value: Option<V>,
}

impl<K: Ord, V, B: Balance> TreeMap<K, V, B, Natural> {
	/// Creates an empty map ordered by `K`'s [`Ord`] implementation.
	///
	/// No allocation happens until the first insertion.
	///
	/// # Example
	///
	/// ```
	/// use navtree::TreeMap;
	///
	/// let map: TreeMap<String, i32> = TreeMap::new();
	/// assert!(map.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::with_comparator(Natural)
	}
}

impl<K, V, B: Balance, C: Comparator<K> + Default> Default for TreeMap<K, V, B, C> {
	fn default() -> Self {
		Self::with_comparator(C::default())
	}
}

impl<K, V, B: Balance, C: Comparator<K>> TreeMap<K, V, B, C> {
	// -----------------------------------------------------------------------
	// Construction
	// -----------------------------------------------------------------------

	/// Creates an empty map ordered by `cmp`.
	///
	/// # Example
	///
	/// ```
	/// use navtree::{Natural, RbTreeMap, Reversed};
	///
	/// let mut map: RbTreeMap<i32, (), _> = RbTreeMap::with_comparator(Reversed(Natural));
	/// map.insert(1, ());
	/// map.insert(2, ());
	/// assert_eq!(map.first_key(), Ok(&2));
	/// ```
	pub fn with_comparator(cmp: C) -> Self {
		TreeMap {
			raw: RawTree::new(),
			cmp,
			default_value: None,
		}
	}

	/// Creates a map ordered by `cmp` holding the given entries.
	///
	/// Entries are inserted one by one; for duplicate keys the last value
	/// wins.
	pub fn from_entries<I>(cmp: C, entries: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		let mut map = Self::with_comparator(cmp);
		map.extend(entries);
		map
	}

	// -----------------------------------------------------------------------
	// Configuration
	// -----------------------------------------------------------------------

	/// Returns the comparator ordering this map.
	pub fn comparator(&self) -> &C {
		&self.cmp
	}

	/// Returns the value absent keys are taken to hold by the accumulator
	/// operations, if one was set.
	pub fn default_return_value(&self) -> Option<&V> {
		self.default_value.as_ref()
	}

	/// Sets the value absent keys are taken to hold by the accumulator
	/// operations.
	///
	/// Entries already holding this value are not removed.
	pub fn set_default_return_value(&mut self, value: V) {
		self.default_value = Some(value);
	}

	// -----------------------------------------------------------------------
	// Size Operations
	// -----------------------------------------------------------------------

	/// Returns the number of entries in the map. O(1).
	pub fn len(&self) -> usize {
		self.raw.len()
	}

	/// Returns `true` if the map contains no entries.
	pub fn is_empty(&self) -> bool {
		self.raw.is_empty()
	}

	/// Returns the number of nodes on the longest root-to-leaf path.
	///
	/// This walks the whole tree and is meant for diagnostics.
	pub fn height(&self) -> usize {
		self.raw.height()
	}

	// -----------------------------------------------------------------------
	// Lookup
	// -----------------------------------------------------------------------

	/// Returns a reference to the value stored for `key`.
	pub fn get(&self, key: &K) -> Option<&V> {
		self.raw.find(key, &self.cmp).map(|n| self.raw.value(n))
	}

	/// Returns a mutable reference to the value stored for `key`.
	pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
		let node = self.raw.find(key, &self.cmp)?;
		Some(self.raw.value_mut(node))
	}

	/// Returns the stored key and value for `key`.
	pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
		self.raw.find(key, &self.cmp).map(|n| self.raw.entry(n))
	}

	/// Returns the value stored for `key`, or `default` if there is none.
	pub fn get_or<'a>(&'a self, key: &K, default: &'a V) -> &'a V {
		self.get(key).unwrap_or(default)
	}

	/// Returns `true` if the map contains `key`.
	pub fn contains_key(&self, key: &K) -> bool {
		self.raw.find(key, &self.cmp).is_some()
	}

	/// Returns `true` if any entry holds `value`. O(n).
	pub fn contains_value(&self, value: &V) -> bool
	where
		V: PartialEq,
	{
		self.iter().any(|(_, v)| v == value)
	}

	// -----------------------------------------------------------------------
	// Insertion and Removal
	// -----------------------------------------------------------------------

	/// Inserts a key-value pair into the map.
	///
	/// If the key already exists, only the value is replaced and the old
	/// value is returned. If the key is new, `None` is returned.
	///
	/// # Example
	///
	/// ```
	/// use navtree::TreeMap;
	///
	/// let mut map: TreeMap<i32, &str> = TreeMap::new();
	///
	/// assert_eq!(map.insert(1, "one"), None);       // New key
	/// assert_eq!(map.insert(1, "uno"), Some("one")); // Update existing
	/// ```
	pub fn insert(&mut self, key: K, value: V) -> Option<V> {
		self.raw.insert(key, value, &self.cmp)
	}

	/// Inserts the pair only if `key` is absent.
	///
	/// Returns the existing value when the key was already present (and
	/// nothing was inserted), or `None` after inserting.
	pub fn insert_if_absent(&mut self, key: K, value: V) -> Option<&V> {
		match self.raw.search(&key, &self.cmp) {
			Ok(node) => Some(self.raw.value(node)),
			Err(vacancy) => {
				self.raw.attach(vacancy, key, value);
				None
			}
		}
	}

	/// Removes `key` from the map, returning its value.
	///
	/// # Example
	///
	/// ```
	/// use navtree::TreeMap;
	///
	/// let mut map: TreeMap<i32, &str> = TreeMap::new();
	/// map.insert(1, "one");
	///
	/// assert_eq!(map.remove(&1), Some("one"));
	/// assert_eq!(map.remove(&1), None); // Already removed
	/// ```
	pub fn remove(&mut self, key: &K) -> Option<V> {
		self.remove_entry(key).map(|(_, v)| v)
	}

	/// Removes `key` from the map, returning the stored key and value.
	pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
		let node = self.raw.find(key, &self.cmp)?;
		Some(self.raw.remove_node(node))
	}

	/// Removes `key` only if it currently maps to `expected`.
	pub fn remove_if_eq(&mut self, key: &K, expected: &V) -> bool
	where
		V: PartialEq,
	{
		match self.raw.find(key, &self.cmp) {
			Some(node) if self.raw.value(node) == expected => {
				self.raw.remove_node(node);
				true
			}
			_ => false,
		}
	}

	/// Replaces the value of `key` if it is present, returning the old value.
	/// Absent keys are not inserted.
	pub fn replace(&mut self, key: &K, value: V) -> Option<V> {
		self.get_mut(key).map(|v| mem::replace(v, value))
	}

	/// Replaces the value of `key` only if it currently maps to `expected`.
	pub fn replace_if_eq(&mut self, key: &K, expected: &V, value: V) -> bool
	where
		V: PartialEq,
	{
		match self.get_mut(key) {
			Some(v) if *v == *expected => {
				*v = value;
				true
			}
			_ => false,
		}
	}

	/// Removes all entries from the map.
	pub fn clear(&mut self) {
		trace!(len = self.raw.len(), "clearing tree map");
		self.raw.clear();
	}

	/// Keeps only the entries for which `f` returns `true`.
	pub fn retain<F>(&mut self, mut f: F)
	where
		F: FnMut(&K, &mut V) -> bool,
	{
		let mut cursor = self.cursor_mut();
		while cursor.next().is_some() {
			let (k, v) = cursor.current_mut().expect("cursor was just advanced");
			if !f(k, v) {
				cursor.remove().expect("cursor was just advanced");
			}
		}
	}

	// -----------------------------------------------------------------------
	// Compute Family
	// -----------------------------------------------------------------------

	/// Computes a new value for `key` from its current value (if any).
	///
	/// Returning `None` from `f` removes the entry (or leaves the key
	/// absent). Returns the value now stored.
	///
	/// # Example
	///
	/// ```
	/// use navtree::TreeMap;
	///
	/// let mut map: TreeMap<&str, u32> = TreeMap::new();
	/// map.compute("a", |_, v| Some(v.map_or(1, |v| v + 1)));
	/// map.compute("a", |_, v| Some(v.map_or(1, |v| v + 1)));
	/// assert_eq!(map.get(&"a"), Some(&2));
	///
	/// map.compute("a", |_, _| None);
	/// assert!(map.is_empty());
	/// ```
	pub fn compute<F>(&mut self, key: K, f: F) -> Option<&V>
	where
		F: FnOnce(&K, Option<&V>) -> Option<V>,
	{
		match self.raw.search(&key, &self.cmp) {
			Ok(node) => match f(&key, Some(self.raw.value(node))) {
				Some(value) => {
					*self.raw.value_mut(node) = value;
					Some(self.raw.value(node))
				}
				None => {
					self.raw.remove_node(node);
					None
				}
			},
			Err(vacancy) => {
				let value = f(&key, None)?;
				let node = self.raw.attach(vacancy, key, value);
				Some(self.raw.value(node))
			}
		}
	}

	/// Inserts the value computed by `f` if `key` is absent.
	///
	/// Returns the value now stored, which is the existing one when the key
	/// was present. If `f` returns `None` nothing is inserted.
	pub fn compute_if_absent<F>(&mut self, key: K, f: F) -> Option<&V>
	where
		F: FnOnce(&K) -> Option<V>,
	{
		match self.raw.search(&key, &self.cmp) {
			Ok(node) => Some(self.raw.value(node)),
			Err(vacancy) => {
				let value = f(&key)?;
				let node = self.raw.attach(vacancy, key, value);
				Some(self.raw.value(node))
			}
		}
	}

	/// Recomputes the value of `key` if it is present.
	///
	/// Returning `None` from `f` removes the entry.
	pub fn compute_if_present<F>(&mut self, key: &K, f: F) -> Option<&V>
	where
		F: FnOnce(&K, &V) -> Option<V>,
	{
		let node = self.raw.find(key, &self.cmp)?;
		let (k, v) = self.raw.entry(node);
		match f(k, v) {
			Some(value) => {
				*self.raw.value_mut(node) = value;
				Some(self.raw.value(node))
			}
			None => {
				self.raw.remove_node(node);
				None
			}
		}
	}

	/// Inserts `value` if `key` is absent, otherwise replaces the current
	/// value with `f(current, value)`. Returning `None` from `f` removes the
	/// entry.
	pub fn merge<F>(&mut self, key: K, value: V, f: F) -> Option<&V>
	where
		F: FnOnce(&V, V) -> Option<V>,
	{
		match self.raw.search(&key, &self.cmp) {
			Ok(node) => match f(self.raw.value(node), value) {
				Some(merged) => {
					*self.raw.value_mut(node) = merged;
					Some(self.raw.value(node))
				}
				None => {
					self.raw.remove_node(node);
					None
				}
			},
			Err(vacancy) => {
				let node = self.raw.attach(vacancy, key, value);
				Some(self.raw.value(node))
			}
		}
	}

	// -----------------------------------------------------------------------
	// Accumulators
	// -----------------------------------------------------------------------

	/// Adds `delta` to the value of `key`, returning the previous value.
	///
	/// An absent key counts as holding the default return value. If the sum
	/// equals the default return value, the entry is removed, so the map
	/// never stores the default.
	///
	/// # Example
	///
	/// ```
	/// use navtree::TreeMap;
	///
	/// let mut counts: TreeMap<&str, i64> = TreeMap::new();
	/// assert_eq!(counts.add_to("x", 5), 0);
	/// assert_eq!(counts.sub_from("x", 5), 5);
	///
	/// // Back at zero: the key is gone rather than holding 0
	/// assert!(!counts.contains_key(&"x"));
	/// ```
	pub fn add_to(&mut self, key: K, delta: V) -> V
	where
		V: Accumulate,
	{
		self.accumulate(key, |v| v.accumulate(delta))
	}

	/// Subtracts `delta` from the value of `key`, returning the previous
	/// value. See [`add_to`](TreeMap::add_to).
	pub fn sub_from(&mut self, key: K, delta: V) -> V
	where
		V: Accumulate,
	{
		self.accumulate(key, |v| v.deplete(delta))
	}

	fn accumulate<F>(&mut self, key: K, op: F) -> V
	where
		V: Accumulate,
		F: FnOnce(V) -> V,
	{
		let default = self.default_value.unwrap_or(V::ZERO);
		match self.raw.search(&key, &self.cmp) {
			Ok(node) => {
				let old = *self.raw.value(node);
				let new = op(old);
				if new.same(&default) {
					self.raw.remove_node(node);
				} else {
					*self.raw.value_mut(node) = new;
				}
				old
			}
			Err(vacancy) => {
				let new = op(default);
				if !new.same(&default) {
					self.raw.attach(vacancy, key, new);
				}
				default
			}
		}
	}

	// -----------------------------------------------------------------------
	// Navigation
	// -----------------------------------------------------------------------

	/// Returns the smallest key.
	///
	/// # Errors
	///
	/// [`Error::NoSuchElement`] if the map is empty.
	pub fn first_key(&self) -> Result<&K> {
		self.raw.first().map(|n| self.raw.key(n)).ok_or(Error::NoSuchElement)
	}

	/// Returns the largest key.
	///
	/// # Errors
	///
	/// [`Error::NoSuchElement`] if the map is empty.
	pub fn last_key(&self) -> Result<&K> {
		self.raw.last().map(|n| self.raw.key(n)).ok_or(Error::NoSuchElement)
	}

	/// Returns the entry with the smallest key.
	pub fn first_entry(&self) -> Option<(&K, &V)> {
		self.raw.first().map(|n| self.raw.entry(n))
	}

	/// Returns the entry with the largest key.
	pub fn last_entry(&self) -> Option<(&K, &V)> {
		self.raw.last().map(|n| self.raw.entry(n))
	}

	/// Removes and returns the entry with the smallest key.
	pub fn poll_first(&mut self) -> Option<(K, V)> {
		let node = self.raw.first()?;
		Some(self.raw.remove_node(node))
	}

	/// Removes and returns the entry with the largest key.
	pub fn poll_last(&mut self) -> Option<(K, V)> {
		let node = self.raw.last()?;
		Some(self.raw.remove_node(node))
	}

	/// Removes the entry with the smallest key, returning the key.
	pub fn poll_first_key(&mut self) -> Option<K> {
		self.poll_first().map(|(k, _)| k)
	}

	/// Removes the entry with the largest key, returning the key.
	pub fn poll_last_key(&mut self) -> Option<K> {
		self.poll_last().map(|(k, _)| k)
	}

	/// Returns the greatest key strictly less than `key`.
	///
	/// # Example
	///
	/// ```
	/// use navtree::TreeMap;
	///
	/// let map: TreeMap<i32, ()> = [(1, ()), (3, ()), (5, ())].into();
	/// assert_eq!(map.lower_key(&3), Some(&1));
	/// assert_eq!(map.lower_key(&1), None);
	/// ```
	pub fn lower_key(&self, key: &K) -> Option<&K> {
		self.raw.find_lower(key, &self.cmp).map(|n| self.raw.key(n))
	}

	/// Returns the greatest key less than or equal to `key`.
	pub fn floor_key(&self, key: &K) -> Option<&K> {
		self.raw.find_floor(key, &self.cmp).map(|n| self.raw.key(n))
	}

	/// Returns the least key greater than or equal to `key`.
	pub fn ceiling_key(&self, key: &K) -> Option<&K> {
		self.raw.find_ceiling(key, &self.cmp).map(|n| self.raw.key(n))
	}

	/// Returns the least key strictly greater than `key`.
	pub fn higher_key(&self, key: &K) -> Option<&K> {
		self.raw.find_higher(key, &self.cmp).map(|n| self.raw.key(n))
	}

	/// Returns the entry with the greatest key strictly less than `key`.
	pub fn lower_entry(&self, key: &K) -> Option<(&K, &V)> {
		self.raw.find_lower(key, &self.cmp).map(|n| self.raw.entry(n))
	}

	/// Returns the entry with the greatest key less than or equal to `key`.
	pub fn floor_entry(&self, key: &K) -> Option<(&K, &V)> {
		self.raw.find_floor(key, &self.cmp).map(|n| self.raw.entry(n))
	}

	/// Returns the entry with the least key greater than or equal to `key`.
	pub fn ceiling_entry(&self, key: &K) -> Option<(&K, &V)> {
		self.raw.find_ceiling(key, &self.cmp).map(|n| self.raw.entry(n))
	}

	/// Returns the entry with the least key strictly greater than `key`.
	pub fn higher_entry(&self, key: &K) -> Option<(&K, &V)> {
		self.raw.find_higher(key, &self.cmp).map(|n| self.raw.entry(n))
	}

	// -----------------------------------------------------------------------
	// Iteration
	// -----------------------------------------------------------------------

	/// Returns an iterator over the entries in ascending key order.
	///
	/// The iterator is double-ended: `.rev()` walks in descending order.
	pub fn iter(&self) -> Iter<'_, K, V, B> {
		Iter::new(&self.raw, self.raw.first(), self.raw.last(), Direction::Forward)
	}

	/// Calls `f` on every entry in ascending key order.
	pub fn for_each<F>(&self, mut f: F)
	where
		F: FnMut(&K, &V),
	{
		for (k, v) in self.iter() {
			f(k, v);
		}
	}

	/// Returns an iterator over the entries whose keys fall in `range`.
	///
	/// # Errors
	///
	/// [`Error::InvalidRange`] if the range starts after it ends.
	///
	/// # Example
	///
	/// ```
	/// use navtree::TreeMap;
	///
	/// let map: TreeMap<i32, i32> = (0..10).map(|k| (k, k * k)).collect();
	/// let squares: Vec<i32> = map.range(3..6).unwrap().map(|(_, v)| *v).collect();
	/// assert_eq!(squares, vec![9, 16, 25]);
	/// ```
	pub fn range<R>(&self, range: R) -> Result<Iter<'_, K, V, B>>
	where
		R: RangeBounds<K>,
		K: Clone,
	{
		let side = |bound: Bound<&K>| match bound {
			Bound::Included(k) => Some((k.clone(), true)),
			Bound::Excluded(k) => Some((k.clone(), false)),
			Bound::Unbounded => None,
		};
		let bounds =
			Bounds::unbounded().narrow(side(range.start_bound()), side(range.end_bound()), &self.cmp)?;
		Ok(Iter::new(&self.raw, bounds.lowest(self), bounds.highest(self), Direction::Forward))
	}

	/// Returns a bidirectional cursor positioned before the first entry.
	pub fn cursor(&self) -> Cursor<'_, &Self> {
		Cursor::new(self, Full, Direction::Forward)
	}

	/// Returns a bidirectional cursor that can remove entries and modify
	/// values, positioned before the first entry.
	///
	/// # Example
	///
	/// ```
	/// use navtree::TreeMap;
	///
	/// let mut map: TreeMap<i32, i32> = (1..=3).map(|k| (k, k)).collect();
	/// let mut cursor = map.cursor_mut();
	///
	/// assert_eq!(cursor.next(), Some((&1, &1)));
	/// assert_eq!(cursor.next(), Some((&2, &2)));
	/// assert_eq!(cursor.remove(), Ok((2, 2)));
	/// assert_eq!(cursor.next(), Some((&3, &3)));
	///
	/// assert_eq!(map.len(), 2);
	/// ```
	pub fn cursor_mut(&mut self) -> Cursor<'_, &mut Self> {
		Cursor::new(self, Full, Direction::Forward)
	}

	// -----------------------------------------------------------------------
	// Views
	// -----------------------------------------------------------------------

	/// Returns a view of the keys from `from` to `to`.
	///
	/// # Errors
	///
	/// [`Error::InvalidRange`] if `from` is after `to`.
	///
	/// # Example
	///
	/// ```
	/// use navtree::TreeMap;
	///
	/// let map: TreeMap<i32, ()> = (1..=5).map(|k| (k, ())).collect();
	/// let sub = map.sub_map(2, true, 4, false).unwrap();
	/// assert_eq!(sub.key_set().iter().copied().collect::<Vec<_>>(), vec![2, 3]);
	/// ```
	pub fn sub_map(
		&self,
		from: K,
		from_inclusive: bool,
		to: K,
		to_inclusive: bool,
	) -> Result<SubMap<'_, &Self, Bounds<K>>>
	where
		K: Clone,
	{
		let bounds = Bounds::unbounded().narrow(Some((from, from_inclusive)), Some((to, to_inclusive)), &self.cmp)?;
		Ok(SubMap::new(self, bounds, Direction::Forward))
	}

	/// Read-write variant of [`sub_map`](TreeMap::sub_map).
	pub fn sub_map_mut(
		&mut self,
		from: K,
		from_inclusive: bool,
		to: K,
		to_inclusive: bool,
	) -> Result<SubMap<'_, &mut Self, Bounds<K>>>
	where
		K: Clone,
	{
		let bounds = Bounds::unbounded().narrow(Some((from, from_inclusive)), Some((to, to_inclusive)), &self.cmp)?;
		Ok(SubMap::new(self, bounds, Direction::Forward))
	}

	/// Returns a view of the keys below `to` (or up to it, if inclusive).
	pub fn head_map(&self, to: K, inclusive: bool) -> SubMap<'_, &Self, Bounds<K>>
	where
		K: Clone,
	{
		SubMap::new(self, Bounds::new(Bound::Unbounded, bound(to, inclusive)), Direction::Forward)
	}

	/// Read-write variant of [`head_map`](TreeMap::head_map).
	pub fn head_map_mut(&mut self, to: K, inclusive: bool) -> SubMap<'_, &mut Self, Bounds<K>>
	where
		K: Clone,
	{
		SubMap::new(self, Bounds::new(Bound::Unbounded, bound(to, inclusive)), Direction::Forward)
	}

	/// Returns a view of the keys above `from` (or from it, if inclusive).
	pub fn tail_map(&self, from: K, inclusive: bool) -> SubMap<'_, &Self, Bounds<K>>
	where
		K: Clone,
	{
		SubMap::new(self, Bounds::new(bound(from, inclusive), Bound::Unbounded), Direction::Forward)
	}

	/// Read-write variant of [`tail_map`](TreeMap::tail_map).
	pub fn tail_map_mut(&mut self, from: K, inclusive: bool) -> SubMap<'_, &mut Self, Bounds<K>>
	where
		K: Clone,
	{
		SubMap::new(self, Bounds::new(bound(from, inclusive), Bound::Unbounded), Direction::Forward)
	}

	/// Returns a view of the whole map in descending key order.
	///
	/// # Example
	///
	/// ```
	/// use navtree::TreeMap;
	///
	/// let map: TreeMap<i32, char> = [(1, 'a'), (2, 'b'), (3, 'c')].into();
	/// let desc = map.descending_map();
	/// assert_eq!(desc.first_key(), Ok(&3));
	/// assert_eq!(desc.higher_key(&2), Some(&1));
	/// ```
	pub fn descending_map(&self) -> SubMap<'_, &Self, Full> {
		SubMap::new(self, Full, Direction::Reverse)
	}

	/// Read-write variant of [`descending_map`](TreeMap::descending_map).
	pub fn descending_map_mut(&mut self) -> SubMap<'_, &mut Self, Full> {
		SubMap::new(self, Full, Direction::Reverse)
	}

	/// Returns a view of the whole map. Useful to treat the map and its
	/// range views uniformly.
	pub fn as_sub_map(&self) -> SubMap<'_, &Self, Full> {
		SubMap::new(self, Full, Direction::Forward)
	}

	/// Read-write variant of [`as_sub_map`](TreeMap::as_sub_map).
	pub fn as_sub_map_mut(&mut self) -> SubMap<'_, &mut Self, Full> {
		SubMap::new(self, Full, Direction::Forward)
	}

	/// Returns a navigable view of the keys in ascending order.
	pub fn key_set(&self) -> KeySet<'_, &Self, Full> {
		KeySet::new(self.as_sub_map())
	}

	/// Same as [`key_set`](TreeMap::key_set).
	pub fn navigable_key_set(&self) -> KeySet<'_, &Self, Full> {
		self.key_set()
	}

	/// Returns a navigable view of the keys in descending order.
	pub fn descending_key_set(&self) -> KeySet<'_, &Self, Full> {
		KeySet::new(self.descending_map())
	}

	/// Read-write variant of [`key_set`](TreeMap::key_set), supporting
	/// removal.
	pub fn key_set_mut(&mut self) -> KeySet<'_, &mut Self, Full> {
		KeySet::new(self.as_sub_map_mut())
	}

	/// Returns a view of the values in ascending key order.
	pub fn values(&self) -> Values<'_, &Self, Full> {
		Values::new(self.as_sub_map())
	}

	/// Read-write variant of [`values`](TreeMap::values), supporting
	/// removal and in-place modification.
	pub fn values_mut(&mut self) -> Values<'_, &mut Self, Full> {
		Values::new(self.as_sub_map_mut())
	}

	/// Returns a view of the entries in ascending key order.
	pub fn entry_set(&self) -> EntrySet<'_, &Self, Full> {
		EntrySet::new(self.as_sub_map())
	}

	/// Read-write variant of [`entry_set`](TreeMap::entry_set), supporting
	/// removal.
	pub fn entry_set_mut(&mut self) -> EntrySet<'_, &mut Self, Full> {
		EntrySet::new(self.as_sub_map_mut())
	}
}

#[inline]
pub(crate) fn bound<K>(key: K, inclusive: bool) -> Bound<K> {
	if inclusive {
		Bound::Included(key)
	} else {
		Bound::Excluded(key)
	}
}

// ---------------------------------------------------------------------------
// Invariant Checking
// ---------------------------------------------------------------------------

impl<K: fmt::Debug, V, B: Balance, C: Comparator<K>> TreeMap<K, V, B, C> {
	/// Validates all tree invariants. Panics with diagnostic info if any
	/// invariant is violated.
	///
	/// This function should be called after operations in tests to verify the
	/// tree maintains its structural integrity.
	///
	/// # Invariants Checked
	///
	/// 1. Parent links agree with child links
	/// 2. `len` matches the number of reachable nodes
	/// 3. Keys are strictly increasing in order
	/// 4. The cached first/last nodes are the minimum/maximum
	/// 5. The balancing strategy's invariant (colours or heights)
	pub fn assert_invariants(&self) {
		self.raw.assert_invariants(&self.cmp);
	}
}

// ---------------------------------------------------------------------------
// Trait Implementations
// ---------------------------------------------------------------------------

impl<K: Clone, V: Clone, B: Balance, C: Clone> Clone for TreeMap<K, V, B, C> {
	/// Copies the map in O(n), preserving the tree shape.
	fn clone(&self) -> Self {
		trace!(len = self.raw.len(), strategy = B::NAME, "copying tree map");
		TreeMap {
			raw: self.raw.clone(),
			cmp: self.cmp.clone(),
			default_value: self.default_value.clone(),
		}
	}
}

impl<K: fmt::Debug, V: fmt::Debug, B: Balance, C> fmt::Debug for TreeMap<K, V, B, C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let iter = Iter::new(&self.raw, self.raw.first(), self.raw.last(), Direction::Forward);
		f.debug_map().entries(iter).finish()
	}
}

impl<K: PartialEq, V: PartialEq, B: Balance, C> PartialEq for TreeMap<K, V, B, C> {
	/// Maps are equal when they hold equal entries in the same order.
	fn eq(&self, other: &Self) -> bool {
		if self.raw.len() != other.raw.len() {
			return false;
		}
		let ours = Iter::new(&self.raw, self.raw.first(), self.raw.last(), Direction::Forward);
		let theirs = Iter::new(&other.raw, other.raw.first(), other.raw.last(), Direction::Forward);
		ours.eq(theirs)
	}
}

impl<K: Eq, V: Eq, B: Balance, C> Eq for TreeMap<K, V, B, C> {}

impl<K, V, B: Balance, C: Comparator<K>> Extend<(K, V)> for TreeMap<K, V, B, C> {
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
		for (k, v) in iter {
			self.insert(k, v);
		}
	}
}

impl<K, V, B: Balance, C: Comparator<K> + Default> FromIterator<(K, V)> for TreeMap<K, V, B, C> {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self::from_entries(C::default(), iter)
	}
}

impl<K, V, B: Balance, C: Comparator<K> + Default, const N: usize> From<[(K, V); N]> for TreeMap<K, V, B, C> {
	fn from(entries: [(K, V); N]) -> Self {
		Self::from_entries(C::default(), entries)
	}
}

impl<'a, K, V, B: Balance, C> IntoIterator for &'a TreeMap<K, V, B, C> {
	type Item = (&'a K, &'a V);
	type IntoIter = Iter<'a, K, V, B>;

	fn into_iter(self) -> Self::IntoIter {
		Iter::new(&self.raw, self.raw.first(), self.raw.last(), Direction::Forward)
	}
}

impl<K, V, B: Balance, C> IntoIterator for TreeMap<K, V, B, C> {
	type Item = (K, V);
	type IntoIter = IntoIter<K, V, B>;

	fn into_iter(self) -> Self::IntoIter {
		IntoIter::new(self.raw)
	}
}
