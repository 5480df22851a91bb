//! Live views of a map.
//!
//! A [`SubMap`] pairs a borrowed map with a [`Window`] and a [`Direction`].
//! It never copies nodes: reads resolve against the map's tree and writes
//! land in it. `SubMap<'_, &TreeMap, _>` is read-only, `SubMap<'_, &mut TreeMap, _>`
//! can also insert and remove entries inside its window.
//!
//! Every navigation query goes through one adapter that, for a descending
//! view, swaps lowest/highest, lower/higher and floor/ceiling. Nested views
//! take their bounds in the view's own order and are built directly over
//! the backing map, never as a chain of wrappers.
//!
//! ```text
//!   map:         1   2   3   4   5   6   7
//!   sub_map(2, true, 6, false)
//!   ascending:       2 → 3 → 4 → 5
//!   descending:      5 → 4 → 3 → 2
//! ```

use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::accumulate::Accumulate;
use crate::balance::Balance;
use crate::collections::{EntrySet, KeySet, Values};
use crate::compare::Comparator;
use crate::error::{Error, Result};
use crate::iter::{Cursor, Iter};
use crate::node::NodeIndex;
use crate::window::{Bounds, Window};
use crate::{Direction, TreeMap};

/// A navigation query, in view order.
#[derive(Debug, Clone, Copy)]
enum Query {
	Lower,
	Floor,
	Ceiling,
	Higher,
}

impl Query {
	fn flip(self) -> Query {
		match self {
			Query::Lower => Query::Higher,
			Query::Floor => Query::Ceiling,
			Query::Ceiling => Query::Floor,
			Query::Higher => Query::Lower,
		}
	}
}

/// A window onto a map, ascending or descending.
///
/// Created by [`TreeMap::sub_map`], [`TreeMap::head_map`],
/// [`TreeMap::tail_map`], [`TreeMap::descending_map`] and their `_mut`
/// variants.
///
/// # Example
///
/// ```
/// use navtree::TreeMap;
///
/// let mut map: TreeMap<i32, i32> = (1..=5).map(|k| (k, k)).collect();
///
/// let mut sub = map.sub_map_mut(2, true, 4, false).unwrap();
/// assert_eq!(sub.len(), 2);
/// assert!(sub.insert(5, 50).is_err()); // out of range
/// sub.clear();
///
/// assert_eq!(map.len(), 3);
/// ```
pub struct SubMap<'a, M, W> {
	map: M,
	window: W,
	direction: Direction,
	borrow: PhantomData<&'a ()>,
}

impl<'a, M, W> SubMap<'a, M, W> {
	pub(crate) fn new(map: M, window: W, direction: Direction) -> Self {
		SubMap {
			map,
			window,
			direction,
			borrow: PhantomData,
		}
	}

	/// The order this view iterates in.
	pub fn direction(&self) -> Direction {
		self.direction
	}

	/// The window this view sees through.
	pub fn window(&self) -> &W {
		&self.window
	}
}

impl<'a, M, W, K, V, B, C> SubMap<'a, M, W>
where
	M: Deref<Target = TreeMap<K, V, B, C>>,
	W: Window<K>,
	K: 'a,
	V: 'a,
	B: Balance,
	C: Comparator<K> + 'a,
{
	// -----------------------------------------------------------------------
	// Resolution
	// -----------------------------------------------------------------------

	#[inline]
	fn tree(&self) -> &TreeMap<K, V, B, C> {
		&self.map
	}

	/// The first node in view order.
	pub(crate) fn first_node(&self) -> Option<NodeIndex> {
		match self.direction {
			Direction::Forward => self.window.lowest(self.tree()),
			Direction::Reverse => self.window.highest(self.tree()),
		}
	}

	/// The last node in view order.
	pub(crate) fn last_node(&self) -> Option<NodeIndex> {
		match self.direction {
			Direction::Forward => self.window.highest(self.tree()),
			Direction::Reverse => self.window.lowest(self.tree()),
		}
	}

	fn resolve(&self, query: Query, key: &K) -> Option<NodeIndex> {
		let query = match self.direction {
			Direction::Forward => query,
			Direction::Reverse => query.flip(),
		};
		let map = self.tree();
		match query {
			Query::Lower => self.window.lower(map, key),
			Query::Floor => self.window.floor(map, key),
			Query::Ceiling => self.window.ceiling(map, key),
			Query::Higher => self.window.higher(map, key),
		}
	}

	#[inline]
	fn in_window(&self, key: &K) -> bool {
		self.window.contains(key, &self.map.cmp)
	}

	#[inline]
	fn key_of(&self, node: Option<NodeIndex>) -> Option<&K> {
		node.map(|n| self.map.raw.key(n))
	}

	#[inline]
	fn entry_of(&self, node: Option<NodeIndex>) -> Option<(&K, &V)> {
		node.map(|n| self.map.raw.entry(n))
	}

	/// The node holding `key`, if it is inside the window.
	pub(crate) fn find(&self, key: &K) -> Option<NodeIndex> {
		if !self.in_window(key) {
			return None;
		}
		self.map.raw.find(key, &self.map.cmp)
	}

	/// Converts bounds given in view order into a narrowed window.
	fn narrowed(&self, from: Option<(K, bool)>, to: Option<(K, bool)>) -> Result<Bounds<K>>
	where
		K: Clone,
	{
		let (lo, hi) = match self.direction {
			Direction::Forward => (from, to),
			Direction::Reverse => (to, from),
		};
		self.window.to_bounds().narrow(lo, hi, &self.map.cmp)
	}

	// -----------------------------------------------------------------------
	// Size and Lookup
	// -----------------------------------------------------------------------

	/// Number of entries in the view.
	///
	/// O(1) for a whole-map view, O(k) in the number of visible entries for
	/// a bounded one.
	pub fn len(&self) -> usize {
		self.window.count(self.tree())
	}

	pub fn is_empty(&self) -> bool {
		self.first_node().is_none()
	}

	/// Returns `true` if `key` is in the window and present in the map.
	pub fn contains_key(&self, key: &K) -> bool {
		self.find(key).is_some()
	}

	/// Returns the value of `key`. Keys outside the window read as absent.
	pub fn get(&self, key: &K) -> Option<&V> {
		self.find(key).map(|n| self.map.raw.value(n))
	}

	// -----------------------------------------------------------------------
	// Navigation
	// -----------------------------------------------------------------------

	/// The first key in view order.
	///
	/// # Errors
	///
	/// [`Error::NoSuchElement`] if the view is empty.
	pub fn first_key(&self) -> Result<&K> {
		self.key_of(self.first_node()).ok_or(Error::NoSuchElement)
	}

	/// The last key in view order.
	///
	/// # Errors
	///
	/// [`Error::NoSuchElement`] if the view is empty.
	pub fn last_key(&self) -> Result<&K> {
		self.key_of(self.last_node()).ok_or(Error::NoSuchElement)
	}

	pub fn first_entry(&self) -> Option<(&K, &V)> {
		self.entry_of(self.first_node())
	}

	pub fn last_entry(&self) -> Option<(&K, &V)> {
		self.entry_of(self.last_node())
	}

	/// The greatest key before `key` in view order.
	pub fn lower_key(&self, key: &K) -> Option<&K> {
		self.key_of(self.resolve(Query::Lower, key))
	}

	/// The greatest key at or before `key` in view order.
	pub fn floor_key(&self, key: &K) -> Option<&K> {
		self.key_of(self.resolve(Query::Floor, key))
	}

	/// The least key at or after `key` in view order.
	pub fn ceiling_key(&self, key: &K) -> Option<&K> {
		self.key_of(self.resolve(Query::Ceiling, key))
	}

	/// The least key after `key` in view order.
	pub fn higher_key(&self, key: &K) -> Option<&K> {
		self.key_of(self.resolve(Query::Higher, key))
	}

	pub fn lower_entry(&self, key: &K) -> Option<(&K, &V)> {
		self.entry_of(self.resolve(Query::Lower, key))
	}

	pub fn floor_entry(&self, key: &K) -> Option<(&K, &V)> {
		self.entry_of(self.resolve(Query::Floor, key))
	}

	pub fn ceiling_entry(&self, key: &K) -> Option<(&K, &V)> {
		self.entry_of(self.resolve(Query::Ceiling, key))
	}

	pub fn higher_entry(&self, key: &K) -> Option<(&K, &V)> {
		self.entry_of(self.resolve(Query::Higher, key))
	}

	// -----------------------------------------------------------------------
	// Iteration
	// -----------------------------------------------------------------------

	/// Returns an iterator over the entries in view order.
	pub fn iter(&self) -> Iter<'_, K, V, B> {
		let map = self.tree();
		Iter::new(&map.raw, self.window.lowest(map), self.window.highest(map), self.direction)
	}

	/// Returns a cursor over the view, positioned before its first entry.
	pub fn cursor(&self) -> Cursor<'_, &TreeMap<K, V, B, C>, W> {
		Cursor::new(self.tree(), self.window.clone(), self.direction)
	}

	// -----------------------------------------------------------------------
	// Derived Views
	// -----------------------------------------------------------------------

	/// A view of the keys, in view order.
	pub fn key_set(&self) -> KeySet<'_, &TreeMap<K, V, B, C>, W> {
		KeySet::new(SubMap::new(self.tree(), self.window.clone(), self.direction))
	}

	/// A view of the values, in view order.
	pub fn values(&self) -> Values<'_, &TreeMap<K, V, B, C>, W> {
		Values::new(SubMap::new(self.tree(), self.window.clone(), self.direction))
	}

	/// A view of the entries, in view order.
	pub fn entry_set(&self) -> EntrySet<'_, &TreeMap<K, V, B, C>, W> {
		EntrySet::new(SubMap::new(self.tree(), self.window.clone(), self.direction))
	}

	/// The same window in the opposite order.
	pub fn descending_map(&self) -> SubMap<'_, &TreeMap<K, V, B, C>, W> {
		SubMap::new(self.tree(), self.window.clone(), self.direction.flip())
	}

	/// A nested view from `from` to `to`, both in this view's order.
	///
	/// # Errors
	///
	/// - [`Error::KeyOutOfRange`] if a bound lies outside this view.
	/// - [`Error::InvalidRange`] if `from` comes after `to`.
	pub fn sub_map(
		&self,
		from: K,
		from_inclusive: bool,
		to: K,
		to_inclusive: bool,
	) -> Result<SubMap<'_, &TreeMap<K, V, B, C>, Bounds<K>>>
	where
		K: Clone,
	{
		let bounds = self.narrowed(Some((from, from_inclusive)), Some((to, to_inclusive)))?;
		Ok(SubMap::new(self.tree(), bounds, self.direction))
	}

	/// A nested view of the keys before `to` in this view's order.
	///
	/// # Errors
	///
	/// [`Error::KeyOutOfRange`] if `to` lies outside this view.
	pub fn head_map(&self, to: K, inclusive: bool) -> Result<SubMap<'_, &TreeMap<K, V, B, C>, Bounds<K>>>
	where
		K: Clone,
	{
		let bounds = self.narrowed(None, Some((to, inclusive)))?;
		Ok(SubMap::new(self.tree(), bounds, self.direction))
	}

	/// A nested view of the keys after `from` in this view's order.
	///
	/// # Errors
	///
	/// [`Error::KeyOutOfRange`] if `from` lies outside this view.
	pub fn tail_map(&self, from: K, inclusive: bool) -> Result<SubMap<'_, &TreeMap<K, V, B, C>, Bounds<K>>>
	where
		K: Clone,
	{
		let bounds = self.narrowed(Some((from, inclusive)), None)?;
		Ok(SubMap::new(self.tree(), bounds, self.direction))
	}
}

impl<'a, M, W, K, V, B, C> SubMap<'a, M, W>
where
	M: DerefMut<Target = TreeMap<K, V, B, C>>,
	W: Window<K>,
	K: 'a,
	V: 'a,
	B: Balance,
	C: Comparator<K> + 'a,
{
	#[inline]
	fn tree_mut(&mut self) -> &mut TreeMap<K, V, B, C> {
		&mut self.map
	}

	fn check_in_window(&self, key: &K) -> Result<()> {
		if self.in_window(key) {
			Ok(())
		} else {
			debug!(direction = ?self.direction, "key outside the view's range");
			Err(Error::KeyOutOfRange)
		}
	}

	// -----------------------------------------------------------------------
	// Mutation
	// -----------------------------------------------------------------------

	/// Inserts an entry through the view.
	///
	/// # Errors
	///
	/// [`Error::KeyOutOfRange`] if `key` lies outside the window.
	pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
		self.check_in_window(&key)?;
		Ok(self.tree_mut().insert(key, value))
	}

	/// Removes `key` if it is inside the window.
	pub fn remove(&mut self, key: &K) -> Option<V> {
		self.remove_entry(key).map(|(_, v)| v)
	}

	/// Removes `key` if it is inside the window, returning the stored entry.
	pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
		let node = self.find(key)?;
		Some(self.map.raw.remove_node(node))
	}

	/// Returns a mutable reference to the value of `key`, if inside the
	/// window.
	pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
		let node = self.find(key)?;
		Some(self.map.raw.value_mut(node))
	}

	/// [`TreeMap::add_to`] through the view.
	///
	/// # Errors
	///
	/// [`Error::KeyOutOfRange`] if `key` lies outside the window.
	pub fn add_to(&mut self, key: K, delta: V) -> Result<V>
	where
		V: Accumulate,
	{
		self.check_in_window(&key)?;
		Ok(self.tree_mut().add_to(key, delta))
	}

	/// [`TreeMap::sub_from`] through the view.
	///
	/// # Errors
	///
	/// [`Error::KeyOutOfRange`] if `key` lies outside the window.
	pub fn sub_from(&mut self, key: K, delta: V) -> Result<V>
	where
		V: Accumulate,
	{
		self.check_in_window(&key)?;
		Ok(self.tree_mut().sub_from(key, delta))
	}

	/// Removes and returns the first entry in view order.
	pub fn poll_first(&mut self) -> Option<(K, V)> {
		let node = self.first_node()?;
		Some(self.map.raw.remove_node(node))
	}

	/// Removes and returns the last entry in view order.
	pub fn poll_last(&mut self) -> Option<(K, V)> {
		let node = self.last_node()?;
		Some(self.map.raw.remove_node(node))
	}

	/// Removes every entry inside the window. Entries outside are kept.
	pub fn clear(&mut self) {
		while let Some(node) = self.window.lowest(self.tree()) {
			self.map.raw.remove_node(node);
		}
	}

	/// Returns a cursor that can remove entries, positioned before the
	/// view's first entry.
	pub fn cursor_mut(&mut self) -> Cursor<'_, &mut TreeMap<K, V, B, C>, W> {
		let window = self.window.clone();
		let direction = self.direction;
		Cursor::new(self.tree_mut(), window, direction)
	}

	// -----------------------------------------------------------------------
	// Derived Read-Write Views
	// -----------------------------------------------------------------------

	fn reborrow_mut(&mut self, direction: Direction) -> SubMap<'_, &mut TreeMap<K, V, B, C>, W> {
		let window = self.window.clone();
		SubMap::new(self.tree_mut(), window, direction)
	}

	/// Read-write variant of [`key_set`](SubMap::key_set).
	pub fn key_set_mut(&mut self) -> KeySet<'_, &mut TreeMap<K, V, B, C>, W> {
		let direction = self.direction;
		KeySet::new(self.reborrow_mut(direction))
	}

	/// Read-write variant of [`values`](SubMap::values).
	pub fn values_mut(&mut self) -> Values<'_, &mut TreeMap<K, V, B, C>, W> {
		let direction = self.direction;
		Values::new(self.reborrow_mut(direction))
	}

	/// Read-write variant of [`entry_set`](SubMap::entry_set).
	pub fn entry_set_mut(&mut self) -> EntrySet<'_, &mut TreeMap<K, V, B, C>, W> {
		let direction = self.direction;
		EntrySet::new(self.reborrow_mut(direction))
	}

	/// Read-write variant of [`descending_map`](SubMap::descending_map).
	pub fn descending_map_mut(&mut self) -> SubMap<'_, &mut TreeMap<K, V, B, C>, W> {
		let direction = self.direction.flip();
		self.reborrow_mut(direction)
	}

	/// Read-write variant of [`sub_map`](SubMap::sub_map).
	pub fn sub_map_mut(
		&mut self,
		from: K,
		from_inclusive: bool,
		to: K,
		to_inclusive: bool,
	) -> Result<SubMap<'_, &mut TreeMap<K, V, B, C>, Bounds<K>>>
	where
		K: Clone,
	{
		let bounds = self.narrowed(Some((from, from_inclusive)), Some((to, to_inclusive)))?;
		let direction = self.direction;
		Ok(SubMap::new(self.tree_mut(), bounds, direction))
	}

	/// Read-write variant of [`head_map`](SubMap::head_map).
	pub fn head_map_mut(&mut self, to: K, inclusive: bool) -> Result<SubMap<'_, &mut TreeMap<K, V, B, C>, Bounds<K>>>
	where
		K: Clone,
	{
		let bounds = self.narrowed(None, Some((to, inclusive)))?;
		let direction = self.direction;
		Ok(SubMap::new(self.tree_mut(), bounds, direction))
	}

	/// Read-write variant of [`tail_map`](SubMap::tail_map).
	pub fn tail_map_mut(&mut self, from: K, inclusive: bool) -> Result<SubMap<'_, &mut TreeMap<K, V, B, C>, Bounds<K>>>
	where
		K: Clone,
	{
		let bounds = self.narrowed(Some((from, inclusive)), None)?;
		let direction = self.direction;
		Ok(SubMap::new(self.tree_mut(), bounds, direction))
	}
}

impl<'a, K, V, B, C, W> IntoIterator for SubMap<'a, &'a TreeMap<K, V, B, C>, W>
where
	W: Window<K>,
	B: Balance,
	C: Comparator<K>,
{
	type Item = (&'a K, &'a V);
	type IntoIter = Iter<'a, K, V, B>;

	fn into_iter(self) -> Self::IntoIter {
		let map: &'a TreeMap<K, V, B, C> = self.map;
		Iter::new(&map.raw, self.window.lowest(map), self.window.highest(map), self.direction)
	}
}

impl<'a, M, W, K, V, B, C> std::fmt::Debug for SubMap<'a, M, W>
where
	M: Deref<Target = TreeMap<K, V, B, C>>,
	W: Window<K>,
	K: std::fmt::Debug + 'a,
	V: std::fmt::Debug + 'a,
	B: Balance,
	C: Comparator<K> + 'a,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_map().entries(self.iter()).finish()
	}
}
