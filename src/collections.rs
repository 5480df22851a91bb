//! Key, value and entry views.
//!
//! Each view wraps a [`SubMap`], so it exists for the whole map, any range
//! and either direction. Over `&mut TreeMap` the views can remove entries
//! (and [`Values`] can modify values in place), but never add: there is no
//! value to pair a bare key with, so `insert` always fails with
//! [`Error::Unsupported`].

use std::ops::{Deref, DerefMut};

use crate::balance::Balance;
use crate::compare::Comparator;
use crate::error::{Error, Result};
use crate::iter::{Iter, Keys, ValueIter};
use crate::view::SubMap;
use crate::window::{Bounds, Window};
use crate::TreeMap;

// ---------------------------------------------------------------------------
// KeySet
// ---------------------------------------------------------------------------

/// A navigable set of the keys of a map or view.
///
/// # Example
///
/// ```
/// use navtree::TreeMap;
///
/// let mut map: TreeMap<i32, ()> = (1..=6).map(|k| (k, ())).collect();
///
/// let keys = map.descending_key_set();
/// assert_eq!(keys.first(), Ok(&6));
/// assert_eq!(keys.higher(&4), Some(&3));
///
/// let mut keys = map.key_set_mut();
/// assert!(keys.remove(&2));
/// assert!(keys.insert(7).is_err());
/// assert_eq!(keys.poll_first(), Some(1));
/// assert_eq!(map.len(), 4);
/// ```
pub struct KeySet<'a, M, W> {
	view: SubMap<'a, M, W>,
}

impl<'a, M, W> KeySet<'a, M, W> {
	pub(crate) fn new(view: SubMap<'a, M, W>) -> Self {
		KeySet {
			view,
		}
	}
}

impl<'a, M, W, K, V, B, C> KeySet<'a, M, W>
where
	M: Deref<Target = TreeMap<K, V, B, C>>,
	W: Window<K>,
	K: 'a,
	V: 'a,
	B: Balance,
	C: Comparator<K> + 'a,
{
	pub fn len(&self) -> usize {
		self.view.len()
	}

	pub fn is_empty(&self) -> bool {
		self.view.is_empty()
	}

	pub fn contains(&self, key: &K) -> bool {
		self.view.contains_key(key)
	}

	pub fn iter(&self) -> Keys<'_, K, V, B> {
		Keys::new(self.view.iter())
	}

	/// The first key in set order.
	///
	/// # Errors
	///
	/// [`Error::NoSuchElement`] if the set is empty.
	pub fn first(&self) -> Result<&K> {
		self.view.first_key()
	}

	/// The last key in set order.
	///
	/// # Errors
	///
	/// [`Error::NoSuchElement`] if the set is empty.
	pub fn last(&self) -> Result<&K> {
		self.view.last_key()
	}

	pub fn lower(&self, key: &K) -> Option<&K> {
		self.view.lower_key(key)
	}

	pub fn floor(&self, key: &K) -> Option<&K> {
		self.view.floor_key(key)
	}

	pub fn ceiling(&self, key: &K) -> Option<&K> {
		self.view.ceiling_key(key)
	}

	pub fn higher(&self, key: &K) -> Option<&K> {
		self.view.higher_key(key)
	}

	/// The same keys in the opposite order.
	pub fn descending_set(&self) -> KeySet<'_, &TreeMap<K, V, B, C>, W> {
		KeySet::new(self.view.descending_map())
	}

	/// A nested set from `from` to `to`, both in this set's order.
	///
	/// # Errors
	///
	/// As [`SubMap::sub_map`].
	pub fn sub_set(
		&self,
		from: K,
		from_inclusive: bool,
		to: K,
		to_inclusive: bool,
	) -> Result<KeySet<'_, &TreeMap<K, V, B, C>, Bounds<K>>>
	where
		K: Clone,
	{
		self.view.sub_map(from, from_inclusive, to, to_inclusive).map(KeySet::new)
	}

	/// A nested set of the keys before `to` in this set's order.
	///
	/// # Errors
	///
	/// As [`SubMap::head_map`].
	pub fn head_set(&self, to: K, inclusive: bool) -> Result<KeySet<'_, &TreeMap<K, V, B, C>, Bounds<K>>>
	where
		K: Clone,
	{
		self.view.head_map(to, inclusive).map(KeySet::new)
	}

	/// A nested set of the keys after `from` in this set's order.
	///
	/// # Errors
	///
	/// As [`SubMap::tail_map`].
	pub fn tail_set(&self, from: K, inclusive: bool) -> Result<KeySet<'_, &TreeMap<K, V, B, C>, Bounds<K>>>
	where
		K: Clone,
	{
		self.view.tail_map(from, inclusive).map(KeySet::new)
	}
}

impl<'a, M, W, K, V, B, C> KeySet<'a, M, W>
where
	M: DerefMut<Target = TreeMap<K, V, B, C>>,
	W: Window<K>,
	K: 'a,
	V: 'a,
	B: Balance,
	C: Comparator<K> + 'a,
{
	/// Always fails: a key set cannot supply a value.
	///
	/// # Errors
	///
	/// [`Error::Unsupported`], unconditionally.
	pub fn insert(&mut self, _key: K) -> Result<bool> {
		Err(Error::Unsupported)
	}

	/// Removes `key` from the backing map. Returns `true` if it was present
	/// in this set.
	pub fn remove(&mut self, key: &K) -> bool {
		self.view.remove(key).is_some()
	}

	pub fn poll_first(&mut self) -> Option<K> {
		self.view.poll_first().map(|(k, _)| k)
	}

	pub fn poll_last(&mut self) -> Option<K> {
		self.view.poll_last().map(|(k, _)| k)
	}

	/// Removes every key in this set from the backing map.
	pub fn clear(&mut self) {
		self.view.clear();
	}
}

impl<'a, K, V, B, C, W> IntoIterator for KeySet<'a, &'a TreeMap<K, V, B, C>, W>
where
	W: Window<K>,
	B: Balance,
	C: Comparator<K>,
{
	type Item = &'a K;
	type IntoIter = Keys<'a, K, V, B>;

	fn into_iter(self) -> Self::IntoIter {
		Keys::new(self.view.into_iter())
	}
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// The values of a map or view, in key order.
pub struct Values<'a, M, W> {
	view: SubMap<'a, M, W>,
}

impl<'a, M, W> Values<'a, M, W> {
	pub(crate) fn new(view: SubMap<'a, M, W>) -> Self {
		Values {
			view,
		}
	}
}

impl<'a, M, W, K, V, B, C> Values<'a, M, W>
where
	M: Deref<Target = TreeMap<K, V, B, C>>,
	W: Window<K>,
	K: 'a,
	V: 'a,
	B: Balance,
	C: Comparator<K> + 'a,
{
	pub fn len(&self) -> usize {
		self.view.len()
	}

	pub fn is_empty(&self) -> bool {
		self.view.is_empty()
	}

	pub fn iter(&self) -> ValueIter<'_, K, V, B> {
		ValueIter::new(self.view.iter())
	}

	/// Returns `true` if any visible entry holds `value`. O(k).
	pub fn contains(&self, value: &V) -> bool
	where
		V: PartialEq,
	{
		self.iter().any(|v| v == value)
	}
}

impl<'a, M, W, K, V, B, C> Values<'a, M, W>
where
	M: DerefMut<Target = TreeMap<K, V, B, C>>,
	W: Window<K>,
	K: 'a,
	V: 'a,
	B: Balance,
	C: Comparator<K> + 'a,
{
	/// Always fails: a value cannot be added without a key.
	///
	/// # Errors
	///
	/// [`Error::Unsupported`], unconditionally.
	pub fn insert(&mut self, _value: V) -> Result<bool> {
		Err(Error::Unsupported)
	}

	/// Removes the first entry (in view order) holding `value`.
	pub fn remove(&mut self, value: &V) -> bool
	where
		V: PartialEq,
	{
		let mut cursor = self.view.cursor_mut();
		while let Some((_, v)) = cursor.next() {
			if v == value {
				return cursor.remove().is_ok();
			}
		}
		false
	}

	/// Calls `f` on every visible value, in view order.
	pub fn for_each_mut<F>(&mut self, mut f: F)
	where
		F: FnMut(&mut V),
	{
		let mut cursor = self.view.cursor_mut();
		while cursor.next().is_some() {
			if let Ok(v) = cursor.value_mut() {
				f(v);
			}
		}
	}

	/// Removes every visible entry from the backing map.
	pub fn clear(&mut self) {
		self.view.clear();
	}
}

impl<'a, K, V, B, C, W> IntoIterator for Values<'a, &'a TreeMap<K, V, B, C>, W>
where
	W: Window<K>,
	B: Balance,
	C: Comparator<K>,
{
	type Item = &'a V;
	type IntoIter = ValueIter<'a, K, V, B>;

	fn into_iter(self) -> Self::IntoIter {
		ValueIter::new(self.view.into_iter())
	}
}

// ---------------------------------------------------------------------------
// EntrySet
// ---------------------------------------------------------------------------

/// The entries of a map or view, in view order.
pub struct EntrySet<'a, M, W> {
	view: SubMap<'a, M, W>,
}

impl<'a, M, W> EntrySet<'a, M, W> {
	pub(crate) fn new(view: SubMap<'a, M, W>) -> Self {
		EntrySet {
			view,
		}
	}
}

impl<'a, M, W, K, V, B, C> EntrySet<'a, M, W>
where
	M: Deref<Target = TreeMap<K, V, B, C>>,
	W: Window<K>,
	K: 'a,
	V: 'a,
	B: Balance,
	C: Comparator<K> + 'a,
{
	pub fn len(&self) -> usize {
		self.view.len()
	}

	pub fn is_empty(&self) -> bool {
		self.view.is_empty()
	}

	pub fn iter(&self) -> Iter<'_, K, V, B> {
		self.view.iter()
	}

	/// Returns `true` if the view maps `key` to `value`.
	pub fn contains(&self, key: &K, value: &V) -> bool
	where
		V: PartialEq,
	{
		self.view.get(key) == Some(value)
	}
}

impl<'a, M, W, K, V, B, C> EntrySet<'a, M, W>
where
	M: DerefMut<Target = TreeMap<K, V, B, C>>,
	W: Window<K>,
	K: 'a,
	V: 'a,
	B: Balance,
	C: Comparator<K> + 'a,
{
	/// Always fails: entries are added through the map.
	///
	/// # Errors
	///
	/// [`Error::Unsupported`], unconditionally.
	pub fn insert(&mut self, _entry: (K, V)) -> Result<bool> {
		Err(Error::Unsupported)
	}

	/// Removes `key` only if the view maps it to `value`.
	pub fn remove(&mut self, key: &K, value: &V) -> bool
	where
		V: PartialEq,
	{
		if !self.contains(key, value) {
			return false;
		}
		self.view.remove(key).is_some()
	}

	/// Removes every visible entry from the backing map.
	pub fn clear(&mut self) {
		self.view.clear();
	}
}

impl<'a, K, V, B, C, W> IntoIterator for EntrySet<'a, &'a TreeMap<K, V, B, C>, W>
where
	W: Window<K>,
	B: Balance,
	C: Comparator<K>,
{
	type Item = (&'a K, &'a V);
	type IntoIter = Iter<'a, K, V, B>;

	fn into_iter(self) -> Self::IntoIter {
		self.view.into_iter()
	}
}
