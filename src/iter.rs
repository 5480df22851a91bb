//! Iterators and cursors over a [`TreeMap`] or one of its views.
//!
//! [`Iter`] and its projections walk a fixed span of nodes from both ends.
//! [`Cursor`] is a bidirectional position in a map or view that can also
//! remove entries and modify values when it holds the map mutably.
//!
//! ## Cursor Positions
//!
//! A cursor sits between two entries. `next` returns the entry ahead of it
//! and moves past it; `prev` returns the entry behind it:
//!
//! ```text
//!   fence       behind  ahead       fence
//!    [1]  │  [2]  [3]  ^  [4]  [5]  │  [6]
//!         └──── window [2, 5] ──────┘
//! ```
//!
//! For a bounded window the cursor records the first node outside the window
//! on each side (the fences) when it is created, and stops when a step lands
//! on one.
//!
//! ## Removal
//!
//! [`Cursor::remove`] deletes the entry most recently returned. When that
//! node has two children the tree moves its successor's entry into the
//! removed node's slot, so every cursor pointer at the successor is
//! redirected there.

use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::balance::Balance;
use crate::compare::Comparator;
use crate::error::{Error, Result};
use crate::node::NodeIndex;
use crate::tree::RawTree;
use crate::window::{Full, Window};
use crate::{Direction, TreeMap};

#[inline]
fn step<K, V, B: Balance>(tree: &RawTree<K, V, B>, node: NodeIndex, direction: Direction) -> Option<NodeIndex> {
	match direction {
		Direction::Forward => tree.successor(node),
		Direction::Reverse => tree.predecessor(node),
	}
}

// ---------------------------------------------------------------------------
// Iter
// ---------------------------------------------------------------------------

/// An iterator over the entries of a map or view, in view order.
pub struct Iter<'a, K, V, B: Balance> {
	tree: &'a RawTree<K, V, B>,
	/// Next node yielded by `next`.
	front: Option<NodeIndex>,
	/// Next node yielded by `next_back`.
	back: Option<NodeIndex>,
	direction: Direction,
}

impl<'a, K, V, B: Balance> Iter<'a, K, V, B> {
	/// Creates an iterator over the span `lowest..=highest`. Both ends must
	/// be present for the span to be non-empty.
	pub(crate) fn new(
		tree: &'a RawTree<K, V, B>,
		lowest: Option<NodeIndex>,
		highest: Option<NodeIndex>,
		direction: Direction,
	) -> Self {
		let (front, back) = match (lowest, highest) {
			(Some(lo), Some(hi)) => match direction {
				Direction::Forward => (Some(lo), Some(hi)),
				Direction::Reverse => (Some(hi), Some(lo)),
			},
			_ => (None, None),
		};
		Iter {
			tree,
			front,
			back,
			direction,
		}
	}

	#[inline]
	fn finish(&mut self) {
		self.front = None;
		self.back = None;
	}
}

impl<'a, K, V, B: Balance> Iterator for Iter<'a, K, V, B> {
	type Item = (&'a K, &'a V);

	fn next(&mut self) -> Option<Self::Item> {
		let node = self.front?;
		if self.front == self.back {
			self.finish();
		} else {
			self.front = step(self.tree, node, self.direction);
		}
		Some(self.tree.entry(node))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		match self.front {
			None => (0, Some(0)),
			Some(_) => (1, Some(self.tree.len())),
		}
	}
}

impl<K, V, B: Balance> DoubleEndedIterator for Iter<'_, K, V, B> {
	fn next_back(&mut self) -> Option<Self::Item> {
		let node = self.back?;
		if self.front == self.back {
			self.finish();
		} else {
			self.back = step(self.tree, node, self.direction.flip());
		}
		Some(self.tree.entry(node))
	}
}

impl<K, V, B: Balance> FusedIterator for Iter<'_, K, V, B> {}

impl<K, V, B: Balance> Clone for Iter<'_, K, V, B> {
	fn clone(&self) -> Self {
		Iter {
			tree: self.tree,
			front: self.front,
			back: self.back,
			direction: self.direction,
		}
	}
}

/// An iterator over the keys of a map or view.
pub struct Keys<'a, K, V, B: Balance> {
	inner: Iter<'a, K, V, B>,
}

impl<'a, K, V, B: Balance> Keys<'a, K, V, B> {
	pub(crate) fn new(inner: Iter<'a, K, V, B>) -> Self {
		Keys {
			inner,
		}
	}
}

impl<'a, K, V, B: Balance> Iterator for Keys<'a, K, V, B> {
	type Item = &'a K;

	#[inline]
	fn next(&mut self) -> Option<&'a K> {
		self.inner.next().map(|(k, _)| k)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl<K, V, B: Balance> DoubleEndedIterator for Keys<'_, K, V, B> {
	#[inline]
	fn next_back(&mut self) -> Option<Self::Item> {
		self.inner.next_back().map(|(k, _)| k)
	}
}

impl<K, V, B: Balance> FusedIterator for Keys<'_, K, V, B> {}

/// An iterator over the values of a map or view, in key order.
pub struct ValueIter<'a, K, V, B: Balance> {
	inner: Iter<'a, K, V, B>,
}

impl<'a, K, V, B: Balance> ValueIter<'a, K, V, B> {
	pub(crate) fn new(inner: Iter<'a, K, V, B>) -> Self {
		ValueIter {
			inner,
		}
	}
}

impl<'a, K, V, B: Balance> Iterator for ValueIter<'a, K, V, B> {
	type Item = &'a V;

	#[inline]
	fn next(&mut self) -> Option<&'a V> {
		self.inner.next().map(|(_, v)| v)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl<K, V, B: Balance> DoubleEndedIterator for ValueIter<'_, K, V, B> {
	#[inline]
	fn next_back(&mut self) -> Option<Self::Item> {
		self.inner.next_back().map(|(_, v)| v)
	}
}

impl<K, V, B: Balance> FusedIterator for ValueIter<'_, K, V, B> {}

// ---------------------------------------------------------------------------
// IntoIter
// ---------------------------------------------------------------------------

/// An owning iterator that drains a map in key order.
pub struct IntoIter<K, V, B: Balance> {
	tree: RawTree<K, V, B>,
}

impl<K, V, B: Balance> IntoIter<K, V, B> {
	pub(crate) fn new(tree: RawTree<K, V, B>) -> Self {
		IntoIter {
			tree,
		}
	}
}

impl<K, V, B: Balance> Iterator for IntoIter<K, V, B> {
	type Item = (K, V);

	fn next(&mut self) -> Option<(K, V)> {
		let node = self.tree.first()?;
		Some(self.tree.remove_node(node))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.tree.len(), Some(self.tree.len()))
	}
}

impl<K, V, B: Balance> DoubleEndedIterator for IntoIter<K, V, B> {
	fn next_back(&mut self) -> Option<(K, V)> {
		let node = self.tree.last()?;
		Some(self.tree.remove_node(node))
	}
}

impl<K, V, B: Balance> ExactSizeIterator for IntoIter<K, V, B> {}

impl<K, V, B: Balance> FusedIterator for IntoIter<K, V, B> {}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// Where a cursor is in its life.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum CursorState {
	/// Not moved yet.
	Fresh,
	/// Moved at least once and has more entries ahead.
	Advanced,
	/// Moved at least once and has nothing ahead.
	Exhausted,
}

/// A bidirectional cursor over a map or view.
///
/// `M` is `&TreeMap` for a read-only cursor or `&mut TreeMap` for one that
/// can [`remove`](Cursor::remove) entries and modify values.
///
/// # Example
///
/// ```
/// use navtree::TreeMap;
///
/// let map: TreeMap<i32, &str> = [(1, "a"), (2, "b"), (3, "c")].into();
/// let mut cursor = map.cursor();
///
/// assert_eq!(cursor.next(), Some((&1, &"a")));
/// assert_eq!(cursor.next(), Some((&2, &"b")));
/// // prev() returns the entry just passed
/// assert_eq!(cursor.prev(), Some((&2, &"b")));
///
/// cursor.seek(&3);
/// assert_eq!(cursor.next(), Some((&3, &"c")));
/// assert!(!cursor.has_next());
/// ```
pub struct Cursor<'a, M, W = Full> {
	map: M,
	window: W,
	direction: Direction,
	/// Node returned by the next call to `next`.
	ahead: Option<NodeIndex>,
	/// Node returned by the next call to `prev`.
	behind: Option<NodeIndex>,
	/// First node past the window in the direction of travel.
	fence_ahead: Option<NodeIndex>,
	/// First node past the window against the direction of travel.
	fence_behind: Option<NodeIndex>,
	/// Node most recently returned, cleared by `remove` and seeks.
	last: Option<NodeIndex>,
	moved: bool,
	borrow: PhantomData<&'a ()>,
}

impl<'a, M, W, K, V, B, C> Cursor<'a, M, W>
where
	M: Deref<Target = TreeMap<K, V, B, C>>,
	W: Window<K>,
	K: 'a,
	V: 'a,
	B: Balance,
	C: Comparator<K> + 'a,
{
	pub(crate) fn new(map: M, window: W, direction: Direction) -> Self {
		let (ahead, fence_ahead, fence_behind) = {
			let m: &TreeMap<K, V, B, C> = &map;
			match direction {
				Direction::Forward => (window.lowest(m), window.high_fence(m), window.low_fence(m)),
				Direction::Reverse => (window.highest(m), window.low_fence(m), window.high_fence(m)),
			}
		};
		Cursor {
			map,
			window,
			direction,
			ahead,
			behind: None,
			fence_ahead,
			fence_behind,
			last: None,
			moved: false,
			borrow: PhantomData,
		}
	}

	#[inline]
	fn tree(&self) -> &RawTree<K, V, B> {
		&self.map.raw
	}

	/// The order in which `next` visits entries.
	pub fn direction(&self) -> Direction {
		self.direction
	}

	pub fn state(&self) -> CursorState {
		if !self.moved {
			CursorState::Fresh
		} else if self.has_next() {
			CursorState::Advanced
		} else {
			CursorState::Exhausted
		}
	}

	/// Returns `true` if `next` would return an entry.
	pub fn has_next(&self) -> bool {
		self.ahead.is_some() && self.ahead != self.fence_ahead
	}

	/// Returns `true` if `prev` would return an entry.
	pub fn has_prev(&self) -> bool {
		self.behind.is_some() && self.behind != self.fence_behind
	}

	/// Returns the entry ahead of the cursor and moves past it.
	#[allow(clippy::should_implement_trait)]
	pub fn next(&mut self) -> Option<(&K, &V)> {
		if !self.has_next() {
			return None;
		}
		let node = self.ahead?;
		self.behind = Some(node);
		self.ahead = step(self.tree(), node, self.direction);
		self.last = Some(node);
		self.moved = true;
		Some(self.tree().entry(node))
	}

	/// Returns the entry behind the cursor and moves before it.
	pub fn prev(&mut self) -> Option<(&K, &V)> {
		if !self.has_prev() {
			return None;
		}
		let node = self.behind?;
		self.ahead = Some(node);
		self.behind = step(self.tree(), node, self.direction.flip());
		self.last = Some(node);
		self.moved = true;
		Some(self.tree().entry(node))
	}

	/// Returns the entry `next` would return, without moving.
	pub fn peek_next(&self) -> Option<(&K, &V)> {
		if !self.has_next() {
			return None;
		}
		self.ahead.map(|n| self.tree().entry(n))
	}

	/// Returns the entry `prev` would return, without moving.
	pub fn peek_prev(&self) -> Option<(&K, &V)> {
		if !self.has_prev() {
			return None;
		}
		self.behind.map(|n| self.tree().entry(n))
	}

	/// Returns the entry most recently returned by `next` or `prev`.
	pub fn current(&self) -> Option<(&K, &V)> {
		self.last.map(|n| self.tree().entry(n))
	}

	/// Positions the cursor so that `next` returns the first entry at or
	/// after `key` in cursor order.
	pub fn seek(&mut self, key: &K) {
		let (ahead, behind) = {
			let m: &TreeMap<K, V, B, C> = &self.map;
			match self.direction {
				Direction::Forward => (self.window.ceiling(m, key), self.window.lower(m, key)),
				Direction::Reverse => (self.window.floor(m, key), self.window.higher(m, key)),
			}
		};
		self.reposition(ahead, behind);
	}

	/// Positions the cursor so that `prev` returns the last entry at or
	/// before `key` in cursor order.
	pub fn seek_for_prev(&mut self, key: &K) {
		let (ahead, behind) = {
			let m: &TreeMap<K, V, B, C> = &self.map;
			match self.direction {
				Direction::Forward => (self.window.higher(m, key), self.window.floor(m, key)),
				Direction::Reverse => (self.window.lower(m, key), self.window.ceiling(m, key)),
			}
		};
		self.reposition(ahead, behind);
	}

	/// Positions the cursor before the first entry.
	pub fn seek_to_first(&mut self) {
		let ahead = {
			let m: &TreeMap<K, V, B, C> = &self.map;
			match self.direction {
				Direction::Forward => self.window.lowest(m),
				Direction::Reverse => self.window.highest(m),
			}
		};
		self.reposition(ahead, None);
	}

	/// Positions the cursor after the last entry.
	pub fn seek_to_last(&mut self) {
		let behind = {
			let m: &TreeMap<K, V, B, C> = &self.map;
			match self.direction {
				Direction::Forward => self.window.highest(m),
				Direction::Reverse => self.window.lowest(m),
			}
		};
		self.reposition(None, behind);
	}

	#[inline]
	fn reposition(&mut self, ahead: Option<NodeIndex>, behind: Option<NodeIndex>) {
		self.ahead = ahead;
		self.behind = behind;
		self.last = None;
	}
}

impl<'a, M, W, K, V, B, C> Cursor<'a, M, W>
where
	M: DerefMut<Target = TreeMap<K, V, B, C>>,
	W: Window<K>,
	K: 'a,
	V: 'a,
	B: Balance,
	C: Comparator<K> + 'a,
{
	fn current_node(&self) -> Result<NodeIndex> {
		self.last.ok_or_else(|| {
			debug!(state = ?self.state(), "cursor has no current entry");
			Error::IllegalState
		})
	}

	/// Returns a mutable reference to the value of the entry most recently
	/// returned.
	///
	/// # Errors
	///
	/// [`Error::IllegalState`] if there is no such entry, either because the
	/// cursor has not moved or because the entry was removed.
	pub fn value_mut(&mut self) -> Result<&mut V> {
		let node = self.current_node()?;
		Ok(self.map.raw.value_mut(node))
	}

	/// Like [`value_mut`](Cursor::value_mut), also returning the key.
	pub fn current_mut(&mut self) -> Result<(&K, &mut V)> {
		let node = self.current_node()?;
		Ok(self.map.raw.entry_mut(node))
	}

	/// Removes the entry most recently returned by `next` or `prev`.
	///
	/// The cursor keeps its position: a following `next` returns the entry
	/// after the removed one.
	///
	/// # Errors
	///
	/// [`Error::IllegalState`] if the cursor has not moved, or the entry was
	/// already removed.
	pub fn remove(&mut self) -> Result<(K, V)> {
		let node = self.current_node()?;
		self.last = None;

		let raw = &mut self.map.raw;
		let successor = raw.successor(node);
		let predecessor = raw.predecessor(node);
		let two_children = raw.has_two_children(node);
		let entry = raw.remove_node(node);

		// The successor's entry now lives in the removed node's slot
		let redirect = |n: Option<NodeIndex>| {
			if two_children && n.is_some() && n == successor {
				Some(node)
			} else {
				n
			}
		};
		let successor = redirect(successor);
		self.fence_ahead = redirect(self.fence_ahead);
		self.fence_behind = redirect(self.fence_behind);

		match self.direction {
			Direction::Forward => {
				self.ahead = successor;
				self.behind = predecessor;
			}
			Direction::Reverse => {
				self.ahead = predecessor;
				self.behind = successor;
			}
		}
		Ok(entry)
	}
}
