//! Tree vertices and the arena that owns them.
//!
//! Nodes are stored in a slot arena rather than individually boxed. Links
//! between nodes (`parent`, `left`, `right`) are [`NodeIndex`] handles into
//! the arena, so the parent back-reference is a plain non-owning index and the
//! tree contains no reference cycles. Rotations only rewrite indices.
//!
//! Vacated slots are threaded onto an intrusive free list and reused by later
//! insertions, so a map that churns through inserts and removals does not
//! grow its arena beyond its peak population.

use std::fmt;
use std::mem;
use std::ops::{Index, IndexMut};

/// Index of a node in the arena.
///
/// An index is stable for as long as the node it names is in the tree: other
/// insertions, removals and rotations never move a node to another slot.
/// The one exception is two-child deletion, which moves the in-order
/// successor's entry into the deleted node's slot (see
/// `RawTree::remove_node`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIndex(usize);

impl fmt::Debug for NodeIndex {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// A tree vertex.
///
/// `T` is the balancing tag supplied by the strategy: a colour for
/// Red-Black trees, a height for AVL trees.
#[derive(Debug, Clone)]
pub struct Node<K, V, T> {
	pub(crate) key: K,
	pub(crate) value: V,
	pub(crate) parent: Option<NodeIndex>,
	pub(crate) left: Option<NodeIndex>,
	pub(crate) right: Option<NodeIndex>,
	pub(crate) tag: T,
}

impl<K, V, T> Node<K, V, T> {
	/// Creates a detached node.
	pub(crate) fn new(key: K, value: V, tag: T) -> Self {
		Node {
			key,
			value,
			parent: None,
			left: None,
			right: None,
			tag,
		}
	}

	#[inline]
	pub(crate) fn has_two_children(&self) -> bool {
		self.left.is_some() && self.right.is_some()
	}
}

#[derive(Debug, Clone)]
enum Slot<K, V, T> {
	Occupied(Node<K, V, T>),
	/// A free slot, linking to the next free slot.
	Vacant(Option<NodeIndex>),
}

/// Slot storage for the nodes of one tree.
#[derive(Debug, Clone)]
pub struct Arena<K, V, T> {
	slots: Vec<Slot<K, V, T>>,
	free: Option<NodeIndex>,
	len: usize,
}

impl<K, V, T> Arena<K, V, T> {
	pub(crate) const fn new() -> Self {
		Arena {
			slots: Vec::new(),
			free: None,
			len: 0,
		}
	}

	pub(crate) fn with_capacity(capacity: usize) -> Self {
		Arena {
			slots: Vec::with_capacity(capacity),
			free: None,
			len: 0,
		}
	}

	/// Number of occupied slots.
	#[inline]
	pub(crate) fn len(&self) -> usize {
		self.len
	}

	/// Number of slots, occupied or free.
	#[inline]
	pub(crate) fn slots(&self) -> usize {
		self.slots.len()
	}

	/// Stores a node, reusing a free slot when one is available.
	pub(crate) fn insert(&mut self, node: Node<K, V, T>) -> NodeIndex {
		self.len += 1;
		match self.free {
			Some(idx) => {
				let slot = mem::replace(&mut self.slots[idx.0], Slot::Occupied(node));
				self.free = match slot {
					Slot::Vacant(next) => next,
					Slot::Occupied(_) => unreachable!("free list points at occupied slot {idx:?}"),
				};
				idx
			}
			None => {
				self.slots.push(Slot::Occupied(node));
				NodeIndex(self.slots.len() - 1)
			}
		}
	}

	/// Frees a slot, returning the node it held.
	///
	/// # Panics
	///
	/// Panics if the slot is already free.
	pub(crate) fn remove(&mut self, idx: NodeIndex) -> Node<K, V, T> {
		match mem::replace(&mut self.slots[idx.0], Slot::Vacant(self.free)) {
			Slot::Occupied(node) => {
				self.free = Some(idx);
				self.len -= 1;
				node
			}
			Slot::Vacant(_) => panic!("removing free slot {idx:?}"),
		}
	}

	/// Exchanges the key and value stored at two nodes, leaving links and
	/// tags in place.
	pub(crate) fn swap_entries(&mut self, a: NodeIndex, b: NodeIndex) {
		if a == b {
			return;
		}
		let (lo, hi) = if a.0 < b.0 {
			(a.0, b.0)
		} else {
			(b.0, a.0)
		};
		let (head, tail) = self.slots.split_at_mut(hi);
		match (&mut head[lo], &mut tail[0]) {
			(Slot::Occupied(x), Slot::Occupied(y)) => {
				mem::swap(&mut x.key, &mut y.key);
				mem::swap(&mut x.value, &mut y.value);
			}
			_ => panic!("swapping entries of free slot {a:?} or {b:?}"),
		}
	}

	/// Drops every node and releases the slot storage.
	pub(crate) fn clear(&mut self) {
		self.slots = Vec::new();
		self.free = None;
		self.len = 0;
	}
}

impl<K, V, T> Index<NodeIndex> for Arena<K, V, T> {
	type Output = Node<K, V, T>;

	#[inline]
	fn index(&self, idx: NodeIndex) -> &Self::Output {
		match &self.slots[idx.0] {
			Slot::Occupied(node) => node,
			Slot::Vacant(_) => panic!("stale node index {idx:?}"),
		}
	}
}

impl<K, V, T> IndexMut<NodeIndex> for Arena<K, V, T> {
	#[inline]
	fn index_mut(&mut self, idx: NodeIndex) -> &mut Self::Output {
		match &mut self.slots[idx.0] {
			Slot::Occupied(node) => node,
			Slot::Vacant(_) => panic!("stale node index {idx:?}"),
		}
	}
}
