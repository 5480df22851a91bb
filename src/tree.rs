//! The balanced-tree engine.
//!
//! [`RawTree`] owns the node arena and the tree topology: root, cached
//! minimum/maximum nodes and size. It implements search, insertion, deletion,
//! rotation and copy. It knows nothing about comparators beyond the
//! [`Comparator`] passed into each search, and nothing about rebalancing
//! beyond the [`Balance`] hooks it calls after every structural change.
//!
//! ## Topology Ownership
//!
//! Only the engine's insert, delete and clear paths change the shape of the
//! tree or the `first`/`last` cache. Navigation, range views and cursors
//! observe nodes through [`NodeIndex`] handles and request removals through
//! [`RawTree::remove_node`].
//!
//! ## Deletion and Node Identity
//!
//! Removing a node with two children moves its in-order successor's entry
//! into the removed node's slot and frees the successor's slot instead:
//!
//! ```text
//!        [4]                      [5]
//!       /   \     remove 4       /   \
//!     [2]   [6]   ────────►    [2]   [6]
//!           /
//!         [5]    (5's slot is freed, 4's slot now holds 5)
//! ```
//!
//! Any holder of the successor's index must be redirected to the removed
//! node's index. The map's cursor does exactly that.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::mem;

use smallvec::SmallVec;

use crate::balance::Balance;
use crate::compare::Comparator;
use crate::node::{Arena, Node, NodeIndex};

/// A child position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
	Left,
	Right,
}

impl Side {
	#[inline]
	pub(crate) fn opposite(self) -> Side {
		match self {
			Side::Left => Side::Right,
			Side::Right => Side::Left,
		}
	}
}

/// Where a missing key would be attached.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Vacancy {
	parent: Option<NodeIndex>,
	side: Side,
}

/// Result of a search for an exact key.
pub(crate) type Search = Result<NodeIndex, Vacancy>;

/// A binary search tree balanced by `B`.
pub struct RawTree<K, V, B: Balance> {
	nodes: Arena<K, V, B::Tag>,
	root: Option<NodeIndex>,
	/// Cached minimum node. `None` exactly when the tree is empty.
	first: Option<NodeIndex>,
	/// Cached maximum node. `None` exactly when the tree is empty.
	last: Option<NodeIndex>,
	_balance: PhantomData<B>,
}

impl<K, V, B: Balance> Default for RawTree<K, V, B> {
	fn default() -> Self {
		Self::new()
	}
}

impl<K, V, B: Balance> RawTree<K, V, B> {
	pub(crate) const fn new() -> Self {
		RawTree {
			nodes: Arena::new(),
			root: None,
			first: None,
			last: None,
			_balance: PhantomData,
		}
	}

	// -----------------------------------------------------------------------
	// Accessors
	// -----------------------------------------------------------------------

	#[inline]
	pub(crate) fn len(&self) -> usize {
		self.nodes.len()
	}

	#[inline]
	pub(crate) fn is_empty(&self) -> bool {
		self.root.is_none()
	}

	#[inline]
	pub(crate) fn root(&self) -> Option<NodeIndex> {
		self.root
	}

	/// The node holding the smallest key.
	#[inline]
	pub(crate) fn first(&self) -> Option<NodeIndex> {
		self.first
	}

	/// The node holding the largest key.
	#[inline]
	pub(crate) fn last(&self) -> Option<NodeIndex> {
		self.last
	}

	#[inline]
	pub(crate) fn key(&self, node: NodeIndex) -> &K {
		&self.nodes[node].key
	}

	#[inline]
	pub(crate) fn value(&self, node: NodeIndex) -> &V {
		&self.nodes[node].value
	}

	#[inline]
	pub(crate) fn value_mut(&mut self, node: NodeIndex) -> &mut V {
		&mut self.nodes[node].value
	}

	#[inline]
	pub(crate) fn entry(&self, node: NodeIndex) -> (&K, &V) {
		let n = &self.nodes[node];
		(&n.key, &n.value)
	}

	#[inline]
	pub(crate) fn entry_mut(&mut self, node: NodeIndex) -> (&K, &mut V) {
		let n = &mut self.nodes[node];
		(&n.key, &mut n.value)
	}

	#[inline]
	pub(crate) fn parent(&self, node: NodeIndex) -> Option<NodeIndex> {
		self.nodes[node].parent
	}

	#[inline]
	pub(crate) fn left(&self, node: NodeIndex) -> Option<NodeIndex> {
		self.nodes[node].left
	}

	#[inline]
	pub(crate) fn right(&self, node: NodeIndex) -> Option<NodeIndex> {
		self.nodes[node].right
	}

	#[inline]
	pub(crate) fn child(&self, node: NodeIndex, side: Side) -> Option<NodeIndex> {
		match side {
			Side::Left => self.nodes[node].left,
			Side::Right => self.nodes[node].right,
		}
	}

	#[inline]
	fn set_child(&mut self, node: NodeIndex, side: Side, child: Option<NodeIndex>) {
		match side {
			Side::Left => self.nodes[node].left = child,
			Side::Right => self.nodes[node].right = child,
		}
	}

	#[inline]
	pub(crate) fn tag(&self, node: NodeIndex) -> B::Tag {
		self.nodes[node].tag
	}

	#[inline]
	pub(crate) fn set_tag(&mut self, node: NodeIndex, tag: B::Tag) {
		self.nodes[node].tag = tag;
	}

	#[inline]
	pub(crate) fn has_two_children(&self, node: NodeIndex) -> bool {
		self.nodes[node].has_two_children()
	}

	/// Which child of its parent `node` is.
	///
	/// # Panics
	///
	/// Panics if `node` is the root.
	pub(crate) fn side_of(&self, node: NodeIndex) -> Side {
		let parent = self.parent(node).expect("root has no side");
		if self.left(parent) == Some(node) {
			Side::Left
		} else {
			Side::Right
		}
	}

	/// Number of nodes on the longest root-to-leaf path.
	pub(crate) fn height(&self) -> usize {
		fn depth<K, V, T>(nodes: &Arena<K, V, T>, node: Option<NodeIndex>) -> usize {
			node.map_or(0, |n| 1 + depth(nodes, nodes[n].left).max(depth(nodes, nodes[n].right)))
		}
		depth(&self.nodes, self.root)
	}

	// -----------------------------------------------------------------------
	// In-order Neighbours
	// -----------------------------------------------------------------------

	pub(crate) fn subtree_min(&self, mut node: NodeIndex) -> NodeIndex {
		while let Some(left) = self.left(node) {
			node = left;
		}
		node
	}

	pub(crate) fn subtree_max(&self, mut node: NodeIndex) -> NodeIndex {
		while let Some(right) = self.right(node) {
			node = right;
		}
		node
	}

	/// The node following `node` in key order.
	pub(crate) fn successor(&self, node: NodeIndex) -> Option<NodeIndex> {
		if let Some(right) = self.right(node) {
			return Some(self.subtree_min(right));
		}
		self.climb(node, Side::Right)
	}

	/// The node preceding `node` in key order.
	pub(crate) fn predecessor(&self, node: NodeIndex) -> Option<NodeIndex> {
		if let Some(left) = self.left(node) {
			return Some(self.subtree_max(left));
		}
		self.climb(node, Side::Left)
	}

	/// Climbs while `node` is the `side` child of its parent and returns the
	/// first ancestor reached from the other side.
	fn climb(&self, mut node: NodeIndex, side: Side) -> Option<NodeIndex> {
		let mut parent = self.parent(node);
		while let Some(p) = parent {
			if self.child(p, side) != Some(node) {
				break;
			}
			node = p;
			parent = self.parent(p);
		}
		parent
	}

	// -----------------------------------------------------------------------
	// Search
	// -----------------------------------------------------------------------

	/// Searches for `key`, returning either its node or the position where it
	/// would be attached.
	pub(crate) fn search<C: Comparator<K>>(&self, key: &K, cmp: &C) -> Search {
		let mut vacancy = Vacancy {
			parent: None,
			side: Side::Left,
		};
		let mut cur = self.root;
		while let Some(node) = cur {
			let side = match cmp.compare(key, self.key(node)) {
				Ordering::Less => Side::Left,
				Ordering::Greater => Side::Right,
				Ordering::Equal => return Ok(node),
			};
			vacancy = Vacancy {
				parent: Some(node),
				side,
			};
			cur = self.child(node, side);
		}
		Err(vacancy)
	}

	pub(crate) fn find<C: Comparator<K>>(&self, key: &K, cmp: &C) -> Option<NodeIndex> {
		self.search(key, cmp).ok()
	}

	/// The node with the greatest key strictly less than `key`.
	pub(crate) fn find_lower<C: Comparator<K>>(&self, key: &K, cmp: &C) -> Option<NodeIndex> {
		let mut node = self.root?;
		loop {
			if cmp.compare(key, self.key(node)) == Ordering::Greater {
				match self.right(node) {
					Some(right) => node = right,
					None => return Some(node),
				}
			} else {
				match self.left(node) {
					Some(left) => node = left,
					None => return self.climb(node, Side::Left),
				}
			}
		}
	}

	/// The node with the greatest key less than or equal to `key`.
	pub(crate) fn find_floor<C: Comparator<K>>(&self, key: &K, cmp: &C) -> Option<NodeIndex> {
		let mut node = self.root?;
		loop {
			match cmp.compare(key, self.key(node)) {
				Ordering::Greater => match self.right(node) {
					Some(right) => node = right,
					None => return Some(node),
				},
				Ordering::Less => match self.left(node) {
					Some(left) => node = left,
					None => return self.climb(node, Side::Left),
				},
				Ordering::Equal => return Some(node),
			}
		}
	}

	/// The node with the least key greater than or equal to `key`.
	pub(crate) fn find_ceiling<C: Comparator<K>>(&self, key: &K, cmp: &C) -> Option<NodeIndex> {
		let mut node = self.root?;
		loop {
			match cmp.compare(key, self.key(node)) {
				Ordering::Less => match self.left(node) {
					Some(left) => node = left,
					None => return Some(node),
				},
				Ordering::Greater => match self.right(node) {
					Some(right) => node = right,
					None => return self.climb(node, Side::Right),
				},
				Ordering::Equal => return Some(node),
			}
		}
	}

	/// The node with the least key strictly greater than `key`.
	pub(crate) fn find_higher<C: Comparator<K>>(&self, key: &K, cmp: &C) -> Option<NodeIndex> {
		let mut node = self.root?;
		loop {
			if cmp.compare(key, self.key(node)) == Ordering::Less {
				match self.left(node) {
					Some(left) => node = left,
					None => return Some(node),
				}
			} else {
				match self.right(node) {
					Some(right) => node = right,
					None => return self.climb(node, Side::Right),
				}
			}
		}
	}

	// -----------------------------------------------------------------------
	// Mutation
	// -----------------------------------------------------------------------

	/// Inserts `key`, overwriting the value of an existing equal key.
	///
	/// Returns the previous value if the key was present. The stored key is
	/// left untouched in that case.
	pub(crate) fn insert<C: Comparator<K>>(&mut self, key: K, value: V, cmp: &C) -> Option<V> {
		match self.search(&key, cmp) {
			Ok(node) => Some(mem::replace(self.value_mut(node), value)),
			Err(vacancy) => {
				self.attach(vacancy, key, value);
				None
			}
		}
	}

	/// Attaches a new node at a vacancy returned by [`RawTree::search`] and
	/// rebalances. The vacancy must not be stale.
	pub(crate) fn attach(&mut self, vacancy: Vacancy, key: K, value: V) -> NodeIndex {
		let mut node = Node::new(key, value, B::leaf_tag());
		node.parent = vacancy.parent;
		let idx = self.nodes.insert(node);

		match vacancy.parent {
			None => {
				self.root = Some(idx);
				self.first = Some(idx);
				self.last = Some(idx);
			}
			Some(parent) => {
				self.set_child(parent, vacancy.side, Some(idx));
				// Anything below the minimum attaches as its left child
				if vacancy.side == Side::Left && self.first == Some(parent) {
					self.first = Some(idx);
				}
				if vacancy.side == Side::Right && self.last == Some(parent) {
					self.last = Some(idx);
				}
			}
		}

		B::after_insert(self, idx);
		idx
	}

	/// Removes `node` from the tree and returns its entry.
	///
	/// If `node` has two children, the in-order successor's entry is moved
	/// into `node`'s slot and the successor's slot is freed. Every other node
	/// keeps its index.
	pub(crate) fn remove_node(&mut self, node: NodeIndex) -> (K, V) {
		let target = if self.has_two_children(node) {
			let right = self.right(node).expect("node has two children");
			let successor = self.subtree_min(right);
			self.nodes.swap_entries(node, successor);
			successor
		} else {
			node
		};

		// The target has at most one child from here on
		if self.first == Some(target) {
			self.first = self.successor(target);
		}
		if self.last == Some(target) {
			self.last = self.predecessor(target);
		}

		let child = self.left(target).or(self.right(target));
		let parent = self.parent(target);
		let side = match parent {
			Some(_) => self.side_of(target),
			None => Side::Left,
		};

		if let Some(c) = child {
			self.nodes[c].parent = parent;
		}
		match parent {
			Some(p) => self.set_child(p, side, child),
			None => self.root = child,
		}

		let removed = self.nodes.remove(target);
		B::after_remove(self, parent, side, removed.tag);
		(removed.key, removed.value)
	}

	/// Rotates around `node` toward `dir`: the child on the opposite side
	/// takes `node`'s place and `node` becomes its `dir` child.
	///
	/// ```text
	///       x                  y
	///      / \    rotate(x,   / \
	///     a   y   Left)      x   c
	///        / \  ───────►  / \
	///       b   c          a   b
	/// ```
	pub(crate) fn rotate(&mut self, node: NodeIndex, dir: Side) {
		let up = self.child(node, dir.opposite()).expect("rotation needs a child to lift");
		let inner = self.child(up, dir);

		self.set_child(node, dir.opposite(), inner);
		if let Some(inner) = inner {
			self.nodes[inner].parent = Some(node);
		}

		let parent = self.parent(node);
		self.nodes[up].parent = parent;
		match parent {
			None => self.root = Some(up),
			Some(p) => {
				let side = if self.left(p) == Some(node) {
					Side::Left
				} else {
					Side::Right
				};
				self.set_child(p, side, Some(up));
			}
		}

		self.set_child(up, dir, Some(node));
		self.nodes[node].parent = Some(up);
	}

	/// Drops every node.
	pub(crate) fn clear(&mut self) {
		self.nodes.clear();
		self.root = None;
		self.first = None;
		self.last = None;
	}
}

// ---------------------------------------------------------------------------
// Copy
// ---------------------------------------------------------------------------

impl<K: Clone, V: Clone, B: Balance> Clone for RawTree<K, V, B> {
	/// Deep-copies the tree into a compact arena, preserving shape and
	/// balancing tags, then locates the endpoints from the new root.
	fn clone(&self) -> Self {
		let mut nodes = Arena::with_capacity(self.len());
		let mut root = None;

		// (source node, copied parent, side under the copied parent)
		let mut stack: SmallVec<[(NodeIndex, Option<NodeIndex>, Side); 64]> = SmallVec::new();
		if let Some(r) = self.root {
			stack.push((r, None, Side::Left));
		}

		while let Some((src, parent, side)) = stack.pop() {
			let source = &self.nodes[src];
			let mut node = Node::new(source.key.clone(), source.value.clone(), source.tag);
			node.parent = parent;
			let idx = nodes.insert(node);

			match parent {
				None => root = Some(idx),
				Some(p) => match side {
					Side::Left => nodes[p].left = Some(idx),
					Side::Right => nodes[p].right = Some(idx),
				},
			}

			if let Some(right) = source.right {
				stack.push((right, Some(idx), Side::Right));
			}
			if let Some(left) = source.left {
				stack.push((left, Some(idx), Side::Left));
			}
		}

		let mut tree = RawTree {
			nodes,
			root,
			first: None,
			last: None,
			_balance: PhantomData,
		};
		tree.first = root.map(|r| tree.subtree_min(r));
		tree.last = root.map(|r| tree.subtree_max(r));
		tree
	}
}

// ---------------------------------------------------------------------------
// Invariant Checking
// ---------------------------------------------------------------------------

impl<K: fmt::Debug, V, B: Balance> RawTree<K, V, B> {
	/// Validates all tree invariants. Panics with diagnostic info if any
	/// invariant is violated.
	///
	/// # Invariants Checked
	///
	/// 1. Link consistency: every child points back at its parent, the root
	///    has no parent
	/// 2. Size consistency: the number of reachable nodes equals `len`
	/// 3. Key ordering: in-order traversal is strictly increasing
	/// 4. Endpoint cache: `first`/`last` are the traversal's endpoints
	/// 5. The balancing strategy's own invariant
	pub(crate) fn assert_invariants<C: Comparator<K>>(&self, cmp: &C) {
		let Some(root) = self.root else {
			assert_eq!(self.len(), 0, "Empty tree reports {} nodes", self.len());
			assert!(self.first.is_none() && self.last.is_none(), "Empty tree has cached endpoints");
			return;
		};

		// Invariant 1: Link consistency
		assert_eq!(self.parent(root), None, "Root {:?} has a parent", self.key(root));
		let mut reachable = 0usize;
		let mut stack: SmallVec<[NodeIndex; 64]> = SmallVec::new();
		stack.push(root);
		while let Some(node) = stack.pop() {
			reachable += 1;
			for child in [self.left(node), self.right(node)].into_iter().flatten() {
				assert_eq!(
					self.parent(child),
					Some(node),
					"Node {:?} does not point back at parent {:?}",
					self.key(child),
					self.key(node)
				);
				stack.push(child);
			}
		}

		// Invariant 2: Size consistency
		assert_eq!(reachable, self.len(), "Reachable nodes do not match len");

		// Invariant 3: Key ordering
		let first = self.subtree_min(root);
		let mut prev = first;
		let mut visited = 1usize;
		while let Some(next) = self.successor(prev) {
			assert_eq!(
				cmp.compare(self.key(prev), self.key(next)),
				Ordering::Less,
				"Keys out of order: {:?} before {:?}",
				self.key(prev),
				self.key(next)
			);
			prev = next;
			visited += 1;
		}
		assert_eq!(visited, self.len(), "In-order walk visited {} of {} nodes", visited, self.len());

		// Invariant 4: Endpoint cache
		assert_eq!(self.first, Some(first), "Cached first node is not the minimum");
		assert_eq!(self.last, Some(prev), "Cached last node is not the maximum");

		// Invariant 5: Balance
		B::check(self);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::balance::{Avl, RedBlack};
	use crate::compare::Natural;

	fn keys_in_order<B: Balance>(tree: &RawTree<i32, i32, B>) -> Vec<i32> {
		let mut out = Vec::new();
		let mut cur = tree.first();
		while let Some(node) = cur {
			out.push(*tree.key(node));
			cur = tree.successor(node);
		}
		out
	}

	fn navigation<B: Balance>() {
		let mut tree: RawTree<i32, i32, B> = RawTree::new();
		for k in [1, 3, 5] {
			tree.insert(k, k * 10, &Natural);
		}

		let key = |n: Option<NodeIndex>| n.map(|n| *tree.key(n));
		assert_eq!(key(tree.find_floor(&4, &Natural)), Some(3));
		assert_eq!(key(tree.find_ceiling(&4, &Natural)), Some(5));
		assert_eq!(key(tree.find_lower(&3, &Natural)), Some(1));
		assert_eq!(key(tree.find_higher(&3, &Natural)), Some(5));
		assert_eq!(key(tree.find_floor(&1, &Natural)), Some(1));
		assert_eq!(key(tree.find_lower(&1, &Natural)), None);
		assert_eq!(key(tree.find_higher(&5, &Natural)), None);
		assert_eq!(key(tree.find_ceiling(&6, &Natural)), None);
		assert_eq!(key(tree.find_floor(&0, &Natural)), None);
		assert_eq!(key(tree.find_ceiling(&0, &Natural)), Some(1));
	}

	#[test]
	fn navigation_red_black() {
		navigation::<RedBlack>();
	}

	#[test]
	fn navigation_avl() {
		navigation::<Avl>();
	}

	fn insert_overwrites<B: Balance>() {
		let mut tree: RawTree<i32, i32, B> = RawTree::new();
		assert_eq!(tree.insert(7, 1, &Natural), None);
		assert_eq!(tree.insert(7, 2, &Natural), Some(1));
		assert_eq!(tree.len(), 1);
		assert_eq!(*tree.value(tree.root().unwrap()), 2);
	}

	#[test]
	fn insert_overwrites_both() {
		insert_overwrites::<RedBlack>();
		insert_overwrites::<Avl>();
	}

	fn two_child_removal_reuses_slot<B: Balance>() {
		let mut tree: RawTree<i32, i32, B> = RawTree::new();
		for k in 1..=7 {
			tree.insert(k, k, &Natural);
		}

		let node = tree.find(&4, &Natural).unwrap();
		assert!(tree.has_two_children(node));
		let successor = tree.successor(node).unwrap();

		assert_eq!(tree.remove_node(node), (4, 4));
		tree.assert_invariants(&Natural);

		// The successor's entry now lives in the removed node's slot
		assert_eq!(*tree.key(node), 5);
		assert_eq!(tree.find(&5, &Natural), Some(node));
		assert_ne!(tree.find(&5, &Natural), Some(successor));
		assert_eq!(keys_in_order(&tree), vec![1, 2, 3, 5, 6, 7]);
	}

	#[test]
	fn two_child_removal_reuses_slot_both() {
		two_child_removal_reuses_slot::<RedBlack>();
		two_child_removal_reuses_slot::<Avl>();
	}

	fn endpoints_track_removals<B: Balance>() {
		let mut tree: RawTree<i32, i32, B> = RawTree::new();
		for k in [5, 2, 8, 1, 9] {
			tree.insert(k, k, &Natural);
		}
		assert_eq!(*tree.key(tree.first().unwrap()), 1);
		assert_eq!(*tree.key(tree.last().unwrap()), 9);

		tree.remove_node(tree.first().unwrap());
		tree.remove_node(tree.last().unwrap());
		tree.assert_invariants(&Natural);
		assert_eq!(*tree.key(tree.first().unwrap()), 2);
		assert_eq!(*tree.key(tree.last().unwrap()), 8);

		while let Some(first) = tree.first() {
			tree.remove_node(first);
			tree.assert_invariants(&Natural);
		}
		assert!(tree.is_empty());
		assert_eq!(tree.last(), None);
	}

	#[test]
	fn endpoints_track_removals_both() {
		endpoints_track_removals::<RedBlack>();
		endpoints_track_removals::<Avl>();
	}

	fn clone_is_deep<B: Balance>() {
		let mut tree: RawTree<i32, i32, B> = RawTree::new();
		for k in 0..200 {
			tree.insert((k * 37) % 200, k, &Natural);
		}
		for k in (0..200).step_by(2) {
			let node = tree.find(&k, &Natural).unwrap();
			tree.remove_node(node);
		}

		let copy = tree.clone();
		copy.assert_invariants(&Natural);
		assert_eq!(keys_in_order(&copy), keys_in_order(&tree));
		assert_eq!(copy.height(), tree.height());
		// The copy is compact
		assert_eq!(copy.nodes.slots(), copy.len());

		tree.clear();
		assert!(tree.is_empty());
		assert_eq!(copy.len(), 100);
	}

	#[test]
	fn clone_is_deep_both() {
		clone_is_deep::<RedBlack>();
		clone_is_deep::<Avl>();
	}

	fn clone_large<B: Balance>() {
		let mut tree: RawTree<i32, i32, B> = RawTree::new();
		for k in 0..20_000 {
			tree.insert((k * 7_919) % 20_000, k, &Natural);
		}
		tree.assert_invariants(&Natural);

		let copy = tree.clone();
		copy.assert_invariants(&Natural);
		assert_eq!(copy.len(), 20_000);
		assert_eq!(keys_in_order(&copy), (0..20_000).collect::<Vec<_>>());
		assert_eq!(copy.height(), tree.height());
	}

	#[test]
	fn clone_large_both() {
		clone_large::<RedBlack>();
		clone_large::<Avl>();
	}
}
