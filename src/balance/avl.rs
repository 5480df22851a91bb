//! AVL balancing.
//!
//! Every node stores the height of its subtree: a leaf has height 0 and an
//! empty position counts as -1. The balance factor `h(left) - h(right)` of
//! every node stays within `-1..=1`.

use std::fmt;

use super::{sealed, Balance};
use crate::node::NodeIndex;
use crate::tree::{RawTree, Side};

/// AVL balancing strategy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Avl;

impl sealed::Sealed for Avl {}

#[inline]
fn height<K, V>(tree: &RawTree<K, V, Avl>, node: Option<NodeIndex>) -> i32 {
	node.map_or(-1, |n| tree.tag(n))
}

#[inline]
fn balance_factor<K, V>(tree: &RawTree<K, V, Avl>, node: NodeIndex) -> i32 {
	height(tree, tree.left(node)) - height(tree, tree.right(node))
}

fn update_height<K, V>(tree: &mut RawTree<K, V, Avl>, node: NodeIndex) {
	let h = 1 + height(tree, tree.left(node)).max(height(tree, tree.right(node)));
	tree.set_tag(node, h);
}

/// Rotates at `node`, refreshes the heights of the two nodes that moved and
/// returns the new subtree root.
fn rotate<K, V>(tree: &mut RawTree<K, V, Avl>, node: NodeIndex, dir: Side) -> NodeIndex {
	tree.rotate(node, dir);
	update_height(tree, node);
	let top = tree.parent(node).expect("rotated node has a parent");
	update_height(tree, top);
	top
}

/// Refreshes the height of `node` and rotates if it is out of balance.
/// Returns the root of the (possibly new) subtree.
fn rebalance<K, V>(tree: &mut RawTree<K, V, Avl>, node: NodeIndex) -> NodeIndex {
	update_height(tree, node);

	match balance_factor(tree, node) {
		2 => {
			let left = tree.left(node).expect("left-heavy node has a left child");
			// Left-right case
			if balance_factor(tree, left) < 0 {
				rotate(tree, left, Side::Left);
			}
			rotate(tree, node, Side::Right)
		}
		-2 => {
			let right = tree.right(node).expect("right-heavy node has a right child");
			// Right-left case
			if balance_factor(tree, right) > 0 {
				rotate(tree, right, Side::Right);
			}
			rotate(tree, node, Side::Left)
		}
		_ => node,
	}
}

/// Walks from `start` to the root, rebalancing each ancestor. Stops early
/// once a subtree comes out with its previous height, as nothing above it can
/// have changed.
fn retrace<K, V>(tree: &mut RawTree<K, V, Avl>, start: Option<NodeIndex>) {
	let mut cur = start;
	while let Some(node) = cur {
		let before = tree.tag(node);
		let top = rebalance(tree, node);
		if tree.tag(top) == before {
			break;
		}
		cur = tree.parent(top);
	}
}

impl Balance for Avl {
	type Tag = i32;

	const NAME: &'static str = "avl";

	fn leaf_tag() -> i32 {
		0
	}

	fn after_insert<K, V>(tree: &mut RawTree<K, V, Self>, node: NodeIndex) {
		let parent = tree.parent(node);
		retrace(tree, parent);
	}

	fn after_remove<K, V>(
		tree: &mut RawTree<K, V, Self>,
		parent: Option<NodeIndex>,
		_side: Side,
		_removed: i32,
	) {
		retrace(tree, parent);
	}

	fn check<K: fmt::Debug, V>(tree: &RawTree<K, V, Self>) {
		checked_height(tree, tree.root());
	}
}

/// Returns the height of a subtree, validating stored heights and balance
/// factors on the way.
fn checked_height<K: fmt::Debug, V>(tree: &RawTree<K, V, Avl>, node: Option<NodeIndex>) -> i32 {
	let Some(n) = node else {
		return -1;
	};

	let left = checked_height(tree, tree.left(n));
	let right = checked_height(tree, tree.right(n));
	assert!((left - right).abs() <= 1, "Node {:?} out of balance: left {} right {}", tree.key(n), left, right);

	let h = 1 + left.max(right);
	assert_eq!(tree.tag(n), h, "Node {:?} stores a stale height", tree.key(n));
	h
}
