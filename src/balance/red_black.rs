//! Red-Black balancing.
//!
//! Invariants maintained:
//! 1. The root is black.
//! 2. A red node has no red child.
//! 3. Every path from a node down to an empty child position passes through
//!    the same number of black nodes.
//!
//! Empty child positions count as black.

use std::fmt;

use super::{sealed, Balance};
use crate::node::NodeIndex;
use crate::tree::{RawTree, Side};

/// Node colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
	Red,
	Black,
}

/// Red-Black balancing strategy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RedBlack;

impl sealed::Sealed for RedBlack {}

#[inline]
fn is_red<K, V>(tree: &RawTree<K, V, RedBlack>, node: Option<NodeIndex>) -> bool {
	node.is_some_and(|n| tree.tag(n) == Color::Red)
}

impl Balance for RedBlack {
	type Tag = Color;

	const NAME: &'static str = "red-black";

	fn leaf_tag() -> Color {
		Color::Red
	}

	fn after_insert<K, V>(tree: &mut RawTree<K, V, Self>, node: NodeIndex) {
		let mut x = node;

		loop {
			// Only a red parent conflicts with the red new node
			let Some(mut p) = tree.parent(x) else {
				break;
			};
			if tree.tag(p) == Color::Black {
				break;
			}

			// A red node is never the root, so the grandparent exists
			let g = tree.parent(p).expect("red node has a parent");
			let side = tree.side_of(p);
			let uncle = tree.child(g, side.opposite());

			if let Some(u) = uncle.filter(|&u| tree.tag(u) == Color::Red) {
				// Red uncle: push the blackness down from the grandparent
				tree.set_tag(p, Color::Black);
				tree.set_tag(u, Color::Black);
				tree.set_tag(g, Color::Red);
				x = g;
				continue;
			}

			// Black uncle: straighten an inner grandchild first
			if tree.child(p, side.opposite()) == Some(x) {
				x = p;
				tree.rotate(x, side);
				p = tree.parent(x).expect("rotated node has a parent");
			}

			tree.set_tag(p, Color::Black);
			tree.set_tag(g, Color::Red);
			tree.rotate(g, side.opposite());
		}

		if let Some(root) = tree.root() {
			tree.set_tag(root, Color::Black);
		}
	}

	fn after_remove<K, V>(
		tree: &mut RawTree<K, V, Self>,
		parent: Option<NodeIndex>,
		side: Side,
		removed: Color,
	) {
		if removed == Color::Red {
			return;
		}

		// `x` carries an extra black. It may be an empty position, which is
		// why its parent and side are tracked separately.
		let mut parent = parent;
		let mut side = side;
		let mut x = match parent {
			Some(p) => tree.child(p, side),
			None => tree.root(),
		};

		while x != tree.root() && !is_red(tree, x) {
			let p = parent.expect("non-root position has a parent");
			let mut w = tree.child(p, side.opposite()).expect("doubly black node has a sibling");

			if tree.tag(w) == Color::Red {
				tree.set_tag(w, Color::Black);
				tree.set_tag(p, Color::Red);
				tree.rotate(p, side);
				w = tree.child(p, side.opposite()).expect("doubly black node has a sibling");
			}

			let near = tree.child(w, side);
			let far = tree.child(w, side.opposite());

			if !is_red(tree, near) && !is_red(tree, far) {
				tree.set_tag(w, Color::Red);
				x = Some(p);
				parent = tree.parent(p);
				if parent.is_some() {
					side = tree.side_of(p);
				}
				continue;
			}

			if !is_red(tree, far) {
				if let Some(n) = near {
					tree.set_tag(n, Color::Black);
				}
				tree.set_tag(w, Color::Red);
				tree.rotate(w, side.opposite());
				w = tree.child(p, side.opposite()).expect("doubly black node has a sibling");
			}

			let parent_color = tree.tag(p);
			tree.set_tag(w, parent_color);
			tree.set_tag(p, Color::Black);
			if let Some(f) = tree.child(w, side.opposite()) {
				tree.set_tag(f, Color::Black);
			}
			tree.rotate(p, side);
			x = tree.root();
			break;
		}

		if let Some(x) = x {
			tree.set_tag(x, Color::Black);
		}
	}

	fn check<K: fmt::Debug, V>(tree: &RawTree<K, V, Self>) {
		if let Some(root) = tree.root() {
			assert_eq!(tree.tag(root), Color::Black, "Root {:?} is red", tree.key(root));
		}
		black_height(tree, tree.root());
	}
}

/// Returns the black height of a subtree, validating colours on the way.
fn black_height<K: fmt::Debug, V>(tree: &RawTree<K, V, RedBlack>, node: Option<NodeIndex>) -> usize {
	let Some(n) = node else {
		return 1;
	};

	let color = tree.tag(n);
	if color == Color::Red {
		assert!(
			!is_red(tree, tree.left(n)) && !is_red(tree, tree.right(n)),
			"Red node {:?} has a red child",
			tree.key(n)
		);
	}

	let left = black_height(tree, tree.left(n));
	let right = black_height(tree, tree.right(n));
	assert_eq!(left, right, "Black height mismatch below {:?}: left {} right {}", tree.key(n), left, right);

	left + usize::from(color == Color::Black)
}
