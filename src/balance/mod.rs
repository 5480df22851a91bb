//! Balancing strategies.
//!
//! The tree engine is generic over a [`Balance`] strategy. Both strategies
//! produce the same ordering and navigation behaviour; they differ only in
//! the tag each node carries and in how the tree is repaired after a
//! structural change:
//!
//! | Strategy     | Node tag          | Guarantee                                      |
//! |--------------|-------------------|------------------------------------------------|
//! | [`RedBlack`] | [`Color`]         | height <= 2 log2(n + 1), O(1) rotations/update |
//! | [`Avl`]      | height (`i32`)    | height <= 1.44 log2(n + 2), stricter balance   |
//!
//! The strategy is chosen with the `B` parameter of
//! [`TreeMap`](crate::TreeMap), or through the [`RbTreeMap`](crate::RbTreeMap)
//! and [`AvlTreeMap`](crate::AvlTreeMap) aliases.

use std::fmt;

use crate::node::NodeIndex;
use crate::tree::{RawTree, Side};

mod avl;
mod red_black;

pub use avl::Avl;
pub use red_black::{Color, RedBlack};

mod sealed {
	pub trait Sealed {}
}

/// A rebalancing discipline for the tree engine.
///
/// This trait is sealed: the engine's structural invariants depend on the
/// fixups being exactly right, so only the strategies in this crate
/// implement it.
pub trait Balance: sealed::Sealed + Sized + 'static {
	/// Per-node balancing metadata.
	type Tag: Copy + PartialEq + fmt::Debug;

	/// Human-readable strategy name.
	const NAME: &'static str;

	/// Tag given to a freshly attached node.
	#[doc(hidden)]
	fn leaf_tag() -> Self::Tag;

	/// Restores the balance invariant after `node` was attached as a leaf.
	#[doc(hidden)]
	fn after_insert<K, V>(tree: &mut RawTree<K, V, Self>, node: NodeIndex);

	/// Restores the balance invariant after a node carrying `removed` was
	/// spliced out from the `side` child position of `parent` (or from the
	/// root position when `parent` is `None`).
	#[doc(hidden)]
	fn after_remove<K, V>(
		tree: &mut RawTree<K, V, Self>,
		parent: Option<NodeIndex>,
		side: Side,
		removed: Self::Tag,
	);

	/// Checks the balance invariant of the whole tree, panicking with a
	/// diagnostic if it is violated.
	#[doc(hidden)]
	fn check<K: fmt::Debug, V>(tree: &RawTree<K, V, Self>);
}
