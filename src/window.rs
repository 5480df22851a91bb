//! Navigation windows.
//!
//! A [`Window`] decides which nodes of a map are visible and resolves the
//! navigation primitives (`lowest`, `ceiling`, ...) against the engine. It is
//! implemented once for the whole map ([`Full`], a pass-through to the engine)
//! and once for bounded ranges ([`Bounds`], which composes an engine search
//! with a bound check). Views, key sets and cursors are generic over the
//! window and never ask which kind they hold.
//!
//! ## Bound Resolution
//!
//! A bounded window answers every query with at most one engine search:
//!
//! ```text
//!             lo                          hi
//!   ──[1]─────[2]─────[3]─────[4]─────[5]─────[6]──
//!              ▲                       ▲       ▲
//!          abs_lowest             abs_highest  high fence
//!      (ceiling or higher of lo) (floor or lower of hi)
//! ```
//!
//! The fences are the first nodes outside the window on either side; a
//! cursor captures them once and stops when it reaches them.

use std::cmp::Ordering;
use std::ops::Bound;

use tracing::debug;

use crate::balance::Balance;
use crate::compare::Comparator;
use crate::error::{Error, Result};
use crate::node::NodeIndex;
use crate::{bound, TreeMap};

use self::sealed::Resolve;

pub(crate) mod sealed {
	use crate::balance::Balance;
	use crate::compare::Comparator;
	use crate::node::NodeIndex;
	use crate::window::Bounds;
	use crate::TreeMap;

	/// Resolves the navigation primitives of a window against a map.
	pub trait Resolve<K> {
		/// The visible node with the smallest key.
		fn lowest<V, B: Balance, C: Comparator<K>>(&self, map: &TreeMap<K, V, B, C>) -> Option<NodeIndex>;

		/// The visible node with the largest key.
		fn highest<V, B: Balance, C: Comparator<K>>(&self, map: &TreeMap<K, V, B, C>) -> Option<NodeIndex>;

		/// The visible node with the least key `>= key`.
		fn ceiling<V, B: Balance, C: Comparator<K>>(
			&self,
			map: &TreeMap<K, V, B, C>,
			key: &K,
		) -> Option<NodeIndex>;

		/// The visible node with the least key `> key`.
		fn higher<V, B: Balance, C: Comparator<K>>(
			&self,
			map: &TreeMap<K, V, B, C>,
			key: &K,
		) -> Option<NodeIndex>;

		/// The visible node with the greatest key `<= key`.
		fn floor<V, B: Balance, C: Comparator<K>>(
			&self,
			map: &TreeMap<K, V, B, C>,
			key: &K,
		) -> Option<NodeIndex>;

		/// The visible node with the greatest key `< key`.
		fn lower<V, B: Balance, C: Comparator<K>>(
			&self,
			map: &TreeMap<K, V, B, C>,
			key: &K,
		) -> Option<NodeIndex>;

		/// The visible node following `node`, which must itself be visible.
		fn next<V, B: Balance, C: Comparator<K>>(
			&self,
			map: &TreeMap<K, V, B, C>,
			node: NodeIndex,
		) -> Option<NodeIndex>;

		/// The visible node preceding `node`, which must itself be visible.
		fn prev<V, B: Balance, C: Comparator<K>>(
			&self,
			map: &TreeMap<K, V, B, C>,
			node: NodeIndex,
		) -> Option<NodeIndex>;

		/// The first node above the window, if any.
		fn high_fence<V, B: Balance, C: Comparator<K>>(&self, map: &TreeMap<K, V, B, C>) -> Option<NodeIndex>;

		/// The first node below the window, if any.
		fn low_fence<V, B: Balance, C: Comparator<K>>(&self, map: &TreeMap<K, V, B, C>) -> Option<NodeIndex>;

		/// Returns `true` if `key` falls inside the window.
		fn contains<C: Comparator<K>>(&self, key: &K, cmp: &C) -> bool;

		/// Number of visible entries.
		fn count<V, B: Balance, C: Comparator<K>>(&self, map: &TreeMap<K, V, B, C>) -> usize {
			let mut count = 0;
			let mut cur = self.lowest(map);
			while let Some(node) = cur {
				count += 1;
				cur = self.next(map, node);
			}
			count
		}

		/// The window expressed as explicit bounds.
		fn to_bounds(&self) -> Bounds<K>
		where
			K: Clone;
	}
}

/// The set of nodes a map view can see.
///
/// Sealed: implemented by [`Full`] for any key and by [`Bounds`] for keys
/// that are `Clone`.
pub trait Window<K>: sealed::Resolve<K> + Clone {}

// ---------------------------------------------------------------------------
// Full
// ---------------------------------------------------------------------------

/// The window of a whole map.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Full;

impl<K> Window<K> for Full {}

impl<K> Resolve<K> for Full {
	#[inline]
	fn lowest<V, B: Balance, C: Comparator<K>>(&self, map: &TreeMap<K, V, B, C>) -> Option<NodeIndex> {
		map.raw.first()
	}

	#[inline]
	fn highest<V, B: Balance, C: Comparator<K>>(&self, map: &TreeMap<K, V, B, C>) -> Option<NodeIndex> {
		map.raw.last()
	}

	#[inline]
	fn ceiling<V, B: Balance, C: Comparator<K>>(
		&self,
		map: &TreeMap<K, V, B, C>,
		key: &K,
	) -> Option<NodeIndex> {
		map.raw.find_ceiling(key, &map.cmp)
	}

	#[inline]
	fn higher<V, B: Balance, C: Comparator<K>>(
		&self,
		map: &TreeMap<K, V, B, C>,
		key: &K,
	) -> Option<NodeIndex> {
		map.raw.find_higher(key, &map.cmp)
	}

	#[inline]
	fn floor<V, B: Balance, C: Comparator<K>>(
		&self,
		map: &TreeMap<K, V, B, C>,
		key: &K,
	) -> Option<NodeIndex> {
		map.raw.find_floor(key, &map.cmp)
	}

	#[inline]
	fn lower<V, B: Balance, C: Comparator<K>>(
		&self,
		map: &TreeMap<K, V, B, C>,
		key: &K,
	) -> Option<NodeIndex> {
		map.raw.find_lower(key, &map.cmp)
	}

	#[inline]
	fn next<V, B: Balance, C: Comparator<K>>(
		&self,
		map: &TreeMap<K, V, B, C>,
		node: NodeIndex,
	) -> Option<NodeIndex> {
		map.raw.successor(node)
	}

	#[inline]
	fn prev<V, B: Balance, C: Comparator<K>>(
		&self,
		map: &TreeMap<K, V, B, C>,
		node: NodeIndex,
	) -> Option<NodeIndex> {
		map.raw.predecessor(node)
	}

	#[inline]
	fn high_fence<V, B: Balance, C: Comparator<K>>(&self, _map: &TreeMap<K, V, B, C>) -> Option<NodeIndex> {
		None
	}

	#[inline]
	fn low_fence<V, B: Balance, C: Comparator<K>>(&self, _map: &TreeMap<K, V, B, C>) -> Option<NodeIndex> {
		None
	}

	#[inline]
	fn contains<C: Comparator<K>>(&self, _key: &K, _cmp: &C) -> bool {
		true
	}

	#[inline]
	fn count<V, B: Balance, C: Comparator<K>>(&self, map: &TreeMap<K, V, B, C>) -> usize {
		map.raw.len()
	}

	fn to_bounds(&self) -> Bounds<K>
	where
		K: Clone,
	{
		Bounds::unbounded()
	}
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// An immutable key range: each side is unbounded, inclusive or exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bounds<K> {
	lo: Bound<K>,
	hi: Bound<K>,
}

impl<K: Clone> Window<K> for Bounds<K> {}

impl<K> Bounds<K> {
	/// Creates a range from its two sides. No ordering check is made.
	pub fn new(lo: Bound<K>, hi: Bound<K>) -> Self {
		Bounds {
			lo,
			hi,
		}
	}

	/// The range covering every key.
	pub fn unbounded() -> Self {
		Bounds {
			lo: Bound::Unbounded,
			hi: Bound::Unbounded,
		}
	}

	/// The lower side.
	pub fn lo(&self) -> Bound<&K> {
		self.lo.as_ref()
	}

	/// The upper side.
	pub fn hi(&self) -> Bound<&K> {
		self.hi.as_ref()
	}

	/// `key` lies below the lower bound (or on an exclusive one).
	pub(crate) fn too_low<C: Comparator<K>>(&self, key: &K, cmp: &C) -> bool {
		match &self.lo {
			Bound::Unbounded => false,
			Bound::Included(lo) => cmp.compare(key, lo) == Ordering::Less,
			Bound::Excluded(lo) => cmp.compare(key, lo) != Ordering::Greater,
		}
	}

	/// `key` lies above the upper bound (or on an exclusive one).
	pub(crate) fn too_high<C: Comparator<K>>(&self, key: &K, cmp: &C) -> bool {
		match &self.hi {
			Bound::Unbounded => false,
			Bound::Included(hi) => cmp.compare(key, hi) == Ordering::Greater,
			Bound::Excluded(hi) => cmp.compare(key, hi) != Ordering::Less,
		}
	}

	/// `key` lies within the range with both sides treated as inclusive.
	pub(crate) fn in_closed_range<C: Comparator<K>>(&self, key: &K, cmp: &C) -> bool {
		let above_lo = match &self.lo {
			Bound::Unbounded => true,
			Bound::Included(lo) | Bound::Excluded(lo) => cmp.compare(key, lo) != Ordering::Less,
		};
		let below_hi = match &self.hi {
			Bound::Unbounded => true,
			Bound::Included(hi) | Bound::Excluded(hi) => cmp.compare(key, hi) != Ordering::Greater,
		};
		above_lo && below_hi
	}

	/// Whether a nested range may use `key` as a bound of the given kind:
	/// an inclusive bound must be inside this range, an exclusive one may
	/// also sit on this range's own exclusive bound.
	pub(crate) fn admits<C: Comparator<K>>(&self, key: &K, inclusive: bool, cmp: &C) -> bool {
		if inclusive {
			!self.too_low(key, cmp) && !self.too_high(key, cmp)
		} else {
			self.in_closed_range(key, cmp)
		}
	}

	/// Narrows this range to the given sides, each `(key, inclusive)` in
	/// ascending order. A `None` side keeps this range's own bound.
	///
	/// # Errors
	///
	/// - [`Error::KeyOutOfRange`] if a given side leaves this range.
	/// - [`Error::InvalidRange`] if the result starts after it ends.
	pub(crate) fn narrow<C: Comparator<K>>(
		self,
		lo: Option<(K, bool)>,
		hi: Option<(K, bool)>,
		cmp: &C,
	) -> Result<Bounds<K>> {
		for (key, inclusive) in lo.iter().chain(hi.iter()) {
			if !self.admits(key, *inclusive, cmp) {
				debug!(inclusive, "sub-range bound outside the enclosing range");
				return Err(Error::KeyOutOfRange);
			}
		}

		let lo = lo.map_or(self.lo, |(k, inclusive)| bound(k, inclusive));
		let hi = hi.map_or(self.hi, |(k, inclusive)| bound(k, inclusive));

		if let (Bound::Included(l) | Bound::Excluded(l), Bound::Included(h) | Bound::Excluded(h)) = (&lo, &hi) {
			if cmp.compare(l, h) == Ordering::Greater {
				debug!("sub-range starts after it ends");
				return Err(Error::InvalidRange);
			}
		}

		Ok(Bounds {
			lo,
			hi,
		})
	}

	/// Rejects `node` if it lies above the range.
	#[inline]
	fn below_hi<V, B: Balance, C: Comparator<K>>(
		&self,
		map: &TreeMap<K, V, B, C>,
		node: Option<NodeIndex>,
	) -> Option<NodeIndex> {
		node.filter(|&n| !self.too_high(map.raw.key(n), &map.cmp))
	}

	/// Rejects `node` if it lies below the range.
	#[inline]
	fn above_lo<V, B: Balance, C: Comparator<K>>(
		&self,
		map: &TreeMap<K, V, B, C>,
		node: Option<NodeIndex>,
	) -> Option<NodeIndex> {
		node.filter(|&n| !self.too_low(map.raw.key(n), &map.cmp))
	}
}

impl<K> Resolve<K> for Bounds<K> {
	fn lowest<V, B: Balance, C: Comparator<K>>(&self, map: &TreeMap<K, V, B, C>) -> Option<NodeIndex> {
		let node = match &self.lo {
			Bound::Unbounded => map.raw.first(),
			Bound::Included(lo) => map.raw.find_ceiling(lo, &map.cmp),
			Bound::Excluded(lo) => map.raw.find_higher(lo, &map.cmp),
		};
		self.below_hi(map, node)
	}

	fn highest<V, B: Balance, C: Comparator<K>>(&self, map: &TreeMap<K, V, B, C>) -> Option<NodeIndex> {
		let node = match &self.hi {
			Bound::Unbounded => map.raw.last(),
			Bound::Included(hi) => map.raw.find_floor(hi, &map.cmp),
			Bound::Excluded(hi) => map.raw.find_lower(hi, &map.cmp),
		};
		self.above_lo(map, node)
	}

	fn ceiling<V, B: Balance, C: Comparator<K>>(
		&self,
		map: &TreeMap<K, V, B, C>,
		key: &K,
	) -> Option<NodeIndex> {
		if self.too_low(key, &map.cmp) {
			return self.lowest(map);
		}
		self.below_hi(map, map.raw.find_ceiling(key, &map.cmp))
	}

	fn higher<V, B: Balance, C: Comparator<K>>(
		&self,
		map: &TreeMap<K, V, B, C>,
		key: &K,
	) -> Option<NodeIndex> {
		if self.too_low(key, &map.cmp) {
			return self.lowest(map);
		}
		self.below_hi(map, map.raw.find_higher(key, &map.cmp))
	}

	fn floor<V, B: Balance, C: Comparator<K>>(
		&self,
		map: &TreeMap<K, V, B, C>,
		key: &K,
	) -> Option<NodeIndex> {
		if self.too_high(key, &map.cmp) {
			return self.highest(map);
		}
		self.above_lo(map, map.raw.find_floor(key, &map.cmp))
	}

	fn lower<V, B: Balance, C: Comparator<K>>(
		&self,
		map: &TreeMap<K, V, B, C>,
		key: &K,
	) -> Option<NodeIndex> {
		if self.too_high(key, &map.cmp) {
			return self.highest(map);
		}
		self.above_lo(map, map.raw.find_lower(key, &map.cmp))
	}

	fn next<V, B: Balance, C: Comparator<K>>(
		&self,
		map: &TreeMap<K, V, B, C>,
		node: NodeIndex,
	) -> Option<NodeIndex> {
		self.below_hi(map, map.raw.successor(node))
	}

	fn prev<V, B: Balance, C: Comparator<K>>(
		&self,
		map: &TreeMap<K, V, B, C>,
		node: NodeIndex,
	) -> Option<NodeIndex> {
		self.above_lo(map, map.raw.predecessor(node))
	}

	fn high_fence<V, B: Balance, C: Comparator<K>>(&self, map: &TreeMap<K, V, B, C>) -> Option<NodeIndex> {
		match &self.hi {
			Bound::Unbounded => None,
			Bound::Included(hi) => map.raw.find_higher(hi, &map.cmp),
			Bound::Excluded(hi) => map.raw.find_ceiling(hi, &map.cmp),
		}
	}

	fn low_fence<V, B: Balance, C: Comparator<K>>(&self, map: &TreeMap<K, V, B, C>) -> Option<NodeIndex> {
		match &self.lo {
			Bound::Unbounded => None,
			Bound::Included(lo) => map.raw.find_lower(lo, &map.cmp),
			Bound::Excluded(lo) => map.raw.find_floor(lo, &map.cmp),
		}
	}

	#[inline]
	fn contains<C: Comparator<K>>(&self, key: &K, cmp: &C) -> bool {
		!self.too_low(key, cmp) && !self.too_high(key, cmp)
	}

	fn to_bounds(&self) -> Bounds<K>
	where
		K: Clone,
	{
		self.clone()
	}
}
