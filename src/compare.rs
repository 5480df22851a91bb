//! Key orderings.
//!
//! A map orders its keys with a [`Comparator`]. The default is [`Natural`],
//! which defers to the key's [`Ord`] implementation. Any closure of the form
//! `Fn(&K, &K) -> Ordering` is also a comparator, which is how keys without a
//! total order (such as floating-point numbers) are used:
//!
//! ```
//! use navtree::RbTreeMap;
//!
//! let mut map: RbTreeMap<f64, &str, _> = RbTreeMap::with_comparator(|a: &f64, b: &f64| a.total_cmp(b));
//! map.insert(2.5, "b");
//! map.insert(-1.0, "a");
//! assert_eq!(map.first_key(), Ok(&-1.0));
//! ```

use std::cmp::Ordering;

/// A total order over keys of type `K`.
pub trait Comparator<K: ?Sized> {
	/// Compares two keys.
	fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// The natural order of a key type, as given by [`Ord`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Natural;

impl<K: Ord + ?Sized> Comparator<K> for Natural {
	#[inline]
	fn compare(&self, a: &K, b: &K) -> Ordering {
		a.cmp(b)
	}
}

/// The reverse of another comparator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Reversed<C>(pub C);

impl<K: ?Sized, C: Comparator<K>> Comparator<K> for Reversed<C> {
	#[inline]
	fn compare(&self, a: &K, b: &K) -> Ordering {
		self.0.compare(b, a)
	}
}

impl<K: ?Sized, F> Comparator<K> for F
where
	F: Fn(&K, &K) -> Ordering,
{
	#[inline]
	fn compare(&self, a: &K, b: &K) -> Ordering {
		self(a, b)
	}
}
