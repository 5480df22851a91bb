//! Numeric values for accumulator maps.
//!
//! [`TreeMap::add_to`](crate::TreeMap::add_to) and
//! [`TreeMap::sub_from`](crate::TreeMap::sub_from) treat the map as a sparse
//! accumulator: an entry whose value equals the map's default return value is
//! logically absent and is removed. [`Accumulate`] supplies the arithmetic and
//! the equality used for that check.
//!
//! Integer arithmetic wraps on overflow. Floating-point equality compares bit
//! patterns, so a `NaN` default matches a `NaN` result and `-0.0` is distinct
//! from `0.0`.

/// A value type that can be accumulated in place.
pub trait Accumulate: Copy {
	/// The implicit value of a key that is absent from an accumulator map.
	const ZERO: Self;

	/// Returns `self + delta`.
	fn accumulate(self, delta: Self) -> Self;

	/// Returns `self - delta`.
	fn deplete(self, delta: Self) -> Self;

	/// Returns `true` if `self` and `other` are the same value.
	fn same(&self, other: &Self) -> bool;
}

macro_rules! impl_accumulate_int {
	($($t:ty),*) => {
		$(
			impl Accumulate for $t {
				const ZERO: Self = 0;

				#[inline]
				fn accumulate(self, delta: Self) -> Self {
					self.wrapping_add(delta)
				}

				#[inline]
				fn deplete(self, delta: Self) -> Self {
					self.wrapping_sub(delta)
				}

				#[inline]
				fn same(&self, other: &Self) -> bool {
					self == other
				}
			}
		)*
	};
}

macro_rules! impl_accumulate_float {
	($($t:ty),*) => {
		$(
			impl Accumulate for $t {
				const ZERO: Self = 0.0;

				#[inline]
				fn accumulate(self, delta: Self) -> Self {
					self + delta
				}

				#[inline]
				fn deplete(self, delta: Self) -> Self {
					self - delta
				}

				#[inline]
				fn same(&self, other: &Self) -> bool {
					self.to_bits() == other.to_bits()
				}
			}
		)*
	};
}

impl_accumulate_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_accumulate_float!(f32, f64);

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn integers_wrap() {
		assert_eq!(i32::MAX.accumulate(1), i32::MIN);
		assert_eq!(0u8.deplete(1), u8::MAX);
		assert!(5i64.same(&5));
	}

	#[test]
	fn floats_compare_bit_patterns() {
		assert!(f64::NAN.same(&f64::NAN));
		assert!(!(-0.0f64).same(&0.0));
		assert!(1.5f32.accumulate(0.5).same(&2.0));
	}
}
