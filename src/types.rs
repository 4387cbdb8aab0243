//! Element types that can populate a batch lane.
//!
//! The set is closed: `i8`, `u8`, `i16`, `u16`, `i32`, `u32`, `i64`, `u64`,
//! `f32` and `f64`. Each element type carries the scalar semantics of every
//! lane operation. The fallback kernel is written entirely in terms of these
//! methods, and every native kernel must agree with them bit for bit.

use std::fmt::Debug;

use bytemuck::Pod;
use num_traits::AsPrimitive;

use crate::config::BUILD;

mod sealed {
    pub trait Sealed {}
}

/// Scalar type usable as a batch lane.
pub trait Element:
    Copy + Default + Debug + PartialEq + PartialOrd + Pod + Send + Sync + 'static + sealed::Sealed
{
    /// Type name, used in reports and debug output.
    const NAME: &'static str;
    /// Whether this is an IEEE floating-point type.
    const IS_FLOAT: bool;
    /// Whether this type carries a sign.
    const IS_SIGNED: bool;
    /// Additive identity.
    const ZERO: Self;
    /// Multiplicative identity.
    const ONE: Self;
    /// Smallest finite value.
    const MIN: Self;
    /// Largest finite value.
    const MAX: Self;

    /// Value whose bit pattern is all ones.
    fn all_ones() -> Self;

    /// True when any bit is set. A predicate lane is true iff this holds.
    fn is_set(self) -> bool;

    /// Lane `+`: wrapping for integers, IEEE for floats.
    fn lane_add(self, rhs: Self) -> Self;
    /// Lane `-`.
    fn lane_sub(self, rhs: Self) -> Self;
    /// Lane `*`.
    fn lane_mul(self, rhs: Self) -> Self;
    /// Lane `/`. Integer division honours [`BuildConfig::int_division`](crate::config::BuildConfig::int_division).
    ///
    /// # Panics
    /// Exact integer division by zero panics, like the scalar operator.
    fn lane_div(self, rhs: Self) -> Self;
    /// Lane `%`.
    fn lane_rem(self, rhs: Self) -> Self;
    /// Lane negation (wrapping for integers, sign flip for floats).
    fn lane_neg(self) -> Self;
    /// `if self < rhs { self } else { rhs }`.
    fn lane_min(self, rhs: Self) -> Self;
    /// `if self > rhs { self } else { rhs }`.
    fn lane_max(self, rhs: Self) -> Self;
    /// Absolute value (wrapping for signed integers, sign clear for floats).
    fn lane_abs(self) -> Self;

    /// `self * b + c`, fused for floats.
    fn lane_fma(self, b: Self, c: Self) -> Self;
    /// `self * b - c`.
    fn lane_fms(self, b: Self, c: Self) -> Self;
    /// `-(self * b) + c`.
    fn lane_fnma(self, b: Self, c: Self) -> Self;
    /// `-(self * b) - c`.
    fn lane_fnms(self, b: Self, c: Self) -> Self;

    /// Bitwise and on the bit pattern.
    fn lane_and(self, rhs: Self) -> Self;
    /// Bitwise or on the bit pattern.
    fn lane_or(self, rhs: Self) -> Self;
    /// Bitwise xor on the bit pattern.
    fn lane_xor(self, rhs: Self) -> Self;
    /// Bitwise not on the bit pattern.
    fn lane_not(self) -> Self;
}

/// Floating-point lanes.
pub trait FloatElement: Element {
    /// Signed integer of the same width, the target of [`lane_to_int`](Self::lane_to_int).
    type Int: Element;

    /// IEEE square root.
    fn lane_sqrt(self) -> Self;
    /// Truncating conversion with `as` semantics: saturating, NaN becomes 0.
    fn lane_to_int(self) -> Self::Int;
    /// True for NaN.
    fn lane_is_nan(self) -> bool;
}

/// Integer lanes with a same-width floating-point counterpart.
pub trait IntToFloat: Element {
    /// Float of the same width.
    type Float: FloatElement;

    /// Round-to-nearest conversion with `as` semantics.
    fn lane_to_float(self) -> Self::Float;
}

macro_rules! impl_int_element {
    (@abs true, $v:expr) => { $v.wrapping_abs() };
    (@abs false, $v:expr) => { $v };
    ($($t:ty => $via:ty, $signed:tt);* $(;)?) => {$(
        impl sealed::Sealed for $t {}

        impl Element for $t {
            const NAME: &'static str = stringify!($t);
            const IS_FLOAT: bool = false;
            const IS_SIGNED: bool = $signed;
            const ZERO: Self = 0;
            const ONE: Self = 1;
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;

            #[inline(always)]
            fn all_ones() -> Self {
                !0
            }

            #[inline(always)]
            fn is_set(self) -> bool {
                self != 0
            }

            #[inline(always)]
            fn lane_add(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }

            #[inline(always)]
            fn lane_sub(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }

            #[inline(always)]
            fn lane_mul(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }

            #[inline(always)]
            fn lane_div(self, rhs: Self) -> Self {
                if BUILD.fast_int_division() {
                    let q: $via = AsPrimitive::<$via>::as_(self) / AsPrimitive::<$via>::as_(rhs);
                    q.as_()
                } else {
                    self.wrapping_div(rhs)
                }
            }

            #[inline(always)]
            fn lane_rem(self, rhs: Self) -> Self {
                if BUILD.fast_int_division() {
                    self.wrapping_sub(self.lane_div(rhs).wrapping_mul(rhs))
                } else {
                    self.wrapping_rem(rhs)
                }
            }

            #[inline(always)]
            fn lane_neg(self) -> Self {
                self.wrapping_neg()
            }

            #[inline(always)]
            fn lane_min(self, rhs: Self) -> Self {
                if self < rhs { self } else { rhs }
            }

            #[inline(always)]
            fn lane_max(self, rhs: Self) -> Self {
                if self > rhs { self } else { rhs }
            }

            #[inline(always)]
            fn lane_abs(self) -> Self {
                impl_int_element!(@abs $signed, self)
            }

            #[inline(always)]
            fn lane_fma(self, b: Self, c: Self) -> Self {
                self.wrapping_mul(b).wrapping_add(c)
            }

            #[inline(always)]
            fn lane_fms(self, b: Self, c: Self) -> Self {
                self.wrapping_mul(b).wrapping_sub(c)
            }

            #[inline(always)]
            fn lane_fnma(self, b: Self, c: Self) -> Self {
                c.wrapping_sub(self.wrapping_mul(b))
            }

            #[inline(always)]
            fn lane_fnms(self, b: Self, c: Self) -> Self {
                self.wrapping_mul(b).wrapping_neg().wrapping_sub(c)
            }

            #[inline(always)]
            fn lane_and(self, rhs: Self) -> Self {
                self & rhs
            }

            #[inline(always)]
            fn lane_or(self, rhs: Self) -> Self {
                self | rhs
            }

            #[inline(always)]
            fn lane_xor(self, rhs: Self) -> Self {
                self ^ rhs
            }

            #[inline(always)]
            fn lane_not(self) -> Self {
                !self
            }
        }
    )*};
}

impl_int_element! {
    i8 => f32, true;
    u8 => f32, false;
    i16 => f32, true;
    u16 => f32, false;
    i32 => f32, true;
    u32 => f32, false;
    i64 => f64, true;
    u64 => f64, false;
}

macro_rules! impl_float_element {
    ($($t:ty => $int:ty);* $(;)?) => {$(
        impl sealed::Sealed for $t {}

        impl Element for $t {
            const NAME: &'static str = stringify!($t);
            const IS_FLOAT: bool = true;
            const IS_SIGNED: bool = true;
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;

            #[inline(always)]
            fn all_ones() -> Self {
                <$t>::from_bits(!0)
            }

            #[inline(always)]
            fn is_set(self) -> bool {
                self.to_bits() != 0
            }

            #[inline(always)]
            fn lane_add(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline(always)]
            fn lane_sub(self, rhs: Self) -> Self {
                self - rhs
            }

            #[inline(always)]
            fn lane_mul(self, rhs: Self) -> Self {
                self * rhs
            }

            #[inline(always)]
            fn lane_div(self, rhs: Self) -> Self {
                self / rhs
            }

            #[inline(always)]
            fn lane_rem(self, rhs: Self) -> Self {
                self % rhs
            }

            #[inline(always)]
            fn lane_neg(self) -> Self {
                -self
            }

            #[inline(always)]
            fn lane_min(self, rhs: Self) -> Self {
                if self < rhs { self } else { rhs }
            }

            #[inline(always)]
            fn lane_max(self, rhs: Self) -> Self {
                if self > rhs { self } else { rhs }
            }

            #[inline(always)]
            fn lane_abs(self) -> Self {
                <$t>::from_bits(self.to_bits() & !(-0.0 as $t).to_bits())
            }

            #[inline(always)]
            fn lane_fma(self, b: Self, c: Self) -> Self {
                self.mul_add(b, c)
            }

            #[inline(always)]
            fn lane_fms(self, b: Self, c: Self) -> Self {
                self.mul_add(b, -c)
            }

            #[inline(always)]
            fn lane_fnma(self, b: Self, c: Self) -> Self {
                (-self).mul_add(b, c)
            }

            #[inline(always)]
            fn lane_fnms(self, b: Self, c: Self) -> Self {
                (-self).mul_add(b, -c)
            }

            #[inline(always)]
            fn lane_and(self, rhs: Self) -> Self {
                <$t>::from_bits(self.to_bits() & rhs.to_bits())
            }

            #[inline(always)]
            fn lane_or(self, rhs: Self) -> Self {
                <$t>::from_bits(self.to_bits() | rhs.to_bits())
            }

            #[inline(always)]
            fn lane_xor(self, rhs: Self) -> Self {
                <$t>::from_bits(self.to_bits() ^ rhs.to_bits())
            }

            #[inline(always)]
            fn lane_not(self) -> Self {
                <$t>::from_bits(!self.to_bits())
            }
        }

        impl FloatElement for $t {
            type Int = $int;

            #[inline(always)]
            fn lane_sqrt(self) -> Self {
                self.sqrt()
            }

            #[inline(always)]
            fn lane_to_int(self) -> $int {
                self as $int
            }

            #[inline(always)]
            fn lane_is_nan(self) -> bool {
                self.is_nan()
            }
        }
    )*};
}

impl_float_element! {
    f32 => i32;
    f64 => i64;
}

macro_rules! impl_int_to_float {
    ($($t:ty => $float:ty),* $(,)?) => {$(
        impl IntToFloat for $t {
            type Float = $float;

            #[inline(always)]
            fn lane_to_float(self) -> $float {
                self as $float
            }
        }
    )*};
}

impl_int_to_float!(i32 => f32, u32 => f32, i64 => f64, u64 => f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_lanes_wrap() {
        assert_eq!(i32::MAX.lane_add(1), i32::MIN);
        assert_eq!(0u8.lane_sub(1), u8::MAX);
        assert_eq!(i16::MIN.lane_neg(), i16::MIN);
        assert_eq!(i64::MIN.lane_abs(), i64::MIN);
    }

    #[cfg(not(feature = "fast-int-div"))]
    #[test]
    fn test_exact_division_wraps() {
        assert_eq!(i32::MIN.lane_div(-1), i32::MIN);
        assert_eq!(i8::MIN.lane_div(-1), i8::MIN);
        assert_eq!((-7i32).lane_div(2), -3);
    }

    #[cfg(feature = "fast-int-div")]
    #[test]
    fn test_fast_division_saturates() {
        let zero = std::hint::black_box(0i32);
        assert_eq!(i32::MIN.lane_div(-1), i32::MAX);
        assert_eq!(7i32.lane_div(zero), i32::MAX);
        assert_eq!((-7i32).lane_div(zero), i32::MIN);
        assert_eq!(zero.lane_div(zero), 0);
        assert_eq!(100u16.lane_div(7), 14);
        assert_eq!((-7i32).lane_div(2), -3);
    }

    #[test]
    fn test_float_min_max_follow_comparison() {
        assert_eq!(1.0f32.lane_min(2.0), 1.0);
        assert!(f32::NAN.lane_max(2.0) == 2.0);
        assert!(2.0f32.lane_min(f32::NAN).is_nan());
        // Equal zeros return the second operand.
        assert!(0.0f64.lane_min(-0.0).is_sign_negative());
    }

    #[test]
    fn test_float_abs_and_neg_touch_only_sign() {
        assert_eq!((-3.5f32).lane_abs(), 3.5);
        assert!((-0.0f64).lane_abs().is_sign_positive());
        assert!(0.0f32.lane_neg().is_sign_negative());
    }

    #[test]
    fn test_fma_family() {
        assert_eq!(2.0f32.lane_fma(3.0, 1.0), 7.0);
        assert_eq!(2.0f32.lane_fms(3.0, 1.0), 5.0);
        assert_eq!(2.0f32.lane_fnma(3.0, 1.0), -5.0);
        assert_eq!(2.0f32.lane_fnms(3.0, 1.0), -7.0);
        assert_eq!(2i32.lane_fnms(3, 1), -7);
    }

    #[test]
    fn test_conversions_saturate() {
        assert_eq!(f32::NAN.lane_to_int(), 0);
        assert_eq!(f32::INFINITY.lane_to_int(), i32::MAX);
        assert_eq!((-1e20f64).lane_to_int(), i64::MIN);
        assert_eq!((-7i32).lane_to_float(), -7.0f32);
        assert_eq!(u64::MAX.lane_to_float(), 18446744073709551615.0f64);
    }

    #[test]
    fn test_predicate_bits() {
        assert!(f32::all_ones().is_set());
        assert!(f32::all_ones().is_nan());
        assert!(!0.0f64.is_set());
        assert!((-0.0f64).is_set());
        assert_eq!(u16::all_ones(), u16::MAX);
    }

    #[cfg(not(feature = "fast-int-div"))]
    #[test]
    #[should_panic]
    fn test_exact_division_by_zero_panics() {
        let zero = std::hint::black_box(0i32);
        let _ = 7i32.lane_div(zero);
    }
}
