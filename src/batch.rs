//! The batch value type.
//!
//! `Batch<T, N>` holds exactly `N` lanes of `T` in the register type of the
//! kernel [`dispatch`](crate::dispatch) selected for `(T, N)`. It is `Copy`,
//! owns no heap memory, and forwards every operation to that kernel.

use std::fmt;
use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
    DivAssign, Mul, MulAssign, Neg, Not, Rem, RemAssign, Sub, SubAssign,
};

use crate::batch_bool::BoolBatch;
use crate::config::Extension;
use crate::dispatch::{KernelOf, Supported};
use crate::error::{BatchError, Result};
use crate::kernel::{Kernel, Strategy};
use crate::memory::{is_aligned, AccessMode, MAX_ALIGNMENT};
use crate::types::{Element, FloatElement};

pub(crate) type RegOf<T, const N: usize> = <KernelOf<T, N> as Kernel<T, N>>::Reg;

/// `N` lanes of `T`.
#[repr(transparent)]
pub struct Batch<T: Supported<N>, const N: usize> {
    reg: RegOf<T, N>,
}

impl<T: Supported<N>, const N: usize> Clone for Batch<T, N> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Supported<N>, const N: usize> Copy for Batch<T, N> {}

impl<T: Supported<N>, const N: usize> Batch<T, N> {
    /// Number of lanes.
    pub const LANES: usize = N;

    /// Alignment, in bytes, required by the aligned load and store paths.
    pub const ALIGNMENT: usize = {
        let alignment = <KernelOf<T, N> as Kernel<T, N>>::ALIGNMENT;
        assert!(alignment <= MAX_ALIGNMENT, "kernel alignment exceeds MAX_ALIGNMENT");
        alignment
    };

    /// Extension of the kernel backing this batch type.
    pub const EXTENSION: Extension = <KernelOf<T, N> as Strategy>::EXTENSION;

    #[inline(always)]
    pub(crate) fn from_reg(reg: RegOf<T, N>) -> Self {
        Self { reg }
    }

    #[inline(always)]
    pub(crate) fn reg(self) -> RegOf<T, N> {
        self.reg
    }

    // ========================================================================
    // Construction and lane access
    // ========================================================================

    /// Broadcast `value` to every lane.
    #[inline(always)]
    pub fn splat(value: T) -> Self {
        Self::from_reg(T::Kernel::splat(value))
    }

    /// Batch whose lane i is `lanes[i]`.
    #[inline(always)]
    pub fn new(lanes: [T; N]) -> Self {
        Self::from_reg(T::Kernel::from_array(lanes))
    }

    /// All lanes zero.
    #[inline(always)]
    pub fn zero() -> Self {
        Self::splat(T::ZERO)
    }

    /// Lanes as an array.
    #[inline(always)]
    pub fn to_array(self) -> [T; N] {
        T::Kernel::to_array(self.reg)
    }

    /// Lane `index`.
    ///
    /// # Panics
    /// Panics if `index >= N`.
    #[inline]
    pub fn extract(self, index: usize) -> T {
        self.to_array()[index]
    }

    /// Copy of `self` with lane `index` set to `value`.
    ///
    /// # Panics
    /// Panics if `index >= N`.
    #[inline]
    pub fn replace(self, index: usize, value: T) -> Self {
        let mut lanes = self.to_array();
        lanes[index] = value;
        Self::new(lanes)
    }

    /// Load the first `N` values of `values`.
    ///
    /// # Panics
    /// Panics if `values` holds fewer than `N` elements.
    #[inline]
    pub fn from_slice(values: &[T]) -> Self {
        assert!(
            values.len() >= N,
            "slice of {} elements is too short for {} lanes",
            values.len(),
            N
        );
        // SAFETY: length checked above.
        unsafe { Self::load_unaligned(values.as_ptr()) }
    }

    /// Load the first `N` values of `values`, or fail if it is too short.
    pub fn try_from_slice(values: &[T]) -> Result<Self> {
        if values.len() < N {
            return Err(BatchError::out_of_range(format!(
                "slice of {} elements is too short for {} lanes",
                values.len(),
                N
            )));
        }
        // SAFETY: length checked above.
        Ok(unsafe { Self::load_unaligned(values.as_ptr()) })
    }

    /// Aligned load from the start of `values`, checking length and alignment.
    pub fn try_load_aligned(values: &[T]) -> Result<Self> {
        if values.len() < N {
            return Err(BatchError::out_of_range(format!(
                "slice of {} elements is too short for {} lanes",
                values.len(),
                N
            )));
        }
        if !is_aligned(values.as_ptr(), Self::ALIGNMENT) {
            return Err(BatchError::failed_precondition(format!(
                "slice at {:p} is not aligned to {} bytes",
                values.as_ptr(),
                Self::ALIGNMENT
            )));
        }
        // SAFETY: length and alignment checked above.
        Ok(unsafe { Self::load_aligned(values.as_ptr()) })
    }

    /// Store all lanes into the first `N` slots of `out`.
    ///
    /// # Panics
    /// Panics if `out` holds fewer than `N` elements.
    #[inline]
    pub fn write_to_slice(self, out: &mut [T]) {
        assert!(
            out.len() >= N,
            "slice of {} elements is too short for {} lanes",
            out.len(),
            N
        );
        // SAFETY: length checked above.
        unsafe { self.store_unaligned(out.as_mut_ptr()) }
    }

    /// Store all lanes into the first `N` slots of `out`, or fail if it is too short.
    pub fn try_write_to_slice(self, out: &mut [T]) -> Result<()> {
        if out.len() < N {
            return Err(BatchError::out_of_range(format!(
                "slice of {} elements is too short for {} lanes",
                out.len(),
                N
            )));
        }
        // SAFETY: length checked above.
        unsafe { self.store_unaligned(out.as_mut_ptr()) };
        Ok(())
    }

    // ========================================================================
    // Raw memory access
    // ========================================================================

    /// # Safety
    /// `ptr` must be valid for reading `N` values and aligned to [`Self::ALIGNMENT`].
    #[inline(always)]
    pub unsafe fn load_aligned(ptr: *const T) -> Self {
        debug_assert!(is_aligned(ptr, Self::ALIGNMENT));
        Self::from_reg(T::Kernel::load_aligned(ptr))
    }

    /// # Safety
    /// `ptr` must be valid for reading `N` values.
    #[inline(always)]
    pub unsafe fn load_unaligned(ptr: *const T) -> Self {
        Self::from_reg(T::Kernel::load_unaligned(ptr))
    }

    /// # Safety
    /// `ptr` must be valid for writing `N` values and aligned to [`Self::ALIGNMENT`].
    #[inline(always)]
    pub unsafe fn store_aligned(self, ptr: *mut T) {
        debug_assert!(is_aligned(ptr, Self::ALIGNMENT));
        T::Kernel::store_aligned(self.reg, ptr)
    }

    /// # Safety
    /// `ptr` must be valid for writing `N` values.
    #[inline(always)]
    pub unsafe fn store_unaligned(self, ptr: *mut T) {
        T::Kernel::store_unaligned(self.reg, ptr)
    }

    /// Load with the access mode given by the tag, [`Aligned`](crate::memory::Aligned)
    /// or [`Unaligned`](crate::memory::Unaligned).
    ///
    /// # Safety
    /// As for [`load_aligned`](Self::load_aligned) or [`load_unaligned`](Self::load_unaligned).
    #[inline(always)]
    pub unsafe fn load<M: AccessMode>(ptr: *const T, _mode: M) -> Self {
        if M::ALIGNED {
            Self::load_aligned(ptr)
        } else {
            Self::load_unaligned(ptr)
        }
    }

    /// Store with the access mode given by the tag.
    ///
    /// # Safety
    /// As for [`store_aligned`](Self::store_aligned) or [`store_unaligned`](Self::store_unaligned).
    #[inline(always)]
    pub unsafe fn store<M: AccessMode>(self, ptr: *mut T, _mode: M) {
        if M::ALIGNED {
            self.store_aligned(ptr)
        } else {
            self.store_unaligned(ptr)
        }
    }

    // ========================================================================
    // Lane-wise operations
    // ========================================================================

    #[inline(always)]
    pub fn min(self, other: Self) -> Self {
        Self::from_reg(T::Kernel::min(self.reg, other.reg))
    }

    #[inline(always)]
    pub fn max(self, other: Self) -> Self {
        Self::from_reg(T::Kernel::max(self.reg, other.reg))
    }

    /// Absolute value; wraps for the minimum signed integer.
    #[inline(always)]
    pub fn abs(self) -> Self {
        Self::from_reg(T::Kernel::abs(self.reg))
    }

    /// `self & !other`.
    #[inline(always)]
    pub fn andnot(self, other: Self) -> Self {
        Self::from_reg(T::Kernel::andnot(self.reg, other.reg))
    }

    /// `self * b + c`, fused for floats.
    #[inline(always)]
    pub fn fma(self, b: Self, c: Self) -> Self {
        Self::from_reg(T::Kernel::fma(self.reg, b.reg, c.reg))
    }

    /// `self * b - c`.
    #[inline(always)]
    pub fn fms(self, b: Self, c: Self) -> Self {
        Self::from_reg(T::Kernel::fms(self.reg, b.reg, c.reg))
    }

    /// `-(self * b) + c`.
    #[inline(always)]
    pub fn fnma(self, b: Self, c: Self) -> Self {
        Self::from_reg(T::Kernel::fnma(self.reg, b.reg, c.reg))
    }

    /// `-(self * b) - c`.
    #[inline(always)]
    pub fn fnms(self, b: Self, c: Self) -> Self {
        Self::from_reg(T::Kernel::fnms(self.reg, b.reg, c.reg))
    }

    /// `self + 1`.
    #[inline(always)]
    pub fn incr(self) -> Self {
        self + Self::splat(T::ONE)
    }

    /// `self - 1`.
    #[inline(always)]
    pub fn decr(self) -> Self {
        self - Self::splat(T::ONE)
    }

    /// Lane i from `a` where `cond` is set, otherwise from `b`.
    #[inline(always)]
    pub fn select(cond: BoolBatch<T, N>, a: Self, b: Self) -> Self {
        Self::from_reg(T::Kernel::select(cond.mask(), a.reg, b.reg))
    }

    /// [`select`](Self::select) with a compile-time mask: bit i of `MASK` picks lane i of `a`.
    #[inline(always)]
    pub fn blend<const MASK: u64>(a: Self, b: Self) -> Self {
        Self::select(BoolBatch::from_bitmask(MASK), a, b)
    }

    // ========================================================================
    // Comparisons
    // ========================================================================

    #[inline(always)]
    pub fn simd_eq(self, other: Self) -> BoolBatch<T, N> {
        BoolBatch::from_mask(T::Kernel::eq(self.reg, other.reg))
    }

    /// True where lanes differ or either lane is NaN.
    #[inline(always)]
    pub fn simd_ne(self, other: Self) -> BoolBatch<T, N> {
        BoolBatch::from_mask(T::Kernel::ne(self.reg, other.reg))
    }

    #[inline(always)]
    pub fn simd_lt(self, other: Self) -> BoolBatch<T, N> {
        BoolBatch::from_mask(T::Kernel::lt(self.reg, other.reg))
    }

    #[inline(always)]
    pub fn simd_le(self, other: Self) -> BoolBatch<T, N> {
        BoolBatch::from_mask(T::Kernel::le(self.reg, other.reg))
    }

    #[inline(always)]
    pub fn simd_gt(self, other: Self) -> BoolBatch<T, N> {
        BoolBatch::from_mask(T::Kernel::gt(self.reg, other.reg))
    }

    #[inline(always)]
    pub fn simd_ge(self, other: Self) -> BoolBatch<T, N> {
        BoolBatch::from_mask(T::Kernel::ge(self.reg, other.reg))
    }

    // ========================================================================
    // Reductions
    // ========================================================================

    /// Sum of all lanes, in halving-tree order.
    #[inline(always)]
    pub fn hadd(self) -> T {
        T::Kernel::hadd(self.reg)
    }

    /// Lane i of the result is `rows[i].hadd()`.
    #[inline(always)]
    pub fn haddp(rows: [Self; N]) -> Self {
        Self::from_reg(T::Kernel::haddp(rows.map(|row| row.reg)))
    }
}

impl<T: Supported<N> + FloatElement, const N: usize> Batch<T, N> {
    #[inline(always)]
    pub fn sqrt(self) -> Self {
        Self::from_reg(T::Kernel::sqrt(self.reg))
    }

    /// True in lanes holding NaN.
    #[inline(always)]
    pub fn isnan(self) -> BoolBatch<T, N> {
        self.simd_ne(self)
    }
}

// ============================================================================
// Conversions and formatting
// ============================================================================

impl<T: Supported<N>, const N: usize> Default for Batch<T, N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: Supported<N>, const N: usize> From<T> for Batch<T, N> {
    #[inline(always)]
    fn from(value: T) -> Self {
        Self::splat(value)
    }
}

impl<T: Supported<N>, const N: usize> From<[T; N]> for Batch<T, N> {
    #[inline(always)]
    fn from(lanes: [T; N]) -> Self {
        Self::new(lanes)
    }
}

impl<T: Supported<N>, const N: usize> From<Batch<T, N>> for [T; N] {
    #[inline(always)]
    fn from(batch: Batch<T, N>) -> Self {
        batch.to_array()
    }
}

impl<T: Supported<N>, const N: usize> fmt::Debug for Batch<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Batch<{}, {}>{:?}", T::NAME, N, self.to_array())
    }
}

/// True when every lane compares equal; NaN lanes never do.
impl<T: Supported<N>, const N: usize> PartialEq for Batch<T, N> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.simd_eq(*other).all()
    }
}

// ============================================================================
// Operators
// ============================================================================

macro_rules! binary_op {
    ($($trait:ident, $method:ident, $assign:ident, $assign_method:ident => $kernel_fn:ident;)*) => {$(
        impl<T: Supported<N>, const N: usize> $trait for Batch<T, N> {
            type Output = Self;

            #[inline(always)]
            fn $method(self, rhs: Self) -> Self {
                Self::from_reg(T::Kernel::$kernel_fn(self.reg, rhs.reg))
            }
        }

        impl<T: Supported<N>, const N: usize> $trait<T> for Batch<T, N> {
            type Output = Self;

            #[inline(always)]
            fn $method(self, rhs: T) -> Self {
                self.$method(Self::splat(rhs))
            }
        }

        impl<T: Supported<N>, const N: usize> $assign for Batch<T, N> {
            #[inline(always)]
            fn $assign_method(&mut self, rhs: Self) {
                *self = (*self).$method(rhs);
            }
        }

        impl<T: Supported<N>, const N: usize> $assign<T> for Batch<T, N> {
            #[inline(always)]
            fn $assign_method(&mut self, rhs: T) {
                *self = (*self).$method(Self::splat(rhs));
            }
        }
    )*};
}

binary_op! {
    Add, add, AddAssign, add_assign => add;
    Sub, sub, SubAssign, sub_assign => sub;
    Mul, mul, MulAssign, mul_assign => mul;
    Div, div, DivAssign, div_assign => div;
    Rem, rem, RemAssign, rem_assign => rem;
    BitAnd, bitand, BitAndAssign, bitand_assign => bitand;
    BitOr, bitor, BitOrAssign, bitor_assign => bitor;
    BitXor, bitxor, BitXorAssign, bitxor_assign => bitxor;
}

/// `scalar ⊕ batch` for each element type; the scalar is broadcast first.
macro_rules! scalar_lhs_ops {
    ($($t:ty),*) => {$(
        scalar_lhs_ops!(@ops $t: Add add, Sub sub, Mul mul, Div div, Rem rem, BitAnd bitand, BitOr bitor, BitXor bitxor);
    )*};
    (@ops $t:ty: $($trait:ident $method:ident),*) => {$(
        impl<const N: usize> $trait<Batch<$t, N>> for $t
        where
            $t: Supported<N>,
        {
            type Output = Batch<$t, N>;

            #[inline(always)]
            fn $method(self, rhs: Batch<$t, N>) -> Batch<$t, N> {
                Batch::splat(self).$method(rhs)
            }
        }
    )*};
}

scalar_lhs_ops!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

impl<T: Supported<N>, const N: usize> Neg for Batch<T, N> {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        Self::from_reg(T::Kernel::neg(self.reg))
    }
}

impl<T: Supported<N>, const N: usize> Not for Batch<T, N> {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self::from_reg(T::Kernel::bitnot(self.reg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{aligned_from_slice, Aligned, Unaligned};

    #[test]
    fn test_construction() {
        let a = Batch::<f32, 4>::new([1.0, 2.0, 3.0, 4.0]);
        assert_eq!(a.to_array(), [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(Batch::<i32, 8>::splat(7).to_array(), [7; 8]);
        assert_eq!(Batch::<u8, 16>::default().to_array(), [0; 16]);
        let from: Batch<f64, 2> = 3.5.into();
        assert_eq!(<[f64; 2]>::from(from), [3.5, 3.5]);
        assert_eq!(Batch::<i16, 8>::LANES, 8);
    }

    #[test]
    fn test_extract_replace() {
        let a = Batch::<i32, 4>::new([1, 2, 3, 4]);
        assert_eq!(a.extract(2), 3);
        assert_eq!(a.replace(0, 9).to_array(), [9, 2, 3, 4]);
    }

    #[test]
    #[should_panic]
    fn test_extract_out_of_range() {
        Batch::<i32, 4>::splat(1).extract(4);
    }

    #[test]
    fn test_slices() {
        let data = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let a = Batch::<f32, 8>::from_slice(&data[1..]);
        assert_eq!(a.extract(0), 2.0);

        let err = Batch::<f32, 8>::try_from_slice(&data[2..]).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::OutOfRange);

        let mut out = [0.0f32; 8];
        a.write_to_slice(&mut out);
        assert_eq!(out, [2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert!(a.try_write_to_slice(&mut out[..7]).is_err());
    }

    #[test]
    #[should_panic(expected = "too short")]
    fn test_from_short_slice_panics() {
        Batch::<i32, 4>::from_slice(&[1, 2, 3]);
    }

    #[test]
    fn test_aligned_access() {
        let data = aligned_from_slice(&[1i32, 2, 3, 4, 5, 6, 7, 8, 9]);
        let a = Batch::<i32, 8>::try_load_aligned(&data).unwrap();
        assert_eq!(a.to_array(), [1, 2, 3, 4, 5, 6, 7, 8]);

        if Batch::<i32, 8>::ALIGNMENT > 4 {
            let err = Batch::<i32, 8>::try_load_aligned(&data[1..]).unwrap_err();
            assert_eq!(err.code(), crate::error::ErrorCode::FailedPrecondition);
        }

        let mut out = crate::memory::aligned_zeroed::<i32>(8);
        unsafe {
            let b = Batch::<i32, 8>::load(data.as_ptr(), Aligned);
            b.store(out.as_mut_ptr(), Aligned);
            let c = Batch::<i32, 8>::load(data.as_ptr().add(1), Unaligned);
            assert_eq!(c.extract(7), 9);
        }
        assert_eq!(&out[..], &data[..8]);
    }

    #[test]
    fn test_operators() {
        let a = Batch::<i32, 4>::new([1, 2, 3, 4]);
        let b = Batch::<i32, 4>::new([10, 20, 30, 40]);
        assert_eq!((a + b).to_array(), [11, 22, 33, 44]);
        assert_eq!((b - a).to_array(), [9, 18, 27, 36]);
        assert_eq!((a * 2).to_array(), [2, 4, 6, 8]);
        assert_eq!((100 / a).to_array(), [100, 50, 33, 25]);
        assert_eq!((b % 7).to_array(), [3, 6, 2, 5]);
        assert_eq!((-a).to_array(), [-1, -2, -3, -4]);
        assert_eq!((a & 1).to_array(), [1, 0, 1, 0]);
        assert_eq!((!Batch::<u8, 4>::splat(0x0f)).to_array(), [0xf0; 4]);

        let mut c = a;
        c += b;
        c -= 1;
        c *= a;
        assert_eq!(c.to_array(), [10, 42, 96, 172]);
        assert_eq!(a.incr().decr(), a);
    }

    #[test]
    fn test_float_operators() {
        let a = Batch::<f32, 8>::new([1.0, -2.0, 3.0, -4.0, 0.5, -0.5, 9.0, 16.0]);
        assert_eq!((a / 2.0).extract(0), 0.5);
        assert_eq!((1.0 - a).extract(1), 3.0);
        assert_eq!(a.abs().extract(3), 4.0);
        assert_eq!(a.abs().sqrt().extract(7), 4.0);
        assert_eq!(a.min(Batch::splat(0.0)).extract(0), 0.0);
        assert_eq!(a.max(Batch::splat(0.0)).extract(0), 1.0);
        assert_eq!(a.fma(a, Batch::splat(1.0)).extract(1), 5.0);
        assert_eq!(a.fnma(a, Batch::splat(1.0)).extract(1), -3.0);
        assert_eq!(a.fms(a, Batch::splat(1.0)).extract(2), 8.0);
        assert_eq!(a.fnms(a, Batch::splat(1.0)).extract(2), -10.0);
        assert_eq!(a.hadd(), 23.0);
    }

    #[test]
    fn test_nan_handling() {
        let a = Batch::<f64, 4>::new([f64::NAN, 1.0, 2.0, f64::NAN]);
        let b = Batch::<f64, 4>::new([0.0, 1.0, f64::NAN, f64::NAN]);
        assert_eq!(a.isnan().to_bitmask(), 0b1001);
        assert_eq!(a.simd_eq(b).to_bitmask(), 0b0010);
        assert_eq!(a.simd_ne(b).to_bitmask(), 0b1101);
        assert_eq!(a.simd_lt(b).to_bitmask(), 0);
        assert_eq!(a.simd_ge(b).to_bitmask(), 0b0010);
        assert_ne!(a, a);
        // NaN in either operand yields the second operand.
        assert_eq!(a.min(b).extract(0), 0.0);
        assert!(b.min(a).extract(0).is_nan());
    }

    #[test]
    fn test_select_and_blend() {
        let a = Batch::<i32, 8>::new([0, 1, 2, 3, 4, 5, 6, 7]);
        let b = Batch::<i32, 8>::new([10, 20, 30, 40, 50, 60, 70, 80]);
        let cond = BoolBatch::from_bitmask(0b0011_0011);
        assert_eq!(Batch::select(cond, a, b).to_array(), [0, 1, 30, 40, 4, 5, 70, 80]);
        assert_eq!(Batch::blend::<0b0011_0011>(a, b), Batch::select(cond, a, b));

        let c = Batch::<i32, 4>::new([0, 1, 2, 3]);
        let d = Batch::<i32, 4>::new([10, 20, 30, 40]);
        assert_eq!(Batch::blend::<0b1000>(c, d).to_array(), [10, 20, 30, 3]);
    }

    #[test]
    fn test_haddp() {
        let rows = [
            Batch::<f32, 4>::new([1.0, 2.0, 3.0, 4.0]),
            Batch::<f32, 4>::new([5.0, 6.0, 7.0, 8.0]),
            Batch::<f32, 4>::new([9.0, 10.0, 11.0, 12.0]),
            Batch::<f32, 4>::new([13.0, 14.0, 15.0, 16.0]),
        ];
        assert_eq!(Batch::haddp(rows).to_array(), [10.0, 26.0, 42.0, 58.0]);
    }

    #[test]
    fn test_debug_format() {
        let a = Batch::<u16, 2>::new([1, 2]);
        assert_eq!(format!("{a:?}"), "Batch<u16, 2>[1, 2]");
    }

    #[test]
    fn test_extension_is_enabled() {
        assert!(crate::config::BUILD.enables(Batch::<f32, 8>::EXTENSION));
        assert_eq!(Batch::<u64, 4>::EXTENSION, Extension::Fallback);
    }
}
