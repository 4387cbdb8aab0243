//! Predicate batches.
//!
//! `BoolBatch<T, N>` is the result of comparing two `Batch<T, N>` and the
//! condition of [`Batch::select`]. Its representation belongs to the kernel:
//! all-ones lanes, a `k` mask register, a `[bool; N]`, or a pair of halves.
//! Everything observable goes through bitmasks where bit i is lane i.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use crate::batch::Batch;
use crate::dispatch::{KernelOf, Supported};
use crate::kernel::{lane_bits, Kernel};

pub(crate) type MaskOf<T, const N: usize> = <KernelOf<T, N> as Kernel<T, N>>::Mask;

/// One predicate per lane of a `Batch<T, N>`.
#[repr(transparent)]
pub struct BoolBatch<T: Supported<N>, const N: usize> {
    mask: MaskOf<T, N>,
}

impl<T: Supported<N>, const N: usize> Clone for BoolBatch<T, N> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Supported<N>, const N: usize> Copy for BoolBatch<T, N> {}

impl<T: Supported<N>, const N: usize> BoolBatch<T, N> {
    /// Number of lanes.
    pub const LANES: usize = N;

    #[inline(always)]
    pub(crate) fn from_mask(mask: MaskOf<T, N>) -> Self {
        Self { mask }
    }

    #[inline(always)]
    pub(crate) fn mask(self) -> MaskOf<T, N> {
        self.mask
    }

    /// Broadcast `value` to every lane.
    #[inline(always)]
    pub fn splat(value: bool) -> Self {
        Self::from_mask(T::Kernel::mask_splat(value))
    }

    /// Predicate whose lane i is `lanes[i]`.
    #[inline(always)]
    pub fn new(lanes: [bool; N]) -> Self {
        Self::from_mask(T::Kernel::mask_from_array(lanes))
    }

    /// Lane i is set iff bit i of `bits` is; bits at or above `N` are ignored.
    #[inline(always)]
    pub fn from_bitmask(bits: u64) -> Self {
        Self::from_mask(T::Kernel::mask_from_bitmask(bits & lane_bits(N)))
    }

    /// Bit i is set iff lane i is.
    #[inline(always)]
    pub fn to_bitmask(self) -> u64 {
        T::Kernel::mask_to_bitmask(self.mask)
    }

    #[inline(always)]
    pub fn to_array(self) -> [bool; N] {
        T::Kernel::mask_to_array(self.mask)
    }

    /// Lane `index`.
    ///
    /// # Panics
    /// Panics if `index >= N`.
    #[inline]
    pub fn extract(self, index: usize) -> bool {
        assert!(index < N, "lane {index} out of range for {N} lanes");
        (self.to_bitmask() >> index) & 1 == 1
    }

    /// True iff every lane is set.
    #[inline(always)]
    pub fn all(self) -> bool {
        T::Kernel::mask_all(self.mask)
    }

    /// True iff at least one lane is set.
    #[inline(always)]
    pub fn any(self) -> bool {
        T::Kernel::mask_any(self.mask)
    }

    /// True iff no lane is set.
    #[inline(always)]
    pub fn none(self) -> bool {
        !self.any()
    }

    /// Number of set lanes.
    #[inline(always)]
    pub fn count(self) -> usize {
        self.to_bitmask().count_ones() as usize
    }

    /// `self & !other`.
    #[inline(always)]
    pub fn andnot(self, other: Self) -> Self {
        Self::from_mask(T::Kernel::mask_andnot(self.mask, other.mask))
    }

    /// Lane-wise equality of two predicates.
    #[inline(always)]
    pub fn simd_eq(self, other: Self) -> Self {
        Self::from_mask(T::Kernel::mask_eq(self.mask, other.mask))
    }

    /// Lane-wise inequality of two predicates.
    #[inline(always)]
    pub fn simd_ne(self, other: Self) -> Self {
        Self::from_mask(T::Kernel::mask_ne(self.mask, other.mask))
    }

    /// Logical and with a predicate or a broadcast `bool`.
    #[inline(always)]
    pub fn and(self, other: impl Into<Self>) -> Self {
        self & other.into()
    }

    /// Logical or with a predicate or a broadcast `bool`.
    #[inline(always)]
    pub fn or(self, other: impl Into<Self>) -> Self {
        self | other.into()
    }

    /// The same lanes as a predicate for another element type.
    #[inline(always)]
    pub fn cast<U: Supported<N>>(self) -> BoolBatch<U, N> {
        BoolBatch::from_bitmask(self.to_bitmask())
    }

    /// Lane i from `a` where set, otherwise from `b`.
    #[inline(always)]
    pub fn select(self, a: Batch<T, N>, b: Batch<T, N>) -> Batch<T, N> {
        Batch::select(self, a, b)
    }
}

impl<T: Supported<N>, const N: usize> Default for BoolBatch<T, N> {
    fn default() -> Self {
        Self::splat(false)
    }
}

impl<T: Supported<N>, const N: usize> From<bool> for BoolBatch<T, N> {
    #[inline(always)]
    fn from(value: bool) -> Self {
        Self::splat(value)
    }
}

impl<T: Supported<N>, const N: usize> From<[bool; N]> for BoolBatch<T, N> {
    #[inline(always)]
    fn from(lanes: [bool; N]) -> Self {
        Self::new(lanes)
    }
}

impl<T: Supported<N>, const N: usize> fmt::Debug for BoolBatch<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoolBatch<{}, {}>{:?}", T::NAME, N, self.to_array())
    }
}

/// True when both predicates have the same lanes set.
impl<T: Supported<N>, const N: usize> PartialEq for BoolBatch<T, N> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.to_bitmask() == other.to_bitmask()
    }
}

impl<T: Supported<N>, const N: usize> Eq for BoolBatch<T, N> {}

impl<T: Supported<N>, const N: usize> Not for BoolBatch<T, N> {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self::from_mask(T::Kernel::mask_not(self.mask))
    }
}

macro_rules! logic_op {
    ($($trait:ident, $method:ident, $assign:ident, $assign_method:ident => $kernel_fn:ident;)*) => {$(
        impl<T: Supported<N>, const N: usize> $trait for BoolBatch<T, N> {
            type Output = Self;

            #[inline(always)]
            fn $method(self, rhs: Self) -> Self {
                Self::from_mask(T::Kernel::$kernel_fn(self.mask, rhs.mask))
            }
        }

        impl<T: Supported<N>, const N: usize> $trait<bool> for BoolBatch<T, N> {
            type Output = Self;

            #[inline(always)]
            fn $method(self, rhs: bool) -> Self {
                self.$method(Self::splat(rhs))
            }
        }

        impl<T: Supported<N>, const N: usize> $trait<BoolBatch<T, N>> for bool {
            type Output = BoolBatch<T, N>;

            #[inline(always)]
            fn $method(self, rhs: BoolBatch<T, N>) -> BoolBatch<T, N> {
                BoolBatch::splat(self).$method(rhs)
            }
        }

        impl<T: Supported<N>, const N: usize> $assign for BoolBatch<T, N> {
            #[inline(always)]
            fn $assign_method(&mut self, rhs: Self) {
                *self = (*self).$method(rhs);
            }
        }

        impl<T: Supported<N>, const N: usize> $assign<bool> for BoolBatch<T, N> {
            #[inline(always)]
            fn $assign_method(&mut self, rhs: bool) {
                *self = (*self).$method(rhs);
            }
        }
    )*};
}

logic_op! {
    BitAnd, bitand, BitAndAssign, bitand_assign => mask_and;
    BitOr, bitor, BitOrAssign, bitor_assign => mask_or;
    BitXor, bitxor, BitXorAssign, bitxor_assign => mask_xor;
}
