//! The operation vocabulary every kernel implements.

use crate::config::Extension;
use crate::types::{Element, FloatElement, IntToFloat};

/// A zero-sized kernel marker tied to one hardware extension.
pub trait Strategy: Send + Sync + 'static {
    /// Extension this strategy is written against.
    const EXTENSION: Extension;
}

/// Full batch vocabulary for `N` lanes of `T`.
///
/// Implementations are stateless; `Reg` and `Mask` carry all data. Methods with
/// default bodies compute per lane through [`Element`], and native kernels
/// override them where an instruction sequence with identical results exists.
///
/// Every implementation must agree bit for bit with the fallback kernel,
/// except for NaN payloads.
pub trait Kernel<T: Element, const N: usize>: Strategy {
    /// Register-of-record holding `N` lanes.
    type Reg: Copy + Send + Sync + 'static;
    /// Predicate paired with `Reg`.
    type Mask: Copy + Send + Sync + 'static;
    /// Alignment, in bytes, required by the aligned load and store paths.
    const ALIGNMENT: usize;

    fn splat(value: T) -> Self::Reg;
    fn from_array(lanes: [T; N]) -> Self::Reg;
    fn to_array(reg: Self::Reg) -> [T; N];

    /// # Safety
    /// `ptr` must be valid for reading `N` values and aligned to [`Self::ALIGNMENT`].
    unsafe fn load_aligned(ptr: *const T) -> Self::Reg;
    /// # Safety
    /// `ptr` must be valid for reading `N` values.
    unsafe fn load_unaligned(ptr: *const T) -> Self::Reg;
    /// # Safety
    /// `ptr` must be valid for writing `N` values and aligned to [`Self::ALIGNMENT`].
    unsafe fn store_aligned(reg: Self::Reg, ptr: *mut T);
    /// # Safety
    /// `ptr` must be valid for writing `N` values.
    unsafe fn store_unaligned(reg: Self::Reg, ptr: *mut T);

    fn add(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn sub(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn mul(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    #[inline(always)]
    fn div(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        Self::from_array(zip_lanes(Self::to_array(a), Self::to_array(b), T::lane_div))
    }

    #[inline(always)]
    fn rem(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        Self::from_array(zip_lanes(Self::to_array(a), Self::to_array(b), T::lane_rem))
    }

    fn neg(a: Self::Reg) -> Self::Reg;
    fn min(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn max(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn abs(a: Self::Reg) -> Self::Reg;

    #[inline(always)]
    fn fma(a: Self::Reg, b: Self::Reg, c: Self::Reg) -> Self::Reg {
        Self::from_array(zip3_lanes(Self::to_array(a), Self::to_array(b), Self::to_array(c), T::lane_fma))
    }

    #[inline(always)]
    fn fms(a: Self::Reg, b: Self::Reg, c: Self::Reg) -> Self::Reg {
        Self::from_array(zip3_lanes(Self::to_array(a), Self::to_array(b), Self::to_array(c), T::lane_fms))
    }

    #[inline(always)]
    fn fnma(a: Self::Reg, b: Self::Reg, c: Self::Reg) -> Self::Reg {
        Self::from_array(zip3_lanes(Self::to_array(a), Self::to_array(b), Self::to_array(c), T::lane_fnma))
    }

    #[inline(always)]
    fn fnms(a: Self::Reg, b: Self::Reg, c: Self::Reg) -> Self::Reg {
        Self::from_array(zip3_lanes(Self::to_array(a), Self::to_array(b), Self::to_array(c), T::lane_fnms))
    }

    fn bitand(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn bitor(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn bitxor(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn bitnot(a: Self::Reg) -> Self::Reg;
    /// `a & !b`.
    fn andnot(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    fn eq(a: Self::Reg, b: Self::Reg) -> Self::Mask;
    fn ne(a: Self::Reg, b: Self::Reg) -> Self::Mask;
    fn lt(a: Self::Reg, b: Self::Reg) -> Self::Mask;
    fn le(a: Self::Reg, b: Self::Reg) -> Self::Mask;
    fn gt(a: Self::Reg, b: Self::Reg) -> Self::Mask;
    fn ge(a: Self::Reg, b: Self::Reg) -> Self::Mask;

    /// Lane i from `a` where `mask` is set, otherwise from `b`.
    fn select(mask: Self::Mask, a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// Sum of all lanes, reduced in [`pairwise_sum`] order.
    fn hadd(a: Self::Reg) -> T;

    /// Lane i holds `hadd(rows[i])`.
    #[inline(always)]
    fn haddp(rows: [Self::Reg; N]) -> Self::Reg {
        Self::from_array(std::array::from_fn(|i| Self::hadd(rows[i])))
    }

    #[inline(always)]
    fn sqrt(a: Self::Reg) -> Self::Reg
    where
        T: FloatElement,
    {
        Self::from_array(Self::to_array(a).map(T::lane_sqrt))
    }

    #[inline(always)]
    fn to_int(a: Self::Reg) -> [T::Int; N]
    where
        T: FloatElement,
    {
        Self::to_array(a).map(T::lane_to_int)
    }

    #[inline(always)]
    fn to_float(a: Self::Reg) -> [T::Float; N]
    where
        T: IntToFloat,
    {
        Self::to_array(a).map(T::lane_to_float)
    }

    /// Bit i of `bits` sets lane i; bits at or above `N` are ignored.
    fn mask_from_bitmask(bits: u64) -> Self::Mask;
    /// Bit i is set iff lane i is set.
    fn mask_to_bitmask(mask: Self::Mask) -> u64;

    #[inline(always)]
    fn mask_splat(value: bool) -> Self::Mask {
        Self::mask_from_bitmask(if value { lane_bits(N) } else { 0 })
    }

    #[inline(always)]
    fn mask_from_array(lanes: [bool; N]) -> Self::Mask {
        let mut bits = 0u64;
        for (i, &lane) in lanes.iter().enumerate() {
            bits |= (lane as u64) << i;
        }
        Self::mask_from_bitmask(bits)
    }

    #[inline(always)]
    fn mask_to_array(mask: Self::Mask) -> [bool; N] {
        let bits = Self::mask_to_bitmask(mask);
        std::array::from_fn(|i| (bits >> i) & 1 == 1)
    }

    #[inline(always)]
    fn mask_and(a: Self::Mask, b: Self::Mask) -> Self::Mask {
        Self::mask_from_bitmask(Self::mask_to_bitmask(a) & Self::mask_to_bitmask(b))
    }

    #[inline(always)]
    fn mask_or(a: Self::Mask, b: Self::Mask) -> Self::Mask {
        Self::mask_from_bitmask(Self::mask_to_bitmask(a) | Self::mask_to_bitmask(b))
    }

    #[inline(always)]
    fn mask_xor(a: Self::Mask, b: Self::Mask) -> Self::Mask {
        Self::mask_from_bitmask(Self::mask_to_bitmask(a) ^ Self::mask_to_bitmask(b))
    }

    #[inline(always)]
    fn mask_not(a: Self::Mask) -> Self::Mask {
        Self::mask_from_bitmask(!Self::mask_to_bitmask(a) & lane_bits(N))
    }

    /// `a & !b`.
    #[inline(always)]
    fn mask_andnot(a: Self::Mask, b: Self::Mask) -> Self::Mask {
        Self::mask_from_bitmask(Self::mask_to_bitmask(a) & !Self::mask_to_bitmask(b))
    }

    #[inline(always)]
    fn mask_eq(a: Self::Mask, b: Self::Mask) -> Self::Mask {
        Self::mask_not(Self::mask_xor(a, b))
    }

    #[inline(always)]
    fn mask_ne(a: Self::Mask, b: Self::Mask) -> Self::Mask {
        Self::mask_xor(a, b)
    }

    #[inline(always)]
    fn mask_all(mask: Self::Mask) -> bool {
        Self::mask_to_bitmask(mask) == lane_bits(N)
    }

    #[inline(always)]
    fn mask_any(mask: Self::Mask) -> bool {
        Self::mask_to_bitmask(mask) != 0
    }
}

/// Bitmask with the low `n` bits set.
#[inline(always)]
pub const fn lane_bits(n: usize) -> u64 {
    if n >= 64 {
        u64::MAX
    } else {
        (1u64 << n) - 1
    }
}

#[inline(always)]
pub(crate) fn zip_lanes<T: Copy, const N: usize>(a: [T; N], b: [T; N], f: impl Fn(T, T) -> T) -> [T; N] {
    std::array::from_fn(|i| f(a[i], b[i]))
}

#[inline(always)]
pub(crate) fn zip3_lanes<T: Copy, const N: usize>(
    a: [T; N],
    b: [T; N],
    c: [T; N],
    f: impl Fn(T, T, T) -> T,
) -> [T; N] {
    std::array::from_fn(|i| f(a[i], b[i], c[i]))
}

/// Horizontal sum in halving-tree order.
///
/// Lane `i` is added to lane `i + len / 2`, then the low half is reduced the
/// same way. For odd lengths the last lane is carried into the next round.
/// Native reductions split registers in halves, so they produce exactly this
/// order and float sums stay bit-identical across kernels.
pub fn pairwise_sum<T: Element, const N: usize>(lanes: [T; N]) -> T {
    if N == 0 {
        return T::ZERO;
    }
    let mut buf = lanes;
    let mut len = N;
    while len > 1 {
        let half = len / 2;
        for i in 0..half {
            buf[i] = buf[i].lane_add(buf[i + half]);
        }
        if len % 2 == 1 {
            buf[half] = buf[len - 1];
            len = half + 1;
        } else {
            len = half;
        }
    }
    buf[0]
}
