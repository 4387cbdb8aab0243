//! Array-backed kernel usable for every element type and lane count.
//!
//! This is the reference semantics: each operation is a per-lane loop over
//! the [`Element`] methods.

use std::marker::PhantomData;

use crate::config::BUILD;
use crate::kernel::traits::{pairwise_sum, zip_lanes, Kernel};
use crate::kernel::Fallback;
use crate::types::Element;

/// Compile-time gate that rejects use of the fallback when the build disabled it.
struct FallbackGate<T, const N: usize>(PhantomData<T>);

impl<T, const N: usize> FallbackGate<T, N> {
    const OPEN: () = assert!(
        BUILD.fallback,
        "no native kernel covers this element type and lane count, and the fallback kernel is disabled (feature `native-only`)"
    );
}

impl<T: Element, const N: usize> Kernel<T, N> for Fallback {
    type Reg = [T; N];
    type Mask = [bool; N];
    const ALIGNMENT: usize = std::mem::align_of::<T>();

    #[inline(always)]
    fn splat(value: T) -> [T; N] {
        let () = FallbackGate::<T, N>::OPEN;
        [value; N]
    }

    #[inline(always)]
    fn from_array(lanes: [T; N]) -> [T; N] {
        let () = FallbackGate::<T, N>::OPEN;
        lanes
    }

    #[inline(always)]
    fn to_array(reg: [T; N]) -> [T; N] {
        reg
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const T) -> [T; N] {
        let () = FallbackGate::<T, N>::OPEN;
        ptr.cast::<[T; N]>().read()
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const T) -> [T; N] {
        let () = FallbackGate::<T, N>::OPEN;
        ptr.cast::<[T; N]>().read_unaligned()
    }

    #[inline(always)]
    unsafe fn store_aligned(reg: [T; N], ptr: *mut T) {
        ptr.cast::<[T; N]>().write(reg)
    }

    #[inline(always)]
    unsafe fn store_unaligned(reg: [T; N], ptr: *mut T) {
        ptr.cast::<[T; N]>().write_unaligned(reg)
    }

    #[inline(always)]
    fn add(a: [T; N], b: [T; N]) -> [T; N] {
        zip_lanes(a, b, T::lane_add)
    }

    #[inline(always)]
    fn sub(a: [T; N], b: [T; N]) -> [T; N] {
        zip_lanes(a, b, T::lane_sub)
    }

    #[inline(always)]
    fn mul(a: [T; N], b: [T; N]) -> [T; N] {
        zip_lanes(a, b, T::lane_mul)
    }

    #[inline(always)]
    fn neg(a: [T; N]) -> [T; N] {
        a.map(T::lane_neg)
    }

    #[inline(always)]
    fn min(a: [T; N], b: [T; N]) -> [T; N] {
        zip_lanes(a, b, T::lane_min)
    }

    #[inline(always)]
    fn max(a: [T; N], b: [T; N]) -> [T; N] {
        zip_lanes(a, b, T::lane_max)
    }

    #[inline(always)]
    fn abs(a: [T; N]) -> [T; N] {
        a.map(T::lane_abs)
    }

    #[inline(always)]
    fn bitand(a: [T; N], b: [T; N]) -> [T; N] {
        zip_lanes(a, b, T::lane_and)
    }

    #[inline(always)]
    fn bitor(a: [T; N], b: [T; N]) -> [T; N] {
        zip_lanes(a, b, T::lane_or)
    }

    #[inline(always)]
    fn bitxor(a: [T; N], b: [T; N]) -> [T; N] {
        zip_lanes(a, b, T::lane_xor)
    }

    #[inline(always)]
    fn bitnot(a: [T; N]) -> [T; N] {
        a.map(T::lane_not)
    }

    #[inline(always)]
    fn andnot(a: [T; N], b: [T; N]) -> [T; N] {
        zip_lanes(a, b, |x, y| x.lane_and(y.lane_not()))
    }

    #[inline(always)]
    fn eq(a: [T; N], b: [T; N]) -> [bool; N] {
        std::array::from_fn(|i| a[i] == b[i])
    }

    #[inline(always)]
    fn ne(a: [T; N], b: [T; N]) -> [bool; N] {
        std::array::from_fn(|i| a[i] != b[i])
    }

    #[inline(always)]
    fn lt(a: [T; N], b: [T; N]) -> [bool; N] {
        std::array::from_fn(|i| a[i] < b[i])
    }

    #[inline(always)]
    fn le(a: [T; N], b: [T; N]) -> [bool; N] {
        std::array::from_fn(|i| a[i] <= b[i])
    }

    #[inline(always)]
    fn gt(a: [T; N], b: [T; N]) -> [bool; N] {
        std::array::from_fn(|i| a[i] > b[i])
    }

    #[inline(always)]
    fn ge(a: [T; N], b: [T; N]) -> [bool; N] {
        std::array::from_fn(|i| a[i] >= b[i])
    }

    #[inline(always)]
    fn select(mask: [bool; N], a: [T; N], b: [T; N]) -> [T; N] {
        std::array::from_fn(|i| if mask[i] { a[i] } else { b[i] })
    }

    #[inline(always)]
    fn hadd(a: [T; N]) -> T {
        pairwise_sum(a)
    }

    #[inline(always)]
    fn mask_from_bitmask(bits: u64) -> [bool; N] {
        let () = FallbackGate::<T, N>::OPEN;
        std::array::from_fn(|i| i < 64 && (bits >> i) & 1 == 1)
    }

    #[inline(always)]
    fn mask_to_bitmask(mask: [bool; N]) -> u64 {
        let mut bits = 0u64;
        for (i, &lane) in mask.iter().enumerate().take(64) {
            bits |= (lane as u64) << i;
        }
        bits
    }

    #[inline(always)]
    fn mask_splat(value: bool) -> [bool; N] {
        let () = FallbackGate::<T, N>::OPEN;
        [value; N]
    }

    #[inline(always)]
    fn mask_from_array(lanes: [bool; N]) -> [bool; N] {
        let () = FallbackGate::<T, N>::OPEN;
        lanes
    }

    #[inline(always)]
    fn mask_to_array(mask: [bool; N]) -> [bool; N] {
        mask
    }

    #[inline(always)]
    fn mask_and(a: [bool; N], b: [bool; N]) -> [bool; N] {
        std::array::from_fn(|i| a[i] & b[i])
    }

    #[inline(always)]
    fn mask_or(a: [bool; N], b: [bool; N]) -> [bool; N] {
        std::array::from_fn(|i| a[i] | b[i])
    }

    #[inline(always)]
    fn mask_xor(a: [bool; N], b: [bool; N]) -> [bool; N] {
        std::array::from_fn(|i| a[i] ^ b[i])
    }

    #[inline(always)]
    fn mask_not(a: [bool; N]) -> [bool; N] {
        a.map(|lane| !lane)
    }

    #[inline(always)]
    fn mask_andnot(a: [bool; N], b: [bool; N]) -> [bool; N] {
        std::array::from_fn(|i| a[i] & !b[i])
    }

    #[inline(always)]
    fn mask_all(mask: [bool; N]) -> bool {
        mask.iter().all(|&lane| lane)
    }

    #[inline(always)]
    fn mask_any(mask: [bool; N]) -> bool {
        mask.iter().any(|&lane| lane)
    }
}
