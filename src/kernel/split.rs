//! Wide kernels synthesized from two half-width registers.
//!
//! `Split<K, H>` implements `Kernel<T, 2 * H>` for any `K: Kernel<T, H>`. Every
//! operation runs on the low and high halves independently; reductions first
//! add the halves lane-wise, which keeps the halving-tree order of
//! [`pairwise_sum`](crate::kernel::traits::pairwise_sum). Splits nest, so
//! `Split<Split<Sse2, 4>, 8>` yields sixteen `f32` lanes from SSE2 registers.

use std::marker::PhantomData;

use crate::config::Extension;
use crate::kernel::traits::{lane_bits, Kernel, Strategy};
use crate::types::{Element, FloatElement, IntToFloat};

/// Kernel that covers `2 * H` lanes with two `H`-lane registers of `K`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Split<K, const H: usize>(PhantomData<K>);

impl<K: Strategy, const H: usize> Strategy for Split<K, H> {
    const EXTENSION: Extension = K::EXTENSION;
}

struct Halves<const H: usize, const N: usize>;

impl<const H: usize, const N: usize> Halves<H, N> {
    const CHECK: () = assert!(H > 0 && N == 2 * H, "split kernels need exactly two halves");
}

#[inline(always)]
fn join<T: Copy, const H: usize, const N: usize>(lo: [T; H], hi: [T; H]) -> [T; N] {
    std::array::from_fn(|i| if i < H { lo[i] } else { hi[i - H] })
}

impl<T, K, const H: usize, const N: usize> Kernel<T, N> for Split<K, H>
where
    T: Element,
    K: Kernel<T, H>,
{
    type Reg = [K::Reg; 2];
    type Mask = [K::Mask; 2];
    const ALIGNMENT: usize = K::ALIGNMENT;

    #[inline(always)]
    fn splat(value: T) -> Self::Reg {
        let () = Halves::<H, N>::CHECK;
        let half = K::splat(value);
        [half, half]
    }

    #[inline(always)]
    fn from_array(lanes: [T; N]) -> Self::Reg {
        let () = Halves::<H, N>::CHECK;
        [
            K::from_array(std::array::from_fn(|i| lanes[i])),
            K::from_array(std::array::from_fn(|i| lanes[H + i])),
        ]
    }

    #[inline(always)]
    fn to_array(reg: Self::Reg) -> [T; N] {
        join(K::to_array(reg[0]), K::to_array(reg[1]))
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const T) -> Self::Reg {
        let () = Halves::<H, N>::CHECK;
        [K::load_aligned(ptr), K::load_aligned(ptr.add(H))]
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const T) -> Self::Reg {
        let () = Halves::<H, N>::CHECK;
        [K::load_unaligned(ptr), K::load_unaligned(ptr.add(H))]
    }

    #[inline(always)]
    unsafe fn store_aligned(reg: Self::Reg, ptr: *mut T) {
        K::store_aligned(reg[0], ptr);
        K::store_aligned(reg[1], ptr.add(H));
    }

    #[inline(always)]
    unsafe fn store_unaligned(reg: Self::Reg, ptr: *mut T) {
        K::store_unaligned(reg[0], ptr);
        K::store_unaligned(reg[1], ptr.add(H));
    }

    #[inline(always)]
    fn add(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        [K::add(a[0], b[0]), K::add(a[1], b[1])]
    }

    #[inline(always)]
    fn sub(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        [K::sub(a[0], b[0]), K::sub(a[1], b[1])]
    }

    #[inline(always)]
    fn mul(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        [K::mul(a[0], b[0]), K::mul(a[1], b[1])]
    }

    #[inline(always)]
    fn div(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        [K::div(a[0], b[0]), K::div(a[1], b[1])]
    }

    #[inline(always)]
    fn rem(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        [K::rem(a[0], b[0]), K::rem(a[1], b[1])]
    }

    #[inline(always)]
    fn neg(a: Self::Reg) -> Self::Reg {
        [K::neg(a[0]), K::neg(a[1])]
    }

    #[inline(always)]
    fn min(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        [K::min(a[0], b[0]), K::min(a[1], b[1])]
    }

    #[inline(always)]
    fn max(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        [K::max(a[0], b[0]), K::max(a[1], b[1])]
    }

    #[inline(always)]
    fn abs(a: Self::Reg) -> Self::Reg {
        [K::abs(a[0]), K::abs(a[1])]
    }

    #[inline(always)]
    fn fma(a: Self::Reg, b: Self::Reg, c: Self::Reg) -> Self::Reg {
        [K::fma(a[0], b[0], c[0]), K::fma(a[1], b[1], c[1])]
    }

    #[inline(always)]
    fn fms(a: Self::Reg, b: Self::Reg, c: Self::Reg) -> Self::Reg {
        [K::fms(a[0], b[0], c[0]), K::fms(a[1], b[1], c[1])]
    }

    #[inline(always)]
    fn fnma(a: Self::Reg, b: Self::Reg, c: Self::Reg) -> Self::Reg {
        [K::fnma(a[0], b[0], c[0]), K::fnma(a[1], b[1], c[1])]
    }

    #[inline(always)]
    fn fnms(a: Self::Reg, b: Self::Reg, c: Self::Reg) -> Self::Reg {
        [K::fnms(a[0], b[0], c[0]), K::fnms(a[1], b[1], c[1])]
    }

    #[inline(always)]
    fn bitand(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        [K::bitand(a[0], b[0]), K::bitand(a[1], b[1])]
    }

    #[inline(always)]
    fn bitor(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        [K::bitor(a[0], b[0]), K::bitor(a[1], b[1])]
    }

    #[inline(always)]
    fn bitxor(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        [K::bitxor(a[0], b[0]), K::bitxor(a[1], b[1])]
    }

    #[inline(always)]
    fn bitnot(a: Self::Reg) -> Self::Reg {
        [K::bitnot(a[0]), K::bitnot(a[1])]
    }

    #[inline(always)]
    fn andnot(a: Self::Reg, b: Self::Reg) -> Self::Reg {
        [K::andnot(a[0], b[0]), K::andnot(a[1], b[1])]
    }

    #[inline(always)]
    fn eq(a: Self::Reg, b: Self::Reg) -> Self::Mask {
        [K::eq(a[0], b[0]), K::eq(a[1], b[1])]
    }

    #[inline(always)]
    fn ne(a: Self::Reg, b: Self::Reg) -> Self::Mask {
        [K::ne(a[0], b[0]), K::ne(a[1], b[1])]
    }

    #[inline(always)]
    fn lt(a: Self::Reg, b: Self::Reg) -> Self::Mask {
        [K::lt(a[0], b[0]), K::lt(a[1], b[1])]
    }

    #[inline(always)]
    fn le(a: Self::Reg, b: Self::Reg) -> Self::Mask {
        [K::le(a[0], b[0]), K::le(a[1], b[1])]
    }

    #[inline(always)]
    fn gt(a: Self::Reg, b: Self::Reg) -> Self::Mask {
        [K::gt(a[0], b[0]), K::gt(a[1], b[1])]
    }

    #[inline(always)]
    fn ge(a: Self::Reg, b: Self::Reg) -> Self::Mask {
        [K::ge(a[0], b[0]), K::ge(a[1], b[1])]
    }

    #[inline(always)]
    fn select(mask: Self::Mask, a: Self::Reg, b: Self::Reg) -> Self::Reg {
        [K::select(mask[0], a[0], b[0]), K::select(mask[1], a[1], b[1])]
    }

    #[inline(always)]
    fn hadd(a: Self::Reg) -> T {
        K::hadd(K::add(a[0], a[1]))
    }

    #[inline(always)]
    fn sqrt(a: Self::Reg) -> Self::Reg
    where
        T: FloatElement,
    {
        [K::sqrt(a[0]), K::sqrt(a[1])]
    }

    #[inline(always)]
    fn to_int(a: Self::Reg) -> [T::Int; N]
    where
        T: FloatElement,
    {
        join(K::to_int(a[0]), K::to_int(a[1]))
    }

    #[inline(always)]
    fn to_float(a: Self::Reg) -> [T::Float; N]
    where
        T: IntToFloat,
    {
        join(K::to_float(a[0]), K::to_float(a[1]))
    }

    #[inline(always)]
    fn mask_from_bitmask(bits: u64) -> Self::Mask {
        let () = Halves::<H, N>::CHECK;
        let hi = if H >= 64 { 0 } else { bits >> H };
        [K::mask_from_bitmask(bits & lane_bits(H)), K::mask_from_bitmask(hi)]
    }

    #[inline(always)]
    fn mask_to_bitmask(mask: Self::Mask) -> u64 {
        let lo = K::mask_to_bitmask(mask[0]);
        let hi = K::mask_to_bitmask(mask[1]);
        if H >= 64 {
            lo
        } else {
            lo | (hi << H)
        }
    }

    #[inline(always)]
    fn mask_splat(value: bool) -> Self::Mask {
        let () = Halves::<H, N>::CHECK;
        let half = K::mask_splat(value);
        [half, half]
    }

    #[inline(always)]
    fn mask_and(a: Self::Mask, b: Self::Mask) -> Self::Mask {
        [K::mask_and(a[0], b[0]), K::mask_and(a[1], b[1])]
    }

    #[inline(always)]
    fn mask_or(a: Self::Mask, b: Self::Mask) -> Self::Mask {
        [K::mask_or(a[0], b[0]), K::mask_or(a[1], b[1])]
    }

    #[inline(always)]
    fn mask_xor(a: Self::Mask, b: Self::Mask) -> Self::Mask {
        [K::mask_xor(a[0], b[0]), K::mask_xor(a[1], b[1])]
    }

    #[inline(always)]
    fn mask_not(a: Self::Mask) -> Self::Mask {
        [K::mask_not(a[0]), K::mask_not(a[1])]
    }

    #[inline(always)]
    fn mask_andnot(a: Self::Mask, b: Self::Mask) -> Self::Mask {
        [K::mask_andnot(a[0], b[0]), K::mask_andnot(a[1], b[1])]
    }

    #[inline(always)]
    fn mask_all(mask: Self::Mask) -> bool {
        K::mask_all(mask[0]) && K::mask_all(mask[1])
    }

    #[inline(always)]
    fn mask_any(mask: Self::Mask) -> bool {
        K::mask_any(mask[0]) || K::mask_any(mask[1])
    }
}
