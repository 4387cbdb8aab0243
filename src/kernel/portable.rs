//! Portable kernels built on the `wide` crate.
//!
//! `wide` lowers to SSE/AVX/NEON/simd128 when the target allows and to plain
//! arrays otherwise, so these kernels compile everywhere. They rank just above
//! the array fallback.

use wide::*;

use crate::kernel::traits::{pairwise_sum, Kernel};
use crate::kernel::Portable;
use crate::types::Element;

macro_rules! portable_kernel {
    ($t:ty, $n:literal, $v:ident, $kind:ident) => {
        impl Kernel<$t, $n> for Portable {
            type Reg = $v;
            type Mask = $v;
            const ALIGNMENT: usize = std::mem::align_of::<$v>();

            #[inline(always)]
            fn splat(value: $t) -> $v {
                $v::splat(value)
            }

            #[inline(always)]
            fn from_array(lanes: [$t; $n]) -> $v {
                bytemuck::cast(lanes)
            }

            #[inline(always)]
            fn to_array(reg: $v) -> [$t; $n] {
                bytemuck::cast(reg)
            }

            #[inline(always)]
            unsafe fn load_aligned(ptr: *const $t) -> $v {
                ptr.cast::<$v>().read()
            }

            #[inline(always)]
            unsafe fn load_unaligned(ptr: *const $t) -> $v {
                ptr.cast::<$v>().read_unaligned()
            }

            #[inline(always)]
            unsafe fn store_aligned(reg: $v, ptr: *mut $t) {
                ptr.cast::<$v>().write(reg)
            }

            #[inline(always)]
            unsafe fn store_unaligned(reg: $v, ptr: *mut $t) {
                ptr.cast::<$v>().write_unaligned(reg)
            }

            #[inline(always)]
            fn add(a: $v, b: $v) -> $v {
                a + b
            }

            #[inline(always)]
            fn sub(a: $v, b: $v) -> $v {
                a - b
            }

            #[inline(always)]
            fn mul(a: $v, b: $v) -> $v {
                a * b
            }

            #[inline(always)]
            fn min(a: $v, b: $v) -> $v {
                a.cmp_lt(b).blend(a, b)
            }

            #[inline(always)]
            fn max(a: $v, b: $v) -> $v {
                a.cmp_gt(b).blend(a, b)
            }

            #[inline(always)]
            fn bitand(a: $v, b: $v) -> $v {
                a & b
            }

            #[inline(always)]
            fn bitor(a: $v, b: $v) -> $v {
                a | b
            }

            #[inline(always)]
            fn bitxor(a: $v, b: $v) -> $v {
                a ^ b
            }

            #[inline(always)]
            fn bitnot(a: $v) -> $v {
                a ^ $v::splat(<$t as Element>::all_ones())
            }

            #[inline(always)]
            fn andnot(a: $v, b: $v) -> $v {
                a & <Self as Kernel<$t, $n>>::bitnot(b)
            }

            #[inline(always)]
            fn eq(a: $v, b: $v) -> $v {
                a.cmp_eq(b)
            }

            #[inline(always)]
            fn ne(a: $v, b: $v) -> $v {
                <Self as Kernel<$t, $n>>::bitnot(a.cmp_eq(b))
            }

            #[inline(always)]
            fn lt(a: $v, b: $v) -> $v {
                a.cmp_lt(b)
            }

            #[inline(always)]
            fn gt(a: $v, b: $v) -> $v {
                a.cmp_gt(b)
            }

            #[inline(always)]
            fn select(mask: $v, a: $v, b: $v) -> $v {
                mask.blend(a, b)
            }

            #[inline(always)]
            fn hadd(a: $v) -> $t {
                pairwise_sum(<Self as Kernel<$t, $n>>::to_array(a))
            }

            #[inline(always)]
            fn mask_from_bitmask(bits: u64) -> $v {
                let ones = <$t as Element>::all_ones();
                <Self as Kernel<$t, $n>>::from_array(std::array::from_fn(|i| {
                    if (bits >> i) & 1 == 1 { ones } else { <$t as Element>::ZERO }
                }))
            }

            #[inline(always)]
            fn mask_to_bitmask(mask: $v) -> u64 {
                let mut bits = 0u64;
                for (i, lane) in <Self as Kernel<$t, $n>>::to_array(mask).into_iter().enumerate() {
                    bits |= (lane.is_set() as u64) << i;
                }
                bits
            }

            #[inline(always)]
            fn mask_and(a: $v, b: $v) -> $v {
                a & b
            }

            #[inline(always)]
            fn mask_or(a: $v, b: $v) -> $v {
                a | b
            }

            #[inline(always)]
            fn mask_xor(a: $v, b: $v) -> $v {
                a ^ b
            }

            #[inline(always)]
            fn mask_not(a: $v) -> $v {
                <Self as Kernel<$t, $n>>::bitnot(a)
            }

            #[inline(always)]
            fn mask_andnot(a: $v, b: $v) -> $v {
                <Self as Kernel<$t, $n>>::andnot(a, b)
            }

            portable_kernel!(@$kind $t, $n, $v);
        }
    };

    (@float $t:ty, $n:literal, $v:ident) => {
        #[inline(always)]
        fn div(a: $v, b: $v) -> $v {
            a / b
        }

        #[inline(always)]
        fn neg(a: $v) -> $v {
            a ^ $v::splat(-0.0)
        }

        #[inline(always)]
        fn abs(a: $v) -> $v {
            a & $v::splat(<$t>::from_bits(!(-0.0 as $t).to_bits()))
        }

        // Unordered lanes must compare false, so these are not `!gt` / `!lt`.
        #[inline(always)]
        fn le(a: $v, b: $v) -> $v {
            a.cmp_lt(b) | a.cmp_eq(b)
        }

        #[inline(always)]
        fn ge(a: $v, b: $v) -> $v {
            a.cmp_gt(b) | a.cmp_eq(b)
        }

        #[inline(always)]
        fn sqrt(a: $v) -> $v {
            a.sqrt()
        }
    };

    (@int $t:ty, $n:literal, $v:ident) => {
        #[inline(always)]
        fn neg(a: $v) -> $v {
            $v::splat(0) - a
        }

        #[inline(always)]
        fn abs(a: $v) -> $v {
            let zero = $v::splat(0);
            a.cmp_lt(zero).blend(zero - a, a)
        }

        #[inline(always)]
        fn le(a: $v, b: $v) -> $v {
            <Self as Kernel<$t, $n>>::bitnot(a.cmp_gt(b))
        }

        #[inline(always)]
        fn ge(a: $v, b: $v) -> $v {
            <Self as Kernel<$t, $n>>::bitnot(a.cmp_lt(b))
        }

        #[inline(always)]
        fn fma(a: $v, b: $v, c: $v) -> $v {
            a * b + c
        }

        #[inline(always)]
        fn fms(a: $v, b: $v, c: $v) -> $v {
            a * b - c
        }

        #[inline(always)]
        fn fnma(a: $v, b: $v, c: $v) -> $v {
            c - a * b
        }

        #[inline(always)]
        fn fnms(a: $v, b: $v, c: $v) -> $v {
            $v::splat(0) - a * b - c
        }
    };
}

portable_kernel!(f32, 4, f32x4, float);
portable_kernel!(f32, 8, f32x8, float);
portable_kernel!(f64, 2, f64x2, float);
portable_kernel!(f64, 4, f64x4, float);
portable_kernel!(i32, 4, i32x4, int);
portable_kernel!(i32, 8, i32x8, int);
portable_kernel!(i16, 8, i16x8, int);
