//! AVX2 kernel: `i32 x 8`.

use std::arch::x86_64::*;

use crate::config::BUILD;
use crate::kernel::traits::{zip_lanes, Kernel};
use crate::kernel::{Avx, Avx2, Sse2};
use crate::types::Element;

#[inline(always)]
unsafe fn ones_si256() -> __m256i {
    _mm256_set1_epi32(-1)
}

impl Kernel<i32, 8> for Avx2 {
    type Reg = __m256i;
    type Mask = __m256i;
    const ALIGNMENT: usize = 32;

    #[inline(always)]
    fn splat(value: i32) -> __m256i {
        unsafe { _mm256_set1_epi32(value) }
    }

    #[inline(always)]
    fn from_array(lanes: [i32; 8]) -> __m256i {
        unsafe { _mm256_loadu_si256(lanes.as_ptr().cast()) }
    }

    #[inline(always)]
    fn to_array(reg: __m256i) -> [i32; 8] {
        let mut out = [0i32; 8];
        unsafe { _mm256_storeu_si256(out.as_mut_ptr().cast(), reg) };
        out
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const i32) -> __m256i {
        _mm256_load_si256(ptr.cast())
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const i32) -> __m256i {
        _mm256_loadu_si256(ptr.cast())
    }

    #[inline(always)]
    unsafe fn store_aligned(reg: __m256i, ptr: *mut i32) {
        _mm256_store_si256(ptr.cast(), reg)
    }

    #[inline(always)]
    unsafe fn store_unaligned(reg: __m256i, ptr: *mut i32) {
        _mm256_storeu_si256(ptr.cast(), reg)
    }

    #[inline(always)]
    fn add(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_add_epi32(a, b) }
    }

    #[inline(always)]
    fn sub(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_sub_epi32(a, b) }
    }

    #[inline(always)]
    fn mul(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_mullo_epi32(a, b) }
    }

    #[inline(always)]
    fn div(a: __m256i, b: __m256i) -> __m256i {
        if BUILD.fast_int_division() {
            let q = unsafe { _mm256_div_ps(_mm256_cvtepi32_ps(a), _mm256_cvtepi32_ps(b)) };
            return <Self as Kernel<i32, 8>>::from_array(<Avx as Kernel<f32, 8>>::to_int(q));
        }
        let (a, b) = (<Self as Kernel<i32, 8>>::to_array(a), <Self as Kernel<i32, 8>>::to_array(b));
        <Self as Kernel<i32, 8>>::from_array(zip_lanes(a, b, i32::lane_div))
    }

    #[inline(always)]
    fn neg(a: __m256i) -> __m256i {
        unsafe { _mm256_sub_epi32(_mm256_setzero_si256(), a) }
    }

    #[inline(always)]
    fn min(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_min_epi32(a, b) }
    }

    #[inline(always)]
    fn max(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_max_epi32(a, b) }
    }

    #[inline(always)]
    fn abs(a: __m256i) -> __m256i {
        unsafe { _mm256_abs_epi32(a) }
    }

    #[inline(always)]
    fn fma(a: __m256i, b: __m256i, c: __m256i) -> __m256i {
        unsafe { _mm256_add_epi32(_mm256_mullo_epi32(a, b), c) }
    }

    #[inline(always)]
    fn fms(a: __m256i, b: __m256i, c: __m256i) -> __m256i {
        unsafe { _mm256_sub_epi32(_mm256_mullo_epi32(a, b), c) }
    }

    #[inline(always)]
    fn fnma(a: __m256i, b: __m256i, c: __m256i) -> __m256i {
        unsafe { _mm256_sub_epi32(c, _mm256_mullo_epi32(a, b)) }
    }

    #[inline(always)]
    fn fnms(a: __m256i, b: __m256i, c: __m256i) -> __m256i {
        unsafe {
            let product = _mm256_mullo_epi32(a, b);
            _mm256_sub_epi32(_mm256_sub_epi32(_mm256_setzero_si256(), product), c)
        }
    }

    #[inline(always)]
    fn bitand(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_and_si256(a, b) }
    }

    #[inline(always)]
    fn bitor(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_or_si256(a, b) }
    }

    #[inline(always)]
    fn bitxor(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_xor_si256(a, b) }
    }

    #[inline(always)]
    fn bitnot(a: __m256i) -> __m256i {
        unsafe { _mm256_xor_si256(a, ones_si256()) }
    }

    #[inline(always)]
    fn andnot(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_andnot_si256(b, a) }
    }

    #[inline(always)]
    fn eq(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_cmpeq_epi32(a, b) }
    }

    #[inline(always)]
    fn ne(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_xor_si256(_mm256_cmpeq_epi32(a, b), ones_si256()) }
    }

    #[inline(always)]
    fn lt(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_cmpgt_epi32(b, a) }
    }

    #[inline(always)]
    fn le(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_xor_si256(_mm256_cmpgt_epi32(a, b), ones_si256()) }
    }

    #[inline(always)]
    fn gt(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_cmpgt_epi32(a, b) }
    }

    #[inline(always)]
    fn ge(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_xor_si256(_mm256_cmpgt_epi32(b, a), ones_si256()) }
    }

    #[inline(always)]
    fn select(mask: __m256i, a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_blendv_epi8(b, a, mask) }
    }

    #[inline(always)]
    fn hadd(a: __m256i) -> i32 {
        let folded = unsafe {
            _mm_add_epi32(_mm256_castsi256_si128(a), _mm256_extracti128_si256(a, 1))
        };
        <Sse2 as Kernel<i32, 4>>::hadd(folded)
    }

    #[inline(always)]
    fn to_float(a: __m256i) -> [f32; 8] {
        <Avx as Kernel<f32, 8>>::to_array(unsafe { _mm256_cvtepi32_ps(a) })
    }

    #[inline(always)]
    fn mask_from_bitmask(bits: u64) -> __m256i {
        unsafe {
            let lanes = _mm256_setr_epi32(1, 2, 4, 8, 16, 32, 64, 128);
            let v = _mm256_set1_epi32(bits as i32);
            _mm256_cmpeq_epi32(_mm256_and_si256(v, lanes), lanes)
        }
    }

    #[inline(always)]
    fn mask_to_bitmask(mask: __m256i) -> u64 {
        unsafe { _mm256_movemask_ps(_mm256_castsi256_ps(mask)) as u64 }
    }

    #[inline(always)]
    fn mask_and(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_and_si256(a, b) }
    }

    #[inline(always)]
    fn mask_or(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_or_si256(a, b) }
    }

    #[inline(always)]
    fn mask_xor(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_xor_si256(a, b) }
    }

    #[inline(always)]
    fn mask_not(a: __m256i) -> __m256i {
        unsafe { _mm256_xor_si256(a, ones_si256()) }
    }

    #[inline(always)]
    fn mask_andnot(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_andnot_si256(b, a) }
    }

    #[inline(always)]
    fn mask_all(mask: __m256i) -> bool {
        unsafe { _mm256_movemask_ps(_mm256_castsi256_ps(mask)) == 0xff }
    }

    #[inline(always)]
    fn mask_any(mask: __m256i) -> bool {
        unsafe { _mm256_testz_si256(mask, mask) == 0 }
    }
}
