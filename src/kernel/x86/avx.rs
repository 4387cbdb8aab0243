//! AVX kernels: `f32 x 8`, `f64 x 4`.
//!
//! AVX has no 256-bit integer instructions, so bitmask expansion goes through
//! memory and integer lanes are handled by AVX2 or by splitting SSE2.

use std::arch::x86_64::*;

use crate::kernel::traits::Kernel;
use crate::kernel::{Avx, Sse2};

#[inline(always)]
unsafe fn ones_ps() -> __m256 {
    _mm256_castsi256_ps(_mm256_set1_epi32(-1))
}

#[inline(always)]
unsafe fn ones_pd() -> __m256d {
    _mm256_castsi256_pd(_mm256_set1_epi32(-1))
}

// ============================================================================
// f32 x 8
// ============================================================================

impl Kernel<f32, 8> for Avx {
    type Reg = __m256;
    type Mask = __m256;
    const ALIGNMENT: usize = 32;

    #[inline(always)]
    fn splat(value: f32) -> __m256 {
        unsafe { _mm256_set1_ps(value) }
    }

    #[inline(always)]
    fn from_array(lanes: [f32; 8]) -> __m256 {
        unsafe { _mm256_loadu_ps(lanes.as_ptr()) }
    }

    #[inline(always)]
    fn to_array(reg: __m256) -> [f32; 8] {
        let mut out = [0.0f32; 8];
        unsafe { _mm256_storeu_ps(out.as_mut_ptr(), reg) };
        out
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> __m256 {
        _mm256_load_ps(ptr)
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const f32) -> __m256 {
        _mm256_loadu_ps(ptr)
    }

    #[inline(always)]
    unsafe fn store_aligned(reg: __m256, ptr: *mut f32) {
        _mm256_store_ps(ptr, reg)
    }

    #[inline(always)]
    unsafe fn store_unaligned(reg: __m256, ptr: *mut f32) {
        _mm256_storeu_ps(ptr, reg)
    }

    #[inline(always)]
    fn add(a: __m256, b: __m256) -> __m256 {
        unsafe { _mm256_add_ps(a, b) }
    }

    #[inline(always)]
    fn sub(a: __m256, b: __m256) -> __m256 {
        unsafe { _mm256_sub_ps(a, b) }
    }

    #[inline(always)]
    fn mul(a: __m256, b: __m256) -> __m256 {
        unsafe { _mm256_mul_ps(a, b) }
    }

    #[inline(always)]
    fn div(a: __m256, b: __m256) -> __m256 {
        unsafe { _mm256_div_ps(a, b) }
    }

    #[inline(always)]
    fn neg(a: __m256) -> __m256 {
        unsafe { _mm256_xor_ps(a, _mm256_set1_ps(-0.0)) }
    }

    #[inline(always)]
    fn min(a: __m256, b: __m256) -> __m256 {
        unsafe { _mm256_min_ps(a, b) }
    }

    #[inline(always)]
    fn max(a: __m256, b: __m256) -> __m256 {
        unsafe { _mm256_max_ps(a, b) }
    }

    #[inline(always)]
    fn abs(a: __m256) -> __m256 {
        unsafe { _mm256_andnot_ps(_mm256_set1_ps(-0.0), a) }
    }

    #[cfg(target_feature = "fma")]
    #[inline(always)]
    fn fma(a: __m256, b: __m256, c: __m256) -> __m256 {
        unsafe { _mm256_fmadd_ps(a, b, c) }
    }

    #[cfg(target_feature = "fma")]
    #[inline(always)]
    fn fms(a: __m256, b: __m256, c: __m256) -> __m256 {
        unsafe { _mm256_fmsub_ps(a, b, c) }
    }

    #[cfg(target_feature = "fma")]
    #[inline(always)]
    fn fnma(a: __m256, b: __m256, c: __m256) -> __m256 {
        unsafe { _mm256_fnmadd_ps(a, b, c) }
    }

    #[cfg(target_feature = "fma")]
    #[inline(always)]
    fn fnms(a: __m256, b: __m256, c: __m256) -> __m256 {
        unsafe { _mm256_fnmsub_ps(a, b, c) }
    }

    #[inline(always)]
    fn bitand(a: __m256, b: __m256) -> __m256 {
        unsafe { _mm256_and_ps(a, b) }
    }

    #[inline(always)]
    fn bitor(a: __m256, b: __m256) -> __m256 {
        unsafe { _mm256_or_ps(a, b) }
    }

    #[inline(always)]
    fn bitxor(a: __m256, b: __m256) -> __m256 {
        unsafe { _mm256_xor_ps(a, b) }
    }

    #[inline(always)]
    fn bitnot(a: __m256) -> __m256 {
        unsafe { _mm256_xor_ps(a, ones_ps()) }
    }

    #[inline(always)]
    fn andnot(a: __m256, b: __m256) -> __m256 {
        unsafe { _mm256_andnot_ps(b, a) }
    }

    #[inline(always)]
    fn eq(a: __m256, b: __m256) -> __m256 {
        unsafe { _mm256_cmp_ps(a, b, _CMP_EQ_OQ) }
    }

    #[inline(always)]
    fn ne(a: __m256, b: __m256) -> __m256 {
        unsafe { _mm256_cmp_ps(a, b, _CMP_NEQ_UQ) }
    }

    #[inline(always)]
    fn lt(a: __m256, b: __m256) -> __m256 {
        unsafe { _mm256_cmp_ps(a, b, _CMP_LT_OQ) }
    }

    #[inline(always)]
    fn le(a: __m256, b: __m256) -> __m256 {
        unsafe { _mm256_cmp_ps(a, b, _CMP_LE_OQ) }
    }

    #[inline(always)]
    fn gt(a: __m256, b: __m256) -> __m256 {
        unsafe { _mm256_cmp_ps(a, b, _CMP_GT_OQ) }
    }

    #[inline(always)]
    fn ge(a: __m256, b: __m256) -> __m256 {
        unsafe { _mm256_cmp_ps(a, b, _CMP_GE_OQ) }
    }

    #[inline(always)]
    fn select(mask: __m256, a: __m256, b: __m256) -> __m256 {
        unsafe { _mm256_blendv_ps(b, a, mask) }
    }

    #[inline(always)]
    fn hadd(a: __m256) -> f32 {
        let folded = unsafe { _mm_add_ps(_mm256_castps256_ps128(a), _mm256_extractf128_ps(a, 1)) };
        <Sse2 as Kernel<f32, 4>>::hadd(folded)
    }

    #[inline(always)]
    fn sqrt(a: __m256) -> __m256 {
        unsafe { _mm256_sqrt_ps(a) }
    }

    #[inline(always)]
    fn to_int(a: __m256) -> [i32; 8] {
        let mut out = [0i32; 8];
        unsafe {
            // Same fix-up as SSE2, done with float logic since AVX lacks 256-bit integer ops.
            let truncated = _mm256_castsi256_ps(_mm256_cvttps_epi32(a));
            let overflow = _mm256_cmp_ps(a, _mm256_set1_ps(2_147_483_648.0), _CMP_GE_OQ);
            let ordered = _mm256_cmp_ps(a, a, _CMP_ORD_Q);
            let fixed = _mm256_and_ps(_mm256_xor_ps(truncated, overflow), ordered);
            _mm256_storeu_si256(out.as_mut_ptr().cast(), _mm256_castps_si256(fixed));
        }
        out
    }

    #[inline(always)]
    fn mask_from_bitmask(bits: u64) -> __m256 {
        let lanes: [i32; 8] = std::array::from_fn(|i| -(((bits >> i) & 1) as i32));
        unsafe { _mm256_castsi256_ps(_mm256_loadu_si256(lanes.as_ptr().cast())) }
    }

    #[inline(always)]
    fn mask_to_bitmask(mask: __m256) -> u64 {
        unsafe { _mm256_movemask_ps(mask) as u64 }
    }

    #[inline(always)]
    fn mask_and(a: __m256, b: __m256) -> __m256 {
        unsafe { _mm256_and_ps(a, b) }
    }

    #[inline(always)]
    fn mask_or(a: __m256, b: __m256) -> __m256 {
        unsafe { _mm256_or_ps(a, b) }
    }

    #[inline(always)]
    fn mask_xor(a: __m256, b: __m256) -> __m256 {
        unsafe { _mm256_xor_ps(a, b) }
    }

    #[inline(always)]
    fn mask_not(a: __m256) -> __m256 {
        unsafe { _mm256_xor_ps(a, ones_ps()) }
    }

    #[inline(always)]
    fn mask_andnot(a: __m256, b: __m256) -> __m256 {
        unsafe { _mm256_andnot_ps(b, a) }
    }

    #[inline(always)]
    fn mask_all(mask: __m256) -> bool {
        unsafe { _mm256_movemask_ps(mask) == 0xff }
    }

    #[inline(always)]
    fn mask_any(mask: __m256) -> bool {
        unsafe { _mm256_movemask_ps(mask) != 0 }
    }
}

// ============================================================================
// f64 x 4
// ============================================================================

impl Kernel<f64, 4> for Avx {
    type Reg = __m256d;
    type Mask = __m256d;
    const ALIGNMENT: usize = 32;

    #[inline(always)]
    fn splat(value: f64) -> __m256d {
        unsafe { _mm256_set1_pd(value) }
    }

    #[inline(always)]
    fn from_array(lanes: [f64; 4]) -> __m256d {
        unsafe { _mm256_loadu_pd(lanes.as_ptr()) }
    }

    #[inline(always)]
    fn to_array(reg: __m256d) -> [f64; 4] {
        let mut out = [0.0f64; 4];
        unsafe { _mm256_storeu_pd(out.as_mut_ptr(), reg) };
        out
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f64) -> __m256d {
        _mm256_load_pd(ptr)
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const f64) -> __m256d {
        _mm256_loadu_pd(ptr)
    }

    #[inline(always)]
    unsafe fn store_aligned(reg: __m256d, ptr: *mut f64) {
        _mm256_store_pd(ptr, reg)
    }

    #[inline(always)]
    unsafe fn store_unaligned(reg: __m256d, ptr: *mut f64) {
        _mm256_storeu_pd(ptr, reg)
    }

    #[inline(always)]
    fn add(a: __m256d, b: __m256d) -> __m256d {
        unsafe { _mm256_add_pd(a, b) }
    }

    #[inline(always)]
    fn sub(a: __m256d, b: __m256d) -> __m256d {
        unsafe { _mm256_sub_pd(a, b) }
    }

    #[inline(always)]
    fn mul(a: __m256d, b: __m256d) -> __m256d {
        unsafe { _mm256_mul_pd(a, b) }
    }

    #[inline(always)]
    fn div(a: __m256d, b: __m256d) -> __m256d {
        unsafe { _mm256_div_pd(a, b) }
    }

    #[inline(always)]
    fn neg(a: __m256d) -> __m256d {
        unsafe { _mm256_xor_pd(a, _mm256_set1_pd(-0.0)) }
    }

    #[inline(always)]
    fn min(a: __m256d, b: __m256d) -> __m256d {
        unsafe { _mm256_min_pd(a, b) }
    }

    #[inline(always)]
    fn max(a: __m256d, b: __m256d) -> __m256d {
        unsafe { _mm256_max_pd(a, b) }
    }

    #[inline(always)]
    fn abs(a: __m256d) -> __m256d {
        unsafe { _mm256_andnot_pd(_mm256_set1_pd(-0.0), a) }
    }

    #[cfg(target_feature = "fma")]
    #[inline(always)]
    fn fma(a: __m256d, b: __m256d, c: __m256d) -> __m256d {
        unsafe { _mm256_fmadd_pd(a, b, c) }
    }

    #[cfg(target_feature = "fma")]
    #[inline(always)]
    fn fms(a: __m256d, b: __m256d, c: __m256d) -> __m256d {
        unsafe { _mm256_fmsub_pd(a, b, c) }
    }

    #[cfg(target_feature = "fma")]
    #[inline(always)]
    fn fnma(a: __m256d, b: __m256d, c: __m256d) -> __m256d {
        unsafe { _mm256_fnmadd_pd(a, b, c) }
    }

    #[cfg(target_feature = "fma")]
    #[inline(always)]
    fn fnms(a: __m256d, b: __m256d, c: __m256d) -> __m256d {
        unsafe { _mm256_fnmsub_pd(a, b, c) }
    }

    #[inline(always)]
    fn bitand(a: __m256d, b: __m256d) -> __m256d {
        unsafe { _mm256_and_pd(a, b) }
    }

    #[inline(always)]
    fn bitor(a: __m256d, b: __m256d) -> __m256d {
        unsafe { _mm256_or_pd(a, b) }
    }

    #[inline(always)]
    fn bitxor(a: __m256d, b: __m256d) -> __m256d {
        unsafe { _mm256_xor_pd(a, b) }
    }

    #[inline(always)]
    fn bitnot(a: __m256d) -> __m256d {
        unsafe { _mm256_xor_pd(a, ones_pd()) }
    }

    #[inline(always)]
    fn andnot(a: __m256d, b: __m256d) -> __m256d {
        unsafe { _mm256_andnot_pd(b, a) }
    }

    #[inline(always)]
    fn eq(a: __m256d, b: __m256d) -> __m256d {
        unsafe { _mm256_cmp_pd(a, b, _CMP_EQ_OQ) }
    }

    #[inline(always)]
    fn ne(a: __m256d, b: __m256d) -> __m256d {
        unsafe { _mm256_cmp_pd(a, b, _CMP_NEQ_UQ) }
    }

    #[inline(always)]
    fn lt(a: __m256d, b: __m256d) -> __m256d {
        unsafe { _mm256_cmp_pd(a, b, _CMP_LT_OQ) }
    }

    #[inline(always)]
    fn le(a: __m256d, b: __m256d) -> __m256d {
        unsafe { _mm256_cmp_pd(a, b, _CMP_LE_OQ) }
    }

    #[inline(always)]
    fn gt(a: __m256d, b: __m256d) -> __m256d {
        unsafe { _mm256_cmp_pd(a, b, _CMP_GT_OQ) }
    }

    #[inline(always)]
    fn ge(a: __m256d, b: __m256d) -> __m256d {
        unsafe { _mm256_cmp_pd(a, b, _CMP_GE_OQ) }
    }

    #[inline(always)]
    fn select(mask: __m256d, a: __m256d, b: __m256d) -> __m256d {
        unsafe { _mm256_blendv_pd(b, a, mask) }
    }

    #[inline(always)]
    fn hadd(a: __m256d) -> f64 {
        let folded = unsafe { _mm_add_pd(_mm256_castpd256_pd128(a), _mm256_extractf128_pd(a, 1)) };
        <Sse2 as Kernel<f64, 2>>::hadd(folded)
    }

    #[inline(always)]
    fn sqrt(a: __m256d) -> __m256d {
        unsafe { _mm256_sqrt_pd(a) }
    }

    #[inline(always)]
    fn mask_from_bitmask(bits: u64) -> __m256d {
        let lanes: [i64; 4] = std::array::from_fn(|i| -(((bits >> i) & 1) as i64));
        unsafe { _mm256_castsi256_pd(_mm256_loadu_si256(lanes.as_ptr().cast())) }
    }

    #[inline(always)]
    fn mask_to_bitmask(mask: __m256d) -> u64 {
        unsafe { _mm256_movemask_pd(mask) as u64 }
    }

    #[inline(always)]
    fn mask_and(a: __m256d, b: __m256d) -> __m256d {
        unsafe { _mm256_and_pd(a, b) }
    }

    #[inline(always)]
    fn mask_or(a: __m256d, b: __m256d) -> __m256d {
        unsafe { _mm256_or_pd(a, b) }
    }

    #[inline(always)]
    fn mask_xor(a: __m256d, b: __m256d) -> __m256d {
        unsafe { _mm256_xor_pd(a, b) }
    }

    #[inline(always)]
    fn mask_not(a: __m256d) -> __m256d {
        unsafe { _mm256_xor_pd(a, ones_pd()) }
    }

    #[inline(always)]
    fn mask_andnot(a: __m256d, b: __m256d) -> __m256d {
        unsafe { _mm256_andnot_pd(b, a) }
    }

    #[inline(always)]
    fn mask_all(mask: __m256d) -> bool {
        unsafe { _mm256_movemask_pd(mask) == 0b1111 }
    }

    #[inline(always)]
    fn mask_any(mask: __m256d) -> bool {
        unsafe { _mm256_movemask_pd(mask) != 0 }
    }
}
