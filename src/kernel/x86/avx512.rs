//! AVX-512F kernels: `f32 x 16`, `f64 x 8`, `i32 x 16`.
//!
//! Predicates live in `k` mask registers (`__mmask16` / `__mmask8`), which are
//! plain integers whose bit i is lane i, so the bitmask conversions are free.

use std::arch::x86_64::*;

use crate::config::BUILD;
use crate::kernel::traits::{zip_lanes, Kernel};
use crate::kernel::{Avx, Avx2, Avx512};
use crate::types::Element;

#[inline(always)]
unsafe fn ps_bits(f: impl FnOnce(__m512i) -> __m512i, a: __m512) -> __m512 {
    _mm512_castsi512_ps(f(_mm512_castps_si512(a)))
}

#[inline(always)]
unsafe fn pd_bits(f: impl FnOnce(__m512i) -> __m512i, a: __m512d) -> __m512d {
    _mm512_castsi512_pd(f(_mm512_castpd_si512(a)))
}

// ============================================================================
// f32 x 16
// ============================================================================

impl Kernel<f32, 16> for Avx512 {
    type Reg = __m512;
    type Mask = __mmask16;
    const ALIGNMENT: usize = 64;

    #[inline(always)]
    fn splat(value: f32) -> __m512 {
        unsafe { _mm512_set1_ps(value) }
    }

    #[inline(always)]
    fn from_array(lanes: [f32; 16]) -> __m512 {
        unsafe { _mm512_loadu_ps(lanes.as_ptr()) }
    }

    #[inline(always)]
    fn to_array(reg: __m512) -> [f32; 16] {
        let mut out = [0.0f32; 16];
        unsafe { _mm512_storeu_ps(out.as_mut_ptr(), reg) };
        out
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> __m512 {
        _mm512_load_ps(ptr)
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const f32) -> __m512 {
        _mm512_loadu_ps(ptr)
    }

    #[inline(always)]
    unsafe fn store_aligned(reg: __m512, ptr: *mut f32) {
        _mm512_store_ps(ptr, reg)
    }

    #[inline(always)]
    unsafe fn store_unaligned(reg: __m512, ptr: *mut f32) {
        _mm512_storeu_ps(ptr, reg)
    }

    #[inline(always)]
    fn add(a: __m512, b: __m512) -> __m512 {
        unsafe { _mm512_add_ps(a, b) }
    }

    #[inline(always)]
    fn sub(a: __m512, b: __m512) -> __m512 {
        unsafe { _mm512_sub_ps(a, b) }
    }

    #[inline(always)]
    fn mul(a: __m512, b: __m512) -> __m512 {
        unsafe { _mm512_mul_ps(a, b) }
    }

    #[inline(always)]
    fn div(a: __m512, b: __m512) -> __m512 {
        unsafe { _mm512_div_ps(a, b) }
    }

    #[inline(always)]
    fn neg(a: __m512) -> __m512 {
        unsafe { ps_bits(|x| _mm512_xor_si512(x, _mm512_set1_epi32(i32::MIN)), a) }
    }

    #[inline(always)]
    fn min(a: __m512, b: __m512) -> __m512 {
        unsafe { _mm512_min_ps(a, b) }
    }

    #[inline(always)]
    fn max(a: __m512, b: __m512) -> __m512 {
        unsafe { _mm512_max_ps(a, b) }
    }

    #[inline(always)]
    fn abs(a: __m512) -> __m512 {
        unsafe { _mm512_abs_ps(a) }
    }

    #[inline(always)]
    fn fma(a: __m512, b: __m512, c: __m512) -> __m512 {
        unsafe { _mm512_fmadd_ps(a, b, c) }
    }

    #[inline(always)]
    fn fms(a: __m512, b: __m512, c: __m512) -> __m512 {
        unsafe { _mm512_fmsub_ps(a, b, c) }
    }

    #[inline(always)]
    fn fnma(a: __m512, b: __m512, c: __m512) -> __m512 {
        unsafe { _mm512_fnmadd_ps(a, b, c) }
    }

    #[inline(always)]
    fn fnms(a: __m512, b: __m512, c: __m512) -> __m512 {
        unsafe { _mm512_fnmsub_ps(a, b, c) }
    }

    #[inline(always)]
    fn bitand(a: __m512, b: __m512) -> __m512 {
        unsafe { ps_bits(|x| _mm512_and_si512(x, _mm512_castps_si512(b)), a) }
    }

    #[inline(always)]
    fn bitor(a: __m512, b: __m512) -> __m512 {
        unsafe { ps_bits(|x| _mm512_or_si512(x, _mm512_castps_si512(b)), a) }
    }

    #[inline(always)]
    fn bitxor(a: __m512, b: __m512) -> __m512 {
        unsafe { ps_bits(|x| _mm512_xor_si512(x, _mm512_castps_si512(b)), a) }
    }

    #[inline(always)]
    fn bitnot(a: __m512) -> __m512 {
        unsafe { ps_bits(|x| _mm512_xor_si512(x, _mm512_set1_epi32(-1)), a) }
    }

    #[inline(always)]
    fn andnot(a: __m512, b: __m512) -> __m512 {
        unsafe { ps_bits(|x| _mm512_andnot_si512(_mm512_castps_si512(b), x), a) }
    }

    #[inline(always)]
    fn eq(a: __m512, b: __m512) -> __mmask16 {
        unsafe { _mm512_cmp_ps_mask(a, b, _CMP_EQ_OQ) }
    }

    #[inline(always)]
    fn ne(a: __m512, b: __m512) -> __mmask16 {
        unsafe { _mm512_cmp_ps_mask(a, b, _CMP_NEQ_UQ) }
    }

    #[inline(always)]
    fn lt(a: __m512, b: __m512) -> __mmask16 {
        unsafe { _mm512_cmp_ps_mask(a, b, _CMP_LT_OQ) }
    }

    #[inline(always)]
    fn le(a: __m512, b: __m512) -> __mmask16 {
        unsafe { _mm512_cmp_ps_mask(a, b, _CMP_LE_OQ) }
    }

    #[inline(always)]
    fn gt(a: __m512, b: __m512) -> __mmask16 {
        unsafe { _mm512_cmp_ps_mask(a, b, _CMP_GT_OQ) }
    }

    #[inline(always)]
    fn ge(a: __m512, b: __m512) -> __mmask16 {
        unsafe { _mm512_cmp_ps_mask(a, b, _CMP_GE_OQ) }
    }

    #[inline(always)]
    fn select(mask: __mmask16, a: __m512, b: __m512) -> __m512 {
        unsafe { _mm512_mask_blend_ps(mask, b, a) }
    }

    #[inline(always)]
    fn hadd(a: __m512) -> f32 {
        let folded = unsafe {
            let hi = _mm256_castpd_ps(_mm512_extractf64x4_pd(_mm512_castps_pd(a), 1));
            _mm256_add_ps(_mm512_castps512_ps256(a), hi)
        };
        <Avx as Kernel<f32, 8>>::hadd(folded)
    }

    #[inline(always)]
    fn sqrt(a: __m512) -> __m512 {
        unsafe { _mm512_sqrt_ps(a) }
    }

    #[inline(always)]
    fn to_int(a: __m512) -> [i32; 16] {
        let mut out = [0i32; 16];
        unsafe {
            let truncated = _mm512_cvttps_epi32(a);
            let overflow = _mm512_cmp_ps_mask(a, _mm512_set1_ps(2_147_483_648.0), _CMP_GE_OQ);
            let unordered = _mm512_cmp_ps_mask(a, a, _CMP_UNORD_Q);
            let fixed = _mm512_mask_set1_epi32(truncated, overflow, i32::MAX);
            let fixed = _mm512_mask_set1_epi32(fixed, unordered, 0);
            _mm512_storeu_epi32(out.as_mut_ptr(), fixed);
        }
        out
    }

    #[inline(always)]
    fn mask_from_bitmask(bits: u64) -> __mmask16 {
        bits as __mmask16
    }

    #[inline(always)]
    fn mask_to_bitmask(mask: __mmask16) -> u64 {
        mask as u64
    }

    #[inline(always)]
    fn mask_and(a: __mmask16, b: __mmask16) -> __mmask16 {
        a & b
    }

    #[inline(always)]
    fn mask_or(a: __mmask16, b: __mmask16) -> __mmask16 {
        a | b
    }

    #[inline(always)]
    fn mask_xor(a: __mmask16, b: __mmask16) -> __mmask16 {
        a ^ b
    }

    #[inline(always)]
    fn mask_not(a: __mmask16) -> __mmask16 {
        !a
    }

    #[inline(always)]
    fn mask_andnot(a: __mmask16, b: __mmask16) -> __mmask16 {
        a & !b
    }

    #[inline(always)]
    fn mask_all(mask: __mmask16) -> bool {
        mask == __mmask16::MAX
    }

    #[inline(always)]
    fn mask_any(mask: __mmask16) -> bool {
        mask != 0
    }
}

// ============================================================================
// f64 x 8
// ============================================================================

impl Kernel<f64, 8> for Avx512 {
    type Reg = __m512d;
    type Mask = __mmask8;
    const ALIGNMENT: usize = 64;

    #[inline(always)]
    fn splat(value: f64) -> __m512d {
        unsafe { _mm512_set1_pd(value) }
    }

    #[inline(always)]
    fn from_array(lanes: [f64; 8]) -> __m512d {
        unsafe { _mm512_loadu_pd(lanes.as_ptr()) }
    }

    #[inline(always)]
    fn to_array(reg: __m512d) -> [f64; 8] {
        let mut out = [0.0f64; 8];
        unsafe { _mm512_storeu_pd(out.as_mut_ptr(), reg) };
        out
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f64) -> __m512d {
        _mm512_load_pd(ptr)
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const f64) -> __m512d {
        _mm512_loadu_pd(ptr)
    }

    #[inline(always)]
    unsafe fn store_aligned(reg: __m512d, ptr: *mut f64) {
        _mm512_store_pd(ptr, reg)
    }

    #[inline(always)]
    unsafe fn store_unaligned(reg: __m512d, ptr: *mut f64) {
        _mm512_storeu_pd(ptr, reg)
    }

    #[inline(always)]
    fn add(a: __m512d, b: __m512d) -> __m512d {
        unsafe { _mm512_add_pd(a, b) }
    }

    #[inline(always)]
    fn sub(a: __m512d, b: __m512d) -> __m512d {
        unsafe { _mm512_sub_pd(a, b) }
    }

    #[inline(always)]
    fn mul(a: __m512d, b: __m512d) -> __m512d {
        unsafe { _mm512_mul_pd(a, b) }
    }

    #[inline(always)]
    fn div(a: __m512d, b: __m512d) -> __m512d {
        unsafe { _mm512_div_pd(a, b) }
    }

    #[inline(always)]
    fn neg(a: __m512d) -> __m512d {
        unsafe { pd_bits(|x| _mm512_xor_si512(x, _mm512_set1_epi64(i64::MIN)), a) }
    }

    #[inline(always)]
    fn min(a: __m512d, b: __m512d) -> __m512d {
        unsafe { _mm512_min_pd(a, b) }
    }

    #[inline(always)]
    fn max(a: __m512d, b: __m512d) -> __m512d {
        unsafe { _mm512_max_pd(a, b) }
    }

    #[inline(always)]
    fn abs(a: __m512d) -> __m512d {
        unsafe { _mm512_abs_pd(a) }
    }

    #[inline(always)]
    fn fma(a: __m512d, b: __m512d, c: __m512d) -> __m512d {
        unsafe { _mm512_fmadd_pd(a, b, c) }
    }

    #[inline(always)]
    fn fms(a: __m512d, b: __m512d, c: __m512d) -> __m512d {
        unsafe { _mm512_fmsub_pd(a, b, c) }
    }

    #[inline(always)]
    fn fnma(a: __m512d, b: __m512d, c: __m512d) -> __m512d {
        unsafe { _mm512_fnmadd_pd(a, b, c) }
    }

    #[inline(always)]
    fn fnms(a: __m512d, b: __m512d, c: __m512d) -> __m512d {
        unsafe { _mm512_fnmsub_pd(a, b, c) }
    }

    #[inline(always)]
    fn bitand(a: __m512d, b: __m512d) -> __m512d {
        unsafe { pd_bits(|x| _mm512_and_si512(x, _mm512_castpd_si512(b)), a) }
    }

    #[inline(always)]
    fn bitor(a: __m512d, b: __m512d) -> __m512d {
        unsafe { pd_bits(|x| _mm512_or_si512(x, _mm512_castpd_si512(b)), a) }
    }

    #[inline(always)]
    fn bitxor(a: __m512d, b: __m512d) -> __m512d {
        unsafe { pd_bits(|x| _mm512_xor_si512(x, _mm512_castpd_si512(b)), a) }
    }

    #[inline(always)]
    fn bitnot(a: __m512d) -> __m512d {
        unsafe { pd_bits(|x| _mm512_xor_si512(x, _mm512_set1_epi32(-1)), a) }
    }

    #[inline(always)]
    fn andnot(a: __m512d, b: __m512d) -> __m512d {
        unsafe { pd_bits(|x| _mm512_andnot_si512(_mm512_castpd_si512(b), x), a) }
    }

    #[inline(always)]
    fn eq(a: __m512d, b: __m512d) -> __mmask8 {
        unsafe { _mm512_cmp_pd_mask(a, b, _CMP_EQ_OQ) }
    }

    #[inline(always)]
    fn ne(a: __m512d, b: __m512d) -> __mmask8 {
        unsafe { _mm512_cmp_pd_mask(a, b, _CMP_NEQ_UQ) }
    }

    #[inline(always)]
    fn lt(a: __m512d, b: __m512d) -> __mmask8 {
        unsafe { _mm512_cmp_pd_mask(a, b, _CMP_LT_OQ) }
    }

    #[inline(always)]
    fn le(a: __m512d, b: __m512d) -> __mmask8 {
        unsafe { _mm512_cmp_pd_mask(a, b, _CMP_LE_OQ) }
    }

    #[inline(always)]
    fn gt(a: __m512d, b: __m512d) -> __mmask8 {
        unsafe { _mm512_cmp_pd_mask(a, b, _CMP_GT_OQ) }
    }

    #[inline(always)]
    fn ge(a: __m512d, b: __m512d) -> __mmask8 {
        unsafe { _mm512_cmp_pd_mask(a, b, _CMP_GE_OQ) }
    }

    #[inline(always)]
    fn select(mask: __mmask8, a: __m512d, b: __m512d) -> __m512d {
        unsafe { _mm512_mask_blend_pd(mask, b, a) }
    }

    #[inline(always)]
    fn hadd(a: __m512d) -> f64 {
        let folded = unsafe {
            _mm256_add_pd(_mm512_castpd512_pd256(a), _mm512_extractf64x4_pd(a, 1))
        };
        <Avx as Kernel<f64, 4>>::hadd(folded)
    }

    #[inline(always)]
    fn sqrt(a: __m512d) -> __m512d {
        unsafe { _mm512_sqrt_pd(a) }
    }

    #[inline(always)]
    fn mask_from_bitmask(bits: u64) -> __mmask8 {
        bits as __mmask8
    }

    #[inline(always)]
    fn mask_to_bitmask(mask: __mmask8) -> u64 {
        mask as u64
    }

    #[inline(always)]
    fn mask_and(a: __mmask8, b: __mmask8) -> __mmask8 {
        a & b
    }

    #[inline(always)]
    fn mask_or(a: __mmask8, b: __mmask8) -> __mmask8 {
        a | b
    }

    #[inline(always)]
    fn mask_xor(a: __mmask8, b: __mmask8) -> __mmask8 {
        a ^ b
    }

    #[inline(always)]
    fn mask_not(a: __mmask8) -> __mmask8 {
        !a
    }

    #[inline(always)]
    fn mask_andnot(a: __mmask8, b: __mmask8) -> __mmask8 {
        a & !b
    }

    #[inline(always)]
    fn mask_all(mask: __mmask8) -> bool {
        mask == __mmask8::MAX
    }

    #[inline(always)]
    fn mask_any(mask: __mmask8) -> bool {
        mask != 0
    }
}

// ============================================================================
// i32 x 16
// ============================================================================

impl Kernel<i32, 16> for Avx512 {
    type Reg = __m512i;
    type Mask = __mmask16;
    const ALIGNMENT: usize = 64;

    #[inline(always)]
    fn splat(value: i32) -> __m512i {
        unsafe { _mm512_set1_epi32(value) }
    }

    #[inline(always)]
    fn from_array(lanes: [i32; 16]) -> __m512i {
        unsafe { _mm512_loadu_epi32(lanes.as_ptr()) }
    }

    #[inline(always)]
    fn to_array(reg: __m512i) -> [i32; 16] {
        let mut out = [0i32; 16];
        unsafe { _mm512_storeu_epi32(out.as_mut_ptr(), reg) };
        out
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const i32) -> __m512i {
        _mm512_load_epi32(ptr)
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const i32) -> __m512i {
        _mm512_loadu_epi32(ptr)
    }

    #[inline(always)]
    unsafe fn store_aligned(reg: __m512i, ptr: *mut i32) {
        _mm512_store_epi32(ptr, reg)
    }

    #[inline(always)]
    unsafe fn store_unaligned(reg: __m512i, ptr: *mut i32) {
        _mm512_storeu_epi32(ptr, reg)
    }

    #[inline(always)]
    fn add(a: __m512i, b: __m512i) -> __m512i {
        unsafe { _mm512_add_epi32(a, b) }
    }

    #[inline(always)]
    fn sub(a: __m512i, b: __m512i) -> __m512i {
        unsafe { _mm512_sub_epi32(a, b) }
    }

    #[inline(always)]
    fn mul(a: __m512i, b: __m512i) -> __m512i {
        unsafe { _mm512_mullo_epi32(a, b) }
    }

    #[inline(always)]
    fn div(a: __m512i, b: __m512i) -> __m512i {
        if BUILD.fast_int_division() {
            let q = unsafe { _mm512_div_ps(_mm512_cvtepi32_ps(a), _mm512_cvtepi32_ps(b)) };
            return <Self as Kernel<i32, 16>>::from_array(<Self as Kernel<f32, 16>>::to_int(q));
        }
        let (a, b) = (<Self as Kernel<i32, 16>>::to_array(a), <Self as Kernel<i32, 16>>::to_array(b));
        <Self as Kernel<i32, 16>>::from_array(zip_lanes(a, b, i32::lane_div))
    }

    #[inline(always)]
    fn neg(a: __m512i) -> __m512i {
        unsafe { _mm512_sub_epi32(_mm512_setzero_si512(), a) }
    }

    #[inline(always)]
    fn min(a: __m512i, b: __m512i) -> __m512i {
        unsafe { _mm512_min_epi32(a, b) }
    }

    #[inline(always)]
    fn max(a: __m512i, b: __m512i) -> __m512i {
        unsafe { _mm512_max_epi32(a, b) }
    }

    #[inline(always)]
    fn abs(a: __m512i) -> __m512i {
        unsafe { _mm512_abs_epi32(a) }
    }

    #[inline(always)]
    fn fma(a: __m512i, b: __m512i, c: __m512i) -> __m512i {
        unsafe { _mm512_add_epi32(_mm512_mullo_epi32(a, b), c) }
    }

    #[inline(always)]
    fn fms(a: __m512i, b: __m512i, c: __m512i) -> __m512i {
        unsafe { _mm512_sub_epi32(_mm512_mullo_epi32(a, b), c) }
    }

    #[inline(always)]
    fn fnma(a: __m512i, b: __m512i, c: __m512i) -> __m512i {
        unsafe { _mm512_sub_epi32(c, _mm512_mullo_epi32(a, b)) }
    }

    #[inline(always)]
    fn fnms(a: __m512i, b: __m512i, c: __m512i) -> __m512i {
        unsafe {
            let product = _mm512_mullo_epi32(a, b);
            _mm512_sub_epi32(_mm512_sub_epi32(_mm512_setzero_si512(), product), c)
        }
    }

    #[inline(always)]
    fn bitand(a: __m512i, b: __m512i) -> __m512i {
        unsafe { _mm512_and_si512(a, b) }
    }

    #[inline(always)]
    fn bitor(a: __m512i, b: __m512i) -> __m512i {
        unsafe { _mm512_or_si512(a, b) }
    }

    #[inline(always)]
    fn bitxor(a: __m512i, b: __m512i) -> __m512i {
        unsafe { _mm512_xor_si512(a, b) }
    }

    #[inline(always)]
    fn bitnot(a: __m512i) -> __m512i {
        unsafe { _mm512_xor_si512(a, _mm512_set1_epi32(-1)) }
    }

    #[inline(always)]
    fn andnot(a: __m512i, b: __m512i) -> __m512i {
        unsafe { _mm512_andnot_si512(b, a) }
    }

    #[inline(always)]
    fn eq(a: __m512i, b: __m512i) -> __mmask16 {
        unsafe { _mm512_cmpeq_epi32_mask(a, b) }
    }

    #[inline(always)]
    fn ne(a: __m512i, b: __m512i) -> __mmask16 {
        unsafe { _mm512_cmpneq_epi32_mask(a, b) }
    }

    #[inline(always)]
    fn lt(a: __m512i, b: __m512i) -> __mmask16 {
        unsafe { _mm512_cmplt_epi32_mask(a, b) }
    }

    #[inline(always)]
    fn le(a: __m512i, b: __m512i) -> __mmask16 {
        unsafe { _mm512_cmple_epi32_mask(a, b) }
    }

    #[inline(always)]
    fn gt(a: __m512i, b: __m512i) -> __mmask16 {
        unsafe { _mm512_cmpgt_epi32_mask(a, b) }
    }

    #[inline(always)]
    fn ge(a: __m512i, b: __m512i) -> __mmask16 {
        unsafe { _mm512_cmpge_epi32_mask(a, b) }
    }

    #[inline(always)]
    fn select(mask: __mmask16, a: __m512i, b: __m512i) -> __m512i {
        unsafe { _mm512_mask_blend_epi32(mask, b, a) }
    }

    #[inline(always)]
    fn hadd(a: __m512i) -> i32 {
        let folded = unsafe {
            _mm256_add_epi32(_mm512_castsi512_si256(a), _mm512_extracti64x4_epi64(a, 1))
        };
        <Avx2 as Kernel<i32, 8>>::hadd(folded)
    }

    #[inline(always)]
    fn to_float(a: __m512i) -> [f32; 16] {
        <Self as Kernel<f32, 16>>::to_array(unsafe { _mm512_cvtepi32_ps(a) })
    }

    #[inline(always)]
    fn mask_from_bitmask(bits: u64) -> __mmask16 {
        bits as __mmask16
    }

    #[inline(always)]
    fn mask_to_bitmask(mask: __mmask16) -> u64 {
        mask as u64
    }

    #[inline(always)]
    fn mask_and(a: __mmask16, b: __mmask16) -> __mmask16 {
        a & b
    }

    #[inline(always)]
    fn mask_or(a: __mmask16, b: __mmask16) -> __mmask16 {
        a | b
    }

    #[inline(always)]
    fn mask_xor(a: __mmask16, b: __mmask16) -> __mmask16 {
        a ^ b
    }

    #[inline(always)]
    fn mask_not(a: __mmask16) -> __mmask16 {
        !a
    }

    #[inline(always)]
    fn mask_andnot(a: __mmask16, b: __mmask16) -> __mmask16 {
        a & !b
    }

    #[inline(always)]
    fn mask_all(mask: __mmask16) -> bool {
        mask == __mmask16::MAX
    }

    #[inline(always)]
    fn mask_any(mask: __mmask16) -> bool {
        mask != 0
    }
}
