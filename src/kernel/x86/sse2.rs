//! SSE2 kernels: `f32 x 4`, `f64 x 2`, `i32 x 4`.
//!
//! Predicates use the all-ones lane pattern produced by the compare
//! instructions. Where SSE2 lacks an instruction (32-bit `mullo`, integer
//! `min`/`max`/`abs`), a newer one is used when the build enables it and an
//! emulation otherwise.

use std::arch::x86_64::*;

use crate::config::BUILD;
use crate::kernel::traits::{zip_lanes, Kernel};
use crate::kernel::Sse2;
use crate::types::Element;

#[inline(always)]
unsafe fn ones_ps() -> __m128 {
    _mm_castsi128_ps(_mm_set1_epi32(-1))
}

#[inline(always)]
unsafe fn ones_pd() -> __m128d {
    _mm_castsi128_pd(_mm_set1_epi32(-1))
}

#[inline(always)]
unsafe fn ones_si128() -> __m128i {
    _mm_set1_epi32(-1)
}

/// Lane i is all ones iff bit i of `bits` is set.
#[inline(always)]
unsafe fn bitmask_epi32(bits: u64) -> __m128i {
    let lanes = _mm_setr_epi32(1, 2, 4, 8);
    let v = _mm_set1_epi32(bits as i32);
    _mm_cmpeq_epi32(_mm_and_si128(v, lanes), lanes)
}

#[cfg(target_feature = "sse4.1")]
#[inline(always)]
unsafe fn mullo_epi32(a: __m128i, b: __m128i) -> __m128i {
    _mm_mullo_epi32(a, b)
}

#[cfg(not(target_feature = "sse4.1"))]
#[inline(always)]
unsafe fn mullo_epi32(a: __m128i, b: __m128i) -> __m128i {
    // Low halves of the 64-bit products of the even and the odd lanes, interleaved back.
    let even = _mm_mul_epu32(a, b);
    let odd = _mm_mul_epu32(_mm_srli_epi64(a, 32), _mm_srli_epi64(b, 32));
    _mm_unpacklo_epi32(
        _mm_shuffle_epi32(even, 0b00_00_10_00),
        _mm_shuffle_epi32(odd, 0b00_00_10_00),
    )
}

#[inline(always)]
unsafe fn select_si128(mask: __m128i, a: __m128i, b: __m128i) -> __m128i {
    _mm_or_si128(_mm_and_si128(mask, a), _mm_andnot_si128(mask, b))
}

#[cfg(target_feature = "sse4.1")]
#[inline(always)]
unsafe fn min_epi32(a: __m128i, b: __m128i) -> __m128i {
    _mm_min_epi32(a, b)
}

#[cfg(not(target_feature = "sse4.1"))]
#[inline(always)]
unsafe fn min_epi32(a: __m128i, b: __m128i) -> __m128i {
    select_si128(_mm_cmplt_epi32(a, b), a, b)
}

#[cfg(target_feature = "sse4.1")]
#[inline(always)]
unsafe fn max_epi32(a: __m128i, b: __m128i) -> __m128i {
    _mm_max_epi32(a, b)
}

#[cfg(not(target_feature = "sse4.1"))]
#[inline(always)]
unsafe fn max_epi32(a: __m128i, b: __m128i) -> __m128i {
    select_si128(_mm_cmpgt_epi32(a, b), a, b)
}

#[cfg(target_feature = "ssse3")]
#[inline(always)]
unsafe fn abs_epi32(a: __m128i) -> __m128i {
    _mm_abs_epi32(a)
}

#[cfg(not(target_feature = "ssse3"))]
#[inline(always)]
unsafe fn abs_epi32(a: __m128i) -> __m128i {
    let sign = _mm_srai_epi32(a, 31);
    _mm_sub_epi32(_mm_xor_si128(a, sign), sign)
}

// ============================================================================
// f32 x 4
// ============================================================================

impl Kernel<f32, 4> for Sse2 {
    type Reg = __m128;
    type Mask = __m128;
    const ALIGNMENT: usize = 16;

    #[inline(always)]
    fn splat(value: f32) -> __m128 {
        unsafe { _mm_set1_ps(value) }
    }

    #[inline(always)]
    fn from_array(lanes: [f32; 4]) -> __m128 {
        unsafe { _mm_loadu_ps(lanes.as_ptr()) }
    }

    #[inline(always)]
    fn to_array(reg: __m128) -> [f32; 4] {
        let mut out = [0.0f32; 4];
        unsafe { _mm_storeu_ps(out.as_mut_ptr(), reg) };
        out
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> __m128 {
        _mm_load_ps(ptr)
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const f32) -> __m128 {
        _mm_loadu_ps(ptr)
    }

    #[inline(always)]
    unsafe fn store_aligned(reg: __m128, ptr: *mut f32) {
        _mm_store_ps(ptr, reg)
    }

    #[inline(always)]
    unsafe fn store_unaligned(reg: __m128, ptr: *mut f32) {
        _mm_storeu_ps(ptr, reg)
    }

    #[inline(always)]
    fn add(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_add_ps(a, b) }
    }

    #[inline(always)]
    fn sub(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_sub_ps(a, b) }
    }

    #[inline(always)]
    fn mul(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_mul_ps(a, b) }
    }

    #[inline(always)]
    fn div(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_div_ps(a, b) }
    }

    #[inline(always)]
    fn neg(a: __m128) -> __m128 {
        unsafe { _mm_xor_ps(a, _mm_set1_ps(-0.0)) }
    }

    #[inline(always)]
    fn min(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_min_ps(a, b) }
    }

    #[inline(always)]
    fn max(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_max_ps(a, b) }
    }

    #[inline(always)]
    fn abs(a: __m128) -> __m128 {
        unsafe { _mm_andnot_ps(_mm_set1_ps(-0.0), a) }
    }

    #[cfg(target_feature = "fma")]
    #[inline(always)]
    fn fma(a: __m128, b: __m128, c: __m128) -> __m128 {
        unsafe { _mm_fmadd_ps(a, b, c) }
    }

    #[cfg(target_feature = "fma")]
    #[inline(always)]
    fn fms(a: __m128, b: __m128, c: __m128) -> __m128 {
        unsafe { _mm_fmsub_ps(a, b, c) }
    }

    #[cfg(target_feature = "fma")]
    #[inline(always)]
    fn fnma(a: __m128, b: __m128, c: __m128) -> __m128 {
        unsafe { _mm_fnmadd_ps(a, b, c) }
    }

    #[cfg(target_feature = "fma")]
    #[inline(always)]
    fn fnms(a: __m128, b: __m128, c: __m128) -> __m128 {
        unsafe { _mm_fnmsub_ps(a, b, c) }
    }

    #[inline(always)]
    fn bitand(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_and_ps(a, b) }
    }

    #[inline(always)]
    fn bitor(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_or_ps(a, b) }
    }

    #[inline(always)]
    fn bitxor(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_xor_ps(a, b) }
    }

    #[inline(always)]
    fn bitnot(a: __m128) -> __m128 {
        unsafe { _mm_xor_ps(a, ones_ps()) }
    }

    #[inline(always)]
    fn andnot(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_andnot_ps(b, a) }
    }

    #[inline(always)]
    fn eq(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_cmpeq_ps(a, b) }
    }

    #[inline(always)]
    fn ne(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_cmpneq_ps(a, b) }
    }

    #[inline(always)]
    fn lt(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_cmplt_ps(a, b) }
    }

    #[inline(always)]
    fn le(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_cmple_ps(a, b) }
    }

    #[inline(always)]
    fn gt(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_cmpgt_ps(a, b) }
    }

    #[inline(always)]
    fn ge(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_cmpge_ps(a, b) }
    }

    #[inline(always)]
    fn select(mask: __m128, a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_or_ps(_mm_and_ps(mask, a), _mm_andnot_ps(mask, b)) }
    }

    #[inline(always)]
    fn hadd(a: __m128) -> f32 {
        unsafe {
            // [a0+a2, a1+a3, ..] then lane 0 + lane 1.
            let pair = _mm_add_ps(a, _mm_movehl_ps(a, a));
            let odd = _mm_shuffle_ps(pair, pair, 0b01);
            _mm_cvtss_f32(_mm_add_ss(pair, odd))
        }
    }

    #[inline(always)]
    fn haddp(rows: [__m128; 4]) -> __m128 {
        unsafe {
            let ab = _mm_add_ps(
                _mm_unpacklo_ps(rows[0], rows[1]),
                _mm_unpackhi_ps(rows[0], rows[1]),
            );
            let cd = _mm_add_ps(
                _mm_unpacklo_ps(rows[2], rows[3]),
                _mm_unpackhi_ps(rows[2], rows[3]),
            );
            _mm_add_ps(_mm_movelh_ps(ab, cd), _mm_movehl_ps(cd, ab))
        }
    }

    #[inline(always)]
    fn sqrt(a: __m128) -> __m128 {
        unsafe { _mm_sqrt_ps(a) }
    }

    #[inline(always)]
    fn to_int(a: __m128) -> [i32; 4] {
        let mut out = [0i32; 4];
        unsafe {
            // cvttps yields i32::MIN for NaN and out-of-range lanes; patch those to `as` semantics.
            let truncated = _mm_cvttps_epi32(a);
            let overflow = _mm_castps_si128(_mm_cmpge_ps(a, _mm_set1_ps(2_147_483_648.0)));
            let ordered = _mm_castps_si128(_mm_cmpord_ps(a, a));
            let fixed = _mm_and_si128(_mm_xor_si128(truncated, overflow), ordered);
            _mm_storeu_si128(out.as_mut_ptr().cast(), fixed);
        }
        out
    }

    #[inline(always)]
    fn mask_from_bitmask(bits: u64) -> __m128 {
        unsafe { _mm_castsi128_ps(bitmask_epi32(bits)) }
    }

    #[inline(always)]
    fn mask_to_bitmask(mask: __m128) -> u64 {
        unsafe { _mm_movemask_ps(mask) as u64 }
    }

    #[inline(always)]
    fn mask_and(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_and_ps(a, b) }
    }

    #[inline(always)]
    fn mask_or(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_or_ps(a, b) }
    }

    #[inline(always)]
    fn mask_xor(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_xor_ps(a, b) }
    }

    #[inline(always)]
    fn mask_not(a: __m128) -> __m128 {
        unsafe { _mm_xor_ps(a, ones_ps()) }
    }

    #[inline(always)]
    fn mask_andnot(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_andnot_ps(b, a) }
    }

    #[inline(always)]
    fn mask_all(mask: __m128) -> bool {
        unsafe { _mm_movemask_ps(mask) == 0b1111 }
    }

    #[inline(always)]
    fn mask_any(mask: __m128) -> bool {
        unsafe { _mm_movemask_ps(mask) != 0 }
    }
}

// ============================================================================
// f64 x 2
// ============================================================================

impl Kernel<f64, 2> for Sse2 {
    type Reg = __m128d;
    type Mask = __m128d;
    const ALIGNMENT: usize = 16;

    #[inline(always)]
    fn splat(value: f64) -> __m128d {
        unsafe { _mm_set1_pd(value) }
    }

    #[inline(always)]
    fn from_array(lanes: [f64; 2]) -> __m128d {
        unsafe { _mm_loadu_pd(lanes.as_ptr()) }
    }

    #[inline(always)]
    fn to_array(reg: __m128d) -> [f64; 2] {
        let mut out = [0.0f64; 2];
        unsafe { _mm_storeu_pd(out.as_mut_ptr(), reg) };
        out
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f64) -> __m128d {
        _mm_load_pd(ptr)
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const f64) -> __m128d {
        _mm_loadu_pd(ptr)
    }

    #[inline(always)]
    unsafe fn store_aligned(reg: __m128d, ptr: *mut f64) {
        _mm_store_pd(ptr, reg)
    }

    #[inline(always)]
    unsafe fn store_unaligned(reg: __m128d, ptr: *mut f64) {
        _mm_storeu_pd(ptr, reg)
    }

    #[inline(always)]
    fn add(a: __m128d, b: __m128d) -> __m128d {
        unsafe { _mm_add_pd(a, b) }
    }

    #[inline(always)]
    fn sub(a: __m128d, b: __m128d) -> __m128d {
        unsafe { _mm_sub_pd(a, b) }
    }

    #[inline(always)]
    fn mul(a: __m128d, b: __m128d) -> __m128d {
        unsafe { _mm_mul_pd(a, b) }
    }

    #[inline(always)]
    fn div(a: __m128d, b: __m128d) -> __m128d {
        unsafe { _mm_div_pd(a, b) }
    }

    #[inline(always)]
    fn neg(a: __m128d) -> __m128d {
        unsafe { _mm_xor_pd(a, _mm_set1_pd(-0.0)) }
    }

    #[inline(always)]
    fn min(a: __m128d, b: __m128d) -> __m128d {
        unsafe { _mm_min_pd(a, b) }
    }

    #[inline(always)]
    fn max(a: __m128d, b: __m128d) -> __m128d {
        unsafe { _mm_max_pd(a, b) }
    }

    #[inline(always)]
    fn abs(a: __m128d) -> __m128d {
        unsafe { _mm_andnot_pd(_mm_set1_pd(-0.0), a) }
    }

    #[cfg(target_feature = "fma")]
    #[inline(always)]
    fn fma(a: __m128d, b: __m128d, c: __m128d) -> __m128d {
        unsafe { _mm_fmadd_pd(a, b, c) }
    }

    #[cfg(target_feature = "fma")]
    #[inline(always)]
    fn fms(a: __m128d, b: __m128d, c: __m128d) -> __m128d {
        unsafe { _mm_fmsub_pd(a, b, c) }
    }

    #[cfg(target_feature = "fma")]
    #[inline(always)]
    fn fnma(a: __m128d, b: __m128d, c: __m128d) -> __m128d {
        unsafe { _mm_fnmadd_pd(a, b, c) }
    }

    #[cfg(target_feature = "fma")]
    #[inline(always)]
    fn fnms(a: __m128d, b: __m128d, c: __m128d) -> __m128d {
        unsafe { _mm_fnmsub_pd(a, b, c) }
    }

    #[inline(always)]
    fn bitand(a: __m128d, b: __m128d) -> __m128d {
        unsafe { _mm_and_pd(a, b) }
    }

    #[inline(always)]
    fn bitor(a: __m128d, b: __m128d) -> __m128d {
        unsafe { _mm_or_pd(a, b) }
    }

    #[inline(always)]
    fn bitxor(a: __m128d, b: __m128d) -> __m128d {
        unsafe { _mm_xor_pd(a, b) }
    }

    #[inline(always)]
    fn bitnot(a: __m128d) -> __m128d {
        unsafe { _mm_xor_pd(a, ones_pd()) }
    }

    #[inline(always)]
    fn andnot(a: __m128d, b: __m128d) -> __m128d {
        unsafe { _mm_andnot_pd(b, a) }
    }

    #[inline(always)]
    fn eq(a: __m128d, b: __m128d) -> __m128d {
        unsafe { _mm_cmpeq_pd(a, b) }
    }

    #[inline(always)]
    fn ne(a: __m128d, b: __m128d) -> __m128d {
        unsafe { _mm_cmpneq_pd(a, b) }
    }

    #[inline(always)]
    fn lt(a: __m128d, b: __m128d) -> __m128d {
        unsafe { _mm_cmplt_pd(a, b) }
    }

    #[inline(always)]
    fn le(a: __m128d, b: __m128d) -> __m128d {
        unsafe { _mm_cmple_pd(a, b) }
    }

    #[inline(always)]
    fn gt(a: __m128d, b: __m128d) -> __m128d {
        unsafe { _mm_cmpgt_pd(a, b) }
    }

    #[inline(always)]
    fn ge(a: __m128d, b: __m128d) -> __m128d {
        unsafe { _mm_cmpge_pd(a, b) }
    }

    #[inline(always)]
    fn select(mask: __m128d, a: __m128d, b: __m128d) -> __m128d {
        unsafe { _mm_or_pd(_mm_and_pd(mask, a), _mm_andnot_pd(mask, b)) }
    }

    #[inline(always)]
    fn hadd(a: __m128d) -> f64 {
        unsafe { _mm_cvtsd_f64(_mm_add_sd(a, _mm_unpackhi_pd(a, a))) }
    }

    #[inline(always)]
    fn haddp(rows: [__m128d; 2]) -> __m128d {
        unsafe {
            _mm_add_pd(
                _mm_unpacklo_pd(rows[0], rows[1]),
                _mm_unpackhi_pd(rows[0], rows[1]),
            )
        }
    }

    #[inline(always)]
    fn sqrt(a: __m128d) -> __m128d {
        unsafe { _mm_sqrt_pd(a) }
    }

    #[inline(always)]
    fn mask_from_bitmask(bits: u64) -> __m128d {
        let lane = |i: u64| -(((bits >> i) & 1) as i64);
        unsafe { _mm_castsi128_pd(_mm_set_epi64x(lane(1), lane(0))) }
    }

    #[inline(always)]
    fn mask_to_bitmask(mask: __m128d) -> u64 {
        unsafe { _mm_movemask_pd(mask) as u64 }
    }

    #[inline(always)]
    fn mask_and(a: __m128d, b: __m128d) -> __m128d {
        unsafe { _mm_and_pd(a, b) }
    }

    #[inline(always)]
    fn mask_or(a: __m128d, b: __m128d) -> __m128d {
        unsafe { _mm_or_pd(a, b) }
    }

    #[inline(always)]
    fn mask_xor(a: __m128d, b: __m128d) -> __m128d {
        unsafe { _mm_xor_pd(a, b) }
    }

    #[inline(always)]
    fn mask_not(a: __m128d) -> __m128d {
        unsafe { _mm_xor_pd(a, ones_pd()) }
    }

    #[inline(always)]
    fn mask_andnot(a: __m128d, b: __m128d) -> __m128d {
        unsafe { _mm_andnot_pd(b, a) }
    }

    #[inline(always)]
    fn mask_all(mask: __m128d) -> bool {
        unsafe { _mm_movemask_pd(mask) == 0b11 }
    }

    #[inline(always)]
    fn mask_any(mask: __m128d) -> bool {
        unsafe { _mm_movemask_pd(mask) != 0 }
    }
}

// ============================================================================
// i32 x 4
// ============================================================================

impl Kernel<i32, 4> for Sse2 {
    type Reg = __m128i;
    type Mask = __m128i;
    const ALIGNMENT: usize = 16;

    #[inline(always)]
    fn splat(value: i32) -> __m128i {
        unsafe { _mm_set1_epi32(value) }
    }

    #[inline(always)]
    fn from_array(lanes: [i32; 4]) -> __m128i {
        unsafe { _mm_loadu_si128(lanes.as_ptr().cast()) }
    }

    #[inline(always)]
    fn to_array(reg: __m128i) -> [i32; 4] {
        let mut out = [0i32; 4];
        unsafe { _mm_storeu_si128(out.as_mut_ptr().cast(), reg) };
        out
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const i32) -> __m128i {
        _mm_load_si128(ptr.cast())
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const i32) -> __m128i {
        _mm_loadu_si128(ptr.cast())
    }

    #[inline(always)]
    unsafe fn store_aligned(reg: __m128i, ptr: *mut i32) {
        _mm_store_si128(ptr.cast(), reg)
    }

    #[inline(always)]
    unsafe fn store_unaligned(reg: __m128i, ptr: *mut i32) {
        _mm_storeu_si128(ptr.cast(), reg)
    }

    #[inline(always)]
    fn add(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_add_epi32(a, b) }
    }

    #[inline(always)]
    fn sub(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_sub_epi32(a, b) }
    }

    #[inline(always)]
    fn mul(a: __m128i, b: __m128i) -> __m128i {
        unsafe { mullo_epi32(a, b) }
    }

    #[inline(always)]
    fn div(a: __m128i, b: __m128i) -> __m128i {
        if BUILD.fast_int_division() {
            let q = unsafe { _mm_div_ps(_mm_cvtepi32_ps(a), _mm_cvtepi32_ps(b)) };
            return <Self as Kernel<i32, 4>>::from_array(<Self as Kernel<f32, 4>>::to_int(q));
        }
        let (a, b) = (<Self as Kernel<i32, 4>>::to_array(a), <Self as Kernel<i32, 4>>::to_array(b));
        <Self as Kernel<i32, 4>>::from_array(zip_lanes(a, b, i32::lane_div))
    }

    #[inline(always)]
    fn neg(a: __m128i) -> __m128i {
        unsafe { _mm_sub_epi32(_mm_setzero_si128(), a) }
    }

    #[inline(always)]
    fn min(a: __m128i, b: __m128i) -> __m128i {
        unsafe { min_epi32(a, b) }
    }

    #[inline(always)]
    fn max(a: __m128i, b: __m128i) -> __m128i {
        unsafe { max_epi32(a, b) }
    }

    #[inline(always)]
    fn abs(a: __m128i) -> __m128i {
        unsafe { abs_epi32(a) }
    }

    #[inline(always)]
    fn fma(a: __m128i, b: __m128i, c: __m128i) -> __m128i {
        unsafe { _mm_add_epi32(mullo_epi32(a, b), c) }
    }

    #[inline(always)]
    fn fms(a: __m128i, b: __m128i, c: __m128i) -> __m128i {
        unsafe { _mm_sub_epi32(mullo_epi32(a, b), c) }
    }

    #[inline(always)]
    fn fnma(a: __m128i, b: __m128i, c: __m128i) -> __m128i {
        unsafe { _mm_sub_epi32(c, mullo_epi32(a, b)) }
    }

    #[inline(always)]
    fn fnms(a: __m128i, b: __m128i, c: __m128i) -> __m128i {
        unsafe {
            let product = _mm_sub_epi32(_mm_setzero_si128(), mullo_epi32(a, b));
            _mm_sub_epi32(product, c)
        }
    }

    #[inline(always)]
    fn bitand(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_and_si128(a, b) }
    }

    #[inline(always)]
    fn bitor(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_or_si128(a, b) }
    }

    #[inline(always)]
    fn bitxor(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_xor_si128(a, b) }
    }

    #[inline(always)]
    fn bitnot(a: __m128i) -> __m128i {
        unsafe { _mm_xor_si128(a, ones_si128()) }
    }

    #[inline(always)]
    fn andnot(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_andnot_si128(b, a) }
    }

    #[inline(always)]
    fn eq(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_cmpeq_epi32(a, b) }
    }

    #[inline(always)]
    fn ne(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_xor_si128(_mm_cmpeq_epi32(a, b), ones_si128()) }
    }

    #[inline(always)]
    fn lt(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_cmplt_epi32(a, b) }
    }

    #[inline(always)]
    fn le(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_xor_si128(_mm_cmpgt_epi32(a, b), ones_si128()) }
    }

    #[inline(always)]
    fn gt(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_cmpgt_epi32(a, b) }
    }

    #[inline(always)]
    fn ge(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_xor_si128(_mm_cmplt_epi32(a, b), ones_si128()) }
    }

    #[inline(always)]
    fn select(mask: __m128i, a: __m128i, b: __m128i) -> __m128i {
        unsafe { select_si128(mask, a, b) }
    }

    #[inline(always)]
    fn hadd(a: __m128i) -> i32 {
        unsafe {
            let hi64 = _mm_unpackhi_epi64(a, a);
            let sum64 = _mm_add_epi32(a, hi64);
            let hi32 = _mm_shuffle_epi32(sum64, 0b01);
            _mm_cvtsi128_si32(_mm_add_epi32(sum64, hi32))
        }
    }

    #[inline(always)]
    fn to_float(a: __m128i) -> [f32; 4] {
        <Sse2 as Kernel<f32, 4>>::to_array(unsafe { _mm_cvtepi32_ps(a) })
    }

    #[inline(always)]
    fn mask_from_bitmask(bits: u64) -> __m128i {
        unsafe { bitmask_epi32(bits) }
    }

    #[inline(always)]
    fn mask_to_bitmask(mask: __m128i) -> u64 {
        unsafe { _mm_movemask_ps(_mm_castsi128_ps(mask)) as u64 }
    }

    #[inline(always)]
    fn mask_and(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_and_si128(a, b) }
    }

    #[inline(always)]
    fn mask_or(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_or_si128(a, b) }
    }

    #[inline(always)]
    fn mask_xor(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_xor_si128(a, b) }
    }

    #[inline(always)]
    fn mask_not(a: __m128i) -> __m128i {
        unsafe { _mm_xor_si128(a, ones_si128()) }
    }

    #[inline(always)]
    fn mask_andnot(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_andnot_si128(b, a) }
    }

    #[inline(always)]
    fn mask_all(mask: __m128i) -> bool {
        unsafe { _mm_movemask_ps(_mm_castsi128_ps(mask)) == 0b1111 }
    }

    #[inline(always)]
    fn mask_any(mask: __m128i) -> bool {
        unsafe { _mm_movemask_ps(_mm_castsi128_ps(mask)) != 0 }
    }
}
