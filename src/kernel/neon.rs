//! AArch64 Advanced SIMD kernels: `f32 x 4`, `f64 x 2`, `i32 x 4`.
//!
//! `vminq`/`vmaxq` propagate NaN and order signed zeros, which the fallback
//! does not, so float min/max go through a compare and a bit select instead.

use std::arch::aarch64::*;

use crate::config::BUILD;
use crate::kernel::traits::{zip_lanes, Kernel};
use crate::kernel::Neon;
use crate::types::Element;

const LANE_BITS_32: [u32; 4] = [1, 2, 4, 8];
const LANE_BITS_64: [u64; 2] = [1, 2];

#[inline(always)]
unsafe fn bitmask_u32(bits: u64) -> uint32x4_t {
    vtstq_u32(vdupq_n_u32(bits as u32), vld1q_u32(LANE_BITS_32.as_ptr()))
}

#[inline(always)]
unsafe fn movemask_u32(mask: uint32x4_t) -> u64 {
    vaddvq_u32(vandq_u32(mask, vld1q_u32(LANE_BITS_32.as_ptr()))) as u64
}

#[inline(always)]
unsafe fn bitmask_u64(bits: u64) -> uint64x2_t {
    vtstq_u64(vdupq_n_u64(bits), vld1q_u64(LANE_BITS_64.as_ptr()))
}

#[inline(always)]
unsafe fn movemask_u64(mask: uint64x2_t) -> u64 {
    vaddvq_u64(vandq_u64(mask, vld1q_u64(LANE_BITS_64.as_ptr())))
}

#[inline(always)]
unsafe fn not_u64(a: uint64x2_t) -> uint64x2_t {
    veorq_u64(a, vdupq_n_u64(u64::MAX))
}

// ============================================================================
// f32 x 4
// ============================================================================

impl Kernel<f32, 4> for Neon {
    type Reg = float32x4_t;
    type Mask = uint32x4_t;
    const ALIGNMENT: usize = 16;

    #[inline(always)]
    fn splat(value: f32) -> float32x4_t {
        unsafe { vdupq_n_f32(value) }
    }

    #[inline(always)]
    fn from_array(lanes: [f32; 4]) -> float32x4_t {
        unsafe { vld1q_f32(lanes.as_ptr()) }
    }

    #[inline(always)]
    fn to_array(reg: float32x4_t) -> [f32; 4] {
        let mut out = [0.0f32; 4];
        unsafe { vst1q_f32(out.as_mut_ptr(), reg) };
        out
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> float32x4_t {
        vld1q_f32(ptr)
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const f32) -> float32x4_t {
        vld1q_f32(ptr)
    }

    #[inline(always)]
    unsafe fn store_aligned(reg: float32x4_t, ptr: *mut f32) {
        vst1q_f32(ptr, reg)
    }

    #[inline(always)]
    unsafe fn store_unaligned(reg: float32x4_t, ptr: *mut f32) {
        vst1q_f32(ptr, reg)
    }

    #[inline(always)]
    fn add(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vaddq_f32(a, b) }
    }

    #[inline(always)]
    fn sub(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vsubq_f32(a, b) }
    }

    #[inline(always)]
    fn mul(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vmulq_f32(a, b) }
    }

    #[inline(always)]
    fn div(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vdivq_f32(a, b) }
    }

    #[inline(always)]
    fn neg(a: float32x4_t) -> float32x4_t {
        unsafe { vnegq_f32(a) }
    }

    #[inline(always)]
    fn min(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vbslq_f32(vcltq_f32(a, b), a, b) }
    }

    #[inline(always)]
    fn max(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vbslq_f32(vcgtq_f32(a, b), a, b) }
    }

    #[inline(always)]
    fn abs(a: float32x4_t) -> float32x4_t {
        unsafe { vabsq_f32(a) }
    }

    // vfmaq(c, a, b) = c + a * b with a single rounding.
    #[inline(always)]
    fn fma(a: float32x4_t, b: float32x4_t, c: float32x4_t) -> float32x4_t {
        unsafe { vfmaq_f32(c, a, b) }
    }

    #[inline(always)]
    fn fms(a: float32x4_t, b: float32x4_t, c: float32x4_t) -> float32x4_t {
        unsafe { vfmaq_f32(vnegq_f32(c), a, b) }
    }

    #[inline(always)]
    fn fnma(a: float32x4_t, b: float32x4_t, c: float32x4_t) -> float32x4_t {
        unsafe { vfmsq_f32(c, a, b) }
    }

    #[inline(always)]
    fn fnms(a: float32x4_t, b: float32x4_t, c: float32x4_t) -> float32x4_t {
        unsafe { vfmsq_f32(vnegq_f32(c), a, b) }
    }

    #[inline(always)]
    fn bitand(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vreinterpretq_f32_u32(vandq_u32(vreinterpretq_u32_f32(a), vreinterpretq_u32_f32(b))) }
    }

    #[inline(always)]
    fn bitor(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vreinterpretq_f32_u32(vorrq_u32(vreinterpretq_u32_f32(a), vreinterpretq_u32_f32(b))) }
    }

    #[inline(always)]
    fn bitxor(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vreinterpretq_f32_u32(veorq_u32(vreinterpretq_u32_f32(a), vreinterpretq_u32_f32(b))) }
    }

    #[inline(always)]
    fn bitnot(a: float32x4_t) -> float32x4_t {
        unsafe { vreinterpretq_f32_u32(vmvnq_u32(vreinterpretq_u32_f32(a))) }
    }

    #[inline(always)]
    fn andnot(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vreinterpretq_f32_u32(vbicq_u32(vreinterpretq_u32_f32(a), vreinterpretq_u32_f32(b))) }
    }

    #[inline(always)]
    fn eq(a: float32x4_t, b: float32x4_t) -> uint32x4_t {
        unsafe { vceqq_f32(a, b) }
    }

    #[inline(always)]
    fn ne(a: float32x4_t, b: float32x4_t) -> uint32x4_t {
        unsafe { vmvnq_u32(vceqq_f32(a, b)) }
    }

    #[inline(always)]
    fn lt(a: float32x4_t, b: float32x4_t) -> uint32x4_t {
        unsafe { vcltq_f32(a, b) }
    }

    #[inline(always)]
    fn le(a: float32x4_t, b: float32x4_t) -> uint32x4_t {
        unsafe { vcleq_f32(a, b) }
    }

    #[inline(always)]
    fn gt(a: float32x4_t, b: float32x4_t) -> uint32x4_t {
        unsafe { vcgtq_f32(a, b) }
    }

    #[inline(always)]
    fn ge(a: float32x4_t, b: float32x4_t) -> uint32x4_t {
        unsafe { vcgeq_f32(a, b) }
    }

    #[inline(always)]
    fn select(mask: uint32x4_t, a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vbslq_f32(mask, a, b) }
    }

    #[inline(always)]
    fn hadd(a: float32x4_t) -> f32 {
        unsafe { vpadds_f32(vadd_f32(vget_low_f32(a), vget_high_f32(a))) }
    }

    #[inline(always)]
    fn sqrt(a: float32x4_t) -> float32x4_t {
        unsafe { vsqrtq_f32(a) }
    }

    // fcvtzs already saturates and maps NaN to zero.
    #[inline(always)]
    fn to_int(a: float32x4_t) -> [i32; 4] {
        let mut out = [0i32; 4];
        unsafe { vst1q_s32(out.as_mut_ptr(), vcvtq_s32_f32(a)) };
        out
    }

    #[inline(always)]
    fn mask_from_bitmask(bits: u64) -> uint32x4_t {
        unsafe { bitmask_u32(bits) }
    }

    #[inline(always)]
    fn mask_to_bitmask(mask: uint32x4_t) -> u64 {
        unsafe { movemask_u32(mask) }
    }

    #[inline(always)]
    fn mask_and(a: uint32x4_t, b: uint32x4_t) -> uint32x4_t {
        unsafe { vandq_u32(a, b) }
    }

    #[inline(always)]
    fn mask_or(a: uint32x4_t, b: uint32x4_t) -> uint32x4_t {
        unsafe { vorrq_u32(a, b) }
    }

    #[inline(always)]
    fn mask_xor(a: uint32x4_t, b: uint32x4_t) -> uint32x4_t {
        unsafe { veorq_u32(a, b) }
    }

    #[inline(always)]
    fn mask_not(a: uint32x4_t) -> uint32x4_t {
        unsafe { vmvnq_u32(a) }
    }

    #[inline(always)]
    fn mask_andnot(a: uint32x4_t, b: uint32x4_t) -> uint32x4_t {
        unsafe { vbicq_u32(a, b) }
    }

    #[inline(always)]
    fn mask_all(mask: uint32x4_t) -> bool {
        unsafe { vminvq_u32(mask) != 0 }
    }

    #[inline(always)]
    fn mask_any(mask: uint32x4_t) -> bool {
        unsafe { vmaxvq_u32(mask) != 0 }
    }
}

// ============================================================================
// f64 x 2
// ============================================================================

impl Kernel<f64, 2> for Neon {
    type Reg = float64x2_t;
    type Mask = uint64x2_t;
    const ALIGNMENT: usize = 16;

    #[inline(always)]
    fn splat(value: f64) -> float64x2_t {
        unsafe { vdupq_n_f64(value) }
    }

    #[inline(always)]
    fn from_array(lanes: [f64; 2]) -> float64x2_t {
        unsafe { vld1q_f64(lanes.as_ptr()) }
    }

    #[inline(always)]
    fn to_array(reg: float64x2_t) -> [f64; 2] {
        let mut out = [0.0f64; 2];
        unsafe { vst1q_f64(out.as_mut_ptr(), reg) };
        out
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f64) -> float64x2_t {
        vld1q_f64(ptr)
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const f64) -> float64x2_t {
        vld1q_f64(ptr)
    }

    #[inline(always)]
    unsafe fn store_aligned(reg: float64x2_t, ptr: *mut f64) {
        vst1q_f64(ptr, reg)
    }

    #[inline(always)]
    unsafe fn store_unaligned(reg: float64x2_t, ptr: *mut f64) {
        vst1q_f64(ptr, reg)
    }

    #[inline(always)]
    fn add(a: float64x2_t, b: float64x2_t) -> float64x2_t {
        unsafe { vaddq_f64(a, b) }
    }

    #[inline(always)]
    fn sub(a: float64x2_t, b: float64x2_t) -> float64x2_t {
        unsafe { vsubq_f64(a, b) }
    }

    #[inline(always)]
    fn mul(a: float64x2_t, b: float64x2_t) -> float64x2_t {
        unsafe { vmulq_f64(a, b) }
    }

    #[inline(always)]
    fn div(a: float64x2_t, b: float64x2_t) -> float64x2_t {
        unsafe { vdivq_f64(a, b) }
    }

    #[inline(always)]
    fn neg(a: float64x2_t) -> float64x2_t {
        unsafe { vnegq_f64(a) }
    }

    #[inline(always)]
    fn min(a: float64x2_t, b: float64x2_t) -> float64x2_t {
        unsafe { vbslq_f64(vcltq_f64(a, b), a, b) }
    }

    #[inline(always)]
    fn max(a: float64x2_t, b: float64x2_t) -> float64x2_t {
        unsafe { vbslq_f64(vcgtq_f64(a, b), a, b) }
    }

    #[inline(always)]
    fn abs(a: float64x2_t) -> float64x2_t {
        unsafe { vabsq_f64(a) }
    }

    #[inline(always)]
    fn fma(a: float64x2_t, b: float64x2_t, c: float64x2_t) -> float64x2_t {
        unsafe { vfmaq_f64(c, a, b) }
    }

    #[inline(always)]
    fn fms(a: float64x2_t, b: float64x2_t, c: float64x2_t) -> float64x2_t {
        unsafe { vfmaq_f64(vnegq_f64(c), a, b) }
    }

    #[inline(always)]
    fn fnma(a: float64x2_t, b: float64x2_t, c: float64x2_t) -> float64x2_t {
        unsafe { vfmsq_f64(c, a, b) }
    }

    #[inline(always)]
    fn fnms(a: float64x2_t, b: float64x2_t, c: float64x2_t) -> float64x2_t {
        unsafe { vfmsq_f64(vnegq_f64(c), a, b) }
    }

    #[inline(always)]
    fn bitand(a: float64x2_t, b: float64x2_t) -> float64x2_t {
        unsafe { vreinterpretq_f64_u64(vandq_u64(vreinterpretq_u64_f64(a), vreinterpretq_u64_f64(b))) }
    }

    #[inline(always)]
    fn bitor(a: float64x2_t, b: float64x2_t) -> float64x2_t {
        unsafe { vreinterpretq_f64_u64(vorrq_u64(vreinterpretq_u64_f64(a), vreinterpretq_u64_f64(b))) }
    }

    #[inline(always)]
    fn bitxor(a: float64x2_t, b: float64x2_t) -> float64x2_t {
        unsafe { vreinterpretq_f64_u64(veorq_u64(vreinterpretq_u64_f64(a), vreinterpretq_u64_f64(b))) }
    }

    #[inline(always)]
    fn bitnot(a: float64x2_t) -> float64x2_t {
        unsafe { vreinterpretq_f64_u64(not_u64(vreinterpretq_u64_f64(a))) }
    }

    #[inline(always)]
    fn andnot(a: float64x2_t, b: float64x2_t) -> float64x2_t {
        unsafe { vreinterpretq_f64_u64(vbicq_u64(vreinterpretq_u64_f64(a), vreinterpretq_u64_f64(b))) }
    }

    #[inline(always)]
    fn eq(a: float64x2_t, b: float64x2_t) -> uint64x2_t {
        unsafe { vceqq_f64(a, b) }
    }

    #[inline(always)]
    fn ne(a: float64x2_t, b: float64x2_t) -> uint64x2_t {
        unsafe { not_u64(vceqq_f64(a, b)) }
    }

    #[inline(always)]
    fn lt(a: float64x2_t, b: float64x2_t) -> uint64x2_t {
        unsafe { vcltq_f64(a, b) }
    }

    #[inline(always)]
    fn le(a: float64x2_t, b: float64x2_t) -> uint64x2_t {
        unsafe { vcleq_f64(a, b) }
    }

    #[inline(always)]
    fn gt(a: float64x2_t, b: float64x2_t) -> uint64x2_t {
        unsafe { vcgtq_f64(a, b) }
    }

    #[inline(always)]
    fn ge(a: float64x2_t, b: float64x2_t) -> uint64x2_t {
        unsafe { vcgeq_f64(a, b) }
    }

    #[inline(always)]
    fn select(mask: uint64x2_t, a: float64x2_t, b: float64x2_t) -> float64x2_t {
        unsafe { vbslq_f64(mask, a, b) }
    }

    #[inline(always)]
    fn hadd(a: float64x2_t) -> f64 {
        unsafe { vpaddd_f64(a) }
    }

    #[inline(always)]
    fn sqrt(a: float64x2_t) -> float64x2_t {
        unsafe { vsqrtq_f64(a) }
    }

    #[inline(always)]
    fn to_int(a: float64x2_t) -> [i64; 2] {
        let mut out = [0i64; 2];
        unsafe { vst1q_s64(out.as_mut_ptr(), vcvtq_s64_f64(a)) };
        out
    }

    #[inline(always)]
    fn mask_from_bitmask(bits: u64) -> uint64x2_t {
        unsafe { bitmask_u64(bits) }
    }

    #[inline(always)]
    fn mask_to_bitmask(mask: uint64x2_t) -> u64 {
        unsafe { movemask_u64(mask) }
    }

    #[inline(always)]
    fn mask_and(a: uint64x2_t, b: uint64x2_t) -> uint64x2_t {
        unsafe { vandq_u64(a, b) }
    }

    #[inline(always)]
    fn mask_or(a: uint64x2_t, b: uint64x2_t) -> uint64x2_t {
        unsafe { vorrq_u64(a, b) }
    }

    #[inline(always)]
    fn mask_xor(a: uint64x2_t, b: uint64x2_t) -> uint64x2_t {
        unsafe { veorq_u64(a, b) }
    }

    #[inline(always)]
    fn mask_not(a: uint64x2_t) -> uint64x2_t {
        unsafe { not_u64(a) }
    }

    #[inline(always)]
    fn mask_andnot(a: uint64x2_t, b: uint64x2_t) -> uint64x2_t {
        unsafe { vbicq_u64(a, b) }
    }
}

// ============================================================================
// i32 x 4
// ============================================================================

impl Kernel<i32, 4> for Neon {
    type Reg = int32x4_t;
    type Mask = uint32x4_t;
    const ALIGNMENT: usize = 16;

    #[inline(always)]
    fn splat(value: i32) -> int32x4_t {
        unsafe { vdupq_n_s32(value) }
    }

    #[inline(always)]
    fn from_array(lanes: [i32; 4]) -> int32x4_t {
        unsafe { vld1q_s32(lanes.as_ptr()) }
    }

    #[inline(always)]
    fn to_array(reg: int32x4_t) -> [i32; 4] {
        let mut out = [0i32; 4];
        unsafe { vst1q_s32(out.as_mut_ptr(), reg) };
        out
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const i32) -> int32x4_t {
        vld1q_s32(ptr)
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const i32) -> int32x4_t {
        vld1q_s32(ptr)
    }

    #[inline(always)]
    unsafe fn store_aligned(reg: int32x4_t, ptr: *mut i32) {
        vst1q_s32(ptr, reg)
    }

    #[inline(always)]
    unsafe fn store_unaligned(reg: int32x4_t, ptr: *mut i32) {
        vst1q_s32(ptr, reg)
    }

    #[inline(always)]
    fn add(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe { vaddq_s32(a, b) }
    }

    #[inline(always)]
    fn sub(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe { vsubq_s32(a, b) }
    }

    #[inline(always)]
    fn mul(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe { vmulq_s32(a, b) }
    }

    #[inline(always)]
    fn div(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        if BUILD.fast_int_division() {
            let q = unsafe { vdivq_f32(vcvtq_f32_s32(a), vcvtq_f32_s32(b)) };
            return unsafe { vcvtq_s32_f32(q) };
        }
        let (a, b) = (<Self as Kernel<i32, 4>>::to_array(a), <Self as Kernel<i32, 4>>::to_array(b));
        <Self as Kernel<i32, 4>>::from_array(zip_lanes(a, b, i32::lane_div))
    }

    #[inline(always)]
    fn neg(a: int32x4_t) -> int32x4_t {
        unsafe { vnegq_s32(a) }
    }

    #[inline(always)]
    fn min(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe { vminq_s32(a, b) }
    }

    #[inline(always)]
    fn max(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe { vmaxq_s32(a, b) }
    }

    #[inline(always)]
    fn abs(a: int32x4_t) -> int32x4_t {
        unsafe { vabsq_s32(a) }
    }

    #[inline(always)]
    fn fma(a: int32x4_t, b: int32x4_t, c: int32x4_t) -> int32x4_t {
        unsafe { vmlaq_s32(c, a, b) }
    }

    #[inline(always)]
    fn fms(a: int32x4_t, b: int32x4_t, c: int32x4_t) -> int32x4_t {
        unsafe { vsubq_s32(vmulq_s32(a, b), c) }
    }

    #[inline(always)]
    fn fnma(a: int32x4_t, b: int32x4_t, c: int32x4_t) -> int32x4_t {
        unsafe { vmlsq_s32(c, a, b) }
    }

    #[inline(always)]
    fn fnms(a: int32x4_t, b: int32x4_t, c: int32x4_t) -> int32x4_t {
        unsafe { vsubq_s32(vnegq_s32(vmulq_s32(a, b)), c) }
    }

    #[inline(always)]
    fn bitand(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe { vandq_s32(a, b) }
    }

    #[inline(always)]
    fn bitor(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe { vorrq_s32(a, b) }
    }

    #[inline(always)]
    fn bitxor(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe { veorq_s32(a, b) }
    }

    #[inline(always)]
    fn bitnot(a: int32x4_t) -> int32x4_t {
        unsafe { vmvnq_s32(a) }
    }

    #[inline(always)]
    fn andnot(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe { vbicq_s32(a, b) }
    }

    #[inline(always)]
    fn eq(a: int32x4_t, b: int32x4_t) -> uint32x4_t {
        unsafe { vceqq_s32(a, b) }
    }

    #[inline(always)]
    fn ne(a: int32x4_t, b: int32x4_t) -> uint32x4_t {
        unsafe { vmvnq_u32(vceqq_s32(a, b)) }
    }

    #[inline(always)]
    fn lt(a: int32x4_t, b: int32x4_t) -> uint32x4_t {
        unsafe { vcltq_s32(a, b) }
    }

    #[inline(always)]
    fn le(a: int32x4_t, b: int32x4_t) -> uint32x4_t {
        unsafe { vcleq_s32(a, b) }
    }

    #[inline(always)]
    fn gt(a: int32x4_t, b: int32x4_t) -> uint32x4_t {
        unsafe { vcgtq_s32(a, b) }
    }

    #[inline(always)]
    fn ge(a: int32x4_t, b: int32x4_t) -> uint32x4_t {
        unsafe { vcgeq_s32(a, b) }
    }

    #[inline(always)]
    fn select(mask: uint32x4_t, a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe { vbslq_s32(mask, a, b) }
    }

    #[inline(always)]
    fn hadd(a: int32x4_t) -> i32 {
        unsafe { vaddvq_s32(a) }
    }

    #[inline(always)]
    fn to_float(a: int32x4_t) -> [f32; 4] {
        <Neon as Kernel<f32, 4>>::to_array(unsafe { vcvtq_f32_s32(a) })
    }

    #[inline(always)]
    fn mask_from_bitmask(bits: u64) -> uint32x4_t {
        unsafe { bitmask_u32(bits) }
    }

    #[inline(always)]
    fn mask_to_bitmask(mask: uint32x4_t) -> u64 {
        unsafe { movemask_u32(mask) }
    }

    #[inline(always)]
    fn mask_and(a: uint32x4_t, b: uint32x4_t) -> uint32x4_t {
        unsafe { vandq_u32(a, b) }
    }

    #[inline(always)]
    fn mask_or(a: uint32x4_t, b: uint32x4_t) -> uint32x4_t {
        unsafe { vorrq_u32(a, b) }
    }

    #[inline(always)]
    fn mask_xor(a: uint32x4_t, b: uint32x4_t) -> uint32x4_t {
        unsafe { veorq_u32(a, b) }
    }

    #[inline(always)]
    fn mask_not(a: uint32x4_t) -> uint32x4_t {
        unsafe { vmvnq_u32(a) }
    }

    #[inline(always)]
    fn mask_andnot(a: uint32x4_t, b: uint32x4_t) -> uint32x4_t {
        unsafe { vbicq_u32(a, b) }
    }

    #[inline(always)]
    fn mask_all(mask: uint32x4_t) -> bool {
        unsafe { vminvq_u32(mask) != 0 }
    }

    #[inline(always)]
    fn mask_any(mask: uint32x4_t) -> bool {
        unsafe { vmaxvq_u32(mask) != 0 }
    }
}
