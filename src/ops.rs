//! Free-function vocabulary over batches.
//!
//! Each function forwards to the matching [`Batch`] or [`BoolBatch`] method, so
//! generic code can be written as `fma(a, b, c)` rather than `a.fma(b, c)`.

use crate::batch::Batch;
use crate::batch_bool::BoolBatch;
use crate::dispatch::Supported;
use crate::types::FloatElement;

pub use crate::cast::{batch_cast, bitwise_cast, narrow, to_float, to_int, widen};
pub use crate::traits::{byte_width, lanes};

#[inline(always)]
pub fn min<T: Supported<N>, const N: usize>(a: Batch<T, N>, b: Batch<T, N>) -> Batch<T, N> {
    a.min(b)
}

#[inline(always)]
pub fn max<T: Supported<N>, const N: usize>(a: Batch<T, N>, b: Batch<T, N>) -> Batch<T, N> {
    a.max(b)
}

#[inline(always)]
pub fn abs<T: Supported<N>, const N: usize>(a: Batch<T, N>) -> Batch<T, N> {
    a.abs()
}

#[inline(always)]
pub fn sqrt<T: Supported<N> + FloatElement, const N: usize>(a: Batch<T, N>) -> Batch<T, N> {
    a.sqrt()
}

/// `a * b + c`.
#[inline(always)]
pub fn fma<T: Supported<N>, const N: usize>(
    a: Batch<T, N>,
    b: Batch<T, N>,
    c: Batch<T, N>,
) -> Batch<T, N> {
    a.fma(b, c)
}

/// `a * b - c`.
#[inline(always)]
pub fn fms<T: Supported<N>, const N: usize>(
    a: Batch<T, N>,
    b: Batch<T, N>,
    c: Batch<T, N>,
) -> Batch<T, N> {
    a.fms(b, c)
}

/// `-(a * b) + c`.
#[inline(always)]
pub fn fnma<T: Supported<N>, const N: usize>(
    a: Batch<T, N>,
    b: Batch<T, N>,
    c: Batch<T, N>,
) -> Batch<T, N> {
    a.fnma(b, c)
}

/// `-(a * b) - c`.
#[inline(always)]
pub fn fnms<T: Supported<N>, const N: usize>(
    a: Batch<T, N>,
    b: Batch<T, N>,
    c: Batch<T, N>,
) -> Batch<T, N> {
    a.fnms(b, c)
}

#[inline(always)]
pub fn hadd<T: Supported<N>, const N: usize>(a: Batch<T, N>) -> T {
    a.hadd()
}

#[inline(always)]
pub fn haddp<T: Supported<N>, const N: usize>(rows: [Batch<T, N>; N]) -> Batch<T, N> {
    Batch::haddp(rows)
}

#[inline(always)]
pub fn select<T: Supported<N>, const N: usize>(
    cond: BoolBatch<T, N>,
    a: Batch<T, N>,
    b: Batch<T, N>,
) -> Batch<T, N> {
    Batch::select(cond, a, b)
}

#[inline(always)]
pub fn isnan<T: Supported<N> + FloatElement, const N: usize>(a: Batch<T, N>) -> BoolBatch<T, N> {
    a.isnan()
}

#[inline(always)]
pub fn all<T: Supported<N>, const N: usize>(p: BoolBatch<T, N>) -> bool {
    p.all()
}

#[inline(always)]
pub fn any<T: Supported<N>, const N: usize>(p: BoolBatch<T, N>) -> bool {
    p.any()
}

/// `a & !b`.
#[inline(always)]
pub fn andnot<T: Supported<N>, const N: usize>(a: Batch<T, N>, b: Batch<T, N>) -> Batch<T, N> {
    a.andnot(b)
}

#[inline(always)]
pub fn incr<T: Supported<N>, const N: usize>(a: Batch<T, N>) -> Batch<T, N> {
    a.incr()
}

#[inline(always)]
pub fn decr<T: Supported<N>, const N: usize>(a: Batch<T, N>) -> Batch<T, N> {
    a.decr()
}

/// `incr` on the lanes where `cond` is set.
#[inline(always)]
pub fn incr_if<T: Supported<N>, const N: usize>(a: Batch<T, N>, cond: BoolBatch<T, N>) -> Batch<T, N> {
    Batch::select(cond, a.incr(), a)
}

/// `decr` on the lanes where `cond` is set.
#[inline(always)]
pub fn decr_if<T: Supported<N>, const N: usize>(a: Batch<T, N>, cond: BoolBatch<T, N>) -> Batch<T, N> {
    Batch::select(cond, a.decr(), a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_select_on_comparison() {
        let a = Batch::<f32, 4>::new([1.0, 5.0, 3.0, 7.0]);
        let b = Batch::<f32, 4>::new([4.0, 2.0, 6.0, 0.0]);
        assert_eq!(select(a.simd_lt(b), a, b).to_array(), [1.0, 2.0, 3.0, 0.0]);
        assert_eq!(min(a, b), select(a.simd_lt(b), a, b));
        assert_eq!(max(a, b).to_array(), [4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_arithmetic_vocabulary() {
        let a = Batch::<f64, 4>::new([4.0, -9.0, 16.0, 0.25]);
        assert_eq!(sqrt(abs(a)).to_array(), [2.0, 3.0, 4.0, 0.5]);
        let one = Batch::splat(1.0);
        assert_eq!(fma(a, one, one).to_array(), [5.0, -8.0, 17.0, 1.25]);
        assert_eq!(fms(a, one, one).to_array(), [3.0, -10.0, 15.0, -0.75]);
        assert_eq!(fnma(a, one, one).to_array(), [-3.0, 10.0, -15.0, 0.75]);
        assert_eq!(fnms(a, one, one).to_array(), [-5.0, 8.0, -17.0, -1.25]);
        assert_eq!(hadd(a), 11.25);
        assert_eq!(incr(a).to_array(), [5.0, -8.0, 17.0, 1.25]);
        assert_eq!(decr(a).to_array(), [3.0, -10.0, 15.0, -0.75]);
    }

    #[test]
    fn test_predicates() {
        let a = Batch::<f32, 8>::new([0.0, f32::NAN, 1.0, 2.0, f32::NAN, 3.0, 4.0, 5.0]);
        let nan = isnan(a);
        assert_eq!(nan.to_bitmask(), 0b0001_0010);
        assert!(any(nan));
        assert!(!all(nan));
        assert!(all(!nan | nan));
    }

    #[test]
    fn test_bit_helpers() {
        let a = Batch::<u32, 4>::new([0xff, 0xf0, 0x0f, 0]);
        let b = Batch::<u32, 4>::splat(0x3c);
        assert_eq!(andnot(a, b).to_array(), [0xc3, 0xc0, 0x03, 0]);
    }

    #[test]
    fn test_conditional_increment() {
        let counts = Batch::<i32, 4>::new([0, 10, 20, 30]);
        let hit = BoolBatch::from_bitmask(0b0101);
        assert_eq!(incr_if(counts, hit).to_array(), [1, 10, 21, 30]);
        assert_eq!(decr_if(counts, !hit).to_array(), [0, 9, 20, 29]);
    }

    #[test]
    fn test_haddp_free_function() {
        let rows = [
            Batch::<i32, 4>::new([1, 2, 3, 4]),
            Batch::<i32, 4>::new([5, 6, 7, 8]),
            Batch::<i32, 4>::new([9, 10, 11, 12]),
            Batch::<i32, 4>::new([13, 14, 15, 16]),
        ];
        assert_eq!(haddp(rows).to_array(), rows.map(hadd));
        assert_eq!(lanes::<Batch<i32, 4>>(), 4);
    }
}
