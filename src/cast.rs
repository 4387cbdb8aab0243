//! Conversions between batch types.
//!
//! - [`bitwise_cast`] reinterprets bits between batches of equal byte width.
//! - [`batch_cast`] converts each lane with `as` semantics, keeping the lane count.
//! - [`to_int`] and [`to_float`] are the same-width conversions, routed to the kernel so
//!   native conversion instructions are used where they exist.
//! - [`widen`] and [`narrow`] change the lane count by a factor of two.
//!
//! Width mismatches are rejected while the crate compiles.

use std::mem::size_of;

use num_traits::AsPrimitive;

use crate::batch::Batch;
use crate::dispatch::Supported;
use crate::kernel::Kernel;
use crate::types::{FloatElement, IntToFloat};

/// Reinterpret the bits of `b` as a batch of the same byte width.
#[inline]
pub fn bitwise_cast<T, U, const N: usize, const M: usize>(b: Batch<T, N>) -> Batch<U, M>
where
    T: Supported<N>,
    U: Supported<M>,
{
    const {
        assert!(
            size_of::<[T; N]>() == size_of::<[U; M]>(),
            "bitwise_cast between batches of different byte width"
        )
    };
    Batch::new(bytemuck::cast::<[T; N], [U; M]>(b.to_array()))
}

/// Convert each lane to `U` with `as` semantics.
#[inline]
pub fn batch_cast<T, U, const N: usize>(b: Batch<T, N>) -> Batch<U, N>
where
    T: Supported<N> + AsPrimitive<U>,
    U: Supported<N>,
{
    Batch::new(b.to_array().map(|lane| lane.as_()))
}

/// Truncating float to same-width signed integer conversion; saturates, NaN becomes 0.
#[inline(always)]
pub fn to_int<T, const N: usize>(b: Batch<T, N>) -> Batch<T::Int, N>
where
    T: Supported<N> + FloatElement,
    T::Int: Supported<N>,
{
    Batch::new(T::Kernel::to_int(b.reg()))
}

/// Integer to same-width float conversion, rounding to nearest.
#[inline(always)]
pub fn to_float<T, const N: usize>(b: Batch<T, N>) -> Batch<T::Float, N>
where
    T: Supported<N> + IntToFloat,
    T::Float: Supported<N>,
{
    Batch::new(T::Kernel::to_float(b.reg()))
}

/// Split `b` into its low and high halves, converting each lane to the wider `U`.
#[inline]
pub fn widen<T, U, const N: usize, const M: usize>(b: Batch<T, N>) -> (Batch<U, M>, Batch<U, M>)
where
    T: Supported<N> + AsPrimitive<U>,
    U: Supported<M>,
{
    const {
        assert!(N == 2 * M, "widen produces two halves of N / 2 lanes");
        assert!(size_of::<U>() >= size_of::<T>(), "widen target must not be narrower");
    };
    let lanes = b.to_array();
    let lo = std::array::from_fn(|i| lanes[i].as_());
    let hi = std::array::from_fn(|i| lanes[M + i].as_());
    (Batch::new(lo), Batch::new(hi))
}

/// Join `lo` and `hi` into one batch, converting each lane to the narrower `U`.
///
/// Integer narrowing keeps the low bits.
#[inline]
pub fn narrow<T, U, const N: usize, const M: usize>(lo: Batch<T, N>, hi: Batch<T, N>) -> Batch<U, M>
where
    T: Supported<N> + AsPrimitive<U>,
    U: Supported<M>,
{
    const {
        assert!(M == 2 * N, "narrow joins two halves into 2 * N lanes");
        assert!(size_of::<U>() <= size_of::<T>(), "narrow target must not be wider");
    };
    let lo = lo.to_array();
    let hi = hi.to_array();
    Batch::new(std::array::from_fn(|i| {
        if i < N {
            lo[i].as_()
        } else {
            hi[i - N].as_()
        }
    }))
}

impl<T: Supported<N>, const N: usize> Batch<T, N> {
    /// Method form of [`bitwise_cast`].
    #[inline(always)]
    pub fn bitwise_cast<U: Supported<M>, const M: usize>(self) -> Batch<U, M> {
        bitwise_cast(self)
    }

    /// Method form of [`batch_cast`].
    #[inline(always)]
    pub fn cast<U: Supported<N>>(self) -> Batch<U, N>
    where
        T: AsPrimitive<U>,
    {
        batch_cast(self)
    }
}

impl<T: Supported<N> + FloatElement, const N: usize> Batch<T, N>
where
    T::Int: Supported<N>,
{
    /// Method form of [`to_int`].
    #[inline(always)]
    pub fn to_int(self) -> Batch<T::Int, N> {
        to_int(self)
    }
}

impl<T: Supported<N> + IntToFloat, const N: usize> Batch<T, N>
where
    T::Float: Supported<N>,
{
    /// Method form of [`to_float`].
    #[inline(always)]
    pub fn to_float(self) -> Batch<T::Float, N> {
        to_float(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitwise_cast_keeps_bits() {
        let a = Batch::<f32, 4>::new([1.0, -0.0, f32::INFINITY, 0.5]);
        let bits: Batch<u32, 4> = bitwise_cast(a);
        assert_eq!(
            bits.to_array(),
            [0x3f80_0000, 0x8000_0000, 0x7f80_0000, 0x3f00_0000]
        );
        let back: Batch<f32, 4> = bitwise_cast(bits);
        assert_eq!(back.to_array().map(f32::to_bits), a.to_array().map(f32::to_bits));
    }

    #[test]
    fn test_bitwise_cast_changes_lane_count() {
        let a = Batch::<u32, 4>::new([0x0403_0201, 0x0807_0605, 0, u32::MAX]);
        let bytes = a.bitwise_cast::<u8, 16>();
        let expected: [u8; 16] = bytemuck::cast(a.to_array());
        assert_eq!(bytes.to_array(), expected);
        assert_eq!(bytes.bitwise_cast::<u32, 4>(), a);

        let wide = Batch::<f64, 2>::new([1.5, -2.0]).bitwise_cast::<i32, 4>();
        assert_eq!(wide.bitwise_cast::<f64, 2>().to_array(), [1.5, -2.0]);
    }

    #[test]
    fn test_batch_cast_semantics() {
        let f = Batch::<f32, 4>::new([1.9, -1.9, f32::NAN, 3e10]);
        assert_eq!(f.cast::<i32>().to_array(), [1, -1, 0, i32::MAX]);
        assert_eq!(f.cast::<u8>().to_array(), [1, 0, 0, 255]);

        let s = Batch::<i8, 4>::new([-1, 2, i8::MIN, i8::MAX]);
        assert_eq!(s.cast::<i32>().to_array(), [-1, 2, -128, 127]);
        assert_eq!(s.cast::<u16>().to_array(), [0xffff, 2, 0xff80, 127]);

        let u = Batch::<u8, 4>::new([255, 0, 128, 1]);
        assert_eq!(u.cast::<i32>().to_array(), [255, 0, 128, 1]);

        let t = Batch::<i32, 4>::new([0x1ff, -1, 256, 127]);
        assert_eq!(t.cast::<i8>().to_array(), [-1, -1, 0, 127]);

        let d = Batch::<f64, 2>::new([0.1, 1e300]);
        assert_eq!(d.cast::<f32>().to_array(), [0.1f32, f32::INFINITY]);
    }

    #[test]
    fn test_to_int_matches_batch_cast() {
        let edges = [
            0.0f32, -0.0, 0.5, -0.5, 1.5, -2.5, 2147483648.0, -2147483904.0,
            f32::NAN, f32::INFINITY, f32::NEG_INFINITY, f32::MAX, f32::MIN, 1e-40, -7.99, 123456.7,
        ];
        for chunk in edges.chunks(8) {
            let b = Batch::<f32, 8>::from_slice(chunk);
            assert_eq!(b.to_int(), b.cast::<i32>());
        }
        let b16 = Batch::<f32, 16>::from_slice(&edges);
        assert_eq!(to_int(b16), batch_cast::<f32, i32, 16>(b16));

        let d = Batch::<f64, 4>::new([f64::NAN, -1e300, 9.3e18, -3.7]);
        assert_eq!(d.to_int().to_array(), [0, i64::MIN, i64::MAX, -3]);
    }

    #[test]
    fn test_to_float_matches_batch_cast() {
        let i = Batch::<i32, 8>::new([0, -1, i32::MIN, i32::MAX, 16_777_217, -16_777_217, 7, 1 << 30]);
        assert_eq!(i.to_float(), i.cast::<f32>());

        let u = Batch::<u32, 4>::new([u32::MAX, 0, 1 << 31, 3]);
        assert_eq!(u.to_float().to_array(), [4294967296.0, 0.0, 2147483648.0, 3.0]);

        let l = Batch::<u64, 2>::new([u64::MAX, 1]);
        assert_eq!(to_float(l).to_array(), [18446744073709551615.0, 1.0]);
    }

    #[test]
    fn test_widen_narrow_round_trip() {
        let a = Batch::<i16, 8>::new([-1, 2, -3, 4, i16::MIN, i16::MAX, 0, 7]);
        let (lo, hi): (Batch<i32, 4>, Batch<i32, 4>) = widen(a);
        assert_eq!(lo.to_array(), [-1, 2, -3, 4]);
        assert_eq!(hi.to_array(), [-32768, 32767, 0, 7]);
        let back: Batch<i16, 8> = narrow(lo, hi);
        assert_eq!(back, a);

        let f = Batch::<f32, 4>::new([0.25, -1.0, 3.5, f32::MAX]);
        let (lo, hi): (Batch<f64, 2>, Batch<f64, 2>) = widen(f);
        assert_eq!(hi.extract(1), f32::MAX as f64);
        assert_eq!(narrow::<f64, f32, 2, 4>(lo, hi), f);
    }

    #[test]
    fn test_narrow_truncates_integers() {
        let lo = Batch::<u16, 2>::new([0x1234, 0x00ff]);
        let hi = Batch::<u16, 2>::new([0xff00, 0xabcd]);
        let out: Batch<u8, 4> = narrow(lo, hi);
        assert_eq!(out.to_array(), [0x34, 0xff, 0x00, 0xcd]);
    }
}
