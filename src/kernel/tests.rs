//! Kernel parity tests.
//!
//! Every kernel compiled into this build runs the same randomized corpus as
//! the array fallback and must produce identical lanes. NaN lanes only have to
//! agree on being NaN.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::kernel::traits::{lane_bits, pairwise_sum, Kernel};
use crate::kernel::{Fallback, Portable, Split};
use crate::types::{Element, FloatElement, IntToFloat};

const SEED: u64 = 0x5eed_ba7c;
const ROUNDS: usize = 200;

// ============================================================================
// Corpus
// ============================================================================

trait Sample: Element {
    fn sample(rng: &mut StdRng) -> Self;

    /// Sample that is safe as a divisor.
    fn divisor(rng: &mut StdRng) -> Self;
}

macro_rules! float_sample {
    ($($t:ident),*) => {$(
        impl Sample for $t {
            fn sample(rng: &mut StdRng) -> Self {
                const EDGES: [$t; 12] = [
                    0.0,
                    -0.0,
                    1.0,
                    -1.0,
                    0.5,
                    $t::MIN_POSITIVE,
                    $t::MAX,
                    $t::MIN,
                    $t::INFINITY,
                    $t::NEG_INFINITY,
                    $t::NAN,
                    2_147_483_648.0,
                ];
                if rng.gen_ratio(1, 8) {
                    EDGES[rng.gen_range(0..EDGES.len())]
                } else {
                    rng.gen_range(-1.0e6..1.0e6)
                }
            }

            fn divisor(rng: &mut StdRng) -> Self {
                Self::sample(rng)
            }
        }
    )*};
}

macro_rules! int_sample {
    ($($t:ident),*) => {$(
        impl Sample for $t {
            fn sample(rng: &mut StdRng) -> Self {
                const EDGES: [$t; 5] = [0, 1, 2, $t::MIN, $t::MAX];
                if rng.gen_ratio(1, 8) {
                    EDGES[rng.gen_range(0..EDGES.len())]
                } else {
                    rng.gen()
                }
            }

            fn divisor(rng: &mut StdRng) -> Self {
                loop {
                    let d = Self::sample(rng);
                    if d != 0 {
                        return d;
                    }
                }
            }
        }
    )*};
}

float_sample!(f32, f64);
int_sample!(i8, u8, i16, u16, i32, u32, i64, u64);

fn same_bits<T: Element>(a: T, b: T) -> bool {
    #[allow(clippy::eq_op)]
    let both_nan = a != a && b != b;
    bytemuck::bytes_of(&a) == bytemuck::bytes_of(&b) || both_nan
}

fn assert_lanes<T: Element, const N: usize>(op: &str, got: [T; N], want: [T; N]) {
    for i in 0..N {
        assert!(
            same_bits(got[i], want[i]),
            "{op} on {}x{N}: lane {i} got {:?}, want {:?}",
            T::NAME,
            got[i],
            want[i]
        );
    }
}

// ============================================================================
// Harness
// ============================================================================

fn check_kernel<T, K, const N: usize>(rng: &mut StdRng)
where
    T: Sample,
    K: Kernel<T, N>,
{
    type F = Fallback;

    for _ in 0..ROUNDS {
        let a: [T; N] = std::array::from_fn(|_| T::sample(rng));
        let b: [T; N] = std::array::from_fn(|_| T::sample(rng));
        let c: [T; N] = std::array::from_fn(|_| T::sample(rng));
        let d: [T; N] = std::array::from_fn(|_| T::divisor(rng));
        let bits: u64 = rng.gen::<u64>() & lane_bits(N);

        let (ka, kb, kc, kd) = (K::from_array(a), K::from_array(b), K::from_array(c), K::from_array(d));
        assert_lanes("round trip", K::to_array(ka), a);

        macro_rules! unary {
            ($($op:ident),*) => {$(
                assert_lanes(stringify!($op), K::to_array(K::$op(ka)), <F as Kernel<T, N>>::$op(a));
            )*};
        }
        macro_rules! binary {
            ($($op:ident),*) => {$(
                assert_lanes(stringify!($op), K::to_array(K::$op(ka, kb)), <F as Kernel<T, N>>::$op(a, b));
            )*};
        }
        macro_rules! ternary {
            ($($op:ident),*) => {$(
                assert_lanes(
                    stringify!($op),
                    K::to_array(K::$op(ka, kb, kc)),
                    <F as Kernel<T, N>>::$op(a, b, c),
                );
            )*};
        }
        macro_rules! compare {
            ($($op:ident),*) => {$(
                assert_eq!(
                    K::mask_to_bitmask(K::$op(ka, kb)),
                    <F as Kernel<T, N>>::mask_to_bitmask(<F as Kernel<T, N>>::$op(a, b)),
                    "{} on {}x{}", stringify!($op), T::NAME, N
                );
            )*};
        }

        unary!(neg, abs, bitnot);
        binary!(add, sub, mul, min, max, bitand, bitor, bitxor, andnot);
        ternary!(fma, fms, fnma, fnms);
        compare!(eq, ne, lt, le, gt, ge);

        assert_lanes("div", K::to_array(K::div(ka, kd)), <F as Kernel<T, N>>::div(a, d));
        assert_lanes("rem", K::to_array(K::rem(ka, kd)), <F as Kernel<T, N>>::rem(a, d));

        let km = K::mask_from_bitmask(bits);
        let fm = <F as Kernel<T, N>>::mask_from_bitmask(bits);
        assert_eq!(K::mask_to_bitmask(km), bits);
        assert_lanes("select", K::to_array(K::select(km, ka, kb)), <F as Kernel<T, N>>::select(fm, a, b));

        let other = K::lt(ka, kb);
        let masks = [
            ("mask_and", K::mask_and(km, other)),
            ("mask_or", K::mask_or(km, other)),
            ("mask_xor", K::mask_xor(km, other)),
            ("mask_andnot", K::mask_andnot(km, other)),
            ("mask_not", K::mask_not(km)),
        ];
        let other_bits = K::mask_to_bitmask(other);
        let expected = [
            bits & other_bits,
            bits | other_bits,
            bits ^ other_bits,
            bits & !other_bits,
            !bits & lane_bits(N),
        ];
        for ((name, mask), want) in masks.into_iter().zip(expected) {
            assert_eq!(K::mask_to_bitmask(mask), want, "{name} on {}x{N}", T::NAME);
        }
        assert_eq!(K::mask_all(km), bits == lane_bits(N));
        assert_eq!(K::mask_any(km), bits != 0);
        assert_eq!(K::mask_to_array(km), <F as Kernel<T, N>>::mask_to_array(fm));

        assert!(
            same_bits(K::hadd(ka), pairwise_sum(a)),
            "hadd on {}x{N}: got {:?}, want {:?}",
            T::NAME,
            K::hadd(ka),
            pairwise_sum(a)
        );

        let rows: [K::Reg; N] = std::array::from_fn(|i| if i % 2 == 0 { ka } else { kb });
        let want: [T; N] = std::array::from_fn(|i| pairwise_sum(if i % 2 == 0 { a } else { b }));
        assert_lanes("haddp", K::to_array(K::haddp(rows)), want);

        let mut out = [T::ZERO; N];
        unsafe {
            let loaded = K::load_unaligned(c.as_ptr());
            K::store_unaligned(loaded, out.as_mut_ptr());
        }
        assert_lanes("load/store", out, c);
    }
}

fn check_float_kernel<T, K, const N: usize>(rng: &mut StdRng)
where
    T: Sample + FloatElement,
    K: Kernel<T, N>,
{
    check_kernel::<T, K, N>(rng);
    for _ in 0..ROUNDS {
        let a: [T; N] = std::array::from_fn(|_| T::sample(rng));
        let ka = K::from_array(a);
        assert_lanes("sqrt", K::to_array(K::sqrt(ka)), <Fallback as Kernel<T, N>>::sqrt(a));
        assert_lanes("to_int", K::to_int(ka), <Fallback as Kernel<T, N>>::to_int(a));
    }
}

fn check_int_kernel<T, K, const N: usize>(rng: &mut StdRng)
where
    T: Sample + IntToFloat,
    K: Kernel<T, N>,
{
    check_kernel::<T, K, N>(rng);
    for _ in 0..ROUNDS {
        let a: [T; N] = std::array::from_fn(|_| T::sample(rng));
        let ka = K::from_array(a);
        assert_lanes("to_float", K::to_float(ka), <Fallback as Kernel<T, N>>::to_float(a));
    }
}

// ============================================================================
// Reference kernel
// ============================================================================

#[test]
fn test_pairwise_sum_order() {
    // Sequential order loses both ones to rounding; the halving tree keeps them.
    assert_eq!(pairwise_sum([1.0e8f32, 1.0, -1.0e8, 1.0]), 2.0);
    assert_eq!(pairwise_sum([1i32, 2, 3]), 6);
    assert_eq!(pairwise_sum([5u8]), 5);
    assert_eq!(pairwise_sum::<f64, 0>([]), 0.0);
}

#[test]
fn test_lane_bits() {
    assert_eq!(lane_bits(0), 0);
    assert_eq!(lane_bits(4), 0b1111);
    assert_eq!(lane_bits(64), u64::MAX);
}

#[test]
fn test_fallback_integer_lanes() {
    type F = Fallback;
    let a = [250u8, 3, 0, 128];
    let b = [10u8, 4, 1, 128];
    assert_eq!(<F as Kernel<u8, 4>>::add(a, b), [4, 7, 1, 0]);
    assert_eq!(<F as Kernel<u8, 4>>::sub(a, b), [240, 255, 255, 0]);
    assert_eq!(<F as Kernel<u8, 4>>::min(a, b), [10, 3, 0, 128]);
    assert_eq!(<F as Kernel<u8, 4>>::mask_to_bitmask(<F as Kernel<u8, 4>>::lt(a, b)), 0b0110);
    assert_eq!(<F as Kernel<u8, 4>>::hadd(a), 125);

    let wide = [i64::MIN, -1];
    assert_eq!(<F as Kernel<i64, 2>>::abs(wide), [i64::MIN, 1]);
    assert_eq!(<F as Kernel<i64, 2>>::neg(wide), [i64::MIN, 1]);
}

#[test]
fn test_fallback_odd_lane_counts() {
    let mut rng = StdRng::seed_from_u64(SEED);
    check_kernel::<u16, Fallback, 1>(&mut rng);
    check_kernel::<i8, Fallback, 64>(&mut rng);
    check_kernel::<u64, Fallback, 2>(&mut rng);
    check_float_kernel::<f64, Fallback, 16>(&mut rng);
}

// ============================================================================
// Portable and split kernels
// ============================================================================

#[test]
fn test_portable_matches_fallback() {
    let mut rng = StdRng::seed_from_u64(SEED);
    check_float_kernel::<f32, Portable, 4>(&mut rng);
    check_float_kernel::<f32, Portable, 8>(&mut rng);
    check_float_kernel::<f64, Portable, 2>(&mut rng);
    check_float_kernel::<f64, Portable, 4>(&mut rng);
    check_int_kernel::<i32, Portable, 4>(&mut rng);
    check_int_kernel::<i32, Portable, 8>(&mut rng);
    check_kernel::<i16, Portable, 8>(&mut rng);
}

#[test]
fn test_split_portable_matches_fallback() {
    let mut rng = StdRng::seed_from_u64(SEED + 1);
    check_float_kernel::<f32, Split<Portable, 4>, 8>(&mut rng);
    check_float_kernel::<f32, Split<Split<Portable, 4>, 8>, 16>(&mut rng);
    check_float_kernel::<f64, Split<Portable, 4>, 8>(&mut rng);
    check_int_kernel::<i32, Split<Portable, 8>, 16>(&mut rng);
    check_kernel::<i16, Split<Portable, 8>, 16>(&mut rng);
}

#[test]
fn test_split_mask_halves() {
    type K = Split<Portable, 4>;
    let bits = 0b1001_0110;
    let mask = <K as Kernel<f32, 8>>::mask_from_bitmask(bits);
    assert_eq!(<K as Kernel<f32, 8>>::mask_to_bitmask(mask), bits);
    assert_eq!(
        <K as Kernel<f32, 8>>::mask_to_array(mask),
        [false, true, true, false, true, false, false, true]
    );
    assert!(!<K as Kernel<f32, 8>>::mask_all(mask));
    assert!(<K as Kernel<f32, 8>>::mask_all(<K as Kernel<f32, 8>>::mask_splat(true)));
}

// ============================================================================
// Native kernels
// ============================================================================

#[cfg(all(target_arch = "x86_64", target_feature = "sse2"))]
#[test]
fn test_sse2_matches_fallback() {
    use crate::kernel::Sse2;
    let mut rng = StdRng::seed_from_u64(SEED + 2);
    check_float_kernel::<f32, Sse2, 4>(&mut rng);
    check_float_kernel::<f64, Sse2, 2>(&mut rng);
    check_int_kernel::<i32, Sse2, 4>(&mut rng);
    check_float_kernel::<f32, Split<Sse2, 4>, 8>(&mut rng);
    check_int_kernel::<i32, Split<Split<Sse2, 4>, 8>, 16>(&mut rng);
}

#[cfg(all(target_arch = "x86_64", target_feature = "avx"))]
#[test]
fn test_avx_matches_fallback() {
    use crate::kernel::Avx;
    let mut rng = StdRng::seed_from_u64(SEED + 3);
    check_float_kernel::<f32, Avx, 8>(&mut rng);
    check_float_kernel::<f64, Avx, 4>(&mut rng);
    check_float_kernel::<f64, Split<Avx, 4>, 8>(&mut rng);
}

#[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
#[test]
fn test_avx2_matches_fallback() {
    use crate::kernel::Avx2;
    let mut rng = StdRng::seed_from_u64(SEED + 4);
    check_int_kernel::<i32, Avx2, 8>(&mut rng);
    check_int_kernel::<i32, Split<Avx2, 8>, 16>(&mut rng);
}

#[cfg(all(target_arch = "x86_64", target_feature = "avx512f"))]
#[test]
fn test_avx512_matches_fallback() {
    use crate::kernel::Avx512;
    let mut rng = StdRng::seed_from_u64(SEED + 5);
    check_float_kernel::<f32, Avx512, 16>(&mut rng);
    check_float_kernel::<f64, Avx512, 8>(&mut rng);
    check_int_kernel::<i32, Avx512, 16>(&mut rng);
}

#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
#[test]
fn test_neon_matches_fallback() {
    use crate::kernel::Neon;
    let mut rng = StdRng::seed_from_u64(SEED + 6);
    check_float_kernel::<f32, Neon, 4>(&mut rng);
    check_float_kernel::<f64, Neon, 2>(&mut rng);
    check_int_kernel::<i32, Neon, 4>(&mut rng);
    check_float_kernel::<f32, Split<Neon, 4>, 8>(&mut rng);
}
