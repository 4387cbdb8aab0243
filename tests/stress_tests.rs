//! Stress tests for simd-batch.
//!
//! Random batches of every registered width are checked lane by lane against
//! the scalar semantics of their element type, and the slice algorithms run
//! over long inputs at every offset.

use rand::prelude::*;
use simd_batch::prelude::*;
use simd_batch::memory::aligned_from_slice;

const ROUNDS: usize = 500;

trait Random: Element {
    fn random(rng: &mut StdRng) -> Self;
}

macro_rules! random_int {
    ($($t:ty),*) => {$(
        impl Random for $t {
            fn random(rng: &mut StdRng) -> Self {
                match rng.gen_range(0..10) {
                    0 => <$t>::MIN,
                    1 => <$t>::MAX,
                    2 => 0,
                    _ => rng.gen(),
                }
            }
        }
    )*};
}

macro_rules! random_float {
    ($($t:ident),*) => {$(
        impl Random for $t {
            fn random(rng: &mut StdRng) -> Self {
                match rng.gen_range(0..16) {
                    0 => $t::NAN,
                    1 => $t::INFINITY,
                    2 => $t::NEG_INFINITY,
                    3 => -0.0,
                    4 => $t::MIN_POSITIVE / 4.0,
                    5 => $t::MAX,
                    _ => rng.gen_range(-1.0e4..1.0e4),
                }
            }
        }
    )*};
}

random_int!(i8, u8, i16, u16, i32, u32, i64, u64);
random_float!(f32, f64);

fn random_batch<T: Random + Supported<N>, const N: usize>(rng: &mut StdRng) -> Batch<T, N> {
    Batch::new(std::array::from_fn(|_| T::random(rng)))
}

/// Bit equality, except that any two NaNs match.
fn same<T: Element>(a: T, b: T) -> bool {
    let nan = |v: T| v.partial_cmp(&v).is_none();
    (nan(a) && nan(b)) || bytemuck::bytes_of(&a) == bytemuck::bytes_of(&b)
}

fn assert_lanes<T: Element, const N: usize>(what: &str, got: [T; N], expected: [T; N]) {
    for i in 0..N {
        assert!(
            same(got[i], expected[i]),
            "{what} lane {i}: got {:?}, expected {:?}",
            got[i],
            expected[i]
        );
    }
}

/// Lane-by-lane agreement with the scalar element semantics.
fn check_against_scalar<T: Random + Supported<N>, const N: usize>(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..ROUNDS {
        let a = random_batch::<T, N>(&mut rng);
        let b = random_batch::<T, N>(&mut rng);
        let c = random_batch::<T, N>(&mut rng);
        let (x, y, z) = (a.to_array(), b.to_array(), c.to_array());

        let zip = |f: fn(T, T) -> T| -> [T; N] { std::array::from_fn(|i| f(x[i], y[i])) };
        assert_lanes("add", (a + b).to_array(), zip(T::lane_add));
        assert_lanes("sub", (a - b).to_array(), zip(T::lane_sub));
        assert_lanes("mul", (a * b).to_array(), zip(T::lane_mul));
        assert_lanes("min", min(a, b).to_array(), zip(T::lane_min));
        assert_lanes("max", max(a, b).to_array(), zip(T::lane_max));
        assert_lanes("and", (a & b).to_array(), zip(T::lane_and));
        assert_lanes("or", (a | b).to_array(), zip(T::lane_or));
        assert_lanes("xor", (a ^ b).to_array(), zip(T::lane_xor));
        assert_lanes("neg", (-a).to_array(), x.map(T::lane_neg));
        assert_lanes("abs", abs(a).to_array(), x.map(T::lane_abs));
        assert_lanes(
            "fma",
            fma(a, b, c).to_array(),
            std::array::from_fn(|i| x[i].lane_fma(y[i], z[i])),
        );
        assert_lanes(
            "fnms",
            fnms(a, b, c).to_array(),
            std::array::from_fn(|i| x[i].lane_fnms(y[i], z[i])),
        );

        let lt = a.simd_lt(b);
        let eq = a.simd_eq(b);
        for i in 0..N {
            assert_eq!(lt.extract(i), x[i] < y[i], "lt lane {i}");
            assert_eq!(eq.extract(i), x[i] == y[i], "eq lane {i}");
        }
        assert_eq!(a.simd_ge(b), !lt & (a.simd_eq(a) & b.simd_eq(b)));

        let picked = select(lt, a, b).to_array();
        for i in 0..N {
            assert!(same(picked[i], if x[i] < y[i] { x[i] } else { y[i] }));
        }
    }
}

macro_rules! scalar_agreement {
    ($($name:ident: $t:ty, $n:literal;)*) => {$(
        #[test]
        fn $name() {
            check_against_scalar::<$t, $n>(0xb47c_4000 + $n);
        }
    )*};
}

scalar_agreement! {
    stress_f32x4: f32, 4;
    stress_f32x8: f32, 8;
    stress_f32x16: f32, 16;
    stress_f32x32: f32, 32;
    stress_f64x2: f64, 2;
    stress_f64x4: f64, 4;
    stress_f64x8: f64, 8;
    stress_i32x4: i32, 4;
    stress_i32x8: i32, 8;
    stress_i32x16: i32, 16;
    stress_i16x8: i16, 8;
    stress_i16x16: i16, 16;
    stress_u8x64: u8, 64;
    stress_i64x2: i64, 2;
    stress_u32x8: u32, 8;
}

#[test]
fn stress_signed_zero_lanes() {
    let pz = Batch::<f32, 8>::splat(0.0);
    let nz = Batch::<f32, 8>::splat(-0.0);
    assert!(!same(0.0f32, -0.0));
    assert_lanes("min(+0, -0)", min(pz, nz).to_array(), [-0.0; 8]);
    assert_lanes("min(-0, +0)", min(nz, pz).to_array(), [0.0; 8]);
    assert_lanes("max(+0, -0)", max(pz, nz).to_array(), [-0.0; 8]);
    assert_lanes("neg(+0)", (-pz).to_array(), [-0.0; 8]);
    assert_lanes("abs(-0)", abs(nz).to_array(), [0.0; 8]);

    let d = Batch::<f64, 4>::new([0.0, -0.0, 0.0, -0.0]);
    let e = Batch::<f64, 4>::new([-0.0, 0.0, 0.0, -0.0]);
    assert_lanes("f64 min", min(d, e).to_array(), [-0.0, 0.0, 0.0, -0.0]);
    assert_lanes("f64 add", (d + e).to_array(), [0.0, 0.0, 0.0, -0.0]);
}

#[test]
fn stress_integer_division_agrees_with_scalar() {
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..ROUNDS {
        let a = random_batch::<i32, 8>(&mut rng);
        let b = Batch::<i32, 8>::new(std::array::from_fn(|_| {
            let d: i32 = rng.gen_range(-1000..1000);
            if d == 0 {
                1
            } else {
                d
            }
        }));
        let (x, y) = (a.to_array(), b.to_array());
        let q: [i32; 8] = std::array::from_fn(|i| x[i].lane_div(y[i]));
        let r: [i32; 8] = std::array::from_fn(|i| x[i].lane_rem(y[i]));
        assert_eq!((a / b).to_array(), q);
        assert_eq!((a % b).to_array(), r);
    }
}

#[test]
fn stress_conversions() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..ROUNDS {
        let f = random_batch::<f32, 16>(&mut rng);
        assert_eq!(to_int(f).to_array(), f.to_array().map(|v| v as i32));

        let d = random_batch::<f64, 8>(&mut rng);
        assert_eq!(to_int(d).to_array(), d.to_array().map(|v| v as i64));

        let i = random_batch::<i32, 8>(&mut rng);
        assert_eq!(to_float(i).to_array(), i.to_array().map(|v| v as f32));

        let u = random_batch::<u32, 4>(&mut rng);
        assert_eq!(to_float(u).to_array(), u.to_array().map(|v| v as f32));

        let bits: Batch<u64, 8> = bitwise_cast(d);
        let back: Batch<f64, 8> = bitwise_cast(bits);
        assert_lanes("bitwise round trip", back.to_array(), d.to_array());
    }
}

#[test]
fn stress_hadd_matches_pairwise_order() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..ROUNDS {
        let v: [f32; 8] = std::array::from_fn(|_| rng.gen_range(-1.0e3..1.0e3));
        let pairwise = ((v[0] + v[4]) + (v[2] + v[6])) + ((v[1] + v[5]) + (v[3] + v[7]));
        assert_eq!(Batch::<f32, 8>::new(v).hadd().to_bits(), pairwise.to_bits());
    }
}

#[test]
fn stress_algorithms_long_inputs() {
    let mut rng = StdRng::seed_from_u64(2024);
    let values: Vec<i32> = (0..50_000).map(|_| rng.gen_range(-1000..1000)).collect();
    let data = aligned_from_slice(&values);

    for offset in 0..9 {
        let slice = &data[offset..];
        let expected: i32 = slice.iter().sum();
        assert_eq!(sum::<i32, 8>(slice), expected, "offset {offset}");
        assert_eq!(sum::<i32, 16>(slice), expected, "offset {offset}");

        let mut out = vec![0i32; slice.len()];
        transform::<i32, i32, _, 8>(slice, &mut out, |v| abs(v) + 1).unwrap();
        assert!(out.iter().zip(slice).all(|(o, s)| *o == s.abs() + 1));
    }
}
