//! Slice algorithms built on batches.
//!
//! Each algorithm walks its input `N` lanes at a time and handles the tail with
//! a padded batch. Aligned loads and stores are used whenever the slices allow
//! them; [`reduce`] stages misaligned input through aligned scratch so its hot
//! loop always runs on aligned memory.

use std::mem::size_of;

use crate::batch::Batch;
use crate::config::BUILD;
use crate::dispatch::Supported;
use crate::error::{BatchError, Result};
use crate::memory::{is_aligned, with_scratch, AccessMode, Aligned, Unaligned};

/// Whether stepping `N` lanes at a time from an aligned start stays aligned.
const fn stride_keeps_alignment<T: Supported<N>, const N: usize>() -> bool {
    (N * size_of::<T>()) % Batch::<T, N>::ALIGNMENT == 0
}

fn aligned_for<T: Supported<N>, const N: usize>(ptr: *const T) -> bool {
    stride_keeps_alignment::<T, N>() && is_aligned(ptr, Batch::<T, N>::ALIGNMENT)
}

fn check_len(what: &str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(BatchError::invalid_argument(format!(
            "{} holds {} elements, expected {}",
            what, actual, expected
        )));
    }
    Ok(())
}

/// Lanes of a partial batch: `tail` followed by copies of `pad`.
#[inline]
fn padded<T: Supported<N>, const N: usize>(tail: &[T], pad: T) -> Batch<T, N> {
    debug_assert!(tail.len() < N);
    let mut lanes = [pad; N];
    lanes[..tail.len()].copy_from_slice(tail);
    Batch::new(lanes)
}

// ============================================================================
// transform
// ============================================================================

/// `output[i] = f(input)[i]`, `N` lanes at a time.
///
/// Tail lanes past the end of `input` are filled with copies of the first tail
/// element before `f` runs, so `f` never sees values that are not in `input`.
/// Fails if the slices differ in length.
pub fn transform<T, U, F, const N: usize>(input: &[T], output: &mut [U], f: F) -> Result<()>
where
    T: Supported<N>,
    U: Supported<N>,
    F: Fn(Batch<T, N>) -> Batch<U, N>,
{
    check_len("output", input.len(), output.len())?;

    let body = input.len() - input.len() % N;
    let (input_body, input_tail) = input.split_at(body);
    let (output_body, output_tail) = output.split_at_mut(body);

    if aligned_for::<T, N>(input_body.as_ptr()) && aligned_for::<U, N>(output_body.as_ptr()) {
        transform_body(input_body, output_body, &f, Aligned);
    } else {
        transform_body(input_body, output_body, &f, Unaligned);
    }

    if let Some(&first) = input_tail.first() {
        let lanes = f(padded(input_tail, first)).to_array();
        output_tail.copy_from_slice(&lanes[..input_tail.len()]);
    }
    Ok(())
}

#[inline(always)]
fn transform_body<T, U, F, M, const N: usize>(input: &[T], output: &mut [U], f: &F, mode: M)
where
    T: Supported<N>,
    U: Supported<N>,
    F: Fn(Batch<T, N>) -> Batch<U, N>,
    M: AccessMode,
{
    for (src, dst) in input.chunks_exact(N).zip(output.chunks_exact_mut(N)) {
        // SAFETY: each chunk holds exactly N elements; with `Aligned` both bodies
        // start aligned and every stride preserves it.
        unsafe {
            let v = Batch::<T, N>::load(src.as_ptr(), mode);
            f(v).store(dst.as_mut_ptr(), mode);
        }
    }
}

/// `output[i] = f(a, b)[i]`, `N` lanes at a time.
///
/// Tails are padded as in [`transform`]. Fails unless all three slices have the
/// same length.
pub fn transform2<T, U, F, const N: usize>(a: &[T], b: &[T], output: &mut [U], f: F) -> Result<()>
where
    T: Supported<N>,
    U: Supported<N>,
    F: Fn(Batch<T, N>, Batch<T, N>) -> Batch<U, N>,
{
    check_len("second input", a.len(), b.len())?;
    check_len("output", a.len(), output.len())?;

    let body = a.len() - a.len() % N;
    let chunks = a[..body]
        .chunks_exact(N)
        .zip(b[..body].chunks_exact(N))
        .zip(output[..body].chunks_exact_mut(N));
    for ((x, y), out) in chunks {
        f(Batch::from_slice(x), Batch::from_slice(y)).write_to_slice(out);
    }

    let (a_tail, b_tail) = (&a[body..], &b[body..]);
    if let (Some(&fa), Some(&fb)) = (a_tail.first(), b_tail.first()) {
        let lanes = f(padded(a_tail, fa), padded(b_tail, fb)).to_array();
        output[body..].copy_from_slice(&lanes[..a_tail.len()]);
    }
    Ok(())
}

// ============================================================================
// reduce
// ============================================================================

/// Elements staged per block when `reduce` copies misaligned input.
const fn staging_len<T: Supported<N>, const N: usize>() -> usize {
    let fit = BUILD.stack_allocation_limit() / size_of::<T>() / N * N;
    if fit < N {
        N
    } else {
        fit
    }
}

#[inline(always)]
fn fold_aligned<T, F, const N: usize>(mut acc: Batch<T, N>, input: &[T], f: &F) -> Batch<T, N>
where
    T: Supported<N>,
    F: Fn(Batch<T, N>, Batch<T, N>) -> Batch<T, N>,
{
    for chunk in input.chunks_exact(N) {
        // SAFETY: `input` starts aligned and each chunk holds N elements.
        acc = f(acc, unsafe { Batch::load_aligned(chunk.as_ptr()) });
    }
    acc
}

/// Lane-wise fold of `input` with `f`, starting from `identity` in every lane.
///
/// Lane i of the result folds the elements at positions congruent to i modulo
/// `N`; combine the lanes with [`Batch::hadd`] or [`Batch::to_array`]. The tail
/// is padded with `identity`, which must be an identity of `f`.
pub fn reduce<T, F, const N: usize>(input: &[T], identity: T, f: F) -> Batch<T, N>
where
    T: Supported<N>,
    F: Fn(Batch<T, N>, Batch<T, N>) -> Batch<T, N>,
{
    let body = input.len() - input.len() % N;
    let (head, tail) = input.split_at(body);
    let mut acc = Batch::splat(identity);

    if head.is_empty() {
        // Tail only.
    } else if aligned_for::<T, N>(head.as_ptr()) {
        acc = fold_aligned(acc, head, &f);
    } else if stride_keeps_alignment::<T, N>() {
        let block = staging_len::<T, N>().min(head.len());
        acc = with_scratch::<T, _>(block, |scratch| {
            head.chunks(block).fold(acc, |acc, chunk| {
                let staged = &mut scratch[..chunk.len()];
                staged.copy_from_slice(chunk);
                fold_aligned(acc, staged, &f)
            })
        });
    } else {
        acc = head
            .chunks_exact(N)
            .fold(acc, |acc, chunk| f(acc, Batch::from_slice(chunk)));
    }

    if !tail.is_empty() {
        acc = f(acc, padded(tail, identity));
    }
    acc
}

/// Sum of all elements: wrapping for integers, lane-wise then halving-tree for floats.
pub fn sum<T: Supported<N>, const N: usize>(input: &[T]) -> T {
    reduce::<T, _, N>(input, T::ZERO, |acc, v| acc + v).hadd()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::memory::aligned_from_slice;

    #[test]
    fn test_transform_with_tail() {
        for len in 0..20 {
            let input: Vec<i32> = (1..=len as i32).collect();
            let mut output = vec![0i32; len];
            transform::<i32, i32, _, 8>(&input, &mut output, |v| v * 3 - 1).unwrap();
            let expected: Vec<i32> = input.iter().map(|x| x * 3 - 1).collect();
            assert_eq!(output, expected, "len {len}");
        }
    }

    #[test]
    fn test_transform_pads_with_input_values() {
        let input = [5i32, 6, 7, 8, 9, 10];
        let mut output = [0i32; 6];
        // Zero lanes would panic the division.
        transform::<i32, i32, _, 4>(&input, &mut output, |v| Batch::splat(60) / v).unwrap();
        assert_eq!(output, [12, 10, 8, 7, 6, 6]);
    }

    #[test]
    fn test_transform_changes_type() {
        let input = aligned_from_slice(&[1.5f32, -2.5, 3.9, 4.0, 5.1]);
        let mut output = vec![0i32; 5];
        transform::<f32, i32, _, 4>(&input, &mut output, |v| v.to_int()).unwrap();
        assert_eq!(output, [1, -2, 3, 4, 5]);
    }

    #[test]
    fn test_transform2() {
        let a: Vec<f64> = (0..11).map(f64::from).collect();
        let b: Vec<f64> = (0..11).map(|i| f64::from(i) * 0.5).collect();
        let mut out = vec![0.0; 11];
        transform2::<f64, f64, _, 4>(&a, &b, &mut out, |x, y| x.fma(y, x)).unwrap();
        for i in 0..11 {
            assert_eq!(out[i], a[i] * b[i] + a[i]);
        }
    }

    #[test]
    fn test_length_mismatch() {
        let mut out = [0u8; 3];
        let err = transform::<u8, u8, _, 16>(&[1, 2], &mut out, |v| v).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        let err = transform2::<u8, u8, _, 16>(&[1, 2, 3], &[1, 2], &mut out, |x, _| x).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_reduce_misaligned_and_tail() {
        let data = aligned_from_slice(&(0..103).collect::<Vec<i32>>());
        let expected: i32 = (1..103).sum();
        assert_eq!(sum::<i32, 8>(&data[1..]), expected);
        assert_eq!(sum::<i32, 4>(&data[..]), expected);

        let max = reduce::<i32, _, 8>(&data[3..], i32::MIN, |a, b| a.max(b));
        assert_eq!(max.to_array().into_iter().max(), Some(102));
    }

    #[test]
    fn test_reduce_larger_than_stack_limit() {
        let len = BUILD.stack_allocation_limit() / 4 * 3 + 5;
        let data = aligned_from_slice(&vec![1u32; len + 1]);
        assert_eq!(sum::<u32, 16>(&data[1..]), len as u32);
    }

    #[test]
    fn test_sum_empty_and_short() {
        assert_eq!(sum::<f32, 8>(&[]), 0.0);
        assert_eq!(sum::<f32, 8>(&[1.0, 2.0, 3.0]), 6.0);
        assert_eq!(sum::<i64, 4>(&[i64::MAX, 1]), i64::MIN);
    }
}
