//! Alignment tags, aligned buffers and scratch storage.

use std::mem::{align_of, size_of, MaybeUninit};

use aligned_vec::{AVec, ConstAlign};

use crate::config::BUILD;
use crate::types::Element;

/// Alignment of [`AlignedVec`] and of stack scratch, in bytes.
///
/// No kernel requires more than this.
pub const MAX_ALIGNMENT: usize = 64;

/// Heap buffer aligned to [`MAX_ALIGNMENT`]; any batch can use aligned loads at
/// multiples of its lane count.
pub type AlignedVec<T> = AVec<T, ConstAlign<MAX_ALIGNMENT>>;

/// Access mode for [`Batch::load`](crate::batch::Batch::load) and
/// [`Batch::store`](crate::batch::Batch::store).
pub trait AccessMode: Copy + Default {
    /// Whether the pointer must satisfy the batch alignment.
    const ALIGNED: bool;
}

/// The pointer is aligned to the batch's `ALIGNMENT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aligned;

/// The pointer carries no alignment guarantee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unaligned;

impl AccessMode for Aligned {
    const ALIGNED: bool = true;
}

impl AccessMode for Unaligned {
    const ALIGNED: bool = false;
}

/// Whether `ptr` is aligned to `alignment` bytes.
#[inline]
pub fn is_aligned<T>(ptr: *const T, alignment: usize) -> bool {
    alignment == 0 || (ptr as usize) % alignment == 0
}

/// Zero-filled aligned buffer of `len` elements.
pub fn aligned_zeroed<T: Element>(len: usize) -> AlignedVec<T> {
    AVec::from_iter(MAX_ALIGNMENT, std::iter::repeat(T::ZERO).take(len))
}

/// Aligned copy of `values`.
pub fn aligned_from_slice<T: Element>(values: &[T]) -> AlignedVec<T> {
    AVec::from_slice(MAX_ALIGNMENT, values)
}

#[repr(C, align(64))]
struct StackScratch([MaybeUninit<u8>; BUILD.stack_allocation_limit()]);

/// Run `f` on a zeroed scratch slice of `len` elements aligned to [`MAX_ALIGNMENT`].
///
/// The slice lives on the stack when it fits in
/// [`BuildConfig::stack_allocation_limit`](crate::config::BuildConfig::stack_allocation_limit)
/// bytes and on the heap otherwise.
pub fn with_scratch<T: Element, R>(len: usize, f: impl FnOnce(&mut [T]) -> R) -> R {
    let bytes = len.saturating_mul(size_of::<T>());
    if bytes <= BUILD.stack_allocation_limit() && align_of::<T>() <= MAX_ALIGNMENT {
        let mut buf = StackScratch([MaybeUninit::uninit(); BUILD.stack_allocation_limit()]);
        let ptr = buf.0.as_mut_ptr().cast::<T>();
        // SAFETY: the buffer holds `bytes` bytes at 64-byte alignment, and every
        // element is written before the slice is formed.
        let scratch = unsafe {
            for i in 0..len {
                ptr.add(i).write(T::ZERO);
            }
            std::slice::from_raw_parts_mut(ptr, len)
        };
        return f(scratch);
    }

    log::trace!(
        "scratch of {} bytes exceeds stack limit of {} bytes, using heap",
        bytes,
        BUILD.stack_allocation_limit()
    );
    let mut heap = aligned_zeroed::<T>(len);
    f(&mut heap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_vec_alignment() {
        let data = aligned_zeroed::<f32>(37);
        assert_eq!(data.len(), 37);
        assert!(is_aligned(data.as_ptr(), MAX_ALIGNMENT));
        assert!(data.iter().all(|&x| x == 0.0));
        assert!(aligned_zeroed::<u64>(0).is_empty());
        assert_eq!(aligned_zeroed::<i16>(1000).iter().filter(|&&x| x == 0).count(), 1000);

        let copy = aligned_from_slice(&[1u8, 2, 3]);
        assert!(is_aligned(copy.as_ptr(), MAX_ALIGNMENT));
        assert_eq!(&copy[..], &[1, 2, 3]);
    }

    #[test]
    fn test_scratch_small_and_large() {
        let small = with_scratch::<f64, _>(16, |s| {
            assert!(is_aligned(s.as_ptr(), MAX_ALIGNMENT));
            s.iter_mut().enumerate().for_each(|(i, x)| *x = i as f64);
            s.iter().sum::<f64>()
        });
        assert_eq!(small, 120.0);

        let len = BUILD.stack_allocation_limit() / 4 + 10;
        let large = with_scratch::<u32, _>(len, |s| {
            assert!(is_aligned(s.as_ptr(), MAX_ALIGNMENT));
            assert!(s.iter().all(|&x| x == 0));
            s.len()
        });
        assert_eq!(large, len);
    }

    #[test]
    fn test_empty_scratch() {
        assert_eq!(with_scratch::<i8, _>(0, |s| s.len()), 0);
    }

    #[test]
    fn test_access_modes() {
        assert!(Aligned::ALIGNED);
        assert!(!Unaligned::ALIGNED);
        assert!(is_aligned(8usize as *const u8, 4));
        assert!(!is_aligned(6usize as *const u8, 4));
    }
}
