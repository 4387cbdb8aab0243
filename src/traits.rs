//! Compile-time facts about batch and scalar types.

use std::mem::align_of;

use crate::batch::Batch;
use crate::batch_bool::BoolBatch;
use crate::dispatch::Supported;
use crate::types::Element;

/// Element type, lane count, predicate type and alignment of a value type.
///
/// Implemented for every `Batch<T, N>` and for the scalar element types, which
/// behave as one-lane batches whose predicate is `bool`. Never instantiated.
pub trait BatchTraits {
    /// Lane type.
    type Value: Element;
    /// Predicate paired with this type.
    type Bool: Copy;
    /// Number of lanes.
    const SIZE: usize;
    /// Alignment, in bytes, required for aligned access.
    const ALIGNMENT: usize;
}

impl<T: Supported<N>, const N: usize> BatchTraits for Batch<T, N> {
    type Value = T;
    type Bool = BoolBatch<T, N>;
    const SIZE: usize = N;
    const ALIGNMENT: usize = Batch::<T, N>::ALIGNMENT;
}

macro_rules! scalar_traits {
    ($($t:ty),*) => {$(
        impl BatchTraits for $t {
            type Value = $t;
            type Bool = bool;
            const SIZE: usize = 1;
            const ALIGNMENT: usize = align_of::<$t>();
        }
    )*};
}

scalar_traits!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

/// Number of lanes in `B`.
#[inline]
pub const fn lanes<B: BatchTraits>() -> usize {
    B::SIZE
}

/// Size in bytes of one `B` value.
#[inline]
pub const fn byte_width<B: BatchTraits>() -> usize {
    B::SIZE * std::mem::size_of::<B::Value>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_records() {
        assert_eq!(lanes::<Batch<f32, 8>>(), 8);
        assert_eq!(byte_width::<Batch<f32, 8>>(), 32);
        assert_eq!(byte_width::<Batch<u8, 64>>(), 64);
        assert!(<Batch<f64, 4> as BatchTraits>::ALIGNMENT >= align_of::<f64>());
        assert!(<Batch<f64, 4> as BatchTraits>::ALIGNMENT.is_power_of_two());
    }

    #[test]
    fn test_scalar_records() {
        assert_eq!(lanes::<i16>(), 1);
        assert_eq!(byte_width::<u64>(), 8);
        assert_eq!(<f32 as BatchTraits>::ALIGNMENT, 4);
        let p: <i32 as BatchTraits>::Bool = true;
        assert!(p);
    }

    #[test]
    fn test_batch_is_exactly_its_lanes() {
        assert_eq!(std::mem::size_of::<Batch<f32, 4>>(), 16);
        assert_eq!(std::mem::size_of::<Batch<i32, 16>>(), 64);
        assert_eq!(std::mem::size_of::<Batch<u16, 2>>(), 4);
    }
}
