//! Kernels: one implementation of the batch vocabulary per hardware extension.
//!
//! # Architecture
//!
//! - `traits`: the [`Kernel`] vocabulary and the [`Strategy`] marker trait
//! - `fallback`: array-backed kernel for every element type and lane count
//! - `portable`: kernels on the `wide` crate's portable vectors
//! - `x86`: SSE2, AVX, AVX2 and AVX-512F kernels (x86_64)
//! - `neon`: Advanced SIMD kernels (aarch64)
//! - `split`: the [`Split`] decorator that doubles a narrower kernel
//!
//! Every marker type exists on every target so the dispatch registry can name
//! it. Its `Kernel` impls only exist when the matching target features are
//! enabled for the build, and the registry only selects a marker whose
//! extension [`BUILD`](crate::config::BUILD) enables.

pub mod traits;
mod fallback;
mod portable;
mod split;
#[cfg(target_arch = "x86_64")]
mod x86;
#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
mod neon;

#[cfg(all(test, not(feature = "native-only")))]
mod tests;

pub use split::Split;
pub use traits::{lane_bits, pairwise_sum, Kernel, Strategy};

use crate::config::Extension;

macro_rules! strategies {
    ($($(#[$doc:meta])* $name:ident => $ext:ident;)*) => {$(
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name;

        impl Strategy for $name {
            const EXTENSION: Extension = Extension::$ext;
        }
    )*};
}

strategies! {
    /// Per-lane loops over `[T; N]`; the reference semantics.
    Fallback => Fallback;
    /// Portable vectors from the `wide` crate.
    Portable => Portable;
    /// AArch64 Advanced SIMD, 128-bit registers.
    Neon => Neon;
    /// x86_64 SSE2, 128-bit registers.
    Sse2 => Sse2;
    /// x86_64 AVX, 256-bit floating-point registers.
    Avx => Avx;
    /// x86_64 AVX2, 256-bit integer registers.
    Avx2 => Avx2;
    /// x86_64 AVX-512F, 512-bit registers with mask registers as predicates.
    Avx512 => Avx512;
}
