//! Kernel selection.
//!
//! Every supported `(element type, lane count)` pair is registered here with
//! its candidate kernels, most capable first. The registry resolves to one
//! kernel per pair while the crate compiles: each candidate is guarded by
//! `Prefer<{ BUILD.enables(extension) }>`, and the first enabled candidate
//! becomes [`Supported::Kernel`]. Call sites never branch on `cfg`.
//!
//! The runtime side of this module only checks that the running CPU offers
//! the extensions the build was compiled for.

use crate::config::{Extension, BUILD};
use crate::error::{BatchError, Result};
use crate::kernel::Kernel;
use crate::kernel::{Avx, Avx2, Avx512, Fallback, Neon, Portable, Split, Sse2};
use crate::types::Element;

/// Element types with a registered kernel for `N` lanes.
pub trait Supported<const N: usize>: Element {
    /// The kernel the registry selected for `N` lanes of `Self`.
    type Kernel: Kernel<Self, N>;
}

/// Kernel selected for `N` lanes of `T`.
pub type KernelOf<T, const N: usize> = <T as Supported<N>>::Kernel;

/// Type-level condition; see [`Choice`].
pub struct Prefer<const ENABLED: bool>;

/// Picks `A` for `Prefer<true>` and `B` for `Prefer<false>`.
pub trait Choice<A, B> {
    type Out;
}

impl<A, B> Choice<A, B> for Prefer<true> {
    type Out = A;
}

impl<A, B> Choice<A, B> for Prefer<false> {
    type Out = B;
}

/// Expands a candidate list into nested [`Choice`] projections.
macro_rules! select {
    ($ext:ident => $kernel:ty, $($rest:tt)+) => {
        <Prefer<{ BUILD.enables(Extension::$ext) }> as Choice<$kernel, select!($($rest)+)>>::Out
    };
    ($last:ty) => { $last };
}

/// Registers the candidates for one pair and checks they are listed in
/// descending capability order.
macro_rules! register {
    ($($t:ty, $n:literal => [$($ext:ident => $kernel:ty),+ $(,)?];)*) => {$(
        impl Supported<$n> for $t {
            type Kernel = select!($($ext => $kernel,)+ Fallback);
        }

        const _: () = assert!(
            Extension::is_descending(&[$(Extension::$ext,)+ Extension::Fallback]),
            "kernel candidates must be listed most capable first"
        );
    )*};
}

/// Pairs served only by the fallback kernel.
macro_rules! fallback_only {
    ($($t:ty => [$($n:literal),*];)*) => {$($(
        impl Supported<$n> for $t {
            type Kernel = Fallback;
        }
    )*)*};
}

register! {
    f32, 4 => [Sse2 => Sse2, Neon => Neon, Portable => Portable];
    f64, 2 => [Sse2 => Sse2, Neon => Neon, Portable => Portable];
    i32, 4 => [Sse2 => Sse2, Neon => Neon, Portable => Portable];

    f32, 8 => [Avx => Avx, Sse2 => Split<Sse2, 4>, Neon => Split<Neon, 4>, Portable => Portable];
    f64, 4 => [Avx => Avx, Sse2 => Split<Sse2, 2>, Neon => Split<Neon, 2>, Portable => Portable];
    i32, 8 => [Avx2 => Avx2, Sse2 => Split<Sse2, 4>, Neon => Split<Neon, 4>, Portable => Portable];

    f32, 16 => [
        Avx512 => Avx512,
        Avx => Split<Avx, 8>,
        Sse2 => Split<Split<Sse2, 4>, 8>,
        Neon => Split<Split<Neon, 4>, 8>,
        Portable => Split<Portable, 8>,
    ];
    f64, 8 => [
        Avx512 => Avx512,
        Avx => Split<Avx, 4>,
        Sse2 => Split<Split<Sse2, 2>, 4>,
        Neon => Split<Split<Neon, 2>, 4>,
        Portable => Split<Portable, 4>,
    ];
    i32, 16 => [
        Avx512 => Avx512,
        Avx2 => Split<Avx2, 8>,
        Sse2 => Split<Split<Sse2, 4>, 8>,
        Neon => Split<Split<Neon, 4>, 8>,
        Portable => Split<Portable, 8>,
    ];

    i16, 8 => [Portable => Portable];
    i16, 16 => [Portable => Split<Portable, 8>];
}

fallback_only! {
    f32 => [1, 2, 32, 64];
    f64 => [1, 16, 32, 64];
    i32 => [1, 2, 32, 64];
    i16 => [1, 2, 4, 32, 64];
    i8 => [1, 2, 4, 8, 16, 32, 64];
    u8 => [1, 2, 4, 8, 16, 32, 64];
    u16 => [1, 2, 4, 8, 16, 32, 64];
    u32 => [1, 2, 4, 8, 16, 32, 64];
    i64 => [1, 2, 4, 8, 16, 32, 64];
    u64 => [1, 2, 4, 8, 16, 32, 64];
}

/// Extension of the kernel selected for `N` lanes of `T`.
#[inline]
pub const fn selected_extension<T: Supported<N>, const N: usize>() -> Extension {
    <KernelOf<T, N> as crate::kernel::Strategy>::EXTENSION
}

// ============================================================================
// Native widths
// ============================================================================

const fn native_lanes(wide: [(Extension, usize); 3], narrow: usize) -> usize {
    let mut i = 0;
    while i < wide.len() {
        if BUILD.enables(wide[i].0) {
            return wide[i].1;
        }
        i += 1;
    }
    if BUILD.enables(Extension::Portable) {
        narrow
    } else {
        1
    }
}

/// Lane count of the widest natively backed `f32` batch.
pub const NATIVE_F32_LANES: usize = native_lanes(
    [(Extension::Avx512, 16), (Extension::Avx, 8), (Extension::Sse2, 4)],
    4,
);

/// Lane count of the widest natively backed `f64` batch.
pub const NATIVE_F64_LANES: usize = native_lanes(
    [(Extension::Avx512, 8), (Extension::Avx, 4), (Extension::Sse2, 2)],
    2,
);

/// Lane count of the widest natively backed `i32` batch.
pub const NATIVE_I32_LANES: usize = native_lanes(
    [(Extension::Avx512, 16), (Extension::Avx2, 8), (Extension::Sse2, 4)],
    4,
);

/// Widest natively backed `f32` batch.
pub type NativeF32 = crate::batch::Batch<f32, { NATIVE_F32_LANES }>;
/// Widest natively backed `f64` batch.
pub type NativeF64 = crate::batch::Batch<f64, { NATIVE_F64_LANES }>;
/// Widest natively backed `i32` batch.
pub type NativeI32 = crate::batch::Batch<i32, { NATIVE_I32_LANES }>;

// ============================================================================
// Host verification
// ============================================================================

/// Whether the running CPU offers `ext`.
pub fn host_supports(ext: Extension) -> bool {
    match ext {
        Extension::Fallback | Extension::Portable => true,
        #[cfg(target_arch = "x86_64")]
        Extension::Sse2 => is_x86_feature_detected!("sse2"),
        #[cfg(target_arch = "x86_64")]
        Extension::Avx => is_x86_feature_detected!("avx"),
        #[cfg(target_arch = "x86_64")]
        Extension::Avx2 => is_x86_feature_detected!("avx2"),
        #[cfg(target_arch = "x86_64")]
        Extension::Avx512 => is_x86_feature_detected!("avx512f"),
        #[cfg(target_arch = "aarch64")]
        Extension::Neon => std::arch::is_aarch64_feature_detected!("neon"),
        #[allow(unreachable_patterns)]
        _ => false,
    }
}

/// Extensions the running CPU offers, least capable first.
pub fn host_extensions() -> Vec<Extension> {
    Extension::ALL
        .iter()
        .copied()
        .filter(|&ext| host_supports(ext))
        .collect()
}

/// Most capable extension the running CPU offers.
pub fn best_host_extension() -> Extension {
    host_extensions()
        .last()
        .copied()
        .unwrap_or(Extension::Fallback)
}

/// Check that the running CPU offers every extension compiled into this build.
///
/// Kernels are selected while compiling, so a binary built with
/// `-C target-cpu=native` on one machine can hit illegal instructions on an
/// older one. Call this once at startup to fail cleanly instead.
pub fn verify_host() -> Result<()> {
    let missing: Vec<Extension> = BUILD
        .enabled_extensions()
        .into_iter()
        .filter(|&ext| !host_supports(ext))
        .collect();

    if missing.is_empty() {
        log::debug!(
            "host supports every enabled extension (build best={}, host best={})",
            BUILD.best(),
            best_host_extension()
        );
        return Ok(());
    }

    let names = missing.iter().map(|e| e.name()).collect::<Vec<_>>().join(", ");
    log::warn!("running CPU lacks extensions this build relies on: {}", names);
    Err(BatchError::failed_precondition(format!(
        "running CPU lacks extensions this build was compiled for: {}",
        names
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_extension_is_enabled() {
        let selected = [
            selected_extension::<f32, 4>(),
            selected_extension::<f32, 8>(),
            selected_extension::<f32, 16>(),
            selected_extension::<f64, 2>(),
            selected_extension::<f64, 4>(),
            selected_extension::<f64, 8>(),
            selected_extension::<i32, 4>(),
            selected_extension::<i32, 8>(),
            selected_extension::<i32, 16>(),
            selected_extension::<i16, 8>(),
            selected_extension::<i16, 16>(),
        ];
        for ext in selected {
            assert!(BUILD.enables(ext), "{ext} selected but not enabled");
            assert!(ext <= BUILD.best());
        }
    }

    #[test]
    fn test_unregistered_types_use_fallback() {
        assert_eq!(selected_extension::<u8, 16>(), Extension::Fallback);
        assert_eq!(selected_extension::<i64, 2>(), Extension::Fallback);
        assert_eq!(selected_extension::<f32, 32>(), Extension::Fallback);
    }

    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    #[test]
    fn test_avx2_build_prefers_native_kernels() {
        if BUILD.max_extension.is_none() {
            assert_eq!(selected_extension::<f32, 8>(), Extension::Avx);
            assert_eq!(selected_extension::<i32, 8>(), Extension::Avx2);
            assert_eq!(selected_extension::<f32, 4>(), Extension::Sse2);
        }
    }

    #[cfg(feature = "force-fallback")]
    #[test]
    fn test_force_fallback_selects_fallback() {
        assert_eq!(selected_extension::<f32, 8>(), Extension::Fallback);
        assert_eq!(NATIVE_F32_LANES, 1);
    }

    #[test]
    fn test_native_lanes_fit_best_extension() {
        let bytes = BUILD.best().register_bytes().max(16);
        assert!(NATIVE_F32_LANES * 4 <= bytes);
        assert!(NATIVE_F64_LANES * 8 <= bytes);
        assert!(NATIVE_I32_LANES.is_power_of_two());
    }

    #[test]
    fn test_host_extensions() {
        let host = host_extensions();
        assert!(host.contains(&Extension::Fallback));
        assert!(host.contains(&Extension::Portable));
        assert_eq!(best_host_extension(), *host.last().unwrap());
    }

    #[test]
    fn test_verify_host_on_build_machine() {
        // Tests run on the machine they were built for.
        assert!(verify_host().is_ok());
    }
}
