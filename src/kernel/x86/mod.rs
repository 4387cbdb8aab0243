//! x86_64 kernels on `std::arch` intrinsics.
//!
//! Each submodule is compiled only when its target feature is enabled for the
//! whole build (`-C target-feature=+avx2` or `-C target-cpu=native`), so the
//! intrinsics are always legal to execute on the build's baseline CPU.
//! [`verify_host`](crate::dispatch::verify_host) checks that baseline at runtime.

#[cfg(target_feature = "sse2")]
mod sse2;
#[cfg(target_feature = "avx")]
mod avx;
#[cfg(target_feature = "avx2")]
mod avx2;
#[cfg(target_feature = "avx512f")]
mod avx512;
