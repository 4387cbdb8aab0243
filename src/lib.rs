//! # simd-batch
//!
//! Fixed-width SIMD batches with compile-time kernel dispatch.
//!
//! ## Overview
//!
//! `Batch<T, N>` is `N` lanes of a scalar element type `T`. The same code runs on
//! every target and compiles to the most capable instructions the build enables:
//!
//! - **Native kernels**: SSE2, AVX, AVX2 and AVX-512F on x86_64, NEON on aarch64
//! - **Split kernels**: wide batches synthesized from two halves of a narrower kernel
//! - **Portable kernel**: the `wide` crate's vectors where no native kernel applies
//! - **Fallback kernel**: per-lane loops for every element type and lane count,
//!   and the reference every other kernel agrees with bit for bit
//!
//! Kernel selection happens while the crate compiles. No operation branches on
//! CPU features at runtime.
//!
//! ## Quick Start
//!
//! ```rust
//! use simd_batch::prelude::*;
//!
//! let a = Batch::<f32, 8>::new([0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
//! let b = Batch::<f32, 8>::splat(2.0);
//!
//! let c = fma(a, b, Batch::splat(1.0));
//! assert_eq!(c.extract(3), 7.0);
//!
//! // Lane i comes from `a` where the predicate is set.
//! let low = select(a.simd_lt(b), a, b);
//! assert_eq!(low.to_array(), [0.0, 1.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0]);
//!
//! assert_eq!(a.hadd(), 28.0);
//! ```
//!
//! ## Slices
//!
//! ```rust
//! use simd_batch::prelude::*;
//!
//! let input: Vec<i32> = (0..21).collect();
//! let mut output = vec![0; 21];
//! transform::<i32, i32, _, 8>(&input, &mut output, |v| v * v).unwrap();
//! assert_eq!(output[20], 400);
//!
//! assert_eq!(sum::<i32, 8>(&input), 210);
//! ```
//!
//! ## Build Configuration
//!
//! | Control | Effect |
//! |---------|--------|
//! | `-C target-feature` / `-C target-cpu` | Which native kernels compile |
//! | `SIMD_BATCH_MAX_EXTENSION=<name>` | Caps the most capable extension used |
//! | `force-fallback` feature | Selects the fallback kernel everywhere |
//! | `native-only` feature | Removes the fallback kernel |
//! | `fast-int-div` feature | Integer division through floating point |
//! | `SIMD_BATCH_STACK_ALLOCATION_LIMIT=<bytes>` | Stack scratch limit (default 20000) |
//!
//! The resolved configuration is [`config::BUILD`].
//!
//! ## Module Overview
//!
//! - [`batch`]: the batch value type and its operators
//! - [`batch_bool`]: predicates produced by comparisons
//! - [`ops`]: free-function vocabulary
//! - [`cast`]: bit reinterpretation and numeric conversions
//! - [`algorithms`]: slice transforms and reductions
//! - [`dispatch`]: kernel registry and host verification
//! - [`kernel`]: kernel implementations
//! - [`config`]: build configuration
//! - [`memory`]: alignment tags, aligned buffers and scratch storage
//! - [`traits`]: compile-time facts about batch types

#![allow(clippy::needless_range_loop)]
#![allow(clippy::manual_is_multiple_of)]
#![allow(clippy::module_inception)]
#![allow(clippy::bool_assert_comparison)]

pub mod algorithms;
pub mod batch;
pub mod batch_bool;
pub mod cast;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod kernel;
pub mod memory;
pub mod ops;
pub mod traits;
pub mod types;

pub use batch::Batch;
pub use batch_bool::BoolBatch;
pub use config::{BuildConfig, Extension, IntDivision, BUILD};
pub use dispatch::{verify_host, NativeF32, NativeF64, NativeI32, Supported};
pub use error::{BatchError, ErrorCode, Result};
pub use traits::BatchTraits;
pub use types::{Element, FloatElement, IntToFloat};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::{reduce, sum, transform, transform2};
    pub use crate::batch::Batch;
    pub use crate::batch_bool::BoolBatch;
    pub use crate::config::{Extension, BUILD};
    pub use crate::dispatch::{NativeF32, NativeF64, NativeI32, Supported};
    pub use crate::error::{BatchError, Result};
    pub use crate::memory::{AlignedVec, Aligned, Unaligned};
    pub use crate::ops::*;
    pub use crate::traits::BatchTraits;
    pub use crate::types::{Element, FloatElement, IntToFloat};
}
