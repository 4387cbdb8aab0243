//! Build configuration.
//!
//! Everything that influences kernel selection is folded into one value,
//! [`BUILD`], computed in a `const` context from:
//!
//! - the target features enabled for the build (`-C target-feature`, `-C target-cpu`),
//! - the cargo features `force-fallback`, `native-only` and `fast-int-div`,
//! - the build-time environment variables `SIMD_BATCH_MAX_EXTENSION` and
//!   `SIMD_BATCH_STACK_ALLOCATION_LIMIT`.
//!
//! Malformed environment values are rejected at compile time.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{BatchError, Result};

/// Default upper bound, in bytes, for scratch buffers placed on the stack.
pub const DEFAULT_STACK_ALLOCATION_LIMIT: usize = 20_000;

/// Hardware extension a kernel is written against.
///
/// Variants are declared in capability order; the derived `Ord` is the
/// order used to pick among candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Extension {
    /// Array-backed per-lane loops, available for every element type and lane count.
    Fallback = 0,
    /// Portable vectors from the `wide` crate.
    Portable = 1,
    /// AArch64 Advanced SIMD (128-bit).
    Neon = 2,
    /// x86_64 SSE2 (128-bit).
    Sse2 = 3,
    /// x86_64 AVX (256-bit floating point).
    Avx = 4,
    /// x86_64 AVX2 (256-bit integer).
    Avx2 = 5,
    /// x86_64 AVX-512F (512-bit, mask registers).
    Avx512 = 6,
}

impl Extension {
    /// All extensions, least capable first.
    pub const ALL: [Extension; 7] = [
        Extension::Fallback,
        Extension::Portable,
        Extension::Neon,
        Extension::Sse2,
        Extension::Avx,
        Extension::Avx2,
        Extension::Avx512,
    ];

    /// Position in the capability order.
    #[inline]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Lower-case name, as accepted by `SIMD_BATCH_MAX_EXTENSION`.
    pub const fn name(self) -> &'static str {
        match self {
            Extension::Fallback => "fallback",
            Extension::Portable => "portable",
            Extension::Neon => "neon",
            Extension::Sse2 => "sse2",
            Extension::Avx => "avx",
            Extension::Avx2 => "avx2",
            Extension::Avx512 => "avx512",
        }
    }

    /// Register width in bytes of the widest native vector.
    pub const fn register_bytes(self) -> usize {
        match self {
            Extension::Fallback => 0,
            Extension::Portable | Extension::Neon | Extension::Sse2 => 16,
            Extension::Avx | Extension::Avx2 => 32,
            Extension::Avx512 => 64,
        }
    }

    /// Whether the kernels for this extension are compiled into this build.
    pub const fn compiled(self) -> bool {
        match self {
            Extension::Fallback | Extension::Portable => true,
            Extension::Neon => cfg!(all(target_arch = "aarch64", target_feature = "neon")),
            Extension::Sse2 => cfg!(all(target_arch = "x86_64", target_feature = "sse2")),
            Extension::Avx => cfg!(all(target_arch = "x86_64", target_feature = "avx")),
            Extension::Avx2 => cfg!(all(target_arch = "x86_64", target_feature = "avx2")),
            Extension::Avx512 => cfg!(all(target_arch = "x86_64", target_feature = "avx512f")),
        }
    }

    /// Parse a lower-case name in a `const` context.
    pub const fn parse(name: &str) -> Option<Extension> {
        let mut i = 0;
        while i < Self::ALL.len() {
            if const_str_eq(name, Self::ALL[i].name()) {
                return Some(Self::ALL[i]);
            }
            i += 1;
        }
        None
    }

    /// True when `candidates` is strictly decreasing in capability.
    pub const fn is_descending(candidates: &[Extension]) -> bool {
        let mut i = 1;
        while i < candidates.len() {
            if candidates[i - 1].rank() <= candidates[i].rank() {
                return false;
            }
            i += 1;
        }
        true
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Extension {
    type Err = BatchError;

    fn from_str(s: &str) -> Result<Self> {
        Extension::parse(&s.trim().to_ascii_lowercase()).ok_or_else(|| {
            BatchError::invalid_argument(format!(
                "unknown extension '{}', expected one of fallback, portable, neon, sse2, avx, avx2, avx512",
                s
            ))
        })
    }
}

/// Integer division policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntDivision {
    /// Per-lane division with scalar semantics. Division by zero panics.
    Exact,
    /// Division through floating point. Results may differ from exact
    /// division once operands exceed the float mantissa.
    FastApproximate,
}

/// Resolved build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildConfig {
    /// Highest extension the build may select, if capped.
    pub max_extension: Option<Extension>,
    /// Whether the array fallback kernel is available.
    pub fallback: bool,
    /// Integer division policy.
    pub int_division: IntDivision,
    /// Largest scratch buffer, in bytes, placed on the stack.
    pub stack_allocation_limit: usize,
}

/// The configuration this crate was compiled with.
pub const BUILD: BuildConfig = BuildConfig::resolve();

impl BuildConfig {
    /// Resolve the configuration from cfg flags, cargo features and build-time environment.
    pub const fn resolve() -> Self {
        let env_cap = match option_env!("SIMD_BATCH_MAX_EXTENSION") {
            Some(name) => match Extension::parse(name) {
                Some(ext) => Some(ext),
                None => panic!("SIMD_BATCH_MAX_EXTENSION does not name a known extension"),
            },
            None => None,
        };
        let max_extension = if cfg!(feature = "force-fallback") {
            Some(Extension::Fallback)
        } else {
            env_cap
        };
        let stack_allocation_limit = match option_env!("SIMD_BATCH_STACK_ALLOCATION_LIMIT") {
            Some(value) => match parse_usize(value) {
                Some(limit) => limit,
                None => panic!("SIMD_BATCH_STACK_ALLOCATION_LIMIT must be a decimal byte count"),
            },
            None => DEFAULT_STACK_ALLOCATION_LIMIT,
        };
        Self {
            max_extension,
            fallback: !cfg!(feature = "native-only"),
            int_division: if cfg!(feature = "fast-int-div") {
                IntDivision::FastApproximate
            } else {
                IntDivision::Exact
            },
            stack_allocation_limit,
        }
    }

    /// Whether kernels written for `ext` may be selected.
    pub const fn enables(&self, ext: Extension) -> bool {
        if let Extension::Fallback = ext {
            return self.fallback;
        }
        if !ext.compiled() {
            return false;
        }
        match self.max_extension {
            Some(cap) => ext.rank() <= cap.rank(),
            None => true,
        }
    }

    /// Most capable enabled extension.
    pub const fn best(&self) -> Extension {
        let mut i = Extension::ALL.len();
        while i > 1 {
            i -= 1;
            if self.enables(Extension::ALL[i]) {
                return Extension::ALL[i];
            }
        }
        Extension::Fallback
    }

    /// All enabled extensions, least capable first.
    pub fn enabled_extensions(&self) -> Vec<Extension> {
        Extension::ALL
            .iter()
            .copied()
            .filter(|&ext| self.enables(ext))
            .collect()
    }

    /// Whether the fallback kernel is available.
    #[inline]
    pub const fn fallback_enabled(&self) -> bool {
        self.fallback
    }

    /// Integer division policy.
    #[inline]
    pub const fn int_division(&self) -> IntDivision {
        self.int_division
    }

    /// Shorthand for `int_division() == FastApproximate`.
    #[inline]
    pub const fn fast_int_division(&self) -> bool {
        matches!(self.int_division, IntDivision::FastApproximate)
    }

    /// Largest scratch buffer, in bytes, placed on the stack.
    #[inline]
    pub const fn stack_allocation_limit(&self) -> usize {
        self.stack_allocation_limit
    }

    /// Log the resolved configuration at info level.
    pub fn log_summary(&self) {
        log::info!(
            "simd-batch build: best={} enabled=[{}] cap={} fallback={} int_division={:?} stack_limit={}B",
            self.best(),
            self.enabled_extensions()
                .iter()
                .map(|e| e.name())
                .collect::<Vec<_>>()
                .join(","),
            self.max_extension.map_or("none", |e| e.name()),
            self.fallback,
            self.int_division,
            self.stack_allocation_limit,
        );
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        BUILD
    }
}

const fn const_str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

const fn parse_usize(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    let mut value: usize = 0;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        if !digit.is_ascii_digit() {
            return None;
        }
        value = match value.checked_mul(10) {
            Some(v) => match v.checked_add((digit - b'0') as usize) {
                Some(v) => v,
                None => return None,
            },
            None => return None,
        };
        i += 1;
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_order() {
        assert!(Extension::Fallback < Extension::Portable);
        assert!(Extension::Neon < Extension::Sse2);
        assert!(Extension::Avx2 < Extension::Avx512);
        assert!(Extension::is_descending(&[Extension::Avx, Extension::Sse2, Extension::Portable]));
        assert!(!Extension::is_descending(&[Extension::Sse2, Extension::Avx]));
        assert!(!Extension::is_descending(&[Extension::Sse2, Extension::Sse2]));
        assert!(Extension::is_descending(&[]));
    }

    #[test]
    fn test_extension_parse() {
        for ext in Extension::ALL {
            assert_eq!(Extension::parse(ext.name()), Some(ext));
        }
        assert_eq!(Extension::parse("avx3"), None);
        assert_eq!("AVX2".parse::<Extension>().unwrap(), Extension::Avx2);
        let err = "mmx".parse::<Extension>().unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_parse_usize() {
        assert_eq!(parse_usize("0"), Some(0));
        assert_eq!(parse_usize("20000"), Some(20_000));
        assert_eq!(parse_usize(""), None);
        assert_eq!(parse_usize("12k"), None);
        assert_eq!(parse_usize("99999999999999999999999"), None);
    }

    #[test]
    fn test_build_is_consistent() {
        let best = BUILD.best();
        assert!(BUILD.enables(best) || best == Extension::Fallback);
        assert!(best.compiled());
        if let Some(cap) = BUILD.max_extension {
            assert!(best <= cap);
        }
        for ext in BUILD.enabled_extensions() {
            assert!(ext <= best);
        }
        if cfg!(feature = "fast-int-div") {
            assert_eq!(BUILD.int_division(), IntDivision::FastApproximate);
        } else {
            assert_eq!(BUILD.int_division(), IntDivision::Exact);
        }
    }

    #[cfg(not(any(feature = "force-fallback", feature = "native-only")))]
    #[test]
    fn test_default_build_enables_portable_and_fallback() {
        if option_env!("SIMD_BATCH_MAX_EXTENSION").is_none() {
            assert!(BUILD.enables(Extension::Portable));
        }
        assert!(BUILD.fallback_enabled());
    }

    #[test]
    fn test_config_serializes() {
        let json = serde_json::to_string(&BUILD).unwrap();
        assert!(json.contains("\"int_division\""));
        assert!(json.contains("\"stack_allocation_limit\""));
    }
}
