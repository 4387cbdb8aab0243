//! Error types for simd-batch.
//!
//! Batch operations themselves never fail at runtime: unsupported element/lane
//! pairs are rejected at compile time and misaligned aligned accesses are a
//! caller precondition. This error type covers the checked convenience APIs,
//! build configuration parsing and host verification.

use std::fmt;
use thiserror::Error;

/// Error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid argument provided.
    InvalidArgument,
    /// Index or length out of range.
    OutOfRange,
    /// A precondition (alignment, host CPU features) does not hold.
    FailedPrecondition,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            ErrorCode::OutOfRange => write!(f, "OUT_OF_RANGE"),
            ErrorCode::FailedPrecondition => write!(f, "FAILED_PRECONDITION"),
        }
    }
}

/// Main error type for simd-batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct BatchError {
    code: ErrorCode,
    message: String,
}

impl BatchError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    // Convenience constructors

    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, msg)
    }

    /// Create an out of range error.
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::OutOfRange, msg)
    }

    /// Create a failed precondition error.
    pub fn failed_precondition(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::FailedPrecondition, msg)
    }
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Result type alias for simd-batch operations.
pub type Result<T> = std::result::Result<T, BatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = BatchError::invalid_argument("bad value");
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert_eq!(err.message(), "bad value");
    }

    #[test]
    fn test_error_display() {
        let err = BatchError::out_of_range("slice holds 3 lanes, batch needs 4");
        let display = format!("{}", err);
        assert!(display.starts_with("OUT_OF_RANGE: "));
        assert!(display.contains("needs 4"));
    }

    #[test]
    fn test_constructors_map_codes() {
        assert_eq!(
            BatchError::failed_precondition("x").code(),
            ErrorCode::FailedPrecondition
        );
        assert_eq!(BatchError::invalid_argument("x").code(), ErrorCode::InvalidArgument);
        assert_eq!(BatchError::out_of_range("x").code(), ErrorCode::OutOfRange);
    }

    #[test]
    fn test_result_alias() {
        let ok: Result<i32> = Ok(42);
        assert!(ok.is_ok());

        let err: Result<i32> = Err(BatchError::failed_precondition("misaligned"));
        assert_eq!(err.unwrap_err().code(), ErrorCode::FailedPrecondition);
    }
}
