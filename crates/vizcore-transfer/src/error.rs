//! Error types for vizcore-transfer
//!
//! Every rejected call leaves the function untouched: arguments are
//! validated before any node is created, moved or removed.

use thiserror::Error;

/// Main error type for piecewise function operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferError {
    /// Midpoint outside [0, 1]
    #[error("Midpoint outside range [0.0, 1.0]: {0}")]
    InvalidMidpoint(f64),

    /// Sharpness outside [0, 1]
    #[error("Sharpness outside range [0.0, 1.0]: {0}")]
    InvalidSharpness(f64),

    /// Node index past the end of the node list
    #[error("Index out of range: {index} (size: {size})")]
    IndexOutOfRange { index: usize, size: usize },

    /// Node coordinate is NaN
    #[error("Node coordinates must not be NaN: ({x}, {y})")]
    InvalidCoordinate { x: f64, y: f64 },

    /// A freshly inserted node could not be found again
    #[error("Inserted node ({x}, {y}) could not be located after sorting")]
    NodeLookupFailed { x: f64, y: f64 },

    /// Range with min > max or a NaN bound
    #[error("Invalid range: [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },

    /// Output or input buffer shorter than size and stride require
    #[error("Buffer too small: {required} elements required, {actual} available")]
    BufferTooSmall { required: usize, actual: usize },

    /// Stride of zero
    #[error("Stride must be at least 1")]
    InvalidStride,

    /// Serialized state could not be read or written
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TransferError {
    fn from(err: serde_json::Error) -> Self {
        TransferError::Serialization(err.to_string())
    }
}

/// Result type alias for piecewise function operations
pub type TransferResult<T> = Result<T, TransferError>;

/// Validation utilities
pub mod validation {
    use super::*;

    /// Validate a node midpoint
    pub fn validate_midpoint(midpoint: f64) -> TransferResult<()> {
        if !(0.0..=1.0).contains(&midpoint) {
            tracing::warn!(midpoint, "midpoint outside range [0.0, 1.0]");
            return Err(TransferError::InvalidMidpoint(midpoint));
        }
        Ok(())
    }

    /// Validate a node sharpness
    pub fn validate_sharpness(sharpness: f64) -> TransferResult<()> {
        if !(0.0..=1.0).contains(&sharpness) {
            tracing::warn!(sharpness, "sharpness outside range [0.0, 1.0]");
            return Err(TransferError::InvalidSharpness(sharpness));
        }
        Ok(())
    }

    /// Validate node coordinates. NaN would break the X ordering and node lookup.
    pub fn validate_coordinates(x: f64, y: f64) -> TransferResult<()> {
        if x.is_nan() || y.is_nan() {
            tracing::warn!(x, y, "NaN node coordinate");
            return Err(TransferError::InvalidCoordinate { x, y });
        }
        Ok(())
    }

    /// Validate a node index against the current node count
    pub fn validate_index(index: usize, size: usize) -> TransferResult<()> {
        if index >= size {
            tracing::warn!(index, size, "node index out of range");
            return Err(TransferError::IndexOutOfRange { index, size });
        }
        Ok(())
    }

    /// Validate a `[min, max]` range
    pub fn validate_range(min: f64, max: f64) -> TransferResult<()> {
        if min.is_nan() || max.is_nan() || min > max {
            return Err(TransferError::InvalidRange { min, max });
        }
        Ok(())
    }

    /// Validate that a strided buffer can hold `count` entries.
    ///
    /// Entry `i` lives at `i * stride`, so the last one needs
    /// `stride * (count - 1) + 1` elements. A requirement that overflows
    /// `usize` is reported as `BufferTooSmall { required: usize::MAX, .. }`.
    pub fn validate_strided_len(count: usize, stride: usize, len: usize) -> TransferResult<()> {
        if stride == 0 {
            return Err(TransferError::InvalidStride);
        }
        if count == 0 {
            return Ok(());
        }
        let required = stride
            .checked_mul(count - 1)
            .and_then(|n| n.checked_add(1))
            .unwrap_or(usize::MAX);
        if len < required {
            return Err(TransferError::BufferTooSmall {
                required,
                actual: len,
            });
        }
        Ok(())
    }
}
