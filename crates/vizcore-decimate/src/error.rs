//! Error types for vizcore-decimate
//!
//! Missing geometry is not an error: an input without points or lines
//! decimates to an empty output. Errors are reserved for inputs that
//! cannot be interpreted and for invalid configuration.

use thiserror::Error;

/// Main error type for decimation
#[derive(Error, Debug)]
pub enum DecimateError {
    /// A cell references a point that does not exist
    #[error("Cell {cell} references point {point_id}, but only {num_points} points exist")]
    InvalidPointId {
        cell: usize,
        point_id: usize,
        num_points: usize,
    },

    /// An attribute array does not have one tuple per point or cell
    #[error("Attribute '{name}' has {actual} tuples, expected {expected}")]
    AttributeLength {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// An attribute array whose value count is not a multiple of its width
    #[error("Attribute '{name}' has {len} values, not a multiple of {num_components} components")]
    RaggedAttribute {
        name: String,
        len: usize,
        num_components: usize,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// TOML configuration could not be parsed
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// TOML configuration could not be written
    #[error("Failed to write configuration: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    /// JSON configuration could not be read or written
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for decimation
pub type DecimateResult<T> = Result<T, DecimateError>;
