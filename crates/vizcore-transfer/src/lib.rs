//! vizcore-transfer - Piecewise transfer functions for scientific visualization
//!
//! A transfer function maps a scalar (density, temperature, ...) to a value
//! such as opacity. This crate provides the node-based piecewise function
//! used for that mapping:
//!
//! - **Nodes**: `(x, y, midpoint, sharpness)` control points kept sorted by X
//! - **Editing**: add/remove points, straight segments, range adjustment
//! - **Sampling**: dense tables over linear or log10 spaced positions,
//!   written with any stride into `f64` or `f32` buffers
//!
//! # Segment Shape
//!
//! Each segment is shaped by its left node:
//!
//! - `midpoint` moves the position where the curve reaches the average of
//!   the two end values
//! - `sharpness` blends from linear (0) through a Hermite curve to a step (1)

pub mod error;
pub mod function;
pub mod node;
pub mod table;

pub use error::{TransferError, TransferResult};
pub use function::PiecewiseFunction;
pub use node::{FunctionType, Node, DEFAULT_MIDPOINT, DEFAULT_SHARPNESS};
pub use table::TableElement;

// Setup UniFFI when the feature is enabled
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();
