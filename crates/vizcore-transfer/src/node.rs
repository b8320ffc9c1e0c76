//! Control points and function classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default midpoint for a new node
pub const DEFAULT_MIDPOINT: f64 = 0.5;

/// Default sharpness for a new node (piecewise linear)
pub const DEFAULT_SHARPNESS: f64 = 0.0;

/// One control point of a piecewise function.
///
/// `midpoint` and `sharpness` shape the segment that starts at this node
/// and ends at the next one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct Node {
    pub x: f64,
    pub y: f64,
    /// Normalized position in the segment where the curve reaches (y1 + y2) / 2
    pub midpoint: f64,
    /// 0 = linear, 1 = step
    pub sharpness: f64,
}

impl Node {
    /// Create a node with explicit shape parameters
    pub fn new(x: f64, y: f64, midpoint: f64, sharpness: f64) -> Self {
        Self {
            x,
            y,
            midpoint,
            sharpness,
        }
    }

    /// Create a node with the neutral midpoint and zero sharpness
    pub fn linear(x: f64, y: f64) -> Self {
        Self::new(x, y, DEFAULT_MIDPOINT, DEFAULT_SHARPNESS)
    }

    /// Values as `[x, y, midpoint, sharpness]`
    pub fn to_array(&self) -> [f64; 4] {
        [self.x, self.y, self.midpoint, self.sharpness]
    }

    /// Build a node from `[x, y, midpoint, sharpness]`
    pub fn from_array(values: [f64; 4]) -> Self {
        Self::new(values[0], values[1], values[2], values[3])
    }
}

/// Monotonicity of the node values taken in X order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum FunctionType {
    Constant,
    NonDecreasing,
    NonIncreasing,
    Varied,
}

impl FunctionType {
    /// Classify a sequence of Y values.
    ///
    /// Equal neighbours never change the classification; the scan stops as
    /// soon as both directions have been seen.
    pub fn classify<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter();
        let Some(mut prev) = values.next() else {
            return FunctionType::Constant;
        };

        let mut kind = FunctionType::Constant;
        for value in values {
            if value > prev {
                kind = match kind {
                    FunctionType::Constant | FunctionType::NonDecreasing => {
                        FunctionType::NonDecreasing
                    }
                    _ => FunctionType::Varied,
                };
            } else if value < prev {
                kind = match kind {
                    FunctionType::Constant | FunctionType::NonIncreasing => {
                        FunctionType::NonIncreasing
                    }
                    _ => FunctionType::Varied,
                };
            }
            prev = value;

            if kind == FunctionType::Varied {
                break;
            }
        }
        kind
    }

    /// Name used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionType::Constant => "Constant",
            FunctionType::NonDecreasing => "NonDecreasing",
            FunctionType::NonIncreasing => "NonIncreasing",
            FunctionType::Varied => "Varied",
        }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
