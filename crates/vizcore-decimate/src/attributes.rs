//! Per-point and per-cell attribute arrays
//!
//! An attribute array stores fixed-width tuples (scalars, vectors, colors)
//! in one flat buffer. Decimation copies tuples positionally: output tuple
//! `k` is a copy of some input tuple, appended in output order.

use serde::{Deserialize, Serialize};

use crate::error::{DecimateError, DecimateResult};

/// A named array of fixed-width tuples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeArray {
    pub name: String,
    pub num_components: usize,
    pub values: Vec<f64>,
}

impl AttributeArray {
    /// Create an array from a flat buffer of `num_components`-wide tuples
    pub fn new(name: impl Into<String>, num_components: usize, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            num_components,
            values,
        }
    }

    /// Create a one-component array
    pub fn scalars(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::new(name, 1, values)
    }

    /// An empty array with the same name and width
    pub fn empty_like(&self) -> Self {
        Self::new(self.name.clone(), self.num_components, Vec::new())
    }

    /// Number of tuples
    pub fn num_tuples(&self) -> usize {
        if self.num_components == 0 {
            0
        } else {
            self.values.len() / self.num_components
        }
    }

    /// Tuple at `index`
    pub fn tuple(&self, index: usize) -> Option<&[f64]> {
        let start = index.checked_mul(self.num_components)?;
        self.values.get(start..start + self.num_components)
    }

    fn push_tuple(&mut self, tuple: &[f64]) {
        self.values.extend_from_slice(tuple);
    }

    fn validate(&self, expected: usize) -> DecimateResult<()> {
        if self.num_components == 0 || self.values.len() % self.num_components != 0 {
            return Err(DecimateError::RaggedAttribute {
                name: self.name.clone(),
                len: self.values.len(),
                num_components: self.num_components,
            });
        }
        if self.num_tuples() != expected {
            return Err(DecimateError::AttributeLength {
                name: self.name.clone(),
                expected,
                actual: self.num_tuples(),
            });
        }
        Ok(())
    }
}

/// The attribute arrays attached to a set of points or cells
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeData {
    arrays: Vec<AttributeArray>,
}

impl AttributeData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an array
    pub fn add_array(&mut self, array: AttributeArray) {
        self.arrays.push(array);
    }

    /// Find an array by name
    pub fn array(&self, name: &str) -> Option<&AttributeArray> {
        self.arrays.iter().find(|a| a.name == name)
    }

    pub fn arrays(&self) -> &[AttributeArray] {
        &self.arrays
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// Same arrays (names and widths) with no tuples
    pub fn copy_allocate(&self) -> Self {
        Self {
            arrays: self.arrays.iter().map(AttributeArray::empty_like).collect(),
        }
    }

    /// Append tuple `src_index` of every array in `source` to the matching array here.
    ///
    /// `self` must have been created with [`copy_allocate`](Self::copy_allocate)
    /// from `source`.
    pub fn copy_tuple(&mut self, source: &AttributeData, src_index: usize) {
        for (dst, src) in self.arrays.iter_mut().zip(&source.arrays) {
            if let Some(tuple) = src.tuple(src_index) {
                dst.push_tuple(tuple);
            }
        }
    }

    /// Check that every array holds exactly `expected` tuples
    pub fn validate(&self, expected: usize) -> DecimateResult<()> {
        self.arrays.iter().try_for_each(|a| a.validate(expected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AttributeData {
        let mut data = AttributeData::new();
        data.add_array(AttributeArray::scalars("density", vec![1.0, 2.0, 3.0]));
        data.add_array(AttributeArray::new(
            "velocity",
            2,
            vec![0.0, 0.1, 1.0, 1.1, 2.0, 2.1],
        ));
        data
    }

    #[test]
    fn test_tuple_access() {
        let data = sample();
        let velocity = data.array("velocity").unwrap();
        assert_eq!(velocity.num_tuples(), 3);
        assert_eq!(velocity.tuple(1), Some(&[1.0, 1.1][..]));
        assert_eq!(velocity.tuple(3), None);
    }

    #[test]
    fn test_copy_allocate_and_copy_tuple() {
        let data = sample();
        let mut out = data.copy_allocate();
        assert_eq!(out.array("density").unwrap().num_tuples(), 0);

        out.copy_tuple(&data, 2);
        out.copy_tuple(&data, 0);
        assert_eq!(out.array("density").unwrap().values, vec![3.0, 1.0]);
        assert_eq!(
            out.array("velocity").unwrap().values,
            vec![2.0, 2.1, 0.0, 0.1]
        );
    }

    #[test]
    fn test_validate() {
        let data = sample();
        assert!(data.validate(3).is_ok());
        assert!(matches!(
            data.validate(4),
            Err(DecimateError::AttributeLength { expected: 4, .. })
        ));

        let mut ragged = AttributeData::new();
        ragged.add_array(AttributeArray::new("rgb", 3, vec![0.0; 4]));
        assert!(matches!(
            ragged.validate(1),
            Err(DecimateError::RaggedAttribute { .. })
        ));
    }
}
