//! Polyline geometry containers
//!
//! - **Points**: 3D coordinates stored as `f32` or `f64`
//! - **CellArray**: polyline cells as offsets into a flat connectivity list
//! - **PolyData**: points, lines and their attribute data

use serde::{Deserialize, Serialize};

use crate::attributes::AttributeData;
use crate::config::OutputPrecision;
use crate::error::{DecimateError, DecimateResult};

/// Point coordinates in their storage precision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Points {
    Float32(Vec<[f32; 3]>),
    Float64(Vec<[f64; 3]>),
}

impl Default for Points {
    fn default() -> Self {
        Points::Float64(Vec::new())
    }
}

impl Points {
    /// Empty point set with the given storage.
    ///
    /// `Native` resolves to the precision of `like`.
    pub fn with_precision(precision: OutputPrecision, like: &Points) -> Self {
        match (precision, like) {
            (OutputPrecision::Single, _) | (OutputPrecision::Native, Points::Float32(_)) => {
                Points::Float32(Vec::new())
            }
            (OutputPrecision::Double, _) | (OutputPrecision::Native, Points::Float64(_)) => {
                Points::Float64(Vec::new())
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Points::Float32(p) => p.len(),
            Points::Float64(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether coordinates are stored as `f32`
    pub fn is_single_precision(&self) -> bool {
        matches!(self, Points::Float32(_))
    }

    /// Coordinates of point `id` widened to `f64`
    pub fn get(&self, id: usize) -> Option<[f64; 3]> {
        match self {
            Points::Float32(p) => p
                .get(id)
                .map(|&[x, y, z]| [x as f64, y as f64, z as f64]),
            Points::Float64(p) => p.get(id).copied(),
        }
    }

    /// Append a point, converting to the storage precision. Returns its id.
    pub fn push(&mut self, point: [f64; 3]) -> usize {
        match self {
            Points::Float32(p) => {
                p.push([point[0] as f32, point[1] as f32, point[2] as f32]);
                p.len() - 1
            }
            Points::Float64(p) => {
                p.push(point);
                p.len() - 1
            }
        }
    }
}

/// Cells stored as offsets into a flat list of point ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellArray {
    offsets: Vec<usize>,
    connectivity: Vec<usize>,
}

impl Default for CellArray {
    fn default() -> Self {
        Self {
            offsets: vec![0],
            connectivity: Vec::new(),
        }
    }
}

impl CellArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from one point-id list per cell
    pub fn from_cells<I, C>(cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[usize]>,
    {
        let mut array = Self::new();
        for cell in cells {
            array.insert_next_cell(cell.as_ref());
        }
        array
    }

    /// Append a cell. Returns its index.
    pub fn insert_next_cell(&mut self, point_ids: &[usize]) -> usize {
        self.connectivity.extend_from_slice(point_ids);
        self.offsets.push(self.connectivity.len());
        self.offsets.len() - 2
    }

    pub fn num_cells(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.num_cells() == 0
    }

    /// Total number of point references over all cells
    pub fn connectivity_len(&self) -> usize {
        self.connectivity.len()
    }

    /// Point ids of cell `index`
    pub fn cell(&self, index: usize) -> Option<&[usize]> {
        let start = *self.offsets.get(index)?;
        let end = *self.offsets.get(index + 1)?;
        Some(&self.connectivity[start..end])
    }

    /// Iterate over the cells in order
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.offsets
            .windows(2)
            .map(move |w| &self.connectivity[w[0]..w[1]])
    }
}

/// Polyline geometry with attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolyData {
    pub points: Points,
    pub lines: CellArray,
    pub point_data: AttributeData,
    pub cell_data: AttributeData,
}

impl PolyData {
    /// Geometry without attributes
    pub fn new(points: Points, lines: CellArray) -> Self {
        Self {
            points,
            lines,
            point_data: AttributeData::default(),
            cell_data: AttributeData::default(),
        }
    }

    /// Geometry from `f64` coordinates and per-cell point-id lists
    pub fn from_polylines<I, C>(points: Vec<[f64; 3]>, lines: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[usize]>,
    {
        Self::new(Points::Float64(points), CellArray::from_cells(lines))
    }

    /// Check that every cell references existing points and that attribute
    /// arrays match the point and cell counts.
    pub fn validate(&self) -> DecimateResult<()> {
        let num_points = self.points.len();
        for (cell, ids) in self.lines.iter().enumerate() {
            if let Some(&point_id) = ids.iter().find(|&&id| id >= num_points) {
                return Err(DecimateError::InvalidPointId {
                    cell,
                    point_id,
                    num_points,
                });
            }
        }
        self.point_data.validate(num_points)?;
        self.cell_data.validate(self.lines.num_cells())?;
        Ok(())
    }
}
