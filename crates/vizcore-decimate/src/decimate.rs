//! Priority-queue polyline decimation
//!
//! Each line cell is reduced independently. Every interior vertex is scored
//! by its distance to the line through its two neighbours, and the
//! cheapest vertex is removed until the cell reaches the target reduction,
//! hits its minimum size, or no vertex within `maximum_error` remains.
//! After a removal the two neighbours are rescored against their new
//! neighbours.
//!
//! Surviving points are copied to a fresh point set. A point shared by
//! several cells is emitted once, and point and cell attributes follow
//! their points and cells into the output.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::DecimatorConfig;
use crate::error::DecimateResult;
use crate::polydata::{CellArray, PolyData, Points};
use crate::polyline::Polyline;
use crate::queue::IndexedMinHeap;

/// Counts describing one decimation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecimationSummary {
    /// Input cells visited before finishing or aborting
    pub cells_processed: usize,
    /// Vertices over all visited cells
    pub input_vertices: usize,
    /// Vertices over all emitted cells
    pub output_vertices: usize,
    /// Whether the abort flag stopped the run early
    pub aborted: bool,
}

/// Result of [`PolylineDecimator::decimate`]
#[derive(Debug, Clone, PartialEq)]
pub struct DecimationOutput {
    pub poly_data: PolyData,
    pub summary: DecimationSummary,
}

/// Reduces the vertex count of polyline cells
#[derive(Debug, Clone, Default)]
pub struct PolylineDecimator {
    config: DecimatorConfig,
    abort: Option<Arc<AtomicBool>>,
}

impl PolylineDecimator {
    /// Create a decimator after validating `config`
    pub fn new(config: DecimatorConfig) -> DecimateResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            abort: None,
        })
    }

    /// Stop between cells once `flag` is set
    pub fn with_abort_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.abort = Some(flag);
        self
    }

    pub fn config(&self) -> &DecimatorConfig {
        &self.config
    }

    pub fn abort_flag(&self) -> Option<&Arc<AtomicBool>> {
        self.abort.as_ref()
    }

    fn abort_requested(&self) -> bool {
        self.abort
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Decimate every line cell of `input`.
    ///
    /// An input without points or lines yields an empty output. Cells of
    /// fewer than three vertices pass through unchanged; empty cells are
    /// dropped.
    pub fn decimate(&self, input: &PolyData) -> DecimateResult<DecimationOutput> {
        let mut output = PolyData {
            points: Points::with_precision(self.config.output_precision, &input.points),
            lines: CellArray::new(),
            point_data: input.point_data.copy_allocate(),
            cell_data: input.cell_data.copy_allocate(),
        };
        let mut summary = DecimationSummary::default();

        if input.points.is_empty() || input.lines.is_empty() {
            debug!("No points or lines to decimate");
            return Ok(DecimationOutput {
                poly_data: output,
                summary,
            });
        }

        self.config.validate()?;
        input.validate()?;

        debug!(
            cells = input.lines.num_cells(),
            points = input.points.len(),
            target_reduction = self.config.target_reduction,
            maximum_error = self.config.maximum_error,
            "Decimating polylines"
        );

        let mut heap = IndexedMinHeap::new();
        let mut point_map: HashMap<usize, usize> = HashMap::new();

        for (cell_index, point_ids) in input.lines.iter().enumerate() {
            if self.abort_requested() {
                debug!(cell = cell_index, "Decimation aborted");
                summary.aborted = true;
                break;
            }
            summary.cells_processed += 1;
            summary.input_vertices += point_ids.len();

            if point_ids.is_empty() {
                trace!(cell = cell_index, "Skipping empty cell");
                continue;
            }

            let polyline = self.decimate_cell(&input.points, point_ids, &mut heap);
            heap.clear();

            let mut cell = Vec::with_capacity(polyline.len());
            for vertex in polyline.iter() {
                let id = match point_map.get(&vertex.point_id) {
                    Some(&id) => id,
                    None => {
                        let Some(coords) = input.points.get(vertex.point_id) else {
                            continue;
                        };
                        let id = output.points.push(coords);
                        output.point_data.copy_tuple(&input.point_data, vertex.point_id);
                        point_map.insert(vertex.point_id, id);
                        id
                    }
                };
                cell.push(id);
            }

            trace!(
                cell = cell_index,
                before = point_ids.len(),
                after = cell.len(),
                "Decimated cell"
            );

            summary.output_vertices += cell.len();
            output.lines.insert_next_cell(&cell);
            output.cell_data.copy_tuple(&input.cell_data, cell_index);
        }

        debug!(
            input_vertices = summary.input_vertices,
            output_vertices = summary.output_vertices,
            output_points = output.points.len(),
            aborted = summary.aborted,
            "Decimation finished"
        );

        Ok(DecimationOutput {
            poly_data: output,
            summary,
        })
    }

    fn decimate_cell(
        &self,
        points: &Points,
        point_ids: &[usize],
        heap: &mut IndexedMinHeap,
    ) -> Polyline {
        let mut polyline = Polyline::new(point_ids);
        let original = polyline.len() as f64;
        let target = self.config.target_reduction;
        let maximum_error = self.config.maximum_error;

        for index in 0..polyline.capacity() {
            if polyline.is_removable(index) {
                let error = vertex_error(points, &polyline, index);
                if error <= maximum_error {
                    heap.push(index, error);
                }
            }
        }

        while 1.0 - (polyline.len() as f64) / original < target
            && polyline.len() > polyline.min_len()
        {
            let Some((index, _)) = heap.pop() else {
                break;
            };
            let Some((prev, next)) = polyline.remove(index) else {
                continue;
            };

            for neighbor in [prev, next] {
                if !polyline.is_removable(neighbor) {
                    continue;
                }
                heap.remove(neighbor);
                let error = vertex_error(points, &polyline, neighbor);
                if error <= maximum_error {
                    heap.push(neighbor, error);
                }
            }
        }

        polyline
    }
}

/// Distance from vertex `index` to the line through its current
/// neighbours. Vertices that cannot be measured score infinity.
fn vertex_error(points: &Points, polyline: &Polyline, index: usize) -> f64 {
    let measured = polyline.neighbors(index).and_then(|(prev, next)| {
        let x = points.get(polyline.vertex(index)?.point_id)?;
        let p1 = points.get(polyline.vertex(prev)?.point_id)?;
        let p2 = points.get(polyline.vertex(next)?.point_id)?;
        Some(distance_to_line(x, p1, p2))
    });
    measured.unwrap_or(f64::INFINITY)
}

/// Distance from `x` to the infinite line through `p1` and `p2`.
///
/// Coincident `p1` and `p2` give zero.
fn distance_to_line(x: [f64; 3], p1: [f64; 3], p2: [f64; 3]) -> f64 {
    let d = sub(p2, p1);
    let len2 = dot(d, d);
    if len2 == 0.0 {
        return 0.0;
    }
    let c = cross(sub(x, p1), d);
    (dot(c, c) / len2).sqrt()
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}
