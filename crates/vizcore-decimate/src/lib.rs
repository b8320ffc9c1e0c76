//! vizcore-decimate - Polyline decimation for scientific visualization
//!
//! Reduces the number of vertices in polyline cells (streamlines, contour
//! lines, particle tracks) while bounding the geometric error:
//!
//! - **PolyData**: points, line cells and per-point / per-cell attributes
//! - **Decimation**: repeatedly drops the interior vertex closest to the line
//!   through its neighbours
//! - **Config**: target reduction, maximum error and output precision,
//!   loadable from TOML or JSON
//!
//! # Example
//!
//! ```
//! use vizcore_decimate::{DecimatorConfig, PolyData, PolylineDecimator};
//!
//! let points = (0..5).map(|i| [i as f64, 0.0, 0.0]).collect();
//! let input = PolyData::from_polylines(points, [vec![0, 1, 2, 3, 4]]);
//!
//! let decimator = PolylineDecimator::new(DecimatorConfig::default()).unwrap();
//! let output = decimator.decimate(&input).unwrap();
//! assert_eq!(output.poly_data.lines.cell(0), Some(&[0, 1][..]));
//! ```

pub mod attributes;
pub mod config;
pub mod decimate;
pub mod error;
pub mod polydata;
pub mod polyline;
pub mod queue;

pub use attributes::{AttributeArray, AttributeData};
pub use config::{DecimatorConfig, OutputPrecision, DEFAULT_TARGET_REDUCTION};
pub use decimate::{DecimationOutput, DecimationSummary, PolylineDecimator};
pub use error::{DecimateError, DecimateResult};
pub use polydata::{CellArray, PolyData, Points};
pub use polyline::{Polyline, Vertex};
pub use queue::IndexedMinHeap;

// Setup UniFFI when the feature is enabled
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();
