//! Dense table sampling
//!
//! Samples a [`PiecewiseFunction`] at evenly spaced positions, either in
//! linear or log10 space. Each segment between two nodes is shaped by the
//! left node's midpoint and sharpness:
//!
//! - sharpness < 0.01: piecewise linear
//! - sharpness > 0.99: piecewise constant, switching at the midpoint
//! - otherwise: a Hermite cubic compressed towards a step
//!
//! All arithmetic is done in `f64`; narrower outputs are converted one
//! sample at a time.

use crate::error::{validation, TransferResult};
use crate::function::PiecewiseFunction;
use crate::node::Node;

/// Midpoints are kept this far away from 0 and 1
const MIDPOINT_EPSILON: f64 = 0.00001;

/// Sharpness above which a segment is a step
const STEP_SHARPNESS: f64 = 0.99;

/// Sharpness below which a segment is a straight line
const LINEAR_SHARPNESS: f64 = 0.01;

/// Element type of a sample table
pub trait TableElement: Copy {
    fn from_f64(value: f64) -> Self;
}

impl TableElement for f64 {
    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }
}

impl TableElement for f32 {
    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

/// The two nodes surrounding a sample and the shape of the segment between them
#[derive(Clone, Copy, Debug, Default)]
struct Bracket {
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
    midpoint: f64,
    sharpness: f64,
}

impl Bracket {
    fn between(left: &Node, right: &Node) -> Self {
        Self {
            x1: left.x,
            x2: right.x,
            y1: left.y,
            y2: right.y,
            midpoint: left.midpoint.clamp(MIDPOINT_EPSILON, 1.0 - MIDPOINT_EPSILON),
            sharpness: left.sharpness,
        }
    }
}

/// Stateful evaluator over a sorted node slice.
///
/// `idx` is the number of nodes strictly left of the last sample. For
/// ascending samples the cursor only moves forward; a sample left of the
/// previous one re-seeks with a binary search.
pub(crate) struct Sampler<'a> {
    nodes: &'a [Node],
    clamping: bool,
    use_log_scale: bool,
    idx: usize,
    last_x: f64,
    bracket: Bracket,
}

impl<'a> Sampler<'a> {
    pub(crate) fn new(function: &'a PiecewiseFunction) -> Self {
        Self {
            nodes: function.nodes(),
            clamping: function.clamping(),
            use_log_scale: function.use_log_scale(),
            idx: 0,
            last_x: f64::NEG_INFINITY,
            bracket: Bracket::default(),
        }
    }

    fn seek(&mut self, x: f64) {
        let n = self.nodes.len();
        if x < self.last_x {
            self.idx = self.nodes.partition_point(|node| node.x < x);
            if self.idx > 0 && self.idx < n {
                self.bracket = Bracket::between(&self.nodes[self.idx - 1], &self.nodes[self.idx]);
            }
        } else {
            while self.idx < n && x > self.nodes[self.idx].x {
                self.idx += 1;
                if self.idx < n {
                    self.bracket =
                        Bracket::between(&self.nodes[self.idx - 1], &self.nodes[self.idx]);
                }
            }
        }
        self.last_x = x;
    }

    /// Evaluate the function at `x`
    pub(crate) fn sample(&mut self, x: f64) -> f64 {
        self.seek(x);

        let n = self.nodes.len();
        if self.idx >= n {
            return match (self.clamping, self.nodes.last()) {
                (true, Some(last)) => last.y,
                _ => 0.0,
            };
        }
        if self.idx == 0 {
            return if self.clamping { self.nodes[0].y } else { 0.0 };
        }

        let b = self.bracket;
        let s = if self.use_log_scale {
            let x1 = b.x1.log10();
            (x.log10() - x1) / (b.x2.log10() - x1)
        } else {
            (x - b.x1) / (b.x2 - b.x1)
        };
        shape_segment(s, b.y1, b.y2, b.midpoint, b.sharpness)
    }
}

/// Interpolate inside one segment.
///
/// `s` is the normalized position in `[0, 1]`; `midpoint` must already be
/// clear of 0 and 1.
fn shape_segment(s: f64, y1: f64, y2: f64, midpoint: f64, sharpness: f64) -> f64 {
    // s = midpoint maps to 0.5
    let mut s = if s < midpoint {
        0.5 * s / midpoint
    } else {
        0.5 + 0.5 * (s - midpoint) / (1.0 - midpoint)
    };

    if sharpness > STEP_SHARPNESS {
        return if s < 0.5 { y1 } else { y2 };
    }

    if sharpness < LINEAR_SHARPNESS {
        return (1.0 - s) * y1 + s * y2;
    }

    // Pull s towards the ends to sharpen the transition around 0.5
    let exponent = 1.0 + 10.0 * sharpness;
    if s < 0.5 {
        s = 0.5 * (s * 2.0).powf(exponent);
    } else if s > 0.5 {
        s = 1.0 - 0.5 * ((1.0 - s) * 2.0).powf(exponent);
    }

    let ss = s * s;
    let sss = ss * s;

    let h1 = 2.0 * sss - 3.0 * ss + 1.0;
    let h2 = -2.0 * sss + 3.0 * ss;
    let h3 = sss - 2.0 * ss + s;
    let h4 = sss - ss;

    // Same tangent at both ends
    let t = (1.0 - sharpness) * (y2 - y1);
    let value = h1 * y1 + h2 * y2 + h3 * t + h4 * t;

    let min = y1.min(y2);
    let max = y1.max(y2);
    value.max(min).min(max)
}

impl PiecewiseFunction {
    /// Sample the function at `size` evenly spaced positions over `[start, end]`.
    ///
    /// Sample `i` is written to `table[i * stride]`. With `log_increments`
    /// the positions are evenly spaced in log10 space. A single sample is
    /// taken halfway between `start` and `end`.
    ///
    /// Positions outside the node range evaluate to the nearest end value
    /// when clamping is on, and to 0 otherwise.
    pub fn get_table<T: TableElement>(
        &self,
        start: f64,
        end: f64,
        size: usize,
        table: &mut [T],
        stride: usize,
        log_increments: bool,
    ) -> TransferResult<()> {
        validation::validate_strided_len(size, stride, table.len())?;

        let (x_start, x_end) = if log_increments {
            (start.log10(), end.log10())
        } else {
            (start, end)
        };

        let mut sampler = Sampler::new(self);
        for i in 0..size {
            let mut x = if size > 1 {
                x_start + (i as f64 / (size - 1) as f64) * (x_end - x_start)
            } else {
                0.5 * (x_start + x_end)
            };
            if log_increments {
                x = 10f64.powf(x);
            }

            table[i * stride] = T::from_f64(sampler.sample(x));
        }
        Ok(())
    }

    /// Sample `size` evenly spaced values over `[start, end]` into a new vector
    pub fn table(&self, start: f64, end: f64, size: usize) -> Vec<f64> {
        let mut values = vec![0.0; size];
        // A contiguous buffer of the right length always validates
        let _ = self.get_table(start, end, size, &mut values, 1, false);
        values
    }

    /// Sample `size` evenly spaced values over `[start, end]` as `f32`
    pub fn table_f32(&self, start: f64, end: f64, size: usize) -> Vec<f32> {
        let mut values = vec![0.0f32; size];
        let _ = self.get_table(start, end, size, &mut values, 1, false);
        values
    }

    /// Evaluate the function at a single position
    pub fn value(&self, x: f64) -> f64 {
        Sampler::new(self).sample(x)
    }
}
