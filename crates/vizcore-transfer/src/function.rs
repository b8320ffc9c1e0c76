//! Node-based piecewise function of a scalar X
//!
//! The function owns an ordered list of [`Node`]s, kept sorted ascending by
//! X after every mutation. Sorting is stable, so nodes sharing an X value
//! (only possible when duplicate scalars are allowed) keep their insertion
//! order. The cached range is always `(first.x, last.x)`, or `(0, 0)` when
//! the function is empty.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{validation, TransferError, TransferResult};
use crate::node::{FunctionType, Node, DEFAULT_MIDPOINT, DEFAULT_SHARPNESS};

/// Piecewise function used as a scalar transfer function
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FunctionState", into = "FunctionState")]
pub struct PiecewiseFunction {
    nodes: Vec<Node>,
    clamping: bool,
    allow_duplicate_scalars: bool,
    use_log_scale: bool,
    range: [f64; 2],
    generation: u64,
}

/// Serialized form of a [`PiecewiseFunction`]
#[derive(Clone, Debug, Serialize, Deserialize)]
struct FunctionState {
    #[serde(default = "default_clamping")]
    clamping: bool,
    #[serde(default)]
    allow_duplicate_scalars: bool,
    #[serde(default)]
    use_log_scale: bool,
    #[serde(default)]
    nodes: Vec<Node>,
}

fn default_clamping() -> bool {
    true
}

impl From<PiecewiseFunction> for FunctionState {
    fn from(function: PiecewiseFunction) -> Self {
        Self {
            clamping: function.clamping,
            allow_duplicate_scalars: function.allow_duplicate_scalars,
            use_log_scale: function.use_log_scale,
            nodes: function.nodes,
        }
    }
}

impl TryFrom<FunctionState> for PiecewiseFunction {
    type Error = TransferError;

    fn try_from(state: FunctionState) -> Result<Self, Self::Error> {
        for node in &state.nodes {
            validation::validate_coordinates(node.x, node.y)?;
            validation::validate_midpoint(node.midpoint)?;
            validation::validate_sharpness(node.sharpness)?;
        }

        let mut function = PiecewiseFunction {
            clamping: state.clamping,
            allow_duplicate_scalars: state.allow_duplicate_scalars,
            use_log_scale: state.use_log_scale,
            ..PiecewiseFunction::default()
        };
        for node in state.nodes {
            function.push_node(node);
        }
        function.sort_and_update_range();
        Ok(function)
    }
}

impl Default for PiecewiseFunction {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            clamping: true,
            allow_duplicate_scalars: false,
            use_log_scale: false,
            range: [0.0, 0.0],
            generation: 0,
        }
    }
}

impl PiecewiseFunction {
    /// Create an empty function with clamping on and duplicate scalars disallowed
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a function from nodes in any order.
    ///
    /// Duplicate scalars are disallowed, so the last of several nodes
    /// sharing an X wins.
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> TransferResult<Self> {
        PiecewiseFunction::try_from(FunctionState {
            clamping: true,
            allow_duplicate_scalars: false,
            use_log_scale: false,
            nodes: nodes.into_iter().collect(),
        })
    }

    // MARK: - Accessors

    /// Number of nodes
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in ascending X order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// `[first.x, last.x]`, or `[0, 0]` when empty
    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    pub fn clamping(&self) -> bool {
        self.clamping
    }

    /// Outside the node range, sample the nearest end value (on) or 0 (off)
    pub fn set_clamping(&mut self, clamping: bool) {
        if self.clamping != clamping {
            self.clamping = clamping;
            self.touch();
        }
    }

    pub fn allow_duplicate_scalars(&self) -> bool {
        self.allow_duplicate_scalars
    }

    /// When off, adding a point replaces the node already at that X
    pub fn set_allow_duplicate_scalars(&mut self, allow: bool) {
        if self.allow_duplicate_scalars != allow {
            self.allow_duplicate_scalars = allow;
            self.touch();
        }
    }

    pub fn use_log_scale(&self) -> bool {
        self.use_log_scale
    }

    /// Interpolate inside segments in log10(x) rather than x
    pub fn set_use_log_scale(&mut self, use_log_scale: bool) {
        if self.use_log_scale != use_log_scale {
            self.use_log_scale = use_log_scale;
            self.touch();
        }
    }

    /// Counter bumped by every mutation; lets callers cache derived tables
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    // MARK: - Internal ordering

    fn sort_and_update_range(&mut self) {
        // Vec::sort_by is stable
        self.nodes.sort_by(|a, b| a.x.total_cmp(&b.x));
        self.update_range();
        self.touch();
    }

    /// Recompute the cached range. Returns whether it changed.
    fn update_range(&mut self) -> bool {
        let old = self.range;
        self.range = match (self.nodes.first(), self.nodes.last()) {
            (Some(first), Some(last)) => [first.x, last.x],
            _ => [0.0, 0.0],
        };
        old != self.range
    }

    /// Append without sorting. Unless duplicate scalars are allowed, the
    /// node already at `node.x` is dropped first.
    fn push_node(&mut self, node: Node) {
        if !self.allow_duplicate_scalars {
            if let Some(index) = self.position_of(node.x, None) {
                self.nodes.remove(index);
            }
        }
        self.nodes.push(node);
    }

    fn position_of(&self, x: f64, y: Option<f64>) -> Option<usize> {
        self.nodes
            .iter()
            .position(|node| node.x == x && y.map_or(true, |y| node.y == y))
    }

    // MARK: - Adding and removing nodes

    /// Add a point with the neutral midpoint (0.5) and zero sharpness.
    ///
    /// Returns the index of the new node.
    pub fn add_point(&mut self, x: f64, y: f64) -> TransferResult<usize> {
        self.add_point_with(x, y, DEFAULT_MIDPOINT, DEFAULT_SHARPNESS)
    }

    /// Add a point with explicit midpoint and sharpness, both in `[0, 1]`.
    ///
    /// Unless duplicate scalars are allowed, the first node already at `x`
    /// is removed. Returns the index of the first node matching `(x, y)`
    /// after sorting.
    pub fn add_point_with(
        &mut self,
        x: f64,
        y: f64,
        midpoint: f64,
        sharpness: f64,
    ) -> TransferResult<usize> {
        validation::validate_coordinates(x, y)?;
        validation::validate_midpoint(midpoint)?;
        validation::validate_sharpness(sharpness)?;

        if !self.allow_duplicate_scalars {
            self.remove_point(x);
        }

        self.nodes.push(Node::new(x, y, midpoint, sharpness));
        self.sort_and_update_range();

        self.position_of(x, Some(y)).ok_or_else(|| {
            tracing::warn!(x, y, "added node could not be located");
            TransferError::NodeLookupFailed { x, y }
        })
    }

    /// Remove the first node at `x`. Returns its former index.
    pub fn remove_point(&mut self, x: f64) -> Option<usize> {
        let index = self.position_of(x, None)?;
        self.remove_at(index);
        Some(index)
    }

    /// Remove the first node at `(x, y)`. Returns its former index.
    pub fn remove_point_xy(&mut self, x: f64, y: f64) -> Option<usize> {
        let index = self.position_of(x, Some(y))?;
        self.remove_at(index);
        Some(index)
    }

    /// Remove the node at `index`
    pub fn remove_point_by_index(&mut self, index: usize) -> TransferResult<()> {
        validation::validate_index(index, self.nodes.len())?;
        self.remove_at(index);
        Ok(())
    }

    fn remove_at(&mut self, index: usize) {
        self.nodes.remove(index);
        // Removal keeps the order; only an end node can move the range
        if index == 0 || index == self.nodes.len() {
            self.update_range();
        }
        self.touch();
    }

    /// Remove every node and reset the range to `[0, 0]`
    pub fn remove_all_points(&mut self) {
        self.nodes.clear();
        self.sort_and_update_range();
    }

    /// Reset to an empty function
    pub fn initialize(&mut self) {
        self.remove_all_points();
    }

    /// Replace every node in `[x1, x2]` by a straight segment from `(x1, y1)` to `(x2, y2)`
    pub fn add_segment(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> TransferResult<()> {
        let before = self.nodes.len();
        self.nodes.retain(|node| !(node.x >= x1 && node.x <= x2));
        if self.nodes.len() != before {
            self.touch();
        }

        self.add_point(x1, y1)?;
        self.add_point(x2, y2)?;
        Ok(())
    }

    // MARK: - Node access

    /// Node at `index` as a value
    pub fn node_value(&self, index: usize) -> TransferResult<Node> {
        validation::validate_index(index, self.nodes.len())?;
        Ok(self.nodes[index])
    }

    /// Overwrite the node at `index`, re-sorting if its X moved
    pub fn set_node_value(&mut self, index: usize, node: Node) -> TransferResult<()> {
        validation::validate_index(index, self.nodes.len())?;
        validation::validate_coordinates(node.x, node.y)?;
        validation::validate_midpoint(node.midpoint)?;
        validation::validate_sharpness(node.sharpness)?;

        let old_x = self.nodes[index].x;
        self.nodes[index] = node;

        if old_x != node.x {
            self.sort_and_update_range();
        } else {
            self.touch();
        }
        Ok(())
    }

    // MARK: - Range editing

    /// Make `[min, max]` the function's range.
    ///
    /// A boundary inside the old range gets a node with the current function
    /// value there; a boundary outside it gets the value of the nearest old
    /// end node. Nodes outside `[min, max]` are then removed.
    pub fn adjust_range(&mut self, range: [f64; 2]) -> TransferResult<()> {
        let [min, max] = range;
        validation::validate_range(min, max)?;

        let [old_min, old_max] = self.range;

        let low = if old_min < min { min } else { old_min };
        let y = self.value(low);
        self.add_point(min, y)?;

        let high = if old_max > max { max } else { old_max };
        let y = self.value(high);
        self.add_point(max, y)?;

        self.nodes.retain(|node| node.x >= min && node.x <= max);
        self.sort_and_update_range();
        Ok(())
    }

    // MARK: - Queries

    /// Monotonicity of the node Y values in X order
    pub fn function_type(&self) -> FunctionType {
        FunctionType::classify(self.nodes.iter().map(|node| node.y))
    }

    /// X of the node preceding the first node with non-zero Y.
    ///
    /// All-zero functions give `f64::MAX`. When the very first node is
    /// non-zero the answer is `f64::MIN` with clamping on (the function is
    /// non-zero all the way down) and that node's X otherwise. An empty
    /// function gives 0.
    pub fn first_non_zero_value(&self) -> f64 {
        if self.nodes.is_empty() {
            return 0.0;
        }

        match self.nodes.iter().position(|node| node.y != 0.0) {
            None => f64::MAX,
            Some(0) if self.clamping => f64::MIN,
            Some(0) => self.nodes[0].x,
            Some(i) => self.nodes[i - 1].x,
        }
    }

    /// Smallest gap between consecutive node X values, `None` with fewer than two nodes
    pub fn find_minimum_x_distance(&self) -> Option<f64> {
        self.nodes
            .windows(2)
            .map(|pair| pair[1].x - pair[0].x)
            .reduce(f64::min)
    }

    /// Samples needed over `[x1, x2]` so no segment is skipped.
    ///
    /// `None` when fewer than two nodes exist or two nodes share an X.
    pub fn estimate_min_number_of_samples(&self, x1: f64, x2: f64) -> Option<usize> {
        let distance = self.find_minimum_x_distance()?;
        if distance <= 0.0 {
            return None;
        }
        let samples = ((x2 - x1) / distance).ceil();
        if samples.is_nan() {
            return None;
        }
        Some(samples.max(0.0) as usize)
    }

    // MARK: - Bulk construction

    /// Replace all nodes by `size` evenly spaced samples of `table` over `[start, end]`.
    ///
    /// Sample `i` is read from `table[i * stride]`.
    pub fn build_function_from_table(
        &mut self,
        start: f64,
        end: f64,
        size: usize,
        table: &[f64],
        stride: usize,
    ) -> TransferResult<()> {
        validation::validate_strided_len(size, stride, table.len())?;

        let inc = if size > 1 {
            (end - start) / (size - 1) as f64
        } else {
            0.0
        };

        self.nodes = (0..size)
            .map(|i| Node::linear(start + inc * i as f64, table[i * stride]))
            .collect();
        self.sort_and_update_range();
        Ok(())
    }

    /// Replace all nodes by `count` interleaved `(x, y)` pairs.
    ///
    /// A count of zero leaves the function unchanged.
    pub fn fill_from_data_pointer(&mut self, count: usize, data: &[f64]) -> TransferResult<()> {
        if count == 0 {
            return Ok(());
        }
        if data.len() < 2 * count {
            return Err(TransferError::BufferTooSmall {
                required: 2 * count,
                actual: data.len(),
            });
        }

        self.nodes = data
            .chunks_exact(2)
            .take(count)
            .map(|pair| Node::linear(pair[0], pair[1]))
            .collect();
        self.sort_and_update_range();
        Ok(())
    }

    /// Nodes as a flat `[x0, y0, x1, y1, ...]` buffer
    pub fn data_pointer(&self) -> Vec<f64> {
        self.nodes.iter().flat_map(|node| [node.x, node.y]).collect()
    }

    // MARK: - Copying

    /// Take `other`'s clamping flag and nodes.
    ///
    /// Nodes are re-added one by one, so this function's duplicate-scalar
    /// policy applies: with duplicates disallowed the last of several nodes
    /// sharing an X wins.
    pub fn deep_copy_from(&mut self, other: &PiecewiseFunction) {
        self.clamping = other.clamping;
        self.nodes.clear();
        for node in &other.nodes {
            self.push_node(*node);
        }
        self.sort_and_update_range();
    }

    /// Same as [`deep_copy_from`](Self::deep_copy_from); nodes are always owned values
    pub fn shallow_copy_from(&mut self, other: &PiecewiseFunction) {
        self.deep_copy_from(other);
    }

    // MARK: - Serialization

    /// Load a function from JSON
    pub fn from_json(json: &str) -> TransferResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the function to JSON
    pub fn to_json(&self) -> TransferResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for PiecewiseFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Clamping: {}", self.clamping)?;
        writeln!(f, "Range: [{},{}]", self.range[0], self.range[1])?;
        writeln!(f, "Function Points: {}", self.nodes.len())?;
        for (i, node) in self.nodes.iter().enumerate() {
            writeln!(
                f,
                "  {} X: {} Y: {} Sharpness: {} Midpoint: {}",
                i, node.x, node.y, node.sharpness, node.midpoint
            )?;
        }
        writeln!(f, "AllowDuplicateScalars: {}", self.allow_duplicate_scalars)?;
        write!(f, "UseLogScale: {}", self.use_log_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xs(f: &PiecewiseFunction) -> Vec<f64> {
        f.nodes().iter().map(|n| n.x).collect()
    }

    #[test]
    fn test_add_point_keeps_order_and_range() {
        let mut f = PiecewiseFunction::new();
        assert_eq!(f.add_point(5.0, 1.0), Ok(0));
        assert_eq!(f.add_point(1.0, 2.0), Ok(0));
        assert_eq!(f.add_point(3.0, 3.0), Ok(1));

        assert_eq!(xs(&f), vec![1.0, 3.0, 5.0]);
        assert_eq!(f.range(), [1.0, 5.0]);
        assert_eq!(f.size(), 3);
    }

    #[test]
    fn test_add_point_rejects_bad_shape() {
        let mut f = PiecewiseFunction::new();
        f.add_point(0.0, 1.0).unwrap();
        let generation = f.generation();

        assert_eq!(
            f.add_point_with(0.0, 2.0, 1.5, 0.0),
            Err(TransferError::InvalidMidpoint(1.5))
        );
        assert_eq!(
            f.add_point_with(0.0, 2.0, 0.5, -0.5),
            Err(TransferError::InvalidSharpness(-0.5))
        );
        // nothing was replaced
        assert_eq!(f.nodes(), &[Node::linear(0.0, 1.0)]);
        assert_eq!(f.generation(), generation);
    }

    #[test]
    fn test_add_point_replaces_existing_x() {
        let mut f = PiecewiseFunction::new();
        f.add_point_with(2.0, 1.0, 0.3, 0.2).unwrap();
        f.add_point_with(2.0, 1.0, 0.3, 0.2).unwrap();
        f.add_point_with(2.0, 4.0, 0.6, 0.1).unwrap();

        assert_eq!(f.nodes(), &[Node::new(2.0, 4.0, 0.6, 0.1)]);
    }

    #[test]
    fn test_duplicate_scalars_keep_insertion_order() {
        let mut f = PiecewiseFunction::new();
        f.set_allow_duplicate_scalars(true);
        f.add_point(1.0, 10.0).unwrap();
        f.add_point(0.0, 0.0).unwrap();
        f.add_point(1.0, 20.0).unwrap();
        f.add_point(1.0, 30.0).unwrap();

        let ys: Vec<f64> = f.nodes().iter().map(|n| n.y).collect();
        assert_eq!(ys, vec![0.0, 10.0, 20.0, 30.0]);
        assert_eq!(f.add_point(1.0, 20.0), Ok(2));
    }

    #[test]
    fn test_nan_point_rejected_without_mutation() {
        let mut f = PiecewiseFunction::new();
        f.add_point(0.0, 1.0).unwrap();
        f.add_point(1.0, 2.0).unwrap();
        let generation = f.generation();

        assert!(matches!(
            f.add_point(f64::NAN, 5.0),
            Err(TransferError::InvalidCoordinate { .. })
        ));
        assert!(f.add_point(0.5, f64::NAN).is_err());
        assert!(f.set_node_value(1, Node::linear(f64::NAN, 2.0)).is_err());

        assert_eq!(f.size(), 2);
        assert_eq!(f.range(), [0.0, 1.0]);
        assert_eq!(f.generation(), generation);
        assert_eq!(f.value(2.0), 2.0);
    }

    #[test]
    fn test_remove_point() {
        let mut f = PiecewiseFunction::from_nodes([
            Node::linear(0.0, 0.0),
            Node::linear(1.0, 1.0),
            Node::linear(2.0, 0.0),
        ])
        .unwrap();

        assert_eq!(f.remove_point(7.0), None);
        assert_eq!(f.remove_point_xy(1.0, 5.0), None);
        assert_eq!(f.remove_point(1.0), Some(1));
        assert_eq!(f.range(), [0.0, 2.0]);
        assert_eq!(f.remove_point_xy(2.0, 0.0), Some(1));
        assert_eq!(f.range(), [0.0, 0.0]);
        assert_eq!(f.size(), 1);
    }

    #[test]
    fn test_remove_point_by_index_is_strict() {
        let mut f = PiecewiseFunction::from_nodes([Node::linear(0.0, 0.0), Node::linear(4.0, 1.0)])
            .unwrap();

        assert_eq!(
            f.remove_point_by_index(2),
            Err(TransferError::IndexOutOfRange { index: 2, size: 2 })
        );
        f.remove_point_by_index(0).unwrap();
        assert_eq!(f.range(), [4.0, 4.0]);
    }

    #[test]
    fn test_remove_all_points() {
        let mut f = PiecewiseFunction::from_nodes([Node::linear(-1.0, 0.0), Node::linear(4.0, 1.0)])
            .unwrap();
        f.remove_all_points();
        assert_eq!(f.size(), 0);
        assert!(f.is_empty());
        assert_eq!(f.range(), [0.0, 0.0]);
    }

    #[test]
    fn test_node_value_roundtrip() {
        let mut f = PiecewiseFunction::from_nodes([Node::linear(0.0, 0.0), Node::linear(4.0, 1.0)])
            .unwrap();

        assert!(f.node_value(2).is_err());
        assert_eq!(f.node_value(1), Ok(Node::linear(4.0, 1.0)));

        let generation = f.generation();
        f.set_node_value(0, Node::new(0.0, 3.0, 0.4, 0.6)).unwrap();
        assert_eq!(f.node_value(0), Ok(Node::new(0.0, 3.0, 0.4, 0.6)));
        assert!(f.generation() > generation);
    }

    #[test]
    fn test_set_node_value_moves_node() {
        let mut f = PiecewiseFunction::from_nodes([
            Node::linear(0.0, 0.0),
            Node::linear(1.0, 1.0),
            Node::linear(2.0, 2.0),
        ])
        .unwrap();

        f.set_node_value(0, Node::linear(5.0, 9.0)).unwrap();
        assert_eq!(xs(&f), vec![1.0, 2.0, 5.0]);
        assert_eq!(f.range(), [1.0, 5.0]);

        assert_eq!(
            f.set_node_value(3, Node::linear(0.0, 0.0)),
            Err(TransferError::IndexOutOfRange { index: 3, size: 3 })
        );
        assert!(f.set_node_value(0, Node::new(1.0, 1.0, 2.0, 0.0)).is_err());
        assert_eq!(xs(&f), vec![1.0, 2.0, 5.0]);
    }

    #[test]
    fn test_add_segment() {
        let mut f = PiecewiseFunction::from_nodes([
            Node::linear(0.0, 0.0),
            Node::linear(1.0, 7.0),
            Node::linear(2.0, 3.0),
            Node::linear(3.0, 8.0),
            Node::linear(4.0, 1.0),
        ])
        .unwrap();

        f.add_segment(1.0, 2.0, 3.0, 6.0).unwrap();
        assert_eq!(xs(&f), vec![0.0, 1.0, 3.0, 4.0]);
        assert_eq!(f.value(2.0), 4.0);
    }

    #[test]
    fn test_adjust_range_inside() {
        let mut f = PiecewiseFunction::from_nodes([
            Node::linear(0.0, 0.0),
            Node::linear(10.0, 10.0),
            Node::linear(20.0, 0.0),
        ])
        .unwrap();

        f.adjust_range([5.0, 15.0]).unwrap();
        assert_eq!(
            f.nodes(),
            &[
                Node::linear(5.0, 5.0),
                Node::linear(10.0, 10.0),
                Node::linear(15.0, 5.0)
            ]
        );
        assert_eq!(f.range(), [5.0, 15.0]);
    }

    #[test]
    fn test_adjust_range_outside_clamps_to_ends() {
        let mut f = PiecewiseFunction::from_nodes([Node::linear(0.0, 2.0), Node::linear(1.0, 6.0)])
            .unwrap();

        f.adjust_range([-1.0, 3.0]).unwrap();
        assert_eq!(
            f.nodes(),
            &[
                Node::linear(-1.0, 2.0),
                Node::linear(0.0, 2.0),
                Node::linear(1.0, 6.0),
                Node::linear(3.0, 6.0)
            ]
        );
        assert!(f.adjust_range([3.0, -1.0]).is_err());
    }

    #[test]
    fn test_function_type() {
        let mut f = PiecewiseFunction::new();
        assert_eq!(f.function_type(), FunctionType::Constant);
        f.add_point(0.0, 1.0).unwrap();
        assert_eq!(f.function_type(), FunctionType::Constant);
        f.add_point(1.0, 1.0).unwrap();
        assert_eq!(f.function_type(), FunctionType::Constant);
        f.add_point(2.0, 3.0).unwrap();
        assert_eq!(f.function_type(), FunctionType::NonDecreasing);
        f.add_point(-1.0, 4.0).unwrap();
        assert_eq!(f.function_type(), FunctionType::Varied);
    }

    #[test]
    fn test_first_non_zero_value() {
        let mut f = PiecewiseFunction::new();
        assert_eq!(f.first_non_zero_value(), 0.0);

        f.add_point(0.0, 0.0).unwrap();
        f.add_point(1.0, 0.0).unwrap();
        assert_eq!(f.first_non_zero_value(), f64::MAX);

        f.add_point(2.0, 0.5).unwrap();
        assert_eq!(f.first_non_zero_value(), 1.0);

        let mut g = PiecewiseFunction::from_nodes([Node::linear(3.0, 1.0)]).unwrap();
        assert_eq!(g.first_non_zero_value(), f64::MIN);
        g.set_clamping(false);
        assert_eq!(g.first_non_zero_value(), 3.0);
    }

    #[test]
    fn test_minimum_distance_and_sample_estimate() {
        let mut f = PiecewiseFunction::new();
        f.add_point(0.0, 0.0).unwrap();
        assert_eq!(f.find_minimum_x_distance(), None);
        assert_eq!(f.estimate_min_number_of_samples(0.0, 1.0), None);

        f.add_point(0.5, 0.0).unwrap();
        f.add_point(0.75, 0.0).unwrap();
        assert_eq!(f.find_minimum_x_distance(), Some(0.25));
        assert_eq!(f.estimate_min_number_of_samples(0.0, 1.0), Some(4));
        assert_eq!(f.estimate_min_number_of_samples(0.0, 0.9), Some(4));
    }

    #[test]
    fn test_build_function_from_table() {
        let mut f = PiecewiseFunction::new();
        f.add_point(100.0, 1.0).unwrap();

        let table = [0.0, 9.0, 1.0, 9.0, 4.0];
        f.build_function_from_table(0.0, 2.0, 3, &table, 2).unwrap();
        assert_eq!(
            f.nodes(),
            &[
                Node::linear(0.0, 0.0),
                Node::linear(1.0, 1.0),
                Node::linear(2.0, 4.0)
            ]
        );

        assert!(f.build_function_from_table(0.0, 2.0, 4, &table, 2).is_err());
        assert_eq!(f.size(), 3);
    }

    #[test]
    fn test_fill_from_data_pointer() {
        let mut f = PiecewiseFunction::new();
        f.fill_from_data_pointer(3, &[2.0, 1.0, 0.0, 5.0, 1.0, 3.0]).unwrap();
        assert_eq!(xs(&f), vec![0.0, 1.0, 2.0]);
        assert_eq!(f.data_pointer(), vec![0.0, 5.0, 1.0, 3.0, 2.0, 1.0]);

        f.fill_from_data_pointer(0, &[]).unwrap();
        assert_eq!(f.size(), 3);
        assert!(f.fill_from_data_pointer(2, &[0.0, 1.0, 2.0]).is_err());
    }

    #[test]
    fn test_deep_copy() {
        let mut src = PiecewiseFunction::new();
        src.set_clamping(false);
        src.set_allow_duplicate_scalars(true);
        src.add_point(0.0, 1.0).unwrap();
        src.add_point(0.0, 2.0).unwrap();
        src.add_point_with(1.0, 3.0, 0.2, 0.8).unwrap();

        let mut dst = PiecewiseFunction::new();
        dst.add_point(9.0, 9.0).unwrap();
        dst.deep_copy_from(&src);

        assert!(!dst.clamping());
        assert_eq!(
            dst.nodes(),
            &[Node::linear(0.0, 2.0), Node::new(1.0, 3.0, 0.2, 0.8)]
        );

        let mut same = PiecewiseFunction::new();
        same.set_allow_duplicate_scalars(true);
        same.shallow_copy_from(&src);
        assert_eq!(same.nodes(), src.nodes());
    }

    #[test]
    fn test_json_roundtrip_resorts() {
        let json = r#"{
            "clamping": false,
            "nodes": [
                {"x": 2.0, "y": 1.0, "midpoint": 0.5, "sharpness": 0.0},
                {"x": -1.0, "y": 0.0, "midpoint": 0.25, "sharpness": 0.5}
            ]
        }"#;
        let f = PiecewiseFunction::from_json(json).unwrap();
        assert!(!f.clamping());
        assert_eq!(f.range(), [-1.0, 2.0]);

        let again = PiecewiseFunction::from_json(&f.to_json().unwrap()).unwrap();
        assert_eq!(again.nodes(), f.nodes());

        let bad = r#"{"nodes": [{"x": 0.0, "y": 0.0, "midpoint": 3.0, "sharpness": 0.0}]}"#;
        assert!(PiecewiseFunction::from_json(bad).is_err());
    }

    #[test]
    fn test_construction_drops_duplicate_scalars() {
        let f = PiecewiseFunction::from_nodes([
            Node::linear(1.0, 1.0),
            Node::linear(0.0, 0.0),
            Node::linear(1.0, 2.0),
        ])
        .unwrap();
        assert_eq!(f.nodes(), &[Node::linear(0.0, 0.0), Node::linear(1.0, 2.0)]);

        let json = r#"{
            "nodes": [
                {"x": 1.0, "y": 1.0, "midpoint": 0.5, "sharpness": 0.0},
                {"x": 1.0, "y": 2.0, "midpoint": 0.5, "sharpness": 0.0}
            ]
        }"#;
        let mut g = PiecewiseFunction::from_json(json).unwrap();
        assert_eq!(g.nodes(), &[Node::linear(1.0, 2.0)]);
        g.add_point(1.0, 3.0).unwrap();
        assert_eq!(g.nodes(), &[Node::linear(1.0, 3.0)]);

        let kept = json.replacen('{', r#"{"allow_duplicate_scalars": true,"#, 1);
        let h = PiecewiseFunction::from_json(&kept).unwrap();
        assert_eq!(h.size(), 2);

        let nan = r#"{"nodes": [{"x": NaN, "y": 0.0, "midpoint": 0.5, "sharpness": 0.0}]}"#;
        assert!(PiecewiseFunction::from_json(nan).is_err());
    }

    #[test]
    fn test_display() {
        let f = PiecewiseFunction::from_nodes([Node::linear(0.0, 1.0)]).unwrap();
        let text = f.to_string();
        assert!(text.contains("Function Points: 1"));
        assert!(text.contains("0 X: 0 Y: 1"));
    }
}
