//! Doubly linked vertex list for a single polyline cell
//!
//! Vertices live in an arena addressed by their position in the input cell.
//! Removing a vertex relinks its neighbours; the arena slot stays behind,
//! so indices handed out earlier (e.g. queued in the priority heap) remain
//! meaningful.
//!
//! The first and last vertices are never removable. A polyline whose first
//! and last point ids are equal is a loop.

/// One vertex of a polyline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vertex {
    /// Position in the input cell
    pub index: usize,
    /// Id of the referenced point
    pub point_id: usize,
    pub prev: Option<usize>,
    pub next: Option<usize>,
    pub removable: bool,
    alive: bool,
}

/// A polyline as an arena-backed linked list
#[derive(Debug, Clone)]
pub struct Polyline {
    vertices: Vec<Vertex>,
    len: usize,
    is_loop: bool,
}

impl Polyline {
    /// Build the list for a cell's point ids
    pub fn new(point_ids: &[usize]) -> Self {
        let n = point_ids.len();
        let vertices = point_ids
            .iter()
            .enumerate()
            .map(|(index, &point_id)| Vertex {
                index,
                point_id,
                prev: index.checked_sub(1),
                next: (index + 1 < n).then_some(index + 1),
                removable: index > 0 && index + 1 < n,
                alive: true,
            })
            .collect();

        let is_loop = matches!((point_ids.first(), point_ids.last()), (Some(a), Some(b)) if a == b);

        Self {
            vertices,
            len: n,
            is_loop,
        }
    }

    /// Number of vertices still linked
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of vertices in the original cell
    pub fn capacity(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_loop(&self) -> bool {
        self.is_loop
    }

    /// Fewest vertices decimation may leave: two for open polylines,
    /// three for loops.
    pub fn min_len(&self) -> usize {
        if self.is_loop {
            3
        } else {
            2
        }
    }

    pub fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index).filter(|v| v.alive)
    }

    /// Whether `index` is linked and may be removed
    pub fn is_removable(&self, index: usize) -> bool {
        self.vertex(index).is_some_and(|v| v.removable)
    }

    /// Current neighbours of an interior vertex
    pub fn neighbors(&self, index: usize) -> Option<(usize, usize)> {
        let v = self.vertex(index)?;
        Some((v.prev?, v.next?))
    }

    /// Unlink vertex `index`, returning its former neighbours.
    ///
    /// Returns `None` for endpoints and for vertices already removed.
    pub fn remove(&mut self, index: usize) -> Option<(usize, usize)> {
        if !self.is_removable(index) {
            return None;
        }
        let (prev, next) = self.neighbors(index)?;

        self.vertices[prev].next = Some(next);
        self.vertices[next].prev = Some(prev);

        let v = &mut self.vertices[index];
        v.prev = None;
        v.next = None;
        v.alive = false;
        self.len -= 1;

        Some((prev, next))
    }

    /// Surviving vertices, head to tail
    pub fn iter(&self) -> impl Iterator<Item = &Vertex> + '_ {
        let head = self.vertices.first().map(|_| 0);
        std::iter::successors(head, move |&i| self.vertices[i].next).map(move |i| &self.vertices[i])
    }

    /// Point ids of the surviving vertices, head to tail
    pub fn point_ids(&self) -> Vec<usize> {
        self.iter().map(|v| v.point_id).collect()
    }
}
