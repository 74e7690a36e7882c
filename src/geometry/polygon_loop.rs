use crate::math::polygon_2d::{is_clockwise, signed_area};
use crate::math::Point2;

/// A closed polygon boundary: an ordered, cyclic sequence of vertices.
///
/// The last vertex connects back to the first; no closing duplicate is
/// stored. Orientation is derived from the vertices on demand. Geometry
/// operations never mutate a loop; they return a new one. The only in-place
/// change is [`PolygonLoop::ensure_counterclockwise`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolygonLoop {
    vertices: Vec<Point2>,
}

impl PolygonLoop {
    /// Wraps a vertex list. No validation is performed; see [`Self::is_valid`].
    #[must_use]
    pub fn new(vertices: Vec<Point2>) -> Self {
        Self { vertices }
    }

    /// Builds a loop from `(x, y)` pairs.
    #[must_use]
    pub fn from_xy(coords: &[(f64, f64)]) -> Self {
        Self {
            vertices: coords.iter().map(|&(x, y)| Point2::new(x, y)).collect(),
        }
    }

    #[must_use]
    pub fn vertices(&self) -> &[Point2] {
        &self.vertices
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// A loop needs at least three vertices to enclose an area.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= 3
    }

    /// Signed area; positive for counter-clockwise loops.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.vertices)
    }

    #[must_use]
    pub fn is_clockwise(&self) -> bool {
        is_clockwise(&self.vertices)
    }

    /// Reverses the vertex order if the loop is clockwise.
    ///
    /// Returns `true` if the loop was flipped. Idempotent.
    pub fn ensure_counterclockwise(&mut self) -> bool {
        if self.is_clockwise() {
            self.vertices.reverse();
            true
        } else {
            false
        }
    }

    /// Returns a counter-clockwise copy of this loop.
    #[must_use]
    pub fn to_counterclockwise(&self) -> Self {
        let mut copy = self.clone();
        copy.ensure_counterclockwise();
        copy
    }

    /// Returns the `(previous, current, next)` vertices around index `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds.
    #[must_use]
    pub fn corner(&self, i: usize) -> (Point2, Point2, Point2) {
        let n = self.vertices.len();
        let prev = self.vertices[(i + n - 1) % n];
        let next = self.vertices[(i + 1) % n];
        (prev, self.vertices[i], next)
    }
}

impl From<Vec<Point2>> for PolygonLoop {
    fn from(vertices: Vec<Point2>) -> Self {
        Self::new(vertices)
    }
}
