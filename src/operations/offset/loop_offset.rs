use tracing::debug;

use crate::diagnostics::{Report, Subject};
use crate::geometry::PolygonLoop;
use crate::math::intersect_2d::line_line_intersect_2d;
use crate::math::polygon_2d::{right_normal, segment_direction};
use crate::math::{Point2, Vector2, TOLERANCE};

/// Offsets every edge of a closed loop along its outward normal.
///
/// # Algorithm
///
/// 1. **Phase A**: translate each edge by `distance` along its right-hand
///    normal (outward for a counter-clockwise loop)
/// 2. **Phase B**: new vertex `i` is the intersection of offset edges `i-1`
///    and `i`. Parallel neighbours fall back to the end point of offset edge
///    `i-1` instead of a miter point.
///
/// No self-intersection trimming is performed: a concave loop or a large
/// inward distance may yield a self-intersecting loop, which region booleans
/// downstream resolve.
///
/// # Sign Convention
///
/// For a counter-clockwise loop, positive distance grows the polygon and
/// negative distance shrinks it. A clockwise loop is mirrored; normalize with
/// [`PolygonLoop::ensure_counterclockwise`] first.
#[derive(Debug)]
pub struct LoopOffset2D<'a> {
    polygon: &'a PolygonLoop,
    distance: f64,
}

impl<'a> LoopOffset2D<'a> {
    /// Creates a new loop offset operation.
    #[must_use]
    pub fn new(polygon: &'a PolygonLoop, distance: f64) -> Self {
        Self { polygon, distance }
    }

    /// Executes the offset, discarding diagnostics.
    #[must_use]
    pub fn execute(&self) -> PolygonLoop {
        self.execute_with_report(&mut Report::new())
    }

    /// Executes the offset and records degenerate input in `report`.
    ///
    /// Loops with fewer than three vertices are returned unchanged.
    pub fn execute_with_report(&self, report: &mut Report) -> PolygonLoop {
        let n = self.polygon.len();
        if n < 3 {
            report.warn(
                Subject::Loop,
                format!("offset needs at least 3 vertices, got {n}; loop left unchanged"),
            );
            return self.polygon.clone();
        }
        if self.distance.abs() < TOLERANCE {
            return self.polygon.clone();
        }

        let points = self.polygon.vertices();

        // Phase A: offset segments.
        let mut offset_segments: Vec<(Point2, Point2)> = Vec::with_capacity(n);
        for i in 0..n {
            let a = points[i];
            let b = points[(i + 1) % n];
            let normal = if let Some(dir) = segment_direction(&a, &b) {
                right_normal(&dir)
            } else {
                report.warn(
                    Subject::Vertex(i),
                    "zero-length edge to next vertex; edge is not translated",
                );
                Vector2::zeros()
            };
            let shift = normal * self.distance;
            offset_segments.push((a + shift, b + shift));
        }

        // Phase B: intersect consecutive offset lines.
        let mut vertices = Vec::with_capacity(n);
        for i in 0..n {
            let prev = &offset_segments[(i + n - 1) % n];
            let curr = &offset_segments[i];
            let corner = line_line_intersect_2d(&prev.0, &prev.1, &curr.0, &curr.1).unwrap_or(prev.1);
            vertices.push(corner);
        }

        debug!(vertices = n, distance = self.distance, "offset loop");
        PolygonLoop::new(vertices)
    }
}

/// Shorthand for `LoopOffset2D::new(polygon, distance).execute()`.
#[must_use]
pub fn offset(polygon: &PolygonLoop, distance: f64) -> PolygonLoop {
    LoopOffset2D::new(polygon, distance).execute()
}
