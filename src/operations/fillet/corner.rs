use crate::error::GeometryError;
use crate::math::arc_2d::{angle_from, arc_segment_count, arc_span_for_wedge, tessellate_arc};
use crate::math::{Point2, ANGLE_EPSILON, EDGE_EPSILON};
use crate::operations::classify::is_convex;

use super::conflict::{ConflictDecision, DecisionCache, RadiusConflict};
use super::radius::is_active;

/// Fraction of the shorter adjacent edge a tangent point may reach before the
/// fillet is rejected outright.
const MAX_TANGENT_RATIO: f64 = 0.8;

/// Safety margin applied to a shrunk tangent distance.
const SHRINK_MARGIN: f64 = 0.95;

/// Why a vertex keeps its sharp corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Radius is zero or negative.
    NoRadius,
    /// An adjacent edge is shorter than the edge tolerance.
    ShortEdge,
    /// The two edges are collinear or fold back on each other.
    StraightOrReversed,
    /// Edge directions cancel, so the arc center is undefined.
    DegenerateBisector,
}

impl SkipReason {
    /// Human-readable reason, used for diagnostics.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::NoRadius => "no fillet radius",
            Self::ShortEdge => "adjacent edge too short to fillet",
            Self::StraightOrReversed => "corner is straight or reversed; cannot fillet",
            Self::DegenerateBisector => "degenerate corner bisector; cannot fillet",
        }
    }
}

/// A planned fillet arc replacing one vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct FilletArc {
    pub vertex: usize,
    pub center: Point2,
    /// Radius actually used (smaller than requested if shrunk).
    pub radius: f64,
    pub requested_radius: f64,
    pub tangent_distance: f64,
    /// Tangent point on the incoming edge; first emitted point.
    pub start: Point2,
    /// Tangent point on the outgoing edge; last emitted point.
    pub end: Point2,
    pub start_angle: f64,
    /// Signed angle swept from `start`; positive is counter-clockwise.
    pub sweep: f64,
    pub segments: usize,
}

impl FilletArc {
    #[must_use]
    pub fn was_shrunk(&self) -> bool {
        self.radius < self.requested_radius
    }

    /// Samples the arc into `segments + 1` points from `start` to `end`.
    #[must_use]
    pub fn points(&self) -> Vec<Point2> {
        tessellate_arc(&self.center, self.radius, self.start_angle, self.sweep, self.segments)
    }
}

/// The outcome of planning one vertex.
#[derive(Debug, Clone, PartialEq)]
pub enum CornerPlan {
    Sharp { vertex: usize, reason: SkipReason },
    Arc(FilletArc),
}

impl CornerPlan {
    #[must_use]
    pub fn vertex(&self) -> usize {
        match self {
            Self::Sharp { vertex, .. } => *vertex,
            Self::Arc(arc) => arc.vertex,
        }
    }
}

/// Geometry of one corner `prev → curr → next`.
pub(crate) struct Corner {
    pub vertex: usize,
    pub prev: Point2,
    pub curr: Point2,
    pub next: Point2,
}

impl Corner {
    /// Plans the fillet of this corner with `radius`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::TangentOverflow`] when the tangent distance
    /// exceeds 0.8x the shorter adjacent edge.
    pub fn plan(
        &self,
        radius: f64,
        precision: f64,
        decisions: &mut DecisionCache<'_>,
    ) -> Result<CornerPlan, GeometryError> {
        let sharp = |reason| {
            Ok(CornerPlan::Sharp {
                vertex: self.vertex,
                reason,
            })
        };

        if !is_active(radius) {
            return sharp(SkipReason::NoRadius);
        }

        let to_prev = self.prev - self.curr;
        let to_next = self.next - self.curr;
        let len_prev = to_prev.norm();
        let len_next = to_next.norm();
        if len_prev < EDGE_EPSILON || len_next < EDGE_EPSILON {
            return sharp(SkipReason::ShortEdge);
        }
        let u_prev = to_prev / len_prev;
        let u_next = to_next / len_next;

        let wedge = u_prev.dot(&u_next).clamp(-1.0, 1.0).acos();
        if wedge < ANGLE_EPSILON || (wedge - std::f64::consts::PI).abs() < ANGLE_EPSILON {
            return sharp(SkipReason::StraightOrReversed);
        }
        let half_tan = (wedge / 2.0).tan();

        let min_edge = len_prev.min(len_next);
        let half_min_edge = 0.5 * min_edge;
        let max_allowed = MAX_TANGENT_RATIO * min_edge;

        let mut radius_used = radius;
        let mut tangent = radius / half_tan;
        if tangent > max_allowed {
            return Err(GeometryError::TangentOverflow {
                vertex: self.vertex,
                radius,
                tangent_distance: tangent,
                max_allowed,
                edge_length: min_edge,
            });
        }
        if tangent > half_min_edge {
            let conflict = RadiusConflict {
                vertex: self.vertex,
                radius,
                tangent_distance: tangent,
                limit: half_min_edge,
            };
            if decisions.decide(&conflict) == ConflictDecision::Shrink {
                radius_used = half_min_edge * half_tan * SHRINK_MARGIN;
                tangent = half_min_edge * SHRINK_MARGIN;
            }
        }

        let start = self.curr + u_prev * tangent;
        let end = self.curr + u_next * tangent;

        let bisector = u_prev + u_next;
        let bisector_len = bisector.norm();
        if bisector_len < EDGE_EPSILON {
            return sharp(SkipReason::DegenerateBisector);
        }
        let center = self.curr + bisector / bisector_len * (radius_used / (wedge / 2.0).sin());

        let span = arc_span_for_wedge(wedge);
        let sweep = if is_convex(&self.prev, &self.curr, &self.next) {
            span
        } else {
            -span
        };

        Ok(CornerPlan::Arc(FilletArc {
            vertex: self.vertex,
            center,
            radius: radius_used,
            requested_radius: radius,
            tangent_distance: tangent,
            start,
            end,
            start_angle: angle_from(&center, &start),
            sweep,
            segments: arc_segment_count(radius_used, span, precision),
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::fillet::conflict::ConflictPolicy;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    fn corner(prev: (f64, f64), curr: (f64, f64), next: (f64, f64)) -> Corner {
        Corner {
            vertex: 0,
            prev: Point2::new(prev.0, prev.1),
            curr: Point2::new(curr.0, curr.1),
            next: Point2::new(next.0, next.1),
        }
    }

    fn plan(c: &Corner, radius: f64, policy: ConflictPolicy) -> Result<CornerPlan, GeometryError> {
        let mut policy = policy;
        let mut cache = DecisionCache::new(&mut policy);
        c.plan(radius, 0.01, &mut cache)
    }

    #[test]
    fn convex_right_angle() {
        let c = corner((0.0, 0.0), (10.0, 0.0), (10.0, 10.0));
        let CornerPlan::Arc(arc) = plan(&c, 2.0, ConflictPolicy::Force).unwrap() else {
            panic!("expected arc");
        };
        assert_abs_diff_eq!(arc.center.x, 8.0, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.center.y, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.tangent_distance, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.sweep, FRAC_PI_2, epsilon = 1e-12);
        let pts = arc.points();
        assert_eq!(pts.len(), arc.segments + 1);
        assert_abs_diff_eq!(pts[0].x, 8.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pts[0].y, 0.0, epsilon = 1e-9);
        let last = pts.last().unwrap();
        assert_abs_diff_eq!(last.x, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(last.y, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn concave_corner_sweeps_clockwise() {
        let c = corner((0.0, 0.0), (10.0, 0.0), (10.0, -10.0));
        let CornerPlan::Arc(arc) = plan(&c, 1.0, ConflictPolicy::Force).unwrap() else {
            panic!("expected arc");
        };
        assert!(arc.sweep < 0.0);
        for p in arc.points() {
            assert_abs_diff_eq!((p - arc.center).norm(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn zero_radius_keeps_corner() {
        let c = corner((0.0, 0.0), (10.0, 0.0), (10.0, 10.0));
        let result = plan(&c, 0.0, ConflictPolicy::Force).unwrap();
        assert_eq!(
            result,
            CornerPlan::Sharp {
                vertex: 0,
                reason: SkipReason::NoRadius
            }
        );
    }

    #[test]
    fn straight_corner_is_skipped() {
        let c = corner((0.0, 0.0), (5.0, 0.0), (10.0, 0.0));
        assert!(matches!(
            plan(&c, 1.0, ConflictPolicy::Force).unwrap(),
            CornerPlan::Sharp {
                reason: SkipReason::StraightOrReversed,
                ..
            }
        ));
    }

    #[test]
    fn tangent_overflow_is_fatal() {
        // Edges of length 10: radius 9 on a right angle needs t = 9 > 8.
        let c = corner((0.0, 0.0), (10.0, 0.0), (10.0, 10.0));
        let err = plan(&c, 9.0, ConflictPolicy::Force).unwrap_err();
        assert!(matches!(err, GeometryError::TangentOverflow { vertex: 0, .. }));
    }

    #[test]
    fn conflict_shrink_limits_tangent() {
        // t = 6 lies between 5 (half edge) and 8 (0.8 edge).
        let c = corner((0.0, 0.0), (10.0, 0.0), (10.0, 10.0));
        let CornerPlan::Arc(arc) = plan(&c, 6.0, ConflictPolicy::Shrink).unwrap() else {
            panic!("expected arc");
        };
        assert_abs_diff_eq!(arc.tangent_distance, 4.75, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.radius, 4.75, epsilon = 1e-9);
        assert!(arc.was_shrunk());
    }

    #[test]
    fn conflict_force_keeps_radius() {
        let c = corner((0.0, 0.0), (10.0, 0.0), (10.0, 10.0));
        let CornerPlan::Arc(arc) = plan(&c, 6.0, ConflictPolicy::Force).unwrap() else {
            panic!("expected arc");
        };
        assert_abs_diff_eq!(arc.radius, 6.0, epsilon = 1e-12);
        assert!(!arc.was_shrunk());
    }
}
