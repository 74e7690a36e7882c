//! Arc fillets for the corners of a closed loop.
//!
//! Each vertex with a positive radius is replaced by a tessellated circular
//! arc tangent to both adjacent edges. Convex and concave corners may use
//! different radii ([`FilletRadii::Adaptive`]).

mod config;
mod conflict;
mod corner;
mod radius;

pub use config::FilletConfig;
pub use conflict::{ConflictDecision, ConflictPolicy, ConflictResolver, RadiusConflict};
pub use corner::{CornerPlan, FilletArc, SkipReason};
pub use radius::{AdaptiveRadii, FilletRadii, RadiusSpec};

use tracing::debug;

use crate::diagnostics::{Report, Subject};
use crate::error::Result;
use crate::geometry::PolygonLoop;

use conflict::DecisionCache;
use corner::Corner;

/// Default maximum arc segment length in micrometers.
pub const DEFAULT_PRECISION: f64 = 0.01;

/// Smallest accepted arc segment length.
pub const MIN_PRECISION: f64 = 1e-6;

/// Result of a fillet call.
#[derive(Debug, Clone, PartialEq)]
pub struct Filleted {
    pub polygon: PolygonLoop,
    pub report: Report,
}

/// Result of planning a fillet call without tessellating.
///
/// `corners` is empty when the loop is passed through as a whole (too few
/// vertices, mismatched radius list, no positive radius).
#[derive(Debug, Clone, PartialEq)]
pub struct FilletPlan {
    pub corners: Vec<CornerPlan>,
    pub report: Report,
}

/// Replaces loop corners with tangent arcs.
///
/// # Example
///
/// ```
/// use maskring::geometry::PolygonLoop;
/// use maskring::operations::fillet::{ConflictPolicy, FilletLoop, FilletRadii, RadiusSpec};
///
/// let square = PolygonLoop::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
/// let rounded = FilletLoop::new(&square, FilletRadii::Uniform(RadiusSpec::Uniform(1.0)))
///     .precision(0.1)
///     .execute(&mut ConflictPolicy::Force)
///     .unwrap();
/// assert!(rounded.polygon.len() > square.len());
/// ```
#[derive(Debug)]
pub struct FilletLoop<'a> {
    polygon: &'a PolygonLoop,
    radii: FilletRadii,
    precision: f64,
}

impl<'a> FilletLoop<'a> {
    /// Creates a fillet operation with [`DEFAULT_PRECISION`].
    #[must_use]
    pub fn new(polygon: &'a PolygonLoop, radii: FilletRadii) -> Self {
        Self {
            polygon,
            radii,
            precision: DEFAULT_PRECISION,
        }
    }

    /// Sets the maximum arc segment length.
    #[must_use]
    pub fn precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    /// Plans every corner without emitting points.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::GeometryError::TangentOverflow`] if any
    /// vertex's tangent distance exceeds 0.8x its shorter adjacent edge.
    pub fn plan(&self, resolver: &mut dyn ConflictResolver) -> Result<FilletPlan> {
        let mut report = Report::new();
        let corners = self.plan_corners(resolver, &mut report)?.unwrap_or_default();
        Ok(FilletPlan { corners, report })
    }

    /// Fillets the loop.
    ///
    /// Vertices that cannot be filleted keep their sharp corner and are
    /// reported; the loop as a whole is returned unchanged when the input
    /// cannot be filleted at all.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::GeometryError::TangentOverflow`] if any
    /// vertex's tangent distance exceeds 0.8x its shorter adjacent edge. No
    /// partial result is produced.
    pub fn execute(&self, resolver: &mut dyn ConflictResolver) -> Result<Filleted> {
        let mut report = Report::new();
        let Some(corners) = self.plan_corners(resolver, &mut report)? else {
            return Ok(Filleted {
                polygon: self.polygon.clone(),
                report,
            });
        };

        let mut out = Vec::with_capacity(self.polygon.len());
        for (corner, vertex) in corners.iter().zip(self.polygon.vertices()) {
            match corner {
                CornerPlan::Sharp { .. } => out.push(*vertex),
                CornerPlan::Arc(arc) => out.extend(arc.points()),
            }
        }
        debug!(
            vertices_in = self.polygon.len(),
            vertices_out = out.len(),
            "fillet loop"
        );
        Ok(Filleted {
            polygon: PolygonLoop::new(out),
            report,
        })
    }

    fn plan_corners(
        &self,
        resolver: &mut dyn ConflictResolver,
        report: &mut Report,
    ) -> Result<Option<Vec<CornerPlan>>> {
        let n = self.polygon.len();
        if n < 3 {
            report.warn(
                Subject::Loop,
                format!("fillet needs at least 3 vertices, got {n}; loop left unchanged"),
            );
            return Ok(None);
        }
        if !self.precision.is_finite() || self.precision < MIN_PRECISION {
            report.warn(
                Subject::Loop,
                format!("invalid fillet precision {}; loop left unchanged", self.precision),
            );
            return Ok(None);
        }
        let Some(radii) = self.radii.per_vertex(self.polygon, report) else {
            return Ok(None);
        };
        if !radii.iter().any(|r| radius::is_active(*r)) {
            report.info(Subject::Loop, "no positive fillet radius; loop left unchanged");
            return Ok(None);
        }

        let mut decisions = DecisionCache::new(resolver);
        let mut corners = Vec::with_capacity(n);
        for (i, radius) in radii.into_iter().enumerate() {
            let (prev, curr, next) = self.polygon.corner(i);
            let corner = Corner {
                vertex: i,
                prev,
                curr,
                next,
            };
            let plan = corner.plan(radius, self.precision, &mut decisions)?;
            match &plan {
                CornerPlan::Sharp {
                    reason: SkipReason::NoRadius,
                    ..
                } => {}
                CornerPlan::Sharp { reason, .. } => report.warn(Subject::Vertex(i), reason.describe()),
                CornerPlan::Arc(arc) if arc.was_shrunk() => report.info(
                    Subject::Vertex(i),
                    format!("radius shrunk from {} to {:.4}", arc.requested_radius, arc.radius),
                ),
                CornerPlan::Arc(_) => {}
            }
            corners.push(plan);
        }
        Ok(Some(corners))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{GeometryError, MaskringError};
    use crate::geometry::generate::star;
    use crate::math::arc_2d::arc_segment_count;
    use crate::math::Point2;
    use std::f64::consts::FRAC_PI_2;

    fn square() -> PolygonLoop {
        PolygonLoop::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])
    }

    fn uniform(r: f64) -> FilletRadii {
        FilletRadii::Uniform(RadiusSpec::Uniform(r))
    }

    #[test]
    fn zero_radius_returns_identical_loop() {
        let sq = square();
        let out = FilletLoop::new(&sq, uniform(0.0))
            .execute(&mut ConflictPolicy::Force)
            .unwrap();
        assert_eq!(out.polygon, sq);
        assert!(!out.report.has_warnings());
        assert!(!out.report.is_empty());
    }

    #[test]
    fn square_corners_become_arcs() {
        let sq = square();
        let precision = 0.1;
        let out = FilletLoop::new(&sq, uniform(1.0))
            .precision(precision)
            .execute(&mut ConflictPolicy::Force)
            .unwrap();
        let per_corner = arc_segment_count(1.0, FRAC_PI_2, precision) + 1;
        assert_eq!(out.polygon.len(), 4 * per_corner);

        let centers = [
            Point2::new(1.0, 1.0),
            Point2::new(9.0, 1.0),
            Point2::new(9.0, 9.0),
            Point2::new(1.0, 9.0),
        ];
        // Vertex 0 is the corner at the origin, so its arc comes first.
        for (k, chunk) in out.polygon.vertices().chunks(per_corner).enumerate() {
            for p in chunk {
                assert!(((p - centers[k]).norm() - 1.0).abs() < 1e-9);
            }
        }
        assert!(!out.polygon.is_clockwise());
    }

    #[test]
    fn overflow_names_the_vertex() {
        let thin = PolygonLoop::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 1.0), (0.0, 1.0)]);
        let err = FilletLoop::new(&thin, uniform(2.0))
            .execute(&mut ConflictPolicy::Force)
            .unwrap_err();
        assert!(matches!(
            err,
            MaskringError::Geometry(GeometryError::TangentOverflow { vertex: 0, .. })
        ));
    }

    #[test]
    fn conflict_decision_is_asked_once_per_call() {
        // Short edges of length 2; t = 1.2 lies between 1.0 and 1.6.
        let thin = PolygonLoop::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 2.0), (0.0, 2.0)]);
        let mut asked = 0;
        let mut resolver = |_: &RadiusConflict| {
            asked += 1;
            ConflictDecision::Shrink
        };
        let plan = FilletLoop::new(&thin, uniform(1.2)).plan(&mut resolver).unwrap();
        assert_eq!(asked, 1);
        assert_eq!(plan.corners.len(), 4);
        for corner in &plan.corners {
            let CornerPlan::Arc(arc) = corner else {
                panic!("expected arc at vertex {}", corner.vertex());
            };
            assert!((arc.radius - 0.95).abs() < 1e-9);
        }
    }

    #[test]
    fn force_keeps_requested_radius() {
        let thin = PolygonLoop::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 2.0), (0.0, 2.0)]);
        let plan = FilletLoop::new(&thin, uniform(1.2))
            .plan(&mut ConflictPolicy::Force)
            .unwrap();
        assert!(plan
            .corners
            .iter()
            .all(|c| matches!(c, CornerPlan::Arc(arc) if (arc.radius - 1.2).abs() < 1e-12)));
    }

    #[test]
    fn per_vertex_list_mismatch_leaves_loop_unchanged() {
        let sq = square();
        let out = FilletLoop::new(&sq, FilletRadii::Uniform(RadiusSpec::PerVertex(vec![1.0, 1.0])))
            .execute(&mut ConflictPolicy::Force)
            .unwrap();
        assert_eq!(out.polygon, sq);
        assert!(out.report.has_warnings());
    }

    #[test]
    fn per_vertex_list_fillets_selected_corners() {
        let sq = square();
        let out = FilletLoop::new(&sq, FilletRadii::Uniform(RadiusSpec::PerVertex(vec![0.0, 2.0, 0.0, 0.0])))
            .precision(0.5)
            .execute(&mut ConflictPolicy::Force)
            .unwrap();
        let arc_points = arc_segment_count(2.0, FRAC_PI_2, 0.5) + 1;
        assert_eq!(out.polygon.len(), 3 + arc_points);
        assert_eq!(out.polygon.vertices()[0], Point2::new(0.0, 0.0));
    }

    #[test]
    fn adaptive_star_uses_both_radii() {
        let s = star(Point2::new(0.0, 0.0), 10.0, 5.0, 5).unwrap();
        let radii = FilletRadii::Adaptive(AdaptiveRadii::new(RadiusSpec::Uniform(0.5), RadiusSpec::Uniform(0.3)));
        let plan = FilletLoop::new(&s, radii).plan(&mut ConflictPolicy::Force).unwrap();
        for (i, corner) in plan.corners.iter().enumerate() {
            let CornerPlan::Arc(arc) = corner else {
                panic!("vertex {i} not filleted");
            };
            if i % 2 == 0 {
                assert!((arc.radius - 0.5).abs() < 1e-12);
                assert!(arc.sweep > 0.0);
            } else {
                assert!((arc.radius - 0.3).abs() < 1e-12);
                assert!(arc.sweep < 0.0);
            }
        }
    }

    #[test]
    fn invalid_precision_is_reported() {
        let sq = square();
        let out = FilletLoop::new(&sq, uniform(1.0))
            .precision(0.0)
            .execute(&mut ConflictPolicy::Force)
            .unwrap();
        assert_eq!(out.polygon, sq);
        assert!(out.report.has_warnings());
    }

    #[test]
    fn precision_below_floor_is_reported() {
        let sq = square();
        let out = FilletLoop::new(&sq, uniform(1.0))
            .precision(1e-15)
            .execute(&mut ConflictPolicy::Force)
            .unwrap();
        assert_eq!(out.polygon, sq);
        assert!(out.report.warnings().any(|d| d.subject == Subject::Loop));

        let at_floor = FilletLoop::new(&sq, uniform(1.0))
            .precision(MIN_PRECISION)
            .plan(&mut ConflictPolicy::Force)
            .unwrap();
        assert!(!at_floor.report.has_warnings());
    }

    #[test]
    fn straight_vertex_passes_through_with_warning() {
        let l = PolygonLoop::from_xy(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let out = FilletLoop::new(&l, uniform(1.0))
            .precision(1.0)
            .execute(&mut ConflictPolicy::Force)
            .unwrap();
        assert!(out.polygon.vertices().contains(&Point2::new(5.0, 0.0)));
        assert!(out.report.warnings().any(|d| d.subject == Subject::Vertex(1)));
    }
}
