use tracing::debug;

use crate::diagnostics::{Report, Subject};
use crate::error::Result;
use crate::geometry::PolygonLoop;
use crate::math::TOLERANCE;
use crate::operations::fillet::{ConflictResolver, FilletConfig};
use crate::operations::offset::LoopOffset2D;
use crate::region::{Quantizer, Region};

/// A finished single-band shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub region: Region,
    /// The filleted boundaries the region was built from.
    pub boundaries: Vec<PolygonLoop>,
    pub report: Report,
}

impl Shape {
    pub(crate) fn empty(quantizer: &Quantizer, report: Report) -> Self {
        Self {
            region: Region::empty(*quantizer),
            boundaries: Vec::new(),
            report,
        }
    }
}

/// Builds a filled polygon: zoom, fillet, then materialize.
#[derive(Debug)]
pub struct BuildPolygon<'a> {
    polygon: &'a PolygonLoop,
    fillet: FilletConfig,
    zoom: f64,
}

impl<'a> BuildPolygon<'a> {
    #[must_use]
    pub fn new(polygon: &'a PolygonLoop, fillet: FilletConfig, zoom: f64) -> Self {
        Self { polygon, fillet, zoom }
    }

    /// # Errors
    ///
    /// Propagates [`crate::error::GeometryError::TangentOverflow`].
    pub fn execute(&self, quantizer: &Quantizer, resolver: &mut dyn ConflictResolver) -> Result<Shape> {
        let mut report = Report::new();
        if !self.polygon.is_valid() {
            report.warn(
                Subject::Loop,
                format!("polygon needs at least 3 vertices, got {}", self.polygon.len()),
            );
            return Ok(Shape::empty(quantizer, report));
        }

        let seed = self.polygon.to_counterclockwise();
        let zoomed = if self.zoom.abs() < TOLERANCE {
            seed
        } else {
            LoopOffset2D::new(&seed, self.zoom).execute_with_report(&mut report)
        };
        let boundary = self
            .fillet
            .apply(&zoomed, self.zoom, -self.zoom, resolver, &mut report, &Subject::Loop)?;
        let region = Region::from_loop(&boundary, quantizer);
        debug!(vertices = boundary.len(), area = region.area(), "polygon built");
        Ok(Shape {
            region,
            boundaries: vec![boundary],
            report,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::fillet::ConflictPolicy;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn square() -> PolygonLoop {
        PolygonLoop::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])
    }

    fn build(polygon: &PolygonLoop, fillet: FilletConfig, zoom: f64) -> Shape {
        BuildPolygon::new(polygon, fillet, zoom)
            .execute(&Quantizer::default(), &mut ConflictPolicy::Force)
            .unwrap()
    }

    #[test]
    fn plain_polygon_area() {
        let shape = build(&square(), FilletConfig::None, 0.0);
        assert_abs_diff_eq!(shape.region.area(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn zoom_grows_polygon() {
        let shape = build(&square(), FilletConfig::None, 1.0);
        assert_abs_diff_eq!(shape.region.area(), 144.0, epsilon = 1e-9);
    }

    #[test]
    fn zoomed_fillet_radius_grows_with_zoom() {
        // Radius 2 at zoom 1 becomes 3 on the 12x12 square.
        let shape = build(&square(), FilletConfig::uniform(2.0), 1.0);
        let expected = 144.0 - 4.0 * (9.0 - PI * 9.0 / 4.0);
        assert!((shape.region.area() - expected).abs() < 0.05);
    }

    #[test]
    fn degenerate_polygon_is_empty() {
        let line = PolygonLoop::from_xy(&[(0.0, 0.0), (1.0, 1.0)]);
        let shape = build(&line, FilletConfig::None, 0.0);
        assert!(shape.region.is_empty());
        assert!(shape.report.has_warnings());
    }
}
