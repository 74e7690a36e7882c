use std::cmp::Ordering;

use tracing::debug;

use crate::diagnostics::{Report, Subject};
use crate::error::Result;
use crate::geometry::PolygonLoop;
use crate::operations::fillet::{ConflictResolver, FilletConfig};
use crate::operations::offset::LoopOffset2D;
use crate::operations::polygon::Shape;
use crate::region::{Quantizer, Region};

/// Default inward zoom of a via's inner boundary.
pub const DEFAULT_INNER_ZOOM: f64 = -1.0;

/// Default outward zoom of a via's outer boundary.
pub const DEFAULT_OUTER_ZOOM: f64 = 1.0;

/// Builds a single band around a contour, bounded by two zooms of it.
///
/// The inner boundary is `offset(contour, inner_zoom)` and the outer one
/// `offset(contour, outer_zoom)`; each is filleted with radii adjusted for
/// its own zoom.
#[derive(Debug)]
pub struct BuildVia<'a> {
    polygon: &'a PolygonLoop,
    inner_zoom: f64,
    outer_zoom: f64,
    fillet: FilletConfig,
}

impl<'a> BuildVia<'a> {
    #[must_use]
    pub fn new(polygon: &'a PolygonLoop, inner_zoom: f64, outer_zoom: f64, fillet: FilletConfig) -> Self {
        Self {
            polygon,
            inner_zoom,
            outer_zoom,
            fillet,
        }
    }

    /// Via with the default zooms of -1 and +1.
    #[must_use]
    pub fn with_default_zoom(polygon: &'a PolygonLoop, fillet: FilletConfig) -> Self {
        Self::new(polygon, DEFAULT_INNER_ZOOM, DEFAULT_OUTER_ZOOM, fillet)
    }

    /// # Errors
    ///
    /// Propagates [`crate::error::GeometryError::TangentOverflow`].
    pub fn execute(&self, quantizer: &Quantizer, resolver: &mut dyn ConflictResolver) -> Result<Shape> {
        let mut report = Report::new();
        if !self.polygon.is_valid() {
            report.warn(
                Subject::Loop,
                format!("via contour needs at least 3 vertices, got {}", self.polygon.len()),
            );
            return Ok(Shape::empty(quantizer, report));
        }
        if self.outer_zoom.partial_cmp(&self.inner_zoom) != Some(Ordering::Greater) {
            report.warn(
                Subject::Loop,
                format!(
                    "outer zoom {} must exceed inner zoom {}",
                    self.outer_zoom, self.inner_zoom
                ),
            );
            return Ok(Shape::empty(quantizer, report));
        }

        let seed = self.polygon.to_counterclockwise();
        let mut boundary = |zoom: f64, report: &mut Report| -> Result<PolygonLoop> {
            let zoomed = LoopOffset2D::new(&seed, zoom).execute_with_report(report);
            self.fillet.apply(&zoomed, zoom, -zoom, resolver, report, &Subject::Loop)
        };
        let inner = boundary(self.inner_zoom, &mut report)?;
        let outer = boundary(self.outer_zoom, &mut report)?;

        let region = Region::from_loop(&outer, quantizer) - Region::from_loop(&inner, quantizer);
        debug!(area = region.area(), "via built");
        Ok(Shape {
            region,
            boundaries: vec![inner, outer],
            report,
        })
    }
}
