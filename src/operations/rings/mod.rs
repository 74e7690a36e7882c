//! Concentric ring stacks around a seed contour.

pub mod rule;

pub use rule::{expand_ranges, PerRing, RingRange};

use tracing::{debug, info};

use crate::diagnostics::{Report, Subject};
use crate::error::Result;
use crate::geometry::PolygonLoop;
use crate::math::TOLERANCE;
use crate::operations::fillet::{ConflictResolver, FilletConfig};
use crate::operations::offset::LoopOffset2D;
use crate::region::{Quantizer, Region};

/// Parameters of a ring stack.
#[derive(Debug, Clone, PartialEq)]
pub struct RingSpec {
    /// Seed contour; the inner boundary of ring 1 before zoom.
    pub polygon: PolygonLoop,
    pub width: PerRing<f64>,
    pub space: PerRing<f64>,
    pub count: usize,
    pub fillet: FilletConfig,
    /// Process bias: a positive zoom widens every ring by `zoom` on both
    /// sides, a negative one narrows it.
    pub zoom: f64,
}

impl RingSpec {
    /// Unfilleted, unzoomed stack.
    #[must_use]
    pub fn new(polygon: PolygonLoop, width: PerRing<f64>, space: PerRing<f64>, count: usize) -> Self {
        Self {
            polygon,
            width,
            space,
            count,
            fillet: FilletConfig::None,
            zoom: 0.0,
        }
    }

    #[must_use]
    pub fn fillet(mut self, fillet: FilletConfig) -> Self {
        self.fillet = fillet;
        self
    }

    #[must_use]
    pub fn zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }
}

/// One finished ring: filleted inner and outer boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct RingBand {
    /// 0-based position in the stack, innermost first.
    pub index: usize,
    pub inner: PolygonLoop,
    pub outer: PolygonLoop,
}

/// Result of building a ring stack.
#[derive(Debug, Clone, PartialEq)]
pub struct RingSet {
    /// Union of all ring bands.
    pub region: Region,
    pub rings: Vec<RingBand>,
    pub report: Report,
}

/// Builds a stack of concentric rings.
///
/// # Algorithm
///
/// 1. Normalize the seed to counter-clockwise and, for a non-zero zoom `z`,
///    start from `offset(seed, -z)` with widths `w + 2z` and spaces `s - 2z`.
/// 2. For ring `i`: inner = current loop, outer = `offset(inner, w_i)`,
///    next = `offset(outer, s_i)`.
/// 3. Fillet inner boundaries with `(c - z, k + z)` and outer boundaries with
///    `(c + w_i + z, k - w_i - z)`, where `(c, k)` are the configured convex
///    and concave radii.
/// 4. Each band is `outer - inner`; the result is the union of all bands.
#[derive(Debug)]
pub struct BuildRings {
    spec: RingSpec,
}

impl BuildRings {
    #[must_use]
    pub fn new(spec: RingSpec) -> Self {
        Self { spec }
    }

    /// Builds the stack.
    ///
    /// Invalid input yields an empty region with a warning. A non-positive
    /// effective spacing stops the stack after the current ring.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::error::GeometryError::TangentOverflow`] from any
    /// boundary fillet.
    pub fn execute(&self, quantizer: &Quantizer, resolver: &mut dyn ConflictResolver) -> Result<RingSet> {
        let spec = &self.spec;
        let mut report = Report::new();
        let empty = |report: Report| {
            Ok(RingSet {
                region: Region::empty(*quantizer),
                rings: Vec::new(),
                report,
            })
        };

        if !spec.polygon.is_valid() {
            report.warn(
                Subject::Loop,
                format!("ring seed needs at least 3 vertices, got {}", spec.polygon.len()),
            );
            return empty(report);
        }
        if spec.count == 0 {
            report.warn(Subject::Loop, "ring count is zero");
            return empty(report);
        }
        if !spec.width.matches(spec.count) {
            report.warn(
                Subject::Loop,
                format!("ring width list length does not match ring count {}", spec.count),
            );
            return empty(report);
        }
        if !spec.space.matches(spec.count) {
            report.warn(
                Subject::Loop,
                format!("ring space list length does not match ring count {}", spec.count),
            );
            return empty(report);
        }
        if !spec.zoom.is_finite() || spec.width.values().chain(spec.space.values()).any(|v| !v.is_finite()) {
            report.warn(Subject::Loop, "ring width, space and zoom must be finite");
            return empty(report);
        }

        let zoom = spec.zoom;
        let seed = spec.polygon.to_counterclockwise();
        let mut current = if zoom.abs() < TOLERANCE {
            seed
        } else {
            LoopOffset2D::new(&seed, -zoom).execute_with_report(&mut report)
        };

        let mut region = Region::empty(*quantizer);
        let mut rings = Vec::new();
        for i in 0..spec.count {
            let (Some(&width), Some(&space)) = (spec.width.get(i), spec.space.get(i)) else {
                break;
            };
            let subject = Subject::Ring(i);
            let width_eff = width + 2.0 * zoom;
            let space_eff = space - 2.0 * zoom;
            if width_eff <= 0.0 {
                report.warn(
                    subject.clone(),
                    format!("effective width {width_eff} is not positive; ring is empty"),
                );
            }

            let mut offsets = Report::new();
            let inner = current;
            let outer = LoopOffset2D::new(&inner, width_eff).execute_with_report(&mut offsets);
            let last = i + 1 == spec.count;
            let stop = !last && space_eff <= 0.0;
            current = if last || stop {
                PolygonLoop::default()
            } else {
                LoopOffset2D::new(&outer, space_eff).execute_with_report(&mut offsets)
            };
            report.absorb(offsets, Some(&subject));

            let inner_f = spec.fillet.apply(&inner, -zoom, zoom, resolver, &mut report, &subject)?;
            let outer_f = spec.fillet.apply(
                &outer,
                width + zoom,
                -(width + zoom),
                resolver,
                &mut report,
                &subject,
            )?;

            if inner_f.is_valid() && outer_f.is_valid() {
                let band = Region::from_loop(&outer_f, quantizer) - Region::from_loop(&inner_f, quantizer);
                debug!(ring = i + 1, area = band.area(), "ring band");
                region = region + band;
                rings.push(RingBand {
                    index: i,
                    inner: inner_f,
                    outer: outer_f,
                });
            } else {
                report.warn(subject.clone(), "filleted boundary is degenerate; ring skipped");
            }

            if stop {
                report.warn(
                    subject,
                    format!(
                        "effective spacing {space_eff} is not positive; remaining {} ring(s) omitted",
                        spec.count - i - 1
                    ),
                );
                break;
            }
        }

        info!(
            requested = spec.count,
            built = rings.len(),
            area = region.area(),
            "ring stack built"
        );
        Ok(RingSet { region, rings, report })
    }
}
