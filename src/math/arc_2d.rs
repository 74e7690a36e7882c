//! 2D circular arc helpers used by the fillet engine.
//!
//! Angles are in radians; a positive sweep runs counter-clockwise.

use std::f64::consts::PI;

use super::{Point2, Vector2};

/// Normalizes the angle an arc spans at its center for a corner with
/// interior wedge angle `wedge`, into the range `(0, π]`.
#[must_use]
pub fn arc_span_for_wedge(wedge: f64) -> f64 {
    let mut span = PI - wedge;
    if span < 0.0 {
        span += 2.0 * PI;
    }
    if span > PI {
        span = 2.0 * PI - span;
    }
    span
}

/// Number of equal-angle segments for an arc so that no segment is longer
/// than `precision` (measured along the arc). Always at least 1.
#[must_use]
pub fn arc_segment_count(radius: f64, span: f64, precision: f64) -> usize {
    if radius <= 0.0 || span <= 0.0 || precision <= 0.0 {
        return 1;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (radius * span / precision).ceil() as usize;
    n.max(1)
}

/// Evaluates a point on an arc at parameter `t` in `[0, 1]`.
#[must_use]
pub fn arc_point_at(center: &Point2, radius: f64, start_angle: f64, sweep: f64, t: f64) -> Point2 {
    let angle = start_angle + sweep * t;
    Point2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

/// Polar angle of `p` as seen from `center`.
#[must_use]
pub fn angle_from(center: &Point2, p: &Point2) -> f64 {
    let v: Vector2 = p - center;
    v.y.atan2(v.x)
}

/// Samples an arc into `segments + 1` points, both endpoints included.
#[must_use]
pub fn tessellate_arc(
    center: &Point2,
    radius: f64,
    start_angle: f64,
    sweep: f64,
    segments: usize,
) -> Vec<Point2> {
    let segments = segments.max(1);
    #[allow(clippy::cast_precision_loss)]
    let inv = 1.0 / segments as f64;
    (0..=segments)
        .map(|j| {
            #[allow(clippy::cast_precision_loss)]
            let t = j as f64 * inv;
            arc_point_at(center, radius, start_angle, sweep, t)
        })
        .collect()
}
