//! Parametric loop generators. Every generator returns a counter-clockwise
//! loop.

use std::f64::consts::PI;

use super::PolygonLoop;
use crate::math::Point2;

/// Star polygon with `points` tips, alternating between `outer_radius` and
/// `inner_radius`. The first tip points straight down (angle −90°) and the
/// vertices advance counter-clockwise.
///
/// Returns `None` if `points < 2`.
#[must_use]
pub fn star(center: Point2, outer_radius: f64, inner_radius: f64, points: usize) -> Option<PolygonLoop> {
    if points < 2 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let step = PI / points as f64;
    let vertices = (0..points * 2)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let angle = step * i as f64 - PI / 2.0;
            let r = if i % 2 == 0 { outer_radius } else { inner_radius };
            Point2::new(center.x + r * angle.cos(), center.y + r * angle.sin())
        })
        .collect();
    Some(PolygonLoop::new(vertices))
}

/// Regular polygon with `sides` vertices on a circle of `radius`, the first
/// vertex at angle 0. Returns `None` if `sides < 3`.
#[must_use]
pub fn regular_polygon(center: Point2, radius: f64, sides: usize) -> Option<PolygonLoop> {
    if sides < 3 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let step = 2.0 * PI / sides as f64;
    let vertices = (0..sides)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let angle = step * i as f64;
            Point2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect();
    Some(PolygonLoop::new(vertices))
}

/// Axis-aligned rectangle centred on `center`.
#[must_use]
pub fn rectangle(center: Point2, width: f64, height: f64) -> PolygonLoop {
    let (hw, hh) = (width * 0.5, height * 0.5);
    PolygonLoop::from_xy(&[
        (center.x - hw, center.y - hh),
        (center.x + hw, center.y - hh),
        (center.x + hw, center.y + hh),
        (center.x - hw, center.y + hh),
    ])
    .to_counterclockwise()
}

/// Octagon whose top/bottom edges have length `vert_line` at distance `r1`
/// from the center and whose left/right edges have length `horiz_line` at
/// distance `r2`.
#[must_use]
pub fn octagon(vert_line: f64, horiz_line: f64, r1: f64, r2: f64, center: Point2) -> PolygonLoop {
    let a = vert_line / 2.0;
    let b = horiz_line / 2.0;
    let (cx, cy) = (center.x, center.y);
    PolygonLoop::from_xy(&[
        (cx - a, cy + r1),
        (cx + a, cy + r1),
        (cx + r2, cy + b),
        (cx + r2, cy - b),
        (cx + a, cy - r1),
        (cx - a, cy - r1),
        (cx - r2, cy - b),
        (cx - r2, cy + b),
    ])
    .to_counterclockwise()
}
