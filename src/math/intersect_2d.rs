use super::{Point2, TOLERANCE};

/// Determinant of the 2x2 matrix with rows `(a0, a1)` and `(b0, b1)`.
fn det(a0: f64, a1: f64, b0: f64, b1: f64) -> f64 {
    a0 * b1 - a1 * b0
}

/// Intersection of the infinite lines through `(a0, a1)` and `(b0, b1)`.
///
/// Solved with the determinant (Cramer) form. Returns `None` when the lines
/// are parallel, i.e. when the sine of the angle between them is below
/// [`TOLERANCE`].
#[must_use]
pub fn line_line_intersect_2d(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> Option<Point2> {
    let xdiff = (a0.x - a1.x, b0.x - b1.x);
    let ydiff = (a0.y - a1.y, b0.y - b1.y);
    let div = det(xdiff.0, xdiff.1, ydiff.0, ydiff.1);

    let len_a = (a1 - a0).norm();
    let len_b = (b1 - b0).norm();
    if div.abs() <= TOLERANCE * len_a * len_b || len_a * len_b == 0.0 {
        return None;
    }

    let d = (det(a0.x, a0.y, a1.x, a1.y), det(b0.x, b0.y, b1.x, b1.y));
    let x = det(d.0, d.1, xdiff.0, xdiff.1) / div;
    let y = det(d.0, d.1, ydiff.0, ydiff.1) / div;
    Some(Point2::new(x, y))
}
