use crate::geometry::PolygonLoop;
use crate::math::polygon_2d::cross;
use crate::math::Point2;

/// Local character of a loop vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexKind {
    /// Left turn on a counter-clockwise loop.
    Convex,
    /// Right turn or straight continuation.
    Concave,
}

/// Returns `true` when the path `prev → curr → next` turns left, i.e. the
/// vertex is convex on a counter-clockwise loop.
///
/// Straight (collinear) vertices are reported as not convex.
#[must_use]
pub fn is_convex(prev: &Point2, curr: &Point2, next: &Point2) -> bool {
    cross(&(curr - prev), &(next - curr)) > 0.0
}

/// Classifies vertex `i` of `polygon`.
///
/// # Panics
///
/// Panics if `i` is out of bounds.
#[must_use]
pub fn vertex_kind(polygon: &PolygonLoop, i: usize) -> VertexKind {
    let (prev, curr, next) = polygon.corner(i);
    if is_convex(&prev, &curr, &next) {
        VertexKind::Convex
    } else {
        VertexKind::Concave
    }
}

/// Classifies every vertex of `polygon`.
#[must_use]
pub fn classify(polygon: &PolygonLoop) -> Vec<VertexKind> {
    (0..polygon.len()).map(|i| vertex_kind(polygon, i)).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::generate::star;

    #[test]
    fn square_is_all_convex() {
        let sq = PolygonLoop::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        assert!(classify(&sq).iter().all(|k| *k == VertexKind::Convex));
    }

    #[test]
    fn clockwise_square_is_all_concave() {
        let sq = PolygonLoop::from_xy(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
        assert!(classify(&sq).iter().all(|k| *k == VertexKind::Concave));
    }

    #[test]
    fn star_tips_convex_notches_concave() {
        let s = star(Point2::new(0.0, 0.0), 10.0, 4.0, 5).unwrap();
        for (i, kind) in classify(&s).into_iter().enumerate() {
            let expected = if i % 2 == 0 { VertexKind::Convex } else { VertexKind::Concave };
            assert_eq!(kind, expected, "vertex {i}");
        }
    }

    #[test]
    fn straight_vertex_is_not_convex() {
        assert!(!is_convex(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(2.0, 0.0)
        ));
    }

    #[test]
    fn l_shape_has_one_concave_corner() {
        let l = PolygonLoop::from_xy(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 4.0),
            (4.0, 4.0),
            (4.0, 10.0),
            (0.0, 10.0),
        ]);
        let kinds = classify(&l);
        assert_eq!(kinds[3], VertexKind::Concave);
        assert_eq!(kinds.iter().filter(|k| **k == VertexKind::Convex).count(), 5);
    }
}
