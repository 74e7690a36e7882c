//! Planar regions on the database grid.
//!
//! A [`Region`] is a set of polygons with holes, stored in integer database
//! units and combined with value-semantics boolean operators backed by
//! `geo`'s [`BooleanOps`]. Loops enter the grid through a [`Quantizer`]; all
//! geometry before that point is real-valued micrometers.

use std::ops::{Add, BitAnd, BitXor, Sub};

use geo::{Area, BooleanOps, BoundingRect, Contains, Coord, LineString, MultiPolygon, Point, Polygon};

use crate::geometry::PolygonLoop;
use crate::math::Point2;

/// Default database units per micrometer (dbu = 0.001 µm).
pub const DEFAULT_UNITS_PER_MICRON: f64 = 1000.0;

/// Maps micrometer coordinates onto the integer database grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantizer {
    units_per_micron: f64,
}

impl Default for Quantizer {
    fn default() -> Self {
        Self {
            units_per_micron: DEFAULT_UNITS_PER_MICRON,
        }
    }
}

impl Quantizer {
    /// Creates a quantizer from a database unit size in micrometers.
    ///
    /// Returns `None` if `dbu` is not a positive finite number.
    #[must_use]
    pub fn from_dbu(dbu: f64) -> Option<Self> {
        (dbu.is_finite() && dbu > 0.0).then(|| Self {
            units_per_micron: 1.0 / dbu,
        })
    }

    #[must_use]
    pub fn units_per_micron(&self) -> f64 {
        self.units_per_micron
    }

    /// Truncates toward zero onto the grid.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_grid(&self, value: f64) -> i64 {
        (value * self.units_per_micron).trunc() as i64
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_grid(&self, value: i64) -> f64 {
        value as f64 / self.units_per_micron
    }

    #[allow(clippy::cast_precision_loss)]
    fn coord(&self, p: &Point2) -> Coord<f64> {
        Coord {
            x: self.to_grid(p.x) as f64,
            y: self.to_grid(p.y) as f64,
        }
    }

    fn point(&self, c: Coord<f64>) -> Point2 {
        Point2::new(c.x / self.units_per_micron, c.y / self.units_per_micron)
    }
}

/// A set of grid-aligned polygons with holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    shapes: MultiPolygon<f64>,
    quantizer: Quantizer,
}

impl Default for Region {
    fn default() -> Self {
        Self::empty(Quantizer::default())
    }
}

impl Region {
    #[must_use]
    pub fn empty(quantizer: Quantizer) -> Self {
        Self {
            shapes: MultiPolygon::new(Vec::new()),
            quantizer,
        }
    }

    /// Quantizes `polygon` and builds a normalized region from it.
    ///
    /// Loops with fewer than three vertices give an empty region.
    /// Self-intersecting loops are resolved by the boolean engine.
    #[must_use]
    pub fn from_loop(polygon: &PolygonLoop, quantizer: &Quantizer) -> Self {
        if !polygon.is_valid() {
            return Self::empty(*quantizer);
        }
        let mut ring: Vec<Coord<f64>> = polygon.vertices().iter().map(|p| quantizer.coord(p)).collect();
        ring.dedup();
        if ring.len() < 3 {
            return Self::empty(*quantizer);
        }
        let raw = MultiPolygon::new(vec![Polygon::new(LineString::new(ring), Vec::new())]);
        Self {
            // Union with nothing resolves winding and self-overlap.
            shapes: raw.union(&MultiPolygon::new(Vec::new())),
            quantizer: *quantizer,
        }
    }

    #[must_use]
    pub fn quantizer(&self) -> &Quantizer {
        &self.quantizer
    }

    /// The underlying polygons in database units.
    #[must_use]
    pub fn as_multi_polygon(&self) -> &MultiPolygon<f64> {
        &self.shapes
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.0.is_empty()
    }

    #[must_use]
    pub fn polygon_count(&self) -> usize {
        self.shapes.0.len()
    }

    /// Enclosed area in square micrometers.
    #[must_use]
    pub fn area(&self) -> f64 {
        let upm = self.quantizer.units_per_micron;
        self.shapes.unsigned_area() / (upm * upm)
    }

    /// Whether `p` (micrometers) lies strictly inside the region.
    #[must_use]
    pub fn contains(&self, p: &Point2) -> bool {
        let c = Point::new(
            p.x * self.quantizer.units_per_micron,
            p.y * self.quantizer.units_per_micron,
        );
        self.shapes.contains(&c)
    }

    /// Axis-aligned bounds as `(min, max)` in micrometers.
    #[must_use]
    pub fn bounding_box(&self) -> Option<(Point2, Point2)> {
        self.shapes
            .bounding_rect()
            .map(|r| (self.quantizer.point(r.min()), self.quantizer.point(r.max())))
    }

    /// Exterior and hole boundaries of every polygon, in micrometers, without
    /// the closing duplicate vertex.
    #[must_use]
    pub fn outlines(&self) -> Vec<PolygonLoop> {
        let mut out = Vec::new();
        for polygon in &self.shapes.0 {
            out.push(self.ring_to_loop(polygon.exterior()));
            for hole in polygon.interiors() {
                out.push(self.ring_to_loop(hole));
            }
        }
        out
    }

    fn ring_to_loop(&self, ring: &LineString<f64>) -> PolygonLoop {
        let mut coords: Vec<Coord<f64>> = ring.0.clone();
        if coords.len() > 1 && coords.first() == coords.last() {
            coords.pop();
        }
        PolygonLoop::new(coords.into_iter().map(|c| self.quantizer.point(c)).collect())
    }

    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        self.with(self.shapes.union(&other.shapes))
    }

    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        self.with(self.shapes.difference(&other.shapes))
    }

    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        self.with(self.shapes.intersection(&other.shapes))
    }

    #[must_use]
    pub fn xor(&self, other: &Self) -> Self {
        self.with(self.shapes.xor(&other.shapes))
    }

    fn with(&self, shapes: MultiPolygon<f64>) -> Self {
        Self {
            shapes,
            quantizer: self.quantizer,
        }
    }
}

macro_rules! region_op {
    ($trait:ident, $method:ident, $op:ident) => {
        impl $trait<&Region> for &Region {
            type Output = Region;
            fn $method(self, rhs: &Region) -> Region {
                self.$op(rhs)
            }
        }

        impl $trait<Region> for Region {
            type Output = Region;
            fn $method(self, rhs: Region) -> Region {
                Region::$op(&self, &rhs)
            }
        }

        impl $trait<&Region> for Region {
            type Output = Region;
            fn $method(self, rhs: &Region) -> Region {
                Region::$op(&self, rhs)
            }
        }
    };
}

region_op!(Add, add, union);
region_op!(Sub, sub, difference);
region_op!(BitAnd, bitand, intersection);
region_op!(BitXor, bitxor, xor);
