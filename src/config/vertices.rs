use serde::Deserialize;

use crate::error::ConfigError;
use crate::geometry::generate::{octagon, rectangle, regular_polygon, star};
use crate::geometry::PolygonLoop;
use crate::math::Point2;

/// Parses an `x1,y1:x2,y2:...` vertex list into a counter-clockwise loop.
///
/// # Errors
///
/// Returns [`ConfigError::Vertices`] for malformed pairs, non-finite
/// coordinates, or fewer than three vertices.
pub fn parse_vertices(input: &str) -> Result<PolygonLoop, ConfigError> {
    let fail = |reason: String| ConfigError::Vertices {
        input: input.to_string(),
        reason,
    };

    let mut points = Vec::new();
    for (i, pair) in input.split(':').enumerate() {
        let mut parts = pair.split(',');
        let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(fail(format!("entry {} ('{pair}') is not an x,y pair", i + 1)));
        };
        let coord = |s: &str| {
            s.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| fail(format!("entry {} has invalid coordinate '{}'", i + 1, s.trim())))
        };
        points.push(Point2::new(coord(x)?, coord(y)?));
    }
    if points.len() < 3 {
        return Err(fail(format!("need at least 3 vertices, got {}", points.len())));
    }

    let mut polygon = PolygonLoop::new(points);
    polygon.ensure_counterclockwise();
    Ok(polygon)
}

/// Parametric vertex source (`vertices_gen`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VertexGenerator {
    pub shape_type: String,
    #[serde(default)]
    pub center_x: f64,
    #[serde(default)]
    pub center_y: f64,
    #[serde(default = "default_outer_radius")]
    pub outer_radius: f64,
    #[serde(default = "default_inner_radius")]
    pub inner_radius: f64,
    #[serde(default = "default_points")]
    pub points: usize,
    /// Circumradius for `regular_polygon`.
    pub radius: Option<f64>,
    pub sides: Option<usize>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// Octagon top/bottom edge length.
    pub vert_line: Option<f64>,
    /// Octagon left/right edge length.
    pub horiz_line: Option<f64>,
    pub r1: Option<f64>,
    pub r2: Option<f64>,
}

fn default_outer_radius() -> f64 {
    10.0
}

fn default_inner_radius() -> f64 {
    5.0
}

fn default_points() -> usize {
    5
}

impl VertexGenerator {
    /// Generates the loop described by this record.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownShape`] for an unsupported
    /// `shape_type`, or [`ConfigError::InvalidValue`] when the parameters
    /// cannot produce a loop.
    pub fn generate(&self) -> Result<PolygonLoop, ConfigError> {
        let center = Point2::new(self.center_x, self.center_y);
        match self.shape_type.as_str() {
            "star" => star(center, self.outer_radius, self.inner_radius, self.points).ok_or_else(|| {
                ConfigError::InvalidValue {
                    field: "vertices_gen.points",
                    reason: format!("a star needs at least 2 points, got {}", self.points),
                }
            }),
            "regular_polygon" => {
                let sides = self.sides.unwrap_or(6);
                regular_polygon(center, self.radius.unwrap_or(self.outer_radius), sides).ok_or_else(|| {
                    ConfigError::InvalidValue {
                        field: "vertices_gen.sides",
                        reason: format!("a regular polygon needs at least 3 sides, got {sides}"),
                    }
                })
            }
            "rectangle" => {
                let (Some(width), Some(height)) = (self.width, self.height) else {
                    return Err(ConfigError::InvalidValue {
                        field: "vertices_gen",
                        reason: "rectangle needs width and height".to_string(),
                    });
                };
                Ok(rectangle(center, width, height))
            }
            "octagon" => {
                let (Some(vert_line), Some(horiz_line), Some(r1), Some(r2)) =
                    (self.vert_line, self.horiz_line, self.r1, self.r2)
                else {
                    return Err(ConfigError::InvalidValue {
                        field: "vertices_gen",
                        reason: "octagon needs vert_line, horiz_line, r1 and r2".to_string(),
                    });
                };
                Ok(octagon(vert_line, horiz_line, r1, r2, center))
            }
            other => Err(ConfigError::UnknownShape(format!("vertices_gen.shape_type '{other}'"))),
        }
    }
}
