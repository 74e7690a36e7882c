pub mod arc_2d;
pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type (micrometers).
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Edges shorter than this are treated as zero-length.
pub const EDGE_EPSILON: f64 = 1e-9;

/// Wedge angles this close to 0 or π are treated as straight or reversed.
pub const ANGLE_EPSILON: f64 = 1e-6;
