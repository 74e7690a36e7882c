use thiserror::Error;

/// Top-level error type for the maskring geometry engine.
#[derive(Debug, Error)]
pub enum MaskringError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Errors raised by the geometry engine.
///
/// Only constraint violations that make the requested result impossible are
/// reported here; degenerate input is handled per vertex and surfaced through
/// [`crate::diagnostics::Report`] instead.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error(
        "vertex {vertex}: tangent distance {tangent_distance:.4} for radius {radius} \
         exceeds 0.8x the shorter adjacent edge ({max_allowed:.4}, edge length {edge_length:.4})"
    )]
    TangentOverflow {
        vertex: usize,
        radius: f64,
        tangent_distance: f64,
        max_allowed: f64,
        edge_length: f64,
    },
}

/// Errors related to shape configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid vertex list '{input}': {reason}")]
    Vertices { input: String, reason: String },

    #[error("invalid ring rule for {field}: {reason}")]
    RingRule { field: &'static str, reason: String },

    #[error("unknown shape type: {0}")]
    UnknownShape(String),

    #[error("missing field '{field}' for shape '{shape}'")]
    MissingField { shape: String, field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Errors raised by layout bookkeeping.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("cell not found: {0}")]
    CellNotFound(String),
}

/// Convenience type alias for results using [`MaskringError`].
pub type Result<T> = std::result::Result<T, MaskringError>;
