pub mod classify;
pub mod fillet;
pub mod offset;
mod polygon;
pub mod rings;
mod via;

pub use classify::{classify, is_convex, VertexKind};
pub use fillet::{FilletConfig, FilletLoop};
pub use offset::{offset, LoopOffset2D};
pub use polygon::{BuildPolygon, Shape};
pub use rings::{BuildRings, RingBand, RingSet, RingSpec};
pub use via::{BuildVia, DEFAULT_INNER_ZOOM, DEFAULT_OUTER_ZOOM};
