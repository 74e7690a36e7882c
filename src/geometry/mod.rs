pub mod generate;
mod polygon_loop;

pub use polygon_loop::PolygonLoop;
