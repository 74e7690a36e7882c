pub mod config;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod math;
pub mod operations;
pub mod region;

pub use error::{MaskringError, Result};
