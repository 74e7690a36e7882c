mod loop_offset;

pub use loop_offset::{offset, LoopOffset2D};
