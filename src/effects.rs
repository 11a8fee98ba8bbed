//! Pixel effects over premultiplied RGBA8 buffers: CSS-style filter chains, gaussian blur, color
//! matrices and compositing.

pub(crate) mod blur;
pub(crate) mod color_matrix;
pub(crate) mod composite;
pub(crate) mod filter;

pub use filter::{FilterStage, apply_filter, build_filter_string, parse_filter};
