//! Scene rasterization: one pipeline with an interactive mode (selection outline) and an export
//! mode (clean output), plus PNG encoding of the result.

pub(crate) mod backend;
pub(crate) mod cpu;
pub(crate) mod export;

pub use backend::{FrameRGBA, RenderMode};
pub use cpu::CpuRenderer;
pub use export::{ExportArtifact, encode_png};
