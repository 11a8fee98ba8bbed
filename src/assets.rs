use std::sync::Arc;

pub(crate) mod decode;
pub(crate) mod fonts;
pub(crate) mod slot;
pub(crate) mod source;
pub(crate) mod svg_raster;

/// Decoded raster, premultiplied RGBA8, row-major, tightly packed.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
