/// A rendered canvas as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha. Renders always are; decoded exports are not.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Premultiplied RGBA8 of the pixel at `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }
}

/// Whether a render is for on-screen preview or for the exported file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Draws the selection outline around the active text item.
    #[default]
    Interactive,
    /// Never draws selection affordances.
    Export,
}

impl RenderMode {
    pub fn draws_selection(self) -> bool {
        matches!(self, Self::Interactive)
    }
}
