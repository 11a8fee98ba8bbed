use anyhow::Context;

use crate::foundation::error::{ComposeError, ComposeResult};

const MAX_DIM: u32 = 16_384;

pub(crate) fn parse_svg(bytes: &[u8]) -> ComposeResult<usvg::Tree> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(tree)
}

/// Intrinsic pixel size of an SVG document, rounded up.
pub(crate) fn svg_intrinsic_size(tree: &usvg::Tree) -> ComposeResult<(u32, u32)> {
    fn to_px(v: f32) -> ComposeResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(ComposeError::image_decode("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let size = tree.size();
    let w = to_px(size.width())?;
    let h = to_px(size.height())?;
    if w > MAX_DIM || h > MAX_DIM {
        return Err(ComposeError::image_decode(format!(
            "svg raster size too large: {w}x{h} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    Ok((w, h))
}

/// Rasterize `tree` stretched to exactly `width`x`height`. `tiny_skia` output is already
/// premultiplied.
pub(crate) fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> ComposeResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| ComposeError::render("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}
