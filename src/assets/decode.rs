use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::assets::PreparedImage;
use crate::assets::svg_raster::{parse_svg, rasterize_svg_to_premul_rgba8, svg_intrinsic_size};
use crate::foundation::error::{ComposeError, ComposeResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// A user-provided photo: raw file bytes plus whatever the picker told us about them.
#[derive(Clone, Debug, Default)]
pub struct PhotoUpload {
    pub name: Option<String>,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl PhotoUpload {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: None,
            mime: Some(mime.into()),
            bytes,
        }
    }

    /// Read a file from disk, guessing the MIME type from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> ComposeResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read photo '{}'", path.display()))?;
        Ok(Self {
            name: path.file_name().map(|n| n.to_string_lossy().into_owned()),
            mime: mime_from_extension(path).map(str::to_owned),
            bytes,
        })
    }
}

pub(crate) fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        "txt" => "text/plain",
        "json" => "application/json",
        "pdf" => "application/pdf",
        _ => return None,
    };
    Some(mime)
}

/// Accept only `image/*` uploads. Without a declared type, sniff the bytes instead.
pub fn check_image_upload(upload: &PhotoUpload) -> ComposeResult<()> {
    match upload.mime.as_deref().map(str::trim) {
        Some(mime) if mime.to_ascii_lowercase().starts_with("image/") => Ok(()),
        Some(mime) => Err(ComposeError::unsupported_file_type(format!(
            "'{mime}' is not an image type"
        ))),
        None if looks_like_svg(&upload.bytes) || image::guess_format(&upload.bytes).is_ok() => {
            Ok(())
        }
        None => Err(ComposeError::unsupported_file_type(
            "could not recognize the file as an image",
        )),
    }
}

pub fn decode_image(bytes: &[u8]) -> ComposeResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| ComposeError::image_decode(format!("decode image from memory: {e}")))?;
    Ok(prepared_from_rgba(dyn_img.to_rgba8()))
}

/// Validate and decode an uploaded photo, downscaling anything larger than `max_dim` on its
/// longest side.
pub fn decode_photo(upload: &PhotoUpload, max_dim: u32) -> ComposeResult<PreparedImage> {
    check_image_upload(upload)?;

    let is_svg = upload
        .mime
        .as_deref()
        .is_some_and(|m| m.eq_ignore_ascii_case("image/svg+xml"))
        || looks_like_svg(&upload.bytes);
    if is_svg {
        let tree = parse_svg(&upload.bytes)
            .map_err(|e| ComposeError::image_decode(format!("parse svg photo: {e}")))?;
        let (w, h) = svg_intrinsic_size(&tree)?;
        let scale = fit_within(w, h, max_dim);
        let (w, h) = scaled_dims(w, h, scale);
        let rgba8_premul = rasterize_svg_to_premul_rgba8(&tree, w, h)?;
        return Ok(PreparedImage {
            width: w,
            height: h,
            rgba8_premul: Arc::new(rgba8_premul),
        });
    }

    let dyn_img = image::load_from_memory(&upload.bytes)
        .map_err(|e| ComposeError::image_decode(format!("decode photo: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (w, h) = rgba.dimensions();
    if w == 0 || h == 0 {
        return Err(ComposeError::image_decode("photo has zero width or height"));
    }

    let scale = fit_within(w, h, max_dim);
    if scale < 1.0 {
        let (nw, nh) = scaled_dims(w, h, scale);
        tracing::debug!(from_w = w, from_h = h, to_w = nw, to_h = nh, "downscaling photo");
        let resized = image::imageops::resize(&rgba, nw, nh, image::imageops::FilterType::Triangle);
        return Ok(prepared_from_rgba(resized));
    }
    Ok(prepared_from_rgba(rgba))
}

/// Decode a frame overlay. SVG frames are rasterized straight to the canvas size.
pub fn decode_frame(bytes: &[u8], source: &str, canvas_size: u32) -> ComposeResult<PreparedImage> {
    let is_svg = source.to_ascii_lowercase().ends_with(".svg") || looks_like_svg(bytes);
    if is_svg {
        let tree = parse_svg(bytes)
            .map_err(|e| ComposeError::asset_load(format!("parse svg frame '{source}': {e}")))?;
        let rgba8_premul = rasterize_svg_to_premul_rgba8(&tree, canvas_size, canvas_size)?;
        return Ok(PreparedImage {
            width: canvas_size,
            height: canvas_size,
            rgba8_premul: Arc::new(rgba8_premul),
        });
    }
    decode_image(bytes)
        .map_err(|e| ComposeError::asset_load(format!("decode frame '{source}': {e}")))
}

fn prepared_from_rgba(rgba: image::RgbaImage) -> PreparedImage {
    let (width, height) = rgba.dimensions();
    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let Ok(text) = std::str::from_utf8(head) else {
        return false;
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

fn fit_within(w: u32, h: u32, max_dim: u32) -> f64 {
    let longest = w.max(h);
    if max_dim == 0 || longest <= max_dim {
        return 1.0;
    }
    f64::from(max_dim) / f64::from(longest)
}

fn scaled_dims(w: u32, h: u32, scale: f64) -> (u32, u32) {
    let nw = ((f64::from(w) * scale).round() as u32).max(1);
    let nh = ((f64::from(h) * scale).round() as u32).max(1);
    (nw, nh)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
