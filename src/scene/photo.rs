//! Photo placement math: cover-fit scaling and the draw transform.
//!
//! The photo is drawn centered on the canvas, shifted by the user offset, rotated, then scaled.
//! Its effective scale never drops below the smallest value that keeps the visible viewport
//! (the whole canvas, or the circular mask) fully covered.

use crate::foundation::core::{Affine, Canvas, Point, Vec2, deg_to_rad};
use crate::foundation::math::rotate_vec;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhotoTransform {
    /// User zoom multiplier on top of the cover-fit base scale.
    pub scale: f64,
    pub rotation_deg: f64,
    pub offset: Vec2,
}

impl Default for PhotoTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation_deg: 0.0,
            offset: Vec2::ZERO,
        }
    }
}

impl PhotoTransform {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

/// Region of the canvas the photo shows through.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhotoMask {
    /// Circle centered on the canvas.
    Circle { radius: f64 },
    FullCanvas,
}

impl Default for PhotoMask {
    fn default() -> Self {
        Self::Circle { radius: 360.0 }
    }
}

/// Minimum magnification so the image's shorter side still fills the canvas.
pub fn base_scale(canvas: Canvas, width: u32, height: u32) -> f64 {
    let s = canvas.size_f64();
    (s / f64::from(width.max(1))).max(s / f64::from(height.max(1)))
}

/// Smallest scale at which the rotated, offset image contains every point of the viewport.
pub fn cover_floor(
    canvas: Canvas,
    mask: PhotoMask,
    width: u32,
    height: u32,
    transform: &PhotoTransform,
) -> f64 {
    let w = f64::from(width.max(1));
    let h = f64::from(height.max(1));
    let theta = deg_to_rad(transform.rotation_deg);
    let center = canvas.center();
    let image_center = center + transform.offset;

    // Viewport points in unscaled image-local space are R(-theta) * (p - image_center); the image
    // half extents at scale s are (s*w/2, s*h/2).
    match mask {
        PhotoMask::Circle { radius } => {
            let d = rotate_vec(center - image_center, -theta);
            let r = radius.max(0.0);
            (2.0 * (r + d.x.abs()) / w).max(2.0 * (r + d.y.abs()) / h)
        }
        PhotoMask::FullCanvas => {
            let rect = canvas.rect();
            [
                Point::new(rect.x0, rect.y0),
                Point::new(rect.x1, rect.y0),
                Point::new(rect.x1, rect.y1),
                Point::new(rect.x0, rect.y1),
            ]
            .into_iter()
            .map(|p| {
                let u = rotate_vec(p - image_center, -theta);
                (2.0 * u.x.abs() / w).max(2.0 * u.y.abs() / h)
            })
            .fold(0.0, f64::max)
        }
    }
}

/// `max(base_scale * user_scale, cover_floor)`.
pub fn effective_scale(
    canvas: Canvas,
    mask: PhotoMask,
    width: u32,
    height: u32,
    transform: &PhotoTransform,
) -> f64 {
    let user = if transform.scale.is_finite() {
        transform.scale.max(0.0)
    } else {
        1.0
    };
    let requested = base_scale(canvas, width, height) * user;
    requested.max(cover_floor(canvas, mask, width, height, transform))
}

/// Maps image pixel space onto the canvas:
/// `T(center + offset) * R(rotation) * S(scale) * T(-w/2, -h/2)`.
pub fn photo_affine(
    canvas: Canvas,
    mask: PhotoMask,
    width: u32,
    height: u32,
    transform: &PhotoTransform,
) -> Affine {
    let scale = effective_scale(canvas, mask, width, height, transform);
    let anchor = canvas.center() + transform.offset;
    Affine::translate(anchor.to_vec2())
        * Affine::rotate(deg_to_rad(transform.rotation_deg))
        * Affine::scale(scale)
        * Affine::translate(Vec2::new(
            -f64::from(width) / 2.0,
            -f64::from(height) / 2.0,
        ))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/photo.rs"]
mod tests;
