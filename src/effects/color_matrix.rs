//! 4x5 color matrices for the CSS filter functions, applied to straight-alpha color.
//!
//! Rows are `[r, g, b, a, offset]` for the red, green, blue and alpha outputs.

pub type ColorMatrix = [f32; 20];

pub(crate) const IDENTITY: ColorMatrix = [
    1.0, 0.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 0.0, 1.0, 0.0,
];

fn linear(slope: f32, intercept: f32) -> ColorMatrix {
    [
        slope, 0.0, 0.0, 0.0, intercept, //
        0.0, slope, 0.0, 0.0, intercept, //
        0.0, 0.0, slope, 0.0, intercept, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]
}

fn rgb3(m: [f32; 9]) -> ColorMatrix {
    [
        m[0], m[1], m[2], 0.0, 0.0, //
        m[3], m[4], m[5], 0.0, 0.0, //
        m[6], m[7], m[8], 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]
}

pub(crate) fn brightness(amount: f32) -> ColorMatrix {
    linear(amount.max(0.0), 0.0)
}

pub(crate) fn contrast(amount: f32) -> ColorMatrix {
    let a = amount.max(0.0);
    linear(a, 0.5 - 0.5 * a)
}

pub(crate) fn invert(amount: f32) -> ColorMatrix {
    let a = amount.clamp(0.0, 1.0);
    linear(1.0 - 2.0 * a, a)
}

pub(crate) fn opacity(amount: f32) -> ColorMatrix {
    let mut m = IDENTITY;
    m[18] = amount.clamp(0.0, 1.0);
    m
}

pub(crate) fn saturate(amount: f32) -> ColorMatrix {
    let s = amount.max(0.0);
    rgb3([
        0.213 + 0.787 * s,
        0.715 - 0.715 * s,
        0.072 - 0.072 * s,
        0.213 - 0.213 * s,
        0.715 + 0.285 * s,
        0.072 - 0.072 * s,
        0.213 - 0.213 * s,
        0.715 - 0.715 * s,
        0.072 + 0.928 * s,
    ])
}

pub(crate) fn hue_rotate(deg: f32) -> ColorMatrix {
    let (sin, cos) = deg.to_radians().sin_cos();
    rgb3([
        0.213 + cos * 0.787 - sin * 0.213,
        0.715 - cos * 0.715 - sin * 0.715,
        0.072 - cos * 0.072 + sin * 0.928,
        0.213 - cos * 0.213 + sin * 0.143,
        0.715 + cos * 0.285 + sin * 0.140,
        0.072 - cos * 0.072 - sin * 0.283,
        0.213 - cos * 0.213 - sin * 0.787,
        0.715 - cos * 0.715 + sin * 0.715,
        0.072 + cos * 0.928 + sin * 0.072,
    ])
}

pub(crate) fn grayscale(amount: f32) -> ColorMatrix {
    let k = 1.0 - amount.clamp(0.0, 1.0);
    rgb3([
        0.2126 + 0.7874 * k,
        0.7152 - 0.7152 * k,
        0.0722 - 0.0722 * k,
        0.2126 - 0.2126 * k,
        0.7152 + 0.2848 * k,
        0.0722 - 0.0722 * k,
        0.2126 - 0.2126 * k,
        0.7152 - 0.7152 * k,
        0.0722 + 0.9278 * k,
    ])
}

pub(crate) fn sepia(amount: f32) -> ColorMatrix {
    let k = 1.0 - amount.clamp(0.0, 1.0);
    rgb3([
        0.393 + 0.607 * k,
        0.769 - 0.769 * k,
        0.189 - 0.189 * k,
        0.349 - 0.349 * k,
        0.686 + 0.314 * k,
        0.168 - 0.168 * k,
        0.272 - 0.272 * k,
        0.534 - 0.534 * k,
        0.131 + 0.869 * k,
    ])
}

/// Apply `m` to every pixel. Color is unpremultiplied for the matrix and clamped to `[0, 1]`.
pub(crate) fn color_matrix_rgba8_premul_in_place(buf: &mut [u8], m: &ColorMatrix) {
    for px in buf.chunks_exact_mut(4) {
        let pa = f32::from(px[3]) / 255.0;
        let inv_a = if pa > 0.0 { 1.0 / pa } else { 0.0 };
        let r = f32::from(px[0]) / 255.0 * inv_a;
        let g = f32::from(px[1]) / 255.0 * inv_a;
        let b = f32::from(px[2]) / 255.0 * inv_a;
        let a = pa;

        let out_r = (m[0] * r + m[1] * g + m[2] * b + m[3] * a + m[4]).clamp(0.0, 1.0);
        let out_g = (m[5] * r + m[6] * g + m[7] * b + m[8] * a + m[9]).clamp(0.0, 1.0);
        let out_b = (m[10] * r + m[11] * g + m[12] * b + m[13] * a + m[14]).clamp(0.0, 1.0);
        let out_a = (m[15] * r + m[16] * g + m[17] * b + m[18] * a + m[19]).clamp(0.0, 1.0);

        px[0] = to_u8(out_r * out_a);
        px[1] = to_u8(out_g * out_a);
        px[2] = to_u8(out_b * out_a);
        px[3] = to_u8(out_a);
    }
}

fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/color_matrix.rs"]
mod tests;
