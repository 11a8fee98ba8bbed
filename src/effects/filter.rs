use crate::effects::blur::blur_rgba8_premul_in_place;
use crate::effects::color_matrix::{
    self, ColorMatrix, color_matrix_rgba8_premul_in_place,
};
use crate::foundation::error::{ComposeError, ComposeResult};

/// One parsed filter function.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterStage {
    Blur { sigma: f32 },
    Matrix(ColorMatrix),
}

/// Compose the filter list for one layer.
///
/// The blur term comes first and only when blur is both enabled and wanted for this layer; the
/// preset follows unless it is `"none"`. An empty list is `"none"`.
pub fn build_filter_string(
    preset_effect: &str,
    blur_enabled: bool,
    include_blur: bool,
    blur_px: f64,
) -> String {
    let mut parts = Vec::with_capacity(2);
    if blur_enabled && include_blur {
        parts.push(format!("blur({}px)", fmt_number(blur_px)));
    }
    let preset = preset_effect.trim();
    if !preset.is_empty() && preset != "none" {
        parts.push(preset.to_string());
    }
    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(" ")
    }
}

fn fmt_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

pub fn parse_filter(filter: &str) -> ComposeResult<Vec<FilterStage>> {
    let s = filter.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("none") {
        return Ok(Vec::new());
    }

    let mut stages = Vec::new();
    let mut rest = s;
    while !rest.is_empty() {
        let open = rest.find('(').ok_or_else(|| {
            ComposeError::validation(format!("expected '(' in filter \"{rest}\""))
        })?;
        let close = rest[open..]
            .find(')')
            .map(|i| open + i)
            .ok_or_else(|| ComposeError::validation(format!("unclosed filter \"{rest}\"")))?;
        let name = rest[..open].trim().to_ascii_lowercase();
        let arg = rest[open + 1..close].trim();
        stages.push(parse_function(&name, arg)?);
        rest = rest[close + 1..].trim_start();
    }
    Ok(stages)
}

fn parse_function(name: &str, arg: &str) -> ComposeResult<FilterStage> {
    let stage = match name {
        "blur" => {
            let sigma = if arg.is_empty() { 0.0 } else { parse_length(arg)? };
            if sigma < 0.0 {
                return Err(ComposeError::validation("blur radius must be >= 0"));
            }
            FilterStage::Blur { sigma }
        }
        "hue-rotate" => {
            let deg = if arg.is_empty() { 0.0 } else { parse_angle(arg)? };
            FilterStage::Matrix(color_matrix::hue_rotate(deg))
        }
        "brightness" | "contrast" | "saturate" | "grayscale" | "sepia" | "invert" | "opacity" => {
            let amount = if arg.is_empty() { 1.0 } else { parse_amount(arg)? };
            if amount < 0.0 {
                return Err(ComposeError::validation(format!(
                    "{name}() amount must be >= 0"
                )));
            }
            let m = match name {
                "brightness" => color_matrix::brightness(amount),
                "contrast" => color_matrix::contrast(amount),
                "saturate" => color_matrix::saturate(amount),
                "grayscale" => color_matrix::grayscale(amount),
                "sepia" => color_matrix::sepia(amount),
                "invert" => color_matrix::invert(amount),
                _ => color_matrix::opacity(amount),
            };
            FilterStage::Matrix(m)
        }
        other => {
            return Err(ComposeError::validation(format!(
                "unknown filter function \"{other}\""
            )));
        }
    };
    Ok(stage)
}

fn parse_f32(s: &str) -> ComposeResult<f32> {
    let v: f32 = s
        .trim()
        .parse()
        .map_err(|_| ComposeError::validation(format!("invalid filter number \"{s}\"")))?;
    if !v.is_finite() {
        return Err(ComposeError::validation("filter numbers must be finite"));
    }
    Ok(v)
}

fn parse_amount(arg: &str) -> ComposeResult<f32> {
    match arg.strip_suffix('%') {
        Some(pct) => Ok(parse_f32(pct)? / 100.0),
        None => parse_f32(arg),
    }
}

fn parse_length(arg: &str) -> ComposeResult<f32> {
    match arg.strip_suffix("px") {
        Some(px) => parse_f32(px),
        None if arg.trim() == "0" => Ok(0.0),
        None => Err(ComposeError::validation(format!(
            "blur radius needs a px unit: \"{arg}\""
        ))),
    }
}

fn parse_angle(arg: &str) -> ComposeResult<f32> {
    let arg = arg.trim();
    if let Some(v) = arg.strip_suffix("deg") {
        return parse_f32(v);
    }
    if let Some(v) = arg.strip_suffix("grad") {
        return Ok(parse_f32(v)? * 0.9);
    }
    if let Some(v) = arg.strip_suffix("rad") {
        return Ok(parse_f32(v)?.to_degrees());
    }
    if let Some(v) = arg.strip_suffix("turn") {
        return Ok(parse_f32(v)? * 360.0);
    }
    if arg == "0" {
        return Ok(0.0);
    }
    Err(ComposeError::validation(format!(
        "hue-rotate needs an angle unit: \"{arg}\""
    )))
}

/// Run `stages` over a premultiplied buffer in order, clamping after each one.
pub fn apply_filter(
    stages: &[FilterStage],
    buf: &mut [u8],
    width: u32,
    height: u32,
) -> ComposeResult<()> {
    for stage in stages {
        match stage {
            FilterStage::Blur { sigma } => {
                blur_rgba8_premul_in_place(buf, width, height, *sigma)?;
            }
            FilterStage::Matrix(m) => color_matrix_rgba8_premul_in_place(buf, m),
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/filter.rs"]
mod tests;
