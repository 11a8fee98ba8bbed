//! Static configuration: canvas settings, frames, filter presets, fonts and control defaults.
//!
//! A catalog is loaded from JSON or taken from [`Catalog::builtin`], then validated once before the
//! engine uses it.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::foundation::core::Color;
use crate::foundation::error::{ComposeError, ComposeResult};
use crate::scene::photo::PhotoMask;
use crate::scene::text::{BOLD_WEIGHT, TextStyle};

pub const ORIGINAL_FILTER_ID: &str = "original";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSettings {
    pub size: u32,
    #[serde(default)]
    pub photo_mask: PhotoMask,
    #[serde(default = "default_placeholder")]
    pub placeholder: Color,
    #[serde(default = "default_export_file_name")]
    pub export_file_name: String,
    /// Uploaded photos larger than this on either side are downscaled on decode.
    #[serde(default = "default_max_photo_dim")]
    pub max_photo_dim: u32,
}

fn default_placeholder() -> Color {
    Color::WHITE
}

fn default_export_file_name() -> String {
    "wewillneverforget-hero.png".to_string()
}

fn default_max_photo_dim() -> u32 {
    4096
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameDef {
    pub id: String,
    pub name: String,
    /// Asset path relative to the asset root.
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPreset {
    pub id: String,
    /// CSS filter function list, or `"none"`.
    pub effect: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontDef {
    pub family: String,
    pub sources: Vec<String>,
}

/// Inclusive slider bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, v: f64) -> f64 {
        if v.is_nan() {
            return self.min;
        }
        v.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlRanges {
    pub zoom_pct: Range,
    pub rotation_deg: Range,
    pub text_size: Range,
    pub text_rotation_deg: Range,
}

impl Default for ControlRanges {
    fn default() -> Self {
        Self {
            zoom_pct: Range::new(100.0, 300.0),
            rotation_deg: Range::new(-180.0, 180.0),
            text_size: Range::new(12.0, 160.0),
            text_rotation_deg: Range::new(-180.0, 180.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub canvas: CanvasSettings,
    pub frames: Vec<FrameDef>,
    pub filters: Vec<FilterPreset>,
    #[serde(default)]
    pub swatches: Vec<Color>,
    #[serde(default)]
    pub fonts: Vec<FontDef>,
    pub text_defaults: TextStyle,
    #[serde(default)]
    pub ranges: ControlRanges,
    #[serde(default = "default_blur_px")]
    pub blur_px: f64,
    #[serde(default = "default_hit_padding")]
    pub hit_padding: f64,
}

fn default_blur_px() -> f64 {
    6.0
}

fn default_hit_padding() -> f64 {
    10.0
}

impl Catalog {
    /// The stock hero-image catalog: ten frames, five looks, a 1080 canvas with a circular photo.
    pub fn builtin() -> Self {
        let frame = |id: &str, name: &str, file: &str| FrameDef {
            id: id.to_string(),
            name: name.to_string(),
            source: format!("assets/{file}"),
        };
        let filter = |id: &str, effect: &str| FilterPreset {
            id: id.to_string(),
            effect: effect.to_string(),
        };

        Self {
            canvas: CanvasSettings {
                size: 1080,
                photo_mask: PhotoMask::Circle { radius: 360.0 },
                placeholder: default_placeholder(),
                export_file_name: default_export_file_name(),
                max_photo_dim: default_max_photo_dim(),
            },
            frames: vec![
                frame("frame1_l", "Frame 1 (L)", "Frame1_with_letter.png"),
                frame("frame1", "Frame 1", "Frame1.png"),
                frame("frame2_l", "Frame 2 (L)", "Frame2_with_letter.png"),
                frame("frame2", "Frame 2", "Frame2.png"),
                frame("frame3_l", "Frame 3 (L)", "Frame3_with_letter.png"),
                frame("frame3", "Frame 3", "Frame3.png"),
                frame("frame4_l", "Frame 4 (L)", "Frame4_with_letter.png"),
                frame("frame5_l", "Frame 5 (L)", "Frame5_with_letter.png"),
                frame("frame5_1", "Frame 5 (1)", "Frame5_1.png"),
                frame("frame5", "Frame 5", "Frame5.png"),
            ],
            filters: vec![
                filter(ORIGINAL_FILTER_ID, "none"),
                filter("calusa", "contrast(1.05) saturate(1.25) hue-rotate(-8deg)"),
                filter("cannes", "brightness(1.05) saturate(1.15) contrast(1.05)"),
                filter("melawai", "contrast(1.1) saturate(1.1) hue-rotate(12deg)"),
                filter("mono", "grayscale(1) contrast(1.05)"),
            ],
            swatches: vec![
                Color::BLACK,
                Color::WHITE,
                Color::rgb(0xc8, 0x10, 0x2e),
                Color::rgb(0xff, 0xd7, 0x00),
                Color::rgb(0x00, 0x38, 0xa8),
            ],
            fonts: Vec::new(),
            text_defaults: TextStyle {
                color: Color::BLACK,
                size: 36.0,
                rotation_deg: 0.0,
                font_family: "'Battambang', 'Helvetica Neue', Arial, sans-serif".to_string(),
                weight: BOLD_WEIGHT,
                italic: false,
                underline: false,
                strike: false,
            },
            ranges: ControlRanges::default(),
            blur_px: default_blur_px(),
            hit_padding: default_hit_padding(),
        }
    }

    pub fn from_json_str(s: &str) -> ComposeResult<Self> {
        let catalog: Self = serde_json::from_str(s).context("parse catalog json")?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_reader(reader: impl std::io::Read) -> ComposeResult<Self> {
        let catalog: Self = serde_json::from_reader(reader).context("parse catalog json")?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ComposeResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("open catalog '{}'", path.display()))?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn validate(&self) -> ComposeResult<()> {
        crate::foundation::core::Canvas::new(self.canvas.size)?;
        if self.canvas.export_file_name.trim().is_empty() {
            return Err(ComposeError::validation("export_file_name must be non-empty"));
        }
        if self.canvas.max_photo_dim == 0 {
            return Err(ComposeError::validation("max_photo_dim must be > 0"));
        }
        if let PhotoMask::Circle { radius } = self.canvas.photo_mask
            && (!radius.is_finite() || radius <= 0.0)
        {
            return Err(ComposeError::validation(
                "photo mask radius must be finite and > 0",
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for f in &self.frames {
            if f.id.is_empty() || f.source.is_empty() {
                return Err(ComposeError::validation("frame id and source must be non-empty"));
            }
            if !seen.insert(f.id.as_str()) {
                return Err(ComposeError::validation(format!("duplicate frame id '{}'", f.id)));
            }
        }

        seen.clear();
        for p in &self.filters {
            if !seen.insert(p.id.as_str()) {
                return Err(ComposeError::validation(format!(
                    "duplicate filter id '{}'",
                    p.id
                )));
            }
            crate::effects::filter::parse_filter(&p.effect).map_err(|e| {
                ComposeError::validation(format!("filter preset '{}': {e}", p.id))
            })?;
        }
        if self.filter(ORIGINAL_FILTER_ID).is_none() {
            return Err(ComposeError::validation(format!(
                "filter presets must include '{ORIGINAL_FILTER_ID}'"
            )));
        }

        for font in &self.fonts {
            if font.family.trim().is_empty() || font.sources.is_empty() {
                return Err(ComposeError::validation(
                    "font entries need a family and at least one source",
                ));
            }
        }

        let d = &self.text_defaults;
        if !d.size.is_finite() || d.size <= 0.0 {
            return Err(ComposeError::validation("text default size must be > 0"));
        }
        for (name, r) in [
            ("zoom_pct", self.ranges.zoom_pct),
            ("rotation_deg", self.ranges.rotation_deg),
            ("text_size", self.ranges.text_size),
            ("text_rotation_deg", self.ranges.text_rotation_deg),
        ] {
            if !r.min.is_finite() || !r.max.is_finite() || r.min > r.max {
                return Err(ComposeError::validation(format!("invalid range for {name}")));
            }
        }
        if self.ranges.zoom_pct.min <= 0.0 {
            return Err(ComposeError::validation("zoom_pct range must be positive"));
        }
        if !self.blur_px.is_finite() || self.blur_px < 0.0 {
            return Err(ComposeError::validation("blur_px must be finite and >= 0"));
        }
        if !self.hit_padding.is_finite() || self.hit_padding < 0.0 {
            return Err(ComposeError::validation("hit_padding must be finite and >= 0"));
        }
        Ok(())
    }

    pub fn frame(&self, id: &str) -> Option<&FrameDef> {
        self.frames.iter().find(|f| f.id == id)
    }

    pub fn filter(&self, id: &str) -> Option<&FilterPreset> {
        self.filters.iter().find(|f| f.id == id)
    }

    /// Preset effect for `id`, falling back to the original look for unknown ids.
    pub fn filter_effect(&self, id: &str) -> &str {
        self.filter(id)
            .or_else(|| self.filter(ORIGINAL_FILTER_ID))
            .map(|p| p.effect.as_str())
            .unwrap_or("none")
    }
}

#[cfg(test)]
#[path = "../tests/unit/catalog.rs"]
mod tests;
