use std::fmt;

use crate::foundation::core::{Color, Point};

pub const PLACEHOLDER_TEXT: &str = "Enter your text";
pub const BOLD_WEIGHT: u16 = 800;
pub const REGULAR_WEIGHT: u16 = 500;

/// Stable text item id: the scene's creation stamp plus a per-scene sequence number.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct TextId {
    pub stamp_ms: u64,
    pub seq: u32,
}

impl fmt::Display for TextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "text-{}-{}", self.stamp_ms, self.seq)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct TextIdGen {
    stamp_ms: u64,
    next: u32,
}

impl TextIdGen {
    pub(crate) fn new() -> Self {
        let stamp_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Self { stamp_ms, next: 0 }
    }

    pub(crate) fn next_id(&mut self) -> TextId {
        let id = TextId {
            stamp_ms: self.stamp_ms,
            seq: self.next,
        };
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextStyle {
    pub color: Color,
    pub size: f64,
    pub rotation_deg: f64,
    pub font_family: String,
    pub weight: u16,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
}

impl TextStyle {
    /// Stroke width for underline and strike-through.
    pub fn decoration_width(&self) -> f64 {
        (self.size * 0.06).max(2.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextItem {
    pub id: TextId,
    pub text: String,
    pub position: Point,
    pub style: TextStyle,
}

/// One change coming from the text controls.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum TextEdit {
    Content(String),
    Size(f64),
    Rotation(f64),
    Color(Color),
    FontFamily(String),
    Bold(bool),
    Italic(bool),
    Underline(bool),
    Strike(bool),
}

impl TextEdit {
    /// Content edits target only the selected item; every other edit is a style control that
    /// also becomes the default for new items.
    pub fn is_style(&self) -> bool {
        !matches!(self, Self::Content(_))
    }

    pub(crate) fn apply_to_style(&self, style: &mut TextStyle) {
        match self {
            Self::Content(_) => {}
            Self::Size(size) => style.size = *size,
            Self::Rotation(deg) => style.rotation_deg = *deg,
            Self::Color(c) => style.color = *c,
            Self::FontFamily(family) => style.font_family.clone_from(family),
            Self::Bold(on) => style.weight = if *on { BOLD_WEIGHT } else { REGULAR_WEIGHT },
            Self::Italic(on) => style.italic = *on,
            Self::Underline(on) => style.underline = *on,
            Self::Strike(on) => style.strike = *on,
        }
    }

    pub(crate) fn apply_to_item(&self, item: &mut TextItem) {
        match self {
            Self::Content(text) => item.text.clone_from(text),
            other => other.apply_to_style(&mut item.style),
        }
    }
}
