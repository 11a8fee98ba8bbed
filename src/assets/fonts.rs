use std::borrow::Cow;
use std::collections::HashMap;

use crate::foundation::error::{ComposeError, ComposeResult};
use crate::interact::hit::TextMeasure;
use crate::scene::text::TextStyle;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color carried through Parley layouts.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// Family name the bundled face is registered under.
pub(crate) const BUNDLED_FAMILY: &str = "Tuffy";

/// Public-domain sans face compiled into the crate so text renders without catalog fonts.
const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/Tuffy.ttf");

/// Parley-backed shaping and measurement over fonts registered from the catalog.
///
/// Families are looked up by the names used in text styles. A style's `font_family` may be a
/// comma-separated stack (`'Battambang', Arial, sans-serif`); the first registered entry wins,
/// then the first family ever registered (the bundled face, for engines built with
/// [`TextEngine::with_bundled_font`]).
pub(crate) struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    families: HashMap<String, String>,
    default_family: Option<String>,
    glyph_fonts: HashMap<(u64, u32), vello_cpu::peniko::FontData>,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
            default_family: None,
            glyph_fonts: HashMap::new(),
        }
    }

    /// An engine whose fallback family is the bundled face.
    pub(crate) fn with_bundled_font() -> ComposeResult<Self> {
        let mut engine = Self::new();
        engine.register_family(BUNDLED_FAMILY, BUNDLED_FONT.to_vec())?;
        for generic in ["sans-serif", "system-ui"] {
            engine.alias_family(generic, BUNDLED_FAMILY);
        }
        Ok(engine)
    }

    /// Resolve `alias` to whatever `family` resolves to. No-op when `family` is unknown.
    fn alias_family(&mut self, alias: &str, family: &str) {
        if let Some(name) = self.families.get(&normalize_family(family)).cloned() {
            self.families.insert(normalize_family(alias), name);
        }
    }

    pub(crate) fn has_fonts(&self) -> bool {
        self.default_family.is_some()
    }

    /// Register font bytes under `family`. Several files (regular, bold, italic) may share one
    /// family name; Parley picks among them by weight and style.
    pub(crate) fn register_family(&mut self, family: &str, bytes: Vec<u8>) -> ComposeResult<()> {
        let registered = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes), None);
        let family_id = registered.first().map(|(id, _)| *id).ok_or_else(|| {
            ComposeError::asset_load(format!("no font faces found for family '{family}'"))
        })?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ComposeError::asset_load("registered font family has no name"))?
            .to_string();

        tracing::debug!(family, registered = %family_name, "font registered");
        self.families
            .insert(normalize_family(family), family_name.clone());
        if self.default_family.is_none() {
            self.default_family = Some(family_name);
        }
        Ok(())
    }

    pub(crate) fn resolve_family(&self, stack: &str) -> Option<&str> {
        stack
            .split(',')
            .map(normalize_family)
            .find_map(|name| self.families.get(&name))
            .or(self.default_family.as_ref())
            .map(String::as_str)
    }

    /// Shape `text` on a single unbroken line. `None` when no font is available.
    pub(crate) fn layout(
        &mut self,
        text: &str,
        style: &TextStyle,
    ) -> Option<parley::Layout<TextBrushRgba8>> {
        if !style.size.is_finite() || style.size <= 0.0 {
            return None;
        }
        let family = self.resolve_family(&style.font_family)?.to_string();
        let brush = TextBrushRgba8 {
            r: style.color.r,
            g: style.color.g,
            b: style.color.b,
            a: style.color.a,
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size as f32));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(style.weight)),
        ));
        if style.italic {
            builder.push_default(parley::style::StyleProperty::FontStyle(
                parley::style::FontStyle::Italic,
            ));
        }
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Some(layout)
    }

    /// The `vello_cpu` handle for a font Parley selected, keyed by blob id and face index.
    pub(crate) fn glyph_font(
        &mut self,
        blob_id: u64,
        index: u32,
        bytes: &[u8],
    ) -> vello_cpu::peniko::FontData {
        self.glyph_fonts
            .entry((blob_id, index))
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(bytes.to_vec()),
                    index,
                )
            })
            .clone()
    }
}

impl TextMeasure for TextEngine {
    fn text_width(&mut self, text: &str, style: &TextStyle) -> f64 {
        self.layout(text, style)
            .map(|layout| f64::from(layout.width()))
            .unwrap_or(0.0)
    }
}

fn normalize_family(name: &str) -> String {
    name.trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .trim()
        .to_ascii_lowercase()
}
