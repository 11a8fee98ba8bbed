use std::sync::Arc;

use kurbo::Shape;

use crate::assets::PreparedImage;
use crate::assets::fonts::TextEngine;
use crate::catalog::Catalog;
use crate::effects::composite::{mask_alpha_in_place, over_in_place};
use crate::effects::filter::{apply_filter, build_filter_string, parse_filter};
use crate::foundation::core::{Affine, BezPath, Canvas, Color, Point, Vec2, deg_to_rad};
use crate::foundation::error::{ComposeError, ComposeResult};
use crate::interact::hit::text_box;
use crate::render::backend::{FrameRGBA, RenderMode};
use crate::scene::Scene;
use crate::scene::photo::{PhotoMask, photo_affine};
use crate::scene::text::TextItem;

const OUTLINE_COLOR: Color = Color::rgba(255, 255, 255, 217);
const OUTLINE_WIDTH: f64 = 2.0;
const OUTLINE_DASH: [f64; 2] = [6.0, 4.0];
const OUTLINE_MARGIN: f64 = 8.0;

/// A paint built from one decoded buffer. Holding the buffer keeps its address from being reused
/// by a later image while the entry is cached.
#[derive(Clone)]
struct ImagePaint {
    source: Arc<Vec<u8>>,
    paint: vello_cpu::Image,
}

/// CPU renderer powered by `vello_cpu`.
///
/// `vello_cpu` renders into a fresh buffer, so every layer is rasterized into its own pixmap and
/// then premul-over'd onto the output.
#[derive(Default)]
pub struct CpuRenderer {
    ctx: Option<vello_cpu::RenderContext>,
    photo_paint: Option<ImagePaint>,
    frame_paint: Option<ImagePaint>,
}

impl std::fmt::Debug for CpuRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuRenderer")
            .field("has_ctx", &self.ctx.is_some())
            .finish_non_exhaustive()
    }
}

impl CpuRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    #[tracing::instrument(skip_all, fields(mode = ?mode))]
    pub(crate) fn render(
        &mut self,
        scene: &Scene,
        catalog: &Catalog,
        text: &mut TextEngine,
        mode: RenderMode,
    ) -> ComposeResult<FrameRGBA> {
        let canvas = Canvas::new(catalog.canvas.size)?;
        let size = canvas_u16(canvas)?;
        let len = (canvas.size as usize) * (canvas.size as usize) * 4;
        let mut out = vec![0u8; len];

        match scene.photo() {
            Some(photo) => {
                let layer = self.photo_layer(scene, catalog, canvas, photo)?;
                over_in_place(&mut out, &layer)?;
            }
            None => {
                let fill = catalog.canvas.placeholder.to_premul_array();
                for px in out.chunks_exact_mut(4) {
                    px.copy_from_slice(&fill);
                }
            }
        }

        if !scene.text_over_frame && !scene.texts().is_empty() {
            let layer = self.text_layer(size, scene.texts(), text)?;
            over_in_place(&mut out, layer.data_as_u8_slice())?;
        }

        if let Some(frame) = scene.frame() {
            let layer = self.frame_layer(scene, catalog, canvas, frame)?;
            over_in_place(&mut out, &layer)?;
        }

        if scene.text_over_frame && !scene.texts().is_empty() {
            let layer = self.text_layer(size, scene.texts(), text)?;
            over_in_place(&mut out, layer.data_as_u8_slice())?;
        }

        if mode.draws_selection()
            && let Some(active) = scene.active_text()
        {
            let layer = self.outline_layer(size, active, text)?;
            over_in_place(&mut out, layer.data_as_u8_slice())?;
        }

        Ok(FrameRGBA {
            width: canvas.size,
            height: canvas.size,
            data: out,
            premultiplied: true,
        })
    }

    fn draw_layer<F>(&mut self, size: u16, f: F) -> ComposeResult<vello_cpu::Pixmap>
    where
        F: FnOnce(&mut vello_cpu::RenderContext) -> ComposeResult<()>,
    {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == size && ctx.height() == size => ctx,
            _ => vello_cpu::RenderContext::new(size, size),
        };
        ctx.reset();
        let drawn = f(&mut ctx);
        let mut pixmap = vello_cpu::Pixmap::new(size, size);
        if drawn.is_ok() {
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
        }
        self.ctx = Some(ctx);
        drawn.map(|()| pixmap)
    }

    /// Transformed photo, filtered, then clipped to the photo mask.
    fn photo_layer(
        &mut self,
        scene: &Scene,
        catalog: &Catalog,
        canvas: Canvas,
        photo: &PreparedImage,
    ) -> ComposeResult<Vec<u8>> {
        let size = canvas_u16(canvas)?;
        let mask = catalog.canvas.photo_mask;
        let affine = photo_affine(
            canvas,
            mask,
            photo.width,
            photo.height,
            &scene.photo_transform,
        );
        let paint = cached_paint(&mut self.photo_paint, photo)?;
        let mut layer = self.draw_layer(size, |ctx| {
            ctx.set_transform(affine_to_cpu(affine));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(photo.width),
                f64::from(photo.height),
            ));
            Ok(())
        })?;

        let filter = build_filter_string(
            catalog.filter_effect(scene.filter_id()),
            scene.blur_background,
            true,
            catalog.blur_px,
        );
        let stages = parse_filter(&filter)?;
        apply_filter(
            &stages,
            layer.data_as_u8_slice_mut(),
            canvas.size,
            canvas.size,
        )?;

        let mut bytes = layer.data_as_u8_slice().to_vec();
        if let PhotoMask::Circle { radius } = mask {
            let circle = kurbo::Circle::new(canvas.center(), radius);
            let mask_layer = self.draw_layer(size, |ctx| {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
                ctx.fill_path(&bezpath_to_cpu(&circle.to_path(0.1)));
                Ok(())
            })?;
            mask_alpha_in_place(&mut bytes, mask_layer.data_as_u8_slice())?;
        }
        Ok(bytes)
    }

    /// Frame overlay stretched to the canvas, with the preset look but never the blur.
    fn frame_layer(
        &mut self,
        scene: &Scene,
        catalog: &Catalog,
        canvas: Canvas,
        frame: &PreparedImage,
    ) -> ComposeResult<Vec<u8>> {
        let size = canvas_u16(canvas)?;
        let s = canvas.size_f64();
        let fw = f64::from(frame.width.max(1));
        let fh = f64::from(frame.height.max(1));
        let paint = cached_paint(&mut self.frame_paint, frame)?;
        let layer = self.draw_layer(size, |ctx| {
            ctx.set_transform(affine_to_cpu(Affine::scale_non_uniform(s / fw, s / fh)));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, fw, fh));
            Ok(())
        })?;

        let mut bytes = layer.data_as_u8_slice().to_vec();
        let filter = build_filter_string(
            catalog.filter_effect(scene.filter_id()),
            scene.blur_background,
            false,
            catalog.blur_px,
        );
        let stages = parse_filter(&filter)?;
        apply_filter(&stages, &mut bytes, canvas.size, canvas.size)?;
        Ok(bytes)
    }

    fn text_layer(
        &mut self,
        size: u16,
        texts: &[TextItem],
        engine: &mut TextEngine,
    ) -> ComposeResult<vello_cpu::Pixmap> {
        if !engine.has_fonts() {
            tracing::warn!(count = texts.len(), "no fonts registered; text glyphs skipped");
        }
        self.draw_layer(size, |ctx| {
            for item in texts {
                draw_text_item(ctx, engine, item);
            }
            Ok(())
        })
    }

    fn outline_layer(
        &mut self,
        size: u16,
        item: &TextItem,
        engine: &mut TextEngine,
    ) -> ComposeResult<vello_cpu::Pixmap> {
        let rect = text_box(engine, item).local_rect(OUTLINE_MARGIN);
        let dashed: BezPath = kurbo::dash(rect.path_elements(0.1), 0.0, &OUTLINE_DASH).collect();
        let c = OUTLINE_COLOR;
        self.draw_layer(size, |ctx| {
            ctx.set_transform(affine_to_cpu(item_transform(item)));
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(OUTLINE_WIDTH));
            ctx.stroke_path(&bezpath_to_cpu(&dashed));
            Ok(())
        })
    }
}

/// Anchor translation followed by the item rotation.
fn item_transform(item: &TextItem) -> Affine {
    Affine::translate(item.position.to_vec2()) * Affine::rotate(deg_to_rad(item.style.rotation_deg))
}

/// Glyphs centered on the anchor, then underline and strike-through.
fn draw_text_item(ctx: &mut vello_cpu::RenderContext, engine: &mut TextEngine, item: &TextItem) {
    let base = item_transform(item);

    if let Some(layout) = engine.layout(&item.text, &item.style) {
        let w = f64::from(layout.width());
        let h = f64::from(layout.height());
        ctx.set_transform(affine_to_cpu(
            base * Affine::translate(Vec2::new(-w / 2.0, -h / 2.0)),
        ));
        for line in layout.lines() {
            for part in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = part else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let font = run.run().font();
                let font = engine.glyph_font(font.data.id(), font.index, font.data.data());
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    let style = &item.style;
    if !style.underline && !style.strike {
        return;
    }
    let tb = text_box(engine, item);
    let line_width = style.decoration_width();
    let half = tb.width / 2.0;
    let mut path = BezPath::new();
    if style.underline {
        let y = tb.height / 2.0 + line_width;
        path.move_to(Point::new(-half, y));
        path.line_to(Point::new(half, y));
    }
    if style.strike {
        path.move_to(Point::new(-half, 0.0));
        path.line_to(Point::new(half, 0.0));
    }
    let c = style.color;
    ctx.set_transform(affine_to_cpu(base));
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
    ctx.set_stroke(
        vello_cpu::kurbo::Stroke::new(line_width).with_caps(vello_cpu::kurbo::Cap::Round),
    );
    ctx.stroke_path(&bezpath_to_cpu(&path));
}

fn canvas_u16(canvas: Canvas) -> ComposeResult<u16> {
    canvas
        .size
        .try_into()
        .map_err(|_| ComposeError::render("canvas size exceeds u16"))
}

/// Reuse the paint while the slot still holds the same decoded buffer.
fn cached_paint(
    cache: &mut Option<ImagePaint>,
    image: &PreparedImage,
) -> ComposeResult<vello_cpu::Image> {
    if let Some(hit) = cache
        .as_ref()
        .filter(|c| Arc::ptr_eq(&c.source, &image.rgba8_premul))
    {
        return Ok(hit.paint.clone());
    }
    let paint = rgba_premul_to_image(&image.rgba8_premul, image.width, image.height)?;
    *cache = Some(ImagePaint {
        source: Arc::clone(&image.rgba8_premul),
        paint: paint.clone(),
    });
    Ok(paint)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ComposeResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ComposeError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ComposeError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ComposeError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> ComposeResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
