//! The composition engine: owns the scene and turns user intents into scene mutations, status
//! updates and renders.

use crate::assets::decode::{PhotoUpload, check_image_upload, decode_frame, decode_photo};
use crate::assets::fonts::TextEngine;
use crate::assets::slot::{LoadOutcome, LoadTicket};
use crate::assets::source::AssetSource;
use crate::assets::PreparedImage;
use crate::catalog::Catalog;
use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{ComposeError, ComposeResult};
use crate::interact::drag::{self, DragTarget, ScreenRect, screen_to_canvas};
use crate::render::{CpuRenderer, ExportArtifact, FrameRGBA, RenderMode, encode_png};
use crate::scene::Scene;
use crate::scene::text::{TextEdit, TextId, TextItem};

pub const MSG_FRAME_LOADING: &str = "Loading frame…";
pub const MSG_FRAME_READY: &str = "Frame ready. Upload a photo to get started.";
pub const MSG_PHOTO_LOADED: &str = "Photo loaded. Preview refreshed, download when ready.";
pub const MSG_TEXT_ADDED: &str =
    "Text added. Drag to position; adjust size or rotation, then hit Done.";
pub const MSG_TEXT_REMOVED: &str = "Text removed.";
pub const MSG_TEXT_LOCKED: &str = "Text locked. Click again to edit or move.";
pub const MSG_NEED_PHOTO: &str = "Upload a photo first.";
pub const MSG_PREVIEW_UPDATED: &str = "Preview updated.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLevel {
    Info,
    Error,
}

/// The single user-facing status line.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Status {
    pub level: StatusLevel,
    pub message: String,
}

pub struct Composer {
    catalog: Catalog,
    canvas: Canvas,
    scene: Scene,
    assets: Box<dyn AssetSource>,
    text: TextEngine,
    renderer: CpuRenderer,
    screen: ScreenRect,
    status: Option<Status>,
}

impl std::fmt::Debug for Composer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composer")
            .field("canvas", &self.canvas)
            .field("scene", &self.scene)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl Composer {
    /// Build an engine over a validated catalog. Catalog fonts are read through `assets`; a font
    /// that fails to load is skipped with a warning. Styles naming no loaded family fall back to
    /// the bundled face.
    pub fn new(catalog: Catalog, assets: impl AssetSource + 'static) -> ComposeResult<Self> {
        catalog.validate()?;
        let canvas = Canvas::new(catalog.canvas.size)?;
        let mut text = TextEngine::with_bundled_font()?;
        for font in &catalog.fonts {
            for source in &font.sources {
                let loaded = assets
                    .read(source)
                    .and_then(|bytes| text.register_family(&font.family, bytes));
                if let Err(err) = loaded {
                    tracing::warn!(family = %font.family, source = %source, error = %err, "font skipped");
                }
            }
        }

        Ok(Self {
            scene: Scene::new(catalog.text_defaults.clone()),
            screen: ScreenRect::identity(canvas),
            catalog,
            canvas,
            assets: Box::new(assets),
            text,
            renderer: CpuRenderer::new(),
            status: None,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// Register extra font bytes, in addition to the catalog fonts.
    pub fn register_font(&mut self, family: &str, bytes: Vec<u8>) -> ComposeResult<()> {
        self.text.register_family(family, bytes)
    }

    /// Where the canvas is shown on screen; pointer coordinates are mapped through it.
    pub fn set_screen_rect(&mut self, rect: ScreenRect) {
        self.screen = rect;
    }

    fn info(&mut self, message: &str) {
        self.status = Some(Status {
            level: StatusLevel::Info,
            message: message.to_string(),
        });
    }

    fn fail(&mut self, err: ComposeError) -> ComposeError {
        tracing::warn!(error = %err, "operation failed");
        self.status = Some(Status {
            level: StatusLevel::Error,
            message: err.status_message().to_string(),
        });
        err
    }

    /// Load a catalog frame through the asset source and show it.
    pub fn select_frame(&mut self, frame_id: &str) -> ComposeResult<()> {
        let frame = self
            .catalog
            .frame(frame_id)
            .cloned()
            .ok_or_else(|| ComposeError::validation(format!("unknown frame '{frame_id}'")))
            .map_err(|e| self.fail(e))?;
        let ticket = self.begin_frame_load(&frame.id)?;
        let result = self
            .assets
            .read(&frame.source)
            .and_then(|bytes| decode_frame(&bytes, &frame.source, self.canvas.size));
        match self.finish_frame_load(ticket, result) {
            LoadOutcome::Failed(err) => Err(err),
            LoadOutcome::Applied | LoadOutcome::Stale => Ok(()),
        }
    }

    /// Start a frame load. The frame layer stops drawing until the load resolves.
    pub fn begin_frame_load(&mut self, frame_id: &str) -> ComposeResult<LoadTicket> {
        if self.catalog.frame(frame_id).is_none() {
            let err = ComposeError::validation(format!("unknown frame '{frame_id}'"));
            return Err(self.fail(err));
        }
        let ticket = self.scene.begin_frame_load(frame_id);
        tracing::debug!(frame_id, generation = ticket.generation, "frame load started");
        self.info(MSG_FRAME_LOADING);
        Ok(ticket)
    }

    pub fn finish_frame_load(
        &mut self,
        ticket: LoadTicket,
        result: ComposeResult<PreparedImage>,
    ) -> LoadOutcome {
        let result = result.map_err(|e| match e {
            ComposeError::AssetLoad(_) => e,
            other => ComposeError::asset_load(other.to_string()),
        });
        match self.scene.finish_frame_load(ticket, result) {
            LoadOutcome::Applied => {
                tracing::debug!(frame_id = ?self.scene.frame_id(), "frame ready");
                self.info(MSG_FRAME_READY);
                LoadOutcome::Applied
            }
            LoadOutcome::Stale => {
                tracing::debug!(generation = ticket.generation, "stale frame load dropped");
                LoadOutcome::Stale
            }
            LoadOutcome::Failed(err) => LoadOutcome::Failed(self.fail(err)),
        }
    }

    /// Decode an upload and make it the photo.
    pub fn load_photo(&mut self, upload: &PhotoUpload) -> ComposeResult<()> {
        check_image_upload(upload).map_err(|e| self.fail(e))?;
        let ticket = self.begin_photo_load();
        let result = decode_photo(upload, self.catalog.canvas.max_photo_dim);
        match self.finish_photo_load(ticket, result) {
            LoadOutcome::Failed(err) => Err(err),
            LoadOutcome::Applied | LoadOutcome::Stale => Ok(()),
        }
    }

    /// Start a photo load. The current photo stays visible until the load resolves.
    pub fn begin_photo_load(&mut self) -> LoadTicket {
        let ticket = self.scene.begin_photo_load();
        tracing::debug!(generation = ticket.generation, "photo load started");
        ticket
    }

    pub fn finish_photo_load(
        &mut self,
        ticket: LoadTicket,
        result: ComposeResult<PreparedImage>,
    ) -> LoadOutcome {
        match self.scene.finish_photo_load(ticket, result) {
            LoadOutcome::Applied => {
                let dims = self.scene.photo().map(PreparedImage::dimensions);
                tracing::debug!(?dims, "photo loaded");
                self.info(MSG_PHOTO_LOADED);
                LoadOutcome::Applied
            }
            LoadOutcome::Stale => {
                tracing::debug!(generation = ticket.generation, "stale photo load dropped");
                LoadOutcome::Stale
            }
            LoadOutcome::Failed(err) => LoadOutcome::Failed(self.fail(err)),
        }
    }

    /// Add a text item at the canvas center and select it.
    pub fn add_text(&mut self, input: &str) -> TextId {
        let id = self.scene.add_text(input, self.canvas.center());
        tracing::debug!(%id, "text added");
        self.info(MSG_TEXT_ADDED);
        id
    }

    /// Apply a text control change. Style values are clamped to the control ranges. Returns
    /// whether the selected item changed.
    pub fn edit_text(&mut self, edit: TextEdit) -> ComposeResult<bool> {
        let ranges = self.catalog.ranges;
        let edit = match edit {
            TextEdit::Size(size) if !size.is_finite() => {
                return Err(self.fail(ComposeError::validation("text size must be finite")));
            }
            TextEdit::Size(size) => TextEdit::Size(ranges.text_size.clamp(size)),
            TextEdit::Rotation(deg) => TextEdit::Rotation(ranges.text_rotation_deg.clamp(deg)),
            TextEdit::FontFamily(family) if family.trim().is_empty() => {
                return Err(self.fail(ComposeError::validation("font family must be non-empty")));
            }
            other => other,
        };
        let changed = self.scene.edit_text(&edit);
        tracing::debug!(?edit, changed, "text edited");
        Ok(changed)
    }

    pub fn select_text(&mut self, id: Option<TextId>) {
        self.scene.select_text(id);
    }

    /// "Done": drop the selection so the item is locked in place.
    pub fn deselect_text(&mut self) {
        self.scene.select_text(None);
        self.info(MSG_TEXT_LOCKED);
    }

    /// Remove the selected item. A no-op without a selection.
    pub fn delete_active_text(&mut self) -> Option<TextItem> {
        let removed = self.scene.delete_active_text()?;
        tracing::debug!(id = %removed.id, "text removed");
        self.info(MSG_TEXT_REMOVED);
        Some(removed)
    }

    pub fn reset_photo_transform(&mut self) {
        self.scene.reset_photo_transform();
    }

    /// Set the zoom slider (percent). Returns the applied user scale.
    pub fn set_zoom_percent(&mut self, percent: f64) -> f64 {
        let pct = self.catalog.ranges.zoom_pct.clamp(percent);
        self.scene.photo_transform.scale = pct / 100.0;
        self.scene.photo_transform.scale
    }

    /// Set the photo rotation slider (degrees). Returns the applied rotation.
    pub fn set_rotation_deg(&mut self, degrees: f64) -> f64 {
        let deg = self.catalog.ranges.rotation_deg.clamp(degrees);
        self.scene.photo_transform.rotation_deg = deg;
        deg
    }

    pub fn set_blur_background(&mut self, enabled: bool) {
        self.scene.blur_background = enabled;
    }

    pub fn set_text_over_frame(&mut self, enabled: bool) {
        self.scene.text_over_frame = enabled;
    }

    pub fn set_filter(&mut self, filter_id: &str) -> ComposeResult<()> {
        if self.catalog.filter(filter_id).is_none() {
            let err = ComposeError::validation(format!("unknown filter '{filter_id}'"));
            return Err(self.fail(err));
        }
        self.scene.filter_id = filter_id.to_string();
        Ok(())
    }

    /// Pointer down at screen coordinates. Returns what is now being dragged.
    pub fn pointer_down(&mut self, client: Point) -> Option<DragTarget> {
        let p = screen_to_canvas(&self.screen, client, self.canvas);
        let target = drag::pointer_down(&mut self.scene, p, &mut self.text, self.catalog.hit_padding);
        tracing::debug!(x = p.x, y = p.y, ?target, "pointer down");
        target
    }

    /// Move the current drag target. Photo offsets are not clamped: once the offset would expose
    /// the viewport, the drawn scale rises to the cover floor (see [`crate::effective_scale`])
    /// while the user zoom in `photo_transform.scale` stays as set.
    pub fn pointer_move(&mut self, client: Point) -> bool {
        let p = screen_to_canvas(&self.screen, client, self.canvas);
        drag::pointer_move(&mut self.scene, p)
    }

    /// Pointer up, cancel or leave.
    pub fn pointer_up(&mut self) -> bool {
        drag::pointer_up(&mut self.scene)
    }

    pub fn render(&mut self, mode: RenderMode) -> ComposeResult<FrameRGBA> {
        self.renderer
            .render(&self.scene, &self.catalog, &mut self.text, mode)
            .map_err(|e| self.fail(e))
    }

    /// Interactive render for the on-screen preview.
    pub fn preview(&mut self) -> ComposeResult<FrameRGBA> {
        let frame = self.render(RenderMode::Interactive)?;
        if self.scene.has_photo() {
            self.info(MSG_PREVIEW_UPDATED);
        } else {
            self.info(MSG_NEED_PHOTO);
        }
        Ok(frame)
    }

    /// Render without selection affordances and encode as PNG under the configured name.
    #[tracing::instrument(skip(self))]
    pub fn export(&mut self) -> ComposeResult<ExportArtifact> {
        if !self.scene.has_photo() {
            let err = ComposeError::nothing_to_export("no photo loaded");
            return Err(self.fail(err));
        }
        let frame = self.render(RenderMode::Export)?;
        let bytes = encode_png(&frame).map_err(|e| self.fail(e))?;
        tracing::debug!(bytes = bytes.len(), "export encoded");
        Ok(ExportArtifact {
            file_name: self.catalog.canvas.export_file_name.clone(),
            width: frame.width,
            height: frame.height,
            bytes,
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/composer.rs"]
mod tests;
