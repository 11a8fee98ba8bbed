use crate::assets::PreparedImage;
use crate::assets::slot::{AssetSlot, LoadOutcome, LoadTicket, SlotKind, SlotPolicy};
use crate::foundation::core::Point;
use crate::foundation::error::ComposeResult;
use crate::interact::drag::{DragState, DragTarget};
use crate::scene::photo::PhotoTransform;
use crate::scene::text::{PLACEHOLDER_TEXT, TextEdit, TextId, TextIdGen, TextItem, TextStyle};

pub const DEFAULT_FILTER_ID: &str = "original";

/// Everything a render reads. Owned by the engine and passed explicitly to render and
/// interaction code.
#[derive(Clone, Debug)]
pub struct Scene {
    pub(crate) photo: AssetSlot<PreparedImage>,
    pub(crate) frame: AssetSlot<PreparedImage>,
    frame_id: Option<String>,
    pending_frame: Option<(u64, String)>,
    pub photo_transform: PhotoTransform,
    pub blur_background: bool,
    pub text_over_frame: bool,
    pub(crate) filter_id: String,
    texts: Vec<TextItem>,
    active_text: Option<TextId>,
    pub(crate) drag: DragState,
    text_defaults: TextStyle,
    ids: TextIdGen,
}

impl Scene {
    pub fn new(text_defaults: TextStyle) -> Self {
        Self {
            photo: AssetSlot::new(SlotKind::Photo, SlotPolicy::KeepWhileLoading),
            frame: AssetSlot::new(SlotKind::Frame, SlotPolicy::HideWhileLoading),
            frame_id: None,
            pending_frame: None,
            photo_transform: PhotoTransform::default(),
            blur_background: false,
            text_over_frame: true,
            filter_id: DEFAULT_FILTER_ID.to_string(),
            texts: Vec::new(),
            active_text: None,
            drag: DragState::Idle,
            text_defaults,
            ids: TextIdGen::new(),
        }
    }

    pub fn photo(&self) -> Option<&PreparedImage> {
        self.photo.ready_value()
    }

    pub fn has_photo(&self) -> bool {
        self.photo.is_ready()
    }

    /// The frame overlay, only once its load has completed.
    pub fn frame(&self) -> Option<&PreparedImage> {
        self.frame.ready_value()
    }

    pub fn frame_ready(&self) -> bool {
        self.frame.is_ready()
    }

    pub fn frame_id(&self) -> Option<&str> {
        self.frame_id.as_deref()
    }

    pub fn filter_id(&self) -> &str {
        &self.filter_id
    }

    pub fn texts(&self) -> &[TextItem] {
        &self.texts
    }

    pub fn text(&self, id: TextId) -> Option<&TextItem> {
        self.texts.iter().find(|t| t.id == id)
    }

    pub(crate) fn text_mut(&mut self, id: TextId) -> Option<&mut TextItem> {
        self.texts.iter_mut().find(|t| t.id == id)
    }

    pub fn active_text_id(&self) -> Option<TextId> {
        self.active_text
    }

    pub fn active_text(&self) -> Option<&TextItem> {
        self.active_text.and_then(|id| self.text(id))
    }

    pub fn text_defaults(&self) -> &TextStyle {
        &self.text_defaults
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    /// Select `id`, or clear the selection with `None`. Unknown ids clear it too.
    pub(crate) fn select_text(&mut self, id: Option<TextId>) {
        self.active_text = id.filter(|id| self.text(*id).is_some());
    }

    /// Append a text item centered at `anchor` with the current defaults and select it.
    pub(crate) fn add_text(&mut self, input: &str, anchor: Point) -> TextId {
        let trimmed = input.trim();
        let text = if trimmed.is_empty() {
            PLACEHOLDER_TEXT
        } else {
            trimmed
        };
        let id = self.ids.next_id();
        self.texts.push(TextItem {
            id,
            text: text.to_string(),
            position: anchor,
            style: self.text_defaults.clone(),
        });
        self.active_text = Some(id);
        id
    }

    /// Apply a control change. Returns whether the selected item changed.
    pub(crate) fn edit_text(&mut self, edit: &TextEdit) -> bool {
        if edit.is_style() {
            edit.apply_to_style(&mut self.text_defaults);
        }
        let Some(id) = self.active_text else {
            return false;
        };
        match self.text_mut(id) {
            Some(item) => {
                edit.apply_to_item(item);
                true
            }
            None => false,
        }
    }

    /// Remove the selected item. `None` when nothing was selected.
    pub(crate) fn delete_active_text(&mut self) -> Option<TextItem> {
        let id = self.active_text.take()?;
        if self.drag.target() == Some(DragTarget::Text(id)) {
            self.drag = DragState::Idle;
        }
        let idx = self.texts.iter().position(|t| t.id == id)?;
        Some(self.texts.remove(idx))
    }

    pub(crate) fn reset_photo_transform(&mut self) {
        self.photo_transform = PhotoTransform::default();
    }

    pub(crate) fn begin_photo_load(&mut self) -> LoadTicket {
        self.photo.begin()
    }

    /// A new photo always starts from the identity transform.
    pub(crate) fn finish_photo_load(
        &mut self,
        ticket: LoadTicket,
        result: ComposeResult<PreparedImage>,
    ) -> LoadOutcome {
        let outcome = self.photo.finish(ticket, result);
        if outcome.is_applied() {
            self.reset_photo_transform();
        }
        outcome
    }

    pub(crate) fn begin_frame_load(&mut self, frame_id: &str) -> LoadTicket {
        let ticket = self.frame.begin();
        self.pending_frame = Some((ticket.generation, frame_id.to_string()));
        ticket
    }

    pub(crate) fn finish_frame_load(
        &mut self,
        ticket: LoadTicket,
        result: ComposeResult<PreparedImage>,
    ) -> LoadOutcome {
        let outcome = self.frame.finish(ticket, result);
        if !matches!(outcome, LoadOutcome::Stale) {
            let pending = self.pending_frame.take();
            if outcome.is_applied() {
                self.frame_id = pending
                    .filter(|(generation, _)| *generation == ticket.generation)
                    .map(|(_, id)| id);
            }
        }
        outcome
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
