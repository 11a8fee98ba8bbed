use crate::foundation::core::{Canvas, Point, Vec2};
use crate::interact::hit::{TextMeasure, hit_test};
use crate::scene::Scene;
use crate::scene::text::TextId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DragTarget {
    Photo,
    Text(TextId),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        target: DragTarget,
        /// Pointer position when the drag began, in canvas units.
        start: Point,
        /// Text position or photo offset when the drag began.
        origin: Vec2,
    },
}

impl DragState {
    pub fn target(&self) -> Option<DragTarget> {
        match self {
            Self::Idle => None,
            Self::Dragging { target, .. } => Some(*target),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}

/// On-screen rectangle the canvas is displayed in (CSS pixels or window coordinates).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    /// A rect that shows the canvas 1:1 at the origin.
    pub fn identity(canvas: Canvas) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: canvas.size_f64(),
            height: canvas.size_f64(),
        }
    }
}

pub fn screen_to_canvas(rect: &ScreenRect, client: Point, canvas: Canvas) -> Point {
    let s = canvas.size_f64();
    let sx = if rect.width > 0.0 { s / rect.width } else { 1.0 };
    let sy = if rect.height > 0.0 { s / rect.height } else { 1.0 };
    Point::new((client.x - rect.left) * sx, (client.y - rect.top) * sy)
}

/// Text hits take precedence; otherwise a loaded photo is grabbed and the selection cleared.
pub(crate) fn pointer_down<M: TextMeasure + ?Sized>(
    scene: &mut Scene,
    point: Point,
    measure: &mut M,
    hit_padding: f64,
) -> Option<DragTarget> {
    if let Some(id) = hit_test(scene.texts(), point, measure, hit_padding) {
        let origin = scene.text(id).map(|t| t.position.to_vec2())?;
        scene.select_text(Some(id));
        scene.drag = DragState::Dragging {
            target: DragTarget::Text(id),
            start: point,
            origin,
        };
        return Some(DragTarget::Text(id));
    }

    if !scene.has_photo() {
        scene.drag = DragState::Idle;
        return None;
    }

    scene.select_text(None);
    scene.drag = DragState::Dragging {
        target: DragTarget::Photo,
        start: point,
        origin: scene.photo_transform.offset,
    };
    Some(DragTarget::Photo)
}

/// Move the drag target to `origin + (point - start)`. Returns whether anything moved.
pub(crate) fn pointer_move(scene: &mut Scene, point: Point) -> bool {
    let DragState::Dragging {
        target,
        start,
        origin,
    } = scene.drag
    else {
        return false;
    };
    let next = origin + (point - start);
    match target {
        DragTarget::Photo => {
            scene.photo_transform.offset = next;
            true
        }
        DragTarget::Text(id) => match scene.text_mut(id) {
            Some(item) => {
                item.position = next.to_point();
                true
            }
            None => {
                scene.drag = DragState::Idle;
                false
            }
        },
    }
}

/// Pointer up, cancel and leave all end the drag.
pub(crate) fn pointer_up(scene: &mut Scene) -> bool {
    let was_dragging = scene.drag.is_dragging();
    scene.drag = DragState::Idle;
    was_dragging
}

#[cfg(test)]
#[path = "../../tests/unit/interact/drag.rs"]
mod tests;
