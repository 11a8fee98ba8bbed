//! Pointer input: canvas hit-testing and the photo/text drag state machine.

pub(crate) mod drag;
pub(crate) mod hit;

pub use drag::{DragState, DragTarget, ScreenRect, screen_to_canvas};
pub use hit::{FixedAdvance, TextBox, TextMeasure, hit_test, text_box};
