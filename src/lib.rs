//! frame-composer builds personalized square hero images.
//!
//! A [`Composer`] owns one [`Scene`]: an uploaded photo under a circular (or full-canvas) mask, a
//! decorative frame overlay, and styled text annotations. The photo can be panned, zoomed and
//! rotated but always covers its viewport. Renders are CPU-only and deterministic:
//!
//! - photo (filtered, masked) or a placeholder fill
//! - text, when placed under the frame
//! - the frame overlay, once loaded
//! - text, when placed over the frame
//! - the selection outline, in interactive renders only
//!
//! Exports are PNG files with a fixed name taken from the [`Catalog`].
#![forbid(unsafe_code)]

mod assets;
mod foundation;

/// Static configuration: frames, filter presets, fonts and control ranges.
pub mod catalog;
/// The composition engine.
pub mod composer;
pub(crate) mod effects;
/// Hit-testing and the drag state machine.
pub mod interact;
/// CPU rendering and PNG export.
pub mod render;
/// Scene state and its mutations.
pub mod scene;
/// Replayable intent scripts.
pub mod script;

pub use crate::assets::PreparedImage;
pub use crate::assets::decode::{
    PhotoUpload, check_image_upload, decode_frame, decode_image, decode_photo,
};
pub use crate::assets::slot::{AssetSlot, LoadOutcome, LoadTicket, SlotKind, SlotPolicy};
pub use crate::assets::source::{AssetSource, FsAssetSource, MemoryAssetSource, normalize_rel_path};
pub use crate::catalog::{Catalog, ControlRanges, FilterPreset, FontDef, FrameDef};
pub use crate::composer::{Composer, Status, StatusLevel};
pub use crate::effects::{FilterStage, apply_filter, build_filter_string, parse_filter};
pub use crate::foundation::core::{Affine, BezPath, Canvas, Color, Point, Rect, Vec2};
pub use crate::foundation::error::{ComposeError, ComposeResult};
pub use crate::interact::{
    DragState, DragTarget, FixedAdvance, ScreenRect, TextBox, TextMeasure, hit_test,
    screen_to_canvas, text_box,
};
pub use crate::render::{ExportArtifact, FrameRGBA, RenderMode, encode_png};
pub use crate::scene::{
    PhotoMask, PhotoTransform, Scene, TextEdit, TextId, TextItem, TextStyle, base_scale,
    cover_floor, effective_scale, photo_affine,
};
pub use crate::script::{Intent, ReplayFailure, ReplayReport, Script, replay};
