//! The mutable composition state and the pure mutations applied to it.

pub(crate) mod model;
pub(crate) mod photo;
pub(crate) mod text;

pub use model::Scene;
pub use photo::{
    PhotoMask, PhotoTransform, base_scale, cover_floor, effective_scale, photo_affine,
};
pub use text::{TextEdit, TextId, TextItem, TextStyle};
