//! Serializable user intents, replayed against a [`Composer`].
//!
//! A script stands in for the interactive UI: each entry is one control event (a frame pick, an
//! upload, a slider change, a pointer event, a download).

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::assets::decode::PhotoUpload;
use crate::composer::Composer;
use crate::foundation::core::Point;
use crate::foundation::error::{ComposeError, ComposeResult};
use crate::interact::drag::ScreenRect;
use crate::render::ExportArtifact;
use crate::scene::text::TextEdit;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Intent {
    SelectFrame {
        id: String,
    },
    /// Photo file, relative to the script's directory.
    LoadPhoto {
        path: PathBuf,
        #[serde(default)]
        mime: Option<String>,
    },
    SetZoom {
        percent: f64,
    },
    SetRotation {
        degrees: f64,
    },
    SetBlur {
        enabled: bool,
    },
    SetTextOverFrame {
        enabled: bool,
    },
    SetFilter {
        id: String,
    },
    ResetPhoto,
    AddText {
        #[serde(default)]
        text: String,
    },
    EditText {
        edit: TextEdit,
    },
    DeselectText,
    DeleteText,
    PointerDown {
        x: f64,
        y: f64,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    PointerUp,
    Export,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectFrame { .. } => "select_frame",
            Self::LoadPhoto { .. } => "load_photo",
            Self::SetZoom { .. } => "set_zoom",
            Self::SetRotation { .. } => "set_rotation",
            Self::SetBlur { .. } => "set_blur",
            Self::SetTextOverFrame { .. } => "set_text_over_frame",
            Self::SetFilter { .. } => "set_filter",
            Self::ResetPhoto => "reset_photo",
            Self::AddText { .. } => "add_text",
            Self::EditText { .. } => "edit_text",
            Self::DeselectText => "deselect_text",
            Self::DeleteText => "delete_text",
            Self::PointerDown { .. } => "pointer_down",
            Self::PointerMove { .. } => "pointer_move",
            Self::PointerUp => "pointer_up",
            Self::Export => "export",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// On-screen canvas rect used to map pointer coordinates. Defaults to 1:1 canvas units.
    #[serde(default)]
    pub screen: Option<ScreenRect>,
    pub intents: Vec<Intent>,
}

impl Script {
    pub fn from_json_str(s: &str) -> ComposeResult<Self> {
        let script = serde_json::from_str(s).context("parse intent script")?;
        Ok(script)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ComposeResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read intent script '{}'", path.display()))?;
        Self::from_json_str(&s)
    }
}

/// One intent that the engine refused.
#[derive(Debug)]
pub struct ReplayFailure {
    pub index: usize,
    pub op: &'static str,
    pub error: ComposeError,
}

#[derive(Debug, Default)]
pub struct ReplayReport {
    pub exports: Vec<ExportArtifact>,
    pub failures: Vec<ReplayFailure>,
}

/// Apply every intent in order. Refused intents are recorded and replay continues, the same way
/// the interactive UI keeps running after a failed upload or frame fetch.
pub fn replay(composer: &mut Composer, script: &Script, base_dir: &Path) -> ReplayReport {
    if let Some(rect) = script.screen {
        composer.set_screen_rect(rect);
    }

    let mut report = ReplayReport::default();
    for (index, intent) in script.intents.iter().enumerate() {
        tracing::debug!(index, op = intent.name(), "replaying intent");
        if let Err(error) = apply(composer, intent, base_dir, &mut report.exports) {
            report.failures.push(ReplayFailure {
                index,
                op: intent.name(),
                error,
            });
        }
    }
    report
}

fn apply(
    composer: &mut Composer,
    intent: &Intent,
    base_dir: &Path,
    exports: &mut Vec<ExportArtifact>,
) -> ComposeResult<()> {
    match intent {
        Intent::SelectFrame { id } => composer.select_frame(id)?,
        Intent::LoadPhoto { path, mime } => {
            let mut upload = PhotoUpload::from_path(base_dir.join(path))?;
            if let Some(mime) = mime {
                upload.mime = Some(mime.clone());
            }
            composer.load_photo(&upload)?;
        }
        Intent::SetZoom { percent } => {
            composer.set_zoom_percent(*percent);
        }
        Intent::SetRotation { degrees } => {
            composer.set_rotation_deg(*degrees);
        }
        Intent::SetBlur { enabled } => composer.set_blur_background(*enabled),
        Intent::SetTextOverFrame { enabled } => composer.set_text_over_frame(*enabled),
        Intent::SetFilter { id } => composer.set_filter(id)?,
        Intent::ResetPhoto => composer.reset_photo_transform(),
        Intent::AddText { text } => {
            composer.add_text(text);
        }
        Intent::EditText { edit } => {
            composer.edit_text(edit.clone())?;
        }
        Intent::DeselectText => composer.deselect_text(),
        Intent::DeleteText => {
            composer.delete_active_text();
        }
        Intent::PointerDown { x, y } => {
            composer.pointer_down(Point::new(*x, *y));
        }
        Intent::PointerMove { x, y } => {
            composer.pointer_move(Point::new(*x, *y));
        }
        Intent::PointerUp => {
            composer.pointer_up();
        }
        Intent::Export => exports.push(composer.export()?),
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/script.rs"]
mod tests;
