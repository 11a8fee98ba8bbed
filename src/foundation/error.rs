pub type ComposeResult<T> = Result<T, ComposeError>;

/// Errors surfaced by the composition engine.
///
/// None of these are fatal to a running session: the engine reports them through its status
/// channel and leaves the scene in its prior state.
#[derive(thiserror::Error, Debug)]
pub enum ComposeError {
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("image decode failure: {0}")]
    ImageDecode(String),

    #[error("asset load failure: {0}")]
    AssetLoad(String),

    #[error("nothing to export: {0}")]
    NothingToExport(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ComposeError {
    pub fn unsupported_file_type(msg: impl Into<String>) -> Self {
        Self::UnsupportedFileType(msg.into())
    }

    pub fn image_decode(msg: impl Into<String>) -> Self {
        Self::ImageDecode(msg.into())
    }

    pub fn asset_load(msg: impl Into<String>) -> Self {
        Self::AssetLoad(msg.into())
    }

    pub fn nothing_to_export(msg: impl Into<String>) -> Self {
        Self::NothingToExport(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// User-facing status line for this error.
    pub fn status_message(&self) -> &'static str {
        match self {
            Self::UnsupportedFileType(_) => "Please drop an image file.",
            Self::ImageDecode(_) => "Could not read that image, try another file.",
            Self::AssetLoad(_) => "Could not load the frame asset.",
            Self::NothingToExport(_) => "Upload a photo first.",
            Self::Validation(_) => "That setting is not available.",
            Self::Render(_) | Self::Other(_) => "Something went wrong while rendering.",
        }
    }
}
