use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::foundation::error::{ComposeError, ComposeResult};

/// Where frame overlays and font files come from.
pub trait AssetSource {
    fn read(&self, source: &str) -> ComposeResult<Vec<u8>>;
}

/// Normalize and validate catalog-relative asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> ComposeResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(ComposeError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(ComposeError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ComposeError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ComposeError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

/// Reads assets relative to a root directory.
#[derive(Clone, Debug)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for FsAssetSource {
    fn read(&self, source: &str) -> ComposeResult<Vec<u8>> {
        let norm = normalize_rel_path(source)?;
        let p = self.root.join(Path::new(&norm));
        std::fs::read(&p).map_err(|e| {
            ComposeError::asset_load(format!("failed to read asset '{}': {e}", p.display()))
        })
    }
}

/// In-memory assets keyed by their normalized catalog path.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssetSource {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: &str, bytes: Vec<u8>) -> ComposeResult<()> {
        self.files.insert(normalize_rel_path(source)?, bytes);
        Ok(())
    }

    pub fn with(mut self, source: &str, bytes: Vec<u8>) -> ComposeResult<Self> {
        self.insert(source, bytes)?;
        Ok(self)
    }
}

impl AssetSource for MemoryAssetSource {
    fn read(&self, source: &str) -> ComposeResult<Vec<u8>> {
        let norm = normalize_rel_path(source)?;
        self.files
            .get(&norm)
            .cloned()
            .ok_or_else(|| ComposeError::asset_load(format!("asset '{norm}' not found")))
    }
}
